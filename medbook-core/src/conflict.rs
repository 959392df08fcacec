use serde::{Deserialize, Serialize};

use crate::types::{Booking, BookingId, Reservation, TimeSpan};

/// The resource a pair of bookings contends for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Doctor,
    Patient,
    Room,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Doctor => write!(f, "doctor"),
            Dimension::Patient => write!(f, "patient"),
            Dimension::Room => write!(f, "room"),
        }
    }
}

/// Represents the outcome of a conflict check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictResult {
    /// No conflict found
    Ok,
    /// The candidate collides with an admitted booking
    Conflict {
        with: BookingId,
        dimension: Dimension,
        reason: String,
    },
}

/// Pure predicates deciding whether a booking may coexist with others.
pub struct ConflictEngine;

impl ConflictEngine {
    /// Closed-interval overlap. Spans that only touch at an endpoint
    /// (one finishes exactly when the other starts) DO overlap.
    pub fn overlaps(a: &TimeSpan, b: &TimeSpan) -> bool {
        a.starts_at <= b.finishes_at && b.starts_at <= a.finishes_at
    }

    /// First dimension two reservations have in common, checked in
    /// doctor, patient, room order.
    pub fn shared_dimension(a: &impl Reservation, b: &impl Reservation) -> Option<Dimension> {
        if a.doctor() == b.doctor() {
            Some(Dimension::Doctor)
        } else if a.patient() == b.patient() {
            Some(Dimension::Patient)
        } else if a.room() == b.room() {
            Some(Dimension::Room)
        } else {
            None
        }
    }

    /// True when the two reservations contend for at least one resource.
    pub fn shares(a: &impl Reservation, b: &impl Reservation) -> bool {
        Self::shared_dimension(a, b).is_some()
    }

    /// Linear scan for the first admitted booking that shares a resource with
    /// `candidate` and overlaps it in time.
    ///
    /// No identity exclusion happens here: a caller re-checking a booking that
    /// is already stored must filter it out of `existing` first.
    pub fn find_conflict<'a>(candidate: &impl Reservation, existing: &'a [Booking]) -> Option<&'a Booking> {
        existing
            .iter()
            .find(|e| Self::shares(candidate, *e) && Self::overlaps(candidate.span(), &e.span))
    }

    pub fn conflicts(candidate: &impl Reservation, existing: &[Booking]) -> bool {
        Self::find_conflict(candidate, existing).is_some()
    }

    /// Like [`find_conflict`](Self::find_conflict) but explains the collision.
    pub fn check(candidate: &impl Reservation, existing: &[Booking]) -> ConflictResult {
        let Some(hit) = Self::find_conflict(candidate, existing) else {
            return ConflictResult::Ok;
        };
        // find_conflict only returns bookings that share something
        let dimension = Self::shared_dimension(candidate, hit).unwrap_or(Dimension::Room);
        ConflictResult::Conflict {
            with: hit.id,
            dimension,
            reason: format!(
                "{} already booked by booking {} from {} to {}",
                dimension, hit.id, hit.span.starts_at, hit.span.finishes_at
            ),
        }
    }
}
