use crate::conflict::{ConflictEngine, ConflictResult};
use crate::error::AdmissionError;
use crate::infrastructure::BookingStore;
use crate::types::{Booking, NewBooking};

/// Admission gate: shape check, conflict scan, then insert.
///
/// Taking the store by `&mut` keeps the scan and the insert inside one
/// exclusive borrow. Callers sharing a store across threads must hold their
/// lock across the whole call.
pub fn admit<S: BookingStore + ?Sized>(candidate: NewBooking, store: &mut S) -> Result<Booking, AdmissionError> {
    if candidate.span.is_zero_length() {
        tracing::debug!(at = %candidate.span.starts_at, "Rejected zero-length booking");
        return Err(AdmissionError::InvalidRange {
            at: candidate.span.starts_at,
        });
    }

    let existing = store.list_all()?;
    if let ConflictResult::Conflict { with, reason, .. } = ConflictEngine::check(&candidate, &existing) {
        tracing::debug!(conflicting = %with, %reason, "Rejected conflicting booking");
        return Err(AdmissionError::ResourceConflict { conflicting: with });
    }

    let booking = store.insert(candidate)?;
    tracing::debug!(booking_id = %booking.id, room = %booking.room_name, "Booking admitted");
    Ok(booking)
}
