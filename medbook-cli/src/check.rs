use serde::{Deserialize, Serialize};

use medbook_core::conflict::{ConflictEngine, ConflictResult};
use medbook_core::types::{Booking, BookingId, NewBooking};

/// Offline input for `medbook check`: a proposal plus the bookings to test
/// it against.
#[derive(Deserialize)]
pub struct CheckRequest {
    pub candidate: NewBooking,
    #[serde(default)]
    pub existing: Vec<Booking>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CheckVerdict {
    pub admissible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_booking: Option<BookingId>,
}

/// Same decision the admission gate makes, without a store.
pub fn check(req: &CheckRequest) -> CheckVerdict {
    if req.candidate.span.is_zero_length() {
        return CheckVerdict {
            admissible: false,
            reason: Some(format!(
                "invalid range: booking starts and finishes at {}",
                req.candidate.span.starts_at
            )),
            conflicting_booking: None,
        };
    }

    match ConflictEngine::check(&req.candidate, &req.existing) {
        ConflictResult::Ok => CheckVerdict {
            admissible: true,
            reason: None,
            conflicting_booking: None,
        },
        ConflictResult::Conflict { with, reason, .. } => CheckVerdict {
            admissible: false,
            reason: Some(reason),
            conflicting_booking: Some(with),
        },
    }
}

pub fn check_json(input: &str) -> Result<CheckVerdict, serde_json::Error> {
    let req: CheckRequest = serde_json::from_str(input)?;
    Ok(check(&req))
}
