use chrono::NaiveDateTime;
use thiserror::Error;

use crate::types::BookingId;

/// Failures raised by a storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store lock poisoned")]
    LockPoisoned,
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Why a proposed booking was not admitted
#[derive(Error, Debug)]
pub enum AdmissionError {
    #[error("invalid range: booking starts and finishes at {at}")]
    InvalidRange { at: NaiveDateTime },
    #[error("resource conflict with booking {conflicting}")]
    ResourceConflict { conflicting: BookingId },
    #[error(transparent)]
    Store(#[from] StoreError),
}
