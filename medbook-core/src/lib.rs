//! # medbook-core
//!
//! The booking kernel for a clinic: doctors, patients and rooms are
//! exclusive resources, and a booking is only admitted when none of the
//! three is already taken for an overlapping span of time.

pub mod admission;
pub mod client;
pub mod conflict;
pub mod error;
pub mod infrastructure;
#[path = "infrastructure_in_memory.rs"]
pub mod infrastructure_in_memory;
#[cfg(feature = "sqlite")]
#[path = "infrastructure_sqlite.rs"]
pub mod infrastructure_sqlite;
pub mod types;

#[cfg(test)]
#[path = "infrastructure_test.rs"]
mod infrastructure_test;
