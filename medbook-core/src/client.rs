//! High-level client that wraps the admission gate + pluggable storage.
//! The HTTP server and the CLI delegate to this.

use std::sync::{Mutex, MutexGuard};

use crate::error::{AdmissionError, StoreError};
use crate::infrastructure::ClinicStore;
use crate::infrastructure_in_memory::InMemoryStore;
use crate::types::*;

/// The main entry point for using medbook. Owns one store and serializes
/// every admission through a single lock, so the scan and the insert of one
/// proposal can never interleave with another's.
///
/// Methods take `&self`; share the client between tasks with an `Arc`.
pub struct BookingClient {
    store: Mutex<Box<dyn ClinicStore + Send>>,
}

impl BookingClient {
    /// Create a new BookingClient with an empty in-memory store.
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::new())
    }

    pub fn with_store(store: impl ClinicStore + Send + 'static) -> Self {
        Self {
            store: Mutex::new(Box::new(store)),
        }
    }

    /// Create a new BookingClient backed by SQLite at the given path.
    /// Bookings persist across server restarts.
    #[cfg(feature = "sqlite")]
    pub fn with_sqlite(path: &str) -> Result<Self, StoreError> {
        let store = crate::infrastructure_sqlite::SqliteStore::open(path)?;
        Ok(Self::with_store(store))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Box<dyn ClinicStore + Send>>, StoreError> {
        self.store.lock().map_err(|_| StoreError::LockPoisoned)
    }

    // ─── Bookings ───────────────────────────────────────────────────────────

    /// Admit a single booking and return it with its identity.
    pub fn admit(&self, candidate: NewBooking) -> Result<Booking, AdmissionError> {
        let mut store = self.lock()?;
        store.admit(candidate)
    }

    /// Admit a booking and return every booking now on record, which is what
    /// the HTTP boundary answers with.
    ///
    /// The admission is final once the gate passes. If reading the list back
    /// fails, the booking stays on record and the error is logged with its id.
    pub fn propose(&self, candidate: NewBooking) -> Result<Vec<Booking>, AdmissionError> {
        let mut store = self.lock()?;
        let booking = store.admit(candidate)?;
        tracing::info!(
            booking_id = %booking.id,
            doctor_id = %booking.doctor_id,
            patient_id = %booking.patient_id,
            room = %booking.room_name,
            "Booking admitted"
        );
        store.list_all().map_err(|e| {
            tracing::warn!(booking_id = %booking.id, error = %e, "Booking admitted but listing failed");
            AdmissionError::Store(e)
        })
    }

    pub fn list_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        self.lock()?.list_all()
    }

    pub fn get_booking(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        self.lock()?.find_by_id(id)
    }

    pub fn cancel_booking(&self, id: BookingId) -> Result<(), StoreError> {
        self.lock()?.delete_by_id(id)
    }

    pub fn clear_bookings(&self) -> Result<(), StoreError> {
        self.lock()?.delete_all()
    }

    // ─── Directory ──────────────────────────────────────────────────────────

    pub fn register_person(&self, role: PersonRole, person: NewPerson) -> Result<Person, StoreError> {
        self.lock()?.insert_person(role, person)
    }

    pub fn list_people(&self, role: PersonRole) -> Result<Vec<Person>, StoreError> {
        self.lock()?.list_people(role)
    }

    pub fn get_person(&self, role: PersonRole, id: u64) -> Result<Option<Person>, StoreError> {
        self.lock()?.find_person(role, id)
    }

    pub fn remove_person(&self, role: PersonRole, id: u64) -> Result<(), StoreError> {
        self.lock()?.delete_person(role, id)
    }

    pub fn clear_people(&self, role: PersonRole) -> Result<(), StoreError> {
        self.lock()?.delete_all_people(role)
    }

    pub fn register_room(&self, room: Room) -> Result<Room, StoreError> {
        self.lock()?.upsert_room(room)
    }

    pub fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        self.lock()?.list_rooms()
    }

    pub fn get_room(&self, name: &RoomName) -> Result<Option<Room>, StoreError> {
        self.lock()?.find_room(name)
    }

    pub fn remove_room(&self, name: &RoomName) -> Result<(), StoreError> {
        self.lock()?.delete_room(name)
    }

    pub fn clear_rooms(&self) -> Result<(), StoreError> {
        self.lock()?.delete_all_rooms()
    }
}

impl Default for BookingClient {
    fn default() -> Self {
        Self::new()
    }
}
