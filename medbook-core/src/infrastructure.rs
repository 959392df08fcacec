use crate::error::{AdmissionError, StoreError};
use crate::types::{Booking, BookingId, NewBooking, NewPerson, Person, PersonRole, Room, RoomName};

/// Defines the contract for booking storage backends.
///
/// `list_all` hands out a point-in-time snapshot. Nothing keeps it in sync
/// with later writes, so callers that decide on it must hold `&mut self`
/// (or a transaction) until they have written.
pub trait BookingStore {
    fn list_all(&self) -> Result<Vec<Booking>, StoreError>;

    /// Persist a booking, assigning its identity
    fn insert(&mut self, booking: NewBooking) -> Result<Booking, StoreError>;

    fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, StoreError>;

    /// Fails with `StoreError::NotFound` when nothing was removed
    fn delete_by_id(&mut self, id: BookingId) -> Result<(), StoreError>;

    fn delete_all(&mut self) -> Result<(), StoreError>;

    /// Run the admission gate against this store.
    ///
    /// Backends shared between processes override this to wrap the
    /// scan-and-insert in a transaction.
    fn admit(&mut self, candidate: NewBooking) -> Result<Booking, AdmissionError> {
        crate::admission::admit(candidate, self)
    }
}

/// Doctor, patient and room records.
pub trait DirectoryStore {
    fn insert_person(&mut self, role: PersonRole, person: NewPerson) -> Result<Person, StoreError>;

    fn list_people(&self, role: PersonRole) -> Result<Vec<Person>, StoreError>;

    fn find_person(&self, role: PersonRole, id: u64) -> Result<Option<Person>, StoreError>;

    fn delete_person(&mut self, role: PersonRole, id: u64) -> Result<(), StoreError>;

    fn delete_all_people(&mut self, role: PersonRole) -> Result<(), StoreError>;

    /// Insert or replace the room with this name
    fn upsert_room(&mut self, room: Room) -> Result<Room, StoreError>;

    fn list_rooms(&self) -> Result<Vec<Room>, StoreError>;

    fn find_room(&self, name: &RoomName) -> Result<Option<Room>, StoreError>;

    fn delete_room(&mut self, name: &RoomName) -> Result<(), StoreError>;

    fn delete_all_rooms(&mut self) -> Result<(), StoreError>;
}

/// Everything the client needs from one backend.
pub trait ClinicStore: BookingStore + DirectoryStore {}

impl<T: BookingStore + DirectoryStore> ClinicStore for T {}
