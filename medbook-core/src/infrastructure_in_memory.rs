use crate::error::StoreError;
use crate::infrastructure::{BookingStore, DirectoryStore};
use crate::types::{Booking, BookingId, NewBooking, NewPerson, Person, PersonRole, Room, RoomName};
use std::collections::BTreeMap;

#[derive(Default)]
pub struct InMemoryStore {
    // Map of Booking ID -> Booking
    bookings: BTreeMap<BookingId, Booking>,
    doctors: BTreeMap<u64, Person>,
    patients: BTreeMap<u64, Person>,
    // Map of room name -> Room
    rooms: BTreeMap<RoomName, Room>,
    // Last assigned id per sequence; ids are never reused
    last_booking_id: u64,
    last_doctor_id: u64,
    last_patient_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn people(&self, role: PersonRole) -> &BTreeMap<u64, Person> {
        match role {
            PersonRole::Doctor => &self.doctors,
            PersonRole::Patient => &self.patients,
        }
    }

    fn people_mut(&mut self, role: PersonRole) -> (&mut BTreeMap<u64, Person>, &mut u64) {
        match role {
            PersonRole::Doctor => (&mut self.doctors, &mut self.last_doctor_id),
            PersonRole::Patient => (&mut self.patients, &mut self.last_patient_id),
        }
    }
}

impl BookingStore for InMemoryStore {
    fn list_all(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.bookings.values().cloned().collect())
    }

    fn insert(&mut self, booking: NewBooking) -> Result<Booking, StoreError> {
        self.last_booking_id += 1;
        let booking = booking.with_id(BookingId(self.last_booking_id));
        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.get(&id).cloned())
    }

    fn delete_by_id(&mut self, id: BookingId) -> Result<(), StoreError> {
        self.bookings
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("booking", id))
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.bookings.clear();
        Ok(())
    }
}

impl DirectoryStore for InMemoryStore {
    fn insert_person(&mut self, role: PersonRole, person: NewPerson) -> Result<Person, StoreError> {
        let (people, last_id) = self.people_mut(role);
        *last_id += 1;
        let person = person.with_id(*last_id);
        people.insert(person.id, person.clone());
        Ok(person)
    }

    fn list_people(&self, role: PersonRole) -> Result<Vec<Person>, StoreError> {
        Ok(self.people(role).values().cloned().collect())
    }

    fn find_person(&self, role: PersonRole, id: u64) -> Result<Option<Person>, StoreError> {
        Ok(self.people(role).get(&id).cloned())
    }

    fn delete_person(&mut self, role: PersonRole, id: u64) -> Result<(), StoreError> {
        let (people, _) = self.people_mut(role);
        people
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(role.as_str(), id))
    }

    fn delete_all_people(&mut self, role: PersonRole) -> Result<(), StoreError> {
        self.people_mut(role).0.clear();
        Ok(())
    }

    fn upsert_room(&mut self, room: Room) -> Result<Room, StoreError> {
        self.rooms.insert(room.room_name.clone(), room.clone());
        Ok(room)
    }

    fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        Ok(self.rooms.values().cloned().collect())
    }

    fn find_room(&self, name: &RoomName) -> Result<Option<Room>, StoreError> {
        Ok(self.rooms.get(name).cloned())
    }

    fn delete_room(&mut self, name: &RoomName) -> Result<(), StoreError> {
        self.rooms
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("room", name))
    }

    fn delete_all_rooms(&mut self) -> Result<(), StoreError> {
        self.rooms.clear();
        Ok(())
    }
}
