use serde::{Deserialize, Serialize};

/// Input for a new doctor or patient record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
}

impl NewPerson {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: u32,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            email: email.into(),
        }
    }

    pub fn with_id(self, id: u64) -> Person {
        Person {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            email: self.email,
        }
    }
}

/// A doctor or patient record. The role is tracked by the directory it
/// lives in, not by the record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
}

/// A consultation room, keyed by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub room_name: super::RoomName,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            room_name: super::RoomName::new(name),
        }
    }
}
