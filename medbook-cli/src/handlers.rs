use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use medbook_core::types::{DoctorId, NewBooking, NewPerson, PatientId, Room, RoomName, TimeSpan};

// ─── Validation Helpers ─────────────────────────────────────────────────────

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}

// ─── Request Types ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub room_name: String,
    pub starts_at: NaiveDateTime,
    pub finishes_at: NaiveDateTime,
}

impl CreateBookingRequest {
    pub fn validate(&self) -> Result<(), String> {
        require("room_name", &self.room_name)
    }

    pub fn into_new_booking(self) -> NewBooking {
        NewBooking::new(
            PatientId(self.patient_id),
            DoctorId(self.doctor_id),
            RoomName(self.room_name),
            TimeSpan::new(self.starts_at, self.finishes_at),
        )
    }
}

#[derive(Deserialize)]
pub struct CreatePersonRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
}

impl CreatePersonRequest {
    pub fn validate(&self) -> Result<(), String> {
        require("first_name", &self.first_name)?;
        require("last_name", &self.last_name)?;
        Ok(())
    }

    pub fn into_new_person(self) -> NewPerson {
        NewPerson::new(self.first_name, self.last_name, self.age, self.email)
    }
}

#[derive(Deserialize)]
pub struct CreateRoomRequest {
    pub room_name: String,
}

impl CreateRoomRequest {
    pub fn validate(&self) -> Result<(), String> {
        require("room_name", &self.room_name)
    }

    pub fn into_room(self) -> Room {
        Room::new(self.room_name)
    }
}

// ─── Response Types ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub bookings: usize,
    pub version: String,
}
