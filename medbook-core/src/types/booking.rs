use serde::{Deserialize, Serialize};

use super::{BookingId, DoctorId, PatientId, RoomName, TimeSpan};

/// A booking proposal that has not been admitted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub room_name: RoomName,
    #[serde(flatten)]
    pub span: TimeSpan,
}

impl NewBooking {
    pub fn new(patient_id: PatientId, doctor_id: DoctorId, room_name: RoomName, span: TimeSpan) -> Self {
        Self {
            patient_id,
            doctor_id,
            room_name,
            span,
        }
    }

    /// Attach the identity the store assigned on insertion.
    pub fn with_id(self, id: BookingId) -> Booking {
        Booking {
            id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            room_name: self.room_name,
            span: self.span,
        }
    }
}

/// An admitted booking. Never mutated after admission; a correction is a
/// delete followed by a fresh proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub room_name: RoomName,
    #[serde(flatten)]
    pub span: TimeSpan,
}

/// Anything that occupies a doctor, a patient and a room for a span of time.
///
/// Lets the conflict engine treat proposals and admitted bookings alike.
pub trait Reservation {
    fn doctor(&self) -> DoctorId;
    fn patient(&self) -> PatientId;
    fn room(&self) -> &RoomName;
    fn span(&self) -> &TimeSpan;
}

impl Reservation for NewBooking {
    fn doctor(&self) -> DoctorId {
        self.doctor_id
    }
    fn patient(&self) -> PatientId {
        self.patient_id
    }
    fn room(&self) -> &RoomName {
        &self.room_name
    }
    fn span(&self) -> &TimeSpan {
        &self.span
    }
}

impl Reservation for Booking {
    fn doctor(&self) -> DoctorId {
        self.doctor_id
    }
    fn patient(&self) -> PatientId {
        self.patient_id
    }
    fn room(&self) -> &RoomName {
        &self.room_name
    }
    fn span(&self) -> &TimeSpan {
        &self.span
    }
}
