//! SQLite-backed store implementation.
//! Provides persistent bookings and directory records across server restarts.
//!
//! Enable with the `sqlite` feature flag:
//! ```toml
//! medbook-core = { path = "../medbook-core", features = ["sqlite"] }
//! ```

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{AdmissionError, StoreError};
use crate::infrastructure::{BookingStore, DirectoryStore};
use crate::types::*;

/// A persistent store backed by SQLite.
///
/// Uses WAL mode for concurrent read performance. Admission runs inside a
/// `BEGIN IMMEDIATE` transaction, so several processes may share one file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a SQLite database at the given path.
    pub fn open(path: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent read performance
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS bookings (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                patient_id  INTEGER NOT NULL,
                doctor_id   INTEGER NOT NULL,
                room_name   TEXT NOT NULL,
                starts_at   TEXT NOT NULL,
                finishes_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_bookings_room ON bookings(room_name);

            CREATE TABLE IF NOT EXISTS doctors (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name  TEXT NOT NULL,
                age        INTEGER NOT NULL,
                email      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS patients (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name  TEXT NOT NULL,
                age        INTEGER NOT NULL,
                email      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS rooms (
                room_name TEXT PRIMARY KEY
            );",
        )?;

        Ok(Self { conn })
    }

    /// Open a private in-memory database, mostly useful for tests.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::open(":memory:")
    }

    fn people_table(role: PersonRole) -> &'static str {
        match role {
            PersonRole::Doctor => "doctors",
            PersonRole::Patient => "patients",
        }
    }

    /// Row ids above `i64::MAX` cannot exist in SQLite, so lookups with
    /// such a key find nothing instead of failing to bind.
    fn rowid(id: u64) -> Option<i64> {
        i64::try_from(id).ok()
    }

    /// Doctor and patient references are stored bit-for-bit as `i64` so the
    /// whole `u64` key space round-trips.
    fn to_column(key: u64) -> i64 {
        key as i64
    }

    fn from_column(value: i64) -> u64 {
        value as u64
    }

    fn rollback(&self, after: &str) {
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            tracing::warn!(error = %e, after, "Rollback failed");
        }
    }

    /// Raw connection, for tests that need to bend the schema.
    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    fn last_id(&self) -> Result<u64, StoreError> {
        u64::try_from(self.conn.last_insert_rowid())
            .map_err(|_| StoreError::Corrupt("negative rowid".to_string()))
    }

    fn row_to_booking(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
        Ok(Booking {
            id: BookingId(row.get(0)?),
            patient_id: PatientId(Self::from_column(row.get(1)?)),
            doctor_id: DoctorId(Self::from_column(row.get(2)?)),
            room_name: RoomName(row.get(3)?),
            span: TimeSpan::new(row.get(4)?, row.get(5)?),
        })
    }

    fn row_to_person(row: &rusqlite::Row) -> rusqlite::Result<Person> {
        Ok(Person {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            age: row.get(3)?,
            email: row.get(4)?,
        })
    }
}

impl BookingStore for SqliteStore {
    fn list_all(&self) -> Result<Vec<Booking>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, patient_id, doctor_id, room_name, starts_at, finishes_at
             FROM bookings ORDER BY id",
        )?;
        let bookings = stmt
            .query_map([], Self::row_to_booking)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bookings)
    }

    fn insert(&mut self, booking: NewBooking) -> Result<Booking, StoreError> {
        self.conn.execute(
            "INSERT INTO bookings (patient_id, doctor_id, room_name, starts_at, finishes_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                Self::to_column(booking.patient_id.0),
                Self::to_column(booking.doctor_id.0),
                booking.room_name.as_str(),
                booking.span.starts_at,
                booking.span.finishes_at,
            ],
        )?;
        let id = self.last_id()?;
        Ok(booking.with_id(BookingId(id)))
    }

    fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        let Some(rowid) = Self::rowid(id.0) else {
            return Ok(None);
        };
        let booking = self
            .conn
            .query_row(
                "SELECT id, patient_id, doctor_id, room_name, starts_at, finishes_at
                 FROM bookings WHERE id = ?1",
                params![rowid],
                Self::row_to_booking,
            )
            .optional()?;
        Ok(booking)
    }

    fn delete_by_id(&mut self, id: BookingId) -> Result<(), StoreError> {
        let rows = match Self::rowid(id.0) {
            Some(rowid) => self
                .conn
                .execute("DELETE FROM bookings WHERE id = ?1", params![rowid])?,
            None => 0,
        };
        if rows == 0 {
            return Err(StoreError::not_found("booking", id));
        }
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM bookings", [])?;
        Ok(())
    }

    fn admit(&mut self, candidate: NewBooking) -> Result<Booking, AdmissionError> {
        // IMMEDIATE takes the write lock up front, so no other connection can
        // slip an insert between our scan and our insert.
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(StoreError::from)?;

        match crate::admission::admit(candidate, self) {
            Ok(booking) => {
                // A failed COMMIT leaves the transaction open
                if let Err(e) = self.conn.execute_batch("COMMIT") {
                    self.rollback("failed commit");
                    return Err(StoreError::from(e).into());
                }
                Ok(booking)
            }
            Err(e) => {
                self.rollback("rejected admission");
                Err(e)
            }
        }
    }
}

impl DirectoryStore for SqliteStore {
    fn insert_person(&mut self, role: PersonRole, person: NewPerson) -> Result<Person, StoreError> {
        let sql = format!(
            "INSERT INTO {} (first_name, last_name, age, email) VALUES (?1, ?2, ?3, ?4)",
            Self::people_table(role)
        );
        self.conn.execute(
            &sql,
            params![person.first_name, person.last_name, person.age, person.email],
        )?;
        let id = self.last_id()?;
        Ok(person.with_id(id))
    }

    fn list_people(&self, role: PersonRole) -> Result<Vec<Person>, StoreError> {
        let sql = format!(
            "SELECT id, first_name, last_name, age, email FROM {} ORDER BY id",
            Self::people_table(role)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let people = stmt
            .query_map([], Self::row_to_person)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(people)
    }

    fn find_person(&self, role: PersonRole, id: u64) -> Result<Option<Person>, StoreError> {
        let Some(rowid) = Self::rowid(id) else {
            return Ok(None);
        };
        let sql = format!(
            "SELECT id, first_name, last_name, age, email FROM {} WHERE id = ?1",
            Self::people_table(role)
        );
        let person = self
            .conn
            .query_row(&sql, params![rowid], Self::row_to_person)
            .optional()?;
        Ok(person)
    }

    fn delete_person(&mut self, role: PersonRole, id: u64) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", Self::people_table(role));
        let rows = match Self::rowid(id) {
            Some(rowid) => self.conn.execute(&sql, params![rowid])?,
            None => 0,
        };
        if rows == 0 {
            return Err(StoreError::not_found(role.as_str(), id));
        }
        Ok(())
    }

    fn delete_all_people(&mut self, role: PersonRole) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {}", Self::people_table(role));
        self.conn.execute(&sql, [])?;
        Ok(())
    }

    fn upsert_room(&mut self, room: Room) -> Result<Room, StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO rooms (room_name) VALUES (?1)",
            params![room.room_name.as_str()],
        )?;
        Ok(room)
    }

    fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT room_name FROM rooms ORDER BY room_name")?;
        let rooms = stmt
            .query_map([], |row| Ok(Room::new(row.get::<_, String>(0)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rooms)
    }

    fn find_room(&self, name: &RoomName) -> Result<Option<Room>, StoreError> {
        let room = self
            .conn
            .query_row(
                "SELECT room_name FROM rooms WHERE room_name = ?1",
                params![name.as_str()],
                |row| Ok(Room::new(row.get::<_, String>(0)?)),
            )
            .optional()?;
        Ok(room)
    }

    fn delete_room(&mut self, name: &RoomName) -> Result<(), StoreError> {
        let rows = self
            .conn
            .execute("DELETE FROM rooms WHERE room_name = ?1", params![name.as_str()])?;
        if rows == 0 {
            return Err(StoreError::not_found("room", name));
        }
        Ok(())
    }

    fn delete_all_rooms(&mut self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM rooms", [])?;
        Ok(())
    }
}
