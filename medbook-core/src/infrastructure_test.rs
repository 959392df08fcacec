#[cfg(test)]
mod tests {
    use crate::error::AdmissionError;
    use crate::infrastructure::{BookingStore, ClinicStore};
    use crate::infrastructure_in_memory::InMemoryStore;
    use crate::types::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 10, 16)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn proposal(doctor: u64, patient: u64, room: &str) -> NewBooking {
        NewBooking::new(
            PatientId(patient),
            DoctorId(doctor),
            RoomName::new(room),
            TimeSpan::new(at(19, 30), at(20, 0)),
        )
    }

    // Shared contract checks, run against every backend below.

    fn check_booking_crud(store: &mut impl ClinicStore) {
        let a = store.insert(proposal(1, 1, "Room 1")).unwrap();
        let b = store.insert(proposal(2, 2, "Room 2")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_all().unwrap(), vec![a.clone(), b.clone()]);
        assert_eq!(store.find_by_id(a.id).unwrap(), Some(a.clone()));

        store.delete_by_id(a.id).unwrap();
        assert!(store.find_by_id(a.id).unwrap().is_none());
        assert!(store.delete_by_id(a.id).unwrap_err().is_not_found());

        store.delete_all().unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }

    fn check_ids_are_not_reused(store: &mut impl ClinicStore) {
        let a = store.insert(proposal(1, 1, "Room 1")).unwrap();
        store.delete_by_id(a.id).unwrap();
        let b = store.insert(proposal(1, 1, "Room 1")).unwrap();
        assert!(b.id > a.id);
    }

    fn check_people(store: &mut impl ClinicStore) {
        let d = store
            .insert_person(PersonRole::Doctor, NewPerson::new("Gisselle", "Montenegro", 30, "gisselle@gmail.com"))
            .unwrap();
        let p = store
            .insert_person(PersonRole::Patient, NewPerson::new("Guillermo", "Santisteban", 30, "guillermosg28@gmail.com"))
            .unwrap();

        assert_eq!(d.first_name, "Gisselle");
        assert_eq!(d.age, 30);
        assert_eq!(p.email, "guillermosg28@gmail.com");

        // Doctors and patients live in separate directories
        assert_eq!(store.list_people(PersonRole::Doctor).unwrap(), vec![d.clone()]);
        assert_eq!(store.list_people(PersonRole::Patient).unwrap(), vec![p.clone()]);

        store.delete_all_people(PersonRole::Doctor).unwrap();
        assert!(store.list_people(PersonRole::Doctor).unwrap().is_empty());
        assert_eq!(store.find_person(PersonRole::Patient, p.id).unwrap(), Some(p.clone()));

        store.delete_person(PersonRole::Patient, p.id).unwrap();
        assert!(store.delete_person(PersonRole::Patient, p.id).unwrap_err().is_not_found());
    }

    fn check_rooms(store: &mut impl ClinicStore) {
        store.upsert_room(Room::new("Sala 01")).unwrap();
        store.upsert_room(Room::new("Sala 01")).unwrap();
        store.upsert_room(Room::new("Sala 02")).unwrap();
        assert_eq!(store.list_rooms().unwrap(), vec![Room::new("Sala 01"), Room::new("Sala 02")]);

        let name = RoomName::new("Sala 01");
        assert_eq!(store.find_room(&name).unwrap(), Some(Room::new("Sala 01")));
        store.delete_room(&name).unwrap();
        assert!(store.find_room(&name).unwrap().is_none());
        assert!(store.delete_room(&name).unwrap_err().is_not_found());
    }

    fn check_admit_leaves_store_unchanged_on_rejection(store: &mut impl ClinicStore) {
        let a = store.admit(proposal(1, 1, "Room 1")).unwrap();
        assert!(matches!(
            store.admit(proposal(2, 2, "Room 1")),
            Err(AdmissionError::ResourceConflict { conflicting }) if conflicting == a.id
        ));
        assert_eq!(store.list_all().unwrap(), vec![a]);
    }

    fn check_full_key_range(store: &mut impl ClinicStore) {
        let a = store.admit(proposal(u64::MAX, u64::MAX, "Room 1")).unwrap();
        assert_eq!(a.doctor_id, DoctorId(u64::MAX));
        assert_eq!(store.list_all().unwrap(), vec![a.clone()]);

        // The largest keys still take part in conflict detection
        assert!(matches!(
            store.admit(proposal(u64::MAX, 2, "Room 2")),
            Err(AdmissionError::ResourceConflict { conflicting }) if conflicting == a.id
        ));
        assert!(matches!(
            store.admit(proposal(2, u64::MAX, "Room 2")),
            Err(AdmissionError::ResourceConflict { .. })
        ));

        // Unknown large ids are simply absent
        assert!(store.find_by_id(BookingId(u64::MAX)).unwrap().is_none());
        assert!(store.delete_by_id(BookingId(u64::MAX)).unwrap_err().is_not_found());
        assert!(store.find_person(PersonRole::Doctor, u64::MAX).unwrap().is_none());
        assert!(store.delete_person(PersonRole::Patient, u64::MAX).unwrap_err().is_not_found());
    }

    #[test]
    fn in_memory_booking_crud() {
        check_booking_crud(&mut InMemoryStore::new());
    }

    #[test]
    fn in_memory_ids_are_not_reused() {
        check_ids_are_not_reused(&mut InMemoryStore::new());
    }

    #[test]
    fn in_memory_people() {
        check_people(&mut InMemoryStore::new());
    }

    #[test]
    fn in_memory_rooms() {
        check_rooms(&mut InMemoryStore::new());
    }

    #[test]
    fn in_memory_admit_rejection() {
        check_admit_leaves_store_unchanged_on_rejection(&mut InMemoryStore::new());
    }

    #[test]
    fn in_memory_full_key_range() {
        check_full_key_range(&mut InMemoryStore::new());
    }

    #[cfg(feature = "sqlite")]
    mod sqlite {
        use super::*;
        use crate::infrastructure_sqlite::SqliteStore;
        use std::path::{Path, PathBuf};
        use std::sync::Barrier;

        fn store() -> SqliteStore {
            SqliteStore::open_in_memory().unwrap()
        }

        fn temp_db(name: &str) -> PathBuf {
            let path = std::env::temp_dir().join(format!("medbook-{}-{}.db", name, std::process::id()));
            remove_db(&path);
            path
        }

        fn remove_db(path: &Path) {
            let _ = std::fs::remove_file(path);
            let _ = std::fs::remove_file(path.with_extension("db-wal"));
            let _ = std::fs::remove_file(path.with_extension("db-shm"));
        }

        #[test]
        fn sqlite_booking_crud() {
            check_booking_crud(&mut store());
        }

        #[test]
        fn sqlite_ids_are_not_reused() {
            check_ids_are_not_reused(&mut store());
        }

        #[test]
        fn sqlite_people() {
            check_people(&mut store());
        }

        #[test]
        fn sqlite_rooms() {
            check_rooms(&mut store());
        }

        #[test]
        fn sqlite_admit_rejection_rolls_back() {
            let mut store = store();
            check_admit_leaves_store_unchanged_on_rejection(&mut store);
            // A follow-up admission must be able to open its own transaction
            assert!(store.admit(proposal(3, 3, "Room 3")).is_ok());
        }

        #[test]
        fn sqlite_zero_length_rolls_back() {
            let mut store = store();
            let mut candidate = proposal(1, 1, "Room 1");
            candidate.span = TimeSpan::new(at(9, 0), at(9, 0));
            assert!(matches!(store.admit(candidate), Err(AdmissionError::InvalidRange { .. })));
            assert!(store.admit(proposal(1, 1, "Room 1")).is_ok());
        }

        #[test]
        fn sqlite_full_key_range() {
            check_full_key_range(&mut store());
        }

        #[test]
        fn separate_connections_admit_exactly_one_of_two_conflicting() {
            let path = temp_db("race");
            let path_str = path.to_str().unwrap();
            let mut first = SqliteStore::open(path_str).unwrap();
            let mut second = SqliteStore::open(path_str).unwrap();

            for _ in 0..50 {
                first.delete_all().unwrap();

                let barrier = Barrier::new(2);
                let results: Vec<Result<Booking, AdmissionError>> = std::thread::scope(|s| {
                    let handles: Vec<_> = [(&mut first, proposal(1, 1, "R1")), (&mut second, proposal(2, 2, "R1"))]
                        .into_iter()
                        .map(|(store, candidate)| {
                            let barrier = &barrier;
                            s.spawn(move || {
                                barrier.wait();
                                store.admit(candidate)
                            })
                        })
                        .collect();
                    handles.into_iter().map(|h| h.join().unwrap()).collect()
                });

                let accepted = results.iter().filter(|r| r.is_ok()).count();
                let conflicts = results
                    .iter()
                    .filter(|r| matches!(r, Err(AdmissionError::ResourceConflict { .. })))
                    .count();
                assert_eq!((accepted, conflicts), (1, 1));
                assert_eq!(second.list_all().unwrap().len(), 1);
            }

            drop(first);
            drop(second);
            remove_db(&path);
        }

        #[test]
        fn failed_commit_is_rolled_back() {
            let mut store = store();
            // A deferred foreign key violation only surfaces at COMMIT
            store
                .connection()
                .execute_batch(
                    "PRAGMA foreign_keys = ON;
                     CREATE TABLE audited (id INTEGER PRIMARY KEY);
                     CREATE TABLE audit (
                         booking_id INTEGER REFERENCES audited(id) DEFERRABLE INITIALLY DEFERRED
                     );
                     CREATE TRIGGER audit_booking AFTER INSERT ON bookings
                     BEGIN INSERT INTO audit (booking_id) VALUES (NEW.id); END;",
                )
                .unwrap();

            assert!(matches!(
                store.admit(proposal(1, 1, "Room 1")),
                Err(AdmissionError::Store(_))
            ));
            assert!(store.list_all().unwrap().is_empty());

            store.connection().execute_batch("DROP TRIGGER audit_booking").unwrap();
            assert!(store.admit(proposal(1, 1, "Room 1")).is_ok());
        }

        #[test]
        fn sqlite_persists_across_reopen() {
            let path = temp_db("reopen");
            let path_str = path.to_str().unwrap();

            let admitted = {
                let mut store = SqliteStore::open(path_str).unwrap();
                store.admit(proposal(1, 1, "Room 1")).unwrap()
            };

            let store = SqliteStore::open(path_str).unwrap();
            assert_eq!(store.list_all().unwrap(), vec![admitted]);

            drop(store);
            remove_db(&path);
        }
    }
}
