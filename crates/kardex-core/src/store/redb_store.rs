//! # redb-backed Record Store
//!
//! A disk-backed implementation of `RecordStore` using the redb embedded
//! database:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! Values are postcard-encoded records; keys are the record identifiers,
//! with (enrollment, component) and (enrollment, session) tuples for the
//! pair-keyed tables. The single-writer transaction model is also what
//! serializes enrollment finalization per identifier.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::store::RecordStore;
use crate::{
    AcademicError, AttendanceRecord, Catalog, Enrollment, EnrollmentId, Grade, StudentId,
};

/// Table for the catalog snapshot: fixed key -> serialized Catalog bytes.
const CATALOG: TableDefinition<&str, &[u8]> = TableDefinition::new("catalog");

/// Table for enrollments: EnrollmentId(u32) -> serialized Enrollment bytes.
const ENROLLMENTS: TableDefinition<u32, &[u8]> = TableDefinition::new("enrollments");

/// Table for grades: (enrollment_id, component_id) -> serialized Grade bytes.
const GRADES: TableDefinition<(u32, u32), &[u8]> = TableDefinition::new("grades");

/// Table for attendance: (enrollment_id, session_id) -> serialized bytes.
const ATTENDANCE: TableDefinition<(u32, u32), &[u8]> = TableDefinition::new("attendance");

/// Table for metadata: key string -> value u64.
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

/// Key of the catalog snapshot inside `CATALOG`.
const CATALOG_KEY: &str = "snapshot";

/// Key of the enrollment id counter inside `METADATA`.
const NEXT_ENROLLMENT_KEY: &str = "next_enrollment_id";

fn io_err(e: impl std::fmt::Display) -> AcademicError {
    AcademicError::IoError(e.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, AcademicError> {
    postcard::to_stdvec(value).map_err(|e| AcademicError::SerializationError(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AcademicError> {
    postcard::from_bytes(bytes).map_err(|e| AcademicError::SerializationError(e.to_string()))
}

/// A disk-backed record store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
    /// Cached enrollment id counter, persisted in `METADATA` on allocation.
    next_enrollment_id: u32,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("next_enrollment_id", &self.next_enrollment_id)
            .finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a record database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AcademicError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(CATALOG).map_err(io_err)?;
            let _ = write_txn.open_table(ENROLLMENTS).map_err(io_err)?;
            let _ = write_txn.open_table(GRADES).map_err(io_err)?;
            let _ = write_txn.open_table(ATTENDANCE).map_err(io_err)?;
            let _ = write_txn.open_table(METADATA).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        // Load the id counter
        let read_txn = db.begin_read().map_err(io_err)?;
        let next_enrollment_id = {
            let table = read_txn.open_table(METADATA).map_err(io_err)?;
            table
                .get(NEXT_ENROLLMENT_KEY)
                .map_err(io_err)?
                .map(|v| v.value())
                .unwrap_or(0) as u32
        };

        Ok(Self {
            db,
            next_enrollment_id,
        })
    }

    /// Compact the database (optional maintenance).
    pub fn compact(&mut self) -> Result<(), AcademicError> {
        self.db.compact().map_err(io_err)?;
        Ok(())
    }
}

impl RecordStore for RedbStore {
    fn put_catalog(&mut self, catalog: &Catalog) -> Result<(), AcademicError> {
        let bytes = encode(catalog)?;
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(CATALOG).map_err(io_err)?;
            table
                .insert(CATALOG_KEY, bytes.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    fn catalog(&self) -> Result<Option<Catalog>, AcademicError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(CATALOG).map_err(io_err)?;
        match table.get(CATALOG_KEY).map_err(io_err)? {
            Some(guard) => Ok(Some(decode(guard.value())?)),
            None => Ok(None),
        }
    }

    fn next_enrollment_id(&mut self) -> Result<EnrollmentId, AcademicError> {
        let next = self.next_enrollment_id.saturating_add(1);

        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(METADATA).map_err(io_err)?;
            table
                .insert(NEXT_ENROLLMENT_KEY, u64::from(next))
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;

        self.next_enrollment_id = next;
        Ok(EnrollmentId(next))
    }

    fn put_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), AcademicError> {
        let bytes = encode(enrollment)?;
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(ENROLLMENTS).map_err(io_err)?;
            table
                .insert(enrollment.id.0, bytes.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    fn enrollment(&self, id: EnrollmentId) -> Result<Option<Enrollment>, AcademicError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(ENROLLMENTS).map_err(io_err)?;
        match table.get(id.0).map_err(io_err)? {
            Some(guard) => Ok(Some(decode(guard.value())?)),
            None => Ok(None),
        }
    }

    fn enrollments(&self) -> Result<Vec<Enrollment>, AcademicError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(ENROLLMENTS).map_err(io_err)?;
        let mut records = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (_, guard) = entry.map_err(io_err)?;
            records.push(decode(guard.value())?);
        }
        Ok(records)
    }

    fn enrollments_of_student(
        &self,
        student: &StudentId,
    ) -> Result<Vec<Enrollment>, AcademicError> {
        let mut records = self.enrollments()?;
        records.retain(|e: &Enrollment| &e.student == student);
        Ok(records)
    }

    fn put_grade(&mut self, grade: &Grade) -> Result<(), AcademicError> {
        let bytes = encode(grade)?;
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(GRADES).map_err(io_err)?;
            table
                .insert((grade.enrollment.0, grade.component.0), bytes.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    fn grades_of_enrollment(
        &self,
        enrollment: EnrollmentId,
    ) -> Result<Vec<Grade>, AcademicError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(GRADES).map_err(io_err)?;
        let mut records = Vec::new();
        let range = (enrollment.0, 0u32)..=(enrollment.0, u32::MAX);
        for entry in table.range(range).map_err(io_err)? {
            let (_, guard) = entry.map_err(io_err)?;
            records.push(decode(guard.value())?);
        }
        Ok(records)
    }

    fn put_attendance(&mut self, record: &AttendanceRecord) -> Result<(), AcademicError> {
        let bytes = encode(record)?;
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(ATTENDANCE).map_err(io_err)?;
            table
                .insert((record.enrollment.0, record.session.0), bytes.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    fn attendance_of_enrollment(
        &self,
        enrollment: EnrollmentId,
    ) -> Result<Vec<AttendanceRecord>, AcademicError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(ATTENDANCE).map_err(io_err)?;
        let mut records = Vec::new();
        let range = (enrollment.0, 0u32)..=(enrollment.0, u32::MAX);
        for entry in table.range(range).map_err(io_err)? {
            let (_, guard) = entry.map_err(io_err)?;
            records.push(decode(guard.value())?);
        }
        Ok(records)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttendanceStatus, ClassSessionId, ComponentId, CourseId, GradeValue};
    use chrono::{NaiveDate, NaiveDateTime};

    fn temp_store() -> (tempfile::TempDir, RedbStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RedbStore::open(dir.path().join("kardex.redb")).expect("open");
        (dir, store)
    }

    fn enrollment(id: u32, student: &str) -> Enrollment {
        Enrollment::new(
            EnrollmentId(id),
            StudentId::new(student),
            CourseId(1),
            NaiveDate::default(),
        )
    }

    #[test]
    fn enrollment_roundtrip() {
        let (_dir, mut store) = temp_store();
        let record = enrollment(1, "s-1");

        store.put_enrollment(&record).expect("put");
        assert_eq!(
            store.enrollment(EnrollmentId(1)).expect("get"),
            Some(record)
        );
        assert_eq!(store.enrollment(EnrollmentId(9)).expect("get"), None);
    }

    #[test]
    fn id_counter_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("kardex.redb");

        let first = {
            let mut store = RedbStore::open(&path).expect("open");
            store.next_enrollment_id().expect("next")
        };

        let mut store = RedbStore::open(&path).expect("reopen");
        let second = store.next_enrollment_id().expect("next");
        assert!(second > first, "reopened counter must not reuse ids");
    }

    #[test]
    fn grade_upsert_by_pair() {
        let (_dir, mut store) = temp_store();
        let mut grade = Grade {
            enrollment: EnrollmentId(1),
            component: ComponentId(3),
            value: GradeValue::from_centi(250),
            published: false,
            recorded_by: "prof".to_string(),
            recorded_at: NaiveDateTime::default(),
        };
        store.put_grade(&grade).expect("put");

        grade.value = GradeValue::from_centi(420);
        store.put_grade(&grade).expect("replace");

        let grades = store.grades_of_enrollment(EnrollmentId(1)).expect("get");
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].value, GradeValue::from_centi(420));
    }

    #[test]
    fn grades_range_isolated_per_enrollment() {
        let (_dir, mut store) = temp_store();
        for (e, c) in [(1u32, 1u32), (1, 2), (2, 1)] {
            let grade = Grade {
                enrollment: EnrollmentId(e),
                component: ComponentId(c),
                value: GradeValue::from_centi(300),
                published: false,
                recorded_by: "prof".to_string(),
                recorded_at: NaiveDateTime::default(),
            };
            store.put_grade(&grade).expect("put");
        }

        assert_eq!(
            store.grades_of_enrollment(EnrollmentId(1)).expect("get").len(),
            2
        );
        assert_eq!(
            store.grades_of_enrollment(EnrollmentId(2)).expect("get").len(),
            1
        );
    }

    #[test]
    fn attendance_roundtrip() {
        let (_dir, mut store) = temp_store();
        let record = AttendanceRecord {
            enrollment: EnrollmentId(1),
            session: ClassSessionId(2),
            status: AttendanceStatus::Late,
            recorded_by: "prof".to_string(),
        };
        store.put_attendance(&record).expect("put");

        let records = store
            .attendance_of_enrollment(EnrollmentId(1))
            .expect("get");
        assert_eq!(records, vec![record]);
    }

    #[test]
    fn catalog_roundtrip() {
        let (_dir, mut store) = temp_store();
        assert!(store.catalog().expect("get").is_none());

        let catalog = Catalog::default();
        store.put_catalog(&catalog).expect("put");
        assert_eq!(store.catalog().expect("get"), Some(catalog));
    }

    #[test]
    fn student_filter() {
        let (_dir, mut store) = temp_store();
        store.put_enrollment(&enrollment(1, "s-1")).expect("put");
        store.put_enrollment(&enrollment(2, "s-2")).expect("put");

        let mine = store
            .enrollments_of_student(&StudentId::new("s-2"))
            .expect("get");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, EnrollmentId(2));
    }
}
