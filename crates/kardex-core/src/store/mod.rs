//! # Record Store
//!
//! The key-value persistence collaborator: create/read/update/delete by
//! identifier, nothing more. The engine never sees the store (it consumes
//! plain snapshots); the Registrar workflow reads and writes records
//! through the `RecordStore` trait.
//!
//! Two backends implement the trait uniformly:
//! - `MemoryStore` (this module): volatile, for tests and dry runs
//! - [`RedbStore`](crate::store::redb_store::RedbStore): disk-backed ACID

pub mod redb_store;

pub use redb_store::RedbStore;

use std::collections::BTreeMap;

use crate::{
    AcademicError, AttendanceRecord, Catalog, ClassSessionId, ComponentId, Enrollment,
    EnrollmentId, Grade, StudentId,
};

// =============================================================================
// RECORDSTORE TRAIT
// =============================================================================

/// CRUD-by-identifier record persistence.
///
/// Grades are keyed by (enrollment, component) and attendance by
/// (enrollment, session); `put_*` on an existing key replaces the record,
/// which is what keeps the at-most-one-per-pair invariants keyed storage
/// rather than append-only history.
///
/// All fallible operations return `Result<T, AcademicError>` so volatile
/// and persistent backends behave uniformly.
pub trait RecordStore {
    /// Replace the stored catalog snapshot.
    fn put_catalog(&mut self, catalog: &Catalog) -> Result<(), AcademicError>;

    /// Read the stored catalog snapshot, if any.
    fn catalog(&self) -> Result<Option<Catalog>, AcademicError>;

    /// Allocate the next enrollment identifier (monotonic, never reused).
    fn next_enrollment_id(&mut self) -> Result<EnrollmentId, AcademicError>;

    /// Insert or replace an enrollment record.
    fn put_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), AcademicError>;

    /// Read one enrollment by identifier.
    fn enrollment(&self, id: EnrollmentId) -> Result<Option<Enrollment>, AcademicError>;

    /// All enrollments in ascending identifier order.
    fn enrollments(&self) -> Result<Vec<Enrollment>, AcademicError>;

    /// All enrollments of one student, ascending identifier order.
    fn enrollments_of_student(
        &self,
        student: &StudentId,
    ) -> Result<Vec<Enrollment>, AcademicError>;

    /// Insert or replace the grade for one (enrollment, component) pair.
    fn put_grade(&mut self, grade: &Grade) -> Result<(), AcademicError>;

    /// All grades of one enrollment, ascending component order.
    fn grades_of_enrollment(
        &self,
        enrollment: EnrollmentId,
    ) -> Result<Vec<Grade>, AcademicError>;

    /// Insert or replace the attendance record for one
    /// (enrollment, session) pair.
    fn put_attendance(&mut self, record: &AttendanceRecord) -> Result<(), AcademicError>;

    /// All attendance records of one enrollment, ascending session order.
    fn attendance_of_enrollment(
        &self,
        enrollment: EnrollmentId,
    ) -> Result<Vec<AttendanceRecord>, AcademicError>;
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Volatile record store backed by `BTreeMap`s.
///
/// Deterministic iteration order for free; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    catalog: Option<Catalog>,
    enrollments: BTreeMap<EnrollmentId, Enrollment>,
    grades: BTreeMap<(EnrollmentId, ComponentId), Grade>,
    attendance: BTreeMap<(EnrollmentId, ClassSessionId), AttendanceRecord>,
    next_enrollment_id: u32,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn put_catalog(&mut self, catalog: &Catalog) -> Result<(), AcademicError> {
        self.catalog = Some(catalog.clone());
        Ok(())
    }

    fn catalog(&self) -> Result<Option<Catalog>, AcademicError> {
        Ok(self.catalog.clone())
    }

    fn next_enrollment_id(&mut self) -> Result<EnrollmentId, AcademicError> {
        self.next_enrollment_id = self.next_enrollment_id.saturating_add(1);
        Ok(EnrollmentId(self.next_enrollment_id))
    }

    fn put_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), AcademicError> {
        self.enrollments.insert(enrollment.id, enrollment.clone());
        Ok(())
    }

    fn enrollment(&self, id: EnrollmentId) -> Result<Option<Enrollment>, AcademicError> {
        Ok(self.enrollments.get(&id).cloned())
    }

    fn enrollments(&self) -> Result<Vec<Enrollment>, AcademicError> {
        Ok(self.enrollments.values().cloned().collect())
    }

    fn enrollments_of_student(
        &self,
        student: &StudentId,
    ) -> Result<Vec<Enrollment>, AcademicError> {
        Ok(self
            .enrollments
            .values()
            .filter(|e| &e.student == student)
            .cloned()
            .collect())
    }

    fn put_grade(&mut self, grade: &Grade) -> Result<(), AcademicError> {
        self.grades
            .insert((grade.enrollment, grade.component), grade.clone());
        Ok(())
    }

    fn grades_of_enrollment(
        &self,
        enrollment: EnrollmentId,
    ) -> Result<Vec<Grade>, AcademicError> {
        Ok(self
            .grades
            .range((enrollment, ComponentId(0))..=(enrollment, ComponentId(u32::MAX)))
            .map(|(_, g)| g.clone())
            .collect())
    }

    fn put_attendance(&mut self, record: &AttendanceRecord) -> Result<(), AcademicError> {
        self.attendance
            .insert((record.enrollment, record.session), record.clone());
        Ok(())
    }

    fn attendance_of_enrollment(
        &self,
        enrollment: EnrollmentId,
    ) -> Result<Vec<AttendanceRecord>, AcademicError> {
        Ok(self
            .attendance
            .range(
                (enrollment, ClassSessionId(0))..=(enrollment, ClassSessionId(u32::MAX)),
            )
            .map(|(_, r)| r.clone())
            .collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttendanceStatus, CourseId, GradeValue};
    use chrono::{NaiveDate, NaiveDateTime};

    fn enrollment(id: u32, student: &str) -> Enrollment {
        Enrollment::new(
            EnrollmentId(id),
            StudentId::new(student),
            CourseId(1),
            NaiveDate::default(),
        )
    }

    fn grade(enrollment: u32, component: u32, centi: u16) -> Grade {
        Grade {
            enrollment: EnrollmentId(enrollment),
            component: ComponentId(component),
            value: GradeValue::from_centi(centi),
            published: false,
            recorded_by: "prof".to_string(),
            recorded_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn enrollment_roundtrip() {
        let mut store = MemoryStore::new();
        let record = enrollment(1, "s-1");

        store.put_enrollment(&record).expect("put");
        assert_eq!(store.enrollment(EnrollmentId(1)).expect("get"), Some(record));
        assert_eq!(store.enrollment(EnrollmentId(2)).expect("get"), None);
    }

    #[test]
    fn next_enrollment_id_is_monotonic() {
        let mut store = MemoryStore::new();
        let first = store.next_enrollment_id().expect("next");
        let second = store.next_enrollment_id().expect("next");
        assert!(second > first);
    }

    #[test]
    fn grades_keyed_by_pair_replace() {
        let mut store = MemoryStore::new();
        store.put_grade(&grade(1, 7, 300)).expect("put");
        store.put_grade(&grade(1, 7, 450)).expect("put again");
        store.put_grade(&grade(1, 8, 200)).expect("put");
        store.put_grade(&grade(2, 7, 100)).expect("put");

        let grades = store.grades_of_enrollment(EnrollmentId(1)).expect("get");
        assert_eq!(grades.len(), 2);
        assert_eq!(grades[0].value, GradeValue::from_centi(450));
        assert_eq!(grades[1].value, GradeValue::from_centi(200));
    }

    #[test]
    fn student_filter() {
        let mut store = MemoryStore::new();
        store.put_enrollment(&enrollment(1, "s-1")).expect("put");
        store.put_enrollment(&enrollment(2, "s-2")).expect("put");
        store.put_enrollment(&enrollment(3, "s-1")).expect("put");

        let mine = store
            .enrollments_of_student(&StudentId::new("s-1"))
            .expect("get");
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, EnrollmentId(1));
        assert_eq!(mine[1].id, EnrollmentId(3));
    }

    #[test]
    fn attendance_keyed_by_pair() {
        let mut store = MemoryStore::new();
        let record = AttendanceRecord {
            enrollment: EnrollmentId(1),
            session: ClassSessionId(4),
            status: AttendanceStatus::Absent,
            recorded_by: "prof".to_string(),
        };
        store.put_attendance(&record).expect("put");

        // Correcting the same session replaces, not appends.
        let corrected = AttendanceRecord {
            status: AttendanceStatus::Excused,
            ..record
        };
        store.put_attendance(&corrected).expect("put again");

        let records = store
            .attendance_of_enrollment(EnrollmentId(1))
            .expect("get");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AttendanceStatus::Excused);
    }

    #[test]
    fn catalog_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.catalog().expect("get").is_none());

        let catalog = Catalog::default();
        store.put_catalog(&catalog).expect("put");
        assert_eq!(store.catalog().expect("get"), Some(catalog));
    }
}
