//! # Registrar Module
//!
//! The enrollment workflow layer: joins the validated catalog, the
//! curriculum graph, and a record store behind one facade.
//!
//! The engine itself only computes; the Registrar is the collaborator that
//! invokes it and persists the outcome. It is the single writer per
//! enrollment identifier, which is what serializes the at-most-once
//! finalization transition.
//!
//! ## Storage Backends
//!
//! The Registrar supports two storage backends:
//! - `InMemory`: volatile `MemoryStore` (tests, dry runs)
//! - `Persistent`: `RedbStore` for disk-backed ACID storage

use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;

use crate::attendance::{self, AttendanceSummary};
use crate::catalog::Catalog;
use crate::eligibility::{Eligibility, EligibilityOptions, can_enroll};
use crate::grading::{self, Score};
use crate::graph::CurriculumGraph;
use crate::store::{MemoryStore, RecordStore, RedbStore};
use crate::{
    AcademicError, AttendanceRecord, AttendanceStatus, ClassSessionId, ComponentId, CourseId,
    Enrollment, EnrollmentId, Grade, GradeValue, StudentId, SubjectId,
};

// =============================================================================
// STORE BACKEND
// =============================================================================

/// Storage backend for a Registrar.
#[derive(Debug)]
pub enum StoreBackend {
    /// In-memory records (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed records using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

// NOTE: StoreBackend does NOT implement Clone.
// RedbStore (database handle) cannot be safely cloned.

impl RecordStore for StoreBackend {
    fn put_catalog(&mut self, catalog: &Catalog) -> Result<(), AcademicError> {
        match self {
            Self::InMemory(store) => store.put_catalog(catalog),
            Self::Persistent(store) => store.put_catalog(catalog),
        }
    }

    fn catalog(&self) -> Result<Option<Catalog>, AcademicError> {
        match self {
            Self::InMemory(store) => store.catalog(),
            Self::Persistent(store) => store.catalog(),
        }
    }

    fn next_enrollment_id(&mut self) -> Result<EnrollmentId, AcademicError> {
        match self {
            Self::InMemory(store) => store.next_enrollment_id(),
            Self::Persistent(store) => store.next_enrollment_id(),
        }
    }

    fn put_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), AcademicError> {
        match self {
            Self::InMemory(store) => store.put_enrollment(enrollment),
            Self::Persistent(store) => store.put_enrollment(enrollment),
        }
    }

    fn enrollment(&self, id: EnrollmentId) -> Result<Option<Enrollment>, AcademicError> {
        match self {
            Self::InMemory(store) => store.enrollment(id),
            Self::Persistent(store) => store.enrollment(id),
        }
    }

    fn enrollments(&self) -> Result<Vec<Enrollment>, AcademicError> {
        match self {
            Self::InMemory(store) => store.enrollments(),
            Self::Persistent(store) => store.enrollments(),
        }
    }

    fn enrollments_of_student(
        &self,
        student: &StudentId,
    ) -> Result<Vec<Enrollment>, AcademicError> {
        match self {
            Self::InMemory(store) => store.enrollments_of_student(student),
            Self::Persistent(store) => store.enrollments_of_student(student),
        }
    }

    fn put_grade(&mut self, grade: &Grade) -> Result<(), AcademicError> {
        match self {
            Self::InMemory(store) => store.put_grade(grade),
            Self::Persistent(store) => store.put_grade(grade),
        }
    }

    fn grades_of_enrollment(
        &self,
        enrollment: EnrollmentId,
    ) -> Result<Vec<Grade>, AcademicError> {
        match self {
            Self::InMemory(store) => store.grades_of_enrollment(enrollment),
            Self::Persistent(store) => store.grades_of_enrollment(enrollment),
        }
    }

    fn put_attendance(&mut self, record: &AttendanceRecord) -> Result<(), AcademicError> {
        match self {
            Self::InMemory(store) => store.put_attendance(record),
            Self::Persistent(store) => store.put_attendance(record),
        }
    }

    fn attendance_of_enrollment(
        &self,
        enrollment: EnrollmentId,
    ) -> Result<Vec<AttendanceRecord>, AcademicError> {
        match self {
            Self::InMemory(store) => store.attendance_of_enrollment(enrollment),
            Self::Persistent(store) => store.attendance_of_enrollment(enrollment),
        }
    }
}

// =============================================================================
// REGISTRAR
// =============================================================================

/// The enrollment workflow facade.
///
/// Holds the validated catalog, the graph projection built from it, and
/// the record store. The catalog and graph are rebuilt only by
/// re-initializing; they are read-only between catalog versions.
#[derive(Debug)]
pub struct Registrar {
    backend: StoreBackend,
    catalog: Catalog,
    graph: CurriculumGraph,
}

impl Registrar {
    /// Initialize a backend with a fresh catalog snapshot.
    ///
    /// Validates the catalog in full (this is the load-time gate: cycles
    /// and bad weightings block setup here), persists it, and builds the
    /// graph projection.
    pub fn initialize(mut backend: StoreBackend, catalog: Catalog) -> Result<Self, AcademicError> {
        catalog.validate()?;
        let graph = catalog.build_graph()?;
        backend.put_catalog(&catalog)?;
        Ok(Self {
            backend,
            catalog,
            graph,
        })
    }

    /// Open a backend that already holds a catalog snapshot.
    pub fn open(backend: StoreBackend) -> Result<Self, AcademicError> {
        let catalog = backend.catalog()?.ok_or_else(|| {
            AcademicError::InvalidCatalog("record store holds no catalog snapshot".to_string())
        })?;
        catalog.validate()?;
        let graph = catalog.build_graph()?;
        Ok(Self {
            backend,
            catalog,
            graph,
        })
    }

    /// Open a persistent registrar over a redb database path.
    pub fn open_redb(path: impl AsRef<Path>) -> Result<Self, AcademicError> {
        Self::open(StoreBackend::Persistent(RedbStore::open(path)?))
    }

    /// The validated catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The curriculum graph projection.
    #[must_use]
    pub fn graph(&self) -> &CurriculumGraph {
        &self.graph
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StoreBackend::Persistent(_))
    }

    /// Read access to the record store.
    #[must_use]
    pub fn store(&self) -> &StoreBackend {
        &self.backend
    }

    // =========================================================================
    // ENROLLMENT
    // =========================================================================

    /// Check whether a student may enroll in a subject.
    pub fn eligibility(
        &self,
        student: &StudentId,
        subject: SubjectId,
        options: EligibilityOptions,
    ) -> Result<Eligibility, AcademicError> {
        let history = self.backend.enrollments_of_student(student)?;
        can_enroll(
            student,
            subject,
            &self.graph,
            &self.catalog.courses,
            &history,
            options,
        )
    }

    /// Enroll a student in a course offering.
    ///
    /// Refuses when the course is unknown, the student already has an open
    /// enrollment in it, the course is full, or prerequisites are missing.
    pub fn enroll(
        &mut self,
        student: StudentId,
        course: CourseId,
        on: NaiveDate,
        options: EligibilityOptions,
    ) -> Result<Enrollment, AcademicError> {
        let offering = self
            .catalog
            .course(course)
            .ok_or(AcademicError::CourseNotFound(course))?
            .clone();

        let open_in_course: Vec<Enrollment> = self
            .backend
            .enrollments()?
            .into_iter()
            .filter(|e| e.course == course && e.is_open())
            .collect();
        if open_in_course.iter().any(|e| e.student == student) {
            return Err(AcademicError::DuplicateEnrollment { student, course });
        }
        if open_in_course.len() >= usize::from(offering.max_seats) {
            return Err(AcademicError::CourseFull(course));
        }

        match self.eligibility(&student, offering.subject, options)? {
            Eligibility::Eligible => {}
            Eligibility::Ineligible { missing } => {
                return Err(AcademicError::PrerequisitesNotMet { missing });
            }
        }

        let id = self.backend.next_enrollment_id()?;
        let enrollment = Enrollment::new(id, student, course, on);
        self.backend.put_enrollment(&enrollment)?;
        Ok(enrollment)
    }

    /// Withdraw an open enrollment, recording the date.
    pub fn withdraw(
        &mut self,
        enrollment: EnrollmentId,
        on: NaiveDate,
    ) -> Result<Enrollment, AcademicError> {
        let current = self.load(enrollment)?;
        let updated = grading::withdraw(&current, on)?;
        self.backend.put_enrollment(&updated)?;
        Ok(updated)
    }

    // =========================================================================
    // GRADING
    // =========================================================================

    /// Record (or correct) a component grade for an open enrollment.
    pub fn record_grade(
        &mut self,
        enrollment: EnrollmentId,
        component: ComponentId,
        value: GradeValue,
        recorded_by: &str,
        recorded_at: NaiveDateTime,
    ) -> Result<Grade, AcademicError> {
        let current = self.load(enrollment)?;
        if !current.is_open() {
            return Err(AcademicError::NotEnrolled {
                enrollment,
                status: current.status,
            });
        }

        let plan = self.catalog.evaluation_plan(current.course)?;
        let known = plan
            .cuts
            .iter()
            .flat_map(|cp| cp.components.iter())
            .any(|c| c.id == component);
        if !known {
            return Err(AcademicError::UnknownComponent(component));
        }

        if !value.is_on_scale() {
            return Err(AcademicError::GradeOutOfRange {
                centi: value.centi(),
            });
        }

        let grade = Grade {
            enrollment,
            component,
            value,
            published: false,
            recorded_by: recorded_by.to_string(),
            recorded_at,
        };
        self.backend.put_grade(&grade)?;
        Ok(grade)
    }

    /// Compute the final course grade for an enrollment (no side effects).
    pub fn final_grade(&self, enrollment: EnrollmentId) -> Result<Score, AcademicError> {
        let current = self.load(enrollment)?;
        let plan = self.catalog.evaluation_plan(current.course)?;
        let grades = self.backend.grades_of_enrollment(enrollment)?;
        grading::compute_course_grade(&plan, &grades)
    }

    /// Compute the final grade and finalize the enrollment.
    ///
    /// Requires the course's academic period to have ended by `today`.
    /// Fails with `AlreadyFinalized` on a second call, leaving the stored
    /// status unchanged.
    pub fn close_enrollment(
        &mut self,
        enrollment: EnrollmentId,
        today: NaiveDate,
    ) -> Result<(Enrollment, Score), AcademicError> {
        let current = self.load(enrollment)?;
        let course = self
            .catalog
            .course(current.course)
            .ok_or(AcademicError::CourseNotFound(current.course))?;
        let period = self.catalog.period(course.period).ok_or_else(|| {
            AcademicError::InvalidCatalog(format!(
                "course {} references unknown period {}",
                course.id.0, course.period.0
            ))
        })?;
        if !period.has_ended(today) {
            return Err(AcademicError::PeriodOpen(period.id));
        }

        let score = self.final_grade(enrollment)?;
        let updated = grading::finalize_enrollment(&current, score)?;
        self.backend.put_enrollment(&updated)?;
        Ok((updated, score))
    }

    // =========================================================================
    // ATTENDANCE
    // =========================================================================

    /// Record (or correct) attendance for one class session.
    pub fn record_attendance(
        &mut self,
        enrollment: EnrollmentId,
        session: ClassSessionId,
        status: AttendanceStatus,
        recorded_by: &str,
    ) -> Result<AttendanceRecord, AcademicError> {
        let current = self.load(enrollment)?;
        if !current.is_open() {
            return Err(AcademicError::NotEnrolled {
                enrollment,
                status: current.status,
            });
        }

        let belongs = self
            .catalog
            .session(session)
            .is_some_and(|s| s.course == current.course);
        if !belongs {
            return Err(AcademicError::UnknownSession(session));
        }

        let record = AttendanceRecord {
            enrollment,
            session,
            status,
            recorded_by: recorded_by.to_string(),
        };
        self.backend.put_attendance(&record)?;
        Ok(record)
    }

    /// Summarize the attendance of an enrollment.
    pub fn attendance_summary(
        &self,
        enrollment: EnrollmentId,
    ) -> Result<AttendanceSummary, AcademicError> {
        let _ = self.load(enrollment)?;
        let records = self.backend.attendance_of_enrollment(enrollment)?;
        attendance::summarize(enrollment, &records)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn load(&self, enrollment: EnrollmentId) -> Result<Enrollment, AcademicError> {
        self.backend
            .enrollment(enrollment)?
            .ok_or(AcademicError::EnrollmentNotFound(enrollment))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AcademicPeriod, Component, Course, Cut, CutId, PeriodId, PeriodStatus, Prerequisite,
        Program, ProgramId, ProgramLevel, Subject, SubjectCode, Weight,
    };
    use crate::{ClassSession, grading::Decision};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
    }

    fn subject(id: u32, code: &str) -> Subject {
        Subject {
            id: SubjectId(id),
            program: ProgramId(1),
            code: SubjectCode::new(code),
            name: code.to_string(),
            credits: 3,
            weekly_hours: 4,
            active: true,
        }
    }

    /// BD101 (course 10, full four-cut layout) and BD201 (course 11,
    /// requires BD101), both in period 1 which ends 2025-12-15.
    fn sample_catalog() -> Catalog {
        let cut = |id: u32, course: u32, code: &str, percent: u32| Cut {
            id: CutId(id),
            course: CourseId(course),
            code: code.to_string(),
            weight: Weight::from_percent(percent),
        };
        let full_component = |id: u32, cut: u32| Component {
            id: ComponentId(id),
            cut: CutId(cut),
            name: format!("Nota {id}"),
            weight: Weight::from_percent(100),
            description: None,
        };

        Catalog {
            programs: vec![Program {
                id: ProgramId(1),
                name: "Ingenieria de Sistemas".to_string(),
                level: ProgramLevel::Professional,
                semesters: 10,
                active: true,
            }],
            subjects: vec![subject(1, "BD101"), subject(2, "BD201")],
            prerequisites: vec![Prerequisite {
                subject: SubjectId(2),
                requires: SubjectId(1),
            }],
            periods: vec![AcademicPeriod {
                id: PeriodId(1),
                name: "2025-2".to_string(),
                starts_on: date("2025-08-01"),
                ends_on: date("2025-12-15"),
                status: PeriodStatus::Active,
            }],
            courses: vec![
                Course {
                    id: CourseId(10),
                    subject: SubjectId(1),
                    period: PeriodId(1),
                    section: "A".to_string(),
                    max_seats: 2,
                },
                Course {
                    id: CourseId(11),
                    subject: SubjectId(2),
                    period: PeriodId(1),
                    section: "A".to_string(),
                    max_seats: 2,
                },
            ],
            cuts: vec![
                cut(1, 10, "C1", 30),
                cut(2, 10, "C2", 30),
                cut(3, 10, "C3_NOTAS", 20),
                cut(4, 10, "C3_INTEGRADOR", 20),
                cut(5, 11, "C1", 100),
            ],
            components: vec![
                full_component(11, 1),
                full_component(21, 2),
                full_component(31, 3),
                full_component(41, 4),
                full_component(51, 5),
            ],
            sessions: vec![
                ClassSession {
                    id: ClassSessionId(1),
                    course: CourseId(10),
                    number: 1,
                    date: date("2025-08-04"),
                    topic: None,
                },
                ClassSession {
                    id: ClassSessionId(2),
                    course: CourseId(10),
                    number: 2,
                    date: date("2025-08-11"),
                    topic: None,
                },
            ],
        }
    }

    fn registrar() -> Registrar {
        Registrar::initialize(StoreBackend::default(), sample_catalog()).expect("initialize")
    }

    fn grade_all(reg: &mut Registrar, enrollment: EnrollmentId, centi: [u16; 4]) {
        for (component, value) in [11u32, 21, 31, 41].into_iter().zip(centi) {
            reg.record_grade(
                enrollment,
                ComponentId(component),
                GradeValue::from_centi(value),
                "prof",
                chrono::NaiveDateTime::default(),
            )
            .expect("record grade");
        }
    }

    #[test]
    fn initialize_rejects_invalid_catalog() {
        let mut catalog = sample_catalog();
        catalog.prerequisites.push(Prerequisite {
            subject: SubjectId(1),
            requires: SubjectId(2),
        });
        let err = Registrar::initialize(StoreBackend::default(), catalog)
            .expect_err("cycle blocks setup");
        assert!(matches!(err, AcademicError::CycleDetected { .. }));
    }

    #[test]
    fn enrollment_to_approval_flow() {
        let mut reg = registrar();
        let student = StudentId::new("s-1");

        // BD201 is blocked before BD101 is approved.
        let err = reg
            .enroll(
                student.clone(),
                CourseId(11),
                date("2025-08-01"),
                EligibilityOptions::default(),
            )
            .expect_err("prerequisites missing");
        assert!(matches!(err, AcademicError::PrerequisitesNotMet { .. }));

        let enrollment = reg
            .enroll(
                student.clone(),
                CourseId(10),
                date("2025-08-01"),
                EligibilityOptions::default(),
            )
            .expect("enroll in BD101");

        // Pending until every component is graded.
        assert_eq!(
            reg.final_grade(enrollment.id).expect("compute"),
            Score::Pending
        );

        // 0.3*4.0 + 0.3*3.0 + 0.2*5.0 + 0.2*2.0 = 3.5 -> approved.
        grade_all(&mut reg, enrollment.id, [400, 300, 500, 200]);
        let score = reg.final_grade(enrollment.id).expect("compute");
        assert_eq!(score.decision(), Some(Decision::Approved));

        let (closed, final_score) = reg
            .close_enrollment(enrollment.id, date("2025-12-20"))
            .expect("close after period end");
        assert_eq!(closed.status, crate::EnrollmentStatus::Approved);
        assert_eq!(final_score, Score::Resolved(GradeValue::from_centi(350)));

        // Approval unlocks BD201.
        assert!(reg
            .eligibility(&student, SubjectId(2), EligibilityOptions::default())
            .expect("resolve")
            .is_eligible());
        reg.enroll(
            student,
            CourseId(11),
            date("2026-02-01"),
            EligibilityOptions::default(),
        )
        .expect("enroll in BD201");
    }

    #[test]
    fn close_refuses_open_period() {
        let mut reg = registrar();
        let enrollment = reg
            .enroll(
                StudentId::new("s-1"),
                CourseId(10),
                date("2025-08-01"),
                EligibilityOptions::default(),
            )
            .expect("enroll");
        grade_all(&mut reg, enrollment.id, [400, 400, 400, 400]);

        let err = reg
            .close_enrollment(enrollment.id, date("2025-10-01"))
            .expect_err("period still open");
        assert!(matches!(err, AcademicError::PeriodOpen(PeriodId(1))));
    }

    #[test]
    fn close_is_at_most_once() {
        let mut reg = registrar();
        let enrollment = reg
            .enroll(
                StudentId::new("s-1"),
                CourseId(10),
                date("2025-08-01"),
                EligibilityOptions::default(),
            )
            .expect("enroll");
        grade_all(&mut reg, enrollment.id, [200, 200, 200, 200]);

        let (closed, _) = reg
            .close_enrollment(enrollment.id, date("2025-12-20"))
            .expect("first close");
        assert_eq!(closed.status, crate::EnrollmentStatus::Failed);

        let err = reg
            .close_enrollment(enrollment.id, date("2025-12-20"))
            .expect_err("second close");
        assert!(matches!(
            err,
            AcademicError::AlreadyFinalized {
                status: crate::EnrollmentStatus::Failed,
                ..
            }
        ));

        // Stored status unchanged by the failed second call.
        let stored = reg
            .store()
            .enrollment(enrollment.id)
            .expect("read")
            .expect("present");
        assert_eq!(stored.status, crate::EnrollmentStatus::Failed);
    }

    #[test]
    fn duplicate_and_full_course_refused() {
        let mut reg = registrar();
        reg.enroll(
            StudentId::new("s-1"),
            CourseId(10),
            date("2025-08-01"),
            EligibilityOptions::default(),
        )
        .expect("enroll");

        let err = reg
            .enroll(
                StudentId::new("s-1"),
                CourseId(10),
                date("2025-08-02"),
                EligibilityOptions::default(),
            )
            .expect_err("duplicate");
        assert!(matches!(err, AcademicError::DuplicateEnrollment { .. }));

        reg.enroll(
            StudentId::new("s-2"),
            CourseId(10),
            date("2025-08-01"),
            EligibilityOptions::default(),
        )
        .expect("second seat");

        let err = reg
            .enroll(
                StudentId::new("s-3"),
                CourseId(10),
                date("2025-08-01"),
                EligibilityOptions::default(),
            )
            .expect_err("course full");
        assert!(matches!(err, AcademicError::CourseFull(CourseId(10))));
    }

    #[test]
    fn withdrawal_frees_a_seat_and_blocks_grading() {
        let mut reg = registrar();
        let enrollment = reg
            .enroll(
                StudentId::new("s-1"),
                CourseId(10),
                date("2025-08-01"),
                EligibilityOptions::default(),
            )
            .expect("enroll");

        let withdrawn = reg
            .withdraw(enrollment.id, date("2025-09-30"))
            .expect("withdraw");
        assert_eq!(withdrawn.withdrawn_on, Some(date("2025-09-30")));

        let err = reg
            .record_grade(
                enrollment.id,
                ComponentId(11),
                GradeValue::from_centi(400),
                "prof",
                chrono::NaiveDateTime::default(),
            )
            .expect_err("withdrawn enrollment");
        assert!(matches!(err, AcademicError::NotEnrolled { .. }));

        // The seat is open again.
        reg.enroll(
            StudentId::new("s-2"),
            CourseId(10),
            date("2025-10-01"),
            EligibilityOptions::default(),
        )
        .expect("seat freed");
        reg.enroll(
            StudentId::new("s-3"),
            CourseId(10),
            date("2025-10-01"),
            EligibilityOptions::default(),
        )
        .expect("second seat");
    }

    #[test]
    fn grade_validation_at_the_workflow_edge() {
        let mut reg = registrar();
        let enrollment = reg
            .enroll(
                StudentId::new("s-1"),
                CourseId(10),
                date("2025-08-01"),
                EligibilityOptions::default(),
            )
            .expect("enroll");

        let err = reg
            .record_grade(
                enrollment.id,
                ComponentId(999),
                GradeValue::from_centi(400),
                "prof",
                chrono::NaiveDateTime::default(),
            )
            .expect_err("unknown component");
        assert!(matches!(err, AcademicError::UnknownComponent(_)));

        let err = reg
            .record_grade(
                enrollment.id,
                ComponentId(11),
                GradeValue::from_centi(501),
                "prof",
                chrono::NaiveDateTime::default(),
            )
            .expect_err("off scale");
        assert!(matches!(err, AcademicError::GradeOutOfRange { centi: 501 }));
    }

    #[test]
    fn attendance_workflow() {
        let mut reg = registrar();
        let enrollment = reg
            .enroll(
                StudentId::new("s-1"),
                CourseId(10),
                date("2025-08-01"),
                EligibilityOptions::default(),
            )
            .expect("enroll");

        let err = reg
            .attendance_summary(enrollment.id)
            .expect_err("nothing recorded yet");
        assert!(matches!(err, AcademicError::NoRecords(_)));

        reg.record_attendance(
            enrollment.id,
            ClassSessionId(1),
            AttendanceStatus::Present,
            "prof",
        )
        .expect("record");
        reg.record_attendance(
            enrollment.id,
            ClassSessionId(2),
            AttendanceStatus::Late,
            "prof",
        )
        .expect("record");

        let summary = reg.attendance_summary(enrollment.id).expect("summary");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.per_mille, 1000);
        assert!(attendance::meets_minimum(&summary));

        // Session of another course is refused.
        let err = reg
            .record_attendance(
                enrollment.id,
                ClassSessionId(99),
                AttendanceStatus::Present,
                "prof",
            )
            .expect_err("unknown session");
        assert!(matches!(err, AcademicError::UnknownSession(_)));
    }

    #[test]
    fn open_requires_a_stored_catalog() {
        let err = Registrar::open(StoreBackend::default()).expect_err("empty store");
        assert!(matches!(err, AcademicError::InvalidCatalog(_)));
    }
}
