//! # Core Type Definitions
//!
//! This module contains all entity records and scalar types for the Kardex
//! deterministic progression engine:
//! - Catalog and record identifiers (`SubjectId`, `CourseId`, `EnrollmentId`, ...)
//! - Fixed-point scalars (`GradeValue`, `Weight`)
//! - Entity records (`Subject`, `Course`, `Cut`, `Component`, `Grade`,
//!   `Enrollment`, `AttendanceRecord`, ...)
//! - Error types (`AcademicError`, `ErrorKind`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Represent decimal scales as fixed-point integers (centipoints for
//!   grades, basis points for weights)

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::primitives::GRADE_SCALE_MAX_CENTI;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier for a catalog subject (the abstract course definition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub u32);

/// Unique identifier for a course offering (subject + period + section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(pub u32);

/// Unique identifier for an evaluation cut within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CutId(pub u32);

/// Unique identifier for a graded component within a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

/// Unique identifier for an enrollment (student x course).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnrollmentId(pub u32);

/// Unique identifier for a class session of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassSessionId(pub u32);

/// Unique identifier for an academic period ("2025-2").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodId(pub u32);

/// Unique identifier for an academic program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProgramId(pub u32);

/// Unique identifier for a student.
///
/// Students carry opaque string identifiers (the admissions system issues
/// UUIDs); every other record uses compact integer identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl StudentId {
    /// Create a new student identifier from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique catalog code of a subject ("BD101", "IS201").
///
/// Codes are the human-facing identity of a subject: diagnostics (cycle
/// reports, missing-prerequisite lists) and deterministic tie-breaking are
/// expressed in codes, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectCode(pub String);

impl SubjectCode {
    /// Create a new subject code from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// FIXED-POINT SCALARS
// =============================================================================

/// A grade on the institutional 0.00..=5.00 scale, stored as centipoints.
///
/// `GradeValue(350)` is the grade 3.50. Centipoints make round-half-up
/// aggregation exact integer arithmetic. Deserialized data can carry any
/// `u16`, so the scale bound is re-checked at computation time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct GradeValue(pub u16);

impl GradeValue {
    /// Create a grade from centipoints without validating the scale bound.
    ///
    /// The engine validates lazily: out-of-scale values surface as
    /// `AcademicError::GradeOutOfRange` at computation time.
    #[must_use]
    pub const fn from_centi(centi: u16) -> Self {
        Self(centi)
    }

    /// Create a grade from centipoints, rejecting values above the scale.
    pub fn try_from_centi(centi: u16) -> Result<Self, AcademicError> {
        if centi > GRADE_SCALE_MAX_CENTI {
            return Err(AcademicError::GradeOutOfRange { centi });
        }
        Ok(Self(centi))
    }

    /// Get the raw centipoint value.
    #[must_use]
    pub const fn centi(self) -> u16 {
        self.0
    }

    /// Check whether the value lies on the 0.00..=5.00 scale.
    #[must_use]
    pub const fn is_on_scale(self) -> bool {
        self.0 <= GRADE_SCALE_MAX_CENTI
    }

    /// Parse a decimal string ("3", "3.5", "3.75") into a grade.
    ///
    /// At most two fraction digits are accepted; the scale bound is
    /// enforced. No binary floating point is involved, so "3.995"-style
    /// representation drift cannot occur.
    pub fn parse(s: &str) -> Result<Self, AcademicError> {
        let centi = parse_fixed_decimal(s, 2)?;
        let centi =
            u16::try_from(centi).map_err(|_| AcademicError::InvalidDecimal(s.to_string()))?;
        Self::try_from_centi(centi)
    }
}

impl std::fmt::Display for GradeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// A percentage weight stored in basis points (100 bp = 1 percent).
///
/// The weights of all cuts in a course, and of all components in a cut,
/// must sum to 100 percent (10 000 bp) within the catalog tolerance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Weight(pub u32);

impl Weight {
    /// Create a weight from basis points.
    #[must_use]
    pub const fn from_bp(bp: u32) -> Self {
        Self(bp)
    }

    /// Create a weight from whole percent.
    #[must_use]
    pub const fn from_percent(percent: u32) -> Self {
        Self(percent * 100)
    }

    /// Get the raw basis-point value.
    #[must_use]
    pub const fn bp(self) -> u32 {
        self.0
    }

    /// Parse a decimal percent string ("30", "33.33") into a weight.
    pub fn parse(s: &str) -> Result<Self, AcademicError> {
        parse_fixed_decimal(s, 2).map(Self)
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

/// Parse a non-negative decimal string into fixed-point with `frac_digits`
/// fraction digits. Rejects empty parts, non-digits, and excess precision.
fn parse_fixed_decimal(s: &str, frac_digits: u32) -> Result<u32, AcademicError> {
    let invalid = || AcademicError::InvalidDecimal(s.to_string());

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() || frac_part.len() > frac_digits as usize {
        return Err(invalid());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let scale = 10u32.pow(frac_digits);
    let int_value: u32 = int_part.parse().map_err(|_| invalid())?;
    let mut frac_value: u32 = 0;
    if !frac_part.is_empty() {
        frac_value = frac_part.parse().map_err(|_| invalid())?;
        frac_value *= 10u32.pow(frac_digits - frac_part.len() as u32);
    }

    int_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(invalid)
}

// =============================================================================
// CATALOG RECORDS
// =============================================================================

/// A catalog subject: the abstract course definition, independent of any
/// concrete offering. Immutable once referenced by a `Course`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub program: ProgramId,
    pub code: SubjectCode,
    pub name: String,
    pub credits: u8,
    pub weekly_hours: u8,
    pub active: bool,
}

/// A directed prerequisite edge: `subject` cannot be taken until
/// `requires` has been approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Prerequisite {
    pub subject: SubjectId,
    pub requires: SubjectId,
}

/// A concrete course offering: subject + academic period + section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub subject: SubjectId,
    pub period: PeriodId,
    pub section: String,
    pub max_seats: u16,
}

/// An evaluation cut of a course ("C1" 30%, "C3_INTEGRADOR" 20%, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cut {
    pub id: CutId,
    pub course: CourseId,
    pub code: String,
    pub weight: Weight,
}

/// A graded component inside a cut (an exam, a workshop, a quiz).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub cut: CutId,
    pub name: String,
    pub weight: Weight,
    pub description: Option<String>,
}

// =============================================================================
// PEOPLE & LIFECYCLE RECORDS
// =============================================================================

/// A student record. Identity data lives with the admissions collaborator;
/// the engine only needs the identifier, code, and lifecycle flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub code: String,
    pub admitted_on: NaiveDate,
    pub active: bool,
}

/// Academic program level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProgramLevel {
    Technical,
    Technological,
    Professional,
    Postgraduate,
}

/// An academic program (a degree track owning subjects).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    pub level: ProgramLevel,
    pub semesters: u8,
    pub active: bool,
}

/// Lifecycle state of an academic period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeriodStatus {
    Planned,
    Active,
    Closed,
}

/// An academic period ("2025-2") with calendar bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicPeriod {
    pub id: PeriodId,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub status: PeriodStatus,
}

impl AcademicPeriod {
    /// Whether the period has ended by `today` (explicitly closed periods
    /// count as ended regardless of the calendar).
    #[must_use]
    pub fn has_ended(&self, today: NaiveDate) -> bool {
        self.status == PeriodStatus::Closed || today > self.ends_on
    }
}

/// A numbered, dated class session of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: ClassSessionId,
    pub course: CourseId,
    pub number: u16,
    pub date: NaiveDate,
    pub topic: Option<String>,
}

// =============================================================================
// ENROLLMENT
// =============================================================================

/// Status of an enrollment.
///
/// Transitions happen only through the aggregator's finalization step or
/// explicit withdrawal; terminal statuses are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Enrolled,
    Withdrawn,
    Approved,
    Failed,
    Validated,
}

impl EnrollmentStatus {
    /// Terminal statuses: a finalized outcome that is never reverted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Failed | Self::Validated)
    }

    /// Whether an enrollment with this status satisfies a prerequisite.
    /// Any successful attempt suffices; failed or withdrawn ones never do.
    #[must_use]
    pub const fn satisfies_prerequisite(self) -> bool {
        matches!(self, Self::Approved | Self::Validated)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::Withdrawn => "withdrawn",
            Self::Approved => "approved",
            Self::Failed => "failed",
            Self::Validated => "validated",
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An enrollment linking a student to a course offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student: StudentId,
    pub course: CourseId,
    pub enrolled_on: NaiveDate,
    pub withdrawn_on: Option<NaiveDate>,
    pub status: EnrollmentStatus,
}

impl Enrollment {
    /// Create a new open enrollment.
    #[must_use]
    pub fn new(id: EnrollmentId, student: StudentId, course: CourseId, on: NaiveDate) -> Self {
        Self {
            id,
            student,
            course,
            enrolled_on: on,
            withdrawn_on: None,
            status: EnrollmentStatus::Enrolled,
        }
    }

    /// Whether the enrollment is still open for grading and attendance.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.status, EnrollmentStatus::Enrolled)
    }
}

/// A grade recorded against one (enrollment, component) pair.
///
/// At most one grade exists per pair; an ungraded component is represented
/// by the absence of a record, which the aggregator surfaces as the
/// explicit pending state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub enrollment: EnrollmentId,
    pub component: ComponentId,
    pub value: GradeValue,
    pub published: bool,
    pub recorded_by: String,
    pub recorded_at: NaiveDateTime,
}

// =============================================================================
// ATTENDANCE
// =============================================================================

/// Attendance status for one class session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

/// One attendance record per (enrollment, class session) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub enrollment: EnrollmentId,
    pub session: ClassSessionId,
    pub status: AttendanceStatus,
    pub recorded_by: String,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Which catalog weighting a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightScope {
    /// The cut weights of a course.
    Course(CourseId),
    /// The component weights of a cut.
    Cut(CutId),
}

impl std::fmt::Display for WeightScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Course(id) => write!(f, "cut weights of course {}", id.0),
            Self::Cut(id) => write!(f, "component weights of cut {}", id.0),
        }
    }
}

/// Classification of `AcademicError` variants.
///
/// Catalog errors are fatal and block course setup; input errors reject a
/// single computation; state errors indicate a workflow bug upstream and
/// are surfaced, never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Catalog,
    Input,
    State,
    NotFound,
    Storage,
}

/// Errors reported by the progression engine and the record store.
///
/// - No silent failures: out-of-domain values are rejected, never clamped
/// - All fallible operations return `Result<T, AcademicError>`
/// - The engine never panics; all errors are recoverable by the caller
#[derive(Debug, Error)]
pub enum AcademicError {
    /// The prerequisite edge set contains a cycle. Carries the ordered
    /// subject codes forming the loop, first repeated at the end.
    #[error("prerequisite cycle detected: {}", .cycle.iter().map(SubjectCode::as_str).collect::<Vec<_>>().join(" -> "))]
    CycleDetected { cycle: Vec<SubjectCode> },

    /// A subject listed itself as its own prerequisite.
    #[error("subject {0} cannot be its own prerequisite")]
    SelfPrerequisite(SubjectCode),

    /// Two catalog subjects share the same code.
    #[error("duplicate subject code {0}")]
    DuplicateSubjectCode(SubjectCode),

    /// An edge or query referenced a subject missing from the catalog.
    #[error("unknown subject: {0:?}")]
    UnknownSubject(SubjectId),

    /// Cut or component weights do not sum to 100% within tolerance.
    #[error("invalid weighting: {scope} sum to {total}, expected 100.00%")]
    InvalidWeighting { scope: WeightScope, total: Weight },

    /// Structural catalog violation (size caps, malformed codes, dangling
    /// references between catalog records).
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A grade value lies outside the 0.00..=5.00 scale.
    #[error("grade value {centi} centipoints is outside the 0.00..=5.00 scale")]
    GradeOutOfRange { centi: u16 },

    /// A decimal scalar string could not be parsed.
    #[error("invalid decimal value '{0}'")]
    InvalidDecimal(String),

    /// A caller-supplied value could not be interpreted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Attendance summary requested with zero records.
    #[error("no attendance records for enrollment {0:?}")]
    NoRecords(EnrollmentId),

    /// Finalization attempted on an enrollment that already left the
    /// `Enrolled` state. The stored status is unchanged.
    #[error("enrollment {} is already finalized ({status})", .enrollment.0)]
    AlreadyFinalized {
        enrollment: EnrollmentId,
        status: EnrollmentStatus,
    },

    /// Finalization attempted with a pending final grade.
    #[error("final grade for enrollment {0:?} is still pending")]
    UnresolvedFinalGrade(EnrollmentId),

    /// A grading/attendance/withdrawal operation targeted a non-open
    /// enrollment.
    #[error("enrollment {} is not open ({status})", .enrollment.0)]
    NotEnrolled {
        enrollment: EnrollmentId,
        status: EnrollmentStatus,
    },

    /// The student already has an open enrollment in the course.
    #[error("student {student} already has an open enrollment in course {}", .course.0)]
    DuplicateEnrollment {
        student: StudentId,
        course: CourseId,
    },

    /// Finalization attempted before the course period ended.
    #[error("academic period {0:?} has not ended")]
    PeriodOpen(PeriodId),

    /// Enrollment refused: prerequisites are not satisfied.
    #[error("prerequisites not met: {}", .missing.iter().map(SubjectCode::as_str).collect::<Vec<_>>().join(", "))]
    PrerequisitesNotMet { missing: Vec<SubjectCode> },

    /// Enrollment refused: the course has no seats left.
    #[error("course {0:?} is full")]
    CourseFull(CourseId),

    /// No enrollment stored under the identifier.
    #[error("enrollment not found: {0:?}")]
    EnrollmentNotFound(EnrollmentId),

    /// No course in the catalog under the identifier.
    #[error("course not found: {0:?}")]
    CourseNotFound(CourseId),

    /// A grade targeted a component outside the course's evaluation plan.
    #[error("component {0:?} is not part of the course evaluation plan")]
    UnknownComponent(ComponentId),

    /// An attendance record targeted a session of another course.
    #[error("class session {0:?} does not belong to the course")]
    UnknownSession(ClassSessionId),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred in the record store.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl AcademicError {
    /// Classify the error per the engine's failure taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CycleDetected { .. }
            | Self::SelfPrerequisite(_)
            | Self::DuplicateSubjectCode(_)
            | Self::UnknownSubject(_)
            | Self::InvalidWeighting { .. }
            | Self::InvalidCatalog(_) => ErrorKind::Catalog,

            Self::GradeOutOfRange { .. }
            | Self::InvalidDecimal(_)
            | Self::InvalidInput(_)
            | Self::NoRecords(_) => ErrorKind::Input,

            Self::AlreadyFinalized { .. }
            | Self::UnresolvedFinalGrade(_)
            | Self::NotEnrolled { .. }
            | Self::DuplicateEnrollment { .. }
            | Self::PeriodOpen(_)
            | Self::PrerequisitesNotMet { .. }
            | Self::CourseFull(_) => ErrorKind::State,

            Self::EnrollmentNotFound(_)
            | Self::CourseNotFound(_)
            | Self::UnknownComponent(_)
            | Self::UnknownSession(_) => ErrorKind::NotFound,

            Self::SerializationError(_) | Self::IoError(_) => ErrorKind::Storage,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::WEIGHT_TOTAL_BP;

    #[test]
    fn grade_value_parse_and_display() {
        let g = GradeValue::parse("3.5").expect("parse");
        assert_eq!(g.centi(), 350);
        assert_eq!(g.to_string(), "3.50");

        assert_eq!(GradeValue::parse("5").expect("parse").centi(), 500);
        assert_eq!(GradeValue::parse("0.05").expect("parse").centi(), 5);
        assert_eq!(GradeValue::parse("4.75").expect("parse").centi(), 475);
    }

    #[test]
    fn grade_value_rejects_off_scale() {
        let err = GradeValue::parse("5.01").expect_err("must reject");
        assert!(matches!(err, AcademicError::GradeOutOfRange { centi: 501 }));
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn grade_value_rejects_malformed() {
        for bad in ["", ".", "3.555", "-1", "a.b", "3,5"] {
            assert!(
                GradeValue::parse(bad).is_err(),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn raw_grade_scale_check() {
        // Deserialized data can carry any u16; the scale predicate is what
        // the aggregator consults.
        let raw = GradeValue::from_centi(900);
        assert!(!raw.is_on_scale());
        assert!(GradeValue::from_centi(500).is_on_scale());
    }

    #[test]
    fn weight_parse_and_display() {
        assert_eq!(Weight::parse("30").expect("parse").bp(), 3000);
        assert_eq!(Weight::parse("33.33").expect("parse").bp(), 3333);
        assert_eq!(Weight::parse("0.01").expect("parse").bp(), 1);
        assert_eq!(Weight::from_percent(100).bp(), WEIGHT_TOTAL_BP);
        assert_eq!(Weight::from_bp(2050).to_string(), "20.50%");
    }

    #[test]
    fn enrollment_status_classification() {
        assert!(EnrollmentStatus::Approved.is_terminal());
        assert!(EnrollmentStatus::Failed.is_terminal());
        assert!(EnrollmentStatus::Validated.is_terminal());
        assert!(!EnrollmentStatus::Enrolled.is_terminal());
        assert!(!EnrollmentStatus::Withdrawn.is_terminal());

        assert!(EnrollmentStatus::Approved.satisfies_prerequisite());
        assert!(EnrollmentStatus::Validated.satisfies_prerequisite());
        assert!(!EnrollmentStatus::Failed.satisfies_prerequisite());
        assert!(!EnrollmentStatus::Withdrawn.satisfies_prerequisite());
        assert!(!EnrollmentStatus::Enrolled.satisfies_prerequisite());
    }

    #[test]
    fn period_end_check() {
        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date");
        let mut period = AcademicPeriod {
            id: PeriodId(1),
            name: "2025-2".to_string(),
            starts_on: date("2025-08-01"),
            ends_on: date("2025-12-15"),
            status: PeriodStatus::Active,
        };

        assert!(!period.has_ended(date("2025-12-15")));
        assert!(period.has_ended(date("2025-12-16")));

        // Explicit closure ends the period regardless of the calendar.
        period.status = PeriodStatus::Closed;
        assert!(period.has_ended(date("2025-09-01")));
    }

    #[test]
    fn error_kind_taxonomy() {
        let cycle = AcademicError::CycleDetected {
            cycle: vec![SubjectCode::new("A"), SubjectCode::new("B")],
        };
        assert_eq!(cycle.kind(), ErrorKind::Catalog);

        assert_eq!(
            AcademicError::NoRecords(EnrollmentId(1)).kind(),
            ErrorKind::Input
        );
        assert_eq!(
            AcademicError::AlreadyFinalized {
                enrollment: EnrollmentId(1),
                status: EnrollmentStatus::Approved,
            }
            .kind(),
            ErrorKind::State
        );
        assert_eq!(
            AcademicError::EnrollmentNotFound(EnrollmentId(1)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AcademicError::IoError("disk".to_string()).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn cycle_error_reports_ordered_codes() {
        let err = AcademicError::CycleDetected {
            cycle: vec![
                SubjectCode::new("A"),
                SubjectCode::new("B"),
                SubjectCode::new("C"),
                SubjectCode::new("A"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "prerequisite cycle detected: A -> B -> C -> A"
        );
    }
}
