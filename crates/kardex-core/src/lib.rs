//! # kardex-core
//!
//! The deterministic Academic Progression Engine for Kardex - THE LOGIC.
//!
//! This crate implements the engine that gates a student's advancement
//! through a program: the curriculum prerequisite graph, the weighted
//! grade aggregator, the attendance summarizer, and the eligibility
//! resolver, plus the plain entity records they operate on and the
//! record store the Registrar workflow persists into.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is pure: engine computations take immutable snapshots and return
//!   values; the only state lives behind the `RecordStore` trait
//! - Is deterministic: `BTreeMap` ordering, fixed-point integers, no
//!   floats, no randomness
//! - Never panics; every failure is a typed `AcademicError`
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod attendance;
pub mod catalog;
pub mod eligibility;
pub mod formats;
pub mod grading;
pub mod graph;
pub mod primitives;
pub mod registrar;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AcademicError, AcademicPeriod, AttendanceRecord, AttendanceStatus, ClassSession,
    ClassSessionId, Component, ComponentId, Course, CourseId, Cut, CutId, Enrollment,
    EnrollmentId, EnrollmentStatus, ErrorKind, Grade, GradeValue, PeriodId, PeriodStatus,
    Prerequisite, Program, ProgramId, ProgramLevel, Student, StudentId, Subject, SubjectCode,
    SubjectId, Weight, WeightScope,
};

// =============================================================================
// RE-EXPORTS: Progression Engine
// =============================================================================

pub use attendance::{AttendanceSummary, meets_minimum, summarize};
pub use catalog::Catalog;
pub use eligibility::{Eligibility, EligibilityOptions, can_enroll};
pub use grading::{
    APPROVAL_THRESHOLD, CutPlan, Decision, EvaluationPlan, Score, compute_course_grade,
    cut_score, finalize_enrollment, withdraw,
};
pub use graph::CurriculumGraph;
pub use registrar::{Registrar, StoreBackend};
pub use store::{MemoryStore, RecordStore, RedbStore};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{PersistenceHeader, catalog_from_bytes, catalog_to_bytes};
