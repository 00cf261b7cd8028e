//! # Eligibility Resolver
//!
//! Decides whether a student may enroll in a subject given the curriculum
//! graph and the student's historical enrollment outcomes.
//!
//! A required subject is satisfied by any past enrollment of the student
//! in a course of that subject that ended approved or validated; failed
//! and withdrawn attempts never satisfy. By default only direct
//! prerequisite edges are consulted; the full transitive chain is a
//! configurable stricter policy.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::graph::CurriculumGraph;
use crate::{AcademicError, Course, CourseId, Enrollment, StudentId, SubjectCode, SubjectId};

/// Policy knobs for an eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EligibilityOptions {
    /// Check the full prerequisite chain instead of only direct edges.
    pub transitive: bool,
}

impl EligibilityOptions {
    /// The default direct-edges-only policy.
    #[must_use]
    pub const fn direct() -> Self {
        Self { transitive: false }
    }

    /// The stricter full-chain policy.
    #[must_use]
    pub const fn full_chain() -> Self {
        Self { transitive: true }
    }
}

/// Outcome of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eligibility {
    /// Every required subject has a successful attempt on record.
    Eligible,
    /// Enrollment is blocked; carries the unsatisfied prerequisite codes,
    /// sorted ascending for deterministic output.
    Ineligible { missing: Vec<SubjectCode> },
}

impl Eligibility {
    /// Whether enrollment is permitted.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

impl std::fmt::Display for Eligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eligible => f.write_str("eligible"),
            Self::Ineligible { missing } => {
                let codes: Vec<&str> = missing.iter().map(SubjectCode::as_str).collect();
                write!(f, "ineligible, missing: {}", codes.join(", "))
            }
        }
    }
}

/// Decide whether `student` may enroll in a course of `subject`.
///
/// `courses` maps the student's historical course offerings back to their
/// subjects; `history` is the student's enrollment snapshot (enrollments
/// of other students are ignored).
pub fn can_enroll(
    student: &StudentId,
    subject: SubjectId,
    graph: &CurriculumGraph,
    courses: &[Course],
    history: &[Enrollment],
    options: EligibilityOptions,
) -> Result<Eligibility, AcademicError> {
    let required = if options.transitive {
        graph.all_prerequisites_of(subject)?
    } else {
        graph.direct_prerequisites_of(subject)?
    };
    if required.is_empty() {
        return Ok(Eligibility::Eligible);
    }

    let subject_of: BTreeMap<CourseId, SubjectId> =
        courses.iter().map(|c| (c.id, c.subject)).collect();

    let satisfied: BTreeSet<SubjectId> = history
        .iter()
        .filter(|e| &e.student == student && e.status.satisfies_prerequisite())
        .filter_map(|e| subject_of.get(&e.course).copied())
        .collect();

    let missing: BTreeSet<SubjectCode> = required
        .difference(&satisfied)
        .map(|&id| {
            graph
                .subject(id)
                .map(|s| s.code.clone())
                .ok_or(AcademicError::UnknownSubject(id))
        })
        .collect::<Result<_, _>>()?;

    if missing.is_empty() {
        Ok(Eligibility::Eligible)
    } else {
        Ok(Eligibility::Ineligible {
            missing: missing.into_iter().collect(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
