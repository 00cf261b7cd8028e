//! # Catalog
//!
//! The validated snapshot of curriculum data: subjects, prerequisite
//! edges, periods, course offerings, cuts, components, and class sessions.
//!
//! A catalog is validated as a whole at load time. Validation failures are
//! fatal for course setup: a catalog that fails `validate` must not reach
//! the engine, and nothing is silently corrected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::grading::{CutPlan, EvaluationPlan};
use crate::graph::CurriculumGraph;
use crate::primitives::{
    MAX_CODE_LENGTH, MAX_NAME_LENGTH, WEIGHT_TOLERANCE_BP, WEIGHT_TOTAL_BP,
};
use crate::{
    AcademicError, AcademicPeriod, ClassSession, Component, Course, CourseId, Cut, Prerequisite,
    Program, Subject, WeightScope,
};

/// The curriculum catalog snapshot.
///
/// Plain data, unidirectional ownership: records reference each other by
/// identifier only. The curriculum graph is a projection built from this
/// snapshot, rebuilt whenever the catalog changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub programs: Vec<Program>,
    pub subjects: Vec<Subject>,
    pub prerequisites: Vec<Prerequisite>,
    pub periods: Vec<AcademicPeriod>,
    pub courses: Vec<Course>,
    pub cuts: Vec<Cut>,
    pub components: Vec<Component>,
    pub sessions: Vec<ClassSession>,
}

impl Catalog {
    /// Validate the whole snapshot.
    ///
    /// Checks, in order: record identifier uniqueness, code/name bounds,
    /// the prerequisite graph (unique codes, known endpoints, no
    /// self-loops, acyclic), referential integrity between records, and
    /// every weight sum. The first violation aborts the load.
    pub fn validate(&self) -> Result<(), AcademicError> {
        self.check_unique_ids()?;
        self.check_bounds()?;

        // Builds and discards: the graph construction is the cycle check.
        self.build_graph()?;

        self.check_references()?;
        self.check_weights()
    }

    /// Build the curriculum graph projection from this snapshot.
    pub fn build_graph(&self) -> Result<CurriculumGraph, AcademicError> {
        CurriculumGraph::build(&self.subjects, &self.prerequisites)
    }

    /// Assemble the evaluation plan of a course: its cuts in identifier
    /// order, each with its components in identifier order.
    pub fn evaluation_plan(&self, course: CourseId) -> Result<EvaluationPlan, AcademicError> {
        let course = self
            .course(course)
            .ok_or(AcademicError::CourseNotFound(course))?
            .clone();

        let mut cuts: Vec<&Cut> = self.cuts.iter().filter(|c| c.course == course.id).collect();
        cuts.sort_by_key(|c| c.id);

        let plans = cuts
            .into_iter()
            .map(|cut| {
                let mut components: Vec<Component> = self
                    .components
                    .iter()
                    .filter(|c| c.cut == cut.id)
                    .cloned()
                    .collect();
                components.sort_by_key(|c| c.id);
                CutPlan {
                    cut: cut.clone(),
                    components,
                }
            })
            .collect();

        Ok(EvaluationPlan {
            course,
            cuts: plans,
        })
    }

    /// Lookup a course offering.
    #[must_use]
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Lookup an academic period.
    #[must_use]
    pub fn period(&self, id: crate::PeriodId) -> Option<&AcademicPeriod> {
        self.periods.iter().find(|p| p.id == id)
    }

    /// Lookup a class session.
    #[must_use]
    pub fn session(&self, id: crate::ClassSessionId) -> Option<&ClassSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    // =========================================================================
    // VALIDATION PASSES
    // =========================================================================

    fn check_unique_ids(&self) -> Result<(), AcademicError> {
        fn unique<I: Ord + Copy>(
            what: &str,
            ids: impl Iterator<Item = I>,
            display: impl Fn(I) -> String,
        ) -> Result<(), AcademicError> {
            let mut seen = BTreeSet::new();
            for id in ids {
                if !seen.insert(id) {
                    return Err(AcademicError::InvalidCatalog(format!(
                        "duplicate {what} id {}",
                        display(id)
                    )));
                }
            }
            Ok(())
        }

        unique("program", self.programs.iter().map(|p| p.id), |i| {
            i.0.to_string()
        })?;
        unique("subject", self.subjects.iter().map(|s| s.id), |i| {
            i.0.to_string()
        })?;
        unique("period", self.periods.iter().map(|p| p.id), |i| {
            i.0.to_string()
        })?;
        unique("course", self.courses.iter().map(|c| c.id), |i| {
            i.0.to_string()
        })?;
        unique("cut", self.cuts.iter().map(|c| c.id), |i| i.0.to_string())?;
        unique("component", self.components.iter().map(|c| c.id), |i| {
            i.0.to_string()
        })?;
        unique("session", self.sessions.iter().map(|s| s.id), |i| {
            i.0.to_string()
        })
    }

    fn check_bounds(&self) -> Result<(), AcademicError> {
        for subject in &self.subjects {
            let code = subject.code.as_str();
            if code.is_empty() || code.len() > MAX_CODE_LENGTH {
                return Err(AcademicError::InvalidCatalog(format!(
                    "subject {} has an empty or oversized code",
                    subject.id.0
                )));
            }
            if subject.name.len() > MAX_NAME_LENGTH {
                return Err(AcademicError::InvalidCatalog(format!(
                    "subject {code} name exceeds {MAX_NAME_LENGTH} bytes"
                )));
            }
        }
        for cut in &self.cuts {
            if cut.code.is_empty() || cut.code.len() > MAX_CODE_LENGTH {
                return Err(AcademicError::InvalidCatalog(format!(
                    "cut {} has an empty or oversized code",
                    cut.id.0
                )));
            }
        }
        Ok(())
    }

    fn check_references(&self) -> Result<(), AcademicError> {
        let program_ids: BTreeSet<_> = self.programs.iter().map(|p| p.id).collect();
        let subject_ids: BTreeSet<_> = self.subjects.iter().map(|s| s.id).collect();
        let period_ids: BTreeSet<_> = self.periods.iter().map(|p| p.id).collect();
        let course_ids: BTreeSet<_> = self.courses.iter().map(|c| c.id).collect();
        let cut_ids: BTreeSet<_> = self.cuts.iter().map(|c| c.id).collect();

        for subject in &self.subjects {
            if !program_ids.contains(&subject.program) {
                return Err(AcademicError::InvalidCatalog(format!(
                    "subject {} references unknown program {}",
                    subject.code, subject.program.0
                )));
            }
        }
        for course in &self.courses {
            if !subject_ids.contains(&course.subject) {
                return Err(AcademicError::UnknownSubject(course.subject));
            }
            if !period_ids.contains(&course.period) {
                return Err(AcademicError::InvalidCatalog(format!(
                    "course {} references unknown period {}",
                    course.id.0, course.period.0
                )));
            }
        }
        for cut in &self.cuts {
            if !course_ids.contains(&cut.course) {
                return Err(AcademicError::InvalidCatalog(format!(
                    "cut {} references unknown course {}",
                    cut.id.0, cut.course.0
                )));
            }
        }
        for component in &self.components {
            if !cut_ids.contains(&component.cut) {
                return Err(AcademicError::InvalidCatalog(format!(
                    "component {} references unknown cut {}",
                    component.id.0, component.cut.0
                )));
            }
        }
        for session in &self.sessions {
            if !course_ids.contains(&session.course) {
                return Err(AcademicError::InvalidCatalog(format!(
                    "session {} references unknown course {}",
                    session.id.0, session.course.0
                )));
            }
        }
        Ok(())
    }

    /// Weight sums, checked once at load. Courses without cuts are legal
    /// in the catalog (grading on them is rejected at computation time);
    /// a course that has cuts must weigh them to exactly 100%, and every
    /// cut that has components likewise.
    fn check_weights(&self) -> Result<(), AcademicError> {
        let within = |total: u64| {
            total.abs_diff(u64::from(WEIGHT_TOTAL_BP)) <= u64::from(WEIGHT_TOLERANCE_BP)
        };

        for course in &self.courses {
            let cuts: Vec<&Cut> = self.cuts.iter().filter(|c| c.course == course.id).collect();
            if cuts.is_empty() {
                continue;
            }
            let total: u64 = cuts.iter().map(|c| u64::from(c.weight.bp())).sum();
            if !within(total) {
                return Err(AcademicError::InvalidWeighting {
                    scope: WeightScope::Course(course.id),
                    total: crate::Weight::from_bp(total.min(u64::from(u32::MAX)) as u32),
                });
            }
        }

        for cut in &self.cuts {
            let components: Vec<&Component> = self
                .components
                .iter()
                .filter(|c| c.cut == cut.id)
                .collect();
            if components.is_empty() {
                continue;
            }
            let total: u64 = components.iter().map(|c| u64::from(c.weight.bp())).sum();
            if !within(total) {
                return Err(AcademicError::InvalidWeighting {
                    scope: WeightScope::Cut(cut.id),
                    total: crate::Weight::from_bp(total.min(u64::from(u32::MAX)) as u32),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
