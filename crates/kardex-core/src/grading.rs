//! # Grade Aggregator
//!
//! Weighted grade aggregation for a course's cut/component hierarchy, plus
//! the explicit enrollment status transitions.
//!
//! - A missing component grade makes its cut pending, and a pending cut
//!   makes the final grade pending; zero is never substituted
//! - All arithmetic is fixed-point integer with round-half-up
//! - Computation and status transition are separate operations: the
//!   aggregator computes, `finalize_enrollment` transitions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::primitives::{
    APPROVAL_THRESHOLD_CENTI, WEIGHT_TOLERANCE_BP, WEIGHT_TOTAL_BP, div_round_half_up,
};
use crate::{
    AcademicError, Component, ComponentId, Course, Cut, Enrollment, EnrollmentStatus, Grade,
    GradeValue, WeightScope,
};

/// Minimum resolved final grade that approves a course (3.00).
pub const APPROVAL_THRESHOLD: GradeValue = GradeValue::from_centi(APPROVAL_THRESHOLD_CENTI);

// =============================================================================
// EVALUATION PLAN
// =============================================================================

/// One cut with its graded components, as laid out by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutPlan {
    pub cut: Cut,
    pub components: Vec<Component>,
}

/// The full evaluation layout of a course: its cuts, each with components.
///
/// Assembled by `Catalog::evaluation_plan`; the aggregator re-validates the
/// weight sums on every computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationPlan {
    pub course: Course,
    pub cuts: Vec<CutPlan>,
}

// =============================================================================
// SCORE
// =============================================================================

/// Tagged state of a computed score.
///
/// "Not yet graded" is an explicit state, never a null and never a zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// At least one underlying component has no grade yet.
    Pending,
    /// Every underlying component is graded; the weighted value.
    Resolved(GradeValue),
}

impl Score {
    /// Whether the score is still pending.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The resolved value, if any.
    #[must_use]
    pub const fn resolved(self) -> Option<GradeValue> {
        match self {
            Self::Pending => None,
            Self::Resolved(value) => Some(value),
        }
    }

    /// The pass/fail decision for a resolved score, `None` while pending.
    #[must_use]
    pub fn decision(self) -> Option<Decision> {
        self.resolved().map(|value| {
            if value >= APPROVAL_THRESHOLD {
                Decision::Approved
            } else {
                Decision::Failed
            }
        })
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Resolved(value) => value.fmt(f),
        }
    }
}

/// Pass/fail decision derived from a resolved final grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Failed,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => f.write_str("approved"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

// =============================================================================
// AGGREGATION
// =============================================================================

/// Validate that a weight set sums to 100% within tolerance.
fn validate_weight_total(
    scope: WeightScope,
    weights: impl Iterator<Item = crate::Weight>,
) -> Result<(), AcademicError> {
    let total: u64 = weights.map(|w| u64::from(w.bp())).sum();
    let target = u64::from(WEIGHT_TOTAL_BP);
    let tolerance = u64::from(WEIGHT_TOLERANCE_BP);

    if total.abs_diff(target) > tolerance {
        return Err(AcademicError::InvalidWeighting {
            scope,
            total: crate::Weight::from_bp(total.min(u64::from(u32::MAX)) as u32),
        });
    }
    Ok(())
}

/// Re-check a stored grade value against the scale (deserialized data can
/// carry any raw integer).
fn validated(value: GradeValue) -> Result<GradeValue, AcademicError> {
    if !value.is_on_scale() {
        return Err(AcademicError::GradeOutOfRange {
            centi: value.centi(),
        });
    }
    Ok(value)
}

/// Compute the score of one cut from the enrollment's component grades.
///
/// The cut is pending unless every component has a grade. A fully graded
/// cut scores `sum(grade x weight)` rounded half-up to centipoints.
pub fn cut_score(
    plan: &CutPlan,
    grades: &BTreeMap<ComponentId, GradeValue>,
) -> Result<Score, AcademicError> {
    validate_weight_total(
        WeightScope::Cut(plan.cut.id),
        plan.components.iter().map(|c| c.weight),
    )?;

    let mut numerator: u64 = 0;
    let mut pending = false;
    for component in &plan.components {
        match grades.get(&component.id) {
            Some(&value) => {
                let value = validated(value)?;
                numerator += u64::from(value.centi()) * u64::from(component.weight.bp());
            }
            None => pending = true,
        }
    }

    if pending {
        return Ok(Score::Pending);
    }

    let centi = div_round_half_up(numerator, u64::from(WEIGHT_TOTAL_BP));
    Ok(Score::Resolved(GradeValue::from_centi(centi as u16)))
}

/// Compute the final course grade for one enrollment.
///
/// Weighted sum over cut scores; pending if any cut is pending. Weight sums
/// are validated here as well as at catalog load.
pub fn compute_course_grade(
    plan: &EvaluationPlan,
    grades: &[Grade],
) -> Result<Score, AcademicError> {
    validate_weight_total(
        WeightScope::Course(plan.course.id),
        plan.cuts.iter().map(|c| c.cut.weight),
    )?;

    // At most one grade exists per (enrollment, component) pair; index by
    // component for the per-cut lookups.
    let by_component: BTreeMap<ComponentId, GradeValue> =
        grades.iter().map(|g| (g.component, g.value)).collect();

    let mut numerator: u64 = 0;
    let mut pending = false;
    for cut_plan in &plan.cuts {
        match cut_score(cut_plan, &by_component)? {
            Score::Pending => pending = true,
            Score::Resolved(value) => {
                numerator += u64::from(value.centi()) * u64::from(cut_plan.cut.weight.bp());
            }
        }
    }

    if pending {
        return Ok(Score::Pending);
    }

    let centi = div_round_half_up(numerator, u64::from(WEIGHT_TOTAL_BP));
    Ok(Score::Resolved(GradeValue::from_centi(centi as u16)))
}

// =============================================================================
// STATUS TRANSITIONS
// =============================================================================

/// Transition an enrollment to its terminal grading outcome.
///
/// Callable once per enrollment: any status other than `Enrolled` fails
/// with `AlreadyFinalized` and the stored status is unchanged. The final
/// grade must be resolved. Returns the updated record; persisting it is
/// the caller's single-writer responsibility.
pub fn finalize_enrollment(
    enrollment: &Enrollment,
    final_grade: Score,
) -> Result<Enrollment, AcademicError> {
    if !enrollment.is_open() {
        return Err(AcademicError::AlreadyFinalized {
            enrollment: enrollment.id,
            status: enrollment.status,
        });
    }

    let Some(value) = final_grade.resolved() else {
        return Err(AcademicError::UnresolvedFinalGrade(enrollment.id));
    };
    let value = validated(value)?;

    let mut updated = enrollment.clone();
    updated.status = if value >= APPROVAL_THRESHOLD {
        EnrollmentStatus::Approved
    } else {
        EnrollmentStatus::Failed
    };
    Ok(updated)
}

/// Explicit withdrawal from an open enrollment.
///
/// Records the withdrawal date; only valid from `Enrolled`.
pub fn withdraw(enrollment: &Enrollment, on: NaiveDate) -> Result<Enrollment, AcademicError> {
    if !enrollment.is_open() {
        return Err(AcademicError::NotEnrolled {
            enrollment: enrollment.id,
            status: enrollment.status,
        });
    }

    let mut updated = enrollment.clone();
    updated.status = EnrollmentStatus::Withdrawn;
    updated.withdrawn_on = Some(on);
    Ok(updated)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CourseId, CutId, PeriodId, StudentId, SubjectId, Weight};

    fn cut(id: u32, code: &str, percent: u32) -> Cut {
        Cut {
            id: CutId(id),
            course: CourseId(1),
            code: code.to_string(),
            weight: Weight::from_percent(percent),
        }
    }

    fn component(id: u32, cut: u32, percent: u32) -> Component {
        Component {
            id: ComponentId(id),
            cut: CutId(cut),
            name: format!("Component {id}"),
            weight: Weight::from_percent(percent),
            description: None,
        }
    }

    fn course() -> Course {
        Course {
            id: CourseId(1),
            subject: SubjectId(1),
            period: PeriodId(1),
            section: "A".to_string(),
            max_seats: 30,
        }
    }

    /// The institutional four-cut layout: C1 30, C2 30, C3_NOTAS 20,
    /// C3_INTEGRADOR 20, one full-weight component each.
    fn four_cut_plan() -> EvaluationPlan {
        EvaluationPlan {
            course: course(),
            cuts: vec![
                CutPlan {
                    cut: cut(1, "C1", 30),
                    components: vec![component(11, 1, 100)],
                },
                CutPlan {
                    cut: cut(2, "C2", 30),
                    components: vec![component(21, 2, 100)],
                },
                CutPlan {
                    cut: cut(3, "C3_NOTAS", 20),
                    components: vec![component(31, 3, 100)],
                },
                CutPlan {
                    cut: cut(4, "C3_INTEGRADOR", 20),
                    components: vec![component(41, 4, 100)],
                },
            ],
        }
    }

    fn grade(component: u32, centi: u16) -> Grade {
        Grade {
            enrollment: crate::EnrollmentId(1),
            component: ComponentId(component),
            value: GradeValue::from_centi(centi),
            published: true,
            recorded_by: "prof".to_string(),
            recorded_at: chrono::NaiveDateTime::default(),
        }
    }

    fn enrollment() -> Enrollment {
        Enrollment::new(
            crate::EnrollmentId(1),
            StudentId::new("s-1"),
            CourseId(1),
            NaiveDate::default(),
        )
    }

    #[test]
    fn weighted_sum_matches_direct_arithmetic() {
        // 0.3*4.0 + 0.3*3.0 + 0.2*5.0 + 0.2*2.0 = 3.5
        let grades = vec![
            grade(11, 400),
            grade(21, 300),
            grade(31, 500),
            grade(41, 200),
        ];
        let score = compute_course_grade(&four_cut_plan(), &grades).expect("compute");

        assert_eq!(score, Score::Resolved(GradeValue::from_centi(350)));
        assert_eq!(score.decision(), Some(Decision::Approved));
    }

    #[test]
    fn missing_component_grade_propagates_pending() {
        // C2 ungraded: the final grade is pending, not a partial number.
        let grades = vec![grade(11, 400), grade(31, 500), grade(41, 200)];
        let score = compute_course_grade(&four_cut_plan(), &grades).expect("compute");

        assert_eq!(score, Score::Pending);
        assert_eq!(score.decision(), None);
    }

    #[test]
    fn cut_score_rounds_half_up() {
        // Two components at 50%: 4.00 and 3.99 average to 3.995, which
        // rounds half-up to 4.00, not down to 3.99.
        let plan = CutPlan {
            cut: cut(1, "C1", 100),
            components: vec![component(1, 1, 50), component(2, 1, 50)],
        };
        let grades: BTreeMap<ComponentId, GradeValue> = [
            (ComponentId(1), GradeValue::from_centi(400)),
            (ComponentId(2), GradeValue::from_centi(399)),
        ]
        .into_iter()
        .collect();

        let score = cut_score(&plan, &grades).expect("compute");
        assert_eq!(score, Score::Resolved(GradeValue::from_centi(400)));
    }

    #[test]
    fn component_weights_must_total_100() {
        let plan = CutPlan {
            cut: cut(1, "C1", 100),
            components: vec![component(1, 1, 40), component(2, 1, 50)],
        };
        let err = cut_score(&plan, &BTreeMap::new()).expect_err("bad weighting");
        assert!(matches!(
            err,
            AcademicError::InvalidWeighting {
                scope: WeightScope::Cut(CutId(1)),
                ..
            }
        ));
    }

    #[test]
    fn cut_weights_must_total_100() {
        let mut plan = four_cut_plan();
        plan.cuts.pop();
        let err = compute_course_grade(&plan, &[]).expect_err("bad weighting");
        assert!(matches!(
            err,
            AcademicError::InvalidWeighting {
                scope: WeightScope::Course(CourseId(1)),
                ..
            }
        ));
    }

    #[test]
    fn weight_tolerance_accepts_rounding_residue() {
        // 33.33 + 33.33 + 33.34 = 100.00; 33.33 * 3 = 99.99 is inside the
        // 0.01 tolerance as well.
        let plan = CutPlan {
            cut: cut(1, "C1", 100),
            components: vec![
                Component {
                    weight: Weight::parse("33.33").expect("parse"),
                    ..component(1, 1, 0)
                },
                Component {
                    weight: Weight::parse("33.33").expect("parse"),
                    ..component(2, 1, 0)
                },
                Component {
                    weight: Weight::parse("33.33").expect("parse"),
                    ..component(3, 1, 0)
                },
            ],
        };
        let grades: BTreeMap<ComponentId, GradeValue> = [
            (ComponentId(1), GradeValue::from_centi(300)),
            (ComponentId(2), GradeValue::from_centi(300)),
            (ComponentId(3), GradeValue::from_centi(300)),
        ]
        .into_iter()
        .collect();

        let score = cut_score(&plan, &grades).expect("inside tolerance");
        // 3.00 * 99.99% rounds back to 3.00.
        assert_eq!(score, Score::Resolved(GradeValue::from_centi(300)));
    }

    #[test]
    fn out_of_scale_grade_rejected_not_clamped() {
        let grades = vec![
            grade(11, 501),
            grade(21, 300),
            grade(31, 500),
            grade(41, 200),
        ];
        let err = compute_course_grade(&four_cut_plan(), &grades).expect_err("out of range");
        assert!(matches!(
            err,
            AcademicError::GradeOutOfRange { centi: 501 }
        ));
    }

    #[test]
    fn approval_boundary() {
        let resolved = |centi: u16| Score::Resolved(GradeValue::from_centi(centi));
        assert_eq!(resolved(300).decision(), Some(Decision::Approved));
        assert_eq!(resolved(299).decision(), Some(Decision::Failed));
        assert_eq!(resolved(500).decision(), Some(Decision::Approved));
    }

    #[test]
    fn finalize_transitions_once() {
        let open = enrollment();
        let passed = finalize_enrollment(&open, Score::Resolved(GradeValue::from_centi(350)))
            .expect("first finalize");
        assert_eq!(passed.status, EnrollmentStatus::Approved);

        // Second call on the now-terminal record fails, status untouched.
        let err = finalize_enrollment(&passed, Score::Resolved(GradeValue::from_centi(350)))
            .expect_err("second finalize");
        assert!(matches!(
            err,
            AcademicError::AlreadyFinalized {
                status: EnrollmentStatus::Approved,
                ..
            }
        ));
    }

    #[test]
    fn finalize_below_threshold_fails_course() {
        let closed = finalize_enrollment(&enrollment(), Score::Resolved(GradeValue::from_centi(299)))
            .expect("finalize");
        assert_eq!(closed.status, EnrollmentStatus::Failed);
    }

    #[test]
    fn finalize_rejects_pending_grade() {
        let err = finalize_enrollment(&enrollment(), Score::Pending).expect_err("pending");
        assert!(matches!(err, AcademicError::UnresolvedFinalGrade(_)));
    }

    #[test]
    fn withdraw_records_date_and_blocks_finalize() {
        let on = NaiveDate::from_ymd_opt(2025, 9, 30).expect("date");
        let withdrawn = withdraw(&enrollment(), on).expect("withdraw");
        assert_eq!(withdrawn.status, EnrollmentStatus::Withdrawn);
        assert_eq!(withdrawn.withdrawn_on, Some(on));

        let err = withdraw(&withdrawn, on).expect_err("twice");
        assert!(matches!(err, AcademicError::NotEnrolled { .. }));

        let err = finalize_enrollment(&withdrawn, Score::Resolved(GradeValue::from_centi(400)))
            .expect_err("finalize withdrawn");
        assert!(matches!(err, AcademicError::AlreadyFinalized { .. }));
    }
}
