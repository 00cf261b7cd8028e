//! # Attendance Summarizer
//!
//! Per-enrollment attendance counts, percentage, and minimum check.
//!
//! Policy (fixed, not configurable): excused sessions count toward the
//! total but not toward the attended numerator; present and late both
//! count as attended. Percentage is per-mille fixed-point (one decimal),
//! round-half-up.

use serde::{Deserialize, Serialize};

use crate::primitives::{MIN_ATTENDANCE_PER_MILLE, div_round_half_up};
use crate::{AcademicError, AttendanceRecord, AttendanceStatus, EnrollmentId};

/// Aggregated attendance for one enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub enrollment: EnrollmentId,
    pub total: u32,
    pub present: u32,
    pub absent: u32,
    pub late: u32,
    pub excused: u32,
    /// (present + late) / total, in per-mille (900 = 90.0%).
    pub per_mille: u16,
}

impl AttendanceSummary {
    /// Percentage split into whole and tenth digits, for display.
    #[must_use]
    pub const fn percentage_parts(&self) -> (u16, u16) {
        (self.per_mille / 10, self.per_mille % 10)
    }
}

impl std::fmt::Display for AttendanceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (whole, tenth) = self.percentage_parts();
        write!(
            f,
            "{}/{} attended ({}.{}%)",
            self.present + self.late,
            self.total,
            whole,
            tenth
        )
    }
}

/// Summarize the attendance records of one enrollment.
///
/// Records belonging to other enrollments are ignored. Fails with
/// `NoRecords` when nothing remains to summarize; the caller decides
/// whether that means "not yet applicable".
pub fn summarize(
    enrollment: EnrollmentId,
    records: &[AttendanceRecord],
) -> Result<AttendanceSummary, AcademicError> {
    let mut summary = AttendanceSummary {
        enrollment,
        total: 0,
        present: 0,
        absent: 0,
        late: 0,
        excused: 0,
        per_mille: 0,
    };

    for record in records.iter().filter(|r| r.enrollment == enrollment) {
        summary.total += 1;
        match record.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Absent => summary.absent += 1,
            AttendanceStatus::Late => summary.late += 1,
            AttendanceStatus::Excused => summary.excused += 1,
        }
    }

    if summary.total == 0 {
        return Err(AcademicError::NoRecords(enrollment));
    }

    let attended = u64::from(summary.present) + u64::from(summary.late);
    summary.per_mille =
        div_round_half_up(attended * 1000, u64::from(summary.total)) as u16;
    Ok(summary)
}

/// Whether the summary meets the institutional attendance minimum (80.0%).
#[must_use]
pub const fn meets_minimum(summary: &AttendanceSummary) -> bool {
    summary.per_mille >= MIN_ATTENDANCE_PER_MILLE
}

// =============================================================================
// TESTS
// =============================================================================
