//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use chrono::{Local, NaiveDate, NaiveDateTime};
use kardex_core::{
    AcademicError, AttendanceStatus, ClassSessionId, ComponentId, CourseId, Eligibility,
    EligibilityOptions, EnrollmentId, EnrollmentStatus, GradeValue, RecordStore, Registrar,
    StoreBackend, StudentId, SubjectCode, SubjectId, meets_minimum,
};
use std::collections::BTreeMap;
use std::path::Path;

use crate::files;

// =============================================================================
// HELPERS
// =============================================================================

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Open the persistent registrar at the database path.
fn open_registrar(database: &Path) -> Result<Registrar, AcademicError> {
    if !database.exists() {
        return Err(AcademicError::IoError(format!(
            "database {} does not exist (run `kardex init` first)",
            database.display()
        )));
    }
    Registrar::open_redb(database)
}

/// Open from the database, or run in-memory over a catalog file for
/// read-only commands.
fn load_registrar(
    database: &Path,
    catalog: Option<&Path>,
) -> Result<Registrar, AcademicError> {
    match catalog {
        Some(path) => {
            Registrar::initialize(StoreBackend::default(), files::load_catalog(path)?)
        }
        None => open_registrar(database),
    }
}

fn subject_by_code(reg: &Registrar, code: &str) -> Result<SubjectId, AcademicError> {
    reg.graph()
        .subject_by_code(code)
        .map(|s| s.id)
        .ok_or_else(|| AcademicError::InvalidInput(format!("unknown subject code '{code}'")))
}

fn parse_attendance_status(s: &str) -> Result<AttendanceStatus, AcademicError> {
    match s.to_ascii_lowercase().as_str() {
        "present" => Ok(AttendanceStatus::Present),
        "absent" => Ok(AttendanceStatus::Absent),
        "late" => Ok(AttendanceStatus::Late),
        "excused" => Ok(AttendanceStatus::Excused),
        other => Err(AcademicError::InvalidInput(format!(
            "unknown attendance status '{other}' (expected present, absent, late, or excused)"
        ))),
    }
}

fn options(transitive: bool) -> EligibilityOptions {
    if transitive {
        EligibilityOptions::full_chain()
    } else {
        EligibilityOptions::direct()
    }
}

// =============================================================================
// INIT & VALIDATE
// =============================================================================

/// Initialize a record database from a catalog file.
pub fn cmd_init(database: &Path, catalog: &Path, force: bool) -> Result<(), AcademicError> {
    if database.exists() {
        if !force {
            return Err(AcademicError::IoError(format!(
                "database {} already exists (use --force to overwrite)",
                database.display()
            )));
        }
        std::fs::remove_file(database)
            .map_err(|e| AcademicError::IoError(format!("cannot remove old database: {e}")))?;
    }

    let snapshot = files::load_catalog(catalog)?;
    let backend = StoreBackend::Persistent(kardex_core::RedbStore::open(database)?);
    let reg = Registrar::initialize(backend, snapshot)?;

    tracing::info!(
        database = %database.display(),
        subjects = reg.graph().subject_count(),
        "database initialized"
    );
    println!(
        "Initialized {} ({} subjects, {} prerequisite edges, {} courses)",
        database.display(),
        reg.graph().subject_count(),
        reg.graph().edge_count(),
        reg.catalog().courses.len()
    );
    Ok(())
}

/// Validate a catalog file without touching any database.
pub fn cmd_validate(catalog: &Path, json_mode: bool) -> Result<(), AcademicError> {
    let snapshot = files::load_catalog(catalog)?;
    snapshot.validate()?;
    let graph = snapshot.build_graph()?;

    if json_mode {
        let output = serde_json::json!({
            "valid": true,
            "subjects": graph.subject_count(),
            "prerequisite_edges": graph.edge_count(),
            "courses": snapshot.courses.len(),
            "cuts": snapshot.cuts.len(),
            "components": snapshot.components.len(),
        });
        println!("{output}");
    } else {
        println!("Catalog {} is valid", catalog.display());
        println!("  Subjects:  {}", graph.subject_count());
        println!("  Edges:     {}", graph.edge_count());
        println!("  Courses:   {}", snapshot.courses.len());
        println!("  Cuts:      {}", snapshot.cuts.len());
        println!("  Components: {}", snapshot.components.len());
    }
    Ok(())
}

// =============================================================================
// STATUS & ORDER
// =============================================================================

/// Show database status.
pub fn cmd_status(database: &Path, json_mode: bool) -> Result<(), AcademicError> {
    let reg = open_registrar(database)?;
    let enrollments = reg.store().enrollments()?;

    let mut by_status: BTreeMap<EnrollmentStatus, usize> = BTreeMap::new();
    for enrollment in &enrollments {
        *by_status.entry(enrollment.status).or_default() += 1;
    }

    if json_mode {
        let statuses: BTreeMap<String, usize> = by_status
            .iter()
            .map(|(status, count)| (status.label().to_string(), *count))
            .collect();
        let output = serde_json::json!({
            "database": database.to_string_lossy(),
            "subjects": reg.graph().subject_count(),
            "prerequisite_edges": reg.graph().edge_count(),
            "courses": reg.catalog().courses.len(),
            "enrollments": enrollments.len(),
            "enrollments_by_status": statuses,
        });
        println!("{output}");
    } else {
        println!("Database: {}", database.display());
        println!("  Subjects:    {}", reg.graph().subject_count());
        println!("  Edges:       {}", reg.graph().edge_count());
        println!("  Courses:     {}", reg.catalog().courses.len());
        println!("  Enrollments: {}", enrollments.len());
        for (status, count) in &by_status {
            println!("    {status}: {count}");
        }
    }
    Ok(())
}

/// Print the curriculum in topological order (prerequisites first).
pub fn cmd_order(
    database: &Path,
    catalog: Option<&Path>,
    json_mode: bool,
) -> Result<(), AcademicError> {
    let reg = load_registrar(database, catalog)?;
    let graph = reg.graph();
    let order = graph.topological_order();

    if json_mode {
        let codes: Vec<&str> = order
            .iter()
            .filter_map(|&id| graph.subject(id))
            .map(|s| s.code.as_str())
            .collect();
        println!("{}", serde_json::json!({ "order": codes }));
    } else {
        for (position, id) in order.iter().enumerate() {
            if let Some(subject) = graph.subject(*id) {
                println!("{:>3}. {}  {}", position + 1, subject.code, subject.name);
            }
        }
    }
    Ok(())
}

// =============================================================================
// ELIGIBILITY & ENROLLMENT
// =============================================================================

/// Check a student's eligibility for a subject.
pub fn cmd_check(
    database: &Path,
    student: &str,
    subject: &str,
    transitive: bool,
    json_mode: bool,
) -> Result<(), AcademicError> {
    let reg = open_registrar(database)?;
    let subject_id = subject_by_code(&reg, subject)?;
    let verdict = reg.eligibility(
        &StudentId::new(student),
        subject_id,
        options(transitive),
    )?;

    if json_mode {
        let output = match &verdict {
            Eligibility::Eligible => serde_json::json!({ "eligible": true }),
            Eligibility::Ineligible { missing } => serde_json::json!({
                "eligible": false,
                "missing": missing.iter().map(SubjectCode::as_str).collect::<Vec<_>>(),
            }),
        };
        println!("{output}");
    } else {
        println!("{student} -> {subject}: {verdict}");
    }
    Ok(())
}

/// Enroll a student in a course offering.
pub fn cmd_enroll(
    database: &Path,
    student: &str,
    course: u32,
    on: Option<NaiveDate>,
    transitive: bool,
    json_mode: bool,
) -> Result<(), AcademicError> {
    let mut reg = open_registrar(database)?;
    let enrollment = reg.enroll(
        StudentId::new(student),
        CourseId(course),
        today_or(on),
        options(transitive),
    )?;

    tracing::info!(enrollment = enrollment.id.0, student, course, "enrolled");
    if json_mode {
        let output = serde_json::json!({
            "enrollment": enrollment.id.0,
            "status": enrollment.status.label(),
            "enrolled_on": enrollment.enrolled_on.to_string(),
        });
        println!("{output}");
    } else {
        println!(
            "Enrollment {} created for {student} in course {course} ({})",
            enrollment.id.0, enrollment.enrolled_on
        );
    }
    Ok(())
}

/// Withdraw an open enrollment.
pub fn cmd_withdraw(
    database: &Path,
    enrollment: u32,
    on: Option<NaiveDate>,
    json_mode: bool,
) -> Result<(), AcademicError> {
    let mut reg = open_registrar(database)?;
    let updated = reg.withdraw(EnrollmentId(enrollment), today_or(on))?;

    tracing::info!(enrollment, "withdrawn");
    if json_mode {
        let output = serde_json::json!({
            "enrollment": updated.id.0,
            "status": updated.status.label(),
        });
        println!("{output}");
    } else {
        println!("Enrollment {} is now {}", updated.id.0, updated.status);
    }
    Ok(())
}

// =============================================================================
// GRADING
// =============================================================================

/// Record (or correct) a component grade.
pub fn cmd_grade(
    database: &Path,
    enrollment: u32,
    component: u32,
    value: &str,
    by: &str,
    json_mode: bool,
) -> Result<(), AcademicError> {
    let mut reg = open_registrar(database)?;
    let grade = reg.record_grade(
        EnrollmentId(enrollment),
        ComponentId(component),
        GradeValue::parse(value)?,
        by,
        now(),
    )?;
    let score = reg.final_grade(EnrollmentId(enrollment))?;

    tracing::info!(enrollment, component, value, "grade recorded");
    if json_mode {
        let output = serde_json::json!({
            "enrollment": enrollment,
            "component": component,
            "value": grade.value.to_string(),
            "final_grade": score.to_string(),
        });
        println!("{output}");
    } else {
        println!(
            "Recorded {} for component {component}; final grade is {score}",
            grade.value
        );
    }
    Ok(())
}

/// Compute the final grade and close an enrollment.
pub fn cmd_finalize(
    database: &Path,
    enrollment: u32,
    today: Option<NaiveDate>,
    json_mode: bool,
) -> Result<(), AcademicError> {
    let mut reg = open_registrar(database)?;
    let (closed, score) = reg.close_enrollment(EnrollmentId(enrollment), today_or(today))?;

    tracing::info!(enrollment, status = %closed.status, "enrollment closed");
    if json_mode {
        let output = serde_json::json!({
            "enrollment": closed.id.0,
            "status": closed.status.label(),
            "final_grade": score.to_string(),
        });
        println!("{output}");
    } else {
        println!(
            "Enrollment {} closed: final grade {score}, status {}",
            closed.id.0, closed.status
        );
    }
    Ok(())
}

// =============================================================================
// ATTENDANCE
// =============================================================================

/// Record (or correct) attendance for a class session.
pub fn cmd_record_attendance(
    database: &Path,
    enrollment: u32,
    session: u32,
    status: &str,
    by: &str,
    json_mode: bool,
) -> Result<(), AcademicError> {
    let mut reg = open_registrar(database)?;
    let record = reg.record_attendance(
        EnrollmentId(enrollment),
        ClassSessionId(session),
        parse_attendance_status(status)?,
        by,
    )?;

    tracing::info!(enrollment, session, status, "attendance recorded");
    if json_mode {
        let output = serde_json::json!({
            "enrollment": record.enrollment.0,
            "session": record.session.0,
            "status": status.to_ascii_lowercase(),
        });
        println!("{output}");
    } else {
        println!("Attendance recorded for session {session}");
    }
    Ok(())
}

/// Summarize attendance for an enrollment.
pub fn cmd_attendance(
    database: &Path,
    enrollment: u32,
    json_mode: bool,
) -> Result<(), AcademicError> {
    let reg = open_registrar(database)?;
    let summary = reg.attendance_summary(EnrollmentId(enrollment))?;
    let (whole, tenth) = summary.percentage_parts();

    if json_mode {
        let output = serde_json::json!({
            "enrollment": summary.enrollment.0,
            "total": summary.total,
            "present": summary.present,
            "absent": summary.absent,
            "late": summary.late,
            "excused": summary.excused,
            "percentage": format!("{whole}.{tenth}"),
            "meets_minimum": meets_minimum(&summary),
        });
        println!("{output}");
    } else {
        println!("Enrollment {}: {summary}", summary.enrollment.0);
        println!(
            "  present {} / absent {} / late {} / excused {}",
            summary.present, summary.absent, summary.late, summary.excused
        );
        println!(
            "  minimum (80.0%): {}",
            if meets_minimum(&summary) { "met" } else { "NOT met" }
        );
    }
    Ok(())
}

// =============================================================================
// EXPORT
// =============================================================================

/// Export the stored catalog as a binary snapshot.
pub fn cmd_export(database: &Path, output: &Path) -> Result<(), AcademicError> {
    let reg = open_registrar(database)?;
    files::write_snapshot(output, reg.catalog())?;
    println!("Catalog exported to {}", output.display());
    Ok(())
}
