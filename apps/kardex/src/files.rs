//! # Catalog Files
//!
//! Loading catalog data from files into the core `Catalog` snapshot.
//!
//! Two text formats (TOML and JSON) share one schema with human-friendly
//! decimal strings for weights ("30", "33.33"); the binary `.krdx`
//! snapshot is the core persistence format. Which parser runs is decided
//! by file extension.

use chrono::NaiveDate;
use kardex_core::{
    AcademicError, AcademicPeriod, Catalog, ClassSession, ClassSessionId, Component, ComponentId,
    Course, CourseId, Cut, CutId, PeriodId, PeriodStatus, Prerequisite, Program, ProgramId,
    ProgramLevel, Subject, SubjectCode, SubjectId, Weight, catalog_from_bytes, catalog_to_bytes,
};
use serde::Deserialize;
use std::path::Path;

/// Maximum catalog file size (16 MB), checked before reading.
pub const MAX_CATALOG_FILE_SIZE: u64 = 16 * 1024 * 1024;

// =============================================================================
// FILE SCHEMA
// =============================================================================

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramEntry {
    pub id: u32,
    pub name: String,
    /// "technical", "technological", "professional", or "postgraduate".
    pub level: String,
    pub semesters: u8,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectEntry {
    pub id: u32,
    pub program: u32,
    pub code: String,
    pub name: String,
    pub credits: u8,
    pub weekly_hours: u8,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrerequisiteEntry {
    pub subject: u32,
    pub requires: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodEntry {
    pub id: u32,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    /// "planned", "active", or "closed" (case-insensitive).
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourseEntry {
    pub id: u32,
    pub subject: u32,
    pub period: u32,
    pub section: String,
    pub max_seats: u16,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CutEntry {
    pub id: u32,
    pub course: u32,
    pub code: String,
    /// Decimal percent string, e.g. "30" or "33.33".
    pub weight: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentEntry {
    pub id: u32,
    pub cut: u32,
    pub name: String,
    /// Decimal percent string, e.g. "40".
    pub weight: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionEntry {
    pub id: u32,
    pub course: u32,
    pub number: u16,
    pub date: NaiveDate,
    #[serde(default)]
    pub topic: Option<String>,
}

/// The on-disk catalog schema.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub programs: Vec<ProgramEntry>,
    #[serde(default)]
    pub subjects: Vec<SubjectEntry>,
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteEntry>,
    #[serde(default)]
    pub periods: Vec<PeriodEntry>,
    #[serde(default)]
    pub courses: Vec<CourseEntry>,
    #[serde(default)]
    pub cuts: Vec<CutEntry>,
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
    #[serde(default)]
    pub sessions: Vec<SessionEntry>,
}

fn parse_program_level(s: &str) -> Result<ProgramLevel, AcademicError> {
    match s.to_ascii_lowercase().as_str() {
        "technical" => Ok(ProgramLevel::Technical),
        "technological" => Ok(ProgramLevel::Technological),
        "professional" => Ok(ProgramLevel::Professional),
        "postgraduate" => Ok(ProgramLevel::Postgraduate),
        other => Err(AcademicError::InvalidCatalog(format!(
            "unknown program level '{other}' (expected technical, technological, professional, or postgraduate)"
        ))),
    }
}

fn parse_period_status(s: &str) -> Result<PeriodStatus, AcademicError> {
    match s.to_ascii_lowercase().as_str() {
        "planned" => Ok(PeriodStatus::Planned),
        "active" => Ok(PeriodStatus::Active),
        "closed" => Ok(PeriodStatus::Closed),
        other => Err(AcademicError::InvalidCatalog(format!(
            "unknown period status '{other}' (expected planned, active, or closed)"
        ))),
    }
}

impl CatalogFile {
    /// Convert the file schema into the core snapshot, parsing decimal
    /// weights and status names. Catalog invariants are NOT checked here;
    /// `Catalog::validate` is the single gate for those.
    pub fn into_catalog(self) -> Result<Catalog, AcademicError> {
        Ok(Catalog {
            programs: self
                .programs
                .into_iter()
                .map(|p| {
                    Ok(Program {
                        id: ProgramId(p.id),
                        name: p.name,
                        level: parse_program_level(&p.level)?,
                        semesters: p.semesters,
                        active: p.active,
                    })
                })
                .collect::<Result<_, AcademicError>>()?,
            subjects: self
                .subjects
                .into_iter()
                .map(|s| Subject {
                    id: SubjectId(s.id),
                    program: ProgramId(s.program),
                    code: SubjectCode::new(s.code),
                    name: s.name,
                    credits: s.credits,
                    weekly_hours: s.weekly_hours,
                    active: s.active,
                })
                .collect(),
            prerequisites: self
                .prerequisites
                .into_iter()
                .map(|p| Prerequisite {
                    subject: SubjectId(p.subject),
                    requires: SubjectId(p.requires),
                })
                .collect(),
            periods: self
                .periods
                .into_iter()
                .map(|p| {
                    Ok(AcademicPeriod {
                        id: PeriodId(p.id),
                        name: p.name,
                        starts_on: p.starts_on,
                        ends_on: p.ends_on,
                        status: parse_period_status(&p.status)?,
                    })
                })
                .collect::<Result<_, AcademicError>>()?,
            courses: self
                .courses
                .into_iter()
                .map(|c| Course {
                    id: CourseId(c.id),
                    subject: SubjectId(c.subject),
                    period: PeriodId(c.period),
                    section: c.section,
                    max_seats: c.max_seats,
                })
                .collect(),
            cuts: self
                .cuts
                .into_iter()
                .map(|c| {
                    Ok(Cut {
                        id: CutId(c.id),
                        course: CourseId(c.course),
                        code: c.code,
                        weight: Weight::parse(&c.weight)?,
                    })
                })
                .collect::<Result<_, AcademicError>>()?,
            components: self
                .components
                .into_iter()
                .map(|c| {
                    Ok(Component {
                        id: ComponentId(c.id),
                        cut: CutId(c.cut),
                        name: c.name,
                        weight: Weight::parse(&c.weight)?,
                        description: c.description,
                    })
                })
                .collect::<Result<_, AcademicError>>()?,
            sessions: self
                .sessions
                .into_iter()
                .map(|s| ClassSession {
                    id: ClassSessionId(s.id),
                    course: CourseId(s.course),
                    number: s.number,
                    date: s.date,
                    topic: s.topic,
                })
                .collect(),
        })
    }
}

// =============================================================================
// FILE I/O
// =============================================================================

/// Load a catalog from a file, dispatching on extension:
/// `.toml`, `.json`, or `.krdx` (binary snapshot).
///
/// The file size is bounded before reading; the binary format validates
/// catalog invariants on decode, the text formats leave that to the
/// caller's `Catalog::validate` gate.
pub fn load_catalog(path: &Path) -> Result<Catalog, AcademicError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| AcademicError::IoError(format!("cannot read {}: {e}", path.display())))?;
    if metadata.len() > MAX_CATALOG_FILE_SIZE {
        return Err(AcademicError::SerializationError(format!(
            "catalog file {} is {} bytes, over the {} byte cap",
            path.display(),
            metadata.len(),
            MAX_CATALOG_FILE_SIZE
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "toml" => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                AcademicError::IoError(format!("cannot read {}: {e}", path.display()))
            })?;
            let file: CatalogFile = toml::from_str(&text)
                .map_err(|e| AcademicError::SerializationError(e.to_string()))?;
            file.into_catalog()
        }
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                AcademicError::IoError(format!("cannot read {}: {e}", path.display()))
            })?;
            let file: CatalogFile = serde_json::from_str(&text)
                .map_err(|e| AcademicError::SerializationError(e.to_string()))?;
            file.into_catalog()
        }
        "krdx" => {
            let bytes = std::fs::read(path).map_err(|e| {
                AcademicError::IoError(format!("cannot read {}: {e}", path.display()))
            })?;
            catalog_from_bytes(&bytes)
        }
        other => Err(AcademicError::SerializationError(format!(
            "unsupported catalog format '.{other}' (expected .toml, .json, or .krdx)"
        ))),
    }
}

/// Write a catalog as a binary `.krdx` snapshot.
pub fn write_snapshot(path: &Path, catalog: &Catalog) -> Result<(), AcademicError> {
    let bytes = catalog_to_bytes(catalog)?;
    std::fs::write(path, bytes)
        .map_err(|e| AcademicError::IoError(format!("cannot write {}: {e}", path.display())))
}

// =============================================================================
// TESTS
// =============================================================================
