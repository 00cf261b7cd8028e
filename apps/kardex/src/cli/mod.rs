//! # Kardex CLI Module
//!
//! This module implements the CLI interface for Kardex.
//!
//! ## Available Commands
//!
//! - `init` - Initialize a record database from a catalog file
//! - `validate` - Validate a catalog file without touching the database
//! - `status` - Show database status
//! - `order` - Print the curriculum in topological order
//! - `check` - Check a student's eligibility for a subject
//! - `enroll` - Enroll a student in a course offering
//! - `withdraw` - Withdraw an open enrollment
//! - `grade` - Record a component grade
//! - `record-attendance` - Record attendance for a class session
//! - `attendance` - Summarize attendance for an enrollment
//! - `finalize` - Compute the final grade and close an enrollment
//! - `export` - Export the stored catalog as a binary snapshot

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use kardex_core::AcademicError;
use std::path::PathBuf;

pub use commands::*;

use crate::config::AppConfig;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Kardex - Academic Records Engine
///
/// Curriculum graph, weighted grading, attendance, and prerequisite
/// eligibility over an embedded record database.
#[derive(Parser, Debug)]
#[command(name = "kardex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the record database (overrides kardex.toml)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a record database from a catalog file
    Init {
        /// Catalog file (.toml, .json, or .krdx)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Overwrite an existing database
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a catalog file (cycle check, weight sums, references)
    Validate {
        /// Catalog file (.toml, .json, or .krdx)
        #[arg(short, long)]
        catalog: PathBuf,
    },

    /// Show database status
    Status,

    /// Print the curriculum in topological order (prerequisites first)
    Order {
        /// Read the catalog from a file instead of the database
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Check a student's eligibility for a subject
    Check {
        /// Student identifier
        #[arg(short, long)]
        student: String,

        /// Subject code (e.g. "BD201")
        #[arg(long)]
        subject: String,

        /// Require the full prerequisite chain, not only direct edges
        #[arg(short, long)]
        transitive: bool,
    },

    /// Enroll a student in a course offering
    Enroll {
        /// Student identifier
        #[arg(short, long)]
        student: String,

        /// Course offering identifier
        #[arg(short, long)]
        course: u32,

        /// Enrollment date (defaults to today)
        #[arg(long)]
        on: Option<NaiveDate>,

        /// Require the full prerequisite chain, not only direct edges
        #[arg(short, long)]
        transitive: bool,
    },

    /// Withdraw an open enrollment
    Withdraw {
        /// Enrollment identifier
        #[arg(short, long)]
        enrollment: u32,

        /// Withdrawal date (defaults to today)
        #[arg(long)]
        on: Option<NaiveDate>,
    },

    /// Record (or correct) a component grade
    Grade {
        /// Enrollment identifier
        #[arg(short, long)]
        enrollment: u32,

        /// Component identifier
        #[arg(short, long)]
        component: u32,

        /// Grade on the 0.00..=5.00 scale, e.g. "3.75"
        #[arg(short = 'g', long)]
        value: String,

        /// Recording user
        #[arg(long, default_value = "cli")]
        by: String,
    },

    /// Record (or correct) attendance for a class session
    RecordAttendance {
        /// Enrollment identifier
        #[arg(short, long)]
        enrollment: u32,

        /// Class session identifier
        #[arg(short, long)]
        session: u32,

        /// present, absent, late, or excused
        #[arg(long)]
        status: String,

        /// Recording user
        #[arg(long, default_value = "cli")]
        by: String,
    },

    /// Summarize attendance for an enrollment
    Attendance {
        /// Enrollment identifier
        #[arg(short, long)]
        enrollment: u32,
    },

    /// Compute the final grade and close an enrollment
    Finalize {
        /// Enrollment identifier
        #[arg(short, long)]
        enrollment: u32,

        /// Reference date for the period-ended check (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Export the stored catalog as a binary snapshot
    Export {
        /// Output file path (.krdx)
        #[arg(short, long)]
        output: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), AcademicError> {
    let config = AppConfig::load()?;
    let database = config.database_path(cli.database);
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Init { catalog, force }) => cmd_init(&database, &catalog, force),
        Some(Commands::Validate { catalog }) => cmd_validate(&catalog, json_mode),
        Some(Commands::Status) => cmd_status(&database, json_mode),
        Some(Commands::Order { catalog }) => {
            cmd_order(&database, catalog.as_deref(), json_mode)
        }
        Some(Commands::Check {
            student,
            subject,
            transitive,
        }) => cmd_check(&database, &student, &subject, transitive, json_mode),
        Some(Commands::Enroll {
            student,
            course,
            on,
            transitive,
        }) => cmd_enroll(&database, &student, course, on, transitive, json_mode),
        Some(Commands::Withdraw { enrollment, on }) => {
            cmd_withdraw(&database, enrollment, on, json_mode)
        }
        Some(Commands::Grade {
            enrollment,
            component,
            value,
            by,
        }) => cmd_grade(&database, enrollment, component, &value, &by, json_mode),
        Some(Commands::RecordAttendance {
            enrollment,
            session,
            status,
            by,
        }) => cmd_record_attendance(&database, enrollment, session, &status, &by, json_mode),
        Some(Commands::Attendance { enrollment }) => {
            cmd_attendance(&database, enrollment, json_mode)
        }
        Some(Commands::Finalize { enrollment, today }) => {
            cmd_finalize(&database, enrollment, today, json_mode)
        }
        Some(Commands::Export { output }) => cmd_export(&database, &output),
        None => {
            // No subcommand - show status by default
            cmd_status(&database, json_mode)
        }
    }
}
