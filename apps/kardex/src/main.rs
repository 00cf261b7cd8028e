//! # Kardex - Academic Records Engine
//!
//! The main binary for the Kardex academic records system.
//!
//! This application provides:
//! - CLI interface for catalog, enrollment, grading, and attendance
//! - Catalog file loading (TOML / JSON / binary snapshot)
//! - An embedded record database (redb)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                apps/kardex (THE BINARY)          │
//! │                                                  │
//! │  ┌─────────────┐   ┌──────────────────────────┐ │
//! │  │   CLI       │   │  Catalog files           │ │
//! │  │  (clap)     │   │  (toml / json / krdx)    │ │
//! │  └──────┬──────┘   └────────────┬─────────────┘ │
//! │         │                       │               │
//! │         └───────────┬───────────┘               │
//! │                     ▼                           │
//! │             ┌───────────────┐                   │
//! │             │  kardex-core  │                   │
//! │             │  (THE LOGIC)  │                   │
//! │             └───────────────┘                   │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Set up a record database from a catalog file
//! kardex init --catalog catalog.toml
//!
//! # Workflow operations
//! kardex enroll --student uuid-2025001 --course 10
//! kardex grade --enrollment 1 --component 11 --value 4.0
//! kardex finalize --enrollment 1
//! ```

use clap::Parser;
use kardex::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing — KARDEX_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("KARDEX_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose {
        "kardex=debug,kardex_core=debug"
    } else {
        "kardex=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!(kind = ?e.kind(), "Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Kardex startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗  ██╗ █████╗ ██████╗ ██████╗ ███████╗██╗  ██╗
  ██║ ██╔╝██╔══██╗██╔══██╗██╔══██╗██╔════╝╚██╗██╔╝
  █████╔╝ ███████║██████╔╝██║  ██║█████╗   ╚███╔╝
  ██╔═██╗ ██╔══██║██╔══██╗██║  ██║██╔══╝   ██╔██╗
  ██║  ██╗██║  ██║██║  ██║██████╔╝███████╗██╔╝ ██╗
  ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═╝╚═════╝ ╚══════╝╚═╝  ╚═╝

  Academic Records Engine v{}

  Deterministic • Auditable • Catalog-driven
"#,
        env!("CARGO_PKG_VERSION")
    );
}
