//! # Application Config
//!
//! Optional `kardex.toml` next to the working directory. Everything in it
//! can be overridden by CLI flags; the config is loaded once and passed
//! down explicitly; there is no ambient global state.

use kardex_core::AcademicError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional config file, resolved in the working directory.
pub const CONFIG_FILE: &str = "kardex.toml";

/// Default record database path when neither flag nor config sets one.
pub const DEFAULT_DATABASE: &str = "kardex.redb";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Path to the record database.
    pub database: Option<PathBuf>,
}

impl AppConfig {
    /// Load `kardex.toml` from the working directory.
    ///
    /// A missing file is the default config; an unreadable or malformed
    /// file is an explicit error, never silently ignored.
    pub fn load() -> Result<Self, AcademicError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load a config file from an explicit path (missing file = defaults).
    pub fn load_from(path: &Path) -> Result<Self, AcademicError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| AcademicError::IoError(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| {
            AcademicError::SerializationError(format!("invalid config {}: {e}", path.display()))
        })
    }

    /// Resolve the effective database path: CLI flag, then config, then
    /// the default.
    #[must_use]
    pub fn database_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }
}
