//! # Kardex application library
//!
//! The CLI surface of the Kardex academic records system. The binary in
//! `main.rs` is a thin wrapper; everything testable lives here:
//! - `cli`: argument parsing and command implementations
//! - `config`: the optional `kardex.toml` application config
//! - `files`: catalog file loading (TOML / JSON / binary snapshot)

pub mod cli;
pub mod config;
pub mod files;
