//! Error types for configuration resolution and loading.
//!
//! Responsibilities:
//! - Define error variants for declaration, resolution, and dotenv loading failures.
//!
//! Invariants:
//! - All variants carry enough context to name the offending entry or path.
//! - Dotenv errors NEVER include raw line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while declaring or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An entry had no source value, no preset, no default, and the active
    /// environment is not `test`. Carries the `{Owner}.{entry}` identifier,
    /// or a `", "`-joined list of identifiers for batch operations.
    #[error("Required configuration value is missing: {0}")]
    RequiredVarMissing(String),

    #[error("Invalid value for {entry}: {message}")]
    InvalidValue { entry: String, message: String },

    #[error("Unknown configuration entry: {owner}.{entry}")]
    UnknownEntry { owner: String, entry: String },

    #[error("Configuration entry declared twice: {owner}.{entry}")]
    DuplicateEntry { owner: String, entry: String },

    /// A discovery path that is neither a directory nor a dotenv file.
    #[error("Not a loadable configuration source: {path}")]
    SourceFileUnsupported { path: PathBuf },

    /// Failed to parse a dotenv file due to invalid syntax.
    ///
    /// Only the byte index of the failure is included, NOT the offending
    /// line content.
    #[error("Failed to parse dotenv file at position {error_index}")]
    DotenvParse { error_index: usize },

    /// Failed to read a dotenv file due to an I/O error.
    #[error("Failed to read dotenv file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from the dotenvy crate).
    #[error("Failed to load dotenv file")]
    DotenvUnknown,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Build a [`ConfigError::RequiredVarMissing`] for one owner/entry pair.
    pub(crate) fn required_var(owner: &str, entry: &str) -> Self {
        Self::RequiredVarMissing(format!("{owner}.{entry}"))
    }
}
