//! Discovery and loading of dotenv files from disk.
//!
//! Expands a caller-supplied path list into concrete dotenv files and loads
//! them into the process environment, where the highest-priority value
//! source picks them up. Directories expand recursively; anything that is
//! not dotenv material is rejected rather than silently skipped.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ConfigError;

/// `.env` itself or any `.env.<suffix>` variant.
fn is_dotenv_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == ".env" || name.starts_with(".env."))
}

/// Expand `paths` into dotenv files.
///
/// Directories are walked recursively in file-name order; explicit file
/// paths must name a dotenv file.
///
/// # Errors
///
/// [`ConfigError::SourceFileUnsupported`] for a path that exists but is not
/// dotenv material, or that does not exist at all; [`ConfigError::Io`] for
/// traversal failures.
pub fn discover(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ConfigError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|err| ConfigError::Io(err.into()))?;
                if entry.file_type().is_file() && is_dotenv_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if path.is_file() && is_dotenv_file(path) {
            files.push(path.clone());
        } else {
            return Err(ConfigError::SourceFileUnsupported { path: path.clone() });
        }
    }
    Ok(files)
}

/// Load `files` into the process environment.
///
/// Variables already present in the environment keep their values; dotenv
/// files never override the live environment.
///
/// # Errors
///
/// Parse and I/O failures map to the content-free dotenv error variants.
pub fn load_into_process_env(files: &[PathBuf]) -> Result<(), ConfigError> {
    for path in files {
        match dotenvy::from_path(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "loaded dotenv file");
            }
            Err(dotenvy::Error::LineParse(_, index)) => {
                return Err(ConfigError::DotenvParse { error_index: index });
            }
            Err(dotenvy::Error::Io(io_err)) => {
                return Err(ConfigError::DotenvIo {
                    kind: io_err.kind(),
                });
            }
            Err(_) => return Err(ConfigError::DotenvUnknown),
        }
    }
    Ok(())
}
