//! Per-environment dotenv file source.
//!
//! Invariants:
//! - Serves every environment except the ambient one (which reads the live
//!   process environment instead).
//! - A missing file is an empty mapping, not an error.
//! - Diagnostics never include raw line contents to prevent secret leakage.

use std::collections::HashMap;
use std::path::PathBuf;

use super::ValueSource;
use crate::constants::DOTFILE_PRIORITY;
use crate::types::{Environment, ambient_environment};

/// `.env.<environment>` files in one directory.
#[derive(Debug, Clone)]
pub struct DotfileSource {
    dir: PathBuf,
}

impl DotfileSource {
    /// Dotfiles in the current working directory.
    pub fn new() -> Self {
        Self::in_dir(".")
    }

    /// Dotfiles rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_for(&self, environment: &Environment) -> PathBuf {
        self.dir.join(format!(".env.{environment}"))
    }
}

impl Default for DotfileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueSource for DotfileSource {
    fn fetch(&self, environment: &Environment) -> HashMap<String, String> {
        if *environment == ambient_environment() {
            return HashMap::new();
        }

        let path = self.file_for(environment);
        let iter = match dotenvy::from_path_iter(&path) {
            Ok(iter) => iter,
            Err(err) => {
                if !is_not_found(&err) {
                    tracing::warn!(
                        path = %path.display(),
                        "unreadable dotenv file, treating as absent"
                    );
                }
                return HashMap::new();
            }
        };

        let mut out = HashMap::new();
        for item in iter {
            match item {
                Ok((key, value)) => {
                    out.insert(key, value);
                }
                // Log only the position, the line may hold a secret.
                Err(dotenvy::Error::LineParse(_, index)) => {
                    tracing::warn!(
                        path = %path.display(),
                        position = index,
                        "skipping malformed dotenv line"
                    );
                }
                Err(_) => {
                    tracing::warn!(path = %path.display(), "aborting dotenv read");
                    break;
                }
            }
        }
        out
    }

    fn name(&self) -> &'static str {
        "dotfile"
    }

    fn priority(&self) -> i32 {
        DOTFILE_PRIORITY
    }
}

fn is_not_found(err: &dotenvy::Error) -> bool {
    matches!(
        err,
        dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
    )
}
