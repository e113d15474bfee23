//! External value sources and their priority-ordered composition.
//!
//! Responsibilities:
//! - Define the [`ValueSource`] contract: given an environment, return a
//!   flat string-keyed mapping, never failing.
//! - Merge any number of sources into one mapping via [`SourceStack`],
//!   higher priority winning on key collisions.
//!
//! Does NOT handle:
//! - Caching of fetched mappings (owned by `instance`).
//! - Interpretation of values (owned by `classify` / `types::value`).
//!
//! Invariants:
//! - Keys are compared case-insensitively; the stack normalizes every key
//!   to lowercase while merging.
//! - An absent source contributes an empty mapping, never an error.

mod dotfile;
mod process;
mod secrets;

pub use dotfile::DotfileSource;
pub use process::ProcessEnvSource;
pub use secrets::SecretsSource;

use std::collections::HashMap;
use std::fmt;

use crate::types::Environment;

/// A provider of raw configuration values for one environment at a time.
pub trait ValueSource: Send + Sync {
    /// Flat mapping available for `environment`.
    ///
    /// Never fails; an absent or unreadable source yields an empty mapping.
    fn fetch(&self, environment: &Environment) -> HashMap<String, String>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Merge priority; higher wins on key collisions.
    fn priority(&self) -> i32 {
        100
    }
}

/// Priority-ordered collection of value sources.
///
/// The default stack reads the live process environment for the ambient
/// environment and `.env.<environment>` dotfiles for every other one.
pub struct SourceStack {
    sources: Vec<Box<dyn ValueSource>>,
}

impl SourceStack {
    /// An empty stack; every lookup misses until sources are pushed.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Process environment plus per-environment dotfiles in the current
    /// directory.
    pub fn standard() -> Self {
        Self::new()
            .with(ProcessEnvSource::new())
            .with(DotfileSource::new())
    }

    pub fn push(&mut self, source: impl ValueSource + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn with(mut self, source: impl ValueSource + 'static) -> Self {
        self.push(source);
        self
    }

    /// Merge every source's mapping for `environment`, lowest priority
    /// first so that higher-priority values overwrite.
    pub fn fetch(&self, environment: &Environment) -> HashMap<String, String> {
        let mut ordered: Vec<&dyn ValueSource> =
            self.sources.iter().map(|source| &**source).collect();
        ordered.sort_by_key(|source| source.priority());

        let mut merged = HashMap::new();
        for source in ordered {
            let fetched = source.fetch(environment);
            tracing::debug!(
                source = source.name(),
                environment = %environment,
                keys = fetched.len(),
                "merged value source"
            );
            for (key, value) in fetched {
                merged.insert(key.to_lowercase(), value);
            }
        }
        merged
    }
}

impl Default for SourceStack {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for SourceStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("SourceStack").field("sources", &names).finish()
    }
}
