//! Process-wide record of every declared configuration entry.
//!
//! Responsibilities:
//! - Keep one row per declared entry per owner, in declaration order.
//! - Answer the global feasibility check: which required entries are
//!   currently unresolvable?
//! - Re-apply an environment across every registered owner, optionally
//!   after loading dotenv files from disk.
//!
//! Invariants:
//! - Rows are append-only during normal operation; only the explicit
//!   `reset` clears them.
//! - No lock is held while entries resolve; rows are snapshotted first.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::discovery;
use crate::error::ConfigError;
use crate::instance::AppConfig;
use crate::types::{Environment, ambient_environment};

struct Row {
    owner: String,
    entry: String,
    config: Arc<AppConfig>,
}

/// Ordered collection of every declared entry across all owners.
///
/// Most applications use the shared [`Registry::global`] instance through
/// [`AppConfigBuilder::build`](crate::AppConfigBuilder::build); tests and
/// embedded wiring construct their own.
pub struct Registry {
    rows: Mutex<Vec<Row>>,
}

impl Registry {
    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn register(&self, config: &Arc<AppConfig>) {
        let mut rows = self.rows();
        for entry in config.entries() {
            rows.push(Row {
                owner: config.qualified_name().to_string(),
                entry: entry.name().to_string(),
                config: Arc::clone(config),
            });
        }
    }

    /// `{Owner}.{entry}` identifiers in declaration order, stable across
    /// calls.
    pub fn entry_ids(&self) -> Vec<String> {
        self.rows()
            .iter()
            .map(|row| format!("{}.{}", row.owner, row.entry))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Identifiers of registered entries that currently fail with
    /// [`ConfigError::RequiredVarMissing`], in declaration order.
    ///
    /// # Errors
    ///
    /// Only missing required values are collected; any other resolution
    /// error propagates unchanged.
    pub fn missing_required_vars(&self) -> Result<Vec<String>, ConfigError> {
        let snapshot: Vec<(String, Arc<AppConfig>)> = self
            .rows()
            .iter()
            .map(|row| (row.entry.clone(), Arc::clone(&row.config)))
            .collect();

        let mut missing = Vec::new();
        for (entry, config) in snapshot {
            match config.get(&entry) {
                Ok(_) => {}
                Err(ConfigError::RequiredVarMissing(id)) => missing.push(id),
                Err(other) => return Err(other),
            }
        }
        Ok(missing)
    }

    /// Load dotenv files from `paths` (files, or directories expanded
    /// recursively) into the process environment, then switch every
    /// registered owner to `environment` (ambient when `None`), swallowing
    /// per-entry missing values.
    ///
    /// # Errors
    ///
    /// Discovery and dotenv loading errors propagate. With
    /// `raise_on_missing`, fails with [`ConfigError::RequiredVarMissing`]
    /// listing every unresolvable identifier joined by `", "`.
    pub fn load_configs(
        &self,
        paths: &[PathBuf],
        raise_on_missing: bool,
        environment: Option<Environment>,
    ) -> Result<(), ConfigError> {
        let files = discovery::discover(paths)?;
        discovery::load_into_process_env(&files)?;

        let environment = environment.unwrap_or_else(ambient_environment);
        for config in self.unique_configs() {
            config.set_environment(environment.clone(), true)?;
        }

        if raise_on_missing {
            let missing = self.missing_required_vars()?;
            if !missing.is_empty() {
                return Err(ConfigError::RequiredVarMissing(missing.join(", ")));
            }
        }
        Ok(())
    }

    /// Clear every row. Intended for test isolation only.
    pub fn reset(&self) {
        self.rows().clear();
    }

    fn unique_configs(&self) -> Vec<Arc<AppConfig>> {
        let rows = self.rows();
        let mut configs: Vec<Arc<AppConfig>> = Vec::new();
        for row in rows.iter() {
            if !configs.iter().any(|c| Arc::ptr_eq(c, &row.config)) {
                configs.push(Arc::clone(&row.config));
            }
        }
        configs
    }

    fn rows(&self) -> MutexGuard<'_, Vec<Row>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.rows().len())
            .finish()
    }
}
