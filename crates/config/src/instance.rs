//! Per-owner configuration instances and the resolution algorithm.
//!
//! Responsibilities:
//! - Bind one owning component's declared entries to one active environment.
//! - Resolve each entry once per environment: source mapping, then (under
//!   `test`) the placeholder, then presets, then defaults.
//! - Invalidate and eagerly re-resolve every entry on environment change.
//!
//! Does NOT handle:
//! - Fetching raw values (delegated to `source`).
//! - Cross-owner bookkeeping (see `registry`).
//!
//! Invariants:
//! - The resolved cache and the memoized source mapping always belong to
//!   the active environment; a completed `set_environment` leaves no stale
//!   entry observable.
//! - A `{OWNER}_ENV` override variable present at construction keeps
//!   winning over later `set_environment` calls.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::constants::PLACEHOLDER_PREFIX;
use crate::error::ConfigError;
use crate::registry::Registry;
use crate::source::{SecretsSource, SourceStack};
use crate::types::{
    ConfigValue, Entry, Environment, ambient_environment, env_var_or_none, namespace_of,
    override_var_name,
};

/// One resolved configuration, bound to one owning component and one
/// active environment.
///
/// Built once per component and shared behind an [`Arc`]:
///
/// ```no_run
/// use appenv_config::{AppConfig, Entry};
///
/// # fn main() -> Result<(), appenv_config::ConfigError> {
/// let billing = AppConfig::builder("Billing::Gateway")
///     .entry(Entry::new("api_key").sensitive())
///     .entry(Entry::new("retry_limit").with_default("3"))
///     .entry(
///         Entry::new("endpoint")
///             .in_production("https://billing.example.com")
///             .in_development("http://localhost:9292"),
///     )
///     .build()?;
///
/// let endpoint = billing.get("endpoint")?;
/// # Ok(())
/// # }
/// ```
pub struct AppConfig {
    qualified_name: String,
    namespace: String,
    override_env: Option<Environment>,
    entries: Vec<Entry>,
    sources: SourceStack,
    state: Mutex<State>,
}

struct State {
    environment: Environment,
    source_cache: Option<HashMap<String, String>>,
    resolved: HashMap<String, ConfigValue>,
}

impl AppConfig {
    /// Start declaring a configuration for `qualified_name`
    /// (e.g. `"Billing::Gateway"`).
    pub fn builder(qualified_name: impl Into<String>) -> AppConfigBuilder {
        AppConfigBuilder {
            qualified_name: qualified_name.into(),
            entries: Vec::new(),
            sources: None,
            environment: None,
            secrets_service: None,
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The derived lookup-key prefix; empty for top-level owners.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// The active environment.
    pub fn environment(&self) -> Environment {
        self.state().environment.clone()
    }

    /// Resolve `name`, caching the result until the environment changes.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownEntry`] for an undeclared name;
    /// [`ConfigError::RequiredVarMissing`] when no source, preset, or
    /// default yields a value outside the `test` environment.
    pub fn get(&self, name: &str) -> Result<ConfigValue, ConfigError> {
        let entry = self.entry_named(name)?;
        let mut state = self.state();
        self.resolve_entry(&mut state, entry)
    }

    /// Resolve `name` as a plain string.
    ///
    /// # Errors
    ///
    /// As [`AppConfig::get`], plus [`ConfigError::InvalidValue`] when the
    /// value coerced to a boolean or is sensitive.
    pub fn get_str(&self, name: &str) -> Result<String, ConfigError> {
        match self.get(name)? {
            ConfigValue::Str(s) => Ok(s),
            other => Err(ConfigError::InvalidValue {
                entry: format!("{}.{name}", self.qualified_name),
                message: format!("expected a string value, got {other:?}"),
            }),
        }
    }

    /// Resolve `name` as a boolean.
    ///
    /// # Errors
    ///
    /// As [`AppConfig::get`], plus [`ConfigError::InvalidValue`] when the
    /// raw value is not in the boolean token sets.
    pub fn get_bool(&self, name: &str) -> Result<bool, ConfigError> {
        match self.get(name)? {
            ConfigValue::Bool(b) => Ok(b),
            other => Err(ConfigError::InvalidValue {
                entry: format!("{}.{name}", self.qualified_name),
                message: format!("expected a boolean value, got {other:?}"),
            }),
        }
    }

    /// Switch to `environment`: drop the memoized source mapping and every
    /// resolved value, then eagerly re-resolve each declared entry so that
    /// missing required values surface immediately.
    ///
    /// A `{OWNER}_ENV` override variable seen at construction wins over the
    /// argument. With `swallow_errors`, an entry failing with
    /// [`ConfigError::RequiredVarMissing`] is left unresolved and the pass
    /// continues.
    pub fn set_environment(
        &self,
        environment: Environment,
        swallow_errors: bool,
    ) -> Result<(), ConfigError> {
        let mut state = self.state();
        state.environment = self.override_env.clone().unwrap_or(environment);
        state.source_cache = None;
        state.resolved.clear();
        tracing::debug!(
            owner = %self.qualified_name,
            environment = %state.environment,
            "environment changed, re-resolving entries"
        );

        for entry in &self.entries {
            match self.resolve_entry(&mut state, entry) {
                Ok(_) => {}
                Err(ConfigError::RequiredVarMissing(_)) if swallow_errors => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    fn entry_named(&self, name: &str) -> Result<&Entry, ConfigError> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .ok_or_else(|| ConfigError::UnknownEntry {
                owner: self.qualified_name.clone(),
                entry: name.to_string(),
            })
    }

    fn resolve_entry(
        &self,
        state: &mut State,
        entry: &Entry,
    ) -> Result<ConfigValue, ConfigError> {
        if let Some(cached) = state.resolved.get(entry.name()) {
            return Ok(cached.clone());
        }

        let key = lookup_key(&self.namespace, entry.name());
        let environment = state.environment.clone();
        let mapping = state
            .source_cache
            .get_or_insert_with(|| self.sources.fetch(&environment));

        let value = if let Some(raw) = mapping.get(&key.to_lowercase()) {
            ConfigValue::from_raw(raw, entry.is_sensitive())
        } else if environment.is_test() {
            // Unset entries never fail a test run; presets and defaults
            // are bypassed so tests see the placeholder consistently.
            ConfigValue::Str(format!("{PLACEHOLDER_PREFIX}{key}"))
        } else if let Some(preset) = entry.preset_for(&environment) {
            preset.clone()
        } else if let Some(default) = entry.default() {
            default.evaluate()
        } else {
            return Err(ConfigError::required_var(&self.qualified_name, entry.name()));
        };

        state.resolved.insert(entry.name().to_string(), value.clone());
        tracing::debug!(
            owner = %self.qualified_name,
            entry = entry.name(),
            environment = %environment,
            "resolved configuration entry"
        );
        Ok(value)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("qualified_name", &self.qualified_name)
            .field("namespace", &self.namespace)
            .field("environment", &self.environment())
            .field("entries", &self.entries.len())
            .field("sources", &self.sources)
            .finish()
    }
}

/// External lookup key for one entry of one owner.
fn lookup_key(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}_{name}")
    }
}

/// Builder for [`AppConfig`], finished by [`build`](AppConfigBuilder::build)
/// (global registry) or
/// [`build_in`](AppConfigBuilder::build_in) (an explicit registry, for
/// tests and embedded wiring).
pub struct AppConfigBuilder {
    qualified_name: String,
    entries: Vec<Entry>,
    sources: Option<SourceStack>,
    environment: Option<Environment>,
    secrets_service: Option<String>,
}

impl AppConfigBuilder {
    /// Declare one entry; declaration order is preserved and drives
    /// validation reports.
    pub fn entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Replace the default source stack (process environment plus dotfiles
    /// in the current directory).
    pub fn sources(mut self, sources: SourceStack) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Pin the initial environment, used when no `{OWNER}_ENV` override
    /// variable is set. Without a pin the ambient environment applies.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Also consult the system keyring under `service`, one account per
    /// `<environment>/<key>` for every declared entry key.
    pub fn secrets(mut self, service: impl Into<String>) -> Self {
        self.secrets_service = Some(service.into());
        self
    }

    /// Build and register in the process-wide registry.
    pub fn build(self) -> Result<Arc<AppConfig>, ConfigError> {
        self.build_in(Registry::global())
    }

    /// Build and register in `registry`.
    pub fn build_in(self, registry: &Registry) -> Result<Arc<AppConfig>, ConfigError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if self.entries[..index]
                .iter()
                .any(|earlier| earlier.name() == entry.name())
            {
                return Err(ConfigError::DuplicateEntry {
                    owner: self.qualified_name,
                    entry: entry.name().to_string(),
                });
            }
        }

        let namespace = namespace_of(&self.qualified_name);
        let override_env = env_var_or_none(&override_var_name(&self.qualified_name))
            .map(|raw| Environment::from(raw.as_str()));
        let environment = override_env
            .clone()
            .or(self.environment)
            .unwrap_or_else(ambient_environment);

        let mut sources = self.sources.unwrap_or_default();
        if let Some(service) = self.secrets_service {
            let keys: Vec<String> = self
                .entries
                .iter()
                .map(|entry| lookup_key(&namespace, entry.name()))
                .collect();
            sources.push(SecretsSource::new(service, keys));
        }

        let config = Arc::new(AppConfig {
            qualified_name: self.qualified_name,
            namespace,
            override_env,
            entries: self.entries,
            sources,
            state: Mutex::new(State {
                environment,
                source_cache: None,
                resolved: HashMap::new(),
            }),
        });
        registry.register(&config);
        tracing::debug!(
            owner = %config.qualified_name,
            entries = config.entries.len(),
            environment = %config.environment(),
            "registered configuration"
        );
        Ok(config)
    }
}
