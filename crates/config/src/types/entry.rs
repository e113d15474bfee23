//! Declared configuration entries.

use std::fmt;
use std::sync::Arc;

use super::environment::Environment;
use super::value::ConfigValue;

/// Default for an entry: a literal, or a computation deferred until no
/// other source yields a value.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(ConfigValue),
    Deferred(Arc<dyn Fn() -> ConfigValue + Send + Sync>),
}

impl DefaultValue {
    pub fn evaluate(&self) -> ConfigValue {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Deferred(compute) => compute(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// The declared metadata for one configuration attribute: its name, an
/// optional default, per-environment presets, and whether resolved source
/// values should be treated as sensitive.
///
/// Entries are built once at declaration time and never mutated afterwards:
///
/// ```
/// use appenv_config::{Entry, Environment};
///
/// let entry = Entry::new("endpoint")
///     .in_production("https://billing.example.com")
///     .in_development("http://localhost:9292")
///     .with_default("http://localhost:9292");
/// assert_eq!(entry.name(), "endpoint");
/// assert!(entry.preset_for(&Environment::Staging).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    default: Option<DefaultValue>,
    presets: Presets,
    sensitive: bool,
}

/// Preset values are declarable for the four well-known environments only;
/// custom environments resolve through sources and defaults.
#[derive(Debug, Clone, Default)]
struct Presets {
    development: Option<ConfigValue>,
    production: Option<ConfigValue>,
    staging: Option<ConfigValue>,
    test: Option<ConfigValue>,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            presets: Presets::default(),
            sensitive: false,
        }
    }

    /// Set a literal default value.
    pub fn with_default(mut self, value: impl Into<ConfigValue>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Set a default computed lazily, only when no other source yields a
    /// value.
    pub fn with_deferred_default<F>(mut self, compute: F) -> Self
    where
        F: Fn() -> ConfigValue + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Deferred(Arc::new(compute)));
        self
    }

    /// Preset value under the `development` environment.
    pub fn in_development(mut self, value: impl Into<ConfigValue>) -> Self {
        self.presets.development = Some(value.into());
        self
    }

    /// Preset value under the `production` environment.
    pub fn in_production(mut self, value: impl Into<ConfigValue>) -> Self {
        self.presets.production = Some(value.into());
        self
    }

    /// Preset value under the `staging` environment.
    pub fn in_staging(mut self, value: impl Into<ConfigValue>) -> Self {
        self.presets.staging = Some(value.into());
        self
    }

    /// Preset value under the `test` environment.
    pub fn in_test(mut self, value: impl Into<ConfigValue>) -> Self {
        self.presets.test = Some(value.into());
        self
    }

    /// Mark resolved source values as sensitive; they surface as
    /// [`ConfigValue::Secret`] and never print in logs or `Debug` output.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// The preset declared for `environment`, if any.
    pub fn preset_for(&self, environment: &Environment) -> Option<&ConfigValue> {
        match environment {
            Environment::Development => self.presets.development.as_ref(),
            Environment::Production => self.presets.production.as_ref(),
            Environment::Staging => self.presets.staging.as_ref(),
            Environment::Test => self.presets.test.as_ref(),
            Environment::Custom(_) => None,
        }
    }
}
