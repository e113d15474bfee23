//! Declarative per-environment application configuration.
//!
//! Components declare named entries once; each entry resolves from, in
//! precedence order, an external value source (process environment,
//! per-environment dotenv file, or a system-keyring secrets store), a
//! per-environment preset declared in code, and a literal or deferred
//! default. Under the `test` environment, entries with no source value
//! resolve to a synthetic `some_super_dummy_<key>` placeholder instead of
//! failing, so test suites run without a fully populated environment.
//!
//! Resolved values are cached per entry and invalidated as a whole when the
//! active environment changes. Every declaration also lands in a
//! process-wide [`Registry`], which answers the application-level question
//! "are all required configuration values currently resolvable?" in one
//! call.
//!
//! ```no_run
//! use appenv_config::{AppConfig, Entry, Registry};
//!
//! # fn main() -> Result<(), appenv_config::ConfigError> {
//! let billing = AppConfig::builder("Billing::Gateway")
//!     .entry(Entry::new("api_key").sensitive())
//!     .entry(Entry::new("retry_limit").with_default("3"))
//!     .entry(
//!         Entry::new("endpoint")
//!             .in_production("https://billing.example.com")
//!             .in_development("http://localhost:9292"),
//!     )
//!     .build()?;
//!
//! let endpoint = billing.get_str("endpoint")?;
//! let missing = Registry::global().missing_required_vars()?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod constants;
pub mod discovery;
mod error;
mod instance;
mod registry;
pub mod source;
pub mod types;

pub use error::ConfigError;
pub use instance::{AppConfig, AppConfigBuilder};
pub use registry::Registry;
pub use source::{DotfileSource, ProcessEnvSource, SecretsSource, SourceStack, ValueSource};
pub use types::{
    ConfigValue, DefaultValue, Entry, Environment, ambient_environment, env_var_or_none,
    namespace_of, override_var_name,
};
