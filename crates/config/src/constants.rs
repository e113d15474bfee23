//! Centralized constants for the appenv workspace.
//!
//! This module contains values shared across modules to avoid
//! magic literal duplication and improve maintainability.

// =============================================================================
// Environment Selection
// =============================================================================

/// Environment variable naming the ambient (process-wide) environment.
pub const AMBIENT_ENV_VAR: &str = "APPENV_ENV";

/// Suffix of the per-owner environment override variable
/// (`Billing::Gateway` is overridden by `BILLING_GATEWAY_ENV`).
pub const ENV_OVERRIDE_SUFFIX: &str = "_ENV";

/// Environment assumed when [`AMBIENT_ENV_VAR`] is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

// =============================================================================
// Value Classification
// =============================================================================

/// Raw values classified as boolean `true` (compared lower-cased).
pub const TRUTHY_VALUES: &[&str] = &["1", "true", "y", "yes", "enabled"];

/// Raw values classified as boolean `false` (compared lower-cased).
pub const FALSEY_VALUES: &[&str] = &["0", "-1", "false", "f", "n", "no", "disabled"];

/// Prefix of the synthetic value substituted for unset entries under the
/// `test` environment.
pub const PLACEHOLDER_PREFIX: &str = "some_super_dummy_";

// =============================================================================
// Source Priorities
// =============================================================================

/// Priority of the live process environment (highest wins on collisions).
pub const PROCESS_ENV_PRIORITY: i32 = 300;

/// Priority of per-environment dotenv files.
pub const DOTFILE_PRIORITY: i32 = 200;

/// Priority of the system keyring secrets store.
pub const SECRETS_PRIORITY: i32 = 100;
