//! Environment identifiers and the naming conventions derived from them.
//!
//! Responsibilities:
//! - Model the deployment environment as a string-like open set.
//! - Resolve the ambient (process-wide) environment from `APPENV_ENV`.
//! - Derive the per-owner override variable name and the namespace prefix
//!   from an owner's qualified name.
//!
//! Invariants:
//! - `override_var_name` and `namespace_of` are pure functions, independent
//!   of any process state.
//! - Empty or whitespace-only environment variables are treated as unset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{AMBIENT_ENV_VAR, DEFAULT_ENVIRONMENT, ENV_OVERRIDE_SUFFIX};

/// A named deployment/runtime environment.
///
/// Four environments are well known and selectable as preset targets;
/// anything else round-trips through [`Environment::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
    Custom(String),
}

impl Environment {
    /// The environment name as written in `APPENV_ENV` or a dotenv suffix.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// `true` under the `test` environment, where unresolvable entries
    /// yield placeholder values instead of errors.
    pub fn is_test(&self) -> bool {
        matches!(self, Self::Test)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Environment {
    fn from(name: &str) -> Self {
        match name {
            "development" => Self::Development,
            "test" => Self::Test,
            "staging" => Self::Staging,
            "production" => Self::Production,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for Environment {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<Environment> for String {
    fn from(environment: Environment) -> Self {
        environment.as_str().to_string()
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(name))
    }
}

/// The ambient environment of the running process.
///
/// Read from `APPENV_ENV`; defaults to `development` when unset. This is the
/// environment the live process environment variables belong to.
pub fn ambient_environment() -> Environment {
    env_var_or_none(AMBIENT_ENV_VAR)
        .map(|raw| Environment::from(raw.as_str()))
        .unwrap_or_else(|| Environment::from(DEFAULT_ENVIRONMENT))
}

/// Read an environment variable, returning None if unset, empty, or
/// whitespace-only. Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Name of the variable overriding one owner's environment.
///
/// Non-alphanumeric runs collapse to a single underscore, the result is
/// upper-cased and suffixed: `Billing::Gateway` -> `BILLING_GATEWAY_ENV`.
pub fn override_var_name(qualified_name: &str) -> String {
    let mut out = String::with_capacity(qualified_name.len() + ENV_OVERRIDE_SUFFIX.len());
    let mut boundary = true;
    for ch in qualified_name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_uppercase());
            boundary = false;
        } else if !boundary {
            out.push('_');
            boundary = true;
        }
    }
    if out.ends_with('_') {
        out.pop();
    }
    out.push_str(ENV_OVERRIDE_SUFFIX);
    out
}

/// Key prefix for entries of a nested owner.
///
/// Top-level owners use no prefix; a nested owner contributes its
/// snake-cased unqualified name, so `Outer::Inner` looks up `inner_<entry>`.
pub fn namespace_of(qualified_name: &str) -> String {
    match qualified_name.rsplit_once("::") {
        Some((_, unqualified)) => snake_case(unqualified),
        None => String::new(),
    }
}

fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_ascii_uppercase() {
            let word_boundary = match i.checked_sub(1).map(|j| chars[j]) {
                Some(prev) if prev.is_ascii_lowercase() || prev.is_ascii_digit() => true,
                Some(prev) if prev.is_ascii_uppercase() => {
                    // An acronym ends where a lower-case letter follows.
                    chars.get(i + 1).is_some_and(|next| next.is_ascii_lowercase())
                }
                _ => false,
            };
            if word_boundary {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn well_known_names_round_trip() {
        for name in ["development", "test", "staging", "production"] {
            let environment = Environment::from(name);
            assert_eq!(environment.as_str(), name);
            assert!(!matches!(environment, Environment::Custom(_)));
        }
    }

    #[test]
    fn unknown_names_become_custom() {
        let environment = Environment::from("sandbox");
        assert_eq!(environment, Environment::Custom("sandbox".to_string()));
        assert_eq!(environment.as_str(), "sandbox");
    }

    #[test]
    fn only_test_is_test() {
        assert!(Environment::Test.is_test());
        assert!(!Environment::Development.is_test());
        assert!(!Environment::Custom("test-like".to_string()).is_test());
    }

    #[test]
    fn serde_round_trips_as_plain_string() {
        let json = serde_json::to_string(&Environment::Staging).unwrap();
        assert_eq!(json, "\"staging\"");
        let back: Environment = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(back, Environment::Production);
    }

    #[test]
    #[serial]
    fn ambient_defaults_to_development() {
        let _lock = crate::test_util::global_test_lock().lock().unwrap();
        temp_env::with_var(AMBIENT_ENV_VAR, None::<&str>, || {
            assert_eq!(ambient_environment(), Environment::Development);
        });
    }

    #[test]
    #[serial]
    fn ambient_reads_the_process_variable() {
        let _lock = crate::test_util::global_test_lock().lock().unwrap();
        // A custom name, so concurrently running dotfile tests never see
        // their environment turn ambient mid-flight.
        temp_env::with_var(AMBIENT_ENV_VAR, Some("sandbox"), || {
            assert_eq!(
                ambient_environment(),
                Environment::Custom("sandbox".to_string())
            );
        });
    }

    #[test]
    fn override_var_name_normalizes_qualified_names() {
        assert_eq!(override_var_name("Billing::Gateway"), "BILLING_GATEWAY_ENV");
        assert_eq!(
            override_var_name("AppConfigTest::Hola"),
            "APPCONFIGTEST_HOLA_ENV"
        );
        assert_eq!(override_var_name("Standalone"), "STANDALONE_ENV");
        assert_eq!(override_var_name("weird--name__"), "WEIRD_NAME_ENV");
    }

    #[test]
    fn namespace_is_empty_for_top_level_owners() {
        assert_eq!(namespace_of("Billing"), "");
    }

    #[test]
    fn namespace_snake_cases_the_unqualified_name() {
        assert_eq!(namespace_of("Outer::Inner"), "inner");
        assert_eq!(namespace_of("Billing::PaymentGateway"), "payment_gateway");
        assert_eq!(namespace_of("App::HTTPServer"), "http_server");
    }

    #[test]
    fn env_var_or_none_filters_empty_and_whitespace() {
        temp_env::with_vars(
            [
                ("_APPENV_TEST_EMPTY", Some("")),
                ("_APPENV_TEST_BLANK", Some("   ")),
                ("_APPENV_TEST_PADDED", Some(" value ")),
            ],
            || {
                assert_eq!(env_var_or_none("_APPENV_TEST_UNSET"), None);
                assert_eq!(env_var_or_none("_APPENV_TEST_EMPTY"), None);
                assert_eq!(env_var_or_none("_APPENV_TEST_BLANK"), None);
                assert_eq!(
                    env_var_or_none("_APPENV_TEST_PADDED"),
                    Some("value".to_string())
                );
            },
        );
    }
}
