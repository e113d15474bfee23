//! Live process environment source.

use std::collections::HashMap;

use super::ValueSource;
use crate::constants::PROCESS_ENV_PRIORITY;
use crate::types::{Environment, ambient_environment};

/// The live process environment.
///
/// Serves exactly the ambient environment; asking it for any other
/// environment yields nothing, so that e.g. a `staging` lookup from a
/// `development` process falls through to the `.env.staging` dotfile.
#[derive(Debug, Default)]
pub struct ProcessEnvSource;

impl ProcessEnvSource {
    pub fn new() -> Self {
        Self
    }
}

impl ValueSource for ProcessEnvSource {
    fn fetch(&self, environment: &Environment) -> HashMap<String, String> {
        if *environment != ambient_environment() {
            return HashMap::new();
        }
        std::env::vars().collect()
    }

    fn name(&self) -> &'static str {
        "process-env"
    }

    fn priority(&self) -> i32 {
        PROCESS_ENV_PRIORITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn serves_only_the_ambient_environment() {
        let _lock = crate::test_util::global_test_lock().lock().unwrap();
        temp_env::with_vars(
            [
                ("APPENV_ENV", Some("development")),
                ("_APPENV_PROCESS_TEST", Some("present")),
            ],
            || {
                let source = ProcessEnvSource::new();

                let ambient = source.fetch(&Environment::Development);
                assert_eq!(
                    ambient.get("_APPENV_PROCESS_TEST").map(String::as_str),
                    Some("present")
                );

                assert!(source.fetch(&Environment::Staging).is_empty());
            },
        );
    }
}
