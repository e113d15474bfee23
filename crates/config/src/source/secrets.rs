//! Secrets store source backed by the system keyring.

use std::collections::HashMap;

use super::ValueSource;
use crate::constants::SECRETS_PRIORITY;
use crate::types::Environment;

/// Values held in the system keyring, one account per
/// `<environment>/<key>` under a caller-chosen service name.
///
/// The keyring cannot be enumerated, so the set of lookup keys is fixed at
/// construction; owners pass their declared entry keys. Keyring failures
/// degrade to "absent" — the source contract never fails.
#[derive(Debug)]
pub struct SecretsSource {
    service: String,
    keys: Vec<String>,
}

impl SecretsSource {
    pub fn new(
        service: impl Into<String>,
        keys: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            service: service.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    fn account(environment: &Environment, key: &str) -> String {
        format!("{environment}/{key}")
    }
}

impl ValueSource for SecretsSource {
    fn fetch(&self, environment: &Environment) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for key in &self.keys {
            let account = Self::account(environment, key);
            let entry = match keyring::Entry::new(&self.service, &account) {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(
                        service = %self.service,
                        account = %account,
                        error = %err,
                        "keyring entry unavailable"
                    );
                    continue;
                }
            };
            match entry.get_password() {
                Ok(secret) => {
                    out.insert(key.clone(), secret);
                }
                Err(keyring::Error::NoEntry) => {}
                Err(err) => {
                    tracing::warn!(
                        service = %self.service,
                        account = %account,
                        error = %err,
                        "keyring lookup failed, treating as absent"
                    );
                }
            }
        }
        out
    }

    fn name(&self) -> &'static str {
        "secrets"
    }

    fn priority(&self) -> i32 {
        SECRETS_PRIORITY
    }
}
