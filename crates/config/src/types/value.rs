//! Resolved configuration values.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classify;

/// Module for serializing SecretString as strings.
mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize as DeserializeTrait, Serialize as SerializeTrait};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// One resolved configuration value.
///
/// Raw source strings in the boolean token sets coerce to [`Bool`];
/// everything else stays a string, wrapped as [`Secret`] when the entry is
/// declared sensitive. Plain strings deserialize as [`Str`] — a [`Secret`]
/// is only ever produced by resolution.
///
/// [`Bool`]: ConfigValue::Bool
/// [`Str`]: ConfigValue::Str
/// [`Secret`]: ConfigValue::Secret
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Str(String),
    Secret(#[serde(with = "secret_string")] SecretString),
}

impl ConfigValue {
    /// Coerce a raw source string into a typed value.
    ///
    /// Boolean-ish tokens become real booleans regardless of sensitivity;
    /// a boolean flag is not a secret worth hiding.
    pub fn from_raw(raw: &str, sensitive: bool) -> Self {
        if classify::is_booleanish(raw) {
            Self::Bool(classify::is_truthy(raw))
        } else if sensitive {
            Self::Secret(SecretString::new(raw.to_string().into()))
        } else {
            Self::Str(raw.to_string())
        }
    }

    /// The string content, for plain string values only.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The boolean content, for coerced boolean values only.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The wrapped secret, for sensitive values only. Callers must go
    /// through [`secrecy::ExposeSecret`] to read it.
    pub fn as_secret(&self) -> Option<&SecretString> {
        match self {
            Self::Secret(secret) => Some(secret),
            _ => None,
        }
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Secret(_) => f.write_str("Secret([REDACTED])"),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => f.write_str(s),
            Self::Secret(_) => f.write_str("[REDACTED]"),
        }
    }
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Secret(a), Self::Secret(b)) => a.expose_secret() == b.expose_secret(),
            _ => false,
        }
    }
}

impl Eq for ConfigValue {}

impl PartialEq<&str> for ConfigValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<bool> for ConfigValue {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_coerces_boolean_tokens() {
        assert_eq!(ConfigValue::from_raw("yes", false), ConfigValue::Bool(true));
        assert_eq!(ConfigValue::from_raw("NO", false), ConfigValue::Bool(false));
        assert_eq!(ConfigValue::from_raw("-1", true), ConfigValue::Bool(false));
    }

    #[test]
    fn from_raw_passes_other_strings_through() {
        assert_eq!(ConfigValue::from_raw("11", false), "11");
        assert_eq!(ConfigValue::from_raw("hola", false), "hola");
    }

    #[test]
    fn from_raw_wraps_sensitive_strings() {
        let value = ConfigValue::from_raw("hunter2", true);
        let secret = value.as_secret().expect("should be a secret");
        assert_eq!(secret.expose_secret(), "hunter2");
    }

    #[test]
    fn debug_and_display_never_expose_secrets() {
        let value = ConfigValue::from_raw("hunter2", true);
        assert!(!format!("{value:?}").contains("hunter2"));
        assert!(!format!("{value}").contains("hunter2"));
    }

    #[test]
    fn serde_round_trips_plain_values() {
        let json = serde_json::to_string(&ConfigValue::Str("hola".to_string())).unwrap();
        assert_eq!(json, "\"hola\"");
        let back: ConfigValue = serde_json::from_str("true").unwrap();
        assert_eq!(back, ConfigValue::Bool(true));
        let back: ConfigValue = serde_json::from_str("\"plain\"").unwrap();
        assert_eq!(back, ConfigValue::Str("plain".to_string()));
    }

    #[test]
    fn secrets_serialize_as_their_content() {
        // Serialization is the one deliberate exposure point, mirroring how
        // secret strings are persisted in profile files.
        let value = ConfigValue::from_raw("hunter2", true);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"hunter2\"");
    }
}
