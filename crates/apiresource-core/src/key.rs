//! Key verification for externally supplied identifiers.
//!
//! Every resource type declares how its primary keys look. Keys arriving
//! from a request are checked and normalised before any lookup happens;
//! whatever goes wrong, the caller only ever sees
//! [`Error::InvalidFieldValue`] for field `id`.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::value::Value;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

const UUID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

/// Custom key verifier: receives the raw key and the request context and
/// returns the normalised key.
pub type KeyVerifierFn = Arc<dyn Fn(&Value, &Context) -> Result<Value> + Send + Sync>;

/// Configured key format of a resource type.
#[derive(Clone, Default)]
pub enum KeyType {
    /// Integer keys; numeric strings are parsed (`"45"` -> `45`).
    #[default]
    Integer,
    /// Opaque string keys; commas are rejected (multi-key separator).
    String,
    /// Canonical 8-4-4-4-12 hexadecimal UUIDs.
    Uuid,
    /// Application-defined verification.
    Custom(KeyVerifierFn),
}

impl fmt::Debug for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Integer => write!(f, "Integer"),
            KeyType::String => write!(f, "String"),
            KeyType::Uuid => write!(f, "Uuid"),
            KeyType::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

fn uuid_regex() -> Option<&'static Regex> {
    static UUID: OnceLock<Option<Regex>> = OnceLock::new();
    UUID.get_or_init(|| match Regex::new(UUID_PATTERN) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(error = %e, "UUID pattern failed to compile, rejecting all UUID keys");
            None
        }
    })
    .as_ref()
}

/// Check if a string is a canonical UUID.
pub fn is_uuid(s: &str) -> bool {
    uuid_regex().is_some_and(|regex| regex.is_match(s))
}

impl KeyType {
    /// Wrap a closure as a custom key type.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Value, &Context) -> Result<Value> + Send + Sync + 'static,
    {
        KeyType::Custom(Arc::new(f))
    }

    /// Verify and normalise one key.
    pub fn verify(&self, key: &Value, context: &Context) -> Result<Value> {
        self.try_verify(key, context).map_err(|err| {
            tracing::debug!(key = %key, error = %err, "Key verification failed");
            Error::invalid_field_value("id", key.clone())
        })
    }

    /// Verify and normalise a sequence of keys, failing on the first bad one.
    pub fn verify_all(&self, keys: &[Value], context: &Context) -> Result<Vec<Value>> {
        keys.iter().map(|key| self.verify(key, context)).collect()
    }

    fn try_verify(&self, key: &Value, context: &Context) -> Result<Value> {
        match self {
            KeyType::Custom(f) => f(key, context),
            _ if key.is_null() => Ok(Value::Null),
            KeyType::Integer => parse_integer(key),
            KeyType::String => {
                if key.to_string().contains(',') {
                    Err(Error::invalid_field_value("id", key.clone()))
                } else {
                    Ok(key.clone())
                }
            }
            KeyType::Uuid => {
                if is_uuid(&key.to_string()) {
                    Ok(key.clone())
                } else {
                    Err(Error::invalid_field_value("id", key.clone()))
                }
            }
        }
    }
}

fn parse_integer(key: &Value) -> Result<Value> {
    let parsed = match key {
        Value::Int(v) => Some(*v),
        Value::Text(s) => s.trim().parse::<i64>().ok(),
        #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
        Value::Double(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
        Value::Json(v) => v.as_i64(),
        _ => None,
    };
    parsed
        .map(Value::Int)
        .ok_or_else(|| Error::invalid_field_value("id", key.clone()))
}
