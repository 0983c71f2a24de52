//! Payload decoding and field-name normalization.
//!
//! Producers disagree on key casing, so every key is folded to snake_case
//! (recursively, through nested objects and arrays) before any handler
//! looks at the message. Decoding is a pure function of the input bytes.

use crate::ingest::error::{DecodeError, ValidationError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A decoded payload with snake_case keys.
#[derive(Debug, Clone)]
pub struct NormalizedMessage {
    root: Map<String, Value>,
}

/// Parse raw bytes into a [`NormalizedMessage`].
pub fn decode(payload: &[u8]) -> Result<NormalizedMessage, DecodeError> {
    let value: Value = serde_json::from_slice(payload)?;
    match normalize_keys(value) {
        Value::Object(root) => Ok(NormalizedMessage { root }),
        _ => Err(DecodeError::NotAnObject),
    }
}

impl NormalizedMessage {
    /// Cheap string read, used for lock keys before the typed parse runs.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.root.get(key)?.as_str()
    }

    /// Cheap integer read, used for lock keys before the typed parse runs.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.root.get(key)?.as_i64()
    }

    /// Convert the whole message into a typed wire payload.
    pub fn to_payload<T: DeserializeOwned>(&self) -> Result<T, ValidationError> {
        serde_json::from_value(Value::Object(self.root.clone()))
            .map_err(|e| ValidationError::Field(e.to_string()))
    }
}

fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, nested)| (snake_case(&key), normalize_keys(nested)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Fold a camelCase/PascalCase/kebab-case key to snake_case.
///
/// Runs of uppercase collapse without separators, so `leagueID` becomes
/// `league_id` rather than `league_i_d`.
fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower_or_digit = false;
    for ch in key.chars() {
        if ch.is_uppercase() {
            if prev_lower_or_digit {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower_or_digit = false;
        } else if ch == '-' || ch == ' ' {
            out.push('_');
            prev_lower_or_digit = false;
        } else {
            out.push(ch);
            prev_lower_or_digit = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}
