//! Immutable, versioned key/value state.
//!
//! Every structural operation returns a new `State`. Mutating operations
//! advance `sequence_id` by one; read-only views (`subset`) keep it.

use super::error::StateError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

/// Prefix marking a key as private.
///
/// Private keys are hidden from `keys()`, `items()` and `get_all()` and
/// always survive a `keep`-based `wipe`.
pub const PRIVATE_PREFIX: &str = "__";

/// Returns true if `key` carries the private marker.
pub fn is_private_key(key: &str) -> bool {
    key.starts_with(PRIVATE_PREFIX)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn add_numbers(current: &Value, delta: &Value) -> Option<Value> {
    if let (Some(a), Some(b)) = (current.as_i64(), delta.as_i64()) {
        if let Some(sum) = a.checked_add(b) {
            return Some(Value::from(sum));
        }
    }
    let sum = current.as_f64()? + delta.as_f64()?;
    Number::from_f64(sum).map(Value::Number)
}

/// Immutable snapshot of workflow data.
///
/// # Example
///
/// ```rust
/// use flowstate::core::State;
/// use serde_json::json;
///
/// let state = State::from_value(json!({"title": "Home"})).unwrap();
/// let next = state.update([("published", json!(true))]);
///
/// assert_eq!(state.sequence_id(), 0);
/// assert_eq!(next.sequence_id(), 1);
/// assert!(!state.contains("published"));
/// assert_eq!(next.get("published"), Some(&json!(true)));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    data: Map<String, Value>,
    sequence_id: u64,
    created_at: DateTime<Utc>,
}

impl Default for State {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Map<String, Value>> for State {
    fn from(data: Map<String, Value>) -> Self {
        Self::new(data)
    }
}

impl State {
    /// Create a state at sequence zero.
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            data,
            sequence_id: 0,
            created_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Map::new())
    }

    /// Create a state from a JSON object.
    ///
    /// Fails with `InvalidArgument` if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, StateError> {
        match value {
            Value::Object(data) => Ok(Self::new(data)),
            other => Err(StateError::InvalidArgument(format!(
                "state data must be an object, found {}",
                type_name(&other)
            ))),
        }
    }

    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Look up a key, private keys included.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Look up a key, falling back to `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.data.get(key).unwrap_or(default)
    }

    /// Look up a key, failing with `KeyNotFound` when absent.
    pub fn try_get(&self, key: &str) -> Result<&Value, StateError> {
        self.data.get(key).ok_or_else(|| StateError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Decode the value at `key` into a typed value.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, StateError> {
        let value = self.try_get(key)?;
        serde_json::from_value(value.clone())
            .map_err(|e| StateError::Deserialization(format!("key '{key}': {e}")))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Public keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data
            .keys()
            .map(String::as_str)
            .filter(|k| !is_private_key(k))
    }

    /// Public entries in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .filter(|(k, _)| !is_private_key(k))
    }

    /// Copy of all public entries.
    pub fn get_all(&self) -> Map<String, Value> {
        self.items()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // Saturates at `u64::MAX` rather than wrapping back below older versions.
    fn successor(&self, data: Map<String, Value>) -> Self {
        Self {
            data,
            sequence_id: self.sequence_id.saturating_add(1),
            created_at: Utc::now(),
        }
    }

    /// Merge `values` over the existing data.
    pub fn update<I, K, V>(&self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut data = self.data.clone();
        for (key, value) in values {
            data.insert(key.into(), value.into());
        }
        self.successor(data)
    }

    /// Append each value to the array stored at its key.
    ///
    /// An absent key starts as an empty array. Any other existing value
    /// fails with `TypeMismatch`.
    pub fn append<I, K, V>(&self, values: I) -> Result<Self, StateError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut data = self.data.clone();
        for (key, value) in values {
            let key = key.into();
            let slot = data
                .entry(key.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            match slot {
                Value::Array(items) => items.push(value.into()),
                other => {
                    return Err(StateError::TypeMismatch {
                        key,
                        expected: "array",
                        found: type_name(other),
                    })
                }
            }
        }
        Ok(self.successor(data))
    }

    /// Add each numeric delta to the number stored at its key.
    ///
    /// An absent key counts as zero. Integer sums stay integers unless
    /// they overflow, in which case they widen to floating point.
    pub fn increment<I, K, V>(&self, values: I) -> Result<Self, StateError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut data = self.data.clone();
        for (key, delta) in values {
            let key = key.into();
            let delta = delta.into();
            if !delta.is_number() {
                return Err(StateError::TypeMismatch {
                    key,
                    expected: "number",
                    found: type_name(&delta),
                });
            }
            let slot = data.entry(key.clone()).or_insert_with(|| Value::from(0));
            match add_numbers(slot, &delta) {
                Some(sum) => *slot = sum,
                None => {
                    return Err(StateError::TypeMismatch {
                        key,
                        expected: "number",
                        found: type_name(slot),
                    })
                }
            }
        }
        Ok(self.successor(data))
    }

    /// Shallow-merge `values` into the object stored at `key`.
    pub fn merge(&self, key: &str, values: Map<String, Value>) -> Result<Self, StateError> {
        let mut data = self.data.clone();
        let slot = data
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match slot {
            Value::Object(existing) => {
                for (k, v) in values {
                    existing.insert(k, v);
                }
            }
            other => {
                return Err(StateError::TypeMismatch {
                    key: key.to_string(),
                    expected: "object",
                    found: type_name(other),
                })
            }
        }
        Ok(self.successor(data))
    }

    /// Read-only view restricted to the requested keys that exist.
    ///
    /// The view keeps this state's `sequence_id` and timestamp.
    pub fn subset<K: AsRef<str>>(&self, keys: &[K]) -> Self {
        let data = self
            .data
            .iter()
            .filter(|(k, _)| keys.iter().any(|wanted| wanted.as_ref() == k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            data,
            sequence_id: self.sequence_id,
            created_at: self.created_at,
        }
    }

    /// Remove keys from the state.
    ///
    /// With `keep`, everything except the listed keys and private keys is
    /// removed. With `delete`, exactly the listed keys are removed. With
    /// neither, every public key is removed. Passing both fails with
    /// `InvalidArgument`.
    pub fn wipe(&self, keep: Option<&[&str]>, delete: Option<&[&str]>) -> Result<Self, StateError> {
        let data = match (keep, delete) {
            (Some(_), Some(_)) => {
                return Err(StateError::InvalidArgument(
                    "wipe accepts either keep or delete, not both".to_string(),
                ))
            }
            (Some(keep), None) => {
                self.retained(|k| is_private_key(k) || keep.iter().any(|kept| *kept == k))
            }
            (None, Some(delete)) => self.retained(|k| !delete.iter().any(|gone| *gone == k)),
            (None, None) => self.retained(is_private_key),
        };
        Ok(self.successor(data))
    }

    fn retained(&self, keep: impl Fn(&str) -> bool) -> Map<String, Value> {
        self.data
            .iter()
            .filter(|(k, _)| keep(k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Structured payload: `{ data, sequence_id, created_at }`.
    pub fn serialize(&self) -> Value {
        json!({
            "data": Value::Object(self.data.clone()),
            "sequence_id": self.sequence_id,
            "created_at": self.created_at.to_rfc3339(),
        })
    }

    /// Rebuild a state from a payload produced by `serialize`.
    pub fn deserialize(payload: &Value) -> Result<Self, StateError> {
        serde_json::from_value(payload.clone())
            .map_err(|e| StateError::Deserialization(e.to_string()))
    }
}
