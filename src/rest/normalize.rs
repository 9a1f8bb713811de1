//! Response envelope normalization.
//!
//! Many APIs wrap payloads as `{"data": ...}`. The normalizer strips that
//! envelope and reports whether the result is one record or a list of them.
//!
//! | Body | [`UnwrapPolicy::CollapseSingleton`] | [`UnwrapPolicy::Preserve`] |
//! |---|---|---|
//! | `{"data":[{"id":1}]}` | `Single({"id":1})` | `Many([{"id":1}])` |
//! | `{"data":[{"id":1},{"id":2}]}` | `Many([..])` | `Many([..])` |
//! | `{"data":{"id":1}}` | `Single({"id":1})` | `Single({"id":1})` |
//! | `{"id":1}` | `Single({"id":1})` | `Single({"id":1})` |
//! | `[{"id":1}]` | `Many([{"id":1}])` | `Many([{"id":1}])` |
//!
//! A `data` field that is `null` counts as absent. Under the default policy a
//! one-element `data` list is indistinguishable from a single record; APIs
//! whose `data` always means "list of records" should use
//! [`UnwrapPolicy::Preserve`].

use serde::de::DeserializeOwned;
use serde_json::Value;

/// The envelope field that is unwrapped.
pub const ENVELOPE_FIELD: &str = "data";

/// Controls whether a one-element `data` list is collapsed to its element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnwrapPolicy {
    /// `{"data":[x]}` becomes `Single(x)`.
    #[default]
    CollapseSingleton,
    /// `{"data":[x]}` stays `Many([x])`.
    Preserve,
}

/// A normalized response body.
#[derive(Clone, Debug, PartialEq)]
pub enum Normalized {
    /// A single record, or any non-list value.
    Single(Value),
    /// A list of records.
    Many(Vec<Value>),
}

impl Normalized {
    /// Returns `true` for [`Normalized::Single`].
    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Returns the single record, if this is one.
    #[must_use]
    pub const fn as_single(&self) -> Option<&Value> {
        match self {
            Self::Single(value) => Some(value),
            Self::Many(_) => None,
        }
    }

    /// Returns the records, if this is a list.
    #[must_use]
    pub fn as_many(&self) -> Option<&[Value]> {
        match self {
            Self::Single(_) => None,
            Self::Many(values) => Some(values),
        }
    }

    /// Looks up a top-level field of a single object record.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_single().and_then(|value| value.get(name))
    }

    /// Removes and returns a top-level field of a single object record.
    pub fn take_field(&mut self, name: &str) -> Option<Value> {
        match self {
            Self::Single(Value::Object(map)) => map.remove(name),
            _ => None,
        }
    }

    /// Converts back into a plain JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Single(value) => value,
            Self::Many(values) => Value::Array(values),
        }
    }

    /// Deserializes the normalized body into `T`.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the value does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Self::Single(value) => T::deserialize(value),
            Self::Many(values) => T::deserialize(Value::Array(values.clone())),
        }
    }
}

/// Normalizes an already-decoded body.
#[must_use]
pub fn normalize_value(body: Value, policy: UnwrapPolicy) -> Normalized {
    match body {
        Value::Object(mut map) => {
            let has_data = map
                .get(ENVELOPE_FIELD)
                .is_some_and(|data| !data.is_null());
            if has_data {
                let data = map.remove(ENVELOPE_FIELD).unwrap_or(Value::Null);
                unwrap_data(data, policy)
            } else {
                Normalized::Single(Value::Object(map))
            }
        }
        Value::Array(values) => Normalized::Many(values),
        other => Normalized::Single(other),
    }
}

/// Decodes and normalizes a raw body. An empty body decodes to `null`.
///
/// # Errors
///
/// Returns the decode error if the body is not valid JSON.
pub fn normalize(raw: &str, policy: UnwrapPolicy) -> Result<Normalized, serde_json::Error> {
    let body = if raw.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(raw)?
    };
    Ok(normalize_value(body, policy))
}

fn unwrap_data(data: Value, policy: UnwrapPolicy) -> Normalized {
    match data {
        Value::Array(mut values) if values.len() == 1 && policy == UnwrapPolicy::CollapseSingleton => {
            Normalized::Single(values.remove(0))
        }
        Value::Array(values) => Normalized::Many(values),
        other => Normalized::Single(other),
    }
}
