//! Lenient (de)serializers for layout records
//!
//! Records arrive through a form-encoded transport and from older stored
//! options, so scalars show up as strings, absent lists as `false`, and
//! sparse lists as objects keyed by index.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// `"slug"`, `null` or `false` → `Option<String>`
pub(crate) fn loose_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(true) => Ok(Some("true".to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a string, null or false, got {other}"
        ))),
    }
}

/// Integer or integer-like string → `u32`
pub(crate) fn loose_position<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| D::Error::custom(format!("invalid position: {value}")))
}

/// Bool, `"true"`/`"false"`, `0`/`1` or `null` → `bool`
pub(crate) fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean: {other:?}"))),
        },
        Value::Number(n) => Ok(n.as_u64().is_some_and(|n| n != 0)),
        other => Err(D::Error::custom(format!("invalid boolean: {other}"))),
    }
}

/// List, sparse index-keyed object, `null` or `false` → `Option<Vec<T>>`
pub(crate) fn loose_opt_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(None),
        other => seq_from_value(other).map(Some).map_err(D::Error::custom),
    }
}

/// Same as [`loose_opt_seq`] but absent lists collapse to empty
pub(crate) fn loose_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    loose_opt_seq(deserializer).map(Option::unwrap_or_default)
}

/// Object, empty list, `null` or `false` → map
pub(crate) fn loose_map<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(T::default()),
        Value::Array(items) if items.is_empty() => Ok(T::default()),
        other => serde_json::from_value(other).map_err(D::Error::custom),
    }
}

/// Writes `None` as `false`, the shape stored records have always used
pub(crate) fn opt_seq_or_false<S, T>(value: &Option<Vec<T>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(items) => items.serialize(serializer),
        None => serializer.serialize_bool(false),
    }
}

fn seq_from_value<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(|e| e.to_string()))
            .collect(),
        Value::Object(map) => {
            let mut keyed = map
                .into_iter()
                .map(|(key, item)| {
                    key.parse::<u64>()
                        .map(|index| (index, item))
                        .map_err(|_| format!("non-numeric list key: {key:?}"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            keyed.sort_by_key(|(index, _)| *index);
            keyed
                .into_iter()
                .map(|(_, item)| serde_json::from_value(item).map_err(|e| e.to_string()))
                .collect()
        }
        other => Err(format!("expected a list, got {other}")),
    }
}
