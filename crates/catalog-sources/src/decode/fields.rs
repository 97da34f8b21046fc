//! Field-level deserializers for the upstream index.
//!
//! Upstream mixes numbers and numeric strings, sends `null` where a value is
//! expected, and occasionally puts an object where an array should be. Every
//! helper here except [`id`] and [`required_string`] falls back to a default
//! instead of failing the enclosing record.

use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Duration strings upstream uses to mean "no duration"
const ABSENT_DURATIONS: [&str; 2] = ["null", "N/A"];

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_f32(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Required integer identifier. Accepts integral numbers and integer strings.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_as_i64(&value).ok_or_else(|| D::Error::custom(format!("expected integer id, got {}", value)))
}

/// Required non-blank string
pub(crate) fn required_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s),
        other => Err(D::Error::custom(format!("expected non-empty string, got {}", other))),
    }
}

pub(crate) fn year<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_i64(&value)
        .and_then(|y| u32::try_from(y).ok())
        .unwrap_or(0))
}

pub(crate) fn float_or_zero<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_f32(&value).filter(|f| f.is_finite()).unwrap_or(0.0))
}

pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Present-and-non-blank string, otherwise None
pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Like [`opt_string`], with the literal "null" and "N/A" treated as absent
pub(crate) fn duration<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = opt_string(deserializer)?;
    Ok(raw.filter(|d| !ABSENT_DURATIONS.contains(&d.trim())))
}

/// Nested collection: non-arrays become empty, malformed elements are dropped
pub(crate) fn tolerant_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let elements = match Value::deserialize(deserializer)? {
        Value::Array(elements) => elements,
        _ => return Ok(Vec::new()),
    };

    let total = elements.len();
    let kept: Vec<T> = elements
        .into_iter()
        .filter_map(|element| serde_json::from_value(element).ok())
        .collect();

    if kept.len() < total {
        debug!(skipped = total - kept.len(), kept = kept.len(), "Dropped malformed nested elements");
    }
    Ok(kept)
}
