//! Numeric Normalization
//!
//! Proving backends emit proofs and public signals as JSON whose numbers are
//! strings, sometimes decimal and sometimes `0x` hex. `normalize` walks such a
//! value and turns every numeric string into a `Uint`, leaving everything else
//! and the container shape untouched.

use serde_json::Value;

use crate::types::{NormalizedValue, Uint};

/// Normalize a JSON value.
///
/// - strings matching `^[0-9]+$` or `^0x[0-9a-fA-F]+$` become `Integer`
/// - arrays and objects are normalized element-wise, shape preserved
/// - `null` stays `Null`
/// - every other scalar passes through unchanged
pub fn normalize(value: &Value) -> NormalizedValue {
    match value {
        Value::String(s) => match Uint::parse(s) {
            Some(integer) => NormalizedValue::Integer(integer),
            None => NormalizedValue::Passthrough(value.clone()),
        },
        Value::Array(items) => NormalizedValue::Sequence(items.iter().map(normalize).collect()),
        Value::Object(entries) => NormalizedValue::Mapping(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), normalize(value)))
                .collect(),
        ),
        Value::Null => NormalizedValue::Null,
        Value::Bool(_) | Value::Number(_) => NormalizedValue::Passthrough(value.clone()),
    }
}

/// Normalize a value that may already be partly normalized.
///
/// Integers are kept, passthrough scalars are re-examined, so applying this to
/// the output of `normalize` returns an equal value.
pub fn renormalize(value: &NormalizedValue) -> NormalizedValue {
    match value {
        NormalizedValue::Integer(_) | NormalizedValue::Null => value.clone(),
        NormalizedValue::Sequence(items) => {
            NormalizedValue::Sequence(items.iter().map(renormalize).collect())
        }
        NormalizedValue::Mapping(entries) => NormalizedValue::Mapping(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), renormalize(value)))
                .collect(),
        ),
        NormalizedValue::Passthrough(scalar) => normalize(scalar),
    }
}

/// Canonical decimal rendering of a numeric string, if it is one
pub fn canonical_decimal(s: &str) -> Option<String> {
    Uint::parse(s).map(|value| value.to_string())
}
