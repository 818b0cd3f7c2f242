//! Normalized JSON-like values

use std::collections::BTreeMap;

use super::uint::Uint;

/// A JSON-like value whose numeric strings have been reinterpreted as integers.
///
/// Container shape is kept exactly: sequences stay ordered sequences, mappings
/// keep their key set. Mapping iteration is sorted by key, which matches how
/// `serde_json` iterates objects and keeps output deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    Integer(Uint),
    Sequence(Vec<NormalizedValue>),
    Mapping(BTreeMap<String, NormalizedValue>),
    Null,
    /// Any other scalar, unchanged
    Passthrough(serde_json::Value),
}

impl NormalizedValue {
    pub fn as_integer(&self) -> Option<&Uint> {
        match self {
            NormalizedValue::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[NormalizedValue]> {
        match self {
            NormalizedValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a mapping key
    pub fn get(&self, key: &str) -> Option<&NormalizedValue> {
        match self {
            NormalizedValue::Mapping(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Index into a sequence
    pub fn at(&self, index: usize) -> Option<&NormalizedValue> {
        self.as_sequence().and_then(|items| items.get(index))
    }

    /// Back to JSON, integers rendered as decimal strings.
    ///
    /// This is the shape proving backends expect when reading a proof file.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            NormalizedValue::Integer(value) => serde_json::Value::String(value.to_string()),
            NormalizedValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(NormalizedValue::to_json).collect())
            }
            NormalizedValue::Mapping(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            NormalizedValue::Null => serde_json::Value::Null,
            NormalizedValue::Passthrough(value) => value.clone(),
        }
    }
}

impl From<Uint> for NormalizedValue {
    fn from(value: Uint) -> Self {
        NormalizedValue::Integer(value)
    }
}
