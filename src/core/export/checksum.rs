//! Checksum calculation for export documents
//!
//! Gives operators a stable fingerprint of an export so two runs can be
//! compared without diffing the documents.

use crate::domain::{CompendiumError, Result};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Calculate the SHA-256 checksum of any serializable value
///
/// The value is converted to JSON with object keys sorted at every level, so
/// key order never changes the result. Array order does.
///
/// # Examples
///
/// ```
/// use compendium::core::export::checksum::calculate_checksum;
/// use serde_json::json;
///
/// let a = calculate_checksum(&json!({"x": 1, "y": 2})).unwrap();
/// let b = calculate_checksum(&json!({"y": 2, "x": 1})).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn calculate_checksum<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    let value =
        serde_json::to_value(data).map_err(|e| CompendiumError::Serialization(e.to_string()))?;
    let normalized = normalize_json(&value);

    let data_str = serde_json::to_string(&normalized)
        .map_err(|e| CompendiumError::Serialization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(data_str.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn normalize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), normalize_json(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(normalize_json).collect()),
        _ => value.clone(),
    }
}
