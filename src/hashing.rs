//! Hashing System - SHA-256 for Reproducibility
//!
//! Content and job hashes let callers prove two runs produced the same
//! artifact from the same inputs.

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::{Value, to_string};

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

/// Hash of the rendered text artifact
pub fn compute_content_hash(text: &str) -> String {
    sha256_hex(text.as_bytes())
}

/// Compute job hash for audit logging
/// job_hash = sha256(language + canonical_payload + engine_version)
pub fn compute_job_hash(
    language: &str,
    payload: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical_payload = canonical_json(payload)?;
    let combined = format!("{}:{}:{}", language, canonical_payload, engine_version);
    Ok(sha256_hex(combined.as_bytes()))
}

// We need hex encoding
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_hash_deterministic() {
        let data = b"test data";
        let h1 = sha256_hex(data);
        let h2 = sha256_hex(data);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_content_hash_tracks_text() {
        let h1 = compute_content_hash("#pragma once\n");
        let h2 = compute_content_hash("#pragma once\n");
        let h3 = compute_content_hash("#pragma once\n\n");
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_job_hash_stable() {
        let payload = json!({
            "configuration": "Application",
            "fileVersion": "1.2.3.4"
        });
        let h1 = compute_job_hash("c++", &payload, "1.0.0").unwrap();
        let h2 = compute_job_hash("c++", &payload, "1.0.0").unwrap();
        assert_eq!(h1, h2);
    }
}
