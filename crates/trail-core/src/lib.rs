use serde_json::Value;

// Configuration types shared across the trail crates
pub mod config;

pub use config::{AuditConfig, ConfigError, SinkBackend, SinkConfig, DEFAULT_DATE_FORMAT};

/// A record's attribute set: field name to loosely typed value.
///
/// `serde_json::Value` is the value union (null, bool, number, string, and
/// array/object composites). The map preserves insertion order, which is the
/// order field-level audit entries are emitted in.
pub type AttributeMap = serde_json::Map<String, Value>;

/// Contract a persisted record must satisfy to be audited.
///
/// The host data-access layer implements this next to its entity types; the
/// auditor only ever reads through it.
pub trait Record {
    /// Type name of the record, used for class filtering and as the entry's
    /// `model_type`.
    fn record_type(&self) -> &str;

    /// The record's current attribute set.
    fn attributes(&self) -> AttributeMap;

    /// Primary key, scalar or composite (object/array for composite keys).
    fn primary_key(&self) -> Value;
}

/// Normalize a primary key to a single storable string.
///
/// Scalars stringify as-is; composite keys serialize to canonical JSON so
/// the same key always yields the same string regardless of how the host
/// assembled it.
pub fn normalize_primary_key(pk: &Value) -> String {
    match pk {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => canonical_json(pk),
        other => other.to_string(),
    }
}

/// Serialize a value to canonical JSON: object keys sorted recursively.
pub fn canonical_json(value: &Value) -> String {
    sorted(value).to_string()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = serde_json::Map::new();
            for key in keys {
                if let Some(inner) = map.get(key) {
                    out.insert(key.clone(), sorted(inner));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_keys_stringify_without_quotes() {
        assert_eq!(normalize_primary_key(&json!(7)), "7");
        assert_eq!(normalize_primary_key(&json!("abc-123")), "abc-123");
        assert_eq!(normalize_primary_key(&Value::Null), "");
    }

    #[test]
    fn composite_key_is_stable_across_insertion_orders() {
        let mut a = serde_json::Map::new();
        a.insert("tenant".to_string(), json!("t1"));
        a.insert("id".to_string(), json!(7));

        let mut b = serde_json::Map::new();
        b.insert("id".to_string(), json!(7));
        b.insert("tenant".to_string(), json!("t1"));

        let key_a = normalize_primary_key(&Value::Object(a));
        let key_b = normalize_primary_key(&Value::Object(b));
        assert_eq!(key_a, key_b);
        assert_eq!(key_a, r#"{"id":7,"tenant":"t1"}"#);
    }

    #[test]
    fn canonical_json_sorts_nested_objects() {
        let value = json!({"b": {"z": 1, "a": 2}, "a": [{"y": 1, "x": 2}]});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":[{"x":2,"y":1}],"b":{"a":2,"z":1}}"#
        );
    }
}
