//! Diff computation over attribute maps.
//!
//! Comparison runs on normalized maps: composite values are replaced by
//! their canonical JSON string before any equality check, so nested
//! structures never get compared by identity and never abort a pass.
//!
//! Equality is strict and typed: `0`, `"0"` and `false` are three distinct
//! values. The one coalescing rule is that the empty-equivalent values
//! (JSON null, empty string, absent-in-old) count as equal in the
//! change-detection guard and in the skip-nulls gate, so fields a framework
//! materializes as unset/empty do not flood the log.

use serde_json::Value;
use trail_core::{canonical_json, AttributeMap};

/// A single detected field-level difference.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Field name.
    pub field: String,
    /// Previous value; `None` when the field was absent or null.
    pub old_value: Option<Value>,
    /// New value; `None` when the new value is null.
    pub new_value: Option<Value>,
}

/// Produce a comparison-safe map: composites become canonical JSON strings,
/// scalars pass through unchanged.
pub fn normalize(attributes: &AttributeMap) -> AttributeMap {
    attributes
        .iter()
        .map(|(name, value)| {
            let normalized = match value {
                Value::Array(_) | Value::Object(_) => Value::String(canonical_json(value)),
                scalar => scalar.clone(),
            };
            (name.clone(), normalized)
        })
        .collect()
}

/// True iff at least one field of `new` differs from `old`.
///
/// Both maps must already be filtered and normalized. A field absent from
/// `old` counts as different unless both sides are empty-equivalent.
pub fn has_changes(new: &AttributeMap, old: &AttributeMap) -> bool {
    new.iter().any(|(name, value)| {
        let old_value = old.get(name).unwrap_or(&Value::Null);
        !(both_empty(value, old_value) || value == old_value)
    })
}

/// Enumerate per-field differences, in the iteration order of `new`.
///
/// A field absent from `old` is treated as empty. With `skip_nulls`, fields
/// whose old and new values are both empty-equivalent are skipped entirely.
pub fn diff_fields(new: &AttributeMap, old: &AttributeMap, skip_nulls: bool) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    for (name, value) in new {
        let old_value = old.get(name).unwrap_or(&Value::Null);

        if skip_nulls && both_empty(value, old_value) {
            continue;
        }

        if value != old_value {
            changes.push(FieldChange {
                field: name.clone(),
                old_value: present(old_value),
                new_value: present(value),
            });
        }
    }

    changes
}

/// Empty-equivalent: JSON null or the empty string.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn both_empty(a: &Value, b: &Value) -> bool {
    is_empty(a) && is_empty(b)
}

fn present(value: &Value) -> Option<Value> {
    if value.is_null() {
        None
    } else {
        Some(value.clone())
    }
}
