//! Old-attribute snapshot handling.

use trail_core::AttributeMap;

/// Holds the most recently audited state of one record instance.
///
/// The held map is replaced wholesale on every capture, never mutated field
/// by field, so the next diff base is always a complete state. Empty until
/// the record is first loaded or audited.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    attributes: AttributeMap,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held state with a fresh capture.
    pub fn capture(&mut self, attributes: AttributeMap) {
        self.attributes = attributes;
    }

    /// The held state; empty if never captured.
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Whether anything has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn capture_replaces_wholesale() {
        let mut snapshot = Snapshot::new();
        assert!(snapshot.is_empty());

        let mut first = AttributeMap::new();
        first.insert("name".to_string(), json!("Ann"));
        first.insert("status".to_string(), json!("new"));
        snapshot.capture(first);
        assert_eq!(snapshot.attributes().len(), 2);

        let mut second = AttributeMap::new();
        second.insert("name".to_string(), json!("Anna"));
        snapshot.capture(second);

        // The old "status" key is gone, not merged.
        assert_eq!(snapshot.attributes().len(), 1);
        assert_eq!(snapshot.attributes().get("name"), Some(&json!("Anna")));
    }
}
