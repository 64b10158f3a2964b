//! Audit entry types.
//!
//! One entry per detected event: who changed what, when, and how.
//! Entries are immutable once built; their lifecycle is create, persist,
//! done.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trail_core::DEFAULT_DATE_FORMAT;
use uuid::Uuid;

/// Classification of an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A new record appeared. Emitted once per insert, with no field detail.
    Create,
    /// A field received its initial value on insert.
    Set,
    /// A field's value changed on update.
    Change,
    /// The record was deleted. Emitted once, with no field detail.
    Delete,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Set => write!(f, "SET"),
            Self::Change => write!(f, "CHANGE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// When the entry was recorded, in one of two storable representations.
///
/// Downstream consumers expect either a raw epoch or a rendered calendar
/// timestamp; which one is produced is selected by the `store_timestamp`
/// configuration switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stamp {
    /// Unix epoch seconds.
    Epoch(i64),
    /// Calendar timestamp rendered with the configured format string.
    Formatted(String),
}

impl Stamp {
    /// Capture the current time in the configured representation.
    pub fn now(store_timestamp: bool, date_format: &str) -> Self {
        let now = Utc::now();
        if store_timestamp {
            Self::Epoch(now.timestamp())
        } else {
            Self::Formatted(now.format(date_format).to_string())
        }
    }
}

/// Truncate a path-qualified type name to its final segment.
pub fn short_type_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

/// One audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry ID.
    pub entry_id: Uuid,

    /// Type name of the audited record.
    pub model_type: String,

    /// Normalized primary key of the audited record.
    pub model_id: String,

    /// What happened.
    pub action: AuditAction,

    /// Field name (absent on CREATE/DELETE markers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Previous value, normalized (absent when the field had none).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,

    /// New value, normalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,

    /// When the entry was recorded.
    pub stamp: Stamp,

    /// Who made the change, if resolvable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
}

impl AuditEntry {
    /// Create a builder for an audit entry.
    pub fn builder(
        action: AuditAction,
        model_type: impl Into<String>,
        model_id: impl Into<String>,
    ) -> AuditEntryBuilder {
        AuditEntryBuilder::new(action, model_type, model_id)
    }

    /// Format the entry as a human-readable log line.
    ///
    /// Format: `[stamp] ACTION model=... id=... [field=...] [actor=...]`
    pub fn to_log_line(&self) -> String {
        let stamp = match &self.stamp {
            Stamp::Epoch(secs) => secs.to_string(),
            Stamp::Formatted(s) => s.clone(),
        };
        let mut line = format!(
            "[{}] {} model={} id={}",
            stamp, self.action, self.model_type, self.model_id,
        );

        if let Some(ref field) = self.field {
            line.push_str(&format!(" field={}", field));
        }

        if let Some(ref old) = self.old_value {
            line.push_str(&format!(" old={}", old));
        }

        if let Some(ref new) = self.new_value {
            line.push_str(&format!(" new={}", new));
        }

        if let Some(ref actor) = self.actor_id {
            line.push_str(&format!(" actor={}", actor));
        }

        line
    }
}

/// Builder for audit entries.
#[derive(Debug)]
pub struct AuditEntryBuilder {
    entry: AuditEntry,
}

impl AuditEntryBuilder {
    /// Create a new builder with the required fields.
    pub fn new(
        action: AuditAction,
        model_type: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            entry: AuditEntry {
                entry_id: Uuid::new_v4(),
                model_type: model_type.into(),
                model_id: model_id.into(),
                action,
                field: None,
                old_value: None,
                new_value: None,
                stamp: Stamp::now(false, DEFAULT_DATE_FORMAT),
                actor_id: None,
            },
        }
    }

    /// Set the field name.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.entry.field = Some(field.into());
        self
    }

    /// Set the previous value.
    pub fn old_value(mut self, value: Value) -> Self {
        self.entry.old_value = Some(value);
        self
    }

    /// Set the new value.
    pub fn new_value(mut self, value: Value) -> Self {
        self.entry.new_value = Some(value);
        self
    }

    /// Set the stamp.
    pub fn stamp(mut self, stamp: Stamp) -> Self {
        self.entry.stamp = stamp;
        self
    }

    /// Set the actor id.
    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.entry.actor_id = Some(actor.into());
        self
    }

    /// Build the audit entry.
    pub fn build(self) -> AuditEntry {
        self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_populates_entry() {
        let entry = AuditEntry::builder(AuditAction::Change, "User", "1")
            .field("name")
            .old_value(json!("Ann"))
            .new_value(json!("Anna"))
            .actor("42")
            .build();

        assert_eq!(entry.action, AuditAction::Change);
        assert_eq!(entry.model_type, "User");
        assert_eq!(entry.model_id, "1");
        assert_eq!(entry.field.as_deref(), Some("name"));
        assert_eq!(entry.old_value, Some(json!("Ann")));
        assert_eq!(entry.new_value, Some(json!("Anna")));
        assert_eq!(entry.actor_id.as_deref(), Some("42"));
    }

    #[test]
    fn action_serializes_screaming_case() {
        assert_eq!(serde_json::to_string(&AuditAction::Create).unwrap(), "\"CREATE\"");
        assert_eq!(serde_json::to_string(&AuditAction::Set).unwrap(), "\"SET\"");
        assert_eq!(serde_json::to_string(&AuditAction::Change).unwrap(), "\"CHANGE\"");
        assert_eq!(serde_json::to_string(&AuditAction::Delete).unwrap(), "\"DELETE\"");
    }

    #[test]
    fn stamp_representation_follows_switch() {
        match Stamp::now(true, DEFAULT_DATE_FORMAT) {
            Stamp::Epoch(secs) => assert!(secs > 0),
            Stamp::Formatted(_) => panic!("expected epoch stamp"),
        }
        match Stamp::now(false, "%Y-%m-%d") {
            Stamp::Formatted(s) => assert_eq!(s.len(), 10),
            Stamp::Epoch(_) => panic!("expected formatted stamp"),
        }
    }

    #[test]
    fn stamp_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Stamp::Epoch(1700000000)).unwrap(), "1700000000");
        assert_eq!(
            serde_json::to_string(&Stamp::Formatted("2024-01-01 00:00:00".into())).unwrap(),
            "\"2024-01-01 00:00:00\""
        );
    }

    #[test]
    fn short_type_name_takes_last_segment() {
        assert_eq!(short_type_name("app::models::User"), "User");
        assert_eq!(short_type_name("User"), "User");
    }

    #[test]
    fn entry_round_trips_through_json() {
        let entry = AuditEntry::builder(AuditAction::Set, "Order", "9")
            .field("total")
            .new_value(json!(100))
            .stamp(Stamp::Epoch(1700000000))
            .build();

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.entry_id, entry.entry_id);
        assert_eq!(parsed.action, AuditAction::Set);
        assert_eq!(parsed.stamp, Stamp::Epoch(1700000000));
        assert_eq!(parsed.old_value, None);
    }

    #[test]
    fn log_line_contains_core_fields() {
        let entry = AuditEntry::builder(AuditAction::Delete, "User", "7")
            .stamp(Stamp::Formatted("2024-01-01 00:00:00".into()))
            .build();

        let line = entry.to_log_line();
        assert!(line.contains("DELETE"));
        assert!(line.contains("model=User"));
        assert!(line.contains("id=7"));
    }
}
