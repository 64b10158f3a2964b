//! The audit orchestrator.
//!
//! One [`Auditor`] is bound to one record instance and driven by the host's
//! lifecycle notifications: load, insert, update, delete. It owns the old
//! snapshot used as the diff base; the contract is that one record instance
//! is manipulated by at most one logical operation at a time.

use std::sync::Arc;

use serde_json::Value;
use trail_core::{normalize_primary_key, AttributeMap, AuditConfig, Record};

use crate::diff;
use crate::entry::{short_type_name, AuditAction, AuditEntry, Stamp};
use crate::error::AuditError;
use crate::filter;
use crate::identity::{IdentityProvider, NoIdentity};
use crate::sink::{create_sink, AuditSink, NullSink};
use crate::snapshot::Snapshot;

/// The change auditor.
///
/// Consumes lifecycle notifications and produces audit entries through the
/// configured sink.
pub struct Auditor {
    config: AuditConfig,
    sink: Arc<dyn AuditSink>,
    identity: Arc<dyn IdentityProvider>,
    snapshot: Snapshot,
}

impl Auditor {
    /// Create an auditor with the sink chosen by the configuration.
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        let sink = create_sink(&config)?;
        Ok(Self::with_sink(config, Arc::from(sink)))
    }

    /// Create an auditor writing to the given sink.
    pub fn with_sink(config: AuditConfig, sink: Arc<dyn AuditSink>) -> Self {
        Self {
            config,
            sink,
            identity: Arc::new(NoIdentity),
            snapshot: Snapshot::new(),
        }
    }

    /// Attach an identity provider for actor resolution.
    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }

    /// Create a disabled (no-op) auditor.
    pub fn disabled() -> Self {
        Self::with_sink(
            AuditConfig {
                active: false,
                ..Default::default()
            },
            Arc::new(NullSink),
        )
    }

    /// Whether auditing is switched on.
    pub fn is_active(&self) -> bool {
        self.config.active
    }

    /// The host loaded the record: establish the comparison baseline.
    ///
    /// Produces no entries. Pass the freshly loaded, unfiltered attributes.
    pub fn on_load(&mut self, attributes: AttributeMap) {
        self.snapshot.capture(attributes);
    }

    /// The host inserted the record.
    ///
    /// Emits one CREATE marker plus one SET entry per populated field, then
    /// refreshes the snapshot.
    pub async fn on_insert(&mut self, record: &dyn Record) -> Result<(), AuditError> {
        self.audit(record, true).await
    }

    /// The host updated the record.
    ///
    /// Emits one CHANGE entry per differing field, then refreshes the
    /// snapshot.
    pub async fn on_update(&mut self, record: &dyn Record) -> Result<(), AuditError> {
        self.audit(record, false).await
    }

    /// The host deleted the record.
    ///
    /// Emits one DELETE marker with no field detail. No filtering, no diff,
    /// no snapshot refresh — the instance is terminal.
    pub async fn on_delete(&mut self, record: &dyn Record) -> Result<(), AuditError> {
        if filter::should_skip_type(record.record_type(), &self.config.ignored_classes) {
            return Ok(());
        }
        self.leave_trail(record, AuditAction::Delete, None, None, None)
            .await
    }

    async fn audit(&mut self, record: &dyn Record, is_insert: bool) -> Result<(), AuditError> {
        if filter::should_skip_type(record.record_type(), &self.config.ignored_classes) {
            return Ok(());
        }

        let current = record.attributes();

        let new_attrs = filter::apply(current.clone(), &self.config.allowed, &self.config.ignored);
        let old_attrs = filter::apply(
            self.snapshot.attributes().clone(),
            &self.config.allowed,
            &self.config.ignored,
        );

        let new_norm = diff::normalize(&new_attrs);
        let old_norm = diff::normalize(&old_attrs);

        // No difference within the audited fields: keep the existing
        // snapshot valid for the next pass.
        if !diff::has_changes(&new_norm, &old_norm) {
            return Ok(());
        }

        if is_insert {
            self.leave_trail(record, AuditAction::Create, None, None, None)
                .await?;
        }

        let action = if is_insert {
            AuditAction::Set
        } else {
            AuditAction::Change
        };
        for change in diff::diff_fields(&new_norm, &old_norm, self.config.skip_nulls) {
            self.leave_trail(
                record,
                action,
                Some(change.field),
                change.new_value,
                change.old_value,
            )
            .await?;
        }

        // The diff base for the next pass is the full current state, not
        // the filtered view.
        self.snapshot.capture(current);

        Ok(())
    }

    async fn leave_trail(
        &self,
        record: &dyn Record,
        action: AuditAction,
        field: Option<String>,
        new_value: Option<Value>,
        old_value: Option<Value>,
    ) -> Result<(), AuditError> {
        if !self.config.active {
            return Ok(());
        }

        let model_type = if self.config.short_type_names {
            short_type_name(record.record_type()).to_string()
        } else {
            record.record_type().to_string()
        };

        let mut builder = AuditEntry::builder(
            action,
            model_type,
            normalize_primary_key(&record.primary_key()),
        )
        .stamp(Stamp::now(
            self.config.store_timestamp,
            &self.config.date_format,
        ));

        if let Some(field) = field {
            builder = builder.field(field);
        }
        if let Some(value) = new_value {
            builder = builder.new_value(value);
        }
        if let Some(value) = old_value {
            builder = builder.old_value(value);
        }
        if let Some(actor) = self.resolve_actor(record) {
            builder = builder.actor(actor);
        }

        let entry = builder.build();

        tracing::debug!(
            entry_id = %entry.entry_id,
            action = %entry.action,
            model = %entry.model_type,
            model_id = %entry.model_id,
            field = entry.field.as_deref().unwrap_or("-"),
            "audit entry"
        );

        self.sink.save(entry).await
    }

    /// Resolve who made the change. Absence is never an error.
    fn resolve_actor(&self, record: &dyn Record) -> Option<String> {
        match &self.config.user_attribute {
            Some(attribute) => record
                .attributes()
                .get(attribute)
                .and_then(scalar_to_string),
            None => self.identity.current_actor_id(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
