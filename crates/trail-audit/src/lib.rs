//! # trail-audit
//!
//! Change auditing for persisted records.
//!
//! Given a record's attribute set before and after a mutation, the engine
//! decides whether the mutation is worth recording, computes a per-field
//! diff, and writes structured audit entries describing who changed what,
//! when, and how. It is designed to be attached to the lifecycle of
//! persisted entities (create, update, delete, load) in a host data-access
//! layer.
//!
//! This crate provides functionality for:
//! - Capturing old-state snapshots across a record's lifecycle
//! - Filtering audited fields (allow-list / ignore-list / class exclusion)
//! - Diffing attribute maps with null-skipping and composite-safe comparison
//! - Classifying events as CREATE / SET / CHANGE / DELETE entries
//! - Persisting entries through pluggable sinks (file, console, memory)
//!
//! ## Actions
//!
//! | Action | Description |
//! |--------|-------------|
//! | `CREATE` | A new record appeared (one marker per insert) |
//! | `SET` | A field received its initial value on insert |
//! | `CHANGE` | A field's value changed on update |
//! | `DELETE` | The record was deleted (one marker, terminal) |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde_json::{json, Map, Value};
//! use trail_audit::{Auditor, MemorySink};
//! use trail_core::{AttributeMap, AuditConfig, Record};
//!
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Record for User {
//!     fn record_type(&self) -> &str {
//!         "User"
//!     }
//!
//!     fn attributes(&self) -> AttributeMap {
//!         let mut attrs = Map::new();
//!         attrs.insert("id".to_string(), json!(self.id));
//!         attrs.insert("name".to_string(), json!(self.name));
//!         attrs
//!     }
//!
//!     fn primary_key(&self) -> Value {
//!         json!(self.id)
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = Arc::new(MemorySink::new());
//! let mut auditor = Auditor::with_sink(AuditConfig::default(), sink.clone());
//!
//! let mut user = User { id: 1, name: "Ann".to_string() };
//! auditor.on_insert(&user).await?; // CREATE, SET(id), SET(name)
//!
//! user.name = "Anna".to_string();
//! auditor.on_update(&user).await?; // CHANGE(name)
//!
//! auditor.on_delete(&user).await?; // DELETE
//! # Ok(())
//! # }
//! ```

pub mod auditor;
pub mod diff;
pub mod entry;
pub mod error;
pub mod filter;
pub mod identity;
pub mod sink;
pub mod snapshot;

pub use auditor::Auditor;
pub use diff::FieldChange;
pub use entry::{AuditAction, AuditEntry, AuditEntryBuilder, Stamp};
pub use error::AuditError;
pub use identity::{IdentityProvider, NoIdentity, StaticIdentity};
pub use sink::{create_sink, AuditSink, ConsoleSink, DualSink, FileSink, MemorySink, NullSink};
pub use snapshot::Snapshot;
