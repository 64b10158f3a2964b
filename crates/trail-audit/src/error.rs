//! Error types for the audit engine.

use thiserror::Error;

/// Errors that can occur during an audit pass.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The sink rejected or failed to persist an entry.
    #[error("sink error: {0}")]
    Sink(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
