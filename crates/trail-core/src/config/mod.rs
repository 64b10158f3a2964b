//! Configuration for the trail audit engine.
//!
//! The configuration is read once per audit pass by the auditor. It can be
//! built inline by host code or loaded from a YAML file; every field has a
//! serde default so a partial file (or an empty one) parses to a working
//! configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default strftime format for the formatted stamp representation.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Configuration for a change auditor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Master switch; when off, every audit operation is a silent no-op.
    #[serde(default = "default_true")]
    pub active: bool,

    /// If non-empty, only these fields participate in auditing.
    #[serde(default)]
    pub allowed: Vec<String>,

    /// Fields removed from auditing, applied after `allowed`.
    #[serde(default)]
    pub ignored: Vec<String>,

    /// Record types exempt from auditing entirely.
    #[serde(default)]
    pub ignored_classes: Vec<String>,

    /// Skip fields whose old and new values are both null/empty.
    #[serde(default = "default_true")]
    pub skip_nulls: bool,

    /// Store a raw unix epoch instead of a formatted date string.
    #[serde(default)]
    pub store_timestamp: bool,

    /// strftime format used when `store_timestamp` is off.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Attribute holding the acting user's id on the record itself.
    ///
    /// When set, the actor is read from the record instead of the identity
    /// provider (self-registration flows, where the user is the record).
    #[serde(default)]
    pub user_attribute: Option<String>,

    /// Truncate path-qualified type names to their final segment.
    #[serde(default)]
    pub short_type_names: bool,

    /// Sink backend configuration.
    #[serde(default)]
    pub sink: SinkConfig,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            active: true,
            allowed: Vec::new(),
            ignored: Vec::new(),
            ignored_classes: Vec::new(),
            skip_nulls: true,
            store_timestamp: false,
            date_format: default_date_format(),
            user_attribute: None,
            short_type_names: false,
            sink: SinkConfig::default(),
        }
    }
}

/// Sink backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SinkConfig {
    /// Sink backend type.
    #[serde(default)]
    pub backend: SinkBackend,

    /// File path (for the file backend).
    #[serde(default)]
    pub file_path: Option<String>,

    /// Also echo entries to stdout (file backend only).
    #[serde(default)]
    pub stdout: bool,
}

/// Sink backend type.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SinkBackend {
    /// Log to stdout.
    #[default]
    Console,
    /// Append to a JSON Lines file.
    File,
    /// Drop entries.
    Null,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AuditConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }
}
