//! Audit sinks: the durability boundary for entries.

use async_trait::async_trait;
use std::io::Write;
use std::sync::RwLock;
use trail_core::{AuditConfig, SinkBackend};

use crate::entry::AuditEntry;
use crate::error::AuditError;

/// Trait for audit entry sinks.
///
/// One save per entry; the engine does not batch or retry, and a failed
/// save is surfaced to the caller of the audit pass. Entries from the same
/// pass are independent writes, not a transaction.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one entry.
    async fn save(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

/// Create a sink based on configuration.
pub fn create_sink(config: &AuditConfig) -> Result<Box<dyn AuditSink>, AuditError> {
    if !config.active {
        return Ok(Box::new(NullSink));
    }
    match config.sink.backend {
        SinkBackend::Null => Ok(Box::new(NullSink)),
        SinkBackend::Console => Ok(Box::new(ConsoleSink)),
        SinkBackend::File => {
            let path = config.sink.file_path.as_deref().unwrap_or("audit.log");
            if config.sink.stdout {
                Ok(Box::new(DualSink::new(path)?))
            } else {
                Ok(Box::new(FileSink::new(path)?))
            }
        }
    }
}

/// Sink that drops every entry (the disabled path).
pub struct NullSink;

#[async_trait]
impl AuditSink for NullSink {
    async fn save(&self, _entry: AuditEntry) -> Result<(), AuditError> {
        Ok(())
    }
}

/// Console sink (one JSON object per line on stdout).
pub struct ConsoleSink;

#[async_trait]
impl AuditSink for ConsoleSink {
    async fn save(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let json = serde_json::to_string(&entry)?;
        println!("{}", json);
        Ok(())
    }
}

/// File sink (appends JSON Lines).
pub struct FileSink {
    path: String,
}

impl FileSink {
    /// Create a new file sink. The file is created on first save.
    pub fn new(path: &str) -> Result<Self, AuditError> {
        Ok(Self {
            path: path.to_string(),
        })
    }
}

#[async_trait]
impl AuditSink for FileSink {
    async fn save(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let json = serde_json::to_string(&entry)?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

/// Dual sink: JSON Lines to a file, human-readable lines to stdout.
pub struct DualSink {
    file: FileSink,
}

impl DualSink {
    /// Create a new dual sink writing to the given file path.
    pub fn new(path: &str) -> Result<Self, AuditError> {
        Ok(Self {
            file: FileSink::new(path)?,
        })
    }
}

#[async_trait]
impl AuditSink for DualSink {
    async fn save(&self, entry: AuditEntry) -> Result<(), AuditError> {
        println!("{}", entry.to_log_line());
        self.file.save(entry).await
    }
}

/// In-memory sink, for tests and in-process embedding.
#[derive(Default)]
pub struct MemorySink {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemorySink {
    /// Create an empty memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries saved so far, oldest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuditSink for MemorySink {
    async fn save(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| AuditError::Sink(format!("failed to acquire write lock: {}", e)))?;
        entries.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{AuditAction, Stamp};

    fn entry(action: AuditAction) -> AuditEntry {
        AuditEntry::builder(action, "User", "1")
            .stamp(Stamp::Epoch(1700000000))
            .build()
    }

    #[tokio::test]
    async fn null_sink_accepts_everything() {
        NullSink.save(entry(AuditAction::Create)).await.unwrap();
    }

    #[tokio::test]
    async fn memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.save(entry(AuditAction::Create)).await.unwrap();
        sink.save(entry(AuditAction::Set)).await.unwrap();

        let saved = sink.entries();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].action, AuditAction::Create);
        assert_eq!(saved[1].action, AuditAction::Set);
    }

    #[tokio::test]
    async fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let sink = FileSink::new(path.to_str().unwrap()).unwrap();

        sink.save(entry(AuditAction::Create)).await.unwrap();
        sink.save(entry(AuditAction::Delete)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: AuditEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.action, AuditAction::Create);
        let second: AuditEntry = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.action, AuditAction::Delete);
    }

    #[test]
    fn factory_respects_disabled_config() {
        let config = AuditConfig {
            active: false,
            ..Default::default()
        };
        // A disabled config always yields a sink; saving through it is a no-op.
        create_sink(&config).unwrap();
    }
}
