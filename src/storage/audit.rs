//! Append-only audit log.
//!
//! One JSON object per line; entries are never rewritten or deleted.
//! Each append is a single `write_all` of the full line into a file
//! opened with `O_APPEND`, under an exclusive advisory lock, followed by
//! `sync_data`. Concurrent writers from independent processes cannot
//! interleave into a corrupted record, and an operation is not reported
//! successful until its entry is durable.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::error::{AsgError, Result};

/// One security decision on the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    /// Event type: `init`, `scan`, `file_access`, `command`.
    pub event: String,
    pub user: String,
    /// The path, command, or label the decision was about.
    pub resource: String,
    /// Decision outcome: `allow`, `deny`, `confirm`, `safe`, `unsafe`.
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl AuditEntry {
    #[must_use]
    pub fn new(
        event: impl Into<String>,
        user: impl Into<String>,
        resource: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event: event.into(),
            user: user.into(),
            resource: resource.into(),
            result: result.into(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Durable, append-only JSONL log.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Open (creating if needed) the log at `path`.
    ///
    /// Fails with a configuration error if the location is not writable;
    /// the guard refuses to initialize without a working audit trail.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                AsgError::Config(format!(
                    "cannot create audit log directory {}: {err}",
                    parent.display()
                ))
            })?;
        }
        // Writability probe: open for append without writing.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| {
                AsgError::Config(format!(
                    "audit log {} is not writable: {err}",
                    path.display()
                ))
            })?;
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and sync it to durable storage before returning.
    pub fn append(&self, entry: &AuditEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let outcome = file
            .write_all(line.as_bytes())
            .and_then(|()| file.sync_data());
        let _ = FileExt::unlock(&file);
        outcome?;

        tracing::debug!(
            target: "audit",
            event = %entry.event,
            resource = %entry.resource,
            result = %entry.result,
            "audit entry appended"
        );
        Ok(())
    }

    /// Read every entry, in append order.
    pub fn read_all(&self) -> Result<Vec<AuditEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = std::fs::File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|err| {
                AsgError::CorruptAuditEntry {
                    line: idx + 1,
                    message: err.to_string(),
                }
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// The last `n` entries, in append order.
    pub fn tail(&self, n: usize) -> Result<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let skip = entries.len().saturating_sub(n);
        Ok(entries.split_off(skip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn log_in(dir: &TempDir) -> AuditLog {
        AuditLog::open(dir.path().join("audit.jsonl")).unwrap()
    }

    #[test]
    fn open_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let log = AuditLog::open(temp.path().join("deep/nested/audit.jsonl")).unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn open_rejects_unwritable_location() {
        let temp = TempDir::new().unwrap();
        // A directory where the file should be.
        let dir_as_log = temp.path().join("audit.jsonl");
        std::fs::create_dir(&dir_as_log).unwrap();

        let err = AuditLog::open(&dir_as_log).unwrap_err();
        assert!(matches!(err, AsgError::Config(_)));
    }

    #[test]
    fn appended_entries_round_trip() {
        let temp = TempDir::new().unwrap();
        let log = log_in(&temp);

        log.append(&AuditEntry::new("scan", "alice", "notes.txt", "safe"))
            .unwrap();
        log.append(
            &AuditEntry::new("command", "alice", "git status", "allow")
                .with_metadata(serde_json::json!({"segments": 1})),
        )
        .unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, "scan");
        assert_eq!(entries[1].resource, "git status");
        assert_eq!(entries[1].metadata.as_ref().unwrap()["segments"], 1);
    }

    #[test]
    fn entries_are_one_json_object_per_line() {
        let temp = TempDir::new().unwrap();
        let log = log_in(&temp);

        for i in 0..5 {
            log.append(&AuditEntry::new("scan", "u", format!("file-{i}"), "safe"))
                .unwrap();
        }

        let raw = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 5);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["timestamp"].is_string());
            assert!(value["event"].is_string());
            assert!(value["user"].is_string());
            assert!(value["resource"].is_string());
            assert!(value["result"].is_string());
        }
    }

    #[test]
    fn timestamps_non_decreasing_in_append_order() {
        let temp = TempDir::new().unwrap();
        let log = log_in(&temp);

        for i in 0..10 {
            log.append(&AuditEntry::new("command", "u", format!("cmd-{i}"), "allow"))
                .unwrap();
        }

        let entries = log.read_all().unwrap();
        for pair in entries.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn tail_returns_last_entries() {
        let temp = TempDir::new().unwrap();
        let log = log_in(&temp);

        for i in 0..7 {
            log.append(&AuditEntry::new("scan", "u", format!("f{i}"), "safe"))
                .unwrap();
        }

        let last = log.tail(3).unwrap();
        assert_eq!(last.len(), 3);
        assert_eq!(last[0].resource, "f4");
        assert_eq!(last[2].resource, "f6");

        // Asking for more than exists returns everything.
        assert_eq!(log.tail(100).unwrap().len(), 7);
    }

    #[test]
    fn corrupt_line_is_reported_with_position() {
        let temp = TempDir::new().unwrap();
        let log = log_in(&temp);
        log.append(&AuditEntry::new("scan", "u", "f", "safe")).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(log.path())
            .unwrap()
            .write_all(b"not json\n")
            .unwrap();

        let err = log.read_all().unwrap_err();
        assert!(matches!(err, AsgError::CorruptAuditEntry { line: 2, .. }));
    }

    #[test]
    fn concurrent_appends_do_not_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("audit.jsonl");
        let log = AuditLog::open(&path).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        log.append(&AuditEntry::new(
                            "command",
                            "u",
                            format!("t{t}-c{i}"),
                            "allow",
                        ))
                        .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 200);
    }
}
