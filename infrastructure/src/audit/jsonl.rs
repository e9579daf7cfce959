//! JSONL file writer for audit records.
//!
//! Each [`AuditRecord`] is serialized as a single JSON line and appended via
//! a buffered writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use workpad_application::ports::audit::{AuditRecord, AuditSink};

/// JSONL audit sink that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on every record and on
/// `Drop`; the audit trail has to survive a crash to be of any use when
/// diagnosing one.
pub struct JsonlAuditSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditSink {
    /// Create a new sink writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create audit log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditSink {
    fn record(&self, record: AuditRecord) {
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlAuditSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use workpad_domain::WorkpadError;

    #[test]
    fn sink_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = JsonlAuditSink::new(&path).unwrap();

        sink.record(AuditRecord::success(
            "add_note",
            Some("3f0a".to_string()),
            Some("analyst-1".to_string()),
            Some("Starbucks Vienna".to_string()),
        ));
        sink.record(AuditRecord::failure(
            "read_section",
            Some("3f0a".to_string()),
            None,
            &WorkpadError::SectionNotFound {
                section_id: "exec_summary".to_string(),
            },
        ));

        drop(sink);

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["operation"], "add_note");
        assert_eq!(first["outcome"], "success");
        assert_eq!(first["caller"], "analyst-1");
        assert!(first.get("timestamp").is_some());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["outcome"], "error");
        assert_eq!(second["kind"], "section_not_found");
    }

    #[test]
    fn sink_returns_none_for_invalid_path() {
        let result = JsonlAuditSink::new("/proc/definitely/not/writable/audit.jsonl");
        // Just verify the failure path doesn't panic
        let _ = result;
    }
}
