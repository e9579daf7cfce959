//! Audit sink port.
//!
//! Every tool invocation produces exactly one audit record, success or
//! failure. This is an observability contract: operators diagnose gate
//! rejections and entity errors from these records, and the caller-agent
//! signal recorded here is informational only.

use chrono::{DateTime, Utc};
use serde::Serialize;
use workpad_domain::WorkpadError;

/// Outcome half of an audit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Error { kind: String, message: String },
}

/// One tool invocation, as seen at the façade boundary.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    /// The raw trusted-channel signal, recorded even when malformed.
    pub session_id: Option<String>,
    /// Caller identity signal, audit-only.
    pub caller: Option<String>,
    #[serde(flatten)]
    pub outcome: AuditOutcome,
    /// Bounded preview of the salient request content.
    pub preview: Option<String>,
}

impl AuditRecord {
    pub fn success(
        operation: impl Into<String>,
        session_id: Option<String>,
        caller: Option<String>,
        preview: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: operation.into(),
            session_id,
            caller,
            outcome: AuditOutcome::Success,
            preview,
        }
    }

    pub fn failure(
        operation: impl Into<String>,
        session_id: Option<String>,
        caller: Option<String>,
        error: &WorkpadError,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: operation.into(),
            session_id,
            caller,
            outcome: AuditOutcome::Error {
                kind: error.kind().to_string(),
                message: error.to_string(),
            },
            preview: None,
        }
    }
}

/// Port for recording audit entries.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord);
}

/// No-op sink for tests and embedders that opt out of auditing.
pub struct NoAudit;

impl AuditSink for NoAudit {
    fn record(&self, _record: AuditRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_record_captures_error_kind() {
        let record = AuditRecord::failure(
            "add_note",
            Some("bogus".to_string()),
            Some("analyst-1".to_string()),
            &WorkpadError::MissingSessionId,
        );
        assert!(matches!(
            record.outcome,
            AuditOutcome::Error { ref kind, .. } if kind == "missing_session_id"
        ));
        assert!(record.preview.is_none());
    }

    #[test]
    fn records_serialize_flat() {
        let record = AuditRecord::success(
            "write_section",
            Some("abc".to_string()),
            None,
            Some("Draft v1".to_string()),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["operation"], "write_section");
        assert_eq!(json["outcome"], "success");
        assert_eq!(json["preview"], "Draft v1");
    }
}
