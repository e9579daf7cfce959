//! Audit sink that emits records as `tracing` events.
//!
//! The default sink when no audit file is configured: records land in the
//! same subscriber as the rest of the service's logs, under the
//! `workpad::audit` target.

use tracing::info;
use workpad_application::ports::audit::{AuditOutcome, AuditRecord, AuditSink};

pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: AuditRecord) {
        let session = record.session_id.as_deref().unwrap_or("-");
        let caller = record.caller.as_deref().unwrap_or("-");
        match &record.outcome {
            AuditOutcome::Success => info!(
                target: "workpad::audit",
                operation = %record.operation,
                session,
                caller,
                preview = record.preview.as_deref().unwrap_or(""),
                "ok"
            ),
            AuditOutcome::Error { kind, message } => info!(
                target: "workpad::audit",
                operation = %record.operation,
                session,
                caller,
                error_kind = %kind,
                "failed: {message}"
            ),
        }
    }
}
