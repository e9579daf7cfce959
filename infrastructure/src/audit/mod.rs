//! Audit sink adapters.

pub mod jsonl;
pub mod tracing_sink;

pub use jsonl::JsonlAuditSink;
pub use tracing_sink::TracingAuditSink;
