//! Domain error taxonomy
//!
//! Every failure a tool call can surface is one of these variants. Errors are
//! scoped to the failing call: none of them invalidates the session or the
//! process, and none is retried inside the core.

use crate::core::ids::{QuestionId, SessionId, TaskId};
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkpadError {
    /// The trusted session signal was absent from the request.
    #[error("No session id present on the request")]
    MissingSessionId,

    /// A session signal was present but is not a well-formed identifier.
    #[error("Malformed session id: {value}")]
    InvalidSessionIdFormat { value: String },

    /// No session has ever existed with this id.
    #[error("Session not found: {id}")]
    SessionNotFound { id: SessionId },

    /// The session existed but its TTL has elapsed.
    #[error("Session expired: {id}")]
    SessionExpired { id: SessionId },

    #[error("Draft section not found: {section_id}")]
    SectionNotFound { section_id: String },

    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: TaskId },

    #[error("Question not found: {question_id}")]
    QuestionNotFound { question_id: QuestionId },

    /// A task referenced a dependency id that does not exist in the plan.
    #[error("Unknown dependency task: {dependency}")]
    InvalidDependency { dependency: TaskId },

    /// A question can be answered exactly once.
    #[error("Question already answered: {question_id}")]
    AlreadyAnswered { question_id: QuestionId },
}

impl WorkpadError {
    /// Stable machine-readable name of this error, used in audit records and
    /// transport error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkpadError::MissingSessionId => "missing_session_id",
            WorkpadError::InvalidSessionIdFormat { .. } => "invalid_session_id_format",
            WorkpadError::SessionNotFound { .. } => "session_not_found",
            WorkpadError::SessionExpired { .. } => "session_expired",
            WorkpadError::SectionNotFound { .. } => "section_not_found",
            WorkpadError::TaskNotFound { .. } => "task_not_found",
            WorkpadError::QuestionNotFound { .. } => "question_not_found",
            WorkpadError::InvalidDependency { .. } => "invalid_dependency",
            WorkpadError::AlreadyAnswered { .. } => "already_answered",
        }
    }

    /// Check if this error was produced by the session gate, before any
    /// session state was touched.
    pub fn is_gate_error(&self) -> bool {
        matches!(
            self,
            WorkpadError::MissingSessionId
                | WorkpadError::InvalidSessionIdFormat { .. }
                | WorkpadError::SessionNotFound { .. }
                | WorkpadError::SessionExpired { .. }
        )
    }
}
