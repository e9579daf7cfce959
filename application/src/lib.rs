//! Application layer for workpad
//!
//! This crate contains the tool façade (the use-case layer agents call
//! through), the session isolation gate, port definitions for the adapters,
//! and service configuration. It depends only on the domain layer.

pub mod config;
pub mod gate;
pub mod ports;
pub mod tools;

// Re-export commonly used types
pub use config::{DEFAULT_PREVIEW_CHARS, ServiceConfig};
pub use gate::{CallContext, SessionGate};
pub use ports::{
    audit::{AuditOutcome, AuditRecord, AuditSink, NoAudit},
    notifier::{ChangeNotifier, Subscription},
    session_store::{SessionHandle, SessionStore},
};
pub use tools::facade::Scratchpad;
pub use tools::payload::{
    AddNoteRequest, AddQuestionRequest, AddTaskRequest, AnswerResultView,
    AnsweredQuestionsResponse, CreateSessionRequest, CreateSessionResponse,
    DeleteSessionResponse, ListSectionsResponse, ListSessionsResponse, NoteResponse,
    NotesResponse, PauseCheckResponse, PendingQuestionsResponse, PlanResponse,
    QuestionResponse, SectionResponse, SubmitAnswersRequest, SubmitAnswersResponse,
    TaskResponse, UpdateTaskRequest, WriteSectionRequest,
};
