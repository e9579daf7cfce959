//! Typed request and response records, one per tool operation.
//!
//! Note that no request record carries a session id: session identity comes
//! only from the trusted channel (see [`crate::gate`]). Session lifecycle
//! records ([`CreateSessionRequest`] and the subscription surface) are
//! orchestrator-facing, not agent tools.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use workpad_domain::{
    AgentId, AnswerOutcome, DraftSection, Note, PauseReason, QuestionId, QueueFacts, Question,
    QuestionPriority, SessionId, Task, TaskId, TaskStatus, WorkpadError,
};

// ==================== Notes ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddNoteRequest {
    pub content: String,
    pub author: AgentId,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteResponse {
    pub note: Note,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesResponse {
    pub notes: Vec<Note>,
}

// ==================== Draft ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteSectionRequest {
    pub section_id: String,
    pub title: String,
    pub content: String,
    pub author: AgentId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionResponse {
    pub section: DraftSection,
    /// Whether this write created the section (`version == 1`) or overwrote
    /// an existing one.
    pub created: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSectionsResponse {
    pub sections: HashMap<String, DraftSection>,
}

// ==================== Plan ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTaskRequest {
    pub description: String,
    #[serde(default)]
    pub assigned_to: Option<AgentId>,
    #[serde(default)]
    pub dependencies: BTreeSet<TaskId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub task_id: TaskId,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub assigned_to: Option<AgentId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task: Task,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub tasks: Vec<Task>,
}

// ==================== Questions ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddQuestionRequest {
    pub question: String,
    #[serde(default)]
    pub context: String,
    pub asked_by: AgentId,
    pub priority: QuestionPriority,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: Question,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingQuestionsResponse {
    pub questions: Vec<Question>,
    /// The facts the pause policy is evaluated over, exposed so callers
    /// never need to re-derive them.
    pub facts: QueueFacts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnsweredQuestionsResponse {
    pub questions: Vec<Question>,
}

/// Batch of human answers keyed by question id. A BTreeMap keeps the
/// processing order deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: BTreeMap<QuestionId, String>,
}

/// Per-item outcome of a batch submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerResultView {
    Answered { question: Question },
    Rejected {
        question_id: QuestionId,
        kind: String,
        message: String,
    },
}

impl From<AnswerOutcome> for AnswerResultView {
    fn from(outcome: AnswerOutcome) -> Self {
        match outcome {
            AnswerOutcome::Answered(question) => AnswerResultView::Answered { question },
            AnswerOutcome::Rejected { question_id, error } => AnswerResultView::Rejected {
                question_id,
                kind: error.kind().to_string(),
                message: error.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswersResponse {
    pub outcomes: Vec<AnswerResultView>,
}

impl SubmitAnswersResponse {
    /// Questions actually answered by this batch.
    pub fn answered(&self) -> impl Iterator<Item = &Question> {
        self.outcomes.iter().filter_map(|o| match o {
            AnswerResultView::Answered { question } => Some(question),
            AnswerResultView::Rejected { .. } => None,
        })
    }
}

// ==================== Pause advisor ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseCheckResponse {
    pub facts: QueueFacts,
    pub at_phase_boundary: bool,
    /// `None` means continue; otherwise the first matching pause reason.
    pub decision: Option<PauseReason>,
}

// ==================== Session lifecycle ====================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Explicit id for idempotent provisioning; omitted for a fresh one.
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSessionResponse {
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionId>,
}

/// Transport-facing error body shared by adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

impl From<&WorkpadError> for ErrorBody {
    fn from(error: &WorkpadError) -> Self {
        Self {
            error: error.to_string(),
            kind: error.kind().to_string(),
        }
    }
}
