//! Change events published to session subscribers.
//!
//! Events carry bounded previews of content, never the full payload; a
//! subscriber that needs the current state calls the corresponding read
//! operation. Delivery is best-effort and at-most-once per subscriber, with
//! no replay or backlog.

use crate::core::ids::{AgentId, NoteId, QuestionId, SessionId, TaskId};
use crate::question::{Question, QuestionPriority};
use crate::util::preview;
use crate::workspace::entities::{DraftSection, Note, Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// The kinds of change a subscriber can register interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SectionCreated,
    SectionUpdated,
    SectionRead,
    ChecklistUpdated,
    NoteAdded,
    QuestionAdded,
    QuestionAnswered,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::SectionCreated,
        EventKind::SectionUpdated,
        EventKind::SectionRead,
        EventKind::ChecklistUpdated,
        EventKind::NoteAdded,
        EventKind::QuestionAdded,
        EventKind::QuestionAnswered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SectionCreated => "section_created",
            EventKind::SectionUpdated => "section_updated",
            EventKind::SectionRead => "section_read",
            EventKind::ChecklistUpdated => "checklist_updated",
            EventKind::NoteAdded => "note_added",
            EventKind::QuestionAdded => "question_added",
            EventKind::QuestionAnswered => "question_answered",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error parsing an event kind from its wire name.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown event kind: {0}")]
pub struct ParseEventKindError(pub String);

impl std::str::FromStr for EventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseEventKindError(s.to_string()))
    }
}

/// Event-specific payload. Content fields are previews, truncated at a
/// UTF-8 boundary by the publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventDetail {
    SectionCreated {
        section_id: String,
        title: String,
        author: AgentId,
        version: u32,
        preview: String,
    },
    SectionUpdated {
        section_id: String,
        title: String,
        author: AgentId,
        version: u32,
        preview: String,
    },
    SectionRead {
        section_id: String,
        reader: Option<AgentId>,
    },
    ChecklistUpdated {
        task_id: TaskId,
        status: TaskStatus,
        assigned_to: Option<AgentId>,
        preview: String,
    },
    NoteAdded {
        note_id: NoteId,
        author: AgentId,
        tags: BTreeSet<String>,
        preview: String,
    },
    QuestionAdded {
        question_id: QuestionId,
        asked_by: AgentId,
        priority: QuestionPriority,
        preview: String,
    },
    QuestionAnswered {
        question_id: QuestionId,
        preview: String,
    },
}

impl EventDetail {
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetail::SectionCreated { .. } => EventKind::SectionCreated,
            EventDetail::SectionUpdated { .. } => EventKind::SectionUpdated,
            EventDetail::SectionRead { .. } => EventKind::SectionRead,
            EventDetail::ChecklistUpdated { .. } => EventKind::ChecklistUpdated,
            EventDetail::NoteAdded { .. } => EventKind::NoteAdded,
            EventDetail::QuestionAdded { .. } => EventKind::QuestionAdded,
            EventDetail::QuestionAnswered { .. } => EventKind::QuestionAnswered,
        }
    }
}

/// A change notification for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceEvent {
    pub session_id: SessionId,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub detail: EventDetail,
}

impl WorkspaceEvent {
    pub fn new(session_id: SessionId, timestamp: DateTime<Utc>, detail: EventDetail) -> Self {
        Self {
            session_id,
            timestamp,
            detail,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.detail.kind()
    }

    pub fn section_written(
        session_id: SessionId,
        section: &DraftSection,
        created: bool,
        preview_chars: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let detail = if created {
            EventDetail::SectionCreated {
                section_id: section.id.clone(),
                title: section.title.clone(),
                author: section.author.clone(),
                version: section.version,
                preview: preview(&section.content, preview_chars),
            }
        } else {
            EventDetail::SectionUpdated {
                section_id: section.id.clone(),
                title: section.title.clone(),
                author: section.author.clone(),
                version: section.version,
                preview: preview(&section.content, preview_chars),
            }
        };
        Self::new(session_id, now, detail)
    }

    pub fn section_read(
        session_id: SessionId,
        section_id: impl Into<String>,
        reader: Option<AgentId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            session_id,
            now,
            EventDetail::SectionRead {
                section_id: section_id.into(),
                reader,
            },
        )
    }

    pub fn checklist_updated(
        session_id: SessionId,
        task: &Task,
        preview_chars: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            session_id,
            now,
            EventDetail::ChecklistUpdated {
                task_id: task.id,
                status: task.status,
                assigned_to: task.assigned_to.clone(),
                preview: preview(&task.description, preview_chars),
            },
        )
    }

    pub fn note_added(
        session_id: SessionId,
        note: &Note,
        preview_chars: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            session_id,
            now,
            EventDetail::NoteAdded {
                note_id: note.id,
                author: note.author.clone(),
                tags: note.tags.clone(),
                preview: preview(&note.content, preview_chars),
            },
        )
    }

    pub fn question_added(
        session_id: SessionId,
        question: &Question,
        preview_chars: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            session_id,
            now,
            EventDetail::QuestionAdded {
                question_id: question.id,
                asked_by: question.asked_by.clone(),
                priority: question.priority,
                preview: preview(&question.question, preview_chars),
            },
        )
    }

    pub fn question_answered(
        session_id: SessionId,
        question: &Question,
        preview_chars: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            session_id,
            now,
            EventDetail::QuestionAnswered {
                question_id: question.id,
                preview: preview(question.answer.as_deref().unwrap_or_default(), preview_chars),
            },
        )
    }
}
