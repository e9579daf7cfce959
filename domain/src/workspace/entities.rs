//! Workspace entities: notes, draft sections and plan tasks.

use crate::core::ids::{AgentId, NoteId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An atomic, append-only finding contributed by an agent.
///
/// Notes are never edited or deleted; insertion order is the canonical read
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub author: AgentId,
    pub timestamp: DateTime<Utc>,
    pub tags: BTreeSet<String>,
}

impl Note {
    pub fn new(
        content: impl Into<String>,
        author: AgentId,
        tags: BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NoteId::generate(),
            content: content.into(),
            author,
            timestamp: now,
            tags,
        }
    }

    /// Exact set-membership tag check.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// A named, versioned, overwritable piece of the composed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSection {
    /// Section key, e.g. "executive_summary". Unique within a session.
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: AgentId,
    pub last_updated: DateTime<Utc>,
    /// Starts at 1, incremented by exactly 1 on every overwrite.
    pub version: u32,
}

impl DraftSection {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        author: AgentId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            author,
            last_updated: now,
            version: 1,
        }
    }

    /// Replace this section's content in place, bumping the version.
    pub fn overwrite(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        author: AgentId,
        now: DateTime<Utc>,
    ) {
        self.title = title.into();
        self.content = content.into();
        self.author = author;
        self.last_updated = now;
        self.version += 1;
    }
}

/// Status of a task in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of coordinated work in the plan.
///
/// Invariant: `dependencies` never contains the task's own id. The engine
/// guarantees this by construction, since dependencies are validated against
/// tasks that already exist before the new id is minted. Cycles among
/// dependencies are not checked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_to: Option<AgentId>,
    pub dependencies: BTreeSet<TaskId>,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        assigned_to: Option<AgentId>,
        dependencies: BTreeSet<TaskId>,
    ) -> Self {
        Self {
            id: TaskId::generate(),
            description: description.into(),
            status: TaskStatus::Todo,
            assigned_to,
            dependencies,
        }
    }
}
