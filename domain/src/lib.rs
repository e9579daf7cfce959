//! Domain layer for workpad
//!
//! This crate contains the core session workspace model: the scratchpad
//! collections (Notes / Draft / Plan), the human-in-the-loop question queue,
//! the change-event taxonomy, and the pause policy. It has no dependencies on
//! transport or storage concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! An isolated, time-bounded workspace instance for one research run. A
//! session exclusively owns its [`WorkspaceState`] and [`QuestionQueue`];
//! no cross-session references exist.
//!
//! ## Scratchpad collections
//!
//! - **Notes**: append-only findings contributed by agents
//! - **Draft**: named, versioned, overwritable document sections
//! - **Plan**: a task list with status, assignment and dependencies

pub mod core;
pub mod event;
pub mod policy;
pub mod question;
pub mod session;
pub mod util;
pub mod workspace;

// Re-export commonly used types
pub use crate::core::{
    error::WorkpadError,
    ids::{AgentId, NoteId, QuestionId, SessionId, TaskId},
};
pub use event::{EventDetail, EventKind, ParseEventKindError, WorkspaceEvent};
pub use policy::{PausePolicy, PauseReason};
pub use question::{
    AnswerOutcome, QueueFacts, Question, QuestionPriority, QuestionQueue,
};
pub use session::{DEFAULT_TTL_HOURS, Session};
pub use workspace::{
    entities::{DraftSection, Note, Task, TaskStatus},
    state::{NoteFilter, WorkspaceState},
};
