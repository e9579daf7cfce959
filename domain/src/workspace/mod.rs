//! The scratchpad workspace: Notes, Draft and Plan.
//!
//! [`state::WorkspaceState`] is the engine: pure data operations over one
//! session's collections, with no transport or locking concerns. Callers are
//! responsible for serializing mutations per session.

pub mod entities;
pub mod state;
