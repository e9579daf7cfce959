//! Strongly-typed identifiers.
//!
//! Sessions and workspace entities are keyed by UUIDs wrapped in newtypes so
//! an id of one kind cannot be passed where another is expected. [`AgentId`]
//! is the exception: callers identify themselves with free-form names
//! ("analyst-1", "synthesizer"), so it wraps a plain string.

use crate::core::error::WorkpadError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random id.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Opaque token identifying one session. The only way to obtain one from
    /// a raw string is [`SessionId::from_str`], which enforces UUID shape.
    SessionId
);
uuid_id!(
    /// Identifier of an append-only note.
    NoteId
);
uuid_id!(
    /// Identifier of a task in the plan.
    TaskId
);
uuid_id!(
    /// Identifier of a human-in-the-loop question.
    QuestionId
);

impl FromStr for SessionId {
    type Err = WorkpadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| WorkpadError::InvalidSessionIdFormat {
                value: s.to_string(),
            })
    }
}

/// Free-form identity of the calling agent, used for attribution and audit
/// only, never for authorization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for AgentId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
