//! The session aggregate: one isolated, time-bounded workspace instance.

use crate::core::ids::SessionId;
use crate::question::QuestionQueue;
use crate::workspace::state::WorkspaceState;
use chrono::{DateTime, TimeDelta, Utc};

/// Default session lifetime: research runs are bounded to a day.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// An isolated workspace instance for one research run.
///
/// The session exclusively owns its workspace and question queue. Its TTL is
/// fixed at creation: mutations touch `updated_at` but never extend the
/// lifetime. Expiry is evaluated lazily on access, nothing sweeps sessions
/// in the background.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    ttl: TimeDelta,
    pub workspace: WorkspaceState,
    pub questions: QuestionQueue,
}

impl Session {
    pub fn new(id: SessionId, ttl: TimeDelta, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            ttl,
            workspace: WorkspaceState::new(),
            questions: QuestionQueue::new(),
        }
    }

    /// Create a session with the default 24h TTL.
    pub fn with_default_ttl(id: SessionId, now: DateTime<Utc>) -> Self {
        Self::new(id, TimeDelta::hours(DEFAULT_TTL_HOURS), now)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + self.ttl
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }

    /// Record that a mutation happened. Does not extend the TTL.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
