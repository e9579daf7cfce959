//! Change notifier port.
//!
//! Fan-out of [`WorkspaceEvent`]s to per-session subscribers. Delivery is
//! best-effort and at-most-once per subscriber per event: there is no replay
//! or backlog, and a subscriber that falls behind simply misses the dropped
//! events. Callers that need current state use the read tools.

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::broadcast;
use uuid::Uuid;
use workpad_domain::{EventKind, SessionId, WorkspaceEvent};

/// A live subscription to one session's events.
///
/// Filters events by kind on the receiving side; an empty kind set means
/// "every kind". Lagged events are silently skipped (documented
/// at-most-once delivery), and the stream ends when the session's channel
/// is torn down.
pub struct Subscription {
    pub id: Uuid,
    pub session_id: SessionId,
    kinds: HashSet<EventKind>,
    receiver: broadcast::Receiver<WorkspaceEvent>,
}

impl Subscription {
    pub fn new(
        session_id: SessionId,
        kinds: HashSet<EventKind>,
        receiver: broadcast::Receiver<WorkspaceEvent>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            kinds,
            receiver,
        }
    }

    fn wants(&self, event: &WorkspaceEvent) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&event.kind())
    }

    /// Next matching event, or `None` once the session's channel is gone.
    pub async fn next(&mut self) -> Option<WorkspaceEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => continue,
                // Lagged: the missed events are gone, there is no replay.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Port for publishing and subscribing to session change events.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    /// Register interest in a session's events. Session existence is the
    /// caller's concern; the notifier only manages channels.
    async fn subscribe(&self, session_id: SessionId, kinds: HashSet<EventKind>) -> Subscription;

    /// Fan an event out to every live subscription on its session.
    async fn publish(&self, event: WorkspaceEvent);

    /// Invalidate all subscriptions for a session (deleted or expired).
    async fn drop_session(&self, session_id: SessionId);
}
