//! Broadcast-based notification hub.
//!
//! One `tokio::sync::broadcast` channel per session, created when the first
//! subscriber appears. Fan-out is at-most-once with a bounded buffer: a
//! subscriber that lags past the capacity loses the overwritten events, and
//! events published before a subscriber connects are never replayed.
//! Dropping a session's sender ends every subscription on it.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, trace};
use workpad_application::ports::notifier::{ChangeNotifier, Subscription};
use workpad_domain::{EventKind, SessionId, WorkspaceEvent};

/// Default bound on per-session event buffers.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Per-session broadcast channels for near-real-time change delivery.
pub struct BroadcastHub {
    capacity: usize,
    channels: RwLock<HashMap<SessionId, broadcast::Sender<WorkspaceEvent>>>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live subscribers across a session's channel.
    pub async fn subscriber_count(&self, session_id: SessionId) -> usize {
        self.channels
            .read()
            .await
            .get(&session_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[async_trait]
impl ChangeNotifier for BroadcastHub {
    async fn subscribe(&self, session_id: SessionId, kinds: HashSet<EventKind>) -> Subscription {
        let mut channels = self.channels.write().await;
        let sender = channels
            .entry(session_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        let subscription = Subscription::new(session_id, kinds, sender.subscribe());
        debug!(%session_id, subscription_id = %subscription.id, "subscriber attached");
        subscription
    }

    async fn publish(&self, event: WorkspaceEvent) {
        let channels = self.channels.read().await;
        if let Some(sender) = channels.get(&event.session_id) {
            // A send error just means every subscriber is gone; best-effort
            // delivery has nothing to do with it.
            let delivered = sender.send(event).unwrap_or(0);
            trace!(delivered, "event fanned out");
        }
    }

    async fn drop_session(&self, session_id: SessionId) {
        if self.channels.write().await.remove(&session_id).is_some() {
            debug!(%session_id, "subscriptions invalidated");
        }
    }
}
