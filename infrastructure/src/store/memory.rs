//! In-memory session store.
//!
//! Sessions live in a process-local map of independently lockable handles:
//! the map lock is held only for lookup and insertion, so mutations against
//! different sessions never contend with each other. Nothing survives a
//! process restart.
//!
//! Expiry is lazy: it is evaluated when a session is fetched, and that is
//! also the moment its memory is reclaimed. Expired ids move into a
//! tombstone set so later lookups can keep distinguishing "aged out" from
//! "never existed".

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use workpad_application::ports::session_store::{SessionHandle, SessionStore};
use workpad_domain::{DEFAULT_TTL_HOURS, Session, SessionId, WorkpadError};

/// Process-local session store with per-session locks and lazy TTL expiry.
pub struct InMemorySessionStore {
    ttl: TimeDelta,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    expired: RwLock<HashSet<SessionId>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
            expired: RwLock::new(HashSet::new()),
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(TimeDelta::hours(DEFAULT_TTL_HOURS))
    }

    /// Move a lazily-discovered expired session into the tombstone set.
    async fn retire(&self, id: SessionId) {
        self.sessions.write().await.remove(&id);
        self.expired.write().await.insert(id);
        info!(session_id = %id, "session expired, memory reclaimed");
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, id: Option<SessionId>) -> (SessionId, SessionHandle) {
        let id = id.unwrap_or_else(SessionId::generate);
        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(&id) {
            // Idempotent create: provisioning may retry with the same id.
            debug!(session_id = %id, "create returned existing session");
            return (id, existing.clone());
        }

        let handle: SessionHandle =
            Arc::new(RwLock::new(Session::new(id, self.ttl, Utc::now())));
        sessions.insert(id, handle.clone());
        drop(sessions);

        // Re-creating an id that previously aged out starts a fresh lifetime.
        self.expired.write().await.remove(&id);
        (id, handle)
    }

    async fn get(&self, id: SessionId) -> Result<SessionHandle, WorkpadError> {
        let handle = self.sessions.read().await.get(&id).cloned();
        match handle {
            Some(handle) => {
                let expired = handle.read().await.is_expired(Utc::now());
                if expired {
                    self.retire(id).await;
                    Err(WorkpadError::SessionExpired { id })
                } else {
                    Ok(handle)
                }
            }
            None if self.expired.read().await.contains(&id) => {
                Err(WorkpadError::SessionExpired { id })
            }
            None => Err(WorkpadError::SessionNotFound { id }),
        }
    }

    async fn delete(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            // An explicit teardown is not an expiry: later lookups report
            // the session as gone, not aged out.
            self.expired.write().await.remove(&id);
        }
        removed
    }

    async fn list(&self) -> Vec<SessionId> {
        let sessions = self.sessions.read().await;
        let now = Utc::now();
        let mut ids = Vec::with_capacity(sessions.len());
        for (id, handle) in sessions.iter() {
            if !handle.read().await.is_expired(now) {
                ids.push(*id);
            }
        }
        ids
    }
}
