//! Session store port.
//!
//! The store owns session lifecycle (create, fetch, expire, delete) and the
//! per-session lock: it hands out [`SessionHandle`]s, and all mutations to
//! one session's state go through that handle's write lock. Distinct
//! sessions proceed independently; the contract forbids one lock spanning
//! all sessions. A durable keyed backend (partition key = session id) can
//! replace the in-memory adapter without changing this interface, as long as
//! it preserves per-session exclusivity and lazy expiry.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use workpad_domain::{Session, SessionId, WorkpadError};

/// Shared, lockable handle to one session's state.
pub type SessionHandle = Arc<RwLock<Session>>;

/// Port for session lifecycle and lookup.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session, generating a fresh id when none is given.
    ///
    /// Idempotent: creating an id that already exists returns the existing
    /// live session instead of erroring (provisioning relies on this).
    async fn create(&self, id: Option<SessionId>) -> (SessionId, SessionHandle);

    /// Fetch a live session.
    ///
    /// Expiry is evaluated lazily here: a session whose TTL elapsed fails
    /// with [`WorkpadError::SessionExpired`], distinct from
    /// [`WorkpadError::SessionNotFound`] for ids that never existed.
    async fn get(&self, id: SessionId) -> Result<SessionHandle, WorkpadError>;

    /// Explicit teardown. Returns whether a session was actually removed.
    async fn delete(&self, id: SessionId) -> bool;

    /// Ids of all live sessions, for observability/admin use.
    async fn list(&self) -> Vec<SessionId>;
}
