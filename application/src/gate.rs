//! Session isolation gate.
//!
//! The single security-critical invariant of the core: an agent must never
//! choose, guess, or override which session it operates on. Session identity
//! arrives only through the trusted transport channel (a header the
//! orchestrator's scoped client sets, never a tool parameter), and the gate
//! resolves it once per request before any tool handler runs. A call that
//! fails here aborts before touching any session lock: no partial
//! mutation, no notification.

use crate::ports::session_store::{SessionHandle, SessionStore};
use std::sync::Arc;
use workpad_domain::{AgentId, SessionId, WorkpadError};

/// The trusted-channel signals for one request, as extracted by the
/// transport layer. `raw_session_id` is untrusted text until the gate
/// validates it; `caller` is informational only and never authorizes.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub raw_session_id: Option<String>,
    pub caller: Option<AgentId>,
}

impl CallContext {
    pub fn new(raw_session_id: Option<String>, caller: Option<AgentId>) -> Self {
        Self {
            raw_session_id,
            caller,
        }
    }

    /// Context scoped to a known session, as an embedding orchestrator
    /// builds it.
    pub fn for_session(session_id: SessionId) -> Self {
        Self {
            raw_session_id: Some(session_id.to_string()),
            caller: None,
        }
    }

    pub fn with_caller(mut self, caller: impl Into<AgentId>) -> Self {
        self.caller = Some(caller.into());
        self
    }
}

/// Validates and resolves the session identity for each request.
pub struct SessionGate {
    store: Arc<dyn SessionStore>,
}

impl SessionGate {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Fail-fast resolution: signal present → well-formed → resolves to a
    /// live session. Each step has its own error so transports can map them
    /// distinctly.
    pub async fn resolve(
        &self,
        ctx: &CallContext,
    ) -> Result<(SessionId, SessionHandle), WorkpadError> {
        let raw = ctx
            .raw_session_id
            .as_deref()
            .ok_or(WorkpadError::MissingSessionId)?;
        let session_id: SessionId = raw.parse()?;
        let handle = self.store.get(session_id).await?;
        Ok((session_id, handle))
    }
}
