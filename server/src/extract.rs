//! Trusted-header extraction.
//!
//! The orchestrator's scoped client sets these headers; the tool-calling
//! agent has no way to populate them, which is what makes them a trusted
//! channel. Extraction never fails: validation is the gate's job, and a
//! missing or malformed header must surface as the gate's typed error, not
//! as a transport rejection.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;
use workpad_application::CallContext;
use workpad_domain::AgentId;

/// Header carrying the session identity.
pub const SESSION_ID_HEADER: &str = "x-session-id";
/// Optional header identifying the calling agent, audit-only.
pub const CALLER_AGENT_HEADER: &str = "x-caller-agent";

/// Extractor producing the request's [`CallContext`] from the trusted
/// headers.
pub struct CallScope(pub CallContext);

#[async_trait]
impl<S> FromRequestParts<S> for CallScope
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_session_id = parts
            .headers
            .get(SESSION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let caller = parts
            .headers
            .get(CALLER_AGENT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(AgentId::new);

        Ok(CallScope(CallContext::new(raw_session_id, caller)))
    }
}
