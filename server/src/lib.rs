//! HTTP+SSE transport for workpad
//!
//! The tool surface travels over plain request/response routes; change
//! notifications stream over SSE on the same server. Session identity for
//! every tool route comes exclusively from the `X-Session-ID` header (the
//! isolation gate's trusted channel), and `X-Caller-Agent` rides along for
//! audit attribution.

pub mod error;
pub mod extract;
pub mod routes;

pub use error::ApiError;
pub use extract::{CALLER_AGENT_HEADER, CallScope, SESSION_ID_HEADER};
pub use routes::{AppState, router};
