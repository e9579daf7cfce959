//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`] — strongly-typed identifiers for sessions and workspace entities
//! - [`error::WorkpadError`] — the domain error taxonomy

pub mod error;
pub mod ids;
