//! TOML-backed configuration schema.

use crate::notify::hub::DEFAULT_CHANNEL_CAPACITY;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use workpad_application::{DEFAULT_PREVIEW_CHARS, ServiceConfig};
use workpad_domain::{DEFAULT_TTL_HOURS, PausePolicy};

/// Complete file configuration, merged from defaults, the global config and
/// the project-level `workpad.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerSection,
    pub session: SessionSection,
    pub notify: NotifySection,
    pub pause: PauseSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address the HTTP transport binds to.
    pub bind_addr: String,
    /// Optional JSONL audit log path; unset means audit goes to tracing.
    pub audit_log: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8720".to_string(),
            audit_log: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Session time-to-live, fixed at creation.
    pub ttl_hours: i64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_TTL_HOURS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySection {
    /// Bound on per-session event buffers.
    pub channel_capacity: usize,
    /// Upper bound for content previews in events and audit records.
    pub preview_chars: usize,
}

impl Default for NotifySection {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseSection {
    pub on_blocking: bool,
    pub at_phase_boundary: bool,
    pub max_pending: usize,
}

impl Default for PauseSection {
    fn default() -> Self {
        let policy = PausePolicy::default();
        Self {
            on_blocking: policy.pause_on_blocking,
            at_phase_boundary: policy.pause_at_phase_boundary,
            max_pending: policy.max_pending,
        }
    }
}

impl FileConfig {
    pub fn session_ttl(&self) -> TimeDelta {
        TimeDelta::hours(self.session.ttl_hours)
    }

    pub fn pause_policy(&self) -> PausePolicy {
        PausePolicy {
            pause_on_blocking: self.pause.on_blocking,
            pause_at_phase_boundary: self.pause.at_phase_boundary,
            max_pending: self.pause.max_pending,
        }
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            preview_chars: self.notify.preview_chars,
            pause: self.pause_policy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_heuristics() {
        let config = FileConfig::default();
        assert_eq!(config.session.ttl_hours, 24);
        assert_eq!(config.notify.preview_chars, 200);
        assert_eq!(config.pause.max_pending, 3);
        assert!(config.pause.on_blocking);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [session]
            ttl_hours = 2

            [pause]
            max_pending = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.session.ttl_hours, 2);
        assert_eq!(config.pause.max_pending, 5);
        assert!(config.pause.at_phase_boundary);
        assert_eq!(config.server.bind_addr, "127.0.0.1:8720");
    }

    #[test]
    fn pause_section_maps_onto_the_policy() {
        let mut config = FileConfig::default();
        config.pause.on_blocking = false;
        config.pause.max_pending = 7;

        let policy = config.pause_policy();
        assert!(!policy.pause_on_blocking);
        assert_eq!(policy.max_pending, 7);
    }
}
