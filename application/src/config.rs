//! Service configuration consumed by the tool façade.

use workpad_domain::PausePolicy;

/// Notification previews default to roughly the first 200 characters.
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

/// Tunable behavior of the façade. TTL and channel capacity belong to the
/// adapters that own them (store and notifier).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceConfig {
    /// Upper bound, in bytes, for content previews in notifications and
    /// audit records.
    pub preview_chars: usize,
    /// Pause heuristic applied by `pause_check`.
    pub pause: PausePolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
            pause: PausePolicy::default(),
        }
    }
}
