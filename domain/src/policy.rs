//! The pause heuristic, kept out of the question queue.
//!
//! The queue exposes facts; this policy turns facts into a decision. The
//! thresholds are data, so an orchestrator can swap in a different strategy
//! without touching the data layer.

use crate::question::QueueFacts;
use serde::{Deserialize, Serialize};

/// Why the workflow should pause for human input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    /// An unanswered blocking-priority question exists.
    BlockingQuestion,
    /// Unanswered questions exist and the workflow reached a phase boundary.
    PhaseBoundary,
    /// The number of unanswered questions exceeded the backlog threshold.
    BacklogExceeded,
}

/// Swappable pause thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PausePolicy {
    /// Pause immediately on any unanswered blocking question.
    pub pause_on_blocking: bool,
    /// Pause at a phase boundary whenever any question is unanswered.
    pub pause_at_phase_boundary: bool,
    /// Pause whenever more than this many questions are unanswered.
    pub max_pending: usize,
}

impl Default for PausePolicy {
    fn default() -> Self {
        Self {
            pause_on_blocking: true,
            pause_at_phase_boundary: true,
            max_pending: 3,
        }
    }
}

impl PausePolicy {
    /// Evaluate the policy over the queue facts. Returns the first matching
    /// reason (blocking beats boundary beats backlog) or `None` to continue.
    pub fn evaluate(&self, facts: QueueFacts, at_phase_boundary: bool) -> Option<PauseReason> {
        if self.pause_on_blocking && facts.has_blocking_pending {
            return Some(PauseReason::BlockingQuestion);
        }
        if self.pause_at_phase_boundary && at_phase_boundary && facts.pending_count > 0 {
            return Some(PauseReason::PhaseBoundary);
        }
        if facts.pending_count > self.max_pending {
            return Some(PauseReason::BacklogExceeded);
        }
        None
    }
}
