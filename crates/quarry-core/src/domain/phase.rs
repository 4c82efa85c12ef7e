//! Job lifecycle phases.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a collection job.
///
/// Transitions:
/// - Idle -> Active (start)
/// - Active -> Paused (pause) -> Active (resume/restart)
/// - Active | Paused -> Completed (target satisfied)
/// - any non-terminal -> Cancelled
///
/// Completed and Cancelled are terminal: once reached, no further phase
/// change is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    /// Created and (possibly) queued, not yet started.
    Idle,

    /// The engine is collecting; progress is a live inventory delta.
    Active,

    /// Halted by the user; progress is frozen at the pause transition.
    Paused,

    /// Target amount reached.
    Completed,

    /// Cancelled by the user, a failure, or a terminating session event.
    Cancelled,
}

impl JobPhase {
    /// Is this a terminal phase (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Cancelled)
    }
}
