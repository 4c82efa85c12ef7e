//! Progress accounting for a single job.

/// Computes collected-so-far as a delta against the inventory count captured
/// at activation.
///
/// Design:
/// - The baseline is captured exactly once, at `start()`. Resume and restart
///   keep it, so `count - baseline` stays a valid live progress value across
///   pause boundaries.
/// - `last_known` is whatever the poll/pause path last recorded. It is the
///   frozen value while paused and the fallback when the inventory
///   collaborator cannot be reached.
/// - Deltas are clamped at zero: matching items consumed or dropped mid-job
///   would otherwise make reported progress negative.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    baseline: u32,
    last_known: u32,
}

impl ProgressTracker {
    /// Start tracking against `baseline` (inventory count at activation).
    pub fn start(baseline: u32) -> Self {
        Self {
            baseline,
            last_known: 0,
        }
    }

    /// Record an inventory observation and return the collected amount.
    pub fn observe(&mut self, count: u32) -> u32 {
        self.last_known = self.delta(count);
        self.last_known
    }

    /// Collected amount for `count` without recording it.
    pub fn delta(&self, count: u32) -> u32 {
        count.saturating_sub(self.baseline)
    }

    /// Last recorded collected amount (frozen value while paused).
    pub fn last_known(&self) -> u32 {
        self.last_known
    }

    pub fn baseline(&self) -> u32 {
        self.baseline
    }
}
