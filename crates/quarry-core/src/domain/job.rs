//! A single collection job and its state machine.

use serde::{Deserialize, Serialize};

use crate::domain::{JobId, JobPhase, ProgressTracker, ResourceId};
use crate::ports::Collaborators;

/// Namespace assumed when the user omits one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Active jobs re-read the inventory every this many ticks, to bound the
/// cost of inventory scanning.
pub const DEFAULT_POLL_INTERVAL_TICKS: u32 = 5;

/// One bounded collection task: "collect `target` units of `resource`".
///
/// Phase transitions are driven exclusively by the manager and by `on_tick`;
/// see [`JobPhase`] for the diagram. All engine and inventory access goes
/// through the injected [`Collaborators`].
#[derive(Debug)]
pub struct Job {
    id: JobId,
    /// Resource name as the user typed it (used in messages and status).
    requested_name: String,
    resource: ResourceId,
    target: u32,
    phase: JobPhase,
    progress: ProgressTracker,
    ticks_since_poll: u32,
    poll_interval_ticks: u32,
}

impl Job {
    pub fn new(name: impl Into<String>, target: u32) -> Self {
        Self::with_settings(name, target, DEFAULT_NAMESPACE, DEFAULT_POLL_INTERVAL_TICKS)
    }

    pub fn with_settings(
        name: impl Into<String>,
        target: u32,
        default_namespace: &str,
        poll_interval_ticks: u32,
    ) -> Self {
        let requested_name = name.into();
        let resource = ResourceId::parse(&requested_name, default_namespace);
        Self {
            id: JobId::generate(),
            requested_name,
            resource,
            target,
            phase: JobPhase::Idle,
            progress: ProgressTracker::default(),
            ticks_since_poll: 0,
            poll_interval_ticks,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    /// Resource name as requested by the user.
    pub fn name(&self) -> &str {
        &self.requested_name
    }

    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    /// Start the job: resolve the resource, capture the inventory baseline,
    /// and instruct the engine to begin collecting.
    ///
    /// Resolution failure or engine unavailability cancels the job outright;
    /// no partial state is retained.
    pub async fn start(&mut self, ports: &Collaborators) {
        if self.phase != JobPhase::Idle {
            return;
        }

        if !ports.engine_ready().await {
            ports
                .notifier
                .error("Collect engine is not available. Cannot start collection task.");
            self.phase = JobPhase::Cancelled;
            return;
        }

        let Some(resolved) = ports.catalog.resolve(&self.resource) else {
            ports
                .notifier
                .error(&format!("Unknown resource: {}", self.requested_name));
            self.phase = JobPhase::Cancelled;
            return;
        };
        self.resource = resolved;

        // Baseline defaults to zero when the inventory cannot be read yet;
        // progress is then the absolute count observed later.
        let baseline = match ports.inventory.count_matching(&self.resource).await {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(job = %self.id, %err, "inventory unreadable at start, baseline = 0");
                0
            }
        };
        self.progress = ProgressTracker::start(baseline);

        if let Err(err) = ports.engine.begin_collecting(&self.resource).await {
            ports
                .notifier
                .error(&format!("Failed to start collection: {err}"));
            self.phase = JobPhase::Cancelled;
            return;
        }

        self.phase = JobPhase::Active;
        self.ticks_since_poll = 0;
        tracing::debug!(job = %self.id, resource = %self.resource, baseline, "job started");
        ports.notifier.success(&format!(
            "Now collecting {} (requested: {})",
            self.requested_name, self.target
        ));
    }

    /// Pause the job, freezing progress at the value observed right now.
    ///
    /// The engine halt is best-effort: pausing is a local bookkeeping
    /// guarantee and must succeed even when the engine does not acknowledge.
    pub async fn pause(&mut self, ports: &Collaborators) {
        if self.phase != JobPhase::Active {
            return;
        }

        if let Ok(count) = ports.inventory.count_matching(&self.resource).await {
            self.progress.observe(count);
        }

        if let Err(err) = ports.engine.halt_all().await {
            tracing::warn!(job = %self.id, %err, "engine halt failed during pause");
        }

        self.phase = JobPhase::Paused;
        tracing::debug!(job = %self.id, frozen = self.progress.last_known(), "job paused");
    }

    /// Resume from pause, keeping the original baseline.
    ///
    /// If the frozen progress already satisfies the target, the job completes
    /// immediately without reissuing any engine instruction.
    pub async fn resume(&mut self, ports: &Collaborators) {
        if self.phase.is_terminal() {
            return;
        }

        if !ports.engine_ready().await {
            ports
                .notifier
                .error("Collect engine is not available. Cannot resume collection task.");
            self.phase = JobPhase::Cancelled;
            return;
        }

        let collected = self.progress.last_known();
        if collected >= self.target {
            ports.notifier.success(&format!(
                "Collection task already completed! Collected {} {}",
                collected, self.requested_name
            ));
            self.phase = JobPhase::Completed;
            return;
        }

        if let Err(err) = ports.engine.begin_collecting(&self.resource).await {
            ports
                .notifier
                .error(&format!("Failed to resume collection: {err}"));
            self.phase = JobPhase::Cancelled;
            return;
        }

        self.phase = JobPhase::Active;
        tracing::debug!(job = %self.id, collected, "job resumed");
    }

    /// Harder reset than `resume`: force the engine to drop any in-flight
    /// activity before reissuing the collect instruction. Used when the
    /// engine's internal state may be stale or desynchronized.
    pub async fn restart(&mut self, ports: &Collaborators) {
        if self.phase.is_terminal() {
            return;
        }

        if !ports.engine_ready().await {
            ports
                .notifier
                .error("Collect engine is not available. Cannot restart collection task.");
            self.phase = JobPhase::Cancelled;
            return;
        }

        let collected = self.progress.last_known();
        if collected >= self.target {
            ports.notifier.success(&format!(
                "Collection task already completed! Collected {} {}",
                collected, self.requested_name
            ));
            self.phase = JobPhase::Completed;
            return;
        }

        // Clear whatever the engine thinks it is doing before reissuing.
        if let Err(err) = ports.engine.force_halt_all().await {
            tracing::warn!(job = %self.id, %err, "force halt failed during restart");
        }
        if let Err(err) = ports.engine.halt_all().await {
            tracing::warn!(job = %self.id, %err, "halt failed during restart");
        }

        if let Err(err) = ports.engine.begin_collecting(&self.resource).await {
            ports
                .notifier
                .error(&format!("Failed to restart collection: {err}"));
            self.phase = JobPhase::Cancelled;
            return;
        }

        self.phase = JobPhase::Active;
        // The caller owns the user-facing resume message on this path.
        tracing::debug!(job = %self.id, collected, "job restarted");
    }

    /// Cancel the job. The engine halt is best-effort; the transition to
    /// Cancelled happens unconditionally.
    pub async fn cancel(&mut self, ports: &Collaborators) {
        if self.phase.is_terminal() {
            return;
        }

        if self.phase == JobPhase::Active {
            if let Err(err) = ports.engine.halt_all().await {
                tracing::warn!(job = %self.id, %err, "engine halt failed during cancel");
            }
        }

        self.phase = JobPhase::Cancelled;
        tracing::debug!(job = %self.id, "job cancelled");
    }

    /// Tick handler: poll the inventory every `poll_interval_ticks` ticks
    /// while Active, completing the job when the target is reached.
    pub async fn on_tick(&mut self, ports: &Collaborators) {
        if self.phase != JobPhase::Active {
            return;
        }

        self.ticks_since_poll += 1;
        if self.ticks_since_poll < self.poll_interval_ticks {
            return;
        }
        self.ticks_since_poll = 0;

        let Ok(count) = ports.inventory.count_matching(&self.resource).await else {
            // No session context right now; try again on the next poll.
            return;
        };

        let collected = self.progress.observe(count);
        if collected >= self.target {
            ports.notifier.success(&format!(
                "Collected {} {} (goal: {}). Collection complete!",
                collected, self.requested_name, self.target
            ));
            if let Err(err) = ports.engine.halt_all().await {
                tracing::warn!(job = %self.id, %err, "engine halt failed on completion");
            }
            self.phase = JobPhase::Completed;
        }
    }

    /// Collected-so-far: frozen value while Paused, live inventory delta
    /// otherwise, falling back to the last-known value when the inventory is
    /// unreachable.
    pub async fn current_progress(&self, ports: &Collaborators) -> u32 {
        if self.phase == JobPhase::Paused {
            return self.progress.last_known();
        }
        match ports.inventory.count_matching(&self.resource).await {
            Ok(count) => self.progress.delta(count),
            Err(_) => self.progress.last_known(),
        }
    }

    /// Serializable view for status reporting.
    pub fn snapshot(&self, collected: u32) -> JobSnapshot {
        JobSnapshot {
            id: self.id,
            resource: self.requested_name.clone(),
            target: self.target,
            collected,
            phase: self.phase,
        }
    }
}

/// Point-in-time view of one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub resource: String,
    pub target: u32,
    pub collected: u32,
    pub phase: JobPhase,
}
