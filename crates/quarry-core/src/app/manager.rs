//! Queue manager: the single mutator of the pending queue, the active slot,
//! and the global pause flag.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::job::{DEFAULT_NAMESPACE, DEFAULT_POLL_INTERVAL_TICKS};
use crate::domain::{Job, JobPhase, JobSnapshot};
use crate::error::QuarryError;
use crate::ports::Collaborators;

/// Tunables for the queue manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Maximum number of pending jobs the queue holds.
    pub max_queued: usize,

    /// Active jobs re-read the inventory every this many ticks.
    pub poll_interval_ticks: u32,

    /// Namespace assumed when the user omits one.
    pub default_namespace: String,
}

impl ManagerConfig {
    /// Defaults matching the reference host: queue of 5, poll every 5 ticks.
    pub fn default_v1() -> Self {
        Self {
            max_queued: 5,
            poll_interval_ticks: DEFAULT_POLL_INTERVAL_TICKS,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::default_v1()
    }
}

/// Terminal external events from the host session. Both map to an
/// unconditional `cancel_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SessionEnded,
    SubjectDied,
}

/// Point-in-time view of the whole queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStatus {
    pub active: Option<JobSnapshot>,
    pub pending: Vec<JobSnapshot>,
    pub paused: bool,
}

/// Manager-owned state, guarded by one mutex.
///
/// Invariants:
/// - Jobs in `pending` are always Idle.
/// - The active slot holds a job only while it is Active or Paused, except
///   transiently within a tick (a job that turns terminal is dropped by the
///   same or the next `tick`).
/// - `paused == true` implies the active job (if any) is Paused and no new
///   jobs are pulled from the queue.
#[derive(Debug, Default)]
struct ManagerState {
    pending: VecDeque<Job>,
    active: Option<Job>,
    paused: bool,
}

/// Owns the bounded FIFO of pending jobs plus the single active-job slot,
/// and drives queue progression on each external tick.
///
/// The manager is the sole mutator of this state; every other component goes
/// through its operations. Cloning shares the same underlying state.
#[derive(Clone)]
pub struct QueueManager {
    state: Arc<Mutex<ManagerState>>,
    ports: Arc<Collaborators>,
    config: ManagerConfig,
}

impl QueueManager {
    pub fn new(config: ManagerConfig, ports: Arc<Collaborators>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManagerState::default())),
            ports,
            config,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn collaborators(&self) -> &Arc<Collaborators> {
        &self.ports
    }

    /// Append a job to the pending queue.
    ///
    /// Rejects when the queue is at capacity. If nothing occupies the active
    /// slot, the queue is advanced immediately so a freshly enqueued job does
    /// not wait for the next external tick.
    pub async fn enqueue(&self, job: Job) -> Result<(), QuarryError> {
        let mut state = self.state.lock().await;
        if state.pending.len() >= self.config.max_queued {
            return Err(QuarryError::QueueFull(self.config.max_queued));
        }
        tracing::debug!(job = %job.id(), resource = job.name(), "job enqueued");
        state.pending.push_back(job);
        if state.active.is_none() {
            self.advance(&mut state).await;
        }
        Ok(())
    }

    /// One queue-progression step, invoked once per external tick cycle.
    ///
    /// Active-job bookkeeping (its `on_tick`) runs first; promotion from the
    /// pending queue happens only afterwards, in the same step.
    pub async fn tick(&self) {
        let mut state = self.state.lock().await;
        self.advance(&mut state).await;
    }

    async fn advance(&self, state: &mut ManagerState) {
        if state.paused {
            return;
        }

        if let Some(mut active) = state.active.take() {
            active.on_tick(&self.ports).await;
            if !active.phase().is_terminal() {
                // Active or Paused: the slot stays occupied, no promotion.
                state.active = Some(active);
                return;
            }
            tracing::debug!(job = %active.id(), phase = ?active.phase(), "active slot cleared");
        }

        if let Some(mut job) = state.pending.pop_front() {
            job.start(&self.ports).await;
            state.active = Some(job);
        }
    }

    /// Cancel the active job (if any), clear the pending queue, reset the
    /// pause flag, and issue a best-effort full stop to the engine.
    ///
    /// Idempotent: calling it on an already-empty manager changes nothing.
    pub async fn cancel_all(&self, reason: &str) {
        let mut state = self.state.lock().await;
        if let Some(mut job) = state.active.take() {
            job.cancel(&self.ports).await;
            self.ports
                .notifier
                .info(&format!("Cancelled active task: {reason}"));
        }
        if !state.pending.is_empty() {
            state.pending.clear();
            self.ports
                .notifier
                .info(&format!("Cleared task queue: {reason}"));
        }
        state.paused = false;
        drop(state);

        self.stop_engine_everything().await;
    }

    /// Best-effort engine full stop covering both the collect process and
    /// any travel/follow process. Failures here are non-fatal.
    async fn stop_engine_everything(&self) {
        if !self.ports.engine.is_available().await {
            return;
        }
        let engine = &self.ports.engine;
        if let Err(err) = engine.force_halt_all().await {
            tracing::warn!(%err, "force halt failed during full stop");
        }
        if let Err(err) = engine.halt_all().await {
            tracing::warn!(%err, "halt failed during full stop");
        }
        if let Err(err) = engine.cancel_collect_process().await {
            tracing::warn!(%err, "collect-process cancel failed during full stop");
        }
        if let Err(err) = engine.cancel_follow_process().await {
            tracing::warn!(%err, "follow-process cancel failed during full stop");
        }
    }

    /// Pause the active job and set the global pause flag.
    ///
    /// Valid only while the active slot holds an Active job; otherwise a
    /// no-op.
    pub async fn pause_all(&self) {
        let mut state = self.state.lock().await;
        let Some(mut active) = state.active.take() else {
            return;
        };
        if active.phase() != JobPhase::Active {
            state.active = Some(active);
            return;
        }
        active.pause(&self.ports).await;
        state.active = Some(active);
        state.paused = true;

        self.ports.notifier.info("Paused collection task");
        self.send_queue_status(&state).await;
    }

    /// Clear the pause flag and resume the active job.
    ///
    /// When the manager is not actually paused, opportunistically advances
    /// the queue instead (covers a generic "resume" issued while idle).
    pub async fn resume_all(&self) {
        let mut state = self.state.lock().await;
        if !state.paused {
            self.advance(&mut state).await;
            return;
        }

        state.paused = false;
        if let Some(mut active) = state.active.take() {
            if !active.phase().is_terminal() {
                self.announce_resume(&active, &state).await;
                active.resume(&self.ports).await;
            }
            state.active = Some(active);
        }
    }

    /// Recovery path for a manager that might be stuck: the flag and the
    /// active job's own phase may disagree. Clears the pause flag
    /// unconditionally and reconciles. Never fails; at worst reports that
    /// there was nothing to do.
    ///
    /// The active job is resumed through `restart` (hard engine reset)
    /// because on this path the engine's internal state is unknown.
    pub async fn force_resume(&self) {
        let mut state = self.state.lock().await;
        state.paused = false;

        let active_is_live = state
            .active
            .as_ref()
            .is_some_and(|job| !job.phase().is_terminal());
        if active_is_live {
            if let Some(mut active) = state.active.take() {
                self.announce_resume(&active, &state).await;
                active.restart(&self.ports).await;
                state.active = Some(active);
            }
            return;
        }

        // A terminal leftover in the slot counts as empty here.
        if state
            .active
            .as_ref()
            .is_some_and(|job| job.phase().is_terminal())
        {
            state.active = None;
        }

        if !state.pending.is_empty() {
            self.ports.notifier.info("Starting next queued task");
            self.send_queue_status(&state).await;
            self.advance(&mut state).await;
            return;
        }

        self.ports.notifier.info("No tasks to resume");
    }

    async fn announce_resume(&self, active: &Job, state: &ManagerState) {
        let progress = active.current_progress(&self.ports).await;
        let target = active.target();
        self.ports.notifier.info(&format!(
            "Resuming collection of {} (collected: {}/{}, remaining: {})",
            active.name(),
            progress,
            target,
            target.saturating_sub(progress)
        ));
        let summary = self.summary_with(Some(active), &state.pending).await;
        if !summary.is_empty() {
            self.ports
                .notifier
                .info(&format!("Queue Status: {summary}"));
        }
    }

    /// Pending jobs plus one for an occupied active slot.
    pub async fn queued_count(&self) -> usize {
        let state = self.state.lock().await;
        state.pending.len() + usize::from(state.active.is_some())
    }

    pub async fn is_paused(&self) -> bool {
        self.state.lock().await.paused
    }

    /// Whether the active slot holds a job that is Active or Paused.
    pub async fn has_tracked_task(&self) -> bool {
        let state = self.state.lock().await;
        state
            .active
            .as_ref()
            .is_some_and(|job| matches!(job.phase(), JobPhase::Active | JobPhase::Paused))
    }

    /// Ordered, comma-separated progress list: active job first with its
    /// live progress, then each pending job as `[0/<target>] <resource>`.
    pub async fn status_summary(&self) -> String {
        let state = self.state.lock().await;
        self.summary_with(state.active.as_ref(), &state.pending).await
    }

    async fn summary_with(&self, active: Option<&Job>, pending: &VecDeque<Job>) -> String {
        let mut parts = Vec::new();
        if let Some(job) = active {
            let progress = job.current_progress(&self.ports).await;
            parts.push(format!("[{}/{}] {}", progress, job.target(), job.name()));
        }
        for job in pending {
            parts.push(format!("[0/{}] {}", job.target(), job.name()));
        }
        parts.join(", ")
    }

    async fn send_queue_status(&self, state: &ManagerState) {
        let summary = self.summary_with(state.active.as_ref(), &state.pending).await;
        if !summary.is_empty() {
            self.ports
                .notifier
                .info(&format!("Queue Status: {summary}"));
        }
    }

    /// Point-in-time view of the whole queue.
    pub async fn snapshot(&self) -> QueueStatus {
        let state = self.state.lock().await;
        let active = match state.active.as_ref() {
            Some(job) => {
                let progress = job.current_progress(&self.ports).await;
                Some(job.snapshot(progress))
            }
            None => None,
        };
        let pending = state.pending.iter().map(|job| job.snapshot(0)).collect();
        QueueStatus {
            active,
            pending,
            paused: state.paused,
        }
    }

    /// Terminating external events (session end, subject death) cancel
    /// everything immediately and unconditionally.
    pub async fn handle_session_event(&self, event: SessionEvent) {
        let reason = match event {
            SessionEvent::SessionEnded => "session ended",
            SessionEvent::SubjectDied => "subject died",
        };
        tracing::info!(?event, "terminating session event");
        self.cancel_all(reason).await;
    }
}
