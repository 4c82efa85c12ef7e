//! Command router: classifies raw text commands and dispatches them to the
//! queue manager, deciding per command whether the original text is still
//! forwarded to the engine's own command channel or suppressed.

use std::sync::Arc;

use crate::domain::Job;
use crate::error::QuarryError;
use crate::ports::Collaborators;

use super::manager::QueueManager;

/// What the host should do with the original text after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Pass the text on to the engine's native command channel.
    Forward,
    /// The command was fully handled here; do not forward it.
    Suppress,
}

/// A classified text command.
///
/// Stop/pause/resume aliases follow the engine's native forms, optionally
/// doubled with a leading `##`, and match case-insensitively. `#get` and
/// `#continue` are matched exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Stop,
    Pause,
    Resume,
    Continue,
    Get { amount: u32, resource: String },
    /// `#get` with arguments that did not validate; carries the user-facing
    /// reason.
    MalformedGet(String),
    Unrecognized,
}

impl Command {
    /// Classify one raw line of text.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_lowercase();

        match lower.as_str() {
            "#stop" | "#cancel" | "##stop" | "##cancel" => return Self::Stop,
            "#pause" | "#p" | "##pause" | "##p" => return Self::Pause,
            "#resume" | "#r" | "##resume" | "##r" => return Self::Resume,
            _ => {}
        }
        if trimmed == "#continue" {
            return Self::Continue;
        }
        if let Some(rest) = trimmed.strip_prefix("#get") {
            // "#getx" is not a get command; require whitespace after the verb.
            if rest.is_empty() {
                return Self::MalformedGet(
                    "Usage: #get <amount> <resource>".to_string(),
                );
            }
            if !rest.starts_with(char::is_whitespace) {
                return Self::Unrecognized;
            }
            return Self::parse_get(rest.trim_start());
        }
        Self::Unrecognized
    }

    fn parse_get(args: &str) -> Self {
        let mut parts = args.splitn(2, char::is_whitespace);
        let amount_token = parts.next().unwrap_or_default();
        let resource = parts.next().unwrap_or_default().trim();

        let Ok(amount) = amount_token.parse::<u32>() else {
            return Self::MalformedGet(format!(
                "Invalid amount '{amount_token}' in #get command"
            ));
        };
        if amount == 0 {
            return Self::MalformedGet("Amount must be greater than zero".to_string());
        }
        if resource.is_empty() {
            return Self::MalformedGet("Usage: #get <amount> <resource>".to_string());
        }
        Self::Get {
            amount,
            resource: resource.to_string(),
        }
    }
}

/// Dispatches classified commands to the queue manager.
pub struct CommandRouter {
    manager: QueueManager,
    ports: Arc<Collaborators>,
}

impl CommandRouter {
    pub fn new(manager: QueueManager) -> Self {
        let ports = Arc::clone(manager.collaborators());
        Self { manager, ports }
    }

    /// Handle one raw line of text and report whether the host should still
    /// forward it.
    pub async fn handle(&self, raw: &str) -> Disposition {
        match Command::classify(raw) {
            Command::Stop => {
                if self.tracking_anything().await {
                    self.manager.cancel_all("Stop command").await;
                    self.ports.notifier.info("All tasks stopped");
                }
                // The engine gets its native stop either way.
                Disposition::Forward
            }
            Command::Pause => {
                if !self.tracking_anything().await {
                    return Disposition::Forward;
                }
                // Pause state is owned here; suppress so the engine does not
                // track a divergent pause flag of its own.
                if self.manager.is_paused().await {
                    self.manager.resume_all().await;
                } else {
                    self.manager.pause_all().await;
                }
                Disposition::Suppress
            }
            Command::Resume | Command::Continue => {
                self.run_continue().await;
                Disposition::Suppress
            }
            Command::Get { amount, resource } => {
                self.handle_get(amount, &resource).await;
                Disposition::Suppress
            }
            Command::MalformedGet(reason) => {
                self.ports.notifier.error(&reason);
                Disposition::Suppress
            }
            Command::Unrecognized => Disposition::Forward,
        }
    }

    async fn tracking_anything(&self) -> bool {
        self.manager.has_tracked_task().await || self.manager.queued_count().await > 0
    }

    async fn run_continue(&self) {
        if !self.ports.engine_ready().await {
            self.ports.notifier.error("Cannot resume tasks.");
            return;
        }
        if !self.tracking_anything().await {
            self.ports.notifier.info("No tasks to resume.");
            return;
        }
        self.manager.force_resume().await;
    }

    async fn handle_get(&self, amount: u32, resource: &str) {
        if !self.ports.engine_ready().await {
            self.ports.notifier.error("Cannot start collection task.");
            return;
        }

        let config = self.manager.config();
        let job = Job::with_settings(
            resource,
            amount,
            &config.default_namespace,
            config.poll_interval_ticks,
        );
        match self.manager.enqueue(job).await {
            Ok(()) => {
                let position = self.manager.queued_count().await;
                if position > 1 {
                    self.ports.notifier.info(&format!(
                        "Queued collection task for {amount} {resource} (position: {position} in queue)"
                    ));
                } else {
                    self.ports
                        .notifier
                        .info(&format!("Starting to collect {amount} {resource}"));
                }
            }
            Err(QuarryError::QueueFull(max)) => {
                self.ports.notifier.error(&format!(
                    "Task queue is full (max {max}). Please wait for current tasks to complete."
                ));
            }
            Err(err) => {
                self.ports
                    .notifier
                    .error(&format!("Failed to queue collection task: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::manager::ManagerConfig;
    use crate::domain::JobPhase;
    use crate::impls::sim::{EngineCall, SimWorld};
    use crate::impls::MemoryNotifier;
    use rstest::rstest;

    #[rstest]
    #[case("#stop", Command::Stop)]
    #[case("#cancel", Command::Stop)]
    #[case("##STOP", Command::Stop)]
    #[case("  #Cancel  ", Command::Stop)]
    #[case("#pause", Command::Pause)]
    #[case("#P", Command::Pause)]
    #[case("##p", Command::Pause)]
    #[case("#resume", Command::Resume)]
    #[case("#R", Command::Resume)]
    #[case("##resume", Command::Resume)]
    #[case("#continue", Command::Continue)]
    #[case("hello world", Command::Unrecognized)]
    #[case("#goto 100 64 100", Command::Unrecognized)]
    #[case("#getx", Command::Unrecognized)]
    fn classification(#[case] raw: &str, #[case] expected: Command) {
        assert_eq!(Command::classify(raw), expected);
    }

    #[rstest]
    #[case("#get 5 stone", 5, "stone")]
    #[case("  #get 12 minecraft:oak_log ", 12, "minecraft:oak_log")]
    #[case("#get 3 nether quartz ore", 3, "nether quartz ore")]
    fn get_parsing(#[case] raw: &str, #[case] amount: u32, #[case] resource: &str) {
        assert_eq!(
            Command::classify(raw),
            Command::Get {
                amount,
                resource: resource.to_string()
            }
        );
    }

    #[rstest]
    #[case("#get")]
    #[case("#get stone")]
    #[case("#get -4 stone")]
    #[case("#get 0 stone")]
    #[case("#get 5")]
    fn malformed_get_is_flagged(#[case] raw: &str) {
        assert!(matches!(Command::classify(raw), Command::MalformedGet(_)));
    }

    struct Harness {
        world: SimWorld,
        notifier: MemoryNotifier,
        router: CommandRouter,
        manager: QueueManager,
    }

    fn harness() -> Harness {
        let world = SimWorld::new();
        let notifier = MemoryNotifier::default();
        let ports = Arc::new(Collaborators::new(
            Arc::new(world.clone()),
            Arc::new(world.clone()),
            Arc::new(world.clone()),
            Arc::new(notifier.clone()),
        ));
        let manager = QueueManager::new(ManagerConfig::default_v1(), ports);
        let router = CommandRouter::new(manager.clone());
        Harness {
            world,
            notifier,
            router,
            manager,
        }
    }

    #[tokio::test]
    async fn get_command_enqueues_and_starts_a_job() {
        let h = harness();
        h.world.insert_resource("oak_log", 0);

        let disposition = h.router.handle("#get 8 oak_log").await;

        assert_eq!(disposition, Disposition::Suppress);
        assert!(h.notifier.contains("Starting to collect 8 oak_log"));
        let status = h.manager.snapshot().await;
        assert_eq!(status.active.unwrap().phase, JobPhase::Active);
    }

    #[tokio::test]
    async fn second_get_reports_queue_position() {
        let h = harness();
        h.world.insert_resource("oak_log", 0);
        h.world.insert_resource("stone", 0);

        h.router.handle("#get 8 oak_log").await;
        h.router.handle("#get 4 stone").await;

        assert!(h.notifier.contains("position: 2 in queue"));
    }

    #[tokio::test]
    async fn get_rejected_when_queue_is_full() {
        let h = harness();
        h.world.insert_resource("stone", 0);
        for _ in 0..6 {
            h.router.handle("#get 10 stone").await;
        }
        let before = h.manager.queued_count().await;

        let disposition = h.router.handle("#get 3 minecraft:oak_log").await;

        assert_eq!(disposition, Disposition::Suppress);
        assert!(h.notifier.contains("Task queue is full (max 5)"));
        assert_eq!(h.manager.queued_count().await, before);
    }

    #[tokio::test]
    async fn malformed_get_is_suppressed_with_an_error() {
        let h = harness();
        let disposition = h.router.handle("#get lots stone").await;

        assert_eq!(disposition, Disposition::Suppress);
        assert!(h.notifier.contains("Invalid amount 'lots'"));
    }

    #[tokio::test]
    async fn stop_cancels_everything_but_still_forwards() {
        let h = harness();
        h.world.insert_resource("stone", 0);
        h.router.handle("#get 10 stone").await;

        let disposition = h.router.handle("#stop").await;

        assert_eq!(disposition, Disposition::Forward);
        assert!(h.notifier.contains("All tasks stopped"));
        assert_eq!(h.manager.queued_count().await, 0);
    }

    #[tokio::test]
    async fn stop_with_nothing_tracked_forwards_silently() {
        let h = harness();
        let disposition = h.router.handle("#stop").await;

        assert_eq!(disposition, Disposition::Forward);
        assert!(h.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn pause_toggles_and_is_suppressed_while_tracking() {
        let h = harness();
        h.world.insert_resource("stone", 0);
        h.router.handle("#get 10 stone").await;

        assert_eq!(h.router.handle("#pause").await, Disposition::Suppress);
        assert!(h.manager.is_paused().await);

        assert_eq!(h.router.handle("#pause").await, Disposition::Suppress);
        assert!(!h.manager.is_paused().await);
    }

    #[tokio::test]
    async fn pause_without_tracked_tasks_is_forwarded() {
        let h = harness();
        assert_eq!(h.router.handle("#pause").await, Disposition::Forward);
        assert!(!h.manager.is_paused().await);
    }

    #[tokio::test]
    async fn resume_is_always_suppressed_and_force_resumes() {
        let h = harness();
        h.world.insert_resource("stone", 0);
        h.router.handle("#get 10 stone").await;
        h.router.handle("#pause").await;
        h.world.clear_calls();

        let disposition = h.router.handle("#resume").await;

        assert_eq!(disposition, Disposition::Suppress);
        assert!(!h.manager.is_paused().await);
        assert!(h.world.calls().contains(&EngineCall::ForceHaltAll));
    }

    #[tokio::test]
    async fn continue_with_nothing_to_resume_reports_it() {
        let h = harness();
        let disposition = h.router.handle("#continue").await;

        assert_eq!(disposition, Disposition::Suppress);
        assert!(h.notifier.contains("No tasks to resume."));
    }

    #[tokio::test]
    async fn get_without_engine_reports_an_error_every_time() {
        let h = harness();
        h.world.insert_resource("stone", 0);
        h.world.set_available(false);

        assert_eq!(h.router.handle("#get 5 stone").await, Disposition::Suppress);
        let after_first = h.notifier.notices().len();
        assert!(h.notifier.contains("Cannot start collection task."));

        // The one-time installation guidance is latched, but each #get must
        // still fail fast with its own user error.
        assert_eq!(h.router.handle("#get 5 stone").await, Disposition::Suppress);
        assert_eq!(h.notifier.notices().len(), after_first + 1);
        assert_eq!(h.manager.queued_count().await, 0);
    }

    #[tokio::test]
    async fn continue_without_engine_reports_and_suppresses() {
        let h = harness();
        h.world.set_available(false);

        let disposition = h.router.handle("#continue").await;

        assert_eq!(disposition, Disposition::Suppress);
        assert!(h.notifier.contains("Cannot resume tasks."));
    }
}
