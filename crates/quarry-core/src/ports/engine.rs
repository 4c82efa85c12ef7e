//! Collect engine port.

use async_trait::async_trait;

use crate::domain::ResourceId;
use crate::error::QuarryError;

/// The external pathing/automation engine that does the actual collecting
/// and motion. Entirely opaque to the core; every call may fail.
///
/// Design intent:
/// - The core never inspects engine state, it only issues instructions.
/// - Whether a failure is fatal is the caller's decision: fatal on
///   start/resume/restart, swallowed on pause/cancel/complete.
#[async_trait]
pub trait CollectEngine: Send + Sync {
    /// Whether the engine is present and usable. Re-checked before every
    /// start/resume/restart; never cached by the core.
    async fn is_available(&self) -> bool;

    /// Begin collecting the given resource.
    async fn begin_collecting(&self, resource: &ResourceId) -> Result<(), QuarryError>;

    /// Halt all current motion and activity.
    async fn halt_all(&self) -> Result<(), QuarryError>;

    /// Harder variant of `halt_all`, used when the engine's internal state
    /// may be stale or desynchronized.
    async fn force_halt_all(&self) -> Result<(), QuarryError>;

    /// Cancel the collect process specifically.
    async fn cancel_collect_process(&self) -> Result<(), QuarryError>;

    /// Cancel the travel/follow process specifically.
    async fn cancel_follow_process(&self) -> Result<(), QuarryError>;
}
