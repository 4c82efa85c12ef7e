use thiserror::Error;

/// Errors surfaced by the collection core.
///
/// Engine-call failures during start/resume/restart are fatal to the job
/// (it transitions to Cancelled); the same failures during pause, cancel,
/// or completion are swallowed at the call site because local bookkeeping
/// must not depend on the engine acknowledging a halt.
#[derive(Debug, Error)]
pub enum QuarryError {
    #[error("collect engine is not available")]
    EngineUnavailable,

    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("engine call failed: {0}")]
    Engine(String),

    #[error("inventory is not reachable: {0}")]
    InventoryUnavailable(String),

    #[error("task queue is full (max {0})")]
    QueueFull(usize),

    #[error("{0}")]
    Other(String),
}
