//! Domain model (ids, resources, phases, progress, jobs).

pub mod ids;
pub mod job;
pub mod phase;
pub mod progress;
pub mod resource;

pub use ids::JobId;
pub use job::{Job, JobSnapshot};
pub use phase::JobPhase;
pub use progress::ProgressTracker;
pub use resource::ResourceId;
