//! Application layer: queue manager, command router, tick driver.

pub mod driver;
pub mod manager;
pub mod router;

pub use driver::TickDriver;
pub use manager::{ManagerConfig, QueueManager, QueueStatus, SessionEvent};
pub use router::{Command, CommandRouter, Disposition};
