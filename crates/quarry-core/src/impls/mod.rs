//! Implementations of the ports for development and tests.

pub mod notifiers;
pub mod sim;

pub use notifiers::{MemoryNotifier, StdoutNotifier};
pub use sim::{EngineCall, SimWorld};
