//! Ports: contracts for the external collaborators the core depends on.
//!
//! The engine, resource catalog, inventory, and notification channel are all
//! opaque to the core; each trait here is the seam for a real host
//! integration or a simulation (see `impls`).

pub mod catalog;
pub mod engine;
pub mod inventory;
pub mod notifier;

pub use catalog::ResourceCatalog;
pub use engine::CollectEngine;
pub use inventory::InventoryView;
pub use notifier::{Notice, Notifier};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The collaborator bundle handed to jobs and the manager.
///
/// Design note: the original host exposed these through global helper
/// singletons; here they are injected once at construction and passed by
/// reference, so there is no static lifecycle to initialize or guard.
pub struct Collaborators {
    pub engine: Arc<dyn CollectEngine>,
    pub catalog: Arc<dyn ResourceCatalog>,
    pub inventory: Arc<dyn InventoryView>,
    pub notifier: Arc<dyn Notifier>,

    /// Whether the "engine missing" guidance has already been shown.
    engine_missing_notified: AtomicBool,
}

impl Collaborators {
    pub fn new(
        engine: Arc<dyn CollectEngine>,
        catalog: Arc<dyn ResourceCatalog>,
        inventory: Arc<dyn InventoryView>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            engine,
            catalog,
            inventory,
            notifier,
            engine_missing_notified: AtomicBool::new(false),
        }
    }

    /// Availability gate, consulted before every start/resume/restart.
    ///
    /// Availability itself is re-checked every time (never cached), but the
    /// installation guidance is emitted only on the first failed check so the
    /// user is not spammed on every subsequent operation.
    pub async fn engine_ready(&self) -> bool {
        if self.engine.is_available().await {
            return true;
        }
        if !self.engine_missing_notified.swap(true, Ordering::Relaxed) {
            self.notifier
                .error("Collect engine is not installed or not available!");
            self.notifier
                .info("Collection jobs require the engine. Install it and restart the session.");
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::sim::SimWorld;
    use crate::impls::MemoryNotifier;

    fn collaborators(world: &SimWorld, notifier: &MemoryNotifier) -> Collaborators {
        Collaborators::new(
            Arc::new(world.clone()),
            Arc::new(world.clone()),
            Arc::new(world.clone()),
            Arc::new(notifier.clone()),
        )
    }

    #[tokio::test]
    async fn engine_ready_when_available() {
        let world = SimWorld::new();
        let notifier = MemoryNotifier::default();
        let ports = collaborators(&world, &notifier);

        assert!(ports.engine_ready().await);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn missing_engine_guidance_is_emitted_once() {
        let world = SimWorld::new();
        world.set_available(false);
        let notifier = MemoryNotifier::default();
        let ports = collaborators(&world, &notifier);

        assert!(!ports.engine_ready().await);
        assert!(!ports.engine_ready().await);
        assert_eq!(notifier.notices().len(), 2); // one error + one info, once
    }

    #[tokio::test]
    async fn availability_is_rechecked_not_cached() {
        let world = SimWorld::new();
        world.set_available(false);
        let notifier = MemoryNotifier::default();
        let ports = collaborators(&world, &notifier);

        assert!(!ports.engine_ready().await);
        world.set_available(true);
        assert!(ports.engine_ready().await);
    }
}
