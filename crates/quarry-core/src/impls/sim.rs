//! SimWorld: a scripted stand-in for the engine, catalog, and inventory.
//!
//! One shared handle implements all three ports so a test (or the demo CLI)
//! can flip availability, fail specific calls, and move inventory counts
//! while asserting on the exact instructions the engine received.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::ResourceId;
use crate::error::QuarryError;
use crate::ports::{CollectEngine, InventoryView, ResourceCatalog};

/// One instruction the engine received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    BeginCollecting(ResourceId),
    HaltAll,
    ForceHaltAll,
    CancelCollect,
    CancelFollow,
}

#[derive(Debug, Default)]
struct SimState {
    available: bool,
    session_open: bool,
    fail_begin: bool,
    fail_halt: bool,
    known: HashSet<ResourceId>,
    counts: HashMap<ResourceId, u32>,
    calls: Vec<EngineCall>,
    collecting: Option<ResourceId>,
}

/// Simulated world shared by the fake engine, catalog, and inventory.
#[derive(Debug, Clone)]
pub struct SimWorld {
    state: Arc<Mutex<SimState>>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    /// Fresh world: engine available, session open, no known resources.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                available: true,
                session_open: true,
                ..SimState::default()
            })),
        }
    }

    /// Register a resource the catalog knows, with its starting inventory
    /// count. `raw` may be `path` or `namespace:path`.
    pub fn insert_resource(&self, raw: &str, count: u32) -> ResourceId {
        let id = ResourceId::parse(raw, "minecraft");
        let mut state = self.state.lock().unwrap();
        state.known.insert(id.clone());
        state.counts.insert(id.clone(), count);
        id
    }

    pub fn set_count(&self, id: &ResourceId, count: u32) {
        self.state.lock().unwrap().counts.insert(id.clone(), count);
    }

    pub fn add_count(&self, id: &ResourceId, delta: u32) {
        let mut state = self.state.lock().unwrap();
        *state.counts.entry(id.clone()).or_insert(0) += delta;
    }

    /// Yield `amount` units of whatever the engine is currently collecting.
    pub fn mine(&self, amount: u32) {
        let mut state = self.state.lock().unwrap();
        if let Some(id) = state.collecting.clone() {
            *state.counts.entry(id).or_insert(0) += amount;
        }
    }

    pub fn set_available(&self, available: bool) {
        self.state.lock().unwrap().available = available;
    }

    /// Simulate the host session going away (inventory unreachable).
    pub fn set_session_open(&self, open: bool) {
        self.state.lock().unwrap().session_open = open;
    }

    pub fn fail_begin_collecting(&self, fail: bool) {
        self.state.lock().unwrap().fail_begin = fail;
    }

    pub fn fail_halt(&self, fail: bool) {
        self.state.lock().unwrap().fail_halt = fail;
    }

    /// All instructions the engine has received, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// What the engine is currently collecting, if anything.
    pub fn collecting(&self) -> Option<ResourceId> {
        self.state.lock().unwrap().collecting.clone()
    }
}

#[async_trait]
impl CollectEngine for SimWorld {
    async fn is_available(&self) -> bool {
        self.state.lock().unwrap().available
    }

    async fn begin_collecting(&self, resource: &ResourceId) -> Result<(), QuarryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::BeginCollecting(resource.clone()));
        if state.fail_begin {
            return Err(QuarryError::Engine("begin_collecting refused".into()));
        }
        state.collecting = Some(resource.clone());
        Ok(())
    }

    async fn halt_all(&self) -> Result<(), QuarryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::HaltAll);
        if state.fail_halt {
            return Err(QuarryError::Engine("halt_all refused".into()));
        }
        state.collecting = None;
        Ok(())
    }

    async fn force_halt_all(&self) -> Result<(), QuarryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::ForceHaltAll);
        state.collecting = None;
        Ok(())
    }

    async fn cancel_collect_process(&self) -> Result<(), QuarryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::CancelCollect);
        state.collecting = None;
        Ok(())
    }

    async fn cancel_follow_process(&self) -> Result<(), QuarryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::CancelFollow);
        Ok(())
    }
}

impl ResourceCatalog for SimWorld {
    fn resolve(&self, id: &ResourceId) -> Option<ResourceId> {
        let state = self.state.lock().unwrap();
        state.known.get(id).cloned()
    }
}

#[async_trait]
impl InventoryView for SimWorld {
    async fn count_matching(&self, resource: &ResourceId) -> Result<u32, QuarryError> {
        let state = self.state.lock().unwrap();
        if !state.session_open {
            return Err(QuarryError::InventoryUnavailable(
                "no session context".into(),
            ));
        }
        Ok(state.counts.get(resource).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mine_credits_the_collected_resource() {
        let world = SimWorld::new();
        let logs = world.insert_resource("oak_log", 3);

        world.begin_collecting(&logs).await.unwrap();
        world.mine(4);

        assert_eq!(world.count_matching(&logs).await.unwrap(), 7);
        assert_eq!(world.calls(), vec![EngineCall::BeginCollecting(logs)]);
    }

    #[tokio::test]
    async fn halt_stops_yield() {
        let world = SimWorld::new();
        let logs = world.insert_resource("oak_log", 0);

        world.begin_collecting(&logs).await.unwrap();
        world.halt_all().await.unwrap();
        world.mine(5);

        assert_eq!(world.count_matching(&logs).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn closed_session_makes_inventory_unreachable() {
        let world = SimWorld::new();
        let logs = world.insert_resource("oak_log", 1);

        world.set_session_open(false);
        assert!(world.count_matching(&logs).await.is_err());
    }

    #[test]
    fn unknown_resources_do_not_resolve() {
        let world = SimWorld::new();
        world.insert_resource("oak_log", 0);

        let unknown = ResourceId::parse("bogus_block", "minecraft");
        assert!(world.resolve(&unknown).is_none());
    }
}
