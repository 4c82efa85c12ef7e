//! Inventory query port.

use async_trait::async_trait;

use crate::domain::ResourceId;
use crate::error::QuarryError;

/// Read-only view of the subject's inventory (36 slots in the reference
/// host).
///
/// An error means the inventory is unreachable right now (no session
/// context); callers fall back to last-known progress rather than treating
/// it as fatal.
#[async_trait]
pub trait InventoryView: Send + Sync {
    async fn count_matching(&self, resource: &ResourceId) -> Result<u32, QuarryError>;
}
