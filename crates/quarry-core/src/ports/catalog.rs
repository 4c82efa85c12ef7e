//! Resource catalog port.

use crate::domain::ResourceId;

/// Resolves parsed identifiers against the set of resources the host world
/// actually knows. `None` means the identifier does not exist and a job for
/// it must not start.
pub trait ResourceCatalog: Send + Sync {
    fn resolve(&self, id: &ResourceId) -> Option<ResourceId>;
}
