//! External collaborator interfaces.
//!
//! Two narrow seams connect this core to the rest of the game backend:
//!
//! - [`ResourceRegistry`] -- read-only resource-type metadata, consumed
//!   for response enrichment only (never for invariant validation);
//! - [`LocationDirectory`] -- an existence check consulted once per
//!   instantiation so nodes cannot be bound to unknown locations.
//!
//! The static in-memory implementations back tests and single-process
//! deployments; production callers supply their own adapters.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use lodestone_types::{LocationId, ResourceId, ResourceInfo};

/// Read-only lookup of resource-type metadata by id.
#[async_trait]
pub trait ResourceRegistry: Send + Sync {
    /// Metadata for a resource type, or `None` if the registry does not
    /// know it. Unknown resources are not an error here: enrichment is
    /// best-effort.
    async fn get(&self, resource_id: ResourceId) -> Option<ResourceInfo>;
}

/// Existence check owned by the external location subsystem.
#[async_trait]
pub trait LocationDirectory: Send + Sync {
    /// Whether the location is known to the world.
    async fn exists(&self, location_id: LocationId) -> bool;
}

// ---------------------------------------------------------------------------
// Static in-memory implementations
// ---------------------------------------------------------------------------

/// Fixed in-memory [`ResourceRegistry`].
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    resources: BTreeMap<ResourceId, ResourceInfo>,
}

impl StaticRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }

    /// Register a resource type, returning `self` for chaining.
    #[must_use]
    pub fn with_resource(mut self, resource_id: ResourceId, info: ResourceInfo) -> Self {
        self.resources.insert(resource_id, info);
        self
    }
}

#[async_trait]
impl ResourceRegistry for StaticRegistry {
    async fn get(&self, resource_id: ResourceId) -> Option<ResourceInfo> {
        self.resources.get(&resource_id).cloned()
    }
}

/// Fixed in-memory [`LocationDirectory`].
#[derive(Debug, Clone, Default)]
pub struct StaticLocations {
    known: BTreeSet<LocationId>,
}

impl StaticLocations {
    /// Create an empty directory (no location exists).
    pub const fn new() -> Self {
        Self {
            known: BTreeSet::new(),
        }
    }

    /// Mark a location as existing, returning `self` for chaining.
    #[must_use]
    pub fn with_location(mut self, location_id: LocationId) -> Self {
        self.known.insert(location_id);
        self
    }
}

#[async_trait]
impl LocationDirectory for StaticLocations {
    async fn exists(&self, location_id: LocationId) -> bool {
        self.known.contains(&location_id)
    }
}
