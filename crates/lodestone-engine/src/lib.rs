//! Instantiation and extraction orchestration for the Lodestone
//! resource-node engine.
//!
//! [`NodeEngine`] is the facade external callers use:
//!
//! - [`NodeEngine::create_blueprint`] -- persist a designer template.
//! - [`NodeEngine::instantiate_node`] -- spawn a location-bound node from
//!   a blueprint, with optional per-resource overrides.
//! - [`NodeEngine::extract`] -- resolve one extraction attempt.
//! - [`NodeEngine::apply_depletion_policy`] -- caller-invoked depletion
//!   evaluation; extraction itself never flips the flag.
//! - [`NodeEngine::list_blueprints`] /
//!   [`NodeEngine::list_nodes_by_location`] -- paginated reads.
//!
//! Each operation is a short, bounded unit of work: arithmetic plus a
//! small, fixed number of store calls, run to completion synchronously
//! from the caller's point of view.
//!
//! # Modules
//!
//! - [`collaborators`] -- [`ResourceRegistry`] and [`LocationDirectory`]
//!   seams to the rest of the game backend.
//! - [`error`] -- [`EngineError`].
//! - [`extract`] -- Extraction resolution and result types.
//! - [`instantiate`] -- Blueprint and node creation.

use std::sync::Arc;

use lodestone_core::{EngineConfig, is_exhausted};
use lodestone_store::{BlueprintFilter, BlueprintStore, NodeFilter, NodeStore};
use lodestone_types::{LocationId, NodeId, Page, ResourceNode, ResourceNodeBlueprint};

pub mod collaborators;
pub mod error;
pub mod extract;
pub mod instantiate;

// Re-export primary types at crate root.
pub use collaborators::{LocationDirectory, ResourceRegistry, StaticLocations, StaticRegistry};
pub use error::EngineError;
pub use extract::{ExtractedResource, ExtractionOutcome};
pub use instantiate::{BlueprintSpec, NodeSpec};

/// Orchestration facade over the blueprint and node stores.
///
/// Generic over the two collaborator seams so callers can plug in their
/// own registry and location adapters; tests use the static in-memory
/// implementations from [`collaborators`].
#[derive(Debug)]
pub struct NodeEngine<R, L> {
    pub(crate) blueprints: Arc<BlueprintStore>,
    pub(crate) nodes: Arc<NodeStore>,
    pub(crate) registry: R,
    pub(crate) locations: L,
    pub(crate) config: EngineConfig,
}

impl<R, L> NodeEngine<R, L>
where
    R: ResourceRegistry,
    L: LocationDirectory,
{
    /// Create an engine over the given stores and collaborators.
    pub const fn new(
        blueprints: Arc<BlueprintStore>,
        nodes: Arc<NodeStore>,
        registry: R,
        locations: L,
        config: EngineConfig,
    ) -> Self {
        Self {
            blueprints,
            nodes,
            registry,
            locations,
            config,
        }
    }

    /// The blueprint store this engine writes to.
    pub const fn blueprints(&self) -> &Arc<BlueprintStore> {
        &self.blueprints
    }

    /// The node store this engine writes to.
    pub const fn nodes(&self) -> &Arc<NodeStore> {
        &self.nodes
    }

    /// List blueprints matching a filter.
    ///
    /// `page` defaults to the configured page size when `None`; any
    /// requested limit is bounded by the configured maximum.
    pub async fn list_blueprints(
        &self,
        filter: &BlueprintFilter,
        page: Option<Page>,
    ) -> Vec<ResourceNodeBlueprint> {
        self.blueprints.list(filter, self.bounded_page(page)).await
    }

    /// List nodes at a location matching a filter.
    ///
    /// `page` defaults to the configured page size when `None`; any
    /// requested limit is bounded by the configured maximum.
    pub async fn list_nodes_by_location(
        &self,
        location_id: LocationId,
        filter: &NodeFilter,
        page: Option<Page>,
    ) -> Vec<ResourceNode> {
        self.nodes
            .list_by_location(location_id, filter, self.bounded_page(page))
            .await
    }

    /// Evaluate the configured depletion policy against a node and
    /// persist the flag if the node is spent.
    ///
    /// Returns the node's depleted state after evaluation. This is the
    /// only place the engine ever flips `depleted`; extraction reports
    /// outcomes but leaves the decision to callers invoking this hook.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NodeNotFound`] if the node is absent.
    pub async fn apply_depletion_policy(&self, node_id: NodeId) -> Result<bool, EngineError> {
        let node = self.nodes.get(node_id).await?;
        if node.depleted {
            return Ok(true);
        }
        if is_exhausted(&node, &self.config.depletion) {
            self.nodes.set_depleted(node_id, true).await?;
            tracing::info!(node_id = %node_id, "node depleted by policy");
            return Ok(true);
        }
        Ok(false)
    }

    fn bounded_page(&self, page: Option<Page>) -> Page {
        let pagination = &self.config.pagination;
        let requested = page.unwrap_or(Page::new(0, pagination.default_limit));
        Page::new(requested.offset, requested.limit.min(pagination.max_limit))
    }
}
