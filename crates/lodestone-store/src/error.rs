//! Error types for the `lodestone-store` crate.
//!
//! All fallible store operations return [`StoreError`]. Validation
//! failures carry the structured [`ValidationError`] from
//! `lodestone-core` so callers still see which resource and field were
//! rejected.

use lodestone_core::ValidationError;
use lodestone_types::{BlueprintId, NodeId, ResourceId};

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A blueprint was not found.
    #[error("blueprint not found: {0}")]
    BlueprintNotFound(BlueprintId),

    /// No blueprint carries the requested name.
    #[error("blueprint not found by name: {0}")]
    BlueprintNameNotFound(String),

    /// A blueprint with this name already exists.
    #[error("blueprint name already in use: {0}")]
    DuplicateName(String),

    /// A blueprint with this ID already exists.
    #[error("duplicate blueprint id: {0}")]
    DuplicateBlueprint(BlueprintId),

    /// A resource is already linked to the blueprint.
    #[error("resource {resource_id} already linked to blueprint {blueprint_id}")]
    DuplicateBlueprintLink {
        /// The blueprint.
        blueprint_id: BlueprintId,
        /// The already-linked resource.
        resource_id: ResourceId,
    },

    /// A resource is not linked to the blueprint.
    #[error("resource {resource_id} not linked to blueprint {blueprint_id}")]
    BlueprintLinkNotFound {
        /// The blueprint.
        blueprint_id: BlueprintId,
        /// The missing resource link.
        resource_id: ResourceId,
    },

    /// A node was not found.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// A node with this ID already exists.
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A resource is not linked to the node.
    #[error("resource {resource_id} not linked to node {node_id}")]
    NodeLinkNotFound {
        /// The node.
        node_id: NodeId,
        /// The missing resource link.
        resource_id: ResourceId,
    },

    /// A link failed invariant validation before persistence.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An extraction counter would overflow.
    #[error("extraction counter overflow for resource {resource_id} on node {node_id}")]
    CounterOverflow {
        /// The node.
        node_id: NodeId,
        /// The resource whose counter overflowed.
        resource_id: ResourceId,
    },
}
