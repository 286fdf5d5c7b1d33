//! Blueprint creation and blueprint-to-node instantiation.
//!
//! Instantiation turns a reusable template into a concrete node bound to
//! one location. Node-level fields default from the blueprint unless the
//! caller supplies values; every blueprint link is snapshotted through
//! the merge-with-override path and re-validated. Validation runs
//! eagerly, so a failing field writes nothing.
//!
//! Override entries for resource ids the blueprint does not carry are
//! ignored (and logged at debug level), matching the documented policy:
//! the blueprint defines *what* a node class can yield, overrides only
//! tune it.

use std::collections::BTreeMap;

use lodestone_core::{instantiate_link, validate_links};
use lodestone_store::StoreError;
use lodestone_types::{
    BlueprintId, LocationId, NodeId, NodeStatus, ResourceId, ResourceLink, ResourceLinkPatch,
    ResourceNode, ResourceNodeBlueprint, Visibility,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::{LocationDirectory, NodeEngine, ResourceRegistry};

/// Request payload for creating a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintSpec {
    /// Unique blueprint name.
    pub name: String,
    /// Designer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional biome filter tag.
    #[serde(default)]
    pub biome_type: Option<String>,
    /// Default depleted flag for spawned instances.
    #[serde(default)]
    pub depleted: bool,
    /// Default status for spawned instances.
    pub status: NodeStatus,
    /// Categorization tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Template resource links.
    #[serde(default)]
    pub resource_links: Vec<ResourceLink>,
}

/// Request payload for instantiating a node from a blueprint.
///
/// All node-level fields are optional; absent fields default from the
/// blueprint (visibility, which has no blueprint counterpart, defaults
/// to [`Visibility::Hidden`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// The blueprint to instantiate.
    pub blueprint_id: BlueprintId,
    /// The location that will own the node.
    pub location_id: LocationId,
    /// Node name; defaults to "<blueprint name> Instance".
    #[serde(default)]
    pub name: Option<String>,
    /// Node description; defaults to the blueprint description.
    #[serde(default)]
    pub description: Option<String>,
    /// Status; defaults to the blueprint status.
    #[serde(default)]
    pub status: Option<NodeStatus>,
    /// Visibility; defaults to [`Visibility::Hidden`].
    #[serde(default)]
    pub visibility: Option<Visibility>,
    /// Depleted flag; defaults to the blueprint default.
    #[serde(default)]
    pub depleted: Option<bool>,
    /// Tags; default to the blueprint tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Per-resource override patches, keyed by resource id.
    #[serde(default)]
    pub overrides: BTreeMap<ResourceId, ResourceLinkPatch>,
}

impl NodeSpec {
    /// A spec with no overrides and all node-level defaults.
    pub const fn from_blueprint(blueprint_id: BlueprintId, location_id: LocationId) -> Self {
        Self {
            blueprint_id,
            location_id,
            name: None,
            description: None,
            status: None,
            visibility: None,
            depleted: None,
            tags: None,
            overrides: BTreeMap::new(),
        }
    }
}

impl<R, L> NodeEngine<R, L>
where
    R: ResourceRegistry,
    L: LocationDirectory,
{
    /// Create a blueprint from a spec.
    ///
    /// Every link is validated before anything is written; duplicate
    /// resource ids within the spec are rejected.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Validation`] if any link violates an invariant.
    /// - [`EngineError::Store`] with a conflict if the name or a
    ///   resource id is already taken.
    pub async fn create_blueprint(&self, spec: BlueprintSpec) -> Result<BlueprintId, EngineError> {
        validate_links(&spec.resource_links)?;

        let id = BlueprintId::new();
        let mut links = BTreeMap::new();
        for link in spec.resource_links {
            let resource_id = link.resource_id;
            if links.insert(resource_id, link).is_some() {
                return Err(EngineError::Store(StoreError::DuplicateBlueprintLink {
                    blueprint_id: id,
                    resource_id,
                }));
            }
        }

        let blueprint = ResourceNodeBlueprint {
            id,
            name: spec.name,
            description: spec.description,
            biome_type: spec.biome_type,
            depleted: spec.depleted,
            status: spec.status,
            tags: spec.tags,
            links,
        };
        let id = self.blueprints.create(blueprint).await?;
        Ok(id)
    }

    /// Instantiate a concrete node from a blueprint.
    ///
    /// The node and all of its link instances are persisted atomically;
    /// a validation failure on any merged link fails the whole call with
    /// nothing written.
    ///
    /// # Errors
    ///
    /// - [`EngineError::BlueprintNotFound`] if the blueprint is absent.
    /// - [`EngineError::LocationNotFound`] if the location subsystem
    ///   does not know the location.
    /// - [`EngineError::Validation`] naming the resource and field if a
    ///   merged link violates an invariant.
    pub async fn instantiate_node(&self, spec: NodeSpec) -> Result<NodeId, EngineError> {
        let blueprint = self.blueprints.get(spec.blueprint_id).await?;

        if !self.locations.exists(spec.location_id).await {
            return Err(EngineError::LocationNotFound(spec.location_id));
        }

        for resource_id in spec.overrides.keys() {
            if !blueprint.links.contains_key(resource_id) {
                tracing::debug!(
                    blueprint_id = %blueprint.id,
                    resource_id = %resource_id,
                    "ignoring override for resource not in blueprint"
                );
            }
        }

        let mut links = BTreeMap::new();
        for (resource_id, link) in &blueprint.links {
            let instance = instantiate_link(link, spec.overrides.get(resource_id))?;
            links.insert(*resource_id, instance);
        }

        let node = ResourceNode {
            id: NodeId::new(),
            name: spec
                .name
                .unwrap_or_else(|| format!("{} Instance", blueprint.name)),
            description: spec.description.or_else(|| blueprint.description.clone()),
            location_id: spec.location_id,
            blueprint_id: Some(blueprint.id),
            depleted: spec.depleted.unwrap_or(blueprint.depleted),
            status: spec.status.unwrap_or(blueprint.status),
            visibility: spec.visibility.unwrap_or(Visibility::Hidden),
            tags: spec.tags.unwrap_or_else(|| blueprint.tags.clone()),
            links,
        };

        let id = self.nodes.create(node).await?;
        tracing::info!(
            node_id = %id,
            blueprint_id = %blueprint.id,
            location_id = %spec.location_id,
            "instantiated node from blueprint"
        );
        Ok(id)
    }
}
