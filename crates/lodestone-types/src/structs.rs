//! Core entity structs for blueprints, nodes, and resource links.
//!
//! Blueprints carry template [`ResourceLink`] values; nodes carry
//! [`ResourceLinkInstance`] snapshots with running extraction counters.
//! The template/instance duplication is deliberate: instances must
//! survive blueprint edits and deletion, so instantiation copies link
//! data instead of referencing it.
//!
//! All fractional quantities (extraction chance, purity) use
//! [`Decimal`] rather than floating point.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{BlueprintId, LocationId, NodeId, ResourceId, ThemeId};
use crate::{NodeStatus, Visibility};

/// Opaque per-entity key/value annotations supplied by designers.
pub type Metadata = BTreeMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Resource links (template form)
// ---------------------------------------------------------------------------

/// A template resource yield entry on a blueprint.
///
/// Describes one material a node class can yield: at what odds, in what
/// quantity range, and at what quality.
///
/// Invariants (enforced by validation before any persistence):
/// `0 <= chance <= 1`, `0 <= purity <= 1`, `1 <= amount_min <= amount_max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    /// The resource this link can yield (registry-owned).
    pub resource_id: ResourceId,
    /// Whether this is a primary yield (vs. a by-product).
    pub is_primary: bool,
    /// Extraction success probability in `[0, 1]`.
    pub chance: Decimal,
    /// Minimum units yielded on success (at least 1).
    pub amount_min: u32,
    /// Maximum units yielded on success (at least `amount_min`).
    pub amount_max: u32,
    /// Quality of the yielded material in `[0, 1]`.
    pub purity: Decimal,
    /// Free-form rarity label (e.g. "common", "legendary").
    pub rarity: String,
    /// Optional content theme this link belongs to.
    pub theme_id: Option<ThemeId>,
    /// Designer-supplied annotations.
    #[serde(default)]
    pub metadata: Metadata,
}

/// A partial patch over a [`ResourceLink`], applied per resource at
/// instantiation time.
///
/// Every field is optional: present fields win over the blueprint value,
/// absent fields fall back to it. `resource_id` and `theme_id` are not
/// patchable -- the former keys the patch, the latter is a template-level
/// classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinkPatch {
    /// Override for [`ResourceLink::is_primary`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    /// Override for [`ResourceLink::chance`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chance: Option<Decimal>,
    /// Override for [`ResourceLink::amount_min`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_min: Option<u32>,
    /// Override for [`ResourceLink::amount_max`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_max: Option<u32>,
    /// Override for [`ResourceLink::purity`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purity: Option<Decimal>,
    /// Override for [`ResourceLink::rarity`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    /// Override for [`ResourceLink::metadata`] (whole-map replacement).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ResourceLinkPatch {
    /// Whether the patch overrides nothing.
    pub const fn is_empty(&self) -> bool {
        self.is_primary.is_none()
            && self.chance.is_none()
            && self.amount_min.is_none()
            && self.amount_max.is_none()
            && self.purity.is_none()
            && self.rarity.is_none()
            && self.metadata.is_none()
    }
}

// ---------------------------------------------------------------------------
// Resource links (instance form)
// ---------------------------------------------------------------------------

/// A resource link on a concrete node: a snapshot of a (possibly
/// patched) template link plus running extraction counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinkInstance {
    /// The snapshotted link data.
    #[serde(flatten)]
    pub link: ResourceLink,
    /// Number of successful extractions of this resource.
    pub times_extracted: u64,
    /// Total units of this resource extracted so far.
    pub total_extracted: u64,
    /// When this resource was last successfully extracted.
    pub last_extracted_at: Option<DateTime<Utc>>,
}

impl ResourceLinkInstance {
    /// Wrap a link snapshot with zeroed counters.
    pub const fn fresh(link: ResourceLink) -> Self {
        Self {
            link,
            times_extracted: 0,
            total_extracted: 0,
            last_extracted_at: None,
        }
    }
}

impl From<ResourceLink> for ResourceLinkInstance {
    fn from(link: ResourceLink) -> Self {
        Self::fresh(link)
    }
}

// ---------------------------------------------------------------------------
// Blueprint
// ---------------------------------------------------------------------------

/// A reusable template describing a class of resource node.
///
/// Created by designers, read many times by the instantiation engine.
/// Deleting a blueprint cascades its links (they are owned by value) but
/// never touches nodes already spawned from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNodeBlueprint {
    /// Unique identifier.
    pub id: BlueprintId,
    /// Unique human-readable name (e.g. "Iron Vein").
    pub name: String,
    /// Designer description.
    pub description: Option<String>,
    /// Optional biome filter tag (e.g. "mountain").
    pub biome_type: Option<String>,
    /// Default `depleted` flag for spawned instances.
    pub depleted: bool,
    /// Default status for spawned instances.
    pub status: NodeStatus,
    /// Categorization tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Template resource links, keyed by resource id (unique per
    /// blueprint).
    #[serde(default)]
    pub links: BTreeMap<ResourceId, ResourceLink>,
}

impl ResourceNodeBlueprint {
    /// Whether any link in this blueprint can yield the given resource.
    pub fn yields(&self, resource_id: ResourceId) -> bool {
        self.links.contains_key(&resource_id)
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A concrete, location-bound occurrence of extractable resources.
///
/// `blueprint_id` is a weak back-reference kept for provenance only;
/// the node's links are snapshots, so blueprint deletion must not (and
/// cannot) break an existing node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Unique identifier.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// The location that exclusively owns this node.
    pub location_id: LocationId,
    /// Blueprint this node was instantiated from, if any.
    pub blueprint_id: Option<BlueprintId>,
    /// Whether the node currently yields nothing further.
    pub depleted: bool,
    /// Activity status; extraction requires [`NodeStatus::Active`].
    pub status: NodeStatus,
    /// Discovery progression stage.
    pub visibility: Visibility,
    /// Categorization tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Link instances, keyed by resource id (unique per node).
    #[serde(default)]
    pub links: BTreeMap<ResourceId, ResourceLinkInstance>,
}

impl ResourceNode {
    /// Number of distinct resources this node can yield.
    pub fn total_resources(&self) -> usize {
        self.links.len()
    }

    /// Number of primary resource links.
    pub fn primary_resources(&self) -> usize {
        self.links.values().filter(|l| l.link.is_primary).count()
    }

    /// Number of secondary (by-product) resource links.
    pub fn secondary_resources(&self) -> usize {
        self.links
            .values()
            .filter(|l| !l.link.is_primary)
            .count()
    }

    /// Total successful extraction operations across all links.
    pub fn total_extractions(&self) -> u64 {
        self.links
            .values()
            .fold(0_u64, |acc, l| acc.saturating_add(l.times_extracted))
    }

    /// The most recent extraction timestamp across all links, if any.
    pub fn last_extraction_at(&self) -> Option<DateTime<Utc>> {
        self.links
            .values()
            .filter_map(|l| l.last_extracted_at)
            .max()
    }
}

// ---------------------------------------------------------------------------
// Collaborator payloads
// ---------------------------------------------------------------------------

/// Resource-type metadata from the external registry.
///
/// Used for response enrichment only, never for invariant validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Display name of the resource.
    pub name: String,
    /// Description of the resource.
    pub description: Option<String>,
    /// Base rarity label of the resource type.
    pub rarity: String,
    /// How many units stack in one inventory slot.
    pub stack_size: u32,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Offset/limit pagination window for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Number of matching entries to skip.
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of entries to return.
    #[serde(default = "Page::default_limit")]
    pub limit: usize,
}

impl Page {
    /// Default page size when the caller does not specify one.
    pub const DEFAULT_LIMIT: usize = 100;

    /// A page starting at `offset` with the given `limit`.
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    const fn default_limit() -> usize {
        Self::DEFAULT_LIMIT
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}
