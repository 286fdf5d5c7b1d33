//! Shared type definitions for the Lodestone resource-node engine.
//!
//! This crate is the single source of truth for all types used across the
//! Lodestone workspace: identifiers, lifecycle enums, and the blueprint /
//! node entity structs.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Lifecycle enumerations (status, visibility)
//! - [`structs`] -- Core entity structs (blueprints, nodes, resource links)

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{NodeStatus, Visibility};
pub use ids::{BlueprintId, LocationId, NodeId, ResourceId, ThemeId};
pub use structs::{
    Metadata, Page, ResourceInfo, ResourceLink, ResourceLinkInstance, ResourceLinkPatch,
    ResourceNode, ResourceNodeBlueprint,
};
