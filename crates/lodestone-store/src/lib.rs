//! Blueprint and node stores for the Lodestone resource-node engine.
//!
//! Both stores are in-memory maps behind a [`tokio::sync::RwLock`] and
//! carry the engine's transactional contracts:
//!
//! - node creation persists the node and all of its link instances as
//!   one insert -- all rows or none;
//! - extraction statistics updates are read-modify-write atomic, so
//!   concurrent extraction attempts never lose an increment;
//! - blueprint names are unique, enforced by a secondary index.
//!
//! Durable persistence belongs to callers at the boundary; this crate
//! owns correctness of the in-memory state transitions.
//!
//! # Modules
//!
//! - [`blueprint_store`] -- [`BlueprintStore`] for reusable templates.
//! - [`node_store`] -- [`NodeStore`] for location-bound instances.
//! - [`error`] -- [`StoreError`].

pub mod blueprint_store;
pub mod error;
pub mod node_store;

// Re-export primary types at crate root.
pub use blueprint_store::{BlueprintFilter, BlueprintStore};
pub use error::StoreError;
pub use node_store::{NodeFilter, NodeStore};
