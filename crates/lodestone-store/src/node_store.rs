//! In-memory store for location-bound resource node instances.
//!
//! Nodes are owned by value in a map keyed by [`NodeId`]. Creation
//! inserts the node together with all of its link instances as one map
//! entry under one write guard, which gives the all-or-nothing contract
//! for free: there is no observable state where the node exists without
//! some of its links.
//!
//! `update_link_stats` is the concurrency-sensitive operation: the
//! read-modify-write of the extraction counters happens entirely under a
//! single write guard with checked arithmetic, so concurrent extraction
//! attempts never lose an increment.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lodestone_core::validate_links;
use lodestone_types::{LocationId, NodeId, NodeStatus, Page, ResourceId, ResourceNode, Visibility};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Filters for listing nodes at a location. `None` fields match
/// everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFilter {
    /// Match nodes with this status.
    pub status: Option<NodeStatus>,
    /// Match nodes at this visibility stage.
    pub visibility: Option<Visibility>,
    /// Match nodes with this depleted flag.
    pub depleted: Option<bool>,
}

impl NodeFilter {
    fn matches(&self, node: &ResourceNode) -> bool {
        if let Some(status) = self.status
            && node.status != status
        {
            return false;
        }
        if let Some(visibility) = self.visibility
            && node.visibility != visibility
        {
            return false;
        }
        if let Some(depleted) = self.depleted
            && node.depleted != depleted
        {
            return false;
        }
        true
    }
}

/// Store of [`ResourceNode`] instances.
#[derive(Debug, Default)]
pub struct NodeStore {
    inner: RwLock<BTreeMap<NodeId, ResourceNode>>,
}

impl NodeStore {
    /// Create an empty node store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new node with all of its link instances, atomically.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if any link violates an invariant
    ///   (nothing is written).
    /// - [`StoreError::DuplicateNode`] if the ID is already taken.
    pub async fn create(&self, node: ResourceNode) -> Result<NodeId, StoreError> {
        validate_links(node.links.values().map(|l| &l.link))?;

        let mut inner = self.inner.write().await;
        if inner.contains_key(&node.id) {
            return Err(StoreError::DuplicateNode(node.id));
        }
        let id = node.id;
        let location_id = node.location_id;
        inner.insert(id, node);
        tracing::info!(node_id = %id, location_id = %location_id, "created resource node");
        Ok(id)
    }

    /// Fetch a node by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NodeNotFound`] if absent.
    pub async fn get(&self, id: NodeId) -> Result<ResourceNode, StoreError> {
        let inner = self.inner.read().await;
        inner.get(&id).cloned().ok_or(StoreError::NodeNotFound(id))
    }

    /// List nodes at a location matching a filter, paginated by `page`.
    pub async fn list_by_location(
        &self,
        location_id: LocationId,
        filter: &NodeFilter,
        page: Page,
    ) -> Vec<ResourceNode> {
        let inner = self.inner.read().await;
        inner
            .values()
            .filter(|n| n.location_id == location_id && filter.matches(n))
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect()
    }

    /// Record one successful extraction of a resource on a node.
    ///
    /// Atomically increments `times_extracted` by one, adds
    /// `amount_extracted` to `total_extracted`, and sets
    /// `last_extracted_at` to `at_time` -- all under one write guard.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NodeNotFound`] / [`StoreError::NodeLinkNotFound`]
    ///   if the target row is absent.
    /// - [`StoreError::CounterOverflow`] if a counter would overflow
    ///   (counters are left untouched).
    pub async fn update_link_stats(
        &self,
        node_id: NodeId,
        resource_id: ResourceId,
        amount_extracted: u32,
        at_time: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let node = inner
            .get_mut(&node_id)
            .ok_or(StoreError::NodeNotFound(node_id))?;
        let instance = node
            .links
            .get_mut(&resource_id)
            .ok_or(StoreError::NodeLinkNotFound { node_id, resource_id })?;

        let times = instance
            .times_extracted
            .checked_add(1)
            .ok_or(StoreError::CounterOverflow { node_id, resource_id })?;
        let total = instance
            .total_extracted
            .checked_add(u64::from(amount_extracted))
            .ok_or(StoreError::CounterOverflow { node_id, resource_id })?;

        instance.times_extracted = times;
        instance.total_extracted = total;
        instance.last_extracted_at = Some(at_time);

        tracing::debug!(
            node_id = %node_id,
            resource_id = %resource_id,
            amount = amount_extracted,
            times_extracted = times,
            "recorded extraction"
        );
        Ok(())
    }

    /// Set a node's activity status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NodeNotFound`] if absent.
    pub async fn set_status(&self, id: NodeId, status: NodeStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let node = inner.get_mut(&id).ok_or(StoreError::NodeNotFound(id))?;
        node.status = status;
        Ok(())
    }

    /// Set a node's visibility stage.
    ///
    /// Progression order is a caller convention; this setter accepts any
    /// stage so external discovery logic stays in charge.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NodeNotFound`] if absent.
    pub async fn set_visibility(&self, id: NodeId, visibility: Visibility) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let node = inner.get_mut(&id).ok_or(StoreError::NodeNotFound(id))?;
        node.visibility = visibility;
        Ok(())
    }

    /// Set a node's depleted flag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NodeNotFound`] if absent.
    pub async fn set_depleted(&self, id: NodeId, depleted: bool) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let node = inner.get_mut(&id).ok_or(StoreError::NodeNotFound(id))?;
        node.depleted = depleted;
        Ok(())
    }

    /// Number of stored nodes.
    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}
