//! In-memory store for resource node blueprints.
//!
//! Blueprints are owned by value in a map keyed by [`BlueprintId`], with
//! a secondary name index enforcing unique names. Deleting a blueprint
//! cascades its links trivially (they live inside the blueprint value)
//! and never touches nodes spawned from it.
//!
//! All operations take `&self`; interior mutability is a single
//! [`RwLock`] over the whole store, which makes every write operation
//! atomic from the callers' point of view.

use std::collections::BTreeMap;

use lodestone_core::{validate_link, validate_links};
use lodestone_types::{BlueprintId, NodeStatus, Page, ResourceId, ResourceLink, ResourceNodeBlueprint};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Filters for listing blueprints. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintFilter {
    /// Match blueprints with this biome tag.
    pub biome_type: Option<String>,
    /// Match blueprints with this status.
    pub status: Option<NodeStatus>,
    /// Match blueprints with a link yielding this resource.
    pub yields: Option<ResourceId>,
}

impl BlueprintFilter {
    fn matches(&self, blueprint: &ResourceNodeBlueprint) -> bool {
        if let Some(biome) = &self.biome_type
            && blueprint.biome_type.as_ref() != Some(biome)
        {
            return false;
        }
        if let Some(status) = self.status
            && blueprint.status != status
        {
            return false;
        }
        if let Some(resource_id) = self.yields
            && !blueprint.yields(resource_id)
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Default)]
struct Inner {
    blueprints: BTreeMap<BlueprintId, ResourceNodeBlueprint>,
    by_name: BTreeMap<String, BlueprintId>,
}

/// Store of [`ResourceNodeBlueprint`] definitions.
#[derive(Debug, Default)]
pub struct BlueprintStore {
    inner: RwLock<Inner>,
}

impl BlueprintStore {
    /// Create an empty blueprint store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new blueprint after validating every link.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if any link violates an invariant
    ///   (nothing is written).
    /// - [`StoreError::DuplicateName`] if the name is already taken.
    /// - [`StoreError::DuplicateBlueprint`] if the ID is already taken.
    pub async fn create(&self, blueprint: ResourceNodeBlueprint) -> Result<BlueprintId, StoreError> {
        validate_links(blueprint.links.values())?;

        let mut inner = self.inner.write().await;
        if inner.by_name.contains_key(&blueprint.name) {
            return Err(StoreError::DuplicateName(blueprint.name));
        }
        if inner.blueprints.contains_key(&blueprint.id) {
            return Err(StoreError::DuplicateBlueprint(blueprint.id));
        }

        let id = blueprint.id;
        inner.by_name.insert(blueprint.name.clone(), id);
        inner.blueprints.insert(id, blueprint);
        tracing::info!(blueprint_id = %id, "created resource node blueprint");
        Ok(id)
    }

    /// Fetch a blueprint by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BlueprintNotFound`] if absent.
    pub async fn get(&self, id: BlueprintId) -> Result<ResourceNodeBlueprint, StoreError> {
        let inner = self.inner.read().await;
        inner
            .blueprints
            .get(&id)
            .cloned()
            .ok_or(StoreError::BlueprintNotFound(id))
    }

    /// Fetch a blueprint by its unique name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BlueprintNameNotFound`] if no blueprint
    /// carries the name.
    pub async fn get_by_name(&self, name: &str) -> Result<ResourceNodeBlueprint, StoreError> {
        let inner = self.inner.read().await;
        inner
            .by_name
            .get(name)
            .and_then(|id| inner.blueprints.get(id))
            .cloned()
            .ok_or_else(|| StoreError::BlueprintNameNotFound(name.to_owned()))
    }

    /// List blueprints matching a filter, paginated by `page`.
    ///
    /// Results are ordered by blueprint ID (UUID v7: roughly creation
    /// order).
    pub async fn list(
        &self,
        filter: &BlueprintFilter,
        page: Page,
    ) -> Vec<ResourceNodeBlueprint> {
        let inner = self.inner.read().await;
        inner
            .blueprints
            .values()
            .filter(|b| filter.matches(b))
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect()
    }

    /// Add a resource link to an existing blueprint.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the link violates an invariant.
    /// - [`StoreError::BlueprintNotFound`] if the blueprint is absent.
    /// - [`StoreError::DuplicateBlueprintLink`] if the resource is
    ///   already linked.
    pub async fn add_resource_link(
        &self,
        blueprint_id: BlueprintId,
        link: ResourceLink,
    ) -> Result<(), StoreError> {
        validate_link(&link)?;

        let mut inner = self.inner.write().await;
        let blueprint = inner
            .blueprints
            .get_mut(&blueprint_id)
            .ok_or(StoreError::BlueprintNotFound(blueprint_id))?;

        if blueprint.links.contains_key(&link.resource_id) {
            return Err(StoreError::DuplicateBlueprintLink {
                blueprint_id,
                resource_id: link.resource_id,
            });
        }
        blueprint.links.insert(link.resource_id, link);
        Ok(())
    }

    /// Remove a resource link from a blueprint.
    ///
    /// # Errors
    ///
    /// - [`StoreError::BlueprintNotFound`] if the blueprint is absent.
    /// - [`StoreError::BlueprintLinkNotFound`] if the resource is not
    ///   linked.
    pub async fn remove_resource_link(
        &self,
        blueprint_id: BlueprintId,
        resource_id: ResourceId,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let blueprint = inner
            .blueprints
            .get_mut(&blueprint_id)
            .ok_or(StoreError::BlueprintNotFound(blueprint_id))?;

        blueprint
            .links
            .remove(&resource_id)
            .map(|_| ())
            .ok_or(StoreError::BlueprintLinkNotFound {
                blueprint_id,
                resource_id,
            })
    }

    /// Delete a blueprint, cascading its links.
    ///
    /// Nodes spawned from the blueprint are unaffected: their links are
    /// snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BlueprintNotFound`] if absent.
    pub async fn delete(&self, id: BlueprintId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .blueprints
            .remove(&id)
            .ok_or(StoreError::BlueprintNotFound(id))?;
        inner.by_name.remove(&removed.name);
        tracing::info!(blueprint_id = %id, name = %removed.name, "deleted resource node blueprint");
        Ok(())
    }

    /// Number of stored blueprints.
    pub async fn count(&self) -> usize {
        self.inner.read().await.blueprints.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lodestone_core::LinkField;
    use lodestone_types::Metadata;
    use rust_decimal_macros::dec;

    use super::*;

    fn link(resource_id: ResourceId) -> ResourceLink {
        ResourceLink {
            resource_id,
            is_primary: true,
            chance: dec!(0.8),
            amount_min: 5,
            amount_max: 10,
            purity: dec!(0.85),
            rarity: String::from("common"),
            theme_id: None,
            metadata: Metadata::new(),
        }
    }

    fn blueprint(name: &str, biome: Option<&str>) -> ResourceNodeBlueprint {
        let resource_id = ResourceId::new();
        let mut links = BTreeMap::new();
        links.insert(resource_id, link(resource_id));
        ResourceNodeBlueprint {
            id: BlueprintId::new(),
            name: name.to_owned(),
            description: None,
            biome_type: biome.map(str::to_owned),
            depleted: false,
            status: NodeStatus::Active,
            tags: vec![],
            links,
        }
    }

    #[tokio::test]
    async fn create_and_get_roundtrip() {
        let store = BlueprintStore::new();
        let bp = blueprint("Iron Vein", Some("mountain"));
        let id = store.create(bp.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), bp);
        assert_eq!(store.get_by_name("Iron Vein").await.unwrap(), bp);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_and_first_is_unaffected() {
        let store = BlueprintStore::new();
        let first = blueprint("Iron Vein", None);
        let first_id = store.create(first.clone()).await.unwrap();

        let err = store.create(blueprint("Iron Vein", None)).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateName(String::from("Iron Vein")));

        assert_eq!(store.get(first_id).await.unwrap(), first);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn invalid_link_rejected_before_write() {
        let store = BlueprintStore::new();
        let mut bp = blueprint("Bad Vein", None);
        if let Some(entry) = bp.links.values_mut().next() {
            entry.chance = dec!(1.5);
        }
        let err = store.create(bp).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(v) if v.field == LinkField::Chance
        ));
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn list_filters_by_biome_status_and_yield() {
        let store = BlueprintStore::new();
        let mountain = blueprint("Iron Vein", Some("mountain"));
        let forest = blueprint("Berry Thicket", Some("forest"));
        let iron_resource = *mountain.links.keys().next().unwrap();
        store.create(mountain.clone()).await.unwrap();
        store.create(forest).await.unwrap();

        let by_biome = store
            .list(
                &BlueprintFilter {
                    biome_type: Some(String::from("mountain")),
                    ..BlueprintFilter::default()
                },
                Page::default(),
            )
            .await;
        assert_eq!(by_biome.len(), 1);
        assert_eq!(by_biome.first().map(|b| b.id), Some(mountain.id));

        let by_yield = store
            .list(
                &BlueprintFilter {
                    yields: Some(iron_resource),
                    ..BlueprintFilter::default()
                },
                Page::default(),
            )
            .await;
        assert_eq!(by_yield.len(), 1);

        let by_status = store
            .list(
                &BlueprintFilter {
                    status: Some(NodeStatus::Archived),
                    ..BlueprintFilter::default()
                },
                Page::default(),
            )
            .await;
        assert!(by_status.is_empty());
    }

    #[tokio::test]
    async fn pagination_windows_results() {
        let store = BlueprintStore::new();
        for i in 0..5 {
            store.create(blueprint(&format!("Vein {i}"), None)).await.unwrap();
        }
        let filter = BlueprintFilter::default();
        let first_two = store.list(&filter, Page::new(0, 2)).await;
        let next_two = store.list(&filter, Page::new(2, 2)).await;
        assert_eq!(first_two.len(), 2);
        assert_eq!(next_two.len(), 2);
        assert_ne!(
            first_two.iter().map(|b| b.id).collect::<Vec<_>>(),
            next_two.iter().map(|b| b.id).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn add_and_remove_resource_link() {
        let store = BlueprintStore::new();
        let bp = blueprint("Iron Vein", None);
        let id = store.create(bp).await.unwrap();

        let extra = ResourceId::new();
        store.add_resource_link(id, link(extra)).await.unwrap();
        assert!(store.get(id).await.unwrap().yields(extra));

        let dup = store.add_resource_link(id, link(extra)).await.unwrap_err();
        assert!(matches!(dup, StoreError::DuplicateBlueprintLink { .. }));

        store.remove_resource_link(id, extra).await.unwrap();
        assert!(!store.get(id).await.unwrap().yields(extra));

        let missing = store.remove_resource_link(id, extra).await.unwrap_err();
        assert!(matches!(missing, StoreError::BlueprintLinkNotFound { .. }));
    }

    #[tokio::test]
    async fn delete_cascades_and_frees_the_name() {
        let store = BlueprintStore::new();
        let id = store.create(blueprint("Iron Vein", None)).await.unwrap();
        store.delete(id).await.unwrap();
        assert_eq!(store.count().await, 0);

        // The name is free again.
        store.create(blueprint("Iron Vein", None)).await.unwrap();
    }
}
