//! Template-to-instance merge for resource links.
//!
//! Instantiating a node copies every blueprint link into a snapshot,
//! optionally patched per resource. The merge is field-by-field: a field
//! present in the patch wins, an absent field falls back to the blueprint
//! value. The merged result is re-validated before it is allowed to
//! exist; a failing field fails the whole instantiation.
//!
//! The output owns all of its data -- nodes hold no live references into
//! the blueprint they were spawned from.

use lodestone_types::{ResourceLink, ResourceLinkInstance, ResourceLinkPatch};

use crate::error::ValidationError;
use crate::validate::validate_link;

/// Merge a blueprint link with an optional override patch.
///
/// `merge_link(link, None)` and `merge_link(link, Some(&empty_patch))`
/// both return a value equal to `link`. `resource_id` and `theme_id`
/// are always preserved from the blueprint.
pub fn merge_link(link: &ResourceLink, patch: Option<&ResourceLinkPatch>) -> ResourceLink {
    let Some(patch) = patch else {
        return link.clone();
    };
    if patch.is_empty() {
        return link.clone();
    }

    ResourceLink {
        resource_id: link.resource_id,
        is_primary: patch.is_primary.unwrap_or(link.is_primary),
        chance: patch.chance.unwrap_or(link.chance),
        amount_min: patch.amount_min.unwrap_or(link.amount_min),
        amount_max: patch.amount_max.unwrap_or(link.amount_max),
        purity: patch.purity.unwrap_or(link.purity),
        rarity: patch.rarity.clone().unwrap_or_else(|| link.rarity.clone()),
        theme_id: link.theme_id,
        metadata: patch
            .metadata
            .clone()
            .unwrap_or_else(|| link.metadata.clone()),
    }
}

/// Merge, validate, and snapshot a blueprint link into a fresh instance
/// with zeroed counters.
///
/// # Errors
///
/// Returns [`ValidationError`] naming the resource and field if the
/// merged result violates an invariant. Nothing is clamped.
pub fn instantiate_link(
    link: &ResourceLink,
    patch: Option<&ResourceLinkPatch>,
) -> Result<ResourceLinkInstance, ValidationError> {
    let merged = merge_link(link, patch);
    validate_link(&merged)?;
    Ok(ResourceLinkInstance::fresh(merged))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lodestone_types::{Metadata, ResourceId};
    use rust_decimal_macros::dec;

    use crate::error::LinkField;

    use super::*;

    fn blueprint_link() -> ResourceLink {
        ResourceLink {
            resource_id: ResourceId::new(),
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

    fn full_patch() -> ResourceLinkPatch {
        let mut metadata = Metadata::new();
        metadata.insert(String::from("vein_depth"), serde_json::json!(40));
        ResourceLinkPatch {
            is_primary: Some(false),
            chance: Some(dec!(0.4)),
            amount_min: Some(2),
            amount_max: Some(4),
            purity: Some(dec!(0.6)),
            rarity: Some(String::from("rare")),
            metadata: Some(metadata),
        }
    }

    #[test]
    fn merge_with_no_patch_is_identity() {
        let link = blueprint_link();
        assert_eq!(merge_link(&link, None), link);
    }

    #[test]
    fn merge_with_empty_patch_is_identity() {
        let link = blueprint_link();
        let patch = ResourceLinkPatch::default();
        assert_eq!(merge_link(&link, Some(&patch)), link);
    }

    #[test]
    fn full_patch_wins_every_field() {
        let link = blueprint_link();
        let patch = full_patch();
        let merged = merge_link(&link, Some(&patch));

        assert_eq!(merged.resource_id, link.resource_id);
        assert!(!merged.is_primary);
        assert_eq!(merged.chance, dec!(0.4));
        assert_eq!(merged.amount_min, 2);
        assert_eq!(merged.amount_max, 4);
        assert_eq!(merged.purity, dec!(0.6));
        assert_eq!(merged.rarity, "rare");
        assert_eq!(merged.metadata, patch.metadata.unwrap());
    }

    #[test]
    fn absent_fields_fall_back_to_blueprint() {
        let link = blueprint_link();
        let patch = ResourceLinkPatch {
            chance: Some(dec!(0.1)),
            ..ResourceLinkPatch::default()
        };
        let merged = merge_link(&link, Some(&patch));

        assert_eq!(merged.chance, dec!(0.1));
        assert_eq!(merged.amount_min, link.amount_min);
        assert_eq!(merged.amount_max, link.amount_max);
        assert_eq!(merged.purity, link.purity);
        assert_eq!(merged.rarity, link.rarity);
    }

    #[test]
    fn instantiated_link_starts_with_zero_counters() {
        let instance = instantiate_link(&blueprint_link(), None).unwrap();
        assert_eq!(instance.times_extracted, 0);
        assert_eq!(instance.total_extracted, 0);
        assert!(instance.last_extracted_at.is_none());
    }

    #[test]
    fn invalid_merged_chance_is_rejected() {
        let patch = ResourceLinkPatch {
            chance: Some(dec!(1.5)),
            ..ResourceLinkPatch::default()
        };
        let link = blueprint_link();
        let err = instantiate_link(&link, Some(&patch)).unwrap_err();
        assert_eq!(err.resource_id, link.resource_id);
        assert_eq!(err.field, LinkField::Chance);
    }

    #[test]
    fn patch_can_invalidate_amount_range() {
        // A patch raising amount_min above the blueprint amount_max must
        // fail the merged validation, not silently reorder anything.
        let patch = ResourceLinkPatch {
            amount_min: Some(50),
            ..ResourceLinkPatch::default()
        };
        let err = instantiate_link(&blueprint_link(), Some(&patch)).unwrap_err();
        assert_eq!(err.field, LinkField::AmountMax);
    }
}
