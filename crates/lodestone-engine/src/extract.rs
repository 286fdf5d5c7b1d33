//! Extraction orchestration: gate, resolve, persist, enrich.
//!
//! One call to [`NodeEngine::extract`] is one attempt by one actor
//! against one node. The flow:
//!
//! 1. validate the tool/skill modifiers (hard error when out of band);
//! 2. load the node (hard error when absent);
//! 3. gate on lifecycle state -- a depleted or inactive node yields a
//!    *failed outcome*, not an error, and mutates nothing;
//! 4. resolve every resource link independently;
//! 5. persist extraction statistics for each successful link;
//! 6. enrich yields with registry metadata, best-effort.
//!
//! The outcome is successful iff at least one link yielded; an attempt
//! where every roll misses reports failure with an empty yield list.

use chrono::Utc;
use lodestone_core::{ExtractionModifiers, extraction_gate, resolve_link};
use lodestone_types::{NodeId, ResourceId};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::{LocationDirectory, NodeEngine, ResourceRegistry};

/// One resource yielded by an extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedResource {
    /// The yielded resource type.
    pub resource_id: ResourceId,
    /// Display name from the resource registry, when known.
    pub resource_name: Option<String>,
    /// Units produced after the efficiency modifier.
    pub amount: u32,
    /// Quality in `[0, 1]`, rounded to two decimal places.
    pub quality: Decimal,
}

/// The result of one extraction attempt.
///
/// `success` is `true` iff at least one resource was yielded; a blocked
/// attempt and an attempt where every per-link roll missed both report
/// `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    /// Whether at least one resource was extracted.
    pub success: bool,
    /// Yields from links whose success roll landed.
    pub resources_extracted: Vec<ExtractedResource>,
    /// The node's depleted flag at the time of the attempt.
    pub node_depleted: bool,
    /// Human-readable summary of the outcome.
    pub message: String,
}

impl ExtractionOutcome {
    /// An attempt blocked by lifecycle state; nothing was rolled.
    fn blocked(node_depleted: bool, message: String) -> Self {
        Self {
            success: false,
            resources_extracted: Vec::new(),
            node_depleted,
            message,
        }
    }
}

impl<R, L> NodeEngine<R, L>
where
    R: ResourceRegistry,
    L: LocationDirectory,
{
    /// Attempt an extraction against a node.
    ///
    /// Statistics are persisted per successful link before the outcome
    /// is returned; a blocked attempt persists nothing. The `depleted`
    /// flag is never changed here -- callers decide when to invoke
    /// [`NodeEngine::apply_depletion_policy`].
    ///
    /// # Errors
    ///
    /// - [`EngineError::NodeNotFound`] if the node is absent.
    /// - [`EngineError::Modifier`] if either modifier is outside
    ///   `[0.1, 2.0]`.
    /// - [`EngineError::ArithmeticOverflow`] if a checked calculation
    ///   fails during resolution.
    pub async fn extract(
        &self,
        rng: &mut impl Rng,
        node_id: NodeId,
        tool_efficiency: Decimal,
        character_skill: Decimal,
    ) -> Result<ExtractionOutcome, EngineError> {
        let modifiers = ExtractionModifiers::new(tool_efficiency, character_skill)?;
        let node = self.nodes.get(node_id).await?;

        if let Err(block) = extraction_gate(&node) {
            tracing::debug!(node_id = %node_id, reason = %block.message(), "extraction blocked");
            return Ok(ExtractionOutcome::blocked(node.depleted, block.message()));
        }

        let mut yields = Vec::new();
        for instance in node.links.values() {
            if let Some(link_yield) = resolve_link(rng, instance, &modifiers)? {
                yields.push(link_yield);
            }
        }

        let now = Utc::now();
        let mut resources_extracted = Vec::with_capacity(yields.len());
        for link_yield in yields {
            self.nodes
                .update_link_stats(node_id, link_yield.resource_id, link_yield.amount, now)
                .await?;
            let resource_name = self
                .registry
                .get(link_yield.resource_id)
                .await
                .map(|info| info.name);
            resources_extracted.push(ExtractedResource {
                resource_id: link_yield.resource_id,
                resource_name,
                amount: link_yield.amount,
                quality: link_yield.quality,
            });
        }

        let message = if resources_extracted.is_empty() {
            String::from("no resources extracted")
        } else {
            format!("extracted {} resource types", resources_extracted.len())
        };
        tracing::debug!(
            node_id = %node_id,
            yielded = resources_extracted.len(),
            "extraction attempt resolved"
        );

        Ok(ExtractionOutcome {
            success: !resources_extracted.is_empty(),
            resources_extracted,
            node_depleted: node.depleted,
            message,
        })
    }
}
