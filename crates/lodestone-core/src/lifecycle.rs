//! Node lifecycle rules consulted by the extraction resolver.
//!
//! # Extraction gate
//!
//! Extraction operates only on nodes that are [`NodeStatus::Active`] and
//! not depleted. A blocked attempt is an expected business outcome
//! ("nothing happened"), so the gate returns a typed block reason rather
//! than an error, and the resolver turns it into a non-throwing failure
//! result with zero mutation.
//!
//! Visibility is deliberately *not* checked here: gating extraction on
//! discovery progression is a caller responsibility.
//!
//! # Depletion policy
//!
//! Nothing in this core flips `depleted` on its own. The policy that
//! decides when a node is spent is designer-configurable and evaluated
//! only through an explicit hook on the engine.

use lodestone_types::{NodeStatus, ResourceNode};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Extraction gate
// ---------------------------------------------------------------------------

/// Why an extraction attempt was blocked without being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionBlock {
    /// The node yields nothing further.
    Depleted,
    /// The node is not in [`NodeStatus::Active`] status.
    Inactive(NodeStatus),
}

impl ExtractionBlock {
    /// Human-readable message reported on the failed extraction result.
    pub fn message(self) -> String {
        match self {
            Self::Depleted => String::from("resource node is depleted"),
            Self::Inactive(status) => {
                format!("resource node is not active (status: {status})")
            }
        }
    }
}

/// Check whether a node admits extraction attempts.
///
/// Depletion is checked before status, so a depleted-and-inactive node
/// reports depletion.
pub const fn extraction_gate(node: &ResourceNode) -> Result<(), ExtractionBlock> {
    if node.depleted {
        return Err(ExtractionBlock::Depleted);
    }
    match node.status {
        NodeStatus::Active => Ok(()),
        status => Err(ExtractionBlock::Inactive(status)),
    }
}

// ---------------------------------------------------------------------------
// Depletion policy
// ---------------------------------------------------------------------------

/// Designer-configurable rule for when a node counts as spent.
///
/// Whatever the policy says, the `depleted` flag only changes when a
/// caller invokes the engine's depletion hook -- never as a side effect
/// of extraction itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DepletionPolicy {
    /// Nodes are only ever depleted by an explicit external decision.
    #[default]
    Manual,
    /// A node is spent once every primary link has yielded at least
    /// `cap` total units.
    PrimaryYieldCap {
        /// Per-primary-link lifetime yield cap.
        cap: u64,
    },
}

/// Evaluate whether a node is exhausted under the given policy.
///
/// Under [`DepletionPolicy::PrimaryYieldCap`], a node with no primary
/// links is never considered exhausted -- there is nothing to cap.
pub fn is_exhausted(node: &ResourceNode, policy: &DepletionPolicy) -> bool {
    match policy {
        DepletionPolicy::Manual => false,
        DepletionPolicy::PrimaryYieldCap { cap } => {
            let mut primaries = node.links.values().filter(|l| l.link.is_primary).peekable();
            if primaries.peek().is_none() {
                return false;
            }
            primaries.all(|l| l.total_extracted >= *cap)
        }
    }
}
