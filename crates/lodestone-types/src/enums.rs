//! Enumeration types for node lifecycle state.
//!
//! Serialized values use SCREAMING_SNAKE_CASE to stay compatible with the
//! persisted representation used by the wider game backend.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Node status
// ---------------------------------------------------------------------------

/// Activity status of a blueprint or node.
///
/// Extraction is only permitted against [`NodeStatus::Active`] nodes;
/// all other statuses pass through this core unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
    /// Created but not yet activated by world logic.
    Pending,
    /// Live and available for extraction.
    Active,
    /// Temporarily disabled by world logic.
    Inactive,
    /// Retired; kept for history only.
    Archived,
}

impl NodeStatus {
    /// Upper-case wire name of the status, as stored and reported.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl core::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Discovery progression of a node, independent of whether it currently
/// has resources to give.
///
/// The intended progression is monotonic by convention:
///
/// `Invisible -> Hidden -> Rumoured -> Discoverable -> Discovered ->
/// Visible -> Harvestable`
///
/// This core does not enforce the ordering; discovery logic lives with
/// external callers, which advance nodes via the store's visibility
/// setter. [`Visibility::next_stage`] encodes the conventional ladder for
/// callers that want it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Not perceivable at all.
    Invisible,
    /// Present but concealed; the default for fresh instances.
    Hidden,
    /// Hinted at through rumours or lore.
    Rumoured,
    /// Findable by an active search.
    Discoverable,
    /// Found by at least one agent.
    Discovered,
    /// Openly visible at its location.
    Visible,
    /// Visible and ready for extraction attempts.
    Harvestable,
}

impl Visibility {
    /// The next stage on the conventional discovery ladder, or `None`
    /// if the node is already fully harvestable.
    pub const fn next_stage(self) -> Option<Self> {
        match self {
            Self::Invisible => Some(Self::Hidden),
            Self::Hidden => Some(Self::Rumoured),
            Self::Rumoured => Some(Self::Discoverable),
            Self::Discoverable => Some(Self::Discovered),
            Self::Discovered => Some(Self::Visible),
            Self::Visible => Some(Self::Harvestable),
            Self::Harvestable => None,
        }
    }

    /// Upper-case wire name of the visibility stage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invisible => "INVISIBLE",
            Self::Hidden => "HIDDEN",
            Self::Rumoured => "RUMOURED",
            Self::Discoverable => "DISCOVERABLE",
            Self::Discovered => "DISCOVERED",
            Self::Visible => "VISIBLE",
            Self::Harvestable => "HARVESTABLE",
        }
    }
}

impl core::fmt::Display for Visibility {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&NodeStatus::Active).unwrap();
        assert_eq!(json, "\"ACTIVE\"");
    }

    #[test]
    fn visibility_serializes_screaming_snake() {
        let json = serde_json::to_string(&Visibility::Discoverable).unwrap();
        assert_eq!(json, "\"DISCOVERABLE\"");
    }

    #[test]
    fn visibility_ladder_terminates_at_harvestable() {
        let mut stage = Visibility::Invisible;
        let mut hops = 0_u32;
        while let Some(next) = stage.next_stage() {
            stage = next;
            hops = hops.saturating_add(1);
        }
        assert_eq!(stage, Visibility::Harvestable);
        assert_eq!(hops, 6);
    }

    #[test]
    fn visibility_ladder_matches_ordering() {
        // The derive ordering and the ladder must agree.
        let mut stage = Visibility::Invisible;
        while let Some(next) = stage.next_stage() {
            assert!(next > stage);
            stage = next;
        }
    }
}
