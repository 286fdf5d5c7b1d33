//! Error types for the `lodestone-core` crate.
//!
//! Validation failures always name the offending resource and field so
//! that callers can surface exactly which input was invalid. Out-of-range
//! values are never clamped anywhere in this crate.

use lodestone_types::ResourceId;

/// The resource-link field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkField {
    /// Extraction success probability.
    Chance,
    /// Quality of the yielded material.
    Purity,
    /// Minimum yield amount.
    AmountMin,
    /// Maximum yield amount.
    AmountMax,
}

impl LinkField {
    /// Snake-case field name as it appears in the entity schema.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chance => "chance",
            Self::Purity => "purity",
            Self::AmountMin => "amount_min",
            Self::AmountMax => "amount_max",
        }
    }
}

impl core::fmt::Display for LinkField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invariant violation on a resource link.
///
/// Terminal: the operation that produced it writes nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} for resource {resource_id}: {reason}")]
pub struct ValidationError {
    /// The resource whose link failed validation.
    pub resource_id: ResourceId,
    /// The offending field.
    pub field: LinkField,
    /// Human-readable explanation of the violation.
    pub reason: String,
}

impl ValidationError {
    /// Build a validation error for one field of one resource link.
    pub fn new(resource_id: ResourceId, field: LinkField, reason: impl Into<String>) -> Self {
        Self {
            resource_id,
            field,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur in core domain calculations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A resource link violated an invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Checked arithmetic failed during an extraction calculation.
    #[error("arithmetic overflow in extraction calculation")]
    ArithmeticOverflow,
}
