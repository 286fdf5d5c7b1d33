//! Error types for the `lodestone-engine` crate.
//!
//! Expected business conditions (depleted or inactive node, all-miss
//! extraction) are *not* errors -- they are failed
//! [`ExtractionOutcome`](crate::ExtractionOutcome) values. [`EngineError`]
//! covers the hard failures: missing entities, malformed input, and
//! invariant violations.

use lodestone_core::{CoreError, ModifierRangeError, ValidationError};
use lodestone_store::StoreError;
use lodestone_types::{BlueprintId, LocationId, NodeId};

/// Errors that can occur during engine operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The referenced blueprint does not exist.
    #[error("blueprint not found: {0}")]
    BlueprintNotFound(BlueprintId),

    /// The referenced node does not exist.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The location subsystem does not know the referenced location.
    #[error("location not found: {0}")]
    LocationNotFound(LocationId),

    /// A resource link (or merged override) violated an invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An extraction modifier was outside the accepted band.
    #[error(transparent)]
    Modifier(#[from] ModifierRangeError),

    /// Checked arithmetic failed during extraction resolution.
    #[error("arithmetic overflow during extraction")]
    ArithmeticOverflow,

    /// A store operation failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => Self::Validation(v),
            CoreError::ArithmeticOverflow => Self::ArithmeticOverflow,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            // Keep the spec-level taxonomy flat: missing entities and
            // validation failures surface as their own variants even
            // when a store detected them.
            StoreError::BlueprintNotFound(id) => Self::BlueprintNotFound(id),
            StoreError::NodeNotFound(id) => Self::NodeNotFound(id),
            StoreError::Validation(v) => Self::Validation(v),
            other => Self::Store(other),
        }
    }
}
