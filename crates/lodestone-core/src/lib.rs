//! Pure domain logic for the Lodestone resource-node engine.
//!
//! Everything in this crate is deterministic given its inputs: no I/O,
//! no ambient state, randomness only through injected [`rand::Rng`]
//! values. Stores and orchestration live in `lodestone-store` and
//! `lodestone-engine`.
//!
//! # Modules
//!
//! - [`config`] -- Typed YAML engine configuration.
//! - [`error`] -- Validation and calculation error types.
//! - [`extraction`] -- Per-link stochastic extraction resolution.
//! - [`lifecycle`] -- Extraction gate and depletion policy.
//! - [`merge`] -- Blueprint-link to node-link merge with overrides.
//! - [`validate`] -- Resource-link invariant checks.

pub mod config;
pub mod error;
pub mod extraction;
pub mod lifecycle;
pub mod merge;
pub mod validate;

// Re-export primary types at crate root.
pub use config::{ConfigError, EngineConfig, PaginationConfig};
pub use error::{CoreError, LinkField, ValidationError};
pub use extraction::{
    ExtractionModifiers, LinkYield, ModifierField, ModifierRangeError, resolve_link,
};
pub use lifecycle::{DepletionPolicy, ExtractionBlock, extraction_gate, is_exhausted};
pub use merge::{instantiate_link, merge_link};
pub use validate::{validate_link, validate_links};
