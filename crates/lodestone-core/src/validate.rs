//! Resource-link invariant checks.
//!
//! Every link persisted anywhere in the engine must satisfy:
//!
//! - `0 <= chance <= 1`
//! - `0 <= purity <= 1`
//! - `1 <= amount_min <= amount_max`
//!
//! Validation runs eagerly, before any persistence, and reports the first
//! violated field. Values are rejected, never clamped.

use lodestone_types::ResourceLink;
use rust_decimal::Decimal;

use crate::error::{LinkField, ValidationError};

/// Check all invariants on a single resource link.
///
/// # Errors
///
/// Returns [`ValidationError`] naming the offending resource and field.
pub fn validate_link(link: &ResourceLink) -> Result<(), ValidationError> {
    if link.chance < Decimal::ZERO || link.chance > Decimal::ONE {
        return Err(ValidationError::new(
            link.resource_id,
            LinkField::Chance,
            format!("must be within [0, 1], got {}", link.chance),
        ));
    }

    if link.purity < Decimal::ZERO || link.purity > Decimal::ONE {
        return Err(ValidationError::new(
            link.resource_id,
            LinkField::Purity,
            format!("must be within [0, 1], got {}", link.purity),
        ));
    }

    if link.amount_min < 1 {
        return Err(ValidationError::new(
            link.resource_id,
            LinkField::AmountMin,
            "must be at least 1",
        ));
    }

    if link.amount_min > link.amount_max {
        return Err(ValidationError::new(
            link.resource_id,
            LinkField::AmountMax,
            format!(
                "amount_min ({}) exceeds amount_max ({})",
                link.amount_min, link.amount_max
            ),
        ));
    }

    Ok(())
}

/// Check all links of a collection, failing on the first violation.
///
/// # Errors
///
/// Returns the [`ValidationError`] of the first invalid link.
pub fn validate_links<'a, I>(links: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a ResourceLink>,
{
    for link in links {
        validate_link(link)?;
    }
    Ok(())
}
