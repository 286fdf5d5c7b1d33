//! Per-link stochastic extraction resolution.
//!
//! One extraction attempt resolves every resource link on a node
//! independently:
//!
//! 1. `modified_chance = min(1, chance * tool_efficiency * character_skill)`
//! 2. a uniform draw succeeds iff it falls at or below the modified chance
//! 3. on success, the base amount is an integer-uniform draw in
//!    `[amount_min, amount_max]`, scaled by tool efficiency (rounded,
//!    floor of 1), and the quality is `min(1, purity * character_skill)`
//!    rounded to two decimal places
//!
//! All fractional math uses [`Decimal`]; randomness comes from an
//! injected [`Rng`] so callers (and tests) control seeding.
//!
//! # Success roll
//!
//! The uniform draw is discrete over [`CHANCE_BUCKETS`] buckets, in the
//! integer-roll style used elsewhere in the stack. A roll strictly below
//! `chance * CHANCE_BUCKETS` succeeds, which is exact for any chance
//! expressible in six decimal places: chance 0 never succeeds, chance 1
//! always does.

use lodestone_types::{ResourceId, ResourceLinkInstance};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Resolution of the discrete success roll.
pub const CHANCE_BUCKETS: u32 = 1_000_000;

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Which extraction modifier was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierField {
    /// Tool efficiency multiplier.
    ToolEfficiency,
    /// Character skill multiplier.
    CharacterSkill,
}

impl core::fmt::Display for ModifierField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::ToolEfficiency => "tool_efficiency",
            Self::CharacterSkill => "character_skill",
        })
    }
}

/// An extraction modifier outside the accepted `[0.1, 2.0]` band.
///
/// Malformed input, not a business outcome: extraction fails hard on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be within [0.1, 2.0], got {value}")]
pub struct ModifierRangeError {
    /// The out-of-range modifier.
    pub field: ModifierField,
    /// The rejected value.
    pub value: Decimal,
}

/// Validated tool/skill multipliers for one extraction attempt.
///
/// Both values are bounded to `[0.1, 2.0]` at construction; the bounds
/// are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionModifiers {
    /// Tool efficiency multiplier (scales chance and amount).
    pub tool_efficiency: Decimal,
    /// Character skill multiplier (scales chance and quality).
    pub character_skill: Decimal,
}

impl ExtractionModifiers {
    /// Build validated modifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierRangeError`] if either value lies outside
    /// `[0.1, 2.0]`.
    pub fn new(
        tool_efficiency: Decimal,
        character_skill: Decimal,
    ) -> Result<Self, ModifierRangeError> {
        check_modifier(ModifierField::ToolEfficiency, tool_efficiency)?;
        check_modifier(ModifierField::CharacterSkill, character_skill)?;
        Ok(Self {
            tool_efficiency,
            character_skill,
        })
    }

    /// Neutral modifiers (both exactly 1): extraction behaves exactly as
    /// the link data describes.
    pub const fn neutral() -> Self {
        Self {
            tool_efficiency: Decimal::ONE,
            character_skill: Decimal::ONE,
        }
    }
}

/// Lower bound of the accepted modifier band (0.1).
fn modifier_min() -> Decimal {
    Decimal::new(1, 1)
}

/// Upper bound of the accepted modifier band (2.0).
fn modifier_max() -> Decimal {
    Decimal::from(2)
}

fn check_modifier(field: ModifierField, value: Decimal) -> Result<(), ModifierRangeError> {
    if value < modifier_min() || value > modifier_max() {
        return Err(ModifierRangeError { field, value });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Resolution steps
// ---------------------------------------------------------------------------

/// The effective success probability after modifiers, saturating at 1.
///
/// Monotonically non-decreasing in both modifiers; equal to `chance`
/// exactly when both modifiers are 1.
///
/// # Errors
///
/// Returns [`CoreError::ArithmeticOverflow`] if checked multiplication
/// fails.
pub fn modified_chance(
    chance: Decimal,
    modifiers: &ExtractionModifiers,
) -> Result<Decimal, CoreError> {
    let product = chance
        .checked_mul(modifiers.tool_efficiency)
        .and_then(|v| v.checked_mul(modifiers.character_skill))
        .ok_or(CoreError::ArithmeticOverflow)?;
    Ok(product.min(Decimal::ONE))
}

/// Perform the uniform success roll against an effective chance.
///
/// `chance` is expected in `[0, 1]`; 0 never succeeds and 1 always does
/// without consuming randomness for the degenerate cases.
pub fn roll_success(rng: &mut impl Rng, chance: Decimal) -> bool {
    if chance >= Decimal::ONE {
        return true;
    }
    if chance <= Decimal::ZERO {
        return false;
    }

    let roll = rng.random_range(0..CHANCE_BUCKETS);
    // chance is in (0, 1) here, so the scaling cannot overflow Decimal.
    let threshold = chance
        .checked_mul(Decimal::from(CHANCE_BUCKETS))
        .unwrap_or(Decimal::ZERO);
    Decimal::from(roll) < threshold
}

/// Integer-uniform base amount draw in `[amount_min, amount_max]`.
///
/// Callers guarantee `amount_min <= amount_max` (validated at
/// persistence); the bounds are swapped defensively only to keep the
/// draw total.
pub fn draw_amount(rng: &mut impl Rng, amount_min: u32, amount_max: u32) -> u32 {
    let (lo, hi) = if amount_min <= amount_max {
        (amount_min, amount_max)
    } else {
        (amount_max, amount_min)
    };
    rng.random_range(lo..=hi)
}

/// Scale a base amount by tool efficiency: `max(1, round(base * eff))`.
///
/// Rounding is half-away-from-zero, so `2.5` scales to `3`.
///
/// # Errors
///
/// Returns [`CoreError::ArithmeticOverflow`] if the scaled value does
/// not fit the amount range.
pub fn scaled_amount(base: u32, tool_efficiency: Decimal) -> Result<u32, CoreError> {
    let scaled = Decimal::from(base)
        .checked_mul(tool_efficiency)
        .ok_or(CoreError::ArithmeticOverflow)?;
    let rounded = scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let amount = rounded.to_u32().ok_or(CoreError::ArithmeticOverflow)?;
    Ok(amount.max(1))
}

/// Scale purity by character skill into a reported quality:
/// `min(1, purity * skill)` rounded to two decimal places.
///
/// # Errors
///
/// Returns [`CoreError::ArithmeticOverflow`] if checked multiplication
/// fails.
pub fn scaled_quality(
    purity: Decimal,
    character_skill: Decimal,
) -> Result<Decimal, CoreError> {
    let product = purity
        .checked_mul(character_skill)
        .ok_or(CoreError::ArithmeticOverflow)?;
    Ok(product
        .min(Decimal::ONE)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

// ---------------------------------------------------------------------------
// Per-link resolution
// ---------------------------------------------------------------------------

/// The yield of one successful link resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkYield {
    /// The yielded resource.
    pub resource_id: ResourceId,
    /// Units produced after the efficiency modifier.
    pub amount: u32,
    /// Quality in `[0, 1]`, rounded to two decimal places.
    pub quality: Decimal,
}

/// Resolve one extraction attempt against one link instance.
///
/// Returns `Ok(None)` when the success roll misses -- an expected
/// outcome, not an error. Counters on the instance are *not* touched
/// here; statistics updates belong to the store so they can be applied
/// atomically.
///
/// # Errors
///
/// Returns [`CoreError::ArithmeticOverflow`] if a checked calculation
/// fails.
pub fn resolve_link(
    rng: &mut impl Rng,
    instance: &ResourceLinkInstance,
    modifiers: &ExtractionModifiers,
) -> Result<Option<LinkYield>, CoreError> {
    let link = &instance.link;

    let effective = modified_chance(link.chance, modifiers)?;
    if !roll_success(rng, effective) {
        return Ok(None);
    }

    let base = draw_amount(rng, link.amount_min, link.amount_max);
    let amount = scaled_amount(base, modifiers.tool_efficiency)?;
    let quality = scaled_quality(link.purity, modifiers.character_skill)?;

    Ok(Some(LinkYield {
        resource_id: link.resource_id,
        amount,
        quality,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use lodestone_types::{Metadata, ResourceLink};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rust_decimal_macros::dec;

    use super::*;

    fn instance(chance: Decimal, amount_min: u32, amount_max: u32, purity: Decimal) -> ResourceLinkInstance {
        ResourceLinkInstance::fresh(ResourceLink {
            resource_id: ResourceId::new(),
            is_primary: true,
            chance,
            amount_min,
            amount_max,
            purity,
            rarity: String::from("common"),
            theme_id: None,
            metadata: Metadata::new(),
        })
    }

    #[test]
    fn neutral_modifiers_preserve_chance_exactly() {
        let modifiers = ExtractionModifiers::neutral();
        for chance in [dec!(0), dec!(0.25), dec!(0.8), dec!(1)] {
            assert_eq!(modified_chance(chance, &modifiers).unwrap(), chance);
        }
    }

    #[test]
    fn modified_chance_saturates_at_one() {
        let modifiers = ExtractionModifiers::new(dec!(2), dec!(2)).unwrap();
        assert_eq!(modified_chance(dec!(0.9), &modifiers).unwrap(), dec!(1));
    }

    #[test]
    fn modified_chance_is_monotone_in_each_modifier() {
        let chance = dec!(0.3);
        let skills = [dec!(0.1), dec!(0.5), dec!(1), dec!(1.5), dec!(2)];

        // Non-decreasing in tool efficiency, holding skill fixed.
        for skill in skills {
            let mut previous = Decimal::ZERO;
            for eff in skills {
                let modifiers = ExtractionModifiers::new(eff, skill).unwrap();
                let current = modified_chance(chance, &modifiers).unwrap();
                assert!(current >= previous, "eff={eff} skill={skill}");
                previous = current;
            }
        }

        // Non-decreasing in skill, holding tool efficiency fixed.
        for eff in skills {
            let mut previous = Decimal::ZERO;
            for skill in skills {
                let modifiers = ExtractionModifiers::new(eff, skill).unwrap();
                let current = modified_chance(chance, &modifiers).unwrap();
                assert!(current >= previous, "eff={eff} skill={skill}");
                previous = current;
            }
        }
    }

    #[test]
    fn modifier_band_is_enforced() {
        assert!(ExtractionModifiers::new(dec!(0.1), dec!(2)).is_ok());
        let low = ExtractionModifiers::new(dec!(0.09), dec!(1)).unwrap_err();
        assert_eq!(low.field, ModifierField::ToolEfficiency);
        let high = ExtractionModifiers::new(dec!(1), dec!(2.01)).unwrap_err();
        assert_eq!(high.field, ModifierField::CharacterSkill);
    }

    #[test]
    fn certain_chance_always_succeeds() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(roll_success(&mut rng, Decimal::ONE));
        }
    }

    #[test]
    fn zero_chance_never_succeeds() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(!roll_success(&mut rng, Decimal::ZERO));
        }
    }

    #[test]
    fn roll_success_rate_tracks_chance() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut hits: u32 = 0;
        let trials: u32 = 10_000;
        for _ in 0..trials {
            if roll_success(&mut rng, dec!(0.8)) {
                hits += 1;
            }
        }
        // 0.8 +/- a generous band for 10k trials.
        assert!((7_500..=8_500).contains(&hits), "hits={hits}");
    }

    #[test]
    fn draw_amount_stays_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = draw_amount(&mut rng, 5, 10);
            assert!((5..=10).contains(&v));
        }
    }

    #[test]
    fn draw_amount_degenerate_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(draw_amount(&mut rng, 4, 4), 4);
    }

    #[test]
    fn scaled_amount_rounds_half_away_from_zero() {
        // 5 * 0.5 = 2.5 -> 3
        assert_eq!(scaled_amount(5, dec!(0.5)).unwrap(), 3);
        // 5 * 0.48 = 2.4 -> 2
        assert_eq!(scaled_amount(5, dec!(0.48)).unwrap(), 2);
    }

    #[test]
    fn scaled_amount_has_floor_of_one() {
        // 1 * 0.1 = 0.1 -> rounds to 0, floored to 1
        assert_eq!(scaled_amount(1, dec!(0.1)).unwrap(), 1);
    }

    #[test]
    fn scaled_amount_neutral_is_identity() {
        for base in [1, 5, 10, 250] {
            assert_eq!(scaled_amount(base, Decimal::ONE).unwrap(), base);
        }
    }

    #[test]
    fn quality_is_capped_and_rounded() {
        assert_eq!(scaled_quality(dec!(0.85), dec!(2)).unwrap(), dec!(1));
        assert_eq!(scaled_quality(dec!(0.85), dec!(1)).unwrap(), dec!(0.85));
        // 0.85 * 0.33 = 0.2805 -> 0.28
        assert_eq!(scaled_quality(dec!(0.85), dec!(0.33)).unwrap(), dec!(0.28));
    }

    #[test]
    fn resolve_link_miss_yields_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);
        let instance = instance(dec!(0), 5, 10, dec!(0.85));
        let yielded = resolve_link(&mut rng, &instance, &ExtractionModifiers::neutral()).unwrap();
        assert!(yielded.is_none());
    }

    #[test]
    fn resolve_link_success_shape() {
        let mut rng = SmallRng::seed_from_u64(1);
        let instance = instance(dec!(1), 5, 10, dec!(0.85));
        let yielded = resolve_link(&mut rng, &instance, &ExtractionModifiers::neutral())
            .unwrap()
            .unwrap();
        assert_eq!(yielded.resource_id, instance.link.resource_id);
        assert!((5..=10).contains(&yielded.amount));
        assert_eq!(yielded.quality, dec!(0.85));
    }

    #[test]
    fn resolution_is_reproducible_for_a_seed() {
        let instance = instance(dec!(0.6), 2, 9, dec!(0.5));
        let modifiers = ExtractionModifiers::new(dec!(1.3), dec!(0.9)).unwrap();

        let mut a = SmallRng::seed_from_u64(99);
        let mut b = SmallRng::seed_from_u64(99);
        for _ in 0..100 {
            let ya = resolve_link(&mut a, &instance, &modifiers).unwrap();
            let yb = resolve_link(&mut b, &instance, &modifiers).unwrap();
            assert_eq!(ya, yb);
        }
    }
}
