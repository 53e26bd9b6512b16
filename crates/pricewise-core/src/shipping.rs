//! # Shipping Fee Calculator
//!
//! Maps a cart subtotal to a bracketed base fee and adds a weight surcharge.
//!
//! ## Default Schedule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal range          base fee                                       │
//! │  ─────────────────────   ────────                                       │
//! │  [0, 200,000)            50,000                                         │
//! │  [200,000, 500,000)      30,000                                         │
//! │  [500,000, ∞)            0 (free)                                       │
//! │                                                                         │
//! │  + (weight − 5 kg) × 10,000 per kg, when weight > 5 kg                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Brackets are stored as ascending lower bounds. Each bracket runs up to the
//! next bound, and the last one is unbounded, so a validated schedule always
//! partitions `[0, ∞)` with no gap and no overlap.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult};
use crate::money::{div_round, Money};

const GRAMS_PER_KG: i64 = 1000;

/// One shipping bracket: applies from `min_subtotal` (inclusive) up to the
/// next bracket's bound (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingBracket {
    pub min_subtotal: Money,
    pub fee: Money,
}

/// Bracketed base fees plus a per-kilogram surcharge over a free allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingSchedule {
    #[serde(default = "default_brackets")]
    pub brackets: Vec<ShippingBracket>,

    /// Weight carried without surcharge.
    #[serde(default = "default_free_weight_grams")]
    pub free_weight_grams: i64,

    /// Surcharge per kilogram above the free allowance.
    #[serde(default = "default_surcharge_per_kg")]
    pub surcharge_per_kg: Money,
}

fn default_brackets() -> Vec<ShippingBracket> {
    vec![
        ShippingBracket {
            min_subtotal: Money::zero(),
            fee: Money::from_minor(50_000),
        },
        ShippingBracket {
            min_subtotal: Money::from_minor(200_000),
            fee: Money::from_minor(30_000),
        },
        ShippingBracket {
            min_subtotal: Money::from_minor(500_000),
            fee: Money::zero(),
        },
    ]
}

fn default_free_weight_grams() -> i64 {
    5_000
}

fn default_surcharge_per_kg() -> Money {
    Money::from_minor(10_000)
}

impl Default for ShippingSchedule {
    fn default() -> Self {
        ShippingSchedule {
            brackets: default_brackets(),
            free_weight_grams: default_free_weight_grams(),
            surcharge_per_kg: default_surcharge_per_kg(),
        }
    }
}

impl ShippingSchedule {
    /// Base fee for the bracket containing `subtotal`.
    ///
    /// A negative subtotal (only possible with a hand-built cart of negative
    /// prices that skipped validation) is treated as the first bracket.
    pub fn base_fee(&self, subtotal: Money) -> Money {
        self.brackets
            .iter()
            .rev()
            .find(|b| b.min_subtotal <= subtotal)
            .or_else(|| self.brackets.first())
            .map(|b| b.fee)
            .unwrap_or_default()
    }

    /// Surcharge for weight above the free allowance, rounded to the nearest unit.
    ///
    /// Saturates at `i64::MAX` for absurd weights; the pipeline's checked
    /// total then reports the overflow.
    pub fn weight_surcharge(&self, weight_grams: i64) -> Money {
        if weight_grams <= self.free_weight_grams {
            return Money::zero();
        }
        let excess = (weight_grams - self.free_weight_grams) as i128;
        let units = div_round(excess * self.surcharge_per_kg.minor() as i128, GRAMS_PER_KG as i128);
        Money::from_minor(i64::try_from(units).unwrap_or(i64::MAX))
    }

    /// Total shipping fee: base fee plus weight surcharge.
    ///
    /// ## Example
    /// ```rust
    /// use pricewise_core::money::Money;
    /// use pricewise_core::shipping::ShippingSchedule;
    ///
    /// let schedule = ShippingSchedule::default();
    /// // 250,000 falls in [200,000, 500,000); 7.5 kg is 2.5 kg over the allowance
    /// let fee = schedule.fee(Money::from_minor(250_000), 7_500);
    /// assert_eq!(fee.minor(), 30_000 + 25_000);
    /// ```
    pub fn fee(&self, subtotal: Money, weight_grams: i64) -> Money {
        let base = self.base_fee(subtotal);
        base.checked_add(self.weight_surcharge(weight_grams))
            .unwrap_or(Money::from_minor(i64::MAX))
    }

    /// Checks that brackets partition `[0, ∞)` and all amounts are non-negative.
    pub fn validate(&self) -> PricingResult<()> {
        let first = self.brackets.first().ok_or_else(|| {
            PricingError::InvalidConfig("shipping schedule needs at least one bracket".into())
        })?;

        if !first.min_subtotal.is_zero() {
            return Err(PricingError::InvalidConfig(format!(
                "first shipping bracket must start at 0, got {}",
                first.min_subtotal
            )));
        }

        for pair in self.brackets.windows(2) {
            if pair[1].min_subtotal <= pair[0].min_subtotal {
                return Err(PricingError::InvalidConfig(format!(
                    "shipping brackets must be strictly ascending ({} then {})",
                    pair[0].min_subtotal, pair[1].min_subtotal
                )));
            }
        }

        if self.brackets.iter().any(|b| b.fee.is_negative()) {
            return Err(PricingError::InvalidConfig(
                "shipping fees must not be negative".into(),
            ));
        }

        if self.free_weight_grams < 0 || self.surcharge_per_kg.is_negative() {
            return Err(PricingError::InvalidConfig(
                "weight allowance and surcharge must not be negative".into(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fee(subtotal: i64, grams: i64) -> i64 {
        ShippingSchedule::default()
            .fee(Money::from_minor(subtotal), grams)
            .minor()
    }

    #[test]
    fn test_bracket_boundaries() {
        assert_eq!(fee(0, 0), 50_000);
        assert_eq!(fee(199_999, 0), 50_000);
        assert_eq!(fee(200_000, 0), 30_000);
        assert_eq!(fee(499_999, 0), 30_000);
        assert_eq!(fee(500_000, 0), 0);
        assert_eq!(fee(90_000_000, 0), 0);
    }

    #[test]
    fn test_negative_subtotal_uses_first_bracket() {
        assert_eq!(fee(-10, 0), 50_000);
    }

    #[test]
    fn test_flat_up_to_free_weight() {
        assert_eq!(fee(600_000, 0), 0);
        assert_eq!(fee(600_000, 4_999), 0);
        assert_eq!(fee(600_000, 5_000), 0);
    }

    #[test]
    fn test_weight_surcharge_is_continuous() {
        assert_eq!(fee(600_000, 5_001), 10);
        assert_eq!(fee(600_000, 6_000), 10_000);
        assert_eq!(fee(600_000, 7_250), 22_500);
        assert_eq!(fee(100_000, 8_000), 50_000 + 30_000);
    }

    #[test]
    fn test_default_schedule_is_valid() {
        assert!(ShippingSchedule::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_gaps_and_overlaps() {
        let mut schedule = ShippingSchedule::default();
        schedule.brackets[0].min_subtotal = Money::from_minor(1);
        assert!(schedule.validate().is_err());

        let mut schedule = ShippingSchedule::default();
        schedule.brackets[2].min_subtotal = Money::from_minor(200_000);
        assert!(schedule.validate().is_err());

        let mut schedule = ShippingSchedule::default();
        schedule.brackets.clear();
        assert!(schedule.validate().is_err());

        let mut schedule = ShippingSchedule::default();
        schedule.brackets[1].fee = Money::from_minor(-1);
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_absurd_weight_saturates() {
        assert_eq!(fee(0, i64::MAX), i64::MAX);
    }
}
