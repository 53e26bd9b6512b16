//! # Validation Module
//!
//! Input validation for carts and discount rules.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      When Validation Runs                               │
//! │                                                                         │
//! │  add_discount_rule(rule)                                                │
//! │  └── validate_rule ──► reject before the rule joins the rule set        │
//! │                                                                         │
//! │  calculate_final_price(cart, ...)                                       │
//! │  └── validate_cart ──► reject before stage 1 (subtotal) runs            │
//! │                                                                         │
//! │  The engine never coerces bad input; a rejected call returns an error   │
//! │  and computes nothing.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricewise_core::validation::{validate_quantity, validate_rate};
//! use pricewise_core::money::Rate;
//!
//! assert!(validate_quantity(3).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_rate("value", Rate::from_bps(2000)).is_ok());
//! ```

use crate::error::{PricingError, PricingResult, ValidationError};
use crate::money::{Money, Rate, BPS_SCALE};
use crate::rules::{DiscountKind, DiscountRule};
use crate::types::{CartItem, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates that a monetary amount is not negative.
///
/// ## Example
/// ```rust
/// use pricewise_core::validation::validate_non_negative;
/// use pricewise_core::money::Money;
///
/// assert!(validate_non_negative("price", Money::from_minor(0)).is_ok());
/// assert!(validate_non_negative("price", Money::from_minor(-1)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a weight in grams.
pub fn validate_weight_grams(grams: i64) -> ValidationResult<()> {
    if grams < 0 {
        return Err(ValidationError::Negative {
            field: "weight".to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage rate.
///
/// ## Rules
/// - Must be between 0 and 10000 bps (0% to 100%)
pub fn validate_rate(field: &str, rate: Rate) -> ValidationResult<()> {
    if rate.bps() > BPS_SCALE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: BPS_SCALE as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates the priced fields of a product.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_non_negative("price", product.price)?;
    validate_non_negative("cost_price", product.cost_price)?;
    validate_weight_grams(product.weight_grams)
}

/// Validates that a line's subtotal, cost and weight fit in i64.
pub fn validate_line_totals(item: &CartItem<'_>) -> ValidationResult<()> {
    let product = item.product;
    product
        .price
        .checked_multiply_quantity(item.quantity)
        .ok_or_else(|| overflow("subtotal"))?;
    product
        .cost_price
        .checked_multiply_quantity(item.quantity)
        .ok_or_else(|| overflow("cost"))?;
    product
        .weight_grams
        .checked_mul(item.quantity)
        .ok_or_else(|| overflow("weight"))?;
    Ok(())
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

fn add_line(
    subtotal: Money,
    cost: Money,
    weight_grams: i64,
    item: &CartItem<'_>,
) -> ValidationResult<(Money, Money, i64)> {
    let subtotal = subtotal
        .checked_add(item.subtotal())
        .ok_or_else(|| overflow("cart subtotal"))?;
    let cost = cost
        .checked_add(item.cost())
        .ok_or_else(|| overflow("cart cost"))?;
    let weight_grams = weight_grams
        .checked_add(item.weight_grams())
        .ok_or_else(|| overflow("cart weight"))?;
    Ok((subtotal, cost, weight_grams))
}

/// Validates one cart line and the product it references.
pub fn validate_cart_item(item: &CartItem<'_>) -> PricingResult<()> {
    validate_quantity(item.quantity)
        .and_then(|_| validate_product(item.product))
        .and_then(|_| validate_line_totals(item))
        .map_err(|source| PricingError::InvalidCartItem {
            product_id: item.product.id,
            source,
        })
}

/// Validates every line of a cart. Stops at the first invalid line.
///
/// Running cart totals are checked too; a line that pushes the cart
/// subtotal, cost or weight past i64 is reported as invalid.
pub fn validate_cart(items: &[CartItem<'_>]) -> PricingResult<()> {
    let mut subtotal = Money::zero();
    let mut cost = Money::zero();
    let mut weight_grams: i64 = 0;

    for item in items {
        validate_cart_item(item)?;

        let running = add_line(subtotal, cost, weight_grams, item).map_err(|source| {
            PricingError::InvalidCartItem {
                product_id: item.product.id,
                source,
            }
        })?;
        (subtotal, cost, weight_grams) = running;
    }

    Ok(())
}

/// Validates a discount rule's configuration.
///
/// ## Rules
/// - Name must not be blank
/// - Caps, minimum amounts and fixed amounts must not be negative
/// - Minimum quantity must not be negative
/// - Percentages must be within 0-100%
/// - Buy-X-get-Y needs a positive buy quantity
/// - Tiered needs at least one threshold, thresholds non-negative and unique
///
/// An activity window whose end precedes its start is *not* an error; such
/// a rule is simply never active.
pub fn validate_rule(rule: &DiscountRule) -> PricingResult<()> {
    check_rule(rule).map_err(|source| PricingError::InvalidRule {
        rule: rule.name.clone(),
        source,
    })
}

fn check_rule(rule: &DiscountRule) -> ValidationResult<()> {
    if rule.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if rule.min_quantity < 0 {
        return Err(ValidationError::Negative {
            field: "min_quantity".to_string(),
        });
    }
    validate_non_negative("min_amount", rule.min_amount)?;
    if let Some(cap) = rule.max_discount {
        validate_non_negative("max_discount", cap)?;
    }

    match &rule.kind {
        DiscountKind::Percentage { rate } | DiscountKind::Bundle { rate } => {
            validate_rate("rate", *rate)
        }
        DiscountKind::FixedAmount { amount } => validate_non_negative("amount", *amount),
        DiscountKind::BuyXGetY { buy_quantity, .. } => {
            if *buy_quantity == 0 {
                return Err(ValidationError::MustBePositive {
                    field: "buy_quantity".to_string(),
                });
            }
            Ok(())
        }
        DiscountKind::Tiered { thresholds } => {
            if thresholds.is_empty() {
                return Err(ValidationError::Required {
                    field: "thresholds".to_string(),
                });
            }
            for threshold in thresholds {
                validate_non_negative("threshold", threshold.min_subtotal)?;
                validate_rate("threshold rate", threshold.rate)?;
            }
            let mut bounds: Vec<Money> = thresholds.iter().map(|t| t.min_subtotal).collect();
            bounds.sort();
            if bounds.windows(2).any(|w| w[0] == w[1]) {
                return Err(ValidationError::InvalidFormat {
                    field: "thresholds".to_string(),
                    reason: "threshold amounts must be unique".to_string(),
                });
            }
            Ok(())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::TierThreshold;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("rate", Rate::zero()).is_ok());
        assert!(validate_rate("rate", Rate::FULL).is_ok());
        assert!(validate_rate("rate", Rate::from_bps(10_001)).is_err());
    }

    #[test]
    fn test_validate_cart_item() {
        let product = Product::new(3, "AirPods", Money::from_minor(6_990_000), "Electronics");
        assert!(validate_cart_item(&CartItem::new(&product, 3)).is_ok());

        let err = validate_cart_item(&CartItem::new(&product, 0)).unwrap_err();
        assert!(matches!(err, PricingError::InvalidCartItem { product_id: 3, .. }));

        let negative = product.clone().with_weight_grams(-5);
        assert!(validate_cart_item(&CartItem::new(&negative, 1)).is_err());

        let mut negative_price = product.clone();
        negative_price.price = Money::from_minor(-1);
        assert!(validate_cart_item(&CartItem::new(&negative_price, 1)).is_err());

        let negative_cost = product.with_cost_price(Money::from_minor(-1));
        assert!(validate_cart_item(&CartItem::new(&negative_cost, 1)).is_err());
    }

    #[test]
    fn test_validate_cart_reports_first_bad_line() {
        let good = Product::new(1, "Phone", Money::from_minor(100), "Electronics");
        let bad = Product::new(2, "Case", Money::from_minor(-100), "Electronics");
        let items = [CartItem::new(&good, 1), CartItem::new(&bad, 1)];

        let err = validate_cart(&items).unwrap_err();
        assert!(matches!(err, PricingError::InvalidCartItem { product_id: 2, .. }));
        assert!(validate_cart(&[]).is_ok());
    }

    #[test]
    fn test_validate_rule() {
        let ok = DiscountRule::new("Ten", DiscountKind::Percentage { rate: Rate::from_bps(1000) });
        assert!(validate_rule(&ok).is_ok());

        let blank = DiscountRule::new("  ", DiscountKind::Percentage { rate: Rate::zero() });
        assert!(validate_rule(&blank).is_err());

        let too_big = DiscountRule::new("Big", DiscountKind::Percentage { rate: Rate::from_bps(10_500) });
        assert!(validate_rule(&too_big).is_err());

        let negative_fixed = DiscountRule::new(
            "Neg",
            DiscountKind::FixedAmount { amount: Money::from_minor(-1) },
        );
        assert!(validate_rule(&negative_fixed).is_err());

        let zero_buy = DiscountRule::new(
            "B0G1",
            DiscountKind::BuyXGetY { buy_quantity: 0, get_quantity: 1 },
        );
        assert!(validate_rule(&zero_buy).is_err());

        let negative_cap = DiscountRule::new("Cap", DiscountKind::Percentage { rate: Rate::zero() })
            .with_max_discount(Money::from_minor(-5));
        assert!(validate_rule(&negative_cap).is_err());
    }

    #[test]
    fn test_validate_tiered_rule() {
        let empty = DiscountRule::new("Tiered", DiscountKind::Tiered { thresholds: vec![] });
        assert!(validate_rule(&empty).is_err());

        let duplicated = DiscountRule::new(
            "Tiered",
            DiscountKind::Tiered {
                thresholds: vec![
                    TierThreshold::new(Money::from_minor(100), Rate::from_bps(500)),
                    TierThreshold::new(Money::from_minor(100), Rate::from_bps(1000)),
                ],
            },
        );
        let err = validate_rule(&duplicated).unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidRule {
                source: ValidationError::InvalidFormat { .. },
                ..
            }
        ));

        let unsorted = DiscountRule::new(
            "Tiered",
            DiscountKind::Tiered {
                thresholds: vec![
                    TierThreshold::new(Money::from_minor(200), Rate::from_bps(1000)),
                    TierThreshold::new(Money::from_minor(100), Rate::from_bps(500)),
                ],
            },
        );
        assert!(validate_rule(&unsorted).is_ok());
    }

    #[test]
    fn test_line_overflow_is_rejected() {
        let product = Product::new(8, "Bulk", Money::from_minor(1_000_000_000_000), "Misc");
        let err = validate_cart_item(&CartItem::new(&product, 10_000_000)).unwrap_err();

        assert!(matches!(
            err,
            PricingError::InvalidCartItem {
                product_id: 8,
                source: ValidationError::OutOfRange { .. },
            }
        ));

        let heavy = Product::new(9, "Anvil", Money::from_minor(1), "Misc")
            .with_weight_grams(i64::MAX / 2);
        assert!(validate_cart_item(&CartItem::new(&heavy, 3)).is_err());
    }

    #[test]
    fn test_cart_total_overflow_names_offending_line() {
        let half = Product::new(1, "Half", Money::from_minor(i64::MAX / 2 + 1), "Misc");
        let other = Product::new(2, "Other", Money::from_minor(i64::MAX / 2 + 1), "Misc");

        assert!(validate_cart(&[CartItem::new(&half, 1)]).is_ok());

        let err = validate_cart(&[CartItem::new(&half, 1), CartItem::new(&other, 1)]).unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidCartItem {
                product_id: 2,
                source: ValidationError::OutOfRange { .. },
            }
        ));
    }
}
