//! # Pricing Algorithms
//!
//! Stateless calculators that share the entity model but sit outside the
//! cart pipeline: dynamic pricing, bundle pricing and loyalty points.
//!
//! ```rust
//! use pricewise_core::algorithms::loyalty_point_calculation;
//! use pricewise_core::money::{Money, Multiplier};
//! use pricewise_core::types::CustomerTier;
//!
//! let points = loyalty_point_calculation(
//!     Money::from_minor(1_234_000),
//!     CustomerTier::Gold,
//!     Multiplier::from_bps(15_000),
//! );
//! assert_eq!(points, 2776);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::TierTable;
use crate::money::{Money, Multiplier, Rate, BPS_SCALE};
use crate::rules::{DiscountKind, DiscountRule};
use crate::types::{CustomerTier, Product};
use crate::LOYALTY_POINT_UNIT;

// =============================================================================
// Dynamic Pricing
// =============================================================================

/// Share of the demand deviation passed into the price.
const DEMAND_SENSITIVITY: f64 = 0.2;

/// Factor applied when a competitor sells below our base price.
const COMPETITOR_UNDERCUT_FACTOR: f64 = 0.95;

const LOW_STOCK_LEVEL: i64 = 10;
const LOW_STOCK_FACTOR: f64 = 1.1;
const HIGH_STOCK_LEVEL: i64 = 100;
const HIGH_STOCK_FACTOR: f64 = 0.9;

/// Adjusts a base price for demand, competition and stock.
///
/// ## Adjustments
/// ```text
/// demand       1 + (demand_factor − 1) × 0.2
/// competitor   0.95 if competitor_price < base_price, else 1.0
/// inventory    1.1 below 10 units, 0.9 above 100 units, else 1.0
///
/// price = max(base × demand × competitor × inventory,
///             base × (1 + target_margin))
/// ```
///
/// The floor is a margin guarantee over the base price, so the result never
/// drops below `base_price × (1 + target_margin)` whatever the adjustments
/// say. Pass [`crate::DEFAULT_TARGET_MARGIN`] for the usual 30%.
pub fn dynamic_pricing(
    base_price: Money,
    demand_factor: f64,
    competitor_price: Money,
    inventory_level: i64,
    target_margin: f64,
) -> Money {
    let demand_adjustment = 1.0 + (demand_factor - 1.0) * DEMAND_SENSITIVITY;

    let competitor_adjustment = if competitor_price < base_price {
        COMPETITOR_UNDERCUT_FACTOR
    } else {
        1.0
    };

    let inventory_adjustment = if inventory_level < LOW_STOCK_LEVEL {
        LOW_STOCK_FACTOR
    } else if inventory_level > HIGH_STOCK_LEVEL {
        HIGH_STOCK_FACTOR
    } else {
        1.0
    };

    let adjusted = base_price.scale(demand_adjustment * competitor_adjustment * inventory_adjustment);
    let floor = base_price.scale(1.0 + target_margin);

    adjusted.max(floor)
}

// =============================================================================
// Bundle Pricing
// =============================================================================

/// Price of a product set sold together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BundleQuote {
    /// Product names in the order given.
    pub products: Vec<String>,
    pub individual_total: Money,
    pub bundle_price: Money,
    pub savings: Money,
    /// Bundle discount as a percentage (15.0 for 15%).
    pub discount_percentage: f64,
}

/// Prices a bundle as one flat discount over the sum of unit prices.
///
/// Every product counts once, at its unit price, with no per-product
/// weighting. Pass [`crate::DEFAULT_BUNDLE_DISCOUNT`] for the usual 15%.
pub fn optimal_bundle_pricing(products: &[Product], bundle_discount: Rate) -> BundleQuote {
    let individual_total: Money = products.iter().map(|p| p.price).sum();
    let bundle_price = individual_total.apply_percentage_discount(bundle_discount);

    BundleQuote {
        products: products.iter().map(|p| p.name.clone()).collect(),
        individual_total,
        bundle_price,
        savings: individual_total - bundle_price,
        discount_percentage: bundle_discount.percentage(),
    }
}

/// Prices a bundle with a bundle rule's rate, capped by its `max_discount`.
///
/// Returns `None` for rules of any other kind.
pub fn bundle_quote_for_rule(products: &[Product], rule: &DiscountRule) -> Option<BundleQuote> {
    let DiscountKind::Bundle { rate } = rule.kind else {
        return None;
    };

    let mut quote = optimal_bundle_pricing(products, rate);

    if let Some(cap) = rule.max_discount {
        if quote.savings > cap {
            quote.savings = cap;
            quote.bundle_price = quote.individual_total - cap;
            quote.discount_percentage = cap.percentage_of(quote.individual_total);
        }
    }

    Some(quote)
}

// =============================================================================
// Loyalty Points
// =============================================================================

/// Loyalty points for a purchase under the default tier table.
pub fn loyalty_point_calculation(amount: Money, tier: CustomerTier, bonus: Multiplier) -> u64 {
    loyalty_points_with(&TierTable::default(), amount, tier, bonus)
}

/// Loyalty points for a purchase under a given tier table.
///
/// ```text
/// base   = ⌊amount / 1000⌋
/// points = ⌊base × tier multiplier × bonus⌋
/// ```
///
/// Both floors are kept. Multipliers are basis points, so the product is
/// exact and `1234 × 1.5 × 1.5 = 2776.5` floors to 2776 without float
/// error. A negative amount earns nothing.
pub fn loyalty_points_with(
    tiers: &TierTable,
    amount: Money,
    tier: CustomerTier,
    bonus: Multiplier,
) -> u64 {
    if amount.minor() <= 0 {
        return 0;
    }

    let base_points = (amount.minor() / LOYALTY_POINT_UNIT) as u128;
    let tier_bps = tiers.terms(tier).points_multiplier.bps() as u128;
    let scale = BPS_SCALE as u128;

    let points = base_points * tier_bps * bonus.bps() as u128 / (scale * scale);
    u64::try_from(points).unwrap_or(u64::MAX)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_BUNDLE_DISCOUNT, DEFAULT_TARGET_MARGIN};

    fn money(units: i64) -> Money {
        Money::from_minor(units)
    }

    #[test]
    fn test_dynamic_pricing_margin_floor() {
        // Neutral adjustments: the 30% margin floor wins
        let price = dynamic_pricing(money(1_000_000), 1.0, money(1_000_000), 50, DEFAULT_TARGET_MARGIN);
        assert_eq!(price.minor(), 1_300_000);

        // Strong demand, low stock: 1.4 × 1.1 = 1.54
        let price = dynamic_pricing(money(1_000_000), 3.0, money(2_000_000), 5, DEFAULT_TARGET_MARGIN);
        assert_eq!(price.minor(), 1_540_000);
    }

    #[test]
    fn test_dynamic_pricing_adjustments_below_floor() {
        // Undercut competitor and overstock push below base; floor still holds
        let price = dynamic_pricing(money(1_000_000), 1.0, money(900_000), 500, 0.0);
        assert_eq!(price.minor(), 1_000_000);

        // Without a margin, a demand spike still lifts the price
        let price = dynamic_pricing(money(1_000_000), 2.0, money(1_000_000), 50, 0.0);
        assert_eq!(price.minor(), 1_200_000);
    }

    #[test]
    fn test_optimal_bundle_pricing() {
        let products = [
            Product::new(1, "Phone", money(32_990_000), "Electronics"),
            Product::new(3, "AirPods", money(6_990_000), "Electronics"),
        ];

        let quote = optimal_bundle_pricing(&products, DEFAULT_BUNDLE_DISCOUNT);

        assert_eq!(quote.products, vec!["Phone".to_string(), "AirPods".to_string()]);
        assert_eq!(quote.individual_total.minor(), 39_980_000);
        assert_eq!(quote.bundle_price.minor(), 33_983_000);
        assert_eq!(quote.savings.minor(), 5_997_000);
        assert!((quote.discount_percentage - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_bundle() {
        let quote = optimal_bundle_pricing(&[], DEFAULT_BUNDLE_DISCOUNT);
        assert!(quote.products.is_empty());
        assert!(quote.bundle_price.is_zero());
    }

    #[test]
    fn test_bundle_quote_for_rule() {
        let products = [
            Product::new(1, "A", money(600_000), "X"),
            Product::new(2, "B", money(400_000), "X"),
        ];
        let rule = DiscountRule::new("Combo", DiscountKind::Bundle { rate: Rate::from_bps(2000) })
            .with_max_discount(money(150_000));

        let quote = bundle_quote_for_rule(&products, &rule).unwrap();
        assert_eq!(quote.savings.minor(), 150_000);
        assert_eq!(quote.bundle_price.minor(), 850_000);
        assert!((quote.discount_percentage - 15.0).abs() < 1e-9);

        let uncapped = DiscountRule::new("Combo", DiscountKind::Bundle { rate: Rate::from_bps(2000) });
        let quote = bundle_quote_for_rule(&products, &uncapped).unwrap();
        assert!((quote.discount_percentage - 20.0).abs() < 1e-9);

        let percentage = DiscountRule::new("Pct", DiscountKind::Percentage { rate: Rate::from_bps(2000) });
        assert!(bundle_quote_for_rule(&products, &percentage).is_none());
    }

    #[test]
    fn test_loyalty_points_double_floor() {
        let points = loyalty_point_calculation(
            money(1_234_000),
            CustomerTier::Gold,
            Multiplier::from_bps(15_000),
        );
        assert_eq!(points, 2776);
    }

    #[test]
    fn test_loyalty_points_by_tier() {
        let amount = money(1_000_999);
        let points: Vec<u64> = CustomerTier::ALL
            .iter()
            .map(|t| loyalty_point_calculation(amount, *t, Multiplier::ONE))
            .collect();
        assert_eq!(points, vec![1000, 1200, 1500, 2000, 3000]);
    }

    #[test]
    fn test_loyalty_points_edge_amounts() {
        assert_eq!(loyalty_point_calculation(money(999), CustomerTier::Vip, Multiplier::ONE), 0);
        assert_eq!(loyalty_point_calculation(money(-50_000), CustomerTier::Vip, Multiplier::ONE), 0);
        assert_eq!(loyalty_point_calculation(Money::zero(), CustomerTier::Vip, Multiplier::ONE), 0);
    }

    #[test]
    fn test_loyalty_points_custom_table() {
        let mut tiers = TierTable::default();
        tiers.silver.points_multiplier = Multiplier::from_bps(25_000);
        let points = loyalty_points_with(&tiers, money(10_000), CustomerTier::Silver, Multiplier::ONE);
        assert_eq!(points, 25);
    }
}
