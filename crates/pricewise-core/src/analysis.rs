//! # Profitability Analysis
//!
//! Margin figures for a priced cart. Revenue excludes tax, since tax is
//! collected on behalf of the tax authority.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::engine::PriceBreakdown;
use crate::money::Money;
use crate::types::CartItem;

/// Cost, revenue and profit of one priced cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitReport {
    /// Σ cost price × quantity.
    pub total_cost: Money,
    /// Amount charged minus tax. Shipping counts as revenue.
    pub revenue: Money,
    pub profit: Money,
    /// `profit / total_cost × 100`, or 0 when nothing had a cost.
    pub roi_percentage: f64,
}

/// Profitability of a cart priced into `breakdown`.
///
/// `items` must be the cart the breakdown was computed from.
pub fn profitability(items: &[CartItem<'_>], breakdown: &PriceBreakdown) -> ProfitReport {
    let total_cost: Money = items.iter().map(CartItem::cost).sum();
    let revenue = breakdown.total - breakdown.tax_amount;
    let profit = revenue - total_cost;

    ProfitReport {
        total_cost,
        revenue,
        profit,
        roi_percentage: profit.percentage_of(total_cost),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PricingEngine;
    use crate::types::{Customer, CustomerTier, Product};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_profitability_of_priced_cart() {
        let engine = PricingEngine::default();
        let widget = Product::new(1, "Widget", Money::from_minor(100_000), "Misc")
            .with_cost_price(Money::from_minor(60_000));
        let items = [CartItem::new(&widget, 2)];
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let customer = Customer::new("C1", "Test", CustomerTier::Bronze, now);

        let breakdown = engine.quote(&items, &customer, true, now).unwrap();
        let report = profitability(&items, &breakdown);

        // total 250,000 − tax 20,000
        assert_eq!(report.total_cost.minor(), 120_000);
        assert_eq!(report.revenue.minor(), 230_000);
        assert_eq!(report.profit.minor(), 110_000);
        assert!((report.roi_percentage - 110_000.0 / 120_000.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_cost_gives_zero_roi() {
        let engine = PricingEngine::default();
        let gift = Product::new(9, "Gift", Money::from_minor(10_000), "Misc");
        let items = [CartItem::new(&gift, 1)];
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let customer = Customer::new("C1", "Test", CustomerTier::Bronze, now);

        let breakdown = engine.quote(&items, &customer, true, now).unwrap();
        let report = profitability(&items, &breakdown);

        assert!(report.total_cost.is_zero());
        assert_eq!(report.roi_percentage, 0.0);
    }
}
