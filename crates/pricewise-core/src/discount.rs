//! # Discount Calculation
//!
//! The per-item Discount Calculator and the Best-Discount Selector.
//!
//! ## Selection Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each cart item                                                     │
//! │      for each rule (caller order)                                       │
//! │          discount_for(item, rule) ──► candidate                         │
//! │      keep the strictly largest candidate (ties: earliest rule)          │
//! │      zero? ──► item omitted from report, subtotal still counted         │
//! │                                                                         │
//! │  One rule per item. No stacking, no shared budget across items.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::money::Money;
use crate::rules::{DiscountKind, DiscountRule};
use crate::types::{cart_subtotal, CartItem, Customer};

// =============================================================================
// Discount Calculator
// =============================================================================

/// Discount one rule gives one cart item.
///
/// Returns zero when the rule does not apply. Otherwise applies the kind's
/// formula, then the rule's cap. The result always lies in
/// `[0, item.subtotal()]`.
///
/// ## Formulas
/// ```text
/// Percentage   subtotal × rate
/// FixedAmount  min(amount, subtotal)
/// BuyXGetY     min(⌊qty / buy⌋ × get, qty) × unit price   (qty >= buy)
/// Tiered       subtotal × rate of the highest threshold reached
/// Bundle       0 (bundles are priced whole, not per item)
/// ```
pub fn discount_for(
    item: &CartItem<'_>,
    rule: &DiscountRule,
    customer: &Customer,
    now: DateTime<Utc>,
) -> Money {
    if !rule.is_applicable(item, customer, now) {
        return Money::zero();
    }

    let subtotal = item.subtotal();

    let computed = match &rule.kind {
        DiscountKind::Percentage { rate } => subtotal.portion(*rate),

        DiscountKind::FixedAmount { amount } => (*amount).min(subtotal),

        DiscountKind::BuyXGetY {
            buy_quantity,
            get_quantity,
        } => {
            let buy = i64::from(*buy_quantity);
            if buy == 0 || item.quantity < buy {
                Money::zero()
            } else {
                let free_units = (item.quantity / buy)
                    .saturating_mul(i64::from(*get_quantity))
                    .min(item.quantity);
                item.product.price.multiply_quantity(free_units)
            }
        }

        // Thresholds are unique, so the largest one reached is the one an
        // ascending overwrite would leave behind.
        DiscountKind::Tiered { thresholds } => thresholds
            .iter()
            .filter(|t| subtotal >= t.min_subtotal)
            .max_by_key(|t| t.min_subtotal)
            .map(|t| subtotal.portion(t.rate))
            .unwrap_or_default(),

        DiscountKind::Bundle { .. } => Money::zero(),
    };

    let capped = match rule.max_discount {
        Some(cap) => computed.min(cap),
        None => computed,
    };

    capped.min(subtotal).max(Money::zero())
}

// =============================================================================
// Best-Discount Selector
// =============================================================================

/// The winning discount for one cart item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemDiscount {
    /// `"{product_id}_{quantity}"`.
    pub item_key: String,
    pub product_id: i64,
    pub product_name: String,
    pub discount_amount: Money,
    pub rule_name: String,
    /// Item subtotal before the discount.
    pub original_price: Money,
}

/// Itemized product-discount report for a cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountReport {
    /// Items with a non-zero winning discount, in cart order.
    pub item_discounts: Vec<ItemDiscount>,
    /// Sum of all winning discounts.
    pub total_discount: Money,
    /// Names of rules that won at least one item, first win first.
    pub applied_rules: Vec<String>,
    /// Cart subtotal, including items without a discount.
    pub subtotal: Money,
}

impl DiscountReport {
    /// Looks up an item's discount by its key.
    pub fn get(&self, item_key: &str) -> Option<&ItemDiscount> {
        self.item_discounts.iter().find(|d| d.item_key == item_key)
    }
}

/// Finds the rule giving `item` the largest discount.
///
/// Only a strictly larger discount replaces the current best, so ties keep
/// the rule that comes first in `rules`. Returns `None` when nothing gives
/// more than zero.
pub fn best_rule_for<'r>(
    item: &CartItem<'_>,
    rules: &'r [DiscountRule],
    customer: &Customer,
    now: DateTime<Utc>,
) -> Option<(&'r DiscountRule, Money)> {
    let mut best: Option<(&'r DiscountRule, Money)> = None;

    for rule in rules {
        let discount = discount_for(item, rule, customer, now);
        let current = best.map(|(_, amount)| amount).unwrap_or_default();
        if discount > current {
            best = Some((rule, discount));
        }
    }

    best
}

/// Selects the best single rule for every item and builds the report.
pub fn select_best(
    items: &[CartItem<'_>],
    rules: &[DiscountRule],
    customer: &Customer,
    now: DateTime<Utc>,
) -> DiscountReport {
    let mut report = DiscountReport {
        subtotal: cart_subtotal(items),
        ..DiscountReport::default()
    };

    for item in items {
        let Some((rule, amount)) = best_rule_for(item, rules, customer, now) else {
            continue;
        };

        trace!(
            item = %item.item_key(),
            rule = %rule.name,
            discount = %amount,
            "Selected best discount"
        );

        report.item_discounts.push(ItemDiscount {
            item_key: item.item_key(),
            product_id: item.product.id,
            product_name: item.product.name.clone(),
            discount_amount: amount,
            rule_name: rule.name.clone(),
            original_price: item.subtotal(),
        });
        report.total_discount += amount;

        if !report.applied_rules.contains(&rule.name) {
            report.applied_rules.push(rule.name.clone());
        }
    }

    report
}

// =============================================================================
// Unit Tests
// =============================================================================
