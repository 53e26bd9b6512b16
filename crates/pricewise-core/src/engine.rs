//! # Pricing Engine
//!
//! Owns the configuration tables and the rule set, and runs the pricing
//! pipeline over a cart.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate_cart ──► reject the whole call on the first bad line          │
//! │       │                                                                 │
//! │  1. subtotal, total weight                                              │
//! │  2. product discount      = Σ best rule per item                        │
//! │  3. customer discount     = (subtotal − product discount) × tier rate   │
//! │  4. taxable               = subtotal − discounts      (not clamped)     │
//! │     tax                   = taxable × tax rate                          │
//! │  5. shipping              = schedule(subtotal, weight)                  │
//! │  6. total                 = taxable + tax + shipping                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rule Set Snapshots
//! Rules live behind an `Arc<Vec<DiscountRule>>`. A pricing call clones the
//! `Arc` once and prices against that snapshot, so a rule added mid-flight
//! by another owner of the engine never shows up halfway through a cart.
//! Adding a rule is copy-on-write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::config::PricingConfig;
use crate::discount::{discount_for, select_best, DiscountReport};
use crate::error::{PricingResult, ValidationError};
use crate::money::Money;
use crate::rules::DiscountRule;
use crate::types::{cart_subtotal, cart_weight_grams, CartItem, Customer};
use crate::validation::{validate_cart, validate_rule};

// =============================================================================
// Price Breakdown
// =============================================================================

/// Itemized result of one pricing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub product_discount: Money,
    pub customer_tier_discount: Money,
    pub total_discount: Money,
    /// Subtotal minus all discounts. Kept as computed, even when negative.
    pub taxable_amount: Money,
    pub tax_amount: Money,
    pub shipping_fee: Money,
    pub total: Money,
    pub total_weight_grams: i64,
    /// `total_discount / subtotal × 100`, or 0 for an empty cart.
    pub savings_percentage: f64,
    pub discount_details: DiscountReport,
    /// Instant the rule windows were evaluated at.
    #[ts(as = "String")]
    pub evaluated_at: DateTime<Utc>,
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// The pricing engine.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use pricewise_core::engine::PricingEngine;
/// use pricewise_core::money::Money;
/// use pricewise_core::types::{CartItem, Customer, CustomerTier, Product};
///
/// let engine = PricingEngine::default();
/// let widget = Product::new(1, "Widget", Money::from_minor(100_000), "Misc");
/// let customer = Customer::new("C1", "Nguyen Van A", CustomerTier::Bronze, Utc::now());
///
/// let breakdown = engine
///     .calculate_final_price(&[CartItem::new(&widget, 2)], &customer, true)
///     .unwrap();
/// assert_eq!(breakdown.total.minor(), 250_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
    rules: Arc<Vec<DiscountRule>>,
}

impl PricingEngine {
    /// Creates an engine with no rules.
    pub fn new(config: PricingConfig) -> Self {
        PricingEngine {
            config,
            rules: Arc::new(Vec::new()),
        }
    }

    /// Like [`PricingEngine::new`], but validates the configuration first.
    pub fn try_new(config: PricingConfig) -> PricingResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Current rules in registration order.
    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    /// A shared handle to the current rule set.
    pub fn rules_snapshot(&self) -> Arc<Vec<DiscountRule>> {
        Arc::clone(&self.rules)
    }

    /// Validates and appends a rule.
    ///
    /// A name already in use is accepted but logged, since reports group
    /// winning discounts by rule name.
    pub fn add_discount_rule(&mut self, rule: DiscountRule) -> PricingResult<()> {
        validate_rule(&rule)?;

        if self.rules.iter().any(|r| r.name == rule.name) {
            warn!(rule = %rule.name, "Duplicate discount rule name");
        }

        debug!(
            rule = %rule.name,
            kind = rule.kind.label(),
            total_rules = self.rules.len() + 1,
            "Discount rule added"
        );

        Arc::make_mut(&mut self.rules).push(rule);
        Ok(())
    }

    /// Replaces the whole rule set. Nothing changes if any rule is invalid.
    pub fn replace_rules(&mut self, rules: Vec<DiscountRule>) -> PricingResult<()> {
        rules.iter().try_for_each(validate_rule)?;

        debug!(total_rules = rules.len(), "Discount rules replaced");
        self.rules = Arc::new(rules);
        Ok(())
    }

    /// Prices a cart as of now.
    pub fn calculate_final_price(
        &self,
        items: &[CartItem<'_>],
        customer: &Customer,
        apply_customer_discount: bool,
    ) -> PricingResult<PriceBreakdown> {
        self.quote(items, customer, apply_customer_discount, Utc::now())
    }

    /// Prices a cart with rule windows evaluated at `now`.
    ///
    /// Same inputs and same `now` always give the same breakdown.
    pub fn quote(
        &self,
        items: &[CartItem<'_>],
        customer: &Customer,
        apply_customer_discount: bool,
        now: DateTime<Utc>,
    ) -> PricingResult<PriceBreakdown> {
        validate_cart(items)?;

        let rules = self.rules_snapshot();

        // Stage 1
        let subtotal = cart_subtotal(items);
        let total_weight_grams = cart_weight_grams(items);

        // Stage 2
        let discount_details = select_best(items, &rules, customer, now);
        let product_discount = discount_details.total_discount;

        // Stage 3
        let customer_tier_discount = if apply_customer_discount {
            (subtotal - product_discount).portion(customer.tier_discount(&self.config.tiers))
        } else {
            Money::zero()
        };

        let total_discount = product_discount + customer_tier_discount;

        // Stage 4
        let taxable_amount = subtotal - total_discount;
        if taxable_amount.is_negative() {
            warn!(
                customer = %customer.id,
                %subtotal,
                %total_discount,
                "Discounts exceed subtotal, taxable amount is negative"
            );
        }
        let tax_amount = taxable_amount.calculate_tax(self.config.tax_rate);

        // Stage 5
        let shipping_fee = self.config.shipping.fee(subtotal, total_weight_grams);

        // Stage 6
        let total = taxable_amount
            .checked_add(tax_amount)
            .and_then(|t| t.checked_add(shipping_fee))
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "total".to_string(),
                min: i64::MIN,
                max: i64::MAX,
            })?;

        debug!(
            customer = %customer.id,
            tier = %customer.tier,
            items = items.len(),
            %subtotal,
            %total_discount,
            %total,
            "Cart priced"
        );

        Ok(PriceBreakdown {
            subtotal,
            product_discount,
            customer_tier_discount,
            total_discount,
            taxable_amount,
            tax_amount,
            shipping_fee,
            total,
            total_weight_grams,
            savings_percentage: total_discount.percentage_of(subtotal),
            discount_details,
            evaluated_at: now,
        })
    }

    /// Shipping fee for a subtotal and weight under this engine's schedule.
    pub fn calculate_shipping_fee(&self, subtotal: Money, weight_grams: i64) -> Money {
        self.config.shipping.fee(subtotal, weight_grams)
    }

    /// Best single-rule discount per item, as of now.
    pub fn calculate_best_discount_combination(
        &self,
        items: &[CartItem<'_>],
        customer: &Customer,
    ) -> PricingResult<DiscountReport> {
        self.calculate_best_discount_combination_at(items, customer, Utc::now())
    }

    /// Best single-rule discount per item, with rule windows evaluated at `now`.
    pub fn calculate_best_discount_combination_at(
        &self,
        items: &[CartItem<'_>],
        customer: &Customer,
        now: DateTime<Utc>,
    ) -> PricingResult<DiscountReport> {
        validate_cart(items)?;
        Ok(select_best(items, &self.rules_snapshot(), customer, now))
    }

    /// Discount one rule gives one item. Zero when the rule does not apply.
    pub fn calculate_item_discount(
        &self,
        item: &CartItem<'_>,
        rule: &DiscountRule,
        customer: &Customer,
        now: DateTime<Utc>,
    ) -> Money {
        discount_for(item, rule, customer, now)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
