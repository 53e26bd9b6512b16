//! # Discount Rules
//!
//! Rule configuration and the applicability matcher.
//!
//! ## Rule Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DiscountRule "Flash Sale Electronics 20%"                              │
//! │                                                                         │
//! │  kind:     Percentage { rate: 2000 bps }      ← what it gives           │
//! │  filters:  categories = ["Electronics"]       ← who/what it applies to  │
//! │            min_quantity, min_amount,                                    │
//! │            products, customer_tiers                                     │
//! │  window:   start_date ..= end_date            ← when it applies         │
//! │  cap:      max_discount = 5,000,000           ← most it can give        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules are configuration: created outside the engine, handed in, never
//! mutated by a pricing call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Rate};
use crate::types::{CartItem, Customer, CustomerTier};

// =============================================================================
// Discount Kind
// =============================================================================

/// One spend threshold of a tiered rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierThreshold {
    /// Item subtotal at which this tier starts to apply.
    pub min_subtotal: Money,
    pub rate: Rate,
}

impl TierThreshold {
    pub const fn new(min_subtotal: Money, rate: Rate) -> Self {
        TierThreshold { min_subtotal, rate }
    }
}

/// What a rule gives, with the parameters each formula needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountKind {
    /// A percentage of the item subtotal.
    Percentage { rate: Rate },

    /// A flat amount off the item, never more than the item costs.
    FixedAmount { amount: Money },

    /// Every `buy_quantity` units earn `get_quantity` free units.
    BuyXGetY { buy_quantity: u32, get_quantity: u32 },

    /// The highest threshold the item subtotal reaches sets the percentage.
    Tiered { thresholds: Vec<TierThreshold> },

    /// Whole-bundle discount; priced by
    /// [`crate::algorithms::bundle_quote_for_rule`], never per item.
    Bundle { rate: Rate },
}

impl DiscountKind {
    /// Short tag for logs.
    pub fn label(&self) -> &'static str {
        match self {
            DiscountKind::Percentage { .. } => "percentage",
            DiscountKind::FixedAmount { .. } => "fixed_amount",
            DiscountKind::BuyXGetY { .. } => "buy_x_get_y",
            DiscountKind::Tiered { .. } => "tiered",
            DiscountKind::Bundle { .. } => "bundle",
        }
    }
}

// =============================================================================
// Discount Rule
// =============================================================================

/// A configured discount rule.
///
/// ## Invariants
/// - `name` should be unique among active rules; reports group by name
/// - A rule whose `end_date` is before its `start_date` never matches
/// - `max_discount = None` means uncapped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRule {
    pub name: String,

    pub kind: DiscountKind,

    #[serde(default)]
    pub min_quantity: i64,

    /// Minimum item subtotal.
    #[serde(default)]
    pub min_amount: Money,

    #[serde(default)]
    pub max_discount: Option<Money>,

    /// Category allow-list; empty means any category.
    #[serde(default)]
    pub applicable_categories: Vec<String>,

    /// Product-id allow-list; empty means any product.
    #[serde(default)]
    pub applicable_products: Vec<i64>,

    /// Tier allow-list; empty means any tier.
    #[serde(default)]
    pub customer_tiers: Vec<CustomerTier>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub end_date: Option<DateTime<Utc>>,
}

impl DiscountRule {
    /// Creates an unrestricted, uncapped, always-active rule.
    pub fn new(name: impl Into<String>, kind: DiscountKind) -> Self {
        DiscountRule {
            name: name.into(),
            kind,
            min_quantity: 0,
            min_amount: Money::zero(),
            max_discount: None,
            applicable_categories: Vec::new(),
            applicable_products: Vec::new(),
            customer_tiers: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_min_quantity(mut self, min_quantity: i64) -> Self {
        self.min_quantity = min_quantity;
        self
    }

    pub fn with_min_amount(mut self, min_amount: Money) -> Self {
        self.min_amount = min_amount;
        self
    }

    pub fn with_max_discount(mut self, cap: Money) -> Self {
        self.max_discount = Some(cap);
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicable_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_products(mut self, product_ids: impl IntoIterator<Item = i64>) -> Self {
        self.applicable_products = product_ids.into_iter().collect();
        self
    }

    pub fn with_customer_tiers(mut self, tiers: impl IntoIterator<Item = CustomerTier>) -> Self {
        self.customer_tiers = tiers.into_iter().collect();
        self
    }

    /// Sets the activity window. Either bound may be open.
    pub fn with_window(
        mut self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    /// Whether the rule's window contains `now` (both bounds inclusive).
    ///
    /// An inverted window (`end < start`) contains no instant, so it falls
    /// out of the two bound checks without a special case.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if matches!(self.start_date, Some(start) if now < start) {
            return false;
        }
        if matches!(self.end_date, Some(end) if now > end) {
            return false;
        }
        true
    }

    /// Rule Applicability Matcher.
    ///
    /// ## Conditions (all must hold)
    /// ```text
    /// 1. active at `now`
    /// 2. item.quantity >= min_quantity
    /// 3. item.subtotal >= min_amount
    /// 4. categories empty  OR contains product.category
    /// 5. products empty    OR contains product.id
    /// 6. tiers empty       OR contains customer.tier
    /// ```
    ///
    /// `now` is read once per pricing call by the caller so every item and
    /// rule in the call sees the same instant.
    pub fn is_applicable(&self, item: &CartItem<'_>, customer: &Customer, now: DateTime<Utc>) -> bool {
        if !self.is_active_at(now) {
            return false;
        }

        if item.quantity < self.min_quantity {
            return false;
        }

        if item.subtotal() < self.min_amount {
            return false;
        }

        if !self.applicable_categories.is_empty()
            && !self.applicable_categories.contains(&item.product.category)
        {
            return false;
        }

        if !self.applicable_products.is_empty()
            && !self.applicable_products.contains(&item.product.id)
        {
            return false;
        }

        if !self.customer_tiers.is_empty() && !self.customer_tiers.contains(&customer.tier) {
            return false;
        }

        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
