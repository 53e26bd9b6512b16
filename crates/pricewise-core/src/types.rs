//! # Domain Types
//!
//! Catalog entities consumed by the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │◄──│  CartItem<'a>   │   │    Customer     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (i64)       │   │  &Product       │   │  id (String)    │        │
//! │  │  price          │   │  quantity > 0   │   │  tier           │        │
//! │  │  category       │   │  subtotal()     │   │  total_spent    │        │
//! │  │  weight_grams   │   └─────────────────┘   └─────────────────┘        │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  CustomerTier: Bronze < Silver < Gold < Platinum < Vip                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart items borrow their product: the catalog owns products, a cart only
//! lives for one pricing call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::config::TierTable;
use crate::money::{Money, Rate};

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique catalog identifier.
    pub id: i64,

    /// Display name shown on reports.
    pub name: String,

    /// Unit price in minor currency units.
    pub price: Money,

    /// Category tag matched against rule category allow-lists.
    pub category: String,

    /// Units in stock. Feeds dynamic pricing, not the pipeline.
    #[serde(default)]
    pub stock: i64,

    /// Unit cost price (for profitability analysis).
    #[serde(default)]
    pub cost_price: Money,

    /// Unit weight in grams.
    #[serde(default)]
    pub weight_grams: i64,
}

impl Product {
    /// Creates a product with zero stock, cost and weight.
    pub fn new(id: i64, name: impl Into<String>, price: Money, category: impl Into<String>) -> Self {
        Product {
            id,
            name: name.into(),
            price,
            category: category.into(),
            stock: 0,
            cost_price: Money::zero(),
            weight_grams: 0,
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_cost_price(mut self, cost_price: Money) -> Self {
        self.cost_price = cost_price;
        self
    }

    pub fn with_weight_grams(mut self, weight_grams: i64) -> Self {
        self.weight_grams = weight_grams;
        self
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product(id={}, name='{}', price={})", self.id, self.name, self.price)
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A (product, quantity) line in a cart.
///
/// ## Invariants
/// - `quantity > 0`; the engine rejects carts that violate this before
///   pricing (see [`crate::validation::validate_cart_item`])
/// - line and cart totals fit in i64; arithmetic here saturates and
///   [`crate::validation::validate_cart`] rejects carts that would saturate
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartItem<'a> {
    pub product: &'a Product,
    pub quantity: i64,
}

impl<'a> CartItem<'a> {
    #[inline]
    pub fn new(product: &'a Product, quantity: i64) -> Self {
        CartItem { product, quantity }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }

    /// Unit weight × quantity.
    #[inline]
    pub fn weight_grams(&self) -> i64 {
        self.product.weight_grams.saturating_mul(self.quantity)
    }

    /// Unit cost × quantity.
    #[inline]
    pub fn cost(&self) -> Money {
        self.product.cost_price.multiply_quantity(self.quantity)
    }

    /// Identity of this line in discount reports: `"{product_id}_{quantity}"`.
    pub fn item_key(&self) -> String {
        format!("{}_{}", self.product.id, self.quantity)
    }
}

impl fmt::Display for CartItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CartItem({} x{} = {})",
            self.product.name,
            self.quantity,
            self.subtotal()
        )
    }
}

/// Sum of all line subtotals.
pub fn cart_subtotal(items: &[CartItem<'_>]) -> Money {
    items.iter().map(CartItem::subtotal).sum()
}

/// Sum of all line weights.
pub fn cart_weight_grams(items: &[CartItem<'_>]) -> i64 {
    items
        .iter()
        .map(CartItem::weight_grams)
        .fold(0, i64::saturating_add)
}

// =============================================================================
// Customer Tier
// =============================================================================

/// Loyalty rank of a customer. Variants are declared in ascending rank, so
/// the derived `Ord` gives `Bronze < Silver < Gold < Platinum < Vip`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Vip,
}

impl CustomerTier {
    /// All tiers in ascending rank.
    pub const ALL: [CustomerTier; 5] = [
        CustomerTier::Bronze,
        CustomerTier::Silver,
        CustomerTier::Gold,
        CustomerTier::Platinum,
        CustomerTier::Vip,
    ];
}

impl fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerTier::Bronze => write!(f, "bronze"),
            CustomerTier::Silver => write!(f, "silver"),
            CustomerTier::Gold => write!(f, "gold"),
            CustomerTier::Platinum => write!(f, "platinum"),
            CustomerTier::Vip => write!(f, "vip"),
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer profile as seen by the pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tier: CustomerTier,
    /// Cumulative spend.
    #[serde(default)]
    pub total_spent: Money,
    /// Cumulative order count.
    #[serde(default)]
    pub total_orders: i64,
    #[ts(as = "String")]
    pub join_date: DateTime<Utc>,
}

impl Customer {
    /// Creates a customer with no purchase history.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        tier: CustomerTier,
        join_date: DateTime<Utc>,
    ) -> Self {
        Customer {
            id: id.into(),
            name: name.into(),
            tier,
            total_spent: Money::zero(),
            total_orders: 0,
            join_date,
        }
    }

    /// Tier discount percentage from the given table.
    #[inline]
    pub fn tier_discount(&self, tiers: &TierTable) -> Rate {
        tiers.terms(self.tier).discount
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> Product {
        Product::new(6, "T-shirt", Money::from_minor(299_000), "Fashion")
            .with_cost_price(Money::from_minor(150_000))
            .with_weight_grams(200)
    }

    #[test]
    fn test_cart_item_derived_values() {
        let product = shirt();
        let item = CartItem::new(&product, 4);

        assert_eq!(item.subtotal().minor(), 1_196_000);
        assert_eq!(item.weight_grams(), 800);
        assert_eq!(item.cost().minor(), 600_000);
        assert_eq!(item.item_key(), "6_4");
    }

    #[test]
    fn test_cart_totals() {
        let a = shirt();
        let b = Product::new(1, "Phone", Money::from_minor(1_000_000), "Electronics")
            .with_weight_grams(240);
        let items = [CartItem::new(&a, 2), CartItem::new(&b, 1)];

        assert_eq!(cart_subtotal(&items).minor(), 1_598_000);
        assert_eq!(cart_weight_grams(&items), 640);
        assert_eq!(cart_subtotal(&[]).minor(), 0);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(CustomerTier::Bronze < CustomerTier::Silver);
        assert!(CustomerTier::Gold < CustomerTier::Platinum);
        assert!(CustomerTier::Platinum < CustomerTier::Vip);
        assert_eq!(CustomerTier::default(), CustomerTier::Bronze);
    }

    #[test]
    fn test_tier_serde_names() {
        let json = serde_json::to_string(&CustomerTier::Vip).unwrap();
        assert_eq!(json, "\"vip\"");
        let tier: CustomerTier = serde_json::from_str("\"platinum\"").unwrap();
        assert_eq!(tier, CustomerTier::Platinum);
    }

    #[test]
    fn test_customer_tier_discount() {
        let customer = Customer::new("GOLD001", "Le Van C", CustomerTier::Gold, Utc::now());
        assert_eq!(customer.tier_discount(&TierTable::default()).bps(), 1000);
    }

    #[test]
    fn test_product_display() {
        let product = Product::new(1, "Phone", Money::from_minor(32_990_000), "Electronics");
        assert_eq!(product.to_string(), "Product(id=1, name='Phone', price=32,990,000)");
    }
}
