//! # pricewise-core: Pricing & Discount Engine
//!
//! Computes what a shopping cart costs: product discounts from configured
//! rules, loyalty-tier discounts, tax and shipping. Pure computation with no
//! I/O apart from optionally reading a config file.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       pricewise-core                                    │
//! │                                                                         │
//! │  ┌───────────┐   ┌───────────┐   ┌───────────┐   ┌───────────┐          │
//! │  │   types   │   │   rules   │──►│ discount  │──►│  engine   │          │
//! │  │  Product  │   │  Matcher  │   │ Calculator│   │ pipeline  │          │
//! │  │ CartItem  │   │ DiscountR.│   │ Selector  │   │ Breakdown │          │
//! │  └───────────┘   └───────────┘   └───────────┘   └─────┬─────┘          │
//! │                                                        │                │
//! │  ┌───────────┐   ┌───────────┐   ┌───────────┐   ┌─────▼─────┐          │
//! │  │   money   │   │  config   │──►│ shipping  │   │ analysis  │          │
//! │  │   Money   │   │ TierTable │   │ brackets  │   │  profit   │          │
//! │  │ Rate, Mul │   │ tax, tiers│   │ surcharge │   └───────────┘          │
//! │  └───────────┘   └───────────┘   └───────────┘                          │
//! │                                                                         │
//! │  algorithms: dynamic pricing, bundles, loyalty points (no engine)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog entities (Product, CartItem, Customer)
//! - [`money`] - Integer money, basis-point rates and multipliers
//! - [`rules`] - Discount rule configuration and applicability
//! - [`discount`] - Per-item discounts and best-rule selection
//! - [`shipping`] - Bracketed shipping fees
//! - [`config`] - Tax, shipping and tier tables
//! - [`engine`] - The pricing pipeline
//! - [`algorithms`] - Stateless pricing calculators
//! - [`analysis`] - Profitability of a priced cart
//! - [`error`] - Error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: the evaluation instant is a parameter, so a quote
//!    can be reproduced exactly
//! 2. **Integer Money**: amounts are minor units (i64), rates are basis points
//! 3. **One Rule Per Item**: each item gets its single best discount, no stacking
//! 4. **Explicit Errors**: invalid input is rejected before any computation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use pricewise_core::{
//!     CartItem, Customer, CustomerTier, DiscountKind, DiscountRule, Money, PricingEngine,
//!     Product, Rate,
//! };
//!
//! let mut engine = PricingEngine::default();
//! engine
//!     .add_discount_rule(
//!         DiscountRule::new("Electronics 20%", DiscountKind::Percentage { rate: Rate::from_bps(2000) })
//!             .with_categories(["Electronics"])
//!             .with_max_discount(Money::from_minor(150_000)),
//!     )
//!     .unwrap();
//!
//! let laptop = Product::new(2, "Laptop", Money::from_minor(1_000_000), "Electronics");
//! let customer = Customer::new("C1", "Tran Thi B", CustomerTier::Bronze, Utc::now());
//!
//! let breakdown = engine
//!     .calculate_final_price(&[CartItem::new(&laptop, 1)], &customer, true)
//!     .unwrap();
//!
//! assert_eq!(breakdown.product_discount.minor(), 150_000);
//! assert_eq!(breakdown.discount_details.applied_rules, vec!["Electronics 20%"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod algorithms;
pub mod analysis;
pub mod config;
pub mod discount;
pub mod engine;
pub mod error;
pub mod money;
pub mod rules;
pub mod shipping;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::{PricingConfig, TierTable, TierTerms};
pub use discount::{DiscountReport, ItemDiscount};
pub use engine::{PriceBreakdown, PricingEngine};
pub use error::{PricingError, PricingResult, ValidationError};
pub use money::{Money, Multiplier, Rate};
pub use rules::{DiscountKind, DiscountRule, TierThreshold};
pub use shipping::{ShippingBracket, ShippingSchedule};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency units spent per loyalty point, before multipliers.
pub const LOYALTY_POINT_UNIT: i64 = 1_000;

/// Minimum margin over the base price guaranteed by
/// [`algorithms::dynamic_pricing`].
pub const DEFAULT_TARGET_MARGIN: f64 = 0.3;

/// Discount used for bundles when no bundle rule says otherwise.
pub const DEFAULT_BUNDLE_DISCOUNT: Rate = Rate::from_bps(1_500);
