//! # Money Module
//!
//! Provides the `Money`, `Rate` and `Multiplier` value types.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A discount engine multiplies, clamps and compares amounts many times   │
//! │  per cart. Float drift makes "discount <= subtotal" checks flaky.       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units + basis points                       │
//! │    Money(250_000) × Rate(1000 bps) = Money(25_000)   exact              │
//! │    Rounding happens once per multiplication, half away from zero        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricewise_core::money::{Money, Rate};
//!
//! let price = Money::from_minor(100_000);
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.minor(), 200_000);
//!
//! let tax = line.calculate_tax(Rate::from_bps(1000)); // 10%
//! assert_eq!(tax.minor(), 20_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Basis points in one whole (100%, or a 1× multiplier).
pub const BPS_SCALE: u32 = 10_000;

/// Divides with rounding half away from zero. `d` must be positive.
#[inline]
pub(crate) fn div_round(n: i128, d: i128) -> i128 {
    if n >= 0 {
        (n + d / 2) / d
    } else {
        (n - d / 2) / d
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: taxable amounts may legitimately go negative when
///   discounts exceed the subtotal, so the type must carry a sign
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No currency**: formatting and currency codes belong to callers
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► CartItem.subtotal ──► Selector (item discounts)
///                                    │
///                                    └──► Pipeline: subtotal → discounts
///                                         → taxable → tax → shipping → total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use pricewise_core::money::Money;
    ///
    /// let price = Money::from_minor(32_990_000);
    /// assert_eq!(price.minor(), 32_990_000);
    /// ```
    #[inline]
    pub const fn from_minor(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the portion of this amount given by `rate`.
    ///
    /// Rounded half away from zero, so a negative base yields the mirrored
    /// negative portion.
    ///
    /// ## Example
    /// ```rust
    /// use pricewise_core::money::{Money, Rate};
    ///
    /// let subtotal = Money::from_minor(1_000_000);
    /// assert_eq!(subtotal.portion(Rate::from_bps(2000)).minor(), 200_000);
    /// ```
    pub fn portion(&self, rate: Rate) -> Money {
        // i128 keeps large carts from overflowing before the division
        let units = div_round(self.0 as i128 * rate.bps() as i128, BPS_SCALE as i128);
        Money(units as i64)
    }

    /// Calculates tax on this amount.
    ///
    /// ## User Workflow
    /// ```text
    /// Taxable amount: 180,000
    ///      │
    ///      ▼
    /// calculate_tax(10%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Tax: 18,000
    /// ```
    #[inline]
    pub fn calculate_tax(&self, rate: Rate) -> Money {
        self.portion(rate)
    }

    /// Multiplies money by a quantity, saturating at the i64 bounds.
    ///
    /// Carts are checked with [`Money::checked_multiply_quantity`] before
    /// pricing, so a saturated value never reaches a breakdown.
    ///
    /// ## Example
    /// ```rust
    /// use pricewise_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299_000);
    /// assert_eq!(unit_price.multiply_quantity(4).minor(), 1_196_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies by a quantity, or `None` on overflow.
    ///
    /// ```rust
    /// use pricewise_core::money::Money;
    ///
    /// assert!(Money::from_minor(i64::MAX / 2).checked_multiply_quantity(3).is_none());
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }

    /// Adds, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use pricewise_core::money::{Money, Rate};
    ///
    /// let total = Money::from_minor(100_000);
    /// let discounted = total.apply_percentage_discount(Rate::from_bps(1500));
    /// assert_eq!(discounted.minor(), 85_000);
    /// ```
    pub fn apply_percentage_discount(&self, rate: Rate) -> Money {
        *self - self.portion(rate)
    }

    /// Scales by a floating-point factor, rounding to the nearest unit.
    ///
    /// Only for heuristic adjustments (dynamic pricing) where the factor
    /// itself is an estimate. Discount math uses [`Money::portion`].
    pub fn scale(&self, factor: f64) -> Money {
        Money((self.0 as f64 * factor).round() as i64)
    }

    /// Returns the ratio `self / whole` as a percentage, or 0 when `whole` is 0.
    pub fn percentage_of(&self, whole: Money) -> f64 {
        if whole.is_zero() {
            return 0.0;
        }
        self.0 as f64 / whole.0 as f64 * 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display groups thousands: `1,234,000`.
///
/// ## Note
/// This is for logs and debugging. Currency formatting is the caller's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}", sign, grouped)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by i64 (quantities). Saturates like [`Money::multiply_quantity`].
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Saturating sum; cart totals are range-checked by `validate_cart` first.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| Money(acc.0.saturating_add(m.0)))
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (default VAT), 500 bps = 5% (Silver tier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// 100%.
    pub const FULL: Rate = Rate(BPS_SCALE);

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    ///
    /// Negative inputs saturate to zero.
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round().max(0.0) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Multiplier
// =============================================================================

/// A scaling factor in basis points of 1× (15000 = 1.5×).
///
/// Used for loyalty-point multipliers so that `floor(points × 1.2 × 1.5)`
/// is computed exactly in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Multiplier(u32);

impl Multiplier {
    /// The identity multiplier (1×).
    pub const ONE: Multiplier = Multiplier(BPS_SCALE);

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Multiplier(bps)
    }

    /// Creates a multiplier from a factor such as `1.5`. Negative saturates to 0.
    pub fn from_factor(factor: f64) -> Self {
        Multiplier((factor * BPS_SCALE as f64).round().max(0.0) as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the factor (for display only).
    #[inline]
    pub fn factor(&self) -> f64 {
        self.0 as f64 / BPS_SCALE as f64
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Multiplier::ONE
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.factor())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert!(money.is_positive());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_minor(1_234_000)), "1,234,000");
        assert_eq!(format!("{}", Money::from_minor(500)), "500");
        assert_eq!(format!("{}", Money::from_minor(-50_000)), "-50,000");
        assert_eq!(format!("{}", Money::from_minor(0)), "0");
        assert_eq!(format!("{}", Money::from_minor(100_000)), "100,000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);
        assert_eq!((-a).minor(), -1000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.minor(), 2000);
    }

    #[test]
    fn test_tax_calculation_basic() {
        let amount = Money::from_minor(200_000);
        let tax = amount.calculate_tax(Rate::from_bps(1000));
        assert_eq!(tax.minor(), 20_000);
    }

    #[test]
    fn test_portion_rounds_half_away_from_zero() {
        // 1005 × 10% = 100.5
        assert_eq!(Money::from_minor(1005).portion(Rate::from_bps(1000)).minor(), 101);
        assert_eq!(Money::from_minor(-1005).portion(Rate::from_bps(1000)).minor(), -101);
        // 1004 × 10% = 100.4
        assert_eq!(Money::from_minor(1004).portion(Rate::from_bps(1000)).minor(), 100);
    }

    #[test]
    fn test_portion_large_amounts_do_not_overflow() {
        let huge = Money::from_minor(i64::MAX / 2);
        let half = huge.portion(Rate::from_bps(5000));
        assert_eq!(half.minor(), (i64::MAX / 2) / 2 + 1);
    }

    #[test]
    fn test_percentage_discount() {
        let subtotal = Money::from_minor(10_000);
        let discounted = subtotal.apply_percentage_discount(Rate::from_bps(1000));
        assert_eq!(discounted.minor(), 9_000);
    }

    #[test]
    fn test_percentage_of() {
        let part = Money::from_minor(25_000);
        let whole = Money::from_minor(200_000);
        assert!((part.percentage_of(whole) - 12.5).abs() < 1e-9);
        assert_eq!(part.percentage_of(Money::zero()), 0.0);
    }

    #[test]
    fn test_rate_from_percentage() {
        let rate = Rate::from_percentage(8.25);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
        assert_eq!(Rate::from_percentage(-3.0), Rate::zero());
    }

    #[test]
    fn test_multiplier_from_factor() {
        assert_eq!(Multiplier::from_factor(1.5).bps(), 15_000);
        assert_eq!(Multiplier::from_factor(1.2).bps(), 12_000);
        assert_eq!(Multiplier::default(), Multiplier::ONE);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_minor(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().minor(), 100);
    }

    #[test]
    fn test_quantity_overflow_does_not_panic() {
        let price = Money::from_minor(1_000_000_000_000);

        assert_eq!(price.checked_multiply_quantity(10_000_000), None);
        assert_eq!(price.multiply_quantity(10_000_000).minor(), i64::MAX);
        assert_eq!((price * 10_000_000).minor(), i64::MAX);
        assert_eq!(
            price.checked_multiply_quantity(3),
            Some(Money::from_minor(3_000_000_000_000))
        );

        let near_max = Money::from_minor(i64::MAX - 1);
        assert_eq!(near_max.checked_add(Money::from_minor(2)), None);
        let total: Money = [near_max, near_max].iter().sum();
        assert_eq!(total.minor(), i64::MAX);
    }
}
