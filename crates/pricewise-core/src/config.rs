//! # Pricing Configuration
//!
//! Engine-wide tables injected into [`crate::engine::PricingEngine`] at
//! construction: tax rate, shipping schedule and tier tables.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     PRICEWISE_TAX_RATE_BPS=800                                          │
//! │                                                                         │
//! │  2. TOML Config File (path supplied by the caller)                      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     10% tax, 50k/30k/free shipping, 0/5/10/15/20% tiers                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricing.toml
//! tax_rate = 1000          # basis points
//!
//! [shipping]
//! free_weight_grams = 5000
//! surcharge_per_kg = 10000
//!
//! [[shipping.brackets]]
//! min_subtotal = 0
//! fee = 50000
//!
//! [[shipping.brackets]]
//! min_subtotal = 500000
//! fee = 0
//!
//! [tiers.gold]
//! discount = 1000          # 10%
//! points_multiplier = 15000  # 1.5x
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult};
use crate::money::{Multiplier, Rate};
use crate::shipping::ShippingSchedule;
use crate::types::CustomerTier;

// =============================================================================
// Tier Table
// =============================================================================

/// What one loyalty tier is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierTerms {
    /// Order discount applied after product discounts.
    pub discount: Rate,
    /// Loyalty point multiplier.
    pub points_multiplier: Multiplier,
}

impl TierTerms {
    const fn new(discount_bps: u32, multiplier_bps: u32) -> Self {
        TierTerms {
            discount: Rate::from_bps(discount_bps),
            points_multiplier: Multiplier::from_bps(multiplier_bps),
        }
    }
}

/// Discount percentage and point multiplier per tier.
///
/// | tier     | discount | points |
/// |----------|----------|--------|
/// | bronze   | 0%       | 1.0×   |
/// | silver   | 5%       | 1.2×   |
/// | gold     | 10%      | 1.5×   |
/// | platinum | 15%      | 2.0×   |
/// | vip      | 20%      | 3.0×   |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierTable {
    #[serde(default = "default_bronze")]
    pub bronze: TierTerms,
    #[serde(default = "default_silver")]
    pub silver: TierTerms,
    #[serde(default = "default_gold")]
    pub gold: TierTerms,
    #[serde(default = "default_platinum")]
    pub platinum: TierTerms,
    #[serde(default = "default_vip")]
    pub vip: TierTerms,
}

fn default_bronze() -> TierTerms {
    TierTerms::new(0, 10_000)
}

fn default_silver() -> TierTerms {
    TierTerms::new(500, 12_000)
}

fn default_gold() -> TierTerms {
    TierTerms::new(1_000, 15_000)
}

fn default_platinum() -> TierTerms {
    TierTerms::new(1_500, 20_000)
}

fn default_vip() -> TierTerms {
    TierTerms::new(2_000, 30_000)
}

impl Default for TierTable {
    fn default() -> Self {
        TierTable {
            bronze: default_bronze(),
            silver: default_silver(),
            gold: default_gold(),
            platinum: default_platinum(),
            vip: default_vip(),
        }
    }
}

impl TierTable {
    /// Terms for a tier.
    pub fn terms(&self, tier: CustomerTier) -> TierTerms {
        match tier {
            CustomerTier::Bronze => self.bronze,
            CustomerTier::Silver => self.silver,
            CustomerTier::Gold => self.gold,
            CustomerTier::Platinum => self.platinum,
            CustomerTier::Vip => self.vip,
        }
    }

    /// Checks rates stay within 100% and discounts never drop as rank rises.
    pub fn validate(&self) -> PricingResult<()> {
        let mut previous: Option<(CustomerTier, Rate)> = None;
        for tier in CustomerTier::ALL {
            let discount = self.terms(tier).discount;
            if discount > Rate::FULL {
                return Err(PricingError::InvalidConfig(format!(
                    "{} tier discount {} exceeds 100%",
                    tier, discount
                )));
            }
            if let Some((lower, lower_discount)) = previous {
                if discount < lower_discount {
                    return Err(PricingError::InvalidConfig(format!(
                        "{} tier discount {} is below {} tier discount {}",
                        tier, discount, lower, lower_discount
                    )));
                }
            }
            previous = Some((tier, discount));
        }
        Ok(())
    }
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingConfig {
    /// Tax applied to the taxable amount.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Rate,

    #[serde(default)]
    pub shipping: ShippingSchedule,

    #[serde(default)]
    pub tiers: TierTable,
}

fn default_tax_rate() -> Rate {
    Rate::from_bps(1_000)
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            tax_rate: default_tax_rate(),
            shipping: ShippingSchedule::default(),
            tiers: TierTable::default(),
        }
    }
}

impl PricingConfig {
    /// Parses and validates a TOML document. Missing keys take defaults.
    pub fn from_toml_str(contents: &str) -> PricingResult<Self> {
        let config: PricingConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file, when `path` is given and exists
    /// 3. Environment variables
    pub fn load(path: Option<&Path>) -> PricingResult<Self> {
        let mut config = Self::default();

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading pricing config from file");
                let contents =
                    std::fs::read_to_string(path).map_err(|source| PricingError::ConfigIo {
                        path: path.display().to_string(),
                        source,
                    })?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates every table.
    pub fn validate(&self) -> PricingResult<()> {
        if self.tax_rate > Rate::FULL {
            return Err(PricingError::InvalidConfig(format!(
                "tax rate {} exceeds 100%",
                self.tax_rate
            )));
        }
        self.shipping.validate()?;
        self.tiers.validate()
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var("PRICEWISE_TAX_RATE_BPS") {
            match raw.parse::<u32>() {
                Ok(bps) => {
                    debug!(bps, "Overriding tax rate from environment");
                    self.tax_rate = Rate::from_bps(bps);
                }
                Err(_) => warn!(value = %raw, "Ignoring non-numeric PRICEWISE_TAX_RATE_BPS"),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
