//! # Error Types
//!
//! Domain-specific error types for pricewise-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pricewise-core errors (this file)                                      │
//! │  ├── PricingError     - Rejected pricing operations                     │
//! │  └── ValidationError  - Field-level input failures                      │
//! │                                                                         │
//! │  Flow: ValidationError → PricingError → caller (API / checkout)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, rule name)
//! 3. Every failure is a validation failure; nothing here is fatal
//! 4. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Pricing Error
// =============================================================================

/// Errors returned by the pricing engine.
///
/// A pricing call either produces a full breakdown or one of these; there is
/// no partial result. Every variant is raised before the first pipeline stage.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A cart line failed validation.
    ///
    /// ## When This Occurs
    /// - Quantity is zero or negative
    /// - Product price, cost price or weight is negative
    #[error("Invalid cart item for product {product_id}: {source}")]
    InvalidCartItem {
        product_id: i64,
        #[source]
        source: ValidationError,
    },

    /// A discount rule failed validation.
    ///
    /// ## When This Occurs
    /// - Fixed amount or cap is negative
    /// - Percentage above 100%
    /// - Buy-X-get-Y with a zero buy quantity
    /// - Tiered thresholds that are empty, negative or duplicated
    #[error("Invalid discount rule '{rule}': {source}")]
    InvalidRule {
        rule: String,
        #[source]
        source: ValidationError,
    },

    /// Engine configuration is inconsistent.
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::config::PricingConfig`].
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A value outside any single cart line failed validation.
    ///
    /// ## When This Occurs
    /// - The cart total (taxable + tax + shipping) does not fit in i64
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before any pricing stage runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. unsorted or duplicated thresholds).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================
