//! # Error Types
//!
//! Domain-specific error types for kosh-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kosh-core errors (this file)                                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kosh-store errors (separate crate)                                    │
//! │  └── StoreError       - Snapshot / master-data file failures           │
//! │                                                                         │
//! │  kosh-docs errors (separate crate)                                     │
//! │  └── DocError         - InvalidInput / AssetMissing / WriteFailure     │
//! │                                                                         │
//! │  Flow: ValidationError → DocError / AppError → exit code               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tax calculator itself never fails; these errors only come out of
//! validation and record handling.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
/// Used for early validation before any artifact is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., unsafe file name characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is above the largest amount the engine accepts.
    #[error("{field} must be at most {max}")]
    OutOfRange { field: String, max: String },

    /// A collection that needs at least one entry is empty.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
