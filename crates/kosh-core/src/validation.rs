//! # Validation Module
//!
//! Input validation for invoice forms and master-data entry.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input parsing (CLI / JSON draft)                             │
//! │  ├── Type validation (deserialization, decimal parsing)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths                                          │
//! │  ├── Quantity and rate within [0, 10^9]                                │
//! │  └── Invoice number is safe to use as a file name stem                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Tax calculator                                               │
//! │  └── No checks: plain arithmetic, which cannot overflow within the    │
//! │      bounds above                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kosh_core::validation::{validate_invoice_number, validate_customer_name};
//!
//! validate_invoice_number("INV-001").unwrap();
//! validate_customer_name("Green Polymers").unwrap();
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::{Invoice, LineItem};
use crate::MAX_INVOICE_NUMBER_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted customer display name.
const MAX_CUSTOMER_NAME_LEN: usize = 200;

/// Longest accepted line description.
const MAX_DESCRIPTION_LEN: usize = 500;

/// Largest accepted quantity and unit rate.
///
/// `quantity × rate × (1 + tax)` then stays near 10^18 per line, far inside
/// the 96-bit range of `Decimal` even when summed over many lines.
pub const MAX_LINE_VALUE: i64 = 1_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an invoice number.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_INVOICE_NUMBER_LEN`] characters
/// - Only ASCII letters, digits, `-`, `_` and `.`
/// - Must not be `.` or `..`
///
/// The number names the document, QR image, export and snapshot files, so
/// these rules keep every artifact inside its output directory.
///
/// ## Example
/// ```rust
/// use kosh_core::validation::validate_invoice_number;
///
/// assert!(validate_invoice_number("INV-2024.001").is_ok());
/// assert!(validate_invoice_number("../etc/passwd").is_err());
/// assert!(validate_invoice_number("").is_err());
/// ```
pub fn validate_invoice_number(invoice_no: &str) -> ValidationResult<()> {
    let field = "invoice_no";

    if invoice_no.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    if invoice_no.chars().count() > MAX_INVOICE_NUMBER_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_INVOICE_NUMBER_LEN,
        });
    }

    if !invoice_no
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, digits, '-', '_' and '.'".to_string(),
        });
    }

    if invoice_no == "." || invoice_no == ".." {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not be a relative path component".to_string(),
        });
    }

    Ok(())
}

/// Validates a customer display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("customer"));
    }

    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Line Item Validators
// =============================================================================

/// Validates one line item; `index` is used in field names (`items[2].rate`).
///
/// ## Rules
/// - Description and tax code are required
/// - Quantity and rate within [`validate_line_values`] bounds
pub fn validate_line_item(index: usize, item: &LineItem) -> ValidationResult<()> {
    let field = |name: &str| format!("items[{index}].{name}");

    if item.description.trim().is_empty() {
        return Err(ValidationError::required(field("description")));
    }
    if item.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: field("description"),
            max: MAX_DESCRIPTION_LEN,
        });
    }
    if item.tax_code.trim().is_empty() {
        return Err(ValidationError::required(field("hsn")));
    }

    validate_line_values(index, item)
}

/// Checks that quantity and rate lie in `0..=MAX_LINE_VALUE`.
///
/// The generator runs this on every line before computing totals, so the
/// tax arithmetic never sees a value that could overflow.
///
/// ## Example
/// ```rust
/// use kosh_core::validation::validate_line_values;
/// use kosh_core::LineItem;
/// use rust_decimal::Decimal;
///
/// let huge = LineItem::new("Flakes", "3915", Decimal::from(10_i64.pow(15)), Decimal::ONE);
/// assert!(validate_line_values(0, &huge).is_err());
/// ```
pub fn validate_line_values(index: usize, item: &LineItem) -> ValidationResult<()> {
    let max = Decimal::from(MAX_LINE_VALUE);

    for (name, value) in [("quantity", item.quantity), ("rate", item.rate)] {
        let field = format!("items[{index}].{name}");
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::MustBeNonNegative { field });
        }
        if value > max {
            return Err(ValidationError::OutOfRange {
                field,
                max: max.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Invoice Validator
// =============================================================================

/// Validates a whole invoice as submitted from the form.
///
/// Stops at the first failure.
pub fn validate_invoice(invoice: &Invoice) -> ValidationResult<()> {
    validate_invoice_number(&invoice.invoice_no)?;
    validate_customer_name(&invoice.customer)?;

    if invoice.items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for (index, item) in invoice.items.iter().enumerate() {
        validate_line_item(index, item)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
