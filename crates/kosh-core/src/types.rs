//! # Domain Types
//!
//! Core domain types used throughout Kosh Billing.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Invoice      │   │    LineItem     │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  invoice_no     │──►│  description    │   │  bps (u32)      │       │
//! │  │  date           │   │  tax_code (HSN) │   │  1800 = 18%     │       │
//! │  │  customer       │   │  quantity       │   │  split 9% + 9%  │       │
//! │  │  bill/ship to   │   │  rate           │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    Customer     │   │      Item       │   Master data: pre-fill     │
//! │  │  key = name     │   │ key = descr.    │   only, never referenced    │
//! │  └─────────────────┘   └─────────────────┘   by an invoice             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! An invoice is identified by `invoice_no` alone. The same number names
//! every artifact generated for it, so regenerating overwrites.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% GST, displayed as CGST 9% + SGST 9%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round().max(0.0) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// The full rate as an exact fraction (1800 bps → 0.18).
    pub fn fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// One half of the rate as an exact fraction (1800 bps → 0.09).
    pub fn half_fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0) * 5, 5)
    }

    /// Percentage label for the full rate, e.g. `18%`.
    pub fn percentage_label(&self) -> String {
        percent_label(self.fraction() * Decimal::ONE_HUNDRED)
    }

    /// Percentage label for one half of the split rate, e.g. `9%` or `2.5%`.
    pub fn half_percentage_label(&self) -> String {
        percent_label(self.half_fraction() * Decimal::ONE_HUNDRED)
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

fn percent_label(pct: Decimal) -> String {
    format!("{}%", pct.normalize())
}

// =============================================================================
// Line Item
// =============================================================================

/// One priced entry on an invoice.
///
/// Only the four entered fields are stored. Amount, tax and total are
/// always derived (see [`crate::tax::compute_line`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,

    /// Commodity code for tax reporting (HSN/SAC).
    #[serde(rename = "hsn", alias = "tax_code")]
    pub tax_code: String,

    pub quantity: Decimal,

    /// Unit rate in rupees.
    pub rate: Decimal,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        tax_code: impl Into<String>,
        quantity: Decimal,
        rate: Decimal,
    ) -> Self {
        LineItem {
            description: description.into(),
            tax_code: tax_code.into(),
            quantity,
            rate,
        }
    }

    /// `quantity × rate`, unrounded.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::new(self.rate) * self.quantity
    }
}

// =============================================================================
// Customer Tax Details
// =============================================================================

/// Optional identifiers printed under the customer address block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerTaxDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    /// GST registration number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,

    /// Permanent account number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl CustomerTaxDetails {
    /// True when no identifier is present.
    pub fn is_empty(&self) -> bool {
        self.mobile.is_none() && self.gstin.is_none() && self.pan.is_none() && self.state.is_none()
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A tax invoice as captured from the form.
///
/// ## Snapshot Format
/// Serialized field-for-field as the invoice JSON snapshot:
/// ```json
/// {
///   "invoice_no": "INV-001",
///   "date": "2024-04-01",
///   "customer": "Green Polymers",
///   "bill_to": "12 Industrial Area, Agra",
///   "gstin": "09ABCDE1234F1Z5",
///   "items": [{ "description": "Recycled PET Flakes", "hsn": "3915",
///               "quantity": "100", "rate": "45.00" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique, path-safe identifier; also names every artifact.
    pub invoice_no: String,

    /// Issue date.
    pub date: NaiveDate,

    /// Customer display name.
    pub customer: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_to: Option<String>,

    #[serde(flatten)]
    pub tax_details: CustomerTaxDetails,

    /// Display order is preserved.
    pub items: Vec<LineItem>,
}

impl Invoice {
    /// Creates an invoice dated today (local time).
    pub fn new(
        invoice_no: impl Into<String>,
        customer: impl Into<String>,
        items: Vec<LineItem>,
    ) -> Self {
        Invoice::dated(invoice_no, Local::now().date_naive(), customer, items)
    }

    /// Creates an invoice with an explicit issue date.
    pub fn dated(
        invoice_no: impl Into<String>,
        date: NaiveDate,
        customer: impl Into<String>,
        items: Vec<LineItem>,
    ) -> Self {
        Invoice {
            invoice_no: invoice_no.into(),
            date,
            customer: customer.into(),
            bill_to: None,
            ship_to: None,
            tax_details: CustomerTaxDetails::default(),
            items,
        }
    }

    /// Sets the billing address block.
    pub fn with_bill_to(mut self, address: impl Into<String>) -> Self {
        self.bill_to = Some(address.into());
        self
    }

    /// Sets the shipping address block.
    pub fn with_ship_to(mut self, address: impl Into<String>) -> Self {
        self.ship_to = Some(address.into());
        self
    }

    /// Sets the customer identifiers.
    pub fn with_tax_details(mut self, details: CustomerTaxDetails) -> Self {
        self.tax_details = details;
        self
    }
}

/// Invoice input whose date may be missing.
///
/// This is what the form (or a hand-written JSON file) produces; converting
/// it into an [`Invoice`] fills in today's date when none was given.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceDraft {
    pub invoice_no: String,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    pub customer: String,

    #[serde(default)]
    pub bill_to: Option<String>,

    #[serde(default)]
    pub ship_to: Option<String>,

    #[serde(flatten)]
    pub tax_details: CustomerTaxDetails,

    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl InvoiceDraft {
    /// Converts into an invoice, defaulting the date to `today`.
    pub fn into_invoice(self, today: NaiveDate) -> Invoice {
        Invoice {
            invoice_no: self.invoice_no.trim().to_string(),
            date: self.date.unwrap_or(today),
            customer: self.customer.trim().to_string(),
            bill_to: non_blank(self.bill_to),
            ship_to: non_blank(self.ship_to),
            tax_details: self.tax_details,
            items: self.items,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Master Records
// =============================================================================

/// A flat record kept only to pre-fill form fields.
///
/// Identity is the display key; saving a record with an existing key
/// replaces it, otherwise it is appended. There is no delete.
pub trait MasterRecord {
    /// Human-readable record kind, used in logs and errors.
    const KIND: &'static str;

    /// Identity key (display name or description).
    fn key(&self) -> &str;
}

/// A saved customer.
///
/// Older customer files stored bare names (`["Acme", "Globex"]`); those
/// still load, with every other field empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CustomerRepr")]
pub struct Customer {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_to: Option<String>,

    #[serde(flatten)]
    pub tax_details: CustomerTaxDetails,
}

impl Customer {
    pub fn named(name: impl Into<String>) -> Self {
        Customer {
            name: name.into(),
            bill_to: None,
            ship_to: None,
            tax_details: CustomerTaxDetails::default(),
        }
    }

    /// Captures the customer fields of an invoice.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Customer {
            name: invoice.customer.clone(),
            bill_to: invoice.bill_to.clone(),
            ship_to: invoice.ship_to.clone(),
            tax_details: invoice.tax_details.clone(),
        }
    }
}

impl MasterRecord for Customer {
    const KIND: &'static str = "customer";

    fn key(&self) -> &str {
        &self.name
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CustomerRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        bill_to: Option<String>,
        #[serde(default)]
        ship_to: Option<String>,
        #[serde(flatten)]
        tax_details: CustomerTaxDetails,
    },
}

impl From<CustomerRepr> for Customer {
    fn from(repr: CustomerRepr) -> Self {
        match repr {
            CustomerRepr::Name(name) => Customer::named(name),
            CustomerRepr::Full {
                name,
                bill_to,
                ship_to,
                tax_details,
            } => Customer {
                name,
                bill_to,
                ship_to,
                tax_details,
            },
        }
    }
}

/// A saved item with its usual code and rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub description: String,

    #[serde(rename = "hsn", alias = "tax_code")]
    pub tax_code: String,

    pub rate: Decimal,
}

impl Item {
    /// Builds a line item from this record and a quantity.
    pub fn to_line(&self, quantity: Decimal) -> LineItem {
        LineItem::new(
            self.description.clone(),
            self.tax_code.clone(),
            quantity,
            self.rate,
        )
    }
}

impl MasterRecord for Item {
    const KIND: &'static str = "item";

    fn key(&self) -> &str {
        &self.description
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
