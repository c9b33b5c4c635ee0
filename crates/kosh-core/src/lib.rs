//! # kosh-core: Pure Business Logic for Kosh Billing
//!
//! This crate is the **heart** of Kosh Billing. It contains the invoice
//! arithmetic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Kosh Billing Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     apps/cli (`kosh`)                           │   │
//! │  │     generate ──► regenerate ──► search ──► master data          │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼────────────────────┐  │
//! │  │         kosh-docs           │  │          kosh-store             │  │
//! │  │  layout ─ pdf ─ qr ─ csv    │  │  snapshots ─ customers ─ items  │  │
//! │  └──────────────┬──────────────┘  └────────────┬────────────────────┘  │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────────────────────▼───────────────────┐   │
//! │  │               ★ kosh-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │    tax    │  │   words   │  │   │
//! │  │   │  Invoice  │  │   Money   │  │ LineFigs  │  │  Phraser  │  │   │
//! │  │   │ LineItem  │  │ Currency  │  │  Totals   │  │ lakh/crore│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Invoice, LineItem, TaxRate, master records)
//! - [`money`] - Full-precision money with display-time rounding
//! - [`tax`] - Per-line and aggregate tax figures
//! - [`words`] - Amount-in-words phrasing (Indian numbering)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation at the form boundary
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same invoice + same rate = same figures
//! 2. **No I/O**: file system access is FORBIDDEN here
//! 3. **Sum, then round**: values keep full precision until display
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use kosh_core::{compute_totals, LineItem, TaxRate};
//! use rust_decimal::Decimal;
//!
//! let items = vec![LineItem::new(
//!     "Recycled PET Flakes",
//!     "3915",
//!     Decimal::from(100),
//!     Decimal::from(45),
//! )];
//!
//! let totals = compute_totals(&items, TaxRate::from_bps(1800));
//! assert_eq!(totals.grand_total.to_string(), "₹5,310.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod tax;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::{CurrencyFormat, Grouping, Money};
pub use tax::{compute_line, compute_totals, InvoiceTotals, LineFigures, TaxComponent};
pub use types::*;
pub use words::{AmountPhraser, IndianEnglish};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default GST rate in basis points (18%).
///
/// Only used as the configuration default; the engine always receives the
/// rate explicitly.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1800;

/// Maximum length of an invoice number.
///
/// The number doubles as a file name stem for every generated artifact.
pub const MAX_INVOICE_NUMBER_LEN: usize = 64;

/// Currency glyph used for rupee amounts.
pub const RUPEE_SYMBOL: &str = "₹";
