//! # kosh-docs: Invoice Artifacts for Kosh Billing
//!
//! Turns one invoice into a printable document, a verification QR code
//! and a CSV export, all from a single set of computed totals.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          kosh-docs                                      │
//! │                                                                         │
//! │   ┌───────────────────────────────────────────────────────────────┐    │
//! │   │                  generator (InvoiceGenerator)                 │    │
//! │   │    validate ─► totals ─► payload/QR ─► layout/PDF ─► CSV      │    │
//! │   └──────┬──────────────┬───────────────┬──────────────┬──────────┘    │
//! │          │              │               │              │               │
//! │   ┌──────▼─────┐ ┌──────▼──────┐ ┌──────▼──────┐ ┌─────▼──────┐        │
//! │   │  payload   │ │   layout    │ │     pdf     │ │   export   │        │
//! │   │ text + QR  │ │ display list│ │  printpdf   │ │    csv     │        │
//! │   └────────────┘ └──────┬──────┘ └─────────────┘ └────────────┘        │
//! │                         │                                               │
//! │                  ┌──────▼──────┐  ┌─────────────┐                       │
//! │                  │    text     │  │   config    │                       │
//! │                  │ wrap / fit  │  │ issuer/grid │                       │
//! │                  └─────────────┘  └─────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Issuer profile, tax rate, page grid, asset and output paths
//! - [`text`] - Helvetica metrics, lazy word wrapping, truncation
//! - [`layout`] - Deterministic page layout as a display list
//! - [`pdf`] - `printpdf` backend
//! - [`payload`] - Verification payload and QR encoding
//! - [`export`] - CSV export
//! - [`generator`] - End-to-end orchestration and artifact writes
//! - [`error`] - Artifact error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use kosh_core::{Invoice, LineItem};
//! use kosh_docs::{GeneratorConfig, InvoiceGenerator, OutputDirs};
//! use rust_decimal::Decimal;
//!
//! let generator = InvoiceGenerator::new(GeneratorConfig {
//!     output: OutputDirs::under("data"),
//!     ..Default::default()
//! });
//! let invoice = Invoice::new(
//!     "INV-001",
//!     "Green Polymers",
//!     vec![LineItem::new("Recycled PET Flakes", "3915", Decimal::from(100), Decimal::from(45))],
//! );
//! let pdf = generator.generate(&invoice)?;
//! println!("{}", pdf.display());
//! # Ok::<(), kosh_docs::DocError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod layout;
pub mod payload;
pub mod pdf;
pub mod text;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AssetPaths, GeneratorConfig, IssuerProfile, LayoutConfig, OutputDirs};
pub use error::{DocError, DocResult};
pub use export::export_csv;
pub use generator::{GeneratedInvoice, InvoiceGenerator, RenderedInvoice};
pub use layout::{Boilerplate, DocumentLayout, DrawOp, LayoutEngine, Page};
pub use payload::{build_payload, encode_qr, QrImage};
pub use pdf::{render_pdf, FontSource, PdfAssets, RasterImage};
