//! # Invoice Generator
//!
//! Orchestrates one generation run.
//!
//! ## Pipeline
//! ```text
//! ┌──────────┐   validate    ┌────────────────┐
//! │ Invoice  │──────────────►│ compute_totals │  (exactly once)
//! └──────────┘               └───────┬────────┘
//!                                    │ InvoiceTotals
//!            ┌───────────────────────┼────────────────────────┐
//!            ▼                       ▼                        ▼
//!   ┌─────────────────┐    ┌──────────────────┐     ┌──────────────────┐
//!   │ build_payload   │    │ LayoutEngine     │     │ export_csv       │
//!   │ + encode_qr     │───►│ + render_pdf     │     │                  │
//!   └────────┬────────┘    └────────┬─────────┘     └────────┬─────────┘
//!            ▼                      ▼                        ▼
//!   qrcodes/invoice_N.png  invoices/Invoice_N.pdf   exports/invoice_N.csv
//! ```
//!
//! Everything is rendered in memory first; the three files are then
//! written in the order document, code, export. A failed write stops the
//! run and leaves earlier files in place. Regenerating overwrites.

use std::fs;
use std::path::{Path, PathBuf};

use kosh_core::validation::{validate_invoice_number, validate_line_values};
use kosh_core::{
    compute_totals, AmountPhraser, CurrencyFormat, IndianEnglish, Invoice, InvoiceTotals,
};
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::error::{DocError, DocResult};
use crate::export::export_csv;
use crate::layout::{Boilerplate, LayoutEngine};
use crate::payload::{build_payload, encode_qr};
use crate::pdf::{render_pdf, FontSource, PdfAssets, RasterImage};

/// Artifact contents produced by [`InvoiceGenerator::render`].
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    pub totals: InvoiceTotals,
    /// Verification payload text.
    pub payload: String,
    pub document: Vec<u8>,
    pub qr_png: Vec<u8>,
    pub export: Vec<u8>,
}

/// Paths written by [`InvoiceGenerator::generate_artifacts`].
#[derive(Debug, Clone)]
pub struct GeneratedInvoice {
    pub document: PathBuf,
    pub qr_code: PathBuf,
    pub export: PathBuf,
    pub totals: InvoiceTotals,
    pub payload: String,
}

/// Turns invoices into their document, verification code and export.
///
/// ## Usage
/// ```rust,ignore
/// let generator = InvoiceGenerator::new(config);
/// let pdf_path = generator.generate(&invoice)?;
/// ```
pub struct InvoiceGenerator {
    config: GeneratorConfig,
    engine: LayoutEngine,
    phraser: Box<dyn AmountPhraser>,
}

impl InvoiceGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let engine = LayoutEngine::new(config.layout.clone());
        InvoiceGenerator {
            config,
            engine,
            phraser: Box::new(IndianEnglish),
        }
    }

    /// Replaces the amount-in-words phraser.
    pub fn with_phraser(mut self, phraser: Box<dyn AmountPhraser>) -> Self {
        self.phraser = phraser;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates all artifacts and returns the document path.
    pub fn generate(&self, invoice: &Invoice) -> DocResult<PathBuf> {
        self.generate_artifacts(invoice).map(|generated| generated.document)
    }

    /// Generates all artifacts and returns every path written.
    pub fn generate_artifacts(&self, invoice: &Invoice) -> DocResult<GeneratedInvoice> {
        let rendered = self.render(invoice)?;
        let output = &self.config.output;
        let no = &invoice.invoice_no;

        let document = output.document_path(no);
        let qr_code = output.qr_path(no);
        let export = output.export_path(no);

        write_artifact(&document, &rendered.document)?;
        write_artifact(&qr_code, &rendered.qr_png)?;
        write_artifact(&export, &rendered.export)?;

        info!(
            invoice_no = %no,
            document = %document.display(),
            grand_total = %rendered.totals.grand_total,
            "Generated invoice"
        );

        Ok(GeneratedInvoice {
            document,
            qr_code,
            export,
            totals: rendered.totals,
            payload: rendered.payload,
        })
    }

    /// Renders all artifacts in memory without touching the filesystem
    /// (apart from reading configured assets).
    pub fn render(&self, invoice: &Invoice) -> DocResult<RenderedInvoice> {
        validate_invoice_number(&invoice.invoice_no)?;
        for (index, item) in invoice.items.iter().enumerate() {
            validate_line_values(index, item)?;
        }

        let totals = compute_totals(&invoice.items, self.config.tax_rate);
        debug!(
            invoice_no = %invoice.invoice_no,
            items = totals.lines.len(),
            subtotal = %totals.subtotal,
            total_tax = %totals.total_tax,
            "Computed totals"
        );

        // payload and export are UTF-8 and always carry the configured glyph
        let currency = &self.config.layout.currency;
        let payload = build_payload(invoice, &totals, currency);
        let qr = encode_qr(&payload)?;
        let export = export_csv(invoice, &totals)?;

        let fonts = self.load_fonts();
        let logo = self.load_logo();
        let boilerplate = Boilerplate {
            issuer: &self.config.issuer,
            amount_in_words: self.phraser.phrase(totals.grand_total),
            currency: self.document_currency(&fonts),
            has_logo: logo.is_some(),
            has_qr: true,
        };
        let layout = self.engine.layout(invoice, &totals, &boilerplate);
        let assets = PdfAssets {
            fonts,
            logo,
            qr: Some(qr.to_raster()),
        };
        let document = render_pdf(&layout, &assets)?;

        Ok(RenderedInvoice {
            qr_png: qr.png_bytes()?,
            totals,
            payload,
            document,
            export,
        })
    }

    /// Currency format the document fonts can actually draw.
    fn document_currency(&self, fonts: &FontSource) -> CurrencyFormat {
        let layout = &self.config.layout;
        let drawable = fonts.supports_unicode() || layout.currency.symbol.chars().all(is_latin1);
        if drawable {
            layout.currency.clone()
        } else {
            debug!(
                symbol = %layout.currency.symbol,
                fallback = %layout.fallback_symbol,
                "Built-in fonts cannot draw currency symbol"
            );
            layout.currency.clone().with_symbol(layout.fallback_symbol.clone())
        }
    }

    fn load_logo(&self) -> Option<RasterImage> {
        let path = self.config.assets.logo.as_deref()?;
        match read_asset(path).and_then(|bytes| decode_logo(path, &bytes)) {
            Ok(logo) => Some(logo),
            Err(err) => {
                warn!(error = %err, "Skipping logo");
                None
            }
        }
    }

    fn load_fonts(&self) -> FontSource {
        let assets = &self.config.assets;
        let (Some(regular), Some(bold)) =
            (assets.font_regular.as_deref(), assets.font_bold.as_deref())
        else {
            return FontSource::Builtin;
        };

        match (read_asset(regular), read_asset(bold)) {
            (Ok(regular), Ok(bold)) => FontSource::External { regular, bold },
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "Falling back to built-in fonts");
                FontSource::Builtin
            }
        }
    }
}

fn is_latin1(c: char) -> bool {
    u32::from(c) <= 0xFF
}

fn read_asset(path: &Path) -> DocResult<Vec<u8>> {
    fs::read(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => DocError::AssetMissing {
            path: path.to_path_buf(),
        },
        _ => DocError::AssetInvalid {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
    })
}

fn decode_logo(path: &Path, bytes: &[u8]) -> DocResult<RasterImage> {
    RasterImage::decode(bytes).map_err(|err| DocError::AssetInvalid {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Writes one artifact, creating its directory first.
fn write_artifact(path: &Path, bytes: &[u8]) -> DocResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| DocError::write_failure(parent, err))?;
    }
    fs::write(path, bytes).map_err(|err| DocError::write_failure(path, err))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Wrote artifact");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
