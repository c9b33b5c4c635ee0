//! # Generator Configuration
//!
//! Everything the engine used to hard-code: issuer identity, tax rate,
//! page grid, fonts, output roots.
//!
//! ## Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GeneratorConfig                                                        │
//! │  ├── issuer:    IssuerProfile   name, address, mobile, GSTIN, email     │
//! │  ├── tax_rate:  TaxRate         1800 bps, shown as 9% + 9%              │
//! │  ├── layout:    LayoutConfig    page grid, columns, labels, precision   │
//! │  ├── assets:    AssetPaths      optional logo + TTF fonts               │
//! │  └── output:    OutputDirs      documents / qrcodes / exports           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All structs deserialize with `#[serde(default)]`, so a configuration
//! file only has to name what it changes.

use std::path::{Path, PathBuf};

use kosh_core::{CurrencyFormat, TaxRate};
use serde::{Deserialize, Serialize};

// =============================================================================
// Generator Config
// =============================================================================

/// Configuration handed to [`crate::InvoiceGenerator::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub issuer: IssuerProfile,
    pub tax_rate: TaxRate,
    pub layout: LayoutConfig,
    pub assets: AssetPaths,
    pub output: OutputDirs,
}

// =============================================================================
// Issuer Profile
// =============================================================================

/// The business issuing the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerProfile {
    pub name: String,
    pub address: String,
    pub mobile: String,
    /// GST registration number.
    pub gstin: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

// =============================================================================
// Layout Config
// =============================================================================

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// An RGB colour, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        RgbColor { r, g, b }
    }

    pub const fn gray(level: f32) -> Self {
        RgbColor::new(level, level, level)
    }
}

/// One line-item table column.
///
/// `header_x` is where the header label starts; `x` is the anchor of the
/// cell values, interpreted according to `align`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub header: String,
    pub header_x: f32,
    pub x: f32,
    pub align: Align,
}

impl ColumnSpec {
    fn new(header: &str, header_x: f32, x: f32, align: Align) -> Self {
        ColumnSpec {
            header: header.to_string(),
            header_x,
            x,
            align,
        }
    }
}

/// The six columns of the line-item table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableColumns {
    pub description: ColumnSpec,
    pub tax_code: ColumnSpec,
    pub quantity: ColumnSpec,
    pub rate: ColumnSpec,
    pub tax: ColumnSpec,
    pub total: ColumnSpec,
}

impl Default for TableColumns {
    fn default() -> Self {
        TableColumns {
            description: ColumnSpec::new("ITEMS", 32.0, 32.0, Align::Left),
            tax_code: ColumnSpec::new("HSN", 190.0, 190.0, Align::Left),
            quantity: ColumnSpec::new("QTY.", 250.0, 270.0, Align::Center),
            rate: ColumnSpec::new("RATE", 310.0, 340.0, Align::Right),
            tax: ColumnSpec::new("TAX", 370.0, 420.0, Align::Right),
            total: ColumnSpec::new("AMOUNT", 460.0, 550.0, Align::Right),
        }
    }
}

impl TableColumns {
    /// Columns in display order.
    pub fn all(&self) -> [&ColumnSpec; 6] {
        [
            &self.description,
            &self.tax_code,
            &self.quantity,
            &self.rate,
            &self.tax,
            &self.total,
        ]
    }
}

/// Page grid, labels and number formatting for the invoice document.
///
/// Coordinates are PDF points with the origin at the bottom-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Centered title on every page.
    pub title: String,

    /// Page size in points. Default: A4.
    pub page_width: f32,
    pub page_height: f32,

    /// Left edge of all content.
    pub margin_left: f32,
    /// Width of the framed content area (bars, table).
    pub content_width: f32,
    /// Nothing but the verification code is drawn below this line.
    pub margin_bottom: f32,

    pub columns: TableColumns,

    /// Height of one table row.
    pub row_height: f32,
    /// Leading for stacked text lines.
    pub line_height: f32,

    /// Wrap width of the bill-to column.
    pub bill_to_width: f32,
    /// Wrap width of the ship-to column.
    pub ship_to_width: f32,
    /// Wrapped issuer, bill-to and ship-to addresses keep at most this
    /// many lines; the last kept line ends in `...`.
    pub address_max_lines: usize,

    /// Descriptions longer than this are cut and end in `...`.
    pub description_max_chars: usize,

    /// Decimal places for quantities.
    pub quantity_precision: u32,
    /// Decimal places for unit rates.
    pub rate_precision: u32,

    /// Currency convention for every amount on the page.
    pub currency: CurrencyFormat,
    /// Printed instead of the currency symbol when no configured font can
    /// draw it.
    pub fallback_symbol: String,

    /// Labels of the two split-tax halves.
    pub tax_labels: [String; 2],

    /// `chrono` format string for the invoice date.
    pub date_format: String,

    /// Terms and conditions lines.
    pub terms: Vec<String>,

    /// Issuer name colour, invoice bar rule and table frame.
    pub accent_color: RgbColor,
    /// Invoice number / date bar fill.
    pub band_color: RgbColor,

    /// Edge of the square logo slot.
    pub logo_size: f32,
    /// Edge of the square verification code, placed at the bottom-right.
    pub qr_size: f32,
    pub qr_x: f32,
    pub qr_y: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            title: "TAX INVOICE - ORIGINAL".to_string(),
            page_width: 595.28,
            page_height: 841.89,
            margin_left: 30.0,
            content_width: 530.0,
            margin_bottom: 40.0,
            columns: TableColumns::default(),
            row_height: 15.0,
            line_height: 12.0,
            bill_to_width: 250.0,
            ship_to_width: 230.0,
            address_max_lines: 5,
            description_max_chars: 30,
            quantity_precision: 1,
            rate_precision: 2,
            currency: CurrencyFormat::rupee(),
            fallback_symbol: "Rs.".to_string(),
            tax_labels: ["CGST".to_string(), "SGST".to_string()],
            date_format: "%d-%m-%Y".to_string(),
            terms: vec![
                "1. Goods once sold will not be taken back or exchanged.".to_string(),
                "2. All disputes are subject to local jurisdiction only.".to_string(),
            ],
            accent_color: RgbColor::new(0.2, 0.6, 0.2),
            band_color: RgbColor::gray(0.95),
            logo_size: 40.0,
            qr_size: 60.0,
            qr_x: 500.0,
            qr_y: 50.0,
        }
    }
}

impl LayoutConfig {
    /// Right edge of the framed content area.
    pub fn content_right(&self) -> f32 {
        self.margin_left + self.content_width
    }
}

// =============================================================================
// Assets
// =============================================================================

/// Optional files used by the PDF backend.
///
/// Missing files are skipped with a warning: no logo is drawn, and the
/// built-in Helvetica faces replace missing fonts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
    /// TrueType font for regular text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_regular: Option<PathBuf>,
    /// TrueType font for bold text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_bold: Option<PathBuf>,
}

// =============================================================================
// Output Directories
// =============================================================================

/// Roots of the three parallel artifact directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputDirs {
    pub documents: PathBuf,
    pub qrcodes: PathBuf,
    pub exports: PathBuf,
}

impl Default for OutputDirs {
    fn default() -> Self {
        OutputDirs::under("data")
    }
}

impl OutputDirs {
    /// `<root>/invoices`, `<root>/qrcodes`, `<root>/exports`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        OutputDirs {
            documents: root.join("invoices"),
            qrcodes: root.join("qrcodes"),
            exports: root.join("exports"),
        }
    }

    /// `<documents>/Invoice_<no>.pdf`
    pub fn document_path(&self, invoice_no: &str) -> PathBuf {
        self.documents.join(format!("Invoice_{invoice_no}.pdf"))
    }

    /// `<qrcodes>/invoice_<no>.png`
    pub fn qr_path(&self, invoice_no: &str) -> PathBuf {
        self.qrcodes.join(format!("invoice_{invoice_no}.png"))
    }

    /// `<exports>/invoice_<no>.csv`
    pub fn export_path(&self, invoice_no: &str) -> PathBuf {
        self.exports.join(format!("invoice_{invoice_no}.csv"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths() {
        let dirs = OutputDirs::under("/srv/kosh");
        assert_eq!(
            dirs.document_path("INV-001"),
            PathBuf::from("/srv/kosh/invoices/Invoice_INV-001.pdf")
        );
        assert_eq!(
            dirs.qr_path("INV-001"),
            PathBuf::from("/srv/kosh/qrcodes/invoice_INV-001.png")
        );
        assert_eq!(
            dirs.export_path("INV-001"),
            PathBuf::from("/srv/kosh/exports/invoice_INV-001.csv")
        );
    }

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.content_right(), 560.0);
        assert_eq!(layout.columns.all().len(), 6);
        assert_eq!(layout.columns.total.align, Align::Right);
        assert_eq!(layout.tax_labels[0], "CGST");
    }

    #[test]
    fn test_partial_config_deserializes() {
        let json = r#"{
            "issuer": { "name": "Green Polymers" },
            "tax_rate": 500,
            "layout": { "title": "TAX INVOICE", "description_max_chars": 40 }
        }"#;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.issuer.name, "Green Polymers");
        assert_eq!(config.tax_rate.bps(), 500);
        assert_eq!(config.layout.title, "TAX INVOICE");
        assert_eq!(config.layout.description_max_chars, 40);
        assert_eq!(config.layout.row_height, 15.0);
        assert_eq!(config.assets.logo, None);
    }
}
