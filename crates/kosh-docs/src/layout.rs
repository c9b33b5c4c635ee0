//! # Layout Engine
//!
//! Places an invoice onto fixed-size pages as a backend-independent
//! display list. The PDF backend only replays the list.
//!
//! ## Page Grid (A4, points, origin bottom-left)
//! ```text
//! ┌────────────────────────────────────────────────────────────┐ 841.89
//! │                 TAX INVOICE - ORIGINAL                     │ H-30
//! │ [logo]  ISSUER NAME                                        │ H-65
//! │ address (wrapped)                                          │ H-90
//! │ Mobile: …            GSTIN: …                              │
//! │ Email: …                                                   │
//! │▓▓ Invoice No.: INV-001 ▓▓▓▓▓▓▓▓▓▓▓▓▓ Invoice Date: 01-04-24▓│ band
//! │ BILL TO:                      SHIP TO:                     │
//! │ Customer (bold)               wrapped ship-to              │
//! │ wrapped bill-to                                            │
//! │ Mobile: …            GSTIN: …                              │
//! │ PAN: …               State: …                              │
//! │┌ITEMS──────────HSN────QTY.──RATE──TAX───────AMOUNT────────┐│ header
//! ││ row …                                                    ││ 15pt rows
//! │└──────────────────────────────────────────────────────────┘│
//! │ ─────────────────── SUBTOTAL      tax          total ──────│ totals bar
//! │ TERMS AND CONDITIONS             TAXABLE AMOUNT     ₹ …    │
//! │ 1. …                             CGST @9%           ₹ …    │
//! │ 2. …                             SGST @9%           ₹ …    │
//! │                                  TOTAL AMOUNT       ₹ …    │
//! │ Total Amount (in words)                                    │
//! │ Five Thousand … Rupees Only                        [ QR ]  │ 50
//! └────────────────────────────────────────────────────────────┘ 0
//! ```
//!
//! ## Overflow
//! Rows never go below `margin_bottom`; a continuation page with the
//! title and table header is started instead. The footer block (totals
//! bar down to the verification code) stays together on the last page.
//! Header addresses are clamped to `address_max_lines` wrapped lines, so
//! the header always ends well above the table area of the first page.

use chrono::NaiveDate;
use kosh_core::money::fixed;
use kosh_core::{CurrencyFormat, Invoice, InvoiceTotals, LineFigures, LineItem};

use crate::config::{Align, ColumnSpec, IssuerProfile, LayoutConfig, RgbColor};
use crate::text::{
    clamp_lines, fit_to_width, truncate_chars, wrap_text, StandardMetrics, TextMeasure,
};

// =============================================================================
// Display List
// =============================================================================

/// Font face of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

/// Which raster image fills an image slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Logo,
    VerificationCode,
}

/// One drawing instruction. Coordinates are points; text `x` is the
/// left edge after alignment, `y` the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        font: FontFace,
        color: RgbColor,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: RgbColor,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: RgbColor,
        thickness: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: RgbColor,
        thickness: f32,
    },
    Image {
        slot: ImageSlot,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// One page of drawing instructions, in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text runs on this page as `(text, x, y)`.
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32, f32)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, x, y, .. } => Some((text.as_str(), *x, *y)),
            _ => None,
        })
    }

    /// First text run equal to `needle`.
    pub fn find_text(&self, needle: &str) -> Option<(f32, f32)> {
        self.texts()
            .find(|(text, _, _)| *text == needle)
            .map(|(_, x, y)| (x, y))
    }
}

/// A laid-out document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    /// Document title metadata.
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

impl DocumentLayout {
    /// Text runs across all pages as `(page, text, x, y)`.
    pub fn texts(&self) -> impl Iterator<Item = (usize, &str, f32, f32)> + '_ {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(i, page)| page.texts().map(move |(t, x, y)| (i, t, x, y)))
    }
}

/// Static content that is not part of the invoice record.
#[derive(Debug, Clone)]
pub struct Boilerplate<'a> {
    pub issuer: &'a IssuerProfile,
    /// Grand total in words.
    pub amount_in_words: String,
    /// Currency convention actually printable with the fonts in use.
    pub currency: CurrencyFormat,
    /// Reserve the logo slot.
    pub has_logo: bool,
    /// Reserve the verification-code slot.
    pub has_qr: bool,
}

// =============================================================================
// Font sizes and fixed offsets
// =============================================================================

const TITLE_SIZE: f32 = 11.0;
const ISSUER_NAME_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 9.0;
const SMALL_SIZE: f32 = 8.0;

/// Value column offsets for `label: value` pairs, relative to the label.
const ISSUER_VALUE_OFFSET: f32 = 40.0;
const CUSTOMER_VALUE_OFFSET: f32 = 50.0;
/// Second label column of the detail rows.
const DETAIL_SECOND_COLUMN: f32 = 180.0;
const DETAIL_SECOND_VALUE: f32 = 220.0;
/// Left edge of the ship-to column.
const SHIP_TO_X: f32 = 300.0;

/// Left edge of the tax breakdown labels; values are right-aligned at the
/// content edge.
const BREAKDOWN_LABEL_X: f32 = 400.0;
/// Gap between the tax breakdown column and text to its left.
const COLUMN_GUTTER: f32 = 10.0;
/// Inset of cell text from the column boundary.
const CELL_PADDING: f32 = 4.0;

// =============================================================================
// Layout Engine
// =============================================================================

/// Deterministic invoice layout.
///
/// ## Usage
/// ```rust,ignore
/// let engine = LayoutEngine::new(LayoutConfig::default());
/// let layout = engine.layout(&invoice, &totals, &boilerplate);
/// let pdf = render_pdf(&layout, &assets)?;
/// ```
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    regular: StandardMetrics,
    bold: StandardMetrics,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        LayoutEngine {
            config,
            regular: StandardMetrics::regular(),
            bold: StandardMetrics::bold(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out the whole document.
    ///
    /// `totals` must be the figures computed for `invoice`; nothing here
    /// recomputes them.
    pub fn layout(
        &self,
        invoice: &Invoice,
        totals: &InvoiceTotals,
        boilerplate: &Boilerplate<'_>,
    ) -> DocumentLayout {
        let mut doc = PageCursor::new(&self.config);

        doc.page_mut().ops.extend(self.title());
        let y = self.issuer_block(doc.page_mut(), boilerplate);
        let y = self.invoice_bar(doc.page_mut(), invoice, y);
        let y = self.address_block(doc.page_mut(), invoice, y);
        let table_top = self.customer_details(doc.page_mut(), invoice, y);

        let mut y = self.table_header(doc.page_mut(), table_top);
        for (item, figures) in invoice.items.iter().zip(&totals.lines) {
            if y < self.config.margin_bottom {
                doc.next_page();
                doc.page_mut().ops.extend(self.title());
                y = self.table_header(doc.page_mut(), self.continuation_table_top());
            }
            self.row(doc.page_mut(), item, figures, &boilerplate.currency, y);
            y -= self.config.row_height;
        }

        let (mut footer, bottom) = self.footer(totals, boilerplate, y);
        if bottom < self.footer_floor(boilerplate) {
            doc.next_page();
            doc.page_mut().ops.extend(self.title());
            (footer, _) = self.footer(totals, boilerplate, self.continuation_table_top());
        }
        doc.page_mut().ops.extend(footer);

        if boilerplate.has_qr {
            doc.page_mut().ops.push(DrawOp::Image {
                slot: ImageSlot::VerificationCode,
                x: self.config.qr_x,
                y: self.config.qr_y,
                width: self.config.qr_size,
                height: self.config.qr_size,
            });
        }

        doc.finish(format!("Invoice {}", invoice.invoice_no))
    }

    // -------------------------------------------------------------------------
    // Sections
    // -------------------------------------------------------------------------

    fn title(&self) -> Vec<DrawOp> {
        let c = &self.config;
        vec![self.text(
            &c.title,
            c.page_width / 2.0,
            c.page_height - 30.0,
            TITLE_SIZE,
            FontFace::Bold,
            Align::Center,
        )]
    }

    /// Logo, name, address and contact rows. Returns the last row's baseline.
    fn issuer_block(&self, page: &mut Page, boilerplate: &Boilerplate<'_>) -> f32 {
        let c = &self.config;
        let issuer = boilerplate.issuer;
        let x = c.margin_left;
        let logo_y = c.page_height - 80.0;

        if boilerplate.has_logo {
            page.ops.push(DrawOp::Image {
                slot: ImageSlot::Logo,
                x,
                y: logo_y,
                width: c.logo_size,
                height: c.logo_size,
            });
        }

        let name_x = x + c.logo_size + 15.0;
        page.ops.push(DrawOp::Text {
            text: fit_to_width(
                &issuer.name,
                &self.bold,
                ISSUER_NAME_SIZE,
                c.content_right() - name_x,
            ),
            x: name_x,
            y: logo_y + c.logo_size / 2.0 - 5.0,
            size: ISSUER_NAME_SIZE,
            font: FontFace::Bold,
            color: c.accent_color,
        });

        let mut y = logo_y - 10.0;
        let address = self.address_lines(&issuer.address, c.content_width);
        for line in &address {
            page.ops
                .push(self.text(line, x, y, BODY_SIZE, FontFace::Regular, Align::Left));
            y -= c.line_height;
        }
        if address.is_empty() {
            y -= c.line_height;
        }

        let mut fields = vec![
            ("Mobile:", issuer.mobile.as_str()),
            ("GSTIN:", issuer.gstin.as_str()),
            ("Email:", issuer.email.as_str()),
        ];
        if let Some(pan) = issuer.pan.as_deref() {
            fields.push(("PAN:", pan));
        }
        if let Some(state) = issuer.state.as_deref() {
            fields.push(("State:", state));
        }

        // Mobile and GSTIN share a row; e-mail starts the next one
        let mut last = y;
        let rows = [&fields[..2], &fields[2..]]
            .into_iter()
            .flat_map(|group| group.chunks(2));
        for (i, row) in rows.enumerate() {
            let row_y = y - i as f32 * c.line_height;
            self.label_value(page, row[0], x, x + ISSUER_VALUE_OFFSET, row_y);
            if let Some(second) = row.get(1) {
                self.label_value(
                    page,
                    *second,
                    DETAIL_SECOND_COLUMN,
                    DETAIL_SECOND_VALUE,
                    row_y,
                );
            }
            last = row_y;
        }
        last
    }

    /// Shaded bar with invoice number and date. Returns the bar's bottom.
    fn invoice_bar(&self, page: &mut Page, invoice: &Invoice, above: f32) -> f32 {
        let c = &self.config;
        let bar_y = above - 26.0;
        let bar_height = 20.0;

        page.ops.push(DrawOp::FillRect {
            x: c.margin_left,
            y: bar_y,
            width: c.content_width,
            height: bar_height,
            color: c.band_color,
        });
        page.ops.push(DrawOp::Line {
            from: (c.margin_left, bar_y + bar_height),
            to: (c.content_right(), bar_y + bar_height),
            color: c.accent_color,
            thickness: 2.0,
        });

        page.ops.push(self.text(
            &format!("Invoice No.: {}", invoice.invoice_no),
            c.margin_left + 5.0,
            bar_y + 5.0,
            BODY_SIZE,
            FontFace::Bold,
            Align::Left,
        ));
        page.ops.push(self.text(
            &format!("Invoice Date: {}", self.format_date(invoice.date)),
            c.content_right() - 10.0,
            bar_y + 5.0,
            BODY_SIZE,
            FontFace::Bold,
            Align::Right,
        ));
        bar_y
    }

    /// Two independently wrapped columns. Returns the baseline below them.
    fn address_block(&self, page: &mut Page, invoice: &Invoice, bar_y: f32) -> f32 {
        let c = &self.config;
        let x = c.margin_left;

        let heading_y = bar_y - 20.0;
        for (heading, heading_x) in [("BILL TO:", x), ("SHIP TO:", SHIP_TO_X)] {
            page.ops.push(self.text(
                heading,
                heading_x,
                heading_y,
                BODY_SIZE,
                FontFace::Bold,
                Align::Left,
            ));
        }

        let mut bill: Vec<(String, FontFace)> = vec![(
            fit_to_width(&invoice.customer, &self.bold, BODY_SIZE, c.bill_to_width),
            FontFace::Bold,
        )];
        let bill_to = invoice.bill_to.as_deref().unwrap_or_default();
        bill.extend(
            self.address_lines(bill_to, c.bill_to_width)
                .into_iter()
                .map(|line| (line, FontFace::Regular)),
        );
        let ship_to = invoice.ship_to.as_deref().unwrap_or_default();
        let ship = self.address_lines(ship_to, c.ship_to_width);

        // the taller column drives the cursor for both
        let rows = bill.len().max(ship.len());
        let top = bar_y - 35.0;
        for i in 0..rows {
            let y = top - i as f32 * c.line_height;
            if let Some((line, font)) = bill.get(i) {
                page.ops.push(self.text(line, x, y, BODY_SIZE, *font, Align::Left));
            }
            if let Some(line) = ship.get(i) {
                page.ops.push(self.text(
                    line,
                    SHIP_TO_X,
                    y,
                    BODY_SIZE,
                    FontFace::Regular,
                    Align::Left,
                ));
            }
        }
        top - rows as f32 * c.line_height
    }

    /// Customer identifier rows. Returns the top edge of the item table.
    fn customer_details(&self, page: &mut Page, invoice: &Invoice, y: f32) -> f32 {
        let c = &self.config;
        let x = c.margin_left;
        let details = &invoice.tax_details;
        let value = |v: &Option<String>| v.clone().unwrap_or_default();

        let rows = [
            [("Mobile:", value(&details.mobile)), ("GSTIN:", value(&details.gstin))],
            [("PAN:", value(&details.pan)), ("State:", value(&details.state))],
        ];
        for (i, [left, right]) in rows.iter().enumerate() {
            let row_y = y - i as f32 * c.line_height;
            let left = (left.0, left.1.as_str());
            let right = (right.0, right.1.as_str());
            self.label_value(page, left, x, x + CUSTOMER_VALUE_OFFSET, row_y);
            self.label_value(page, right, DETAIL_SECOND_COLUMN, DETAIL_SECOND_VALUE, row_y);
        }
        y - c.line_height - 20.0
    }

    /// Framed header row. Returns the bottom of the first item row.
    fn table_header(&self, page: &mut Page, top: f32) -> f32 {
        let c = &self.config;
        let height = c.row_height;

        page.ops.push(DrawOp::StrokeRect {
            x: c.margin_left,
            y: top - height,
            width: c.content_width,
            height,
            color: c.accent_color,
            thickness: 0.7,
        });
        for column in c.columns.all() {
            page.ops.push(self.text(
                &column.header,
                column.header_x,
                top - height + 3.0,
                BODY_SIZE,
                FontFace::Bold,
                Align::Left,
            ));
        }
        top - 2.0 * height
    }

    fn row(
        &self,
        page: &mut Page,
        item: &LineItem,
        figures: &LineFigures,
        currency: &CurrencyFormat,
        y: f32,
    ) {
        let c = &self.config;
        let cols = &c.columns;
        let baseline = y + 3.0;

        page.ops.push(DrawOp::StrokeRect {
            x: c.margin_left,
            y,
            width: c.content_width,
            height: c.row_height,
            color: c.accent_color,
            thickness: 0.7,
        });

        let description = truncate_chars(&item.description, c.description_max_chars);
        let description = fit_to_width(
            &description,
            &self.regular,
            BODY_SIZE,
            cols.tax_code.x - cols.description.x - CELL_PADDING,
        );
        let tax_code = fit_to_width(
            &item.tax_code,
            &self.regular,
            BODY_SIZE,
            cols.quantity.header_x - cols.tax_code.x - CELL_PADDING,
        );
        let rate = currency.clone().with_precision(c.rate_precision);

        let cells = [
            (&cols.description, description),
            (&cols.tax_code, tax_code),
            (&cols.quantity, fixed(item.quantity, c.quantity_precision)),
            (&cols.rate, rate.format_decimal(item.rate)),
            (&cols.tax, currency.format(figures.tax)),
            (&cols.total, currency.format(figures.total)),
        ];
        for (column, value) in cells {
            page.ops.push(self.cell(column, &value, baseline));
        }
    }

    /// Totals bar, terms, tax breakdown and amount in words, starting at
    /// the baseline `y`. Returns the ops and the lowest baseline used.
    fn footer(
        &self,
        totals: &InvoiceTotals,
        boilerplate: &Boilerplate<'_>,
        y: f32,
    ) -> (Vec<DrawOp>, f32) {
        let c = &self.config;
        let cols = &c.columns;
        let currency = &boilerplate.currency;
        let x = c.margin_left;
        let mut ops = Vec::new();

        // totals bar
        ops.push(DrawOp::Line {
            from: (x, y + 10.0),
            to: (c.content_right(), y + 10.0),
            color: c.accent_color,
            thickness: 0.7,
        });
        let label_x = cols.quantity.x + 10.0;
        ops.push(self.text("SUBTOTAL", label_x, y, BODY_SIZE, FontFace::Bold, Align::Left));
        let tax = currency.format(totals.total_tax);
        ops.push(self.aligned(&cols.tax, &tax, y, FontFace::Bold));
        let total = currency.format(totals.grand_total);
        ops.push(self.aligned(&cols.total, &total, y, FontFace::Bold));

        let block_y = y - 25.0;

        // terms, wrapped clear of the breakdown column
        ops.push(self.text(
            "TERMS AND CONDITIONS",
            x,
            block_y,
            BODY_SIZE,
            FontFace::Bold,
            Align::Left,
        ));
        let terms_width = BREAKDOWN_LABEL_X - x - COLUMN_GUTTER;
        let mut terms_y = block_y;
        for term in &c.terms {
            for line in wrap_text(term, &self.regular, SMALL_SIZE, terms_width) {
                terms_y -= c.line_height;
                ops.push(self.text(
                    &line,
                    x,
                    terms_y,
                    SMALL_SIZE,
                    FontFace::Regular,
                    Align::Left,
                ));
            }
        }

        // tax breakdown
        let spaced = currency.clone().spaced(true);
        let value_x = c.content_right();
        let [first, second] =
            totals.split([c.tax_labels[0].as_str(), c.tax_labels[1].as_str()]);
        let half_label = |label: &str, rate: &str| format!("{label} @{rate}");
        let breakdown = [
            ("TAXABLE AMOUNT".to_string(), totals.subtotal, SMALL_SIZE, FontFace::Regular),
            (
                half_label(&first.label, &first.rate_label),
                first.amount,
                SMALL_SIZE,
                FontFace::Regular,
            ),
            (
                half_label(&second.label, &second.rate_label),
                second.amount,
                SMALL_SIZE,
                FontFace::Regular,
            ),
            ("TOTAL AMOUNT".to_string(), totals.grand_total, BODY_SIZE, FontFace::Bold),
        ];
        let mut right_y = block_y;
        for (label, amount, size, font) in breakdown {
            ops.push(self.text(&label, BREAKDOWN_LABEL_X, right_y, size, font, Align::Left));
            ops.push(self.text(&spaced.format(amount), value_x, right_y, size, font, Align::Right));
            right_y -= c.line_height;
        }

        // amount in words
        let words_y = (block_y - 60.0).min(terms_y - 2.0 * c.line_height);
        ops.push(self.text(
            "Total Amount (in words)",
            x,
            words_y,
            SMALL_SIZE,
            FontFace::Regular,
            Align::Left,
        ));
        let words_width = c.qr_x - x - COLUMN_GUTTER;
        let mut bottom = words_y;
        for line in wrap_text(&boilerplate.amount_in_words, &self.bold, BODY_SIZE, words_width) {
            bottom -= c.line_height;
            ops.push(self.text(&line, x, bottom, BODY_SIZE, FontFace::Bold, Align::Left));
        }

        (ops, bottom)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Lowest baseline the footer may use without touching the QR code.
    fn footer_floor(&self, boilerplate: &Boilerplate<'_>) -> f32 {
        let c = &self.config;
        if boilerplate.has_qr {
            c.qr_y + c.qr_size + c.line_height
        } else {
            c.margin_bottom
        }
    }

    /// Table top on continuation pages, just under the title.
    fn continuation_table_top(&self) -> f32 {
        self.config.page_height - 60.0
    }

    fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.config.date_format).to_string()
    }

    /// Wraps an address to `width` and clamps it to `address_max_lines`.
    fn address_lines(&self, address: &str, width: f32) -> Vec<String> {
        clamp_lines(
            wrap_text(address, &self.regular, BODY_SIZE, width),
            self.config.address_max_lines,
            &self.regular,
            BODY_SIZE,
            width,
        )
    }

    fn label_value(
        &self,
        page: &mut Page,
        (label, value): (&str, &str),
        x: f32,
        value_x: f32,
        y: f32,
    ) {
        page.ops.push(self.text(label, x, y, BODY_SIZE, FontFace::Bold, Align::Left));
        if !value.is_empty() {
            page.ops
                .push(self.text(value, value_x, y, BODY_SIZE, FontFace::Regular, Align::Left));
        }
    }

    fn cell(&self, column: &ColumnSpec, value: &str, y: f32) -> DrawOp {
        self.aligned(column, value, y, FontFace::Regular)
    }

    fn aligned(&self, column: &ColumnSpec, value: &str, y: f32, font: FontFace) -> DrawOp {
        self.text(value, column.x, y, BODY_SIZE, font, column.align)
    }

    fn text(
        &self,
        text: &str,
        anchor: f32,
        y: f32,
        size: f32,
        font: FontFace,
        align: Align,
    ) -> DrawOp {
        let width = match font {
            FontFace::Regular => self.regular.width(text, size),
            FontFace::Bold => self.bold.width(text, size),
        };
        let x = match align {
            Align::Left => anchor,
            Align::Center => anchor - width / 2.0,
            Align::Right => anchor - width,
        };
        DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            size,
            font,
            color: RgbColor::BLACK,
        }
    }
}

/// Accumulates pages while laying out.
struct PageCursor<'a> {
    config: &'a LayoutConfig,
    pages: Vec<Page>,
}

impl<'a> PageCursor<'a> {
    fn new(config: &'a LayoutConfig) -> Self {
        PageCursor {
            config,
            pages: vec![Page::default()],
        }
    }

    fn page_mut(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn next_page(&mut self) {
        self.pages.push(Page::default());
    }

    fn finish(self, title: String) -> DocumentLayout {
        DocumentLayout {
            title,
            width: self.config.page_width,
            height: self.config.page_height,
            pages: self.pages,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kosh_core::{compute_totals, AmountPhraser, CustomerTaxDetails, IndianEnglish, TaxRate};
    use rust_decimal_macros::dec;

    fn issuer() -> IssuerProfile {
        IssuerProfile {
            name: "AONE PET RECYCLERS".to_string(),
            address: "Plot C-39, Unnamed Road, Etmadpur, Agra".to_string(),
            mobile: "9897201594".to_string(),
            gstin: "09EMMPK5033B1Z5".to_string(),
            email: "accounts@example.com".to_string(),
            pan: None,
            state: None,
        }
    }

    fn reference_invoice() -> Invoice {
        Invoice::dated(
            "INV-001",
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            "Green Polymers",
            vec![LineItem::new("Recycled PET Flakes", "3915", dec!(100), dec!(45.00))],
        )
        .with_bill_to("12 Industrial Area\nAgra 282006")
        .with_tax_details(CustomerTaxDetails {
            gstin: Some("09ABCDE1234F1Z5".to_string()),
            ..Default::default()
        })
    }

    fn lay_out(invoice: &Invoice, has_qr: bool) -> DocumentLayout {
        let totals = compute_totals(&invoice.items, TaxRate::from_bps(1800));
        let issuer = issuer();
        let boilerplate = Boilerplate {
            issuer: &issuer,
            amount_in_words: IndianEnglish.phrase(totals.grand_total),
            currency: CurrencyFormat::rupee(),
            has_logo: false,
            has_qr,
        };
        LayoutEngine::new(LayoutConfig::default()).layout(invoice, &totals, &boilerplate)
    }

    fn right_edge(page: &Page, text: &str, size: f32, font: StandardMetrics) -> f32 {
        let (x, _) = page.find_text(text).unwrap();
        x + font.width(text, size)
    }

    #[test]
    fn test_reference_invoice_figures() {
        let layout = lay_out(&reference_invoice(), true);
        assert_eq!(layout.pages.len(), 1);
        let page = &layout.pages[0];

        assert!(page.find_text("Invoice No.: INV-001").is_some());
        assert!(page.find_text("Invoice Date: 01-04-2024").is_some());
        assert!(page.find_text("100.0").is_some());
        assert!(page.find_text("₹45.00").is_some());
        assert!(page.find_text("₹810.00").is_some());
        assert!(page.find_text("₹5,310.00").is_some());
        assert!(page.find_text("₹ 4,500.00").is_some());
        assert!(page.find_text("₹ 405.00").is_some());
        assert!(page.find_text("CGST @9%").is_some());
        assert!(page.find_text("SGST @9%").is_some());
        assert!(page.find_text("₹ 5,310.00").is_some());
        assert!(page
            .find_text("Five Thousand Three Hundred And Ten Rupees Only")
            .is_some());
    }

    #[test]
    fn test_sections_in_top_to_bottom_order() {
        let layout = lay_out(&reference_invoice(), true);
        let page = &layout.pages[0];
        let y = |t: &str| page.find_text(t).unwrap().1;

        let order = [
            "TAX INVOICE - ORIGINAL",
            "AONE PET RECYCLERS",
            "Mobile:",
            "Invoice No.: INV-001",
            "BILL TO:",
            "Green Polymers",
            "12 Industrial Area",
            "Agra 282006",
            "ITEMS",
            "Recycled PET Flakes",
            "SUBTOTAL",
            "TERMS AND CONDITIONS",
            "Total Amount (in words)",
        ];
        for pair in order.windows(2) {
            assert!(y(pair[0]) > y(pair[1]), "{} should be above {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_numeric_alignment() {
        let layout = lay_out(&reference_invoice(), false);
        let page = &layout.pages[0];
        let regular = StandardMetrics::regular();

        assert!((right_edge(page, "₹810.00", 9.0, regular) - 420.0).abs() < 0.01);
        assert!((right_edge(page, "₹45.00", 9.0, regular) - 340.0).abs() < 0.01);

        let (qty_x, _) = page.find_text("100.0").unwrap();
        let qty_center = qty_x + regular.width("100.0", 9.0) / 2.0;
        assert!((qty_center - 270.0).abs() < 0.01);
    }

    #[test]
    fn test_address_columns_share_cursor() {
        let invoice = reference_invoice()
            .with_ship_to("Warehouse 9\nTransport Nagar\nMathura Road\nAgra");
        let layout = lay_out(&invoice, false);
        let page = &layout.pages[0];

        // ship-to has 4 lines, bill-to 3 (name + 2): details follow the taller
        let (_, last_ship) = page.find_text("Agra").unwrap();
        let (_, bill_last) = page.find_text("Agra 282006").unwrap();
        let (_, warehouse) = page.find_text("Warehouse 9").unwrap();
        let (_, name) = page.find_text("Green Polymers").unwrap();
        assert_eq!(warehouse, name);
        assert!(bill_last > last_ship);

        let mobile_rows: Vec<f32> = page
            .texts()
            .filter(|(t, _, _)| *t == "Mobile:")
            .map(|(_, _, y)| y)
            .collect();
        assert!(mobile_rows[1] < last_ship);
    }

    #[test]
    fn test_single_item_has_no_collisions() {
        let layout = lay_out(&reference_invoice(), true);
        let page = &layout.pages[0];

        let mut seen: Vec<(f32, f32, f32)> = Vec::new();
        let regular = StandardMetrics::regular();
        for op in &page.ops {
            if let DrawOp::Text { text, x, y, size, .. } = op {
                let right = x + regular.width(text, *size) * 1.1;
                for (ox, oright, oy) in &seen {
                    let same_line = (oy - y).abs() < 6.0;
                    let overlap = *x < *oright && *ox < right;
                    assert!(!(same_line && overlap), "'{text}' collides at y={y}");
                }
                seen.push((*x, right, *y));
            }
        }

        // everything stays above the verification code
        let (_, words_y) = page
            .find_text("Five Thousand Three Hundred And Ten Rupees Only")
            .unwrap();
        assert!(words_y > 50.0 + 60.0);
    }

    #[test]
    fn test_overflow_adds_continuation_pages() {
        let items: Vec<LineItem> = (0..120)
            .map(|i| LineItem::new(format!("Item {i}"), "3915", dec!(1), dec!(10)))
            .collect();
        let invoice = Invoice::dated(
            "INV-BIG",
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            "Acme",
            items,
        );
        let layout = lay_out(&invoice, true);

        assert!(layout.pages.len() >= 3);
        for (i, page) in layout.pages.iter().enumerate() {
            assert!(page.find_text("TAX INVOICE - ORIGINAL").is_some(), "page {i} has no title");
            for op in &page.ops {
                if let DrawOp::StrokeRect { y, .. } = op {
                    assert!(*y >= 40.0, "row below bottom margin on page {i}");
                }
            }
        }

        // every row appears exactly once, in order
        let rows: Vec<&str> = layout
            .texts()
            .map(|(_, t, _, _)| t)
            .filter(|t| t.starts_with("Item "))
            .collect();
        assert_eq!(rows.len(), 120);
        assert_eq!(rows[0], "Item 0");
        assert_eq!(rows[119], "Item 119");

        // footer only on the last page
        let last = layout.pages.len() - 1;
        let subtotal_pages: Vec<usize> = layout
            .texts()
            .filter(|(_, t, _, _)| *t == "SUBTOTAL")
            .map(|(p, _, _, _)| p)
            .collect();
        assert_eq!(subtotal_pages, vec![last]);
        assert!(layout.pages[last]
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Image { slot: ImageSlot::VerificationCode, .. })));
    }

    #[test]
    fn test_long_addresses_clamped_above_bottom_margin() {
        let address = (1..=90).map(|i| format!("Line {i}")).collect::<Vec<_>>().join("\n");
        let invoice = reference_invoice()
            .with_bill_to(address.clone())
            .with_ship_to(address.clone());
        let totals = compute_totals(&invoice.items, TaxRate::from_bps(1800));
        let issuer = IssuerProfile {
            address,
            ..issuer()
        };
        let boilerplate = Boilerplate {
            issuer: &issuer,
            amount_in_words: IndianEnglish.phrase(totals.grand_total),
            currency: CurrencyFormat::rupee(),
            has_logo: true,
            has_qr: true,
        };
        let config = LayoutConfig::default();
        let margin_bottom = config.margin_bottom;
        let layout = LayoutEngine::new(config).layout(&invoice, &totals, &boilerplate);

        for (page, text, _, y) in layout.texts() {
            assert!(y >= margin_bottom, "'{text}' at y={y} on page {page}");
        }

        // issuer, bill-to and ship-to each keep five lines
        let page = &layout.pages[0];
        let marked = page.texts().filter(|(t, _, _)| *t == "Line 5...").count();
        assert_eq!(marked, 3);
        assert!(page.find_text("Line 6").is_none());
        assert!(page.find_text("ITEMS").is_some());
        assert!(page.find_text("Recycled PET Flakes").is_some());
    }

    #[test]
    fn test_long_description_truncated_with_ellipsis() {
        let mut invoice = reference_invoice();
        invoice.items[0].description =
            "Recycled PET Flakes, hot washed, clear grade, bale pressed".to_string();
        let layout = lay_out(&invoice, false);

        let desc = layout
            .texts()
            .map(|(_, t, _, _)| t)
            .find(|t| t.starts_with("Recycled"))
            .unwrap();
        assert!(desc.ends_with("..."));
        assert!(desc.chars().count() <= 30);
        assert!(StandardMetrics::regular().width(desc, 9.0) <= 190.0 - 32.0 - 4.0);
    }

    #[test]
    fn test_logo_slot_only_when_available() {
        let invoice = reference_invoice();
        let totals = compute_totals(&invoice.items, TaxRate::from_bps(1800));
        let issuer = issuer();
        let mut boilerplate = Boilerplate {
            issuer: &issuer,
            amount_in_words: String::new(),
            currency: CurrencyFormat::rupee(),
            has_logo: true,
            has_qr: false,
        };
        let engine = LayoutEngine::new(LayoutConfig::default());

        let has_logo = |layout: &DocumentLayout| {
            layout.pages[0]
                .ops
                .iter()
                .any(|op| matches!(op, DrawOp::Image { slot: ImageSlot::Logo, .. }))
        };
        assert!(has_logo(&engine.layout(&invoice, &totals, &boilerplate)));
        boilerplate.has_logo = false;
        assert!(!has_logo(&engine.layout(&invoice, &totals, &boilerplate)));
    }

    #[test]
    fn test_fallback_currency_symbol() {
        let invoice = reference_invoice();
        let totals = compute_totals(&invoice.items, TaxRate::from_bps(1800));
        let issuer = issuer();
        let boilerplate = Boilerplate {
            issuer: &issuer,
            amount_in_words: String::new(),
            currency: CurrencyFormat::rupee().with_symbol("Rs."),
            has_logo: false,
            has_qr: false,
        };
        let engine = LayoutEngine::new(LayoutConfig::default());
        let layout = engine.layout(&invoice, &totals, &boilerplate);
        let page = &layout.pages[0];

        assert!(page.find_text("Rs.5,310.00").is_some());
        assert!(page.find_text("Rs. 5,310.00").is_some());
        assert!(!layout.texts().any(|(_, t, _, _)| t.contains('₹')));
    }
}
