//! # Tabular Export
//!
//! One CSV table per invoice: a header row, then one row per line item
//! in input order.
//!
//! ```text
//! Description,HSN,Quantity,Rate,Tax,Total
//! Recycled PET Flakes,3915,100.00,45.00,810.00,5310.00
//! ```
//!
//! Figures come from the same [`InvoiceTotals`] the document is drawn
//! from; nothing is recomputed here.

use kosh_core::money::fixed;
use kosh_core::{Invoice, InvoiceTotals};

use crate::error::{DocError, DocResult};

/// Column headers, in order.
pub const EXPORT_HEADERS: [&str; 6] = ["Description", "HSN", "Quantity", "Rate", "Tax", "Total"];

const EXPORT_PRECISION: u32 = 2;

/// Serializes the line items of `invoice` to CSV bytes.
pub fn export_csv(invoice: &Invoice, totals: &InvoiceTotals) -> DocResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;

    for (item, figures) in invoice.items.iter().zip(&totals.lines) {
        let quantity = fixed(item.quantity, EXPORT_PRECISION);
        let rate = fixed(item.rate, EXPORT_PRECISION);
        let tax = figures.tax.to_fixed(EXPORT_PRECISION);
        let total = figures.total.to_fixed(EXPORT_PRECISION);
        writer.write_record([
            item.description.as_str(),
            item.tax_code.as_str(),
            quantity.as_str(),
            rate.as_str(),
            tax.as_str(),
            total.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| DocError::Encode(err.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
