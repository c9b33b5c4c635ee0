//! # Verification Payload
//!
//! A four-line text summary of an invoice, encoded as a QR code that is
//! printed on the document and saved as a PNG next to it.
//!
//! ```text
//! Invoice No: INV-001
//! Customer: Green Polymers
//! Tax Amount: ₹810.00
//! Total Amount: ₹5,310.00
//! ```
//!
//! The payload only lets a reader cross-check totals; line items cannot be
//! rebuilt from it.

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Luma};
use kosh_core::{CurrencyFormat, Invoice, InvoiceTotals};
use qrcode::QrCode;

use crate::error::DocResult;
use crate::pdf::RasterImage;

/// Builds the payload text from already computed totals.
///
/// Lines are separated by `\n`; there is no trailing newline.
pub fn build_payload(
    invoice: &Invoice,
    totals: &InvoiceTotals,
    currency: &CurrencyFormat,
) -> String {
    format!(
        "Invoice No: {}\nCustomer: {}\nTax Amount: {}\nTotal Amount: {}",
        invoice.invoice_no,
        invoice.customer,
        currency.format(totals.total_tax),
        currency.format(totals.grand_total),
    )
}

/// A rendered QR code, one byte per pixel.
#[derive(Debug, Clone)]
pub struct QrImage {
    pixels: ImageBuffer<Luma<u8>, Vec<u8>>,
}

impl QrImage {
    /// Edge length in pixels, quiet zone included.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// PNG encoding of the code.
    pub fn png_bytes(&self) -> DocResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(self.pixels.clone())
            .write_to(&mut buffer, ImageOutputFormat::Png)?;
        Ok(buffer.into_inner())
    }

    /// RGB pixels for embedding in the PDF.
    pub fn to_raster(&self) -> RasterImage {
        RasterImage::from_dynamic(&DynamicImage::ImageLuma8(self.pixels.clone()))
    }
}

/// Encodes text with the default error-correction level and module size.
pub fn encode_qr(payload: &str) -> DocResult<QrImage> {
    let code = QrCode::new(payload.as_bytes())?;
    Ok(QrImage {
        pixels: code.render::<Luma<u8>>().build(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kosh_core::{compute_totals, LineItem, TaxRate};
    use rust_decimal_macros::dec;

    fn reference() -> (Invoice, InvoiceTotals) {
        let invoice = Invoice::dated(
            "INV-001",
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            "Green Polymers",
            vec![LineItem::new("Recycled PET Flakes", "3915", dec!(100), dec!(45.00))],
        );
        let totals = compute_totals(&invoice.items, TaxRate::from_bps(1800));
        (invoice, totals)
    }

    #[test]
    fn test_payload_template() {
        let (invoice, totals) = reference();
        let payload = build_payload(&invoice, &totals, &CurrencyFormat::rupee());

        assert_eq!(
            payload,
            "Invoice No: INV-001\nCustomer: Green Polymers\n\
             Tax Amount: ₹810.00\nTotal Amount: ₹5,310.00"
        );
    }

    #[test]
    fn test_payload_uses_given_currency() {
        let (invoice, totals) = reference();
        let payload = build_payload(&invoice, &totals, &CurrencyFormat::rupee().with_symbol("Rs."));
        assert!(payload.ends_with("Total Amount: Rs.5,310.00"));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let (invoice, totals) = reference();
        let payload = build_payload(&invoice, &totals, &CurrencyFormat::rupee());

        let first = encode_qr(&payload).unwrap();
        let second = encode_qr(&payload).unwrap();
        let png = first.png_bytes().unwrap();

        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
        assert_eq!(png, second.png_bytes().unwrap());
        assert!(first.width() > 0);

        let raster = first.to_raster();
        assert_eq!(raster.width, first.width());
        assert_eq!(raster.rgb.len(), (raster.width * raster.height * 3) as usize);
    }
}
