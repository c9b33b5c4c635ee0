//! # Tax Calculator
//!
//! Derives every monetary figure on an invoice from its line items and a
//! single tax rate.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  per line:   amount = quantity × rate          (no rounding)            │
//! │              tax    = amount × tax_rate        (no rounding)            │
//! │              total  = amount + tax                                      │
//! │                                                                         │
//! │  invoice:    subtotal    = Σ amount                                     │
//! │              total_tax   = Σ tax                                        │
//! │              grand_total = subtotal + total_tax                         │
//! │                                                                         │
//! │  display:    round half-up to 2 dp, AFTER summation                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Split Tax
//! The configured rate is shown as two equal halves (CGST + SGST) applied
//! to the same base. Both halves are numerically identical and add up to
//! the single-rate tax, so only one tax figure is ever computed.
//!
//! Nothing here fails: negative or zero quantities are accepted as plain
//! arithmetic. Validation belongs to the form boundary.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{LineItem, TaxRate};

/// Derived figures for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFigures {
    /// `quantity × rate`
    pub amount: Money,
    /// `amount × tax_rate`
    pub tax: Money,
    /// `amount + tax`
    pub total: Money,
}

impl LineFigures {
    /// One of the two equal split-tax halves.
    pub fn half_tax(&self, rate: TaxRate) -> Money {
        self.amount.apply_rate(rate.half_fraction())
    }
}

/// Aggregate figures for a whole invoice.
///
/// Computed once per generation run and handed unchanged to the
/// document layout, the verification payload and the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Rate the figures were computed with.
    pub rate: TaxRate,
    /// Per-line figures, in item order.
    pub lines: Vec<LineFigures>,
    pub subtotal: Money,
    pub total_tax: Money,
    pub grand_total: Money,
}

/// One displayed half of the split tax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxComponent {
    /// e.g. `CGST`
    pub label: String,
    /// e.g. `9%`
    pub rate_label: String,
    pub amount: Money,
}

impl InvoiceTotals {
    /// Tax on the subtotal at half the rate.
    pub fn half_tax(&self) -> Money {
        self.subtotal.apply_rate(self.rate.half_fraction())
    }

    /// The two display components of the split tax.
    ///
    /// ## Example
    /// ```rust
    /// use kosh_core::{compute_totals, LineItem, TaxRate};
    /// use rust_decimal::Decimal;
    ///
    /// let items = vec![LineItem::new("A", "1", Decimal::ONE, Decimal::from(100))];
    /// let totals = compute_totals(&items, TaxRate::from_bps(1800));
    /// let [cgst, sgst] = totals.split(["CGST", "SGST"]);
    /// assert_eq!(cgst.rate_label, "9%");
    /// assert_eq!(cgst.amount + sgst.amount, totals.total_tax);
    /// ```
    pub fn split(&self, labels: [&str; 2]) -> [TaxComponent; 2] {
        let half = self.half_tax();
        let rate_label = self.rate.half_percentage_label();
        labels.map(|label| TaxComponent {
            label: label.to_string(),
            rate_label: rate_label.clone(),
            amount: half,
        })
    }
}

/// Computes `(amount, tax, total)` for one line item.
pub fn compute_line(item: &LineItem, rate: TaxRate) -> LineFigures {
    let amount = item.amount();
    let tax = amount.apply_rate(rate.fraction());
    LineFigures {
        amount,
        tax,
        total: amount + tax,
    }
}

/// Computes per-line figures and `(subtotal, total_tax, grand_total)`.
///
/// Sums are taken over unrounded line values.
pub fn compute_totals(items: &[LineItem], rate: TaxRate) -> InvoiceTotals {
    let lines: Vec<LineFigures> = items.iter().map(|item| compute_line(item, rate)).collect();
    let subtotal: Money = lines.iter().map(|l| l.amount).sum();
    let total_tax: Money = lines.iter().map(|l| l.tax).sum();

    InvoiceTotals {
        rate,
        lines,
        subtotal,
        total_tax,
        grand_total: subtotal + total_tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const GST: TaxRate = TaxRate::from_bps(1800);

    fn item(qty: Decimal, rate: Decimal) -> LineItem {
        LineItem::new("Item", "0000", qty, rate)
    }

    #[test]
    fn test_reference_invoice() {
        let items = vec![LineItem::new(
            "Recycled PET Flakes",
            "3915",
            dec!(100),
            dec!(45.00),
        )];
        let totals = compute_totals(&items, GST);

        assert_eq!(totals.lines[0].amount.amount(), dec!(4500));
        assert_eq!(totals.lines[0].tax.amount(), dec!(810));
        assert_eq!(totals.lines[0].total.amount(), dec!(5310));
        assert_eq!(totals.subtotal.amount(), dec!(4500));
        assert_eq!(totals.total_tax.amount(), dec!(810));
        assert_eq!(totals.grand_total.amount(), dec!(5310));
    }

    #[test]
    fn test_line_identities_hold_exactly() {
        let cases = [
            (dec!(0), dec!(0)),
            (dec!(1), dec!(0.01)),
            (dec!(3.333), dec!(19.99)),
            (dec!(12.5), dec!(1234.56)),
            (dec!(999999), dec!(99999.99)),
        ];
        for (q, r) in cases {
            let figures = compute_line(&item(q, r), GST);
            assert_eq!(figures.tax.amount(), q * r * dec!(0.18));
            assert_eq!(figures.total.amount(), q * r * dec!(1.18));
            assert_eq!(figures.total, figures.amount + figures.tax);
        }
    }

    #[test]
    fn test_halves_sum_to_single_rate() {
        let figures = compute_line(&item(dec!(7), dec!(13.37)), GST);
        let half = figures.half_tax(GST);
        assert_eq!(half + half, figures.tax);
    }

    #[test]
    fn test_sum_before_rounding() {
        // each line amount is 0.005: a paisa boundary plus half a paisa
        let items = vec![
            item(dec!(0.5), dec!(0.01)),
            item(dec!(0.5), dec!(0.01)),
            item(dec!(0.5), dec!(0.01)),
        ];
        let totals = compute_totals(&items, TaxRate::zero());

        assert_eq!(totals.subtotal.amount(), dec!(0.015));
        assert_eq!(totals.subtotal.to_fixed(2), "0.02");

        let round_then_sum: Money = totals.lines.iter().map(|l| l.amount.rounded(2)).sum();
        assert_eq!(round_then_sum.to_fixed(2), "0.03");
    }

    #[test]
    fn test_grand_total_reconciles() {
        let items = vec![
            item(dec!(1.5), dec!(10.33)),
            item(dec!(2), dec!(0.07)),
            item(dec!(17), dec!(3.99)),
        ];
        let totals = compute_totals(&items, GST);

        let subtotal: Money = items.iter().map(LineItem::amount).sum();
        assert_eq!(totals.subtotal, subtotal);
        assert_eq!(totals.grand_total, totals.subtotal + totals.total_tax);
        let line_totals: Money = totals.lines.iter().map(|l| l.total).sum();
        assert_eq!(line_totals, totals.grand_total);
    }

    #[test]
    fn test_split_components() {
        let totals = compute_totals(&[item(dec!(1), dec!(4500))], GST);
        let [cgst, sgst] = totals.split(["CGST", "SGST"]);

        assert_eq!(cgst.label, "CGST");
        assert_eq!(sgst.label, "SGST");
        assert_eq!(cgst.amount.amount(), dec!(405));
        assert_eq!(cgst.amount, sgst.amount);
        assert_eq!(cgst.amount + sgst.amount, totals.total_tax);
    }

    #[test]
    fn test_negative_values_are_plain_arithmetic() {
        let figures = compute_line(&item(dec!(-2), dec!(10)), GST);
        assert_eq!(figures.amount.amount(), dec!(-20));
        assert_eq!(figures.tax.amount(), dec!(-3.6));
    }

    #[test]
    fn test_empty_invoice_totals_are_zero() {
        let totals = compute_totals(&[], GST);
        assert!(totals.lines.is_empty());
        assert!(totals.grand_total.is_zero());
    }
}
