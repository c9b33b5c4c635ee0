//! # Invoice Commands
//!
//! ## Generate Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kosh generate draft.json                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InvoiceDraft (JSON) ──► into_invoice(today) ──► validate_invoice       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InvoiceGenerator::generate_artifacts  ──► PDF, QR PNG, CSV             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  invoices/<no>.json snapshot ──► customer added to master data          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `regenerate` skips the draft and snapshot steps and rebuilds the
//! artifacts from the saved snapshot, overwriting the previous files.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use kosh_core::money::fixed;
use kosh_core::validation::validate_invoice;
use kosh_core::{compute_totals, Customer, Invoice, InvoiceDraft, InvoiceTotals};
use kosh_docs::GeneratedInvoice;
use kosh_store::{InvoiceQuery, UpsertOutcome};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Reads a draft file and generates the invoice.
pub fn generate(
    state: &AppState,
    file: &Path,
    out: &mut impl Write,
) -> AppResult<GeneratedInvoice> {
    let invoice = read_draft(file)?.into_invoice(Local::now().date_naive());
    let generated = generate_invoice(state, &invoice)?;
    print_generated(state, &invoice, &generated, out)?;
    Ok(generated)
}

/// Validates, generates artifacts, saves the snapshot and remembers the
/// customer.
pub fn generate_invoice(state: &AppState, invoice: &Invoice) -> AppResult<GeneratedInvoice> {
    validate_invoice(invoice)?;

    let generated = state.generator.generate_artifacts(invoice)?;
    let snapshot = state.store.invoices().save(invoice)?;
    debug!(path = %snapshot.display(), "Snapshot saved");

    let customers = state.store.customers();
    if customers.find(&invoice.customer)?.is_none() {
        let outcome = customers.upsert(Customer::from_invoice(invoice))?;
        debug_assert_eq!(outcome, UpsertOutcome::Inserted);
    }

    info!(invoice_no = %invoice.invoice_no, "Invoice created");
    Ok(generated)
}

/// Rebuilds the artifacts of a saved invoice.
pub fn regenerate(
    state: &AppState,
    invoice_no: &str,
    out: &mut impl Write,
) -> AppResult<GeneratedInvoice> {
    let invoice = state.store.invoices().load(invoice_no)?;
    let generated = state.generator.generate_artifacts(&invoice)?;
    print_generated(state, &invoice, &generated, out)?;
    Ok(generated)
}

/// Prints the line figures and totals of a saved invoice.
pub fn show(state: &AppState, invoice_no: &str, out: &mut impl Write) -> AppResult<()> {
    let invoice = state.store.invoices().load(invoice_no)?;
    let totals = compute_totals(&invoice.items, state.config.tax_rate());
    let currency = state.currency();
    let qty_dp = state.config.layout.quantity_precision;

    writeln!(out, "Invoice: {}", invoice.invoice_no)?;
    writeln!(out, "Customer: {}", invoice.customer)?;
    writeln!(out, "Date: {}", invoice.date)?;
    writeln!(out)?;

    for (item, figures) in invoice.items.iter().zip(&totals.lines) {
        writeln!(
            out,
            "{} [{}] - Qty: {} @ {} = {} + tax {} = {}",
            item.description,
            item.tax_code,
            fixed(item.quantity, qty_dp),
            currency.format_decimal(item.rate),
            currency.format(figures.amount),
            currency.format(figures.tax),
            currency.format(figures.total),
        )?;
    }
    writeln!(out)?;
    write_totals(state, &totals, out)
}

/// Prints one summary line per matching snapshot, newest first.
pub fn search(state: &AppState, query: &InvoiceQuery, out: &mut impl Write) -> AppResult<usize> {
    let results = state.store.invoices().search(query)?;
    if results.is_empty() {
        writeln!(out, "No matching invoices found.")?;
        return Ok(0);
    }

    let rate = state.config.tax_rate();
    for invoice in &results {
        let totals = compute_totals(&invoice.items, rate);
        writeln!(
            out,
            "Invoice: {} | Customer: {} | Date: {} | Total: {}",
            invoice.invoice_no,
            invoice.customer,
            invoice.date,
            state.currency().format(totals.grand_total),
        )?;
    }
    Ok(results.len())
}

// =============================================================================
// Helpers
// =============================================================================

fn read_draft(path: &Path) -> AppResult<InvoiceDraft> {
    let draft_error = |message: String| AppError::Draft {
        path: path.to_path_buf(),
        message,
    };
    let contents = fs::read_to_string(path).map_err(|err| draft_error(err.to_string()))?;
    serde_json::from_str(&contents).map_err(|err| draft_error(err.to_string()))
}

fn write_totals(state: &AppState, totals: &InvoiceTotals, out: &mut impl Write) -> AppResult<()> {
    let currency = state.currency();
    let [first_label, second_label] = &state.config.layout.tax_labels;

    writeln!(out, "Subtotal: {}", currency.format(totals.subtotal))?;
    for half in totals.split([first_label.as_str(), second_label.as_str()]) {
        writeln!(out, "{} @{}: {}", half.label, half.rate_label, currency.format(half.amount))?;
    }
    writeln!(out, "Total Amount: {}", currency.format(totals.grand_total))?;
    Ok(())
}

fn print_generated(
    state: &AppState,
    invoice: &Invoice,
    generated: &GeneratedInvoice,
    out: &mut impl Write,
) -> AppResult<()> {
    writeln!(out, "Invoice {} generated", invoice.invoice_no)?;
    writeln!(out, "  Document: {}", generated.document.display())?;
    writeln!(out, "  QR code:  {}", generated.qr_code.display())?;
    writeln!(out, "  Export:   {}", generated.export.display())?;
    writeln!(out, "  Total:    {}", state.currency().format(generated.totals.grand_total))?;
    Ok(())
}
