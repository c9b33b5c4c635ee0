//! Command handler tests against a temporary data directory.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use kosh_cli::cli::{Command, CustomerAction, CustomerArgs, ItemAction};
use kosh_cli::commands::{self, invoice};
use kosh_cli::config::AppConfig;
use kosh_cli::error::ErrorCode;
use kosh_cli::state::AppState;
use kosh_core::{Invoice, LineItem};
use kosh_store::{InvoiceQuery, UpsertOutcome};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn state(dir: &TempDir) -> AppState {
    let mut config = AppConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    config.issuer.name = "AONE PET RECYCLERS".to_string();
    AppState::open(config).unwrap()
}

fn write_draft(dir: &TempDir, name: &str, json: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, json).unwrap();
    path
}

const REFERENCE_DRAFT: &str = r#"{
    "invoice_no": "INV-001",
    "date": "2024-04-01",
    "customer": "Green Polymers",
    "bill_to": "Sector 5, Noida",
    "gstin": "09AAACG1234A1Z5",
    "items": [
        { "description": "Recycled PET Flakes", "hsn": "3915", "quantity": "100", "rate": "45.00" }
    ]
}"#;

fn run(state: &AppState, command: Command) -> (Result<(), kosh_cli::error::AppError>, String) {
    let mut out = Vec::new();
    let result = commands::execute(state, command, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn saved_invoice(no: &str, customer: &str, date: (i32, u32, u32)) -> Invoice {
    Invoice::dated(
        no,
        NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        customer,
        vec![LineItem::new("Granules", "3907", dec!(2), dec!(50))],
    )
}

#[test]
fn test_generate_from_draft() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);
    let draft = write_draft(&dir, "draft.json", REFERENCE_DRAFT);

    let (result, output) = run(&state, Command::Generate { file: draft });
    result.unwrap();

    assert!(output.contains("Invoice INV-001 generated"));
    assert!(output.contains("Total:    ₹5,310.00"));
    assert!(dir.path().join("invoices/Invoice_INV-001.pdf").exists());
    assert!(dir.path().join("qrcodes/invoice_INV-001.png").exists());
    assert!(dir.path().join("exports/invoice_INV-001.csv").exists());

    let snapshot = state.store.invoices().load("INV-001").unwrap();
    assert_eq!(snapshot.customer, "Green Polymers");
    assert_eq!(snapshot.tax_details.gstin.as_deref(), Some("09AAACG1234A1Z5"));

    let customer = state.store.customers().find("Green Polymers").unwrap().unwrap();
    assert_eq!(customer.bill_to.as_deref(), Some("Sector 5, Noida"));
}

#[test]
fn test_generate_keeps_existing_customer_record() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let (result, _) = run(
        &state,
        Command::Customers {
            action: CustomerAction::Add(CustomerArgs {
                name: "Green Polymers".to_string(),
                bill_to: Some("Head Office".to_string()),
                ship_to: None,
                mobile: Some("9876543210".to_string()),
                gstin: None,
                pan: None,
                state: None,
            }),
        },
    );
    result.unwrap();

    let draft = write_draft(&dir, "draft.json", REFERENCE_DRAFT);
    run(&state, Command::Generate { file: draft }).0.unwrap();

    let customers = state.store.customers().load_all().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].bill_to.as_deref(), Some("Head Office"));
    assert_eq!(customers[0].tax_details.mobile.as_deref(), Some("9876543210"));
}

#[test]
fn test_generate_without_date_uses_today() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);
    let draft = write_draft(
        &dir,
        "draft.json",
        r#"{ "invoice_no": "INV-002", "customer": "Acme",
             "items": [{ "description": "Bottles", "hsn": "3923", "quantity": "1", "rate": "10" }] }"#,
    );

    run(&state, Command::Generate { file: draft }).0.unwrap();

    let snapshot = state.store.invoices().load("INV-002").unwrap();
    assert_eq!(snapshot.date, chrono::Local::now().date_naive());
}

#[test]
fn test_invalid_draft_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);
    let draft = write_draft(
        &dir,
        "draft.json",
        r#"{ "invoice_no": "INV/003", "customer": "Acme", "items": [] }"#,
    );

    let (result, _) = run(&state, Command::Generate { file: draft });
    let err = result.unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert!(!state.store.invoices().exists("INV-003").unwrap());
    assert!(state.store.customers().load_all().unwrap().is_empty());
    let exports = dir.path().join("exports");
    assert!(!exports.exists() || fs::read_dir(&exports).unwrap().next().is_none());
}

#[test]
fn test_malformed_draft_is_validation_error() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);
    let draft = write_draft(&dir, "draft.json", "{ not json");

    let err = run(&state, Command::Generate { file: draft }).0.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert!(err.to_string().starts_with("Cannot read invoice draft"));

    let missing = dir.path().join("absent.json");
    let err = run(&state, Command::Generate { file: missing }).0.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[test]
fn test_regenerate_overwrites_artifacts() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);
    state
        .store
        .invoices()
        .save(&saved_invoice("INV-010", "Acme", (2024, 5, 2)))
        .unwrap();

    let (result, output) = run(
        &state,
        Command::Regenerate {
            invoice_no: "INV-010".to_string(),
        },
    );
    result.unwrap();
    assert!(output.contains("Invoice INV-010 generated"));

    let csv = dir.path().join("exports/invoice_INV-010.csv");
    let first = fs::read(&csv).unwrap();
    run(
        &state,
        Command::Regenerate {
            invoice_no: "INV-010".to_string(),
        },
    )
    .0
    .unwrap();
    assert_eq!(fs::read(&csv).unwrap(), first);
}

#[test]
fn test_regenerate_unknown_invoice() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let err = run(
        &state,
        Command::Regenerate {
            invoice_no: "INV-404".to_string(),
        },
    )
    .0
    .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.code().exit_code(), 3);
}

#[test]
fn test_show_prints_figures() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);
    state
        .store
        .invoices()
        .save(&saved_invoice("INV-011", "Acme", (2024, 5, 2)))
        .unwrap();

    let mut out = Vec::new();
    invoice::show(&state, "INV-011", &mut out).unwrap();
    let output = String::from_utf8(out).unwrap();

    assert!(output.contains("Invoice: INV-011"));
    assert!(output
        .contains("Granules [3907] - Qty: 2.0 @ ₹50.00 = ₹100.00 + tax ₹18.00 = ₹118.00"));
    assert!(output.contains("Subtotal: ₹100.00"));
    assert!(output.contains("CGST @9%: ₹9.00"));
    assert!(output.contains("SGST @9%: ₹9.00"));
    assert!(output.contains("Total Amount: ₹118.00"));
}

#[test]
fn test_search_newest_first() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);
    let invoices = state.store.invoices();
    invoices.save(&saved_invoice("INV-020", "Acme Traders", (2024, 3, 1))).unwrap();
    invoices.save(&saved_invoice("INV-021", "Acme Traders", (2024, 4, 1))).unwrap();
    invoices.save(&saved_invoice("INV-022", "Bharat Plastics", (2024, 4, 2))).unwrap();

    let mut out = Vec::new();
    let count = invoice::search(&state, &InvoiceQuery::term("acme"), &mut out).unwrap();
    let output = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(count, 2);
    assert_eq!(
        lines,
        vec![
            "Invoice: INV-021 | Customer: Acme Traders | Date: 2024-04-01 | Total: ₹118.00",
            "Invoice: INV-020 | Customer: Acme Traders | Date: 2024-03-01 | Total: ₹118.00",
        ]
    );

    let from = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
    let mut out = Vec::new();
    let count = invoice::search(&state, &InvoiceQuery::default().from(from), &mut out).unwrap();
    assert_eq!(count, 1);
    assert!(String::from_utf8(out).unwrap().contains("INV-022"));
}

#[test]
fn test_search_no_matches() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let (result, output) = run(
        &state,
        Command::Search {
            term: Some("nobody".to_string()),
            from: None,
            to: None,
        },
    );
    result.unwrap();
    assert_eq!(output, "No matching invoices found.\n");
}

#[test]
fn test_item_add_then_update() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);
    let add = |rate| ItemAction::Add {
        description: "Recycled PET Flakes".to_string(),
        hsn: "3915".to_string(),
        rate,
    };

    let (result, output) = run(&state, Command::Items { action: add(dec!(45.00)) });
    result.unwrap();
    assert_eq!(output, "Added item Recycled PET Flakes\n");

    let (result, output) = run(&state, Command::Items { action: add(dec!(47.50)) });
    result.unwrap();
    assert_eq!(output, "Updated item Recycled PET Flakes\n");

    let (result, output) = run(&state, Command::Items { action: ItemAction::List });
    result.unwrap();
    assert_eq!(output, "Recycled PET Flakes | HSN: 3915 | Rate: ₹47.50\n");
}

#[test]
fn test_item_add_rejects_negative_rate() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);
    let mut out = Vec::new();

    let err = kosh_cli::commands::master::add_item(&state, "Flakes", "3915", dec!(-1), &mut out)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert!(state.store.items().load_all().unwrap().is_empty());
}

#[test]
fn test_customer_list() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let (_, output) = run(&state, Command::Customers { action: CustomerAction::List });
    assert_eq!(output, "No customers saved.\n");

    let mut out = Vec::new();
    let outcome = kosh_cli::commands::master::add_customer(
        &state,
        CustomerArgs {
            name: "  Acme Traders ".to_string(),
            bill_to: None,
            ship_to: None,
            mobile: Some("9876543210".to_string()),
            gstin: Some("07AAACA1111A1Z1".to_string()),
            pan: None,
            state: None,
        },
        &mut out,
    )
    .unwrap();
    assert_eq!(outcome, UpsertOutcome::Inserted);

    let (_, output) = run(&state, Command::Customers { action: CustomerAction::List });
    assert_eq!(
        output,
        "Acme Traders | GSTIN: 07AAACA1111A1Z1 | Mobile: 9876543210\n"
    );
}
