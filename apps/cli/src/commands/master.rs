//! # Master Data Commands
//!
//! Customers and items exist only to pre-fill drafts; there is no delete.

use std::io::Write;

use kosh_core::validation::validate_customer_name;
use kosh_core::{Customer, CustomerTaxDetails, Item, ValidationError};
use kosh_store::UpsertOutcome;
use rust_decimal::Decimal;

use crate::cli::CustomerArgs;
use crate::error::AppResult;
use crate::state::AppState;

pub fn list_customers(state: &AppState, out: &mut impl Write) -> AppResult<usize> {
    let customers = state.store.customers().load_all()?;
    if customers.is_empty() {
        writeln!(out, "No customers saved.")?;
    }
    for customer in &customers {
        let details = &customer.tax_details;
        let extra: Vec<String> = [("GSTIN", &details.gstin), ("Mobile", &details.mobile)]
            .into_iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
            .collect();
        if extra.is_empty() {
            writeln!(out, "{}", customer.name)?;
        } else {
            writeln!(out, "{} | {}", customer.name, extra.join(" | "))?;
        }
    }
    Ok(customers.len())
}

pub fn add_customer(
    state: &AppState,
    args: CustomerArgs,
    out: &mut impl Write,
) -> AppResult<UpsertOutcome> {
    let name = args.name.trim().to_string();
    validate_customer_name(&name)?;

    let customer = Customer {
        name,
        bill_to: args.bill_to,
        ship_to: args.ship_to,
        tax_details: CustomerTaxDetails {
            mobile: args.mobile,
            gstin: args.gstin,
            pan: args.pan,
            state: args.state,
        },
    };
    let label = customer.name.clone();
    let outcome = state.store.customers().upsert(customer)?;
    writeln!(out, "{} customer {label}", outcome_verb(outcome))?;
    Ok(outcome)
}

pub fn list_items(state: &AppState, out: &mut impl Write) -> AppResult<usize> {
    let items = state.store.items().load_all()?;
    if items.is_empty() {
        writeln!(out, "No items saved.")?;
    }
    for item in &items {
        writeln!(
            out,
            "{} | HSN: {} | Rate: {}",
            item.description,
            item.tax_code,
            state.currency().format_decimal(item.rate)
        )?;
    }
    Ok(items.len())
}

pub fn add_item(
    state: &AppState,
    description: &str,
    hsn: &str,
    rate: Decimal,
    out: &mut impl Write,
) -> AppResult<UpsertOutcome> {
    let item = Item {
        description: description.trim().to_string(),
        tax_code: hsn.trim().to_string(),
        rate,
    };
    if item.description.is_empty() {
        return Err(ValidationError::required("description").into());
    }
    if item.tax_code.is_empty() {
        return Err(ValidationError::required("hsn").into());
    }
    if rate.is_sign_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "rate".to_string(),
        }
        .into());
    }

    let label = item.description.clone();
    let outcome = state.store.items().upsert(item)?;
    writeln!(out, "{} item {label}", outcome_verb(outcome))?;
    Ok(outcome)
}

fn outcome_verb(outcome: UpsertOutcome) -> &'static str {
    match outcome {
        UpsertOutcome::Inserted => "Added",
        UpsertOutcome::Updated => "Updated",
    }
}
