//! # Invoice Repository
//!
//! Invoice snapshots: one JSON file per invoice number.
//!
//! ## Key Operations
//! - Save / load by invoice number (last write wins)
//! - Full listing by directory scan
//! - Search by free-text term and date range
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Invoice Search Works                             │
//! │                                                                         │
//! │  User types: "poly"   from: 2024-04-01   to: (none)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  scan invoices/*.json ── skip unreadable files (warn)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  term matches customer | invoice_no | ISO date   (case-insensitive)    │
//! │  date within [from, to]                          (inclusive)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort: newest date first, then invoice number                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use kosh_core::validation::validate_invoice_number;
use kosh_core::Invoice;
use tracing::{debug, info, warn};

use super::{read_json, write_json};
use crate::error::{StoreError, StoreResult};

const SNAPSHOT_EXTENSION: &str = "json";

// =============================================================================
// Query
// =============================================================================

/// Filter for [`InvoiceRepository::search`]. The default matches everything.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use kosh_store::InvoiceQuery;
///
/// let query = InvoiceQuery::term("acme")
///     .from(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
/// assert_eq!(query.term.as_deref(), Some("acme"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceQuery {
    /// Substring matched against customer, invoice number and ISO date.
    pub term: Option<String>,
    /// Earliest date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest date, inclusive.
    pub to: Option<NaiveDate>,
}

impl InvoiceQuery {
    /// Query with a search term and no date bounds.
    pub fn term(term: impl Into<String>) -> Self {
        InvoiceQuery {
            term: Some(term.into()),
            ..Default::default()
        }
    }

    /// Sets the earliest date.
    pub fn from(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    /// Sets the latest date.
    pub fn to(mut self, date: NaiveDate) -> Self {
        self.to = Some(date);
        self
    }

    /// Checks one invoice against the filter.
    pub fn matches(&self, invoice: &Invoice) -> bool {
        if self.from.is_some_and(|from| invoice.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| invoice.date > to) {
            return false;
        }

        let term = match self.term.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return true,
        };
        invoice.customer.to_lowercase().contains(&term)
            || invoice.invoice_no.to_lowercase().contains(&term)
            || invoice.date.to_string().contains(&term)
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice snapshots.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.invoices();
///
/// repo.save(&invoice)?;
/// let again = repo.load("INV-001")?;
/// let hits = repo.search(&InvoiceQuery::term("acme"))?;
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    dir: PathBuf,
}

impl InvoiceRepository {
    /// Creates a repository over a snapshot directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        InvoiceRepository { dir: dir.into() }
    }

    /// Snapshot directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot path for an invoice number.
    ///
    /// Fails with [`StoreError::InvalidKey`] if the number is not a safe
    /// file name stem.
    pub fn path_for(&self, invoice_no: &str) -> StoreResult<PathBuf> {
        validate_invoice_number(invoice_no).map_err(|e| StoreError::InvalidKey {
            key: invoice_no.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self
            .dir
            .join(format!("{invoice_no}.{SNAPSHOT_EXTENSION}")))
    }

    /// Writes the snapshot, replacing any earlier one with the same number.
    pub fn save(&self, invoice: &Invoice) -> StoreResult<PathBuf> {
        let path = self.path_for(&invoice.invoice_no)?;
        write_json(&path, invoice)?;
        info!(invoice_no = %invoice.invoice_no, path = %path.display(), "Saved invoice snapshot");
        Ok(path)
    }

    /// Loads a snapshot by invoice number.
    pub fn load(&self, invoice_no: &str) -> StoreResult<Invoice> {
        let path = self.path_for(invoice_no)?;
        debug!(invoice_no = %invoice_no, "Loading invoice snapshot");
        read_json(&path)?.ok_or_else(|| StoreError::not_found("invoice", invoice_no))
    }

    /// True if a snapshot exists for the number.
    pub fn exists(&self, invoice_no: &str) -> StoreResult<bool> {
        Ok(self.path_for(invoice_no)?.is_file())
    }

    /// Loads every readable snapshot, in directory order.
    ///
    /// Files that are not `*.json` are ignored (documents share the
    /// directory). Snapshots that fail to parse are skipped with a warning.
    pub fn list(&self) -> StoreResult<Vec<Invoice>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut invoices = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.dir, e))?.path();
            if !is_snapshot(&path) {
                continue;
            }
            match read_json::<Invoice>(&path) {
                Ok(Some(invoice)) => invoices.push(invoice),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot"),
            }
        }

        debug!(count = invoices.len(), "Listed invoice snapshots");
        Ok(invoices)
    }

    /// Returns snapshots matching the query, newest first.
    pub fn search(&self, query: &InvoiceQuery) -> StoreResult<Vec<Invoice>> {
        let mut hits: Vec<Invoice> = self
            .list()?
            .into_iter()
            .filter(|invoice| query.matches(invoice))
            .collect();
        hits.sort_by(newest_first);

        debug!(term = ?query.term, count = hits.len(), "Invoice search finished");
        Ok(hits)
    }
}

fn is_snapshot(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SNAPSHOT_EXTENSION))
}

fn newest_first(a: &Invoice, b: &Invoice) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| a.invoice_no.cmp(&b.invoice_no))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kosh_core::LineItem;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice(no: &str, customer: &str, on: NaiveDate) -> Invoice {
        Invoice::dated(
            no,
            on,
            customer,
            vec![LineItem::new("Recycled PET Flakes", "3915", dec!(100), dec!(45))],
        )
    }

    fn seeded() -> (TempDir, InvoiceRepository) {
        let dir = TempDir::new().unwrap();
        let repo = InvoiceRepository::new(dir.path().join("invoices"));
        repo.save(&invoice("INV-001", "Green Polymers", date(2024, 4, 1)))
            .unwrap();
        repo.save(&invoice("INV-002", "Acme Traders", date(2024, 5, 10)))
            .unwrap();
        repo.save(&invoice("INV-003", "Green Polymers", date(2024, 5, 10)))
            .unwrap();
        (dir, repo)
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, repo) = seeded();
        let loaded = repo.load("INV-002").unwrap();
        assert_eq!(loaded.customer, "Acme Traders");
        assert_eq!(loaded.items[0].rate, dec!(45));
        assert!(repo.exists("INV-002").unwrap());
    }

    #[test]
    fn test_save_overwrites() {
        let (_dir, repo) = seeded();
        repo.save(&invoice("INV-001", "Renamed Buyer", date(2024, 4, 2)))
            .unwrap();
        assert_eq!(repo.load("INV-001").unwrap().customer, "Renamed Buyer");
        assert_eq!(repo.list().unwrap().len(), 3);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let (_dir, repo) = seeded();
        let err = repo.load("INV-404").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unsafe_number_is_rejected() {
        let (_dir, repo) = seeded();
        let err = repo.load("../secrets").unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { .. }));
    }

    #[test]
    fn test_list_skips_documents_and_corrupt_files() {
        let (_dir, repo) = seeded();
        fs::write(repo.dir().join("Invoice_INV-001.pdf"), b"%PDF").unwrap();
        fs::write(repo.dir().join("broken.json"), b"{ not json").unwrap();

        assert_eq!(repo.list().unwrap().len(), 3);
    }

    #[test]
    fn test_list_on_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let repo = InvoiceRepository::new(dir.path().join("nope"));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_search_sorted_newest_first() {
        let (_dir, repo) = seeded();
        let all: Vec<String> = repo
            .search(&InvoiceQuery::default())
            .unwrap()
            .into_iter()
            .map(|i| i.invoice_no)
            .collect();
        assert_eq!(all, ["INV-002", "INV-003", "INV-001"]);
    }

    #[test]
    fn test_search_by_term() {
        let (_dir, repo) = seeded();

        let hits = repo.search(&InvoiceQuery::term("green")).unwrap();
        assert_eq!(hits.len(), 2);

        let hits = repo.search(&InvoiceQuery::term("inv-002")).unwrap();
        assert_eq!(hits[0].customer, "Acme Traders");

        let hits = repo.search(&InvoiceQuery::term("2024-04")).unwrap();
        assert_eq!(hits.len(), 1);

        assert!(repo.search(&InvoiceQuery::term("nobody")).unwrap().is_empty());
    }

    #[test]
    fn test_search_by_date_range_inclusive() {
        let (_dir, repo) = seeded();

        let query = InvoiceQuery::default().from(date(2024, 5, 10));
        assert_eq!(repo.search(&query).unwrap().len(), 2);

        let query = InvoiceQuery::default().to(date(2024, 4, 1));
        assert_eq!(repo.search(&query).unwrap().len(), 1);

        let query = InvoiceQuery::term("green")
            .from(date(2024, 4, 2))
            .to(date(2024, 12, 31));
        let hits = repo.search(&query).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].invoice_no, "INV-003");
    }
}
