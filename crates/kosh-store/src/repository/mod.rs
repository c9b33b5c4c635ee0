//! # Repositories
//!
//! File-backed repositories, one per record kind.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI command                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.invoices().save(&invoice)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InvoiceRepository ── serde_json ──► invoices/<no>.json                │
//! │                                                                         │
//! │  store.customers().upsert(customer)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MasterRepository<Customer> ── load all, replace, rewrite ──►          │
//! │                                customers.json                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod invoice;
pub mod master;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};

/// Reads a JSON file; a missing file is `Ok(None)`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StoreError::serialization(path, e))
}

/// Writes pretty-printed UTF-8 JSON, replacing any existing file.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let mut json =
        serde_json::to_string_pretty(value).map_err(|e| StoreError::serialization(path, e))?;
    json.push('\n');
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    fs::write(path, json).map_err(|e| StoreError::io(path, e))
}
