//! # Master Data Repository
//!
//! Customer and item lists kept only to pre-fill the invoice form.
//!
//! Each list lives in a single JSON array file. The file is read and
//! rewritten as a whole; there is no delete and no referential link from
//! invoices back to master records.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use kosh_core::MasterRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::{read_json, write_json};
use crate::error::StoreResult;

/// What [`MasterRepository::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record had the key; appended.
    Inserted,
    /// A record with the same key was replaced in place.
    Updated,
}

/// Repository over one master-data file.
///
/// ## Usage
/// ```rust,ignore
/// let customers = store.customers();
///
/// customers.upsert(Customer::named("Acme Traders"))?;
/// let acme = customers.find("Acme Traders")?;
/// ```
#[derive(Debug, Clone)]
pub struct MasterRepository<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T> MasterRepository<T>
where
    T: MasterRecord + Serialize + DeserializeOwned,
{
    /// Creates a repository over a master-data file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        MasterRepository {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every record in file order. A missing file is an empty list.
    pub fn load_all(&self) -> StoreResult<Vec<T>> {
        let records: Vec<T> = read_json(&self.path)?.unwrap_or_default();
        debug!(kind = T::KIND, count = records.len(), "Loaded master data");
        Ok(records)
    }

    /// Finds a record by exact key.
    pub fn find(&self, key: &str) -> StoreResult<Option<T>> {
        Ok(self.load_all()?.into_iter().find(|r| r.key() == key))
    }

    /// Replaces the record with the same key, or appends a new one.
    pub fn upsert(&self, record: T) -> StoreResult<UpsertOutcome> {
        let mut records = self.load_all()?;
        let key = record.key().to_string();

        let outcome = match records.iter_mut().find(|r| r.key() == key) {
            Some(existing) => {
                *existing = record;
                UpsertOutcome::Updated
            }
            None => {
                records.push(record);
                UpsertOutcome::Inserted
            }
        };

        self.save_all(&records)?;
        info!(kind = T::KIND, key = %key, outcome = ?outcome, "Saved master record");
        Ok(outcome)
    }

    /// Rewrites the whole file.
    pub fn save_all(&self, records: &[T]) -> StoreResult<()> {
        write_json(&self.path, records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kosh_core::{Customer, Item};
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    fn flakes(rate: rust_decimal::Decimal) -> Item {
        Item {
            description: "Recycled PET Flakes".to_string(),
            tax_code: "3915".to_string(),
            rate,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let repo: MasterRepository<Customer> =
            MasterRepository::new(dir.path().join("customers.json"));
        assert!(repo.load_all().unwrap().is_empty());
        assert_eq!(repo.find("Acme").unwrap(), None);
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let dir = TempDir::new().unwrap();
        let repo: MasterRepository<Item> = MasterRepository::new(dir.path().join("items.json"));

        assert_eq!(repo.upsert(flakes(dec!(45))).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(repo.upsert(flakes(dec!(47.5))).unwrap(), UpsertOutcome::Updated);

        let all = repo.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].rate, dec!(47.5));
    }

    #[test]
    fn test_upsert_keeps_order() {
        let dir = TempDir::new().unwrap();
        let repo: MasterRepository<Customer> =
            MasterRepository::new(dir.path().join("customers.json"));

        for name in ["Acme", "Globex", "Initech"] {
            repo.upsert(Customer::named(name)).unwrap();
        }
        let mut globex = Customer::named("Globex");
        globex.bill_to = Some("Plot 4, Noida".to_string());
        repo.upsert(globex).unwrap();

        let names: Vec<String> = repo.load_all().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Acme", "Globex", "Initech"]);
        assert_eq!(
            repo.find("Globex").unwrap().unwrap().bill_to.as_deref(),
            Some("Plot 4, Noida")
        );
    }

    #[test]
    fn test_reads_list_of_bare_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("customers.json");
        fs::write(&path, r#"["Acme", "Globex"]"#).unwrap();

        let repo: MasterRepository<Customer> = MasterRepository::new(&path);
        let all = repo.load_all().unwrap();
        assert_eq!(all, vec![Customer::named("Acme"), Customer::named("Globex")]);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        fs::write(&path, "{}").unwrap();

        let repo: MasterRepository<Item> = MasterRepository::new(&path);
        assert!(repo.load_all().is_err());
    }
}
