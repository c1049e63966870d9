//! The record store.
//!
//! All entities are owned by the store. Callers read versioned copies,
//! derive what they need, and write back through [`RecordStore`]; nothing
//! is cached between calls. [`MemoryStore`] is the in-process
//! implementation, seeded from a JSON [`Snapshot`].

mod error;
mod memory;
mod record;
mod snapshot;
mod table;

pub use error::StoreError;
pub use memory::{MemoryStore, Tables};
pub use record::Record;
pub use snapshot::Snapshot;
pub use table::{Stored, Table};

/// Operations the rest of the crate needs from a record store.
pub trait RecordStore {
    /// Fetch one record by id.
    fn fetch<T: Record>(&self, id: &T::Id) -> Result<Stored<T>, StoreError>;

    /// Fetch every record matching `predicate`, in id order.
    fn fetch_where<T: Record>(
        &self,
        predicate: impl Fn(&T) -> bool,
    ) -> Result<Vec<Stored<T>>, StoreError>;

    /// Insert a new record, assigning an id where the store owns them.
    fn insert<T: Record>(&self, record: T) -> Result<Stored<T>, StoreError>;

    /// Replace a record, provided nobody changed it since `expected_version`
    /// was read.
    fn update<T: Record>(&self, record: T, expected_version: u64)
    -> Result<Stored<T>, StoreError>;

    /// Delete a record, applying the store's referential rules.
    fn delete<T: Record>(&self, id: &T::Id) -> Result<(), StoreError>;

    /// Fetch every record, ordered by `key`. Ties keep id order.
    fn fetch_all_ordered_by<T: Record, K: Ord>(
        &self,
        key: impl Fn(&T) -> K,
    ) -> Result<Vec<Stored<T>>, StoreError> {
        let mut rows = self.fetch_where(|_: &T| true)?;
        rows.sort_by(|a, b| key(&a.record).cmp(&key(&b.record)));
        Ok(rows)
    }

    /// Whether any record matches `predicate`.
    fn exists<T: Record>(&self, predicate: impl Fn(&T) -> bool) -> Result<bool, StoreError> {
        Ok(!self.fetch_where(predicate)?.is_empty())
    }
}
