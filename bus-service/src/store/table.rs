//! Versioned rows of one record type.

use std::collections::BTreeMap;

use super::error::StoreError;
use super::record::Record;

/// A record together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored<T> {
    pub version: u64,
    pub record: T,
}

/// All rows of one record type, keyed by id.
#[derive(Debug)]
pub struct Table<T: Record> {
    rows: BTreeMap<T::Id, Stored<T>>,
    next_id: i32,
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Record> Table<T> {
    pub fn get(&self, id: &T::Id) -> Option<&Stored<T>> {
        self.rows.get(id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.rows.contains_key(id)
    }

    /// Rows in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Stored<T>> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert a new row at version 1.
    ///
    /// Generated ids of 0 are replaced with the next free id.
    pub fn insert(&mut self, mut record: T) -> Result<Stored<T>, StoreError> {
        if let Some(id) = record.generated_id() {
            if *id == 0 {
                *id = self.next_id;
            }
            self.next_id = self.next_id.max(*id + 1);
        }

        let id = record.id();
        if self.rows.contains_key(&id) {
            return Err(StoreError::Duplicate {
                entity: T::ENTITY,
                id: id.to_string(),
            });
        }

        let stored = Stored {
            version: 1,
            record,
        };
        self.rows.insert(id, stored.clone());
        Ok(stored)
    }

    /// Replace a row if it is still at `expected_version`.
    pub fn update(&mut self, record: T, expected_version: u64) -> Result<Stored<T>, StoreError> {
        let id = record.id();
        let Some(row) = self.rows.get_mut(&id) else {
            return Err(StoreError::Deleted {
                entity: T::ENTITY,
                id: id.to_string(),
            });
        };

        if row.version != expected_version {
            return Err(StoreError::StaleVersion {
                entity: T::ENTITY,
                id: id.to_string(),
            });
        }

        row.version += 1;
        row.record = record;
        Ok(row.clone())
    }

    pub fn remove(&mut self, id: &T::Id) -> Option<Stored<T>> {
        self.rows.remove(id)
    }

    /// Remove every row matching `predicate`, returning how many went.
    pub fn remove_where(&mut self, predicate: impl Fn(&T) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, row| !predicate(&row.record));
        before - self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BusStop, OffsetMinutes, RouteCode, RouteStop};

    fn route_stop(id: i32, stop_number: i32) -> RouteStop {
        RouteStop {
            id,
            route_code: RouteCode::parse("12").unwrap(),
            stop_number,
            offset: OffsetMinutes::new(5).unwrap(),
        }
    }

    #[test]
    fn insert_assigns_ids() {
        let mut table = Table::<RouteStop>::default();
        let first = table.insert(route_stop(0, 1)).unwrap();
        let second = table.insert(route_stop(0, 2)).unwrap();
        assert_eq!(first.record.id, 1);
        assert_eq!(second.record.id, 2);
        assert_eq!(first.version, 1);
    }

    #[test]
    fn explicit_ids_advance_the_counter() {
        let mut table = Table::<RouteStop>::default();
        table.insert(route_stop(10, 1)).unwrap();
        let next = table.insert(route_stop(0, 2)).unwrap();
        assert_eq!(next.record.id, 11);
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut table = Table::<BusStop>::default();
        table.insert(BusStop::new(5, "King St", true)).unwrap();
        let err = table.insert(BusStop::new(5, "Queen St", true)).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[test]
    fn update_checks_version() {
        let mut table = Table::<BusStop>::default();
        table.insert(BusStop::new(5, "King St", true)).unwrap();

        let updated = table.update(BusStop::new(5, "Queen St", true), 1).unwrap();
        assert_eq!(updated.version, 2);

        let err = table
            .update(BusStop::new(5, "Erb St", true), 1)
            .unwrap_err();
        assert!(matches!(err, StoreError::StaleVersion { .. }));
        assert_eq!(table.get(&5).unwrap().record.location(), "Queen St");
    }

    #[test]
    fn update_of_removed_row_is_deleted() {
        let mut table = Table::<BusStop>::default();
        table.insert(BusStop::new(5, "King St", true)).unwrap();
        table.remove(&5);
        let err = table.update(BusStop::new(5, "King St", true), 1).unwrap_err();
        assert!(matches!(err, StoreError::Deleted { .. }));
    }

    #[test]
    fn remove_where_counts() {
        let mut table = Table::<RouteStop>::default();
        table.insert(route_stop(0, 1)).unwrap();
        table.insert(route_stop(0, 1)).unwrap();
        table.insert(route_stop(0, 2)).unwrap();
        assert_eq!(table.remove_where(|rs| rs.stop_number == 1), 2);
        assert_eq!(table.len(), 1);
    }
}
