//! In-process record store.

use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::error::StoreError;
use super::record::Record;
use super::snapshot::Snapshot;
use super::table::{Stored, Table};
use super::RecordStore;
use crate::domain::{
    BusRoute, BusStop, Driver, DriverAssignment, Province, RouteCode, RouteSchedule, RouteStop,
};
use crate::reference::ProvinceLookup;

/// Every table in the store.
#[derive(Debug, Default)]
pub struct Tables {
    pub(super) provinces: Table<Province>,
    pub(super) drivers: Table<Driver>,
    pub(super) bus_routes: Table<BusRoute>,
    pub(super) bus_stops: Table<BusStop>,
    pub(super) route_stops: Table<RouteStop>,
    pub(super) route_schedules: Table<RouteSchedule>,
    pub(super) assignments: Vec<DriverAssignment>,
}

/// A record store held in memory behind a lock.
///
/// Every operation takes the lock for its own duration only, so each
/// insert, update or delete is atomic with its referential checks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot, applying the same reference checks as
    /// ordinary inserts.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let store = Self::new();
        for province in snapshot.provinces {
            store.insert(province)?;
        }
        for route in snapshot.bus_routes {
            store.insert(route)?;
        }
        for stop in snapshot.bus_stops {
            store.insert(stop)?;
        }
        for route_stop in snapshot.route_stops {
            store.insert(route_stop)?;
        }
        for schedule in snapshot.route_schedules {
            store.insert(schedule)?;
        }
        for driver in snapshot.drivers {
            store.insert(driver)?;
        }
        for assignment in snapshot.assignments {
            store.assign(assignment)?;
        }
        Ok(store)
    }

    /// Read a JSON snapshot from `path`.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let store = Self::from_snapshot(Snapshot::load(path)?)?;
        tracing::info!(path = %path.display(), "loaded record store snapshot");
        Ok(store)
    }

    /// Assign a driver to a route.
    pub fn assign(&self, assignment: DriverAssignment) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if !tables.drivers.contains(&assignment.driver_id) {
            return Err(StoreError::NotFound {
                entity: Driver::ENTITY,
                id: assignment.driver_id.to_string(),
            });
        }
        if !tables.bus_routes.contains(&assignment.route_code) {
            return Err(StoreError::NotFound {
                entity: BusRoute::ENTITY,
                id: assignment.route_code.to_string(),
            });
        }
        if !tables.assignments.contains(&assignment) {
            tables.assignments.push(assignment);
        }
        Ok(())
    }

    /// Routes a driver is assigned to, in route order.
    pub fn driver_routes(&self, driver_id: i32) -> Result<Vec<RouteCode>, StoreError> {
        let tables = self.read()?;
        let mut routes: Vec<RouteCode> = tables
            .assignments
            .iter()
            .filter(|a| a.driver_id == driver_id)
            .map(|a| a.route_code.clone())
            .collect();
        routes.sort();
        Ok(routes)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".into()))
    }
}

impl RecordStore for MemoryStore {
    fn fetch<T: Record>(&self, id: &T::Id) -> Result<Stored<T>, StoreError> {
        let tables = self.read()?;
        T::table(&tables)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: T::ENTITY,
                id: id.to_string(),
            })
    }

    fn fetch_where<T: Record>(
        &self,
        predicate: impl Fn(&T) -> bool,
    ) -> Result<Vec<Stored<T>>, StoreError> {
        let tables = self.read()?;
        Ok(T::table(&tables)
            .iter()
            .filter(|row| predicate(&row.record))
            .cloned()
            .collect())
    }

    fn insert<T: Record>(&self, record: T) -> Result<Stored<T>, StoreError> {
        let mut tables = self.write()?;
        record.check_references(&tables)?;
        let stored = T::table_mut(&mut tables).insert(record)?;
        tracing::debug!(entity = T::ENTITY, id = %stored.record.id(), "inserted");
        Ok(stored)
    }

    fn update<T: Record>(
        &self,
        record: T,
        expected_version: u64,
    ) -> Result<Stored<T>, StoreError> {
        let mut tables = self.write()?;
        record.check_references(&tables)?;
        let stored = T::table_mut(&mut tables).update(record, expected_version)?;
        tracing::debug!(
            entity = T::ENTITY,
            id = %stored.record.id(),
            version = stored.version,
            "updated"
        );
        Ok(stored)
    }

    fn delete<T: Record>(&self, id: &T::Id) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if !T::table(&tables).contains(id) {
            return Err(StoreError::NotFound {
                entity: T::ENTITY,
                id: id.to_string(),
            });
        }
        T::before_delete(id, &mut tables)?;
        T::table_mut(&mut tables).remove(id);
        tracing::debug!(entity = T::ENTITY, %id, "deleted");
        Ok(())
    }
}

impl ProvinceLookup for MemoryStore {
    fn province_exists(&self, code: &str) -> Result<bool, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .provinces
            .iter()
            .any(|row| row.record.code.as_str() == code))
    }
}
