//! Per-entity storage rules.

use std::fmt;

use super::error::StoreError;
use super::memory::Tables;
use super::table::Table;
use crate::domain::{BusRoute, BusStop, Driver, Province, RouteCode, RouteSchedule, RouteStop};

/// An entity the record store can hold.
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    type Id: Ord + Clone + fmt::Debug + fmt::Display;

    /// Name used in error messages.
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    /// The id field, for records whose ids the store hands out. An id of 0
    /// is replaced on insert.
    fn generated_id(&mut self) -> Option<&mut i32> {
        None
    }

    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Check that every record this one refers to exists.
    fn check_references(&self, _tables: &Tables) -> Result<(), StoreError> {
        Ok(())
    }

    /// Apply delete rules for dependent records before `id` is removed.
    fn before_delete(_id: &Self::Id, _tables: &mut Tables) -> Result<(), StoreError> {
        Ok(())
    }
}

fn referential<T: Record>(id: &T::Id, reason: impl Into<String>) -> StoreError {
    StoreError::Referential {
        entity: T::ENTITY,
        id: id.to_string(),
        reason: reason.into(),
    }
}

fn route_exists(tables: &Tables, code: &RouteCode) -> bool {
    tables.bus_routes.contains(code)
}

impl Record for Province {
    type Id = crate::domain::ProvinceCode;
    const ENTITY: &'static str = "province";

    fn id(&self) -> Self::Id {
        self.code
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.provinces
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.provinces
    }

    fn before_delete(id: &Self::Id, tables: &mut Tables) -> Result<(), StoreError> {
        if tables.drivers.iter().any(|d| d.record.province_code == *id) {
            return Err(referential::<Self>(id, "drivers still live in this province"));
        }
        Ok(())
    }
}

impl Record for Driver {
    type Id = i32;
    const ENTITY: &'static str = "driver";

    fn id(&self) -> i32 {
        self.id
    }

    fn generated_id(&mut self) -> Option<&mut i32> {
        Some(&mut self.id)
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.drivers
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.drivers
    }

    fn check_references(&self, tables: &Tables) -> Result<(), StoreError> {
        if !tables.provinces.contains(&self.province_code) {
            return Err(referential::<Self>(
                &self.id,
                format!("province {} does not exist", self.province_code),
            ));
        }
        Ok(())
    }

    fn before_delete(id: &i32, tables: &mut Tables) -> Result<(), StoreError> {
        if tables.assignments.iter().any(|a| a.driver_id == *id) {
            return Err(referential::<Self>(id, "driver is still assigned routes"));
        }
        Ok(())
    }
}

impl Record for BusRoute {
    type Id = RouteCode;
    const ENTITY: &'static str = "bus route";

    fn id(&self) -> RouteCode {
        self.code.clone()
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.bus_routes
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.bus_routes
    }

    fn before_delete(id: &RouteCode, tables: &mut Tables) -> Result<(), StoreError> {
        let used = tables.route_stops.iter().any(|rs| rs.record.route_code == *id)
            || tables.route_schedules.iter().any(|s| s.record.route_code == *id)
            || tables.assignments.iter().any(|a| a.route_code == *id);
        if used {
            return Err(referential::<Self>(
                id,
                "route still has stops, schedules or drivers",
            ));
        }
        Ok(())
    }
}

impl Record for BusStop {
    type Id = i32;
    const ENTITY: &'static str = "bus stop";

    fn id(&self) -> i32 {
        self.number()
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.bus_stops
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.bus_stops
    }

    /// A stop takes its route stops with it.
    fn before_delete(id: &i32, tables: &mut Tables) -> Result<(), StoreError> {
        let removed = tables.route_stops.remove_where(|rs| rs.stop_number == *id);
        if removed > 0 {
            tracing::debug!(stop = id, removed, "removed route stops with bus stop");
        }
        Ok(())
    }
}

impl Record for RouteStop {
    type Id = i32;
    const ENTITY: &'static str = "route stop";

    fn id(&self) -> i32 {
        self.id
    }

    fn generated_id(&mut self) -> Option<&mut i32> {
        Some(&mut self.id)
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.route_stops
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.route_stops
    }

    fn check_references(&self, tables: &Tables) -> Result<(), StoreError> {
        if !route_exists(tables, &self.route_code) {
            return Err(referential::<Self>(
                &self.id,
                format!("route {} does not exist", self.route_code),
            ));
        }
        if !tables.bus_stops.contains(&self.stop_number) {
            return Err(referential::<Self>(
                &self.id,
                format!("bus stop {} does not exist", self.stop_number),
            ));
        }
        Ok(())
    }
}

impl Record for RouteSchedule {
    type Id = i32;
    const ENTITY: &'static str = "route schedule";

    fn id(&self) -> i32 {
        self.id
    }

    fn generated_id(&mut self) -> Option<&mut i32> {
        Some(&mut self.id)
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.route_schedules
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.route_schedules
    }

    fn check_references(&self, tables: &Tables) -> Result<(), StoreError> {
        if !route_exists(tables, &self.route_code) {
            return Err(referential::<Self>(
                &self.id,
                format!("route {} does not exist", self.route_code),
            ));
        }
        Ok(())
    }
}
