//! JSON snapshots used to seed a [`MemoryStore`](super::MemoryStore).

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::StoreError;
use crate::domain::{BusRoute, BusStop, Driver, DriverAssignment, Province, RouteSchedule, RouteStop};

/// Every record the store holds, in a shape serde can read and write.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub provinces: Vec<Province>,
    pub bus_routes: Vec<BusRoute>,
    pub bus_stops: Vec<BusStop>,
    pub route_stops: Vec<RouteStop>,
    pub route_schedules: Vec<RouteSchedule>,
    pub drivers: Vec<Driver>,
    pub assignments: Vec<DriverAssignment>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot = Snapshot::from_json(r#"{"provinces":[{"code":"ON","name":"Ontario"}]}"#)
            .unwrap();
        assert_eq!(snapshot.provinces.len(), 1);
        assert!(snapshot.drivers.is_empty());
    }

    #[test]
    fn invalid_records_rejected() {
        let err = Snapshot::from_json(r#"{"provinces":[{"code":"Ontario","name":"Ontario"}]}"#)
            .unwrap_err();
        assert!(matches!(err, StoreError::Snapshot(_)));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
