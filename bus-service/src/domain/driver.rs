//! Driver records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PhoneNumber, PostalCode, ProvinceCode, RouteCode};

/// A bus driver, as stored after normalization and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Always `"{last_name}, {first_name}"`
    pub full_name: String,
    pub home_phone: PhoneNumber,
    #[serde(default)]
    pub work_phone: Option<PhoneNumber>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<PostalCode>,
    pub province_code: ProvinceCode,
    pub date_hired: NaiveDate,
}

/// A route a driver is assigned to drive.
///
/// A driver cannot be deleted while any assignment refers to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverAssignment {
    pub driver_id: i32,
    pub route_code: RouteCode,
}
