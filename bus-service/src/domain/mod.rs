//! Domain types for the bus service.
//!
//! Value types (phone numbers, postal codes, route codes, offsets) enforce
//! their invariants at construction time. Record types are the rows the
//! record store owns; this crate only reads them and returns derived values.

mod bus_stop;
mod driver;
mod hire_date;
mod name;
mod phone;
mod postal_code;
mod province;
mod route;
mod schedule;

pub use bus_stop::{BusStop, location_hash};
pub use driver::{Driver, DriverAssignment};
pub use hire_date::{HireDateError, parse_date, validate_not_in_future};
pub use name::{capitalize, full_name};
pub use phone::{InvalidPhoneNumber, PhoneNumber, format_phone_number, validate_phone_number};
pub use postal_code::{
    InvalidPostalCode, POSTAL_CODE_INFO, PostalCode, format_postal_code, validate_postal_code,
};
pub use province::{InvalidProvinceCode, Province, ProvinceCode};
pub use route::{BusRoute, InvalidOffset, InvalidRouteCode, OffsetMinutes, RouteCode, RouteStop};
pub use schedule::{RouteSchedule, TimeError, parse_start_time};
