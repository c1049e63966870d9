//! Per-stop schedules.
//!
//! A route's base schedule lists when the route starts. A stop on that route
//! is reached a fixed number of minutes later, so its arrival times are the
//! base start times shifted by the stop's offset.

mod loader;
mod resolver;

pub use loader::{RouteStopSchedule, load_base_schedule, load_route_stop_schedule};
pub use resolver::{EffectiveDeparture, resolve_effective_schedule};
