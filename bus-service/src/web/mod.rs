//! Web layer for the bus service.
//!
//! Server-rendered pages for drivers, bus stops, routes, route stops and
//! route schedules.

mod bus_routes;
mod bus_stops;
mod drivers;
mod error;
mod route_schedules;
mod route_stops;
mod routes;
mod session;
mod state;
pub mod templates;

pub use error::AppError;
pub use routes::create_router;
pub use session::CookiePreferences;
pub use state::AppState;
