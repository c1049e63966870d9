//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{BusRoute, BusStop, Driver, RouteSchedule};
use crate::schedule::EffectiveDeparture;
use crate::validation::DriverForm;

// ============================================================================
// Shared pages
// ============================================================================

/// Home page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// Drivers
// ============================================================================

#[derive(Template)]
#[template(path = "drivers/index.html")]
pub struct DriverListTemplate {
    pub drivers: Vec<DriverView>,
}

#[derive(Template)]
#[template(path = "drivers/show.html")]
pub struct DriverShowTemplate {
    pub driver: DriverView,
    pub routes: Vec<String>,
    /// Set on the delete confirmation page
    pub confirm_delete: bool,
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "drivers/form.html")]
pub struct DriverFormTemplate {
    pub title: String,
    pub action: String,
    pub fields: DriverFormView,
    pub errors: Vec<String>,
    pub message: Option<String>,
}

/// Driver view model for templates.
#[derive(Debug, Clone)]
pub struct DriverView {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub home_phone: String,
    pub work_phone: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub province: String,
    pub date_hired: String,
}

impl DriverView {
    pub fn from_driver(driver: &Driver) -> Self {
        Self {
            id: driver.id,
            first_name: driver.first_name.clone(),
            last_name: driver.last_name.clone(),
            full_name: driver.full_name.clone(),
            home_phone: driver.home_phone.to_string(),
            work_phone: driver.work_phone.map(|p| p.to_string()).unwrap_or_default(),
            street: driver.street.clone().unwrap_or_default(),
            city: driver.city.clone().unwrap_or_default(),
            postal_code: driver.postal_code.map(|c| c.to_string()).unwrap_or_default(),
            province: driver.province_code.to_string(),
            date_hired: driver.date_hired.format("%d %b %Y").to_string(),
        }
    }
}

/// Form values as typed (or as normalized after a failed submit).
#[derive(Debug, Clone, Default)]
pub struct DriverFormView {
    pub first_name: String,
    pub last_name: String,
    pub home_phone: String,
    pub work_phone: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub province_code: String,
    pub date_hired: String,
}

impl From<&DriverForm> for DriverFormView {
    fn from(form: &DriverForm) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            first_name: text(&form.first_name),
            last_name: text(&form.last_name),
            home_phone: text(&form.home_phone),
            work_phone: text(&form.work_phone),
            street: text(&form.street),
            city: text(&form.city),
            postal_code: text(&form.postal_code),
            province_code: text(&form.province_code),
            date_hired: text(&form.date_hired),
        }
    }
}

// ============================================================================
// Bus stops and routes
// ============================================================================

#[derive(Template)]
#[template(path = "bus_stops/index.html")]
pub struct BusStopListTemplate {
    pub stops: Vec<BusStopView>,
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "bus_stops/show.html")]
pub struct BusStopShowTemplate {
    pub stop: BusStopView,
    pub confirm_delete: bool,
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "bus_stops/form.html")]
pub struct BusStopFormTemplate {
    pub title: String,
    pub action: String,
    pub number: String,
    /// Stop numbers are fixed once created
    pub number_editable: bool,
    pub location: String,
    pub going_downtown: bool,
    pub errors: Vec<String>,
}

/// Bus stop view model for templates.
#[derive(Debug, Clone)]
pub struct BusStopView {
    pub number: i32,
    pub location: String,
    pub going_downtown: bool,
    pub location_hash: u32,
}

impl BusStopView {
    pub fn from_stop(stop: &BusStop) -> Self {
        Self {
            number: stop.number(),
            location: stop.location().to_string(),
            going_downtown: stop.going_downtown(),
            location_hash: stop.location_hash(),
        }
    }

    pub fn direction(&self) -> &'static str {
        if self.going_downtown {
            "Downtown"
        } else {
            "Away from downtown"
        }
    }
}

/// Route listing, also used as the route selector for a stop.
#[derive(Template)]
#[template(path = "bus_routes/index.html")]
pub struct BusRouteListTemplate {
    pub title: String,
    pub routes: Vec<BusRouteView>,
    pub message: Option<String>,
}

/// Bus route view model for templates.
#[derive(Debug, Clone)]
pub struct BusRouteView {
    pub code: String,
    pub name: String,
    /// Set when listing the routes that serve one stop
    pub route_stop_id: Option<i32>,
}

impl BusRouteView {
    pub fn from_route(route: &BusRoute) -> Self {
        Self {
            code: route.code.to_string(),
            name: route.name.clone(),
            route_stop_id: None,
        }
    }
}

// ============================================================================
// Route stops
// ============================================================================

#[derive(Template)]
#[template(path = "route_stops/index.html")]
pub struct RouteStopListTemplate {
    pub route_code: String,
    pub route_name: String,
    pub stops: Vec<RouteStopView>,
}

#[derive(Template)]
#[template(path = "route_stops/show.html")]
pub struct RouteStopShowTemplate {
    pub stop: RouteStopView,
    pub route_name: String,
    pub confirm_delete: bool,
}

#[derive(Template)]
#[template(path = "route_stops/form.html")]
pub struct RouteStopFormTemplate {
    pub title: String,
    pub action: String,
    pub route_code: String,
    pub stop_number: String,
    pub offset: String,
    pub stop_options: Vec<StopOption>,
    pub errors: Vec<String>,
}

/// A route stop joined with its stop's location.
#[derive(Debug, Clone)]
pub struct RouteStopView {
    pub id: i32,
    pub route_code: String,
    pub stop_number: i32,
    pub location: String,
    pub offset: u32,
}

/// One entry of the stop chooser.
#[derive(Debug, Clone)]
pub struct StopOption {
    pub number: i32,
    pub label: String,
    pub selected: bool,
}

// ============================================================================
// Route schedules
// ============================================================================

/// Schedule listing for a route, or effective times for one stop.
#[derive(Template)]
#[template(path = "route_schedules/index.html")]
pub struct RouteScheduleListTemplate {
    pub title: String,
    pub route_code: Option<String>,
    pub rows: Vec<ScheduleView>,
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "route_schedules/show.html")]
pub struct RouteScheduleShowTemplate {
    pub row: ScheduleView,
    pub route_code: String,
    pub confirm_delete: bool,
}

#[derive(Template)]
#[template(path = "route_schedules/form.html")]
pub struct RouteScheduleFormTemplate {
    pub title: String,
    pub action: String,
    pub route_options: Vec<RouteOption>,
    pub start_time: String,
    pub is_weekday: bool,
    pub comments: String,
    pub errors: Vec<String>,
}

/// Schedule row view model for templates.
#[derive(Debug, Clone)]
pub struct ScheduleView {
    /// Absent for derived per-stop rows, which cannot be edited
    pub id: Option<i32>,
    pub time: String,
    pub is_weekday: bool,
    pub comments: String,
}

impl ScheduleView {
    pub fn from_schedule(schedule: &RouteSchedule) -> Self {
        Self {
            id: Some(schedule.id),
            time: schedule.start_time.format("%H:%M").to_string(),
            is_weekday: schedule.is_weekday,
            comments: schedule.comments.clone().unwrap_or_default(),
        }
    }

    pub fn from_departure(departure: &EffectiveDeparture) -> Self {
        Self {
            id: None,
            time: departure.time.format("%H:%M").to_string(),
            is_weekday: departure.is_weekday,
            comments: departure.comments.clone().unwrap_or_default(),
        }
    }

    pub fn day_type(&self) -> &'static str {
        if self.is_weekday { "Weekday" } else { "Weekend" }
    }
}

/// One entry of the route chooser.
#[derive(Debug, Clone)]
pub struct RouteOption {
    pub code: String,
    pub name: String,
    pub selected: bool,
}
