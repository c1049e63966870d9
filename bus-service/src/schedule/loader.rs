//! Loading a stop's schedule from the record store.

use crate::domain::{BusRoute, BusStop, RouteCode, RouteSchedule, RouteStop};
use crate::store::{RecordStore, StoreError, Stored};

use super::resolver::{EffectiveDeparture, resolve_effective_schedule};

/// Everything needed to show when a route reaches a stop.
#[derive(Debug, Clone)]
pub struct RouteStopSchedule {
    pub route_stop: RouteStop,
    pub route: BusRoute,
    pub stop: BusStop,
    pub departures: Vec<EffectiveDeparture>,
}

/// A route's base schedule, ordered by start time.
pub fn load_base_schedule<S: RecordStore>(
    store: &S,
    route_code: &RouteCode,
) -> Result<Vec<Stored<RouteSchedule>>, StoreError> {
    let mut rows = store.fetch_where(|s: &RouteSchedule| s.route_code == *route_code)?;
    rows.sort_by_key(|row| row.record.start_time);
    Ok(rows)
}

/// Load the route stop `route_stop_id` and its route, stop and effective
/// schedule.
pub fn load_route_stop_schedule<S: RecordStore>(
    store: &S,
    route_stop_id: i32,
) -> Result<RouteStopSchedule, StoreError> {
    let route_stop = store.fetch::<RouteStop>(&route_stop_id)?.record;
    let route = store.fetch::<BusRoute>(&route_stop.route_code)?.record;
    let stop = store.fetch::<BusStop>(&route_stop.stop_number)?.record;

    let base: Vec<RouteSchedule> = load_base_schedule(store, &route_stop.route_code)?
        .into_iter()
        .map(|row| row.record)
        .collect();
    let departures = resolve_effective_schedule(&route_stop.route_code, route_stop.offset, &base);

    tracing::debug!(
        route = %route_stop.route_code,
        stop = route_stop.stop_number,
        departures = departures.len(),
        "resolved stop schedule"
    );

    Ok(RouteStopSchedule {
        route_stop,
        route,
        stop,
        departures,
    })
}
