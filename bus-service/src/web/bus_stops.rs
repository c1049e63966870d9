//! Bus stop pages.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::context::{ContextKey, SELECT_VALID_STOP, select_number};
use crate::domain::{BusRoute, BusStop, RouteStop};
use crate::store::{RecordStore, StoreError};

use super::error::AppError;
use super::routes::{VersionQuery, render};
use super::session::CookiePreferences;
use super::state::AppState;
use super::templates::{
    BusRouteListTemplate, BusRouteView, BusStopFormTemplate, BusStopListTemplate,
    BusStopShowTemplate, BusStopView,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ListQuery {
    orderby: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct StopQuery {
    busstopnumber: Option<String>,
}

/// Submitted bus stop fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct BusStopForm {
    number: Option<String>,
    location: Option<String>,
    going_downtown: Option<String>,
}

/// How the stop listing is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopOrder {
    Number,
    Location,
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, AppError> {
    let order = match query.orderby.as_deref() {
        Some("location") => StopOrder::Location,
        _ => StopOrder::Number,
    };
    stop_list_page(&state, order, query.message.filter(|m| !m.is_empty()))
}

/// All stops, with an optional message above the list.
pub(super) fn stop_list_page_with(
    state: &AppState,
    message: impl Into<String>,
) -> Result<Html<String>, AppError> {
    stop_list_page(state, StopOrder::Number, Some(message.into()))
}

fn stop_list_page(
    state: &AppState,
    order: StopOrder,
    message: Option<String>,
) -> Result<Html<String>, AppError> {
    let stops = match order {
        StopOrder::Number => state.store.fetch_all_ordered_by(|s: &BusStop| s.number())?,
        StopOrder::Location => state
            .store
            .fetch_all_ordered_by(|s: &BusStop| s.location().to_string())?,
    };

    render(BusStopListTemplate {
        stops: stops
            .iter()
            .map(|row| BusStopView::from_stop(&row.record))
            .collect(),
        message,
    })
}

/// Routes serving the stop named in the query string or remembered.
pub(super) async fn route_selector(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StopQuery>,
) -> Result<Response, AppError> {
    routes_for_stop(&state, &headers, None, query.busstopnumber.as_deref())
}

/// Routes serving the stop in the path.
pub(super) async fn route_selector_for(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(number): Path<String>,
) -> Result<Response, AppError> {
    routes_for_stop(&state, &headers, Some(&number), None)
}

fn routes_for_stop(
    state: &AppState,
    headers: &HeaderMap,
    explicit: Option<&str>,
    query: Option<&str>,
) -> Result<Response, AppError> {
    let mut preferences = CookiePreferences::from_headers(headers);
    let number = match select_number(
        ContextKey::BusStopNumber,
        explicit,
        query,
        &mut preferences,
        SELECT_VALID_STOP,
    ) {
        Ok(number) => number,
        Err(unresolved) => {
            return Ok(stop_list_page_with(state, unresolved.message)?.into_response());
        }
    };

    let stop = match state.store.fetch::<BusStop>(&number) {
        Ok(stored) => stored.record,
        Err(StoreError::NotFound { .. }) => {
            return Ok(stop_list_page_with(state, SELECT_VALID_STOP)?.into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let route_stops = state
        .store
        .fetch_where(|rs: &RouteStop| rs.stop_number == number)?;
    if route_stops.is_empty() {
        let message = format!("Sorry, no routes for stop: {} - {}", number, stop.location());
        return Ok(stop_list_page_with(state, message)?.into_response());
    }

    let mut routes = Vec::with_capacity(route_stops.len());
    for row in &route_stops {
        let route = state.store.fetch::<BusRoute>(&row.record.route_code)?.record;
        routes.push((route, row.record.id));
    }
    routes.sort_by(|a, b| a.0.code.cmp(&b.0.code));

    let html = render(BusRouteListTemplate {
        title: format!("Routes for stop: {} - {}", number, stop.location()),
        routes: routes
            .iter()
            .map(|(route, route_stop_id)| BusRouteView {
                route_stop_id: Some(*route_stop_id),
                ..BusRouteView::from_route(route)
            })
            .collect(),
        message: None,
    })?;
    Ok((preferences.into_headers(), html).into_response())
}

pub(super) async fn show(
    State(state): State<AppState>,
    Path(number): Path<i32>,
) -> Result<Html<String>, AppError> {
    show_page(&state, number, false)
}

pub(super) async fn new_form() -> Result<Html<String>, AppError> {
    render(BusStopFormTemplate {
        title: "Create bus stop".to_string(),
        action: "/bus-stops/new".to_string(),
        number: String::new(),
        number_editable: true,
        location: String::new(),
        going_downtown: false,
        errors: Vec::new(),
    })
}

pub(super) async fn create(
    State(state): State<AppState>,
    Form(form): Form<BusStopForm>,
) -> Result<Response, AppError> {
    let action = "/bus-stops/new".to_string();
    let stop = match parse_bus_stop(&form, None) {
        Ok(stop) => stop,
        Err(errors) => return form_page("Create bus stop", action, &form, true, errors),
    };

    match state.store.insert(stop) {
        Ok(stored) => {
            info!(number = stored.record.number(), "created bus stop");
            Ok(Redirect::to("/bus-stops").into_response())
        }
        Err(e) if e.is_conflict() => {
            form_page("Create bus stop", action, &form, true, vec![e.to_string()])
        }
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn edit_form(
    State(state): State<AppState>,
    Path(number): Path<i32>,
) -> Result<Html<String>, AppError> {
    let stored = state.store.fetch::<BusStop>(&number)?;
    render(BusStopFormTemplate {
        title: format!("Edit bus stop {}", number),
        action: edit_action(number, stored.version),
        number: number.to_string(),
        number_editable: false,
        location: stored.record.location().to_string(),
        going_downtown: stored.record.going_downtown(),
        errors: Vec::new(),
    })
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(number): Path<i32>,
    Query(version): Query<VersionQuery>,
    Form(form): Form<BusStopForm>,
) -> Result<Response, AppError> {
    let title = format!("Edit bus stop {}", number);
    let action = edit_action(number, version.version);
    let stop = match parse_bus_stop(&form, Some(number)) {
        Ok(stop) => stop,
        Err(errors) => return form_page(&title, action, &form, false, errors),
    };

    match state.store.update(stop, version.version) {
        Ok(stored) => {
            info!(number, hash = stored.record.location_hash(), "updated bus stop");
            Ok(Redirect::to(&format!("/bus-stops/{}", number)).into_response())
        }
        Err(e) if e.is_conflict() => form_page(&title, action, &form, false, vec![e.to_string()]),
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn confirm_delete(
    State(state): State<AppState>,
    Path(number): Path<i32>,
) -> Result<Html<String>, AppError> {
    show_page(&state, number, true)
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path(number): Path<i32>,
) -> Result<Redirect, AppError> {
    state.store.delete::<BusStop>(&number)?;
    info!(number, "deleted bus stop");
    Ok(Redirect::to("/bus-stops"))
}

fn edit_action(number: i32, version: u64) -> String {
    format!("/bus-stops/{}/edit?version={}", number, version)
}

fn show_page(state: &AppState, number: i32, confirm_delete: bool) -> Result<Html<String>, AppError> {
    let stop = state.store.fetch::<BusStop>(&number)?.record;
    render(BusStopShowTemplate {
        stop: BusStopView::from_stop(&stop),
        confirm_delete,
        message: None,
    })
}

fn form_page(
    title: &str,
    action: String,
    form: &BusStopForm,
    number_editable: bool,
    errors: Vec<String>,
) -> Result<Response, AppError> {
    Ok(render(BusStopFormTemplate {
        title: title.to_string(),
        action,
        number: form.number.clone().unwrap_or_default(),
        number_editable,
        location: form.location.clone().unwrap_or_default(),
        going_downtown: form.going_downtown.is_some(),
        errors,
    })?
    .into_response())
}

/// Build a stop from form fields. `number` overrides the submitted number
/// when editing.
fn parse_bus_stop(form: &BusStopForm, number: Option<i32>) -> Result<BusStop, Vec<String>> {
    let mut errors = Vec::new();

    let number = number.or_else(|| {
        let parsed = form
            .number
            .as_deref()
            .map(str::trim)
            .and_then(|n| n.parse::<i32>().ok())
            .filter(|n| *n > 0);
        if parsed.is_none() {
            errors.push("Bus stop number must be a positive whole number".to_string());
        }
        parsed
    });

    let location = form
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());
    if location.is_none() {
        errors.push("Location is required".to_string());
    }

    match (number, location) {
        (Some(number), Some(location)) if errors.is_empty() => {
            Ok(BusStop::new(number, location, form.going_downtown.is_some()))
        }
        _ => Err(errors),
    }
}
