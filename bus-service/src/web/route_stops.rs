//! Route stop pages: which stops a route serves, and when.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::context::{SELECT_ROUTE_FOR_STOPS, select_route_code};
use crate::domain::{BusRoute, BusStop, OffsetMinutes, RouteCode, RouteStop};
use crate::store::{RecordStore, StoreError};

use super::bus_routes::route_list_page;
use super::error::AppError;
use super::routes::{VersionQuery, render};
use super::session::CookiePreferences;
use super::state::AppState;
use super::templates::{
    RouteStopFormTemplate, RouteStopListTemplate, RouteStopShowTemplate, RouteStopView, StopOption,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RouteQuery {
    pub busroutecode: Option<String>,
}

/// Submitted route stop fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RouteStopForm {
    route_code: Option<String>,
    stop_number: Option<String>,
    offset: Option<String>,
}

/// Stops of the route in the query string, or the remembered route.
pub(super) async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RouteQuery>,
) -> Result<Response, AppError> {
    stops_page(&state, &headers, None, query.busroutecode.as_deref())
}

/// Stops of the route in the path.
pub(super) async fn index_for(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    stops_page(&state, &headers, Some(&code), None)
}

fn stops_page(
    state: &AppState,
    headers: &HeaderMap,
    explicit: Option<&str>,
    query: Option<&str>,
) -> Result<Response, AppError> {
    let mut preferences = CookiePreferences::from_headers(headers);
    let route = match active_route(
        state,
        &mut preferences,
        explicit,
        query,
        SELECT_ROUTE_FOR_STOPS,
    )? {
        Ok(route) => route,
        Err(fallback) => return Ok(fallback),
    };

    let html = render(RouteStopListTemplate {
        route_code: route.code.to_string(),
        route_name: route.name.clone(),
        stops: route_stop_views(state, &route.code)?,
    })?;
    Ok((preferences.into_headers(), html).into_response())
}

/// Resolve the route a page is about, or the fallback page to show instead.
///
/// The fallback page carries no `Set-Cookie`, so an unknown route is never
/// remembered.
pub(super) fn active_route(
    state: &AppState,
    preferences: &mut CookiePreferences,
    explicit: Option<&str>,
    query: Option<&str>,
    guidance: &'static str,
) -> Result<Result<BusRoute, Response>, AppError> {
    let code = match select_route_code(explicit, query, preferences, guidance) {
        Ok(code) => code,
        Err(unresolved) => {
            let page = route_list_page(state, Some(unresolved.message.to_string()))?;
            return Ok(Err(page.into_response()));
        }
    };

    match state.store.fetch::<BusRoute>(&code) {
        Ok(stored) => Ok(Ok(stored.record)),
        Err(StoreError::NotFound { .. }) => {
            tracing::debug!(%code, "selected route does not exist");
            let message = format!("Bus route {} does not exist, please select a bus route", code);
            Ok(Err(route_list_page(state, Some(message))?.into_response()))
        }
        Err(e) => Err(e.into()),
    }
}

/// A route's stops, ordered by offset.
fn route_stop_views(state: &AppState, code: &RouteCode) -> Result<Vec<RouteStopView>, StoreError> {
    let mut rows = state
        .store
        .fetch_where(|rs: &RouteStop| rs.route_code == *code)?;
    rows.sort_by_key(|row| row.record.offset);

    rows.iter()
        .map(|row| route_stop_view(state, &row.record))
        .collect()
}

fn route_stop_view(state: &AppState, route_stop: &RouteStop) -> Result<RouteStopView, StoreError> {
    let stop = state.store.fetch::<BusStop>(&route_stop.stop_number)?.record;
    Ok(RouteStopView {
        id: route_stop.id,
        route_code: route_stop.route_code.to_string(),
        stop_number: route_stop.stop_number,
        location: stop.location().to_string(),
        offset: route_stop.offset.minutes(),
    })
}

pub(super) async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    show_page(&state, id, false)
}

/// Add a stop to the route in the query string, or the remembered route.
pub(super) async fn new_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RouteQuery>,
) -> Result<Response, AppError> {
    let mut preferences = CookiePreferences::from_headers(&headers);
    let route = match active_route(
        &state,
        &mut preferences,
        None,
        query.busroutecode.as_deref(),
        SELECT_ROUTE_FOR_STOPS,
    )? {
        Ok(route) => route,
        Err(fallback) => return Ok(fallback),
    };

    let html = form_page(
        &state,
        &format!("Create stop for Route: {} - {}", route.code, route.name),
        "/route-stops/new".to_string(),
        route.code.as_str(),
        &RouteStopForm::default(),
        Vec::new(),
    )?;
    Ok((preferences.into_headers(), html).into_response())
}

pub(super) async fn create(
    State(state): State<AppState>,
    Form(form): Form<RouteStopForm>,
) -> Result<Response, AppError> {
    let route_code = form.route_code.clone().unwrap_or_default();
    let title = format!("Create stop for Route: {}", route_code);
    let action = "/route-stops/new".to_string();

    let route_stop = match parse_route_stop(&form, 0) {
        Ok(route_stop) => route_stop,
        Err(errors) => {
            return Ok(form_page(&state, &title, action, &route_code, &form, errors)?.into_response());
        }
    };

    match state.store.insert(route_stop) {
        Ok(stored) => {
            info!(
                id = stored.record.id,
                route = %stored.record.route_code,
                stop = stored.record.stop_number,
                "created route stop"
            );
            Ok(Redirect::to(&format!("/bus-routes/{}/stops", stored.record.route_code)).into_response())
        }
        Err(e) if e.is_conflict() => {
            let errors = vec![e.to_string()];
            Ok(form_page(&state, &title, action, &route_code, &form, errors)?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let stored = state.store.fetch::<RouteStop>(&id)?;
    let route_stop = &stored.record;
    let form = RouteStopForm {
        route_code: Some(route_stop.route_code.to_string()),
        stop_number: Some(route_stop.stop_number.to_string()),
        offset: Some(route_stop.offset.to_string()),
    };

    form_page(
        &state,
        &format!("Edit stop for Route: {}", route_stop.route_code),
        edit_action(id, stored.version),
        route_stop.route_code.as_str(),
        &form,
        Vec::new(),
    )
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(version): Query<VersionQuery>,
    Form(form): Form<RouteStopForm>,
) -> Result<Response, AppError> {
    let route_code = form.route_code.clone().unwrap_or_default();
    let title = format!("Edit stop for Route: {}", route_code);
    let action = edit_action(id, version.version);

    let route_stop = match parse_route_stop(&form, id) {
        Ok(route_stop) => route_stop,
        Err(errors) => {
            return Ok(form_page(&state, &title, action, &route_code, &form, errors)?.into_response());
        }
    };

    match state.store.update(route_stop, version.version) {
        Ok(stored) => {
            info!(id, offset = stored.record.offset.minutes(), "updated route stop");
            Ok(Redirect::to(&format!("/bus-routes/{}/stops", stored.record.route_code)).into_response())
        }
        Err(e) if e.is_conflict() => {
            let errors = vec![e.to_string()];
            Ok(form_page(&state, &title, action, &route_code, &form, errors)?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    show_page(&state, id, true)
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let route_code = state.store.fetch::<RouteStop>(&id)?.record.route_code;
    state.store.delete::<RouteStop>(&id)?;
    info!(id, route = %route_code, "deleted route stop");
    Ok(Redirect::to(&format!("/bus-routes/{}/stops", route_code)))
}

fn edit_action(id: i32, version: u64) -> String {
    format!("/route-stops/{}/edit?version={}", id, version)
}

fn show_page(state: &AppState, id: i32, confirm_delete: bool) -> Result<Html<String>, AppError> {
    let route_stop = state.store.fetch::<RouteStop>(&id)?.record;
    let route = state.store.fetch::<BusRoute>(&route_stop.route_code)?.record;
    render(RouteStopShowTemplate {
        stop: route_stop_view(state, &route_stop)?,
        route_name: route.name,
        confirm_delete,
    })
}

/// The route stop form, with stops ordered by direction then location.
fn form_page(
    state: &AppState,
    title: &str,
    action: String,
    route_code: &str,
    form: &RouteStopForm,
    errors: Vec<String>,
) -> Result<Html<String>, AppError> {
    let selected = form.stop_number.as_deref().map(str::trim);
    let stops = state.store.fetch_all_ordered_by(|s: &BusStop| {
        (s.going_downtown(), s.location().to_string())
    })?;

    let stop_options = stops
        .iter()
        .map(|row| {
            let stop = &row.record;
            StopOption {
                number: stop.number(),
                label: format!("{} - {}", stop.number(), stop.location()),
                selected: selected == Some(stop.number().to_string().as_str()),
            }
        })
        .collect();

    render(RouteStopFormTemplate {
        title: title.to_string(),
        action,
        route_code: route_code.to_string(),
        stop_number: form.stop_number.clone().unwrap_or_default(),
        offset: form.offset.clone().unwrap_or_default(),
        stop_options,
        errors,
    })
}

fn parse_route_stop(form: &RouteStopForm, id: i32) -> Result<RouteStop, Vec<String>> {
    let mut errors = Vec::new();

    let route_code = RouteCode::parse(form.route_code.as_deref().unwrap_or_default())
        .map_err(|e| errors.push(format!("Route code {}", e)))
        .ok();
    let stop_number = form
        .stop_number
        .as_deref()
        .and_then(|n| n.trim().parse::<i32>().ok());
    if stop_number.is_none() {
        errors.push("Please choose a bus stop".to_string());
    }
    let offset = OffsetMinutes::parse(form.offset.as_deref().unwrap_or_default())
        .map_err(|e| errors.push(format!("Offset {}", e)))
        .ok();

    match (route_code, stop_number, offset) {
        (Some(route_code), Some(stop_number), Some(offset)) => Ok(RouteStop {
            id,
            route_code,
            stop_number,
            offset,
        }),
        _ => Err(errors),
    }
}
