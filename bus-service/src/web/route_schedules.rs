//! Route schedule pages.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::context::{
    ContextKey, Preferences, SELECT_ROUTE_FOR_SCHEDULE, SELECT_STOP_AGAIN,
    resolve_active_identifier, select_number,
};
use crate::domain::{BusRoute, RouteCode, RouteSchedule, parse_start_time};
use crate::schedule::{load_base_schedule, load_route_stop_schedule};
use crate::store::{RecordStore, StoreError};

use super::bus_stops::stop_list_page_with;
use super::error::AppError;
use super::route_stops::{RouteQuery, active_route};
use super::routes::{VersionQuery, render};
use super::session::CookiePreferences;
use super::state::AppState;
use super::templates::{
    RouteOption, RouteScheduleFormTemplate, RouteScheduleListTemplate, RouteScheduleShowTemplate,
    ScheduleView,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct StopScheduleQuery {
    routestopid: Option<String>,
}

/// Submitted schedule fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ScheduleForm {
    route_code: Option<String>,
    start_time: Option<String>,
    is_weekday: Option<String>,
    comments: Option<String>,
}

fn no_schedule_message(code: &str) -> String {
    format!("Sorry, there are no stops scheduled for this route code: {}", code)
}

/// Schedule of the route in the query string, or the remembered route.
pub(super) async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RouteQuery>,
) -> Result<Response, AppError> {
    schedule_page(&state, &headers, None, query.busroutecode.as_deref())
}

/// Schedule of the route in the path.
pub(super) async fn index_for(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    schedule_page(&state, &headers, Some(&code), None)
}

fn schedule_page(
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
        SELECT_ROUTE_FOR_SCHEDULE,
    )? {
        Ok(route) => route,
        Err(fallback) => return Ok(fallback),
    };
    let code = &route.code;

    let rows = load_base_schedule(state.store.as_ref(), code)?;
    let page = if rows.is_empty() {
        RouteScheduleListTemplate {
            title: "Route Schedule".to_string(),
            route_code: Some(code.to_string()),
            rows: Vec::new(),
            message: Some(no_schedule_message(code.as_str())),
        }
    } else {
        RouteScheduleListTemplate {
            title: format!("Schedule for: {} ({})", route.name, code),
            route_code: Some(code.to_string()),
            rows: rows
                .iter()
                .map(|row| ScheduleView::from_schedule(&row.record))
                .collect(),
            message: None,
        }
    };

    let html = render(page)?;
    Ok((preferences.into_headers(), html).into_response())
}

/// Arrival times at the route stop in the query string, or the remembered
/// one.
pub(super) async fn stop_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StopScheduleQuery>,
) -> Result<Response, AppError> {
    stop_schedule_page(&state, &headers, None, query.routestopid.as_deref())
}

/// Arrival times at the route stop in the path.
pub(super) async fn stop_schedule_for(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(route_stop_id): Path<String>,
) -> Result<Response, AppError> {
    stop_schedule_page(&state, &headers, Some(&route_stop_id), None)
}

fn stop_schedule_page(
    state: &AppState,
    headers: &HeaderMap,
    explicit: Option<&str>,
    query: Option<&str>,
) -> Result<Response, AppError> {
    let mut preferences = CookiePreferences::from_headers(headers);
    let id = match select_number(
        ContextKey::RouteStopId,
        explicit,
        query,
        &mut preferences,
        SELECT_STOP_AGAIN,
    ) {
        Ok(id) => id,
        Err(unresolved) => {
            return Ok(stop_list_page_with(state, unresolved.message)?.into_response());
        }
    };

    let schedule = match load_route_stop_schedule(state.store.as_ref(), id) {
        Ok(schedule) => schedule,
        Err(StoreError::NotFound { .. }) => {
            tracing::debug!(route_stop = id, "no schedule for route stop");
            return Ok(stop_list_page_with(state, SELECT_STOP_AGAIN)?.into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let code = schedule.route.code.to_string();
    let message = schedule
        .departures
        .is_empty()
        .then(|| no_schedule_message(&code));
    let html = render(RouteScheduleListTemplate {
        title: format!(
            "Stop: {} - {} Route: {} - {}",
            schedule.stop.number(),
            schedule.stop.location(),
            code,
            schedule.route.name
        ),
        route_code: None,
        rows: schedule
            .departures
            .iter()
            .map(ScheduleView::from_departure)
            .collect(),
        message,
    })?;
    Ok((preferences.into_headers(), html).into_response())
}

pub(super) async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    show_page(&state, id, false)
}

/// New schedule row, with the query string or remembered route preselected.
pub(super) async fn new_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RouteQuery>,
) -> Result<Html<String>, AppError> {
    let preferences = CookiePreferences::from_headers(&headers);
    let remembered = preferences.get(ContextKey::RouteCode);
    let route_code = resolve_active_identifier(
        None,
        query.busroutecode.as_deref(),
        remembered.as_deref(),
    )
    .map(str::to_string);

    let form = ScheduleForm {
        route_code,
        is_weekday: Some("on".to_string()),
        ..ScheduleForm::default()
    };
    form_page(&state, "Create schedule", "/route-schedules/new".to_string(), &form, Vec::new())
}

pub(super) async fn create(
    State(state): State<AppState>,
    Form(form): Form<ScheduleForm>,
) -> Result<Response, AppError> {
    let action = "/route-schedules/new".to_string();
    let schedule = match parse_schedule(&form, 0) {
        Ok(schedule) => schedule,
        Err(errors) => {
            return Ok(form_page(&state, "Create schedule", action, &form, errors)?.into_response());
        }
    };

    match state.store.insert(schedule) {
        Ok(stored) => {
            info!(
                id = stored.record.id,
                route = %stored.record.route_code,
                start = %stored.record.start_time,
                "created schedule"
            );
            Ok(redirect_to_route(&stored.record.route_code).into_response())
        }
        Err(e) if e.is_conflict() => {
            let errors = vec![e.to_string()];
            Ok(form_page(&state, "Create schedule", action, &form, errors)?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let stored = state.store.fetch::<RouteSchedule>(&id)?;
    let schedule = &stored.record;
    let form = ScheduleForm {
        route_code: Some(schedule.route_code.to_string()),
        start_time: Some(schedule.start_time.format("%H:%M").to_string()),
        is_weekday: schedule.is_weekday.then(|| "on".to_string()),
        comments: schedule.comments.clone(),
    };
    form_page(&state, "Edit schedule", edit_action(id, stored.version), &form, Vec::new())
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(version): Query<VersionQuery>,
    Form(form): Form<ScheduleForm>,
) -> Result<Response, AppError> {
    let action = edit_action(id, version.version);
    let schedule = match parse_schedule(&form, id) {
        Ok(schedule) => schedule,
        Err(errors) => {
            return Ok(form_page(&state, "Edit schedule", action, &form, errors)?.into_response());
        }
    };

    match state.store.update(schedule, version.version) {
        Ok(stored) => {
            info!(id, version = stored.version, "updated schedule");
            Ok(redirect_to_route(&stored.record.route_code).into_response())
        }
        Err(e) if e.is_conflict() => {
            let errors = vec![e.to_string()];
            Ok(form_page(&state, "Edit schedule", action, &form, errors)?.into_response())
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
    let route_code = state.store.fetch::<RouteSchedule>(&id)?.record.route_code;
    state.store.delete::<RouteSchedule>(&id)?;
    info!(id, route = %route_code, "deleted schedule");
    Ok(redirect_to_route(&route_code))
}

fn redirect_to_route(code: &RouteCode) -> Redirect {
    Redirect::to(&format!("/bus-routes/{}/schedule", code))
}

fn edit_action(id: i32, version: u64) -> String {
    format!("/route-schedules/{}/edit?version={}", id, version)
}

fn show_page(state: &AppState, id: i32, confirm_delete: bool) -> Result<Html<String>, AppError> {
    let schedule = state.store.fetch::<RouteSchedule>(&id)?.record;
    render(RouteScheduleShowTemplate {
        row: ScheduleView::from_schedule(&schedule),
        route_code: schedule.route_code.to_string(),
        confirm_delete,
    })
}

fn form_page(
    state: &AppState,
    title: &str,
    action: String,
    form: &ScheduleForm,
    errors: Vec<String>,
) -> Result<Html<String>, AppError> {
    let selected = form.route_code.as_deref().map(str::trim);
    let routes = state
        .store
        .fetch_all_ordered_by(|r: &BusRoute| r.code.clone())?;

    render(RouteScheduleFormTemplate {
        title: title.to_string(),
        action,
        route_options: routes
            .iter()
            .map(|row| RouteOption {
                code: row.record.code.to_string(),
                name: row.record.name.clone(),
                selected: selected == Some(row.record.code.as_str()),
            })
            .collect(),
        start_time: form.start_time.clone().unwrap_or_default(),
        is_weekday: form.is_weekday.is_some(),
        comments: form.comments.clone().unwrap_or_default(),
        errors,
    })
}

fn parse_schedule(form: &ScheduleForm, id: i32) -> Result<RouteSchedule, Vec<String>> {
    let mut errors = Vec::new();

    let route_code = RouteCode::parse(form.route_code.as_deref().unwrap_or_default())
        .map_err(|_| errors.push("Please choose a bus route".to_string()))
        .ok();
    let start_time = parse_start_time(form.start_time.as_deref().unwrap_or_default().trim())
        .map_err(|e| errors.push(format!("Start time must be HH:MM ({})", e)))
        .ok();
    let comments = form
        .comments
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    match (route_code, start_time) {
        (Some(route_code), Some(start_time)) => Ok(RouteSchedule {
            id,
            route_code,
            start_time,
            is_weekday: form.is_weekday.is_some(),
            comments,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};
    use chrono::NaiveTime;

    use super::super::routes::test_support::*;
    use super::*;

    fn form(route: &str, time: &str, weekday: bool, comments: &str) -> ScheduleForm {
        ScheduleForm {
            route_code: Some(route.to_string()),
            start_time: Some(time.to_string()),
            is_weekday: weekday.then(|| "on".to_string()),
            comments: Some(comments.to_string()),
        }
    }

    #[test]
    fn parse_valid() {
        let schedule = parse_schedule(&form("7", "09:15", false, "  "), 0).unwrap();
        assert_eq!(schedule.start_time, NaiveTime::from_hms_opt(9, 15, 0).unwrap());
        assert!(!schedule.is_weekday);
        assert_eq!(schedule.comments, None);
    }

    #[test]
    fn parse_reports_route_and_time() {
        let errors = parse_schedule(&form("", "9am", true, ""), 0).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[tokio::test]
    async fn index_sorted_by_start_time() {
        let response = get(app(), "/bus-routes/7/schedule").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Schedule for: Mainline (7)"));
        assert!(html.find("06:00").unwrap() < html.find("06:30").unwrap());
        assert!(html.contains("Weekend service"));
        // other routes are not listed
        assert!(!html.contains("07:15"));
    }

    #[tokio::test]
    async fn empty_schedule_message() {
        let html = body_text(get(app(), "/route-schedules?busroutecode=8").await).await;
        assert!(html.contains("Sorry, there are no stops scheduled for this route code: 8"));
    }

    #[tokio::test]
    async fn unknown_route_falls_back_without_remembering() {
        let app = app();
        let response = get(app.clone(), "/route-schedules?busroutecode=999").await;
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let html = body_text(response).await;
        assert!(html.contains("Bus route 999 does not exist"));
        assert!(!html.contains("no stops scheduled"));

        let response = get(app, "/bus-routes/999/schedule").await;
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn known_route_is_remembered() {
        let response = get(app(), "/route-schedules?busroutecode=8").await;
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with("busroutecode=8;"));
    }

    #[tokio::test]
    async fn no_route_falls_back_to_listing() {
        let html = body_text(get(app(), "/route-schedules").await).await;
        assert!(html.contains(SELECT_ROUTE_FOR_SCHEDULE));
    }

    #[tokio::test]
    async fn stop_schedule_offsets_route_schedule() {
        // route stop 2: route 7 at King & Erb, six minutes in
        let response = get(app(), "/route-schedules/stop/2").await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with("routestopid=2;"));

        let html = body_text(response).await;
        assert!(html.contains("Stop: 1001 - King &amp; Erb Route: 7 - Mainline"));
        assert!(html.find("06:06").unwrap() < html.find("06:36").unwrap());
        assert!(html.contains("08:06"));
        // route 12 starts at 07:15, never shifted onto this stop
        assert!(!html.contains("07:21"));
    }

    #[tokio::test]
    async fn stop_schedule_from_query() {
        let html = body_text(get(app(), "/route-schedules/stop?routestopid=4").await).await;
        assert!(html.contains("07:37"));
        assert!(html.contains("08:07"));
    }

    #[tokio::test]
    async fn stop_schedule_unresolved_falls_back_to_stops() {
        let html = body_text(get(app(), "/route-schedules/stop").await).await;
        assert!(html.contains(SELECT_STOP_AGAIN));

        let html = body_text(get(app(), "/route-schedules/stop/77").await).await;
        assert!(html.contains(SELECT_STOP_AGAIN));
        assert!(html.contains("Charles Street Terminal"));
    }

    #[tokio::test]
    async fn create_edit_delete() {
        let app = app();
        let response = post_form(
            app.clone(),
            "/route-schedules/new",
            "route_code=8&start_time=10:45&is_weekday=on&comments=Trial",
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/bus-routes/8/schedule");

        let html = body_text(get(app.clone(), "/bus-routes/8/schedule").await).await;
        assert!(html.contains("10:45"));
        assert!(html.contains("Trial"));

        let response = post_form(
            app.clone(),
            "/route-schedules/7/edit?version=1",
            "route_code=8&start_time=11:00",
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let html = body_text(get(app.clone(), "/route-schedules/7").await).await;
        assert!(html.contains("11:00"));
        assert!(html.contains("Weekend"));

        let response = post_form(app.clone(), "/route-schedules/7/delete", "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let response = get(app, "/route-schedules/7").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_for_unknown_route() {
        let response = post_form(app(), "/route-schedules/new", "route_code=99&start_time=10:45").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("route 99 does not exist"));
    }
}
