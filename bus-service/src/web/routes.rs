//! HTTP routing.

use std::path::Path;

use askama::Template;
use axum::{
    Router,
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::error::AppError;
use super::state::AppState;
use super::templates::IndexTemplate;
use super::{bus_routes, bus_stops, drivers, route_schedules, route_stops};

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/drivers", get(drivers::list))
        .route("/drivers/province-check", get(drivers::province_check))
        .route("/drivers/new", get(drivers::new_form).post(drivers::create))
        .route("/drivers/:id", get(drivers::show))
        .route("/drivers/:id/edit", get(drivers::edit_form).post(drivers::update))
        .route(
            "/drivers/:id/delete",
            get(drivers::confirm_delete).post(drivers::delete),
        )
        .route("/bus-stops", get(bus_stops::list))
        .route("/bus-stops/routes", get(bus_stops::route_selector))
        .route("/bus-stops/new", get(bus_stops::new_form).post(bus_stops::create))
        .route("/bus-stops/:number", get(bus_stops::show))
        .route(
            "/bus-stops/:number/routes",
            get(bus_stops::route_selector_for),
        )
        .route(
            "/bus-stops/:number/edit",
            get(bus_stops::edit_form).post(bus_stops::update),
        )
        .route(
            "/bus-stops/:number/delete",
            get(bus_stops::confirm_delete).post(bus_stops::delete),
        )
        .route("/bus-routes", get(bus_routes::list))
        .route("/bus-routes/:code/stops", get(route_stops::index_for))
        .route("/bus-routes/:code/schedule", get(route_schedules::index_for))
        .route("/route-stops", get(route_stops::index))
        .route(
            "/route-stops/new",
            get(route_stops::new_form).post(route_stops::create),
        )
        .route("/route-stops/:id", get(route_stops::show))
        .route(
            "/route-stops/:id/edit",
            get(route_stops::edit_form).post(route_stops::update),
        )
        .route(
            "/route-stops/:id/delete",
            get(route_stops::confirm_delete).post(route_stops::delete),
        )
        .route("/route-schedules", get(route_schedules::index))
        .route("/route-schedules/stop", get(route_schedules::stop_schedule))
        .route(
            "/route-schedules/stop/:routestopid",
            get(route_schedules::stop_schedule_for),
        )
        .route(
            "/route-schedules/new",
            get(route_schedules::new_form).post(route_schedules::create),
        )
        .route("/route-schedules/:id", get(route_schedules::show))
        .route(
            "/route-schedules/:id/edit",
            get(route_schedules::edit_form).post(route_schedules::update),
        )
        .route(
            "/route-schedules/:id/delete",
            get(route_schedules::confirm_delete).post(route_schedules::delete),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Render a template, mapping failures to an internal error.
pub(super) fn render(template: impl Template) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

/// Version a record was read at, carried by edit and delete forms.
#[derive(Debug, Deserialize)]
pub(super) struct VersionQuery {
    pub version: u64,
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page.
async fn index_page() -> impl IntoResponse {
    Html(
        IndexTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

#[cfg(test)]
pub(super) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, header};
    use axum::response::Response as AxumResponse;
    use tower::ServiceExt;

    use super::*;
    use crate::store::{MemoryStore, Snapshot};
    use crate::validation::ValidationConfig;

    pub const SEED: &str = include_str!("../../data/seed.json");

    pub fn app() -> Router {
        let store = MemoryStore::from_snapshot(Snapshot::from_json(SEED).unwrap()).unwrap();
        let state = AppState::new(store, ValidationConfig::default());
        create_router(state, Path::new("static"))
    }

    pub async fn get(app: Router, uri: &str) -> AxumResponse {
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> AxumResponse {
        app.oneshot(
            Request::get(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    pub async fn post_form(app: Router, uri: &str, form: &str) -> AxumResponse {
        app.oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    pub async fn body_text(response: AxumResponse) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
