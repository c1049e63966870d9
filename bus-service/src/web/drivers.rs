//! Driver pages.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use crate::domain::Driver;
use crate::reference::ProvinceCheck;
use crate::store::{RecordStore, StoreError};
use crate::validation::{DriverForm, DriverValidation, normalize_and_validate_driver};

use super::error::AppError;
use super::routes::{VersionQuery, render};
use super::state::AppState;
use super::templates::{DriverFormTemplate, DriverFormView, DriverListTemplate, DriverShowTemplate, DriverView};

/// Shown when deleting a driver who still has routes.
pub const DRIVER_STILL_ASSIGNED: &str =
    "Error removing the driver as they are still assigned routes, please remove routes and try again";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ProvinceCheckQuery {
    #[serde(rename = "provinceCode")]
    province_code: String,
}

/// All drivers, by full name.
pub(super) async fn list(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let drivers = state
        .store
        .fetch_all_ordered_by(|d: &Driver| d.full_name.to_lowercase())?;

    render(DriverListTemplate {
        drivers: drivers
            .iter()
            .map(|row| DriverView::from_driver(&row.record))
            .collect(),
    })
}

/// Remote check used by the driver form while typing a province code.
pub(super) async fn province_check(
    State(state): State<AppState>,
    Query(query): Query<ProvinceCheckQuery>,
) -> Json<ProvinceCheck> {
    Json(ProvinceCheck::run(state.store.as_ref(), &query.province_code))
}

pub(super) async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    show_page(&state, id, false, None)
}

pub(super) async fn new_form() -> Result<Html<String>, AppError> {
    render(DriverFormTemplate {
        title: "Create driver".to_string(),
        action: "/drivers/new".to_string(),
        fields: DriverFormView::default(),
        errors: Vec::new(),
        message: None,
    })
}

pub(super) async fn create(
    State(state): State<AppState>,
    Form(form): Form<DriverForm>,
) -> Result<Response, AppError> {
    let action = "/drivers/new".to_string();
    let validation = validate(&state, &form);
    let fields = DriverFormView::from(&validation.driver.fields);

    let driver = match validation.into_driver(0) {
        Ok(driver) => driver,
        Err(failed) => return invalid_form("Create driver", action, failed),
    };

    match state.store.insert(driver) {
        Ok(stored) => {
            info!(id = stored.record.id, name = %stored.record.full_name, "created driver");
            Ok(Redirect::to(&format!("/drivers/{}", stored.record.id)).into_response())
        }
        Err(e) if e.is_conflict() => conflict_form("Create driver", action, fields, e),
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let stored = state.store.fetch::<Driver>(&id)?;
    render(DriverFormTemplate {
        title: format!("Edit {}", stored.record.full_name),
        action: edit_action(id, stored.version),
        fields: DriverFormView::from(&DriverForm::from(&stored.record)),
        errors: Vec::new(),
        message: None,
    })
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(version): Query<VersionQuery>,
    Form(form): Form<DriverForm>,
) -> Result<Response, AppError> {
    let action = edit_action(id, version.version);
    let validation = validate(&state, &form);
    let fields = DriverFormView::from(&validation.driver.fields);

    let driver = match validation.into_driver(id) {
        Ok(driver) => driver,
        Err(failed) => return invalid_form("Edit driver", action, failed),
    };

    match state.store.update(driver, version.version) {
        Ok(stored) => {
            info!(id, version = stored.version, "updated driver");
            Ok(Redirect::to(&format!("/drivers/{}", id)).into_response())
        }
        Err(e) if e.is_conflict() => conflict_form("Edit driver", action, fields, e),
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    show_page(&state, id, true, None)
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    match state.store.delete::<Driver>(&id) {
        Ok(()) => {
            info!(id, "deleted driver");
            Ok(Redirect::to("/drivers").into_response())
        }
        Err(StoreError::Referential { .. }) => {
            tracing::warn!(id, "driver still assigned routes");
            Ok(show_page(&state, id, true, Some(DRIVER_STILL_ASSIGNED.to_string()))?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

fn validate(state: &AppState, form: &DriverForm) -> DriverValidation {
    normalize_and_validate_driver(
        form,
        state.store.as_ref(),
        &state.validation,
        Local::now().naive_local(),
    )
}

fn edit_action(id: i32, version: u64) -> String {
    format!("/drivers/{}/edit?version={}", id, version)
}

fn show_page(
    state: &AppState,
    id: i32,
    confirm_delete: bool,
    message: Option<String>,
) -> Result<Html<String>, AppError> {
    let driver = state.store.fetch::<Driver>(&id)?.record;
    let routes = state
        .store
        .driver_routes(id)?
        .iter()
        .map(|code| code.to_string())
        .collect();

    render(DriverShowTemplate {
        driver: DriverView::from_driver(&driver),
        routes,
        confirm_delete,
        message,
    })
}

/// Re-render the form with the normalized values and every failure.
fn invalid_form(
    title: &str,
    action: String,
    failed: DriverValidation,
) -> Result<Response, AppError> {
    tracing::debug!(errors = failed.errors.len(), "driver failed validation");
    Ok(render(DriverFormTemplate {
        title: title.to_string(),
        action,
        fields: DriverFormView::from(&failed.driver.fields),
        errors: failed.errors.iter().map(|e| e.to_string()).collect(),
        message: None,
    })?
    .into_response())
}

fn conflict_form(
    title: &str,
    action: String,
    fields: DriverFormView,
    error: StoreError,
) -> Result<Response, AppError> {
    tracing::warn!(%error, "driver write conflict");
    Ok(render(DriverFormTemplate {
        title: title.to_string(),
        action,
        fields,
        errors: Vec::new(),
        message: Some(error.to_string()),
    })?
    .into_response())
}
