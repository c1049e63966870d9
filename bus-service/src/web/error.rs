//! Errors a handler can end with.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::store::StoreError;

use super::templates::ErrorTemplate;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, "Bad request", message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, "Not found", message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, "Please try again", message),
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong", message)
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        let message = e.to_string();
        match e {
            StoreError::NotFound { .. } => AppError::NotFound { message },
            e if e.is_conflict() => AppError::Conflict { message },
            _ => AppError::Internal { message },
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Internal {
            message: format!("Template error: {}", e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(%status, error = message, "request failed");
        } else {
            tracing::warn!(%status, error = message, "request rejected");
        }

        let page = ErrorTemplate {
            title: title.to_string(),
            message: message.to_string(),
        };
        let body = page
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e));
        (status, Html(body)).into_response()
    }
}
