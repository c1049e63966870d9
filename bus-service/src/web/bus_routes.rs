//! Bus route listing.

use axum::{extract::State, response::Html};

use crate::domain::BusRoute;
use crate::store::RecordStore;

use super::error::AppError;
use super::routes::render;
use super::state::AppState;
use super::templates::{BusRouteListTemplate, BusRouteView};

pub(super) async fn list(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    route_list_page(&state, None)
}

/// All routes, numeric codes first.
///
/// Pages that need a route fall back to this listing, with `message`
/// explaining what to pick.
pub(super) fn route_list_page(
    state: &AppState,
    message: Option<String>,
) -> Result<Html<String>, AppError> {
    let routes = state
        .store
        .fetch_all_ordered_by(|r: &BusRoute| r.code.clone())?;

    render(BusRouteListTemplate {
        title: "Bus Routes".to_string(),
        routes: routes
            .iter()
            .map(|row| BusRouteView::from_route(&row.record))
            .collect(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::routes::test_support::*;

    #[tokio::test]
    async fn numeric_codes_in_numeric_order() {
        let response = get(app(), "/bus-routes").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        let seven = html.find("Mainline").unwrap();
        let twelve = html.find("Conestoga College").unwrap();
        let two_hundred = html.find("iXpress").unwrap();
        assert!(seven < twelve);
        assert!(twelve < two_hundred);
    }
}
