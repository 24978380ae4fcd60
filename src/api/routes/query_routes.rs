//! Query routes (e.g., /api/v1/query/*)

use axum::{routing::{get, post}, Router};
use crate::api::controller::query::QueryController;
use crate::app_state::AppState;

pub fn query_routes() -> Router<AppState> {
    Router::new()
        .route("/params", get(QueryController::get_query_params))
        .route("/params/view", post(QueryController::resolve_dashboard_view))

        .route("/range", get(QueryController::get_range_query))
        .route("/instant", get(QueryController::get_instant_query))
}
