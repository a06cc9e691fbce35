use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/view", get(handlers::get_view))
        .route("/api/variations", get(handlers::get_variations))
        .route("/api/detail", get(handlers::get_detail))
        .route("/api/toggle", post(handlers::toggle))
        .route("/api/granularity", post(handlers::set_granularity))
        .route("/api/line-style", post(handlers::set_line_style))
        .with_state(state)
}
