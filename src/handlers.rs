use crate::errors::AppError;
use crate::models::{
    DetailQuery, DetailResponse, GranularityRequest, LineStyleRequest, ToggleRequest,
    VariationControl, ViewResponse,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::{debug, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.dataset))
}

pub async fn get_view(State(state): State<AppState>) -> Json<ViewResponse> {
    let mut view = state.view.lock().await;
    Json(view.snapshot())
}

pub async fn get_variations(State(state): State<AppState>) -> Json<Vec<VariationControl>> {
    let view = state.view.lock().await;
    Json(view.controls())
}

pub async fn get_detail(
    State(state): State<AppState>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<DetailResponse>, AppError> {
    let view = state.view.lock().await;
    view.detail(&query.date)
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no record for '{}'", query.date)))
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ViewResponse>, AppError> {
    let id = payload.variation_id.trim();
    let mut view = state.view.lock().await;
    if !view.is_known(id) {
        return Err(AppError::bad_request(format!("unknown variation '{id}'")));
    }

    if view.toggle(id) {
        info!(variation = id, selected = ?view.selected(), "selection changed");
    } else {
        debug!(variation = id, "kept last selected variation");
    }
    Ok(Json(view.snapshot()))
}

pub async fn set_granularity(
    State(state): State<AppState>,
    Json(payload): Json<GranularityRequest>,
) -> Json<ViewResponse> {
    let mut view = state.view.lock().await;
    view.set_granularity(payload.granularity);
    info!(granularity = ?payload.granularity, "granularity changed");
    Json(view.snapshot())
}

pub async fn set_line_style(
    State(state): State<AppState>,
    Json(payload): Json<LineStyleRequest>,
) -> Json<ViewResponse> {
    let mut view = state.view.lock().await;
    view.set_line_style(payload.line_style);
    Json(view.snapshot())
}
