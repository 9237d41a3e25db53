use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::require_id;
use crate::{
    api::AppState,
    error::AppResult,
    models::{CatalogItem, Tab},
    services::orchestrator::ViewSnapshot,
};

#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub tab: Tab,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub async fn get_view(State(state): State<AppState>) -> Json<ViewSnapshot> {
    Json(state.orchestrator.snapshot().await)
}

/// Switches tab and answers before the rows arrive
pub async fn set_tab(
    State(state): State<AppState>,
    Json(request): Json<TabRequest>,
) -> (StatusCode, Json<ViewSnapshot>) {
    tokio::spawn(state.orchestrator.set_tab(request.tab));
    (StatusCode::ACCEPTED, Json(state.orchestrator.snapshot().await))
}

/// Runs the search to completion; a blank `q` leaves search mode
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<ViewSnapshot> {
    state.orchestrator.search(&params.q).await;
    Json(state.orchestrator.snapshot().await)
}

pub async fn select(
    State(state): State<AppState>,
    Json(item): Json<CatalogItem>,
) -> AppResult<Json<ViewSnapshot>> {
    require_id(&item)?;
    state.orchestrator.select_item(item).await;
    Ok(Json(state.orchestrator.snapshot().await))
}

pub async fn close_detail(State(state): State<AppState>) -> Json<ViewSnapshot> {
    state.orchestrator.close_detail();
    Json(state.orchestrator.snapshot().await)
}
