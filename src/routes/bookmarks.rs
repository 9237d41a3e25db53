use axum::{extract::State, Json};
use serde::Serialize;

use super::require_id;
use crate::{api::AppState, error::AppResult, models::CatalogItem};

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub bookmarked: bool,
    pub items: Vec<CatalogItem>,
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<CatalogItem>> {
    Json(state.orchestrator.bookmarks().await)
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(item): Json<CatalogItem>,
) -> AppResult<Json<ToggleResponse>> {
    require_id(&item)?;
    let bookmarked = state.orchestrator.toggle_bookmark(item).await;
    Ok(Json(ToggleResponse {
        bookmarked,
        items: state.orchestrator.bookmarks().await,
    }))
}
