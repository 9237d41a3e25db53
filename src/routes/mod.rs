use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::CatalogItem,
};

pub mod assistant;
pub mod bookmarks;
pub mod notifications;
pub mod player;
pub mod view;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Items posted by clients must at least carry an id
fn require_id(item: &CatalogItem) -> AppResult<()> {
    if item.id.trim().is_empty() {
        return Err(AppError::InvalidInput("Item id cannot be empty".to_string()));
    }
    Ok(())
}
