use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{api::AppState, models::ChatMessage};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Replies with the model's message, or 204 for a blank prompt
pub async fn ask(State(state): State<AppState>, Json(request): Json<AskRequest>) -> Response {
    match state.assistant.ask(&request.prompt).await {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn history(State(state): State<AppState>) -> Json<Vec<ChatMessage>> {
    Json(state.assistant.history().await)
}

pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.assistant.clear().await;
    StatusCode::NO_CONTENT
}
