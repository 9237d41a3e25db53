use axum::{extract::State, Json};
use serde::Deserialize;

use super::require_id;
use crate::{
    api::AppState,
    error::AppResult,
    models::CatalogItem,
    services::{orchestrator::ViewSnapshot, player::{EmbedServer, PlayerSnapshot}},
};

#[derive(Debug, Deserialize)]
pub struct ServerRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SeasonRequest {
    pub season: u32,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeRequest {
    pub episode: u32,
}

#[derive(Debug, Deserialize)]
pub struct FullscreenRequest {
    pub enabled: bool,
}

pub async fn play(
    State(state): State<AppState>,
    Json(item): Json<CatalogItem>,
) -> AppResult<Json<PlayerSnapshot>> {
    require_id(&item)?;
    state.orchestrator.play(item);
    Ok(Json(state.orchestrator.player()?))
}

pub async fn back(State(state): State<AppState>) -> Json<ViewSnapshot> {
    state.orchestrator.back();
    Json(state.orchestrator.snapshot().await)
}

pub async fn get_player(State(state): State<AppState>) -> AppResult<Json<PlayerSnapshot>> {
    Ok(Json(state.orchestrator.player()?))
}

pub async fn servers(State(state): State<AppState>) -> Json<Vec<EmbedServer>> {
    Json(state.orchestrator.embeds().servers.clone())
}

pub async fn select_server(
    State(state): State<AppState>,
    Json(request): Json<ServerRequest>,
) -> AppResult<Json<PlayerSnapshot>> {
    Ok(Json(state.orchestrator.select_server(&request.id)?))
}

pub async fn select_season(
    State(state): State<AppState>,
    Json(request): Json<SeasonRequest>,
) -> AppResult<Json<PlayerSnapshot>> {
    Ok(Json(state.orchestrator.select_season(request.season)?))
}

pub async fn select_episode(
    State(state): State<AppState>,
    Json(request): Json<EpisodeRequest>,
) -> AppResult<Json<PlayerSnapshot>> {
    Ok(Json(state.orchestrator.select_episode(request.episode)?))
}

pub async fn set_fullscreen(
    State(state): State<AppState>,
    Json(request): Json<FullscreenRequest>,
) -> AppResult<Json<PlayerSnapshot>> {
    Ok(Json(state.orchestrator.set_fullscreen(request.enabled)?))
}
