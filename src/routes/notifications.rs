use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{
    api::AppState,
    services::notifications::{Notification, Permission},
};

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub unread: usize,
    pub permission: Permission,
    pub items: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub permission: Permission,
}

fn respond(state: &AppState, items: Vec<Notification>) -> Json<NotificationsResponse> {
    Json(NotificationsResponse {
        unread: state.notifications.unread_count(),
        permission: state.notifications.permission(),
        items,
    })
}

pub async fn list(State(state): State<AppState>) -> Json<NotificationsResponse> {
    let items = state.notifications.list();
    respond(&state, items)
}

/// Opening the panel marks everything read
pub async fn open(State(state): State<AppState>) -> Json<NotificationsResponse> {
    let items = state.notifications.open();
    respond(&state, items)
}

pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.notifications.clear();
    StatusCode::NO_CONTENT
}

pub async fn request_permission(State(state): State<AppState>) -> Json<PermissionResponse> {
    Json(PermissionResponse {
        permission: state.notifications.request_permission().await,
    })
}
