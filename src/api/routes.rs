use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::AppState;
use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    routes::{self, assistant, bookmarks, notifications, player, view},
};

/// Creates the main router with all routes and layers
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Browse and search
        .route("/view", get(view::get_view))
        .route("/tab", post(view::set_tab))
        .route("/search", get(view::search))
        .route("/select", post(view::select).delete(view::close_detail))
        // Watch view
        .route("/play", post(player::play))
        .route("/back", post(player::back))
        .route("/player", get(player::get_player))
        .route("/player/servers", get(player::servers))
        .route("/player/server", post(player::select_server))
        .route("/player/season", post(player::select_season))
        .route("/player/episode", post(player::select_episode))
        .route("/player/fullscreen", post(player::set_fullscreen))
        // My list
        .route("/bookmarks", get(bookmarks::list))
        .route("/bookmarks/toggle", post(bookmarks::toggle))
        // Assistant
        .route(
            "/assistant",
            post(assistant::ask)
                .get(assistant::history)
                .delete(assistant::clear),
        )
        // Notifications
        .route(
            "/notifications",
            get(notifications::list).delete(notifications::clear),
        )
        .route("/notifications/open", post(notifications::open))
        .route("/notifications/permission", post(notifications::request_permission))
}
