//! Route Definitions
//!
//! Maps URLs to handlers. `/api` and `/health` are JSON; every other path is
//! served from the static client build, falling back to `index.html`.

use super::handlers::*;
use axum::{
    routing::{get, post},
    Router,
};
use std::{path::Path, sync::Arc};
use tower_http::services::{ServeDir, ServeFile};

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/users/:id", get(get_user_handler).patch(patch_user_handler))
        .route(
            "/game-state/:user_id",
            get(get_game_state_handler).put(put_game_state_handler),
        )
        .route("/leaderboards", get(leaderboards_handler))
        .route("/achievements", get(achievements_handler))
        .fallback(api_not_found_handler);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api);

    let router = match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router.fallback(api_not_found_handler),
    };

    router.with_state(state)
}

