//! Request Handlers
//!
//! Thin handlers over [`CasinoStore`]; every data endpoint answers 500 when
//! no store is configured.

use super::{errors::ApiError, middleware::RequestId, models::*};
use crate::achievements;
use crate::common::{
    CasinoStore, GameState, Leaderboard, LeaderboardStat, UserId, UserPatch, LEADERBOARD_SIZE,
};
use crate::errors::StoreError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{debug, info};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 4;

/// Shared application state
pub struct AppState {
    pub store: Option<Arc<dyn CasinoStore>>,
    pub version: String,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn CasinoStore>>) -> Self {
        Self {
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn store(&self, request_id: &RequestId) -> Result<&dyn CasinoStore, ApiError> {
        self.store
            .as_deref()
            .ok_or_else(|| ApiError::unconfigured(&request_id.0))
    }
}

fn parse_user_id(request_id: &RequestId, raw: &str) -> Result<UserId, ApiError> {
    raw.parse::<UserId>()
        .map_err(|_| ApiError::bad_request(&request_id.0, format!("Invalid user id: {}", raw)))
}

fn json_body<T>(request_id: &RequestId, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(&request_id.0, rejection.body_text()))
}

/// Extract non-empty credentials, the shared first check of register and login
fn credentials(
    request_id: &RequestId,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(String, String), ApiError> {
    let body = payload.map(|Json(body)| body).unwrap_or_default();
    match (body.username, body.password) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            Ok((username, password))
        }
        _ => Err(ApiError::bad_request(
            &request_id.0,
            "Username and password are required.",
        )),
    }
}

/// Health check handler
/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.version.clone(),
        database: state.store.is_some(),
    })
}

/// POST /api/auth/register
pub async fn register_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    let store = state.store(&request_id)?;
    let (username, password) = credentials(&request_id, payload)?;

    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ApiError::bad_request(
            &request_id.0,
            "Username must be at least 3 characters.",
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(
            &request_id.0,
            "Password must be at least 4 characters.",
        ));
    }

    let taken = store
        .username_exists(&username)
        .await
        .map_err(|e| ApiError::from_store(&request_id.0, "Registration failed", e))?;
    if taken {
        return Err(ApiError::conflict(&request_id.0, "Username already exists"));
    }

    let user = match store.create_user(&username, &password).await {
        Ok(user) => user,
        Err(StoreError::DuplicateUsername(_)) => {
            return Err(ApiError::conflict(&request_id.0, "Username already exists"));
        }
        Err(e) => return Err(ApiError::from_store(&request_id.0, "Registration failed", e)),
    };

    info!(user_id = user.id, username = %user.username, "Registered user");
    Ok((StatusCode::CREATED, Json(UserEnvelope { user })))
}

/// POST /api/auth/login
pub async fn login_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let store = state.store(&request_id)?;
    let (username, password) = credentials(&request_id, payload)?;

    let user = store
        .find_by_credentials(&username, &password)
        .await
        .map_err(|e| ApiError::from_store(&request_id.0, "Login failed", e))?
        .ok_or_else(|| ApiError::unauthorized(&request_id.0, "Invalid username or password"))?;

    store
        .ensure_game_state(user.id)
        .await
        .map_err(|e| ApiError::from_store(&request_id.0, "Login failed", e))?;

    debug!(user_id = user.id, "User logged in");
    Ok(Json(UserEnvelope { user }))
}

/// GET /api/users/:id
pub async fn get_user_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let store = state.store(&request_id)?;
    let id = parse_user_id(&request_id, &raw_id)?;

    let user = store
        .get_user(id)
        .await
        .map_err(|e| ApiError::from_store(&request_id.0, "Failed to fetch user", e))?
        .ok_or_else(|| ApiError::not_found(&request_id.0, "User not found"))?;

    Ok(Json(UserEnvelope { user }))
}

/// PATCH /api/users/:id
pub async fn patch_user_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let store = state.store(&request_id)?;
    let id = parse_user_id(&request_id, &raw_id)?;
    let patch = json_body(&request_id, payload)?;

    let user = store
        .update_user(id, &patch)
        .await
        .map_err(|e| ApiError::from_store(&request_id.0, "Failed to update user", e))?
        .ok_or_else(|| ApiError::not_found(&request_id.0, "User not found"))?;

    Ok(Json(UserEnvelope { user }))
}

/// GET /api/game-state/:user_id
pub async fn get_game_state_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<StateEnvelope>, ApiError> {
    let store = state.store(&request_id)?;
    let user_id = parse_user_id(&request_id, &raw_id)?;

    let game_state = store
        .load_game_state(user_id)
        .await
        .map_err(|e| ApiError::from_store(&request_id.0, "Failed to fetch game state", e))?;

    Ok(Json(StateEnvelope { state: game_state }))
}

/// PUT /api/game-state/:user_id
pub async fn put_game_state_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<GameState>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let store = state.store(&request_id)?;
    let user_id = parse_user_id(&request_id, &raw_id)?;
    let game_state = json_body(&request_id, payload)?;

    store
        .save_game_state(user_id, &game_state)
        .await
        .map_err(|e| ApiError::from_store(&request_id.0, "Failed to save game state", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/leaderboards
pub async fn leaderboards_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<LeaderboardEnvelope>, ApiError> {
    let store = state.store(&request_id)?;

    let mut leaderboard = Leaderboard::default();
    for stat in LeaderboardStat::ALL {
        let entries = store
            .top_users(stat, LEADERBOARD_SIZE)
            .await
            .map_err(|e| ApiError::from_store(&request_id.0, "Failed to fetch leaderboards", e))?;
        match stat {
            LeaderboardStat::BiggestWin => leaderboard.highest_win = entries,
            LeaderboardStat::TotalGames => leaderboard.most_games = entries,
            LeaderboardStat::BiggestJackpot => leaderboard.biggest_jackpot = entries,
        }
    }

    Ok(Json(LeaderboardEnvelope { leaderboard }))
}

/// GET /api/achievements
pub async fn achievements_handler() -> Json<AchievementsEnvelope> {
    Json(AchievementsEnvelope {
        achievements: achievements::catalog(),
    })
}

/// Unknown paths under /api
pub async fn api_not_found_handler(Extension(request_id): Extension<RequestId>) -> ApiError {
    ApiError::not_found(&request_id.0, "Endpoint not found")
}
