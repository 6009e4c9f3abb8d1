//! API Request and Response Models
//!
//! Envelopes wrapping the shared types, shared by the server and the client.

use crate::common::{Achievement, GameState, Leaderboard, User};
use serde::{Deserialize, Serialize};

/// Register and login body; fields are optional so that missing ones are
/// reported as validation errors rather than rejected by the extractor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateEnvelope {
    pub state: GameState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEnvelope {
    pub leaderboard: Leaderboard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementsEnvelope {
    pub achievements: Vec<Achievement>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Whether a store is configured
    pub database: bool,
}
