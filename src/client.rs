//! HTTP client for the casino API
//!
//! Used by the simulator to register, log in and push session progress to a
//! running server. Error envelopes are decoded into [`ClientError::Api`].

use crate::api::errors::ErrorResponse;
use crate::api::models::{
    AchievementsEnvelope, CredentialsRequest, HealthResponse, LeaderboardEnvelope, StateEnvelope,
    UserEnvelope,
};
use crate::common::{Achievement, GameState, Leaderboard, User, UserId, UserPatch};
use crate::errors::{ClientError, ClientResult};
use crate::session::PlayerSession;
use reqwest::{Client as HttpClient, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout for connections and requests
const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct CasinoClient {
    base_url: Url,
    http: HttpClient,
}

impl CasinoClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        // Url::join drops the last segment unless the base ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url =
            Url::parse(&normalized).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;

        let http = HttpClient::builder().timeout(TIMEOUT).build()?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let response = self.http.get(self.url("health")?).send().await?;
        decode(response).await
    }

    pub async fn register(&self, username: &str, password: &str) -> ClientResult<User> {
        let response = self
            .http
            .post(self.url("api/auth/register")?)
            .json(&CredentialsRequest::new(username, password))
            .send()
            .await?;
        let envelope: UserEnvelope = decode(response).await?;
        debug!(user_id = envelope.user.id, "Registered");
        Ok(envelope.user)
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<User> {
        let response = self
            .http
            .post(self.url("api/auth/login")?)
            .json(&CredentialsRequest::new(username, password))
            .send()
            .await?;
        let envelope: UserEnvelope = decode(response).await?;
        Ok(envelope.user)
    }

    pub async fn get_user(&self, id: UserId) -> ClientResult<User> {
        let response = self.http.get(self.url(&format!("api/users/{id}"))?).send().await?;
        let envelope: UserEnvelope = decode(response).await?;
        Ok(envelope.user)
    }

    pub async fn update_user(&self, id: UserId, patch: &UserPatch) -> ClientResult<User> {
        let response = self
            .http
            .patch(self.url(&format!("api/users/{id}"))?)
            .json(patch)
            .send()
            .await?;
        let envelope: UserEnvelope = decode(response).await?;
        Ok(envelope.user)
    }

    pub async fn get_game_state(&self, user_id: UserId) -> ClientResult<GameState> {
        let response = self
            .http
            .get(self.url(&format!("api/game-state/{user_id}"))?)
            .send()
            .await?;
        let envelope: StateEnvelope = decode(response).await?;
        Ok(envelope.state)
    }

    pub async fn put_game_state(&self, user_id: UserId, state: &GameState) -> ClientResult<()> {
        let response = self
            .http
            .put(self.url(&format!("api/game-state/{user_id}"))?)
            .json(state)
            .send()
            .await?;
        ensure_success(response).await
    }

    pub async fn leaderboards(&self) -> ClientResult<Leaderboard> {
        let response = self.http.get(self.url("api/leaderboards")?).send().await?;
        let envelope: LeaderboardEnvelope = decode(response).await?;
        Ok(envelope.leaderboard)
    }

    pub async fn achievements(&self) -> ClientResult<Vec<Achievement>> {
        let response = self.http.get(self.url("api/achievements")?).send().await?;
        let envelope: AchievementsEnvelope = decode(response).await?;
        Ok(envelope.achievements)
    }

    /// Push a session's profile and game state to the server.
    ///
    /// Failures are logged and returned; the session itself is left untouched
    /// so play can continue offline.
    pub async fn sync_session(&self, session: &PlayerSession) -> ClientResult<User> {
        let user_id = session.user().id;

        let user = match self.update_user(user_id, &session.profile_patch()).await {
            Ok(user) => user,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to sync profile");
                return Err(e);
            }
        };

        if let Err(e) = self.put_game_state(user_id, session.state()).await {
            warn!(user_id, error = %e, "Failed to sync game state");
            return Err(e);
        }

        Ok(user)
    }
}

async fn ensure_success(response: Response) -> ClientResult<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(api_error(response).await)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json::<T>().await?)
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let message = match response.text().await {
        Ok(body) => match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(envelope) => envelope.error.message,
            Err(_) => body,
        },
        Err(e) => e.to_string(),
    };
    ClientError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = CasinoClient::new("http://localhost:3000/casino").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3000/casino/");
        assert_eq!(
            client.url("api/users/7").unwrap().as_str(),
            "http://localhost:3000/casino/api/users/7"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        match CasinoClient::new("not a url") {
            Err(ClientError::InvalidUrl(_)) => {}
            other => panic!("Expected invalid URL, got {:?}", other.map(|_| ())),
        }
    }
}
