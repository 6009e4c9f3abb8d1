//! Shared traits and interfaces
//!
//! The API handlers only talk to persistence through [`CasinoStore`], so the
//! PostgreSQL store and the in-memory store are interchangeable.

use crate::common::types::{
    GameState, LeaderboardEntry, LeaderboardStat, User, UserId, UserPatch,
};
use crate::errors::StoreResult;
use async_trait::async_trait;

/// Persistence interface for accounts and per-user game state
#[async_trait]
pub trait CasinoStore: Send + Sync {
    /// Whether an account with this exact username exists
    async fn username_exists(&self, username: &str) -> StoreResult<bool>;

    /// Create an account with default balance and an empty game-state row.
    /// Fails with `StoreError::DuplicateUsername` when the name is taken.
    async fn create_user(&self, username: &str, password: &str) -> StoreResult<User>;

    /// Look up an account by exact username and plaintext password
    async fn find_by_credentials(&self, username: &str, password: &str)
        -> StoreResult<Option<User>>;

    /// Insert an empty game-state row unless one already exists
    async fn ensure_game_state(&self, user_id: UserId) -> StoreResult<()>;

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Read-merge-write of a profile; `None` when the user does not exist
    async fn update_user(&self, id: UserId, patch: &UserPatch) -> StoreResult<Option<User>>;

    /// Stored game state, lazily creating an empty row on first access
    async fn load_game_state(&self, user_id: UserId) -> StoreResult<GameState>;

    /// Replace the whole game state (upsert)
    async fn save_game_state(&self, user_id: UserId, state: &GameState) -> StoreResult<()>;

    /// Top `limit` users ordered by `stat`, highest first
    async fn top_users(&self, stat: LeaderboardStat, limit: i64)
        -> StoreResult<Vec<LeaderboardEntry>>;
}
