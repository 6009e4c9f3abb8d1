//! In-memory store
//!
//! Backs the API when no database is wired in (tests, local development).
//! A single lock covers both tables, so each operation is atomic.

use crate::common::{
    now_millis, CasinoStore, GameState, LeaderboardEntry, LeaderboardStat, User, UserId,
    UserPatch,
};
use crate::errors::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

struct StoredUser {
    user: User,
    password: String,
}

#[derive(Default)]
struct Tables {
    last_id: UserId,
    users: BTreeMap<UserId, StoredUser>,
    game_states: HashMap<UserId, GameState>,
}

/// Thread-safe in-memory implementation of [`CasinoStore`]
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl CasinoStore for InMemoryStore {
    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| u.user.username == username))
    }

    async fn create_user(&self, username: &str, password: &str) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.user.username == username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }

        tables.last_id += 1;
        let id = tables.last_id;
        let user = User::new(id, username, now_millis());
        tables.users.insert(
            id,
            StoredUser {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        tables.game_states.entry(id).or_default();
        Ok(user)
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.user.username == username && u.password == password)
            .map(|u| u.user.clone()))
    }

    async fn ensure_game_state(&self, user_id: UserId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }
        tables.game_states.entry(user_id).or_default();
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|u| u.user.clone()))
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        let mut user = stored.user.clone();
        patch.apply(&mut user);
        stored.user = user.clone();
        Ok(Some(user))
    }

    async fn load_game_state(&self, user_id: UserId) -> StoreResult<GameState> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }
        Ok(tables.game_states.entry(user_id).or_default().clone())
    }

    async fn save_game_state(&self, user_id: UserId, state: &GameState) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }
        tables.game_states.insert(user_id, state.clone());
        Ok(())
    }

    async fn top_users(
        &self,
        stat: LeaderboardStat,
        limit: i64,
    ) -> StoreResult<Vec<LeaderboardEntry>> {
        let tables = self.tables.read().await;
        // BTreeMap iteration is in id order, and the stable sort keeps it for ties
        let mut entries: Vec<LeaderboardEntry> = tables
            .users
            .values()
            .map(|u| LeaderboardEntry {
                username: u.user.username.clone(),
                score: stat.score(&u.user.stats),
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_user_rejects_duplicates() {
        let store = InMemoryStore::new();
        let alice = store.create_user("alice", "secret").await.unwrap();
        assert_eq!(alice.id, 1);
        assert_eq!(alice.balance, 10_000);

        let err = store.create_user("alice", "other").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername(name) if name == "alice"));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_credentials_must_match_exactly() {
        let store = InMemoryStore::new();
        store.create_user("alice", "secret").await.unwrap();

        assert!(store.find_by_credentials("alice", "secret").await.unwrap().is_some());
        assert!(store.find_by_credentials("alice", "Secret").await.unwrap().is_none());
        assert!(store.find_by_credentials("bob", "secret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none() {
        let store = InMemoryStore::new();
        let patch = UserPatch {
            balance: Some(5),
            ..Default::default()
        };
        assert!(store.update_user(42, &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_game_state_requires_user() {
        let store = InMemoryStore::new();
        let err = store.load_game_state(9).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser(9)));
    }

    #[tokio::test]
    async fn test_top_users_sorted_and_capped() {
        let store = InMemoryStore::new();
        for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
            let user = store.create_user(name, "pass").await.unwrap();
            let stats = json!({ "totalGames": (i as i64) * 10 });
            let patch = UserPatch {
                stats: stats.as_object().cloned(),
                ..Default::default()
            };
            store.update_user(user.id, &patch).await.unwrap();
        }

        let top = store.top_users(LeaderboardStat::TotalGames, 3).await.unwrap();
        let names: Vec<&str> = top.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["d", "c", "b"]);
        assert_eq!(top[0].score, 30);
    }

    #[tokio::test]
    async fn test_fractional_and_foreign_stats_are_kept() {
        let store = InMemoryStore::new();
        let user = store.create_user("dora", "pass").await.unwrap();
        let patch = UserPatch {
            stats: json!({ "biggestWin": 12.5, "mood": "lucky" }).as_object().cloned(),
            ..Default::default()
        };
        let updated = store.update_user(user.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.stats.get("biggestWin"), Some(&json!(12.5)));
        assert_eq!(updated.stats.get("mood"), Some(&json!("lucky")));
        assert_eq!(updated.stats.total_games(), 0);

        let top = store.top_users(LeaderboardStat::BiggestWin, 10).await.unwrap();
        assert_eq!(top[0].score, 12);
    }
}
