use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use serde_json::Value;

use super::schema;
use crate::common::{GameState, LeaderboardEntry, User, UserId, UserStats};
use crate::errors::StoreResult;

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = schema::users)]
pub struct UserRow {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub avatar: String,
    pub achievements: Value,
    pub stats: Value,
    pub last_daily_bonus: Option<DateTime<Utc>>,
}

impl UserRow {
    pub fn into_user(self) -> StoreResult<User> {
        Ok(User {
            id: self.id,
            username: self.username,
            balance: self.balance,
            created_at: self.created_at,
            avatar: self.avatar,
            achievements: document_or_default::<Vec<Value>>(self.achievements)?,
            stats: document_or_default::<UserStats>(self.stats)?,
            last_daily_bonus: self.last_daily_bonus,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Columns written by a profile update. `None` for the bonus timestamp leaves
/// the stored value alone.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::users)]
pub struct UserChanges {
    pub balance: i64,
    pub avatar: String,
    pub achievements: Value,
    pub stats: Value,
    pub last_daily_bonus: Option<DateTime<Utc>>,
}

impl UserChanges {
    pub fn from_user(user: &User) -> Self {
        Self {
            balance: user.balance,
            avatar: user.avatar.clone(),
            achievements: Value::Array(user.achievements.clone()),
            stats: Value::Object(user.stats.as_map().clone()),
            last_daily_bonus: user.last_daily_bonus,
        }
    }
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = schema::game_states)]
pub struct GameStateRow {
    pub user_id: UserId,
    pub game_history: Value,
    pub achievements: Value,
    pub current_streak: i64,
    pub progressive_jackpot: i64,
    pub updated_at: DateTime<Utc>,
}

impl GameStateRow {
    pub fn into_state(self) -> StoreResult<GameState> {
        Ok(GameState {
            game_history: document_or_default::<Vec<Value>>(self.game_history)?,
            achievements: document_or_default::<Vec<Value>>(self.achievements)?,
            current_streak: self.current_streak,
            progressive_jackpot: self.progressive_jackpot,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::game_states)]
pub struct NewGameState {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::game_states)]
pub struct GameStateUpsert {
    pub user_id: UserId,
    pub game_history: Value,
    pub achievements: Value,
    pub current_streak: i64,
    pub progressive_jackpot: i64,
    pub updated_at: DateTime<Utc>,
}

impl GameStateUpsert {
    pub fn new(user_id: UserId, state: &GameState, updated_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            game_history: Value::Array(state.game_history.clone()),
            achievements: Value::Array(state.achievements.clone()),
            current_streak: state.current_streak,
            progressive_jackpot: state.progressive_jackpot,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, QueryableByName)]
pub struct ScoreRow {
    #[diesel(sql_type = Text)]
    pub username: String,
    #[diesel(sql_type = BigInt)]
    pub score: i64,
}

impl From<ScoreRow> for LeaderboardEntry {
    fn from(row: ScoreRow) -> Self {
        LeaderboardEntry {
            username: row.username,
            score: row.score,
        }
    }
}

/// JSONB columns may hold `null` for rows written by older clients
fn document_or_default<T>(value: Value) -> StoreResult<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::now_millis;
    use serde_json::json;

    fn row() -> UserRow {
        UserRow {
            id: 3,
            username: "carol".to_string(),
            password: "hunter22".to_string(),
            balance: 10_000,
            created_at: now_millis(),
            avatar: "player".to_string(),
            achievements: Value::Null,
            stats: json!({ "totalGames": 4, "biggestWin": 120, "favoriteGame": "slots", "luck": 0.5 }),
            last_daily_bonus: None,
        }
    }

    #[test]
    fn test_user_row_conversion_tolerates_null_documents() {
        let user = row().into_user().unwrap();
        assert_eq!(user.id, 3);
        assert!(user.achievements.is_empty());
        assert_eq!(user.stats.total_games(), 4);
        assert_eq!(user.stats.favorite_game(), Some("slots"));
    }

    #[test]
    fn test_game_state_row_conversion() {
        let state = GameStateRow {
            user_id: 3,
            game_history: json!([{ "id": 7, "type": "keno", "timestamp": "2024-05-01T12:00:00.000Z" }]),
            achievements: json!([]),
            current_streak: 2,
            progressive_jackpot: 150,
            updated_at: now_millis(),
        }
        .into_state()
        .unwrap();

        assert_eq!(state.current_streak, 2);
        assert_eq!(state.progressive_jackpot, 150);
        assert_eq!(state.game_history[0]["type"], "keno");
        assert_eq!(state.game_history[0]["timestamp"], "2024-05-01T12:00:00.000Z");

        let upsert = GameStateUpsert::new(3, &state, now_millis());
        assert_eq!(
            upsert.game_history,
            json!([{ "id": 7, "type": "keno", "timestamp": "2024-05-01T12:00:00.000Z" }])
        );
    }

    #[test]
    fn test_changes_round_trip_stats_document() {
        let user = row().into_user().unwrap();
        let changes = UserChanges::from_user(&user);
        assert_eq!(changes.stats["biggestWin"], json!(120));
        assert_eq!(changes.stats["luck"], json!(0.5));
        assert_eq!(changes.achievements, json!([]));
    }
}
