//! Shared type definitions for the casino backend
//!
//! Canonical user, game-state and leaderboard types. These are the JSON
//! shapes exchanged over the API and the documents stored in JSONB columns.
//!
//! The server never interprets the client-owned documents (history entries,
//! achievements, stats): they are stored and returned exactly as sent. The
//! typed [`GameResult`] and [`Achievement`] are what the player session
//! produces before they are turned into documents.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Numeric user identifier (BIGSERIAL)
pub type UserId = i64;

/// Credits granted to every new account
pub const STARTING_BALANCE: i64 = 10_000;

/// Avatar tag assigned on registration
pub const DEFAULT_AVATAR: &str = "player";

/// Entries kept in a session's history before the oldest are dropped
pub const HISTORY_LIMIT: usize = 50;

/// Rows returned per leaderboard
pub const LEADERBOARD_SIZE: i64 = 10;

/// Game family tag recorded in history entries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Slots,
    Blackjack,
    Roulette,
    Baccarat,
    Poker,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Slots => write!(f, "slots"),
            GameKind::Blackjack => write!(f, "blackjack"),
            GameKind::Roulette => write!(f, "roulette"),
            GameKind::Baccarat => write!(f, "baccarat"),
            GameKind::Poker => write!(f, "poker"),
        }
    }
}

/// Timestamps inside documents use the browser's `toISOString` shape
fn iso_millis(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// An unlocked (or unlockable) achievement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    /// JSON document as stored in the achievements lists
    pub fn to_document(&self) -> Value {
        let mut document = json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "icon": self.icon,
        });
        if let Some(at) = self.unlocked_at {
            document["unlockedAt"] = Value::String(iso_millis(at));
        }
        document
    }
}

/// One entry of a player's game history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// Millisecond timestamp of when the round was recorded
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: GameKind,
    pub game_name: String,
    pub bet: i64,
    /// Net win, zero for losses and pushes
    pub win: i64,
    pub timestamp: DateTime<Utc>,
}

impl GameResult {
    /// JSON document as stored in the game history
    pub fn to_document(&self) -> Value {
        json!({
            "id": self.id,
            "type": self.kind.to_string(),
            "gameName": self.game_name,
            "bet": self.bet,
            "win": self.win,
            "timestamp": iso_millis(self.timestamp),
        })
    }
}

/// Aggregate play statistics kept on the user row
///
/// The document is kept exactly as written, so shallow merges never drop or
/// rewrite keys. The counters are read leniently: missing, null and
/// non-numeric values read as zero, fractions are floored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct UserStats(Map<String, Value>);

impl Default for UserStats {
    /// The document a fresh account starts with
    fn default() -> Self {
        let mut stats = Map::new();
        stats.insert(Self::TOTAL_GAMES.to_string(), json!(0));
        stats.insert(Self::TOTAL_WINS.to_string(), json!(0));
        stats.insert(Self::BIGGEST_WIN.to_string(), json!(0));
        stats.insert(Self::BIGGEST_JACKPOT.to_string(), json!(0));
        stats.insert(Self::FAVORITE_GAME.to_string(), Value::Null);
        Self(stats)
    }
}

impl UserStats {
    pub const TOTAL_GAMES: &'static str = "totalGames";
    pub const TOTAL_WINS: &'static str = "totalWins";
    pub const BIGGEST_WIN: &'static str = "biggestWin";
    pub const BIGGEST_JACKPOT: &'static str = "biggestJackpot";
    pub const FAVORITE_GAME: &'static str = "favoriteGame";

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Lenient integer read of `key`
    pub fn integer(&self, key: &str) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.floor() as i64))
                .unwrap_or(0),
            _ => 0,
        }
    }

    pub fn total_games(&self) -> i64 {
        self.integer(Self::TOTAL_GAMES)
    }

    pub fn total_wins(&self) -> i64 {
        self.integer(Self::TOTAL_WINS)
    }

    pub fn biggest_win(&self) -> i64 {
        self.integer(Self::BIGGEST_WIN)
    }

    pub fn biggest_jackpot(&self) -> i64 {
        self.integer(Self::BIGGEST_JACKPOT)
    }

    pub fn favorite_game(&self) -> Option<&str> {
        self.0.get(Self::FAVORITE_GAME).and_then(Value::as_str)
    }

    /// Shallow-merge `updates` over these stats, key by key
    pub fn merge(&mut self, updates: &Map<String, Value>) {
        for (key, value) in updates {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

/// Public view of an account; the password never leaves the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub avatar: String,
    #[serde(default)]
    pub achievements: Vec<Value>,
    #[serde(default)]
    pub stats: UserStats,
    #[serde(default)]
    pub last_daily_bonus: Option<DateTime<Utc>>,
}

impl User {
    /// A fresh account as it looks right after registration
    pub fn new(id: UserId, username: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            username: username.into(),
            balance: STARTING_BALANCE,
            created_at,
            avatar: DEFAULT_AVATAR.to_string(),
            achievements: Vec::new(),
            stats: UserStats::default(),
            last_daily_bonus: None,
        }
    }

    /// Offline player used when no API server is available
    pub fn guest(created_at: DateTime<Utc>) -> Self {
        Self::new(0, "Guest", created_at)
    }
}

/// Partial profile update
///
/// `balance`, `avatar` and `last_daily_bonus` replace the stored value when
/// present; `achievements` replaces the list; `stats` is shallow-merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_daily_bonus: Option<DateTime<Utc>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self == &UserPatch::default()
    }

    /// Apply this patch to `user` in place
    pub fn apply(&self, user: &mut User) {
        if let Some(stats) = &self.stats {
            user.stats.merge(stats);
        }
        if let Some(balance) = self.balance {
            user.balance = balance;
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = avatar.clone();
        }
        if let Some(achievements) = &self.achievements {
            user.achievements = achievements.clone();
        }
        if let Some(at) = self.last_daily_bonus {
            user.last_daily_bonus = Some(at);
        }
    }
}

/// Per-user persisted game bundle, replaced wholesale on every save
///
/// History entries and achievements are opaque documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub game_history: Vec<Value>,
    #[serde(default)]
    pub achievements: Vec<Value>,
    #[serde(default)]
    pub current_streak: i64,
    #[serde(default)]
    pub progressive_jackpot: i64,
}

/// Id of an achievement document, if it has one
pub fn document_id(document: &Value) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

/// Stat a leaderboard is ranked by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardStat {
    BiggestWin,
    TotalGames,
    BiggestJackpot,
}

impl LeaderboardStat {
    pub const ALL: [LeaderboardStat; 3] = [
        LeaderboardStat::BiggestWin,
        LeaderboardStat::TotalGames,
        LeaderboardStat::BiggestJackpot,
    ];

    /// Key of the stat inside the `stats` JSON document
    pub fn json_key(self) -> &'static str {
        match self {
            LeaderboardStat::BiggestWin => UserStats::BIGGEST_WIN,
            LeaderboardStat::TotalGames => UserStats::TOTAL_GAMES,
            LeaderboardStat::BiggestJackpot => UserStats::BIGGEST_JACKPOT,
        }
    }

    pub fn score(self, stats: &UserStats) -> i64 {
        stats.integer(self.json_key())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub highest_win: Vec<LeaderboardEntry>,
    pub most_games: Vec<LeaderboardEntry>,
    pub biggest_jackpot: Vec<LeaderboardEntry>,
}

/// Current wall-clock time truncated to millisecond precision
///
/// PostgreSQL keeps microseconds and JSON clients keep milliseconds, so
/// timestamps are normalised before they are stored or compared.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let mut user = User::new(1, "alice", now_millis());
        user.stats.set(UserStats::TOTAL_GAMES, 12);
        user.stats.set(UserStats::BIGGEST_WIN, 400);
        user.achievements.push(json!({
            "id": "first_spin",
            "name": "First Spin",
            "description": "Play your first slot spin",
            "icon": "🎰",
            "unlockedAt": "2024-05-01T12:00:00.000Z"
        }));
        user
    }

    #[test]
    fn test_user_serializes_camel_case_without_password() {
        let user = sample_user();
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value["balance"], json!(STARTING_BALANCE));
        assert_eq!(value["avatar"], json!("player"));
        assert_eq!(value["stats"]["totalGames"], json!(12));
        assert_eq!(value["stats"]["favoriteGame"], Value::Null);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("lastDailyBonus").is_some());
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_balance_only_patch_keeps_stats_and_achievements() {
        let mut user = sample_user();
        let before = user.clone();

        let patch = UserPatch {
            balance: Some(9_500),
            ..Default::default()
        };
        patch.apply(&mut user);

        assert_eq!(user.balance, 9_500);
        assert_eq!(user.stats, before.stats);
        assert_eq!(user.achievements, before.achievements);
    }

    #[test]
    fn test_stats_patch_is_shallow_merge() {
        let mut user = sample_user();
        user.stats.set("luckyNumber", 7);

        let patch: UserPatch =
            serde_json::from_value(json!({ "stats": { "biggestWin": 900, "favoriteGame": "poker" } }))
                .unwrap();
        patch.apply(&mut user);

        assert_eq!(user.stats.biggest_win(), 900);
        assert_eq!(user.stats.total_games(), 12);
        assert_eq!(user.stats.favorite_game(), Some("poker"));
        assert_eq!(user.stats.get("luckyNumber"), Some(&json!(7)));
    }

    #[test]
    fn test_stats_keep_values_of_any_type() {
        let mut user = sample_user();
        let patch: UserPatch = serde_json::from_value(json!({
            "stats": { "biggestWin": 12.5, "favoriteGame": 3, "totalGames": null }
        }))
        .unwrap();
        patch.apply(&mut user);

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["stats"]["biggestWin"], json!(12.5));
        assert_eq!(value["stats"]["favoriteGame"], json!(3));
        assert_eq!(value["stats"]["totalGames"], Value::Null);

        assert_eq!(user.stats.biggest_win(), 12);
        assert_eq!(user.stats.total_games(), 0);
        assert_eq!(user.stats.favorite_game(), None);
        assert_eq!(LeaderboardStat::BiggestWin.score(&user.stats), 12);
    }

    #[test]
    fn test_game_state_defaults_missing_fields() {
        let state: GameState = serde_json::from_value(json!({ "currentStreak": 3 })).unwrap();
        assert!(state.game_history.is_empty());
        assert_eq!(state.current_streak, 3);
        assert_eq!(state.progressive_jackpot, 0);
    }

    #[test]
    fn test_game_state_documents_are_opaque() {
        let written = json!({
            "gameHistory": [{
                "id": 1714564800000_i64,
                "type": "keno",
                "gameName": "Keno",
                "bet": 10,
                "win": 0,
                "timestamp": "2024-05-01T12:00:00.000Z",
                "seed": "abc"
            }],
            "achievements": [{ "id": "first_spin", "unlockedAt": "2024-05-01T12:00:00.000Z" }],
            "currentStreak": 0,
            "progressiveJackpot": 0
        });
        let state: GameState = serde_json::from_value(written.clone()).unwrap();
        assert_eq!(serde_json::to_value(&state).unwrap(), written);
        assert_eq!(document_id(&state.achievements[0]), Some("first_spin"));
    }

    #[test]
    fn test_documents_use_browser_timestamps() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = GameResult {
            id: 1,
            kind: GameKind::Poker,
            game_name: "Video Poker".to_string(),
            bet: 10,
            win: 0,
            timestamp: at,
        };
        let value = entry.to_document();
        assert_eq!(value["type"], json!("poker"));
        assert_eq!(value["gameName"], json!("Video Poker"));
        assert_eq!(value["timestamp"], json!("2024-05-01T12:00:00.000Z"));

        let achievement = Achievement {
            id: "first_deal".to_string(),
            name: "First Deal".to_string(),
            description: "Play your first hand of blackjack".to_string(),
            icon: "🃏".to_string(),
            unlocked_at: Some(at),
        };
        assert_eq!(
            achievement.to_document()["unlockedAt"],
            json!("2024-05-01T12:00:00.000Z")
        );
    }
}
