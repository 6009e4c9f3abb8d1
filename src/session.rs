//! Player session
//!
//! Local state container for one player: balance, history, stats, streak,
//! achievements and the progressive pool. Games compute outcomes; the session
//! applies them and produces the documents the API persists.

use crate::achievements::{self, AchievementDef};
use crate::common::{
    document_id, Achievement, GameKind, GameResult, GameState, User, UserPatch, UserStats,
    HISTORY_LIMIT,
};
use crate::errors::{GameError, RuleResult};
use crate::games::{GameTitle, RoundSummary};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::debug;

pub const DAILY_BONUS: i64 = 1_000;

/// Stats key recording which slot machines have paid out at least once
const SLOT_WINS_KEY: &str = "slotMachinesWon";

/// Outcome of settling one round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub entry: GameResult,
    pub unlocked: Vec<Achievement>,
    pub balance: i64,
}

#[derive(Debug, Clone)]
pub struct PlayerSession {
    user: User,
    state: GameState,
}

impl PlayerSession {
    pub fn new(user: User, state: GameState) -> Self {
        Self { user, state }
    }

    pub fn guest(now: DateTime<Utc>) -> Self {
        Self::new(User::guest(now), GameState::default())
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn balance(&self) -> i64 {
        self.user.balance
    }

    pub fn jackpot(&self) -> i64 {
        self.state.progressive_jackpot
    }

    pub fn ensure_affordable(&self, stake: i64) -> RuleResult<()> {
        if stake > self.user.balance {
            return Err(GameError::InsufficientBalance {
                balance: self.user.balance,
                bet: stake,
            });
        }
        Ok(())
    }

    pub fn add_to_jackpot(&mut self, amount: i64) {
        self.state.progressive_jackpot += amount;
    }

    pub fn reset_jackpot(&mut self) {
        self.state.progressive_jackpot = 0;
    }

    /// Apply a finished round: debit and credit, jackpot, history, stats,
    /// streak and achievements
    pub fn settle(&mut self, round: &RoundSummary, now: DateTime<Utc>) -> RuleResult<RoundReport> {
        self.ensure_affordable(round.bet)?;
        self.user.balance += round.payout - round.bet;

        self.add_to_jackpot(round.jackpot_contribution);
        if round.jackpot_won.is_some() {
            self.reset_jackpot();
            let biggest = self.user.stats.biggest_jackpot().max(round.net_win());
            self.user.stats.set(UserStats::BIGGEST_JACKPOT, biggest);
        }

        let entry = self.record_game(round, now);

        if round.is_win() {
            self.state.current_streak += 1;
            if GameTitle::SLOTS.contains(&round.title) {
                self.mark_slot_win(round.title);
            }
        } else {
            self.state.current_streak = 0;
        }

        let unlocked = self.check_achievements(round, now);
        debug!(
            game = %round.title,
            bet = round.bet,
            payout = round.payout,
            balance = self.user.balance,
            "Round settled"
        );

        Ok(RoundReport {
            entry,
            unlocked,
            balance: self.user.balance,
        })
    }

    /// Prepend a history entry and update the aggregate stats
    fn record_game(&mut self, round: &RoundSummary, now: DateTime<Utc>) -> GameResult {
        let kind = round.title.kind();
        let win = round.net_win();

        // Ids are millisecond stamps; keep them unique within a burst
        let mut id = now.timestamp_millis();
        if let Some(latest) = self
            .state
            .game_history
            .first()
            .and_then(|doc| doc.get("id"))
            .and_then(Value::as_i64)
        {
            id = id.max(latest + 1);
        }

        let entry = GameResult {
            id,
            kind,
            game_name: round.title.display_name().to_string(),
            bet: round.bet,
            win,
            timestamp: now,
        };
        self.state.game_history.insert(0, entry.to_document());
        self.state.game_history.truncate(HISTORY_LIMIT);

        let stats = &mut self.user.stats;
        stats.set(UserStats::TOTAL_GAMES, stats.total_games() + 1);
        if win > 0 {
            stats.set(UserStats::TOTAL_WINS, stats.total_wins() + 1);
        }
        stats.set(UserStats::BIGGEST_WIN, stats.biggest_win().max(win));
        stats.set(UserStats::FAVORITE_GAME, kind.to_string());

        entry
    }

    fn mark_slot_win(&mut self, title: GameTitle) {
        let slug = Value::String(title.to_string());
        let mut won = match self.user.stats.get(SLOT_WINS_KEY) {
            Some(Value::Array(list)) => list.clone(),
            _ => Vec::new(),
        };
        if !won.contains(&slug) {
            won.push(slug);
            self.user.stats.set(SLOT_WINS_KEY, won);
        }
    }

    fn slot_machines_won(&self) -> usize {
        match self.user.stats.get(SLOT_WINS_KEY) {
            Some(Value::Array(list)) => GameTitle::SLOTS
                .iter()
                .filter(|title| list.contains(&Value::String(title.to_string())))
                .count(),
            _ => 0,
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.state
            .achievements
            .iter()
            .any(|doc| document_id(doc) == Some(id))
    }

    fn check_achievements(&mut self, round: &RoundSummary, now: DateTime<Utc>) -> Vec<Achievement> {
        let kind = round.title.kind();
        let earned = [
            (achievements::FIRST_SPIN, kind == GameKind::Slots),
            (achievements::FIRST_DEAL, kind == GameKind::Blackjack),
            (
                achievements::LUCKY_STREAK,
                self.state.current_streak >= achievements::LUCKY_STREAK_LENGTH,
            ),
            (
                achievements::BIG_WINNER,
                round.net_win() >= achievements::BIG_WIN_THRESHOLD,
            ),
            (
                achievements::HIGH_ROLLER,
                round.bet >= achievements::HIGH_ROLLER_BET,
            ),
            (
                achievements::VIP_MEMBER,
                self.user.stats.total_games() >= achievements::VIP_GAMES,
            ),
            (
                achievements::FORTUNE_BUILDER,
                self.user.balance >= achievements::FORTUNE_BALANCE,
            ),
            (
                achievements::SLOT_MASTER,
                self.slot_machines_won() == GameTitle::SLOTS.len(),
            ),
        ];

        let mut unlocked = Vec::new();
        for (id, condition) in earned {
            if !condition || self.has_achievement(id) {
                continue;
            }
            if let Some(def) = achievements::find(id) {
                unlocked.push(self.unlock(def, now));
            }
        }
        unlocked
    }

    /// Record an achievement in both the game state and the profile
    fn unlock(&mut self, def: &AchievementDef, now: DateTime<Utc>) -> Achievement {
        let achievement = def.unlocked(now);
        let document = achievement.to_document();
        if !self
            .user
            .achievements
            .iter()
            .any(|doc| document_id(doc) == Some(def.id))
        {
            self.user.achievements.push(document.clone());
        }
        self.state.achievements.push(document);
        debug!(achievement = def.id, "Achievement unlocked");
        achievement
    }

    pub fn can_claim_daily_bonus(&self, now: DateTime<Utc>) -> bool {
        match self.user.last_daily_bonus {
            None => true,
            Some(last) => now - last >= Duration::hours(24),
        }
    }

    /// Credit the daily bonus; `None` while the 24h cooldown is running
    pub fn claim_daily_bonus(&mut self, now: DateTime<Utc>) -> Option<i64> {
        if !self.can_claim_daily_bonus(now) {
            return None;
        }
        self.user.balance += DAILY_BONUS;
        self.user.last_daily_bonus = Some(now);
        Some(self.user.balance)
    }

    /// Profile fields the session owns, as a partial update
    pub fn profile_patch(&self) -> UserPatch {
        UserPatch {
            balance: Some(self.user.balance),
            avatar: None,
            achievements: Some(self.user.achievements.clone()),
            stats: Some(self.user.stats.as_map().clone()),
            last_daily_bonus: self.user.last_daily_bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::now_millis;

    fn session() -> PlayerSession {
        PlayerSession::new(User::new(1, "alice", now_millis()), GameState::default())
    }

    fn round(title: GameTitle, bet: i64, payout: i64) -> RoundSummary {
        RoundSummary::new(title, bet, payout)
    }

    #[test]
    fn test_settle_moves_balance_and_records_net_win() {
        let mut session = session();
        let report = session
            .settle(&round(GameTitle::ClassicSlots, 100, 500), now_millis())
            .unwrap();

        assert_eq!(report.balance, 10_400);
        assert_eq!(report.entry.win, 400);
        assert_eq!(report.entry.kind, GameKind::Slots);
        assert_eq!(session.user().stats.total_games(), 1);
        assert_eq!(session.user().stats.total_wins(), 1);
        assert_eq!(session.user().stats.biggest_win(), 400);
        assert_eq!(session.user().stats.favorite_game(), Some("slots"));
        assert_eq!(session.state().game_history[0]["win"], serde_json::json!(400));
        assert_eq!(session.state().game_history[0]["type"], serde_json::json!("slots"));
        assert_eq!(session.state().current_streak, 1);
    }

    #[test]
    fn test_settle_rejects_unaffordable_stake() {
        let mut session = session();
        let err = session
            .settle(&round(GameTitle::Roulette, 20_000, 0), now_millis())
            .unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientBalance {
                balance: 10_000,
                bet: 20_000
            }
        );
        assert!(session.state().game_history.is_empty());
    }

    #[test]
    fn test_history_is_capped_and_newest_first() {
        let mut session = session();
        let now = now_millis();
        for _ in 0..60 {
            session.settle(&round(GameTitle::Baccarat, 10, 0), now).unwrap();
        }
        let history = &session.state().game_history;
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert!(history
            .windows(2)
            .all(|w| w[0]["id"].as_i64() > w[1]["id"].as_i64()));
        assert_eq!(session.user().stats.total_games(), 60);
    }

    #[test]
    fn test_push_and_loss_reset_streak() {
        let mut session = session();
        let now = now_millis();
        session.settle(&round(GameTitle::Blackjack, 10, 20), now).unwrap();
        session.settle(&round(GameTitle::Blackjack, 10, 20), now).unwrap();
        assert_eq!(session.state().current_streak, 2);

        session.settle(&round(GameTitle::Blackjack, 10, 10), now).unwrap();
        assert_eq!(session.state().current_streak, 0);
    }

    #[test]
    fn test_first_game_achievements_unlock_once() {
        let mut session = session();
        let now = now_millis();
        let first = session.settle(&round(GameTitle::VideoSlots, 10, 0), now).unwrap();
        let ids: Vec<&str> = first.unlocked.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec![achievements::FIRST_SPIN]);

        let second = session.settle(&round(GameTitle::ClassicSlots, 10, 0), now).unwrap();
        assert!(second.unlocked.is_empty());
        assert_eq!(session.user().achievements.len(), 1);
        assert_eq!(session.state().achievements.len(), 1);
    }

    #[test]
    fn test_lucky_streak_and_big_winner() {
        let mut session = session();
        let now = now_millis();
        for _ in 0..4 {
            session.settle(&round(GameTitle::Roulette, 10, 20), now).unwrap();
        }
        assert!(!session.has_achievement(achievements::LUCKY_STREAK));

        let report = session.settle(&round(GameTitle::Roulette, 1_000, 45_000), now).unwrap();
        let ids: Vec<&str> = report.unlocked.iter().map(|a| a.id.as_str()).collect();
        assert!(ids.contains(&achievements::LUCKY_STREAK));
        assert!(ids.contains(&achievements::BIG_WINNER));
        assert!(ids.contains(&achievements::HIGH_ROLLER));
        assert!(ids.contains(&achievements::FORTUNE_BUILDER));
    }

    #[test]
    fn test_vip_member_counts_the_hundredth_game() {
        let mut session = session();
        let now = now_millis();
        for _ in 0..99 {
            session.settle(&round(GameTitle::Baccarat, 10, 10), now).unwrap();
        }
        assert!(!session.has_achievement(achievements::VIP_MEMBER));
        session.settle(&round(GameTitle::Baccarat, 10, 10), now).unwrap();
        assert!(session.has_achievement(achievements::VIP_MEMBER));
    }

    #[test]
    fn test_slot_master_needs_every_machine() {
        let mut session = session();
        let now = now_millis();
        session.settle(&round(GameTitle::ClassicSlots, 10, 20), now).unwrap();
        session.settle(&round(GameTitle::ClassicSlots, 10, 20), now).unwrap();
        session.settle(&round(GameTitle::VideoSlots, 10, 50), now).unwrap();
        assert!(!session.has_achievement(achievements::SLOT_MASTER));

        session.settle(&round(GameTitle::ProgressiveSlots, 100, 1_000), now).unwrap();
        assert!(session.has_achievement(achievements::SLOT_MASTER));
    }

    #[test]
    fn test_jackpot_contribution_and_reset() {
        let mut session = session();
        let now = now_millis();
        session
            .settle(&round(GameTitle::ProgressiveSlots, 500, 0).with_contribution(100), now)
            .unwrap();
        assert_eq!(session.jackpot(), 100);

        let mut hit = round(GameTitle::ProgressiveSlots, 100, 10_120).with_contribution(20);
        hit.jackpot_won = Some(120);
        session.settle(&hit, now).unwrap();
        assert_eq!(session.jackpot(), 0);
        assert_eq!(session.user().stats.biggest_jackpot(), 10_020);
    }

    #[test]
    fn test_daily_bonus_cooldown() {
        let mut session = session();
        let now = now_millis();
        assert_eq!(session.claim_daily_bonus(now), Some(11_000));
        assert_eq!(session.claim_daily_bonus(now + Duration::hours(23)), None);
        assert_eq!(session.claim_daily_bonus(now + Duration::hours(24)), Some(12_000));
        assert_eq!(session.user().last_daily_bonus, Some(now + Duration::hours(24)));
    }

    #[test]
    fn test_profile_patch_carries_owned_fields() {
        let mut session = session();
        session
            .settle(&round(GameTitle::ClassicSlots, 10, 20), now_millis())
            .unwrap();

        let patch = session.profile_patch();
        assert_eq!(patch.balance, Some(10_010));
        assert!(patch.avatar.is_none());
        let stats = patch.stats.unwrap();
        assert_eq!(stats["totalGames"], serde_json::json!(1));
        assert_eq!(stats[SLOT_WINS_KEY], serde_json::json!(["classic-slots"]));
    }
}
