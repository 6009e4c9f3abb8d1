use crate::common::GameKind;
use crate::errors::{GameError, RuleResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every playable table or machine in the lobby
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum GameTitle {
    ClassicSlots,
    VideoSlots,
    ProgressiveSlots,
    Blackjack,
    Roulette,
    Baccarat,
    VideoPoker,
}

impl GameTitle {
    pub const ALL: [GameTitle; 7] = [
        GameTitle::ClassicSlots,
        GameTitle::VideoSlots,
        GameTitle::ProgressiveSlots,
        GameTitle::Blackjack,
        GameTitle::Roulette,
        GameTitle::Baccarat,
        GameTitle::VideoPoker,
    ];

    /// The three slot machines
    pub const SLOTS: [GameTitle; 3] = [
        GameTitle::ClassicSlots,
        GameTitle::VideoSlots,
        GameTitle::ProgressiveSlots,
    ];

    /// Type tag written to the game history
    pub fn kind(self) -> GameKind {
        match self {
            GameTitle::ClassicSlots | GameTitle::VideoSlots | GameTitle::ProgressiveSlots => {
                GameKind::Slots
            }
            GameTitle::Blackjack => GameKind::Blackjack,
            GameTitle::Roulette => GameKind::Roulette,
            GameTitle::Baccarat => GameKind::Baccarat,
            GameTitle::VideoPoker => GameKind::Poker,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GameTitle::ClassicSlots => "Classic Slots",
            GameTitle::VideoSlots => "Video Slots",
            GameTitle::ProgressiveSlots => "Progressive Slots",
            GameTitle::Blackjack => "Blackjack",
            GameTitle::Roulette => "Roulette",
            GameTitle::Baccarat => "Baccarat",
            GameTitle::VideoPoker => "Video Poker",
        }
    }

    /// Stake limits; for video slots this is per payline, for roulette per chip
    pub fn limits(self) -> BetLimits {
        match self {
            GameTitle::ProgressiveSlots => BetLimits::new(100, 1_000),
            GameTitle::VideoPoker => BetLimits::new(10, 100),
            _ => BetLimits::new(10, 1_000),
        }
    }
}

impl fmt::Display for GameTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            GameTitle::ClassicSlots => "classic-slots",
            GameTitle::VideoSlots => "video-slots",
            GameTitle::ProgressiveSlots => "progressive-slots",
            GameTitle::Blackjack => "blackjack",
            GameTitle::Roulette => "roulette",
            GameTitle::Baccarat => "baccarat",
            GameTitle::VideoPoker => "video-poker",
        };
        write!(f, "{}", slug)
    }
}

impl FromStr for GameTitle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameTitle::ALL
            .into_iter()
            .find(|title| title.to_string() == s)
            .ok_or_else(|| format!("unknown game '{}'", s))
    }
}

/// Inclusive stake range for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetLimits {
    pub min: i64,
    pub max: i64,
}

impl BetLimits {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, bet: i64) -> bool {
        (self.min..=self.max).contains(&bet)
    }

    pub fn check(&self, title: GameTitle, bet: i64) -> RuleResult<()> {
        if self.contains(bet) {
            Ok(())
        } else {
            Err(GameError::BetOutOfRange {
                game: title.display_name(),
                bet,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Money movement of one finished round
///
/// `bet` is the total staked and `payout` the total credited back (stake
/// included), so a push has `payout == bet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub title: GameTitle,
    pub bet: i64,
    pub payout: i64,
    /// Credits added to the progressive pool by this round
    pub jackpot_contribution: i64,
    /// Pool paid out when the round hit the progressive jackpot
    pub jackpot_won: Option<i64>,
}

impl RoundSummary {
    pub fn new(title: GameTitle, bet: i64, payout: i64) -> Self {
        Self {
            title,
            bet,
            payout,
            jackpot_contribution: 0,
            jackpot_won: None,
        }
    }

    pub fn with_contribution(mut self, contribution: i64) -> Self {
        self.jackpot_contribution = contribution;
        self
    }

    /// Winnings over the stake; losses and pushes count as zero
    pub fn net_win(&self) -> i64 {
        (self.payout - self.bet).max(0)
    }

    pub fn is_win(&self) -> bool {
        self.payout > self.bet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_round_trips_through_slug() {
        for title in GameTitle::ALL {
            assert_eq!(title.to_string().parse::<GameTitle>().unwrap(), title);
        }
        assert!("craps".parse::<GameTitle>().is_err());
    }

    #[test]
    fn test_kinds_group_slot_machines() {
        for title in GameTitle::SLOTS {
            assert_eq!(title.kind(), GameKind::Slots);
        }
        assert_eq!(GameTitle::VideoPoker.kind(), GameKind::Poker);
    }

    #[test]
    fn test_limits_per_game() {
        assert!(GameTitle::ProgressiveSlots.limits().check(GameTitle::ProgressiveSlots, 50).is_err());
        assert!(GameTitle::VideoPoker.limits().check(GameTitle::VideoPoker, 100).is_ok());
        assert!(GameTitle::VideoPoker.limits().check(GameTitle::VideoPoker, 110).is_err());
        assert!(GameTitle::Blackjack.limits().contains(1_000));
    }

    #[test]
    fn test_net_win_never_negative() {
        let loss = RoundSummary::new(GameTitle::Roulette, 50, 0);
        let push = RoundSummary::new(GameTitle::Blackjack, 50, 50);
        let win = RoundSummary::new(GameTitle::Baccarat, 50, 100);

        assert_eq!(loss.net_win(), 0);
        assert!(!loss.is_win());
        assert_eq!(push.net_win(), 0);
        assert!(!push.is_win());
        assert_eq!(win.net_win(), 50);
        assert!(win.is_win());
    }
}
