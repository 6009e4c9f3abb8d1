//! Achievement catalog

use crate::common::Achievement;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl AchievementDef {
    pub fn unlocked(&self, at: DateTime<Utc>) -> Achievement {
        Achievement {
            unlocked_at: Some(at),
            ..self.locked()
        }
    }

    pub fn locked(&self) -> Achievement {
        Achievement {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            unlocked_at: None,
        }
    }
}

pub const FIRST_SPIN: &str = "first_spin";
pub const FIRST_DEAL: &str = "first_deal";
pub const LUCKY_STREAK: &str = "lucky_streak";
pub const BIG_WINNER: &str = "big_winner";
pub const HIGH_ROLLER: &str = "high_roller";
pub const VIP_MEMBER: &str = "vip_member";
pub const FORTUNE_BUILDER: &str = "fortune_builder";
pub const SLOT_MASTER: &str = "slot_master";

pub const LUCKY_STREAK_LENGTH: i64 = 5;
pub const BIG_WIN_THRESHOLD: i64 = 10_000;
pub const HIGH_ROLLER_BET: i64 = 1_000;
pub const VIP_GAMES: i64 = 100;
pub const FORTUNE_BALANCE: i64 = 50_000;

pub static CATALOG: [AchievementDef; 8] = [
    AchievementDef {
        id: FIRST_SPIN,
        name: "First Spin",
        description: "Play your first slot spin",
        icon: "🎰",
    },
    AchievementDef {
        id: FIRST_DEAL,
        name: "First Deal",
        description: "Play your first hand of blackjack",
        icon: "🃏",
    },
    AchievementDef {
        id: LUCKY_STREAK,
        name: "Lucky Streak",
        description: "Win 5 bets in a row",
        icon: "🍀",
    },
    AchievementDef {
        id: BIG_WINNER,
        name: "Big Winner",
        description: "Win 10,000+ credits in a single bet",
        icon: "💰",
    },
    AchievementDef {
        id: HIGH_ROLLER,
        name: "High Roller",
        description: "Place a bet of 1,000+ credits",
        icon: "🎲",
    },
    AchievementDef {
        id: VIP_MEMBER,
        name: "VIP Member",
        description: "Play 100 games",
        icon: "⭐",
    },
    AchievementDef {
        id: FORTUNE_BUILDER,
        name: "Fortune Builder",
        description: "Accumulate 50,000 credits",
        icon: "🏦",
    },
    AchievementDef {
        id: SLOT_MASTER,
        name: "Slot Master",
        description: "Win on all 3 slot machines",
        icon: "👑",
    },
];

pub fn find(id: &str) -> Option<&'static AchievementDef> {
    CATALOG.iter().find(|def| def.id == id)
}

/// The whole catalog, none of it unlocked
pub fn catalog() -> Vec<Achievement> {
    CATALOG.iter().map(AchievementDef::locked).collect()
}
