//! Three-reel classic slot machine

use super::types::{GameTitle, RoundSummary};
use crate::errors::RuleResult;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClassicSymbol {
    Seven,
    Bar,
    Cherry,
    Lemon,
    Bell,
}

impl ClassicSymbol {
    pub const REEL: [ClassicSymbol; 5] = [
        ClassicSymbol::Seven,
        ClassicSymbol::Bar,
        ClassicSymbol::Cherry,
        ClassicSymbol::Lemon,
        ClassicSymbol::Bell,
    ];

    fn three_of_a_kind(self) -> i64 {
        match self {
            ClassicSymbol::Seven => 100,
            ClassicSymbol::Bar => 50,
            ClassicSymbol::Cherry => 20,
            ClassicSymbol::Lemon | ClassicSymbol::Bell => 10,
        }
    }

    fn pair(self) -> i64 {
        match self {
            ClassicSymbol::Seven => 10,
            ClassicSymbol::Bar => 5,
            _ => 2,
        }
    }
}

/// Share of each stake fed into the progressive pool
pub const JACKPOT_SHARE_DIVISOR: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicSpin {
    pub reels: [ClassicSymbol; 3],
    pub summary: RoundSummary,
}

/// Amount credited for `reels` at stake `bet`
pub fn payout(reels: &[ClassicSymbol; 3], bet: i64) -> i64 {
    let [a, b, c] = *reels;
    if a == b && b == c {
        bet * a.three_of_a_kind()
    } else if a == b {
        bet * a.pair()
    } else if b == c {
        bet * b.pair()
    } else {
        0
    }
}

pub fn spin_reels<R: Rng + ?Sized>(rng: &mut R) -> [ClassicSymbol; 3] {
    let mut pick = || ClassicSymbol::REEL[rng.gen_range(0..ClassicSymbol::REEL.len())];
    [pick(), pick(), pick()]
}

pub fn play<R: Rng + ?Sized>(rng: &mut R, bet: i64) -> RuleResult<ClassicSpin> {
    let title = GameTitle::ClassicSlots;
    title.limits().check(title, bet)?;

    let reels = spin_reels(rng);
    let summary = RoundSummary::new(title, bet, payout(&reels, bet))
        .with_contribution(bet / JACKPOT_SHARE_DIVISOR);
    Ok(ClassicSpin { reels, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ClassicSymbol::*;

    #[test]
    fn test_three_of_a_kind_paytable() {
        assert_eq!(payout(&[Seven, Seven, Seven], 10), 1_000);
        assert_eq!(payout(&[Bar, Bar, Bar], 10), 500);
        assert_eq!(payout(&[Cherry, Cherry, Cherry], 10), 200);
        assert_eq!(payout(&[Bell, Bell, Bell], 10), 100);
    }

    #[test]
    fn test_pairs_on_adjacent_reels() {
        assert_eq!(payout(&[Seven, Seven, Bar], 10), 100);
        assert_eq!(payout(&[Lemon, Bar, Bar], 10), 50);
        assert_eq!(payout(&[Cherry, Cherry, Lemon], 10), 20);
        // Reels one and three are not adjacent
        assert_eq!(payout(&[Seven, Bar, Seven], 10), 0);
    }

    #[test]
    fn test_play_validates_stake() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(play(&mut rng, 5).is_err());
        assert!(play(&mut rng, 1_001).is_err());

        let spin = play(&mut rng, 100).unwrap();
        assert_eq!(spin.summary.bet, 100);
        assert_eq!(spin.summary.jackpot_contribution, 10);
        assert_eq!(spin.summary.payout, payout(&spin.reels, 100));
    }
}
