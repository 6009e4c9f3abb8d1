//! Five-reel machine feeding and paying the progressive jackpot

use super::types::{GameTitle, RoundSummary};
use crate::errors::RuleResult;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProgressiveSymbol {
    Trophy,
    Seven,
    Diamond,
    Clover,
    Star,
}

impl ProgressiveSymbol {
    pub const REEL: [ProgressiveSymbol; 5] = [
        ProgressiveSymbol::Trophy,
        ProgressiveSymbol::Seven,
        ProgressiveSymbol::Diamond,
        ProgressiveSymbol::Clover,
        ProgressiveSymbol::Star,
    ];
}

/// This machine feeds a fifth of every stake into the pool
pub const JACKPOT_SHARE_DIVISOR: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressiveOutcome {
    Jackpot,
    FiveSevens,
    ThreeOfAKind,
    Miss,
}

pub fn classify(reels: &[ProgressiveSymbol; 5]) -> ProgressiveOutcome {
    let all = |symbol| reels.iter().all(|&s| s == symbol);
    if all(ProgressiveSymbol::Trophy) {
        ProgressiveOutcome::Jackpot
    } else if all(ProgressiveSymbol::Seven) {
        ProgressiveOutcome::FiveSevens
    } else if reels[0] == reels[1] && reels[1] == reels[2] {
        ProgressiveOutcome::ThreeOfAKind
    } else {
        ProgressiveOutcome::Miss
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveSpin {
    pub reels: [ProgressiveSymbol; 5],
    pub outcome: ProgressiveOutcome,
    pub summary: RoundSummary,
}

/// Settle `reels` against a pool of `pool` credits
///
/// The stake's own contribution joins the pool before the jackpot is paid.
pub fn evaluate(reels: [ProgressiveSymbol; 5], bet: i64, pool: i64) -> ProgressiveSpin {
    let contribution = bet / JACKPOT_SHARE_DIVISOR;
    let outcome = classify(&reels);
    let mut summary = RoundSummary::new(GameTitle::ProgressiveSlots, bet, 0)
        .with_contribution(contribution);

    match outcome {
        ProgressiveOutcome::Jackpot => {
            let jackpot = pool + contribution;
            summary.payout = jackpot + bet * 100;
            summary.jackpot_won = Some(jackpot);
        }
        ProgressiveOutcome::FiveSevens => summary.payout = bet * 50,
        ProgressiveOutcome::ThreeOfAKind => summary.payout = bet * 10,
        ProgressiveOutcome::Miss => {}
    }

    ProgressiveSpin {
        reels,
        outcome,
        summary,
    }
}

pub fn play<R: Rng + ?Sized>(rng: &mut R, bet: i64, pool: i64) -> RuleResult<ProgressiveSpin> {
    let title = GameTitle::ProgressiveSlots;
    title.limits().check(title, bet)?;

    let reels = [(); 5].map(|_| ProgressiveSymbol::REEL[rng.gen_range(0..ProgressiveSymbol::REEL.len())]);
    Ok(evaluate(reels, bet, pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ProgressiveSymbol::*;

    #[test]
    fn test_jackpot_pays_pool_plus_multiplier() {
        let spin = evaluate([Trophy; 5], 100, 5_000);
        assert_eq!(spin.outcome, ProgressiveOutcome::Jackpot);
        assert_eq!(spin.summary.jackpot_won, Some(5_020));
        assert_eq!(spin.summary.payout, 5_020 + 10_000);
        assert_eq!(spin.summary.jackpot_contribution, 20);
    }

    #[test]
    fn test_five_sevens_beat_three_of_a_kind() {
        let spin = evaluate([Seven; 5], 200, 0);
        assert_eq!(spin.outcome, ProgressiveOutcome::FiveSevens);
        assert_eq!(spin.summary.payout, 10_000);
        assert_eq!(spin.summary.jackpot_won, None);
    }

    #[test]
    fn test_first_three_reels() {
        let spin = evaluate([Clover, Clover, Clover, Star, Trophy], 100, 0);
        assert_eq!(spin.summary.payout, 1_000);

        let spin = evaluate([Star, Clover, Clover, Clover, Clover], 100, 0);
        assert_eq!(spin.outcome, ProgressiveOutcome::Miss);
        assert_eq!(spin.summary.payout, 0);
    }

    #[test]
    fn test_minimum_stake_is_one_hundred() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(play(&mut rng, 90, 0).is_err());
        assert!(play(&mut rng, 100, 0).is_ok());
    }
}
