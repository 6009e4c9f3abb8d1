//! European single-zero roulette

use super::types::{GameTitle, RoundSummary};
use crate::errors::{GameError, RuleResult};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Pocket order around the wheel
pub const WHEEL: [u8; 37] = [
    0, 32, 15, 19, 4, 21, 2, 25, 17, 34, 6, 27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33, 1, 20,
    14, 31, 9, 22, 18, 29, 7, 28, 12, 35, 3, 26,
];

pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

pub fn is_red(number: u8) -> bool {
    RED_NUMBERS.contains(&number)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouletteBet {
    Red,
    Black,
    Even,
    Odd,
    /// 1-18
    Low,
    /// 19-36
    High,
    /// 1, 2 or 3
    Dozen(u8),
    Straight(u8),
}

impl RouletteBet {
    pub fn wins(self, number: u8) -> bool {
        match self {
            RouletteBet::Red => is_red(number),
            RouletteBet::Black => number != 0 && !is_red(number),
            RouletteBet::Even => number != 0 && number % 2 == 0,
            RouletteBet::Odd => number % 2 == 1,
            RouletteBet::Low => (1..=18).contains(&number),
            RouletteBet::High => (19..=36).contains(&number),
            RouletteBet::Dozen(d @ 1..=3) => number != 0 && (number - 1) / 12 + 1 == d,
            RouletteBet::Dozen(_) => false,
            RouletteBet::Straight(n) => n == number,
        }
    }

    /// Whether the bet names a real spot on the layout
    pub fn is_valid(self) -> bool {
        match self {
            RouletteBet::Dozen(d) => (1..=3).contains(&d),
            RouletteBet::Straight(n) => n <= 36,
            _ => true,
        }
    }

    /// Total return per credit staked, stake included
    pub fn multiplier(self) -> i64 {
        match self {
            RouletteBet::Dozen(_) => 3,
            RouletteBet::Straight(_) => 36,
            _ => 2,
        }
    }
}

impl fmt::Display for RouletteBet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouletteBet::Red => write!(f, "red"),
            RouletteBet::Black => write!(f, "black"),
            RouletteBet::Even => write!(f, "even"),
            RouletteBet::Odd => write!(f, "odd"),
            RouletteBet::Low => write!(f, "1-18"),
            RouletteBet::High => write!(f, "19-36"),
            RouletteBet::Dozen(1) => write!(f, "1st12"),
            RouletteBet::Dozen(2) => write!(f, "2nd12"),
            RouletteBet::Dozen(3) => write!(f, "3rd12"),
            RouletteBet::Dozen(d) => write!(f, "dozen{}", d),
            RouletteBet::Straight(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for RouletteBet {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bet = match s {
            "red" => RouletteBet::Red,
            "black" => RouletteBet::Black,
            "even" => RouletteBet::Even,
            "odd" => RouletteBet::Odd,
            "1-18" => RouletteBet::Low,
            "19-36" => RouletteBet::High,
            "1st12" => RouletteBet::Dozen(1),
            "2nd12" => RouletteBet::Dozen(2),
            "3rd12" => RouletteBet::Dozen(3),
            number => match number.parse::<u8>() {
                Ok(n) if n <= 36 => RouletteBet::Straight(n),
                _ => return Err(GameError::UnknownBet(s.to_string())),
            },
        };
        Ok(bet)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouletteSpin {
    pub number: u8,
    /// Winning bets with the amount each returned
    pub winning_bets: Vec<(RouletteBet, i64)>,
    pub summary: RoundSummary,
}

/// Chips on the layout for the next spin
#[derive(Debug, Clone, Default)]
pub struct RouletteTable {
    bets: Vec<(RouletteBet, i64)>,
}

impl RouletteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chip; chips on the same bet stack
    pub fn place(&mut self, bet: RouletteBet, chip: i64) -> RuleResult<()> {
        if !bet.is_valid() {
            return Err(GameError::UnknownBet(bet.to_string()));
        }
        let title = GameTitle::Roulette;
        title.limits().check(title, chip)?;

        match self.bets.iter_mut().find(|(placed, _)| *placed == bet) {
            Some((_, amount)) => *amount += chip,
            None => self.bets.push((bet, chip)),
        }
        Ok(())
    }

    pub fn bets(&self) -> &[(RouletteBet, i64)] {
        &self.bets
    }

    pub fn total(&self) -> i64 {
        self.bets.iter().map(|(_, amount)| amount).sum()
    }

    pub fn clear(&mut self) {
        self.bets.clear();
    }

    /// Settle every bet on the layout against `number` and clear it
    pub fn settle(&mut self, number: u8) -> RuleResult<RouletteSpin> {
        if self.bets.is_empty() {
            return Err(GameError::NoBets);
        }

        let staked = self.total();
        let winning_bets: Vec<(RouletteBet, i64)> = self
            .bets
            .iter()
            .filter(|(bet, _)| bet.wins(number))
            .map(|&(bet, amount)| (bet, amount * bet.multiplier()))
            .collect();
        let payout = winning_bets.iter().map(|(_, won)| won).sum();
        self.clear();

        Ok(RouletteSpin {
            number,
            winning_bets,
            summary: RoundSummary::new(GameTitle::Roulette, staked, payout),
        })
    }

    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RuleResult<RouletteSpin> {
        if self.bets.is_empty() {
            return Err(GameError::NoBets);
        }
        let number = WHEEL[rng.gen_range(0..WHEEL.len())];
        self.settle(number)
    }
}
