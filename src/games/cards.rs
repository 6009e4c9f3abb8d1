//! Standard 52-card deck shared by the table games

use crate::errors::{GameError, RuleResult};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

pub const JACK: u8 = 11;
pub const QUEEN: u8 = 12;
pub const KING: u8 = 13;
pub const ACE: u8 = 14;

/// A playing card; `rank` runs 2..=14 with the ace high
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: u8,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: u8, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn is_ace(&self) -> bool {
        self.rank == ACE
    }

    /// Blackjack value with the ace counted as 11
    pub fn blackjack_value(&self) -> u32 {
        match self.rank {
            ACE => 11,
            JACK..=KING => 10,
            r => r as u32,
        }
    }

    /// Baccarat point value: ace 1, tens and faces 0
    pub fn baccarat_value(&self) -> u32 {
        match self.rank {
            ACE => 1,
            10..=KING => 0,
            r => r as u32,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self.rank {
            ACE => "A".to_string(),
            KING => "K".to_string(),
            QUEEN => "Q".to_string(),
            JACK => "J".to_string(),
            r => r.to_string(),
        };
        write!(f, "{}{}", rank, self.suit.symbol())
    }
}

/// A deck dealt from the top
#[derive(Debug, Clone)]
pub struct Deck {
    // Top of the deck is the end of the vector
    cards: Vec<Card>,
}

impl Deck {
    /// Fresh 52 cards in a random order
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = Suit::ALL
            .iter()
            .flat_map(|&suit| (2..=ACE).map(move |rank| Card::new(rank, suit)))
            .collect();
        cards.shuffle(rng);
        Self { cards }
    }

    /// A stacked deck that deals `cards` in the given order
    pub fn from_cards(mut cards: Vec<Card>) -> Self {
        cards.reverse();
        Self { cards }
    }

    pub fn draw(&mut self) -> RuleResult<Card> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}
