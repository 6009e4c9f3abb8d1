//! Game engine
//!
//! Outcome and payout computation for every table and machine. Each game
//! takes a caller-supplied `rand::Rng` and reports a [`RoundSummary`]; money
//! movement is applied by the player session.

pub mod baccarat;
pub mod blackjack;
pub mod cards;
pub mod classic_slots;
pub mod progressive_slots;
pub mod roulette;
pub mod types;
pub mod video_poker;
pub mod video_slots;

pub use cards::{Card, Deck, Suit};
pub use types::*;
