//! Jacks or Better video poker

use super::cards::{Card, Deck, ACE, JACK};
use super::types::{GameTitle, RoundSummary};
use crate::errors::{GameError, RuleResult};
use rand::Rng;

/// Poker hand rankings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Hand {
    HighCard,
    JacksOrBetter,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl Hand {
    /// Total return per credit staked
    pub fn multiplier(self) -> i64 {
        match self {
            Hand::RoyalFlush => 800,
            Hand::StraightFlush => 50,
            Hand::FourOfAKind => 25,
            Hand::FullHouse => 9,
            Hand::Flush => 6,
            Hand::Straight => 4,
            Hand::ThreeOfAKind => 3,
            Hand::TwoPair => 2,
            Hand::JacksOrBetter => 1,
            Hand::HighCard => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Hand::RoyalFlush => "Royal Flush",
            Hand::StraightFlush => "Straight Flush",
            Hand::FourOfAKind => "Four of a Kind",
            Hand::FullHouse => "Full House",
            Hand::Flush => "Flush",
            Hand::Straight => "Straight",
            Hand::ThreeOfAKind => "Three of a Kind",
            Hand::TwoPair => "Two Pair",
            Hand::JacksOrBetter => "Jacks or Better",
            Hand::HighCard => "No Win",
        }
    }
}

/// Evaluate a 5-card hand
pub fn evaluate(cards: &[Card; 5]) -> Hand {
    let mut ranks = cards.map(|c| c.rank);
    ranks.sort_unstable();

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let distinct = ranks.windows(2).all(|w| w[0] != w[1]);
    let wheel = ranks == [2, 3, 4, 5, ACE];
    let is_straight = distinct && (ranks[4] - ranks[0] == 4 || wheel);

    let mut counts = [0u8; (ACE + 1) as usize];
    for &r in &ranks {
        counts[r as usize] += 1;
    }

    let mut pairs = 0;
    let mut high_pair = false;
    let mut three_kind = false;
    let mut four_kind = false;
    for (rank, &count) in counts.iter().enumerate() {
        match count {
            2 => {
                pairs += 1;
                high_pair |= rank >= JACK as usize;
            }
            3 => three_kind = true,
            4 => four_kind = true,
            _ => {}
        }
    }

    if is_straight && is_flush && ranks[0] == 10 {
        Hand::RoyalFlush
    } else if is_straight && is_flush {
        Hand::StraightFlush
    } else if four_kind {
        Hand::FourOfAKind
    } else if three_kind && pairs == 1 {
        Hand::FullHouse
    } else if is_flush {
        Hand::Flush
    } else if is_straight {
        Hand::Straight
    } else if three_kind {
        Hand::ThreeOfAKind
    } else if pairs == 2 {
        Hand::TwoPair
    } else if pairs == 1 && high_pair {
        Hand::JacksOrBetter
    } else {
        Hand::HighCard
    }
}

/// A dealt hand waiting for the player's hold/draw decision
#[derive(Debug, Clone)]
pub struct PokerHand {
    deck: Deck,
    bet: i64,
    cards: [Card; 5],
    drawn: bool,
}

impl PokerHand {
    pub fn deal<R: Rng + ?Sized>(rng: &mut R, bet: i64) -> RuleResult<Self> {
        Self::deal_from(Deck::shuffled(rng), bet)
    }

    pub fn deal_from(mut deck: Deck, bet: i64) -> RuleResult<Self> {
        let title = GameTitle::VideoPoker;
        title.limits().check(title, bet)?;

        let cards = [
            deck.draw()?,
            deck.draw()?,
            deck.draw()?,
            deck.draw()?,
            deck.draw()?,
        ];
        Ok(Self {
            deck,
            bet,
            cards,
            drawn: false,
        })
    }

    pub fn cards(&self) -> &[Card; 5] {
        &self.cards
    }

    /// Ranking of the cards currently showing
    pub fn current_hand(&self) -> Hand {
        evaluate(&self.cards)
    }

    /// Replace every card not held from the same deck and settle
    pub fn draw(&mut self, held: [bool; 5]) -> RuleResult<(Hand, RoundSummary)> {
        if self.drawn {
            return Err(GameError::HandFinished);
        }
        for (card, keep) in self.cards.iter_mut().zip(held) {
            if !keep {
                *card = self.deck.draw()?;
            }
        }
        self.drawn = true;

        let hand = self.current_hand();
        let summary = RoundSummary::new(GameTitle::VideoPoker, self.bet, self.bet * hand.multiplier());
        Ok((hand, summary))
    }
}

/// Hold mask keeping every card that contributes to a paying hand, or nothing
pub fn simple_hold(cards: &[Card; 5]) -> [bool; 5] {
    if evaluate(cards) >= Hand::Straight {
        return [true; 5];
    }
    let mut held = [false; 5];
    for (i, card) in cards.iter().enumerate() {
        held[i] = cards.iter().filter(|c| c.rank == card.rank).count() >= 2;
    }
    held
}
