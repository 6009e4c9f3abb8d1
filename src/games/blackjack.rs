//! Single-hand blackjack against a dealer standing on 17

use super::cards::{Card, Deck};
use super::types::{GameTitle, RoundSummary};
use crate::errors::{GameError, RuleResult};
use rand::Rng;

pub const DEALER_STANDS_ON: u32 = 17;

/// Best total of a hand, aces demoted from 11 to 1 while over 21
pub fn hand_value(cards: &[Card]) -> u32 {
    let mut value: u32 = cards.iter().map(Card::blackjack_value).sum();
    let mut aces = cards.iter().filter(|c| c.is_ace()).count();

    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }
    value
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlackjackOutcome {
    /// Two-card 21, paid 3:2 immediately
    Blackjack,
    Bust,
    DealerBust,
    Win,
    Lose,
    Push,
}

impl BlackjackOutcome {
    /// Amount credited back for a stake of `bet`
    pub fn payout(self, bet: i64) -> i64 {
        match self {
            BlackjackOutcome::Blackjack => bet * 5 / 2,
            BlackjackOutcome::DealerBust | BlackjackOutcome::Win => bet * 2,
            BlackjackOutcome::Push => bet,
            BlackjackOutcome::Bust | BlackjackOutcome::Lose => 0,
        }
    }
}

/// One hand in progress, dealt from its own fresh deck
#[derive(Debug, Clone)]
pub struct BlackjackHand {
    deck: Deck,
    bet: i64,
    player: Vec<Card>,
    dealer: Vec<Card>,
    outcome: Option<BlackjackOutcome>,
}

impl BlackjackHand {
    pub fn deal<R: Rng + ?Sized>(rng: &mut R, bet: i64) -> RuleResult<Self> {
        Self::deal_from(Deck::shuffled(rng), bet)
    }

    /// Deal two cards to the player, then two to the dealer
    pub fn deal_from(mut deck: Deck, bet: i64) -> RuleResult<Self> {
        let title = GameTitle::Blackjack;
        title.limits().check(title, bet)?;

        let player = vec![deck.draw()?, deck.draw()?];
        let dealer = vec![deck.draw()?, deck.draw()?];
        let outcome = (hand_value(&player) == 21).then_some(BlackjackOutcome::Blackjack);

        Ok(Self {
            deck,
            bet,
            player,
            dealer,
            outcome,
        })
    }

    pub fn player_cards(&self) -> &[Card] {
        &self.player
    }

    pub fn dealer_cards(&self) -> &[Card] {
        &self.dealer
    }

    pub fn player_total(&self) -> u32 {
        hand_value(&self.player)
    }

    pub fn dealer_total(&self) -> u32 {
        hand_value(&self.dealer)
    }

    pub fn outcome(&self) -> Option<BlackjackOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Draw a card for the player; busting ends the hand
    pub fn hit(&mut self) -> RuleResult<Card> {
        if self.is_finished() {
            return Err(GameError::HandFinished);
        }
        let card = self.deck.draw()?;
        self.player.push(card);
        if self.player_total() > 21 {
            self.outcome = Some(BlackjackOutcome::Bust);
        }
        Ok(card)
    }

    /// Dealer draws to 17 or more, then the hands are compared
    pub fn stand(&mut self) -> RuleResult<BlackjackOutcome> {
        if self.is_finished() {
            return Err(GameError::HandFinished);
        }
        while self.dealer_total() < DEALER_STANDS_ON {
            let card = self.deck.draw()?;
            self.dealer.push(card);
        }

        let player = self.player_total();
        let dealer = self.dealer_total();
        let outcome = if dealer > 21 {
            BlackjackOutcome::DealerBust
        } else if player > dealer {
            BlackjackOutcome::Win
        } else if player < dealer {
            BlackjackOutcome::Lose
        } else {
            BlackjackOutcome::Push
        };
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    /// Settlement once the hand is over
    pub fn summary(&self) -> Option<RoundSummary> {
        self.outcome
            .map(|outcome| RoundSummary::new(GameTitle::Blackjack, self.bet, outcome.payout(self.bet)))
    }
}
