//! Punto banco with the standard third-card tableau

use super::cards::{Card, Deck};
use super::types::{GameTitle, RoundSummary};
use crate::errors::{GameError, RuleResult};
use rand::Rng;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaccaratBet {
    Player,
    Banker,
    Tie,
}

impl FromStr for BaccaratBet {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(BaccaratBet::Player),
            "banker" => Ok(BaccaratBet::Banker),
            "tie" => Ok(BaccaratBet::Tie),
            other => Err(GameError::UnknownBet(other.to_string())),
        }
    }
}

pub fn hand_total(cards: &[Card]) -> u32 {
    cards.iter().map(Card::baccarat_value).sum::<u32>() % 10
}

/// Player draws on 0-5, stands on 6-7
fn player_draws(player_total: u32) -> bool {
    player_total <= 5
}

/// Banker's decision given its total and the player's third card, if any
fn banker_draws(banker_total: u32, player_third: Option<&Card>) -> bool {
    let Some(third) = player_third else {
        return banker_total <= 5;
    };
    let v = third.baccarat_value();
    match banker_total {
        0..=2 => true,
        3 => v != 8,
        4 => (2..=7).contains(&v),
        5 => (4..=7).contains(&v),
        6 => v == 6 || v == 7,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Player,
    Banker,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coup {
    pub player: Vec<Card>,
    pub banker: Vec<Card>,
}

impl Coup {
    /// Deal a coup: alternate two cards each, then apply the drawing rules
    pub fn deal(deck: &mut Deck) -> RuleResult<Self> {
        let mut player = Vec::with_capacity(3);
        let mut banker = Vec::with_capacity(3);
        player.push(deck.draw()?);
        banker.push(deck.draw()?);
        player.push(deck.draw()?);
        banker.push(deck.draw()?);

        let natural = hand_total(&player) >= 8 || hand_total(&banker) >= 8;
        if !natural {
            if player_draws(hand_total(&player)) {
                player.push(deck.draw()?);
            }
            if banker_draws(hand_total(&banker), player.get(2)) {
                banker.push(deck.draw()?);
            }
        }

        Ok(Self { player, banker })
    }

    pub fn player_total(&self) -> u32 {
        hand_total(&self.player)
    }

    pub fn banker_total(&self) -> u32 {
        hand_total(&self.banker)
    }

    pub fn winner(&self) -> Winner {
        let (p, b) = (self.player_total(), self.banker_total());
        if p > b {
            Winner::Player
        } else if b > p {
            Winner::Banker
        } else {
            Winner::Tie
        }
    }
}

/// Amount credited for `bet` on `side` given the coup's winner
pub fn payout(side: BaccaratBet, winner: Winner, bet: i64) -> i64 {
    match (side, winner) {
        (BaccaratBet::Player, Winner::Player) => bet * 2,
        (BaccaratBet::Banker, Winner::Banker) => bet * 195 / 100,
        (BaccaratBet::Tie, Winner::Tie) => bet * 9,
        (BaccaratBet::Player | BaccaratBet::Banker, Winner::Tie) => bet,
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaccaratRound {
    pub coup: Coup,
    pub winner: Winner,
    pub summary: RoundSummary,
}

pub fn play_with_deck(deck: &mut Deck, side: BaccaratBet, bet: i64) -> RuleResult<BaccaratRound> {
    let title = GameTitle::Baccarat;
    title.limits().check(title, bet)?;

    let coup = Coup::deal(deck)?;
    let winner = coup.winner();
    Ok(BaccaratRound {
        summary: RoundSummary::new(title, bet, payout(side, winner, bet)),
        coup,
        winner,
    })
}

pub fn play<R: Rng + ?Sized>(rng: &mut R, side: BaccaratBet, bet: i64) -> RuleResult<BaccaratRound> {
    play_with_deck(&mut Deck::shuffled(rng), side, bet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::cards::{Suit, ACE, KING, QUEEN};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(rank: u8) -> Card {
        Card::new(rank, Suit::Diamonds)
    }

    /// Deck dealing player, banker, player, banker, then extras
    fn stacked(ranks: &[u8]) -> Deck {
        Deck::from_cards(ranks.iter().map(|&r| card(r)).collect())
    }

    #[test]
    fn test_totals_wrap_at_ten() {
        assert_eq!(hand_total(&[card(7), card(8)]), 5);
        assert_eq!(hand_total(&[card(KING), card(QUEEN)]), 0);
        assert_eq!(hand_total(&[card(ACE), card(8)]), 9);
    }

    #[test]
    fn test_player_draws() {
        assert!(player_draws(0));
        assert!(player_draws(5));
        assert!(!player_draws(6));
        assert!(!player_draws(7));
    }

    #[test]
    fn test_banker_tableau() {
        let c = card;
        assert!(banker_draws(5, None));
        assert!(!banker_draws(6, None));
        assert!(banker_draws(2, Some(&c(8))));
        assert!(!banker_draws(3, Some(&c(8))));
        assert!(banker_draws(3, Some(&c(9))));
        assert!(!banker_draws(4, Some(&c(ACE))));
        assert!(banker_draws(4, Some(&c(7))));
        assert!(!banker_draws(5, Some(&c(3))));
        assert!(banker_draws(6, Some(&c(6))));
        assert!(!banker_draws(6, Some(&c(5))));
        assert!(!banker_draws(7, Some(&c(6))));
    }

    #[test]
    fn test_natural_stops_drawing() {
        // Player 4+4 = 8 natural, banker 2+3
        let mut deck = stacked(&[4, 2, 4, 3, 9, 9]);
        let coup = Coup::deal(&mut deck).unwrap();
        assert_eq!(coup.player.len(), 2);
        assert_eq!(coup.banker.len(), 2);
        assert_eq!(coup.winner(), Winner::Player);
    }

    #[test]
    fn test_third_card_sequence() {
        // Player 2+3 draws a 4 (9); banker 3+KING holds 3, player third 4 -> draws a 5 (8)
        let mut deck = stacked(&[2, 3, 3, KING, 4, 5]);
        let coup = Coup::deal(&mut deck).unwrap();
        assert_eq!(coup.player_total(), 9);
        assert_eq!(coup.banker_total(), 8);
        assert_eq!(coup.winner(), Winner::Player);
    }

    #[test]
    fn test_payouts() {
        assert_eq!(payout(BaccaratBet::Player, Winner::Player, 100), 200);
        assert_eq!(payout(BaccaratBet::Banker, Winner::Banker, 10), 19);
        assert_eq!(payout(BaccaratBet::Tie, Winner::Tie, 10), 90);
        assert_eq!(payout(BaccaratBet::Banker, Winner::Tie, 10), 10);
        assert_eq!(payout(BaccaratBet::Tie, Winner::Banker, 10), 0);
    }

    #[test]
    fn test_play_reports_round() {
        let mut rng = StdRng::seed_from_u64(21);
        let round = play(&mut rng, BaccaratBet::Tie, 50).unwrap();
        assert_eq!(round.summary.bet, 50);
        assert_eq!(round.summary.payout, payout(BaccaratBet::Tie, round.winner, 50));
        assert!(play(&mut rng, BaccaratBet::Tie, 2_000).is_err());
        assert!("dragon".parse::<BaccaratBet>().is_err());
    }
}
