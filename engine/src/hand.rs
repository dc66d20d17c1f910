use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// A blackjack hand plus the wager riding on it.
///
/// Money is integer cents throughout the game layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    /// Wager in cents.
    pub bet: i64,
    pub doubled: bool,
    pub from_split: bool,
    pub surrendered: bool,
    /// The player is done with this hand (stood, doubled, or auto-stood
    /// on a no-hit split ace).
    pub stood: bool,
}

impl Hand {
    pub fn new(bet: i64) -> Self {
        Self {
            bet,
            ..Self::default()
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Best total: each ace counts 11 while the total stays at or under 21.
    pub fn total(&self) -> u8 {
        let mut total: u32 = 0;
        let mut aces = 0;
        for card in &self.cards {
            if card.is_ace() {
                aces += 1;
                total += 11;
            } else {
                total += card.value() as u32;
            }
        }
        while total > 21 && aces > 0 {
            total -= 10;
            aces -= 1;
        }
        total as u8
    }

    /// True when an ace is counted as 11 in the chosen total.
    pub fn is_soft(&self) -> bool {
        if !self.cards.iter().any(|c| c.is_ace()) {
            return false;
        }
        let hard: u32 = self
            .cards
            .iter()
            .map(|c| if c.is_ace() { 1 } else { c.value() as u32 })
            .sum();
        hard + 10 <= 21
    }

    pub fn is_hard(&self) -> bool {
        !self.is_soft()
    }

    /// Two cards of equal blackjack value: 10♦ K♣ is a splittable pair.
    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].value() == self.cards[1].value()
    }

    pub fn is_bust(&self) -> bool {
        self.total() > 21
    }

    /// Natural 21: two cards, not descended from a split.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.total() == 21 && !self.from_split
    }

    pub fn num_cards(&self) -> usize {
        self.cards.len()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", c)?;
        }
        if self.is_blackjack() {
            write!(f, " (blackjack)")
        } else if self.is_bust() {
            write!(f, " (bust)")
        } else if self.is_soft() {
            write!(f, " (soft {})", self.total())
        } else {
            write!(f, " ({})", self.total())
        }
    }
}

/// Outcome of a settled hand from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandOutcome {
    Win,
    Lose,
    Push,
}

/// Compares a player hand against the dealer's final hand.
///
/// Surrender and bust are settled before any value comparison; a natural
/// beats any non-natural 21.
pub fn compare(player: &Hand, dealer: &Hand) -> HandOutcome {
    if player.surrendered || player.is_bust() {
        return HandOutcome::Lose;
    }
    if dealer.is_bust() {
        return HandOutcome::Win;
    }

    let player_bj = player.is_blackjack();
    let dealer_bj = dealer.is_blackjack();
    match (player_bj, dealer_bj) {
        (true, true) => return HandOutcome::Push,
        (true, false) => return HandOutcome::Win,
        (false, true) => return HandOutcome::Lose,
        (false, false) => {}
    }

    match player.total().cmp(&dealer.total()) {
        std::cmp::Ordering::Greater => HandOutcome::Win,
        std::cmp::Ordering::Less => HandOutcome::Lose,
        std::cmp::Ordering::Equal => HandOutcome::Push,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};

    fn hand(ranks: &[Rank]) -> Hand {
        let mut h = Hand::default();
        for &r in ranks {
            h.add_card(Card::new(r, Suit::Spades));
        }
        h
    }

    #[test]
    fn ace_demotes_to_one_as_needed() {
        let h = hand(&[Rank::Ace, Rank::Nine]);
        assert_eq!(h.total(), 20);
        assert!(h.is_soft());

        let h = hand(&[Rank::Ace, Rank::Nine, Rank::Five]);
        assert_eq!(h.total(), 15);
        assert!(h.is_hard());

        let h = hand(&[Rank::Ace, Rank::Ace, Rank::Nine]);
        assert_eq!(h.total(), 21);
        assert!(h.is_soft());
    }

    #[test]
    fn mixed_face_cards_form_a_pair() {
        let mut h = Hand::default();
        h.add_card(Card::new(Rank::Ten, Suit::Spades));
        h.add_card(Card::new(Rank::King, Suit::Clubs));
        assert!(h.is_pair());
        assert_eq!(h.total(), 20);
    }

    #[test]
    fn split_hand_21_is_not_a_natural() {
        let mut h = hand(&[Rank::Ace, Rank::King]);
        assert!(h.is_blackjack());
        h.from_split = true;
        assert!(!h.is_blackjack());
        assert_eq!(h.total(), 21);
    }

    #[test]
    fn natural_beats_plain_twenty_one() {
        let player = hand(&[Rank::Ace, Rank::King]);
        let dealer = hand(&[Rank::Seven, Rank::Seven, Rank::Seven]);
        assert_eq!(compare(&player, &dealer), HandOutcome::Win);
        assert_eq!(compare(&dealer, &player), HandOutcome::Lose);
    }

    #[test]
    fn bust_loses_even_against_dealer_bust() {
        let mut player = hand(&[Rank::Ten, Rank::Nine, Rank::Five]);
        let dealer = hand(&[Rank::Ten, Rank::Nine, Rank::Five]);
        assert!(player.is_bust());
        assert_eq!(compare(&player, &dealer), HandOutcome::Lose);
        player.surrendered = true;
        assert_eq!(compare(&player, &dealer), HandOutcome::Lose);
    }
}
