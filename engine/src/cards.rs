use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Represents one of the four suits in a standard 52-card deck.
/// Used as a component of [`Card`] to fully define a playing card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Suit::Clubs => "♣",
            Suit::Diamonds => "♦",
            Suit::Hearts => "♥",
            Suit::Spades => "♠",
        };
        write!(f, "{}", s)
    }
}

/// Represents the rank of a playing card from Two through Ace.
/// Blackjack point values are derived via [`Rank::value`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Blackjack point value: face cards are 10, the ace is 11 here.
    /// Hand evaluation demotes aces to 1 as needed.
    pub fn value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
        }
    }

    pub fn is_ace(self) -> bool {
        self == Rank::Ace
    }

    pub fn is_ten_value(self) -> bool {
        self.value() == 10 && !self.is_ace()
    }

    /// Zero-based index for tag tables and composition counts (Two = 0, Ace = 12).
    pub fn index(self) -> usize {
        self as usize - 2
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
            other => return write!(f, "{}", other.value()),
        };
        write!(f, "{}", s)
    }
}

/// A single playing card. Full equality (including suit) is derived;
/// strategy and counting code compares [`Card::value`] and [`Card::rank`]
/// instead, which ignore suit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Blackjack point value (ace counted high; see [`Rank::value`]).
    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn is_ace(&self) -> bool {
        self.rank.is_ace()
    }

    pub fn is_ten_value(&self) -> bool {
        self.rank.is_ten_value()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = EngineError;

    /// Parses strings like `"A♠"`, `"AS"`, `"10♥"`, `"Th"`, `"kd"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || EngineError::Configuration(format!("invalid card string: {s:?}"));
        let mut chars: Vec<char> = s.chars().collect();
        if chars.len() < 2 {
            return Err(bad());
        }
        let suit_ch = chars.pop().ok_or_else(bad)?;
        let rank_str: String = chars.into_iter().collect::<String>().to_ascii_uppercase();

        let rank = match rank_str.as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return Err(bad()),
        };
        let suit = match suit_ch.to_ascii_uppercase() {
            'C' | '♣' => Suit::Clubs,
            'D' | '♦' => Suit::Diamonds,
            'H' | '♥' => Suit::Hearts,
            'S' | '♠' => Suit::Spades,
            _ => return Err(bad()),
        };
        Ok(Card { rank, suit })
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

/// One ordered 52-card deck.
pub fn single_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { rank: r, suit: s });
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_cards_are_worth_ten() {
        for r in [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King] {
            assert_eq!(r.value(), 10);
        }
        assert_eq!(Rank::Ace.value(), 11);
    }

    #[test]
    fn single_deck_has_52_unique_cards() {
        let deck = single_deck();
        assert_eq!(deck.len(), 52);
        let mut seen = std::collections::HashSet::new();
        for c in deck {
            assert!(seen.insert(c));
        }
    }

    #[test]
    fn parses_common_card_strings() {
        assert_eq!(
            "AS".parse::<Card>().unwrap(),
            Card::new(Rank::Ace, Suit::Spades)
        );
        assert_eq!(
            "10♥".parse::<Card>().unwrap(),
            Card::new(Rank::Ten, Suit::Hearts)
        );
        assert_eq!(
            "kd".parse::<Card>().unwrap(),
            Card::new(Rank::King, Suit::Diamonds)
        );
        assert!("Z?".parse::<Card>().is_err());
    }
}
