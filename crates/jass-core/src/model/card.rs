use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Number of distinct cards in a Jass deck.
pub const DECK_SIZE: usize = 36;

/// A card encoded as `suit * 9 + rank offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(u8);

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self((suit as u8) * 9 + rank as u8)
    }

    pub const fn from_id(id: usize) -> Option<Self> {
        if id < DECK_SIZE {
            Some(Self(id as u8))
        } else {
            None
        }
    }

    pub const fn id(self) -> usize {
        self.0 as usize
    }

    pub const fn suit(self) -> Suit {
        match self.0 / 9 {
            0 => Suit::Diamonds,
            1 => Suit::Hearts,
            2 => Suit::Spades,
            _ => Suit::Clubs,
        }
    }

    pub const fn rank(self) -> Rank {
        match self.0 % 9 {
            0 => Rank::Ace,
            1 => Rank::King,
            2 => Rank::Queen,
            3 => Rank::Jack,
            4 => Rank::Ten,
            5 => Rank::Nine,
            6 => Rank::Eight,
            7 => Rank::Seven,
            _ => Rank::Six,
        }
    }

    pub const fn offset(self) -> usize {
        (self.0 % 9) as usize
    }

    pub fn all() -> impl Iterator<Item = Card> {
        (0..DECK_SIZE as u8).map(Card)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit(), self.rank())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised card '{0}'")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let suit = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('D') => Suit::Diamonds,
            Some('H') => Suit::Hearts,
            Some('S') => Suit::Spades,
            Some('C') => Suit::Clubs,
            _ => return Err(ParseCardError(s.to_string())),
        };
        let rank = match chars.as_str().to_ascii_uppercase().as_str() {
            "A" => Rank::Ace,
            "K" => Rank::King,
            "Q" => Rank::Queen,
            "J" => Rank::Jack,
            "10" => Rank::Ten,
            "9" => Rank::Nine,
            "8" => Rank::Eight,
            "7" => Rank::Seven,
            "6" => Rank::Six,
            _ => return Err(ParseCardError(s.to_string())),
        };
        Ok(Card::new(rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, DECK_SIZE};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn encoding_matches_suit_and_offset() {
        let card = Card::new(Rank::Jack, Suit::Spades);
        assert_eq!(card.id(), 2 * 9 + 3);
        assert_eq!(card.suit(), Suit::Spades);
        assert_eq!(card.rank(), Rank::Jack);
        assert_eq!(card.offset(), 3);
    }

    #[test]
    fn from_id_rejects_out_of_range() {
        assert!(Card::from_id(DECK_SIZE - 1).is_some());
        assert!(Card::from_id(DECK_SIZE).is_none());
    }

    #[test]
    fn display_and_parse_agree() {
        for card in Card::all() {
            let text = card.to_string();
            assert_eq!(text.parse::<Card>(), Ok(card), "{text}");
        }
        assert_eq!(Card::new(Rank::Ten, Suit::Hearts).to_string(), "H10");
        assert!("X5".parse::<Card>().is_err());
    }
}
