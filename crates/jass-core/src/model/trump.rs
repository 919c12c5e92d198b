use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Contract declared for a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trump {
    Suit(Suit),
    /// No trump, high cards win.
    ObeAbe,
    /// No trump, low cards win.
    UneUfe,
}

impl Trump {
    pub const ALL: [Trump; 6] = [
        Trump::Suit(Suit::Diamonds),
        Trump::Suit(Suit::Hearts),
        Trump::Suit(Suit::Spades),
        Trump::Suit(Suit::Clubs),
        Trump::ObeAbe,
        Trump::UneUfe,
    ];

    pub const fn trump_suit(self) -> Option<Suit> {
        match self {
            Trump::Suit(suit) => Some(suit),
            Trump::ObeAbe | Trump::UneUfe => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Trump::Suit(suit) => suit as usize,
            Trump::ObeAbe => 4,
            Trump::UneUfe => 5,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0..=3 => match Suit::from_index(index) {
                Some(suit) => Some(Trump::Suit(suit)),
                None => None,
            },
            4 => Some(Trump::ObeAbe),
            5 => Some(Trump::UneUfe),
            _ => None,
        }
    }
}

impl fmt::Display for Trump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trump::Suit(Suit::Diamonds) => f.write_str("Diamonds"),
            Trump::Suit(Suit::Hearts) => f.write_str("Hearts"),
            Trump::Suit(Suit::Spades) => f.write_str("Spades"),
            Trump::Suit(Suit::Clubs) => f.write_str("Clubs"),
            Trump::ObeAbe => f.write_str("Obe-Abe"),
            Trump::UneUfe => f.write_str("Une-Ufe"),
        }
    }
}

/// Outcome of a trump decision: declare a contract or hand the choice to the partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrumpChoice {
    Declare(Trump),
    Push,
}

/// Trump-phase status of the observing seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Forehand {
    #[default]
    Unknown,
    /// Declaring first; pushing is allowed.
    Forehand,
    /// Partner pushed; a contract must be declared.
    Pushed,
}
