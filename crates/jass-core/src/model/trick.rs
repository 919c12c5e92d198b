use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cards of one trick indexed by position in the trick (slot 0 is the lead).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TrickSlots([Option<Card>; 4]);

impl TrickSlots {
    pub const EMPTY: TrickSlots = TrickSlots([None; 4]);

    pub const fn from_slots(slots: [Option<Card>; 4]) -> Self {
        Self(slots)
    }

    pub fn from_cards(cards: &[Card]) -> Option<Self> {
        if cards.len() > 4 {
            return None;
        }
        let mut slots = [None; 4];
        for (slot, card) in slots.iter_mut().zip(cards) {
            *slot = Some(*card);
        }
        Some(Self(slots))
    }

    pub fn get(&self, position: usize) -> Option<Card> {
        self.0.get(position).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<Card>; 4] {
        &self.0
    }

    /// Number of leading slots that hold a card.
    pub fn filled(&self) -> usize {
        self.0.iter().take_while(|slot| slot.is_some()).count()
    }

    /// True when a card sits after an empty slot.
    pub fn has_gaps(&self) -> bool {
        let filled = self.filled();
        self.0[filled..].iter().any(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.filled() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.filled() == 4
    }

    pub fn lead(&self) -> Option<Card> {
        self.0[0]
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.lead().map(Card::suit)
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.0.iter().filter_map(|slot| *slot)
    }

    pub fn card_set(&self) -> CardSet {
        self.cards().collect()
    }

    /// Place `card` in the next free slot and return its position.
    pub fn push(&mut self, card: Card) -> Option<usize> {
        let position = self.filled();
        if position >= 4 {
            return None;
        }
        self.0[position] = Some(card);
        Some(position)
    }

    pub fn complete_cards(&self) -> Option<[Card; 4]> {
        Some([self.0[0]?, self.0[1]?, self.0[2]?, self.0[3]?])
    }
}

/// The trick currently being played, with its leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    leader: PlayerPosition,
    slots: TrickSlots,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
}

impl Trick {
    pub fn new(leader: PlayerPosition) -> Self {
        Self {
            leader,
            slots: TrickSlots::EMPTY,
        }
    }

    pub fn with_slots(leader: PlayerPosition, slots: TrickSlots) -> Self {
        Self { leader, slots }
    }

    pub fn leader(&self) -> PlayerPosition {
        self.leader
    }

    pub fn slots(&self) -> &TrickSlots {
        &self.slots
    }

    pub fn is_complete(&self) -> bool {
        self.slots.is_complete()
    }

    pub fn expected_position(&self) -> PlayerPosition {
        self.leader.nth_after(self.slots.filled())
    }

    pub fn play(&mut self, position: PlayerPosition, card: Card) -> Result<usize, TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        let expected = self.expected_position();
        if expected != position {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: position,
            });
        }

        self.slots.push(card).ok_or(TrickError::TrickComplete)
    }
}

/// A finished trick as recorded in the game history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrick {
    pub cards: [Card; 4],
    pub leader: PlayerPosition,
    pub winner: PlayerPosition,
    pub points: u32,
}
