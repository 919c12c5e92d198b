use crate::model::card::{Card, DECK_SIZE};
use crate::model::card_set::CardSet;
use crate::model::player::PlayerPosition;
use crate::model::rules::TRICKS_PER_DEAL;
use crate::model::trick::{CompletedTrick, Trick};
use crate::model::trump::{Forehand, Trump};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What one seat can see at a decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameObservation {
    pub dealer: PlayerPosition,
    /// Seat that must act and whose hand is visible.
    pub player: PlayerPosition,
    pub trump: Option<Trump>,
    #[serde(default)]
    pub forehand: Forehand,
    #[serde(default)]
    pub declared_by: Option<PlayerPosition>,
    pub hand: CardSet,
    #[serde(default)]
    pub tricks: Vec<CompletedTrick>,
    pub current_trick: Trick,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservationError {
    #[error("{count} completed tricks exceeds the nine of a deal")]
    TooManyTricks { count: usize },
    #[error("current trick already holds four cards")]
    TrickAlreadyComplete,
    #[error("current trick has a card after an empty slot")]
    TrickSlotGap,
    #[error("{count} cards played exceeds the 36 of a deck")]
    TooManyCards { count: usize },
    #[error("card {0} was played more than once")]
    CardPlayedTwice(Card),
    #[error("hand holds {0} which was already played")]
    HandContainsPlayedCard(Card),
    #[error("hand holds {actual} cards but {expected} turns remain")]
    HandSizeMismatch { expected: usize, actual: usize },
    #[error("trick {index} was led by {actual} but {expected} won the previous trick")]
    LeaderMismatch {
        index: usize,
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("{actual} observes but {expected} is due to play")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("cards were played before a trump was declared")]
    MissingTrump,
}

impl GameObservation {
    pub fn nr_tricks(&self) -> usize {
        self.tricks.len()
    }

    pub fn nr_cards_in_trick(&self) -> usize {
        self.current_trick.slots().filled()
    }

    pub fn nr_played_cards(&self) -> usize {
        self.tricks.len() * 4 + self.nr_cards_in_trick()
    }

    /// Every card already played in the deal, current trick included.
    pub fn played_cards(&self) -> CardSet {
        self.tricks
            .iter()
            .flat_map(|trick| trick.cards)
            .chain(self.current_trick.slots().cards())
            .collect()
    }

    /// Trick points accumulated per seat over the completed tricks.
    pub fn seat_points(&self) -> [u32; 4] {
        let mut points = [0u32; 4];
        for trick in &self.tricks {
            points[trick.winner.index()] += trick.points;
        }
        points
    }

    /// Points per team (North/South, East/West).
    pub fn team_points(&self) -> [u32; 2] {
        let seats = self.seat_points();
        [seats[0] + seats[2], seats[1] + seats[3]]
    }

    pub fn is_terminal(&self) -> bool {
        self.tricks.len() >= TRICKS_PER_DEAL
    }

    /// Check the observation for internal consistency.
    pub fn validate(&self) -> Result<(), ObservationError> {
        if self.tricks.len() > TRICKS_PER_DEAL {
            return Err(ObservationError::TooManyTricks {
                count: self.tricks.len(),
            });
        }
        let slots = self.current_trick.slots();
        if slots.has_gaps() {
            return Err(ObservationError::TrickSlotGap);
        }
        if slots.is_complete() {
            return Err(ObservationError::TrickAlreadyComplete);
        }
        let count = self.nr_played_cards();
        if count > DECK_SIZE {
            return Err(ObservationError::TooManyCards { count });
        }
        if count > 0 && self.trump.is_none() {
            return Err(ObservationError::MissingTrump);
        }

        let mut played = CardSet::EMPTY;
        let all_played = self
            .tricks
            .iter()
            .flat_map(|trick| trick.cards)
            .chain(slots.cards());
        for card in all_played {
            if !played.insert(card) {
                return Err(ObservationError::CardPlayedTwice(card));
            }
        }
        if let Some(card) = self.hand.intersection(played).first() {
            return Err(ObservationError::HandContainsPlayedCard(card));
        }

        for (index, pair) in self.tricks.windows(2).enumerate() {
            if pair[1].leader != pair[0].winner {
                return Err(ObservationError::LeaderMismatch {
                    index: index + 1,
                    expected: pair[0].winner,
                    actual: pair[1].leader,
                });
            }
        }
        if let Some(last) = self.tricks.last() {
            if !self.is_terminal() && self.current_trick.leader() != last.winner {
                return Err(ObservationError::LeaderMismatch {
                    index: self.tricks.len(),
                    expected: last.winner,
                    actual: self.current_trick.leader(),
                });
            }
        }

        if self.trump.is_some() && !self.is_terminal() {
            let expected = self.current_trick.expected_position();
            if expected != self.player {
                return Err(ObservationError::OutOfTurn {
                    expected,
                    actual: self.player,
                });
            }
        }

        let expected = TRICKS_PER_DEAL - self.tricks.len();
        if self.hand.len() != expected {
            return Err(ObservationError::HandSizeMismatch {
                expected,
                actual: self.hand.len(),
            });
        }

        Ok(())
    }
}
