//! Closed-form trump selection.
//!
//! Every contract is scored by summing a per-rank weight over the hand. The
//! best contract is declared when it reaches [`DECLARE_THRESHOLD`] or when the
//! seat is forced to choose because the forehand already pushed.

use jass_core::game::observation::GameObservation;
use jass_core::model::card_set::CardSet;
use jass_core::model::trump::{Forehand, Trump, TrumpChoice};
use tracing::{Level, event};

/// Weights indexed by rank offset (A, K, Q, J, 10, 9, 8, 7, 6).
pub type RankWeights = [u32; 9];

pub const TRUMP_WEIGHTS: RankWeights = [15, 10, 7, 25, 6, 19, 5, 5, 5];
pub const PLAIN_WEIGHTS: RankWeights = [9, 7, 5, 2, 1, 0, 0, 0, 0];
pub const OBE_ABE_WEIGHTS: RankWeights = [14, 10, 8, 7, 5, 0, 5, 0, 0];
pub const UNE_UFE_WEIGHTS: RankWeights = [0, 2, 1, 1, 5, 5, 7, 9, 11];

pub const DECLARE_THRESHOLD: u32 = 68;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrumpHeuristic {
    pub threshold: u32,
}

impl Default for TrumpHeuristic {
    fn default() -> Self {
        Self {
            threshold: DECLARE_THRESHOLD,
        }
    }
}

impl TrumpHeuristic {
    /// Score of `hand` under `trump`.
    pub fn score(hand: CardSet, trump: Trump) -> u32 {
        hand.iter()
            .map(|card| {
                let offset = card.offset();
                match trump {
                    Trump::Suit(suit) if card.suit() == suit => TRUMP_WEIGHTS[offset],
                    Trump::Suit(_) => PLAIN_WEIGHTS[offset],
                    Trump::ObeAbe => OBE_ABE_WEIGHTS[offset],
                    Trump::UneUfe => UNE_UFE_WEIGHTS[offset],
                }
            })
            .sum()
    }

    /// Scores for every contract, in [`Trump::ALL`] order.
    pub fn scores(hand: CardSet) -> [u32; 6] {
        Trump::ALL.map(|trump| Self::score(hand, trump))
    }

    /// Highest scoring contract; the earliest contract wins ties.
    pub fn best(hand: CardSet) -> (Trump, u32) {
        let mut best = (Trump::ALL[0], 0);
        for trump in Trump::ALL {
            let score = Self::score(hand, trump);
            if score > best.1 {
                best = (trump, score);
            }
        }
        best
    }

    pub fn choose(&self, hand: CardSet, forehand: Forehand) -> TrumpChoice {
        let (trump, score) = Self::best(hand);
        let forced = forehand == Forehand::Pushed;
        let choice = if forced || score >= self.threshold {
            TrumpChoice::Declare(trump)
        } else {
            TrumpChoice::Push
        };

        event!(
            target: "jass_bot::trump",
            Level::DEBUG,
            best = %trump,
            score,
            threshold = self.threshold,
            forced,
            choice = ?choice,
        );
        choice
    }

    pub fn choose_for(&self, obs: &GameObservation) -> TrumpChoice {
        self.choose(obs.hand, obs.forehand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jass_core::model::suit::Suit;

    fn hand(cards: &[&str]) -> CardSet {
        cards.iter().map(|raw| raw.parse().unwrap()).collect()
    }

    #[test]
    fn strong_hearts_hand_is_declared() {
        let cards = hand(&["HJ", "H9", "HA", "DA", "DJ", "S6", "S7", "S8", "C6"]);
        assert_eq!(TrumpHeuristic::scores(cards), [51, 70, 37, 27, 47, 45]);
        let choice = TrumpHeuristic::default().choose(cards, Forehand::Forehand);
        assert_eq!(choice, TrumpChoice::Declare(Trump::Suit(Suit::Hearts)));
    }

    #[test]
    fn weak_hand_pushes_unless_forced() {
        let cards = hand(&["C10", "D7", "DA", "H8", "H9", "HA", "S10", "S6", "S8"]);
        assert_eq!(TrumpHeuristic::best(cards), (Trump::Suit(Suit::Hearts), 50));

        let heuristic = TrumpHeuristic::default();
        assert_eq!(heuristic.choose(cards, Forehand::Forehand), TrumpChoice::Push);
        assert_eq!(
            heuristic.choose(cards, Forehand::Pushed),
            TrumpChoice::Declare(Trump::Suit(Suit::Hearts))
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        let cards = hand(&["HJ", "H9", "HA", "DA", "DJ", "S6", "S7", "S8", "C6"]);
        let heuristic = TrumpHeuristic { threshold: 70 };
        assert_eq!(
            heuristic.choose(cards, Forehand::Forehand),
            TrumpChoice::Declare(Trump::Suit(Suit::Hearts))
        );
        let heuristic = TrumpHeuristic { threshold: 71 };
        assert_eq!(heuristic.choose(cards, Forehand::Forehand), TrumpChoice::Push);
    }

    #[test]
    fn empty_hand_falls_back_to_first_contract() {
        assert_eq!(TrumpHeuristic::best(CardSet::EMPTY), (Trump::ALL[0], 0));
    }

    #[test]
    fn no_trump_contracts_score_their_own_tables() {
        let aces = hand(&["DA", "HA", "SA", "CA"]);
        assert_eq!(TrumpHeuristic::score(aces, Trump::ObeAbe), 56);
        assert_eq!(TrumpHeuristic::score(aces, Trump::UneUfe), 0);
        let sixes = hand(&["D6", "H6", "S6", "C6"]);
        assert_eq!(TrumpHeuristic::score(sixes, Trump::UneUfe), 44);
        assert_eq!(TrumpHeuristic::best(sixes), (Trump::UneUfe, 44));
    }
}
