//! Rule facade consumed by the search engine and the game simulator.
//!
//! [`SchieberRules`] implements the Schieber variant: suit contracts,
//! Obe-Abe (high wins) and Une-Ufe (low wins), with the usual follow-suit,
//! undertrump and free-Jack exceptions.

use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::player::PlayerPosition;
use crate::model::rank::Rank;
use crate::model::trick::TrickSlots;
use crate::model::trump::Trump;

/// Points distributed over one complete deal, last-trick bonus included.
pub const TOTAL_DEAL_POINTS: u32 = 157;
/// Bonus awarded to the winner of the ninth trick.
pub const LAST_TRICK_BONUS: u32 = 5;
/// Tricks in one deal.
pub const TRICKS_PER_DEAL: usize = 9;

const TRUMP_VALUES: [u32; 9] = [11, 4, 3, 20, 10, 14, 0, 0, 0];
const PLAIN_VALUES: [u32; 9] = [11, 4, 3, 2, 10, 0, 0, 0, 0];
const OBE_ABE_VALUES: [u32; 9] = [11, 4, 3, 2, 10, 0, 8, 0, 0];
const UNE_UFE_VALUES: [u32; 9] = [0, 4, 3, 2, 10, 0, 8, 0, 11];

// Indexed by rank offset: J > 9 > A > K > Q > 10 > 8 > 7 > 6.
const TRUMP_STRENGTH: [u8; 9] = [6, 5, 4, 8, 3, 7, 2, 1, 0];

pub trait RuleFacade {
    /// Cards of `hand` that may be played into `trick` at `position`.
    fn legal_cards(&self, hand: CardSet, trick: &TrickSlots, position: usize, trump: Trump)
    -> CardSet;

    /// Points carried by the cards of `trick`.
    fn trick_points(&self, trick: &TrickSlots, is_last_trick: bool, trump: Trump) -> u32;

    /// Seat that takes `trick` when it was led by `leader`.
    fn trick_winner(&self, trick: &TrickSlots, leader: PlayerPosition, trump: Trump)
    -> PlayerPosition;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchieberRules;

impl SchieberRules {
    pub fn card_value(card: Card, trump: Trump) -> u32 {
        let offset = card.offset();
        match trump {
            Trump::Suit(suit) if card.suit() == suit => TRUMP_VALUES[offset],
            Trump::Suit(_) => PLAIN_VALUES[offset],
            Trump::ObeAbe => OBE_ABE_VALUES[offset],
            Trump::UneUfe => UNE_UFE_VALUES[offset],
        }
    }

    /// True when `a` beats `b` within the trump suit.
    pub fn is_higher_trump(a: Card, b: Card) -> bool {
        TRUMP_STRENGTH[a.offset()] > TRUMP_STRENGTH[b.offset()]
    }

    fn strength(card: Card, lead: Card, trump: Trump) -> (u8, u8) {
        let offset = card.offset();
        let follows = card.suit() == lead.suit();
        match trump {
            Trump::Suit(suit) if card.suit() == suit => (2, TRUMP_STRENGTH[offset]),
            Trump::UneUfe if follows => (1, offset as u8),
            _ if follows => (1, 8 - offset as u8),
            _ => (0, 0),
        }
    }
}

impl RuleFacade for SchieberRules {
    fn legal_cards(
        &self,
        hand: CardSet,
        trick: &TrickSlots,
        position: usize,
        trump: Trump,
    ) -> CardSet {
        let Some(lead_suit) = trick.lead_suit().filter(|_| position > 0) else {
            return hand;
        };

        let following = hand.in_suit(lead_suit);
        let Some(trump_suit) = trump.trump_suit() else {
            return if following.is_empty() { hand } else { following };
        };

        let trumps = hand.in_suit(trump_suit);
        if lead_suit == trump_suit {
            let jack = Card::new(Rank::Jack, trump_suit);
            if following.is_empty() || (following.len() == 1 && following.contains(jack)) {
                return hand;
            }
            return following;
        }

        let highest_played = trick
            .cards()
            .filter(|card| card.suit() == trump_suit)
            .reduce(|best, card| {
                if SchieberRules::is_higher_trump(card, best) {
                    card
                } else {
                    best
                }
            });
        let under_trumps: CardSet = match highest_played {
            Some(top) => trumps
                .iter()
                .filter(|card| !SchieberRules::is_higher_trump(*card, top))
                .collect(),
            None => CardSet::EMPTY,
        };

        let candidates = if following.is_empty() {
            hand
        } else {
            following.union(trumps)
        };
        let legal = candidates.difference(under_trumps);
        if legal.is_empty() { hand } else { legal }
    }

    fn trick_points(&self, trick: &TrickSlots, is_last_trick: bool, trump: Trump) -> u32 {
        let cards: u32 = trick
            .cards()
            .map(|card| SchieberRules::card_value(card, trump))
            .sum();
        if is_last_trick {
            cards + LAST_TRICK_BONUS
        } else {
            cards
        }
    }

    fn trick_winner(
        &self,
        trick: &TrickSlots,
        leader: PlayerPosition,
        trump: Trump,
    ) -> PlayerPosition {
        let Some(lead) = trick.lead() else {
            return leader;
        };
        let mut best_position = 0;
        let mut best = SchieberRules::strength(lead, lead, trump);
        for (position, slot) in trick.slots().iter().enumerate().skip(1) {
            let Some(card) = slot else {
                break;
            };
            let strength = SchieberRules::strength(*card, lead, trump);
            if strength > best {
                best = strength;
                best_position = position;
            }
        }
        leader.nth_after(best_position)
    }
}
