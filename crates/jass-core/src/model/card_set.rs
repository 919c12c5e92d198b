use crate::model::card::{Card, DECK_SIZE};
use crate::model::suit::Suit;
use core::fmt;
use rand::Rng;
use serde::{Deserialize, Serialize};

const FULL_MASK: u64 = (1u64 << DECK_SIZE) - 1;
const SUIT_MASK: u64 = 0x1ff;

/// Fixed-size set of cards backed by a 36-bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Card>", into = "Vec<Card>")]
pub struct CardSet(u64);

impl CardSet {
    pub const EMPTY: CardSet = CardSet(0);
    pub const FULL: CardSet = CardSet(FULL_MASK);

    pub const fn of_suit(suit: Suit) -> Self {
        Self(SUIT_MASK << (suit as u64 * 9))
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, card: Card) -> bool {
        self.0 & (1u64 << card.id()) != 0
    }

    pub fn insert(&mut self, card: Card) -> bool {
        let fresh = !self.contains(card);
        self.0 |= 1u64 << card.id();
        fresh
    }

    pub fn remove(&mut self, card: Card) -> bool {
        let present = self.contains(card);
        self.0 &= !(1u64 << card.id());
        present
    }

    pub const fn union(self, other: CardSet) -> CardSet {
        CardSet(self.0 | other.0)
    }

    pub const fn intersection(self, other: CardSet) -> CardSet {
        CardSet(self.0 & other.0)
    }

    pub const fn difference(self, other: CardSet) -> CardSet {
        CardSet(self.0 & !other.0)
    }

    /// Cards of the full deck that are not in this set.
    pub const fn complement(self) -> CardSet {
        CardSet(!self.0 & FULL_MASK)
    }

    pub const fn in_suit(self, suit: Suit) -> CardSet {
        self.intersection(CardSet::of_suit(suit))
    }

    pub const fn count_suit(self, suit: Suit) -> usize {
        self.in_suit(suit).len()
    }

    pub fn first(self) -> Option<Card> {
        if self.0 == 0 {
            None
        } else {
            Card::from_id(self.0.trailing_zeros() as usize)
        }
    }

    /// Highest card id in the set.
    pub fn last(self) -> Option<Card> {
        if self.0 == 0 {
            None
        } else {
            Card::from_id(63 - self.0.leading_zeros() as usize)
        }
    }

    /// The `n`-th card in ascending id order.
    pub fn nth(self, n: usize) -> Option<Card> {
        self.iter().nth(n)
    }

    /// Uniformly random member of the set.
    pub fn choose<R: Rng + ?Sized>(self, rng: &mut R) -> Option<Card> {
        if self.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.len());
        self.nth(index)
    }

    pub fn iter(self) -> CardSetIter {
        CardSetIter(self.0)
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardSet::EMPTY;
        for card in iter {
            set.insert(card);
        }
        set
    }
}

impl IntoIterator for CardSet {
    type Item = Card;
    type IntoIter = CardSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<Card>> for CardSet {
    fn from(cards: Vec<Card>) -> Self {
        cards.into_iter().collect()
    }
}

impl From<CardSet> for Vec<Card> {
    fn from(set: CardSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|c| c.to_string())).finish()
    }
}

impl fmt::Display for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for card in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{card}")?;
            first = false;
        }
        Ok(())
    }
}

/// Ascending iterator over the cards of a [`CardSet`].
#[derive(Debug, Clone)]
pub struct CardSetIter(u64);

impl Iterator for CardSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Card> {
        if self.0 == 0 {
            return None;
        }
        let id = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Card::from_id(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.0.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CardSetIter {}

#[cfg(test)]
mod tests {
    use super::CardSet;
    use crate::model::card::{Card, DECK_SIZE};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn insert_remove_and_membership() {
        let mut set = CardSet::EMPTY;
        let card = Card::new(Rank::Queen, Suit::Hearts);
        assert!(set.insert(card));
        assert!(!set.insert(card));
        assert!(set.contains(card));
        assert_eq!(set.len(), 1);
        assert!(set.remove(card));
        assert!(set.is_empty());
    }

    #[test]
    fn suit_masks_partition_the_deck() {
        let mut total = 0;
        for suit in Suit::ALL {
            let suit_cards = CardSet::of_suit(suit);
            assert_eq!(suit_cards.len(), 9);
            assert!(suit_cards.iter().all(|c| c.suit() == suit));
            total += suit_cards.len();
        }
        assert_eq!(total, DECK_SIZE);
        assert_eq!(CardSet::FULL.len(), DECK_SIZE);
    }

    #[test]
    fn set_algebra_and_ordering() {
        let a: CardSet = [0, 5, 20].iter().filter_map(|&i| Card::from_id(i)).collect();
        let b: CardSet = [5, 35].iter().filter_map(|&i| Card::from_id(i)).collect();
        assert_eq!(a.intersection(b).len(), 1);
        assert_eq!(a.union(b).len(), 4);
        assert_eq!(a.difference(b).len(), 2);
        assert_eq!(a.first().map(Card::id), Some(0));
        assert_eq!(a.union(b).last().map(Card::id), Some(35));
        assert_eq!(b.complement().len(), DECK_SIZE - 2);
        let ids: Vec<_> = a.iter().map(Card::id).collect();
        assert_eq!(ids, vec![0, 5, 20]);
    }

    #[test]
    fn choose_stays_within_set() {
        let set = CardSet::of_suit(Suit::Clubs);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let card = set.choose(&mut rng).expect("non-empty");
            assert!(set.contains(card));
        }
        assert_eq!(CardSet::EMPTY.choose(&mut rng), None);
    }

    #[test]
    fn serializes_as_card_list() {
        let set: CardSet = [Card::new(Rank::Ace, Suit::Diamonds), Card::new(Rank::Six, Suit::Clubs)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&set).expect("serialize");
        assert_eq!(json, "[0,35]");
        let back: CardSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, set);
    }
}
