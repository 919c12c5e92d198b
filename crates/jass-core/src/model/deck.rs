use crate::model::card::{Card, DECK_SIZE};
use crate::model::card_set::CardSet;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        Self {
            cards: Card::all().collect(),
        }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Split the deck into four hands of nine consecutive cards.
    pub fn deal(&self) -> [CardSet; 4] {
        let mut hands = [CardSet::EMPTY; 4];
        for (index, card) in self.cards.iter().enumerate() {
            hands[index * 4 / DECK_SIZE].insert(*card);
        }
        hands
    }
}
