pub mod card;
pub mod card_set;
pub mod deck;
pub mod player;
pub mod rank;
pub mod rules;
pub mod suit;
pub mod trick;
pub mod trump;
