mod mcts;
mod random;
mod rule_based;

pub use mcts::MctsAgent;
pub use random::RandomAgent;
pub use rule_based::RuleBasedAgent;

use crate::mcts::SearchError;
use jass_core::game::observation::{GameObservation, ObservationError};
use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::rules::RuleFacade;
use jass_core::model::trump::TrumpChoice;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error(transparent)]
    Observation(#[from] ObservationError),
    #[error("search failed: {0}")]
    Search(#[from] SearchError),
    #[error("card play requires a declared trump")]
    TrumpNotDeclared,
    #[error("no legal card in hand")]
    NoLegalCard,
}

/// A seat at the table: answers the two decisions of a deal.
pub trait Agent: Send {
    fn name(&self) -> &'static str;

    /// Declare a contract or push it to the partner.
    fn action_trump(&mut self, obs: &GameObservation) -> Result<TrumpChoice, AgentError>;

    /// Card to play for the seat in `obs`.
    fn action_play_card(&mut self, obs: &GameObservation) -> Result<Card, AgentError>;
}

/// Legal cards for the seat described by a validated observation.
pub(crate) fn legal_cards<R: RuleFacade>(
    rules: &R,
    obs: &GameObservation,
) -> Result<CardSet, AgentError> {
    obs.validate()?;
    let trump = obs.trump.ok_or(AgentError::TrumpNotDeclared)?;
    let slots = obs.current_trick.slots();
    Ok(rules.legal_cards(obs.hand, slots, slots.filled(), trump))
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
