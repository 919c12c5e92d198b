use super::{Agent, AgentError, legal_cards, seeded_rng};
use crate::trump::TrumpHeuristic;
use jass_core::game::observation::GameObservation;
use jass_core::model::card::Card;
use jass_core::model::rules::SchieberRules;
use jass_core::model::trump::TrumpChoice;
use rand::rngs::StdRng;

/// Heuristic trump selection, random legal card play.
pub struct RuleBasedAgent {
    rules: SchieberRules,
    heuristic: TrumpHeuristic,
    rng: StdRng,
}

impl RuleBasedAgent {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_heuristic(TrumpHeuristic::default(), seed)
    }

    pub fn with_heuristic(heuristic: TrumpHeuristic, seed: Option<u64>) -> Self {
        Self {
            rules: SchieberRules,
            heuristic,
            rng: seeded_rng(seed),
        }
    }
}

impl Agent for RuleBasedAgent {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    fn action_trump(&mut self, obs: &GameObservation) -> Result<TrumpChoice, AgentError> {
        Ok(self.heuristic.choose_for(obs))
    }

    fn action_play_card(&mut self, obs: &GameObservation) -> Result<Card, AgentError> {
        legal_cards(&self.rules, obs)?
            .choose(&mut self.rng)
            .ok_or(AgentError::NoLegalCard)
    }
}
