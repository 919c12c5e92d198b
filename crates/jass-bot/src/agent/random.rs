use super::{Agent, AgentError, legal_cards, seeded_rng};
use jass_core::game::observation::GameObservation;
use jass_core::model::card::Card;
use jass_core::model::rules::SchieberRules;
use jass_core::model::trump::{Trump, TrumpChoice};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Declares a uniformly random contract and plays a uniformly random legal card.
pub struct RandomAgent {
    rules: SchieberRules,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rules: SchieberRules,
            rng: seeded_rng(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &'static str {
        "random"
    }

    fn action_trump(&mut self, _obs: &GameObservation) -> Result<TrumpChoice, AgentError> {
        let trump = Trump::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Trump::ALL[0]);
        Ok(TrumpChoice::Declare(trump))
    }

    fn action_play_card(&mut self, obs: &GameObservation) -> Result<Card, AgentError> {
        legal_cards(&self.rules, obs)?
            .choose(&mut self.rng)
            .ok_or(AgentError::NoLegalCard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jass_core::game::sim::GameSim;
    use jass_core::model::player::PlayerPosition;

    #[test]
    fn plays_only_legal_cards() {
        let mut game = GameSim::with_seed(PlayerPosition::South, 21);
        let mut agent = RandomAgent::new(Some(4));
        let choice = agent.action_trump(&game.observation()).unwrap();
        game.action_trump(choice).unwrap();
        while !game.is_done() {
            let card = agent.action_play_card(&game.observation()).unwrap();
            assert!(game.legal_cards().contains(card));
            game.action_play_card(card).unwrap();
        }
        assert_eq!(game.points().iter().sum::<u32>(), 157);
    }

    #[test]
    fn rejects_play_before_trump() {
        let game = GameSim::with_seed(PlayerPosition::North, 1);
        let mut agent = RandomAgent::new(Some(1));
        assert_eq!(
            agent.action_play_card(&game.observation()),
            Err(AgentError::TrumpNotDeclared)
        );
    }
}
