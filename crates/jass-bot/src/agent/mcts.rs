use super::{Agent, AgentError, seeded_rng};
use crate::mcts::{MctsConfig, SearchTree};
use crate::trump::TrumpHeuristic;
use jass_core::game::observation::GameObservation;
use jass_core::model::card::Card;
use jass_core::model::rules::SchieberRules;
use jass_core::model::trump::TrumpChoice;
use rand::rngs::StdRng;
use std::time::Instant;
use tracing::{Level, event};

/// Plays cards by Monte-Carlo tree search and picks trump with [`TrumpHeuristic`].
///
/// One random source is seeded at construction and threaded through every
/// search the agent runs, so a seeded agent replays the same game.
pub struct MctsAgent {
    config: MctsConfig,
    rules: SchieberRules,
    heuristic: TrumpHeuristic,
    rng: StdRng,
}

impl MctsAgent {
    pub fn new(config: MctsConfig) -> Self {
        Self {
            config,
            rules: SchieberRules,
            heuristic: TrumpHeuristic::default(),
            rng: seeded_rng(config.seed),
        }
    }

    pub fn from_env() -> Self {
        Self::new(MctsConfig::from_env())
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl Default for MctsAgent {
    fn default() -> Self {
        Self::new(MctsConfig::default())
    }
}

impl Agent for MctsAgent {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn action_trump(&mut self, obs: &GameObservation) -> Result<TrumpChoice, AgentError> {
        Ok(self.heuristic.choose_for(obs))
    }

    fn action_play_card(&mut self, obs: &GameObservation) -> Result<Card, AgentError> {
        let started = Instant::now();
        let mut tree = SearchTree::from_observation(&self.rules, obs, self.config.exploration)?;
        let performed = tree.run(self.config.iterations, &mut self.rng)?;
        let card = tree.best_action()?;

        if tracing::enabled!(target: "jass_bot::mcts", Level::DEBUG) {
            let stats = tree
                .root_statistics()
                .iter()
                .map(|child| format!("{}:{}", child.card, child.visits))
                .collect::<Vec<_>>()
                .join(",");
            event!(
                target: "jass_bot::mcts",
                Level::DEBUG,
                seat = %obs.player,
                trick = obs.nr_tricks(),
                budget = self.config.iterations,
                performed,
                nodes = tree.node_count(),
                chosen = %card,
                visits = %stats,
                elapsed_us = started.elapsed().as_micros() as u64,
            );
        }
        Ok(card)
    }
}
