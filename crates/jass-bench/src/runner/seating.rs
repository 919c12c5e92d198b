use jass_bot::{Agent, MctsAgent, MctsConfig, RandomAgent, RuleBasedAgent, TrumpHeuristic};
use thiserror::Error;

use crate::config::{AgentConfig, AgentKind};

#[derive(Debug, Error)]
pub enum AgentConfigError {
    #[error("invalid {kind:?} parameter for agent '{name}': {message}")]
    InvalidParam {
        name: String,
        kind: AgentKind,
        message: String,
    },
}

/// Parsed agent description; spawns a fresh agent for every game.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct AgentBlueprint {
    pub(super) name: String,
    implementation: AgentImplementation,
}

#[derive(Debug, Clone, PartialEq)]
enum AgentImplementation {
    Random,
    RuleBased(TrumpHeuristic),
    Mcts(MctsConfig),
}

impl AgentBlueprint {
    pub(super) fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentConfigError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentConfigError> {
        let params = Params::new(config)?;
        let implementation = match config.kind {
            AgentKind::Random => AgentImplementation::Random,
            AgentKind::RuleBased => {
                let mut heuristic = TrumpHeuristic::default();
                if let Some(threshold) = params.u64("threshold")? {
                    heuristic.threshold = u32::try_from(threshold)
                        .map_err(|_| params.invalid("threshold is out of range"))?;
                }
                AgentImplementation::RuleBased(heuristic)
            }
            AgentKind::Mcts => {
                let mut mcts = MctsConfig::default();
                if let Some(iterations) = params.u64("iterations")? {
                    if iterations == 0 {
                        return Err(params.invalid("iterations must be greater than zero"));
                    }
                    mcts.iterations = iterations as usize;
                }
                if let Some(exploration) = params.f64("exploration")? {
                    if !exploration.is_finite() || exploration < 0.0 {
                        return Err(params.invalid("exploration must be a non-negative number"));
                    }
                    mcts.exploration = exploration;
                }
                AgentImplementation::Mcts(mcts)
            }
        };

        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    pub(super) fn spawn_agent(&self, seed: u64) -> Box<dyn Agent> {
        match &self.implementation {
            AgentImplementation::Random => Box::new(RandomAgent::new(Some(seed))),
            AgentImplementation::RuleBased(heuristic) => {
                Box::new(RuleBasedAgent::with_heuristic(*heuristic, Some(seed)))
            }
            AgentImplementation::Mcts(config) => Box::new(MctsAgent::new(config.with_seed(seed))),
        }
    }
}

struct Params<'a> {
    name: &'a str,
    kind: AgentKind,
    mapping: Option<&'a serde_yaml::Mapping>,
}

impl<'a> Params<'a> {
    fn new(config: &'a AgentConfig) -> Result<Self, AgentConfigError> {
        let mut params = Self {
            name: &config.name,
            kind: config.kind,
            mapping: None,
        };
        if !config.params.is_null() {
            let Some(mapping) = config.params.as_mapping() else {
                return Err(params.invalid("expected a mapping of parameters"));
            };
            params.mapping = Some(mapping);
        }
        Ok(params)
    }

    fn get(&self, key: &str) -> Option<&'a serde_yaml::Value> {
        self.mapping?
            .iter()
            .find_map(|(k, value)| (k.as_str() == Some(key)).then_some(value))
    }

    fn u64(&self, key: &str) -> Result<Option<u64>, AgentConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.invalid(&format!("{key} must be a non-negative integer"))),
        }
    }

    fn f64(&self, key: &str) -> Result<Option<f64>, AgentConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid(&format!("{key} must be a number"))),
        }
    }

    fn invalid(&self, message: &str) -> AgentConfigError {
        AgentConfigError::InvalidParam {
            name: self.name.to_string(),
            kind: self.kind,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(kind: AgentKind, params: &[(&str, serde_yaml::Value)]) -> AgentConfig {
        let mapping = serde_yaml::Mapping::from_iter(
            params
                .iter()
                .map(|(key, value)| (serde_yaml::Value::String((*key).into()), value.clone())),
        );
        AgentConfig {
            name: "bot".to_string(),
            kind,
            params: serde_yaml::Value::Mapping(mapping),
        }
    }

    #[test]
    fn mcts_params_override_defaults() {
        let cfg = config(
            AgentKind::Mcts,
            &[
                ("iterations", serde_yaml::Value::from(40u64)),
                ("exploration", serde_yaml::Value::from(1.5f64)),
            ],
        );
        let blueprint = AgentBlueprint::from_config(&cfg).unwrap();
        let AgentImplementation::Mcts(mcts) = blueprint.implementation else {
            panic!("expected mcts blueprint");
        };
        assert_eq!(mcts.iterations, 40);
        assert!((mcts.exploration - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn mcts_rejects_zero_iterations() {
        let cfg = config(AgentKind::Mcts, &[("iterations", serde_yaml::Value::from(0u64))]);
        assert!(AgentBlueprint::from_config(&cfg).is_err());
    }

    #[test]
    fn rule_based_threshold_is_configurable() {
        let cfg = config(AgentKind::RuleBased, &[("threshold", serde_yaml::Value::from(90u64))]);
        let blueprint = AgentBlueprint::from_config(&cfg).unwrap();
        assert_eq!(
            blueprint.implementation,
            AgentImplementation::RuleBased(TrumpHeuristic { threshold: 90 })
        );
    }

    #[test]
    fn non_mapping_params_are_rejected() {
        let cfg = AgentConfig {
            name: "bot".to_string(),
            kind: AgentKind::Random,
            params: serde_yaml::Value::String("fast".into()),
        };
        assert!(AgentBlueprint::from_config(&cfg).is_err());
    }

    #[test]
    fn spawned_agents_report_their_kind() {
        for (kind, expected) in [
            (AgentKind::Random, "random"),
            (AgentKind::RuleBased, "rule_based"),
            (AgentKind::Mcts, "mcts"),
        ] {
            let blueprint = AgentBlueprint::from_config(&config(kind, &[])).unwrap();
            assert_eq!(blueprint.spawn_agent(1).name(), expected);
        }
    }
}
