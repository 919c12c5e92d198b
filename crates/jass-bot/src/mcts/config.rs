const DEFAULT_ITERATIONS: usize = 80;
const DEFAULT_EXPLORATION: f64 = 1.0;

/// Search budget and tuning for the MCTS agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsConfig {
    pub iterations: usize,
    /// UCB1 exploration constant.
    pub exploration: f64,
    /// Seed for the agent's random source; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            exploration: DEFAULT_EXPLORATION,
            seed: None,
        }
    }
}

impl MctsConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let iterations = read("JASS_MCTS_ITERATIONS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_ITERATIONS);

        let exploration = read("JASS_MCTS_EXPLORATION")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(DEFAULT_EXPLORATION);

        let seed = read("JASS_MCTS_SEED").and_then(|raw| raw.trim().parse::<u64>().ok());

        Self {
            iterations,
            exploration,
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn from_reader_defaults_when_unset() {
        let config = MctsConfig::from_reader(|_| None);
        assert_eq!(config, MctsConfig::default());
        assert_eq!(config.iterations, 80);
    }

    #[test]
    fn from_reader_respects_overrides() {
        let mut vars = HashMap::new();
        vars.insert("JASS_MCTS_ITERATIONS".to_string(), "40".to_string());
        vars.insert("JASS_MCTS_EXPLORATION".to_string(), "1.4".to_string());
        vars.insert("JASS_MCTS_SEED".to_string(), " 17 ".to_string());

        let config = MctsConfig::from_reader(|key| vars.get(key).cloned());
        assert_eq!(config.iterations, 40);
        assert!((config.exploration - 1.4).abs() < f64::EPSILON);
        assert_eq!(config.seed, Some(17));
    }

    #[test]
    fn from_reader_rejects_invalid_values() {
        let mut vars = HashMap::new();
        vars.insert("JASS_MCTS_ITERATIONS".to_string(), "0".to_string());
        vars.insert("JASS_MCTS_EXPLORATION".to_string(), "-2".to_string());
        vars.insert("JASS_MCTS_SEED".to_string(), "abc".to_string());

        let config = MctsConfig::from_reader(|key| vars.get(key).cloned());
        assert_eq!(config, MctsConfig::default());
    }
}
