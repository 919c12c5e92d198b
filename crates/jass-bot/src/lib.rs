pub mod agent;
pub mod mcts;
pub mod trump;

pub use agent::{Agent, AgentError, MctsAgent, RandomAgent, RuleBasedAgent};
pub use mcts::{ChildStats, DealState, MctsConfig, NodeId, SearchError, SearchNode, SearchTree};
pub use trump::TrumpHeuristic;
