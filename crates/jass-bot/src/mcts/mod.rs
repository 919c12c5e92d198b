//! Monte-Carlo tree search over the remainder of a deal.
//!
//! The tree lives in an arena owned by [`SearchTree`]; nodes refer to each
//! other through [`NodeId`]s and the whole arena is dropped with the tree.

mod config;
mod error;
mod node;
mod tree;

pub use config::MctsConfig;
pub use error::SearchError;
pub use node::{DealState, NodeId, SearchNode};
pub use tree::{ChildStats, SearchTree};
