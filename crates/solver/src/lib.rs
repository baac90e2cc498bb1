//! Rotation search over the crafting simulator: action bitsets, pruning
//! heuristics, MCTS and the strategies that drive it.

mod action_set;
mod algorithms;
mod bits;
mod cancel;
mod config;
mod error;
mod heuristics;
mod mcts;
mod objective;
mod report;
mod solution;

pub use action_set::*;
pub use algorithms::*;
pub use bits::*;
pub use cancel::*;
pub use config::*;
pub use error::*;
pub use heuristics::*;
pub use mcts::*;
pub use objective::*;
pub use report::*;
pub use solution::*;
