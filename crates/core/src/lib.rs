//! Crafting simulation core. Keep this crate free of IO and platform concerns.

pub mod actions;
pub mod condition;
pub mod effects;
pub mod input;
pub mod rng;
pub mod simulator;
pub mod state;

pub use actions::*;
pub use condition::*;
pub use effects::*;
pub use input::*;
pub use rng::*;
pub use simulator::*;
pub use state::*;
