use crate::{Condition, SimulationInput};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    pub fn next_percent(&mut self) -> u32 {
        self.rng.gen_range(0..100)
    }
}

/// Source of success rolls and condition changes.
#[derive(Debug, Clone, Default)]
pub enum Roller {
    /// Conditions stay Normal and only certain actions succeed.
    #[default]
    Deterministic,
    Seeded(RngState),
}

impl Roller {
    pub fn seeded(seed: u64) -> Self {
        Roller::Seeded(RngState::from_seed(seed))
    }

    /// `rate` is out of 100 and already clamped.
    pub fn roll_success(&mut self, rate: u32) -> bool {
        match self {
            Roller::Deterministic => rate >= 100,
            Roller::Seeded(rng) => rng.next_percent() < rate,
        }
    }

    pub fn next_condition(&mut self, input: &SimulationInput, current: Condition) -> Condition {
        if let Some(next) = current.fixed_successor() {
            return next;
        }
        match self {
            Roller::Deterministic => Condition::Normal,
            Roller::Seeded(rng) => {
                let mut roll = rng.next_f32();
                for condition in input.recipe.conditions.iter() {
                    roll -= condition.base_chance(input.recipe.is_expert, input.stats.level);
                    if roll < 0.0 {
                        return condition;
                    }
                }
                Condition::Normal
            }
        }
    }
}
