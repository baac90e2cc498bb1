use craftplan_core::{CompletionState, SimulationInput, SimulationState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreWeights {
    pub progress: f32,
    pub quality: f32,
    pub durability: f32,
    pub cp: f32,
    /// Reward for finishing in fewer actions.
    pub steps: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            progress: 0.20,
            quality: 0.65,
            durability: 0.05,
            cp: 0.05,
            steps: 0.05,
        }
    }
}

impl ScoreWeights {
    pub(crate) fn fields(&self) -> [(&'static str, f32); 5] {
        [
            ("progress", self.progress),
            ("quality", self.quality),
            ("durability", self.durability),
            ("cp", self.cp),
            ("steps", self.steps),
        ]
    }
}

/// Score of a finished rotation. Anything that did not reach full progress
/// scores zero.
pub fn score_state(
    input: &SimulationInput,
    state: &SimulationState,
    completion: CompletionState,
    weights: &ScoreWeights,
    max_step_count: u32,
) -> f32 {
    if completion != CompletionState::ProgressComplete {
        return 0.0;
    }
    let fewer_steps = 1.0 - (state.action_count + 1) as f32 / max_step_count.max(1) as f32;
    if input.max_quality() == 0 {
        return fewer_steps;
    }

    let ratio = |value: u32, target: u32| {
        if target == 0 {
            1.0
        } else {
            (value as f32 / target as f32).clamp(0.0, 1.0)
        }
    };
    weights.progress * ratio(state.progress, input.max_progress())
        + weights.quality * ratio(state.quality, input.max_quality())
        + weights.durability * ratio(state.durability, input.max_durability())
        + weights.cp * ratio(state.cp, input.stats.cp)
        + weights.steps * fewer_steps
}
