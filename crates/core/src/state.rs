use crate::{ActionType, Condition, Effects, SimulationInput};
use serde::{Deserialize, Serialize};

const HQ_PERCENT_TABLE: [u8; 101] = [
    1, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6, 6, 7, 7, 7, 7, 8, 8, 8,
    9, 9, 9, 10, 10, 10, 11, 11, 11, 12, 12, 12, 13, 13, 13, 14, 14, 14, 15, 15, 15, 16, 16, 17, 17,
    17, 18, 18, 18, 19, 19, 20, 20, 21, 22, 23, 24, 26, 28, 31, 34, 38, 42, 47, 52, 58, 64, 68, 71,
    74, 76, 78, 80, 81, 82, 83, 84, 85, 86, 87, 88, 89, 90, 91, 92, 94, 96, 98, 100,
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ComboStage {
    #[default]
    None,
    /// Basic Touch was the previous action.
    BasicTouch,
    /// Standard Touch followed Basic Touch.
    StandardTouch,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct ActionStates {
    pub combo: ComboStage,
    pub careful_observation_count: u8,
    pub used_heart_and_soul: bool,
    pub used_quick_innovation: bool,
    pub used_trained_perfection: bool,
    pub observed: bool,
}

impl ActionStates {
    pub fn mutate(&mut self, action: ActionType) {
        self.combo = match (action, self.combo) {
            (ActionType::BasicTouch, _) => ComboStage::BasicTouch,
            (ActionType::StandardTouch, ComboStage::BasicTouch) => ComboStage::StandardTouch,
            _ => ComboStage::None,
        };
        match action {
            ActionType::CarefulObservation => self.careful_observation_count += 1,
            ActionType::HeartAndSoul => self.used_heart_and_soul = true,
            ActionType::QuickInnovation => self.used_quick_innovation = true,
            ActionType::TrainedPerfection => self.used_trained_perfection = true,
            _ => {}
        }
        self.observed = action == ActionType::Observe;
    }
}

/// One point of a craft. Plain value: every search branch owns its copy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SimulationState {
    pub step_count: u32,
    pub action_count: u32,
    pub progress: u32,
    pub quality: u32,
    pub durability: u32,
    pub cp: u32,
    pub condition: Condition,
    pub effects: Effects,
    pub action_states: ActionStates,
}

impl SimulationState {
    pub fn new(input: &SimulationInput) -> Self {
        Self {
            step_count: 0,
            action_count: 0,
            progress: 0,
            quality: 0,
            durability: input.recipe.max_durability,
            cp: input.stats.cp,
            condition: Condition::Normal,
            effects: Effects::default(),
            action_states: ActionStates::default(),
        }
    }

    pub fn is_first_step(&self) -> bool {
        self.step_count == 0
    }

    pub fn hq_percent(&self, input: &SimulationInput) -> u8 {
        let max = input.recipe.max_quality.max(1) as u64;
        let idx = (self.quality as u64 * 100 / max).min(100) as usize;
        HQ_PERCENT_TABLE[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_stage_requires_basic_before_standard() {
        let mut states = ActionStates::default();
        states.mutate(ActionType::StandardTouch);
        assert_eq!(states.combo, ComboStage::None);
        states.mutate(ActionType::BasicTouch);
        assert_eq!(states.combo, ComboStage::BasicTouch);
        states.mutate(ActionType::StandardTouch);
        assert_eq!(states.combo, ComboStage::StandardTouch);
        states.mutate(ActionType::AdvancedTouch);
        assert_eq!(states.combo, ComboStage::None);
    }

    #[test]
    fn observe_flag_only_lasts_one_action() {
        let mut states = ActionStates::default();
        states.mutate(ActionType::Observe);
        assert!(states.observed);
        states.mutate(ActionType::BasicSynthesis);
        assert!(!states.observed);
        states.mutate(ActionType::CarefulObservation);
        states.mutate(ActionType::CarefulObservation);
        assert_eq!(states.careful_observation_count, 2);
    }
}
