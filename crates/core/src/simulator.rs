use crate::{ActionType, Condition, EffectType, Roller, SimulationInput, SimulationState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActionResponse {
    SimulationComplete,
    ActionNotUnlocked,
    NotEnoughCP,
    CannotUseAction,
    UsedAction,
    ProgressComplete,
    NoMoreDurability,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CompletionState {
    Incomplete,
    ProgressComplete,
    NoMoreDurability,
    MaxActionCountReached,
    NoMoreActions,
}

/// Applies actions to a state. The state is passed in and handed back by
/// value, so one simulator can serve many branches.
#[derive(Debug, Clone)]
pub struct Simulator<'a> {
    pub(crate) input: &'a SimulationInput,
    pub(crate) state: SimulationState,
    pub(crate) roller: Roller,
    max_step_count: Option<u32>,
}

impl<'a> Simulator<'a> {
    pub fn new(input: &'a SimulationInput) -> Self {
        Self::with_roller(input, Roller::Deterministic)
    }

    /// Rolls successes and conditions from the input's seed.
    pub fn seeded(input: &'a SimulationInput) -> Self {
        Self::with_roller(input, Roller::seeded(input.seed))
    }

    pub fn with_roller(input: &'a SimulationInput, roller: Roller) -> Self {
        Self {
            input,
            state: SimulationState::new(input),
            roller,
            max_step_count: None,
        }
    }

    /// Treats the craft as finished once this many actions have been taken.
    pub fn with_max_step_count(mut self, max_step_count: u32) -> Self {
        self.max_step_count = Some(max_step_count);
        self
    }

    pub fn input(&self) -> &'a SimulationInput {
        self.input
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn set_state(&mut self, state: SimulationState) {
        self.state = state;
    }

    pub fn completion_state(&self) -> CompletionState {
        if self.state.progress >= self.input.recipe.max_progress {
            return CompletionState::ProgressComplete;
        }
        if self.state.durability == 0 {
            return CompletionState::NoMoreDurability;
        }
        if let Some(max) = self.max_step_count {
            if self.state.action_count + 1 >= max {
                return CompletionState::MaxActionCountReached;
            }
        }
        CompletionState::Incomplete
    }

    pub fn is_complete(&self) -> bool {
        self.completion_state() != CompletionState::Incomplete
    }

    pub fn can_use(&self, action: ActionType) -> bool {
        action.can_use(self)
    }

    pub fn execute(
        &mut self,
        state: &SimulationState,
        action: ActionType,
    ) -> (ActionResponse, SimulationState) {
        self.state = *state;
        (self.execute_current(action), self.state)
    }

    /// Runs actions in order and stops at the first one that does not leave
    /// the craft running. Returns the last response and the index it came from.
    pub fn execute_multiple(
        &mut self,
        state: &SimulationState,
        actions: &[ActionType],
    ) -> (ActionResponse, SimulationState, usize) {
        self.state = *state;
        let mut response = ActionResponse::UsedAction;
        for (idx, action) in actions.iter().enumerate() {
            response = self.execute_current(*action);
            if response != ActionResponse::UsedAction {
                return (response, self.state, idx);
            }
        }
        (response, self.state, actions.len())
    }

    fn execute_current(&mut self, action: ActionType) -> ActionResponse {
        if self.is_complete() {
            return ActionResponse::SimulationComplete;
        }
        if !action.can_use(self) {
            if action.is_locked(self) {
                return ActionResponse::ActionNotUnlocked;
            }
            if action.effective_cp_cost(self) > self.state.cp {
                return ActionResponse::NotEnoughCP;
            }
            return ActionResponse::CannotUseAction;
        }

        for part in action.components() {
            self.use_action(*part);
            if matches!(
                self.completion_state(),
                CompletionState::ProgressComplete | CompletionState::NoMoreDurability
            ) {
                break;
            }
        }

        match self.completion_state() {
            CompletionState::ProgressComplete => ActionResponse::ProgressComplete,
            CompletionState::NoMoreDurability => ActionResponse::NoMoreDurability,
            _ => ActionResponse::UsedAction,
        }
    }

    pub fn add_effect(&mut self, effect: EffectType, duration: u8, increases_step_count: bool) {
        let mut duration = duration;
        if !effect.is_permanent() {
            if self.state.condition == Condition::Primed {
                duration += 2;
            }
            // offsets the decrement at the end of this step
            if increases_step_count {
                duration += 1;
            }
        }
        self.state.effects.set_duration(effect, duration);
    }

    pub fn step_condition(&mut self) {
        self.state.condition = self
            .roller
            .next_condition(self.input, self.state.condition);
    }

    pub fn calculate_success_rate(&self, rate: u32) -> u32 {
        let rate = if self.state.condition == Condition::Centered {
            rate + 25
        } else {
            rate
        };
        rate.min(100)
    }

    pub fn calculate_durability_cost(&self, amount: u32) -> u32 {
        let mut divisor = 1;
        if self.state.effects.has_waste_not() {
            divisor *= 2;
        }
        if self.state.condition == Condition::Sturdy {
            divisor *= 2;
        }
        amount.div_ceil(divisor)
    }

    pub fn calculate_cp_cost(&self, amount: u32) -> u32 {
        if self.state.condition == Condition::Pliant {
            amount.div_ceil(2)
        } else {
            amount
        }
    }

    pub fn calculate_progress_gain(&self, efficiency: u32) -> u32 {
        let effects = &self.state.effects;
        let mut buff = 100;
        if effects.has(EffectType::MuscleMemory) {
            buff += 100;
        }
        if effects.has(EffectType::Veneration) {
            buff += 50;
        }
        let gain = self.input.base_progress_gain as u64
            * efficiency as u64
            * self.state.condition.progress_percent()
            * buff
            / 1_000_000;
        gain as u32
    }

    pub fn calculate_quality_gain(&self, efficiency: u32) -> u32 {
        let effects = &self.state.effects;
        let mut buff = 100;
        if effects.has(EffectType::GreatStrides) {
            buff += 100;
        }
        if effects.has(EffectType::Innovation) {
            buff += 50;
        }
        let inner_quiet = 100 + 10 * effects.strength(EffectType::InnerQuiet) as u64;
        let condition = self
            .state
            .condition
            .quality_percent(self.input.stats.has_splendorous_buff);
        let gain = self.input.base_quality_gain as u64
            * efficiency as u64
            * condition
            * buff
            * inner_quiet
            / 100_000_000;
        gain as u32
    }

    pub(crate) fn increase_progress(&mut self, efficiency: u32) {
        let gain = self.calculate_progress_gain(efficiency);
        self.state.effects.remove(EffectType::MuscleMemory);
        self.increase_progress_raw(gain);
    }

    pub(crate) fn increase_quality(&mut self, efficiency: u32) {
        let gain = self.calculate_quality_gain(efficiency);
        self.state.effects.remove(EffectType::GreatStrides);
        self.increase_quality_raw(gain);
    }

    pub(crate) fn increase_progress_raw(&mut self, gain: u32) {
        let max = self.input.recipe.max_progress;
        self.state.progress += gain;
        if self.state.effects.has(EffectType::FinalAppraisal) && self.state.progress >= max {
            self.state.progress = max - 1;
            self.state.effects.remove(EffectType::FinalAppraisal);
        }
    }

    pub(crate) fn increase_quality_raw(&mut self, gain: u32) {
        self.state.quality += gain;
        if self.input.stats.level >= 11 {
            self.state.effects.strengthen(EffectType::InnerQuiet);
        }
    }

    pub(crate) fn reduce_cp(&mut self, amount: u32) {
        self.state.cp = self.state.cp.saturating_sub(amount);
    }

    pub(crate) fn reduce_durability(&mut self, amount: u32) {
        self.state.durability = self.state.durability.saturating_sub(amount);
    }

    pub(crate) fn restore_durability(&mut self, amount: u32) {
        self.state.durability =
            (self.state.durability + amount).min(self.input.recipe.max_durability);
    }

    pub(crate) fn restore_cp(&mut self, amount: u32) {
        self.state.cp = (self.state.cp + amount).min(self.input.stats.cp);
    }
}
