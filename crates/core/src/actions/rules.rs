use super::{combo, ActionType};
use crate::{ComboStage, Condition, EffectType, Simulator, MAX_INNER_QUIET};

const MAX_CAREFUL_OBSERVATIONS: u8 = 3;

impl ActionType {
    /// CP cost before condition modifiers.
    pub fn cp_cost(self, s: &Simulator<'_>) -> u32 {
        let state = s.state();
        match self {
            ActionType::StandardTouch if state.action_states.combo == ComboStage::BasicTouch => 18,
            ActionType::AdvancedTouch
                if state.action_states.combo == ComboStage::StandardTouch
                    || state.action_states.observed =>
            {
                18
            }
            _ if self.is_combo() => combo::cp_cost(self, s),
            _ => self.base().cp_cost,
        }
    }

    /// CP actually charged under the current condition. Combos only discount
    /// their first step.
    pub fn effective_cp_cost(self, s: &Simulator<'_>) -> u32 {
        if self.is_combo() {
            combo::effective_cp_cost(self, s)
        } else {
            s.calculate_cp_cost(self.cp_cost(s))
        }
    }

    pub fn efficiency(self, s: &Simulator<'_>) -> u32 {
        let level = s.input().stats.level;
        match self {
            ActionType::BasicSynthesis if level >= 31 => 120,
            ActionType::RapidSynthesis if level >= 63 => 500,
            ActionType::CarefulSynthesis if level >= 82 => 180,
            ActionType::DelicateSynthesis if level >= 94 => 150,
            ActionType::Groundwork => {
                let eff = if level >= 86 { 360 } else { 300 };
                let cost = s.calculate_durability_cost(self.base().durability_cost);
                if s.state().durability < cost {
                    eff / 2
                } else {
                    eff
                }
            }
            ActionType::ByregotsBlessing => {
                100 + 20 * s.state().effects.strength(EffectType::InnerQuiet) as u32
            }
            _ => self.base().efficiency,
        }
    }

    /// Success rate out of 100 before condition modifiers.
    pub fn success_rate(self, _s: &Simulator<'_>) -> u32 {
        self.base().success_rate
    }

    /// Whether the action can appear at any point of this craft from here on.
    pub fn is_possible(self, s: &Simulator<'_>) -> bool {
        let input = s.input();
        let state = s.state();
        let states = &state.action_states;
        if self.is_combo() {
            return self.components().iter().all(|part| part.is_possible(s));
        }
        if input.stats.level < self.level() {
            return false;
        }
        match self {
            ActionType::Manipulation => input.stats.can_use_manipulation,
            ActionType::MuscleMemory | ActionType::Reflect => state.is_first_step(),
            ActionType::TrainedEye => {
                state.is_first_step()
                    && !input.recipe.is_expert
                    && input.stats.level >= input.recipe.class_job_level + 10
            }
            ActionType::CarefulObservation => {
                input.stats.is_specialist
                    && states.careful_observation_count < MAX_CAREFUL_OBSERVATIONS
            }
            ActionType::HeartAndSoul => input.stats.is_specialist && !states.used_heart_and_soul,
            ActionType::QuickInnovation => {
                input.stats.is_specialist && !states.used_quick_innovation
            }
            ActionType::TrainedPerfection => !states.used_trained_perfection,
            _ => true,
        }
    }

    /// Whether the action is usable right now, assuming it is possible.
    pub fn could_use(self, s: &Simulator<'_>) -> bool {
        if self.is_combo() {
            return combo::could_use(self, s);
        }
        let state = s.state();
        let effects = &state.effects;
        let gated = match self {
            ActionType::ByregotsBlessing => effects.has(EffectType::InnerQuiet),
            ActionType::IntensiveSynthesis
            | ActionType::PreciseTouch
            | ActionType::TricksOfTheTrade => {
                matches!(state.condition, Condition::Good | Condition::Excellent)
                    || effects.has(EffectType::HeartAndSoul)
            }
            ActionType::PrudentSynthesis | ActionType::PrudentTouch => !effects.has_waste_not(),
            ActionType::TrainedFinesse => {
                effects.strength(EffectType::InnerQuiet) == MAX_INNER_QUIET
            }
            ActionType::DaringTouch => effects.has(EffectType::Expedience),
            ActionType::QuickInnovation => !effects.has(EffectType::Innovation),
            ActionType::MuscleMemory | ActionType::Reflect | ActionType::TrainedEye => {
                state.is_first_step()
            }
            _ => true,
        };
        gated && state.cp >= self.effective_cp_cost(s)
    }

    pub fn can_use(self, s: &Simulator<'_>) -> bool {
        self.is_possible(s) && self.could_use(s)
    }

    /// Level or trait gate failed, as opposed to a situational one.
    pub fn is_locked(self, s: &Simulator<'_>) -> bool {
        let stats = &s.input().stats;
        (self == ActionType::Manipulation && !stats.can_use_manipulation)
            || self
                .components()
                .iter()
                .any(|part| stats.level < part.level())
    }
}
