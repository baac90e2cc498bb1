use super::ActionType;
use crate::{Condition, EffectType, Simulator};

impl Simulator<'_> {
    /// Runs one primitive action whose legality has already been checked.
    pub(crate) fn use_action(&mut self, action: ActionType) {
        let base = action.base();
        let cp_cost = self.calculate_cp_cost(action.cp_cost(self));
        let efficiency = action.efficiency(self);
        let success_rate = self.calculate_success_rate(action.success_rate(self));

        self.reduce_cp(cp_cost);
        if base.durability_cost > 0 {
            if self.state.effects.trained_perfection {
                self.state.effects.remove(EffectType::TrainedPerfection);
            } else {
                let cost = self.calculate_durability_cost(base.durability_cost);
                self.reduce_durability(cost);
            }
        }
        if base.increases_step_count
            && self.state.durability > 0
            && self.state.effects.has(EffectType::Manipulation)
        {
            self.restore_durability(5);
        }

        if self.roller.roll_success(success_rate) {
            self.use_success(action, efficiency);
        }

        if base.increases_step_count {
            self.state.step_count += 1;
            self.step_condition();
            self.state.effects.decrement_duration();
        }
        self.state.action_states.mutate(action);
        self.state.action_count += 1;
    }

    fn use_success(&mut self, action: ActionType, efficiency: u32) {
        let base = action.base();
        if let Some((effect, duration)) = base.buff {
            match action {
                ActionType::WasteNot => self.state.effects.remove(EffectType::WasteNot2),
                ActionType::WasteNot2 => self.state.effects.remove(EffectType::WasteNot),
                _ => {}
            }
            self.add_effect(effect, duration, base.increases_step_count);
            return;
        }

        match action {
            ActionType::TrainedEye => {
                let missing = self
                    .input
                    .recipe
                    .max_quality
                    .saturating_sub(self.state.quality);
                self.increase_quality_raw(missing);
                return;
            }
            ActionType::MastersMend => self.restore_durability(30),
            ActionType::ImmaculateMend => {
                self.state.durability = self.input.recipe.max_durability;
            }
            ActionType::TricksOfTheTrade => self.restore_cp(20),
            ActionType::CarefulObservation => self.step_condition(),
            _ => {}
        }

        if efficiency != 0 {
            if base.increases_progress {
                self.increase_progress(efficiency);
            }
            if base.increases_quality {
                self.increase_quality(efficiency);
            }
        }

        match action {
            ActionType::ByregotsBlessing => self.state.effects.remove(EffectType::InnerQuiet),
            ActionType::MuscleMemory => self.add_effect(EffectType::MuscleMemory, 5, true),
            ActionType::Reflect | ActionType::PreparatoryTouch => {
                self.state.effects.strengthen(EffectType::InnerQuiet);
            }
            ActionType::RefinedTouch
                if self.state.action_states.combo == crate::ComboStage::BasicTouch =>
            {
                self.state.effects.strengthen(EffectType::InnerQuiet);
            }
            ActionType::HastyTouch if self.input.stats.level >= 96 => {
                self.add_effect(EffectType::Expedience, 1, true);
            }
            _ => {}
        }

        if matches!(
            action,
            ActionType::IntensiveSynthesis | ActionType::PreciseTouch | ActionType::TricksOfTheTrade
        ) {
            if action == ActionType::PreciseTouch {
                self.state.effects.strengthen(EffectType::InnerQuiet);
            }
            if !matches!(self.state.condition, Condition::Good | Condition::Excellent) {
                self.state.effects.remove(EffectType::HeartAndSoul);
            }
        }
    }
}
