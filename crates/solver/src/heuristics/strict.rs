use super::{durability_cost, missing_durability, normal, would_finish};
use craftplan_core::{ActionCategory, ActionType, ComboStage, EffectType, Simulator};

/// Recipes at or above this level get the tighter opener rules.
const DIFFICULT_RECIPE_LEVEL: u32 = 90;
/// Cheapest follow-up after Observe.
const OBSERVE_FOLLOW_UP_CP: u32 = 12;
const MASTERS_MEND_MIN_MISSING: u32 = 25;
const IMMACULATE_MEND_MIN_MISSING: u32 = 45;

pub(super) fn should_use(sim: &Simulator<'_>, action: ActionType) -> bool {
    if !normal::should_use(sim, action) {
        return false;
    }

    if action == ActionType::TrainedEye {
        return sim.can_use(action);
    }

    let input = sim.input();
    let state = sim.state();
    let effects = &state.effects;
    let base = action.base();
    let difficult = input.recipe.class_job_level >= DIFFICULT_RECIPE_LEVEL;

    if state.action_states.observed && action != ActionType::AdvancedTouch {
        return false;
    }
    if difficult && effects.has(EffectType::MuscleMemory) && base.increases_quality {
        return false;
    }
    if state.is_first_step()
        && difficult
        && base.category != ActionCategory::FirstTurn
        && state.cp > 10
    {
        return false;
    }
    if state.action_states.combo != ComboStage::None
        && matches!(
            action,
            ActionType::StandardTouchCombo
                | ActionType::AdvancedTouchCombo
                | ActionType::RefinedTouchCombo
        )
    {
        return false;
    }
    if action == ActionType::RefinedTouch && state.action_states.combo != ComboStage::BasicTouch {
        return false;
    }
    if effects.has(EffectType::Veneration) && !base.increases_progress && base.increases_quality {
        return false;
    }
    if base.increases_quality && durability_cost(sim, action) > state.durability {
        return false;
    }

    if base.increases_progress {
        if would_finish(sim, action) {
            if state.quality < input.max_quality() / 5 {
                return false;
            }
        } else if effects.has(EffectType::Innovation) && !base.increases_quality {
            return false;
        }
    }

    match action {
        ActionType::ByregotsBlessing => effects.strength(EffectType::InnerQuiet) > 1,
        ActionType::WasteNot | ActionType::WasteNot2 => !effects.has_waste_not(),
        ActionType::Observe => state.cp >= OBSERVE_FOLLOW_UP_CP,
        ActionType::MastersMend => missing_durability(sim) >= MASTERS_MEND_MIN_MISSING,
        ActionType::ImmaculateMend => missing_durability(sim) >= IMMACULATE_MEND_MIN_MISSING,
        ActionType::Manipulation => !effects.has(EffectType::Manipulation),
        ActionType::GreatStrides => !effects.has(EffectType::GreatStrides),
        ActionType::Veneration | ActionType::Innovation => {
            effects.duration(EffectType::Veneration) <= 1
                && effects.duration(EffectType::Innovation) <= 1
        }
        ActionType::TrainedPerfection => !effects.has_waste_not(),
        _ => true,
    }
}
