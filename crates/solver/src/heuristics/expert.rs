//! Phase filters for expert recipes, where conditions drive the rotation.

use super::{
    at_max_quality, durability_cost, inner_quiet_full, missing_durability, would_finish,
    HeuristicType,
};
use crate::{ActionPool, ActionSet};
use craftplan_core::{ActionType, ComboStage, Condition, EffectType, Simulator};

pub(super) const OPENER: &[ActionType] = &[
    ActionType::CarefulObservation,
    ActionType::FinalAppraisal,
    ActionType::Manipulation,
    ActionType::MuscleMemory,
    ActionType::PreciseTouch,
    ActionType::RapidSynthesis,
    ActionType::IntensiveSynthesis,
    ActionType::TricksOfTheTrade,
    ActionType::Veneration,
    ActionType::HeartAndSoul,
];

pub(super) const QUALITY: &[ActionType] = &[
    ActionType::CarefulObservation,
    ActionType::Manipulation,
    ActionType::Innovation,
    ActionType::QuickInnovation,
    ActionType::GreatStrides,
    ActionType::PreciseTouch,
    ActionType::PreparatoryTouch,
    ActionType::PrudentTouch,
    ActionType::BasicTouch,
    ActionType::StandardTouch,
    ActionType::AdvancedTouch,
    ActionType::RefinedTouch,
    ActionType::HastyTouch,
    ActionType::DaringTouch,
    ActionType::TricksOfTheTrade,
    ActionType::WasteNot,
    ActionType::WasteNot2,
    ActionType::MastersMend,
    ActionType::ImmaculateMend,
    ActionType::TrainedPerfection,
    ActionType::HeartAndSoul,
];

pub(super) const FINISHER: &[ActionType] = &[
    ActionType::CarefulObservation,
    ActionType::ByregotsBlessing,
    ActionType::TrainedFinesse,
    ActionType::GreatStrides,
    ActionType::Innovation,
    ActionType::Veneration,
    ActionType::Manipulation,
    ActionType::FinalAppraisal,
    ActionType::TricksOfTheTrade,
    ActionType::IntensiveSynthesis,
    ActionType::RapidSynthesis,
    ActionType::CarefulSynthesis,
    ActionType::PrudentSynthesis,
    ActionType::BasicSynthesis,
    ActionType::MastersMend,
    ActionType::ImmaculateMend,
    ActionType::HeartAndSoul,
];

const MASTERS_MEND_MIN_MISSING: u32 = 30;

/// Which phase filter fits the current state.
pub(super) fn phase(sim: &Simulator<'_>) -> HeuristicType {
    let input = sim.input();
    let state = sim.state();
    let max_quality = input.max_quality() as f32;
    if inner_quiet_full(sim) || state.quality as f32 > max_quality * 0.8 {
        return HeuristicType::ExpertFinisher;
    }
    let progress_target = input.max_progress() as f32 - input.base_progress_gain as f32 * 2.5;
    if state.progress as f32 > progress_target || state.quality as f32 > max_quality * 0.2 {
        return HeuristicType::ExpertQuality;
    }
    HeuristicType::ExpertOpener
}

/// The current phase's filter, or a later phase's while it offers nothing.
pub(super) fn hydra(sim: &Simulator<'_>, pool: &ActionPool) -> ActionSet {
    const PHASES: [HeuristicType; 3] = [
        HeuristicType::ExpertOpener,
        HeuristicType::ExpertQuality,
        HeuristicType::ExpertFinisher,
    ];
    let current = phase(sim);
    let start = PHASES
        .iter()
        .position(|heuristic| *heuristic == current)
        .unwrap_or(0);
    for heuristic in &PHASES[start..] {
        let set = heuristic.available_actions(sim, pool);
        if !set.is_empty() {
            return set;
        }
    }
    ActionSet::new()
}

pub(super) fn opener_should_use(sim: &Simulator<'_>, action: ActionType) -> bool {
    let state = sim.state();
    let effects = &state.effects;
    let base = action.base();

    if base.increases_step_count && state.is_first_step() && action != ActionType::MuscleMemory {
        return false;
    }
    // wait for a Malleable or Sturdy opener while observations remain
    if state.is_first_step()
        && action == ActionType::MuscleMemory
        && !matches!(state.condition, Condition::Malleable | Condition::Sturdy)
        && ActionType::CarefulObservation.can_use(sim)
    {
        return false;
    }
    // Final Appraisal holds progress below max
    if base.increases_progress
        && !effects.has(EffectType::FinalAppraisal)
        && would_finish(sim, action)
    {
        return false;
    }

    if action == ActionType::FinalAppraisal {
        return !effects.has(EffectType::FinalAppraisal)
            && would_finish(sim, ActionType::RapidSynthesis);
    }
    if action == ActionType::Manipulation && effects.duration(EffectType::Manipulation) > 1 {
        return false;
    }
    if action == ActionType::Veneration && effects.duration(EffectType::Veneration) > 1 {
        return false;
    }

    match state.condition {
        Condition::Normal | Condition::Centered | Condition::Sturdy | Condition::GoodOmen => {
            matches!(
                action,
                ActionType::RapidSynthesis | ActionType::Veneration | ActionType::CarefulObservation
            ) || (action == ActionType::MuscleMemory && state.is_first_step())
                || (action == ActionType::Manipulation && !effects.has(EffectType::MuscleMemory))
        }
        Condition::Malleable => matches!(
            action,
            ActionType::RapidSynthesis | ActionType::MuscleMemory | ActionType::IntensiveSynthesis
        ),
        Condition::Primed | Condition::Pliant => matches!(
            action,
            ActionType::RapidSynthesis | ActionType::Manipulation | ActionType::Veneration
        ),
        Condition::Good => matches!(
            action,
            ActionType::RapidSynthesis
                | ActionType::IntensiveSynthesis
                | ActionType::TricksOfTheTrade
                | ActionType::PreciseTouch
        ),
        _ => true,
    }
}

pub(super) fn quality_should_use(sim: &Simulator<'_>, action: ActionType) -> bool {
    let state = sim.state();
    let effects = &state.effects;
    let base = action.base();

    if base.increases_quality {
        if at_max_quality(sim) || durability_cost(sim, action) >= state.durability {
            return false;
        }
        if state.condition == Condition::Poor && action != ActionType::HastyTouch {
            return false;
        }
    }

    let allowed = match action {
        ActionType::Manipulation => effects.duration(EffectType::Manipulation) <= 1,
        ActionType::Innovation => effects.duration(EffectType::Innovation) <= 1,
        ActionType::QuickInnovation => effects.strength(EffectType::InnerQuiet) >= 6,
        ActionType::GreatStrides => !effects.has(EffectType::GreatStrides),
        ActionType::WasteNot | ActionType::WasteNot2 => !effects.has_waste_not(),
        ActionType::TrainedPerfection => !effects.has_waste_not(),
        ActionType::MastersMend => missing_durability(sim) >= MASTERS_MEND_MIN_MISSING,
        ActionType::ImmaculateMend => missing_durability(sim) >= sim.input().max_durability() / 2,
        ActionType::RefinedTouch => state.action_states.combo == ComboStage::BasicTouch,
        ActionType::HeartAndSoul => {
            !matches!(state.condition, Condition::Good | Condition::Excellent)
        }
        _ => true,
    };
    if !allowed {
        return false;
    }

    match state.condition {
        Condition::Good => base.increases_quality || action == ActionType::TricksOfTheTrade,
        Condition::Excellent => base.increases_quality,
        Condition::Pliant => !base.increases_quality || action == ActionType::PreparatoryTouch,
        _ => true,
    }
}

pub(super) fn finisher_should_use(sim: &Simulator<'_>, action: ActionType) -> bool {
    let state = sim.state();
    let effects = &state.effects;
    let base = action.base();
    let quality_done = at_max_quality(sim) || !effects.has(EffectType::InnerQuiet);

    if base.increases_quality && durability_cost(sim, action) >= state.durability {
        return false;
    }
    // spend Inner Quiet before the craft can finish
    if base.increases_progress
        && would_finish(sim, action)
        && !quality_done
        && effects.strength(EffectType::InnerQuiet) > 1
        && ActionType::ByregotsBlessing.can_use(sim)
    {
        return false;
    }

    let allowed = match action {
        ActionType::ByregotsBlessing => effects.strength(EffectType::InnerQuiet) > 1,
        ActionType::GreatStrides => !quality_done && !effects.has(EffectType::GreatStrides),
        ActionType::Innovation => !quality_done && effects.duration(EffectType::Innovation) <= 1,
        ActionType::Veneration => quality_done && effects.duration(EffectType::Veneration) <= 1,
        ActionType::Manipulation => effects.duration(EffectType::Manipulation) <= 1,
        ActionType::FinalAppraisal => {
            !quality_done
                && !effects.has(EffectType::FinalAppraisal)
                && would_finish(sim, ActionType::RapidSynthesis)
        }
        ActionType::MastersMend => missing_durability(sim) >= MASTERS_MEND_MIN_MISSING,
        ActionType::ImmaculateMend => missing_durability(sim) >= sim.input().max_durability() / 2,
        _ => true,
    };
    if !allowed {
        return false;
    }

    match state.condition {
        Condition::Excellent if !quality_done => base.increases_quality,
        Condition::Poor => !base.increases_quality,
        _ => true,
    }
}
