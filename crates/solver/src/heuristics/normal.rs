use super::at_max_quality;
use craftplan_core::{ActionType, Simulator};

pub(super) const ACCEPTED: &[ActionType] = &[
    ActionType::StandardTouchCombo,
    ActionType::AdvancedTouchCombo,
    ActionType::ObservedAdvancedTouchCombo,
    ActionType::RefinedTouchCombo,
    ActionType::TrainedFinesse,
    ActionType::PrudentSynthesis,
    ActionType::Groundwork,
    ActionType::AdvancedTouch,
    ActionType::CarefulSynthesis,
    ActionType::TrainedEye,
    ActionType::DelicateSynthesis,
    ActionType::PreparatoryTouch,
    ActionType::Reflect,
    ActionType::PrudentTouch,
    ActionType::Manipulation,
    ActionType::MuscleMemory,
    ActionType::ByregotsBlessing,
    ActionType::WasteNot2,
    ActionType::BasicSynthesis,
    ActionType::Innovation,
    ActionType::GreatStrides,
    ActionType::StandardTouch,
    ActionType::RefinedTouch,
    ActionType::Veneration,
    ActionType::WasteNot,
    ActionType::Observe,
    ActionType::MastersMend,
    ActionType::ImmaculateMend,
    ActionType::TrainedPerfection,
    ActionType::BasicTouch,
];

pub(super) fn should_use(sim: &Simulator<'_>, action: ActionType) -> bool {
    if sim.calculate_success_rate(action.success_rate(sim)) != 100 {
        return false;
    }
    if at_max_quality(sim) && action.base().increases_quality {
        return false;
    }
    !(action == ActionType::Observe && sim.state().action_states.observed)
}
