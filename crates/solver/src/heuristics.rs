use crate::{ActionPool, ActionSet};
use craftplan_core::{ActionType, EffectType, Simulator, MAX_INNER_QUIET};
use serde::{Deserialize, Serialize};

mod expert;
mod normal;
mod strict;

/// Pruning policy applied to the legal actions of a state, from loosest to
/// tightest. The expert variants assume a stochastic simulation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum HeuristicType {
    Normal,
    #[default]
    Strict,
    ExpertOpener,
    ExpertQuality,
    ExpertFinisher,
    ExpertHydra,
}

impl HeuristicType {
    /// Actions worth trying from the simulator's current state. Empty once
    /// the craft is complete. Actions outside `pool` are never returned.
    pub fn available_actions(self, sim: &Simulator<'_>, pool: &ActionPool) -> ActionSet {
        match self {
            HeuristicType::Normal => collect(sim, pool, normal::ACCEPTED, normal::should_use),
            HeuristicType::Strict => collect(sim, pool, normal::ACCEPTED, strict::should_use),
            HeuristicType::ExpertOpener => {
                collect(sim, pool, expert::OPENER, expert::opener_should_use)
            }
            HeuristicType::ExpertQuality => {
                collect(sim, pool, expert::QUALITY, expert::quality_should_use)
            }
            HeuristicType::ExpertFinisher => {
                collect(sim, pool, expert::FINISHER, expert::finisher_should_use)
            }
            HeuristicType::ExpertHydra => expert::hydra(sim, pool),
        }
    }
}

fn collect(
    sim: &Simulator<'_>,
    pool: &ActionPool,
    accepted: &[ActionType],
    should_use: fn(&Simulator<'_>, ActionType) -> bool,
) -> ActionSet {
    let mut set = ActionSet::new();
    if sim.is_complete() {
        return set;
    }
    for &action in accepted {
        if pool.contains(action) && should_use(sim, action) && sim.can_use(action) {
            set.insert(pool, action);
        }
    }
    set
}

fn would_finish(sim: &Simulator<'_>, action: ActionType) -> bool {
    let gain = sim.calculate_progress_gain(action.efficiency(sim));
    sim.state().progress + gain >= sim.input().max_progress()
}

fn at_max_quality(sim: &Simulator<'_>) -> bool {
    sim.state().quality >= sim.input().max_quality()
}

fn missing_durability(sim: &Simulator<'_>) -> u32 {
    sim.input()
        .max_durability()
        .saturating_sub(sim.state().durability)
}

/// Durability the action would take, or zero when Trained Perfection covers it.
fn durability_cost(sim: &Simulator<'_>, action: ActionType) -> u32 {
    if sim.state().effects.has(EffectType::TrainedPerfection) {
        return 0;
    }
    sim.calculate_durability_cost(action.base().durability_cost)
}

fn inner_quiet_full(sim: &Simulator<'_>) -> bool {
    sim.state().effects.strength(EffectType::InnerQuiet) == MAX_INNER_QUIET
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftplan_core::{CharacterStats, ConditionMask, RecipeInfo, SimulationInput};

    fn input() -> SimulationInput {
        SimulationInput::new(
            CharacterStats {
                craftsmanship: 3304,
                control: 3374,
                cp: 575,
                level: 90,
                clvl: 1,
                is_specialist: false,
                has_splendorous_buff: false,
                can_use_manipulation: true,
            },
            RecipeInfo {
                is_expert: false,
                class_job_level: 90,
                rlvl: 1,
                conditions: ConditionMask::NORMAL,
                max_durability: 80,
                max_quality: 7200,
                max_progress: 3500,
                quality_modifier: 80,
                quality_divider: 115,
                progress_modifier: 90,
                progress_divider: 130,
            },
        )
        .unwrap()
    }

    #[test]
    fn filters_return_nothing_outside_the_pool() {
        let input = input();
        let sim = Simulator::new(&input);
        let pool = ActionPool::new(&[ActionType::BasicSynthesis, ActionType::Observe]);
        let set = HeuristicType::Normal.available_actions(&sim, &pool);
        assert_eq!(
            set.iter(&pool).collect::<Vec<_>>(),
            vec![ActionType::BasicSynthesis, ActionType::Observe]
        );
    }
}
