use craftplan_core::{ActionType, SimulationState};
use serde::{Deserialize, Serialize};

/// A rotation and the state it ends in. Combos are always expanded into
/// their primitive actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverSolution {
    actions: Vec<ActionType>,
    state: SimulationState,
}

impl SolverSolution {
    pub fn new<I>(actions: I, state: SimulationState) -> Self
    where
        I: IntoIterator<Item = ActionType>,
    {
        Self {
            actions: sanitize_combos(actions),
            state,
        }
    }

    pub fn actions(&self) -> &[ActionType] {
        &self.actions
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn into_parts(self) -> (Vec<ActionType>, SimulationState) {
        (self.actions, self.state)
    }
}

pub fn sanitize_combos<I>(actions: I) -> Vec<ActionType>
where
    I: IntoIterator<Item = ActionType>,
{
    actions
        .into_iter()
        .flat_map(|action| action.components().iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combos_are_flattened_in_order() {
        let actions = sanitize_combos([
            ActionType::Reflect,
            ActionType::AdvancedTouchCombo,
            ActionType::ObservedAdvancedTouchCombo,
        ]);
        assert_eq!(
            actions,
            vec![
                ActionType::Reflect,
                ActionType::BasicTouch,
                ActionType::StandardTouch,
                ActionType::AdvancedTouch,
                ActionType::Observe,
                ActionType::AdvancedTouch,
            ]
        );
    }
}
