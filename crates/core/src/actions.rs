use serde::{Deserialize, Serialize};

mod apply;
mod catalog;
mod combo;
mod rules;

pub use catalog::BaseAction;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    FirstTurn,
    Synthesis,
    Quality,
    Durability,
    Buffs,
    Combo,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionType {
    AdvancedTouch,
    BasicSynthesis,
    BasicTouch,
    ByregotsBlessing,
    CarefulObservation,
    CarefulSynthesis,
    DaringTouch,
    DelicateSynthesis,
    FinalAppraisal,
    GreatStrides,
    Groundwork,
    HastyTouch,
    HeartAndSoul,
    ImmaculateMend,
    Innovation,
    IntensiveSynthesis,
    Manipulation,
    MastersMend,
    MuscleMemory,
    Observe,
    PreciseTouch,
    PreparatoryTouch,
    PrudentSynthesis,
    PrudentTouch,
    QuickInnovation,
    RapidSynthesis,
    RefinedTouch,
    Reflect,
    StandardTouch,
    TrainedEye,
    TrainedFinesse,
    TrainedPerfection,
    TricksOfTheTrade,
    Veneration,
    WasteNot,
    WasteNot2,

    StandardTouchCombo,
    AdvancedTouchCombo,
    ObservedAdvancedTouchCombo,
    RefinedTouchCombo,
}

impl ActionType {
    pub const COUNT: usize = 40;

    pub const ALL: [ActionType; Self::COUNT] = [
        ActionType::AdvancedTouch,
        ActionType::BasicSynthesis,
        ActionType::BasicTouch,
        ActionType::ByregotsBlessing,
        ActionType::CarefulObservation,
        ActionType::CarefulSynthesis,
        ActionType::DaringTouch,
        ActionType::DelicateSynthesis,
        ActionType::FinalAppraisal,
        ActionType::GreatStrides,
        ActionType::Groundwork,
        ActionType::HastyTouch,
        ActionType::HeartAndSoul,
        ActionType::ImmaculateMend,
        ActionType::Innovation,
        ActionType::IntensiveSynthesis,
        ActionType::Manipulation,
        ActionType::MastersMend,
        ActionType::MuscleMemory,
        ActionType::Observe,
        ActionType::PreciseTouch,
        ActionType::PreparatoryTouch,
        ActionType::PrudentSynthesis,
        ActionType::PrudentTouch,
        ActionType::QuickInnovation,
        ActionType::RapidSynthesis,
        ActionType::RefinedTouch,
        ActionType::Reflect,
        ActionType::StandardTouch,
        ActionType::TrainedEye,
        ActionType::TrainedFinesse,
        ActionType::TrainedPerfection,
        ActionType::TricksOfTheTrade,
        ActionType::Veneration,
        ActionType::WasteNot,
        ActionType::WasteNot2,
        ActionType::StandardTouchCombo,
        ActionType::AdvancedTouchCombo,
        ActionType::ObservedAdvancedTouchCombo,
        ActionType::RefinedTouchCombo,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<ActionType> {
        Self::ALL.get(index).copied()
    }

    pub fn base(self) -> &'static BaseAction {
        &catalog::CATALOG[self.index()]
    }

    pub fn category(self) -> ActionCategory {
        self.base().category
    }

    pub fn level(self) -> u32 {
        self.base().level
    }

    pub fn is_combo(self) -> bool {
        self.category() == ActionCategory::Combo
    }

    /// Primitive actions this entry expands to, in execution order.
    pub fn components(self) -> &'static [ActionType] {
        use ActionType::*;
        match self {
            StandardTouchCombo => &[BasicTouch, StandardTouch],
            AdvancedTouchCombo => &[BasicTouch, StandardTouch, AdvancedTouch],
            ObservedAdvancedTouchCombo => &[Observe, AdvancedTouch],
            RefinedTouchCombo => &[BasicTouch, RefinedTouch],
            _ => std::slice::from_ref(&catalog::CATALOG[self.index()].kind),
        }
    }

    pub fn name(self) -> &'static str {
        self.base().name
    }

    pub fn from_name(name: &str) -> Option<ActionType> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(wanted))
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_rows_line_up_with_variants() {
        for (idx, action) in ActionType::ALL.into_iter().enumerate() {
            assert_eq!(action.index(), idx);
            assert_eq!(action.base().kind, action);
        }
    }

    #[test]
    fn combos_expand_to_primitives() {
        for action in ActionType::ALL {
            let parts = action.components();
            if action.is_combo() {
                assert!(parts.len() >= 2, "{action:?}");
                assert!(parts.iter().all(|part| !part.is_combo()));
                assert_eq!(action.level(), parts[parts.len() - 1].level());
            } else {
                assert_eq!(parts, &[action]);
            }
        }
    }

    #[test]
    fn names_round_trip() {
        for action in ActionType::ALL {
            assert_eq!(ActionType::from_name(action.name()), Some(action));
        }
        assert_eq!(ActionType::from_name("not an action"), None);
    }
}
