use super::{ActionCategory, ActionType};
use crate::EffectType;

/// Static facts about an action. Anything that depends on the craft lives in
/// the rule functions instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseAction {
    pub kind: ActionType,
    pub name: &'static str,
    pub category: ActionCategory,
    pub level: u32,
    pub action_id: u32,
    /// Seconds.
    pub macro_wait_time: u32,
    pub increases_progress: bool,
    pub increases_quality: bool,
    pub durability_cost: u32,
    pub increases_step_count: bool,
    pub cp_cost: u32,
    pub efficiency: u32,
    /// Out of 100.
    pub success_rate: u32,
    pub buff: Option<(EffectType, u8)>,
}

const fn action(
    kind: ActionType,
    name: &'static str,
    category: ActionCategory,
    level: u32,
    action_id: u32,
) -> BaseAction {
    BaseAction {
        kind,
        name,
        category,
        level,
        action_id,
        macro_wait_time: 3,
        increases_progress: false,
        increases_quality: false,
        durability_cost: 10,
        increases_step_count: true,
        cp_cost: 0,
        efficiency: 0,
        success_rate: 100,
        buff: None,
    }
}

impl BaseAction {
    const fn progress(self, efficiency: u32) -> Self {
        BaseAction {
            increases_progress: true,
            efficiency,
            ..self
        }
    }

    const fn quality(self, efficiency: u32) -> Self {
        BaseAction {
            increases_quality: true,
            efficiency,
            ..self
        }
    }

    const fn cp(self, cp_cost: u32) -> Self {
        BaseAction { cp_cost, ..self }
    }

    const fn durability(self, durability_cost: u32) -> Self {
        BaseAction {
            durability_cost,
            ..self
        }
    }

    const fn success(self, success_rate: u32) -> Self {
        BaseAction {
            success_rate,
            ..self
        }
    }

    const fn no_step(self) -> Self {
        BaseAction {
            increases_step_count: false,
            ..self
        }
    }

    const fn buff(self, effect: EffectType, duration: u8) -> Self {
        BaseAction {
            buff: Some((effect, duration)),
            durability_cost: 0,
            macro_wait_time: 2,
            ..self
        }
    }

    const fn wait(self, macro_wait_time: u32) -> Self {
        BaseAction {
            macro_wait_time,
            ..self
        }
    }

    const fn flags(self, progress: bool, quality: bool) -> Self {
        BaseAction {
            increases_progress: progress,
            increases_quality: quality,
            ..self
        }
    }
}

use super::ActionCategory as C;
use super::ActionType as A;
use crate::EffectType as E;

pub(crate) static CATALOG: [BaseAction; ActionType::COUNT] = [
    action(A::AdvancedTouch, "Advanced Touch", C::Quality, 68, 100411)
        .quality(150)
        .cp(46),
    action(A::BasicSynthesis, "Basic Synthesis", C::Synthesis, 1, 100001).progress(100),
    action(A::BasicTouch, "Basic Touch", C::Quality, 5, 100002)
        .quality(100)
        .cp(18),
    action(A::ByregotsBlessing, "Byregot's Blessing", C::Quality, 50, 100339)
        .quality(100)
        .cp(24),
    action(A::CarefulObservation, "Careful Observation", C::Other, 55, 100395)
        .durability(0)
        .no_step(),
    action(A::CarefulSynthesis, "Careful Synthesis", C::Synthesis, 62, 100203)
        .progress(150)
        .cp(7),
    action(A::DaringTouch, "Daring Touch", C::Quality, 96, 100451)
        .quality(150)
        .success(60),
    action(A::DelicateSynthesis, "Delicate Synthesis", C::Synthesis, 76, 100323)
        .progress(100)
        .quality(100)
        .cp(32),
    action(A::FinalAppraisal, "Final Appraisal", C::Synthesis, 42, 19012)
        .buff(E::FinalAppraisal, 5)
        .cp(1)
        .no_step(),
    action(A::GreatStrides, "Great Strides", C::Buffs, 21, 260)
        .buff(E::GreatStrides, 3)
        .cp(32),
    action(A::Groundwork, "Groundwork", C::Synthesis, 72, 100403)
        .progress(300)
        .cp(18)
        .durability(20),
    action(A::HastyTouch, "Hasty Touch", C::Quality, 9, 100355)
        .quality(100)
        .success(60),
    action(A::HeartAndSoul, "Heart and Soul", C::Other, 86, 100419)
        .buff(E::HeartAndSoul, 1)
        .wait(3)
        .no_step(),
    action(A::ImmaculateMend, "Immaculate Mend", C::Durability, 98, 100467)
        .cp(112)
        .durability(0),
    action(A::Innovation, "Innovation", C::Buffs, 26, 19004)
        .buff(E::Innovation, 4)
        .cp(18),
    action(A::IntensiveSynthesis, "Intensive Synthesis", C::Synthesis, 78, 100315)
        .progress(400)
        .cp(6),
    action(A::Manipulation, "Manipulation", C::Durability, 65, 4574)
        .buff(E::Manipulation, 8)
        .cp(96),
    action(A::MastersMend, "Master's Mend", C::Durability, 7, 100003)
        .cp(88)
        .durability(0),
    action(A::MuscleMemory, "Muscle Memory", C::FirstTurn, 54, 100379)
        .progress(300)
        .cp(6),
    action(A::Observe, "Observe", C::Other, 13, 100010)
        .cp(7)
        .durability(0),
    action(A::PreciseTouch, "Precise Touch", C::Quality, 53, 100128)
        .quality(150)
        .cp(18),
    action(A::PreparatoryTouch, "Preparatory Touch", C::Quality, 71, 100299)
        .quality(200)
        .cp(40)
        .durability(20),
    action(A::PrudentSynthesis, "Prudent Synthesis", C::Synthesis, 88, 100427)
        .progress(180)
        .cp(18)
        .durability(5),
    action(A::PrudentTouch, "Prudent Touch", C::Quality, 66, 100227)
        .quality(100)
        .cp(25)
        .durability(5),
    action(A::QuickInnovation, "Quick Innovation", C::Other, 96, 100459)
        .buff(E::Innovation, 1)
        .wait(3)
        .no_step(),
    action(A::RapidSynthesis, "Rapid Synthesis", C::Synthesis, 9, 100363)
        .progress(250)
        .success(50),
    action(A::RefinedTouch, "Refined Touch", C::Quality, 92, 100443)
        .quality(100)
        .cp(24),
    action(A::Reflect, "Reflect", C::FirstTurn, 69, 100387)
        .quality(300)
        .cp(6),
    action(A::StandardTouch, "Standard Touch", C::Quality, 18, 100004)
        .quality(125)
        .cp(32),
    action(A::TrainedEye, "Trained Eye", C::FirstTurn, 80, 100283)
        .flags(false, true)
        .cp(250),
    action(A::TrainedFinesse, "Trained Finesse", C::Quality, 90, 100435)
        .quality(100)
        .cp(32)
        .durability(0),
    action(A::TrainedPerfection, "Trained Perfection", C::Durability, 100, 100475)
        .buff(E::TrainedPerfection, 1),
    action(A::TricksOfTheTrade, "Tricks of the Trade", C::Other, 13, 100371).durability(0),
    action(A::Veneration, "Veneration", C::Buffs, 15, 19297)
        .buff(E::Veneration, 4)
        .cp(18),
    action(A::WasteNot, "Waste Not", C::Durability, 15, 4631)
        .buff(E::WasteNot, 4)
        .cp(56),
    action(A::WasteNot2, "Waste Not II", C::Durability, 47, 4639)
        .buff(E::WasteNot2, 8)
        .cp(98),
    action(A::StandardTouchCombo, "Standard Touch Combo", C::Combo, 18, 100004)
        .flags(false, true)
        .cp(36),
    action(A::AdvancedTouchCombo, "Advanced Touch Combo", C::Combo, 68, 100411)
        .flags(false, true)
        .cp(54),
    action(A::ObservedAdvancedTouchCombo, "Observed Advanced Touch Combo", C::Combo, 68, 100411)
        .flags(false, true)
        .cp(25),
    action(A::RefinedTouchCombo, "Refined Touch Combo", C::Combo, 92, 100443)
        .flags(false, true)
        .cp(42),
];
