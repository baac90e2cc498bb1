use crate::bits::nth_bit_set;
use craftplan_core::ActionType;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The actions a search may pick from, with a stable action to bit index
/// mapping. Indices follow catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<ActionType>", into = "Vec<ActionType>")]
pub struct ActionPool {
    mask: u64,
}

const AUTOMATABLE: &[ActionType] = &[
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
    ActionType::MastersMend,
    ActionType::ImmaculateMend,
    ActionType::TrainedPerfection,
    ActionType::BasicTouch,
];

/// Random-success, condition-bound and specialist actions.
const EXPERT_EXTRAS: &[ActionType] = &[
    ActionType::Observe,
    ActionType::RapidSynthesis,
    ActionType::CarefulObservation,
    ActionType::HeartAndSoul,
    ActionType::FinalAppraisal,
    ActionType::TricksOfTheTrade,
    ActionType::PreciseTouch,
    ActionType::IntensiveSynthesis,
    ActionType::HastyTouch,
    ActionType::DaringTouch,
    ActionType::QuickInnovation,
];

impl ActionPool {
    pub fn new(actions: &[ActionType]) -> Self {
        let mask = actions
            .iter()
            .fold(0u64, |mask, action| mask | (1u64 << action.index()));
        Self { mask }
    }

    /// Default pool plus the actions only worth considering on expert recipes.
    pub fn expert() -> Self {
        let mut pool = Self::default();
        for action in EXPERT_EXTRAS {
            pool.mask |= 1u64 << action.index();
        }
        pool
    }

    pub fn contains(&self, action: ActionType) -> bool {
        self.mask & (1u64 << action.index()) != 0
    }

    /// Bit index of `action`, or `None` if the pool does not accept it.
    pub fn from_action(&self, action: ActionType) -> Option<u32> {
        if !self.contains(action) {
            return None;
        }
        let below = (1u64 << action.index()) - 1;
        Some((self.mask & below).count_ones())
    }

    pub fn to_action(&self, index: u32) -> Option<ActionType> {
        match nth_bit_set(self.mask, index) {
            64 => None,
            bit => ActionType::from_index(bit as usize),
        }
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn actions(&self) -> impl Iterator<Item = ActionType> + '_ {
        ActionType::ALL
            .iter()
            .copied()
            .filter(move |action| self.contains(*action))
    }
}

impl Default for ActionPool {
    fn default() -> Self {
        Self::new(AUTOMATABLE)
    }
}

impl From<Vec<ActionType>> for ActionPool {
    fn from(actions: Vec<ActionType>) -> Self {
        Self::new(&actions)
    }
}

impl From<ActionPool> for Vec<ActionType> {
    fn from(pool: ActionPool) -> Self {
        pool.actions().collect()
    }
}

/// Bitmask over the indices of an [`ActionPool`]. Every operation takes the
/// pool the set was built against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActionSet {
    bits: u64,
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn bit(pool: &ActionPool, action: ActionType) -> Option<u64> {
        pool.from_action(action).map(|index| 1u64 << index)
    }

    /// Returns whether the set changed. Actions outside the pool are ignored.
    pub fn insert(&mut self, pool: &ActionPool, action: ActionType) -> bool {
        let Some(bit) = Self::bit(pool, action) else {
            return false;
        };
        let changed = self.bits & bit == 0;
        self.bits |= bit;
        changed
    }

    pub fn remove(&mut self, pool: &ActionPool, action: ActionType) -> bool {
        let Some(bit) = Self::bit(pool, action) else {
            return false;
        };
        let changed = self.bits & bit != 0;
        self.bits &= !bit;
        changed
    }

    pub fn contains(&self, pool: &ActionPool, action: ActionType) -> bool {
        Self::bit(pool, action).is_some_and(|bit| self.bits & bit != 0)
    }

    pub fn count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// The `index`-th member in catalog order.
    pub fn element_at(&self, pool: &ActionPool, index: usize) -> Option<ActionType> {
        match nth_bit_set(self.bits, index as u32) {
            64 => None,
            bit => pool.to_action(bit),
        }
    }

    pub fn select_random<R: Rng + ?Sized>(
        &self,
        pool: &ActionPool,
        rng: &mut R,
    ) -> Option<ActionType> {
        if self.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.count());
        self.element_at(pool, index)
    }

    pub fn pop_random<R: Rng + ?Sized>(
        &mut self,
        pool: &ActionPool,
        rng: &mut R,
    ) -> Option<ActionType> {
        let action = self.select_random(pool, rng)?;
        self.remove(pool, action);
        Some(action)
    }

    pub fn iter<'a>(&self, pool: &'a ActionPool) -> impl Iterator<Item = ActionType> + 'a {
        let set = *self;
        (0..set.count()).filter_map(move |index| set.element_at(pool, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_indices_follow_catalog_order() {
        let pool = ActionPool::new(&[
            ActionType::WasteNot,
            ActionType::BasicSynthesis,
            ActionType::AdvancedTouch,
        ]);
        assert_eq!(pool.from_action(ActionType::AdvancedTouch), Some(0));
        assert_eq!(pool.from_action(ActionType::BasicSynthesis), Some(1));
        assert_eq!(pool.from_action(ActionType::WasteNot), Some(2));
        assert_eq!(pool.from_action(ActionType::Observe), None);
        assert_eq!(pool.to_action(2), Some(ActionType::WasteNot));
        assert_eq!(pool.to_action(3), None);
    }

    #[test]
    fn expert_pool_extends_default() {
        let default = ActionPool::default();
        let expert = ActionPool::expert();
        assert!(default.actions().all(|action| expert.contains(action)));
        assert!(!default.contains(ActionType::RapidSynthesis));
        assert!(expert.contains(ActionType::RapidSynthesis));
        assert!(!default.contains(ActionType::Observe));
    }
}
