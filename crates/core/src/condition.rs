use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Condition {
    #[default]
    Normal,
    Good,
    Excellent,
    Poor,
    Centered,
    Sturdy,
    Pliant,
    Malleable,
    Primed,
    GoodOmen,
    Robust,
}

impl Condition {
    pub const ALL: [Condition; 11] = [
        Condition::Normal,
        Condition::Good,
        Condition::Excellent,
        Condition::Poor,
        Condition::Centered,
        Condition::Sturdy,
        Condition::Pliant,
        Condition::Malleable,
        Condition::Primed,
        Condition::GoodOmen,
        Condition::Robust,
    ];

    pub fn bit(self) -> u16 {
        1 << self as u16
    }

    /// Conditions whose successor is not rolled.
    pub fn fixed_successor(self) -> Option<Condition> {
        match self {
            Condition::Poor | Condition::Good => Some(Condition::Normal),
            Condition::Excellent => Some(Condition::Poor),
            Condition::GoodOmen => Some(Condition::Good),
            _ => None,
        }
    }

    /// Probability of rolling into this condition when the recipe allows it.
    pub fn base_chance(self, expert: bool, level: u32) -> f32 {
        match self {
            Condition::Good if expert => 0.12,
            Condition::Good if level >= 63 => 0.15,
            Condition::Good => 0.18,
            Condition::Excellent => 0.04,
            Condition::Centered | Condition::Sturdy | Condition::Primed => 0.15,
            Condition::Pliant => 0.10,
            Condition::Malleable => 0.13,
            Condition::GoodOmen => 0.12,
            _ => 0.0,
        }
    }

    /// Quality multiplier in percent.
    pub fn quality_percent(self, splendorous: bool) -> u64 {
        match self {
            Condition::Poor => 50,
            Condition::Good if splendorous => 175,
            Condition::Good => 150,
            Condition::Excellent => 400,
            _ => 100,
        }
    }

    /// Progress multiplier in percent.
    pub fn progress_percent(self) -> u64 {
        match self {
            Condition::Malleable => 150,
            _ => 100,
        }
    }
}

/// Bitmask of conditions a recipe can roll, indexed by `Condition as u16`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ConditionMask(pub u16);

impl ConditionMask {
    pub const NORMAL: ConditionMask = ConditionMask(0b1111);

    pub fn from_conditions(conditions: &[Condition]) -> Self {
        Self(conditions.iter().fold(0, |mask, c| mask | c.bit()))
    }

    pub fn contains(self, condition: Condition) -> bool {
        self.0 & condition.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Condition> {
        Condition::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl Default for ConditionMask {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_iterates_in_declaration_order() {
        let mask = ConditionMask::from_conditions(&[
            Condition::Pliant,
            Condition::Normal,
            Condition::Sturdy,
        ]);
        let listed: Vec<_> = mask.iter().collect();
        assert_eq!(
            listed,
            vec![Condition::Normal, Condition::Sturdy, Condition::Pliant]
        );
        assert!(!mask.contains(Condition::Good));
    }

    #[test]
    fn fixed_transitions() {
        assert_eq!(Condition::Excellent.fixed_successor(), Some(Condition::Poor));
        assert_eq!(Condition::GoodOmen.fixed_successor(), Some(Condition::Good));
        assert_eq!(Condition::Centered.fixed_successor(), None);
    }
}
