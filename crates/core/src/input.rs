use crate::ConditionMask;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("recipe max progress must be positive")]
    ZeroProgress,
    #[error("recipe max durability must be positive")]
    ZeroDurability,
    #[error("recipe {0} divider must be positive")]
    ZeroDivider(&'static str),
    #[error("character level must be positive")]
    ZeroLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterStats {
    pub craftsmanship: u32,
    pub control: u32,
    pub cp: u32,
    pub level: u32,
    /// Crafting level (CLvl) compared against the recipe level.
    pub clvl: u32,
    pub is_specialist: bool,
    #[serde(default)]
    pub has_splendorous_buff: bool,
    #[serde(default = "default_true")]
    pub can_use_manipulation: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeInfo {
    pub is_expert: bool,
    pub class_job_level: u32,
    /// Recipe level (RLvl).
    pub rlvl: u32,
    pub conditions: ConditionMask,
    pub max_durability: u32,
    pub max_quality: u32,
    pub max_progress: u32,
    pub quality_modifier: u32,
    pub quality_divider: u32,
    pub progress_modifier: u32,
    pub progress_divider: u32,
}

/// Immutable parameters of one craft plus the gains derived from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationInput {
    pub stats: CharacterStats,
    pub recipe: RecipeInfo,
    pub seed: u64,
    pub base_progress_gain: u32,
    pub base_quality_gain: u32,
}

impl SimulationInput {
    pub fn new(stats: CharacterStats, recipe: RecipeInfo) -> Result<Self, InputError> {
        if stats.level == 0 {
            return Err(InputError::ZeroLevel);
        }
        if recipe.max_progress == 0 {
            return Err(InputError::ZeroProgress);
        }
        if recipe.max_durability == 0 {
            return Err(InputError::ZeroDurability);
        }
        if recipe.progress_divider == 0 {
            return Err(InputError::ZeroDivider("progress"));
        }
        if recipe.quality_divider == 0 {
            return Err(InputError::ZeroDivider("quality"));
        }
        let scaled = stats.clvl <= recipe.rlvl;
        let base_progress_gain = base_gain(
            stats.craftsmanship,
            2,
            recipe.progress_divider,
            scaled.then_some(recipe.progress_modifier),
        );
        let base_quality_gain = base_gain(
            stats.control,
            35,
            recipe.quality_divider,
            scaled.then_some(recipe.quality_modifier),
        );
        Ok(Self {
            stats,
            recipe,
            seed: 0,
            base_progress_gain,
            base_quality_gain,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn max_progress(&self) -> u32 {
        self.recipe.max_progress
    }

    pub fn max_quality(&self) -> u32 {
        self.recipe.max_quality
    }

    pub fn max_durability(&self) -> u32 {
        self.recipe.max_durability
    }
}

/// floor((stat * 10 / divider + offset) * modifier / 100), kept in integers.
fn base_gain(stat: u32, offset: u64, divider: u32, modifier: Option<u32>) -> u32 {
    let divider = divider as u64;
    let numerator = stat as u64 * 10 + offset * divider;
    let gain = match modifier {
        Some(modifier) => numerator * modifier as u64 / (divider * 100),
        None => numerator / divider,
    };
    gain as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(craftsmanship: u32, control: u32) -> CharacterStats {
        CharacterStats {
            craftsmanship,
            control,
            cp: 575,
            level: 90,
            clvl: 560,
            is_specialist: false,
            has_splendorous_buff: false,
            can_use_manipulation: true,
        }
    }

    fn recipe() -> RecipeInfo {
        RecipeInfo {
            is_expert: false,
            class_job_level: 90,
            rlvl: 560,
            conditions: ConditionMask::NORMAL,
            max_durability: 80,
            max_quality: 7200,
            max_progress: 3500,
            quality_modifier: 80,
            quality_divider: 115,
            progress_modifier: 90,
            progress_divider: 130,
        }
    }

    #[test]
    fn base_gains_apply_modifiers_when_recipe_is_not_below_clvl() {
        let input = SimulationInput::new(stats(3304, 3374), recipe()).unwrap();
        assert_eq!(input.base_progress_gain, 230);
        assert_eq!(input.base_quality_gain, 262);
    }

    #[test]
    fn base_gains_skip_modifiers_above_recipe_level() {
        let mut low = recipe();
        low.rlvl = 100;
        let input = SimulationInput::new(
            stats(2763, 2780),
            RecipeInfo {
                progress_divider: 121,
                quality_divider: 105,
                ..low
            },
        )
        .unwrap();
        assert_eq!(input.base_progress_gain, 230);
        assert_eq!(input.base_quality_gain, 299);
    }

    #[test]
    fn rejects_degenerate_recipes() {
        let mut bad = recipe();
        bad.max_progress = 0;
        assert_eq!(
            SimulationInput::new(stats(1, 1), bad).unwrap_err(),
            InputError::ZeroProgress
        );
        let mut bad = recipe();
        bad.quality_divider = 0;
        assert_eq!(
            SimulationInput::new(stats(1, 1), bad).unwrap_err(),
            InputError::ZeroDivider("quality")
        );
    }
}
