use serde::{Deserialize, Serialize};

pub const MAX_INNER_QUIET: u8 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EffectType {
    InnerQuiet,
    WasteNot,
    WasteNot2,
    Veneration,
    GreatStrides,
    Innovation,
    FinalAppraisal,
    MuscleMemory,
    Manipulation,
    Expedience,
    HeartAndSoul,
    TrainedPerfection,
}

impl EffectType {
    /// Effects that are tracked as presence or stacks and never tick down.
    pub fn is_permanent(self) -> bool {
        matches!(
            self,
            EffectType::InnerQuiet | EffectType::HeartAndSoul | EffectType::TrainedPerfection
        )
    }
}

/// Fixed-size ledger of active effects. A zero entry means inactive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Effects {
    pub inner_quiet: u8,
    pub waste_not: u8,
    pub waste_not2: u8,
    pub veneration: u8,
    pub great_strides: u8,
    pub innovation: u8,
    pub final_appraisal: u8,
    pub muscle_memory: u8,
    pub manipulation: u8,
    pub expedience: u8,
    pub heart_and_soul: bool,
    pub trained_perfection: bool,
}

impl Effects {
    fn slot(&mut self, effect: EffectType) -> Option<&mut u8> {
        match effect {
            EffectType::InnerQuiet => Some(&mut self.inner_quiet),
            EffectType::WasteNot => Some(&mut self.waste_not),
            EffectType::WasteNot2 => Some(&mut self.waste_not2),
            EffectType::Veneration => Some(&mut self.veneration),
            EffectType::GreatStrides => Some(&mut self.great_strides),
            EffectType::Innovation => Some(&mut self.innovation),
            EffectType::FinalAppraisal => Some(&mut self.final_appraisal),
            EffectType::MuscleMemory => Some(&mut self.muscle_memory),
            EffectType::Manipulation => Some(&mut self.manipulation),
            EffectType::Expedience => Some(&mut self.expedience),
            EffectType::HeartAndSoul | EffectType::TrainedPerfection => None,
        }
    }

    /// Sets a duration, or a stack count for Inner Quiet. Presence effects
    /// are switched on by any non-zero value.
    pub fn set_duration(&mut self, effect: EffectType, duration: u8) {
        match effect {
            EffectType::HeartAndSoul => self.heart_and_soul = duration > 0,
            EffectType::TrainedPerfection => self.trained_perfection = duration > 0,
            EffectType::InnerQuiet => self.inner_quiet = duration.min(MAX_INNER_QUIET),
            _ => {
                if let Some(slot) = self.slot(effect) {
                    *slot = duration;
                }
            }
        }
    }

    pub fn remove(&mut self, effect: EffectType) {
        self.set_duration(effect, 0);
    }

    pub fn duration(&self, effect: EffectType) -> u8 {
        match effect {
            EffectType::InnerQuiet => self.inner_quiet,
            EffectType::WasteNot => self.waste_not,
            EffectType::WasteNot2 => self.waste_not2,
            EffectType::Veneration => self.veneration,
            EffectType::GreatStrides => self.great_strides,
            EffectType::Innovation => self.innovation,
            EffectType::FinalAppraisal => self.final_appraisal,
            EffectType::MuscleMemory => self.muscle_memory,
            EffectType::Manipulation => self.manipulation,
            EffectType::Expedience => self.expedience,
            EffectType::HeartAndSoul => self.heart_and_soul as u8,
            EffectType::TrainedPerfection => self.trained_perfection as u8,
        }
    }

    pub fn has(&self, effect: EffectType) -> bool {
        self.duration(effect) > 0
    }

    /// Stack count for Inner Quiet; 1 for any other active effect.
    pub fn strength(&self, effect: EffectType) -> u8 {
        match effect {
            EffectType::InnerQuiet => self.inner_quiet,
            _ => self.has(effect) as u8,
        }
    }

    pub fn strengthen(&mut self, effect: EffectType) {
        if effect == EffectType::InnerQuiet {
            self.inner_quiet = (self.inner_quiet + 1).min(MAX_INNER_QUIET);
        }
    }

    pub fn has_waste_not(&self) -> bool {
        self.waste_not > 0 || self.waste_not2 > 0
    }

    pub fn decrement_duration(&mut self) {
        for slot in [
            &mut self.waste_not,
            &mut self.waste_not2,
            &mut self.veneration,
            &mut self.great_strides,
            &mut self.innovation,
            &mut self.final_appraisal,
            &mut self.muscle_memory,
            &mut self.manipulation,
            &mut self.expedience,
        ] {
            *slot = slot.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_quiet_caps_at_ten() {
        let mut effects = Effects::default();
        for _ in 0..14 {
            effects.strengthen(EffectType::InnerQuiet);
        }
        assert_eq!(effects.strength(EffectType::InnerQuiet), MAX_INNER_QUIET);
        effects.decrement_duration();
        assert_eq!(effects.strength(EffectType::InnerQuiet), MAX_INNER_QUIET);
    }

    #[test]
    fn durations_tick_to_zero_and_flags_persist() {
        let mut effects = Effects::default();
        effects.set_duration(EffectType::Veneration, 1);
        effects.set_duration(EffectType::HeartAndSoul, 1);
        effects.decrement_duration();
        effects.decrement_duration();
        assert!(!effects.has(EffectType::Veneration));
        assert!(effects.has(EffectType::HeartAndSoul));
        assert_eq!(effects.strength(EffectType::HeartAndSoul), 1);
        effects.remove(EffectType::HeartAndSoul);
        assert!(!effects.has(EffectType::HeartAndSoul));
    }

    #[test]
    fn strengthen_ignores_timed_effects() {
        let mut effects = Effects::default();
        effects.set_duration(EffectType::Innovation, 4);
        effects.strengthen(EffectType::Innovation);
        assert_eq!(effects.duration(EffectType::Innovation), 4);
    }
}
