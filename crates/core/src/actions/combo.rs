use super::ActionType;
use crate::{Condition, Simulator};

/// First step pays the current condition's price; follow-ups are always the
/// discounted combo price.
pub(super) fn cp_cost(action: ActionType, s: &Simulator<'_>) -> u32 {
    let parts = action.components();
    let first = parts[0].cp_cost(s);
    let rest: u32 = parts[1..].iter().map(|part| follow_up_cost(*part)).sum();
    first + rest
}

fn follow_up_cost(action: ActionType) -> u32 {
    match action {
        ActionType::StandardTouch | ActionType::AdvancedTouch => 18,
        _ => action.base().cp_cost,
    }
}

/// Only the first step is charged under the current condition.
pub(super) fn effective_cp_cost(action: ActionType, s: &Simulator<'_>) -> u32 {
    let parts = action.components();
    let rest: u32 = parts[1..].iter().map(|part| follow_up_cost(*part)).sum();
    s.calculate_cp_cost(parts[0].cp_cost(s)) + rest
}

pub(super) fn could_use(action: ActionType, s: &Simulator<'_>) -> bool {
    let first = action.components()[0];
    first.could_use(s)
        && s.state().cp >= effective_cp_cost(action, s)
        && verify_durability(action, s)
}

/// Walks every step except the last with the modifiers known now and checks
/// the item survives to the final one.
pub(super) fn verify_durability(action: ActionType, s: &Simulator<'_>) -> bool {
    let parts = action.components();
    let state = s.state();
    let max = s.input().recipe.max_durability as i64;
    let mut durability = state.durability as i64;
    let mut waste_not = state.effects.waste_not.max(state.effects.waste_not2);
    let mut manipulation = state.effects.manipulation;
    let mut perfection = state.effects.trained_perfection;
    let mut sturdy = state.condition == Condition::Sturdy;

    for part in &parts[..parts.len() - 1] {
        let base = part.base();
        if base.durability_cost > 0 {
            if perfection {
                perfection = false;
            } else {
                let mut divisor = 1;
                if waste_not > 0 {
                    divisor *= 2;
                }
                if sturdy {
                    divisor *= 2;
                }
                durability -= base.durability_cost.div_ceil(divisor) as i64;
            }
        }
        if durability <= 0 {
            return false;
        }
        if base.increases_step_count {
            if manipulation > 0 {
                durability = (durability + 5).min(max);
            }
            manipulation = manipulation.saturating_sub(1);
            waste_not = waste_not.saturating_sub(1);
            sturdy = false;
        }
    }
    true
}
