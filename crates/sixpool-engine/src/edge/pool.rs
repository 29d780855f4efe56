//! Pool-wide Edge actions: reroll failures, add dice, push the limit.

use crate::dice::{Die, DieSource, RollResult};
use crate::edge::{
    COST_PER_ADDED_DIE, COST_PUSH_THE_LIMIT, COST_REROLL_FAILURES, MAX_ADDED_DICE, ensure_balance,
};
use crate::error::{EngineError, EngineResult};
use crate::resolver::explode;
use crate::settings::Settings;

/// Redraw every original die that is not a hit. Exploded dice are untouched
/// and the new faces do not cascade.
pub fn reroll_failures<R: DieSource + ?Sized>(
    roll: &RollResult,
    rng: &mut R,
) -> EngineResult<RollResult> {
    ensure_balance(roll, COST_REROLL_FAILURES)?;
    let failures = original_failures(roll)?;

    let mut next = roll.clone();
    for index in failures {
        let die = &mut next.dice[index];
        die.value = rng.roll_d6();
        die.rerolled = true;
    }

    next.edge_points -= COST_REROLL_FAILURES;
    next.recount();
    Ok(next)
}

/// Buy new original dice at one Edge each, up to `min(balance, 5)`.
///
/// `count` is clamped into that range; `None` buys as many as allowed.
/// Added dice grow the pool and explode under the Rule of Six like any
/// other pool die.
pub fn add_dice<R: DieSource + ?Sized>(
    roll: &RollResult,
    count: Option<u8>,
    settings: &Settings,
    rng: &mut R,
) -> EngineResult<RollResult> {
    ensure_balance(roll, COST_PER_ADDED_DIE)?;
    let most = (roll.edge_points / COST_PER_ADDED_DIE).min(MAX_ADDED_DICE);
    let count = count.map_or(most, |n| n.clamp(1, most));

    let mut next = roll.clone();
    let mut sixes = 0;
    for _ in 0..count {
        let die = Die {
            added: true,
            ..Die::original(rng.roll_d6())
        };
        if die.is_six() {
            sixes += 1;
        }
        next.dice.push(die);
    }
    if settings.rule_of_six {
        explode(&mut next.dice, sixes, rng);
    }

    next.dice_pool += u32::from(count);
    next.edge_points -= count * COST_PER_ADDED_DIE;
    next.recount();
    Ok(next)
}

/// Redraw every original die that is not a hit; new sixes cascade under the
/// Rule of Six exactly as in the initial roll.
pub fn push_the_limit<R: DieSource + ?Sized>(
    roll: &RollResult,
    settings: &Settings,
    rng: &mut R,
) -> EngineResult<RollResult> {
    ensure_balance(roll, COST_PUSH_THE_LIMIT)?;
    let failures = original_failures(roll)?;

    let mut next = roll.clone();
    let mut sixes = 0;
    for index in failures {
        let die = &mut next.dice[index];
        die.value = rng.roll_d6();
        die.pushed = true;
        if die.is_six() {
            sixes += 1;
        }
    }
    if settings.rule_of_six {
        explode(&mut next.dice, sixes, rng);
    }

    next.edge_points -= COST_PUSH_THE_LIMIT;
    next.recount();
    Ok(next)
}

/// Indices of original dice that missed, or an error if there are none.
fn original_failures(roll: &RollResult) -> EngineResult<Vec<usize>> {
    let failures: Vec<usize> = roll
        .dice
        .iter()
        .enumerate()
        .filter(|(_, d)| d.original && !d.is_hit())
        .map(|(i, _)| i)
        .collect();
    if failures.is_empty() {
        Err(EngineError::NoEligibleDice(
            "every original die is already a hit".to_string(),
        ))
    } else {
        Ok(failures)
    }
}
