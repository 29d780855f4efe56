//! Die-targeted Edge actions: reroll one die, +1 to one die, buy a success.

use crate::dice::{DieSource, RollResult, SIDES};
use crate::edge::{COST_ADD_ONE, COST_BUY_SUCCESS, COST_REROLL_ONE, ensure_balance};
use crate::error::{EngineError, EngineResult};
use crate::resolver::explode;
use crate::settings::Settings;

/// Redraw the die at `index`. A new six cascades under the Rule of Six.
pub fn reroll_one_die<R: DieSource + ?Sized>(
    roll: &RollResult,
    index: usize,
    settings: &Settings,
    rng: &mut R,
) -> EngineResult<RollResult> {
    ensure_balance(roll, COST_REROLL_ONE)?;
    let mut next = roll.clone();
    let die = next.dice.get_mut(index).ok_or_else(|| out_of_range(index, roll))?;

    let value = rng.roll_d6();
    die.value = value;
    die.rerolled = true;
    if value == SIDES && settings.rule_of_six {
        explode(&mut next.dice, 1, rng);
    }

    next.edge_points -= COST_REROLL_ONE;
    next.recount();
    Ok(next)
}

/// Raise the die at `index` by one. A die already showing 6 is rejected.
pub fn add_one_to_die(roll: &RollResult, index: usize) -> EngineResult<RollResult> {
    ensure_balance(roll, COST_ADD_ONE)?;
    let mut next = roll.clone();
    let die = next.dice.get_mut(index).ok_or_else(|| out_of_range(index, roll))?;
    if die.value >= SIDES {
        return Err(EngineError::InvalidDieSelection(format!(
            "die #{index} is already at maximum value ({SIDES})"
        )));
    }

    die.value += 1;
    die.boosted = true;

    next.edge_points -= COST_ADD_ONE;
    next.recount();
    Ok(next)
}

/// Add one hit to the roll without touching the dice.
///
/// Purchases are not capped per roll; each one costs the full price. The
/// hit has no die behind it, so a later action that recounts the dice
/// drops it.
pub fn buy_success(roll: &RollResult) -> EngineResult<RollResult> {
    ensure_balance(roll, COST_BUY_SUCCESS)?;
    let mut next = roll.clone();
    next.hits += 1;
    next.bought_hits += 1;
    next.bought_success = true;
    next.edge_points -= COST_BUY_SUCCESS;
    Ok(next)
}

fn out_of_range(index: usize, roll: &RollResult) -> EngineError {
    EngineError::InvalidDieSelection(format!(
        "die #{index} does not exist (roll has {} dice)",
        roll.dice.len()
    ))
}
