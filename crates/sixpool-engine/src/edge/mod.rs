//! Edge actions: budgeted mutations of a finished roll.
//!
//! Two rulesets exist and only one is active per [`Settings`] profile:
//! - **Die-targeted** ([`targeted`]): reroll one die, +1 to one die, buy a success.
//! - **Pool-wide** ([`pool`]): reroll failures, add dice, push the limit.
//!
//! Every action checks the roll's Edge balance before touching anything,
//! works on a copy, and hands back the updated roll. A rejected action
//! leaves the caller's roll exactly as it was.

pub mod pool;
pub mod selection;
pub mod targeted;

pub use selection::{EdgeState, PendingSelection};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dice::{DieSource, RollResult};
use crate::error::{EngineError, EngineResult};
use crate::settings::Settings;

/// Cost of rerolling one chosen die.
pub const COST_REROLL_ONE: u8 = 1;
/// Cost of adding +1 to one chosen die.
pub const COST_ADD_ONE: u8 = 2;
/// Cost of buying one automatic success.
pub const COST_BUY_SUCCESS: u8 = 3;
/// Cost of rerolling every failed original die.
pub const COST_REROLL_FAILURES: u8 = 1;
/// Cost of each die added to the pool.
pub const COST_PER_ADDED_DIE: u8 = 1;
/// Most dice a single Add Dice action can buy.
pub const MAX_ADDED_DICE: u8 = 5;
/// Cost of pushing the limit.
pub const COST_PUSH_THE_LIMIT: u8 = 2;

/// The two mutually exclusive Edge rulesets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeActionSet {
    /// Reroll one die, +1 to one die, buy a success.
    #[default]
    DieTargeted,
    /// Reroll failures, add dice, push the limit.
    PoolWide,
}

impl EdgeActionSet {
    /// The actions this ruleset offers.
    pub fn actions(self) -> &'static [EdgeAction] {
        match self {
            Self::DieTargeted => &[
                EdgeAction::RerollOneDie,
                EdgeAction::AddOneToDie,
                EdgeAction::BuySuccess,
            ],
            Self::PoolWide => &[
                EdgeAction::RerollFailures,
                EdgeAction::AddDice,
                EdgeAction::PushTheLimit,
            ],
        }
    }

    /// Returns true if `action` belongs to this ruleset.
    pub fn contains(self, action: EdgeAction) -> bool {
        action.ruleset() == self
    }

    /// Parse a ruleset from a tag like `"targeted"` or `"pool"`.
    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "targeted" | "die-targeted" => Some(Self::DieTargeted),
            "pool" | "pool-wide" => Some(Self::PoolWide),
            _ => None,
        }
    }
}

impl std::fmt::Display for EdgeActionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DieTargeted => write!(f, "die-targeted"),
            Self::PoolWide => write!(f, "pool-wide"),
        }
    }
}

/// A way to spend Edge on a finished roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeAction {
    /// Redraw one chosen die.
    RerollOneDie,
    /// Raise one chosen die by one face.
    AddOneToDie,
    /// Add one hit with no die behind it.
    BuySuccess,
    /// Redraw every original die that missed.
    RerollFailures,
    /// Buy up to five more original dice.
    AddDice,
    /// Redraw every original die that missed, letting sixes explode.
    PushTheLimit,
}

impl EdgeAction {
    /// Edge spent by the action. For [`EdgeAction::AddDice`] this is the
    /// price of one die, which is also the minimum balance it needs.
    pub fn cost(self) -> u8 {
        match self {
            Self::RerollOneDie => COST_REROLL_ONE,
            Self::AddOneToDie => COST_ADD_ONE,
            Self::BuySuccess => COST_BUY_SUCCESS,
            Self::RerollFailures => COST_REROLL_FAILURES,
            Self::AddDice => COST_PER_ADDED_DIE,
            Self::PushTheLimit => COST_PUSH_THE_LIMIT,
        }
    }

    /// The ruleset that offers this action.
    pub fn ruleset(self) -> EdgeActionSet {
        match self {
            Self::RerollOneDie | Self::AddOneToDie | Self::BuySuccess => {
                EdgeActionSet::DieTargeted
            }
            Self::RerollFailures | Self::AddDice | Self::PushTheLimit => EdgeActionSet::PoolWide,
        }
    }

    /// Returns true if the action needs the caller to pick a die.
    pub fn needs_selection(self) -> bool {
        matches!(self, Self::RerollOneDie | Self::AddOneToDie)
    }

    /// Parse an action from a short tag like `"reroll"` or `"push"`.
    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reroll" | "reroll-one-die" => Some(Self::RerollOneDie),
            "boost" | "add-one" | "add-one-to-die" => Some(Self::AddOneToDie),
            "buy" | "buy-success" => Some(Self::BuySuccess),
            "failures" | "reroll-failures" => Some(Self::RerollFailures),
            "add" | "add-dice" => Some(Self::AddDice),
            "push" | "push-the-limit" => Some(Self::PushTheLimit),
            _ => None,
        }
    }
}

impl std::fmt::Display for EdgeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RerollOneDie => write!(f, "Reroll One Die"),
            Self::AddOneToDie => write!(f, "Add +1 to One Die"),
            Self::BuySuccess => write!(f, "Buy Success"),
            Self::RerollFailures => write!(f, "Reroll Failures"),
            Self::AddDice => write!(f, "Add Dice"),
            Self::PushTheLimit => write!(f, "Push the Limit"),
        }
    }
}

/// Apply an Edge action to a roll and return the updated roll.
///
/// `target` is the die index for actions that need one, and the number of
/// dice to buy for [`EdgeAction::AddDice`]; the other actions ignore it.
/// The caller's roll is never modified.
pub fn apply<R: DieSource + ?Sized>(
    action: EdgeAction,
    target: Option<usize>,
    roll: &RollResult,
    settings: &Settings,
    rng: &mut R,
) -> EngineResult<RollResult> {
    ensure_available(action, settings)?;

    let updated = match action {
        EdgeAction::RerollOneDie => {
            targeted::reroll_one_die(roll, require_target(target)?, settings, rng)
        }
        EdgeAction::AddOneToDie => targeted::add_one_to_die(roll, require_target(target)?),
        EdgeAction::BuySuccess => targeted::buy_success(roll),
        EdgeAction::RerollFailures => pool::reroll_failures(roll, rng),
        EdgeAction::AddDice => {
            let count = target.map(|n| u8::try_from(n).unwrap_or(u8::MAX));
            pool::add_dice(roll, count, settings, rng)
        }
        EdgeAction::PushTheLimit => pool::push_the_limit(roll, settings, rng),
    }?;

    debug!(
        %action,
        spent = roll.edge_points - updated.edge_points,
        remaining = updated.edge_points,
        hits = updated.hits,
        "spent edge"
    );
    Ok(updated)
}

/// Reject actions that belong to the inactive ruleset.
pub(crate) fn ensure_available(action: EdgeAction, settings: &Settings) -> EngineResult<()> {
    if settings.edge_actions.contains(action) {
        Ok(())
    } else {
        Err(EngineError::ActionUnavailable(action.to_string()))
    }
}

/// Reject actions the roll cannot pay for.
pub(crate) fn ensure_balance(roll: &RollResult, cost: u8) -> EngineResult<()> {
    if roll.edge_points >= cost {
        Ok(())
    } else {
        Err(EngineError::InsufficientEdge {
            required: cost,
            available: roll.edge_points,
        })
    }
}

fn require_target(target: Option<usize>) -> EngineResult<usize> {
    target.ok_or_else(|| EngineError::InvalidDieSelection("no die selected".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{Die, ScriptedDice};

    fn roll_with(values: &[u8], edge: u8) -> RollResult {
        RollResult::from_dice(values.iter().map(|&v| Die::original(v)).collect(), edge)
    }

    #[test]
    fn costs() {
        assert_eq!(EdgeAction::RerollOneDie.cost(), 1);
        assert_eq!(EdgeAction::AddOneToDie.cost(), 2);
        assert_eq!(EdgeAction::BuySuccess.cost(), 3);
        assert_eq!(EdgeAction::RerollFailures.cost(), 1);
        assert_eq!(EdgeAction::AddDice.cost(), 1);
        assert_eq!(EdgeAction::PushTheLimit.cost(), 2);
    }

    #[test]
    fn rulesets_partition_actions() {
        for set in [EdgeActionSet::DieTargeted, EdgeActionSet::PoolWide] {
            assert_eq!(set.actions().len(), 3);
            for action in set.actions() {
                assert!(set.contains(*action));
                assert_eq!(action.ruleset(), set);
            }
        }
        assert!(!EdgeActionSet::DieTargeted.contains(EdgeAction::PushTheLimit));
    }

    #[test]
    fn tags() {
        assert_eq!(EdgeAction::from_str_tag("buy"), Some(EdgeAction::BuySuccess));
        assert_eq!(EdgeAction::from_str_tag("Push"), Some(EdgeAction::PushTheLimit));
        assert_eq!(EdgeAction::from_str_tag("nope"), None);
        assert_eq!(
            EdgeActionSet::from_str_tag("pool"),
            Some(EdgeActionSet::PoolWide)
        );
    }

    #[test]
    fn inactive_ruleset_is_rejected() {
        let roll = roll_with(&[2, 3], 7);
        let mut dice = ScriptedDice::new([6]);
        let err = apply(
            EdgeAction::PushTheLimit,
            None,
            &roll,
            &Settings::default(),
            &mut dice,
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::ActionUnavailable("Push the Limit".to_string())
        );
        assert_eq!(dice.drawn(), 0);
    }

    #[test]
    fn targeted_action_needs_a_die() {
        let roll = roll_with(&[2, 3], 7);
        let mut dice = ScriptedDice::new([6]);
        let err = apply(
            EdgeAction::RerollOneDie,
            None,
            &roll,
            &Settings::default(),
            &mut dice,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDieSelection(_)));
    }

    #[test]
    fn apply_dispatches_to_pool_actions() {
        let roll = roll_with(&[2, 3, 5], 3);
        let settings = Settings::default()
            .with_rule_of_six(false)
            .with_edge_actions(EdgeActionSet::PoolWide);
        let mut dice = ScriptedDice::new([5, 6]);
        let updated = apply(EdgeAction::RerollFailures, None, &roll, &settings, &mut dice).unwrap();
        assert_eq!(updated.hits, 3);
        assert_eq!(updated.edge_points, 2);
        assert_eq!(roll.hits, 1);
    }

    #[test]
    fn apply_passes_the_add_dice_count() {
        let roll = roll_with(&[2], 6);
        let settings = Settings::default()
            .with_rule_of_six(false)
            .with_edge_actions(EdgeActionSet::PoolWide);
        let mut dice = ScriptedDice::new([3]);
        let updated = apply(EdgeAction::AddDice, Some(3), &roll, &settings, &mut dice).unwrap();
        assert_eq!(updated.dice_pool, 4);
        assert_eq!(updated.edge_points, 3);
    }
}
