//! Die selection for targeted Edge actions.
//!
//! Targeted actions run in two steps: [`EdgeState::begin`] checks the
//! action can be paid for and exposes the dice to choose from, then
//! [`EdgeState::select`] applies it to the chosen die. The state lives with
//! the caller and moves `Idle -> SelectionPending -> Idle`.

use crate::dice::{Die, DieSource, RollResult};
use crate::edge::{self, EdgeAction, ensure_available, ensure_balance};
use crate::error::{EngineError, EngineResult};
use crate::settings::Settings;

/// A targeted action waiting for the caller to pick a die.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSelection {
    /// The action that will be applied.
    pub action: EdgeAction,
    /// The roll's dice at the moment the action was started, in order.
    pub candidates: Vec<Die>,
}

/// Where a roller is in the targeted-action flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EdgeState {
    /// No action in progress.
    #[default]
    Idle,
    /// Waiting for a die to be picked.
    SelectionPending(PendingSelection),
}

impl EdgeState {
    /// Returns true if no selection is pending.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The pending selection, if any.
    pub fn pending(&self) -> Option<&PendingSelection> {
        match self {
            Self::Idle => None,
            Self::SelectionPending(p) => Some(p),
        }
    }

    /// Start a targeted action on `roll`.
    ///
    /// Fails without changing state if a selection is already pending, the
    /// action does not target a die, belongs to the inactive ruleset, or the
    /// roll cannot pay for it.
    pub fn begin(
        &mut self,
        action: EdgeAction,
        roll: &RollResult,
        settings: &Settings,
    ) -> EngineResult<PendingSelection> {
        if !self.is_idle() {
            return Err(EngineError::SelectionPending);
        }
        if !action.needs_selection() {
            return Err(EngineError::InvalidDieSelection(format!(
                "{action} does not target a die"
            )));
        }
        ensure_available(action, settings)?;
        ensure_balance(roll, action.cost())?;

        let pending = PendingSelection {
            action,
            candidates: roll.dice.clone(),
        };
        *self = Self::SelectionPending(pending.clone());
        Ok(pending)
    }

    /// Apply the pending action to the die at `index`.
    ///
    /// The state returns to idle whether or not the action succeeds; a
    /// failed action aborts with no change to `roll`.
    pub fn select<R: DieSource + ?Sized>(
        &mut self,
        index: usize,
        roll: &RollResult,
        settings: &Settings,
        rng: &mut R,
    ) -> EngineResult<RollResult> {
        let Self::SelectionPending(pending) = std::mem::take(self) else {
            return Err(EngineError::NoSelectionPending);
        };
        edge::apply(pending.action, Some(index), roll, settings, rng)
    }

    /// Abandon any pending selection. Returns the action that was pending.
    pub fn cancel(&mut self) -> Option<EdgeAction> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::SelectionPending(p) => Some(p.action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::edge::EdgeActionSet;

    fn roll_with(values: &[u8], edge: u8) -> RollResult {
        RollResult::from_dice(values.iter().map(|&v| Die::original(v)).collect(), edge)
    }

    #[test]
    fn begin_exposes_every_die() {
        let mut roll = roll_with(&[6, 2], 2);
        roll.dice.push(Die::exploded(4));
        let mut state = EdgeState::default();
        let pending = state
            .begin(EdgeAction::RerollOneDie, &roll, &Settings::default())
            .unwrap();
        assert_eq!(pending.candidates.len(), 3);
        assert_eq!(pending.action, EdgeAction::RerollOneDie);
        assert!(!state.is_idle());
        assert_eq!(state.pending(), Some(&pending));
    }

    #[test]
    fn select_applies_and_returns_to_idle() {
        let roll = roll_with(&[6, 2], 2);
        let mut state = EdgeState::default();
        state
            .begin(EdgeAction::AddOneToDie, &roll, &Settings::default())
            .unwrap();
        let mut dice = ScriptedDice::new([1]);
        let next = state
            .select(1, &roll, &Settings::default(), &mut dice)
            .unwrap();
        assert_eq!(next.dice[1].value, 3);
        assert_eq!(next.edge_points, 0);
        assert!(state.is_idle());
    }

    #[test]
    fn failed_select_aborts_to_idle() {
        let roll = roll_with(&[6], 4);
        let mut state = EdgeState::default();
        state
            .begin(EdgeAction::AddOneToDie, &roll, &Settings::default())
            .unwrap();
        let mut dice = ScriptedDice::new([1]);
        let err = state
            .select(0, &roll, &Settings::default(), &mut dice)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDieSelection(_)));
        assert!(state.is_idle());
        assert_eq!(roll.edge_points, 4);
    }

    #[test]
    fn cancel_returns_to_idle_without_cost() {
        let roll = roll_with(&[3], 1);
        let mut state = EdgeState::default();
        state
            .begin(EdgeAction::RerollOneDie, &roll, &Settings::default())
            .unwrap();
        assert_eq!(state.cancel(), Some(EdgeAction::RerollOneDie));
        assert!(state.is_idle());
        assert_eq!(state.cancel(), None);
        assert_eq!(roll.edge_points, 1);
    }

    #[test]
    fn begin_while_pending_is_rejected() {
        let roll = roll_with(&[3], 5);
        let mut state = EdgeState::default();
        state
            .begin(EdgeAction::RerollOneDie, &roll, &Settings::default())
            .unwrap();
        let err = state
            .begin(EdgeAction::AddOneToDie, &roll, &Settings::default())
            .unwrap_err();
        assert_eq!(err, EngineError::SelectionPending);
        assert_eq!(
            state.pending().map(|p| p.action),
            Some(EdgeAction::RerollOneDie)
        );
    }

    #[test]
    fn begin_checks_balance_and_ruleset() {
        let roll = roll_with(&[3], 1);
        let mut state = EdgeState::default();
        assert_eq!(
            state
                .begin(EdgeAction::AddOneToDie, &roll, &Settings::default())
                .unwrap_err(),
            EngineError::InsufficientEdge {
                required: 2,
                available: 1
            }
        );
        let pool = Settings::default().with_edge_actions(EdgeActionSet::PoolWide);
        assert!(matches!(
            state.begin(EdgeAction::RerollOneDie, &roll, &pool),
            Err(EngineError::ActionUnavailable(_))
        ));
        assert!(matches!(
            state.begin(EdgeAction::BuySuccess, &roll, &Settings::default()),
            Err(EngineError::InvalidDieSelection(_))
        ));
        assert!(state.is_idle());
    }

    #[test]
    fn select_while_idle() {
        let roll = roll_with(&[3], 1);
        let mut state = EdgeState::Idle;
        let mut dice = ScriptedDice::new([1]);
        assert_eq!(
            state.select(0, &roll, &Settings::default(), &mut dice),
            Err(EngineError::NoSelectionPending)
        );
    }
}
