//! Error types for the roll engine.

use crate::dice::{MAX_EDGE, MAX_POOL, MIN_POOL};

/// Errors that can occur while resolving a roll or spending Edge.
///
/// Every variant is recoverable: the operation that produced it made no
/// change to the roll it was given.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The requested pool is outside the allowed range.
    #[error("dice pool must be between {min} and {max}, got {0}", min = MIN_POOL, max = MAX_POOL)]
    InvalidPoolSize(u32),

    /// The requested Edge balance is outside the allowed range.
    #[error("edge points must be between 0 and {max}, got {0}", max = MAX_EDGE)]
    InvalidEdgeAmount(u32),

    /// The roll does not carry enough Edge to pay for the action.
    #[error("not enough Edge: need {required}, have {available}")]
    InsufficientEdge {
        /// Cost of the rejected action.
        required: u8,
        /// Balance on the roll at the time of the request.
        available: u8,
    },

    /// The chosen die cannot receive the action (out of range, already maxed).
    #[error("invalid die selection: {0}")]
    InvalidDieSelection(String),

    /// The action has nothing to work on.
    #[error("no eligible dice: {0}")]
    NoEligibleDice(String),

    /// The action belongs to the Edge ruleset that is not active.
    #[error("{0} is not available with the active Edge ruleset")]
    ActionUnavailable(String),

    /// A die selection is already pending and must be completed or cancelled.
    #[error("a die selection is already pending")]
    SelectionPending,

    /// A die was picked while no targeted action was waiting for one.
    #[error("no die selection is pending")]
    NoSelectionPending,
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_bounds() {
        assert_eq!(
            EngineError::InvalidPoolSize(0).to_string(),
            "dice pool must be between 1 and 99, got 0"
        );
        assert_eq!(
            EngineError::InvalidEdgeAmount(8).to_string(),
            "edge points must be between 0 and 7, got 8"
        );
    }

    #[test]
    fn insufficient_edge_reports_cost() {
        let err = EngineError::InsufficientEdge {
            required: 3,
            available: 2,
        };
        assert_eq!(err.to_string(), "not enough Edge: need 3, have 2");
    }
}
