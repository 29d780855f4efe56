//! Opposed rolls: two independent results compared by hits.

use serde::{Deserialize, Serialize};

use crate::dice::{RollResult, hits_label};

/// Which side won an opposed roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpposedOutcome {
    /// The attacker rolled more hits.
    Attacker,
    /// The defender rolled more hits.
    Defender,
    /// Both sides rolled the same number of hits.
    Tie,
}

/// The comparison of an attacker's roll against a defender's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpposedResult {
    /// Attacker hits minus defender hits.
    pub net_hits: i32,
    /// The winning side.
    pub outcome: OpposedOutcome,
}

/// Compare two rolls by hits.
pub fn compare_opposed(attacker: &RollResult, defender: &RollResult) -> OpposedResult {
    compare_hits(attacker.hits, defender.hits)
}

/// Compare two hit totals.
pub fn compare_hits(attacker_hits: u32, defender_hits: u32) -> OpposedResult {
    let net_hits = attacker_hits as i32 - defender_hits as i32;
    let outcome = match net_hits {
        1.. => OpposedOutcome::Attacker,
        0 => OpposedOutcome::Tie,
        _ => OpposedOutcome::Defender,
    };
    OpposedResult { net_hits, outcome }
}

impl std::fmt::Display for OpposedResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let margin = hits_label(self.net_hits.unsigned_abs());
        match self.outcome {
            OpposedOutcome::Attacker => write!(f, "{} Net: Attacker Succeeds!", margin),
            OpposedOutcome::Defender => write!(f, "{} Net: Defender Succeeds!", margin),
            OpposedOutcome::Tie => write!(f, "Tie: both sides rolled equal hits"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Die;

    fn roll_with_hits(hits: u32) -> RollResult {
        RollResult::from_dice((0..hits).map(|_| Die::original(5)).collect(), 0)
    }

    #[test]
    fn attacker_wins() {
        let r = compare_opposed(&roll_with_hits(5), &roll_with_hits(3));
        assert_eq!(
            r,
            OpposedResult {
                net_hits: 2,
                outcome: OpposedOutcome::Attacker
            }
        );
    }

    #[test]
    fn tie() {
        let r = compare_opposed(&roll_with_hits(2), &roll_with_hits(2));
        assert_eq!(
            r,
            OpposedResult {
                net_hits: 0,
                outcome: OpposedOutcome::Tie
            }
        );
    }

    #[test]
    fn defender_wins() {
        let r = compare_hits(1, 4);
        assert_eq!(r.net_hits, -3);
        assert_eq!(r.outcome, OpposedOutcome::Defender);
    }

    #[test]
    fn bought_hits_count() {
        let mut attacker = roll_with_hits(2);
        attacker.edge_points = 3;
        let attacker = crate::edge::targeted::buy_success(&attacker).unwrap();
        let r = compare_opposed(&attacker, &roll_with_hits(2));
        assert_eq!(r.outcome, OpposedOutcome::Attacker);
    }

    #[test]
    fn display() {
        assert_eq!(
            compare_hits(5, 3).to_string(),
            "2 Hits Net: Attacker Succeeds!"
        );
        assert_eq!(
            compare_hits(0, 1).to_string(),
            "1 Hit Net: Defender Succeeds!"
        );
        assert_eq!(
            compare_hits(2, 2).to_string(),
            "Tie: both sides rolled equal hits"
        );
    }
}
