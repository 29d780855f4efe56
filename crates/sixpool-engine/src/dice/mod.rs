//! Six-sided dice, the sources that draw them, and the results they form.
//!
//! A die is a hit on 5 or 6. Each die remembers whether it came from the
//! initial draw (`original`) or from a Rule of Six cascade (`exploded`),
//! and which Edge action last touched it.

pub mod roll;
pub mod source;

pub use roll::{RollResult, hits_label};
pub use source::{DieSource, ScriptedDice};

use serde::{Deserialize, Serialize};

/// Number of faces on every die in a pool.
pub const SIDES: u8 = 6;

/// Lowest face that counts as a hit.
pub const HIT_THRESHOLD: u8 = 5;

/// Smallest pool a roll may draw.
pub const MIN_POOL: u32 = 1;

/// Largest pool a roll may draw.
pub const MAX_POOL: u32 = 99;

/// Largest Edge balance a roll may carry.
pub const MAX_EDGE: u8 = 7;

/// A single rolled six-sided die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    /// Face showing, always in `1..=6`.
    pub value: u8,
    /// Drawn by a Rule of Six cascade rather than the pool itself.
    pub exploded: bool,
    /// Part of the pool draw (including dice added with Edge).
    pub original: bool,
    /// Redrawn by an Edge reroll.
    #[serde(default, skip_serializing_if = "is_false")]
    pub rerolled: bool,
    /// Raised by one with Edge.
    #[serde(default, skip_serializing_if = "is_false")]
    pub boosted: bool,
    /// Bought into the pool with Edge.
    #[serde(default, skip_serializing_if = "is_false")]
    pub added: bool,
    /// Redrawn by Push the Limit.
    #[serde(default, skip_serializing_if = "is_false")]
    pub pushed: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Die {
    /// A die from the initial pool draw.
    pub fn original(value: u8) -> Self {
        Self {
            value,
            exploded: false,
            original: true,
            rerolled: false,
            boosted: false,
            added: false,
            pushed: false,
        }
    }

    /// A die drawn by a Rule of Six cascade.
    pub fn exploded(value: u8) -> Self {
        Self {
            exploded: true,
            original: false,
            ..Self::original(value)
        }
    }

    /// Returns true if the die shows 5 or 6.
    pub fn is_hit(&self) -> bool {
        self.value >= HIT_THRESHOLD
    }

    /// Returns true if the die shows 1.
    pub fn is_one(&self) -> bool {
        self.value == 1
    }

    /// Returns true if the die shows 6.
    pub fn is_six(&self) -> bool {
        self.value == SIDES
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)?;
        if self.exploded {
            write!(f, "!")?;
        }
        if self.added {
            write!(f, "a")?;
        }
        if self.rerolled {
            write!(f, "r")?;
        }
        if self.pushed {
            write!(f, "p")?;
        }
        if self.boosted {
            write!(f, "+")?;
        }
        Ok(())
    }
}
