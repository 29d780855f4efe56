//! Glitch classification.
//!
//! A glitch is a failure condition triggered by too many ones in the pool
//! draw. Only original dice are considered; exploded dice never glitch.
//!
//! Two formulas are in circulation and are kept apart as [`GlitchRule`]
//! variants:
//! - **Half dice** (default): more than half of the original dice show 1.
//! - **Ones exceed hits**: the original dice show more ones than hits.
//!
//! Under either rule a pool whose every original die shows 1 is a critical
//! glitch, which takes precedence over a regular glitch.

use serde::{Deserialize, Serialize};

use crate::dice::Die;

/// How a roll's ones were classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlitchType {
    /// No glitch.
    #[default]
    None,
    /// A regular glitch.
    Glitch,
    /// Every original die showed 1.
    CriticalGlitch,
}

impl GlitchType {
    /// Returns true for both regular and critical glitches.
    pub fn is_glitch(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for GlitchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "No Glitch"),
            Self::Glitch => write!(f, "GLITCH"),
            Self::CriticalGlitch => write!(f, "CRITICAL GLITCH"),
        }
    }
}

/// Which formula decides a regular glitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlitchRule {
    /// Ones outnumber half the original dice (rounded down).
    #[default]
    HalfDice,
    /// Ones outnumber the hits among the original dice.
    OnesExceedHits,
}

impl GlitchRule {
    /// Parse a rule from a short tag like `"half"` or `"hits"`.
    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "half" | "half-dice" => Some(Self::HalfDice),
            "hits" | "ones-exceed-hits" => Some(Self::OnesExceedHits),
            _ => None,
        }
    }

    /// Classify a dice sequence, looking only at its original dice.
    pub fn classify(self, dice: &[Die]) -> GlitchType {
        let mut count: u32 = 0;
        let mut ones: u32 = 0;
        let mut hits: u32 = 0;
        for die in dice.iter().filter(|d| d.original) {
            count += 1;
            if die.is_one() {
                ones += 1;
            }
            if die.is_hit() {
                hits += 1;
            }
        }

        if count > 0 && ones == count {
            return GlitchType::CriticalGlitch;
        }

        let exceeded = match self {
            Self::HalfDice => ones > count / 2,
            Self::OnesExceedHits => ones > hits,
        };
        if exceeded && ones > 0 {
            GlitchType::Glitch
        } else {
            GlitchType::None
        }
    }
}

impl std::fmt::Display for GlitchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HalfDice => write!(f, "half-dice"),
            Self::OnesExceedHits => write!(f, "ones-exceed-hits"),
        }
    }
}
