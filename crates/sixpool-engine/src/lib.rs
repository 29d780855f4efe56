//! Dice-pool roll engine for Sixpool.
//!
//! Resolves pools of six-sided dice into hits (5s and 6s), applies the
//! Rule of Six (exploding sixes), classifies glitches, and lets a roller
//! spend Edge to manipulate a finished roll. Two mutually exclusive Edge
//! rulesets are supported: die-targeted actions (reroll one die, +1 to a
//! die, buy a success) and pool-wide actions (reroll failures, add dice,
//! push the limit). Opposed rolls compare two results by hits.
//!
//! All randomness flows through [`DieSource`], so every scenario can be
//! replayed with a seeded `StdRng` or scripted with [`ScriptedDice`].

pub mod dice;
pub mod edge;
pub mod error;
pub mod glitch;
pub mod opposed;
pub mod resolver;
pub mod settings;

pub use dice::{Die, DieSource, RollResult, ScriptedDice};
pub use edge::{EdgeAction, EdgeActionSet, EdgeState, PendingSelection};
pub use error::{EngineError, EngineResult};
pub use glitch::{GlitchRule, GlitchType};
pub use opposed::{OpposedOutcome, OpposedResult, compare_opposed};
pub use resolver::{perform_roll, roll_checked, validate_request};
pub use settings::Settings;
