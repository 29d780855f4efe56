//! Roll results and their derived tallies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Die;
use crate::glitch::GlitchType;

/// The outcome of resolving a dice pool, possibly modified by Edge.
///
/// `hits` and `ones` are derived from `dice` and refreshed by
/// [`RollResult::recount`] after every mutation. A bought success raises
/// `hits` without a die behind it, so any later recount drops it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollResult {
    /// Every die in draw order: the pool first, then cascades and additions.
    pub dice: Vec<Die>,
    /// Dice showing 5 or 6, plus a success bought since the last recount.
    pub hits: u32,
    /// Dice showing 1 across the whole sequence.
    pub ones: u32,
    /// Glitch classification of the original draw.
    pub glitch: GlitchType,
    /// Size of the pool draw; grows when dice are added with Edge.
    pub dice_pool: u32,
    /// Edge left to spend on this roll.
    pub edge_points: u8,
    /// Set once any success has been bought with Edge.
    #[serde(default)]
    pub bought_success: bool,
    /// Number of successes bought with Edge, for display.
    #[serde(default)]
    pub bought_hits: u32,
    /// When the roll was resolved.
    pub timestamp: DateTime<Utc>,
}

impl RollResult {
    /// Build a result around an existing dice sequence.
    ///
    /// The pool size is the number of original dice; the glitch is left at
    /// [`GlitchType::None`].
    pub fn from_dice(dice: Vec<Die>, edge_points: u8) -> Self {
        let dice_pool = dice.iter().filter(|d| d.original).count() as u32;
        let mut result = Self {
            dice,
            hits: 0,
            ones: 0,
            glitch: GlitchType::None,
            dice_pool,
            edge_points,
            bought_success: false,
            bought_hits: 0,
            timestamp: Utc::now(),
        };
        result.recount();
        result
    }

    /// Refresh `hits` and `ones` from the current dice.
    pub fn recount(&mut self) {
        self.hits = self.dice_hits();
        self.ones = self.dice.iter().filter(|d| d.is_one()).count() as u32;
    }

    /// Hits showing on the dice, ignoring bought successes.
    pub fn dice_hits(&self) -> u32 {
        self.dice.iter().filter(|d| d.is_hit()).count() as u32
    }

    /// Dice from the pool draw (including dice added with Edge).
    pub fn originals(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter().filter(|d| d.original)
    }

    /// Number of dice produced by Rule of Six cascades.
    pub fn exploded_count(&self) -> usize {
        self.dice.iter().filter(|d| d.exploded).count()
    }

    /// Look up a die by its position in the sequence.
    pub fn die(&self, index: usize) -> Option<&Die> {
        self.dice.get(index)
    }

    /// One-line prose summary, e.g. `Rolled 6 dice (1 exploded). 3 hits total.`
    pub fn summary(&self) -> String {
        let mut out = format!("Rolled {} dice", self.dice_pool);
        let exploded = self.exploded_count();
        if exploded > 0 {
            out.push_str(&format!(" ({exploded} exploded)"));
        }
        out.push_str(&format!(". {} hits total", self.hits));
        if self.bought_success {
            out.push_str(&format!(" ({} bought with Edge)", self.bought_hits));
        }
        out.push('.');
        if self.ones > 0 {
            out.push_str(&format!(" {} one(s) rolled.", self.ones));
        }
        out
    }
}

/// Format a hit count with the right noun, e.g. `1 Hit`, `3 Hits`.
pub fn hits_label(hits: u32) -> String {
    if hits == 1 {
        "1 Hit".to_string()
    } else {
        format!("{hits} Hits")
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.dice.iter().map(Die::to_string).collect();
        write!(f, "[{}] = {}", values.join(", "), hits_label(self.hits))
    }
}
