//! Injectable randomness for die draws.

use rand::Rng;

use super::SIDES;

/// Anything that can draw a six-sided die.
pub trait DieSource {
    /// Draw one value in `1..=6`.
    fn roll_d6(&mut self) -> u8;
}

impl<R: Rng> DieSource for R {
    fn roll_d6(&mut self) -> u8 {
        self.random_range(1..=SIDES)
    }
}

/// A die source that replays a fixed script of faces, cycling when exhausted.
///
/// Faces outside `1..=6` are clamped. An empty script always rolls 1.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    cursor: usize,
}

impl ScriptedDice {
    /// Create a source that yields `faces` in order.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        let mut faces: Vec<u8> = faces.into_iter().map(|f| f.clamp(1, SIDES)).collect();
        if faces.is_empty() {
            faces.push(1);
        }
        Self { faces, cursor: 0 }
    }

    /// How many dice have been drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl DieSource for ScriptedDice {
    fn roll_d6(&mut self) -> u8 {
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face
    }
}
