//! Configuration for a table session.

/// Number of rolls kept in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Number of rolls kept when a history save runs out of space.
pub const DEFAULT_FALLBACK_HISTORY: usize = 10;

/// Configuration for a [`crate::TableSession`].
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// RNG seed for reproducible rolls. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Maximum number of rolls kept in history.
    pub history_limit: usize,
    /// History size to fall back to when storage is full.
    pub fallback_history: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seed: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            fallback_history: DEFAULT_FALLBACK_HISTORY,
        }
    }
}

impl TableConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the history limit (at least 1). The fallback size never exceeds it.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self.fallback_history = self.fallback_history.min(self.history_limit);
        self
    }

    /// Set the fallback history size (clamped to 1..=history limit).
    pub fn with_fallback_history(mut self, size: usize) -> Self {
        self.fallback_history = size.clamp(1, self.history_limit);
        self
    }
}
