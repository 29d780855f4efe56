//! Roll history, newest first, persisted under [`HISTORY_KEY`].
//!
//! Saving never fails the roll that triggered it. When the store rejects a
//! write the history shrinks to its fallback size and tries once more; if
//! that also fails the rolls stay in memory only.

use sixpool_engine::RollResult;
use tracing::{debug, warn};

use crate::config::{DEFAULT_FALLBACK_HISTORY, DEFAULT_HISTORY_LIMIT};
use crate::error::TableResult;
use crate::store::{HISTORY_KEY, KeyValueStore, load_json, save_json};

/// How a history write ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySave {
    /// The full history was written.
    Saved,
    /// The first write failed; the history was cut to its fallback size and
    /// written.
    Shrunk,
    /// Both writes failed. The history is kept in memory only.
    Unsaved,
}

/// Recent rolls, newest first.
#[derive(Debug, Clone)]
pub struct RollHistory {
    rolls: Vec<RollResult>,
    limit: usize,
    fallback: usize,
}

impl Default for RollHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT, DEFAULT_FALLBACK_HISTORY)
    }
}

impl RollHistory {
    /// An empty history holding at most `limit` rolls.
    pub fn new(limit: usize, fallback: usize) -> Self {
        let limit = limit.max(1);
        Self {
            rolls: Vec::new(),
            limit,
            fallback: fallback.clamp(1, limit),
        }
    }

    /// Load history from `store`. Unreadable data is logged and ignored.
    pub fn load(store: &dyn KeyValueStore, limit: usize, fallback: usize) -> Self {
        let mut history = Self::new(limit, fallback);
        match load_json::<Vec<RollResult>>(store, HISTORY_KEY) {
            Ok(Some(mut rolls)) => {
                rolls.truncate(history.limit);
                history.rolls = rolls;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "discarding unreadable roll history"),
        }
        history
    }

    /// Add a roll at the front, dropping the oldest past the limit.
    pub fn push(&mut self, roll: RollResult) {
        self.rolls.insert(0, roll);
        self.rolls.truncate(self.limit);
    }

    /// Add a roll and persist the history.
    pub fn record(&mut self, roll: RollResult, store: &mut dyn KeyValueStore) -> HistorySave {
        self.push(roll);
        self.persist(store)
    }

    /// Replace the newest roll, e.g. after Edge was spent on it, and persist.
    ///
    /// Returns `None` when the history is empty.
    pub fn amend_latest(
        &mut self,
        roll: RollResult,
        store: &mut dyn KeyValueStore,
    ) -> Option<HistorySave> {
        let latest = self.rolls.first_mut()?;
        *latest = roll;
        Some(self.persist(store))
    }

    /// Write the history to `store`, shrinking once if the write fails.
    pub fn persist(&mut self, store: &mut dyn KeyValueStore) -> HistorySave {
        match save_json(store, HISTORY_KEY, &self.rolls) {
            Ok(()) => {
                debug!(rolls = self.rolls.len(), "saved roll history");
                return HistorySave::Saved;
            }
            Err(e) => warn!(
                error = %e,
                keep = self.fallback,
                "failed to save roll history, trimming"
            ),
        }

        self.rolls.truncate(self.fallback);
        match save_json(store, HISTORY_KEY, &self.rolls) {
            Ok(()) => HistorySave::Shrunk,
            Err(e) => {
                warn!(error = %e, "still unable to save roll history");
                HistorySave::Unsaved
            }
        }
    }

    /// Forget every roll and delete the stored history.
    pub fn clear(&mut self, store: &mut dyn KeyValueStore) -> TableResult<()> {
        self.rolls.clear();
        store.remove(HISTORY_KEY)?;
        Ok(())
    }

    /// All rolls, newest first.
    pub fn rolls(&self) -> &[RollResult] {
        &self.rolls
    }

    /// The most recent roll.
    pub fn latest(&self) -> Option<&RollResult> {
        self.rolls.first()
    }

    /// Number of rolls kept.
    pub fn len(&self) -> usize {
        self.rolls.len()
    }

    /// Whether no rolls are kept.
    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }

    /// Maximum number of rolls kept.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use sixpool_engine::Die;

    fn roll(pool: u8) -> RollResult {
        RollResult::from_dice((0..pool).map(|_| Die::original(3)).collect(), 0)
    }

    #[test]
    fn newest_first_and_capped() {
        let mut h = RollHistory::new(3, 1);
        for pool in 1..=5 {
            h.push(roll(pool));
        }
        assert_eq!(h.len(), 3);
        let pools: Vec<u32> = h.rolls().iter().map(|r| r.dice_pool).collect();
        assert_eq!(pools, vec![5, 4, 3]);
        assert_eq!(h.latest().map(|r| r.dice_pool), Some(5));
    }

    #[test]
    fn record_persists_and_reloads() {
        let mut store = MemoryStore::new();
        let mut h = RollHistory::default();
        assert_eq!(h.record(roll(2), &mut store), HistorySave::Saved);
        assert_eq!(h.record(roll(4), &mut store), HistorySave::Saved);

        let loaded = RollHistory::load(&store, 50, 10);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.rolls()[0].dice_pool, 4);
    }

    #[test]
    fn fifty_one_rolls_keep_fifty() {
        let mut store = MemoryStore::new();
        let mut h = RollHistory::default();
        for _ in 0..51 {
            h.record(roll(1), &mut store);
        }
        assert_eq!(h.len(), 50);
        assert_eq!(RollHistory::load(&store, 50, 10).len(), 50);
    }

    #[test]
    fn quota_failure_shrinks_to_fallback() {
        let mut h = RollHistory::new(50, 2);
        for _ in 0..5 {
            h.push(roll(1));
        }
        let two = serde_json::to_string(&h.rolls()[..2]).unwrap().len();
        let mut store = MemoryStore::new().with_quota(two + 4);
        assert_eq!(h.persist(&mut store), HistorySave::Shrunk);
        assert_eq!(h.len(), 2);
        assert_eq!(RollHistory::load(&store, 50, 2).len(), 2);
    }

    #[test]
    fn second_failure_is_swallowed() {
        let mut store = MemoryStore::new().with_quota(1);
        let mut h = RollHistory::new(50, 2);
        for _ in 0..5 {
            h.push(roll(1));
        }
        assert_eq!(h.record(roll(1), &mut store), HistorySave::Unsaved);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn amend_latest_replaces_front() {
        let mut store = MemoryStore::new();
        let mut h = RollHistory::default();
        assert_eq!(h.amend_latest(roll(1), &mut store), None);
        h.record(roll(1), &mut store);
        h.record(roll(2), &mut store);
        let mut edited = roll(2);
        edited.edge_points = 5;
        assert_eq!(h.amend_latest(edited, &mut store), Some(HistorySave::Saved));
        assert_eq!(h.len(), 2);
        let loaded = RollHistory::load(&store, 50, 10);
        assert_eq!(loaded.rolls()[0].edge_points, 5);
    }

    #[test]
    fn clear_removes_key() {
        let mut store = MemoryStore::new();
        let mut h = RollHistory::default();
        h.record(roll(1), &mut store);
        h.clear(&mut store).unwrap();
        assert!(h.is_empty());
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn unreadable_history_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "[{broken").unwrap();
        assert!(RollHistory::load(&store, 50, 10).is_empty());
    }
}
