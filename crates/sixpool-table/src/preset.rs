//! Named roll presets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sixpool_engine::dice::{MAX_POOL, MIN_POOL};
use tracing::warn;
use uuid::Uuid;

use crate::character::{Character, PoolConfig};
use crate::error::{TableError, TableResult};
use crate::store::{KeyValueStore, PRESETS_KEY, load_json, save_json};

/// Longest preset name kept, in characters.
pub const MAX_PRESET_NAME: usize = 50;

/// A saved pool setup that can be rolled again later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollPreset {
    /// Display name.
    pub name: String,
    /// Pool rolled when the calculated pool is not used.
    pub dice_pool: u32,
    /// Roll the character's calculated pool instead of `dice_pool`.
    pub use_calculated_pool: bool,
    /// Pool configuration restored when the preset is loaded.
    #[serde(default)]
    pub pool_config: PoolConfig,
}

impl RollPreset {
    /// Pool this preset rolls for `character`.
    ///
    /// A calculated pool applies the preset's own configuration to the
    /// character's ratings.
    pub fn pool_for(&self, character: &Character) -> u32 {
        if self.use_calculated_pool {
            let mut sheet = character.clone();
            sheet.set_pool_config(self.pool_config.clone());
            sheet.calculated_pool()
        } else {
            self.dice_pool
        }
    }
}

/// Every saved preset, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetBook {
    presets: BTreeMap<Uuid, RollPreset>,
}

impl PresetBook {
    /// An empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a new preset and return its id.
    pub fn add(
        &mut self,
        name: &str,
        dice_pool: u32,
        use_calculated_pool: bool,
        pool_config: PoolConfig,
    ) -> TableResult<Uuid> {
        let name: String = name.trim().chars().take(MAX_PRESET_NAME).collect();
        if name.is_empty() {
            return Err(TableError::InvalidPreset("name is empty".to_string()));
        }
        let id = Uuid::new_v4();
        self.presets.insert(
            id,
            RollPreset {
                name,
                dice_pool: dice_pool.clamp(MIN_POOL, MAX_POOL),
                use_calculated_pool,
                pool_config: pool_config.normalized(),
            },
        );
        Ok(id)
    }

    /// Look up a preset by id.
    pub fn get(&self, id: &Uuid) -> Option<&RollPreset> {
        self.presets.get(id)
    }

    /// Find a preset by id or by name (case-insensitive).
    pub fn find(&self, key: &str) -> TableResult<(Uuid, &RollPreset)> {
        let key = key.trim();
        let by_id = Uuid::parse_str(key)
            .ok()
            .and_then(|id| self.presets.get_key_value(&id));
        if let Some((id, preset)) = by_id {
            return Ok((*id, preset));
        }
        self.presets
            .iter()
            .find(|(_, p)| p.name.eq_ignore_ascii_case(key))
            .map(|(id, p)| (*id, p))
            .ok_or_else(|| TableError::PresetNotFound(key.to_string()))
    }

    /// Delete a preset by id or name.
    pub fn remove(&mut self, key: &str) -> TableResult<RollPreset> {
        let (id, _) = self.find(key)?;
        self.presets
            .remove(&id)
            .ok_or_else(|| TableError::PresetNotFound(key.to_string()))
    }

    /// Presets sorted by name.
    pub fn list(&self) -> Vec<(Uuid, &RollPreset)> {
        let mut list: Vec<_> = self.presets.iter().map(|(id, p)| (*id, p)).collect();
        list.sort_by(|a, b| a.1.name.to_lowercase().cmp(&b.1.name.to_lowercase()));
        list
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether no presets are saved.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Load stored presets. Unreadable data is logged and ignored.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<PresetBook>(store, PRESETS_KEY) {
            Ok(Some(book)) => book,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable presets");
                Self::default()
            }
        }
    }

    /// Persist every preset.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> TableResult<()> {
        save_json(store, PRESETS_KEY, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Attribute;
    use crate::store::MemoryStore;

    #[test]
    fn add_trims_and_caps_name() {
        let mut book = PresetBook::new();
        let id = book
            .add(&format!("  {}  ", "n".repeat(80)), 6, false, PoolConfig::default())
            .unwrap();
        assert_eq!(book.get(&id).unwrap().name.len(), 50);
        assert!(matches!(
            book.add("   ", 6, false, PoolConfig::default()),
            Err(TableError::InvalidPreset(_))
        ));
    }

    #[test]
    fn pool_is_clamped() {
        let mut book = PresetBook::new();
        let id = book.add("big", 500, false, PoolConfig::default()).unwrap();
        assert_eq!(book.get(&id).unwrap().dice_pool, 99);
        let id = book.add("none", 0, false, PoolConfig::default()).unwrap();
        assert_eq!(book.get(&id).unwrap().dice_pool, 1);
    }

    #[test]
    fn find_by_name_or_id() {
        let mut book = PresetBook::new();
        let id = book.add("Pistol Shot", 8, false, PoolConfig::default()).unwrap();
        assert_eq!(book.find("pistol shot").unwrap().0, id);
        assert_eq!(book.find(&id.to_string()).unwrap().1.dice_pool, 8);
        assert!(matches!(
            book.find("rifle"),
            Err(TableError::PresetNotFound(_))
        ));
    }

    #[test]
    fn remove_and_list() {
        let mut book = PresetBook::new();
        book.add("b", 2, false, PoolConfig::default()).unwrap();
        book.add("A", 1, false, PoolConfig::default()).unwrap();
        let names: Vec<&str> = book.list().iter().map(|(_, p)| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "b"]);
        assert_eq!(book.remove("b").unwrap().dice_pool, 2);
        assert_eq!(book.len(), 1);
        assert!(book.remove("b").is_err());
    }

    #[test]
    fn calculated_preset_uses_its_own_config() {
        let mut book = PresetBook::new();
        let mut c = Character::default();
        c.set_attribute(Attribute::Agility, 6).unwrap();
        c.add_skill("firearms", 5).unwrap();
        let cfg = PoolConfig {
            attribute1: Some(Attribute::Agility),
            skill_name: "firearms".to_string(),
            modifier: 2,
            ..PoolConfig::default()
        };
        let id = book.add("shoot", 4, true, cfg).unwrap();
        assert_eq!(book.get(&id).unwrap().pool_for(&c), 13);
        // the character's own config is untouched
        assert_eq!(c.calculated_pool(), 0);
    }

    #[test]
    fn save_and_load() {
        let mut store = MemoryStore::new();
        let mut book = PresetBook::new();
        book.add("dodge", 7, false, PoolConfig::default()).unwrap();
        book.save(&mut store).unwrap();
        assert_eq!(PresetBook::load(&store), book);
        assert!(PresetBook::load(&MemoryStore::new()).is_empty());
    }
}
