//! Loading and saving [`Settings`] under [`SETTINGS_KEY`].

use sixpool_engine::Settings;
use tracing::warn;

use crate::error::TableResult;
use crate::store::{KeyValueStore, SETTINGS_KEY, load_json, save_json};

/// Load stored settings merged over the defaults.
///
/// Missing fields keep their default value and the default Edge is clamped.
/// Unreadable data is logged and the defaults are returned.
pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
    match load_json::<Settings>(store, SETTINGS_KEY) {
        Ok(Some(settings)) => settings.normalized(),
        Ok(None) => Settings::default(),
        Err(e) => {
            warn!(error = %e, "ignoring unreadable settings");
            Settings::default()
        }
    }
}

/// Persist `settings`.
pub fn save_settings(store: &mut dyn KeyValueStore, settings: &Settings) -> TableResult<()> {
    save_json(store, SETTINGS_KEY, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use sixpool_engine::{EdgeActionSet, GlitchRule};

    #[test]
    fn missing_settings_are_defaults() {
        assert_eq!(load_settings(&MemoryStore::new()), Settings::default());
    }

    #[test]
    fn saved_settings_reload() {
        let mut store = MemoryStore::new();
        let s = Settings::default()
            .with_rule_of_six(false)
            .with_glitch_rule(GlitchRule::OnesExceedHits)
            .with_edge_actions(EdgeActionSet::PoolWide);
        save_settings(&mut store, &s).unwrap();
        assert_eq!(load_settings(&store), s);
    }

    #[test]
    fn stored_values_merge_over_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(SETTINGS_KEY, r#"{"glitch_detection":false,"default_edge":30}"#)
            .unwrap();
        let s = load_settings(&store);
        assert!(s.rule_of_six);
        assert!(!s.glitch_detection);
        assert_eq!(s.default_edge, 7);
    }

    #[test]
    fn wild_default_edge_keeps_other_fields() {
        let mut store = MemoryStore::new();
        store
            .set(
                SETTINGS_KEY,
                r#"{"rule_of_six":false,"edge_actions":"pool-wide","default_edge":300}"#,
            )
            .unwrap();
        let s = load_settings(&store);
        assert!(!s.rule_of_six);
        assert_eq!(s.edge_actions, EdgeActionSet::PoolWide);
        assert_eq!(s.default_edge, 7);

        store.set(SETTINGS_KEY, r#"{"rule_of_six":false,"default_edge":-1}"#).unwrap();
        let s = load_settings(&store);
        assert!(!s.rule_of_six);
        assert_eq!(s.default_edge, 0);
    }

    #[test]
    fn unreadable_settings_fall_back() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, "nope").unwrap();
        assert_eq!(load_settings(&store), Settings::default());
    }
}
