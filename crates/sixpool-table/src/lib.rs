//! Table-side collaborators for the Sixpool roll engine.
//!
//! Persists settings, roll history, the character sheet, and roll presets
//! through a [`KeyValueStore`]; computes dice pools from a character;
//! imports and exports characters as JSON; and runs an interactive
//! [`TableSession`] that drives the engine from text commands.

pub mod character;
pub mod config;
pub mod error;
pub mod history;
pub mod preset;
pub mod session;
pub mod settings;
pub mod store;

pub use character::{Attribute, Character, PoolConfig};
pub use config::TableConfig;
pub use error::{TableError, TableResult};
pub use history::{HistorySave, RollHistory};
pub use preset::{PresetBook, RollPreset};
pub use session::{TableSession, describe_roll};
pub use settings::{load_settings, save_settings};
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};
