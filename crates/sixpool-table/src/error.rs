//! Error types for the table layer.

use thiserror::Error;

use crate::store::StorageError;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors that can occur around a roll: storage, character data, commands.
#[derive(Debug, Error)]
pub enum TableError {
    /// The roll engine rejected the operation.
    #[error("{0}")]
    Engine(#[from] sixpool_engine::EngineError),

    /// The key/value store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Stored or imported data was not valid JSON for its type.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Imported or edited character data is malformed.
    #[error("invalid character data: {0}")]
    InvalidCharacter(String),

    /// A custom skill name or rating is out of range.
    #[error("invalid skill: {0}")]
    InvalidSkill(String),

    /// A preset name was empty.
    #[error("invalid preset: {0}")]
    InvalidPreset(String),

    /// No preset matches the given id or name.
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// A command was recognized but its arguments were not.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The command word is not known.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// An Edge action was requested before anything was rolled.
    #[error("nothing has been rolled yet")]
    NoCurrentRoll,
}
