//! Error types for permtier

use thiserror::Error;

/// The main error type for permtier operations
#[derive(Debug, Error)]
pub enum TierError {
    /// A key is listed in more than one tier of the same module
    #[error("module {module}: key {key} appears in more than one tier")]
    OverlappingTiers { module: String, key: String },

    #[error("module {0} is declared more than once")]
    DuplicateModule(String),

    #[error("unknown module: {0}")]
    UnknownModule(String),

    #[error("unknown level: {0}")]
    UnknownLevel(String),

    /// Draft operation that needs a hydrated role
    #[error("no role loaded")]
    NotLoaded,

    #[error("config: {0}")]
    Config(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for permtier operations
pub type Result<T> = std::result::Result<T, TierError>;

/// Convert a storage-layer error to TierError
pub fn err<E: std::error::Error>(e: E) -> TierError {
    TierError::Storage(e.to_string())
}
