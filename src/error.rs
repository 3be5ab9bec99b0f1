//! Error types for configuration and leaderboard persistence.

/// Errors from reading or writing the persisted leaderboard.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed leaderboard data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from loading or validating a `GameConfig`.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Play field of height {height} leaves no room to spawn birds")]
    FieldTooSmall { height: u16 },
}
