use thiserror::Error;

/// Wiring the model's controls failed. The scene keeps rendering without them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("model not loaded")]
    ModelNotLoaded,
    #[error("{role} node '{name}' not found in model")]
    MissingNode { role: &'static str, name: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("playback was blocked until a user gesture")]
    PlaybackBlocked,
    #[error("media source has no frame data yet")]
    NotReady,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
