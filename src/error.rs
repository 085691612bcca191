/// Error types shared across the gallery
///
/// Errors travel inside iced messages, so every variant carries owned
/// strings and the enums are `Clone`.
use std::path::PathBuf;
use thiserror::Error;

/// Failure while fetching one entry's image
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("failed to read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("background decode task failed: {0}")]
    Task(String),
}

/// Failure while importing a gallery directory or reading settings
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GalleryError {
    #[error("gallery directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    #[error("invalid JSON in {}: {reason}", path.display())]
    Json { path: PathBuf, reason: String },

    #[error("background import task failed: {0}")]
    Task(String),
}
