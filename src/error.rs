//! Error types for Gist.

use crate::completion::CompletionError;
use thiserror::Error;

/// Library-level error type for Gist operations.
#[derive(Error, Debug)]
pub enum GistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("No transcript found for this video.")]
    NoCaptions,

    #[error("Video is unavailable.")]
    VideoUnavailable,

    #[error("Caption service error: {0}")]
    CaptionService(String),

    #[error("A transcript is already loaded for this session. Reset to start over.")]
    TranscriptAlreadyLoaded,

    #[error("Completion backend error: {0}")]
    Completion(#[from] CompletionError),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Gist operations.
pub type Result<T> = std::result::Result<T, GistError>;
