//! Transcription module for Gist.
//!
//! Speech-to-text over a normalized scratch waveform, via the OpenAI Whisper
//! API. One audio file, one blocking call, one plain-text result.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file and return its plain text.
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}
