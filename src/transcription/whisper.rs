//! OpenAI Whisper transcription implementation.

use super::Transcriber;
use crate::error::{GistError, Result};
use crate::openai::{create_client, AUDIO_TIMEOUT};
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, instrument};

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    language: Option<String>,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber with default settings.
    pub fn new() -> Self {
        Self::with_config("whisper-1", None)
    }

    /// Create a new Whisper transcriber with custom configuration.
    pub fn with_config(model: &str, language: Option<&str>) -> Self {
        Self {
            client: create_client(AUDIO_TIMEOUT),
            model: model.to_string(),
            language: language.map(|s| s.to_string()),
        }
    }
}

impl Default for WhisperTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        debug!("Transcribing audio file");

        let file_bytes = tokio::fs::read(audio_path).await?;

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.wav")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::Json);

        if let Some(lang) = self.language.as_deref() {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| GistError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| GistError::Transcription(format!("Whisper API error: {}", e)))?;

        debug!("Transcribed {} chars", response.text.len());
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_config_stores_language() {
        let transcriber = WhisperTranscriber::with_config("whisper-1", Some("no"));
        assert_eq!(transcriber.model, "whisper-1");
        assert_eq!(transcriber.language.as_deref(), Some("no"));
    }
}
