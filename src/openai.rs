//! OpenAI client configuration with sensible defaults.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Timeout for chat completion requests (2 minutes).
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for audio transcription requests (5 minutes).
///
/// Whisper uploads carry the whole waveform, so they get more headroom
/// than chat calls.
pub const AUDIO_TIMEOUT: Duration = Duration::from_secs(300);

/// Create an OpenAI client with the given request timeout.
///
/// An explicit timeout prevents a hung network call from stalling the
/// session indefinitely.
pub fn create_client(timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}

/// Check if the OpenAI API key is configured.
pub fn is_api_key_configured() -> bool {
    std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty())
}
