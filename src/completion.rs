//! Completion backend abstraction.
//!
//! Wraps the hosted chat-completion API behind a trait so the summarizer and
//! Q&A responder can be exercised against a mock in tests. Backend failures
//! carry a specific [`CompletionError`] kind so callers can tell retryable
//! conditions from terminal ones (no retries are performed here).

use crate::openai::{create_client, CHAT_TIMEOUT};
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// A single completion request: one system instruction, one user message.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model name passed through to the backend.
    pub model: String,
    /// System instruction.
    pub system: String,
    /// User message.
    pub user: String,
    /// Cap on generated tokens.
    pub max_tokens: u32,
}

/// Error kinds for completion backend failures.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("quota exhausted: {0}")]
    Quota(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("API error: {0}")]
    Api(String),
}

impl CompletionError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CompletionError::Network(_) | CompletionError::Quota(_))
    }

    /// Map an `async-openai` error onto a specific kind.
    pub fn from_openai(err: OpenAIError) -> Self {
        match err {
            OpenAIError::Reqwest(e) => CompletionError::Network(e.to_string()),
            OpenAIError::JSONDeserialize(e) => CompletionError::MalformedResponse(e.to_string()),
            OpenAIError::ApiError(api) => {
                let code = api.code.as_deref().unwrap_or("");
                let kind = api.r#type.as_deref().unwrap_or("");
                if code == "invalid_api_key" || kind == "authentication_error" {
                    CompletionError::Auth(api.message)
                } else if code == "insufficient_quota"
                    || code == "rate_limit_exceeded"
                    || kind == "insufficient_quota"
                {
                    CompletionError::Quota(api.message)
                } else {
                    CompletionError::Api(api.message)
                }
            }
            other => CompletionError::Api(other.to_string()),
        }
    }
}

/// Trait for hosted completion backends.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send a request and return the first completion's text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

/// Production backend talking to the OpenAI chat completions API.
pub struct OpenAIBackend {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
}

impl OpenAIBackend {
    pub fn new() -> Self {
        Self {
            client: create_client(CHAT_TIMEOUT),
        }
    }
}

impl Default for OpenAIBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for OpenAIBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system)
                .build()
                .map_err(|e| CompletionError::Api(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user)
                .build()
                .map_err(|e| CompletionError::Api(e.to_string()))?
                .into(),
        ];

        let api_request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages(messages)
            .max_completion_tokens(request.max_tokens)
            .build()
            .map_err(|e| CompletionError::Api(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(api_request)
            .await
            .map_err(CompletionError::from_openai)?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| {
                CompletionError::MalformedResponse("no completion in response".to_string())
            })?
            .clone();

        debug!("Completion returned {} chars", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::error::ApiError;

    fn api_error(code: Option<&str>, kind: Option<&str>) -> OpenAIError {
        OpenAIError::ApiError(ApiError {
            message: "boom".to_string(),
            r#type: kind.map(|s| s.to_string()),
            param: None,
            code: code.map(|s| s.to_string()),
        })
    }

    #[test]
    fn test_auth_error_mapping() {
        let err = CompletionError::from_openai(api_error(Some("invalid_api_key"), None));
        assert!(matches!(err, CompletionError::Auth(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_quota_error_mapping() {
        let err = CompletionError::from_openai(api_error(Some("insufficient_quota"), None));
        assert!(matches!(err, CompletionError::Quota(_)));
        assert!(err.is_retryable());

        let err = CompletionError::from_openai(api_error(Some("rate_limit_exceeded"), None));
        assert!(matches!(err, CompletionError::Quota(_)));
    }

    #[test]
    fn test_other_api_error_mapping() {
        let err = CompletionError::from_openai(api_error(None, Some("server_error")));
        assert!(matches!(err, CompletionError::Api(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_malformed_response_mapping() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = CompletionError::from_openai(OpenAIError::JSONDeserialize(json_err));
        assert!(matches!(err, CompletionError::MalformedResponse(_)));
    }
}
