//! Summary generation.

use crate::completion::{CompletionBackend, CompletionRequest};
use crate::config::Prompts;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Generates a prose summary of extracted text.
///
/// The transcript is passed through whole; there is no chunking or
/// truncation, so very long inputs are bounded only by the backend's own
/// context limits.
pub struct Summarizer {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    max_tokens: u32,
    prompts: Prompts,
}

impl Summarizer {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        model: &str,
        max_tokens: u32,
        prompts: Prompts,
    ) -> Self {
        Self {
            backend,
            model: model.to_string(),
            max_tokens,
            prompts,
        }
    }

    /// Summarize the given text.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub async fn summarize(&self, text: &str) -> Result<String> {
        info!("Summarizing {} chars", text.len());

        let mut vars = HashMap::new();
        vars.insert("text".to_string(), text.to_string());
        let user = self.prompts.render_with_custom(&self.prompts.summary.user, &vars);

        let summary = self
            .backend
            .complete(CompletionRequest {
                model: self.model.clone(),
                system: self.prompts.summary.system.clone(),
                user,
                max_tokens: self.max_tokens,
            })
            .await?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingBackend {
        requests: Mutex<Vec<CompletionRequest>>,
        reply: std::result::Result<String, ()>,
    }

    impl RecordingBackend {
        fn replying(reply: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Ok(reply.to_string()),
            }
        }

        fn failing() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Err(()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for RecordingBackend {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<String, CompletionError> {
            self.requests.lock().unwrap().push(request);
            self.reply
                .clone()
                .map_err(|_| CompletionError::Network("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_summarize_sends_text_with_cap() {
        let backend = Arc::new(RecordingBackend::replying("a short summary"));
        let summarizer = Summarizer::new(backend.clone(), "gpt-4o-mini", 500, Prompts::default());

        let summary = summarizer.summarize("hello world").await.unwrap();
        assert_eq!(summary, "a short summary");

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert_eq!(requests[0].max_tokens, 500);
        assert!(requests[0].user.contains("hello world"));
        assert!(requests[0].user.starts_with("Summarize the following text:"));
    }

    #[tokio::test]
    async fn test_summarize_propagates_backend_error() {
        let backend = Arc::new(RecordingBackend::failing());
        let summarizer = Summarizer::new(backend, "gpt-4o-mini", 500, Prompts::default());

        let err = summarizer.summarize("hello world").await.unwrap_err();
        assert!(matches!(err, crate::error::GistError::Completion(_)));
    }
}
