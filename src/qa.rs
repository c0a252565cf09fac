//! Grounded question answering.
//!
//! Every answered question leaves a (user, assistant) turn pair in the
//! session history, in that order. When the backend call fails the assistant
//! turn still lands, carrying [`ANSWER_UNAVAILABLE`], and the error
//! propagates to the caller for display. Questions asked before any content
//! is loaded are answered locally without contacting the backend and leave a
//! single assistant turn.

use crate::completion::{CompletionBackend, CompletionRequest};
use crate::config::Prompts;
use crate::error::Result;
use crate::session::SessionState;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Local reply when no transcript has been loaded yet.
pub const NO_CONTENT_MESSAGE: &str = "Please upload a file or enter a YouTube URL first.";

/// Placeholder recorded in history when the backend call fails.
pub const ANSWER_UNAVAILABLE: &str = "[answer unavailable]";

/// Answers questions grounded in the session transcript.
pub struct QaResponder {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    max_tokens: u32,
    prompts: Prompts,
}

impl QaResponder {
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

    /// Answer a question against the cached transcript.
    #[instrument(skip(self, session), fields(question = %question))]
    pub async fn answer(&self, session: &mut SessionState, question: &str) -> Result<String> {
        let context = match session.transcript() {
            Some(text) => text.to_string(),
            None => {
                session.push_assistant(NO_CONTENT_MESSAGE);
                return Ok(NO_CONTENT_MESSAGE.to_string());
            }
        };

        info!("Answering question against {} chars of context", context.len());

        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context);
        vars.insert("question".to_string(), question.to_string());
        let user = self.prompts.render_with_custom(&self.prompts.qa.user, &vars);

        session.push_user(question);

        let result = self
            .backend
            .complete(CompletionRequest {
                model: self.model.clone(),
                system: self.prompts.qa.system.clone(),
                user,
                max_tokens: self.max_tokens,
            })
            .await;

        match result {
            Ok(answer) => {
                session.push_assistant(&answer);
                Ok(answer)
            }
            Err(e) => {
                session.push_assistant(ANSWER_UNAVAILABLE);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionError;
    use crate::session::Speaker;
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

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
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

    fn responder(backend: Arc<RecordingBackend>) -> QaResponder {
        QaResponder::new(backend, "gpt-4o-mini", 700, Prompts::default())
    }

    #[tokio::test]
    async fn test_no_transcript_answers_locally() {
        let backend = Arc::new(RecordingBackend::replying("unused"));
        let qa = responder(backend.clone());
        let mut session = SessionState::new();

        let answer = qa.answer(&mut session, "What does it say?").await.unwrap();

        assert_eq!(answer, NO_CONTENT_MESSAGE);
        assert_eq!(backend.request_count(), 0, "backend must not be contacted");

        // Exactly one assistant turn, no user turn.
        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].speaker, Speaker::Assistant);
        assert_eq!(history[0].text, NO_CONTENT_MESSAGE);
    }

    #[tokio::test]
    async fn test_answer_appends_turn_pair_and_grounds_context() {
        let backend = Arc::new(RecordingBackend::replying("it says hello"));
        let qa = responder(backend.clone());
        let mut session = SessionState::new();
        session.set_transcript("hello world".to_string()).unwrap();

        let answer = qa.answer(&mut session, "What does it say?").await.unwrap();
        assert_eq!(answer, "it says hello");

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 700);
        assert!(requests[0].user.contains("Context: hello world"));
        assert!(requests[0].user.contains("Question: What does it say?"));
        assert!(requests[0]
            .system
            .contains("Please ask a question related to the media content."));

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].speaker, Speaker::User);
        assert_eq!(history[0].text, "What does it say?");
        assert_eq!(history[1].speaker, Speaker::Assistant);
        assert_eq!(history[1].text, "it says hello");
    }

    #[tokio::test]
    async fn test_backend_failure_records_placeholder_turn() {
        let backend = Arc::new(RecordingBackend::failing());
        let qa = responder(backend);
        let mut session = SessionState::new();
        session.set_transcript("hello world".to_string()).unwrap();

        let err = qa.answer(&mut session, "What does it say?").await.unwrap_err();
        assert!(matches!(err, crate::error::GistError::Completion(_)));

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].speaker, Speaker::User);
        assert_eq!(history[1].speaker, Speaker::Assistant);
        assert_eq!(history[1].text, ANSWER_UNAVAILABLE);
    }
}
