//! Per-session state.
//!
//! One interactive session owns exactly one transcript, at most one summary,
//! and an append-only chat history. The state object is passed explicitly to
//! the pipeline; there are no ambient globals.

use crate::error::{GistError, Result};
use serde::{Deserialize, Serialize};

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::User => write!(f, "You"),
            Speaker::Assistant => write!(f, "Gist"),
        }
    }
}

/// A single question or answer in the session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Mutable state for one interactive session.
///
/// The transcript is set at most once; only [`SessionState::reset`] makes
/// room for a new one. History is append-only and is never reordered or
/// trimmed.
#[derive(Debug, Default)]
pub struct SessionState {
    transcript: Option<String>,
    summary: Option<String>,
    history: Vec<ChatTurn>,
    /// Last successfully processed URL, used to ignore resubmissions.
    last_url: Option<String>,
    url_generation: u64,
    question_generation: u64,
}

impl SessionState {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The extracted transcript, if any input has been processed.
    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    /// The generated summary, if summarization succeeded.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// The chat history, oldest turn first.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn has_transcript(&self) -> bool {
        self.transcript.is_some()
    }

    /// Store the transcript for this session.
    ///
    /// Fails if a transcript is already loaded; the session must be reset
    /// before another input can be processed.
    pub fn set_transcript(&mut self, text: String) -> Result<()> {
        if self.transcript.is_some() {
            return Err(GistError::TranscriptAlreadyLoaded);
        }
        self.transcript = Some(text);
        Ok(())
    }

    /// Store the summary for this session.
    pub fn set_summary(&mut self, text: String) {
        self.summary = Some(text);
    }

    /// Append a user turn to the history.
    pub fn push_user(&mut self, text: &str) {
        self.history.push(ChatTurn {
            speaker: Speaker::User,
            text: text.to_string(),
        });
    }

    /// Append an assistant turn to the history.
    pub fn push_assistant(&mut self, text: &str) {
        self.history.push(ChatTurn {
            speaker: Speaker::Assistant,
            text: text.to_string(),
        });
    }

    /// Whether this URL is a resubmission of the last processed one.
    pub fn is_duplicate_url(&self, url: &str) -> bool {
        self.last_url.as_deref() == Some(url)
    }

    /// Record a successfully processed URL.
    pub fn record_url(&mut self, url: &str) {
        self.last_url = Some(url.to_string());
    }

    /// Generation counter for the URL entry surface.
    pub fn url_generation(&self) -> u64 {
        self.url_generation
    }

    /// Generation counter for the question entry surface.
    pub fn question_generation(&self) -> u64 {
        self.question_generation
    }

    /// Clear all session state.
    ///
    /// The generation counters are incremented rather than zeroed so a
    /// previously submitted input is never confused with a resubmission of
    /// identical content after the reset.
    pub fn reset(&mut self) {
        self.transcript = None;
        self.summary = None;
        self.history.clear();
        self.last_url = None;
        self.url_generation += 1;
        self.question_generation += 1;
    }
}
