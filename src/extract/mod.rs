//! Extraction handlers.
//!
//! One handler per input kind, each producing a plain-text transcript.
//! Dispatch is an exhaustive match over [`InputKind`]; unsupported inputs
//! never reach a handler.

pub mod captions;
mod document;
mod media;

pub use captions::{
    extract_video_id, join_fragments, CaptionFragment, CaptionProvider, TimedTextClient,
};
pub use media::MediaExtractor;

use crate::error::{GistError, Result};
use crate::input::InputKind;
use tracing::instrument;

/// Dispatches a classified upload to its extraction handler.
pub struct Extractor {
    media: MediaExtractor,
}

impl Extractor {
    pub fn new(media: MediaExtractor) -> Self {
        Self { media }
    }

    /// Extract plain text from a classified upload.
    #[instrument(skip(self), fields(kind = kind.describe()))]
    pub async fn extract(&self, kind: &InputKind) -> Result<String> {
        match kind {
            InputKind::Video(path) | InputKind::Audio(path) => self.media.extract(path).await,
            InputKind::Pdf(path) => {
                let bytes = tokio::fs::read(path).await?;
                document::extract_pdf(bytes).await
            }
            InputKind::Docx(path) => {
                let bytes = tokio::fs::read(path).await?;
                document::extract_docx(bytes).await
            }
            InputKind::Text(path) => {
                let bytes = tokio::fs::read(path).await?;
                document::extract_txt(&bytes)
            }
            InputKind::Unsupported(name) => Err(GistError::UnsupportedInput(name.clone())),
        }
    }
}
