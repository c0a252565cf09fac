//! Pipeline orchestration.
//!
//! Coordinates the flow from input classification through extraction,
//! session storage, summarization, and question answering. The pipeline owns
//! the backends; the caller owns the [`SessionState`] and passes it in
//! explicitly.

use crate::completion::{CompletionBackend, OpenAIBackend};
use crate::config::{Prompts, Settings};
use crate::error::{GistError, Result};
use crate::extract::{
    extract_video_id, join_fragments, CaptionProvider, Extractor, MediaExtractor, TimedTextClient,
};
use crate::input::{classify, InputKind};
use crate::qa::QaResponder;
use crate::session::SessionState;
use crate::summarize::Summarizer;
use crate::transcription::{Transcriber, WhisperTranscriber};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The main pipeline for one interactive session.
pub struct Pipeline {
    extractor: Extractor,
    captions: Arc<dyn CaptionProvider>,
    summarizer: Summarizer,
    qa: QaResponder,
}

impl Pipeline {
    /// Create a pipeline with the production backends.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperTranscriber::with_config(
            &settings.transcription.model,
            settings.transcription.language.as_deref(),
        ));

        let captions: Arc<dyn CaptionProvider> = Arc::new(TimedTextClient::new(
            &settings.captions.base_url,
            &settings.captions.language,
        ));

        let backend: Arc<dyn CompletionBackend> = Arc::new(OpenAIBackend::new());

        Ok(Self::with_components(
            settings,
            prompts,
            transcriber,
            captions,
            backend,
        ))
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        transcriber: Arc<dyn Transcriber>,
        captions: Arc<dyn CaptionProvider>,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        let media = MediaExtractor::new(
            transcriber,
            settings.temp_dir(),
            settings.transcription.sample_rate_hz,
        );

        let summarizer = Summarizer::new(
            backend.clone(),
            &settings.summarizer.model,
            settings.summarizer.max_tokens,
            prompts.clone(),
        );

        let qa = QaResponder::new(
            backend,
            &settings.qa.model,
            settings.qa.max_tokens,
            prompts,
        );

        Self {
            extractor: Extractor::new(media),
            captions,
            summarizer,
            qa,
        }
    }

    /// Process an uploaded file: classify, extract, store, summarize.
    ///
    /// On an unsupported extension no handler runs and the session is
    /// untouched. On summarization failure the transcript stays loaded and
    /// the error propagates; the summary remains unset.
    #[instrument(skip(self, session), fields(path = %path.display()))]
    pub async fn ingest_file(&self, session: &mut SessionState, path: &Path) -> Result<()> {
        let kind = classify(path);
        if let InputKind::Unsupported(name) = &kind {
            return Err(GistError::UnsupportedInput(name.clone()));
        }

        if session.has_transcript() {
            return Err(GistError::TranscriptAlreadyLoaded);
        }

        info!("Processing {} input", kind.describe());
        let transcript = self.extractor.extract(&kind).await?;
        session.set_transcript(transcript)?;

        self.summarize_into(session).await
    }

    /// Process a hosted-video URL: fetch captions, store, summarize.
    ///
    /// A resubmission of the last processed URL is ignored.
    #[instrument(skip(self, session), fields(url = %url))]
    pub async fn ingest_url(&self, session: &mut SessionState, url: &str) -> Result<()> {
        if session.is_duplicate_url(url) {
            debug!("Ignoring duplicate URL submission");
            return Ok(());
        }

        if session.has_transcript() {
            return Err(GistError::TranscriptAlreadyLoaded);
        }

        let video_id = extract_video_id(url);
        info!("Fetching caption track for {}", video_id);

        let fragments = self.captions.fetch(&video_id).await?;
        session.set_transcript(join_fragments(&fragments))?;
        session.record_url(url);

        self.summarize_into(session).await
    }

    /// Answer a question against the session transcript.
    pub async fn answer(&self, session: &mut SessionState, question: &str) -> Result<String> {
        self.qa.answer(session, question).await
    }

    async fn summarize_into(&self, session: &mut SessionState) -> Result<()> {
        let transcript = session
            .transcript()
            .expect("transcript is set before summarization")
            .to_string();

        let summary = self.summarizer.summarize(&transcript).await?;
        session.set_summary(summary);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionError, CompletionRequest};
    use crate::extract::CaptionFragment;
    use crate::session::Speaker;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoBackend {
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl EchoBackend {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for EchoBackend {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<String, CompletionError> {
            self.requests.lock().unwrap().push(request);
            Ok("backend reply".to_string())
        }
    }

    struct FixedCaptions {
        fragments: Vec<CaptionFragment>,
    }

    #[async_trait]
    impl CaptionProvider for FixedCaptions {
        async fn fetch(&self, _video_id: &str) -> Result<Vec<CaptionFragment>> {
            if self.fragments.is_empty() {
                return Err(GistError::NoCaptions);
            }
            Ok(self.fragments.clone())
        }
    }

    struct PanickingTranscriber;

    #[async_trait]
    impl Transcriber for PanickingTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
            panic!("transcriber must not run for document inputs");
        }
    }

    fn test_pipeline(
        backend: Arc<EchoBackend>,
        fragments: Vec<CaptionFragment>,
    ) -> (Pipeline, tempfile::TempDir) {
        let scratch = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.temp_dir = scratch.path().display().to_string();

        let pipeline = Pipeline::with_components(
            settings,
            Prompts::default(),
            Arc::new(PanickingTranscriber),
            Arc::new(FixedCaptions { fragments }),
            backend,
        );
        (pipeline, scratch)
    }

    fn cue(text: &str) -> CaptionFragment {
        CaptionFragment {
            start: 0.0,
            duration: 1.0,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_txt_upload_end_to_end() {
        let backend = Arc::new(EchoBackend::new());
        let (pipeline, scratch) = test_pipeline(backend.clone(), Vec::new());

        let file = scratch.path().join("notes.txt");
        tokio::fs::write(&file, "hello world").await.unwrap();

        let mut session = SessionState::new();
        pipeline.ingest_file(&mut session, &file).await.unwrap();

        assert_eq!(session.transcript(), Some("hello world"));
        assert_eq!(session.summary(), Some("backend reply"));

        {
            let requests = backend.requests.lock().unwrap();
            assert_eq!(requests.len(), 1);
            assert!(requests[0].user.contains("hello world"));
            assert_eq!(requests[0].max_tokens, 500);
        }

        let answer = pipeline
            .answer(&mut session, "What does it say?")
            .await
            .unwrap();
        assert_eq!(answer, "backend reply");

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].user.contains("Context: hello world"));
        assert_eq!(requests[1].max_tokens, 700);
    }

    #[tokio::test]
    async fn test_unsupported_extension_leaves_state_unchanged() {
        let backend = Arc::new(EchoBackend::new());
        let (pipeline, scratch) = test_pipeline(backend.clone(), Vec::new());

        let file = scratch.path().join("image.png");
        tokio::fs::write(&file, b"not really a png").await.unwrap();

        let mut session = SessionState::new();
        let err = pipeline.ingest_file(&mut session, &file).await.unwrap_err();

        assert!(matches!(err, GistError::UnsupportedInput(_)));
        assert!(session.transcript().is_none());
        assert!(session.summary().is_none());
        assert!(session.history().is_empty());
        assert_eq!(backend.requests.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_second_upload_rejected_until_reset() {
        let backend = Arc::new(EchoBackend::new());
        let (pipeline, scratch) = test_pipeline(backend, Vec::new());

        let file = scratch.path().join("notes.txt");
        tokio::fs::write(&file, "hello world").await.unwrap();

        let mut session = SessionState::new();
        pipeline.ingest_file(&mut session, &file).await.unwrap();

        let err = pipeline.ingest_file(&mut session, &file).await.unwrap_err();
        assert!(matches!(err, GistError::TranscriptAlreadyLoaded));

        session.reset();
        pipeline.ingest_file(&mut session, &file).await.unwrap();
        assert_eq!(session.transcript(), Some("hello world"));
    }

    #[tokio::test]
    async fn test_url_ingest_joins_fragments_and_records_url() {
        let backend = Arc::new(EchoBackend::new());
        let fragments = vec![cue("hello"), cue("caption"), cue("world")];
        let (pipeline, _scratch) = test_pipeline(backend.clone(), fragments);

        let mut session = SessionState::new();
        let url = "https://www.youtube.com/watch?v=XYZ123";
        pipeline.ingest_url(&mut session, url).await.unwrap();

        assert_eq!(session.transcript(), Some("hello caption world"));
        assert_eq!(session.summary(), Some("backend reply"));
        assert!(session.is_duplicate_url(url));

        // Resubmitting the same URL is a no-op: no second summarization.
        pipeline.ingest_url(&mut session, url).await.unwrap();
        assert_eq!(backend.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_url_without_captions_stores_nothing() {
        let backend = Arc::new(EchoBackend::new());
        let (pipeline, _scratch) = test_pipeline(backend.clone(), Vec::new());

        let mut session = SessionState::new();
        let err = pipeline
            .ingest_url(&mut session, "https://www.youtube.com/watch?v=XYZ123")
            .await
            .unwrap_err();

        assert!(matches!(err, GistError::NoCaptions));
        assert!(session.transcript().is_none());
        assert!(!session.is_duplicate_url("https://www.youtube.com/watch?v=XYZ123"));
        assert_eq!(backend.requests.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_question_before_content_is_local() {
        let backend = Arc::new(EchoBackend::new());
        let (pipeline, _scratch) = test_pipeline(backend.clone(), Vec::new());

        let mut session = SessionState::new();
        let answer = pipeline
            .answer(&mut session, "What does it say?")
            .await
            .unwrap();

        assert_eq!(answer, crate::qa::NO_CONTENT_MESSAGE);
        assert_eq!(backend.requests.lock().unwrap().len(), 0);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].speaker, Speaker::Assistant);
    }
}
