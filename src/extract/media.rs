//! Video/audio extraction.
//!
//! The audio track is transcoded to a normalized WAV in a scratch file, the
//! transcription backend is invoked on it, and the text is returned. The
//! scratch file is a [`tempfile::NamedTempFile`], so it is removed when the
//! handle drops on every exit path, including errors.

use crate::error::{GistError, Result};
use crate::transcription::Transcriber;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Extracts text from video and audio files.
pub struct MediaExtractor {
    transcriber: Arc<dyn Transcriber>,
    scratch_dir: PathBuf,
    sample_rate_hz: u32,
}

impl MediaExtractor {
    pub fn new(transcriber: Arc<dyn Transcriber>, scratch_dir: PathBuf, sample_rate_hz: u32) -> Self {
        Self {
            transcriber,
            scratch_dir,
            sample_rate_hz,
        }
    }

    /// Transcode the audio track to WAV and transcribe it.
    #[instrument(skip(self), fields(input = %input.display()))]
    pub async fn extract(&self, input: &Path) -> Result<String> {
        std::fs::create_dir_all(&self.scratch_dir)?;

        let scratch = tempfile::Builder::new()
            .prefix("gist-audio-")
            .suffix(".wav")
            .tempfile_in(&self.scratch_dir)?;

        self.transcode_to_wav(input, scratch.path()).await?;

        let text = self.transcriber.transcribe(scratch.path()).await?;

        debug!("Extracted {} chars from media", text.len());
        Ok(text)
    }

    /// Converts the audio track of a media file to mono PCM WAV using ffmpeg.
    async fn transcode_to_wav(&self, source: &Path, dest: &Path) -> Result<()> {
        debug!("Transcoding {:?} to WAV", source);

        let result = Command::new("ffmpeg")
            .arg("-i").arg(source)
            .arg("-vn")
            .arg("-acodec").arg("pcm_s16le")
            .arg("-ar").arg(self.sample_rate_hz.to_string())
            .arg("-ac").arg("1")
            .arg("-y")
            .arg("-loglevel").arg("error")
            .arg(dest)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => {
                let err = String::from_utf8_lossy(&out.stderr);
                Err(GistError::Extraction(format!(
                    "ffmpeg transcoding failed: {}",
                    err.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(GistError::ToolNotFound("ffmpeg".into()))
            }
            Err(e) => Err(GistError::ToolFailed(format!("ffmpeg error: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FailingTranscriber;

    #[async_trait]
    impl Transcriber for FailingTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
            Err(GistError::Transcription("backend down".into()))
        }
    }

    #[tokio::test]
    async fn test_scratch_dir_left_empty_after_failure() {
        // ffmpeg rejects the bogus input (or is missing entirely); either
        // way the scratch WAV must not be left behind.
        let scratch = tempfile::tempdir().unwrap();
        let input = scratch.path().join("bogus.mp3");
        tokio::fs::write(&input, b"not audio").await.unwrap();

        let extractor = MediaExtractor::new(
            Arc::new(FailingTranscriber),
            scratch.path().to_path_buf(),
            16_000,
        );

        let result = extractor.extract(&input).await;
        assert!(result.is_err());

        let leftovers: Vec<_> = std::fs::read_dir(scratch.path())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().starts_with("gist-audio-"))
            .collect();
        assert!(leftovers.is_empty(), "scratch file leaked: {leftovers:?}");
    }
}
