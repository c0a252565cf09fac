//! Input classification.
//!
//! Maps an uploaded file to the extraction handler that should process it.
//! URLs never pass through here; the hosted-video surface routes straight to
//! the caption handler.

use std::path::{Path, PathBuf};

/// A classified upload, carrying the path the handler will read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// `.mp4` video file; the audio track is transcribed.
    Video(PathBuf),
    /// `.mp3` or `.wav` audio file.
    Audio(PathBuf),
    /// `.pdf` document.
    Pdf(PathBuf),
    /// `.docx` document.
    Docx(PathBuf),
    /// `.txt` plain-text file.
    Text(PathBuf),
    /// Anything else; no handler runs.
    Unsupported(String),
}

impl InputKind {
    /// Short label for status messages.
    pub fn describe(&self) -> &'static str {
        match self {
            InputKind::Video(_) => "video",
            InputKind::Audio(_) => "audio",
            InputKind::Pdf(_) => "PDF",
            InputKind::Docx(_) => "DOCX",
            InputKind::Text(_) => "text",
            InputKind::Unsupported(_) => "unsupported",
        }
    }

    /// Whether this kind needs the media toolchain (ffmpeg + Whisper).
    pub fn is_media(&self) -> bool {
        matches!(self, InputKind::Video(_) | InputKind::Audio(_))
    }
}

/// Classify an upload by its file extension (case-insensitive).
pub fn classify(path: &Path) -> InputKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" => InputKind::Video(path.to_path_buf()),
        "mp3" | "wav" => InputKind::Audio(path.to_path_buf()),
        "pdf" => InputKind::Pdf(path.to_path_buf()),
        "docx" => InputKind::Docx(path.to_path_buf()),
        "txt" => InputKind::Text(path.to_path_buf()),
        _ => InputKind::Unsupported(path.display().to_string()),
    }
}
