//! Hosted-video caption extraction.
//!
//! A URL is reduced to a video identifier, the caption track is fetched from
//! the timedtext endpoint, and the fragments are joined in delivered order.
//!
//! Identifier extraction is deliberately permissive: the substring after the
//! last `v=` marker, the whole input when the marker is absent. A malformed
//! URL therefore yields a wrong identifier rather than a validation error,
//! and the caption service reports the failure.

use crate::error::{GistError, Result};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, instrument};

/// One caption cue from the track.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionFragment {
    /// Cue start, in seconds.
    pub start: f64,
    /// Cue duration, in seconds.
    pub duration: f64,
    /// Cue text.
    pub text: String,
}

/// Trait for caption track providers.
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// Fetch the caption track for a video, in delivered order.
    async fn fetch(&self, video_id: &str) -> Result<Vec<CaptionFragment>>;
}

/// Extract a video identifier from a URL: the substring after the last `v=`.
pub fn extract_video_id(url: &str) -> String {
    match url.rsplit_once("v=") {
        Some((_, id)) => id.to_string(),
        None => url.to_string(),
    }
}

/// Join caption fragments with single-space separators, in delivered order.
pub fn join_fragments(fragments: &[CaptionFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Caption provider backed by the timedtext HTTP endpoint.
pub struct TimedTextClient {
    http: reqwest::Client,
    base_url: String,
    language: String,
}

impl TimedTextClient {
    pub fn new(base_url: &str, language: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
            language: language.to_string(),
        }
    }
}

#[async_trait]
impl CaptionProvider for TimedTextClient {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Vec<CaptionFragment>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("lang", self.language.as_str()), ("v", video_id)])
            .send()
            .await
            .map_err(|e| GistError::CaptionService(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(GistError::VideoUnavailable);
        }
        if !status.is_success() {
            return Err(GistError::CaptionService(format!(
                "caption endpoint returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GistError::CaptionService(e.to_string()))?;

        let fragments = parse_timedtext(&body)?;
        if fragments.is_empty() {
            return Err(GistError::NoCaptions);
        }

        debug!("Fetched {} caption fragments", fragments.len());
        Ok(fragments)
    }
}

/// Parse a timedtext XML caption track into ordered fragments.
pub fn parse_timedtext(xml: &str) -> Result<Vec<CaptionFragment>> {
    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    let mut current: Option<CaptionFragment> = None;

    loop {
        match reader
            .read_event()
            .map_err(|e| GistError::CaptionService(format!("malformed caption track: {e}")))?
        {
            Event::Start(e) if e.local_name().as_ref() == b"text" => {
                let mut fragment = CaptionFragment {
                    start: 0.0,
                    duration: 0.0,
                    text: String::new(),
                };
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                    match (attr.key.as_ref(), value) {
                        (b"start", Some(v)) => fragment.start = v,
                        (b"dur", Some(v)) => fragment.duration = v,
                        _ => {}
                    }
                }
                current = Some(fragment);
            }
            Event::Text(t) => {
                if let Some(fragment) = current.as_mut() {
                    let cue = t.unescape().map_err(|e| {
                        GistError::CaptionService(format!("malformed caption text: {e}"))
                    })?;
                    fragment.text.push_str(&cue);
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"text" => {
                if let Some(fragment) = current.take() {
                    fragments.push(fragment);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=XYZ123"),
            "XYZ123"
        );
    }

    #[test]
    fn test_extract_video_id_uses_last_marker() {
        assert_eq!(extract_video_id("https://example.com/?v=first&u=v=second"), "second");
    }

    #[test]
    fn test_extract_video_id_without_marker_is_permissive() {
        // No validation: the whole input comes back and the caption service
        // gets to reject it.
        assert_eq!(extract_video_id("https://youtu.be/abc"), "https://youtu.be/abc");
        assert_eq!(extract_video_id(""), "");
    }

    #[test]
    fn test_parse_timedtext_preserves_order() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <transcript>
              <text start="0.0" dur="1.5">first cue</text>
              <text start="1.5" dur="2.0">second cue</text>
              <text start="3.5" dur="1.0">third cue</text>
            </transcript>"#;

        let fragments = parse_timedtext(xml).unwrap();
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].text, "first cue");
        assert_eq!(fragments[1].text, "second cue");
        assert_eq!(fragments[2].text, "third cue");
        assert_eq!(fragments[1].start, 1.5);
        assert_eq!(fragments[1].duration, 2.0);
    }

    #[test]
    fn test_parse_timedtext_unescapes_entities() {
        let xml = r#"<transcript><text start="0" dur="1">fish &amp; chips &#39;here&#39;</text></transcript>"#;
        let fragments = parse_timedtext(xml).unwrap();
        assert_eq!(fragments[0].text, "fish & chips 'here'");
    }

    #[test]
    fn test_parse_timedtext_empty_track() {
        assert!(parse_timedtext("").unwrap().is_empty());
        assert!(parse_timedtext("<transcript></transcript>").unwrap().is_empty());
    }

    #[test]
    fn test_join_fragments_single_space() {
        let fragments = vec![
            CaptionFragment { start: 0.0, duration: 1.0, text: "hello".into() },
            CaptionFragment { start: 1.0, duration: 1.0, text: "caption".into() },
            CaptionFragment { start: 2.0, duration: 1.0, text: "world".into() },
        ];
        assert_eq!(join_fragments(&fragments), "hello caption world");
    }
}
