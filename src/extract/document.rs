//! Document extraction (PDF, DOCX, TXT).
//!
//! PDF pages and DOCX paragraphs are concatenated in document order with
//! newline separators. Parsing is CPU-bound, so PDF and DOCX run under
//! `spawn_blocking` to keep the async executor free.

use crate::error::{GistError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::debug;

/// Extract text from a PDF, page by page in document order.
pub async fn extract_pdf(bytes: Vec<u8>) -> Result<String> {
    let text = tokio::task::spawn_blocking(move || pdf_text(&bytes))
        .await
        .map_err(|e| GistError::Extraction(format!("PDF extraction task panicked: {e}")))??;

    debug!("Extracted {} chars from PDF", text.len());
    Ok(text)
}

fn pdf_text(bytes: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| GistError::Extraction(format!("Failed to parse PDF: {e}")))?;

    let mut text = String::new();
    // get_pages is keyed by page number, so iteration follows document order.
    for (&page_number, _) in doc.get_pages().iter() {
        let page_text = doc
            .extract_text(&[page_number])
            .map_err(|e| GistError::Extraction(format!("Failed to extract page {page_number}: {e}")))?;
        text.push_str(&page_text);
        text.push('\n');
    }

    Ok(text)
}

/// Extract text from a DOCX, paragraph by paragraph in document order.
pub async fn extract_docx(bytes: Vec<u8>) -> Result<String> {
    let text = tokio::task::spawn_blocking(move || docx_text(&bytes))
        .await
        .map_err(|e| GistError::Extraction(format!("DOCX extraction task panicked: {e}")))??;

    debug!("Extracted {} chars from DOCX", text.len());
    Ok(text)
}

fn docx_text(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| GistError::Extraction(format!("Failed to open DOCX container: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| GistError::Extraction(format!("DOCX has no document body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| GistError::Extraction(format!("Failed to read DOCX body: {e}")))?;

    paragraphs_from_xml(&xml)
}

/// Collect `w:t` text runs from a WordprocessingML body, one line per `w:p`.
fn paragraphs_from_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut paragraph = String::new();
    let mut in_run = false;

    loop {
        match reader
            .read_event()
            .map_err(|e| GistError::Extraction(format!("Malformed DOCX XML: {e}")))?
        {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_run = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run = false,
                b"p" => {
                    text.push_str(&paragraph);
                    text.push('\n');
                    paragraph.clear();
                }
                _ => {}
            },
            Event::Text(t) if in_run => {
                let run = t
                    .unescape()
                    .map_err(|e| GistError::Extraction(format!("Malformed DOCX text: {e}")))?;
                paragraph.push_str(&run);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Decode raw bytes as UTF-8 text verbatim.
pub fn extract_txt(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| GistError::Extraction(format!("File is not valid UTF-8: {e}")))
}
