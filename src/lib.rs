//! Gist - Content Summarization and Q&A
//!
//! A CLI tool that turns media files, documents, and hosted videos into a
//! summary you can ask questions about.
//!
//! # Overview
//!
//! Gist allows you to:
//! - Extract text from video/audio files (via Whisper), PDF, DOCX, and TXT
//! - Pull the caption track from a hosted video URL
//! - Summarize the extracted text with a hosted language model
//! - Ask follow-up questions grounded in the extracted text
//!
//! Everything lives in a single interactive session: one transcript, one
//! summary, and an append-only chat history, all cleared by an explicit
//! reset.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `input` - Input classification by file extension
//! - `extract` - Extraction handlers (media, documents, captions)
//! - `transcription` - Speech-to-text transcription
//! - `completion` - Completion backend abstraction and error kinds
//! - `summarize` - Summary generation
//! - `qa` - Grounded question answering
//! - `session` - Per-session state
//! - `pipeline` - Orchestration of the above
//!
//! # Example
//!
//! ```rust,no_run
//! use gist::config::Settings;
//! use gist::pipeline::Pipeline;
//! use gist::session::SessionState;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::new(settings)?;
//!     let mut session = SessionState::new();
//!
//!     pipeline.ingest_file(&mut session, "notes.txt".as_ref()).await?;
//!     println!("{}", session.summary().unwrap_or("no summary"));
//!
//!     let answer = pipeline.answer(&mut session, "What is it about?").await?;
//!     println!("{answer}");
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod extract;
pub mod input;
pub mod openai;
pub mod pipeline;
pub mod qa;
pub mod session;
pub mod summarize;
pub mod transcription;

pub use error::{GistError, Result};
