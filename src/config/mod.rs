//! Configuration module for Gist.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts, SummaryPrompts};
pub use settings::{
    CaptionSettings, GeneralSettings, PromptSettings, QaSettings, Settings, SummarizerSettings,
    TranscriptionSettings,
};
