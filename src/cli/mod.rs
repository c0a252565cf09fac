//! CLI module for Gist.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gist - Content Summarization and Q&A
///
/// Turn a media file, document, or hosted video into a summary you can ask
/// questions about.
#[derive(Parser, Debug)]
#[command(name = "gist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive session (load content, then ask questions)
    Run,

    /// Summarize a file or hosted video in one shot
    Summarize {
        /// Path to a video (mp4), audio (mp3/wav), PDF, DOCX, or TXT file
        file: Option<PathBuf>,

        /// Hosted video URL to summarize instead of a file
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Ask a single question about a file or hosted video
    Ask {
        /// The question to ask
        question: String,

        /// Path to the file to question
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Hosted video URL to question instead of a file
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Initialize Gist and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
