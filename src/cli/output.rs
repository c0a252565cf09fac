//! CLI output formatting utilities.

use crate::session::{ChatTurn, Speaker};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a summary block.
    pub fn summary(text: &str) {
        println!("\n{}", style("Summary:").bold());
        println!("{}\n", text);
    }

    /// Print one chat turn.
    pub fn chat_turn(turn: &ChatTurn) {
        let label = match turn.speaker {
            Speaker::User => style(format!("{}:", turn.speaker)).green().bold(),
            Speaker::Assistant => style(format!("{}:", turn.speaker)).cyan().bold(),
        };
        println!("{} {}", label, turn.text);
    }

    /// Print a truncated transcript preview.
    pub fn transcript_preview(text: &str, max_chars: usize) {
        println!("\n{}", style("Transcript:").bold());
        if text.chars().count() <= max_chars {
            println!("{}\n", text);
        } else {
            let preview: String = text.chars().take(max_chars).collect();
            println!(
                "{}\n{}\n",
                preview,
                style(format!("... ({} chars total)", text.chars().count())).dim()
            );
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
