//! One-shot ask command.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::input::classify;
use crate::pipeline::Pipeline;
use crate::session::SessionState;
use anyhow::Result;
use std::path::PathBuf;

/// Run the ask command: extract the input, then answer one question.
///
/// The summary step is skipped; only the transcript is needed as grounding
/// context.
pub async fn run_ask(
    question: &str,
    file: Option<PathBuf>,
    url: Option<String>,
    settings: Settings,
) -> Result<()> {
    let operation = match (&file, &url) {
        (Some(path), None) if classify(path).is_media() => Operation::Media,
        (Some(_), None) | (None, Some(_)) => Operation::Session,
        _ => {
            Output::error("Provide exactly one input: --file <path> or --url <link>.");
            anyhow::bail!("invalid input");
        }
    };

    if let Err(e) = preflight::check(operation) {
        Output::error(&format!("{}", e));
        Output::info("Run 'gist doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let pipeline = Pipeline::new(settings)?;
    let mut session = SessionState::new();

    let spinner = Output::spinner("Processing...");
    let ingest = match (&file, &url) {
        (Some(path), None) => pipeline.ingest_file(&mut session, path).await,
        (None, Some(link)) => pipeline.ingest_url(&mut session, link).await,
        _ => unreachable!("validated above"),
    };

    // Summarization failure still leaves the transcript grounded; only bail
    // when extraction itself failed.
    if let Err(e) = ingest {
        if !session.has_transcript() {
            spinner.finish_and_clear();
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    }

    spinner.set_message("Thinking...");
    let result = pipeline.answer(&mut session, question).await;
    spinner.finish_and_clear();

    match result {
        Ok(answer) => {
            println!("{}", answer);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            Err(e.into())
        }
    }
}
