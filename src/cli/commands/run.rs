//! Interactive session command.
//!
//! The session loop is the interactive surface: `load` is the file-upload
//! surface, `url` is the hosted-video entry surface, and any other input is
//! a question against the loaded content.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::GistError;
use crate::input::classify;
use crate::pipeline::Pipeline;
use crate::session::SessionState;
use console::style;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Run the interactive session command.
pub async fn run_session(settings: Settings) -> anyhow::Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Session) {
        Output::error(&format!("{}", e));
        Output::info("Run 'gist doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let pipeline = Pipeline::new(settings)?;
    let mut session = SessionState::new();

    println!("\n{}", style("Gist Session").bold().cyan());
    println!(
        "{}\n",
        style(
            "Load content with 'load <file>' or 'url <link>', then type questions. \
             'help' lists all commands."
        )
        .dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("gist>").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break; // EOF
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };

        match command.to_ascii_lowercase().as_str() {
            "exit" | "quit" => {
                Output::info("Goodbye!");
                break;
            }
            "help" => print_help(),
            "load" => handle_load(&pipeline, &mut session, rest).await,
            "url" => handle_url(&pipeline, &mut session, rest).await,
            "summary" => match session.summary() {
                Some(summary) => Output::summary(summary),
                None => Output::info("No summary yet. Load content first."),
            },
            "transcript" => match session.transcript() {
                Some(text) => Output::transcript_preview(text, 2000),
                None => Output::info("No transcript yet. Load content first."),
            },
            "history" => {
                if session.history().is_empty() {
                    Output::info("No questions asked yet.");
                } else {
                    println!();
                    for turn in session.history() {
                        Output::chat_turn(turn);
                    }
                    println!();
                }
            }
            "status" => print_status(&session),
            "save" => handle_save(&session, rest),
            "reset" => {
                session.reset();
                Output::info("Session cleared.");
            }
            _ => handle_question(&pipeline, &mut session, input).await,
        }
    }

    Ok(())
}

async fn handle_load(pipeline: &Pipeline, session: &mut SessionState, arg: &str) {
    if arg.is_empty() {
        Output::warning("Usage: load <file>");
        return;
    }

    let path = Path::new(arg);
    let kind = classify(path);

    if kind.is_media() {
        if let Err(e) = preflight::check(Operation::Media) {
            Output::error(&format!("{}", e));
            return;
        }
    }

    let spinner = Output::spinner(&format!("Processing {}...", kind.describe()));
    let result = pipeline.ingest_file(session, path).await;
    spinner.finish_and_clear();

    report_ingest(session, result);
}

async fn handle_url(pipeline: &Pipeline, session: &mut SessionState, arg: &str) {
    if arg.is_empty() {
        Output::warning("Usage: url <link>");
        return;
    }

    if session.is_duplicate_url(arg) {
        Output::info("That URL is already loaded.");
        return;
    }

    let spinner = Output::spinner("Fetching captions...");
    let result = pipeline.ingest_url(session, arg).await;
    spinner.finish_and_clear();

    report_ingest(session, result);
}

async fn handle_question(pipeline: &Pipeline, session: &mut SessionState, question: &str) {
    let spinner = Output::spinner("Thinking...");
    let result = pipeline.answer(session, question).await;
    spinner.finish_and_clear();

    match result {
        Ok(answer) => println!("\n{} {}\n", style("Gist:").cyan().bold(), answer),
        Err(e) => Output::error(&format!("{}", e)),
    }
}

fn report_ingest(session: &SessionState, result: crate::error::Result<()>) {
    match result {
        Ok(()) => {
            if let Some(summary) = session.summary() {
                Output::summary(summary);
            }
        }
        Err(GistError::TranscriptAlreadyLoaded) => {
            Output::warning("A transcript is already loaded. Use 'reset' to start over.");
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            if session.has_transcript() {
                // Extraction worked, summarization didn't; questions still work.
                Output::info("Transcript loaded; summary unavailable. You can still ask questions.");
            }
        }
    }
}

fn handle_save(session: &SessionState, arg: &str) {
    if arg.is_empty() {
        Output::warning("Usage: save <file>");
        return;
    }

    let export = serde_json::json!({
        "transcript": session.transcript(),
        "summary": session.summary(),
        "history": session.history(),
    });

    let result = serde_json::to_string_pretty(&export)
        .map_err(anyhow::Error::from)
        .and_then(|json| std::fs::write(arg, json).map_err(anyhow::Error::from));

    match result {
        Ok(()) => Output::success(&format!("Session saved to {}", arg)),
        Err(e) => Output::error(&format!("Failed to save session: {}", e)),
    }
}

fn print_status(session: &SessionState) {
    Output::header("Session Status");
    Output::kv(
        "transcript",
        &session
            .transcript()
            .map(|t| format!("{} chars", t.chars().count()))
            .unwrap_or_else(|| "not loaded".to_string()),
    );
    Output::kv(
        "summary",
        if session.summary().is_some() { "ready" } else { "not generated" },
    );
    Output::kv("history turns", &session.history().len().to_string());
    Output::kv(
        "input generation",
        &format!(
            "url {} / question {}",
            session.url_generation(),
            session.question_generation()
        ),
    );
    println!();
}

fn print_help() {
    Output::header("Commands");
    Output::kv("load <file>", "extract and summarize a media or document file");
    Output::kv("url <link>", "fetch and summarize a hosted video's captions");
    Output::kv("summary", "show the current summary");
    Output::kv("transcript", "show the extracted transcript");
    Output::kv("history", "show the question history");
    Output::kv("status", "show session status");
    Output::kv("save <file>", "write the session to a JSON file");
    Output::kv("reset", "clear the session");
    Output::kv("exit", "leave the session");
    println!("\nAnything else is treated as a question about the loaded content.\n");
}
