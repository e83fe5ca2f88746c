//! Transcript command implementation.

use super::fetch_transcript;
use crate::cli::preflight::{self, Operation};
use crate::cli::{content_preview, Output};
use crate::config::Settings;
use crate::extract::SourceKind;
use anyhow::Result;
use serde::Serialize;

/// JSON form of an extracted transcript.
#[derive(Debug, Serialize)]
struct TranscriptOutput<'a> {
    video_id: &'a str,
    source: SourceKind,
    characters: usize,
    transcript: &'a str,
}

/// Run the transcript command.
pub async fn run_transcript(
    input: &str,
    output: Option<String>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    preflight::check(Operation::Extract)?;

    let fetched = fetch_transcript(input, &settings).await?;
    let transcript = &fetched.extraction.transcript;

    let content = if json {
        serde_json::to_string_pretty(&TranscriptOutput {
            video_id: &fetched.video_id,
            source: fetched.extraction.source,
            characters: transcript.len(),
            transcript: transcript.as_str(),
        })?
    } else {
        transcript.to_string()
    };

    match output.as_deref() {
        None | Some("-") => println!("{}", content),
        Some(path) => {
            let path = Settings::expand_path(path);
            std::fs::write(&path, format!("{}\n", content))?;
            Output::success(&format!("Saved transcript to {}", path.display()));
            Output::kv("Preview", &content_preview(transcript.as_str(), 120));
        }
    }

    Ok(())
}
