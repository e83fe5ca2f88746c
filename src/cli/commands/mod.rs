//! CLI command implementations.

mod config;
mod summarize;
mod transcript;

pub use config::run_config;
pub use summarize::{run_qa, run_summarize};
pub use transcript::run_transcript;

use crate::cli::Output;
use crate::config::Settings;
use crate::error::RecapError;
use crate::extract::http_client;
use crate::orchestrator::{Extraction, Orchestrator};
use crate::page::{resolve_watch_url, video_id_from_address, SnapshotPage, VideoMetadata};
use crate::session::Session;
use crate::summary::{estimate_tokens, format_token_count};
use anyhow::Result;

/// A transcript together with the page it came from.
pub(crate) struct FetchedTranscript {
    pub video_id: String,
    pub metadata: VideoMetadata,
    pub extraction: Extraction,
}

/// Fetch the watch page for `input` and run the extraction pipeline on it.
pub(crate) async fn fetch_transcript(input: &str, settings: &Settings) -> Result<FetchedTranscript> {
    let url = resolve_watch_url(input)?;
    let video_id = video_id_from_address(&url).unwrap_or_default();

    let client = http_client(&settings.extraction)?;
    Output::info(&format!("Processing: {}", url));
    let spinner = Output::spinner("Fetching video page...");
    let page = match SnapshotPage::fetch(&client, &url, &settings.extraction.hl).await {
        Ok(page) => page,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to fetch {}: {}", url, e));
            return Err(e.into());
        }
    };
    let metadata = VideoMetadata::from_document(page.html(), &url);

    spinner.set_message("Extracting transcript...");
    let mut session = Session::new(Orchestrator::with_client(&settings.extraction, client));
    let extraction = session.transcript(&page, false).await.cloned();
    spinner.finish_and_clear();

    let Some(extraction) = extraction else {
        Output::error(&RecapError::NoTranscript.to_string());
        for failure in session.failures() {
            Output::list_item(&format!("{}: {}", failure.source, failure.error));
        }
        return Err(RecapError::NoTranscript.into());
    };

    Output::success(&format!("Transcript for '{}'", metadata.title));
    if let Some(channel) = &metadata.channel {
        Output::kv("Channel", channel);
    }
    Output::kv("Source", &extraction.source.to_string());
    Output::kv(
        "Length",
        &format!(
            "{} characters ({} tokens)",
            extraction.transcript.len(),
            format_token_count(estimate_tokens(extraction.transcript.as_str()))
        ),
    );

    Ok(FetchedTranscript {
        video_id,
        metadata,
        extraction,
    })
}
