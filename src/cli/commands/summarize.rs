//! Summarize and Q&A command implementations.

use super::fetch_transcript;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::summary::Summarizer;
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(input: &str, qa: bool, settings: Settings) -> Result<()> {
    let summarizer = prepare(&settings)?;
    let fetched = fetch_transcript(input, &settings).await?;

    let spinner = Output::spinner(&format!("Summarizing with {}...", settings.summary.model));
    let summary = summarizer
        .summarize(&fetched.metadata, &fetched.extraction.transcript)
        .await;
    spinner.finish_and_clear();

    Output::header(&fetched.metadata.title);
    println!("\n{}\n", summary?);

    if qa {
        print_qa(&summarizer, &fetched, &settings).await?;
    }

    Ok(())
}

/// Run the qa command.
pub async fn run_qa(input: &str, settings: Settings) -> Result<()> {
    let summarizer = prepare(&settings)?;
    let fetched = fetch_transcript(input, &settings).await?;
    print_qa(&summarizer, &fetched, &settings).await
}

fn prepare(settings: &Settings) -> Result<Summarizer> {
    if let Err(e) = preflight::check(Operation::Summarize) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    Ok(Summarizer::new(settings.summary.clone(), prompts)?)
}

async fn print_qa(
    summarizer: &Summarizer,
    fetched: &super::FetchedTranscript,
    settings: &Settings,
) -> Result<()> {
    let spinner = Output::spinner(&format!("Extracting Q&A with {}...", settings.summary.model));
    let qa = summarizer
        .extract_qa(&fetched.metadata, &fetched.extraction.transcript)
        .await;
    spinner.finish_and_clear();

    Output::header("Questions & Answers");
    println!("\n{}\n", qa?);
    Ok(())
}
