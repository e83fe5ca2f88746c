//! Extraction orchestrator for Recap.
//!
//! Tries each transcript source in priority order and stops at the first one
//! that yields an accepted transcript.

use crate::config::ExtractionSettings;
use crate::error::{ExtractionError, Result};
use crate::extract::{create_source, http_client, SourceKind, TranscriptSource};
use crate::page::HostPage;
use crate::transcript::Transcript;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Where the orchestrator is in a single extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    Idle,
    Trying(SourceKind),
    Succeeded(SourceKind),
    Failed,
}

/// An accepted transcript and the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub transcript: Transcript,
    pub source: SourceKind,
}

/// A source that was tried and came back empty-handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub error: ExtractionError,
}

/// Everything one extraction run did.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub extraction: Option<Extraction>,
    pub failures: Vec<SourceFailure>,
    /// States visited, starting at `Idle` and ending at `Succeeded` or `Failed`.
    pub states: Vec<ExtractionState>,
}

impl ExtractionReport {
    pub fn succeeded(&self) -> bool {
        self.extraction.is_some()
    }

    /// Final state of the run.
    pub fn state(&self) -> ExtractionState {
        self.states.last().copied().unwrap_or(ExtractionState::Idle)
    }

    pub fn into_transcript(self) -> Option<Transcript> {
        self.extraction.map(|e| e.transcript)
    }
}

/// Runs the configured sources against a page.
pub struct Orchestrator {
    sources: Vec<Box<dyn TranscriptSource>>,
}

impl Orchestrator {
    /// Create an orchestrator with the sources and order from `settings`.
    pub fn new(settings: &ExtractionSettings) -> Result<Self> {
        let client = http_client(settings)?;
        Ok(Self::with_client(settings, client))
    }

    /// Create an orchestrator that shares an existing HTTP client.
    pub fn with_client(settings: &ExtractionSettings, client: reqwest::Client) -> Self {
        let sources = settings
            .sources
            .iter()
            .map(|kind| create_source(*kind, settings, client.clone()))
            .collect();
        Self::with_sources(sources)
    }

    /// Create an orchestrator from custom sources, tried in the given order.
    pub fn with_sources(sources: Vec<Box<dyn TranscriptSource>>) -> Self {
        Self { sources }
    }

    /// Source order.
    pub fn order(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|s| s.kind()).collect()
    }

    /// Run every source until one succeeds and report what happened.
    #[instrument(skip_all, fields(address = %page.address()))]
    pub async fn extract(&self, page: &dyn HostPage) -> ExtractionReport {
        let mut states = vec![ExtractionState::Idle];
        let mut failures = Vec::new();

        for source in &self.sources {
            let kind = source.kind();
            states.push(ExtractionState::Trying(kind));
            debug!("Trying {} source", kind);

            match source.probe(page).await {
                Ok(transcript) => {
                    info!(
                        "Transcript from {} source ({} characters)",
                        kind,
                        transcript.len()
                    );
                    states.push(ExtractionState::Succeeded(kind));
                    return ExtractionReport {
                        extraction: Some(Extraction {
                            transcript,
                            source: kind,
                        }),
                        failures,
                        states,
                    };
                }
                Err(error) => {
                    debug!("{} source failed: {}", kind, error);
                    failures.push(SourceFailure {
                        source: kind,
                        error,
                    });
                }
            }
        }

        warn!("No source produced a transcript");
        states.push(ExtractionState::Failed);
        ExtractionReport {
            extraction: None,
            failures,
            states,
        }
    }

    /// Extract a transcript, or `None` when every source failed.
    pub async fn extract_transcript(&self, page: &dyn HostPage) -> Option<Transcript> {
        self.extract(page).await.into_transcript()
    }
}
