//! Transcript sources.
//!
//! Each source is one independent strategy for pulling caption text out of a
//! host page. They share a single capability, [`TranscriptSource::probe`], and
//! the [`crate::orchestrator::Orchestrator`] tries them in order.
//!
//! - [`EmbeddedDataSource`]: caption tracks listed in the page's inline player data
//! - [`ApiSource`]: the host's internal transcript endpoint
//! - [`DomSource`]: the rendered transcript panel

mod api;
mod dom;
mod embedded;
mod params;

pub use api::{transcript_from_response, ApiSource};
pub use dom::{find_transcript_toggle, segments_transcript, DomSource};
pub use embedded::{caption_tracks_from_scripts, extract_json_array, EmbeddedDataSource};
pub use params::encode_transcript_params;

use crate::config::ExtractionSettings;
use crate::error::{ExtractionResult, Result};
use crate::page::HostPage;
use crate::transcript::Transcript;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identifies a transcript source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Caption tracks embedded in the page's inline scripts.
    Embedded,
    /// The internal transcript API.
    Api,
    /// The rendered transcript panel.
    Dom,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "embedded" => Ok(SourceKind::Embedded),
            "api" => Ok(SourceKind::Api),
            "dom" => Ok(SourceKind::Dom),
            _ => Err(format!("Unknown transcript source: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Embedded => write!(f, "embedded"),
            SourceKind::Api => write!(f, "api"),
            SourceKind::Dom => write!(f, "dom"),
        }
    }
}

/// A strategy that tries to produce a transcript from the current page.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> SourceKind;

    /// Try to extract a transcript.
    ///
    /// Every failure is reported as an error value; a source never panics on
    /// page or network data.
    async fn probe(&self, page: &dyn HostPage) -> ExtractionResult<Transcript>;
}

/// Build the HTTP client used for page, caption and internal API requests.
pub fn http_client(settings: &ExtractionSettings) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(settings.http_timeout())
        .user_agent(settings.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Create the source for `kind`.
pub fn create_source(
    kind: SourceKind,
    settings: &ExtractionSettings,
    client: reqwest::Client,
) -> Box<dyn TranscriptSource> {
    match kind {
        SourceKind::Embedded => Box::new(EmbeddedDataSource::new(client)),
        SourceKind::Api => Box::new(ApiSource::new(client, settings)),
        SourceKind::Dom => Box::new(DomSource::new(settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_kind() {
        assert_eq!("embedded".parse::<SourceKind>().unwrap(), SourceKind::Embedded);
        assert_eq!("API".parse::<SourceKind>().unwrap(), SourceKind::Api);
        assert_eq!("dom".parse::<SourceKind>().unwrap(), SourceKind::Dom);
        assert!("ocr".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_create_source_matches_kind() {
        let settings = ExtractionSettings::default();
        let client = http_client(&settings).unwrap();
        for kind in [SourceKind::Embedded, SourceKind::Api, SourceKind::Dom] {
            assert_eq!(create_source(kind, &settings, client.clone()).kind(), kind);
        }
    }
}
