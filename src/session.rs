//! Per-page transcript cache.
//!
//! A session follows one page as it navigates. The transcript of the current
//! video is kept until the page moves to a different video.

use crate::orchestrator::{Extraction, Orchestrator, SourceFailure};
use crate::page::{video_id_from_address, HostPage};
use tracing::{debug, info};

/// Caller-owned transcript cache for a single page.
///
/// Extraction takes `&mut self`, so triggers on one session never overlap.
pub struct Session {
    orchestrator: Orchestrator,
    identity: Option<String>,
    cached: Option<Extraction>,
    failures: Vec<SourceFailure>,
}

impl Session {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            identity: None,
            cached: None,
            failures: Vec::new(),
        }
    }

    /// Record a navigation to `address`.
    ///
    /// Returns true when the video changed and the cached transcript was
    /// dropped. Addresses without a recognizable video id are compared whole.
    pub fn navigate(&mut self, address: &str) -> bool {
        let identity = video_identity(address);
        if self.identity.as_deref() == Some(identity.as_str()) {
            return false;
        }

        if self.cached.take().is_some() {
            info!("Video changed, dropping cached transcript");
        }
        self.failures.clear();
        debug!("Session now tracks {}", identity);
        self.identity = Some(identity);
        true
    }

    /// Transcript for the page's current video.
    ///
    /// Reuses the cached extraction for the same video unless `force` is set.
    /// A failed run leaves nothing cached, so the next trigger retries.
    pub async fn transcript(&mut self, page: &dyn HostPage, force: bool) -> Option<&Extraction> {
        self.navigate(page.address());

        if force || self.cached.is_none() {
            let report = self.orchestrator.extract(page).await;
            self.cached = report.extraction;
            self.failures = report.failures;
        } else {
            debug!("Using cached transcript");
        }
        self.cached.as_ref()
    }

    pub fn cached(&self) -> Option<&Extraction> {
        self.cached.as_ref()
    }

    /// Sources that failed during the last extraction run.
    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }
}

fn video_identity(address: &str) -> String {
    video_id_from_address(address).unwrap_or_else(|| address.to_string())
}
