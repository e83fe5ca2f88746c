//! Transcript from the rendered transcript panel.

use super::{SourceKind, TranscriptSource};
use crate::config::ExtractionSettings;
use crate::error::{ExtractionError, ExtractionResult};
use crate::page::HostPage;
use crate::transcript::Transcript;
use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Timestamps left in the panel's flattened text.
static TIMESTAMP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n0-9:]+").expect("Invalid regex"));

/// Opens the page's transcript panel and scrapes the rendered segments.
///
/// Slowest and most sensitive to markup changes of the three sources.
pub struct DomSource {
    poll_interval: Duration,
    min_ready_state: u8,
    settle_delay: Duration,
    toggle_labels: Vec<String>,
    segments_selector: String,
}

impl DomSource {
    pub fn new(settings: &ExtractionSettings) -> Self {
        Self {
            poll_interval: settings.ready_poll_interval(),
            min_ready_state: settings.min_ready_state,
            settle_delay: settings.panel_settle_delay(),
            toggle_labels: settings
                .transcript_button_labels
                .iter()
                .map(|l| l.to_lowercase())
                .collect(),
            segments_selector: settings.segments_selector.clone(),
        }
    }

    /// Wait until the video element has loaded enough to render the page.
    ///
    /// Unbounded: the caller owns any overall timeout.
    async fn wait_for_video(&self, page: &dyn HostPage) {
        let mut polls = 0u32;
        loop {
            match page.video_ready_state().await {
                Some(state) if state >= self.min_ready_state => break,
                _ => {
                    polls += 1;
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
        debug!("Video ready after {} polls", polls);
    }

    async fn document(&self, page: &dyn HostPage) -> ExtractionResult<String> {
        page.document()
            .await
            .map_err(|e| ExtractionError::not_found(format!("page document unavailable: {}", e)))
    }
}

#[async_trait]
impl TranscriptSource for DomSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Dom
    }

    #[instrument(skip_all, fields(source = "dom"))]
    async fn probe(&self, page: &dyn HostPage) -> ExtractionResult<Transcript> {
        self.wait_for_video(page).await;

        let html = self.document(page).await?;
        match find_transcript_toggle(&html, &self.toggle_labels) {
            Some(selector) => {
                debug!("Opening transcript panel via {}", selector);
                if let Err(e) = page.activate(&selector).await {
                    warn!("Failed to activate transcript toggle: {}", e);
                }
                tokio::time::sleep(self.settle_delay).await;
            }
            None => debug!("No transcript toggle found"),
        }

        let html = self.document(page).await?;
        segments_transcript(&html, &self.segments_selector)
    }
}

/// Find the transcript toggle and return a selector that targets it.
///
/// `labels` are lowercase fragments in priority order; the first fragment
/// that matches any element's `aria-label` wins.
pub fn find_transcript_toggle(html: &str, labels: &[String]) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("[aria-label]").expect("Invalid selector");

    let candidates: Vec<(&str, &str)> = document
        .select(&selector)
        .filter_map(|el| {
            el.value()
                .attr("aria-label")
                .map(|label| (el.value().name(), label))
        })
        .collect();

    labels.iter().find_map(|wanted| {
        candidates
            .iter()
            .find(|(_, label)| label.to_lowercase().contains(wanted.as_str()))
            .map(|(tag, label)| format!("{}[aria-label=\"{}\"]", tag, escape_attr(label)))
    })
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Read the transcript out of the rendered segments container.
///
/// Per-segment `data-text` attributes are preferred. Without them, the
/// container's flattened text is used after timestamps are stripped.
pub fn segments_transcript(html: &str, container_selector: &str) -> ExtractionResult<Transcript> {
    let document = Html::parse_document(html);
    let container_sel = Selector::parse(container_selector).map_err(|e| {
        ExtractionError::malformed(format!("segments selector {}: {:?}", container_selector, e))
    })?;
    let container = document
        .select(&container_sel)
        .next()
        .ok_or_else(|| ExtractionError::not_found("no transcript segments container"))?;

    let segment_sel = Selector::parse("[data-text]").expect("Invalid selector");
    let segments: Vec<String> = container
        .select(&segment_sel)
        .map(|el| match el.value().attr("data-text") {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => el.text().collect(),
        })
        .collect();

    if !segments.is_empty() {
        debug!("Read {} data-text segments", segments.len());
        return Transcript::from_fragments(segments);
    }

    let flattened: String = container.text().collect();
    let stripped = TIMESTAMP_REGEX.replace_all(&flattened, "");
    Transcript::from_text(&stripped)
}
