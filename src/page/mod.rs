//! Host page abstraction.
//!
//! The extractors never talk to a browser directly. They read the page through
//! [`HostPage`]: its address, its current rendered markup, the ready state of
//! its video element, and a way to activate a control. A live browser bridge
//! implements it one way; [`SnapshotPage`] implements it over fetched HTML.

mod snapshot;

pub use snapshot::SnapshotPage;

use crate::error::{RecapError, Result};
use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use url::Url;

/// `HTMLMediaElement.readyState` once enough data is buffered to play through.
pub const HAVE_ENOUGH_DATA: u8 = 4;

static VIDEO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("Invalid regex"));

/// Read access to the currently loaded host page.
#[async_trait]
pub trait HostPage: Send + Sync {
    /// The page's current logical address.
    fn address(&self) -> &str;

    /// The current rendered document markup, including inline scripts.
    async fn document(&self) -> Result<String>;

    /// Ready state of the page's video element, or `None` if there is none yet.
    async fn video_ready_state(&self) -> Option<u8>;

    /// Simulate activation (a click) of the element matching `selector`.
    async fn activate(&self, selector: &str) -> Result<()>;
}

/// Title and channel shown on the page, forwarded to the summarizer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub channel: Option<String>,
    pub url: String,
}

impl VideoMetadata {
    /// Scrape title and channel from page markup.
    pub fn from_document(html: &str, url: &str) -> Self {
        let document = Html::parse_document(html);

        let title = first_text(
            &document,
            &["h1.ytd-watch-metadata yt-formatted-string", "h1.title"],
        )
        .or_else(|| first_attr(&document, "meta[name=\"title\"]", "content"))
        .or_else(|| first_text(&document, &["title"]))
        .unwrap_or_else(|| "Untitled video".to_string());

        let channel = first_text(
            &document,
            &["#text.ytd-channel-name a", ".ytd-channel-name a"],
        )
        .or_else(|| first_attr(&document, "span[itemprop=\"author\"] link[itemprop=\"name\"]", "content"));

        Self {
            title,
            channel,
            url: url.to_string(),
        }
    }
}

fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document
            .select(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .find(|t| !t.is_empty())
    })
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Text of every inline `<script>` element, in document order.
pub fn inline_scripts(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script:not([src])").expect("Invalid selector");
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Video identity of a page address.
///
/// Any change in this value means the page now shows a different video.
pub fn video_id_from_address(address: &str) -> Option<String> {
    let url = Url::parse(address).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let candidate = if host == "youtu.be" {
        url.path_segments()?.next().map(str::to_string)
    } else {
        let mut segments = url.path_segments()?;
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("shorts") | Some("embed") | Some("live") | Some("v") => {
                segments.next().map(str::to_string)
            }
            _ => None,
        }
    }?;

    VIDEO_ID_REGEX.is_match(&candidate).then_some(candidate)
}

/// Turn user input (watch URL, short link, or bare video id) into a watch URL.
pub fn resolve_watch_url(input: &str) -> Result<String> {
    let input = input.trim();
    if VIDEO_ID_REGEX.is_match(input) {
        return Ok(format!("https://www.youtube.com/watch?v={}", input));
    }
    let id = video_id_from_address(input).ok_or_else(|| {
        RecapError::InvalidInput(format!("Not a video URL or ID: {}", input))
    })?;
    Ok(format!("https://www.youtube.com/watch?v={}", id))
}
