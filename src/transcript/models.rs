//! Data models for caption tracks and transcripts.

use super::normalize::normalize_fragments;
use crate::error::{ExtractionError, ExtractionResult};
use serde::{Deserialize, Serialize};

/// Minimum number of characters a normalized transcript must exceed.
pub const MIN_TRANSCRIPT_CHARS: usize = 50;

/// Authorship of a caption track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Captions written by a person.
    #[default]
    Manual,
    /// Speech-recognition captions.
    Auto,
}

impl TrackKind {
    /// Map the page's `kind` field onto a track kind. Only `asr` marks
    /// generated captions; anything else, including no kind at all, is manual.
    pub fn from_page_kind(kind: Option<&str>) -> Self {
        match kind {
            Some(k) if k.eq_ignore_ascii_case("asr") => TrackKind::Auto,
            _ => TrackKind::Manual,
        }
    }
}

/// A selectable caption stream as listed in the page's embedded player data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// Fetchable payload URL.
    pub url: String,
    /// BCP-47-ish language code (`en`, `fr`, `pt-BR`).
    pub language_code: String,
    pub kind: TrackKind,
}

/// Raw shape of a track entry inside the embedded `captionTracks` array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCaptionTrack {
    pub base_url: String,
    #[serde(default)]
    pub language_code: String,
    #[serde(default)]
    pub kind: Option<String>,
}

impl From<RawCaptionTrack> for CaptionTrack {
    fn from(raw: RawCaptionTrack) -> Self {
        Self {
            url: raw.base_url,
            language_code: raw.language_code,
            kind: TrackKind::from_page_kind(raw.kind.as_deref()),
        }
    }
}

/// Normalized transcript text of a video, stripped of timing.
///
/// Only constructible through [`Transcript::from_fragments`], so every value
/// is single-spaced, trimmed and longer than [`MIN_TRANSCRIPT_CHARS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    /// Normalize cue fragments and accept the result if it clears the threshold.
    pub fn from_fragments<I, S>(fragments: I) -> ExtractionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = normalize_fragments(fragments);
        let length = text.chars().count();
        if length <= MIN_TRANSCRIPT_CHARS {
            return Err(ExtractionError::below_threshold(length));
        }
        Ok(Self(text))
    }

    /// Accept already-joined text, re-normalizing it first.
    pub fn from_text(text: &str) -> ExtractionResult<Self> {
        Self::from_fragments([text])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the text is empty. False for every constructed transcript.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Transcript {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
