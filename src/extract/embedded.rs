//! Caption tracks from the page's inline player data.

use super::{SourceKind, TranscriptSource};
use crate::error::{ExtractionError, ExtractionResult};
use crate::page::{inline_scripts, HostPage};
use crate::transcript::{decode_payload, select_track, CaptionTrack, RawCaptionTrack, Transcript};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Key that introduces the caption track array in the player data.
const CAPTION_TRACKS_KEY: &str = "\"captionTracks\"";

/// Reads the caption track list embedded in the page, fetches the chosen
/// track, and decodes it.
pub struct EmbeddedDataSource {
    client: reqwest::Client,
}

impl EmbeddedDataSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_payload(&self, track: &CaptionTrack) -> ExtractionResult<String> {
        let response = self.client.get(&track.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::network(format!(
                "caption track returned {}",
                status
            )));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptSource for EmbeddedDataSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Embedded
    }

    #[instrument(skip_all, fields(source = "embedded"))]
    async fn probe(&self, page: &dyn HostPage) -> ExtractionResult<Transcript> {
        let html = page
            .document()
            .await
            .map_err(|e| ExtractionError::not_found(format!("page document unavailable: {}", e)))?;

        let tracks = caption_tracks_from_scripts(&inline_scripts(&html))?;
        let track = select_track(&tracks)
            .ok_or_else(|| ExtractionError::not_found("caption track list is empty"))?;
        debug!(
            "Selected {:?} track '{}' of {}",
            track.kind,
            track.language_code,
            tracks.len()
        );

        let payload = self.fetch_payload(track).await?;
        decode_payload(&payload)
    }
}

/// Parse the caption track array out of the first script that mentions it.
pub fn caption_tracks_from_scripts<S: AsRef<str>>(scripts: &[S]) -> ExtractionResult<Vec<CaptionTrack>> {
    let (script, key_at) = scripts
        .iter()
        .map(AsRef::as_ref)
        .find_map(|s| s.find(CAPTION_TRACKS_KEY).map(|at| (s, at)))
        .ok_or_else(|| ExtractionError::not_found("no inline script lists caption tracks"))?;

    let rest = script[key_at + CAPTION_TRACKS_KEY.len()..].trim_start();
    let rest = rest
        .strip_prefix(':')
        .map(str::trim_start)
        .ok_or_else(|| ExtractionError::malformed("caption track key is not followed by a value"))?;

    let array = extract_json_array(rest)
        .ok_or_else(|| ExtractionError::malformed("caption track array is not terminated"))?;

    let raw: Vec<RawCaptionTrack> = serde_json::from_str(array)
        .map_err(|e| ExtractionError::malformed(format!("caption track array: {}", e)))?;

    Ok(raw.into_iter().map(CaptionTrack::from).collect())
}

/// Return the bracket-balanced JSON array at the start of `text`.
///
/// The array nests objects and arrays, so the end is found by tracking `[`/`]`
/// depth. Brackets inside string literals are not structural and are skipped.
pub fn extract_json_array(text: &str) -> Option<&str> {
    if !text.starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
