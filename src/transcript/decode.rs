//! Caption payload decoders.
//!
//! A caption URL serves either timed-text XML (`<text>` elements with
//! entity-escaped content) or a JSON event stream (`events[].segs[].utf8`).
//! The shape is sniffed from the first non-whitespace character.

use super::Transcript;
use crate::error::{ExtractionError, ExtractionResult};
use html_escape::decode_html_entities;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::debug;

/// Wire shape of a caption payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    JsonEvents,
    TimedTextXml,
}

impl PayloadFormat {
    /// Sniff the payload shape: `{` means JSON events, anything else is XML.
    pub fn sniff(payload: &str) -> Self {
        let first = payload
            .trim_start_matches('\u{feff}')
            .chars()
            .find(|c| !c.is_whitespace());
        match first {
            Some('{') => PayloadFormat::JsonEvents,
            _ => PayloadFormat::TimedTextXml,
        }
    }
}

/// Decode a raw caption payload of either shape into a transcript.
pub fn decode_payload(payload: &str) -> ExtractionResult<Transcript> {
    let format = PayloadFormat::sniff(payload);
    debug!("Decoding {} byte caption payload as {:?}", payload.len(), format);
    match format {
        PayloadFormat::JsonEvents => decode_json_events(payload),
        PayloadFormat::TimedTextXml => decode_timed_text(payload),
    }
}

#[derive(Debug, Deserialize)]
struct EventStream {
    events: Vec<CaptionEvent>,
}

#[derive(Debug, Deserialize)]
struct CaptionEvent {
    #[serde(default)]
    segs: Option<Vec<Segment>>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    utf8: String,
}

/// Decode the JSON event format.
///
/// Segment text is concatenated in order without separators; the segments
/// carry their own spacing and newline events. Events without `segs` only
/// position the caption window and are skipped.
pub fn decode_json_events(payload: &str) -> ExtractionResult<Transcript> {
    let stream: EventStream = serde_json::from_str(payload.trim_start_matches('\u{feff}'))
        .map_err(|e| ExtractionError::malformed(format!("caption event stream: {}", e)))?;

    let text: String = stream
        .events
        .iter()
        .filter_map(|event| event.segs.as_ref())
        .flatten()
        .map(|seg| seg.utf8.as_str())
        .collect();

    Transcript::from_text(&text)
}

/// Decode the timed-text XML format.
pub fn decode_timed_text(payload: &str) -> ExtractionResult<Transcript> {
    let cues = timed_text_cues(payload);
    if cues.is_empty() {
        return Err(ExtractionError::malformed("no <text> elements in caption payload"));
    }
    Transcript::from_fragments(cues)
}

/// Extract the unescaped content of every `<text>` element in document order.
fn timed_text_cues(payload: &str) -> Vec<String> {
    let document = Html::parse_document(payload);
    let selector = Selector::parse("text").expect("Invalid selector");

    document
        .select(&selector)
        .map(|element| unescape_entities(&own_text(element)))
        .collect()
}

/// Text belonging to this `<text>` element and not to a nested one.
///
/// Markup parsing leaves a self-closed `<text/>` open, so later cues can end
/// up nested inside it; each cue must only report its own text.
fn own_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let owner = node
            .ancestors()
            .find(|a| a.value().as_element().is_some_and(|e| e.name() == "text"));
        if owner.map(|o| o.id()) == Some(element.id()) {
            out.push_str(text);
        }
    }
    out
}

/// Resolve entities left over after markup parsing.
///
/// Timed-text payloads often escape twice (`&amp;#39;`), so one parse leaves
/// `&#39;` in the text. This is a single decoding pass over plain text, so a
/// decoded `&lt;` is never read as a tag.
pub fn unescape_entities(text: &str) -> String {
    decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionErrorKind;
    use crate::transcript::normalize;

    const LONG_A: &str = "This sentence is long enough that the whole cue list clears the threshold.";

    #[test]
    fn test_sniff() {
        assert_eq!(PayloadFormat::sniff("  \n{\"events\":[]}"), PayloadFormat::JsonEvents);
        assert_eq!(PayloadFormat::sniff("\u{feff}{}"), PayloadFormat::JsonEvents);
        assert_eq!(PayloadFormat::sniff("<?xml version=\"1.0\"?>"), PayloadFormat::TimedTextXml);
        assert_eq!(PayloadFormat::sniff(""), PayloadFormat::TimedTextXml);
    }

    #[test]
    fn test_json_events_concatenates_segments() {
        let payload = format!(
            r#"{{"events":[{{"tStartMs":0}},{{"segs":[{{"utf8":"Hello "}},{{"utf8":"world."}}]}},{{"segs":[{{"utf8":"\n"}}]}},{{"segs":[{{"utf8":" {}"}}]}}]}}"#,
            LONG_A
        );
        let transcript = decode_payload(&payload).unwrap();
        assert_eq!(transcript.as_str(), format!("Hello world. {}", LONG_A));
    }

    #[test]
    fn test_json_events_skips_position_only_events_anywhere() {
        let with_gaps = format!(
            r#"{{"events":[{{"id":1}},{{"segs":[{{"utf8":"{}"}}]}},{{"wWinId":2}},{{"segs":[{{"utf8":" tail"}}]}},{{"id":3}}]}}"#,
            LONG_A
        );
        let without_gaps = format!(
            r#"{{"events":[{{"segs":[{{"utf8":"{}"}}]}},{{"segs":[{{"utf8":" tail"}}]}}]}}"#,
            LONG_A
        );
        assert_eq!(
            decode_json_events(&with_gaps).unwrap(),
            decode_json_events(&without_gaps).unwrap()
        );
    }

    #[test]
    fn test_json_events_malformed() {
        let err = decode_json_events("{\"events\": [").unwrap_err();
        assert_eq!(err.kind, ExtractionErrorKind::Malformed);

        let err = decode_json_events("{\"nothing\": true}").unwrap_err();
        assert_eq!(err.kind, ExtractionErrorKind::Malformed);
    }

    #[test]
    fn test_json_events_below_threshold() {
        let err = decode_payload(r#"{"events":[{"segs":[{"utf8":"Too short."}]}]}"#).unwrap_err();
        assert_eq!(err.kind, ExtractionErrorKind::BelowThreshold);
    }

    #[test]
    fn test_timed_text_unescapes_and_joins() {
        let payload = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
            <text start="0.0" dur="1.5">Tom &amp; Jerry</text>
            <text start="1.5" dur="2.0">don&amp;#39;t stop
running</text>
            <text start="3.5" dur="2.0">until the very end of this long cartoon episode</text>
        </transcript>"#;
        let transcript = decode_payload(payload).unwrap();
        assert_eq!(
            transcript.as_str(),
            "Tom & Jerry don't stop running until the very end of this long cartoon episode"
        );
    }

    #[test]
    fn test_timed_text_keeps_decoded_angle_brackets() {
        let payload = format!(
            r#"<transcript><text>a &amp;lt;b&amp;gt; c</text><text>{}</text></transcript>"#,
            LONG_A
        );
        let transcript = decode_timed_text(&payload).unwrap();
        assert!(transcript.as_str().starts_with("a <b> c "));
    }

    #[test]
    fn test_timed_text_self_closed_cue_does_not_duplicate() {
        let payload = format!(
            r#"<transcript><text start="0"/><text start="1">{}</text><text start="2">end</text></transcript>"#,
            LONG_A
        );
        let transcript = decode_timed_text(&payload).unwrap();
        assert_eq!(transcript.as_str(), format!("{} end", LONG_A));
    }

    #[test]
    fn test_timed_text_idempotent_under_normalization() {
        let payload = format!(
            "<transcript><text>  {}\n</text><text>\tsecond\n\ncue </text></transcript>",
            LONG_A
        );
        let decoded = decode_timed_text(&payload).unwrap();
        assert_eq!(normalize(decoded.as_str()), decoded.as_str());
    }

    #[test]
    fn test_timed_text_without_cues_is_malformed() {
        let err = decode_timed_text("<html><body>Sign in</body></html>").unwrap_err();
        assert_eq!(err.kind, ExtractionErrorKind::Malformed);
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_entities("it&#39;s"), "it's");
        assert_eq!(unescape_entities("&#x41;&quot;"), "A\"");
        assert_eq!(unescape_entities("no entities"), "no entities");
        assert_eq!(unescape_entities("AT&T"), "AT&T");
        assert_eq!(unescape_entities("&amp;lt;b&amp;gt;"), "&lt;b&gt;");
    }
}
