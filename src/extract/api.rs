//! Transcript from the host's internal transcript endpoint.

use super::{encode_transcript_params, SourceKind, TranscriptSource};
use crate::config::ExtractionSettings;
use crate::error::{ExtractionError, ExtractionResult};
use crate::page::{video_id_from_address, HostPage};
use crate::transcript::Transcript;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// Requests the transcript panel content for the page's video.
pub struct ApiSource {
    client: reqwest::Client,
    endpoint: String,
    client_name: String,
    client_version: String,
    hl: String,
    gl: String,
}

impl ApiSource {
    pub fn new(client: reqwest::Client, settings: &ExtractionSettings) -> Self {
        Self {
            client,
            endpoint: settings.api_endpoint.clone(),
            client_name: settings.client_name.clone(),
            client_version: settings.client_version.clone(),
            hl: settings.hl.clone(),
            gl: settings.gl.clone(),
        }
    }

    fn request_body(&self, video_id: &str) -> Value {
        json!({
            "context": {
                "client": {
                    "clientName": self.client_name,
                    "clientVersion": self.client_version,
                    "hl": self.hl,
                    "gl": self.gl,
                }
            },
            "params": encode_transcript_params(video_id),
        })
    }
}

#[async_trait]
impl TranscriptSource for ApiSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Api
    }

    #[instrument(skip_all, fields(source = "api"))]
    async fn probe(&self, page: &dyn HostPage) -> ExtractionResult<Transcript> {
        let video_id = video_id_from_address(page.address()).ok_or_else(|| {
            ExtractionError::not_found(format!("no video id in {}", page.address()))
        })?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(&video_id))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::network(format!(
                "transcript endpoint returned {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ExtractionError::malformed(format!("transcript response: {}", e)))?;

        transcript_from_response(&body)
    }
}

/// Pull cue text out of a transcript endpoint response.
///
/// Looks for an engagement panel action carrying a transcript renderer, reads
/// the first cue of every cue group, and falls back to the renderer's
/// `initialSegments` list, then to the `transcriptSegmentViewModel` items of
/// the newer timeline panel.
pub fn transcript_from_response(body: &Value) -> ExtractionResult<Transcript> {
    let renderer = body["actions"]
        .as_array()
        .into_iter()
        .flatten()
        .map(|action| &action["updateEngagementPanelAction"]["content"]["transcriptRenderer"])
        .find(|renderer| !renderer.is_null())
        .ok_or_else(|| {
            ExtractionError::not_found("no engagement panel action with a transcript renderer")
        })?;

    let mut cues = cue_group_texts(renderer);
    if cues.is_empty() {
        debug!("No cue groups, trying initial segments");
        cues = initial_segment_texts(renderer);
    }
    if cues.is_empty() {
        debug!("No initial segments, trying segment view models");
        cues = segment_view_model_texts(renderer);
    }
    if cues.is_empty() {
        return Err(ExtractionError::not_found(
            "transcript renderer has no cue groups, initial segments or segment view models",
        ));
    }

    debug!("Read {} cues from transcript response", cues.len());
    Transcript::from_fragments(cues)
}

fn cue_group_texts(renderer: &Value) -> Vec<String> {
    find_key(renderer, "cueGroups")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|group| {
            let cue = unwrap_renderer(&unwrap_renderer(group)["cues"][0]);
            text_of(&cue["cue"])
        })
        .collect()
}

fn initial_segment_texts(renderer: &Value) -> Vec<String> {
    find_key(renderer, "initialSegments")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|segment| text_of(&unwrap_renderer(segment)["snippet"]))
        .collect()
}

/// Timeline items of the view-model panel, one string per item.
fn segment_view_model_texts(renderer: &Value) -> Vec<String> {
    let mut items = Vec::new();
    collect_key(renderer, "contentItems", &mut items);
    items
        .into_iter()
        .filter_map(Value::as_array)
        .filter_map(|content_items| {
            let texts: Vec<&str> = content_items
                .iter()
                .filter_map(|ci| ci["transcriptSegmentViewModel"]["simpleText"].as_str())
                .filter(|t| !t.is_empty())
                .collect();
            (!texts.is_empty()).then(|| texts.join(" "))
        })
        .collect()
}

/// Text of a formatted string: `simpleText`, or its `runs` concatenated.
fn text_of(value: &Value) -> Option<String> {
    if let Some(text) = value["simpleText"].as_str() {
        return Some(text.to_string());
    }
    let runs = value["runs"].as_array()?;
    let text: String = runs.iter().filter_map(|run| run["text"].as_str()).collect();
    (!text.is_empty()).then_some(text)
}

/// Step into `{"somethingRenderer": {...}}` wrappers.
fn unwrap_renderer(value: &Value) -> &Value {
    match value.as_object() {
        Some(map) if map.len() == 1 => match map.iter().next() {
            Some((key, inner)) if key.ends_with("Renderer") && inner.is_object() => inner,
            _ => value,
        },
        _ => value,
    }
}

/// Depth-first search for the first value stored under `key`.
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map
            .get(key)
            .or_else(|| map.values().find_map(|v| find_key(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

/// Every value stored under `key`, in document order.
fn collect_key<'a>(value: &'a Value, key: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    out.push(v);
                } else {
                    collect_key(v, key, out);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_key(v, key, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionErrorKind;
    use crate::page::SnapshotPage;

    fn wrap_renderer(renderer: Value) -> Value {
        json!({
            "responseContext": {},
            "actions": [
                { "clickTrackingParams": "abc" },
                { "updateEngagementPanelAction": { "content": { "transcriptRenderer": renderer } } }
            ]
        })
    }

    #[test]
    fn test_cue_groups_simple_text() {
        let body = wrap_renderer(json!({
            "body": { "transcriptBodyRenderer": { "cueGroups": [
                { "cues": [ { "cue": { "simpleText": "First cue group talks about ownership and borrowing." } } ] },
                { "cues": [ { "cue": { "simpleText": "Second one covers lifetimes." } } ] }
            ] } }
        }));
        let transcript = transcript_from_response(&body).unwrap();
        assert_eq!(
            transcript.as_str(),
            "First cue group talks about ownership and borrowing. Second one covers lifetimes."
        );
    }

    #[test]
    fn test_cue_groups_wrapped_renderers_and_runs() {
        let body = wrap_renderer(json!({
            "body": { "transcriptBodyRenderer": { "cueGroups": [
                { "transcriptCueGroupRenderer": { "cues": [
                    { "transcriptCueRenderer": { "cue": { "runs": [ { "text": "Runs are " }, { "text": "joined as-is," } ] }, "startOffsetMs": "0" } }
                ] } },
                { "transcriptCueGroupRenderer": { "cues": [
                    { "transcriptCueRenderer": { "cue": { "simpleText": "and groups are joined with spaces." } } }
                ] } }
            ] } }
        }));
        let transcript = transcript_from_response(&body).unwrap();
        assert_eq!(
            transcript.as_str(),
            "Runs are joined as-is, and groups are joined with spaces."
        );
    }

    #[test]
    fn test_initial_segments_fallback() {
        let body = wrap_renderer(json!({
            "content": { "transcriptSearchPanelRenderer": { "body": { "transcriptSegmentListRenderer": {
                "initialSegments": [
                    { "transcriptSegmentRenderer": { "snippet": { "runs": [ { "text": "Segments come from the" } ] } } },
                    { "transcriptSegmentRenderer": { "snippet": { "simpleText": "search panel when cue groups are missing." } } }
                ]
            } } } }
        }));
        let transcript = transcript_from_response(&body).unwrap();
        assert_eq!(
            transcript.as_str(),
            "Segments come from the search panel when cue groups are missing."
        );
    }

    #[test]
    fn test_segment_view_models() {
        let item = |texts: &[&str]| {
            let content_items: Vec<Value> = texts
                .iter()
                .map(|t| json!({ "transcriptSegmentViewModel": { "simpleText": t, "timestamp": "0:01" } }))
                .collect();
            json!({ "macroMarkersPanelItemViewModel": { "item": { "timelineItemViewModel": {
                "contentItems": content_items
            } } } })
        };
        let body = wrap_renderer(json!({
            "content": { "sectionListRenderer": { "contents": [ { "itemSectionRenderer": { "contents": [
                item(&["Newer panels wrap each", "segment in a view model"]),
                item(&["instead of a segment renderer."]),
            ] } } ] } }
        }));
        let transcript = transcript_from_response(&body).unwrap();
        assert_eq!(
            transcript.as_str(),
            "Newer panels wrap each segment in a view model instead of a segment renderer."
        );
    }

    #[test]
    fn test_no_transcript_renderer() {
        let err = transcript_from_response(&json!({ "actions": [ { "other": {} } ] })).unwrap_err();
        assert_eq!(err.kind, ExtractionErrorKind::NotFound);

        let err = transcript_from_response(&json!({ "error": { "code": 400 } })).unwrap_err();
        assert_eq!(err.kind, ExtractionErrorKind::NotFound);
    }

    #[test]
    fn test_renderer_without_cues() {
        let err = transcript_from_response(&wrap_renderer(json!({ "body": {} }))).unwrap_err();
        assert_eq!(err.kind, ExtractionErrorKind::NotFound);
    }

    #[test]
    fn test_request_body_shape() {
        let settings = ExtractionSettings::default();
        let source = ApiSource::new(reqwest::Client::new(), &settings);
        let body = source.request_body("dQw4w9WgXcQ");
        assert_eq!(body["context"]["client"]["clientName"], "WEB");
        assert_eq!(body["context"]["client"]["hl"], "en");
        assert_eq!(body["context"]["client"]["gl"], "US");
        assert_eq!(body["params"], encode_transcript_params("dQw4w9WgXcQ"));
    }

    #[tokio::test]
    async fn test_posts_params() {
        let mut server = mockito::Server::new_async().await;
        let response = wrap_renderer(json!({
            "body": { "transcriptBodyRenderer": { "cueGroups": [
                { "cues": [ { "cue": { "simpleText": "A response served by the local test server, long enough to count." } } ] }
            ] } }
        }));
        let mock = server
            .mock("POST", "/youtubei/v1/get_transcript")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": encode_transcript_params("dQw4w9WgXcQ")
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response.to_string())
            .create_async()
            .await;

        let settings = ExtractionSettings {
            api_endpoint: format!("{}/youtubei/v1/get_transcript", server.url()),
            ..ExtractionSettings::default()
        };
        let source = ApiSource::new(reqwest::Client::new(), &settings);
        let page = SnapshotPage::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "");

        let transcript = source.probe(&page).await.unwrap();
        mock.assert_async().await;
        assert_eq!(
            transcript.as_str(),
            "A response served by the local test server, long enough to count."
        );
    }

    #[tokio::test]
    async fn test_without_video_id() {
        let source = ApiSource::new(reqwest::Client::new(), &ExtractionSettings::default());
        let page = SnapshotPage::new("https://www.youtube.com/", "");
        let err = source.probe(&page).await.unwrap_err();
        assert_eq!(err.kind, ExtractionErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/get_transcript")
            .with_status(500)
            .create_async()
            .await;
        let settings = ExtractionSettings {
            api_endpoint: format!("{}/get_transcript", server.url()),
            ..ExtractionSettings::default()
        };
        let source = ApiSource::new(reqwest::Client::new(), &settings);
        let page = SnapshotPage::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "");
        let err = source.probe(&page).await.unwrap_err();
        assert_eq!(err.kind, ExtractionErrorKind::NetworkFailure);
    }
}
