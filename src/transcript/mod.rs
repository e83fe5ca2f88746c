//! Transcript types, caption payload decoding and track selection.
//!
//! Everything here is pure: no network, no page access. The extractors in
//! [`crate::extract`] feed raw payloads and track lists through these.

mod decode;
mod models;
mod normalize;
mod tracks;

pub use decode::{
    decode_json_events, decode_payload, decode_timed_text, unescape_entities, PayloadFormat,
};
pub(crate) use models::RawCaptionTrack;
pub use models::{CaptionTrack, TrackKind, Transcript, MIN_TRANSCRIPT_CHARS};
pub use normalize::{normalize, normalize_fragments};
pub use tracks::select_track;
