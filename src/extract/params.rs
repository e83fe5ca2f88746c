//! Request parameter encoding for the internal transcript endpoint.
//!
//! The endpoint takes a base64 protobuf message:
//!
//! | field | wire type            | value                              |
//! |-------|----------------------|------------------------------------|
//! | 1     | 2 (length-delimited) | video id (UTF-8)                   |
//! | 2     | 0 (varint)           | 1, transcript panel variant        |
//! | 3     | 0 (varint)           | 0, no caption track override       |

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const WIRE_VARINT: u8 = 0;
const WIRE_LENGTH_DELIMITED: u8 = 2;

const FIELD_VIDEO_ID: u8 = 1;
const FIELD_PANEL_VARIANT: u8 = 2;
const FIELD_TRACK_OVERRIDE: u8 = 3;

const PANEL_VARIANT: u64 = 1;
const TRACK_OVERRIDE: u64 = 0;

/// Encode the `params` value for a transcript request.
pub fn encode_transcript_params(video_id: &str) -> String {
    STANDARD.encode(transcript_params_bytes(video_id))
}

fn transcript_params_bytes(video_id: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(video_id.len() + 8);

    push_key(&mut out, FIELD_VIDEO_ID, WIRE_LENGTH_DELIMITED);
    push_varint(&mut out, video_id.len() as u64);
    out.extend_from_slice(video_id.as_bytes());

    push_key(&mut out, FIELD_PANEL_VARIANT, WIRE_VARINT);
    push_varint(&mut out, PANEL_VARIANT);

    push_key(&mut out, FIELD_TRACK_OVERRIDE, WIRE_VARINT);
    push_varint(&mut out, TRACK_OVERRIDE);

    out
}

fn push_key(out: &mut Vec<u8>, field: u8, wire_type: u8) {
    push_varint(out, u64::from((field << 3) | wire_type));
}

/// Little-endian base-128 varint.
fn push_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}
