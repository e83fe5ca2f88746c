//! Caption track selection.

use super::{CaptionTrack, TrackKind};

/// Pick one caption track from the page's list.
///
/// Person-written captions win over generated ones; failing that, the first
/// English track; failing that, the first track. Input order decides ties.
pub fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.kind != TrackKind::Auto)
        .or_else(|| tracks.iter().find(|t| t.language_code == "en"))
        .or_else(|| tracks.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(url: &str, lang: &str, kind: TrackKind) -> CaptionTrack {
        CaptionTrack {
            url: url.to_string(),
            language_code: lang.to_string(),
            kind,
        }
    }

    #[test]
    fn test_empty_list() {
        assert!(select_track(&[]).is_none());
    }

    #[test]
    fn test_prefers_manual_over_english_auto() {
        let tracks = vec![
            track("a", "en", TrackKind::Auto),
            track("b", "de", TrackKind::Manual),
        ];
        assert_eq!(select_track(&tracks).unwrap().url, "b");
    }

    #[test]
    fn test_falls_back_to_english() {
        let tracks = vec![
            track("a", "fr", TrackKind::Auto),
            track("b", "en", TrackKind::Auto),
            track("c", "en", TrackKind::Auto),
        ];
        assert_eq!(select_track(&tracks).unwrap().url, "b");
    }

    #[test]
    fn test_falls_back_to_first() {
        let tracks = vec![
            track("a", "fr", TrackKind::Auto),
            track("b", "es", TrackKind::Auto),
        ];
        assert_eq!(select_track(&tracks).unwrap().url, "a");
    }

    #[test]
    fn test_deterministic() {
        let tracks = vec![
            track("a", "fr", TrackKind::Auto),
            track("b", "en", TrackKind::Manual),
            track("c", "en", TrackKind::Manual),
        ];
        let first = select_track(&tracks).cloned();
        for _ in 0..10 {
            assert_eq!(select_track(&tracks).cloned(), first);
        }
    }
}
