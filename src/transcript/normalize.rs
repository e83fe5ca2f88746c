//! Whitespace normalization shared by every decoder and extractor.

/// Join fragments with a single space, collapse whitespace runs, and trim.
pub fn normalize_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for fragment in fragments {
        for word in fragment.as_ref().split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
    }
    out
}

/// Normalize a single block of text.
pub fn normalize(text: &str) -> String {
    normalize_fragments([text])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_newlines_and_runs() {
        assert_eq!(normalize("  Hello\n\n  world\t again  "), "Hello world again");
    }

    #[test]
    fn test_joins_fragments_with_single_space() {
        assert_eq!(normalize_fragments(["one", " two ", "\nthree"]), "one two three");
    }

    #[test]
    fn test_empty_fragments_leave_no_gaps() {
        assert_eq!(normalize_fragments(["", "a", "   ", "b", ""]), "a b");
        assert_eq!(normalize_fragments(Vec::<String>::new()), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize(" x \r\n y\u{00a0}z ");
        assert_eq!(normalize(&once), once);
    }
}
