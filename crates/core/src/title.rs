//! Title derivation for text items.

/// Number of characters of the body kept as the derived title.
pub const TITLE_PREFIX_CHARS: usize = 10;

/// Derives a display title from a text body.
///
/// Takes the first [`TITLE_PREFIX_CHARS`] characters of the body. The
/// truncation is character-wise, never byte-wise, so multi-byte text cannot
/// split a code point. A body shorter than the prefix is returned whole.
pub fn derive_title(body: &str) -> String {
    body.chars().take(TITLE_PREFIX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_bodies_to_ten_characters() {
        assert_eq!(derive_title("Hello world, this is long"), "Hello worl");
    }

    #[test]
    fn short_bodies_are_kept_whole() {
        assert_eq!(derive_title("note"), "note");
        assert_eq!(derive_title(""), "");
    }

    #[test]
    fn exact_prefix_length_is_unchanged() {
        assert_eq!(derive_title("0123456789"), "0123456789");
    }

    #[test]
    fn multibyte_text_counts_characters_not_bytes() {
        assert_eq!(derive_title("héllö wörld, länger"), "héllö wörl");
    }
}
