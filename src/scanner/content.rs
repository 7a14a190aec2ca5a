//! Blank-content check over a bounded prefix.
//!
//! Only the first [`CONTENT_PREFIX_CHARS`] characters of a note are looked at.
//! A note with that many leading whitespace characters followed by real text
//! is therefore classified as blank. This bound is part of the observable
//! behavior and must not change.

/// Number of leading characters inspected when deciding blankness.
pub const CONTENT_PREFIX_CHARS: usize = 1000;

/// Whitespace as the host's string trimming sees it: Unicode `White_Space`
/// plus the byte-order mark, without NEL.
#[must_use]
pub fn is_trimmable(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Whether `content` counts as empty: its first [`CONTENT_PREFIX_CHARS`]
/// characters are all trimmable whitespace.
#[must_use]
pub fn is_blank_content(content: &str) -> bool {
    content
        .chars()
        .take(CONTENT_PREFIX_CHARS)
        .all(is_trimmable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_and_whitespace_are_blank() {
        assert!(is_blank_content(""));
        assert!(is_blank_content("   \n\t  "));
        assert!(is_blank_content("\r\n\u{a0}\u{3000}"));
    }

    #[test]
    fn byte_order_mark_alone_is_blank() {
        assert!(is_blank_content("\u{feff}"));
        assert!(is_blank_content("\u{feff}\n"));
    }

    #[test]
    fn next_line_control_is_not_whitespace() {
        assert!(!is_blank_content("\u{85}"));
    }

    #[test]
    fn any_visible_text_is_not_blank() {
        assert!(!is_blank_content("hello"));
        assert!(!is_blank_content("  #  "));
        assert!(!is_blank_content("\n\n-"));
    }

    #[test]
    fn text_after_the_prefix_is_never_seen() {
        let hidden = format!("{}text", " ".repeat(CONTENT_PREFIX_CHARS));
        assert!(is_blank_content(&hidden));

        let visible = format!("{}text", " ".repeat(CONTENT_PREFIX_CHARS - 1));
        assert!(!is_blank_content(&visible));
    }

    #[test]
    fn prefix_counts_characters_not_bytes() {
        // 999 three-byte ideographic spaces, then a letter at char 1000.
        let content = format!("{}x", "\u{3000}".repeat(CONTENT_PREFIX_CHARS - 1));
        assert!(!is_blank_content(&content));
    }

    proptest! {
        /// Agrees with "take the prefix, trim it, compare to empty".
        #[test]
        fn matches_trimmed_prefix_definition(content in "[ \t\r\na-z\u{3000}\u{feff}]{0,1200}") {
            let prefix: String = content.chars().take(CONTENT_PREFIX_CHARS).collect();
            let trimmed = prefix.trim_matches(is_trimmable);
            prop_assert_eq!(is_blank_content(&content), trimmed.is_empty());
        }
    }
}
