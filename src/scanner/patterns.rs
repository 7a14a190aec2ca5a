//! Untitled-note name matching.
//!
//! A note-taking host names a fresh note after its locale's word for
//! "untitled", adding ` N` when that name is taken: `Untitled.md`,
//! `Untitled 1.md`, `未命名 3.md`. The match is exact and case-sensitive on the
//! bare file name; nothing else about the name is configurable.

use std::sync::LazyLock;

use regex::Regex;

/// Localized base names the host assigns to new notes.
pub const UNTITLED_BASE_NAMES: &[&str] = &["Untitled", "未命名"];

/// Extension of notes the host creates.
pub const NOTE_EXTENSION: &str = "md";

static UNTITLED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    let bases = UNTITLED_BASE_NAMES
        .iter()
        .map(|base| regex::escape(base))
        .collect::<Vec<_>>()
        .join("|");
    // `[0-9]` rather than `\d`: the regex crate's `\d` is Unicode-aware.
    let pattern = format!(r"^(?:{bases})(?: [0-9]+)?\.{}$", regex::escape(NOTE_EXTENSION));
    Regex::new(&pattern).expect("untitled-name pattern is a valid regex")
});

/// Whether `name` is a default untitled-note name.
///
/// `name` is the bare file name including its extension, never a path.
#[must_use]
pub fn is_untitled_name(name: &str) -> bool {
    UNTITLED_NAME.is_match(name)
}
