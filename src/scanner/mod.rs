//! Scanner: untitled-name matching, blank-content detection, and the cleaner.

pub mod cleaner;
pub mod content;
pub mod patterns;
