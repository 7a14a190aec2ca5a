//! Activity logging: JSONL writer plus the logger thread that owns it.

pub mod activity;
pub mod jsonl;
