#![forbid(unsafe_code)]

//! Vault Sweeper (vsw) — removes blank, never-renamed "Untitled" notes from a
//! markdown vault.
//!
//! A note-taking host leaves behind `Untitled.md`, `Untitled 3.md` or
//! `未命名.md` whenever a new note is opened and abandoned. The sweeper lists
//! the vault, keeps files whose bare name is exactly such a default name,
//! reads at most the first 1000 characters of each, and deletes those that
//! are blank. Deletions run one at a time; a failure on one file never stops
//! the others.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use vault_sweeper::prelude::*;
//!
//! # fn main() -> vault_sweeper::core::errors::Result<()> {
//! let store = FsVaultStore::open(std::path::Path::new("notes"), FsVaultOptions::default())?;
//! let cleaner = VaultCleaner::new(store, CleanerConfig::default(), None);
//! let report = cleaner.scan_and_delete()?;
//! println!("deleted {}", report.deleted_count());
//! # Ok(())
//! # }
//! ```

pub mod prelude;

pub mod core;
pub mod host;
pub mod logger;
pub mod scanner;
pub mod vault;
