//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use vault_sweeper::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, VswError};

// Vault
pub use crate::vault::fs_store::{FsVaultOptions, FsVaultStore};
pub use crate::vault::memory::MemoryVault;
pub use crate::vault::store::{FileHandle, VaultStore};

// Scanner
pub use crate::scanner::cleaner::{
    CleanerConfig, CleanerState, CleanupPlan, ScanOutcome, ScanResult, VaultCleaner,
};
pub use crate::scanner::content::{CONTENT_PREFIX_CHARS, is_blank_content};
pub use crate::scanner::patterns::is_untitled_name;

// Host
pub use crate::host::commands::{CommandHandler, CommandRegistry, CommandSpec};
pub use crate::host::notifications::{Notice, NotificationLevel, Notifier, RecordingNotifier};
pub use crate::host::plugin::{DELETE_UNTITLED_COMMAND, UntitledCleanupPlugin};

// Logging
pub use crate::logger::activity::{ActivityLoggerConfig, ActivityLoggerHandle, spawn_logger};
pub use crate::logger::jsonl::JsonlConfig;
