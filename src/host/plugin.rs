//! The untitled-note cleanup command as a host plugin.
//!
//! On load the plugin registers a single command. Each invocation runs one
//! scan-and-delete pass and posts exactly one summary notice.

#![allow(missing_docs)]

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::errors::{Result, VswError};
use crate::host::commands::{CommandHandler, CommandRegistry, CommandSpec};
use crate::host::notifications::{Notice, Notifier};
use crate::scanner::cleaner::{ScanOutcome, ScanResult, VaultCleaner};
use crate::vault::store::VaultStore;

/// The one command this plugin contributes.
pub const DELETE_UNTITLED_COMMAND: CommandSpec = CommandSpec {
    id: "delete-untitled-empty-files",
    name: "Delete Untitled and Empty Files",
};

/// Summary notice for a finished run.
pub fn summary_notice(report: &ScanResult) -> Notice {
    match report.outcome() {
        ScanOutcome::NothingToDelete => Notice::info("No files to delete."),
        ScanOutcome::Completed { deleted, .. } if report.dry_run => {
            Notice::info(format!("Would delete {deleted} file(s)."))
        }
        ScanOutcome::Completed { deleted, failed: 0 } => {
            Notice::info(format!("Deleted {deleted} file(s)."))
        }
        ScanOutcome::Completed { deleted, failed } => Notice::warning(format!(
            "Deleted {deleted} file(s). {failed} file(s) could not be deleted."
        )),
    }
}

pub struct UntitledCleanupPlugin<S, N> {
    cleaner: VaultCleaner<S>,
    notifier: N,
    last_report: Mutex<Option<ScanResult>>,
}

impl<S, N> UntitledCleanupPlugin<S, N>
where
    S: VaultStore + Send + Sync + 'static,
    N: Notifier + 'static,
{
    pub fn new(cleaner: VaultCleaner<S>, notifier: N) -> Self {
        Self {
            cleaner,
            notifier,
            last_report: Mutex::new(None),
        }
    }

    /// Register the cleanup command with the host.
    pub fn on_load(self: Arc<Self>, registry: &mut CommandRegistry) -> Result<()> {
        registry.register(DELETE_UNTITLED_COMMAND, self)
    }

    pub fn cleaner(&self) -> &VaultCleaner<S> {
        &self.cleaner
    }

    /// Report of the most recent completed run, if any.
    pub fn last_report(&self) -> Option<ScanResult> {
        self.last_report.lock().clone()
    }

    /// Run one cleanup pass and notify the user of the outcome.
    pub fn delete_untitled_empty_files(&self) -> Result<ScanResult> {
        match self.cleaner.scan_and_delete() {
            Ok(report) => {
                self.notifier.notify(&summary_notice(&report));
                *self.last_report.lock() = Some(report.clone());
                Ok(report)
            }
            Err(VswError::ScanInProgress) => {
                self.notifier
                    .notify(&Notice::warning("A cleanup is already running."));
                Err(VswError::ScanInProgress)
            }
            Err(e) => {
                self.notifier
                    .notify(&Notice::error(format!("Could not scan the vault: {e}")));
                Err(e)
            }
        }
    }
}

impl<S, N> CommandHandler for UntitledCleanupPlugin<S, N>
where
    S: VaultStore + Send + Sync + 'static,
    N: Notifier + 'static,
{
    fn execute(&self) -> Result<()> {
        self.delete_untitled_empty_files().map(|_| ())
    }
}
