//! Vault cleaner: find blank untitled notes and delete them one at a time.
//!
//! Pipeline: list vault -> name filter -> bounded content read -> blank check
//! -> serial deletion -> report.
//!
//! A file is deleted iff its name is an untitled-note name and its content
//! prefix is blank at the moment it is examined. Files whose names do not
//! match are never read. Read and delete failures are isolated per file: they
//! are recorded in the report and logged, and processing continues.
//!
//! Only one `scan_and_delete` runs at a time per cleaner. A call made while
//! another is in flight fails fast with `ScanInProgress` and touches nothing.

#![allow(missing_docs)]

use std::time::Instant;

use parking_lot::Mutex;
use serde::Serialize;

use crate::core::config::CleanerSettings;
use crate::core::errors::{Result, VswError};
use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};
use crate::scanner::content::{CONTENT_PREFIX_CHARS, is_blank_content};
use crate::scanner::patterns::is_untitled_name;
use crate::vault::store::{FileHandle, VaultStore};

// ──────────────────── configuration ────────────────────

#[derive(Debug, Clone, Default)]
pub struct CleanerConfig {
    /// Report what would be deleted without calling delete.
    pub dry_run: bool,
    /// Label for the vault in log events, usually its root path.
    pub vault_label: String,
}

impl From<&CleanerSettings> for CleanerConfig {
    fn from(settings: &CleanerSettings) -> Self {
        Self {
            dry_run: settings.dry_run,
            vault_label: String::new(),
        }
    }
}

// ──────────────────── report types ────────────────────

/// Lifecycle of a cleaner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanerState {
    Idle,
    Scanning,
}

/// A per-file read or delete failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub error_code: String,
    pub error: String,
    pub recoverable: bool,
}

impl FileFailure {
    fn new(file: &FileHandle, err: &VswError) -> Self {
        Self {
            path: file.path().to_string(),
            error_code: err.code().to_string(),
            error: err.to_string(),
            recoverable: err.is_retryable(),
        }
    }
}

/// Candidates found by a scan, before anything is deleted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupPlan {
    pub files_scanned: usize,
    /// Files whose name matched, whether or not they were blank.
    pub name_matches: usize,
    pub candidates: Vec<FileHandle>,
    pub read_failures: Vec<FileFailure>,
}

/// Outcome of one `scan_and_delete` run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    pub files_scanned: usize,
    pub name_matches: usize,
    /// Files that passed both filters.
    pub candidates: usize,
    /// Files confirmed deleted (or, in a dry run, that would have been).
    pub deleted: Vec<FileHandle>,
    pub failed: Vec<FileFailure>,
    pub read_failures: Vec<FileFailure>,
    pub dry_run: bool,
    pub duration_ms: u64,
}

/// What the user should be told about a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No file passed both filters; nothing was attempted.
    NothingToDelete,
    /// At least one deletion was attempted.
    Completed { deleted: usize, failed: usize },
}

impl ScanResult {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Zero candidates and "every deletion failed" are reported differently.
    pub fn outcome(&self) -> ScanOutcome {
        if self.candidates == 0 {
            ScanOutcome::NothingToDelete
        } else {
            ScanOutcome::Completed {
                deleted: self.deleted.len(),
                failed: self.failed.len(),
            }
        }
    }
}

// ──────────────────── cleaner ────────────────────

/// Scans a vault store and deletes blank untitled notes.
pub struct VaultCleaner<S> {
    store: S,
    config: CleanerConfig,
    logger: Option<ActivityLoggerHandle>,
    state: Mutex<CleanerState>,
}

/// Returns the cleaner to `Idle` when a scan ends, however it ends.
struct ScanGuard<'a> {
    state: &'a Mutex<CleanerState>,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = CleanerState::Idle;
    }
}

impl<S: VaultStore> VaultCleaner<S> {
    pub fn new(store: S, config: CleanerConfig, logger: Option<ActivityLoggerHandle>) -> Self {
        Self {
            store,
            config,
            logger,
            state: Mutex::new(CleanerState::Idle),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub fn state(&self) -> CleanerState {
        *self.state.lock()
    }

    /// Find deletion candidates without deleting anything.
    ///
    /// Fails only if the vault cannot be listed; per-file read failures are
    /// recorded in the plan and the file is treated as non-empty.
    pub fn plan(&self) -> Result<CleanupPlan> {
        let files = self.store.list_files()?;
        let mut plan = CleanupPlan {
            files_scanned: files.len(),
            ..CleanupPlan::default()
        };

        for file in files {
            if !is_untitled_name(file.name()) {
                continue;
            }
            plan.name_matches += 1;

            match self.store.read_prefix(&file, CONTENT_PREFIX_CHARS) {
                Ok(prefix) => {
                    if is_blank_content(&prefix) {
                        plan.candidates.push(file);
                    }
                }
                Err(e) => {
                    self.log_event(ActivityEvent::ReadFailed {
                        path: file.path().to_string(),
                        error_code: e.code().to_string(),
                        error_message: e.to_string(),
                    });
                    plan.read_failures.push(FileFailure::new(&file, &e));
                }
            }
        }

        Ok(plan)
    }

    /// Scan the vault and delete every blank untitled note, serially.
    ///
    /// Runs to completion before returning. Returns `ScanInProgress` if
    /// another call on this cleaner has not finished yet.
    pub fn scan_and_delete(&self) -> Result<ScanResult> {
        let _guard = match self.begin_scan() {
            Ok(guard) => guard,
            Err(e) => {
                self.log_event(ActivityEvent::ScanSkipped {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        let start = Instant::now();
        self.log_event(ActivityEvent::ScanStarted {
            vault: self.config.vault_label.clone(),
            dry_run: self.config.dry_run,
        });

        let plan = match self.plan() {
            Ok(plan) => plan,
            Err(e) => {
                self.log_event(ActivityEvent::Error {
                    code: e.code().to_string(),
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let mut report = ScanResult {
            files_scanned: plan.files_scanned,
            name_matches: plan.name_matches,
            candidates: plan.candidates.len(),
            read_failures: plan.read_failures,
            dry_run: self.config.dry_run,
            ..ScanResult::default()
        };

        for file in plan.candidates {
            if self.config.dry_run {
                self.log_event(ActivityEvent::FileDeleted {
                    path: file.path().to_string(),
                    dry_run: true,
                });
                report.deleted.push(file);
                continue;
            }

            match self.store.delete_file(&file) {
                Ok(()) => {
                    self.log_event(ActivityEvent::FileDeleted {
                        path: file.path().to_string(),
                        dry_run: false,
                    });
                    report.deleted.push(file);
                }
                Err(e) => {
                    let failure = FileFailure::new(&file, &e);
                    self.log_event(ActivityEvent::DeletionFailed {
                        path: failure.path.clone(),
                        error_code: failure.error_code.clone(),
                        error_message: failure.error.clone(),
                    });
                    report.failed.push(failure);
                }
            }
        }

        report.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.log_event(ActivityEvent::ScanCompleted {
            files_scanned: report.files_scanned,
            candidates: report.candidates,
            deleted: report.deleted.len(),
            failed: report.failed.len(),
            duration_ms: report.duration_ms,
            dry_run: report.dry_run,
        });

        Ok(report)
    }

    fn begin_scan(&self) -> Result<ScanGuard<'_>> {
        let mut state = self.state.lock();
        if *state == CleanerState::Scanning {
            return Err(VswError::ScanInProgress);
        }
        *state = CleanerState::Scanning;
        Ok(ScanGuard { state: &self.state })
    }

    fn log_event(&self, event: ActivityEvent) {
        if let Some(logger) = &self.logger {
            logger.send(event);
        }
    }
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::memory::MemoryVault;

    fn cleaner(vault: MemoryVault) -> VaultCleaner<MemoryVault> {
        VaultCleaner::new(vault, CleanerConfig::default(), None)
    }

    fn paths(files: &[FileHandle]) -> Vec<&str> {
        files.iter().map(FileHandle::path).collect()
    }

    #[test]
    fn numbered_whitespace_note_is_deleted() {
        let c = cleaner(MemoryVault::new().with_file("Untitled 12.md", "   \n\t  "));
        let report = c.scan_and_delete().unwrap();
        assert_eq!(report.deleted_count(), 1);
        assert!(!c.store().contains("Untitled 12.md"));
    }

    #[test]
    fn untitled_note_with_text_is_kept() {
        let c = cleaner(MemoryVault::new().with_file("Untitled.md", "hello"));
        let report = c.scan_and_delete().unwrap();
        assert_eq!(report.deleted_count(), 0);
        assert_eq!(report.name_matches, 1);
        assert_eq!(report.outcome(), ScanOutcome::NothingToDelete);
        assert!(c.store().contains("Untitled.md"));
    }

    #[test]
    fn digits_without_space_are_never_read_or_deleted() {
        let c = cleaner(MemoryVault::new().with_file("Untitled12.md", ""));
        let report = c.scan_and_delete().unwrap();
        assert_eq!(report.deleted_count(), 0);
        assert!(c.store().reads().is_empty());
        assert!(c.store().contains("Untitled12.md"));
    }

    #[test]
    fn localized_numbered_note_is_deleted() {
        let c = cleaner(MemoryVault::new().with_file("未命名 3.md", ""));
        let report = c.scan_and_delete().unwrap();
        assert_eq!(paths(&report.deleted), vec!["未命名 3.md"]);
    }

    #[test]
    fn names_are_matched_on_the_bare_file_name() {
        let c = cleaner(
            MemoryVault::new()
                .with_file("daily/Untitled 2.md", "")
                .with_file("Untitled/notes.md", ""),
        );
        let report = c.scan_and_delete().unwrap();
        assert_eq!(paths(&report.deleted), vec!["daily/Untitled 2.md"]);
        assert!(c.store().contains("Untitled/notes.md"));
    }

    #[test]
    fn empty_vault_reports_nothing_and_never_deletes() {
        let c = cleaner(
            MemoryVault::new()
                .with_file("ideas.md", "")
                .with_file("Untitled.md", "draft"),
        );
        let report = c.scan_and_delete().unwrap();
        assert_eq!(report.outcome(), ScanOutcome::NothingToDelete);
        assert_eq!(c.store().delete_calls(), 0);
        assert_eq!(report.files_scanned, 2);
    }

    #[test]
    fn read_failure_excludes_file_and_scan_continues() {
        let vault = MemoryVault::new()
            .with_file("Untitled 1.md", "")
            .with_file("Untitled 2.md", "")
            .with_file("Untitled 3.md", "");
        vault.fail_reads_for("Untitled 2.md");
        let c = cleaner(vault);

        let report = c.scan_and_delete().unwrap();
        assert_eq!(paths(&report.deleted), vec!["Untitled 1.md", "Untitled 3.md"]);
        assert_eq!(report.read_failures.len(), 1);
        assert_eq!(report.read_failures[0].path, "Untitled 2.md");
        assert_eq!(report.read_failures[0].error_code, "VSW-2002");
        assert!(c.store().contains("Untitled 2.md"));
    }

    #[test]
    fn delete_failure_is_isolated_and_not_counted() {
        let vault = MemoryVault::new()
            .with_file("Untitled.md", "")
            .with_file("Untitled 1.md", "")
            .with_file("未命名.md", "");
        vault.fail_deletes_for("Untitled 1.md");
        let c = cleaner(vault);

        let report = c.scan_and_delete().unwrap();
        assert_eq!(report.candidates, 3);
        assert_eq!(report.deleted_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failed[0].path, "Untitled 1.md");
        assert_eq!(
            report.outcome(),
            ScanOutcome::Completed {
                deleted: 2,
                failed: 1
            }
        );
        assert_eq!(c.store().delete_calls(), 3);
    }

    #[test]
    fn all_deletions_failing_differs_from_nothing_to_delete() {
        let vault = MemoryVault::new().with_file("Untitled.md", "");
        vault.fail_deletes_for("Untitled.md");
        let report = cleaner(vault).scan_and_delete().unwrap();
        assert_eq!(
            report.outcome(),
            ScanOutcome::Completed {
                deleted: 0,
                failed: 1
            }
        );
    }

    #[test]
    fn second_run_is_idempotent() {
        let c = cleaner(
            MemoryVault::new()
                .with_file("Untitled.md", "")
                .with_file("Untitled 4.md", "\n")
                .with_file("keep.md", ""),
        );
        assert_eq!(c.scan_and_delete().unwrap().deleted_count(), 2);
        let second = c.scan_and_delete().unwrap();
        assert_eq!(second.deleted_count(), 0);
        assert_eq!(second.outcome(), ScanOutcome::NothingToDelete);
        assert_eq!(c.store().paths(), vec!["keep.md"]);
    }

    #[test]
    fn long_leading_whitespace_counts_as_blank() {
        let content = format!("{}text", " ".repeat(CONTENT_PREFIX_CHARS));
        let c = cleaner(MemoryVault::new().with_file("Untitled.md", &content));
        assert_eq!(c.scan_and_delete().unwrap().deleted_count(), 1);
    }

    #[test]
    fn dry_run_reports_without_deleting() {
        let c = VaultCleaner::new(
            MemoryVault::new().with_file("Untitled.md", ""),
            CleanerConfig {
                dry_run: true,
                ..CleanerConfig::default()
            },
            None,
        );
        let report = c.scan_and_delete().unwrap();
        assert!(report.dry_run);
        assert_eq!(report.deleted_count(), 1);
        assert_eq!(c.store().delete_calls(), 0);
        assert!(c.store().contains("Untitled.md"));
    }

    #[test]
    fn plan_previews_candidates_only() {
        let c = cleaner(
            MemoryVault::new()
                .with_file("Untitled.md", "")
                .with_file("Untitled 1.md", "body"),
        );
        let plan = c.plan().unwrap();
        assert_eq!(paths(&plan.candidates), vec!["Untitled.md"]);
        assert_eq!(plan.name_matches, 2);
        assert_eq!(c.store().delete_calls(), 0);
    }

    #[test]
    fn state_returns_to_idle_after_scan() {
        let c = cleaner(MemoryVault::new().with_file("Untitled.md", ""));
        assert_eq!(c.state(), CleanerState::Idle);
        c.scan_and_delete().unwrap();
        assert_eq!(c.state(), CleanerState::Idle);
    }

    struct UnlistableVault;

    impl VaultStore for UnlistableVault {
        fn list_files(&self) -> Result<Vec<FileHandle>> {
            Err(VswError::PermissionDenied {
                path: "/vault".into(),
            })
        }

        fn read_content(&self, _file: &FileHandle) -> Result<String> {
            unreachable!("nothing is listed")
        }

        fn delete_file(&self, _file: &FileHandle) -> Result<()> {
            unreachable!("nothing is listed")
        }
    }

    #[test]
    fn listing_failure_aborts_and_resets_state() {
        let c = VaultCleaner::new(UnlistableVault, CleanerConfig::default(), None);
        let err = c.scan_and_delete().unwrap_err();
        assert_eq!(err.code(), "VSW-3001");
        assert_eq!(c.state(), CleanerState::Idle);
    }
}
