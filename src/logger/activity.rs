//! Activity logger: a dedicated thread owns the JSONL writer.
//!
//! Callers hold a cloneable [`ActivityLoggerHandle`] and send [`ActivityEvent`]s
//! over a bounded crossbeam channel. `send()` never blocks; when the channel is
//! full the event is dropped and counted.

#![allow(missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use crate::core::errors::{Result, VswError};
use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};

/// Default bounded channel capacity for log events.
const CHANNEL_CAPACITY: usize = 1024;

/// Events emitted by a cleanup run.
#[derive(Debug, Clone)]
pub enum ActivityEvent {
    ScanStarted {
        vault: String,
        dry_run: bool,
    },
    /// A second run was refused because one is already in progress.
    ScanSkipped {
        reason: String,
    },
    ReadFailed {
        path: String,
        error_code: String,
        error_message: String,
    },
    FileDeleted {
        path: String,
        dry_run: bool,
    },
    DeletionFailed {
        path: String,
        error_code: String,
        error_message: String,
    },
    ScanCompleted {
        files_scanned: usize,
        candidates: usize,
        deleted: usize,
        failed: usize,
        duration_ms: u64,
        dry_run: bool,
    },
    Error {
        code: String,
        message: String,
    },
    /// Sentinel to request graceful shutdown of the logger thread.
    Shutdown,
}

/// Thread-safe, cheaply-cloneable handle for sending log events.
#[derive(Clone)]
pub struct ActivityLoggerHandle {
    tx: Sender<ActivityEvent>,
    dropped_events: Arc<AtomicU64>,
}

impl ActivityLoggerHandle {
    /// Send an event to the logger thread. Non-blocking.
    pub fn send(&self, event: ActivityEvent) {
        if let Err(TrySendError::Full(_)) = self.tx.try_send(event) {
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
        }
        // Disconnected is fine during shutdown.
    }

    /// Total events dropped due to channel back-pressure since spawn.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Ask the logger thread to flush and exit.
    pub fn shutdown(&self) {
        let _ = self.tx.send(ActivityEvent::Shutdown);
    }
}

/// Options for the logger thread.
pub struct ActivityLoggerConfig {
    pub jsonl_config: JsonlConfig,
    pub channel_capacity: usize,
}

impl ActivityLoggerConfig {
    pub fn new(jsonl_config: JsonlConfig) -> Self {
        Self {
            jsonl_config,
            channel_capacity: CHANNEL_CAPACITY,
        }
    }
}

/// Spawn the logger thread and return a handle plus its join handle.
///
/// The thread runs until `handle.shutdown()` is called or every sender is
/// dropped.
pub fn spawn_logger(
    config: ActivityLoggerConfig,
) -> Result<(ActivityLoggerHandle, thread::JoinHandle<()>)> {
    let (tx, rx) = bounded::<ActivityEvent>(config.channel_capacity);
    let dropped = Arc::new(AtomicU64::new(0));
    let dropped_clone = Arc::clone(&dropped);

    let handle = ActivityLoggerHandle {
        tx,
        dropped_events: dropped,
    };

    let join = thread::Builder::new()
        .name("vsw-logger".to_string())
        .spawn(move || logger_thread_main(&rx, config.jsonl_config, &dropped_clone))
        .map_err(|e| VswError::Runtime {
            details: format!("failed to spawn logger thread: {e}"),
        })?;

    Ok((handle, join))
}

fn logger_thread_main(rx: &Receiver<ActivityEvent>, config: JsonlConfig, dropped: &AtomicU64) {
    let mut jsonl = JsonlWriter::open(config);
    let mut reported = 0;

    while let Ok(event) = rx.recv() {
        let total = dropped.load(Ordering::Relaxed);
        if total > reported {
            let mut warn = LogEntry::new(EventType::Error, Severity::Warning);
            warn.details = Some(format!(
                "{} log events dropped due to back-pressure",
                total - reported
            ));
            jsonl.write_entry(&warn);
            reported = total;
        }

        if matches!(event, ActivityEvent::Shutdown) {
            break;
        }
        if let Some(entry) = event_to_log_entry(&event) {
            jsonl.write_entry(&entry);
        }
    }

    jsonl.sync();
}

fn event_to_log_entry(event: &ActivityEvent) -> Option<LogEntry> {
    let entry = match event {
        ActivityEvent::ScanStarted { vault, dry_run } => {
            let mut e = LogEntry::new(EventType::ScanStart, Severity::Info);
            e.vault = Some(vault.clone());
            e.dry_run = Some(*dry_run);
            e
        }
        ActivityEvent::ScanSkipped { reason } => {
            let mut e = LogEntry::new(EventType::ScanSkipped, Severity::Warning);
            e.details = Some(reason.clone());
            e.ok = Some(false);
            e
        }
        ActivityEvent::ReadFailed {
            path,
            error_code,
            error_message,
        } => {
            let mut e = LogEntry::new(EventType::ReadFailed, Severity::Warning);
            e.path = Some(path.clone());
            e.ok = Some(false);
            e.error_code = Some(error_code.clone());
            e.error_message = Some(error_message.clone());
            e
        }
        ActivityEvent::FileDeleted { path, dry_run } => {
            let mut e = LogEntry::new(EventType::FileDelete, Severity::Info);
            e.path = Some(path.clone());
            e.dry_run = Some(*dry_run);
            e.ok = Some(true);
            e
        }
        ActivityEvent::DeletionFailed {
            path,
            error_code,
            error_message,
        } => {
            let mut e = LogEntry::new(EventType::DeleteFailed, Severity::Error);
            e.path = Some(path.clone());
            e.ok = Some(false);
            e.error_code = Some(error_code.clone());
            e.error_message = Some(error_message.clone());
            e
        }
        ActivityEvent::ScanCompleted {
            files_scanned,
            candidates,
            deleted,
            failed,
            duration_ms,
            dry_run,
        } => {
            let mut e = LogEntry::new(EventType::ScanComplete, Severity::Info);
            e.files_scanned = Some(*files_scanned);
            e.candidates = Some(*candidates);
            e.deleted = Some(*deleted);
            e.failed = Some(*failed);
            e.duration_ms = Some(*duration_ms);
            e.dry_run = Some(*dry_run);
            e.ok = Some(*failed == 0);
            e
        }
        ActivityEvent::Error { code, message } => {
            let mut e = LogEntry::new(EventType::Error, Severity::Error);
            e.error_code = Some(code.clone());
            e.error_message = Some(message.clone());
            e
        }
        ActivityEvent::Shutdown => return None,
    };
    Some(entry)
}
