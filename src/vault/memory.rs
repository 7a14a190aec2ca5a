//! In-memory vault for tests and embedding hosts without a real filesystem.
//!
//! Supports fault injection: individual paths can be made to fail on read or
//! delete, and every read/delete call is recorded.

#![allow(missing_docs)]

use std::collections::{BTreeMap, HashSet};
use std::io::{self, ErrorKind};

use parking_lot::Mutex;

use crate::core::errors::{Result, VswError};
use crate::vault::store::{FileHandle, VaultStore};

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<String, String>,
    failing_reads: HashSet<String>,
    failing_deletes: HashSet<String>,
    reads: Vec<String>,
    delete_calls: usize,
}

/// A vault held entirely in memory, listed in path order.
#[derive(Debug, Default)]
pub struct MemoryVault {
    inner: Mutex<Inner>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&self, path: &str, content: &str) {
        self.inner
            .lock()
            .files
            .insert(path.to_string(), content.to_string());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.lock().files.contains_key(path)
    }

    pub fn paths(&self) -> Vec<String> {
        self.inner.lock().files.keys().cloned().collect()
    }

    /// Make every read of `path` fail with a permission error.
    pub fn fail_reads_for(&self, path: &str) {
        self.inner.lock().failing_reads.insert(path.to_string());
    }

    /// Make every delete of `path` fail with a permission error.
    pub fn fail_deletes_for(&self, path: &str) {
        self.inner.lock().failing_deletes.insert(path.to_string());
    }

    /// Paths read so far, in call order.
    pub fn reads(&self) -> Vec<String> {
        self.inner.lock().reads.clone()
    }

    /// Number of delete calls made, successful or not.
    pub fn delete_calls(&self) -> usize {
        self.inner.lock().delete_calls
    }
}

impl VaultStore for MemoryVault {
    fn list_files(&self) -> Result<Vec<FileHandle>> {
        Ok(self
            .inner
            .lock()
            .files
            .keys()
            .map(|path| FileHandle::new(path.as_str()))
            .collect())
    }

    fn read_content(&self, file: &FileHandle) -> Result<String> {
        let mut inner = self.inner.lock();
        inner.reads.push(file.path().to_string());
        if inner.failing_reads.contains(file.path()) {
            return Err(VswError::read(
                file.path(),
                io::Error::new(ErrorKind::PermissionDenied, "injected read failure"),
            ));
        }
        inner.files.get(file.path()).cloned().ok_or_else(|| {
            VswError::read(file.path(), io::Error::from(ErrorKind::NotFound))
        })
    }

    fn delete_file(&self, file: &FileHandle) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.delete_calls += 1;
        if inner.failing_deletes.contains(file.path()) {
            return Err(VswError::delete(
                file.path(),
                io::Error::new(ErrorKind::PermissionDenied, "injected delete failure"),
            ));
        }
        inner
            .files
            .remove(file.path())
            .map(|_| ())
            .ok_or_else(|| VswError::delete(file.path(), io::Error::from(ErrorKind::NotFound)))
    }
}
