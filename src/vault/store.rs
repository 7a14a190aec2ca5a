//! The storage seam: file handles and the three-capability vault store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::core::paths;

/// Reference to one document in the vault.
///
/// Handles are produced by a [`VaultStore`] and stay valid for the duration of
/// a scan. `path` is vault-relative with `/` separators; `name` is its last
/// segment, extension included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileHandle {
    path: String,
    name: String,
}

impl FileHandle {
    /// Build a handle from a vault path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = paths::file_name(&path).to_string();
        Self { path, name }
    }

    /// Bare file name, e.g. `Untitled 2.md`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vault-relative path, used for diagnostics and addressing.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Host-provided document storage.
///
/// Implementations must be usable through a shared reference: the cleaner
/// never needs exclusive access to the store.
pub trait VaultStore {
    /// Every file currently in the vault, unfiltered.
    fn list_files(&self) -> Result<Vec<FileHandle>>;

    /// Full textual content of `file`.
    fn read_content(&self, file: &FileHandle) -> Result<String>;

    /// At most the first `max_chars` characters of `file`.
    ///
    /// The default reads the whole file; stores that can bound the read
    /// should override this.
    fn read_prefix(&self, file: &FileHandle, max_chars: usize) -> Result<String> {
        let content = self.read_content(file)?;
        Ok(content.chars().take(max_chars).collect())
    }

    /// Permanently remove `file`.
    fn delete_file(&self, file: &FileHandle) -> Result<()>;
}

impl<S: VaultStore + ?Sized> VaultStore for &S {
    fn list_files(&self) -> Result<Vec<FileHandle>> {
        (**self).list_files()
    }

    fn read_content(&self, file: &FileHandle) -> Result<String> {
        (**self).read_content(file)
    }

    fn read_prefix(&self, file: &FileHandle, max_chars: usize) -> Result<String> {
        (**self).read_prefix(file, max_chars)
    }

    fn delete_file(&self, file: &FileHandle) -> Result<()> {
        (**self).delete_file(file)
    }
}

impl<S: VaultStore + ?Sized> VaultStore for std::sync::Arc<S> {
    fn list_files(&self) -> Result<Vec<FileHandle>> {
        (**self).list_files()
    }

    fn read_content(&self, file: &FileHandle) -> Result<String> {
        (**self).read_content(file)
    }

    fn read_prefix(&self, file: &FileHandle, max_chars: usize) -> Result<String> {
        (**self).read_prefix(file, max_chars)
    }

    fn delete_file(&self, file: &FileHandle) -> Result<()> {
        (**self).delete_file(file)
    }
}
