//! On-disk vault: a directory tree of notes addressed by vault-relative paths.
//!
//! Listing mirrors what a note-taking host exposes as "all files": every
//! regular file under the root, minus dot-prefixed entries (the host keeps its
//! own settings there) unless `include_hidden` is set. Symlinks are skipped
//! unless `follow_symlinks` is set, in which case directory loops are cut by
//! canonical path.

#![allow(missing_docs)]

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::core::config::VaultConfig;
use crate::core::errors::{Result, VswError};
use crate::core::paths::{from_vault_path, resolve_absolute_path, to_vault_path};
use crate::vault::store::{FileHandle, VaultStore};

/// Worst-case UTF-8 width; bounds a character-limited read in bytes.
const MAX_UTF8_BYTES_PER_CHAR: usize = 4;

/// Listing options for an on-disk vault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsVaultOptions {
    pub include_hidden: bool,
    pub follow_symlinks: bool,
}

/// Vault store backed by a local directory.
#[derive(Debug, Clone)]
pub struct FsVaultStore {
    root: PathBuf,
    options: FsVaultOptions,
}

impl FsVaultStore {
    /// Open the vault rooted at `root`. The root must be an existing directory.
    pub fn open(root: &Path, options: FsVaultOptions) -> Result<Self> {
        let root = resolve_absolute_path(root);
        let meta = fs::metadata(&root).map_err(|e| VswError::VaultRoot {
            path: root.clone(),
            details: e.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(VswError::VaultRoot {
                path: root,
                details: "not a directory".to_string(),
            });
        }
        Ok(Self { root, options })
    }

    /// Open the vault described by the `[vault]` config section.
    pub fn from_config(config: &VaultConfig) -> Result<Self> {
        Self::open(
            &config.root,
            FsVaultOptions {
                include_hidden: config.include_hidden,
                follow_symlinks: config.follow_symlinks,
            },
        )
    }

    /// Absolute vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, file: &FileHandle) -> io::Result<PathBuf> {
        from_vault_path(&self.root, file.path()).ok_or_else(|| {
            io::Error::new(ErrorKind::InvalidInput, "path does not resolve inside the vault")
        })
    }

    fn is_hidden(&self, name: &str) -> bool {
        !self.options.include_hidden && name.starts_with('.')
    }
}

impl VaultStore for FsVaultStore {
    fn list_files(&self) -> Result<Vec<FileHandle>> {
        let mut files = Vec::new();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut pending = vec![self.root.clone()];
        visited.insert(self.root.clone());

        while let Some(dir) = pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if dir == self.root => {
                    if e.kind() == ErrorKind::PermissionDenied {
                        return Err(VswError::PermissionDenied { path: dir });
                    }
                    return Err(VswError::io(&dir, e));
                }
                // Unreadable subfolders are simply not part of the visible vault.
                Err(_) => continue,
            };

            for entry in entries.flatten() {
                let path = entry.path();
                let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                    continue;
                };
                if self.is_hidden(&name) {
                    continue;
                }
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };

                let (is_dir, is_file) = if file_type.is_symlink() {
                    if !self.options.follow_symlinks {
                        continue;
                    }
                    match fs::metadata(&path) {
                        Ok(target) => (target.is_dir(), target.is_file()),
                        Err(_) => continue, // dangling
                    }
                } else {
                    (file_type.is_dir(), file_type.is_file())
                };

                if is_dir {
                    let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
                    if visited.insert(key) {
                        pending.push(path);
                    }
                } else if is_file
                    && let Some(vault_path) = to_vault_path(&self.root, &path)
                {
                    files.push(FileHandle::new(vault_path));
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn read_content(&self, file: &FileHandle) -> Result<String> {
        let path = self
            .locate(file)
            .map_err(|e| VswError::read(file.path(), e))?;
        let bytes = fs::read(&path).map_err(|e| VswError::read(file.path(), e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn read_prefix(&self, file: &FileHandle, max_chars: usize) -> Result<String> {
        let path = self
            .locate(file)
            .map_err(|e| VswError::read(file.path(), e))?;
        let handle = File::open(&path).map_err(|e| VswError::read(file.path(), e))?;

        // Any `max_chars` complete characters fit in this many bytes; a
        // sequence cut at the boundary only ever lands after them.
        let limit = u64::try_from(max_chars.saturating_mul(MAX_UTF8_BYTES_PER_CHAR))
            .unwrap_or(u64::MAX);
        let mut bytes = Vec::new();
        handle
            .take(limit)
            .read_to_end(&mut bytes)
            .map_err(|e| VswError::read(file.path(), e))?;

        Ok(String::from_utf8_lossy(&bytes)
            .chars()
            .take(max_chars)
            .collect())
    }

    fn delete_file(&self, file: &FileHandle) -> Result<()> {
        let path = self
            .locate(file)
            .map_err(|e| VswError::delete(file.path(), e))?;
        let meta = fs::symlink_metadata(&path).map_err(|e| VswError::delete(file.path(), e))?;
        if meta.is_dir() {
            return Err(VswError::delete(
                file.path(),
                io::Error::new(ErrorKind::InvalidInput, "handle refers to a directory"),
            ));
        }

        fs::remove_file(&path).map_err(|e| VswError::delete(file.path(), e))?;

        if fs::symlink_metadata(&path).is_ok() {
            return Err(VswError::Runtime {
                details: format!("file still exists after deletion: {}", file.path()),
            });
        }
        Ok(())
    }
}
