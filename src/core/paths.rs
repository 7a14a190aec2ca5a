//! Path helpers shared by the vault store and the CLI.
//!
//! Vault paths are always relative to the vault root and use `/` as the
//! separator, whatever the host platform uses.

use std::env;
use std::path::{Component, Path, PathBuf};

/// Resolve a vault root to an absolute, normalized path.
///
/// Canonicalizes when the path exists; otherwise makes it absolute relative to
/// the CWD and resolves `.`/`..` syntactically.
pub fn resolve_absolute_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    if let Ok(canonical) = std::fs::canonicalize(&absolute) {
        return canonical;
    }

    let mut components = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                }
            }
        }
    }
    components.into_iter().collect()
}

/// Render `path` (which must live under `root`) as a `/`-separated vault path.
///
/// Returns `None` when the path escapes the root or any component is not
/// valid UTF-8; such files cannot be addressed by a string handle.
pub fn to_vault_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Map a `/`-separated vault path back onto the filesystem under `root`.
///
/// Rejects absolute paths and `..` segments so a handle can never point
/// outside the vault.
pub fn from_vault_path(root: &Path, vault_path: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    for segment in vault_path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return None;
        }
        resolved.push(segment);
    }
    Some(resolved)
}

/// Bare file name of a vault path (the segment after the last `/`).
pub fn file_name(vault_path: &str) -> &str {
    vault_path.rsplit('/').next().unwrap_or(vault_path)
}
