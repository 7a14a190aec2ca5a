//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, VswError};

/// Full vault sweeper configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub vault: VaultConfig,
    pub cleaner: CleanerSettings,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Which directory is the vault and what counts as part of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VaultConfig {
    pub root: PathBuf,
    /// Dot-prefixed files and folders are hidden from the vault unless set.
    pub include_hidden: bool,
    pub follow_symlinks: bool,
}

/// Cleaner behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CleanerSettings {
    pub dry_run: bool,
}

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub jsonl_log: PathBuf,
    pub fallback_log: Option<PathBuf>,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
}

/// Filesystem paths used by vsw itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub data_dir: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            include_hidden: false,
            follow_symlinks: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let data = PathsConfig::default().data_dir;
        Self {
            enabled: true,
            jsonl_log: data.join("activity.jsonl"),
            fallback_log: Some(env::temp_dir().join("vsw-activity.jsonl")),
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[VSW-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            config_file: home_dir.join(".config").join("vsw").join("config.toml"),
            data_dir: home_dir.join(".local").join("share").join("vsw"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| VswError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(VswError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.normalize_paths();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for the activity log.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("VSW_VAULT_ROOT") {
            self.vault.root = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("VSW_VAULT_INCLUDE_HIDDEN") {
            self.vault.include_hidden = parse_env_bool("VSW_VAULT_INCLUDE_HIDDEN", &raw)?;
        }
        if let Some(raw) = lookup("VSW_VAULT_FOLLOW_SYMLINKS") {
            self.vault.follow_symlinks = parse_env_bool("VSW_VAULT_FOLLOW_SYMLINKS", &raw)?;
        }
        if let Some(raw) = lookup("VSW_CLEANER_DRY_RUN") {
            self.cleaner.dry_run = parse_env_bool("VSW_CLEANER_DRY_RUN", &raw)?;
        }
        if let Some(raw) = lookup("VSW_LOGGING_ENABLED") {
            self.logging.enabled = parse_env_bool("VSW_LOGGING_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("VSW_LOGGING_JSONL_LOG") {
            self.logging.jsonl_log = PathBuf::from(raw);
        }
        Ok(())
    }

    /// Strip trailing slashes so the vault root compares consistently.
    fn normalize_paths(&mut self) {
        let s = self.vault.root.to_string_lossy();
        if s.len() > 1
            && let Some(stripped) = s.strip_suffix('/')
        {
            self.vault.root = PathBuf::from(stripped);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.vault.root.as_os_str().is_empty() {
            return Err(VswError::InvalidConfig {
                details: "vault.root must not be empty".to_string(),
            });
        }

        if self.logging.max_size_bytes == 0 {
            return Err(VswError::InvalidConfig {
                details: "logging.max_size_bytes must be > 0".to_string(),
            });
        }
        if self.logging.max_rotated_files == 0 {
            return Err(VswError::InvalidConfig {
                details: "logging.max_rotated_files must be >= 1".to_string(),
            });
        }
        if self.logging.enabled && self.logging.jsonl_log.as_os_str().is_empty() {
            return Err(VswError::InvalidConfig {
                details: "logging.jsonl_log must be set when logging is enabled".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.trim()
        .parse::<bool>()
        .map_err(|error| VswError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
