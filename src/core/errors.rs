//! VSW-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, VswError>;

/// Top-level error type for the vault sweeper.
#[derive(Debug, Error)]
pub enum VswError {
    #[error("[VSW-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[VSW-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[VSW-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[VSW-2001] unusable vault root {path}: {details}")]
    VaultRoot { path: PathBuf, details: String },

    #[error("[VSW-2002] failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[VSW-2003] failed to delete {path}: {source}")]
    Delete {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[VSW-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[VSW-3001] permission denied for {path}")]
    PermissionDenied { path: PathBuf },

    #[error("[VSW-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[VSW-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[VSW-3004] a vault scan is already in progress")]
    ScanInProgress,

    #[error("[VSW-3005] unknown command: {id}")]
    UnknownCommand { id: String },

    #[error("[VSW-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl VswError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "VSW-1001",
            Self::MissingConfig { .. } => "VSW-1002",
            Self::ConfigParse { .. } => "VSW-1003",
            Self::VaultRoot { .. } => "VSW-2001",
            Self::Read { .. } => "VSW-2002",
            Self::Delete { .. } => "VSW-2003",
            Self::Serialization { .. } => "VSW-2101",
            Self::PermissionDenied { .. } => "VSW-3001",
            Self::Io { .. } => "VSW-3002",
            Self::ChannelClosed { .. } => "VSW-3003",
            Self::ScanInProgress => "VSW-3004",
            Self::UnknownCommand { .. } => "VSW-3005",
            Self::Runtime { .. } => "VSW-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::Read { .. }
                | Self::Delete { .. }
                | Self::ChannelClosed { .. }
                | Self::ScanInProgress
                | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Read failure on a vault file, keyed by its vault path.
    #[must_use]
    pub fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Delete failure on a vault file, keyed by its vault path.
    #[must_use]
    pub fn delete(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Delete {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for VswError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for VswError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
