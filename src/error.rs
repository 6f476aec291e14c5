//! Error types for listing reconciliation.

use std::path::PathBuf;
use thiserror::Error;

/// Which side of the comparison a version string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    Spec,
    Remote,
}

impl std::fmt::Display for VersionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionSource::Spec => write!(f, "spec"),
            VersionSource::Remote => write!(f, "remote current"),
        }
    }
}

/// Errors that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    // Configuration errors (exit code 2)
    #[error("the setting {name} is required (flag or {env})")]
    MissingSetting {
        name: &'static str,
        env: &'static str,
    },

    #[error("invalid value for {name}: {message}")]
    InvalidSetting { name: &'static str, message: String },

    // Spec parse errors (exit code 3)
    #[error("spec file not found: {path}")]
    SpecNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    SpecRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in spec: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("spec is missing required string field {field}")]
    MissingField { field: &'static str },

    // Version parse errors (exit code 4)
    #[error("{side} version \"{value}\" is not a semantic version: {source}")]
    VersionParse {
        side: VersionSource,
        value: String,
        #[source]
        source: semver::Error,
    },

    #[error("more than one listing named \"{name}\" found ({count} matches)")]
    AmbiguousListing { name: String, count: usize },

    #[error("listing {listing_id} has {marked} active versions marked current, expected exactly one")]
    NoCurrentVersion { listing_id: String, marked: usize },

    // Remote errors (exit code 7)
    #[error("{operation} failed: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    #[cfg(feature = "remote")]
    #[error("{operation} request to {url} failed: {source}")]
    Transport {
        operation: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("spec version {spec_version} is not newer than current version {current_version}")]
    Rejected {
        spec_version: String,
        current_version: String,
    },
}

impl SyncError {
    /// Build a remote error from any displayable cause.
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        SyncError::Remote {
            operation,
            message: message.into(),
        }
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::Rejected { .. } => 1,
            SyncError::MissingSetting { .. } | SyncError::InvalidSetting { .. } => 2,
            SyncError::SpecNotFound { .. }
            | SyncError::SpecRead { .. }
            | SyncError::InvalidJson { .. }
            | SyncError::MissingField { .. } => 3,
            SyncError::VersionParse { .. } => 4,
            SyncError::AmbiguousListing { .. } => 5,
            SyncError::NoCurrentVersion { .. } => 6,
            SyncError::Remote { .. } => 7,
            #[cfg(feature = "remote")]
            SyncError::Transport { .. } => 7,
        }
    }

    /// Returns true if the run stopped because the spec was not newer.
    pub fn is_rejected(&self) -> bool {
        matches!(self, SyncError::Rejected { .. })
    }
}
