//! Spec document loading.
//!
//! Only the `info` block is interpreted; the rest of the document is carried
//! as raw bytes and uploaded unchanged.

use std::path::Path;

use serde_json::Value;

use crate::error::SyncError;

/// Upload file name for documents that were not read from disk.
pub const DEFAULT_FILE_NAME: &str = "openapi.json";

/// A local OpenAPI document, read once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDocument {
    /// `info.title`
    pub name: String,
    /// `info.version`, not yet parsed as semver.
    pub version: String,
    /// `info.description`
    pub description: Option<String>,
    /// Base name of the file the document was read from.
    pub file_name: Option<String>,
    pub raw: Vec<u8>,
}

impl SpecDocument {
    /// Name the document is uploaded under.
    pub fn upload_file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME)
    }
}

/// Read a spec document from a file path.
///
/// # Errors
///
/// Returns `SyncError::SpecNotFound` if the file doesn't exist,
/// `SyncError::InvalidJson` if it isn't valid JSON, or
/// `SyncError::MissingField` if `info.title` or `info.version` is absent.
pub fn read_spec(path: &Path) -> Result<SpecDocument, SyncError> {
    if !path.exists() {
        return Err(SyncError::SpecNotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = std::fs::read(path).map_err(|source| SyncError::SpecRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut spec = parse_spec(raw)?;
    spec.file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(spec)
}

/// Parse a spec document from raw bytes.
///
/// # Errors
///
/// Returns `SyncError::InvalidJson` or `SyncError::MissingField`.
pub fn parse_spec(raw: Vec<u8>) -> Result<SpecDocument, SyncError> {
    let document: Value =
        serde_json::from_slice(&raw).map_err(|source| SyncError::InvalidJson { source })?;
    let info = document.get("info");

    let name = info_string(info, "title").ok_or(SyncError::MissingField {
        field: "info.title",
    })?;
    let version = info_string(info, "version").ok_or(SyncError::MissingField {
        field: "info.version",
    })?;
    let description = info_string(info, "description");

    Ok(SpecDocument {
        name,
        version,
        description,
        file_name: None,
        raw,
    })
}

fn info_string(info: Option<&Value>, key: &str) -> Option<String> {
    info?.get(key)?.as_str().map(str::to_string)
}
