//! Current version resolution.
//!
//! The catalog is expected to keep exactly one active version marked
//! current per listing. Anything else is reported instead of guessed at.

use semver::Version;
use tracing::debug;

use crate::error::{SyncError, VersionSource};
use crate::gateway::RemoteGateway;
use crate::types::VersionRecord;

/// Fetch the active versions of a listing and return the current one.
///
/// # Errors
///
/// Returns `SyncError::NoCurrentVersion` if zero or several active versions
/// are marked current, or any error from the gateway.
pub fn current_version<G: RemoteGateway + ?Sized>(
    gateway: &G,
    listing_id: &str,
) -> Result<VersionRecord, SyncError> {
    let versions = gateway.list_active_versions(listing_id)?;
    debug!(listing_id, active = versions.len(), "fetched active versions");
    select_current(listing_id, versions)
}

/// Pick the single record marked current.
pub fn select_current(
    listing_id: &str,
    versions: Vec<VersionRecord>,
) -> Result<VersionRecord, SyncError> {
    let mut current: Vec<VersionRecord> = versions.into_iter().filter(|v| v.current).collect();
    if current.len() != 1 {
        return Err(SyncError::NoCurrentVersion {
            listing_id: listing_id.to_string(),
            marked: current.len(),
        });
    }
    Ok(current.remove(0))
}

/// Parse a version string as `major.minor.patch[-pre][+build]`.
///
/// No leniency: a leading `v` or a missing patch component is an error.
pub fn parse_version(side: VersionSource, value: &str) -> Result<Version, SyncError> {
    Version::parse(value).map_err(|source| SyncError::VersionParse {
        side,
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, current: bool) -> VersionRecord {
        VersionRecord {
            id: id.into(),
            name: name.into(),
            current,
        }
    }

    #[test]
    fn selects_the_current_record() {
        let versions = vec![
            record("v1", "1.0.0", false),
            record("v2", "1.1.0", true),
            record("v3", "1.2.0-beta.1", false),
        ];
        let current = select_current("api_1", versions).unwrap();
        assert_eq!(current.id, "v2");
    }

    #[test]
    fn none_marked_current() {
        let versions = vec![record("v1", "1.0.0", false)];
        let result = select_current("api_1", versions);
        assert!(matches!(
            result,
            Err(SyncError::NoCurrentVersion { marked: 0, .. })
        ));
    }

    #[test]
    fn empty_version_set() {
        let result = select_current("api_1", Vec::new());
        assert!(matches!(
            result,
            Err(SyncError::NoCurrentVersion { marked: 0, .. })
        ));
    }

    #[test]
    fn several_marked_current() {
        let versions = vec![record("v1", "1.0.0", true), record("v2", "1.1.0", true)];
        let result = select_current("api_1", versions);
        assert!(matches!(
            result,
            Err(SyncError::NoCurrentVersion { marked: 2, .. })
        ));
    }

    #[test]
    fn parse_version_accepts_prerelease_and_build() {
        let version = parse_version(VersionSource::Spec, "1.2.0-rc.1+build.5").unwrap();
        assert_eq!(version.major, 1);
        assert_eq!(version.pre.as_str(), "rc.1");
        assert_eq!(version.build.as_str(), "build.5");
    }

    #[test]
    fn parse_version_rejects_prefix_and_short_forms() {
        for value in ["v1.2.0", "1.2", "latest", ""] {
            let result = parse_version(VersionSource::Remote, value);
            assert!(
                matches!(
                    result,
                    Err(SyncError::VersionParse {
                        side: VersionSource::Remote,
                        ..
                    })
                ),
                "{value} should not parse"
            );
        }
    }
}
