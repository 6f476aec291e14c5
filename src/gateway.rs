//! The boundary between the reconciler and the remote catalog.

use crate::error::SyncError;
use crate::types::{ListingRef, OwnerScope, VersionRecord};

/// Read and write operations against the remote API catalog.
///
/// Every call is a network round trip and none of the mutating calls are
/// idempotent: calling [`create_version`](RemoteGateway::create_version)
/// twice creates two versions.
pub trait RemoteGateway {
    /// Search listings whose name equals `name` exactly.
    fn find_listing(&self, name: &str, owner: OwnerScope) -> Result<Vec<ListingRef>, SyncError>;

    /// Fetch every version of a listing with active status.
    fn list_active_versions(&self, listing_id: &str) -> Result<Vec<VersionRecord>, SyncError>;

    /// Create a listing, and its initial version, from a spec file.
    ///
    /// `file_name` is the name the spec is uploaded under. A gateway may
    /// derive the listing's name and description from the spec itself
    /// instead of using `name` and `description`.
    fn create_listing(
        &self,
        spec: &[u8],
        file_name: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<String, SyncError>;

    /// Create an empty version resource and return its id.
    fn create_version(&self, listing_id: &str, version_name: &str) -> Result<String, SyncError>;

    /// Attach spec content to an existing version.
    fn upload_spec_to_version(
        &self,
        listing_id: &str,
        version_id: &str,
        spec: &[u8],
        file_name: &str,
    ) -> Result<(), SyncError>;

    /// Mark a version as current.
    fn set_version_active(&self, version_id: &str) -> Result<(), SyncError>;
}

impl<G: RemoteGateway + ?Sized> RemoteGateway for &G {
    fn find_listing(&self, name: &str, owner: OwnerScope) -> Result<Vec<ListingRef>, SyncError> {
        (**self).find_listing(name, owner)
    }

    fn list_active_versions(&self, listing_id: &str) -> Result<Vec<VersionRecord>, SyncError> {
        (**self).list_active_versions(listing_id)
    }

    fn create_listing(
        &self,
        spec: &[u8],
        file_name: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<String, SyncError> {
        (**self).create_listing(spec, file_name, name, description)
    }

    fn create_version(&self, listing_id: &str, version_name: &str) -> Result<String, SyncError> {
        (**self).create_version(listing_id, version_name)
    }

    fn upload_spec_to_version(
        &self,
        listing_id: &str,
        version_id: &str,
        spec: &[u8],
        file_name: &str,
    ) -> Result<(), SyncError> {
        (**self).upload_spec_to_version(listing_id, version_id, spec, file_name)
    }

    fn set_version_active(&self, version_id: &str) -> Result<(), SyncError> {
        (**self).set_version_active(version_id)
    }
}
