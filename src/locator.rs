//! Listing discovery.

use tracing::debug;

use crate::error::SyncError;
use crate::gateway::RemoteGateway;
use crate::types::{ListingRef, OwnerScope};

/// Find the listing named `name` within `owner`.
///
/// Returns `None` when no listing matches. Several matches mean the catalog
/// is misconfigured; no attempt is made to pick one.
///
/// # Errors
///
/// Returns `SyncError::AmbiguousListing` for more than one match, or any
/// error from the gateway.
pub fn locate<G: RemoteGateway + ?Sized>(
    gateway: &G,
    name: &str,
    owner: OwnerScope,
) -> Result<Option<ListingRef>, SyncError> {
    let mut matches = gateway.find_listing(name, owner)?;
    debug!(name, count = matches.len(), "listing search finished");

    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop()),
        count => Err(SyncError::AmbiguousListing {
            name: name.to_string(),
            count,
        }),
    }
}
