//! Core types shared by the reconciler and the gateway.

use serde::{Deserialize, Serialize};

/// A remote catalog entry identifying one published API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingRef {
    pub id: String,
    pub name: String,
}

/// One published revision of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionRecord {
    pub id: String,
    /// Semantic-version-formatted version name.
    pub name: String,
    /// Whether consumers resolve to this version by default.
    pub current: bool,
}

/// Owner filter applied when searching for listings.
///
/// Listings are only unique per (name, owner) pair, so hubs shared between
/// teams should always be searched with an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnerScope {
    #[default]
    Any,
    Owner(u64),
}

impl OwnerScope {
    pub fn from_owner_id(owner_id: Option<u64>) -> Self {
        owner_id.map_or(OwnerScope::Any, OwnerScope::Owner)
    }

    pub fn owner_id(&self) -> Option<u64> {
        match self {
            OwnerScope::Any => None,
            OwnerScope::Owner(id) => Some(*id),
        }
    }
}

/// How a reconciliation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// A new listing was created from the spec.
    Created,
    /// A new version was published and made current.
    Updated,
    /// The spec is not newer than the current version; nothing was changed.
    Rejected,
}

/// Result of one reconciliation run.
///
/// For [`Outcome::Rejected`] the version fields describe the current remote
/// version that blocked the publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub outcome: Outcome,
    pub api_id: String,
    pub version_id: String,
    pub version_name: String,
}

impl ReconciliationResult {
    pub fn is_success(&self) -> bool {
        self.outcome != Outcome::Rejected
    }
}
