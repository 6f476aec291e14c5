//! The reconciliation state machine.
//!
//! One run walks from `Discover` to a terminal state:
//!
//! ```text
//! Discover ─┬─> CreateNew ───────────────────────────────────────────> Done (created)
//!           └─> CompareVersions ─┬─> CreateVersion -> UpdateVersion
//!                                │     -> ActivateVersion ───────────> Done (updated)
//!                                └─> Rejected ───────────────────────> Done (rejected)
//! ```
//!
//! Each gateway call is made at most once. A failure after `CreateVersion`
//! leaves an inactive version behind on the remote side; nothing is rolled
//! back.

use semver::Version;
use tracing::{debug, info};

use crate::error::{SyncError, VersionSource};
use crate::gateway::RemoteGateway;
use crate::locator::locate;
use crate::resolver::{current_version, parse_version};
use crate::spec::SpecDocument;
use crate::types::{ListingRef, Outcome, OwnerScope, ReconciliationResult, VersionRecord};

enum State {
    Discover,
    CreateNew,
    CompareVersions {
        listing: ListingRef,
    },
    CreateVersion {
        api_id: String,
        version: Version,
    },
    UpdateVersion {
        api_id: String,
        version: Version,
        version_id: String,
    },
    ActivateVersion {
        api_id: String,
        version: Version,
        version_id: String,
    },
    Rejected {
        api_id: String,
        current: VersionRecord,
    },
    Done(ReconciliationResult),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Discover => "discover",
            State::CreateNew => "create_new",
            State::CompareVersions { .. } => "compare_versions",
            State::CreateVersion { .. } => "create_version",
            State::UpdateVersion { .. } => "update_version",
            State::ActivateVersion { .. } => "activate_version",
            State::Rejected { .. } => "rejected",
            State::Done(_) => "done",
        }
    }
}

/// Drives one spec through discovery, comparison and publication.
#[derive(Debug, Clone)]
pub struct Reconciler<G> {
    gateway: G,
    owner: OwnerScope,
}

impl<G: RemoteGateway> Reconciler<G> {
    /// Create a reconciler that searches listings across all owners.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            owner: OwnerScope::Any,
        }
    }

    /// Restrict listing discovery to one owner.
    pub fn owner_scope(mut self, owner: OwnerScope) -> Self {
        self.owner = owner;
        self
    }

    /// Run the state machine to a terminal state.
    ///
    /// A spec that is not newer than the current version yields
    /// `Ok` with [`Outcome::Rejected`]; use [`publish`](Self::publish) to
    /// treat that as an error.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by discovery, version parsing,
    /// resolution, or any gateway call.
    pub fn run(&self, spec: &SpecDocument) -> Result<ReconciliationResult, SyncError> {
        let mut state = State::Discover;
        loop {
            debug!(state = state.name(), "reconcile step");
            state = match state {
                State::Done(result) => return Ok(result),
                State::Discover => self.discover(spec)?,
                State::CreateNew => self.create_new(spec)?,
                State::CompareVersions { listing } => self.compare_versions(spec, listing)?,
                State::CreateVersion { api_id, version } => {
                    info!(api_id = %api_id, version = %version, "creating new api version");
                    let version_id = self
                        .gateway
                        .create_version(&api_id, &version.to_string())?;
                    info!(version_id = %version_id, "created api version");
                    State::UpdateVersion {
                        api_id,
                        version,
                        version_id,
                    }
                }
                State::UpdateVersion {
                    api_id,
                    version,
                    version_id,
                } => {
                    self.gateway
                        .upload_spec_to_version(
                            &api_id,
                            &version_id,
                            &spec.raw,
                            spec.upload_file_name(),
                        )?;
                    State::ActivateVersion {
                        api_id,
                        version,
                        version_id,
                    }
                }
                State::ActivateVersion {
                    api_id,
                    version,
                    version_id,
                } => {
                    info!(version_id = %version_id, "setting new version as current");
                    self.gateway.set_version_active(&version_id)?;
                    State::Done(ReconciliationResult {
                        outcome: Outcome::Updated,
                        api_id,
                        version_id,
                        version_name: version.to_string(),
                    })
                }
                State::Rejected { api_id, current } => {
                    info!(
                        spec_version = %spec.version,
                        current_version = %current.name,
                        "spec is not newer than the current version"
                    );
                    State::Done(ReconciliationResult {
                        outcome: Outcome::Rejected,
                        api_id,
                        version_id: current.id,
                        version_name: current.name,
                    })
                }
            };
        }
    }

    /// Run the state machine and fail with `SyncError::Rejected` when the
    /// spec is not newer than the current version.
    pub fn publish(&self, spec: &SpecDocument) -> Result<ReconciliationResult, SyncError> {
        let result = self.run(spec)?;
        if result.outcome == Outcome::Rejected {
            return Err(SyncError::Rejected {
                spec_version: spec.version.clone(),
                current_version: result.version_name,
            });
        }
        Ok(result)
    }

    fn discover(&self, spec: &SpecDocument) -> Result<State, SyncError> {
        info!(name = %spec.name, version = %spec.version, "looking up listing");
        Ok(match locate(&self.gateway, &spec.name, self.owner)? {
            None => State::CreateNew,
            Some(listing) => {
                info!(api_id = %listing.id, "listing already exists");
                State::CompareVersions { listing }
            }
        })
    }

    fn create_new(&self, spec: &SpecDocument) -> Result<State, SyncError> {
        info!(name = %spec.name, "creating new listing");
        let api_id = self.gateway.create_listing(
            &spec.raw,
            spec.upload_file_name(),
            &spec.name,
            spec.description.as_deref(),
        )?;
        info!(api_id = %api_id, "created listing");
        let initial = current_version(&self.gateway, &api_id)?;
        Ok(State::Done(ReconciliationResult {
            outcome: Outcome::Created,
            api_id,
            version_id: initial.id,
            version_name: initial.name,
        }))
    }

    fn compare_versions(
        &self,
        spec: &SpecDocument,
        listing: ListingRef,
    ) -> Result<State, SyncError> {
        // The spec side is checked before any further remote call.
        let spec_version = parse_version(VersionSource::Spec, &spec.version)?;
        let current = current_version(&self.gateway, &listing.id)?;
        let current_parsed = parse_version(VersionSource::Remote, &current.name)?;
        debug!(spec = %spec_version, current = %current_parsed, "comparing versions");

        // Build metadata does not take part in precedence.
        if spec_version.cmp_precedence(&current_parsed).is_gt() {
            Ok(State::CreateVersion {
                api_id: listing.id,
                version: spec_version,
            })
        } else {
            Ok(State::Rejected {
                api_id: listing.id,
                current,
            })
        }
    }
}
