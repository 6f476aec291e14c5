//! API Listing Sync
//!
//! Keeps an API hub listing in step with a locally authored OpenAPI document.
//!
//! A run looks the listing up by the spec's `info.title`. If none exists it
//! is created from the spec. Otherwise the spec's `info.version` is compared
//! with the listing's current version and, only when strictly newer, a new
//! version is created, the spec uploaded to it, and the version made current.
//!
//! # Example
//!
//! ```
//! use listing_sync::{parse_spec, Outcome, Reconciler, RemoteGateway};
//! # use listing_sync::{ListingRef, OwnerScope, SyncError, VersionRecord};
//! # struct Hub;
//! # impl RemoteGateway for Hub {
//! #     fn find_listing(&self, _: &str, _: OwnerScope) -> Result<Vec<ListingRef>, SyncError> {
//! #         Ok(vec![ListingRef { id: "api_1".into(), name: "Petstore".into() }])
//! #     }
//! #     fn list_active_versions(&self, _: &str) -> Result<Vec<VersionRecord>, SyncError> {
//! #         Ok(vec![VersionRecord { id: "v1".into(), name: "1.1.0".into(), current: true }])
//! #     }
//! #     fn create_listing(&self, _: &[u8], _: &str, _: &str, _: Option<&str>) -> Result<String, SyncError> {
//! #         unreachable!()
//! #     }
//! #     fn create_version(&self, _: &str, _: &str) -> Result<String, SyncError> {
//! #         Ok("v2".into())
//! #     }
//! #     fn upload_spec_to_version(&self, _: &str, _: &str, _: &[u8], _: &str) -> Result<(), SyncError> {
//! #         Ok(())
//! #     }
//! #     fn set_version_active(&self, _: &str) -> Result<(), SyncError> {
//! #         Ok(())
//! #     }
//! # }
//!
//! let spec = parse_spec(br#"{"info":{"title":"Petstore","version":"1.2.0"}}"#.to_vec()).unwrap();
//! let result = Reconciler::new(Hub).publish(&spec).unwrap();
//!
//! assert_eq!(result.outcome, Outcome::Updated);
//! assert_eq!(result.version_name, "1.2.0");
//! ```
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | listing created or new version published |
//! | 1 | spec version is not newer than the current version |
//! | 2 | missing or invalid configuration |
//! | 3 | spec file unreadable, not JSON, or missing `info.title`/`info.version` |
//! | 4 | a version is not a semantic version |
//! | 5 | more than one listing matches the name |
//! | 6 | not exactly one active version is marked current |
//! | 7 | remote call failed |
//! | 8 | result outputs could not be written (CLI only) |

mod config;
mod error;
mod gateway;
mod locator;
mod reconcile;
mod report;
mod resolver;
mod spec;
mod types;

#[cfg(feature = "remote")]
mod graphql;
#[cfg(feature = "remote")]
mod hub;
#[cfg(feature = "remote")]
mod upload;

pub use config::{
    env, Config, Settings, DEFAULT_GRAPHQL_URL, DEFAULT_REST_URL, DEFAULT_TIMEOUT,
};
pub use error::{SyncError, VersionSource};
pub use gateway::RemoteGateway;
pub use locator::locate;
pub use reconcile::Reconciler;
pub use report::{append_output_file, outputs, write_result, OutputFormat};
pub use resolver::{current_version, parse_version, select_current};
pub use spec::{parse_spec, read_spec, SpecDocument, DEFAULT_FILE_NAME};
pub use types::{ListingRef, Outcome, OwnerScope, ReconciliationResult, VersionRecord};

#[cfg(feature = "remote")]
pub use graphql::GraphqlClient;
#[cfg(feature = "remote")]
pub use hub::HubGateway;
#[cfg(feature = "remote")]
pub use upload::UploadClient;
