//! The HTTP-backed [`RemoteGateway`].
//!
//! Metadata goes through the GraphQL endpoint and spec content through the
//! file upload endpoint, because the metadata endpoint cannot parse uploaded
//! specs yet. Callers only ever see the combined gateway.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::config::Config;
use crate::error::SyncError;
use crate::gateway::RemoteGateway;
use crate::graphql::GraphqlClient;
use crate::types::{ListingRef, OwnerScope, VersionRecord};
use crate::upload::UploadClient;

/// Maximum number of response body bytes quoted in an error message.
const ERROR_BODY_LIMIT: usize = 512;

/// Default headers for one transport.
#[derive(Debug, Default)]
pub(crate) struct HeaderSet(HeaderMap);

impl HeaderSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a header, rejecting values that cannot be sent.
    ///
    /// Header values are marked sensitive so keys never show up in debug
    /// output.
    pub(crate) fn insert(&mut self, name: &'static str, value: &str) -> Result<(), SyncError> {
        let mut value = HeaderValue::from_str(value).map_err(|e| SyncError::InvalidSetting {
            name,
            message: e.to_string(),
        })?;
        value.set_sensitive(true);
        self.0.insert(HeaderName::from_static(name), value);
        Ok(())
    }
}

pub(crate) fn build_http_client(headers: HeaderSet, timeout: Duration) -> Result<Client, SyncError> {
    Client::builder()
        .default_headers(headers.0)
        .timeout(timeout)
        .build()
        .map_err(|e| SyncError::remote("http client setup", e.to_string()))
}

/// Read a response body, turning non-success statuses into remote errors.
pub(crate) fn read_body(
    operation: &'static str,
    url: &str,
    response: Response,
) -> Result<String, SyncError> {
    let status = response.status();
    let text = response.text().map_err(|source| SyncError::Transport {
        operation,
        url: url.to_string(),
        source,
    })?;
    debug!(operation, status = status.as_u16(), "response received");

    if !status.is_success() {
        let mut body = text;
        if body.len() > ERROR_BODY_LIMIT {
            let mut cut = ERROR_BODY_LIMIT;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        return Err(SyncError::remote(
            operation,
            format!("HTTP {}: {}", status, body),
        ));
    }
    Ok(text)
}

/// Join a base URL and a path with exactly one slash between them.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Gateway composed of the metadata and upload transports.
#[derive(Debug, Clone)]
pub struct HubGateway {
    graphql: GraphqlClient,
    upload: UploadClient,
}

impl HubGateway {
    /// Build both transports from the run configuration.
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        Ok(Self {
            graphql: GraphqlClient::new(config)?,
            upload: UploadClient::new(config)?,
        })
    }
}

impl RemoteGateway for HubGateway {
    fn find_listing(&self, name: &str, owner: OwnerScope) -> Result<Vec<ListingRef>, SyncError> {
        self.graphql.find_listings(name, owner)
    }

    fn list_active_versions(&self, listing_id: &str) -> Result<Vec<VersionRecord>, SyncError> {
        self.graphql.active_versions(listing_id)
    }

    fn create_listing(
        &self,
        spec: &[u8],
        file_name: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<String, SyncError> {
        // The upload endpoint takes name and description from the spec itself.
        debug!(name, has_description = description.is_some(), "creating listing from spec");
        self.upload.create_listing(spec, file_name)
    }

    fn create_version(&self, listing_id: &str, version_name: &str) -> Result<String, SyncError> {
        self.graphql.create_version(listing_id, version_name)
    }

    fn upload_spec_to_version(
        &self,
        listing_id: &str,
        version_id: &str,
        spec: &[u8],
        file_name: &str,
    ) -> Result<(), SyncError> {
        self.upload.update_version(listing_id, version_id, spec, file_name)
    }

    fn set_version_active(&self, version_id: &str) -> Result<(), SyncError> {
        self.graphql.set_current(version_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_with_single_slash() {
        assert_eq!(
            endpoint("https://platform.p.rapidapi.com/", "v1/apis/rapidapi-file"),
            "https://platform.p.rapidapi.com/v1/apis/rapidapi-file"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:1234", "/v1/apis"),
            "http://127.0.0.1:1234/v1/apis"
        );
    }

    #[test]
    fn header_set_rejects_invalid_values() {
        let mut headers = HeaderSet::new();
        let result = headers.insert("x-rapidapi-key", "line\nbreak");
        assert!(matches!(
            result,
            Err(SyncError::InvalidSetting {
                name: "x-rapidapi-key",
                ..
            })
        ));
    }
}
