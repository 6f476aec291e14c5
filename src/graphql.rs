//! Metadata transport: listing and version queries and mutations.
//!
//! Requests are plain GraphQL-over-HTTP POSTs. Every response is decoded
//! into a fixed record for its operation; anything else is a remote error.

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::Config;
use crate::error::SyncError;
use crate::hub::{build_http_client, read_body, HeaderSet};
use crate::types::{ListingRef, OwnerScope, VersionRecord};

const FIND_LISTINGS: &str = r#"
query apis($where: ApiWhereInput) {
  apis(where: $where) {
    nodes {
      id
      name
    }
  }
}"#;

const ACTIVE_VERSIONS: &str = r#"
query apiVersions($where: ApiVersionWhereInput) {
  apiVersions(where: $where) {
    nodes {
      id
      name
      current
    }
  }
}"#;

const CREATE_VERSION: &str = r#"
mutation createApiVersions($apiVersions: [ApiVersionCreateInput!]!) {
  createApiVersions(apiVersions: $apiVersions) {
    id
  }
}"#;

const SET_CURRENT: &str = r#"
mutation updateApiVersions($apiVersions: [ApiVersionUpdateInput!]!) {
  updateApiVersions(apiVersions: $apiVersions) {
    id
    name
    current
  }
}"#;

#[derive(Deserialize)]
struct Envelope {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct ApisData {
    apis: Nodes<ListingRef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiVersionsData {
    api_versions: Nodes<VersionRecord>,
}

#[derive(Deserialize)]
struct IdNode {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateApiVersionsData {
    create_api_versions: Vec<IdNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateApiVersionsData {
    update_api_versions: Vec<VersionRecord>,
}

/// Client for the GraphQL metadata endpoint.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: Client,
    url: String,
}

impl GraphqlClient {
    /// Build a client from the run configuration.
    ///
    /// The identity header is only sent when an identity key is configured.
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        let mut headers = HeaderSet::new();
        headers.insert("x-rapidapi-key", &config.api_key)?;
        headers.insert("x-rapidapi-host", &config.graphql_host)?;
        if let Some(identity) = &config.identity_key {
            headers.insert("x-rapidapi-identity-key", identity)?;
        }

        Ok(Self {
            http: build_http_client(headers, config.timeout)?,
            url: config.graphql_url.clone(),
        })
    }

    /// Search listings by exact name, optionally within one owner.
    pub fn find_listings(
        &self,
        name: &str,
        owner: OwnerScope,
    ) -> Result<Vec<ListingRef>, SyncError> {
        let mut filter = Map::new();
        filter.insert("name".into(), json!(name));
        if let Some(owner_id) = owner.owner_id() {
            filter.insert("ownerId".into(), json!(owner_id));
        }

        let data: ApisData = self.execute("apis", FIND_LISTINGS, json!({ "where": filter }))?;
        Ok(data.apis.nodes)
    }

    /// Fetch the versions of a listing with active status.
    pub fn active_versions(&self, listing_id: &str) -> Result<Vec<VersionRecord>, SyncError> {
        let variables = json!({
            "where": { "apiId": listing_id, "versionStatus": "ACTIVE" }
        });
        let data: ApiVersionsData = self.execute("apiVersions", ACTIVE_VERSIONS, variables)?;
        Ok(data.api_versions.nodes)
    }

    /// Create an empty version and return its id.
    pub fn create_version(&self, listing_id: &str, version_name: &str) -> Result<String, SyncError> {
        let variables = json!({
            "apiVersions": [{ "api": listing_id, "name": version_name }]
        });
        let data: CreateApiVersionsData =
            self.execute("createApiVersions", CREATE_VERSION, variables)?;
        data.create_api_versions
            .into_iter()
            .next()
            .map(|node| node.id)
            .ok_or_else(|| SyncError::remote("createApiVersions", "no version was created"))
    }

    /// Mark a version as the current one.
    pub fn set_current(&self, version_id: &str) -> Result<(), SyncError> {
        let variables = json!({
            "apiVersions": [{
                "apiVersionId": version_id,
                "current": true,
                "versionStatus": "active"
            }]
        });
        let data: UpdateApiVersionsData =
            self.execute("updateApiVersions", SET_CURRENT, variables)?;
        match data.update_api_versions.first() {
            Some(version) if version.current => Ok(()),
            Some(version) => Err(SyncError::remote(
                "updateApiVersions",
                format!("version {} was not marked current", version.id),
            )),
            None => Err(SyncError::remote(
                "updateApiVersions",
                "no version was updated",
            )),
        }
    }

    fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &str,
        variables: Value,
    ) -> Result<T, SyncError> {
        debug!(operation, url = %self.url, "graphql request");
        let body = json!({
            "operationName": operation,
            "query": query,
            "variables": variables,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|source| SyncError::Transport {
                operation,
                url: self.url.clone(),
                source,
            })?;
        let text = read_body(operation, &self.url, response)?;

        let envelope: Envelope = serde_json::from_str(&text).map_err(|e| {
            SyncError::remote(operation, format!("unexpected response shape: {}", e))
        })?;
        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(SyncError::remote(operation, messages.join("; ")));
        }

        let data = envelope
            .data
            .ok_or_else(|| SyncError::remote(operation, "response has no data"))?;
        serde_json::from_value(data).map_err(|e| {
            SyncError::remote(operation, format!("unexpected response shape: {}", e))
        })
    }
}
