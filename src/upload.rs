//! Spec upload transport (multipart file endpoint).

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::SyncError;
use crate::hub::{build_http_client, endpoint, read_body, HeaderSet};

const FILE_ROUTE: &str = "v1/apis/rapidapi-file";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedApi {
    api_id: String,
}

/// Client for the REST file upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadClient {
    http: Client,
    base_url: String,
}

impl UploadClient {
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        let mut headers = HeaderSet::new();
        headers.insert("x-rapidapi-key", &config.api_key)?;
        headers.insert("x-rapidapi-host", &config.rest_host)?;

        Ok(Self {
            http: build_http_client(headers, config.timeout)?,
            base_url: config.rest_url.clone(),
        })
    }

    /// Create a listing and its initial version from a spec file.
    pub fn create_listing(&self, spec: &[u8], file_name: &str) -> Result<String, SyncError> {
        const OPERATION: &str = "create listing";
        let url = endpoint(&self.base_url, FILE_ROUTE);
        debug!(url = %url, file_name, bytes = spec.len(), "uploading spec for new listing");

        let response = self
            .http
            .post(&url)
            .multipart(spec_form(OPERATION, spec, file_name)?)
            .send()
            .map_err(|source| SyncError::Transport {
                operation: OPERATION,
                url: url.clone(),
                source,
            })?;
        let text = read_body(OPERATION, &url, response)?;

        let created: CreatedApi = serde_json::from_str(&text).map_err(|e| {
            SyncError::remote(OPERATION, format!("unexpected response shape: {}", e))
        })?;
        Ok(created.api_id)
    }

    /// Replace the spec attached to a version.
    pub fn update_version(
        &self,
        listing_id: &str,
        version_id: &str,
        spec: &[u8],
        file_name: &str,
    ) -> Result<(), SyncError> {
        const OPERATION: &str = "upload spec";
        let url = endpoint(
            &self.base_url,
            &format!("{}/{}/versions/{}", FILE_ROUTE, listing_id, version_id),
        );
        debug!(url = %url, file_name, bytes = spec.len(), "uploading spec to version");

        let response = self
            .http
            .put(&url)
            .multipart(spec_form(OPERATION, spec, file_name)?)
            .send()
            .map_err(|source| SyncError::Transport {
                operation: OPERATION,
                url: url.clone(),
                source,
            })?;
        read_body(OPERATION, &url, response)?;
        Ok(())
    }
}

fn spec_form(operation: &'static str, spec: &[u8], file_name: &str) -> Result<Form, SyncError> {
    let part = Part::bytes(spec.to_vec())
        .file_name(file_name.to_string())
        .mime_str("application/json")
        .map_err(|e| SyncError::remote(operation, e.to_string()))?;
    Ok(Form::new().part("file", part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_GRAPHQL_URL, DEFAULT_TIMEOUT};
    use crate::types::OwnerScope;
    use mockito::{Matcher, Server};
    use std::path::PathBuf;

    const SPEC: &str = r#"{"info":{"title":"Petstore","version":"1.2.0"}}"#;

    fn client(server: &Server) -> UploadClient {
        UploadClient::new(&Config {
            api_key: "key".into(),
            identity_key: None,
            graphql_host: "graphql.example.com".into(),
            rest_host: "rest.example.com".into(),
            graphql_url: DEFAULT_GRAPHQL_URL.into(),
            rest_url: format!("{}/", server.url()),
            owner: OwnerScope::Any,
            spec_path: PathBuf::from("openapi.json"),
            timeout: DEFAULT_TIMEOUT,
        })
        .unwrap()
    }

    #[test]
    fn create_listing_posts_multipart_file() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/v1/apis/rapidapi-file")
            .match_header("x-rapidapi-key", "key")
            .match_header("x-rapidapi-host", "rest.example.com")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".into()),
            )
            .match_body(Matcher::Regex(r#"name="file"; filename="openapi.json""#.into()))
            .with_status(201)
            .with_body(r#"{"apiId":"api_new"}"#)
            .create();

        let id = client(&server).create_listing(SPEC.as_bytes(), "openapi.json").unwrap();

        mock.assert();
        assert_eq!(id, "api_new");
    }

    #[test]
    fn upload_uses_given_file_name() {
        let mut server = Server::new();
        let create = server
            .mock("POST", "/v1/apis/rapidapi-file")
            .match_body(Matcher::Regex(
                r#"name="file"; filename="petstore-spec.json""#.into(),
            ))
            .with_status(201)
            .with_body(r#"{"apiId":"api_new"}"#)
            .create();
        let update = server
            .mock("PUT", "/v1/apis/rapidapi-file/api_1/versions/v3")
            .match_body(Matcher::Regex(
                r#"name="file"; filename="petstore-spec.json""#.into(),
            ))
            .with_body("{}")
            .create();

        let client = client(&server);
        client
            .create_listing(SPEC.as_bytes(), "petstore-spec.json")
            .unwrap();
        client
            .update_version("api_1", "v3", SPEC.as_bytes(), "petstore-spec.json")
            .unwrap();

        create.assert();
        update.assert();
    }

    #[test]
    fn create_listing_rejects_unexpected_body() {
        let mut server = Server::new();
        server
            .mock("POST", "/v1/apis/rapidapi-file")
            .with_body(r#"{"id":"api_new"}"#)
            .create();

        let result = client(&server).create_listing(SPEC.as_bytes(), "openapi.json");
        assert!(matches!(
            result,
            Err(SyncError::Remote {
                operation: "create listing",
                ..
            })
        ));
    }

    #[test]
    fn update_version_puts_to_version_route() {
        let mut server = Server::new();
        let mock = server
            .mock("PUT", "/v1/apis/rapidapi-file/api_1/versions/v3")
            .match_body(Matcher::Regex("Petstore".into()))
            .with_status(200)
            .with_body("{}")
            .create();

        client(&server)
            .update_version("api_1", "v3", SPEC.as_bytes(), "openapi.json")
            .unwrap();
        mock.assert();
    }

    #[test]
    fn update_version_failure_status() {
        let mut server = Server::new();
        server
            .mock("PUT", "/v1/apis/rapidapi-file/api_1/versions/v3")
            .with_status(500)
            .with_body("internal error")
            .create();

        let err = client(&server)
            .update_version("api_1", "v3", SPEC.as_bytes(), "openapi.json")
            .unwrap_err();
        assert_eq!(err.exit_code(), 7);
        assert!(err.to_string().contains("internal error"));
    }
}
