//! Run configuration.
//!
//! Settings arrive as optional strings (flags or `INPUT_*` environment
//! variables) and are validated once into an immutable [`Config`] before any
//! network call is made.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::SyncError;
use crate::types::OwnerScope;

/// Default metadata endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://graphql-platform.p.rapidapi.com/";

/// Default spec upload endpoint.
pub const DEFAULT_REST_URL: &str = "https://platform.p.rapidapi.com/";

/// Default timeout for HTTP requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable names, as set by the CI action runner.
pub mod env {
    pub const API_KEY: &str = "INPUT_X_RAPIDAPI_KEY";
    pub const IDENTITY_KEY: &str = "INPUT_X_RAPIDAPI_IDENTITY_KEY";
    pub const GRAPHQL_HOST: &str = "INPUT_X_RAPIDAPI_GRAPHQL_HOST";
    pub const REST_HOST: &str = "INPUT_X_RAPIDAPI_REST_HOST";
    pub const GRAPHQL_URL: &str = "INPUT_GRAPHQL_URL";
    pub const REST_URL: &str = "INPUT_REST_URL";
    pub const OWNER_ID: &str = "INPUT_OWNER_ID";
    pub const SPEC_PATH: &str = "INPUT_SPEC_PATH";
    pub const TIMEOUT_SECS: &str = "INPUT_TIMEOUT_SECS";
}

/// Unvalidated settings, one field per configuration key.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub identity_key: Option<String>,
    pub graphql_host: Option<String>,
    pub rest_host: Option<String>,
    pub graphql_url: Option<String>,
    pub rest_url: Option<String>,
    pub owner_id: Option<String>,
    pub spec_path: Option<String>,
    pub timeout_secs: Option<String>,
}

/// Validated, immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    /// Sent as `x-rapidapi-identity-key` when present.
    pub identity_key: Option<String>,
    pub graphql_host: String,
    pub rest_host: String,
    pub graphql_url: String,
    pub rest_url: String,
    pub owner: OwnerScope,
    pub spec_path: PathBuf,
    pub timeout: Duration,
}

impl Config {
    /// Validate settings into a configuration.
    ///
    /// Empty strings count as absent: action runners pass unset inputs that
    /// way.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::MissingSetting` for an absent required setting or
    /// `SyncError::InvalidSetting` for an owner id that is not a non-negative
    /// integer or a timeout that is not a positive one.
    pub fn from_settings(settings: Settings) -> Result<Self, SyncError> {
        let api_key = required(settings.api_key, "api key", env::API_KEY)?;
        let graphql_host = required(settings.graphql_host, "graphql host", env::GRAPHQL_HOST)?;
        let rest_host = required(settings.rest_host, "rest host", env::REST_HOST)?;
        let spec_path = required(settings.spec_path, "spec path", env::SPEC_PATH)?;

        let owner_id = present(settings.owner_id)
            .map(|raw| parse_integer(&raw, "owner id"))
            .transpose()?;
        let timeout = present(settings.timeout_secs)
            .map(|raw| parse_timeout(&raw))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            api_key,
            identity_key: present(settings.identity_key),
            graphql_host,
            rest_host,
            graphql_url: present(settings.graphql_url)
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
            rest_url: present(settings.rest_url).unwrap_or_else(|| DEFAULT_REST_URL.to_string()),
            owner: OwnerScope::from_owner_id(owner_id),
            spec_path: PathBuf::from(spec_path),
            timeout,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(
    value: Option<String>,
    name: &'static str,
    env: &'static str,
) -> Result<String, SyncError> {
    present(value).ok_or(SyncError::MissingSetting { name, env })
}

fn parse_integer(raw: &str, name: &'static str) -> Result<u64, SyncError> {
    raw.parse::<u64>().map_err(|e| SyncError::InvalidSetting {
        name,
        message: format!("\"{}\": {}", raw, e),
    })
}

fn parse_timeout(raw: &str) -> Result<Duration, SyncError> {
    match parse_integer(raw, "timeout")? {
        0 => Err(SyncError::InvalidSetting {
            name: "timeout",
            message: "must be at least one second".to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn complete() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (env::API_KEY, "key"),
            (env::GRAPHQL_HOST, "graphql.example.com"),
            (env::REST_HOST, "rest.example.com"),
            (env::SPEC_PATH, "openapi.json"),
        ])
    }

    fn config_from(vars: &HashMap<&'static str, &'static str>) -> Result<Config, SyncError> {
        let lookup = |key: &str| vars.get(key).map(|v| v.to_string());
        Config::from_settings(Settings {
            api_key: lookup(env::API_KEY),
            identity_key: lookup(env::IDENTITY_KEY),
            graphql_host: lookup(env::GRAPHQL_HOST),
            rest_host: lookup(env::REST_HOST),
            graphql_url: lookup(env::GRAPHQL_URL),
            rest_url: lookup(env::REST_URL),
            owner_id: lookup(env::OWNER_ID),
            spec_path: lookup(env::SPEC_PATH),
            timeout_secs: lookup(env::TIMEOUT_SECS),
        })
    }

    #[test]
    fn minimal_settings_use_defaults() {
        let config = config_from(&complete()).unwrap();
        assert_eq!(config.graphql_url, DEFAULT_GRAPHQL_URL);
        assert_eq!(config.rest_url, DEFAULT_REST_URL);
        assert_eq!(config.owner, OwnerScope::Any);
        assert_eq!(config.identity_key, None);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.spec_path, PathBuf::from("openapi.json"));
    }

    #[test]
    fn missing_required_setting() {
        let mut vars = complete();
        vars.remove(env::REST_HOST);
        let result = config_from(&vars);
        assert!(matches!(
            result,
            Err(SyncError::MissingSetting {
                env: env::REST_HOST,
                ..
            })
        ));
    }

    #[test]
    fn empty_values_count_as_missing() {
        let mut vars = complete();
        vars.insert(env::API_KEY, "");
        let result = config_from(&vars);
        assert!(matches!(
            result,
            Err(SyncError::MissingSetting {
                env: env::API_KEY,
                ..
            })
        ));

        let mut vars = complete();
        vars.insert(env::GRAPHQL_URL, "");
        vars.insert(env::OWNER_ID, "");
        let config = config_from(&vars).unwrap();
        assert_eq!(config.graphql_url, DEFAULT_GRAPHQL_URL);
        assert_eq!(config.owner, OwnerScope::Any);
    }

    #[test]
    fn owner_id_enables_scoping() {
        let mut vars = complete();
        vars.insert(env::OWNER_ID, "5713300");
        vars.insert(env::IDENTITY_KEY, "identity");
        let config = config_from(&vars).unwrap();
        assert_eq!(config.owner, OwnerScope::Owner(5713300));
        assert_eq!(config.identity_key.as_deref(), Some("identity"));
    }

    #[test]
    fn owner_id_must_be_integer() {
        let mut vars = complete();
        vars.insert(env::OWNER_ID, "team-a");
        let result = config_from(&vars);
        assert!(matches!(
            result,
            Err(SyncError::InvalidSetting {
                name: "owner id",
                ..
            })
        ));
    }

    #[test]
    fn timeout_override() {
        let mut vars = complete();
        vars.insert(env::TIMEOUT_SECS, "5");
        let config = config_from(&vars).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut vars = complete();
        vars.insert(env::TIMEOUT_SECS, "0");
        let err = config_from(&vars).unwrap_err();
        assert!(matches!(err, SyncError::InvalidSetting { name: "timeout", .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
