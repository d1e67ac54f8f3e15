//! Connection settings for a Datomic query API: base URL, per-operation
//! endpoints, auth headers and timeouts, loaded from TOML.


use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const SCHEMA_PATH: &str = "/api/datomic/schema";
pub const QUERY_PATH: &str = "/api/datomic/query";
pub const TRANSLATE_PATH: &str = "/api/datomic/translate-query";
pub const ENTITY_SHAPES_PATH: &str = "/api/datomic/entity-shapes";

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

///
/// Settings
///
/// Endpoints are absolute URLs. Any endpoint omitted from a config file is
/// derived from `api_url`.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Settings {
    pub api_url: String,
    pub fetch_schema_endpoint: String,
    pub submit_query_endpoint: String,
    pub translate_query_endpoint: String,
    pub fetch_entity_shapes_endpoint: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub auth_headers: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_api_url(DEFAULT_API_URL)
    }
}

impl Settings {
    /// Defaults with every endpoint under `api_url`.
    #[must_use]
    pub fn for_api_url(api_url: impl Into<String>) -> Self {
        let api_url = trim_base(api_url.into());

        Self {
            fetch_schema_endpoint: format!("{api_url}{SCHEMA_PATH}"),
            submit_query_endpoint: format!("{api_url}{QUERY_PATH}"),
            translate_query_endpoint: format!("{api_url}{TRANSLATE_PATH}"),
            fetch_entity_shapes_endpoint: format!("{api_url}{ENTITY_SHAPES_PATH}"),
            api_url,
            auth_headers: BTreeMap::new(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = toml::from_str(source)?;
        let settings = raw.resolve();
        settings.validate()?;

        Ok(settings)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml_str(&source),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Move to a new base URL. Endpoints under the old base are rebased;
    /// endpoints pointing elsewhere are left alone.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        let new_base = trim_base(api_url.into());
        let old_base = std::mem::replace(&mut self.api_url, new_base.clone());

        for endpoint in self.endpoints_mut() {
            if let Some(rest) = endpoint.strip_prefix(old_base.as_str()) {
                *endpoint = format!("{new_base}{rest}");
            }
        }

        self
    }

    #[must_use]
    pub fn with_auth_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_headers.insert(name.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("api_url", &self.api_url)?;
        check_url("fetch_schema_endpoint", &self.fetch_schema_endpoint)?;
        check_url("submit_query_endpoint", &self.submit_query_endpoint)?;
        check_url("translate_query_endpoint", &self.translate_query_endpoint)?;
        check_url(
            "fetch_entity_shapes_endpoint",
            &self.fetch_entity_shapes_endpoint,
        )?;

        if self.request_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "request_timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "connect_timeout_ms",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    fn endpoints_mut(&mut self) -> [&mut String; 4] {
        [
            &mut self.fetch_schema_endpoint,
            &mut self.submit_query_endpoint,
            &mut self.translate_query_endpoint,
            &mut self.fetch_entity_shapes_endpoint,
        ]
    }
}

fn trim_base(url: String) -> String {
    match url.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => url,
    }
}

fn check_url(field: &'static str, url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));

    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ConfigError::invalid(
            field,
            format!("expected an http(s) URL, got '{url}'"),
        )),
    }
}

///
/// RawSettings
///
/// On-disk shape; everything optional.
///

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSettings {
    api_url: Option<String>,
    fetch_schema_endpoint: Option<String>,
    submit_query_endpoint: Option<String>,
    translate_query_endpoint: Option<String>,
    fetch_entity_shapes_endpoint: Option<String>,
    auth_headers: BTreeMap<String, String>,
    connect_timeout_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
}

impl RawSettings {
    fn resolve(self) -> Settings {
        let defaults = self
            .api_url
            .map_or_else(Settings::default, Settings::for_api_url);

        Settings {
            fetch_schema_endpoint: self
                .fetch_schema_endpoint
                .unwrap_or(defaults.fetch_schema_endpoint),
            submit_query_endpoint: self
                .submit_query_endpoint
                .unwrap_or(defaults.submit_query_endpoint),
            translate_query_endpoint: self
                .translate_query_endpoint
                .unwrap_or(defaults.translate_query_endpoint),
            fetch_entity_shapes_endpoint: self
                .fetch_entity_shapes_endpoint
                .unwrap_or(defaults.fetch_entity_shapes_endpoint),
            // blank names or values are dropped
            auth_headers: self
                .auth_headers
                .into_iter()
                .filter(|(name, value)| !name.trim().is_empty() && !value.is_empty())
                .collect(),
            connect_timeout_ms: self
                .connect_timeout_ms
                .unwrap_or(defaults.connect_timeout_ms),
            request_timeout_ms: self
                .request_timeout_ms
                .unwrap_or(defaults.request_timeout_ms),
            api_url: defaults.api_url,
        }
    }
}
