//! Module: client
//! Responsibility: HTTP transport to a Datomic query API.
//! Does not own: document construction or validation.
//! Boundary: implements `Submitter`; one request per call, no retries.

use async_trait::async_trait;
use datomic_query_config::Settings;
use datomic_query_core::{
    document::QueryDocument,
    schema::{EntityShape, Envelope, SchemaAttribute},
    submit::{SubmitError, Submitter, check_response},
};
use reqwest::{
    Client, RequestBuilder,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use std::{fmt, time::Duration};
use thiserror::Error as ThisError;

///
/// ClientError
///

#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error("invalid auth header '{name}'")]
    InvalidHeader { name: String },

    #[error("failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

///
/// ApiClient
///
/// Talks to the query, translate, schema and entity-shape endpoints named
/// in [`Settings`]. Auth headers ride on every request.
///

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    settings: Settings,
}

impl ApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &settings.auth_headers {
            let invalid = || ClientError::InvalidHeader { name: name.clone() };
            let header = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let mut value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            value.set_sensitive(true);
            headers.insert(header, value);
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Endpoints
    // ------------------------------------------------------------------

    /// Ask the server to translate a document into its native query form.
    pub async fn translate(
        &self,
        document: &QueryDocument,
    ) -> Result<serde_json::Value, SubmitError> {
        let endpoint = &self.settings.translate_query_endpoint;
        tracing::debug!(%endpoint, "translating query document");

        send(self.client.post(endpoint).json(document)).await
    }

    /// Installed schema attributes, idents and functions.
    pub async fn fetch_schema(&self) -> Result<Vec<SchemaAttribute>, SubmitError> {
        let endpoint = &self.settings.fetch_schema_endpoint;
        tracing::debug!(%endpoint, "fetching schema");

        fetch_data(self.client.get(endpoint)).await
    }

    pub async fn fetch_entity_shapes(&self) -> Result<Vec<EntityShape>, SubmitError> {
        let endpoint = &self.settings.fetch_entity_shapes_endpoint;
        tracing::debug!(%endpoint, "fetching entity shapes");

        fetch_data(self.client.get(endpoint)).await
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("submit_query_endpoint", &self.settings.submit_query_endpoint)
            .field(
                "auth_headers",
                &self.settings.auth_headers.keys().collect::<Vec<_>>(),
            )
            .field("request_timeout_ms", &self.settings.request_timeout_ms)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Submitter for ApiClient {
    async fn submit(&self, document: &QueryDocument) -> Result<serde_json::Value, SubmitError> {
        let endpoint = &self.settings.submit_query_endpoint;
        tracing::debug!(%endpoint, find = document.find.len(), "submitting query");

        send(self.client.post(endpoint).json(document)).await
    }
}

// ----------------------------------------------------------------------
// Transport
// ----------------------------------------------------------------------

async fn send(request: RequestBuilder) -> Result<serde_json::Value, SubmitError> {
    let response = request.send().await.map_err(|err| {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("failed to connect: {err}")
        } else {
            format!("request failed: {err}")
        };
        tracing::warn!(%message, "query API unreachable");

        SubmitError::Transport { message }
    })?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|err| SubmitError::Transport {
            message: format!("failed to read response body: {err}"),
        })?;

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "query API returned a failure status");

        return Err(SubmitError::Status {
            status: status.as_u16(),
            body: serde_json::from_str(&text).ok(),
        });
    }

    let body = serde_json::from_str(&text).map_err(|err| SubmitError::Decode {
        message: err.to_string(),
    })?;

    check_response(body).inspect_err(|err| {
        tracing::warn!(error = %err.message(), "query API reported an error");
    })
}

async fn fetch_data<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, SubmitError> {
    let body = send(request).await?;
    let envelope: Envelope<T> =
        serde_json::from_value(body).map_err(|err| SubmitError::Decode {
            message: err.to_string(),
        })?;

    Ok(envelope.data)
}
