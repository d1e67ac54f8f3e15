//! Module: submit
//! Responsibility: the seam a finished document is handed across for execution.
//! Does not own: transport, retries, or response interpretation beyond errors.
//! Boundary: `QueryBuilder::run` calls exactly one `submit` per invocation.

use crate::document::QueryDocument;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// SubmitError
///
/// Failure reported by a submitter. Server-reported errors keep the full
/// parsed body so callers can inspect it.
///

#[derive(Debug, ThisError)]
pub enum SubmitError {
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("server responded with status {status}")]
    Status {
        status: u16,
        body: Option<serde_json::Value>,
    },

    #[error("server reported an error: {}", server_message(.body))]
    Server { body: serde_json::Value },

    #[error("response could not be decoded: {message}")]
    Decode { message: String },
}

impl SubmitError {
    /// Human-readable message, preferring the server's own wording.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Server { body } => server_message(body),
            _ => self.to_string(),
        }
    }

    /// Parsed body attached to the failure, if any.
    #[must_use]
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Server { body } | Self::Status { body: Some(body), .. } => Some(body),
            _ => None,
        }
    }
}

// `{"error": "..."}` or `{"error": {"message": "..."}}`; anything else is
// rendered as JSON.
fn server_message(body: &serde_json::Value) -> String {
    let error = body.get("error").unwrap_or(body);

    error
        .as_str()
        .or_else(|| error.get("message").and_then(serde_json::Value::as_str))
        .map_or_else(|| error.to_string(), str::to_string)
}

///
/// Submitter
///
/// Executes a query document and yields the parsed response body.
/// A body carrying an `error` field must be surfaced as `SubmitError::Server`.
///

#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, document: &QueryDocument) -> Result<serde_json::Value, SubmitError>;
}

#[async_trait]
impl<T: Submitter + ?Sized> Submitter for &T {
    async fn submit(&self, document: &QueryDocument) -> Result<serde_json::Value, SubmitError> {
        (**self).submit(document).await
    }
}

#[async_trait]
impl<T: Submitter + ?Sized> Submitter for Box<T> {
    async fn submit(&self, document: &QueryDocument) -> Result<serde_json::Value, SubmitError> {
        (**self).submit(document).await
    }
}

#[async_trait]
impl<T: Submitter + ?Sized> Submitter for Arc<T> {
    async fn submit(&self, document: &QueryDocument) -> Result<serde_json::Value, SubmitError> {
        (**self).submit(document).await
    }
}

/// Reject a parsed body that carries an `error` field.
pub fn check_response(body: serde_json::Value) -> Result<serde_json::Value, SubmitError> {
    if body.get("error").is_some_and(is_truthy) {
        Err(SubmitError::Server { body })
    } else {
        Ok(body)
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::String(text) => !text.is_empty(),
        serde_json::Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
