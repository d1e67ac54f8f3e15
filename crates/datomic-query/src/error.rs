use crate::client::ClientError;
use datomic_query_config::ConfigError;
use datomic_query_core::{
    document::DocumentError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
    submit::SubmitError,
    validate::ValidateError,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::Decode => ErrorKind::Query(QueryErrorKind::Malformed),
            ErrorClass::Invalid => ErrorKind::Query(QueryErrorKind::Invalid),
            ErrorClass::Transport => ErrorKind::Api(ApiErrorKind::Unreachable),
            ErrorClass::Server => ErrorKind::Api(ApiErrorKind::Rejected),
        };

        // validation issues are listed in full; one line per issue
        let message = match err.issues().map(ToString::to_string) {
            Some(issues) => format!("{}\n{issues}", err.message),
            None => err.message,
        };

        Self::new(kind, err.origin.into(), message)
    }
}

impl From<DocumentError> for Error {
    fn from(err: DocumentError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<ValidateError> for Error {
    fn from(err: ValidateError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<SubmitError> for Error {
    fn from(err: SubmitError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

impl From<ClientError> for Error {
    fn from(err: ClientError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Client, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Query(QueryErrorKind),
    Api(ApiErrorKind),

    /// Settings or client construction were rejected.
    Config,
}

///
/// QueryErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    /// Input could not be decoded as a query document.
    Malformed,

    /// Document decoded but failed structural validation.
    Invalid,
}

///
/// ApiErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ApiErrorKind {
    /// The request never produced a response.
    Unreachable,

    /// The server answered with a failure status or an `error` body.
    Rejected,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Client,
    Config,
    Document,
    Submit,
    Validate,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Document => Self::Document,
            CoreErrorOrigin::Submit => Self::Submit,
            CoreErrorOrigin::Validate => Self::Validate,
        }
    }
}
