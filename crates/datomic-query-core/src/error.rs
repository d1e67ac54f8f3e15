use crate::{
    document::DocumentError, submit::SubmitError, validate::ValidateError, visitor::VisitorIssues,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured error with a stable classification, shared by the core
/// modules. The facade maps it onto its public error type.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }

    /// Validation issues, when this error came from the validator.
    #[must_use]
    pub const fn issues(&self) -> Option<&VisitorIssues> {
        match &self.detail {
            Some(ErrorDetail::Validation(issues)) => Some(issues),
            _ => None,
        }
    }

    /// Full server body, when the server reported the failure.
    #[must_use]
    pub const fn server_body(&self) -> Option<&serde_json::Value> {
        match &self.detail {
            Some(ErrorDetail::Server(body)) => Some(body),
            _ => None,
        }
    }
}

impl From<DocumentError> for InternalError {
    fn from(err: DocumentError) -> Self {
        Self::new(ErrorClass::Decode, ErrorOrigin::Document, err.to_string())
    }
}

impl From<ValidateError> for InternalError {
    fn from(err: ValidateError) -> Self {
        match err {
            ValidateError::Decode(inner) => inner.into(),
            ValidateError::ValidationFailed(issues) => Self::new(
                ErrorClass::Invalid,
                ErrorOrigin::Validate,
                format!("validation failed: {} issue(s)", issues.count()),
            )
            .with_detail(ErrorDetail::Validation(issues)),
        }
    }
}

impl From<SubmitError> for InternalError {
    fn from(err: SubmitError) -> Self {
        let message = err.message();

        match err {
            SubmitError::Transport { .. } => {
                Self::new(ErrorClass::Transport, ErrorOrigin::Submit, message)
            }
            SubmitError::Status { body, .. } => {
                let err = Self::new(ErrorClass::Server, ErrorOrigin::Submit, message);
                match body {
                    Some(body) => err.with_detail(ErrorDetail::Server(body)),
                    None => err,
                }
            }
            SubmitError::Server { body } => {
                Self::new(ErrorClass::Server, ErrorOrigin::Submit, message)
                    .with_detail(ErrorDetail::Server(body))
            }
            SubmitError::Decode { .. } => {
                Self::new(ErrorClass::Decode, ErrorOrigin::Submit, message)
            }
        }
    }
}

///
/// ErrorDetail
///

#[derive(Clone, Debug)]
pub enum ErrorDetail {
    Validation(VisitorIssues),
    Server(serde_json::Value),
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Decode,
    Invalid,
    Transport,
    Server,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Decode => "decode",
            Self::Invalid => "invalid",
            Self::Transport => "transport",
            Self::Server => "server",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Document,
    Validate,
    Submit,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Document => "document",
            Self::Validate => "validate",
            Self::Submit => "submit",
        };
        write!(f, "{label}")
    }
}
