//! Module: validate
//! Responsibility: structural checks over a built query document.
//! Does not own: schema awareness (attribute existence is the server's call).
//! Boundary: advisory; builders never call this implicitly.

mod node;
mod syntax;

#[cfg(test)]
mod tests;

pub use syntax::{is_logic_var, is_qualified_attr};

use crate::{
    document::{DocumentError, QueryDocument},
    visitor::{
        PathSegment, Visitable, Visitor, VisitorAdapter, VisitorContext, VisitorIssues,
        perform_visit,
    },
};
use thiserror::Error as ThisError;

///
/// ValidateError
///

#[derive(Debug, ThisError)]
pub enum ValidateError {
    #[error("{0}")]
    Decode(#[from] DocumentError),

    #[error("validation failed:\n{0}")]
    ValidationFailed(VisitorIssues),
}

impl ValidateError {
    /// Issues found, if this is a structural failure.
    #[must_use]
    pub const fn issues(&self) -> Option<&VisitorIssues> {
        match self {
            Self::ValidationFailed(issues) => Some(issues),
            Self::Decode(_) => None,
        }
    }
}

/// Check every node of `document`, collecting all issues.
pub fn validate(document: &QueryDocument) -> Result<(), ValidateError> {
    let mut adapter = VisitorAdapter::new(ValidateVisitor);
    perform_visit(&mut adapter, document, PathSegment::Empty);

    adapter.result().map_err(ValidateError::ValidationFailed)
}

/// Decode a wire document and validate it.
pub fn validate_json(json: &str) -> Result<QueryDocument, ValidateError> {
    let document = QueryDocument::from_json_str(json)?;
    validate(&document)?;

    Ok(document)
}

///
/// ValidateVisitor
///

struct ValidateVisitor;

impl Visitor for ValidateVisitor {
    fn enter(&mut self, node: &dyn Visitable, ctx: &mut dyn VisitorContext) {
        node.validate_self(ctx);
    }

    fn exit(&mut self, _: &dyn Visitable, _: &mut dyn VisitorContext) {}
}
