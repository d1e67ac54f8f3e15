//! Module: document
//! Responsibility: the query document and its wire-stable JSON shape.
//! Does not own: incremental construction (builder) or shape checks (validate).
//! Boundary: plain, serializable snapshot handed to a submitter.

mod binding;
mod clause;
mod pull;


pub use binding::BindingForm;
pub use clause::{FnCall, WhereClause};
pub use pull::{AttrOption, AttrOptionKind, AttrSpec, MapKey, MapSpec, MapTarget, RecursionLimit};

use crate::value::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error as ThisError;

const SINGLE_MARKER: &str = ".";
const MANY_MARKER: &str = "...";

///
/// DocumentError
///

#[derive(Debug, ThisError)]
pub enum DocumentError {
    #[error("malformed query document: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("query document could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

///
/// QueryDocument
///
/// Accumulated find/pull query. Only `find` is mandatory; absent optional
/// sections are omitted from the JSON entirely.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct QueryDocument {
    pub find: Vec<FindTerm>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,

    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<BindingForm>>,

    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub clauses: Option<Vec<WhereClause>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<Value>>,
}

impl QueryDocument {
    /// Document holding only a `find` list.
    #[must_use]
    pub const fn new(find: Vec<FindTerm>) -> Self {
        Self {
            find,
            keys: None,
            inputs: None,
            clauses: None,
            args: None,
        }
    }

    /// Copy of this document with `args` set to exactly `args`.
    #[must_use]
    pub fn with_args(&self, args: Vec<Value>) -> Self {
        Self {
            args: Some(args),
            ..self.clone()
        }
    }

    /// True when `find` is a pull expression followed by a cardinality marker.
    #[must_use]
    pub fn is_pull(&self) -> bool {
        matches!(
            self.find.as_slice(),
            [FindTerm::Pull(_), FindTerm::Single | FindTerm::Many]
        )
    }

    pub fn to_json(&self) -> Result<serde_json::Value, DocumentError> {
        serde_json::to_value(self).map_err(DocumentError::Encode)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string(self).map_err(DocumentError::Encode)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Encode)
    }

    /// Decode a document from JSON text.
    ///
    /// The text parser stops at 128 nested containers, so a nested pull
    /// map costs two levels (object and pattern list), which caps a pull
    /// pattern read from text at about 60 map levels. Deeper text
    /// fails with [`DocumentError::Decode`]; documents built in code or
    /// decoded through [`Self::from_json`] have no such ceiling.
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(DocumentError::Decode)
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self, DocumentError> {
        serde_json::from_value(json).map_err(DocumentError::Decode)
    }
}

///
/// FindTerm
///
/// One element of `find`. Pull queries always hold `[Pull, Single]`
/// or `[Pull, Many]`.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FindTerm {
    /// Logic variable (or any other bare find expression).
    Var(String),
    Pull(PullExpr),
    /// `"."`
    Single,
    /// `"..."`
    Many,
}

impl From<&str> for FindTerm {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for FindTerm {
    fn from(value: String) -> Self {
        match value.as_str() {
            SINGLE_MARKER => Self::Single,
            MANY_MARKER => Self::Many,
            _ => Self::Var(value),
        }
    }
}

impl From<PullExpr> for FindTerm {
    fn from(value: PullExpr) -> Self {
        Self::Pull(value)
    }
}

impl Serialize for FindTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Var(var) => serializer.serialize_str(var),
            Self::Pull(pull) => pull.serialize(serializer),
            Self::Single => serializer.serialize_str(SINGLE_MARKER),
            Self::Many => serializer.serialize_str(MANY_MARKER),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FindTermWire {
    Text(String),
    Pull(PullExpr),
}

impl<'de> Deserialize<'de> for FindTerm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match FindTermWire::deserialize(deserializer)? {
            FindTermWire::Text(text) => Self::from(text),
            FindTermWire::Pull(pull) => Self::Pull(pull),
        })
    }
}

///
/// PullExpr
///
/// `{"pull": pattern, "entity": var}`
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PullExpr {
    pub pull: Vec<AttrSpec>,
    pub entity: String,
}

impl PullExpr {
    #[must_use]
    pub fn new<I, T>(entity: impl Into<String>, pattern: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AttrSpec>,
    {
        Self {
            pull: pattern.into_iter().map(Into::into).collect(),
            entity: entity.into(),
        }
    }
}
