//! Module: value
//! Responsibility: Datalog input literals and type-tagged complex values.
//! Does not own: where-clause or pull-pattern structure.
//! Boundary: leaf values shared by clauses, rule usages and query arguments.

mod encode;
mod rule;

#[cfg(test)]
mod tests;

pub use encode::{
    IntoInstant, bigdec, bigint, bytes, instant, keyword, rule, symbol, uri, uuid,
};
pub use rule::RuleUsage;

use serde::{Deserialize, Serialize};

///
/// Value
///
/// One Datalog literal as it appears on the wire.
/// Lists carry entity refs (`[attr, id]`), collection inputs and
/// nested predicate invocations.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Complex(ComplexValue),
    List(Vec<Self>),
}

impl Value {
    /// Borrow the text payload when this is a plain string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the items when this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for text starting with `?`.
    #[must_use]
    pub fn is_logic_var(&self) -> bool {
        self.as_text().is_some_and(|text| text.starts_with('?'))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<ComplexValue> for Value {
    fn from(value: ComplexValue) -> Self {
        Self::Complex(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

///
/// ComplexValue
///
/// Non-JSON-native Datalog value, tagged as `{"type": kind, "value": encoded}`.
/// Construct through the encoder functions; values are never mutated.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ComplexValue {
    Uuid(String),
    Keyword(String),
    Symbol(String),
    Bigint(String),
    Bigdec(String),
    Instant(String),
    Uri(String),
    Bytes(String),
}

impl ComplexValue {
    /// Wire tag of this value.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Uuid(_) => "uuid",
            Self::Keyword(_) => "keyword",
            Self::Symbol(_) => "symbol",
            Self::Bigint(_) => "bigint",
            Self::Bigdec(_) => "bigdec",
            Self::Instant(_) => "instant",
            Self::Uri(_) => "uri",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Encoded payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uuid(v)
            | Self::Keyword(v)
            | Self::Symbol(v)
            | Self::Bigint(v)
            | Self::Bigdec(v)
            | Self::Instant(v)
            | Self::Uri(v)
            | Self::Bytes(v) => v,
        }
    }
}
