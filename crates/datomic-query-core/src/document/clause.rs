//! Where clauses: data patterns, predicate and function calls, rule usages.

use crate::{
    document::BindingForm,
    value::{RuleUsage, Value},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeSeq};

///
/// WhereClause
///
/// One constraint in the `where` list. Clauses are kept in the order
/// they were added and are never reordered.
///

#[derive(Clone, Debug, PartialEq)]
pub enum WhereClause {
    /// `[entity, attribute, value, tx, op]`, any 2–5 leading positions.
    Pattern(Vec<Value>),

    /// `[[fn, ...args]]`
    Predicate(FnCall),

    /// `[[fn, ...args], binding]`
    Function(FnCall, BindingForm),

    /// `{"type": "rule", "value": [name, ...args]}`
    Rule(RuleUsage),
}

impl WhereClause {
    /// Data pattern from any sequence of values.
    #[must_use]
    pub fn pattern<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Pattern(items.into_iter().map(Into::into).collect())
    }

    /// Short label used by diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Pattern(_) => "pattern",
            Self::Predicate(_) => "predicate",
            Self::Function(..) => "function",
            Self::Rule(_) => "rule",
        }
    }

    // Predicates and function calls are lists headed by a list whose first
    // item names the function; a function call adds exactly one binding.
    fn classify(items: Vec<Value>) -> Self {
        match items.as_slice() {
            [Value::List(call)] => {
                if let Some(call) = FnCall::from_values(call) {
                    return Self::Predicate(call);
                }
            }
            [Value::List(call), binding] => {
                if let (Some(call), Some(binding)) =
                    (FnCall::from_values(call), BindingForm::from_value(binding))
                {
                    return Self::Function(call, binding);
                }
            }
            _ => {}
        }

        Self::Pattern(items)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for WhereClause {
    fn from(items: [T; N]) -> Self {
        Self::pattern(items)
    }
}

impl<T: Into<Value>> From<Vec<T>> for WhereClause {
    fn from(items: Vec<T>) -> Self {
        Self::pattern(items)
    }
}

impl<A, B> From<(A, B)> for WhereClause
where
    A: Into<Value>,
    B: Into<Value>,
{
    fn from((a, b): (A, B)) -> Self {
        Self::Pattern(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for WhereClause
where
    A: Into<Value>,
    B: Into<Value>,
    C: Into<Value>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        Self::Pattern(vec![a.into(), b.into(), c.into()])
    }
}

impl<A, B, C, D> From<(A, B, C, D)> for WhereClause
where
    A: Into<Value>,
    B: Into<Value>,
    C: Into<Value>,
    D: Into<Value>,
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Self::Pattern(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

impl<A, B, C, D, E> From<(A, B, C, D, E)> for WhereClause
where
    A: Into<Value>,
    B: Into<Value>,
    C: Into<Value>,
    D: Into<Value>,
    E: Into<Value>,
{
    fn from((a, b, c, d, e): (A, B, C, D, E)) -> Self {
        Self::Pattern(vec![a.into(), b.into(), c.into(), d.into(), e.into()])
    }
}

impl From<FnCall> for WhereClause {
    fn from(call: FnCall) -> Self {
        Self::Predicate(call)
    }
}

impl From<RuleUsage> for WhereClause {
    fn from(usage: RuleUsage) -> Self {
        Self::Rule(usage)
    }
}

impl Serialize for WhereClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Pattern(items) => items.serialize(serializer),
            Self::Predicate(call) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(call)?;
                seq.end()
            }
            Self::Function(call, binding) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(call)?;
                seq.serialize_element(binding)?;
                seq.end()
            }
            Self::Rule(usage) => usage.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WhereClauseWire {
    Rule(RuleUsage),
    Items(Vec<Value>),
}

impl<'de> Deserialize<'de> for WhereClause {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WhereClauseWire::deserialize(deserializer) {
            Ok(WhereClauseWire::Rule(usage)) => Ok(Self::Rule(usage)),
            Ok(WhereClauseWire::Items(items)) => Ok(Self::classify(items)),
            Err(_) => Err(de::Error::custom(
                "where clause must be a list or a rule usage",
            )),
        }
    }
}

///
/// FnCall
///
/// Function invocation `[fn, ...args]` used by predicate and
/// function-binding clauses.
///

#[derive(Clone, Debug, PartialEq)]
pub struct FnCall {
    pub name: String,
    pub args: Vec<Value>,
}

impl FnCall {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append several arguments in order.
    #[must_use]
    pub fn args<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// Bind the call's output, producing a function clause.
    #[must_use]
    pub fn bind(self, binding: impl Into<BindingForm>) -> WhereClause {
        WhereClause::Function(self, binding.into())
    }

    fn from_values(items: &[Value]) -> Option<Self> {
        let (head, rest) = items.split_first()?;
        let name = head.as_text()?;

        Some(Self {
            name: name.to_string(),
            args: rest.to_vec(),
        })
    }
}

impl Serialize for FnCall {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.args.len() + 1))?;
        seq.serialize_element(&self.name)?;
        for arg in &self.args {
            seq.serialize_element(arg)?;
        }
        seq.end()
    }
}
