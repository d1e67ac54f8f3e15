use crate::value::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeSeq};

const COLLECTION_MARKER: &str = "...";

///
/// BindingForm
///
/// How one positional input (or a function result) binds to variables.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BindingForm {
    /// `?x`, or a source/rules variable such as `$` or `%`.
    Scalar(String),
    /// `[?a, _, ?c]`
    Tuple(Vec<String>),
    /// `[?x, "..."]`
    Collection(String),
    /// `[[?a, ?b]]`
    Relation(Vec<String>),
}

impl BindingForm {
    #[must_use]
    pub fn scalar(var: impl Into<String>) -> Self {
        Self::Scalar(var.into())
    }

    #[must_use]
    pub fn tuple<I, T>(vars: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Tuple(vars.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn collection(var: impl Into<String>) -> Self {
        Self::Collection(var.into())
    }

    #[must_use]
    pub fn relation<I, T>(vars: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Relation(vars.into_iter().map(Into::into).collect())
    }

    /// Read a binding form out of a where-clause position.
    /// Scalars must look like variables so plain attributes are not taken
    /// for bindings.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(text) if is_variable_like(text) => Some(Self::Scalar(text.clone())),
            Value::List(items) => match items.as_slice() {
                [Value::List(inner)] => texts(inner).map(Self::Relation),
                [Value::Text(var), Value::Text(marker)] if marker == COLLECTION_MARKER => {
                    Some(Self::Collection(var.clone()))
                }
                _ => texts(items).map(Self::Tuple),
            },
            _ => None,
        }
    }

    /// Variables this form binds, in order. Blanks are included.
    #[must_use]
    pub fn vars(&self) -> Vec<&str> {
        match self {
            Self::Scalar(var) | Self::Collection(var) => vec![var.as_str()],
            Self::Tuple(vars) | Self::Relation(vars) => vars.iter().map(String::as_str).collect(),
        }
    }
}

fn is_variable_like(text: &str) -> bool {
    text == "_" || text.starts_with(['?', '$', '%'])
}

fn texts(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| item.as_text().map(str::to_string))
        .collect()
}

impl From<&str> for BindingForm {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for BindingForm {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl Serialize for BindingForm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(var) => serializer.serialize_str(var),
            Self::Tuple(vars) => vars.serialize(serializer),
            Self::Collection(var) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(var)?;
                seq.serialize_element(COLLECTION_MARKER)?;
                seq.end()
            }
            Self::Relation(vars) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(vars)?;
                seq.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BindingFormWire {
    Text(String),
    Flat(Vec<String>),
    Nested(Vec<Vec<String>>),
}

impl<'de> Deserialize<'de> for BindingForm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match BindingFormWire::deserialize(deserializer)? {
            BindingFormWire::Text(var) => Ok(Self::Scalar(var)),
            BindingFormWire::Flat(vars) => match <[String; 2]>::try_from(vars) {
                Ok([var, marker]) if marker == COLLECTION_MARKER => Ok(Self::Collection(var)),
                Ok(pair) => Ok(Self::Tuple(pair.into())),
                Err(vars) => Ok(Self::Tuple(vars)),
            },
            BindingFormWire::Nested(mut rows) => {
                if rows.len() == 1 {
                    Ok(Self::Relation(rows.remove(0)))
                } else {
                    Err(de::Error::custom(
                        "relation binding must hold exactly one variable list",
                    ))
                }
            }
        }
    }
}
