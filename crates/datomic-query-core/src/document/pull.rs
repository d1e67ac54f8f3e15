//! Pull patterns: the recursive attribute selection used by pull expressions.

use crate::value::Value;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer, de,
    ser::{SerializeMap, SerializeSeq},
};
use std::fmt;

const WILDCARD: &str = "*";
const UNBOUNDED: &str = "...";

///
/// AttrSpec
///
/// One element of a pull pattern. Map specs nest further patterns, so
/// the type is recursive with no depth ceiling.
///

#[derive(Clone, Debug, PartialEq)]
pub enum AttrSpec {
    Name(String),
    Wildcard,
    Option(AttrOption),
    Map(MapSpec),
}

impl AttrSpec {
    /// `[attr, "as", alias]`
    #[must_use]
    pub fn alias(attr: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::Option(AttrOption::new(attr, AttrOptionKind::As(alias.into())))
    }

    /// `[attr, "limit", n]`
    #[must_use]
    pub fn limit(attr: impl Into<String>, limit: u64) -> Self {
        Self::Option(AttrOption::new(attr, AttrOptionKind::Limit(limit)))
    }

    /// `[attr, "default", value]`
    #[must_use]
    pub fn with_default(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Option(AttrOption::new(attr, AttrOptionKind::Default(value.into())))
    }

    /// `{attr: [pattern...]}`
    #[must_use]
    pub fn nested<I, T>(attr: impl Into<String>, pattern: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::Map(MapSpec::Attrs(vec![(
            attr.into(),
            MapTarget::Pattern(pattern.into_iter().map(Into::into).collect()),
        )]))
    }

    /// `{attr: limit}` where limit is a depth or `"..."`.
    #[must_use]
    pub fn recursive(attr: impl Into<String>, limit: RecursionLimit) -> Self {
        Self::Map(MapSpec::Attrs(vec![(
            attr.into(),
            MapTarget::Recursion(limit),
        )]))
    }

    /// `{"key": key, "selector": [pattern...]}`
    #[must_use]
    pub fn keyed<I, T>(key: impl Into<MapKey>, selector: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::Map(MapSpec::KeySelector {
            key: key.into(),
            selector: selector.into_iter().map(Into::into).collect(),
        })
    }
}

impl From<&str> for AttrSpec {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for AttrSpec {
    fn from(value: String) -> Self {
        if value == WILDCARD {
            Self::Wildcard
        } else {
            Self::Name(value)
        }
    }
}

impl From<AttrOption> for AttrSpec {
    fn from(value: AttrOption) -> Self {
        Self::Option(value)
    }
}

impl From<MapSpec> for AttrSpec {
    fn from(value: MapSpec) -> Self {
        Self::Map(value)
    }
}

impl Serialize for AttrSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Name(name) => serializer.serialize_str(name),
            Self::Wildcard => serializer.serialize_str(WILDCARD),
            Self::Option(option) => option.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttrSpecWire {
    Text(String),
    Option(AttrOption),
    Map(MapSpec),
}

impl<'de> Deserialize<'de> for AttrSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match AttrSpecWire::deserialize(deserializer)? {
            AttrSpecWire::Text(text) => Self::from(text),
            AttrSpecWire::Option(option) => Self::Option(option),
            AttrSpecWire::Map(map) => Self::Map(map),
        })
    }
}

///
/// AttrOption
///
/// Attribute with a per-attribute option: `[attr, option, argument]`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct AttrOption {
    pub attr: String,
    pub kind: AttrOptionKind,
}

impl AttrOption {
    #[must_use]
    pub fn new(attr: impl Into<String>, kind: AttrOptionKind) -> Self {
        Self {
            attr: attr.into(),
            kind,
        }
    }
}

///
/// AttrOptionKind
///

#[derive(Clone, Debug, PartialEq)]
pub enum AttrOptionKind {
    As(String),
    Limit(u64),
    Default(Value),
}

impl AttrOptionKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::As(_) => "as",
            Self::Limit(_) => "limit",
            Self::Default(_) => "default",
        }
    }
}

impl Serialize for AttrOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&self.attr)?;
        seq.serialize_element(self.kind.label())?;
        match &self.kind {
            AttrOptionKind::As(alias) => seq.serialize_element(alias)?,
            AttrOptionKind::Limit(limit) => seq.serialize_element(limit)?,
            AttrOptionKind::Default(value) => seq.serialize_element(value)?,
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for AttrOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (attr, label, argument) = <(String, String, Value)>::deserialize(deserializer)?;

        let kind = match (label.as_str(), argument) {
            ("as", Value::Text(alias)) => AttrOptionKind::As(alias),
            ("limit", Value::Int(limit)) => {
                let limit = u64::try_from(limit)
                    .map_err(|_| de::Error::custom("pull limit must not be negative"))?;
                AttrOptionKind::Limit(limit)
            }
            ("default", value) => AttrOptionKind::Default(value),
            (label, argument) => {
                return Err(de::Error::custom(format!(
                    "invalid attribute option '{label}' with argument {argument:?}"
                )));
            }
        };

        Ok(Self { attr, kind })
    }
}

///
/// MapSpec
///
/// Nested or recursive pull. Attribute order is kept as written.
///

#[derive(Clone, Debug, PartialEq)]
pub enum MapSpec {
    Attrs(Vec<(String, MapTarget)>),
    KeySelector { key: MapKey, selector: Vec<AttrSpec> },
}

impl Serialize for MapSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Attrs(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (attr, target) in entries {
                    map.serialize_entry(attr, target)?;
                }
                map.end()
            }
            Self::KeySelector { key, selector } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("key", key)?;
                map.serialize_entry("selector", selector)?;
                map.end()
            }
        }
    }
}

struct MapSpecVisitor;

impl<'de> de::Visitor<'de> for MapSpecVisitor {
    type Value = MapSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a pull map spec")
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut access: A) -> Result<MapSpec, A::Error> {
        let mut entries: Vec<(String, serde_json::Value)> = Vec::new();
        while let Some(key) = access.next_key::<String>()? {
            let value = access.next_value::<serde_json::Value>()?;
            entries.push((key, value));
        }

        let is_key_selector = entries.len() == 2
            && entries.iter().any(|(k, _)| k == "key")
            && entries.iter().any(|(k, _)| k == "selector");

        if is_key_selector {
            let mut key = None;
            let mut selector = None;
            for (name, value) in entries {
                if name == "key" {
                    key = Some(serde_json::from_value(value).map_err(de::Error::custom)?);
                } else {
                    selector = Some(serde_json::from_value(value).map_err(de::Error::custom)?);
                }
            }

            return match (key, selector) {
                (Some(key), Some(selector)) => Ok(MapSpec::KeySelector { key, selector }),
                _ => Err(de::Error::custom("key selector requires 'key' and 'selector'")),
            };
        }

        entries
            .into_iter()
            .map(|(attr, value)| {
                serde_json::from_value(value)
                    .map(|target| (attr, target))
                    .map_err(de::Error::custom)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(MapSpec::Attrs)
    }
}

impl<'de> Deserialize<'de> for MapSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapSpecVisitor)
    }
}

///
/// MapTarget
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MapTarget {
    Pattern(Vec<AttrSpec>),
    Recursion(RecursionLimit),
}

///
/// RecursionLimit
///
/// Depth bound for a recursive pull; `Unbounded` is written `"..."`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecursionLimit {
    Depth(u64),
    Unbounded,
}

impl Serialize for RecursionLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Depth(depth) => serializer.serialize_u64(*depth),
            Self::Unbounded => serializer.serialize_str(UNBOUNDED),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecursionLimitWire {
    Depth(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for RecursionLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RecursionLimitWire::deserialize(deserializer)? {
            RecursionLimitWire::Depth(depth) => Ok(Self::Depth(depth)),
            RecursionLimitWire::Text(text) if text == UNBOUNDED => Ok(Self::Unbounded),
            RecursionLimitWire::Text(text) => Err(de::Error::custom(format!(
                "recursion limit must be a number or '{UNBOUNDED}', found '{text}'"
            ))),
        }
    }
}

///
/// MapKey
///
/// Key of a key/selector map spec: a bare attribute or an attribute option.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MapKey {
    Attr(String),
    Option(AttrOption),
}

impl MapKey {
    #[must_use]
    pub fn attr(&self) -> &str {
        match self {
            Self::Attr(attr) => attr,
            Self::Option(option) => &option.attr,
        }
    }
}

impl From<&str> for MapKey {
    fn from(value: &str) -> Self {
        Self::Attr(value.to_string())
    }
}

impl From<String> for MapKey {
    fn from(value: String) -> Self {
        Self::Attr(value)
    }
}

impl From<AttrOption> for MapKey {
    fn from(value: AttrOption) -> Self {
        Self::Option(value)
    }
}
