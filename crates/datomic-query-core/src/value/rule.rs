use crate::value::Value;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de,
    ser::{SerializeMap, SerializeSeq},
};

const RULE_TAG: &str = "rule";

///
/// RuleUsage
///
/// Invocation of a named rule with positional arguments.
/// Serialized as `{"type": "rule", "value": [name, ...args]}` and placed
/// into `where` as a clause of its own.
///

#[derive(Clone, Debug, PartialEq)]
pub struct RuleUsage {
    name: String,
    args: Vec<Value>,
}

impl RuleUsage {
    pub fn new<I, T>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

struct RuleItems<'a>(&'a RuleUsage);

impl Serialize for RuleItems<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.args.len() + 1))?;
        seq.serialize_element(&self.0.name)?;
        for arg in &self.0.args {
            seq.serialize_element(arg)?;
        }
        seq.end()
    }
}

impl Serialize for RuleUsage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", RULE_TAG)?;
        map.serialize_entry("value", &RuleItems(self))?;
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleWire {
    #[serde(rename = "type")]
    tag: String,
    value: Vec<Value>,
}

impl<'de> Deserialize<'de> for RuleUsage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RuleWire { tag, value } = RuleWire::deserialize(deserializer)?;
        if tag != RULE_TAG {
            return Err(de::Error::custom(format!(
                "expected type '{RULE_TAG}', found '{tag}'"
            )));
        }

        let mut items = value.into_iter();
        match items.next() {
            Some(Value::Text(name)) => Ok(Self {
                name,
                args: items.collect(),
            }),
            Some(other) => Err(de::Error::custom(format!(
                "rule name must be a string, found {other:?}"
            ))),
            None => Err(de::Error::custom("rule usage is missing its name")),
        }
    }
}
