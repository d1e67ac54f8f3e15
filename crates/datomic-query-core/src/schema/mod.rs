//! Module: schema
//! Responsibility: the attribute catalog a server publishes, and pure
//! filtering/grouping over it for authoring tools.
//! Does not own: fetching (see the facade client) or query validation.


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// SchemaAttribute
///
/// One installed schema entry: an attribute, an ident, or a database
/// function (flags may overlap).
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAttribute {
    pub ident: String,
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<String>,

    #[serde(default)]
    pub is_ident: bool,

    #[serde(default)]
    pub is_function: bool,

    #[serde(default)]
    pub is_attribute: bool,

    #[serde(default)]
    pub is_unique: bool,

    #[serde(default)]
    pub is_component: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<Uniqueness>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

///
/// Uniqueness
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Uniqueness {
    #[serde(rename = "unique/value")]
    Value,

    #[serde(rename = "unique/identity")]
    Identity,
}

///
/// EntityShape
///
/// Attributes observed on entities sharing a unique attribute.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityShape {
    pub unique_attribute: String,
    pub schema: serde_json::Value,
}

///
/// Envelope
///
/// `{"data": ...}` wrapper used by the catalog endpoints.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

///
/// SchemaFilter
///
/// Kind toggles are OR-ed; the `only_*` flags narrow further. With every
/// kind toggle off nothing matches.
///

#[derive(Clone, Debug, Eq, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SchemaFilter {
    pub show_ident: bool,
    pub show_fn: bool,
    pub show_attribute: bool,
    pub only_unique: bool,
    pub only_components: bool,
    pub search: Option<String>,
}

impl Default for SchemaFilter {
    fn default() -> Self {
        Self {
            show_ident: true,
            show_fn: true,
            show_attribute: true,
            only_unique: false,
            only_components: false,
            search: None,
        }
    }
}

impl SchemaFilter {
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    #[must_use]
    pub fn matches(&self, attr: &SchemaAttribute) -> bool {
        let kind = (self.show_ident && attr.is_ident)
            || (self.show_fn && attr.is_function)
            || (self.show_attribute && attr.is_attribute);

        kind && (!self.only_unique || attr.is_unique)
            && (!self.only_components || attr.is_component)
            && self.matches_search(attr)
    }

    fn matches_search(&self, attr: &SchemaAttribute) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        let needle = term.trim().to_lowercase();

        [Some(&attr.namespace), attr.doc.as_ref(), Some(&attr.ident)]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Matching attributes in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, attrs: &'a [SchemaAttribute]) -> Vec<&'a SchemaAttribute> {
        attrs.iter().filter(|attr| self.matches(attr)).collect()
    }
}

/// Group attributes by namespace; namespaces sorted, members in input order.
#[must_use]
pub fn group_by_namespace<'a, I>(attrs: I) -> BTreeMap<&'a str, Vec<&'a SchemaAttribute>>
where
    I: IntoIterator<Item = &'a SchemaAttribute>,
{
    let mut groups: BTreeMap<&str, Vec<&SchemaAttribute>> = BTreeMap::new();
    for attr in attrs {
        groups.entry(attr.namespace.as_str()).or_default().push(attr);
    }

    groups
}

///
/// SchemaStats
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SchemaStats {
    pub idents: usize,
    pub functions: usize,
    pub attributes: usize,
    pub components: usize,
    pub unique: usize,
}

impl SchemaStats {
    #[must_use]
    pub fn collect(attrs: &[SchemaAttribute]) -> Self {
        attrs.iter().fold(Self::default(), |mut stats, attr| {
            stats.idents += usize::from(attr.is_ident);
            stats.functions += usize::from(attr.is_function);
            stats.attributes += usize::from(attr.is_attribute);
            stats.components += usize::from(attr.is_component);
            stats.unique += usize::from(attr.is_unique);
            stats
        })
    }
}
