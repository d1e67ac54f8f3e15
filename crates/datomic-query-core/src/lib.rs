//! Core of the Datomic query DSL: the wire document model, complex-value
//! encoders, fluent builders, the submission seam, the structural
//! validator, and the schema catalog model. No I/O lives here.

// public exports are one module level down
pub mod builder;
pub mod document;
pub mod error;
pub mod schema;
pub mod submit;
pub mod validate;
pub mod value;
pub mod visitor;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// datomic
///
/// Entry points in the shape query authors write them:
/// `datomic::find(["?e"]).where_(...)`.
///

pub mod datomic {
    pub use crate::{
        builder::{find, pull_many, pull_one},
        value::{bigdec, bigint, bytes, instant, keyword, rule, symbol, uri, uuid},
    };
}

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, submitters, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        builder::{FindQuery, PullQuery, find, pull_many, pull_one},
        document::{
            AttrSpec, BindingForm, FindTerm, FnCall, PullExpr, QueryDocument, RecursionLimit,
            WhereClause,
        },
        value::{ComplexValue, RuleUsage, Value},
    };
}
