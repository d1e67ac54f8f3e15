//! Datomic query builder.
//!
//! Build Datalog find and pull documents fluently, check their shape, and
//! submit them to a query API over HTTP.
//!
//! ```ignore
//! use datomic_query::{ApiClient, config::Settings, datomic};
//!
//! let client = ApiClient::from_settings(&Settings::default())?;
//! let rows = datomic::find(["?e", "?name"])
//!     .where_([("?e", "user/name", "?name")])
//!     .run(&client)
//!     .await?;
//! ```

pub mod client;
pub mod error;

pub use client::{ApiClient, ClientError};
pub use datomic_query_config as config;
pub use datomic_query_core::{
    builder, datomic, document, schema, submit, validate, value, visitor,
};
pub use error::{ApiErrorKind, Error, ErrorKind, ErrorOrigin, QueryErrorKind};

///
/// Prelude
///

pub mod prelude {
    pub use crate::client::ApiClient;
    pub use datomic_query_core::prelude::*;
}
