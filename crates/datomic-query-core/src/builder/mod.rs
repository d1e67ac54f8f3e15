//! Module: builder
//! Responsibility: fluent accumulation of find and pull query documents.
//! Does not own: structural validation or transport.
//! Boundary: user-facing DSL; `build` snapshots, `run` hands off to a submitter.


use crate::{
    document::{AttrSpec, BindingForm, FindTerm, PullExpr, QueryDocument, WhereClause},
    submit::{SubmitError, Submitter},
    validate::{self, ValidateError},
    value::Value,
};
use std::marker::PhantomData;

///
/// QueryKind
///
/// Marker for the builder family. Only find queries expose `keys`.
///

pub trait QueryKind: sealed::Sealed {}

mod sealed {
    pub trait Sealed {}
}

#[derive(Clone, Copy, Debug)]
pub struct FindKind;

#[derive(Clone, Copy, Debug)]
pub struct PullKind;

impl sealed::Sealed for FindKind {}
impl sealed::Sealed for PullKind {}
impl QueryKind for FindKind {}
impl QueryKind for PullKind {}

pub type FindQuery = QueryBuilder<FindKind>;
pub type PullQuery = QueryBuilder<PullKind>;

///
/// QueryBuilder
///
/// Owns one document and mutates it through chained calls.
///
/// - `find` is fixed at construction
/// - `where_` appends, `in_` and `keys` replace
/// - `build*` never writes `args` back; `run*` appends them before submitting
///
/// A builder is meant for one caller building one document at a time.
///

#[derive(Clone, Debug)]
pub struct QueryBuilder<K: QueryKind> {
    document: QueryDocument,
    _kind: PhantomData<K>,
}

/// Start a find query from its find terms.
#[must_use]
pub fn find<I, T>(terms: I) -> FindQuery
where
    I: IntoIterator<Item = T>,
    T: Into<FindTerm>,
{
    QueryBuilder::from_document(QueryDocument::new(
        terms.into_iter().map(Into::into).collect(),
    ))
}

/// Pull a single entity: `find = [{pull, entity}, "."]`.
#[must_use]
pub fn pull_one<I, T>(entity: impl Into<String>, pattern: I) -> PullQuery
where
    I: IntoIterator<Item = T>,
    T: Into<AttrSpec>,
{
    pull(PullExpr::new(entity, pattern), FindTerm::Single)
}

/// Pull every matching entity: `find = [{pull, entity}, "..."]`.
#[must_use]
pub fn pull_many<I, T>(entity: impl Into<String>, pattern: I) -> PullQuery
where
    I: IntoIterator<Item = T>,
    T: Into<AttrSpec>,
{
    pull(PullExpr::new(entity, pattern), FindTerm::Many)
}

fn pull(expr: PullExpr, marker: FindTerm) -> PullQuery {
    QueryBuilder::from_document(QueryDocument::new(vec![FindTerm::Pull(expr), marker]))
}

impl<K: QueryKind> QueryBuilder<K> {
    const fn from_document(document: QueryDocument) -> Self {
        Self {
            document,
            _kind: PhantomData,
        }
    }

    // ------------------------------------------------------------------
    // Accumulation
    // ------------------------------------------------------------------

    /// Replace the input binding forms.
    #[must_use]
    pub fn in_<I, T>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<BindingForm>,
    {
        self.document.inputs = Some(inputs.into_iter().map(Into::into).collect());
        self
    }

    /// Append where clauses after any already present.
    #[must_use]
    pub fn where_<I, T>(mut self, clauses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<WhereClause>,
    {
        self.document
            .clauses
            .get_or_insert_with(Vec::new)
            .extend(clauses.into_iter().map(Into::into));
        self
    }

    // ------------------------------------------------------------------
    // Terminals
    // ------------------------------------------------------------------

    /// Snapshot of the current document.
    #[must_use]
    pub fn build(&self) -> QueryDocument {
        self.document.clone()
    }

    /// Snapshot with `args` set to exactly `args`; an empty list behaves
    /// like [`build`](Self::build).
    #[must_use]
    pub fn build_with<I, T>(&self, args: I) -> QueryDocument
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        if args.is_empty() {
            self.build()
        } else {
            self.document.with_args(args)
        }
    }

    /// Submit the current document.
    pub async fn run<S>(&mut self, submitter: &S) -> Result<serde_json::Value, SubmitError>
    where
        S: Submitter + ?Sized,
    {
        self.run_with(submitter, Vec::<Value>::new()).await
    }

    /// Append `args` to the held document, then submit it. Submission
    /// failures are returned unchanged.
    pub async fn run_with<S, I, T>(
        &mut self,
        submitter: &S,
        args: I,
    ) -> Result<serde_json::Value, SubmitError>
    where
        S: Submitter + ?Sized,
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        if !args.is_empty() {
            self.document.args.get_or_insert_with(Vec::new).extend(args);
        }

        tracing::debug!(
            find = self.document.find.len(),
            clauses = self.document.clauses.as_ref().map_or(0, Vec::len),
            args = self.document.args.as_ref().map_or(0, Vec::len),
            "submitting query document"
        );

        submitter.submit(&self.document).await
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Structural check of the current document.
    pub fn validate(&self) -> Result<(), ValidateError> {
        validate::validate(&self.document)
    }

    /// Live document state.
    #[must_use]
    pub const fn document(&self) -> &QueryDocument {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> QueryDocument {
        self.document
    }
}

impl FindQuery {
    /// Replace the output key names.
    #[must_use]
    pub fn keys<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.document.keys = Some(names.into_iter().map(Into::into).collect());
        self
    }
}
