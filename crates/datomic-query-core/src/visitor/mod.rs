//! Module: visitor
//! Responsibility: path-tracking traversal over document nodes.
//! Does not own: the rules applied at each node (see `validate`).
//! Boundary: nodes describe their children via `Visitable::drive`.

mod context;

pub use context::{Issue, PathSegment, VisitorContext};

use derive_more::{Deref, IntoIterator};
use std::{collections::BTreeMap, fmt};

// ============================================================================
// Visitable
// ============================================================================

///
/// Visitable
///
/// A node the traversal can enter. `drive` pushes each child through
/// `perform_visit` with its path segment; `validate_self` reports issues
/// about this node only and must not recurse.
///

pub trait Visitable {
    fn drive(&self, _: &mut dyn VisitorCore) {}

    fn validate_self(&self, _: &mut dyn VisitorContext) {}
}

// ============================================================================
// Visitor
// ============================================================================

pub trait Visitor {
    fn enter(&mut self, node: &dyn Visitable, ctx: &mut dyn VisitorContext);

    fn exit(&mut self, node: &dyn Visitable, ctx: &mut dyn VisitorContext);
}

// ============================================================================
// VisitorCore (object-safe traversal)
// ============================================================================

pub trait VisitorCore {
    fn enter(&mut self, node: &dyn Visitable);
    fn exit(&mut self, node: &dyn Visitable);

    fn push(&mut self, _: PathSegment) {}
    fn pop(&mut self) {}
}

// ============================================================================
// VisitorIssues
// ============================================================================

///
/// VisitorIssues
///
/// Every issue found during one traversal, grouped by rendered path.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct VisitorIssues(BTreeMap<String, Vec<String>>);

impl VisitorIssues {
    /// Total number of messages across all paths.
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Messages recorded at `path`.
    #[must_use]
    pub fn at(&self, path: &str) -> &[String] {
        self.0.get(path).map_or(&[], Vec::as_slice)
    }

    /// `(path, message)` pairs in path order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(path, messages)| {
            messages
                .iter()
                .map(move |message| (path.as_str(), message.as_str()))
        })
    }
}

impl fmt::Display for VisitorIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, message)) in self.pairs().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if path.is_empty() {
                write!(f, "{message}")?;
            } else {
                write!(f, "{path}: {message}")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// AdapterContext
// ============================================================================

struct AdapterContext<'a> {
    path: &'a [PathSegment],
    issues: &'a mut BTreeMap<String, Vec<String>>,
}

impl VisitorContext for AdapterContext<'_> {
    fn add_issue(&mut self, issue: Issue) {
        let key = render_path(self.path, None);
        self.issues.entry(key).or_default().push(issue.message);
    }

    fn add_issue_at(&mut self, seg: PathSegment, issue: Issue) {
        let key = render_path(self.path, Some(seg));
        self.issues.entry(key).or_default().push(issue.message);
    }
}

fn render_path(path: &[PathSegment], extra: Option<PathSegment>) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let mut first = true;

    let iter = path.iter().cloned().chain(extra);

    for seg in iter {
        match seg {
            PathSegment::Field(s) => {
                if !first {
                    out.push('.');
                }
                out.push_str(s);
            }
            PathSegment::Key(key) => {
                if !first {
                    out.push('.');
                }
                out.push_str(&key);
            }
            PathSegment::Index(i) => {
                let _ = write!(out, "[{i}]");
            }
            PathSegment::Empty => continue,
        }
        first = false;
    }

    out
}

// ============================================================================
// VisitorAdapter
// ============================================================================

pub struct VisitorAdapter<V> {
    visitor: V,
    path: Vec<PathSegment>,
    issues: BTreeMap<String, Vec<String>>,
}

impl<V> VisitorAdapter<V>
where
    V: Visitor,
{
    pub const fn new(visitor: V) -> Self {
        Self {
            visitor,
            path: Vec::new(),
            issues: BTreeMap::new(),
        }
    }

    /// `Ok` when the traversal recorded nothing.
    pub fn result(self) -> Result<(), VisitorIssues> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(VisitorIssues(self.issues))
        }
    }
}

impl<V> VisitorCore for VisitorAdapter<V>
where
    V: Visitor,
{
    fn push(&mut self, seg: PathSegment) {
        if !matches!(seg, PathSegment::Empty) {
            self.path.push(seg);
        }
    }

    fn pop(&mut self) {
        self.path.pop();
    }

    fn enter(&mut self, node: &dyn Visitable) {
        let mut ctx = AdapterContext {
            path: &self.path,
            issues: &mut self.issues,
        };

        self.visitor.enter(node, &mut ctx);
    }

    fn exit(&mut self, node: &dyn Visitable) {
        let mut ctx = AdapterContext {
            path: &self.path,
            issues: &mut self.issues,
        };

        self.visitor.exit(node, &mut ctx);
    }
}

// ============================================================================
// Traversal
// ============================================================================

pub fn perform_visit<S: Into<PathSegment>>(
    visitor: &mut dyn VisitorCore,
    node: &dyn Visitable,
    seg: S,
) {
    let seg = seg.into();
    let should_push = !matches!(seg, PathSegment::Empty);

    if should_push {
        visitor.push(seg);
    }

    visitor.enter(node);
    node.drive(visitor);
    visitor.exit(node);

    if should_push {
        visitor.pop();
    }
}

/// Visit each item of a slice under `field[i]`.
pub fn visit_indexed<T: Visitable>(
    visitor: &mut dyn VisitorCore,
    field: &'static str,
    items: &[T],
) {
    visitor.push(PathSegment::Field(field));
    for (i, item) in items.iter().enumerate() {
        perform_visit(visitor, item, i);
    }
    visitor.pop();
}
