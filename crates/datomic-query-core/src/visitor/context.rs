///
/// VisitorContext
/// Narrow interface exposed to visitors for reporting non-fatal issues.
/// Implemented by adapters via a short-lived context object.
///

pub trait VisitorContext {
    fn add_issue(&mut self, issue: Issue);
    fn add_issue_at(&mut self, seg: PathSegment, issue: Issue);
}

impl dyn VisitorContext + '_ {
    pub fn issue(&mut self, msg: impl Into<String>) {
        self.add_issue(Issue {
            message: msg.into(),
        });
    }

    pub fn issue_at(&mut self, seg: impl Into<PathSegment>, msg: impl Into<String>) {
        self.add_issue_at(
            seg.into(),
            Issue {
                message: msg.into(),
            },
        );
    }
}

///
/// Issue
///

#[derive(Clone, Debug, Default)]
pub struct Issue {
    pub message: String,
}

///
/// PathSegment
///

#[derive(Clone, Debug)]
pub enum PathSegment {
    Empty,
    Field(&'static str),
    Key(String),
    Index(usize),
}

impl From<&'static str> for PathSegment {
    fn from(s: &'static str) -> Self {
        Self::Field(s)
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}
