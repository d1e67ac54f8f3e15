use super::syntax::{
    is_aggregate, is_input_var, is_logic_var, is_qualified_attr, is_source_var, is_var_or_blank,
};
use crate::{
    document::{
        AttrOptionKind, AttrSpec, BindingForm, FindTerm, FnCall, MapSpec, MapTarget, PullExpr,
        QueryDocument, RecursionLimit, WhereClause,
    },
    value::{ComplexValue, Value},
    visitor::{PathSegment, Visitable, VisitorContext, VisitorCore, perform_visit, visit_indexed},
};
use std::collections::BTreeSet;

const PATTERN_ARITY: std::ops::RangeInclusive<usize> = 2..=5;

// ----------------------------------------------------------------------
// QueryDocument
// ----------------------------------------------------------------------

impl Visitable for QueryDocument {
    fn drive(&self, visitor: &mut dyn VisitorCore) {
        visitor.push(PathSegment::Field("find"));
        for (index, term) in self.find.iter().enumerate() {
            let slot = FindSlot {
                term,
                index,
                find: &self.find,
            };
            perform_visit(visitor, &slot, index);
        }
        visitor.pop();

        if let Some(inputs) = &self.inputs {
            visit_indexed(visitor, "in", inputs);
        }
        if let Some(clauses) = &self.clauses {
            visit_indexed(visitor, "where", clauses);
        }
    }

    fn validate_self(&self, ctx: &mut dyn VisitorContext) {
        if self.find.is_empty() {
            ctx.issue_at("find", "find must contain at least one term");
        }

        if let Some(keys) = &self.keys {
            if keys.len() != self.find.len() {
                ctx.issue_at(
                    "keys",
                    format!(
                        "expected {} keys to align with find, got {}",
                        self.find.len(),
                        keys.len()
                    ),
                );
            }

            let mut seen = BTreeSet::new();
            for key in keys {
                if key.is_empty() {
                    ctx.issue_at("keys", "key names must not be empty");
                } else if !seen.insert(key.as_str()) {
                    ctx.issue_at("keys", format!("duplicate key `{key}`"));
                }
            }
        }

        if let (Some(args), Some(inputs)) = (&self.args, &self.inputs)
            && args.len() > inputs.len()
        {
            ctx.issue_at(
                "args",
                format!(
                    "{} args supplied for {} input bindings",
                    args.len(),
                    inputs.len()
                ),
            );
        }
    }
}

// ----------------------------------------------------------------------
// Find terms
// ----------------------------------------------------------------------

///
/// FindSlot
///
/// A find term together with its position; marker legality depends on
/// the neighbouring terms. A marker ends a two-term find after a pull
/// (`pull_one` / `pull_many`) or a single variable (find-scalar `?x .`,
/// find-coll `?x ...`).
///

struct FindSlot<'a> {
    term: &'a FindTerm,
    index: usize,
    find: &'a [FindTerm],
}

impl Visitable for FindSlot<'_> {
    fn drive(&self, visitor: &mut dyn VisitorCore) {
        if let FindTerm::Pull(expr) = self.term {
            perform_visit(visitor, expr, PathSegment::Empty);
        }
    }

    fn validate_self(&self, ctx: &mut dyn VisitorContext) {
        match self.term {
            FindTerm::Var(var) => {
                if !is_logic_var(var) && !is_aggregate(var) {
                    ctx.issue(format!(
                        "expected a logic variable or aggregate, got `{var}`"
                    ));
                }
            }
            FindTerm::Pull(_) => {}
            FindTerm::Single | FindTerm::Many => {
                let ends_pair = self.index == 1
                    && self.find.len() == 2
                    && matches!(self.find.first(), Some(FindTerm::Pull(_) | FindTerm::Var(_)));

                if !ends_pair {
                    let marker = if matches!(self.term, FindTerm::Single) {
                        "."
                    } else {
                        "..."
                    };
                    ctx.issue(format!(
                        "cardinality marker `{marker}` must directly follow a single pull expression or variable and end find"
                    ));
                }
            }
        }
    }
}

impl Visitable for PullExpr {
    fn drive(&self, visitor: &mut dyn VisitorCore) {
        visit_indexed(visitor, "pull", &self.pull);
    }

    fn validate_self(&self, ctx: &mut dyn VisitorContext) {
        if !is_logic_var(&self.entity) {
            ctx.issue_at(
                "entity",
                format!("expected a logic variable, got `{}`", self.entity),
            );
        }
        if self.pull.is_empty() {
            ctx.issue_at("pull", "pull pattern must not be empty");
        }
    }
}

// ----------------------------------------------------------------------
// Pull patterns
// ----------------------------------------------------------------------

fn unqualified(attr: &str) -> String {
    format!("expected a qualified attribute name, got `{attr}`")
}

impl Visitable for AttrSpec {
    fn drive(&self, visitor: &mut dyn VisitorCore) {
        match self {
            Self::Map(MapSpec::Attrs(entries)) => {
                for (attr, target) in entries {
                    if let MapTarget::Pattern(pattern) = target {
                        visitor.push(PathSegment::Key(attr.clone()));
                        for (i, spec) in pattern.iter().enumerate() {
                            perform_visit(visitor, spec, i);
                        }
                        visitor.pop();
                    }
                }
            }
            Self::Map(MapSpec::KeySelector { selector, .. }) => {
                visit_indexed(visitor, "selector", selector);
            }
            Self::Name(_) | Self::Wildcard | Self::Option(_) => {}
        }
    }

    fn validate_self(&self, ctx: &mut dyn VisitorContext) {
        match self {
            Self::Name(attr) => {
                if !is_qualified_attr(attr) {
                    ctx.issue(unqualified(attr));
                }
            }
            Self::Wildcard => {}
            Self::Option(option) => {
                if !is_qualified_attr(&option.attr) {
                    ctx.issue_at(0usize, unqualified(&option.attr));
                }
                match &option.kind {
                    AttrOptionKind::As(alias) if alias.is_empty() => {
                        ctx.issue_at(2usize, "alias must not be empty");
                    }
                    AttrOptionKind::Limit(0) => ctx.issue_at(2usize, "limit must be positive"),
                    _ => {}
                }
            }
            Self::Map(MapSpec::Attrs(entries)) => {
                if entries.is_empty() {
                    ctx.issue("map spec must name at least one attribute");
                }
                for (attr, target) in entries {
                    if !is_qualified_attr(attr) {
                        ctx.issue_at(attr.clone(), unqualified(attr));
                    }
                    match target {
                        MapTarget::Pattern(pattern) if pattern.is_empty() => {
                            ctx.issue_at(attr.clone(), "nested pattern must not be empty");
                        }
                        MapTarget::Recursion(RecursionLimit::Depth(0)) => {
                            ctx.issue_at(attr.clone(), "recursion limit must be positive");
                        }
                        _ => {}
                    }
                }
            }
            Self::Map(MapSpec::KeySelector { key, selector }) => {
                if !is_qualified_attr(key.attr()) {
                    ctx.issue_at("key", unqualified(key.attr()));
                }
                if selector.is_empty() {
                    ctx.issue_at("selector", "selector must not be empty");
                }
            }
        }
    }
}

// ----------------------------------------------------------------------
// Binding forms
// ----------------------------------------------------------------------

impl Visitable for BindingForm {
    fn drive(&self, visitor: &mut dyn VisitorCore) {
        match self {
            Self::Tuple(vars) => perform_visit(visitor, &BindingVars(vars), PathSegment::Empty),
            Self::Relation(vars) => perform_visit(visitor, &BindingVars(vars), 0usize),
            Self::Scalar(_) | Self::Collection(_) => {}
        }
    }

    fn validate_self(&self, ctx: &mut dyn VisitorContext) {
        match self {
            Self::Scalar(var) => {
                if !is_input_var(var) {
                    ctx.issue(format!(
                        "expected a logic, source or rules variable, got `{var}`"
                    ));
                }
            }
            Self::Collection(var) => {
                if !is_logic_var(var) {
                    ctx.issue_at(0usize, format!("expected a logic variable, got `{var}`"));
                }
            }
            Self::Tuple(vars) | Self::Relation(vars) => {
                if vars.is_empty() {
                    ctx.issue("binding must name at least one variable");
                }
            }
        }
    }
}

///
/// BindingVars
///
/// The variable list of a tuple, or the single row of a relation
/// (`[[...]]`, hence one level deeper).
///

struct BindingVars<'a>(&'a [String]);

impl Visitable for BindingVars<'_> {
    fn validate_self(&self, ctx: &mut dyn VisitorContext) {
        for (i, var) in self.0.iter().enumerate() {
            if !is_var_or_blank(var) {
                ctx.issue_at(i, format!("expected a logic variable or `_`, got `{var}`"));
            }
        }
    }
}

// ----------------------------------------------------------------------
// Where clauses
// ----------------------------------------------------------------------

impl Visitable for WhereClause {
    fn drive(&self, visitor: &mut dyn VisitorCore) {
        match self {
            Self::Predicate(call) => perform_visit(visitor, call, 0usize),
            Self::Function(call, binding) => {
                perform_visit(visitor, call, 0usize);
                perform_visit(visitor, binding, 1usize);
            }
            Self::Pattern(_) | Self::Rule(_) => {}
        }
    }

    fn validate_self(&self, ctx: &mut dyn VisitorContext) {
        match self {
            Self::Pattern(items) => validate_pattern(items, ctx),
            Self::Predicate(_) | Self::Function(..) => {}
            Self::Rule(rule) => {
                if rule.name().is_empty() {
                    ctx.issue("rule name must not be empty");
                }
            }
        }
    }
}

// `[name, ...args]`, nested one level inside the clause
impl Visitable for FnCall {
    fn validate_self(&self, ctx: &mut dyn VisitorContext) {
        if self.name.is_empty() {
            ctx.issue_at(0usize, "function name must not be empty");
        }
    }
}

fn validate_pattern(items: &[Value], ctx: &mut dyn VisitorContext) {
    // an explicit data source shifts every position by one
    let offset = usize::from(
        items
            .first()
            .and_then(Value::as_text)
            .is_some_and(is_source_var),
    );
    let positions = &items[offset..];

    if !PATTERN_ARITY.contains(&positions.len()) {
        ctx.issue(format!(
            "pattern must have 2 to 5 positions, got {}",
            positions.len()
        ));
        return;
    }

    let attr_index = offset + 1;
    match &items[attr_index] {
        Value::Text(text) if is_var_or_blank(text) || is_qualified_attr(text) => {}
        Value::Complex(ComplexValue::Keyword(_)) | Value::Int(_) => {}
        Value::Text(text) => ctx.issue_at(attr_index, unqualified(text)),
        _ => ctx.issue_at(
            attr_index,
            "attribute position must be an attribute name or a logic variable",
        ),
    }

    if let Some(tx) = positions.get(3) {
        let valid = match tx {
            Value::Text(text) => is_var_or_blank(text),
            Value::Int(_) => true,
            _ => false,
        };
        if !valid {
            ctx.issue_at(
                offset + 3,
                "transaction position must be a logic variable, `_` or an id",
            );
        }
    }

    if let Some(op) = positions.get(4) {
        let valid = match op {
            Value::Text(text) => is_var_or_blank(text),
            Value::Bool(_) => true,
            _ => false,
        };
        if !valid {
            ctx.issue_at(
                offset + 4,
                "operation position must be a logic variable, `_` or a boolean",
            );
        }
    }
}
