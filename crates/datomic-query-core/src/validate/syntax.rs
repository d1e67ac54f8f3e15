//! Lexical checks on the string forms used inside query documents.

const BLANK: &str = "_";

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '*' | '+' | '!' | '.')
}

/// `?name`
pub fn is_logic_var(text: &str) -> bool {
    text.strip_prefix('?')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(is_symbol_char))
}

/// `$` or `$name`
pub fn is_source_var(text: &str) -> bool {
    text.strip_prefix('$')
        .is_some_and(|rest| rest.chars().all(is_symbol_char))
}

/// `%`
pub fn is_rules_var(text: &str) -> bool {
    text == "%"
}

pub fn is_blank(text: &str) -> bool {
    text == BLANK
}

pub fn is_var_or_blank(text: &str) -> bool {
    is_logic_var(text) || is_blank(text)
}

/// Variables allowed as a scalar `in` binding.
pub fn is_input_var(text: &str) -> bool {
    is_logic_var(text) || is_source_var(text) || is_rules_var(text)
}

/// `ns/name`, optionally written with a leading `:`.
pub fn is_qualified_attr(text: &str) -> bool {
    let text = text.strip_prefix(':').unwrap_or(text);

    match text.split_once('/') {
        Some((ns, name)) => {
            !ns.is_empty() && !name.is_empty() && !name.contains('/') && !text.contains(' ')
        }
        None => false,
    }
}

/// Aggregate find terms such as `(count ?e)`.
pub fn is_aggregate(text: &str) -> bool {
    text.starts_with('(') && text.ends_with(')') && text.len() > 2
}
