//! Name normalization
//!
//! Both the builder and the query engine run names through [`normalize`] so
//! that keys and query text live in the same space:
//!
//! 1. drop a trailing parameter list (`parse(const char*)` -> `parse`)
//! 2. keep the last `::` segment (`nlohmann::json_pointer::pop_back` -> `pop_back`)
//! 3. drop template arguments (`parser<BasicJsonType>` -> `parser`), except
//!    for operators where `<` belongs to the name
//! 4. remove whitespace and fold to lower case
//!
//! Underscores are kept and camel-case boundaries are not split, so
//! `pop_back` and `popBack` produce different keys.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

const OPERATOR: &str = "operator";
const CALL_OPERATOR: &str = "operator()";

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalized, case-folded symbol name used as the index key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexKey(String);

impl IndexKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for IndexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IndexKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Bare name as shown to users: scope, parameters and template arguments
/// removed, original case kept.
pub fn display_name(raw: &str) -> String {
    let without_params = strip_parameters(raw.trim());
    let segment = last_segment(without_params);
    let bare = if is_operator(segment) {
        segment
    } else {
        match segment.find('<') {
            Some(pos) => &segment[..pos],
            None => segment,
        }
    };
    bare.trim().to_string()
}

/// Normalize a raw name into an index key.
///
/// Returns `None` when nothing identifier-like survives.
pub fn normalize(raw: &str) -> Option<IndexKey> {
    let display = display_name(raw);
    let folded = WHITESPACE.replace_all(&display, "").to_lowercase();
    if folded.chars().any(|c| c.is_alphanumeric() || c == '_') {
        Some(IndexKey(folded))
    } else {
        None
    }
}

/// `operator<`, `operator()` etc., but not identifiers like `operator_traits`
fn is_operator(segment: &str) -> bool {
    segment
        .strip_prefix(OPERATOR)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !(c.is_alphanumeric() || c == '_'))
}

fn strip_parameters(name: &str) -> &str {
    // `operator()` carries a parenthesis pair that is part of its name
    let search_from = name
        .find(CALL_OPERATOR)
        .map(|pos| pos + CALL_OPERATOR.len())
        .unwrap_or(0);
    match name[search_from..].find('(') {
        Some(pos) => &name[..search_from + pos],
        None => name,
    }
}

/// Split a qualified name on `::`, ignoring separators nested inside
/// template arguments. An operator segment always ends the name.
fn split_qualified(name: &str) -> Vec<&str> {
    let bytes = name.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if depth == 0 && i == start && is_operator(&name[i..]) {
            break;
        }
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&name[start..i]);
                start = i + 2;
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&name[start..]);
    segments
}

fn last_segment(name: &str) -> &str {
    split_qualified(name).pop().unwrap_or(name)
}

/// Enclosing scopes spelled out in a qualified raw name, outermost first
pub fn qualifier(raw: &str) -> Vec<String> {
    let mut segments = split_qualified(strip_parameters(raw.trim()));
    segments.pop();
    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Template argument list of the bare name, e.g. `< BasicJsonType >`.
///
/// Operators keep `<` as part of their name and never report arguments.
pub fn template_arguments(raw: &str) -> Option<String> {
    let segment = last_segment(strip_parameters(raw.trim())).trim();
    if is_operator(segment) {
        return None;
    }
    let args = &segment[segment.find('<')?..];
    Some(args.to_string())
}

/// Parameter list carried by a raw name, e.g. `(const char* s)`
pub fn parameter_list(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let head = strip_parameters(trimmed);
    let params = trimmed[head.len()..].trim();
    if params.is_empty() {
        None
    } else {
        Some(params.to_string())
    }
}
