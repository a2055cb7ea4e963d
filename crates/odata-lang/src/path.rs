//! Resource path resolution: `Name`, `Name(key)`, `Name(key)/relation`.

use std::sync::LazyLock;

use odata_proto::{ResourceTarget, MAX_RELATION_HOPS};
use regex::Regex;

use crate::error::{ParseError, ParseErrorKind};
use crate::span::Span;

const EXPECTED: &str = "Name, Name(key) or Name(key)/relation";

// A key is any run of quoted strings (`''` escapes a quote) and bare
// characters other than parentheses and quotes.
static RESOURCE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<set>[A-Za-z_][A-Za-z0-9_]*)(?:\((?P<key>(?:'(?:[^']|'')*'|[^()'])*)\)(?P<rest>(?:/[^/]*)*))?$",
    )
    .unwrap()
});

/// Resolve a resource path into a [`ResourceTarget`].
///
/// Outer whitespace and a single leading `/` are ignored. The key is kept as
/// written (quotes included) and coerced later against the identity field.
pub fn resolve(path: &str) -> Result<ResourceTarget, ParseError> {
    let trimmed = path.trim();
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let offset = path.len() - path.trim_start().len() + (path.trim().len() - trimmed.len());

    let malformed = |span: Span| ParseError::new(ParseErrorKind::MalformedPath, path, span, EXPECTED);

    let caps = RESOURCE_PATH_RE
        .captures(trimmed)
        .ok_or_else(|| {
            let err = malformed(Span::full(path));
            if trimmed.contains('/') && !trimmed.contains('(') {
                err.with_hint("navigate from a single entity, e.g. Author(1)/posts")
            } else {
                err
            }
        })?;

    let entity_set = &caps["set"];
    let Some(key) = caps.name("key") else {
        return Ok(ResourceTarget::collection(entity_set));
    };

    let key_text = key.as_str().trim();
    if key_text.is_empty() {
        return Err(malformed(Span::from(key.range()).offset(offset))
            .with_hint("the key between parentheses must not be empty"));
    }

    let rest = caps.name("rest").map(|m| (m.as_str(), m.range()));
    let segments: Vec<&str> = match rest {
        Some((text, _)) if !text.is_empty() => text[1..].split('/').collect(),
        _ => Vec::new(),
    };

    let rest_span = rest
        .as_ref()
        .map_or_else(|| Span::full(path), |(_, range)| Span::from(range.clone()).offset(offset));

    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(malformed(rest_span).with_hint("navigation segments must not be empty"));
    }

    match segments.as_slice() {
        [] => Ok(ResourceTarget::entity(entity_set, key_text)),
        [relation] if is_relation_name(relation) => {
            Ok(ResourceTarget::related(entity_set, key_text, *relation))
        }
        [_] => Err(malformed(rest_span).with_hint("relation names start with a lowercase letter")),
        _ => Err(ParseError::new(
            ParseErrorKind::UnsupportedTraversalDepth,
            path,
            rest_span,
            EXPECTED,
        )
        .with_hint(format!(
            "at most {} relation may follow the key",
            MAX_RELATION_HOPS
        ))),
    }
}

/// Check for `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Navigation properties start with a lowercase letter or `_`.
fn is_relation_name(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_lowercase() || c == '_') && is_identifier(text)
}
