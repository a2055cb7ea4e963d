//! `$select` parsing.

use crate::error::{ParseError, ParseErrorKind};
use crate::path::is_identifier;
use crate::span::Span;

const EXPECTED: &str = "* or <field>(,<field>)*";

/// Parse a `$select` value.
///
/// Returns `None` for `*` (every field). Duplicate names are dropped.
pub fn parse_select(raw: &str) -> Result<Option<Vec<String>>, ParseError> {
    if raw.trim() == "*" {
        return Ok(None);
    }

    let mut fields: Vec<String> = Vec::new();
    let mut offset = 0;

    for item in raw.split(',') {
        let span = Span::new(offset, offset + item.len());
        offset += item.len() + 1;

        let name = item.trim();
        if !is_identifier(name) {
            let err = ParseError::new(ParseErrorKind::InvalidSelectSyntax, raw, span, EXPECTED);
            return Err(if name.contains(['/', '.']) {
                err.with_hint("only fields of the addressed entity set can be selected")
            } else {
                err
            });
        }

        if !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }

    Ok(Some(fields))
}
