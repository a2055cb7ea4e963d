//! `$filter` parsing: a single `<path> <op> <value>` clause.

use odata_proto::{ComparisonOp, FilterClause, PropertyPath, MAX_RELATION_HOPS};

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{tokenize, SpannedToken, Token};
use crate::span::Span;

const EXPECTED: &str = "<path> <op> <value>";

/// Parse a `$filter` value into a [`FilterClause`].
///
/// The value is kept as text: quotes are stripped from string literals and
/// everything else is passed through as written.
pub fn parse_filter(raw: &str) -> Result<FilterClause, ParseError> {
    let invalid = |span: Span| ParseError::new(ParseErrorKind::InvalidFilterSyntax, raw, span, EXPECTED);

    let tokens = tokenize(raw).map_err(invalid)?;

    if let Some(logical) = tokens
        .iter()
        .find(|t| matches!(t.token, Token::And | Token::Or | Token::Not))
    {
        return Err(invalid(logical.span)
            .with_hint("only a single comparison is supported; and/or/not cannot be combined"));
    }

    let [path, op, value] = tokens.as_slice() else {
        return Err(invalid(unexpected_span(raw, &tokens)));
    };

    let Token::Path(path_text) = &path.token else {
        return Err(invalid(path.span).with_hint("a filter starts with a property name"));
    };

    let Some(op_value) = op.span.slice(raw).and_then(ComparisonOp::from_keyword) else {
        return Err(invalid(op.span).with_hint("operators are eq, ne, gt, lt, ge and le"));
    };

    let (value_text, quoted) = match &value.token {
        Token::Quoted(s) => (s.clone(), true),
        Token::Number(s) | Token::DateTime(s) | Token::TypedDateTime(s) | Token::Path(s) => {
            (s.clone(), false)
        }
        _ => {
            return Err(invalid(value.span)
                .with_hint("values are numbers, dates, 'quoted strings' or bare names"))
        }
    };

    let property = PropertyPath::split(path_text);
    if property.hops() > MAX_RELATION_HOPS {
        return Err(ParseError::new(
            ParseErrorKind::UnsupportedTraversalDepth,
            raw,
            path.span,
            "<field> or <relation>/<field>",
        ));
    }

    Ok(FilterClause {
        path: property,
        op: op_value,
        value: value_text,
        quoted,
    })
}

/// Span of the trailing tokens past the three-part pattern, or the end of
/// input when the clause is too short.
fn unexpected_span(raw: &str, tokens: &[SpannedToken]) -> Span {
    match (tokens.get(3), tokens.last()) {
        (Some(extra), Some(last)) => extra.span.merge(last.span),
        _ => Span::new(raw.len(), raw.len()),
    }
}
