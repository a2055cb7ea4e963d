//! `$orderby` parsing: `<path> [asc|desc](,<path> [asc|desc])*`.

use odata_proto::{OrderClause, PropertyPath, SortDirection, MAX_RELATION_HOPS};

use crate::error::{ParseError, ParseErrorKind};
use crate::path::is_identifier;
use crate::span::Span;

const EXPECTED: &str = "<path> [asc|desc](,<path> [asc|desc])*";

/// Parse an `$orderby` value into sort clauses ranked by position.
pub fn parse_order_by(raw: &str) -> Result<Vec<OrderClause>, ParseError> {
    let invalid = |span: Span| ParseError::new(ParseErrorKind::InvalidOrderBySyntax, raw, span, EXPECTED);

    let mut clauses = Vec::new();
    let mut offset = 0;

    for (rank, segment) in raw.split(',').enumerate() {
        let segment_span = Span::new(offset, offset + segment.len());
        offset += segment.len() + 1;

        let mut words = segment.split_whitespace();
        let Some(path_text) = words.next() else {
            return Err(invalid(segment_span).with_hint("remove the empty sort key"));
        };
        let path_span = word_span(segment, path_text).offset(segment_span.start);

        if !is_property_path(path_text) {
            return Err(invalid(path_span));
        }

        let direction = match words.next() {
            None => SortDirection::Asc,
            Some(word) => SortDirection::from_keyword(word).ok_or_else(|| {
                invalid(word_span(segment, word).offset(segment_span.start))
                    .with_hint("direction must be 'asc' or 'desc'")
            })?,
        };

        if let Some(extra) = words.next() {
            return Err(invalid(word_span(segment, extra).offset(segment_span.start))
                .with_hint("separate sort keys with ','"));
        }

        let path = PropertyPath::split(path_text);
        if path.hops() > MAX_RELATION_HOPS {
            return Err(ParseError::new(
                ParseErrorKind::UnsupportedTraversalDepth,
                raw,
                path_span,
                "<field> or <relation>/<field>",
            ));
        }

        clauses.push(OrderClause {
            path,
            direction,
            rank,
        });
    }

    Ok(clauses)
}

/// Identifiers separated by `/` or `.`.
fn is_property_path(text: &str) -> bool {
    text.split(['/', '.']).all(is_identifier)
}

/// Span of `word`, a subslice of `segment`, relative to `segment`.
fn word_span(segment: &str, word: &str) -> Span {
    let start = word.as_ptr() as usize - segment.as_ptr() as usize;
    Span::new(start, start + word.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_direction() {
        let plain = parse_order_by("name").unwrap();
        let asc = parse_order_by("name asc").unwrap();
        assert_eq!(plain, asc);
        assert_eq!(plain, vec![OrderClause::asc(PropertyPath::field("name"), 0)]);
    }

    #[test]
    fn test_multiple_keys() {
        let clauses = parse_order_by("name asc,id desc").unwrap();
        assert_eq!(
            clauses,
            vec![
                OrderClause::asc(PropertyPath::field("name"), 0),
                OrderClause::desc(PropertyPath::field("id"), 1),
            ]
        );
    }

    #[test]
    fn test_relation_key() {
        let clauses = parse_order_by("rel/name desc").unwrap();
        assert_eq!(clauses[0].path.segments(), ["rel", "name"]);
        assert_eq!(clauses[0].direction, SortDirection::Desc);
    }

    #[test]
    fn test_whitespace_tolerated() {
        let clauses = parse_order_by(" name  desc , id ").unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[1].rank, 1);
    }

    #[test]
    fn test_invalid_segments() {
        for raw in ["", "name,", ",name", "name up", "name asc id", "na-me", "name ASC"] {
            let err = parse_order_by(raw).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::InvalidOrderBySyntax, "input: {raw:?}");
        }
    }

    #[test]
    fn test_error_span_points_at_direction() {
        let err = parse_order_by("name asc,id down").unwrap_err();
        assert_eq!(err.span, Span::new(12, 16));
    }

    #[test]
    fn test_deep_path_rejected() {
        let err = parse_order_by("a/b/c").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnsupportedTraversalDepth);
    }
}
