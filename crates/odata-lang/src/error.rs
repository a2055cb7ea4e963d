//! Error types for path and query option parsing.

use std::fmt;

use crate::span::{offset_to_column, Span};
use thiserror::Error;

/// Kinds of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Resource path is not `Name`, `Name(key)` or `Name(key)/relation`.
    MalformedPath,
    /// `$filter` does not match `<path> <op> <value>`.
    InvalidFilterSyntax,
    /// `$orderby` segment is not `<path> [asc|desc]`.
    InvalidOrderBySyntax,
    /// `$select` is not a comma-separated list of field names.
    InvalidSelectSyntax,
    /// A path crosses more than one relationship.
    UnsupportedTraversalDepth,
}

impl ParseErrorKind {
    /// Stable identifier for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::MalformedPath => "MalformedPath",
            ParseErrorKind::InvalidFilterSyntax => "InvalidFilterSyntax",
            ParseErrorKind::InvalidOrderBySyntax => "InvalidOrderBySyntax",
            ParseErrorKind::InvalidSelectSyntax => "InvalidSelectSyntax",
            ParseErrorKind::UnsupportedTraversalDepth => "UnsupportedTraversalDepth",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseErrorKind::MalformedPath => "malformed resource path",
            ParseErrorKind::InvalidFilterSyntax => "invalid $filter",
            ParseErrorKind::InvalidOrderBySyntax => "invalid $orderby",
            ParseErrorKind::InvalidSelectSyntax => "invalid $select",
            ParseErrorKind::UnsupportedTraversalDepth => "unsupported traversal depth",
        };
        f.write_str(text)
    }
}

/// Error raised while parsing a resource path or a query option.
///
/// Carries the offending raw input and the shape that was expected, so a
/// transport can render a diagnostic without access to the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: '{input}' (expected {expected})")]
pub struct ParseError {
    /// Error kind for programmatic handling.
    pub kind: ParseErrorKind,
    /// The raw input that failed to parse.
    pub input: String,
    /// Span of the offending part of `input`.
    pub span: Span,
    /// The accepted shape.
    pub expected: &'static str,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(
        kind: ParseErrorKind,
        input: impl Into<String>,
        span: Span,
        expected: &'static str,
    ) -> Self {
        Self {
            kind,
            input: input.into(),
            span,
            expected,
            hint: None,
        }
    }

    /// Add a hint to the error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Format the error with a caret under the offending input.
    pub fn format_with_source(&self, source: &str) -> String {
        let col = offset_to_column(source, self.span.start);
        let mut result = format!("error[{}]: {}\n", self.kind.code(), self.kind);
        result.push_str(&format!("  --> column {}\n", col));
        result.push_str(&format!("   |\n   | {}\n   | ", source));

        for _ in 1..col {
            result.push(' ');
        }
        result.push('^');

        let width = self
            .span
            .slice(source)
            .map(|s| s.chars().count())
            .unwrap_or(0);
        for _ in 1..width {
            result.push('~');
        }
        result.push('\n');

        result.push_str(&format!("   = expected: {}\n", self.expected));
        if let Some(hint) = &self.hint {
            result.push_str(&format!("   = hint: {}\n", hint));
        }

        result
    }

    /// Render [`format_with_source`](Self::format_with_source) against the
    /// input this error was raised for.
    pub fn diagnostic(&self) -> String {
        self.format_with_source(&self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::new(
            ParseErrorKind::InvalidFilterSyntax,
            "id eq",
            Span::new(5, 5),
            "<path> <op> <value>",
        );
        assert_eq!(
            err.to_string(),
            "invalid $filter: 'id eq' (expected <path> <op> <value>)"
        );
        assert_eq!(err.kind.code(), "InvalidFilterSyntax");
    }

    #[test]
    fn test_error_formatting() {
        let source = "id === 2";
        let err = ParseError::new(
            ParseErrorKind::InvalidFilterSyntax,
            source,
            Span::new(3, 6),
            "<path> <op> <value>",
        )
        .with_hint("use 'eq' for equality comparison");

        let formatted = err.diagnostic();
        assert!(formatted.contains("column 4"));
        assert!(formatted.contains("   |    ^~~\n"));
        assert!(formatted.contains("hint: use 'eq' for equality"));
    }
}
