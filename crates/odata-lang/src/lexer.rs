//! Lexer for `$filter` expressions using logos.

use crate::span::Span;
use logos::Logos;

/// Token types for a filter expression.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // Comparison operators
    #[token("eq")]
    Eq,
    #[token("ne")]
    Ne,
    #[token("gt")]
    Gt,
    #[token("lt")]
    Lt,
    #[token("ge")]
    Ge,
    #[token("le")]
    Le,

    // Logical operators (recognised only to be rejected)
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    // Property path or bare token: `name`, `rel/name`, `rel.name`
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*([./][A-Za-z_][A-Za-z0-9_]*)*", |lex| lex.slice().to_string())]
    Path(String),

    // Signed integer or decimal, kept as written
    #[regex(r"-?[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),

    // ISO date or datetime, kept as written
    #[regex(
        r"[0-9]{4}-[0-9]{2}-[0-9]{2}(T[0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]+)?)?)?Z?",
        |lex| lex.slice().to_string()
    )]
    DateTime(String),

    // Typed datetime literal: datetime'2017-03-14T09:05:00'
    #[regex(r"datetime'[^']*'", |lex| {
        let s = lex.slice();
        s["datetime'".len()..s.len() - 1].to_string()
    })]
    TypedDateTime(String),

    // String literal (single-quoted, '' escapes a quote)
    #[regex(r"'([^']|'')*'", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].replace("''", "'")
    })]
    Quoted(String),
}

impl Token {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Eq | Token::Ne | Token::Gt | Token::Lt | Token::Ge | Token::Le => {
                "operator".to_string()
            }
            Token::And | Token::Or | Token::Not => "logical operator".to_string(),
            Token::Path(p) => format!("'{}'", p),
            Token::Number(n) => format!("number {}", n),
            Token::DateTime(d) | Token::TypedDateTime(d) => format!("datetime {}", d),
            Token::Quoted(s) => format!("string '{}'", s),
        }
    }
}

/// A token with its span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenize a filter expression.
///
/// Stops at the first character that starts no token and returns its span
/// as the error.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, Span> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span: Span = lexer.span().into();
        match result {
            Ok(token) => tokens.push(SpannedToken { token, span }),
            Err(()) => return Err(span),
        }
    }

    Ok(tokens)
}
