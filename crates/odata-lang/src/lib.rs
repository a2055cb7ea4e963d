//! OData resource path and query option parsing.
//!
//! This crate turns the textual parts of a request into the intermediate
//! representation defined in `odata-proto`. Nothing here knows about the
//! schema: field names and value types are checked later by the compiler.
//!
//! # Syntax
//!
//! ```text
//! Tag
//! Author(1)
//! Author(1)/posts
//!
//! $filter=name eq 'tag1'
//! $filter=rel/name ge Subobject2
//! $orderby=name asc,id desc
//! $select=name,id
//! ```
//!
//! # Usage
//!
//! ```rust
//! use odata_lang::{parse_query_options, resolve};
//!
//! let target = resolve("Author(1)/posts").unwrap();
//! let options = parse_query_options("$filter=title%20eq%20't1'&$orderby=title").unwrap();
//! assert_eq!(target.relation(), Some("posts"));
//! assert!(options.filter.is_some());
//! ```

pub mod error;
pub mod filter;
pub mod lexer;
pub mod options;
pub mod order_by;
pub mod path;
pub mod select;
pub mod span;

pub use error::{ParseError, ParseErrorKind};
pub use filter::parse_filter;
pub use options::{parse_options, parse_query_options};
pub use order_by::parse_order_by;
pub use path::resolve;
pub use select::parse_select;
pub use span::Span;

#[cfg(test)]
mod tests {
    use super::*;
    use odata_proto::ComparisonOp;

    #[test]
    fn test_full_request() {
        let target = resolve("Main").unwrap();
        let options = parse_options(Some("rel/name ge Subobject2"), Some("rel/name desc"), None).unwrap();

        assert_eq!(target.entity_set(), "Main");
        let filter = options.filter.unwrap();
        assert_eq!(filter.op, ComparisonOp::Ge);
        assert!(filter.path.is_traversal());
        assert_eq!(options.order_by.len(), 1);
    }

    #[test]
    fn test_error_with_source_context() {
        let source = "id === 2";
        let err = parse_filter(source).unwrap_err();
        let formatted = err.format_with_source(source);
        assert!(formatted.contains("column 4"));
        assert!(formatted.contains("InvalidFilterSyntax"));
    }
}
