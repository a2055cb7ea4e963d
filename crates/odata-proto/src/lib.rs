//! Request and result types shared by the OData query pipeline.
//!
//! # Modules
//!
//! - [`value`] - Runtime value types for literals and record fields
//! - [`query`] - Intermediate representation of a request (target and options)
//! - [`result`] - Typed results handed to the serializer
//! - [`error`] - Literal conversion errors

pub mod error;
pub mod query;
pub mod result;
pub mod value;

pub use error::Error;

// Re-export commonly used types at crate root
pub use query::{
    ComparisonOp, FilterClause, OrderClause, PropertyPath, QueryOptions, ResourceTarget,
    SortDirection, MAX_RELATION_HOPS,
};
pub use result::{EntityRecord, EntitySetInfo, QueryResult};
pub use value::{format_datetime, parse_datetime, Value};
