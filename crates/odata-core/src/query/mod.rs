//! Query engine.
//!
//! Compiles parsed query options against the schema and executes resolved
//! requests against a [`Storage`](crate::storage::Storage) implementation.

mod compare;
mod compiler;
mod executor;
mod predicate;

pub use compare::{apply_op, compare_values, sort_order, values_equal};
pub use compiler::{compile, compile_filter, compile_order_by, compile_select, CompiledQuery, SortKey};
pub use executor::QueryExecutor;
pub use predicate::{FieldRef, Operand, Predicate};
