//! OData Core - schema catalog, storage capability, query compilation and
//! execution.

pub mod catalog;
pub mod error;
pub mod query;
pub mod storage;

pub use catalog::{
    Cardinality, EntityDef, FieldAccessor, FieldDef, FieldKind, RelationDef, RelationHop,
    ScalarType, Schema, SchemaBuilder,
};
pub use error::Error;
pub use query::{CompiledQuery, FieldRef, Operand, Predicate, QueryExecutor, SortKey};
pub use storage::{MemoryStore, Record, Storage};

/// Re-export protocol types.
pub use odata_proto as proto;
