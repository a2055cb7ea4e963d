//! Schema catalog.
//!
//! The catalog stores entity sets, their typed fields and the relations
//! between them, and derives the field accessor table used by the compiler.

mod entity;
mod field;
mod relation;
mod schema;
mod types;

pub use entity::EntityDef;
pub use field::FieldDef;
pub use relation::{Cardinality, RelationDef};
pub use schema::{FieldAccessor, RelationHop, Schema, SchemaBuilder};
pub use types::{FieldKind, ScalarType};
