//! Field definitions for entity sets.

use super::types::ScalarType;

/// A field definition within an entity set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Declared scalar type.
    pub scalar: ScalarType,
    /// Whether the field accepts null.
    pub nullable: bool,
}

impl FieldDef {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar,
            nullable: false,
        }
    }

    /// Create a nullable field.
    pub fn optional(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar,
            nullable: true,
        }
    }
}
