//! Entity set definitions.

use super::field::FieldDef;
use super::types::ScalarType;

/// An entity set definition (table schema).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDef {
    /// Entity set name (unique within schema).
    pub name: String,
    /// Name of the identity (key) field.
    pub identity_field: String,
    /// Field definitions, in storage and serialization order.
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Create a new entity set definition.
    pub fn new(name: impl Into<String>, identity_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity_field: identity_field.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the entity set.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a required field of the given type.
    pub fn field(self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.with_field(FieldDef::new(name, scalar))
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the identity field definition.
    pub fn get_identity_field(&self) -> Option<&FieldDef> {
        self.get_field(&self.identity_field)
    }

    /// Check if a field name is the identity field.
    pub fn is_identity(&self, name: &str) -> bool {
        self.identity_field == name
    }
}
