//! Result types for query responses.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Identity of the entity set a result was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySetInfo {
    /// Entity set name.
    pub name: String,
    /// Name of the identity (key) field.
    pub key_field: String,
}

impl EntitySetInfo {
    /// Create entity set info.
    pub fn new(name: impl Into<String>, key_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_field: key_field.into(),
        }
    }
}

/// A single record with its key and named field values in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Identity value.
    pub key: Value,
    /// Field values, key field included.
    pub fields: Vec<(String, Value)>,
}

impl EntityRecord {
    /// Create a record.
    pub fn new(key: Value, fields: Vec<(String, Value)>) -> Self {
        Self { key, fields }
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Keep only the named fields, preserving record order.
    pub fn project(&mut self, names: &[String]) {
        self.fields.retain(|(field, _)| names.iter().any(|n| n == field));
    }
}

/// The typed outcome of executing a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryResult {
    /// A single entity addressed by key.
    SingleEntity {
        entity_set: EntitySetInfo,
        record: EntityRecord,
    },
    /// An ordered collection of entities.
    EntityCollection {
        entity_set: EntitySetInfo,
        records: Vec<EntityRecord>,
    },
}

impl QueryResult {
    /// Entity set the records belong to.
    pub fn entity_set(&self) -> &EntitySetInfo {
        match self {
            QueryResult::SingleEntity { entity_set, .. } => entity_set,
            QueryResult::EntityCollection { entity_set, .. } => entity_set,
        }
    }

    /// Records in result order.
    pub fn records(&self) -> &[EntityRecord] {
        match self {
            QueryResult::SingleEntity { record, .. } => std::slice::from_ref(record),
            QueryResult::EntityCollection { records, .. } => records,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Check if the result holds no record.
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Whether this is a single-entity result.
    pub fn is_single(&self) -> bool {
        matches!(self, QueryResult::SingleEntity { .. })
    }
}
