//! In-memory typed tables.

use std::collections::HashMap;

use tracing::debug;

use super::{Record, Storage};
use crate::catalog::{Cardinality, RelationHop, Schema};
use crate::error::Error;
use odata_proto::Value;

/// Rows of one entity set plus an identity index.
#[derive(Debug, Default)]
struct Table {
    records: Vec<Record>,
    /// Identity value text to row position.
    key_index: HashMap<String, usize>,
}

/// A [`Storage`] implementation holding every table in memory.
///
/// Records are written during setup through `&mut self` and only read
/// afterwards, so a loaded store can be shared behind an `Arc`.
#[derive(Debug)]
pub struct MemoryStore {
    schema: Schema,
    tables: HashMap<String, Table>,
}

impl MemoryStore {
    /// Create an empty store for a schema.
    pub fn new(schema: Schema) -> Self {
        let tables = schema
            .entity_names()
            .into_iter()
            .map(|name| (name.to_string(), Table::default()))
            .collect();
        Self { schema, tables }
    }

    /// Insert a record given as named values.
    ///
    /// Missing nullable fields are stored as null. Values are checked against
    /// the declared field types, and the identity must be present and unique.
    /// Returns the stored identity value.
    pub fn insert<I, K>(&mut self, entity_set: &str, fields: I) -> Result<Value, Error>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let entity = self
            .schema
            .get_entity(entity_set)
            .ok_or_else(|| Error::UnknownEntitySet {
                name: entity_set.to_string(),
            })?;

        let mut values: Vec<Option<Value>> = vec![None; entity.fields.len()];
        for (name, value) in fields {
            let name = name.as_ref();
            let accessor = self
                .schema
                .accessor(entity_set, name)
                .ok_or_else(|| Error::unknown_property(entity_set, name))?;
            values[accessor.index] = Some(accessor.scalar.conform(value)?);
        }

        let mut row = Vec::with_capacity(values.len());
        for (field, value) in entity.fields.iter().zip(values) {
            match value {
                Some(Value::Null) | None if !field.nullable => {
                    return Err(Error::InvalidData(format!(
                        "field '{}.{}' is required",
                        entity_set, field.name
                    )));
                }
                Some(value) => row.push(value),
                None => row.push(Value::Null),
            }
        }

        let key = self
            .schema
            .identity_accessor(entity_set)
            .map(|accessor| accessor.get(&row).clone())
            .unwrap_or(Value::Null);
        if key.is_null() {
            return Err(Error::InvalidData(format!(
                "record of '{}' has no identity value",
                entity_set
            )));
        }

        let table = self.tables.entry(entity_set.to_string()).or_default();
        let key_text = key.to_text();
        if table.key_index.contains_key(&key_text) {
            return Err(Error::InvalidData(format!(
                "duplicate key '{}' in '{}'",
                key_text, entity_set
            )));
        }

        table.key_index.insert(key_text, table.records.len());
        table.records.push(Record::new(row));
        debug!(entity_set, key = %key.to_text(), "inserted record");

        Ok(key)
    }

    /// Number of records in an entity set.
    pub fn len(&self, entity_set: &str) -> usize {
        self.tables
            .get(entity_set)
            .map(|t| t.records.len())
            .unwrap_or(0)
    }

    /// Check if an entity set holds no record.
    pub fn is_empty(&self, entity_set: &str) -> bool {
        self.len(entity_set) == 0
    }

    fn table(&self, entity_set: &str) -> Result<&Table, Error> {
        self.tables
            .get(entity_set)
            .ok_or_else(|| Error::UnknownEntitySet {
                name: entity_set.to_string(),
            })
    }
}

impl Storage for MemoryStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn fetch_by_key(&self, entity_set: &str, key: &Value) -> Result<Option<&Record>, Error> {
        let table = self.table(entity_set)?;
        Ok(table
            .key_index
            .get(&key.to_text())
            .map(|&position| &table.records[position]))
    }

    fn fetch_collection(&self, entity_set: &str) -> Result<Vec<&Record>, Error> {
        Ok(self.table(entity_set)?.records.iter().collect())
    }

    fn traverse_relation(&self, record: &Record, hop: &RelationHop) -> Result<Vec<&Record>, Error> {
        let from = hop.from.get(record.values());
        if from.is_null() {
            return Ok(Vec::new());
        }

        if hop.to_identity {
            return Ok(self.fetch_by_key(hop.target(), from)?.into_iter().collect());
        }

        let table = self.table(hop.target())?;
        let related = table
            .records
            .iter()
            .filter(|related| crate::query::values_equal(hop.to.get(related.values()), from));
        Ok(match hop.cardinality {
            Cardinality::ToOne => related.take(1).collect(),
            Cardinality::ToMany => related.collect(),
        })
    }
}
