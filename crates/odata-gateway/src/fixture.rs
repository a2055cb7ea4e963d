//! JSON fixtures: a schema plus the records to load into a [`MemoryStore`].
//!
//! ```json
//! {
//!   "entities": [
//!     {"name": "Author", "key": "id", "fields": [
//!       {"name": "id", "type": "int"},
//!       {"name": "name", "type": "string"}
//!     ]}
//!   ],
//!   "relations": [
//!     {"name": "posts", "from": "Author", "from_field": "id",
//!      "to": "Post", "to_field": "author_id", "kind": "to_many",
//!      "inverse": "author"}
//!   ],
//!   "records": {"Author": [{"id": 1, "name": "Newton"}]}
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use odata_core::{EntityDef, FieldDef, MemoryStore, RelationDef, ScalarType, Schema};
use odata_proto::Value;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info};

use crate::error::GatewayError;

/// A fixture document.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    /// Entity sets.
    #[serde(default)]
    pub entities: Vec<EntityFixture>,
    /// Relations between entity sets.
    #[serde(default)]
    pub relations: Vec<RelationFixture>,
    /// Records per entity set, in insertion order.
    #[serde(default)]
    pub records: BTreeMap<String, Vec<Map<String, JsonValue>>>,
}

/// An entity set declaration.
#[derive(Debug, Deserialize)]
pub struct EntityFixture {
    pub name: String,
    /// Identity field.
    pub key: String,
    pub fields: Vec<FieldFixture>,
}

/// A field declaration.
#[derive(Debug, Deserialize)]
pub struct FieldFixture {
    pub name: String,
    /// Scalar type name (`int`, `float`, `bool`, `string`, `datetime`).
    #[serde(rename = "type")]
    pub scalar: String,
    #[serde(default)]
    pub nullable: bool,
}

/// Relation cardinality as written in fixtures.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    ToOne,
    ToMany,
}

/// A relation declaration.
#[derive(Debug, Deserialize)]
pub struct RelationFixture {
    pub name: String,
    pub from: String,
    pub from_field: String,
    pub to: String,
    pub to_field: String,
    pub kind: RelationKind,
    /// Name of the reverse navigation property, if any.
    #[serde(default)]
    pub inverse: Option<String>,
}

impl Fixture {
    /// Parse a fixture document.
    pub fn from_json(text: &str) -> Result<Self, GatewayError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a fixture file.
    pub fn from_path(path: &Path) -> Result<Self, GatewayError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build the schema the fixture declares.
    pub fn schema(&self) -> Result<Schema, GatewayError> {
        let mut builder = Schema::builder();

        for entity in &self.entities {
            let mut fields = Vec::with_capacity(entity.fields.len());
            for field in &entity.fields {
                let scalar = ScalarType::from_name(&field.scalar).ok_or_else(|| {
                    GatewayError::Fixture(format!(
                        "unknown type '{}' for field '{}.{}'",
                        field.scalar, entity.name, field.name
                    ))
                })?;
                fields.push(if field.nullable {
                    FieldDef::optional(&field.name, scalar)
                } else {
                    FieldDef::new(&field.name, scalar)
                });
            }
            builder = builder.with_entity(EntityDef::new(&entity.name, &entity.key).with_fields(fields));
        }

        for relation in &self.relations {
            let def = match relation.kind {
                RelationKind::ToOne => RelationDef::to_one(
                    &relation.name,
                    &relation.from,
                    &relation.from_field,
                    &relation.to,
                    &relation.to_field,
                ),
                RelationKind::ToMany => RelationDef::to_many(
                    &relation.name,
                    &relation.from,
                    &relation.from_field,
                    &relation.to,
                    &relation.to_field,
                ),
            };
            builder = match &relation.inverse {
                Some(inverse) => builder.with_relation_pair(def, inverse),
                None => builder.with_relation(def),
            };
        }

        Ok(builder.build()?)
    }

    /// Build a store holding every fixture record.
    pub fn into_store(self) -> Result<MemoryStore, GatewayError> {
        let mut store = MemoryStore::new(self.schema()?);

        for (entity_set, rows) in self.records {
            for row in rows {
                let fields = row
                    .into_iter()
                    .map(|(name, value)| Ok((name, json_to_value(value)?)))
                    .collect::<Result<Vec<_>, GatewayError>>()?;
                store.insert(&entity_set, fields)?;
            }
            debug!(entity_set = %entity_set, count = store.len(&entity_set), "loaded records");
        }

        Ok(store)
    }
}

/// Load a fixture file into a store.
pub fn load(path: &Path) -> Result<MemoryStore, GatewayError> {
    let store = Fixture::from_path(path)?.into_store()?;
    info!(fixture = %path.display(), "fixture loaded");
    Ok(store)
}

/// Convert a scalar JSON value. Datetime fields take strings, which the
/// store converts against the field type.
fn json_to_value(value: JsonValue) -> Result<Value, GatewayError> {
    match value {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Int64(i)),
            None => n
                .as_f64()
                .map(Value::Float64)
                .ok_or_else(|| GatewayError::Fixture(format!("number out of range: {}", n))),
        },
        JsonValue::String(s) => Ok(Value::String(s)),
        other => Err(GatewayError::Fixture(format!(
            "expected a scalar value, got {}",
            other
        ))),
    }
}
