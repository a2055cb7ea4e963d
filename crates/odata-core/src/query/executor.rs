//! Query executor for resolved requests.
//!
//! Runs a [`ResourceTarget`] and its options against a [`Storage`]
//! implementation and returns a typed [`QueryResult`].

use std::cmp::Ordering;

use tracing::debug;

use crate::catalog::{EntityDef, FieldAccessor, ScalarType};
use crate::error::Error;
use crate::storage::{Record, Storage};
use odata_proto::{EntityRecord, EntitySetInfo, QueryOptions, QueryResult, ResourceTarget, Value};

use super::compare::sort_order;
use super::compiler::{compile, CompiledQuery, SortKey};

/// Query executor that runs requests against storage.
pub struct QueryExecutor<'a, S: Storage + ?Sized> {
    storage: &'a S,
}

impl<'a, S: Storage + ?Sized> QueryExecutor<'a, S> {
    /// Create a new executor over a store.
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Execute a request.
    ///
    /// Options are compiled against the entity set the result will hold
    /// (the relation's target for `Name(key)/relation`) before any record is
    /// read. A single entity only honours `$select`.
    pub fn execute(&self, target: &ResourceTarget, options: Option<&QueryOptions>) -> Result<QueryResult, Error> {
        let schema = self.storage.schema();
        let base = self
            .storage
            .lookup_entity_set(target.entity_set())
            .ok_or_else(|| Error::UnknownEntitySet {
                name: target.entity_set().to_string(),
            })?;

        let hop = match target.relation() {
            Some(name) => Some(
                schema
                    .relation(&base.name, name)
                    .ok_or_else(|| Error::unknown_property(&base.name, name))?,
            ),
            None => None,
        };

        let result_set = match hop {
            Some(hop) => self
                .storage
                .lookup_entity_set(hop.target())
                .ok_or_else(|| Error::UnknownEntitySet {
                    name: hop.target().to_string(),
                })?,
            None => base,
        };

        let empty = QueryOptions::default();
        let compiled = compile(options.unwrap_or(&empty), &result_set.name, schema)?;

        debug!(
            resource = %target,
            entity_set = %result_set.name,
            single = target.is_single_entity(),
            filter = compiled.predicate.is_some(),
            sort_keys = compiled.sort_keys.len(),
            "executing query"
        );

        let records = match target.key() {
            Some(raw_key) => {
                let record = self.fetch_entity(base, raw_key)?;
                match hop {
                    Some(hop) => self.storage.traverse_relation(record, hop)?,
                    None => {
                        let record = to_entity_record(result_set, record, compiled.select.as_deref());
                        return Ok(QueryResult::SingleEntity {
                            entity_set: entity_set_info(result_set),
                            record,
                        });
                    }
                }
            }
            None => self.storage.fetch_collection(&base.name)?,
        };

        let records = self.apply(records, &compiled)?;
        debug!(entity_set = %result_set.name, count = records.len(), "query complete");

        Ok(QueryResult::EntityCollection {
            entity_set: entity_set_info(result_set),
            records: records
                .into_iter()
                .map(|record| to_entity_record(result_set, record, compiled.select.as_deref()))
                .collect(),
        })
    }

    /// Fetch a single entity by its key text.
    fn fetch_entity(&self, entity: &EntityDef, raw_key: &str) -> Result<&'a Record, Error> {
        let not_found = || Error::EntityNotFound {
            entity_set: entity.name.clone(),
            key: raw_key.to_string(),
        };

        let identity = self
            .storage
            .schema()
            .identity_accessor(&entity.name)
            .ok_or_else(not_found)?;
        let key = coerce_key(raw_key, identity).ok_or_else(not_found)?;

        self.storage
            .fetch_by_key(&entity.name, &key)?
            .ok_or_else(not_found)
    }

    /// Filter then sort a collection.
    fn apply(&self, records: Vec<&'a Record>, compiled: &CompiledQuery) -> Result<Vec<&'a Record>, Error> {
        let mut records = match &compiled.predicate {
            Some(predicate) => {
                let mut kept = Vec::with_capacity(records.len());
                for record in records {
                    if predicate.evaluate(record, self.storage)? {
                        kept.push(record);
                    }
                }
                kept
            }
            None => records,
        };

        self.sort_records(&mut records, &compiled.sort_keys)?;
        Ok(records)
    }

    /// Stable multi-key sort. A key over a relation reads the first related
    /// record; no related record sorts as null.
    fn sort_records(&self, records: &mut Vec<&'a Record>, sort_keys: &[SortKey]) -> Result<(), Error> {
        if sort_keys.is_empty() {
            return Ok(());
        }

        let mut decorated = Vec::with_capacity(records.len());
        for record in records.drain(..) {
            let mut values = Vec::with_capacity(sort_keys.len());
            for key in sort_keys {
                let first = key.field.read(record, self.storage)?.into_iter().next();
                values.push(first.cloned().unwrap_or(Value::Null));
            }
            decorated.push((values, record));
        }

        decorated.sort_by(|(a, _), (b, _)| {
            for (key, (av, bv)) in sort_keys.iter().zip(a.iter().zip(b.iter())) {
                let cmp = key.direction.apply(sort_order(av, bv));
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            Ordering::Equal
        });

        records.extend(decorated.into_iter().map(|(_, record)| record));
        Ok(())
    }
}

/// Coerce key text against the identity field's type.
///
/// Quoted keys (`'x'`) lose their quotes; numeric and datetime keys must
/// parse.
fn coerce_key(raw: &str, identity: &FieldAccessor) -> Option<Value> {
    let unquoted = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .map(|s| s.replace("''", "'"));

    match identity.scalar {
        ScalarType::String => Some(Value::String(unquoted.unwrap_or_else(|| raw.to_string()))),
        ScalarType::Int => raw.parse::<i64>().ok().map(Value::Int64),
        scalar => scalar.parse_literal(unquoted.as_deref().unwrap_or(raw)),
    }
}

fn entity_set_info(entity: &EntityDef) -> EntitySetInfo {
    EntitySetInfo::new(&entity.name, &entity.identity_field)
}

/// Convert a stored record to named values, keeping selected fields only.
fn to_entity_record(entity: &EntityDef, record: &Record, select: Option<&[String]>) -> EntityRecord {
    let mut key = Value::Null;
    let mut fields = Vec::with_capacity(entity.fields.len());

    for (field, value) in entity.fields.iter().zip(record.values()) {
        if entity.is_identity(&field.name) {
            key = value.clone();
        }
        fields.push((field.name.clone(), value.clone()));
    }

    let mut converted = EntityRecord::new(key, fields);
    if let Some(names) = select {
        converted.project(names);
    }
    converted
}
