//! Storage capability consumed by the executor.
//!
//! The executor only reads through the [`Storage`] trait. [`MemoryStore`] is
//! the in-process implementation over typed tables.

mod memory;
mod record;

pub use memory::MemoryStore;
pub use record::Record;

use crate::catalog::{Cardinality, EntityDef, FieldKind, RelationHop, Schema};
use crate::error::Error;
use crate::query::values_equal;
use odata_proto::{PropertyPath, Value};

/// Read access to typed tables.
///
/// Implementations must not mutate state through `&self`; the executor may
/// share one store between concurrent requests.
pub trait Storage {
    /// The schema the tables conform to.
    fn schema(&self) -> &Schema;

    /// Fetch the record of `entity_set` whose identity equals `key`.
    fn fetch_by_key(&self, entity_set: &str, key: &Value) -> Result<Option<&Record>, Error>;

    /// Fetch every record of `entity_set` in insertion order.
    fn fetch_collection(&self, entity_set: &str) -> Result<Vec<&Record>, Error>;

    /// Look up an entity set definition.
    fn lookup_entity_set(&self, name: &str) -> Option<&EntityDef> {
        self.schema().get_entity(name)
    }

    /// Records related to `record` through `hop`, in target insertion order.
    /// A to-one hop yields at most the first match.
    ///
    /// The default scans the target table; stores with an index on the
    /// target field should override it.
    fn traverse_relation(&self, record: &Record, hop: &RelationHop) -> Result<Vec<&Record>, Error> {
        let from = hop.from.get(record.values());
        if from.is_null() {
            return Ok(Vec::new());
        }

        let related = self
            .fetch_collection(hop.target())?
            .into_iter()
            .filter(|related| values_equal(hop.to.get(related.values()), from));
        Ok(match hop.cardinality {
            Cardinality::ToOne => related.take(1).collect(),
            Cardinality::ToMany => related.collect(),
        })
    }

    /// Comparison family of the field a property path ends at.
    fn field_type(&self, entity_set: &str, path: &PropertyPath) -> Option<FieldKind> {
        self.schema().field_kind(entity_set, path.segments())
    }
}
