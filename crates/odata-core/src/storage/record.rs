//! Record type for stored rows.

use odata_proto::Value;

/// A stored row: field values in the entity set's declared field order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    /// Create a record from positional values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Positional values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record stores no value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
