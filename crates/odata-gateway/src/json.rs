//! OData JSON envelopes for query results.
//!
//! Two wire shapes are supported:
//!
//! - legacy (`{"d": {"results": [...]}}`), where every entity carries a
//!   `__metadata` object with its URI and type;
//! - v4 (`{"@odata.context": ..., "value": [...]}`), where the context URL
//!   names the entity set and any `$select` projection.

use clap::ValueEnum;
use odata_proto::{format_datetime, EntityRecord, EntitySetInfo, QueryResult, Value};
use serde_json::{json, Map, Value as JsonValue};

/// Response envelope shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Shape {
    /// `{"d": ...}` with per-entity `__metadata`.
    #[default]
    Legacy,
    /// `{"@odata.context": ..., "value": ...}`.
    V4,
}

/// Request details the envelopes need besides the result itself.
#[derive(Debug, Clone, Copy)]
pub struct SerializeContext<'a> {
    /// Service root, ending with `/`.
    pub service_root: &'a str,
    /// Fields named by `$select`.
    pub select: Option<&'a [String]>,
    /// Pretty-print the output.
    pub pretty: bool,
}

impl<'a> SerializeContext<'a> {
    /// Create a context with no projection.
    pub fn new(service_root: &'a str) -> Self {
        Self {
            service_root,
            select: None,
            pretty: false,
        }
    }

    /// Set the `$select` projection.
    pub fn with_select(mut self, select: Option<&'a [String]>) -> Self {
        self.select = select;
        self
    }
}

/// Writes a result in one envelope shape.
pub trait EnvelopeWriter {
    /// Build the envelope as a JSON tree.
    fn to_json(&self, result: &QueryResult) -> JsonValue;

    /// Encode the envelope.
    fn write(&self, result: &QueryResult) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.to_json(result))
    }
}

/// Serialize a result in the requested shape.
pub fn serialize(
    result: &QueryResult,
    shape: Shape,
    ctx: &SerializeContext<'_>,
) -> Result<Vec<u8>, serde_json::Error> {
    let writer: Box<dyn EnvelopeWriter + '_> = match shape {
        Shape::Legacy => Box::new(LegacyWriter::new(ctx)),
        Shape::V4 => Box::new(V4Writer::new(ctx)),
    };

    if ctx.pretty {
        serde_json::to_vec_pretty(&writer.to_json(result))
    } else {
        writer.write(result)
    }
}

/// The `{"d": ...}` envelope.
pub struct LegacyWriter<'c, 'a> {
    ctx: &'c SerializeContext<'a>,
}

impl<'c, 'a> LegacyWriter<'c, 'a> {
    /// Create a writer.
    pub fn new(ctx: &'c SerializeContext<'a>) -> Self {
        Self { ctx }
    }

    /// Non-key fields first, then the key, then `__metadata`.
    fn entity(&self, info: &EntitySetInfo, record: &EntityRecord) -> JsonValue {
        let mut obj = Map::new();
        let mut key = None;

        for (name, value) in &record.fields {
            if *name == info.key_field {
                key = Some(value);
            } else {
                obj.insert(name.clone(), value_to_json(value));
            }
        }
        if let Some(value) = key {
            obj.insert(info.key_field.clone(), value_to_json(value));
        }

        obj.insert(
            "__metadata".to_string(),
            json!({
                "uri": entity_uri(self.ctx.service_root, &info.name, &record.key),
                "type": info.name,
            }),
        );
        JsonValue::Object(obj)
    }
}

impl EnvelopeWriter for LegacyWriter<'_, '_> {
    fn to_json(&self, result: &QueryResult) -> JsonValue {
        match result {
            QueryResult::SingleEntity { entity_set, record } => {
                json!({ "d": self.entity(entity_set, record) })
            }
            QueryResult::EntityCollection { entity_set, records } => {
                let results: Vec<JsonValue> = records
                    .iter()
                    .map(|record| self.entity(entity_set, record))
                    .collect();
                json!({ "d": { "results": results } })
            }
        }
    }
}

/// The `{"@odata.context": ...}` envelope.
pub struct V4Writer<'c, 'a> {
    ctx: &'c SerializeContext<'a>,
}

impl<'c, 'a> V4Writer<'c, 'a> {
    /// Create a writer.
    pub fn new(ctx: &'c SerializeContext<'a>) -> Self {
        Self { ctx }
    }
}

impl EnvelopeWriter for V4Writer<'_, '_> {
    fn to_json(&self, result: &QueryResult) -> JsonValue {
        let context = context_url(
            self.ctx.service_root,
            &result.entity_set().name,
            self.ctx.select,
            result.is_single(),
        );

        let mut obj = Map::new();
        obj.insert("@odata.context".to_string(), JsonValue::String(context));

        match result {
            QueryResult::SingleEntity { record, .. } => {
                for (name, value) in &record.fields {
                    obj.insert(name.clone(), value_to_json(value));
                }
            }
            QueryResult::EntityCollection { records, .. } => {
                let value: Vec<JsonValue> = records.iter().map(record_to_json).collect();
                obj.insert("value".to_string(), JsonValue::Array(value));
            }
        }
        JsonValue::Object(obj)
    }
}

/// `{root}$metadata#{Set}[(a,b)][/$entity]`.
pub fn context_url(root: &str, entity_set: &str, select: Option<&[String]>, single: bool) -> String {
    let mut url = format!("{}$metadata#{}", root, entity_set);
    if let Some(fields) = select {
        url.push('(');
        url.push_str(&fields.join(","));
        url.push(')');
    }
    if single {
        url.push_str("/$entity");
    }
    url
}

/// `{root}{Set}({key})/`, quoting string keys.
pub fn entity_uri(root: &str, entity_set: &str, key: &Value) -> String {
    format!("{}{}({})/", root, entity_set, key_literal(key))
}

fn key_literal(key: &Value) -> String {
    match key {
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        other => other.to_text(),
    }
}

/// Convert a record's fields to a JSON object in record order.
pub fn record_to_json(record: &EntityRecord) -> JsonValue {
    let obj: Map<String, JsonValue> = record
        .fields
        .iter()
        .map(|(name, value)| (name.clone(), value_to_json(value)))
        .collect();
    JsonValue::Object(obj)
}

/// Convert Value to JSON value.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int64(i) => json!(i),
        Value::Float64(f) => json!(f),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::DateTime(dt) => JsonValue::String(format_datetime(dt)),
    }
}
