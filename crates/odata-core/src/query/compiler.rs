//! Compiles parsed query options into predicates and sort keys.
//!
//! Every property name is resolved against the schema here, before the
//! executor touches the store.

use tracing::trace;

use crate::catalog::{FieldAccessor, ScalarType, Schema};
use crate::error::Error;
use odata_proto::{
    FilterClause, OrderClause, PropertyPath, QueryOptions, SortDirection, Value, MAX_RELATION_HOPS,
};

use super::predicate::{FieldRef, Operand, Predicate};

/// A compiled `$orderby` key.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// Field the key reads.
    pub field: FieldRef,
    /// Sort direction.
    pub direction: SortDirection,
    /// Precedence; 0 is the primary key.
    pub rank: usize,
}

/// Options compiled against one entity set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledQuery {
    /// Entity set the options apply to.
    pub entity_set: String,
    /// Filter predicate.
    pub predicate: Option<Predicate>,
    /// Sort keys in precedence order.
    pub sort_keys: Vec<SortKey>,
    /// Selected field names; `None` keeps every field.
    pub select: Option<Vec<String>>,
}

/// Compile all options against `entity_set`.
pub fn compile(options: &QueryOptions, entity_set: &str, schema: &Schema) -> Result<CompiledQuery, Error> {
    let predicate = options
        .filter
        .as_ref()
        .map(|clause| compile_filter(clause, entity_set, schema))
        .transpose()?;
    let sort_keys = compile_order_by(&options.order_by, entity_set, schema)?;
    let select = options
        .select
        .as_deref()
        .map(|names| compile_select(names, entity_set, schema))
        .transpose()?;

    Ok(CompiledQuery {
        entity_set: entity_set.to_string(),
        predicate,
        sort_keys,
        select,
    })
}

/// Compile a filter clause into a predicate over `entity_set` records.
///
/// The clause value is coerced against the declared type of the field the
/// path ends at:
///
/// - bare `null` is the null literal;
/// - text that parses as the field's type becomes a typed literal;
/// - a bare name of another field of `entity_set` compares the two fields;
/// - anything else is a text literal, compared lexicographically against
///   non-text fields.
pub fn compile_filter(clause: &FilterClause, entity_set: &str, schema: &Schema) -> Result<Predicate, Error> {
    let field = resolve_path(&clause.path, entity_set, schema)?;
    let operand = compile_operand(clause, &field.accessor, entity_set, schema);

    let predicate = Predicate::Compare {
        field,
        op: clause.op,
        operand,
    };
    trace!(entity_set, predicate = %predicate, "compiled filter");
    Ok(predicate)
}

/// Compile `$orderby` clauses into sort keys ordered by rank.
pub fn compile_order_by(clauses: &[OrderClause], entity_set: &str, schema: &Schema) -> Result<Vec<SortKey>, Error> {
    let mut keys = clauses
        .iter()
        .map(|clause| {
            Ok(SortKey {
                field: resolve_path(&clause.path, entity_set, schema)?,
                direction: clause.direction,
                rank: clause.rank,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    keys.sort_by_key(|key| key.rank);
    for key in &keys {
        trace!(entity_set, rank = key.rank, field = %key.field, direction = ?key.direction, "compiled sort key");
    }
    Ok(keys)
}

/// Check selected names against the fields of `entity_set`.
pub fn compile_select(names: &[String], entity_set: &str, schema: &Schema) -> Result<Vec<String>, Error> {
    for name in names {
        if schema.accessor(entity_set, name).is_none() {
            return Err(Error::unknown_property(entity_set, name.as_str()));
        }
    }
    Ok(names.to_vec())
}

/// Resolve a property path to a field of `entity_set` or of a related set.
fn resolve_path(path: &PropertyPath, entity_set: &str, schema: &Schema) -> Result<FieldRef, Error> {
    if path.hops() > MAX_RELATION_HOPS {
        return Err(Error::UnsupportedTraversalDepth {
            path: path.to_string(),
        });
    }

    match path.segments() {
        [field] => schema
            .accessor(entity_set, field)
            .cloned()
            .map(FieldRef::local)
            .ok_or_else(|| Error::unknown_property(entity_set, field.as_str())),
        [relation, field] => {
            let hop = schema
                .relation(entity_set, relation)
                .ok_or_else(|| Error::unknown_property(entity_set, relation.as_str()))?;
            let accessor = schema
                .accessor(hop.target(), field)
                .ok_or_else(|| Error::unknown_property(hop.target(), field.as_str()))?;
            Ok(FieldRef::related(hop.clone(), accessor.clone()))
        }
        _ => Err(Error::unknown_property(entity_set, path.to_string())),
    }
}

fn compile_operand(clause: &FilterClause, target: &FieldAccessor, entity_set: &str, schema: &Schema) -> Operand {
    let text = clause.value.as_str();

    if !clause.quoted && text == "null" {
        return Operand::Literal(Value::Null);
    }

    let typed = match target.scalar {
        ScalarType::String if clause.quoted => Some(Value::String(text.to_string())),
        scalar => scalar.parse_literal(text),
    };
    if let Some(value) = typed {
        return Operand::Literal(value);
    }

    if !clause.quoted {
        if let Some(other) = schema.accessor(entity_set, text) {
            return Operand::Field(other.clone());
        }
    }

    Operand::Literal(Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EntityDef, FieldDef, RelationDef};
    use odata_proto::ComparisonOp;

    fn schema() -> Schema {
        Schema::builder()
            .with_entity(
                EntityDef::new("Number", "id")
                    .field("id", ScalarType::Int)
                    .field("value", ScalarType::Int)
                    .field("field", ScalarType::Int),
            )
            .with_entity(
                EntityDef::new("Sub", "id")
                    .field("id", ScalarType::Int)
                    .field("name", ScalarType::String),
            )
            .with_entity(
                EntityDef::new("Main", "id")
                    .field("id", ScalarType::Int)
                    .field("name", ScalarType::String)
                    .with_field(FieldDef::optional("rel_id", ScalarType::Int))
                    .with_field(FieldDef::optional("published", ScalarType::DateTime)),
            )
            .with_relation(RelationDef::to_one("rel", "Main", "rel_id", "Sub", "id"))
            .build()
            .unwrap()
    }

    fn operand(raw: &str, quoted: bool, entity_set: &str, path: &str) -> Operand {
        let clause = FilterClause {
            path: PropertyPath::split(path),
            op: ComparisonOp::Eq,
            value: raw.to_string(),
            quoted,
        };
        match compile_filter(&clause, entity_set, &schema()).unwrap() {
            Predicate::Compare { operand, .. } => operand,
            other => panic!("expected comparison, got {other:?}"),
        }
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(operand("-14", false, "Number", "value"), Operand::Literal(Value::Int64(-14)));
        assert_eq!(operand("2.5", false, "Number", "value"), Operand::Literal(Value::Float64(2.5)));
        // quoted digits against a numeric field still compare as numbers
        assert_eq!(operand("2", true, "Number", "value"), Operand::Literal(Value::Int64(2)));
    }

    #[test]
    fn test_bare_field_reference() {
        let schema = schema();
        let expected = schema.accessor("Number", "field").unwrap().clone();
        assert_eq!(operand("field", false, "Number", "id"), Operand::Field(expected));
    }

    #[test]
    fn test_text_fallbacks() {
        assert_eq!(
            operand("abc", false, "Number", "value"),
            Operand::Literal(Value::String("abc".into()))
        );
        // quoting forces a literal even when the text names a field
        assert_eq!(
            operand("field", true, "Number", "value"),
            Operand::Literal(Value::String("field".into()))
        );
        assert_eq!(
            operand("tag3", false, "Main", "name"),
            Operand::Literal(Value::String("tag3".into()))
        );
    }

    #[test]
    fn test_null_and_dates() {
        assert_eq!(operand("null", false, "Main", "rel_id"), Operand::Literal(Value::Null));
        assert_eq!(
            operand("null", true, "Main", "name"),
            Operand::Literal(Value::String("null".into()))
        );
        assert!(matches!(
            operand("2017-03-14", false, "Main", "published"),
            Operand::Literal(Value::DateTime(_))
        ));
    }

    #[test]
    fn test_relation_path_resolves_to_target_field() {
        let clause = FilterClause::quoted(PropertyPath::split("rel/name"), ComparisonOp::Eq, "Subobject1");
        let Predicate::Compare { field, .. } = compile_filter(&clause, "Main", &schema()).unwrap() else {
            panic!("expected comparison");
        };
        assert_eq!(field.hop.as_ref().map(|h| h.target()), Some("Sub"));
        assert_eq!(field.accessor.entity_set, "Sub");
        assert_eq!(field.to_string(), "rel/name");
    }

    #[test]
    fn test_unknown_properties() {
        let schema = schema();
        for path in ["missing", "missing/name", "rel/missing"] {
            let clause = FilterClause::new(PropertyPath::split(path), ComparisonOp::Eq, "1");
            assert!(matches!(
                compile_filter(&clause, "Main", &schema),
                Err(Error::UnknownProperty { .. })
            ));
        }
    }

    #[test]
    fn test_traversal_depth() {
        let clause = FilterClause::new(PropertyPath::split("rel/rel/name"), ComparisonOp::Eq, "1");
        assert!(matches!(
            compile_filter(&clause, "Main", &schema()),
            Err(Error::UnsupportedTraversalDepth { .. })
        ));
    }

    #[test]
    fn test_sort_keys_follow_rank() {
        let clauses = vec![
            OrderClause::desc(PropertyPath::field("id"), 1),
            OrderClause::asc(PropertyPath::split("rel/name"), 0),
        ];
        let keys = compile_order_by(&clauses, "Main", &schema()).unwrap();
        assert_eq!(keys[0].rank, 0);
        assert!(keys[0].field.hop.is_some());
        assert_eq!(keys[1].direction, SortDirection::Desc);
    }

    #[test]
    fn test_compile_all_options() {
        let options = QueryOptions::new()
            .with_filter(FilterClause::new(PropertyPath::field("value"), ComparisonOp::Gt, "2"))
            .with_order_by(vec![OrderClause::asc(PropertyPath::field("value"), 0)])
            .with_select(vec!["value".to_string()]);
        let compiled = compile(&options, "Number", &schema()).unwrap();

        assert_eq!(compiled.entity_set, "Number");
        assert!(compiled.predicate.is_some());
        assert_eq!(compiled.sort_keys.len(), 1);
        assert_eq!(compiled.select, Some(vec!["value".to_string()]));

        let bad_select = QueryOptions::new().with_select(vec!["nope".to_string()]);
        assert!(matches!(
            compile(&bad_select, "Number", &schema()),
            Err(Error::UnknownProperty { .. })
        ));
    }
}
