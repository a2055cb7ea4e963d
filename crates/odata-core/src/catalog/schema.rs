//! Schema: registered entity sets, relations and the field accessor table.

use std::collections::HashMap;

use super::{Cardinality, EntityDef, FieldKind, RelationDef, ScalarType};
use crate::error::Error;
use odata_proto::Value;

static NULL: Value = Value::Null;

/// Typed getter for one field of one entity set.
///
/// Built once when the schema is registered; reading a field through an
/// accessor is a positional lookup into the stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessor {
    /// Entity set the field belongs to.
    pub entity_set: String,
    /// Field name.
    pub field: String,
    /// Position in the stored row.
    pub index: usize,
    /// Declared type.
    pub scalar: ScalarType,
}

impl FieldAccessor {
    /// Comparison family of the field.
    pub fn kind(&self) -> FieldKind {
        self.scalar.kind()
    }

    /// Read the field from a row of this accessor's entity set.
    pub fn get<'r>(&self, values: &'r [Value]) -> &'r Value {
        values.get(self.index).unwrap_or(&NULL)
    }
}

/// A relation resolved against the accessor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationHop {
    /// Navigation property name.
    pub name: String,
    /// Field read on the source row.
    pub from: FieldAccessor,
    /// Field matched on the target rows.
    pub to: FieldAccessor,
    /// Whether `to` is the target's identity field.
    pub to_identity: bool,
    /// Relation cardinality.
    pub cardinality: Cardinality,
}

impl RelationHop {
    /// Target entity set.
    pub fn target(&self) -> &str {
        &self.to.entity_set
    }
}

/// The registered schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entities: Vec<EntityDef>,
    entity_index: HashMap<String, usize>,
    /// Relations keyed by source entity set, then navigation property name.
    relations: HashMap<String, HashMap<String, RelationHop>>,
    /// Accessors keyed by entity set, then field name.
    accessors: HashMap<String, HashMap<String, FieldAccessor>>,
}

impl Schema {
    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Get an entity set by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entity_index.get(name).map(|&i| &self.entities[i])
    }

    /// List all entity set names in registration order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    /// Look up the accessor for `entity_set.field`.
    pub fn accessor(&self, entity_set: &str, field: &str) -> Option<&FieldAccessor> {
        self.accessors.get(entity_set)?.get(field)
    }

    /// Accessor for the identity field of an entity set.
    pub fn identity_accessor(&self, entity_set: &str) -> Option<&FieldAccessor> {
        let entity = self.get_entity(entity_set)?;
        self.accessor(entity_set, &entity.identity_field)
    }

    /// Look up a navigation property of an entity set.
    pub fn relation(&self, entity_set: &str, name: &str) -> Option<&RelationHop> {
        self.relations.get(entity_set)?.get(name)
    }

    /// Resolve a property path to the kind of the field it ends at.
    ///
    /// `["name"]` reads a field of `entity_set`; `["rel", "name"]` reads
    /// `name` on the target of relation `rel`.
    pub fn field_kind(&self, entity_set: &str, path: &[String]) -> Option<FieldKind> {
        match path {
            [field] => self.accessor(entity_set, field).map(FieldAccessor::kind),
            [relation, field] => {
                let hop = self.relation(entity_set, relation)?;
                self.accessor(hop.target(), field).map(FieldAccessor::kind)
            }
            _ => None,
        }
    }
}

/// Builder that validates entity sets and relations and derives the
/// accessor table.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entities: Vec<EntityDef>,
    relations: Vec<RelationDef>,
}

impl SchemaBuilder {
    /// Add an entity set.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.push(entity);
        self
    }

    /// Add a relation.
    pub fn with_relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    /// Add a relation together with its inverse.
    pub fn with_relation_pair(self, relation: RelationDef, inverse_name: &str) -> Self {
        let inverse = relation.inverse(inverse_name);
        self.with_relation(relation).with_relation(inverse)
    }

    /// Validate and build the schema.
    pub fn build(self) -> Result<Schema, Error> {
        let mut schema = Schema::default();

        for entity in self.entities {
            if schema.entity_index.contains_key(&entity.name) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate entity set '{}'",
                    entity.name
                )));
            }
            if entity.get_identity_field().is_none() {
                return Err(Error::InvalidSchema(format!(
                    "entity set '{}' has no identity field '{}'",
                    entity.name, entity.identity_field
                )));
            }

            let mut accessors = HashMap::new();
            for (index, field) in entity.fields.iter().enumerate() {
                let accessor = FieldAccessor {
                    entity_set: entity.name.clone(),
                    field: field.name.clone(),
                    index,
                    scalar: field.scalar,
                };
                if accessors.insert(field.name.clone(), accessor).is_some() {
                    return Err(Error::InvalidSchema(format!(
                        "duplicate field '{}' on entity set '{}'",
                        field.name, entity.name
                    )));
                }
            }

            schema.accessors.insert(entity.name.clone(), accessors);
            schema
                .entity_index
                .insert(entity.name.clone(), schema.entities.len());
            schema.entities.push(entity);
        }

        for relation in self.relations {
            let hop = schema.resolve_relation(&relation)?;
            let by_name = schema
                .relations
                .entry(relation.from_entity.clone())
                .or_default();
            if by_name.contains_key(&relation.name) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate relation '{}' on entity set '{}'",
                    relation.name, relation.from_entity
                )));
            }
            if schema.accessors[&relation.from_entity].contains_key(&relation.name) {
                return Err(Error::InvalidSchema(format!(
                    "relation '{}' shadows a field of entity set '{}'",
                    relation.name, relation.from_entity
                )));
            }
            by_name.insert(relation.name.clone(), hop);
        }

        Ok(schema)
    }
}

impl Schema {
    fn resolve_relation(&self, relation: &RelationDef) -> Result<RelationHop, Error> {
        let endpoint = |entity: &str, field: &str| {
            self.accessor(entity, field).cloned().ok_or_else(|| {
                Error::InvalidSchema(format!(
                    "relation '{}' references unknown field '{}.{}'",
                    relation.name, entity, field
                ))
            })
        };

        let from = endpoint(&relation.from_entity, &relation.from_field)?;
        let to = endpoint(&relation.to_entity, &relation.to_field)?;

        let to_identity = self
            .get_entity(&relation.to_entity)
            .is_some_and(|e| e.is_identity(&relation.to_field));

        Ok(RelationHop {
            name: relation.name.clone(),
            from,
            to,
            to_identity,
            cardinality: relation.cardinality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldDef;

    fn sample_schema() -> Result<Schema, Error> {
        Schema::builder()
            .with_entity(
                EntityDef::new("Author", "id")
                    .field("id", ScalarType::Int)
                    .field("name", ScalarType::String),
            )
            .with_entity(
                EntityDef::new("Post", "id")
                    .field("id", ScalarType::Int)
                    .field("title", ScalarType::String)
                    .with_field(FieldDef::optional("author_id", ScalarType::Int)),
            )
            .with_relation_pair(
                RelationDef::to_many("posts", "Author", "id", "Post", "author_id"),
                "author",
            )
            .build()
    }

    #[test]
    fn test_accessor_table() {
        let schema = sample_schema().unwrap();

        let accessor = schema.accessor("Post", "author_id").unwrap();
        assert_eq!(accessor.index, 2);
        assert_eq!(accessor.kind(), FieldKind::Numeric);
        assert!(schema.accessor("Post", "missing").is_none());
        assert!(schema.accessor("Missing", "id").is_none());

        let row = vec![Value::Int64(1), Value::String("t1".into())];
        assert_eq!(accessor.get(&row), &Value::Null);
        assert_eq!(schema.accessor("Post", "title").unwrap().get(&row), &row[1]);
    }

    #[test]
    fn test_relations_and_inverse() {
        let schema = sample_schema().unwrap();

        let posts = schema.relation("Author", "posts").unwrap();
        assert_eq!(posts.target(), "Post");
        assert!(!posts.to_identity);
        assert_eq!(posts.cardinality, Cardinality::ToMany);

        let author = schema.relation("Post", "author").unwrap();
        assert_eq!(author.target(), "Author");
        assert!(author.to_identity);
        assert_eq!(author.cardinality, Cardinality::ToOne);
        assert!(schema.relation("Author", "author").is_none());
    }

    #[test]
    fn test_field_kind_through_relation() {
        let schema = sample_schema().unwrap();
        let path = |p: &[&str]| p.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(
            schema.field_kind("Post", &path(&["author", "name"])),
            Some(FieldKind::Text)
        );
        assert_eq!(schema.field_kind("Post", &path(&["id"])), Some(FieldKind::Numeric));
        assert_eq!(schema.field_kind("Post", &path(&["author", "missing"])), None);
        assert_eq!(schema.field_kind("Post", &path(&["a", "b", "c"])), None);
    }

    #[test]
    fn test_validation_errors() {
        let missing_identity = Schema::builder()
            .with_entity(EntityDef::new("Tag", "id").field("name", ScalarType::String))
            .build();
        assert!(matches!(missing_identity, Err(Error::InvalidSchema(_))));

        let duplicate = Schema::builder()
            .with_entity(EntityDef::new("Tag", "id").field("id", ScalarType::Int))
            .with_entity(EntityDef::new("Tag", "id").field("id", ScalarType::Int))
            .build();
        assert!(matches!(duplicate, Err(Error::InvalidSchema(_))));

        let dangling = Schema::builder()
            .with_entity(EntityDef::new("Main", "id").field("id", ScalarType::Int))
            .with_relation(RelationDef::to_one("rel", "Main", "rel_id", "Sub", "id"))
            .build();
        assert!(matches!(dangling, Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_entity_names_keep_registration_order() {
        let schema = sample_schema().unwrap();
        assert_eq!(schema.entity_names(), vec!["Author", "Post"]);
    }
}
