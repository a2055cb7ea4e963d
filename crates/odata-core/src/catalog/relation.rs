//! Relation (navigation property) definitions between entity sets.

/// Cardinality of a relation, seen from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one related record (foreign key on the source).
    ToOne,
    /// Any number of related records (foreign key on the target).
    ToMany,
}

/// A navigation property from one entity set to another.
///
/// Records are related when `from_entity.from_field` equals
/// `to_entity.to_field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDef {
    /// Navigation property name (unique per source entity set).
    pub name: String,
    /// Source entity set.
    pub from_entity: String,
    /// Field on the source entity set.
    pub from_field: String,
    /// Target entity set.
    pub to_entity: String,
    /// Field on the target entity set.
    pub to_field: String,
    /// Relation cardinality.
    pub cardinality: Cardinality,
}

impl RelationDef {
    /// Create a to-one relation, e.g. `Main.rel_id -> Sub.id`.
    pub fn to_one(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            from_field: from_field.into(),
            to_entity: to_entity.into(),
            to_field: to_field.into(),
            cardinality: Cardinality::ToOne,
        }
    }

    /// Create a to-many relation, e.g. `Author.id -> Post.author_id`.
    pub fn to_many(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            from_field: from_field.into(),
            to_entity: to_entity.into(),
            to_field: to_field.into(),
            cardinality: Cardinality::ToMany,
        }
    }

    /// Get the inverse relation (swapping from/to).
    pub fn inverse(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from_entity: self.to_entity.clone(),
            from_field: self.to_field.clone(),
            to_entity: self.from_entity.clone(),
            to_field: self.from_field.clone(),
            cardinality: match self.cardinality {
                Cardinality::ToOne => Cardinality::ToMany,
                Cardinality::ToMany => Cardinality::ToOne,
            },
        }
    }
}
