//! Intermediate query representation produced by the parsers.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of relationship hops a property path may cross.
pub const MAX_RELATION_HOPS: usize = 1;

/// The target of a request, resolved from its resource path.
///
/// A relation can only be addressed from a single entity, so the type only
/// offers constructors that keep `relation` paired with a `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTarget {
    entity_set: String,
    key: Option<String>,
    relation: Option<String>,
}

impl ResourceTarget {
    /// Address a whole entity set (`Tag`).
    pub fn collection(entity_set: impl Into<String>) -> Self {
        Self {
            entity_set: entity_set.into(),
            key: None,
            relation: None,
        }
    }

    /// Address a single entity by key (`Author(1)`).
    pub fn entity(entity_set: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entity_set: entity_set.into(),
            key: Some(key.into()),
            relation: None,
        }
    }

    /// Address the collection related to a single entity (`Author(1)/posts`).
    pub fn related(
        entity_set: impl Into<String>,
        key: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            entity_set: entity_set.into(),
            key: Some(key.into()),
            relation: Some(relation.into()),
        }
    }

    /// Name of the addressed entity set.
    pub fn entity_set(&self) -> &str {
        &self.entity_set
    }

    /// Raw key text, if an entity is addressed.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Navigation property, if a related collection is addressed.
    pub fn relation(&self) -> Option<&str> {
        self.relation.as_deref()
    }

    /// Whether the request resolves to a single entity.
    pub fn is_single_entity(&self) -> bool {
        self.key.is_some() && self.relation.is_none()
    }
}

impl fmt::Display for ResourceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entity_set)?;
        if let Some(key) = &self.key {
            write!(f, "({})", key)?;
        }
        if let Some(relation) = &self.relation {
            write!(f, "/{}", relation)?;
        }
        Ok(())
    }
}

/// A chain of property names, possibly crossing a relationship.
///
/// `name` addresses a field of the base entity set, `rel/name` addresses the
/// field `name` of the entity reached through relation `rel`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Create a path from its segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Create a single-segment path.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Split a dotted or slashed path (`rel/name`, `rel.name`).
    pub fn split(raw: &str) -> Self {
        Self::new(raw.split(['/', '.']).map(str::to_string).collect())
    }

    /// Get the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of relationship hops the path crosses.
    pub fn hops(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// Whether the path crosses a relationship.
    pub fn is_traversal(&self) -> bool {
        self.hops() > 0
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Comparison operators accepted by `$filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    /// Equal (`eq`).
    Eq,
    /// Not equal (`ne`).
    Ne,
    /// Greater than (`gt`).
    Gt,
    /// Less than (`lt`).
    Lt,
    /// Greater than or equal (`ge`).
    Ge,
    /// Less than or equal (`le`).
    Le,
}

impl ComparisonOp {
    /// Parse an operator keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "eq" => Some(ComparisonOp::Eq),
            "ne" => Some(ComparisonOp::Ne),
            "gt" => Some(ComparisonOp::Gt),
            "lt" => Some(ComparisonOp::Lt),
            "ge" => Some(ComparisonOp::Ge),
            "le" => Some(ComparisonOp::Le),
            _ => None,
        }
    }

    /// The operator keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Ge => "ge",
            ComparisonOp::Le => "le",
        }
    }

    /// Whether the operator requires an ordering rather than equality.
    pub fn is_ordering(&self) -> bool {
        !matches!(self, ComparisonOp::Eq | ComparisonOp::Ne)
    }

    /// Check whether `left <op> right` holds given `left.cmp(right)`.
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ordering.is_eq(),
            ComparisonOp::Ne => ordering.is_ne(),
            ComparisonOp::Gt => ordering.is_gt(),
            ComparisonOp::Lt => ordering.is_lt(),
            ComparisonOp::Ge => ordering.is_ge(),
            ComparisonOp::Le => ordering.is_le(),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `$filter` clause: `<path> <op> <value>`.
///
/// The value stays untyped here; it is coerced against the declared type of
/// the field the path resolves to when the clause is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Property the clause tests.
    pub path: PropertyPath,
    /// Comparison operator.
    pub op: ComparisonOp,
    /// Raw value text with string quotes removed.
    pub value: String,
    /// Whether the value was written as a quoted string literal.
    pub quoted: bool,
}

impl FilterClause {
    /// Create a clause with an unquoted value.
    pub fn new(path: PropertyPath, op: ComparisonOp, value: impl Into<String>) -> Self {
        Self {
            path,
            op,
            value: value.into(),
            quoted: false,
        }
    }

    /// Create a clause with a quoted string value.
    pub fn quoted(path: PropertyPath, op: ComparisonOp, value: impl Into<String>) -> Self {
        Self {
            path,
            op,
            value: value.into(),
            quoted: true,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending order (default when not specified).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Parse a direction keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    /// Apply the direction to an ascending ordering.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// One key of an `$orderby` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderClause {
    /// Property to sort by.
    pub path: PropertyPath,
    /// Sort direction.
    pub direction: SortDirection,
    /// Precedence; 0 is the primary key.
    pub rank: usize,
}

impl OrderClause {
    /// Create an ascending clause.
    pub fn asc(path: PropertyPath, rank: usize) -> Self {
        Self {
            path,
            direction: SortDirection::Asc,
            rank,
        }
    }

    /// Create a descending clause.
    pub fn desc(path: PropertyPath, rank: usize) -> Self {
        Self {
            path,
            direction: SortDirection::Desc,
            rank,
        }
    }
}

/// The parsed system query options of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// `$filter` clause.
    pub filter: Option<FilterClause>,
    /// `$orderby` clauses in precedence order.
    pub order_by: Vec<OrderClause>,
    /// `$select` field names; `None` selects every field.
    pub select: Option<Vec<String>>,
}

impl QueryOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter clause.
    pub fn with_filter(mut self, filter: FilterClause) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the ordering clauses.
    pub fn with_order_by(mut self, order_by: Vec<OrderClause>) -> Self {
        self.order_by = order_by;
        self
    }

    /// Set the selected fields.
    pub fn with_select(mut self, fields: Vec<String>) -> Self {
        self.select = Some(fields);
        self
    }

    /// Check if no option is set.
    pub fn is_empty(&self) -> bool {
        self.filter.is_none() && self.order_by.is_empty() && self.select.is_none()
    }
}
