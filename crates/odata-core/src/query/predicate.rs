//! Compiled predicates and field references.

use std::fmt;

use crate::catalog::{FieldAccessor, RelationHop};
use crate::error::Error;
use crate::storage::{Record, Storage};
use odata_proto::{ComparisonOp, Value};

use super::compare::apply_op;

/// A field of the base record, or of the records one relation away.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    /// Relation crossed before reading the field.
    pub hop: Option<RelationHop>,
    /// Accessor on the base set, or on the relation's target.
    pub accessor: FieldAccessor,
}

impl FieldRef {
    /// A field of the base entity set.
    pub fn local(accessor: FieldAccessor) -> Self {
        Self {
            hop: None,
            accessor,
        }
    }

    /// A field of the records reached through `hop`.
    pub fn related(hop: RelationHop, accessor: FieldAccessor) -> Self {
        Self {
            hop: Some(hop),
            accessor,
        }
    }

    /// Values this reference reads for `record`.
    ///
    /// A local field yields exactly one value; a related field yields one
    /// value per related record, possibly none.
    pub fn read<'s, S>(&self, record: &'s Record, storage: &'s S) -> Result<Vec<&'s Value>, Error>
    where
        S: Storage + ?Sized,
    {
        match &self.hop {
            None => Ok(vec![self.accessor.get(record.values())]),
            Some(hop) => Ok(storage
                .traverse_relation(record, hop)?
                .into_iter()
                .map(|related| self.accessor.get(related.values()))
                .collect()),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hop {
            Some(hop) => write!(f, "{}/{}", hop.name, self.accessor.field),
            None => write!(f, "{}", self.accessor.field),
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A typed literal.
    Literal(Value),
    /// Another field of the base record.
    Field(FieldAccessor),
}

/// A compiled boolean test over a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field <op> operand`. Over a relation, holds when any related record
    /// satisfies the comparison.
    Compare {
        field: FieldRef,
        op: ComparisonOp,
        operand: Operand,
    },
    /// All of the predicates hold.
    And(Vec<Predicate>),
    /// Any of the predicates holds.
    Or(Vec<Predicate>),
    /// The predicate does not hold.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Conjunction of two predicates.
    pub fn and(self, other: Predicate) -> Predicate {
        match self {
            Predicate::And(mut all) => {
                all.push(other);
                Predicate::And(all)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    /// Disjunction of two predicates.
    pub fn or(self, other: Predicate) -> Predicate {
        match self {
            Predicate::Or(mut any) => {
                any.push(other);
                Predicate::Or(any)
            }
            first => Predicate::Or(vec![first, other]),
        }
    }

    /// Negation.
    pub fn negate(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    /// Evaluate the predicate against a record of the base entity set.
    pub fn evaluate<S>(&self, record: &Record, storage: &S) -> Result<bool, Error>
    where
        S: Storage + ?Sized,
    {
        match self {
            Predicate::Compare { field, op, operand } => {
                let right = match operand {
                    Operand::Literal(value) => value,
                    Operand::Field(accessor) => accessor.get(record.values()),
                };
                Ok(field
                    .read(record, storage)?
                    .into_iter()
                    .any(|left| apply_op(*op, left, right)))
            }
            Predicate::And(all) => {
                for p in all {
                    if !p.evaluate(record, storage)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Predicate::Or(any) => {
                for p in any {
                    if p.evaluate(record, storage)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::Not(inner) => Ok(!inner.evaluate(record, storage)?),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { field, op, operand } => match operand {
                Operand::Literal(value) => write!(f, "{} {} {:?}", field, op, value),
                Operand::Field(accessor) => write!(f, "{} {} {}", field, op, accessor.field),
            },
            Predicate::And(all) => join(f, all, " and "),
            Predicate::Or(any) => join(f, any, " or "),
            Predicate::Not(inner) => write!(f, "not ({})", inner),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, predicates: &[Predicate], separator: &str) -> fmt::Result {
    for (i, p) in predicates.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "({})", p)?;
    }
    Ok(())
}
