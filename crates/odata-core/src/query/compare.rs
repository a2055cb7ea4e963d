//! Value comparison shared by filtering and sorting.

use std::cmp::Ordering;

use odata_proto::{ComparisonOp, Value};

/// Compare two non-null values.
///
/// Numbers compare numerically across integer and float, dates and strings
/// by their natural order. Values of different types fall back to comparing
/// their text renderings. Returns `None` when either side is null or a
/// float comparison is undefined.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Float64(a), Value::Float64(b)) => a.partial_cmp(b),
        (Value::Int64(i), Value::Float64(f)) => compare_int_float(*i, *f),
        (Value::Float64(f), Value::Int64(i)) => compare_int_float(*i, *f).map(Ordering::reverse),
        (a, b) => Some(a.to_text().cmp(&b.to_text())),
    }
}

/// Compare an integer with a float without rounding the integer.
fn compare_int_float(i: i64, f: f64) -> Option<Ordering> {
    // 2^63, the first float above i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return None;
    }
    if f >= LIMIT {
        return Some(Ordering::Less);
    }
    if f < -LIMIT {
        return Some(Ordering::Greater);
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal if f > whole => Some(Ordering::Less),
        Ordering::Equal if f < whole => Some(Ordering::Greater),
        ordering => Some(ordering),
    }
}

/// Exact equality used for `eq`, `ne` and relation joins.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => compare_values(a, b) == Some(Ordering::Equal),
    }
}

/// Evaluate `left <op> right`.
///
/// A null right-hand side turns `eq`/`ne` into null tests; ordering against
/// null never holds. A null left-hand side is unequal to any value.
pub fn apply_op(op: ComparisonOp, left: &Value, right: &Value) -> bool {
    match (left.is_null(), right.is_null()) {
        (false, false) => compare_values(left, right).is_some_and(|ord| op.holds(ord)),
        _ if op.is_ordering() => false,
        (true, true) => op == ComparisonOp::Eq,
        _ => op == ComparisonOp::Ne,
    }
}

/// Total order used for sorting: nulls first, then [`compare_values`].
pub fn sort_order(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => compare_values(a, b).unwrap_or(Ordering::Equal),
    }
}
