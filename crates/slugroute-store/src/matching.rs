//! Predicate evaluation against JSON rows, with SQL-like semantics

use serde_json::Value;
use slugroute_core::{value_to_text, OrderBy, Predicate, PredicateOp, Row};

/// Does `row` satisfy `predicate`?
pub(crate) fn matches(row: &Row, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Field { field, op, value } => {
            let column = row.get(field).unwrap_or(&Value::Null);
            match op {
                PredicateOp::Eq => equals(column, value),
                PredicateOp::Contains => contains(column, value),
            }
        }
        Predicate::And(subs) => subs.iter().all(|sub| matches(row, sub)),
        Predicate::Or(subs) => subs.iter().any(|sub| matches(row, sub)),
    }
}

/// `null` equals a missing or null column; `5` equals `"5"`
fn equals(column: &Value, value: &Value) -> bool {
    if column == value {
        return true;
    }
    match (value_to_text(column), value_to_text(value)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// `column LIKE '%value%'`, case-insensitive
fn contains(column: &Value, value: &Value) -> bool {
    let (Some(text), Some(pattern)) = (value_to_text(column), value_to_text(value)) else {
        return false;
    };
    like(&text.to_lowercase(), &pattern.to_lowercase())
}

/// Pieces of `pattern` between `%` must appear in `text`, in order
pub(crate) fn like(text: &str, pattern: &str) -> bool {
    let mut rest = text;
    for piece in pattern.split('%').filter(|p| !p.is_empty()) {
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    true
}

/// Rank of a row, lower is better; rows lacking a length column sort last
pub(crate) fn rank(row: &Row, order_by: &OrderBy) -> u64 {
    match order_by {
        OrderBy::SummedLength(fields) => fields
            .iter()
            .filter_map(|field| row.get(field).and_then(value_to_text))
            .map(|text| text.chars().count() as u64)
            .sum(),
        OrderBy::Column(column) => row.get(column).and_then(Value::as_u64).unwrap_or(u64::MAX),
    }
}
