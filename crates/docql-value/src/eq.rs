//! PTS equality: the type-strict equivalence used by the conformance
//! harness. Unlike the evaluator's SQL `=`, it never coerces across types
//! and it treats typed nulls and MISSING as comparable values.

use crate::value::{Data, Value};

/// Type-strict structural equality.
///
/// - Different top-level types are never equal.
/// - Typed nulls are equal only to typed nulls of the same declared type.
/// - MISSING equals only MISSING.
/// - DECIMAL compares numerically, ignoring scale; TIMESTAMP by instant.
/// - LIST and SEXP compare positionally; BAG (including its `(bag …)`
///   s-expression encoding) as a multiset.
/// - STRUCT compares by field name, ignoring order.
pub fn pts_eq(left: &Value, right: &Value) -> bool {
    // The s-expression bag encoding takes precedence over positional
    // sexp comparison.
    if let (Some(xs), Some(ys)) = (bag_elements(left), bag_elements(right)) {
        return multiset_eq(xs, ys);
    }

    match (&*left.data, &*right.data) {
        (Data::Missing, Data::Missing) => true,
        (Data::Null(a), Data::Null(b)) => a == b,
        (Data::Null(_), _) | (_, Data::Null(_)) => false,
        (Data::Missing, _) | (_, Data::Missing) => false,
        (Data::Bool(a), Data::Bool(b)) => a == b,
        (Data::Int(a), Data::Int(b)) => a == b,
        // IEEE comparison except that nan equals nan, so the relation
        // stays reflexive.
        (Data::Float(a), Data::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
        (Data::Decimal(a), Data::Decimal(b)) => a == b,
        (Data::Timestamp(a), Data::Timestamp(b)) => a == b,
        (Data::Symbol(a), Data::Symbol(b)) => a == b,
        (Data::String(a), Data::String(b)) => a == b,
        (Data::Clob(a), Data::Clob(b)) => a == b,
        (Data::Blob(a), Data::Blob(b)) => a == b,
        (Data::List(xs), Data::List(ys)) | (Data::Sexp(xs), Data::Sexp(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| pts_eq(x, y))
        }
        (Data::Struct(xs), Data::Struct(ys)) => struct_eq(xs, ys),
        _ => false,
    }
}

/// Bag contents of a value: a first-class BAG, or a SEXP whose first
/// element is the symbol `bag` and whose size exceeds one.
fn bag_elements(value: &Value) -> Option<&[Value]> {
    match &*value.data {
        Data::Bag(items) => Some(items),
        Data::Sexp(items) if items.len() > 1 => match &*items[0].data {
            Data::Symbol(head) if head == "bag" => Some(&items[1..]),
            _ => None,
        },
        _ => None,
    }
}

/// Multiset equality, counting multiplicity with PTS equality itself.
fn multiset_eq(xs: &[Value], ys: &[Value]) -> bool {
    if xs.len() != ys.len() {
        return false;
    }
    let mut used = vec![false; ys.len()];
    'outer: for x in xs {
        for (i, y) in ys.iter().enumerate() {
            if !used[i] && pts_eq(x, y) {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

/// Same size, and every field on the left pairs with an unused
/// same-named, recursively-equal field on the right.
fn struct_eq(xs: &[(String, Value)], ys: &[(String, Value)]) -> bool {
    if xs.len() != ys.len() {
        return false;
    }
    let mut used = vec![false; ys.len()];
    'outer: for (name, x) in xs {
        for (i, (other, y)) in ys.iter().enumerate() {
            if !used[i] && name == other && pts_eq(x, y) {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}
