//! Numeric coercion.
//!
//! Pairs of numbers promote to their common widest type along the ladder
//! `integer < double < arbitrary-precision decimal`; arithmetic and
//! comparison then dispatch on the common type.

use std::cmp::Ordering;

use docql_common::{EvalError, EvalErrorCode};
use docql_value::{Value, ValueType};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// A pair of numbers promoted to their common type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NumericPair {
    Int(i64, i64),
    Float(f64, f64),
    Decimal(Decimal, Decimal),
}

/// Promote two numeric values. Returns `None` when either is not numeric.
pub(crate) fn coerce(left: &Value, right: &Value) -> Result<Option<NumericPair>, EvalError> {
    use ValueType::{Decimal as D, Float as F, Int as I};

    let pair = match (left.value_type(), right.value_type()) {
        (I, I) => NumericPair::Int(int_of(left), int_of(right)),
        (I, F) => NumericPair::Float(int_of(left) as f64, float_of(right)),
        (F, I) => NumericPair::Float(float_of(left), int_of(right) as f64),
        (F, F) => NumericPair::Float(float_of(left), float_of(right)),
        (I, D) => NumericPair::Decimal(Decimal::from(int_of(left)), dec_of(right)),
        (D, I) => NumericPair::Decimal(dec_of(left), Decimal::from(int_of(right))),
        (F, D) => NumericPair::Decimal(dec_from_float(float_of(left))?, dec_of(right)),
        (D, F) => NumericPair::Decimal(dec_of(left), dec_from_float(float_of(right))?),
        (D, D) => NumericPair::Decimal(dec_of(left), dec_of(right)),
        _ => return Ok(None),
    };
    Ok(Some(pair))
}

/// Compare a coerced pair. `None` means unordered (a NaN was involved).
pub(crate) fn compare(pair: NumericPair) -> Option<Ordering> {
    match pair {
        NumericPair::Int(a, b) => Some(a.cmp(&b)),
        NumericPair::Float(a, b) => a.partial_cmp(&b),
        NumericPair::Decimal(a, b) => Some(a.cmp(&b)),
    }
}

/// Numeric equality on a coerced pair.
pub(crate) fn equal(pair: NumericPair) -> bool {
    match pair {
        NumericPair::Int(a, b) => a == b,
        NumericPair::Float(a, b) => a == b,
        NumericPair::Decimal(a, b) => a == b,
    }
}

fn int_of(v: &Value) -> i64 {
    v.as_int().unwrap_or_default()
}

fn float_of(v: &Value) -> f64 {
    v.as_float().unwrap_or_default()
}

fn dec_of(v: &Value) -> Decimal {
    v.as_decimal().unwrap_or_default()
}

fn dec_from_float(f: f64) -> Result<Decimal, EvalError> {
    Decimal::from_f64(f).ok_or_else(|| EvalError::new(EvalErrorCode::InvalidArguments))
}

/// `f64` rendering of a decimal, for casts.
pub(crate) fn decimal_to_f64(d: Decimal) -> Option<f64> {
    d.to_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_pairs_stay_int() {
        let pair = coerce(&Value::int(1), &Value::int(2)).unwrap().unwrap();
        assert_eq!(pair, NumericPair::Int(1, 2));
    }

    #[test]
    fn int_widens_to_float() {
        let pair = coerce(&Value::int(1), &Value::float(2.5)).unwrap().unwrap();
        assert_eq!(pair, NumericPair::Float(1.0, 2.5));
    }

    #[test]
    fn decimal_is_the_widest() {
        let d = Decimal::new(15, 1); // 1.5
        let pair = coerce(&Value::float(0.5), &Value::decimal(d))
            .unwrap()
            .unwrap();
        assert_eq!(
            pair,
            NumericPair::Decimal(Decimal::new(5, 1), Decimal::new(15, 1))
        );
    }

    #[test]
    fn non_numeric_is_none() {
        assert!(coerce(&Value::string("x"), &Value::int(1))
            .unwrap()
            .is_none());
    }

    #[test]
    fn comparison_follows_the_ladder() {
        let pair = coerce(&Value::int(2), &Value::decimal(Decimal::new(15, 1)))
            .unwrap()
            .unwrap();
        assert_eq!(compare(pair), Some(Ordering::Greater));
    }

    #[test]
    fn nan_is_unordered() {
        let pair = coerce(&Value::float(f64::NAN), &Value::float(1.0))
            .unwrap()
            .unwrap();
        assert_eq!(compare(pair), None);
    }

    #[test]
    fn decimal_equality_ignores_scale() {
        let a = "1.0".parse::<Decimal>().unwrap();
        let b = "1.00".parse::<Decimal>().unwrap();
        let pair = coerce(&Value::decimal(a), &Value::decimal(b))
            .unwrap()
            .unwrap();
        assert!(equal(pair));
    }
}
