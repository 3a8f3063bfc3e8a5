//! The `CAST` conversion table.
//!
//! Legal conversions follow the table in the language rules: every other
//! combination raises an invalid-cast error, and a legal conversion whose
//! input cannot be represented raises a cast-failed error. NULL and MISSING
//! cast to themselves for every target.

use std::str::FromStr;

use docql_common::{EvalError, EvalErrorCode, Property, PropertyValue};
use docql_parser::types::{SqlType, TypeName};
use docql_value::{ContainerType, SequenceValue, Timestamp, Value, ValueType};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::coerce::decimal_to_f64;

/// Cast `value` to the target type.
pub fn cast(value: &Value, target: &TypeName) -> Result<Value, EvalError> {
    if value.is_null_or_missing() {
        return Ok(value.clone());
    }

    let from = value.value_type();
    match target.ty {
        SqlType::Boolean => cast_to_bool(value, target),
        SqlType::SmallInt | SqlType::Integer => cast_to_int(value, target),
        SqlType::Float | SqlType::Real => cast_to_float(value, target),
        SqlType::Decimal | SqlType::Numeric => cast_to_decimal(value, target),
        SqlType::Timestamp => match (from, value.as_timestamp(), value.as_text()) {
            (ValueType::Timestamp, Some(_), _) => Ok(value.clone()),
            (_, _, Some(text)) => Timestamp::parse(text)
                .map(Value::timestamp)
                .map_err(|_| cast_failed(from, target)),
            _ => Err(invalid_cast(from, target)),
        },
        SqlType::Char | SqlType::Varchar | SqlType::String => {
            cast_to_text(value, target).map(Value::string)
        }
        SqlType::Symbol => cast_to_text(value, target).map(Value::symbol),
        SqlType::Clob => match value.as_bytes() {
            Some(bytes) => Ok(Value::clob(bytes.to_vec())),
            None => Err(invalid_cast(from, target)),
        },
        SqlType::Blob => match value.as_bytes() {
            Some(bytes) => Ok(Value::blob(bytes.to_vec())),
            None => Err(invalid_cast(from, target)),
        },
        SqlType::List => cast_to_sequence(value, ContainerType::List, target),
        SqlType::Sexp => cast_to_sequence(value, ContainerType::Sexp, target),
        SqlType::Bag => cast_to_sequence(value, ContainerType::Bag, target),
        SqlType::Struct => match from {
            ValueType::Struct => Ok(value.clone()),
            _ => Err(invalid_cast(from, target)),
        },
        SqlType::Null | SqlType::Missing => Err(invalid_cast(from, target)),
    }
}

fn cast_to_bool(value: &Value, target: &TypeName) -> Result<Value, EvalError> {
    let out = match value.value_type() {
        ValueType::Bool => return Ok(value.clone()),
        ValueType::Int => value.as_int() != Some(0),
        ValueType::Float => value.as_float() != Some(0.0),
        ValueType::Decimal => value.as_decimal() != Some(Decimal::ZERO),
        ValueType::String | ValueType::Symbol => match value.as_text() {
            // Only a case-insensitive `true` is true; everything else is false.
            Some(text) => text.eq_ignore_ascii_case("true"),
            None => return Err(invalid_cast(value.value_type(), target)),
        },
        from => return Err(invalid_cast(from, target)),
    };
    Ok(Value::bool(out))
}

fn cast_to_int(value: &Value, target: &TypeName) -> Result<Value, EvalError> {
    let from = value.value_type();
    let out = match from {
        ValueType::Bool => i64::from(value.as_bool() == Some(true)),
        ValueType::Int => return Ok(value.clone()),
        ValueType::Float => {
            let f = value.as_float().unwrap_or_default();
            if f.is_nan() {
                return Err(cast_failed(from, target));
            }
            // Truncate toward zero; anything outside the i64 range overflows.
            i64::try_from(f.trunc() as i128)
                .map_err(|_| EvalError::new(EvalErrorCode::IntOverflow))?
        }
        ValueType::Decimal => value
            .as_decimal()
            .unwrap_or_default()
            .trunc()
            .to_string()
            .parse::<i64>()
            .map_err(|_| EvalError::new(EvalErrorCode::IntOverflow))?,
        ValueType::String | ValueType::Symbol => match value.as_text() {
            Some(text) => parse_int_text(text).map_err(|kind| match kind {
                IntTextError::Overflow => EvalError::new(EvalErrorCode::IntOverflow),
                IntTextError::Invalid => cast_failed(from, target),
            })?,
            None => return Err(invalid_cast(from, target)),
        },
        _ => return Err(invalid_cast(from, target)),
    };
    Ok(Value::int(out))
}

fn cast_to_float(value: &Value, target: &TypeName) -> Result<Value, EvalError> {
    let from = value.value_type();
    let out = match from {
        ValueType::Bool => {
            if value.as_bool() == Some(true) {
                1.0
            } else {
                0.0
            }
        }
        ValueType::Int => value.as_int().unwrap_or_default() as f64,
        ValueType::Float => return Ok(value.clone()),
        ValueType::Decimal => decimal_to_f64(value.as_decimal().unwrap_or_default())
            .ok_or_else(|| cast_failed(from, target))?,
        ValueType::String | ValueType::Symbol => match value.as_text() {
            Some(text) => f64::from_str(text.trim()).map_err(|_| cast_failed(from, target))?,
            None => return Err(invalid_cast(from, target)),
        },
        _ => return Err(invalid_cast(from, target)),
    };
    Ok(Value::float(out))
}

fn cast_to_decimal(value: &Value, target: &TypeName) -> Result<Value, EvalError> {
    let from = value.value_type();
    let out = match from {
        ValueType::Bool => {
            if value.as_bool() == Some(true) {
                Decimal::ONE
            } else {
                Decimal::ZERO
            }
        }
        ValueType::Int => Decimal::from(value.as_int().unwrap_or_default()),
        ValueType::Float => Decimal::from_f64(value.as_float().unwrap_or_default())
            .ok_or_else(|| cast_failed(from, target))?,
        ValueType::Decimal => return Ok(value.clone()),
        ValueType::String | ValueType::Symbol => match value.as_text() {
            Some(text) => {
                let trimmed = text.trim();
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .map_err(|_| cast_failed(from, target))?
            }
            None => return Err(invalid_cast(from, target)),
        },
        _ => return Err(invalid_cast(from, target)),
    };
    Ok(Value::decimal(out))
}

/// Textual form for STRING and SYMBOL targets.
fn cast_to_text(value: &Value, target: &TypeName) -> Result<String, EvalError> {
    let from = value.value_type();
    match from {
        ValueType::Bool => Ok(if value.as_bool() == Some(true) {
            "true".to_string()
        } else {
            "false".to_string()
        }),
        ValueType::Int => Ok(value.as_int().unwrap_or_default().to_string()),
        ValueType::Float => Ok(format!("{:e}", value.as_float().unwrap_or_default())),
        ValueType::Decimal => Ok(value.as_decimal().unwrap_or_default().to_string()),
        ValueType::Timestamp => match value.as_timestamp() {
            Some(ts) => Ok(ts.to_string()),
            None => Err(invalid_cast(from, target)),
        },
        ValueType::String | ValueType::Symbol => {
            Ok(value.as_text().unwrap_or_default().to_string())
        }
        _ => Err(invalid_cast(from, target)),
    }
}

/// Sequences re-wrap as a lazy sequence with the target container type.
fn cast_to_sequence(
    value: &Value,
    container: ContainerType,
    target: &TypeName,
) -> Result<Value, EvalError> {
    match value.elements() {
        Some(elements) => {
            let seq = SequenceValue::from_vec(container, elements.to_vec());
            Ok(seq.into_value())
        }
        None => Err(invalid_cast(value.value_type(), target)),
    }
}

enum IntTextError {
    Invalid,
    Overflow,
}

/// Base-10, or `0x…`/`0b…` with an optional sign; leading zeros stripped
/// by the parse itself.
fn parse_int_text(text: &str) -> Result<i64, IntTextError> {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (radix, body) = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(bin) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (2, bin)
    } else {
        (10, rest)
    };

    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return Err(IntTextError::Invalid);
    }

    // Parse wide, then narrow: digit strings beyond i64 are overflows, not
    // malformed input.
    let magnitude = i128::from_str_radix(body, radix).map_err(|_| IntTextError::Overflow)?;
    let signed = if negative { -magnitude } else { magnitude };
    i64::try_from(signed).map_err(|_| IntTextError::Overflow)
}

fn invalid_cast(from: ValueType, target: &TypeName) -> EvalError {
    EvalError::new(EvalErrorCode::InvalidCastNoLocation)
        .with(
            Property::CastFrom,
            PropertyValue::Text(from.name().to_uppercase()),
        )
        .with(
            Property::CastTo,
            PropertyValue::Text(target.ty.name().to_uppercase()),
        )
}

fn cast_failed(from: ValueType, target: &TypeName) -> EvalError {
    EvalError::new(EvalErrorCode::CastFailedNoLocation)
        .with(
            Property::CastFrom,
            PropertyValue::Text(from.name().to_uppercase()),
        )
        .with(
            Property::CastTo,
            PropertyValue::Text(target.ty.name().to_uppercase()),
        )
}
