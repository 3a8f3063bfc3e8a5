//! Built-in functions reachable through call expressions.
//!
//! `SUBSTRING` and `TRIM` parse as dedicated syntax but lower to calls and
//! land here too. Arguments that are NULL or MISSING make the call return
//! NULL; wrong types or arities raise invalid-arguments.

use docql_common::{EvalError, EvalErrorCode};
use docql_value::{Value, ValueType};

pub(crate) type Builtin = fn(&[Value]) -> Result<Value, EvalError>;

/// Resolve a (lower-cased) function name.
pub(crate) fn lookup(name: &str) -> Option<Builtin> {
    Some(match name {
        "char_length" => char_length,
        "upper" => upper,
        "lower" => lower,
        "size" => size,
        "exists" => exists,
        "substring" => substring,
        "trim" => trim,
        _ => return None,
    })
}

fn invalid() -> EvalError {
    EvalError::new(EvalErrorCode::InvalidArguments)
}

fn any_null(args: &[Value]) -> bool {
    args.iter().any(Value::is_null_or_missing)
}

fn text_arg(args: &[Value], index: usize) -> Result<&str, EvalError> {
    args.get(index).and_then(Value::as_text).ok_or_else(invalid)
}

fn int_arg(args: &[Value], index: usize) -> Result<i64, EvalError> {
    args.get(index).and_then(Value::as_int).ok_or_else(invalid)
}

/// Length of a text value in code points.
fn char_length(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(invalid());
    }
    if any_null(args) {
        return Ok(Value::null());
    }
    let text = text_arg(args, 0)?;
    Ok(Value::int(text.chars().count() as i64))
}

fn upper(args: &[Value]) -> Result<Value, EvalError> {
    map_text(args, str::to_uppercase)
}

fn lower(args: &[Value]) -> Result<Value, EvalError> {
    map_text(args, str::to_lowercase)
}

/// Apply a text transform, preserving the string/symbol distinction.
fn map_text(args: &[Value], transform: fn(&str) -> String) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(invalid());
    }
    if any_null(args) {
        return Ok(Value::null());
    }
    let out = transform(text_arg(args, 0)?);
    Ok(match args[0].value_type() {
        ValueType::Symbol => Value::symbol(out),
        _ => Value::string(out),
    })
}

/// Number of children of a container (sequence elements or struct fields).
fn size(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(invalid());
    }
    if any_null(args) {
        return Ok(Value::null());
    }
    match args[0].size() {
        Some(n) => Ok(Value::int(n as i64)),
        None => Err(invalid()),
    }
}

/// Whether a sequence has at least one element.
fn exists(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(invalid());
    }
    if any_null(args) {
        return Ok(Value::null());
    }
    match args[0].elements() {
        Some(elements) => Ok(Value::bool(!elements.is_empty())),
        None => Err(invalid()),
    }
}

/// SQL-92 SUBSTRING over code points: 1-based start, optional length.
fn substring(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 || args.len() > 3 {
        return Err(invalid());
    }
    if any_null(args) {
        return Ok(Value::null());
    }
    let text = text_arg(args, 0)?;
    let start = int_arg(args, 1)?;
    let length = if args.len() == 3 {
        let length = int_arg(args, 2)?;
        if length < 0 {
            return Err(invalid());
        }
        Some(length)
    } else {
        None
    };

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len() as i64;
    // Positions before 1 exist logically but hold no characters.
    let begin = (start - 1).clamp(0, len);
    let end = match length {
        Some(l) => (start - 1 + l).clamp(begin, len),
        None => len,
    };
    let out: String = chars[begin as usize..end as usize].iter().collect();
    Ok(Value::string(out))
}

/// `trim(kind, [chars], target)`: kind is one of the symbols `leading`,
/// `trailing`, `both`; chars defaults to a single space.
fn trim(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 || args.len() > 3 {
        return Err(invalid());
    }
    let kind = text_arg(args, 0)?;
    if any_null(&args[1..]) {
        return Ok(Value::null());
    }
    let (chars, target) = if args.len() == 3 {
        (text_arg(args, 1)?, text_arg(args, 2)?)
    } else {
        (" ", text_arg(args, 1)?)
    };

    let set: Vec<char> = chars.chars().collect();
    let in_set = |c: char| set.contains(&c);
    let out = match kind {
        "leading" => target.trim_start_matches(in_set),
        "trailing" => target.trim_end_matches(in_set),
        "both" => target.trim_matches(in_set),
        _ => return Err(invalid()),
    };
    Ok(Value::string(out.to_string()))
}
