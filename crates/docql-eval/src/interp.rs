//! The tree walker.
//!
//! Walks the typed AST against a binding environment. `FROM` rows are
//! materialized per source and cross-joined with nested loops; WHERE,
//! LIMIT, and projection run per row under a pushed scope.

use std::cmp::Ordering;

use docql_common::{EvalError, EvalErrorCode, Property, PropertyValue};
use docql_parser::ast::{
    BinaryOp, Expr, FromKind, PathComponent, Projection, Select, UnaryOp,
};
use docql_parser::types::{SqlType, TypeName};
use docql_value::{Value, ValueType};

use crate::builtins;
use crate::cast;
use crate::coerce::{self, NumericPair};
use crate::env::Environment;
use crate::like;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Truth {
    True,
    False,
    Unknown,
}

pub(crate) fn eval_expr(expr: &Expr, env: &mut Environment) -> Result<Value, EvalError> {
    match expr {
        Expr::Lit(value) => Ok(value.clone()),
        Expr::Id(name) => env
            .lookup(name)
            .cloned()
            .ok_or_else(|| binding_not_found(name)),
        Expr::LocalId(name) => env
            .lookup_local(name)
            .cloned()
            .ok_or_else(|| binding_not_found(name)),
        Expr::Path(root, components) => eval_path(root, components, env),
        Expr::Call { name, args } => {
            let function = builtins::lookup(name).ok_or_else(|| {
                EvalError::new(EvalErrorCode::Generic)
                    .with(Property::TokenValue, PropertyValue::Text(name.clone()))
            })?;
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_expr(arg, env)?);
            }
            function(&values)
        }
        Expr::Unary(op, operand) => eval_unary(*op, operand, env),
        Expr::Binary(op, left, right) => eval_binary(*op, left, right, env),
        Expr::Like {
            value,
            pattern,
            escape,
        } => eval_like(value, pattern, escape.as_deref(), env),
        Expr::Between {
            value,
            lower,
            upper,
        } => eval_between(value, lower, upper, env),
        Expr::IsType { value, type_name } => {
            let value = eval_expr(value, env)?;
            Ok(Value::bool(is_type(&value, type_name)))
        }
        Expr::Cast { value, type_name } => {
            let value = eval_expr(value, env)?;
            cast::cast(&value, type_name)
        }
        Expr::Case {
            operand,
            whens,
            otherwise,
        } => eval_case(operand.as_deref(), whens, otherwise.as_deref(), env),
        Expr::Struct(fields) => {
            let mut out = Vec::with_capacity(fields.len());
            for (name_expr, value_expr) in fields {
                let name = eval_expr(name_expr, env)?;
                let Some(name) = name.as_text().map(str::to_string) else {
                    return Err(EvalError::new(EvalErrorCode::InvalidArguments));
                };
                let value = eval_expr(value_expr, env)?;
                // MISSING is the absence of a value; it produces no field.
                if !value.is_missing() {
                    out.push((name, value));
                }
            }
            Ok(Value::structure(out))
        }
        Expr::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(eval_expr(item, env)?);
            }
            Ok(Value::list(out))
        }
        Expr::Values(rows) => {
            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                let mut cells = Vec::with_capacity(row.len());
                for cell in row {
                    cells.push(eval_expr(cell, env)?);
                }
                out.push(Value::list(cells));
            }
            Ok(Value::bag(out))
        }
        Expr::Select(select) => eval_select(select, env),
    }
}

// ── FROM iteration ─────────────────────────────────────────────────────

/// Iterate a FROM source: sequences range over their elements; anything
/// else becomes a singleton with its name facet masked so accidental names
/// do not leak into the row binding.
pub(crate) fn range_over(value: &Value) -> Vec<Value> {
    match value.elements() {
        Some(elements) => elements.to_vec(),
        None => vec![value.unnamed()],
    }
}

/// UNPIVOT: one named value per struct field; any non-struct becomes a
/// singleton carrying the synthetic name `_1`.
pub(crate) fn unpivot(value: &Value) -> Vec<Value> {
    match value.fields() {
        Some(fields) => fields
            .iter()
            .map(|(name, field)| field.with_name(Value::symbol(name.clone())))
            .collect(),
        None => vec![value.with_name(Value::symbol("_1"))],
    }
}

fn eval_select(select: &Select, env: &mut Environment) -> Result<Value, EvalError> {
    // GROUP BY, HAVING, and ORDER BY parse but are outside the evaluation
    // core (no aggregation machinery).
    if !select.group_by.is_empty() || select.having.is_some() || !select.order_by.is_empty() {
        return Err(EvalError::new(EvalErrorCode::Generic));
    }

    // Cross-join the sources with nested loops. Later sources are
    // evaluated under the bindings of earlier ones.
    let mut rows: Vec<Vec<(String, Value)>> = vec![Vec::new()];
    for (ordinal, source) in select.from.iter().enumerate() {
        let mut next = Vec::new();
        for row in &rows {
            env.push_scope(row.clone());
            let source_value = eval_expr(&source.expr, env);
            env.pop_scope();
            let source_value = source_value?;

            let items = match source.kind {
                FromKind::Scan => range_over(&source_value),
                FromKind::Unpivot => unpivot(&source_value),
            };
            let alias = source
                .as_alias
                .clone()
                .or_else(|| implicit_alias(&source.expr))
                .unwrap_or_else(|| format!("_{}", ordinal + 1));

            for (index, item) in items.into_iter().enumerate() {
                let mut new_row = row.clone();
                let at_value = source.at_alias.as_ref().map(|_| match source.kind {
                    FromKind::Scan => Value::int(index as i64),
                    FromKind::Unpivot => item
                        .name()
                        .cloned()
                        .unwrap_or_else(|| Value::symbol("_1")),
                });
                new_row.push((alias.clone(), item));
                if let (Some(at), Some(at_value)) = (&source.at_alias, at_value) {
                    new_row.push((at.clone(), at_value));
                }
                next.push(new_row);
            }
        }
        rows = next;
    }

    let mut kept = Vec::new();
    for row in rows {
        let keep = match &select.where_clause {
            Some(condition) => {
                env.push_scope(row.clone());
                let result = eval_expr(condition, env).and_then(|v| truth_of(&v));
                env.pop_scope();
                result? == Truth::True
            }
            None => true,
        };
        if keep {
            kept.push(row);
        }
    }

    if let Some(limit) = &select.limit {
        let n = eval_expr(limit, env)?
            .as_int()
            .filter(|n| *n >= 0)
            .ok_or_else(|| EvalError::new(EvalErrorCode::InvalidArguments))?;
        kept.truncate(n as usize);
    }

    let mut out = Vec::with_capacity(kept.len());
    for row in kept {
        env.push_scope(row.clone());
        let projected = project_row(&select.projection, &row, env);
        env.pop_scope();
        out.push(projected?);
    }
    Ok(Value::bag(out))
}

fn project_row(
    projection: &Projection,
    row: &[(String, Value)],
    env: &mut Environment,
) -> Result<Value, EvalError> {
    match projection {
        // `SELECT *`: a struct composed of the row's environment.
        Projection::Star => Ok(Value::structure(row.to_vec())),
        Projection::List(items) => {
            let mut fields = Vec::with_capacity(items.len());
            for (ordinal, item) in items.iter().enumerate() {
                let value = eval_expr(&item.expr, env)?;
                let name = item
                    .alias
                    .clone()
                    .or_else(|| value.name().and_then(Value::as_text).map(str::to_string))
                    .unwrap_or_else(|| format!("_{}", ordinal + 1));
                fields.push((name, value));
            }
            Ok(Value::structure(fields))
        }
    }
}

/// Default binding name for an unaliased FROM source.
fn implicit_alias(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Id(name) => Some(name.clone()),
        Expr::Path(_, components) => match components.last() {
            Some(PathComponent::Field(name)) => Some(name.clone()),
            _ => None,
        },
        _ => None,
    }
}

// ── Paths ──────────────────────────────────────────────────────────────

fn eval_path(
    root: &Expr,
    components: &[PathComponent],
    env: &mut Environment,
) -> Result<Value, EvalError> {
    let mut current = vec![eval_expr(root, env)?];
    let mut spread = false;

    for component in components {
        match component {
            PathComponent::Field(name) => {
                current = current.iter().map(|v| field_of(v, name)).collect();
            }
            PathComponent::Index(index_expr) => {
                let index = eval_expr(index_expr, env)?;
                let mut next = Vec::with_capacity(current.len());
                for value in &current {
                    next.push(index_of(value, &index)?);
                }
                current = next;
            }
            PathComponent::Wildcard => {
                spread = true;
                current = current.iter().flat_map(|v| range_over(v)).collect();
            }
            PathComponent::UnpivotWildcard => {
                spread = true;
                current = current.iter().flat_map(|v| unpivot(v)).collect();
            }
        }
    }

    if spread {
        Ok(Value::bag(current))
    } else {
        Ok(current
            .pop()
            .expect("non-spread path walks exactly one value"))
    }
}

/// Field access; anything without that field is MISSING.
fn field_of(value: &Value, name: &str) -> Value {
    value
        .get_field(name)
        .cloned()
        .unwrap_or_else(Value::missing)
}

fn index_of(value: &Value, index: &Value) -> Result<Value, EvalError> {
    if let Some(n) = index.as_int() {
        let out = usize::try_from(n)
            .ok()
            .and_then(|i| value.elements()?.get(i).cloned());
        return Ok(out.unwrap_or_else(Value::missing));
    }
    if let Some(name) = index.as_text() {
        return Ok(field_of(value, name));
    }
    Err(EvalError::new(EvalErrorCode::InvalidArguments))
}

// ── Operators ──────────────────────────────────────────────────────────

fn eval_unary(op: UnaryOp, operand: &Expr, env: &mut Environment) -> Result<Value, EvalError> {
    let value = eval_expr(operand, env)?;
    match op {
        UnaryOp::Not => {
            let out = match truth_of(&value)? {
                Truth::True => Truth::False,
                Truth::False => Truth::True,
                Truth::Unknown => Truth::Unknown,
            };
            Ok(truth_value(out))
        }
        UnaryOp::Pos => {
            if value.is_null_or_missing() {
                return Ok(Value::null());
            }
            match value.value_type() {
                ValueType::Int | ValueType::Float | ValueType::Decimal => Ok(value),
                _ => Err(EvalError::new(EvalErrorCode::InvalidArguments)),
            }
        }
        UnaryOp::Neg => {
            if value.is_null_or_missing() {
                return Ok(Value::null());
            }
            match value.value_type() {
                ValueType::Int => value
                    .as_int()
                    .and_then(i64::checked_neg)
                    .map(Value::int)
                    .ok_or_else(|| EvalError::new(EvalErrorCode::IntOverflow)),
                ValueType::Float => Ok(Value::float(-value.as_float().unwrap_or_default())),
                ValueType::Decimal => Ok(Value::decimal(-value.as_decimal().unwrap_or_default())),
                _ => Err(EvalError::new(EvalErrorCode::InvalidArguments)),
            }
        }
    }
}

fn eval_binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    env: &mut Environment,
) -> Result<Value, EvalError> {
    match op {
        BinaryOp::And => {
            let l = truth_of(&eval_expr(left, env)?)?;
            if l == Truth::False {
                return Ok(Value::bool(false));
            }
            let r = truth_of(&eval_expr(right, env)?)?;
            Ok(truth_value(match (l, r) {
                (_, Truth::False) => Truth::False,
                (Truth::True, Truth::True) => Truth::True,
                _ => Truth::Unknown,
            }))
        }
        BinaryOp::Or => {
            let l = truth_of(&eval_expr(left, env)?)?;
            if l == Truth::True {
                return Ok(Value::bool(true));
            }
            let r = truth_of(&eval_expr(right, env)?)?;
            Ok(truth_value(match (l, r) {
                (_, Truth::True) => Truth::True,
                (Truth::False, Truth::False) => Truth::False,
                _ => Truth::Unknown,
            }))
        }
        BinaryOp::Eq | BinaryOp::Ne => {
            let l = eval_expr(left, env)?;
            let r = eval_expr(right, env)?;
            if l.is_null_or_missing() || r.is_null_or_missing() {
                return Ok(Value::null());
            }
            let equal = values_equal(&l, &r)?;
            Ok(Value::bool(if op == BinaryOp::Eq { equal } else { !equal }))
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let l = eval_expr(left, env)?;
            let r = eval_expr(right, env)?;
            if l.is_null_or_missing() || r.is_null_or_missing() {
                return Ok(Value::null());
            }
            let out = match compare_values(&l, &r)? {
                // NaN comparisons are all false.
                None => false,
                Some(ordering) => match op {
                    BinaryOp::Lt => ordering == Ordering::Less,
                    BinaryOp::Le => ordering != Ordering::Greater,
                    BinaryOp::Gt => ordering == Ordering::Greater,
                    BinaryOp::Ge => ordering != Ordering::Less,
                    _ => unreachable!("comparison operator"),
                },
            };
            Ok(Value::bool(out))
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            let l = eval_expr(left, env)?;
            let r = eval_expr(right, env)?;
            eval_arith(op, &l, &r)
        }
        BinaryOp::Concat => {
            let l = eval_expr(left, env)?;
            let r = eval_expr(right, env)?;
            if l.is_null_or_missing() || r.is_null_or_missing() {
                return Ok(Value::null());
            }
            match (l.as_text(), r.as_text()) {
                (Some(a), Some(b)) => Ok(Value::string(format!("{a}{b}"))),
                _ => Err(EvalError::new(EvalErrorCode::InvalidArguments)),
            }
        }
        BinaryOp::In => {
            let l = eval_expr(left, env)?;
            let r = eval_expr(right, env)?;
            if l.is_null_or_missing() || r.is_null_or_missing() {
                return Ok(Value::null());
            }
            let Some(elements) = r.elements() else {
                return Err(EvalError::new(EvalErrorCode::InvalidArguments));
            };
            for element in elements {
                if !element.is_null_or_missing() && values_equal(&l, element)? {
                    return Ok(Value::bool(true));
                }
            }
            Ok(Value::bool(false))
        }
    }
}

fn eval_arith(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    if left.is_null_or_missing() || right.is_null_or_missing() {
        return Ok(Value::null());
    }
    let Some(pair) = coerce::coerce(left, right)? else {
        return Err(EvalError::new(EvalErrorCode::InvalidArguments));
    };
    match pair {
        NumericPair::Int(a, b) => {
            if b == 0 && (op == BinaryOp::Div || op == BinaryOp::Mod) {
                return Err(EvalError::new(EvalErrorCode::Generic));
            }
            let out = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                BinaryOp::Div => a.checked_div(b),
                BinaryOp::Mod => a.checked_rem(b),
                _ => unreachable!("arithmetic operator"),
            };
            out.map(Value::int)
                .ok_or_else(|| EvalError::new(EvalErrorCode::IntOverflow))
        }
        NumericPair::Float(a, b) => {
            let out = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Mod => a % b,
                _ => unreachable!("arithmetic operator"),
            };
            Ok(Value::float(out))
        }
        NumericPair::Decimal(a, b) => {
            let out = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                BinaryOp::Div => a.checked_div(b),
                BinaryOp::Mod => a.checked_rem(b),
                _ => unreachable!("arithmetic operator"),
            };
            out.map(Value::decimal)
                .ok_or_else(|| EvalError::new(EvalErrorCode::Generic))
        }
    }
}

fn eval_like(
    value_expr: &Expr,
    pattern_expr: &Expr,
    escape_expr: Option<&Expr>,
    env: &mut Environment,
) -> Result<Value, EvalError> {
    let value = eval_expr(value_expr, env)?;
    let pattern = eval_expr(pattern_expr, env)?;
    let escape = match escape_expr {
        Some(expr) => Some(eval_expr(expr, env)?),
        None => None,
    };

    if value.is_null_or_missing()
        || pattern.is_null_or_missing()
        || escape.as_ref().is_some_and(Value::is_null_or_missing)
    {
        return Ok(Value::null());
    }

    let (Some(text), Some(pattern_text)) = (value.as_text(), pattern.as_text()) else {
        return Err(EvalError::new(EvalErrorCode::InvalidArguments));
    };
    let escape_char = match &escape {
        Some(value) => {
            let Some(text) = value.as_text() else {
                return Err(EvalError::new(EvalErrorCode::InvalidArguments));
            };
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => return Err(EvalError::new(EvalErrorCode::InvalidArguments)),
            }
        }
        None => None,
    };

    let parts = like::compile(pattern_text, escape_char)?;
    Ok(Value::bool(like::matches(&parts, text)))
}

fn eval_between(
    value_expr: &Expr,
    lower_expr: &Expr,
    upper_expr: &Expr,
    env: &mut Environment,
) -> Result<Value, EvalError> {
    let value = eval_expr(value_expr, env)?;
    let lower = eval_expr(lower_expr, env)?;
    let upper = eval_expr(upper_expr, env)?;
    if value.is_null_or_missing() || lower.is_null_or_missing() || upper.is_null_or_missing() {
        return Ok(Value::null());
    }
    let ge_lower = matches!(compare_values(&value, &lower)?, Some(o) if o != Ordering::Less);
    let le_upper = matches!(compare_values(&value, &upper)?, Some(o) if o != Ordering::Greater);
    Ok(Value::bool(ge_lower && le_upper))
}

fn eval_case(
    operand: Option<&Expr>,
    whens: &[(Expr, Expr)],
    otherwise: Option<&Expr>,
    env: &mut Environment,
) -> Result<Value, EvalError> {
    match operand {
        Some(operand) => {
            let subject = eval_expr(operand, env)?;
            for (candidate, result) in whens {
                let candidate = eval_expr(candidate, env)?;
                if subject.is_null_or_missing() || candidate.is_null_or_missing() {
                    continue;
                }
                if values_equal(&subject, &candidate)? {
                    return eval_expr(result, env);
                }
            }
        }
        None => {
            for (condition, result) in whens {
                let condition = eval_expr(condition, env)?;
                if truth_of(&condition)? == Truth::True {
                    return eval_expr(result, env);
                }
            }
        }
    }
    match otherwise {
        Some(otherwise) => eval_expr(otherwise, env),
        None => Ok(Value::null()),
    }
}

fn is_type(value: &Value, type_name: &TypeName) -> bool {
    match type_name.ty {
        SqlType::Missing => value.is_missing(),
        // MISSING satisfies IS NULL.
        SqlType::Null => value.is_null_or_missing(),
        ty => value.value_type() == ty.value_type(),
    }
}

// ── Three-valued logic and comparison ──────────────────────────────────

fn truth_of(value: &Value) -> Result<Truth, EvalError> {
    if value.is_null_or_missing() {
        return Ok(Truth::Unknown);
    }
    match value.as_bool() {
        Some(true) => Ok(Truth::True),
        Some(false) => Ok(Truth::False),
        None => Err(EvalError::new(EvalErrorCode::InvalidArguments)),
    }
}

fn truth_value(truth: Truth) -> Value {
    match truth {
        Truth::True => Value::bool(true),
        Truth::False => Value::bool(false),
        Truth::Unknown => Value::null(),
    }
}

/// SQL `=` on non-null operands: numeric pairs coerce up the ladder,
/// containers compare structurally, mismatched types are unequal.
fn values_equal(left: &Value, right: &Value) -> Result<bool, EvalError> {
    // Inside containers nulls are values; compare them before numeric
    // coercion so a typed null never reads as zero.
    if left.is_missing() && right.is_missing() {
        return Ok(true);
    }
    if left.is_null() && right.is_null() {
        return Ok(true);
    }
    if left.is_null_or_missing() || right.is_null_or_missing() {
        return Ok(false);
    }
    if let Some(pair) = coerce::coerce(left, right)? {
        return Ok(coerce::equal(pair));
    }
    if left.value_type() != right.value_type() {
        return Ok(false);
    }
    match left.value_type() {
        ValueType::Bool => Ok(left.as_bool() == right.as_bool()),
        ValueType::String | ValueType::Symbol => Ok(left.as_text() == right.as_text()),
        ValueType::Clob | ValueType::Blob => Ok(left.as_bytes() == right.as_bytes()),
        ValueType::Timestamp => Ok(left.as_timestamp() == right.as_timestamp()),
        ValueType::List | ValueType::Sexp => {
            let (Some(xs), Some(ys)) = (left.elements(), right.elements()) else {
                return Ok(false);
            };
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for (x, y) in xs.iter().zip(ys) {
                if !values_equal(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        ValueType::Bag => {
            let (Some(xs), Some(ys)) = (left.elements(), right.elements()) else {
                return Ok(false);
            };
            multiset_equal(xs, ys)
        }
        ValueType::Struct => {
            let (Some(xs), Some(ys)) = (left.fields(), right.fields()) else {
                return Ok(false);
            };
            if xs.len() != ys.len() {
                return Ok(false);
            }
            let mut used = vec![false; ys.len()];
            'outer: for (name, x) in xs {
                for (i, (other, y)) in ys.iter().enumerate() {
                    if !used[i] && name == other && values_equal(x, y)? {
                        used[i] = true;
                        continue 'outer;
                    }
                }
                return Ok(false);
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn multiset_equal(xs: &[Value], ys: &[Value]) -> Result<bool, EvalError> {
    if xs.len() != ys.len() {
        return Ok(false);
    }
    let mut used = vec![false; ys.len()];
    'outer: for x in xs {
        for (i, y) in ys.iter().enumerate() {
            if !used[i] && values_equal(x, y)? {
                used[i] = true;
                continue 'outer;
            }
        }
        return Ok(false);
    }
    Ok(true)
}

/// Ordering for `<`/`<=`/`>`/`>=` and BETWEEN. `None` means unordered
/// (a NaN was involved); incomparable types are an error.
fn compare_values(left: &Value, right: &Value) -> Result<Option<Ordering>, EvalError> {
    if let Some(pair) = coerce::coerce(left, right)? {
        return Ok(coerce::compare(pair));
    }
    match (left.value_type(), right.value_type()) {
        (ValueType::String, ValueType::String) | (ValueType::Symbol, ValueType::Symbol) => {
            Ok(left.as_text().partial_cmp(&right.as_text()))
        }
        (ValueType::Timestamp, ValueType::Timestamp) => {
            Ok(left.as_timestamp().partial_cmp(&right.as_timestamp()))
        }
        (ValueType::Bool, ValueType::Bool) => Ok(left.as_bool().partial_cmp(&right.as_bool())),
        _ => Err(EvalError::new(EvalErrorCode::InvalidArguments)),
    }
}

fn binding_not_found(name: &str) -> EvalError {
    // The unresolved name travels in TOKEN_VALUE.
    EvalError::new(EvalErrorCode::BindingNotFound)
        .with(Property::TokenValue, PropertyValue::Text(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_over_a_sequence_yields_its_elements() {
        let list = Value::list(vec![Value::int(1), Value::int(2)]);
        assert_eq!(range_over(&list).len(), 2);
    }

    #[test]
    fn range_over_a_non_sequence_yields_one_unnamed_element() {
        let named = Value::int(5).with_name(Value::symbol("x"));
        let items = range_over(&named);
        assert_eq!(items.len(), 1);
        assert!(items[0].name().is_none());
        assert_eq!(items[0].as_int(), Some(5));
    }

    #[test]
    fn unpivot_size_matches_struct_size_and_names_are_symbols() {
        let s = Value::structure(vec![
            ("a".into(), Value::int(1)),
            ("b".into(), Value::int(2)),
        ]);
        let items = unpivot(&s);
        assert_eq!(Some(items.len()), s.size());
        for item in &items {
            let name = item.name().expect("unpivot elements carry a name");
            assert_eq!(name.value_type(), ValueType::Symbol);
        }
    }

    #[test]
    fn unpivot_of_non_struct_is_a_singleton_named_underscore_one() {
        let items = unpivot(&Value::int(9));
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].name().and_then(Value::as_text),
            Some("_1")
        );
    }

    #[test]
    fn truth_of_three_values() {
        assert_eq!(truth_of(&Value::bool(true)).unwrap(), Truth::True);
        assert_eq!(truth_of(&Value::bool(false)).unwrap(), Truth::False);
        assert_eq!(truth_of(&Value::null()).unwrap(), Truth::Unknown);
        assert_eq!(truth_of(&Value::missing()).unwrap(), Truth::Unknown);
        assert!(truth_of(&Value::int(1)).is_err());
    }
}
