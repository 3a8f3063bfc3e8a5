//! SQL type names for `CAST` and `IS`, with their parameter arities.

use docql_value::{Value, ValueType};

/// A type name usable as a `CAST` target or `IS` right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Boolean,
    SmallInt,
    Integer,
    Float,
    Real,
    Decimal,
    Numeric,
    Timestamp,
    Char,
    Varchar,
    String,
    Symbol,
    Clob,
    Blob,
    List,
    Sexp,
    Bag,
    Struct,
    Null,
    Missing,
}

impl SqlType {
    /// Resolve a (lower-cased) word to a type name.
    pub fn from_name(name: &str) -> Option<SqlType> {
        Some(match name {
            "bool" | "boolean" => SqlType::Boolean,
            "smallint" => SqlType::SmallInt,
            "int" | "integer" => SqlType::Integer,
            "float" => SqlType::Float,
            "real" => SqlType::Real,
            "decimal" => SqlType::Decimal,
            "numeric" => SqlType::Numeric,
            "timestamp" => SqlType::Timestamp,
            "char" | "character" => SqlType::Char,
            "varchar" => SqlType::Varchar,
            "string" => SqlType::String,
            "symbol" => SqlType::Symbol,
            "clob" => SqlType::Clob,
            "blob" => SqlType::Blob,
            "list" => SqlType::List,
            "sexp" => SqlType::Sexp,
            "bag" => SqlType::Bag,
            "struct" | "tuple" => SqlType::Struct,
            "null" => SqlType::Null,
            "missing" => SqlType::Missing,
            _ => return None,
        })
    }

    /// Canonical name used in the AST and in `CAST_TO` properties.
    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Boolean => "boolean",
            SqlType::SmallInt => "smallint",
            SqlType::Integer => "integer",
            SqlType::Float => "float",
            SqlType::Real => "real",
            SqlType::Decimal => "decimal",
            SqlType::Numeric => "numeric",
            SqlType::Timestamp => "timestamp",
            SqlType::Char => "char",
            SqlType::Varchar => "varchar",
            SqlType::String => "string",
            SqlType::Symbol => "symbol",
            SqlType::Clob => "clob",
            SqlType::Blob => "blob",
            SqlType::List => "list",
            SqlType::Sexp => "sexp",
            SqlType::Bag => "bag",
            SqlType::Struct => "struct",
            SqlType::Null => "null",
            SqlType::Missing => "missing",
        }
    }

    /// Accepted count of type parameters, as an inclusive range.
    pub fn arity(&self) -> (usize, usize) {
        match self {
            // VARCHAR requires its length; CHAR, FLOAT, and REAL take an
            // optional one; DECIMAL and NUMERIC take precision and scale.
            SqlType::Varchar => (1, 1),
            SqlType::Char | SqlType::Float | SqlType::Real => (0, 1),
            SqlType::Decimal | SqlType::Numeric => (0, 2),
            _ => (0, 0),
        }
    }

    /// The runtime type values of this SQL type have.
    pub fn value_type(&self) -> ValueType {
        match self {
            SqlType::Boolean => ValueType::Bool,
            SqlType::SmallInt | SqlType::Integer => ValueType::Int,
            SqlType::Float | SqlType::Real => ValueType::Float,
            SqlType::Decimal | SqlType::Numeric => ValueType::Decimal,
            SqlType::Timestamp => ValueType::Timestamp,
            SqlType::Char | SqlType::Varchar | SqlType::String => ValueType::String,
            SqlType::Symbol => ValueType::Symbol,
            SqlType::Clob => ValueType::Clob,
            SqlType::Blob => ValueType::Blob,
            SqlType::List => ValueType::List,
            SqlType::Sexp => ValueType::Sexp,
            SqlType::Bag => ValueType::Bag,
            SqlType::Struct => ValueType::Struct,
            SqlType::Null => ValueType::Null,
            SqlType::Missing => ValueType::Missing,
        }
    }
}

/// A resolved type name with its parsed parameters, e.g. `varchar(10)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub ty: SqlType,
    pub params: Vec<i64>,
}

impl TypeName {
    pub fn new(ty: SqlType, params: Vec<i64>) -> Self {
        Self { ty, params }
    }

    /// `(type name param …)` in the document form.
    pub fn to_sexp(&self) -> Value {
        let mut items = vec![Value::symbol("type"), Value::symbol(self.ty.name())];
        items.extend(self.params.iter().map(|p| Value::int(*p)));
        Value::sexp(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_aliases() {
        assert_eq!(SqlType::from_name("int"), Some(SqlType::Integer));
        assert_eq!(SqlType::from_name("integer"), Some(SqlType::Integer));
        assert_eq!(SqlType::from_name("tuple"), Some(SqlType::Struct));
        assert_eq!(SqlType::from_name("varchar"), Some(SqlType::Varchar));
        assert_eq!(SqlType::from_name("nope"), None);
    }

    #[test]
    fn arities() {
        assert_eq!(SqlType::Integer.arity(), (0, 0));
        assert_eq!(SqlType::Varchar.arity(), (1, 1));
        assert_eq!(SqlType::Decimal.arity(), (0, 2));
    }

    #[test]
    fn type_name_sexp() {
        let t = TypeName::new(SqlType::Varchar, vec![10]);
        assert_eq!(t.to_sexp().to_string(), "(type varchar 10)");
    }
}
