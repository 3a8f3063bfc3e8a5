use std::fmt;
use std::rc::Rc;

use rust_decimal::Decimal;

use crate::timestamp::Timestamp;

/// The closed set of runtime value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Missing,
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    Timestamp,
    Symbol,
    String,
    Clob,
    Blob,
    List,
    Sexp,
    Bag,
    Struct,
}

impl ValueType {
    /// Lower-case name as used in the document text form and error properties.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Missing => "missing",
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Decimal => "decimal",
            ValueType::Timestamp => "timestamp",
            ValueType::Symbol => "symbol",
            ValueType::String => "string",
            ValueType::Clob => "clob",
            ValueType::Blob => "blob",
            ValueType::List => "list",
            ValueType::Sexp => "sexp",
            ValueType::Bag => "bag",
            ValueType::Struct => "struct",
        }
    }

    /// Whether values of this type iterate child elements.
    pub fn is_sequence(&self) -> bool {
        matches!(self, ValueType::List | ValueType::Sexp | ValueType::Bag)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The payload of a value. Shared behind `Rc`; never mutated after creation.
#[derive(Debug)]
pub(crate) enum Data {
    Missing,
    /// A typed null carrying its declared type. A plain `null` is
    /// `Null(ValueType::Null)`.
    Null(ValueType),
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Timestamp(Timestamp),
    Symbol(String),
    String(String),
    Clob(Vec<u8>),
    Blob(Vec<u8>),
    List(Vec<Value>),
    Sexp(Vec<Value>),
    Bag(Vec<Value>),
    /// Fields in insertion order. Duplicate names are allowed.
    Struct(Vec<(String, Value)>),
}

/// Optional capabilities carried alongside a value.
///
/// Facets never alter the payload; wrapping a value with one facet keeps
/// every facet already attached.
#[derive(Debug, Clone, Default)]
pub(crate) struct Facets {
    /// `Named`: a one-shot name, itself a value.
    pub(crate) name: Option<Rc<Value>>,
    /// `OrderedBindNames`: ordered bind names for positional reference.
    pub(crate) ordered_names: Option<Rc<Vec<String>>>,
}

/// A runtime document value: a shared immutable payload plus facets.
///
/// Cloning is cheap (reference-counted payload). Equality is deliberately
/// not derived; use [`crate::pts_eq`] or the evaluator's SQL comparison.
#[derive(Debug, Clone)]
pub struct Value {
    pub(crate) data: Rc<Data>,
    pub(crate) facets: Facets,
}

impl Value {
    fn from_data(data: Data) -> Self {
        Self {
            data: Rc::new(data),
            facets: Facets::default(),
        }
    }

    // ── Constructors ───────────────────────────────────────────────────

    pub fn missing() -> Self {
        Self::from_data(Data::Missing)
    }

    pub fn null() -> Self {
        Self::from_data(Data::Null(ValueType::Null))
    }

    /// A typed null of the given declared type.
    pub fn typed_null(ty: ValueType) -> Self {
        match ty {
            ValueType::Missing => Self::missing(),
            _ => Self::from_data(Data::Null(ty)),
        }
    }

    pub fn bool(b: bool) -> Self {
        Self::from_data(Data::Bool(b))
    }

    pub fn int(n: i64) -> Self {
        Self::from_data(Data::Int(n))
    }

    pub fn float(f: f64) -> Self {
        Self::from_data(Data::Float(f))
    }

    pub fn decimal(d: Decimal) -> Self {
        Self::from_data(Data::Decimal(d))
    }

    pub fn timestamp(ts: Timestamp) -> Self {
        Self::from_data(Data::Timestamp(ts))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::from_data(Data::String(s.into()))
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Self::from_data(Data::Symbol(s.into()))
    }

    pub fn clob(bytes: Vec<u8>) -> Self {
        Self::from_data(Data::Clob(bytes))
    }

    pub fn blob(bytes: Vec<u8>) -> Self {
        Self::from_data(Data::Blob(bytes))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Self::from_data(Data::List(items))
    }

    pub fn sexp(items: Vec<Value>) -> Self {
        Self::from_data(Data::Sexp(items))
    }

    pub fn bag(items: Vec<Value>) -> Self {
        Self::from_data(Data::Bag(items))
    }

    pub fn structure(fields: Vec<(String, Value)>) -> Self {
        Self::from_data(Data::Struct(fields))
    }

    // ── Discrimination ─────────────────────────────────────────────────

    /// The type discriminator. Typed nulls report their declared type;
    /// `null.int` is an INT.
    pub fn value_type(&self) -> ValueType {
        match &*self.data {
            Data::Missing => ValueType::Missing,
            Data::Null(ty) => *ty,
            Data::Bool(_) => ValueType::Bool,
            Data::Int(_) => ValueType::Int,
            Data::Float(_) => ValueType::Float,
            Data::Decimal(_) => ValueType::Decimal,
            Data::Timestamp(_) => ValueType::Timestamp,
            Data::Symbol(_) => ValueType::Symbol,
            Data::String(_) => ValueType::String,
            Data::Clob(_) => ValueType::Clob,
            Data::Blob(_) => ValueType::Blob,
            Data::List(_) => ValueType::List,
            Data::Sexp(_) => ValueType::Sexp,
            Data::Bag(_) => ValueType::Bag,
            Data::Struct(_) => ValueType::Struct,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(&*self.data, Data::Missing)
    }

    /// Whether this value is a null of any declared type (MISSING excluded).
    pub fn is_null(&self) -> bool {
        matches!(&*self.data, Data::Null(_))
    }

    pub fn is_null_or_missing(&self) -> bool {
        self.is_null() || self.is_missing()
    }

    pub fn is_sequence(&self) -> bool {
        matches!(
            &*self.data,
            Data::List(_) | Data::Sexp(_) | Data::Bag(_)
        )
    }

    // ── Payload access ─────────────────────────────────────────────────

    pub fn as_bool(&self) -> Option<bool> {
        match &*self.data {
            Data::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match &*self.data {
            Data::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match &*self.data {
            Data::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match &*self.data {
            Data::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match &*self.data {
            Data::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Text payload of a STRING or SYMBOL.
    pub fn as_text(&self) -> Option<&str> {
        match &*self.data {
            Data::String(s) | Data::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Byte payload of a CLOB or BLOB.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &*self.data {
            Data::Clob(b) | Data::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Child elements of a LIST, SEXP, or BAG.
    pub fn elements(&self) -> Option<&[Value]> {
        match &*self.data {
            Data::List(items) | Data::Sexp(items) | Data::Bag(items) => Some(items),
            _ => None,
        }
    }

    /// Fields of a STRUCT in insertion order.
    pub fn fields(&self) -> Option<&[(String, Value)]> {
        match &*self.data {
            Data::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// First field with the given name, if this is a STRUCT.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields()?
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Number of children (sequence elements or struct fields).
    pub fn size(&self) -> Option<usize> {
        match &*self.data {
            Data::List(items) | Data::Sexp(items) | Data::Bag(items) => Some(items.len()),
            Data::Struct(fields) => Some(fields.len()),
            _ => None,
        }
    }

    // ── Facets ─────────────────────────────────────────────────────────

    /// The `Named` facet, if attached.
    pub fn name(&self) -> Option<&Value> {
        self.facets.name.as_deref()
    }

    /// Attach a `Named` facet, keeping every other facet.
    pub fn with_name(&self, name: Value) -> Value {
        let mut out = self.clone();
        out.facets.name = Some(Rc::new(name));
        out
    }

    /// Mask only the `Named` facet; other facets survive.
    pub fn unnamed(&self) -> Value {
        let mut out = self.clone();
        out.facets.name = None;
        out
    }

    /// The `OrderedBindNames` facet, if attached.
    pub fn ordered_names(&self) -> Option<&[String]> {
        self.facets.ordered_names.as_deref().map(|v| v.as_slice())
    }

    /// Attach an `OrderedBindNames` facet, keeping every other facet.
    pub fn with_ordered_names(&self, names: Vec<String>) -> Value {
        let mut out = self.clone();
        out.facets.ordered_names = Some(Rc::new(names));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_null_reports_declared_type() {
        let v = Value::typed_null(ValueType::Int);
        assert_eq!(v.value_type(), ValueType::Int);
        assert!(v.is_null());
        assert!(!v.is_missing());
    }

    #[test]
    fn missing_is_its_own_type() {
        let v = Value::missing();
        assert_eq!(v.value_type(), ValueType::Missing);
        assert!(v.is_missing());
        assert!(!v.is_null());
        assert!(v.is_null_or_missing());
    }

    #[test]
    fn typed_null_of_missing_collapses_to_missing() {
        assert!(Value::typed_null(ValueType::Missing).is_missing());
    }

    #[test]
    fn struct_field_lookup_finds_first_match() {
        let s = Value::structure(vec![
            ("a".into(), Value::int(1)),
            ("a".into(), Value::int(2)),
        ]);
        assert_eq!(s.get_field("a").and_then(Value::as_int), Some(1));
        assert!(s.get_field("b").is_none());
        assert_eq!(s.size(), Some(2));
    }

    #[test]
    fn facets_add_without_losing() {
        let v = Value::int(1)
            .with_name(Value::symbol("col"))
            .with_ordered_names(vec!["col".into()]);
        assert_eq!(v.name().and_then(Value::as_text), Some("col"));
        assert_eq!(v.ordered_names(), Some(&["col".to_string()][..]));
        // Payload untouched.
        assert_eq!(v.as_int(), Some(1));
    }

    #[test]
    fn unnamed_masks_only_the_name() {
        let v = Value::int(1)
            .with_name(Value::symbol("col"))
            .with_ordered_names(vec!["col".into()]);
        let u = v.unnamed();
        assert!(u.name().is_none());
        assert!(u.ordered_names().is_some());
        assert_eq!(u.as_int(), Some(1));
    }

    #[test]
    fn sequence_discrimination() {
        assert!(Value::bag(vec![]).is_sequence());
        assert!(Value::list(vec![]).is_sequence());
        assert!(Value::sexp(vec![]).is_sequence());
        assert!(!Value::structure(vec![]).is_sequence());
        assert!(ValueType::Bag.is_sequence());
    }
}
