use std::fmt;

use crate::value::{Value, ValueType};

/// Target container type of a lazy sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerType {
    List,
    Sexp,
    Bag,
}

impl ContainerType {
    pub fn value_type(&self) -> ValueType {
        match self {
            ContainerType::List => ValueType::List,
            ContainerType::Sexp => ValueType::Sexp,
            ContainerType::Bag => ValueType::Bag,
        }
    }

    /// The container type for a sequence value type, if it is one.
    pub fn of(ty: ValueType) -> Option<ContainerType> {
        match ty {
            ValueType::List => Some(ContainerType::List),
            ValueType::Sexp => Some(ContainerType::Sexp),
            ValueType::Bag => Some(ContainerType::Bag),
            _ => None,
        }
    }
}

/// A lazy, single-pass sequence of values with a target container type.
///
/// The evaluator produces these instead of materialized containers so that
/// `FROM` pipelines stream. Every consuming operation takes `self`, so a
/// sequence can be traversed at most once; re-iteration is unrepresentable.
pub struct SequenceValue {
    target: ContainerType,
    iter: Box<dyn Iterator<Item = Value>>,
}

impl SequenceValue {
    pub fn new(target: ContainerType, iter: impl Iterator<Item = Value> + 'static) -> Self {
        Self {
            target,
            iter: Box::new(iter),
        }
    }

    pub fn from_vec(target: ContainerType, items: Vec<Value>) -> Self {
        Self::new(target, items.into_iter())
    }

    pub fn target(&self) -> ContainerType {
        self.target
    }

    /// Drain the sequence into a materialized container value.
    pub fn into_value(self) -> Value {
        let items: Vec<Value> = self.iter.collect();
        match self.target {
            ContainerType::List => Value::list(items),
            ContainerType::Sexp => Value::sexp(items),
            ContainerType::Bag => Value::bag(items),
        }
    }
}

impl IntoIterator for SequenceValue {
    type Item = Value;
    type IntoIter = Box<dyn Iterator<Item = Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter
    }
}

impl fmt::Debug for SequenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceValue")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materializes_to_target_container() {
        let seq = SequenceValue::from_vec(ContainerType::Bag, vec![Value::int(1), Value::int(2)]);
        let v = seq.into_value();
        assert_eq!(v.value_type(), ValueType::Bag);
        assert_eq!(v.size(), Some(2));
    }

    #[test]
    fn streams_lazily() {
        // The iterator is not consumed until materialization asks for it.
        let counter = std::rc::Rc::new(std::cell::Cell::new(0));
        let seen = counter.clone();
        let seq = SequenceValue::new(
            ContainerType::List,
            (0..3).map(move |n| {
                seen.set(seen.get() + 1);
                Value::int(n)
            }),
        );
        assert_eq!(counter.get(), 0);
        let v = seq.into_value();
        assert_eq!(counter.get(), 3);
        assert_eq!(v.value_type(), ValueType::List);
    }

    #[test]
    fn container_type_round_trip() {
        assert_eq!(ContainerType::of(ValueType::Bag), Some(ContainerType::Bag));
        assert_eq!(ContainerType::of(ValueType::Int), None);
        assert_eq!(ContainerType::Sexp.value_type(), ValueType::Sexp);
    }
}
