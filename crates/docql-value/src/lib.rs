// Document value model for the DocQL query engine.
//
// The runtime value (`Value`), its facet capabilities, the lazy sequence
// wrapper the evaluator produces, the document text reader/writer, and the
// type-strict PTS equality used by the conformance harness.

pub mod eq;
pub mod seq;
pub mod text;
pub mod timestamp;
pub mod value;

pub use eq::pts_eq;
pub use seq::{ContainerType, SequenceValue};
pub use text::{parse_value, TextError};
pub use timestamp::{Precision, Timestamp};
pub use value::{Value, ValueType};
