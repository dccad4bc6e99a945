//! Type system for GraphFS property values.

mod value;

pub use value::Value;
