//! Value facts supplied by the partial evaluator.
//!
//! The abstract interpreter that computes return and parameter values lives outside this
//! crate; this core only reads its results. A [`Value`] is either unknown or a proven
//! single concrete value, and [`Value::is_particular`] is the only question the filters
//! ever ask of it.

/// A concrete constant the partial evaluator proved for a value slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// A 32-bit integer constant (also booleans, bytes, shorts, chars)
    Int(i32),
    /// A 64-bit integer constant
    Long(i64),
    /// A 32-bit floating point constant
    Float(f32),
    /// A 64-bit floating point constant
    Double(f64),
    /// The null reference
    Null,
    /// A string constant
    Str(String),
}

/// The analysis result for a single return or parameter slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Nothing is known about the slot; the conservative default.
    #[default]
    Unknown,
    /// The analysis proved a single concrete value for the slot.
    Particular(ConstValue),
}

impl Value {
    /// Whether the analysis proved a single concrete value for this slot.
    #[must_use]
    pub const fn is_particular(&self) -> bool {
        matches!(self, Self::Particular(_))
    }

    /// The proven concrete value, if there is one.
    #[must_use]
    pub const fn particular(&self) -> Option<&ConstValue> {
        match self {
            Self::Particular(value) => Some(value),
            Self::Unknown => None,
        }
    }
}
