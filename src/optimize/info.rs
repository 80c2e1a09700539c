//! Optimization info records attached to classes, fields, methods, and code attributes.
//!
//! Each entity kind carries a strongly typed, optional info slot. The slot starts empty
//! (`Unmarked`); the marking pass installs an info record, after which the entity is either
//! kept or removable. Installing always replaces the whole record and bumps the slot's
//! revision counter - in-place mutation through the slot is not offered, so a revision
//! change is the invalidation signal.
//!
//! Every info kind is a two-variant union:
//!
//! - [`Kept`](MethodOptimizationInfo::Kept) - the immutable conservative sentinel. Library
//!   entities are seeded with it when they enter the pool, and the keep marker installs it
//!   to force-preserve a program entity. Side effects are assumed, no values are known.
//! - `Program(..)` - the richer, replaceable fact record for a program entity under
//!   analysis.

use crate::optimize::value::Value;

/// A typed optimization-info slot with an explicit revision counter.
///
/// The counter starts at zero for an unmarked entity and increases by exactly one per
/// install, so propagation logic can detect "already replaced this pass" without relying
/// on allocation identity.
#[derive(Debug, Clone)]
pub struct InfoSlot<T> {
    value: Option<T>,
    revision: u32,
}

impl<T> InfoSlot<T> {
    pub(crate) const fn empty() -> Self {
        Self {
            value: None,
            revision: 0,
        }
    }

    /// Installs a new info record, unconditionally replacing any prior value
    /// and bumping the revision.
    pub fn install(&mut self, value: T) {
        self.value = Some(value);
        self.revision += 1;
    }

    /// The currently installed info record, if any.
    #[must_use]
    pub const fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// How many times an info record has been installed on this slot.
    #[must_use]
    pub const fn revision(&self) -> u32 {
        self.revision
    }
}

impl<T> Default for InfoSlot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Optimization facts for a class.
#[derive(Debug, Clone)]
pub enum ClassOptimizationInfo {
    /// Conservative sentinel: the class must survive optimization unchanged.
    Kept,
    /// Replaceable facts for a program class.
    Program(ProgramClassOptimizationInfo),
}

impl ClassOptimizationInfo {
    /// Whether the class is marked as required to survive optimization.
    #[must_use]
    pub const fn is_kept(&self) -> bool {
        match self {
            Self::Kept => true,
            Self::Program(info) => info.kept,
        }
    }
}

/// Mutable-by-replacement facts for a program class.
#[derive(Debug, Clone, Default)]
pub struct ProgramClassOptimizationInfo {
    /// Whether the class must survive optimization unchanged
    pub kept: bool,
    /// Whether any reachable code instantiates the class
    pub is_instantiated: bool,
    /// Whether loading and initializing the class is proven side-effect free
    pub has_no_side_effects: bool,
}

/// Optimization facts for a field.
#[derive(Debug, Clone)]
pub enum FieldOptimizationInfo {
    /// Conservative sentinel: the field must survive optimization unchanged.
    Kept,
    /// Replaceable facts for a program field.
    Program(ProgramFieldOptimizationInfo),
}

impl FieldOptimizationInfo {
    /// Whether the field is marked as required to survive optimization.
    #[must_use]
    pub const fn is_kept(&self) -> bool {
        match self {
            Self::Kept => true,
            Self::Program(info) => info.kept,
        }
    }

    /// The proven value of the field, if the analysis computed one.
    ///
    /// The kept sentinel carries no value facts.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Kept => None,
            Self::Program(info) => Some(&info.value),
        }
    }
}

/// Mutable-by-replacement facts for a program field.
#[derive(Debug, Clone, Default)]
pub struct ProgramFieldOptimizationInfo {
    /// Whether the field must survive optimization unchanged
    pub kept: bool,
    /// Whether any reachable code reads the field
    pub is_read: bool,
    /// Whether any reachable code writes the field
    pub is_written: bool,
    /// The value stored in the field, as far as the analysis could prove
    pub value: Value,
}

/// Optimization facts for a method.
#[derive(Debug, Clone)]
pub enum MethodOptimizationInfo {
    /// Conservative sentinel: the method must survive optimization unchanged.
    Kept,
    /// Replaceable facts for a program method.
    Program(ProgramMethodOptimizationInfo),
}

impl MethodOptimizationInfo {
    /// Whether the method is marked as required to survive optimization.
    #[must_use]
    pub const fn is_kept(&self) -> bool {
        match self {
            Self::Kept => true,
            Self::Program(info) => info.kept,
        }
    }

    /// Whether invoking the method may have side effects.
    ///
    /// The kept sentinel conservatively answers yes.
    #[must_use]
    pub const fn has_side_effects(&self) -> bool {
        match self {
            Self::Kept => true,
            Self::Program(info) => info.has_side_effects,
        }
    }

    /// The analyzed return value, if the method has computed facts.
    ///
    /// The kept sentinel carries no value facts.
    #[must_use]
    pub const fn return_value(&self) -> Option<&Value> {
        match self {
            Self::Kept => None,
            Self::Program(info) => Some(&info.return_value),
        }
    }

    /// The analyzed value of parameter slot `index`.
    ///
    /// Slot 0 is the implicit receiver for instance methods; declared
    /// parameters follow. Returns `None` for the kept sentinel and for
    /// indices outside the slot range.
    #[must_use]
    pub fn parameter_value(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Kept => None,
            Self::Program(info) => info.parameter_values.get(index),
        }
    }
}

/// Mutable-by-replacement facts for a program method.
#[derive(Debug, Clone)]
pub struct ProgramMethodOptimizationInfo {
    /// Whether the method must survive optimization unchanged
    pub kept: bool,
    /// Whether invoking the method may have side effects
    pub has_side_effects: bool,
    /// Whether all side effects stay within the method's own instance
    pub has_no_external_side_effects: bool,
    /// Whether no reference parameter escapes the method
    pub has_no_escaping_parameters: bool,
    /// Analyzed values per parameter slot; slot 0 is the implicit receiver
    /// for instance methods
    pub parameter_values: Vec<Value>,
    /// Analyzed return value
    pub return_value: Value,
}

impl ProgramMethodOptimizationInfo {
    /// A conservative fact record for a method whose facts were invalidated.
    ///
    /// Side effects are assumed, nothing is known about values, and the
    /// method is removable until the next marking pass says otherwise.
    ///
    /// # Arguments
    ///
    /// * `parameter_value_count` - Total value slots, receiver included for
    ///   instance methods.
    #[must_use]
    pub fn conservative(parameter_value_count: usize) -> Self {
        Self {
            kept: false,
            has_side_effects: true,
            has_no_external_side_effects: false,
            has_no_escaping_parameters: false,
            parameter_values: vec![Value::Unknown; parameter_value_count],
            return_value: Value::Unknown,
        }
    }
}

/// Optimization facts for a code attribute.
#[derive(Debug, Clone)]
pub enum CodeOptimizationInfo {
    /// Conservative sentinel: the code must survive optimization unchanged.
    Kept,
    /// Replaceable facts for program code.
    Program(ProgramCodeOptimizationInfo),
}

impl CodeOptimizationInfo {
    /// Whether the code attribute is marked as required to survive optimization.
    #[must_use]
    pub const fn is_kept(&self) -> bool {
        match self {
            Self::Kept => true,
            Self::Program(info) => info.kept,
        }
    }
}

/// Mutable-by-replacement facts for program code.
#[derive(Debug, Clone, Default)]
pub struct ProgramCodeOptimizationInfo {
    /// Whether the code attribute must survive optimization unchanged
    pub kept: bool,
}
