//! Method bodies: code attributes, instructions, and symbolic member references.
//!
//! Only the slice of the instruction set that the optimization core inspects is modeled:
//! field accesses and method invocations carrying constant-pool member references, plus a
//! return terminator. Instruction encoding and the rest of the instruction set belong to
//! the bytecode editor outside this crate.

use crate::optimize::{CodeOptimizationInfo, InfoSlot};

/// A symbolic constant-pool reference to a field or method.
///
/// References name the class at the call site statically; resolution against
/// the class pool happens where the reference is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefConstant {
    /// Name of the class the reference points at
    pub class_name: String,
    /// Name of the referenced member
    pub name: String,
    /// Descriptor of the referenced member
    pub descriptor: String,
}

impl RefConstant {
    /// Creates a new symbolic member reference.
    #[must_use]
    pub fn new(class_name: &str, name: &str, descriptor: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        }
    }
}

/// A bytecode operation, carrying its member reference where it has one.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Opcode {
    /// Read an instance field
    GetField(RefConstant),
    /// Write an instance field
    PutField(RefConstant),
    /// Read a static field
    GetStatic(RefConstant),
    /// Write a static field
    PutStatic(RefConstant),
    /// Invoke an instance method with virtual dispatch
    InvokeVirtual(RefConstant),
    /// Invoke an instance method directly (constructors, private, super)
    InvokeSpecial(RefConstant),
    /// Invoke a static method
    InvokeStatic(RefConstant),
    /// Invoke an interface method
    InvokeInterface(RefConstant),
    /// Return from the method
    Return,
}

impl Opcode {
    /// The field reference carried by this operation, if it is a field access.
    #[must_use]
    pub const fn field_ref(&self) -> Option<&RefConstant> {
        match self {
            Self::GetField(r) | Self::PutField(r) | Self::GetStatic(r) | Self::PutStatic(r) => {
                Some(r)
            }
            _ => None,
        }
    }

    /// The method reference carried by this operation, if it is an invocation.
    #[must_use]
    pub const fn method_ref(&self) -> Option<&RefConstant> {
        match self {
            Self::InvokeVirtual(r)
            | Self::InvokeSpecial(r)
            | Self::InvokeStatic(r)
            | Self::InvokeInterface(r) => Some(r),
            _ => None,
        }
    }
}

/// A single instruction at a bytecode offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Bytecode offset of the instruction within its code attribute
    pub offset: u32,
    /// The operation at that offset
    pub op: Opcode,
}

/// The code attribute of a method: its body plus the facts attached to it.
#[derive(Debug, Clone)]
pub struct CodeAttribute {
    /// Operand stack depth limit
    pub max_stack: u16,
    /// Local variable array size in storage words
    pub max_locals: u16,
    /// Instructions in offset order
    pub instructions: Vec<Instruction>,
    pub(crate) info: InfoSlot<CodeOptimizationInfo>,
}

impl CodeAttribute {
    /// Creates a code attribute from instructions in offset order.
    #[must_use]
    pub fn new(max_stack: u16, max_locals: u16, instructions: Vec<Instruction>) -> Self {
        Self {
            max_stack,
            max_locals,
            instructions,
            info: InfoSlot::empty(),
        }
    }

    /// The instruction at the given bytecode offset, if one starts there.
    #[must_use]
    pub fn instruction_at(&self, offset: u32) -> Option<&Instruction> {
        self.instructions.iter().find(|i| i.offset == offset)
    }

    pub(crate) fn instruction_at_mut(&mut self, offset: u32) -> Option<&mut Instruction> {
        self.instructions.iter_mut().find(|i| i.offset == offset)
    }

    /// The currently installed optimization info, if any.
    #[must_use]
    pub const fn optimization_info(&self) -> Option<&CodeOptimizationInfo> {
        self.info.get()
    }

    /// Installs optimization info, replacing any prior record.
    pub fn set_optimization_info(&mut self, info: CodeOptimizationInfo) {
        self.info.install(info);
    }

    /// How many times optimization info has been installed on this attribute.
    #[must_use]
    pub const fn info_revision(&self) -> u32 {
        self.info.revision()
    }
}
