//! The bytecode editor boundary.
//!
//! Instruction encoding lives outside this crate; the optimizer only needs two things from
//! the editor: whether an offset was already rewritten this pass, and the actual reference
//! rewrite. [`ReferenceEditor`] is that boundary, and [`CodeAttributeEditor`] is the
//! in-crate implementation operating directly on the modeled instructions.

use std::collections::HashSet;

use crate::{
    metadata::{ClassPool, MethodId, Opcode, RefConstant},
    Error, Result,
};

/// Rewrites member references in method bodies and tracks rewritten offsets.
pub trait ReferenceEditor {
    /// Whether the instruction at `offset` was already rewritten this pass.
    fn is_modified(&self, method: MethodId, offset: u32) -> bool;

    /// Replaces the field reference of the instruction at `offset`.
    ///
    /// # Errors
    ///
    /// Fails if no instruction starts at `offset`, if the instruction does
    /// not carry a field reference, or if the target cannot be resolved.
    fn replace_field_ref(
        &mut self,
        pool: &mut ClassPool,
        method: MethodId,
        offset: u32,
        target: RefConstant,
    ) -> Result<()>;

    /// Replaces the method reference of the instruction at `offset`.
    ///
    /// # Errors
    ///
    /// Fails if no instruction starts at `offset`, if the instruction does
    /// not carry a method reference, or if the target cannot be resolved.
    fn replace_method_ref(
        &mut self,
        pool: &mut ClassPool,
        method: MethodId,
        offset: u32,
        target: RefConstant,
    ) -> Result<()>;
}

/// Reference editor operating on the modeled code attributes.
///
/// Rewritten offsets stay marked until [`reset`](Self::reset), which the
/// driving loop calls between passes.
#[derive(Debug, Default)]
pub struct CodeAttributeEditor {
    modified: HashSet<(MethodId, u32)>,
}

impl CodeAttributeEditor {
    /// Creates an editor with no rewritten offsets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the rewritten-offset marks for the next pass.
    pub fn reset(&mut self) {
        self.modified.clear();
    }

    /// The number of offsets rewritten since the last reset.
    #[must_use]
    pub fn modified_count(&self) -> usize {
        self.modified.len()
    }

    fn rewrite(
        &mut self,
        pool: &mut ClassPool,
        method: MethodId,
        offset: u32,
        target: RefConstant,
        field: bool,
    ) -> Result<()> {
        let target_class = pool
            .class_by_name(&target.class_name)
            .ok_or_else(|| Error::ClassNotFound(target.class_name.clone()))?;
        let declared = if field {
            pool.find_field(target_class, &target.name, &target.descriptor).is_some()
        } else {
            pool.find_method(target_class, &target.name, &target.descriptor).is_some()
        };
        if !declared {
            return Err(Error::MemberNotFound {
                class: target.class_name.clone(),
                name: target.name.clone(),
                descriptor: target.descriptor.clone(),
            });
        }

        let code = pool
            .method_mut(method)
            .code
            .as_mut()
            .ok_or(Error::InstructionNotFound { offset })?;
        let instruction = code
            .instruction_at_mut(offset)
            .ok_or(Error::InstructionNotFound { offset })?;

        match &mut instruction.op {
            Opcode::GetField(r) | Opcode::PutField(r) | Opcode::GetStatic(r) | Opcode::PutStatic(r)
                if field =>
            {
                *r = target;
            }
            Opcode::InvokeVirtual(r)
            | Opcode::InvokeSpecial(r)
            | Opcode::InvokeStatic(r)
            | Opcode::InvokeInterface(r)
                if !field =>
            {
                *r = target;
            }
            _ => {
                return Err(Error::RefKindMismatch {
                    offset,
                    expected: if field { "field" } else { "method" },
                })
            }
        }

        self.modified.insert((method, offset));
        Ok(())
    }
}

impl ReferenceEditor for CodeAttributeEditor {
    fn is_modified(&self, method: MethodId, offset: u32) -> bool {
        self.modified.contains(&(method, offset))
    }

    fn replace_field_ref(
        &mut self,
        pool: &mut ClassPool,
        method: MethodId,
        offset: u32,
        target: RefConstant,
    ) -> Result<()> {
        self.rewrite(pool, method, offset, target, true)
    }

    fn replace_method_ref(
        &mut self,
        pool: &mut ClassPool,
        method: MethodId,
        offset: u32,
        target: RefConstant,
    ) -> Result<()> {
        self.rewrite(pool, method, offset, target, false)
    }
}
