//! Visitor traits for traversing the class pool.
//!
//! The driving optimization loop walks the pool through these traits and the accept
//! methods on [`ClassPool`]. Visits receive the pool mutably plus the id of the visited
//! entity, so a visitor can both inspect and rewrite. Provenance dispatch happens on the
//! [`Origin`](crate::metadata::Origin) tag inside implementations - there is one visit
//! function per operation, not one per provenance.
//!
//! All visits return [`Result`] so a failing rewrite aborts the surrounding traversal.

use crate::{
    metadata::{class::MethodId, code::Opcode, pool::ClassPool, ClassId, FieldId},
    Result,
};

/// Visits classes.
pub trait ClassVisitor {
    /// Called for each visited class.
    ///
    /// # Errors
    ///
    /// Implementations propagate failures from the work they perform.
    fn visit_class(&mut self, pool: &mut ClassPool, class: ClassId) -> Result<()>;
}

/// Visits fields and methods.
pub trait MemberVisitor {
    /// Called for each visited field.
    ///
    /// # Errors
    ///
    /// Implementations propagate failures from the work they perform.
    fn visit_field(&mut self, _pool: &mut ClassPool, _field: FieldId) -> Result<()> {
        Ok(())
    }

    /// Called for each visited method.
    ///
    /// # Errors
    ///
    /// Implementations propagate failures from the work they perform.
    fn visit_method(&mut self, _pool: &mut ClassPool, _method: MethodId) -> Result<()> {
        Ok(())
    }
}

/// Visits code attributes.
pub trait AttributeVisitor {
    /// Called for the code attribute of each visited method that has one.
    ///
    /// # Errors
    ///
    /// Implementations propagate failures from the work they perform.
    fn visit_code(&mut self, pool: &mut ClassPool, method: MethodId) -> Result<()>;
}

/// Visits the instructions of a method body.
pub trait InstructionVisitor {
    /// Called for each instruction, with its offset and operation.
    ///
    /// # Errors
    ///
    /// Implementations propagate failures from the work they perform.
    fn visit_instruction(
        &mut self,
        pool: &mut ClassPool,
        method: MethodId,
        offset: u32,
        op: &Opcode,
    ) -> Result<()>;
}

impl<V: ClassVisitor + ?Sized> ClassVisitor for &mut V {
    fn visit_class(&mut self, pool: &mut ClassPool, class: ClassId) -> Result<()> {
        (**self).visit_class(pool, class)
    }
}

impl<V: MemberVisitor + ?Sized> MemberVisitor for &mut V {
    fn visit_field(&mut self, pool: &mut ClassPool, field: FieldId) -> Result<()> {
        (**self).visit_field(pool, field)
    }

    fn visit_method(&mut self, pool: &mut ClassPool, method: MethodId) -> Result<()> {
        (**self).visit_method(pool, method)
    }
}

impl<V: AttributeVisitor + ?Sized> AttributeVisitor for &mut V {
    fn visit_code(&mut self, pool: &mut ClassPool, method: MethodId) -> Result<()> {
        (**self).visit_code(pool, method)
    }
}

impl<V: InstructionVisitor + ?Sized> InstructionVisitor for &mut V {
    fn visit_instruction(
        &mut self,
        pool: &mut ClassPool,
        method: MethodId,
        offset: u32,
        op: &Opcode,
    ) -> Result<()> {
        (**self).visit_instruction(pool, method, offset, op)
    }
}
