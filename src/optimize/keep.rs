//! Marking entities as permanently preserved.
//!
//! The keep marker forces classes, fields, methods, and code attributes into the kept
//! state by installing the kept sentinel, overriding any removable info a previous pass
//! installed. The operation has the same shape for all four entity kinds, applies
//! uniformly to library entities (already kept), and is idempotent.

use crate::{
    metadata::{AttributeVisitor, ClassId, ClassPool, ClassVisitor, FieldId, MemberVisitor, MethodId},
    optimize::{
        ClassOptimizationInfo, CodeOptimizationInfo, FieldOptimizationInfo, MethodOptimizationInfo,
    },
    Result,
};

/// Forces visited entities into the permanently-kept state.
#[derive(Debug, Default)]
pub struct KeepMarker;

impl KeepMarker {
    /// Creates a new keep marker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Marks a class kept.
    pub fn mark_class(pool: &mut ClassPool, class: ClassId) {
        pool.class_mut(class)
            .set_optimization_info(ClassOptimizationInfo::Kept);
    }

    /// Marks a field kept.
    pub fn mark_field(pool: &mut ClassPool, field: FieldId) {
        pool.field_mut(field)
            .set_optimization_info(FieldOptimizationInfo::Kept);
    }

    /// Marks a method kept.
    pub fn mark_method(pool: &mut ClassPool, method: MethodId) {
        pool.method_mut(method)
            .set_optimization_info(MethodOptimizationInfo::Kept);
    }

    /// Marks the code attribute of a method kept, if the method has one.
    pub fn mark_code(pool: &mut ClassPool, method: MethodId) {
        if let Some(code) = &mut pool.method_mut(method).code {
            code.set_optimization_info(CodeOptimizationInfo::Kept);
        }
    }
}

impl ClassVisitor for KeepMarker {
    fn visit_class(&mut self, pool: &mut ClassPool, class: ClassId) -> Result<()> {
        Self::mark_class(pool, class);
        Ok(())
    }
}

impl MemberVisitor for KeepMarker {
    fn visit_field(&mut self, pool: &mut ClassPool, field: FieldId) -> Result<()> {
        Self::mark_field(pool, field);
        Ok(())
    }

    fn visit_method(&mut self, pool: &mut ClassPool, method: MethodId) -> Result<()> {
        Self::mark_method(pool, method);
        Ok(())
    }
}

impl AttributeVisitor for KeepMarker {
    fn visit_code(&mut self, pool: &mut ClassPool, method: MethodId) -> Result<()> {
        Self::mark_code(pool, method);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{Class, ClassAccessFlags, Field, MemberAccessFlags, Method},
        optimize::ProgramMethodOptimizationInfo,
    };

    fn pool_with_one_class() -> (ClassPool, ClassId) {
        let mut pool = ClassPool::new();
        let id = pool
            .add_class(
                Class::program("A", ClassAccessFlags::PUBLIC, None)
                    .with_field(Field::new("f", "I", MemberAccessFlags::PRIVATE))
                    .with_method(Method::new("m", "()V", MemberAccessFlags::PUBLIC).unwrap()),
            )
            .unwrap();
        (pool, id)
    }

    #[test]
    fn test_marking_is_idempotent_and_monotonic() {
        let (mut pool, class) = pool_with_one_class();
        let method = MethodId { class, index: 0 };

        assert!(!pool.is_method_kept(method));
        KeepMarker::mark_method(&mut pool, method);
        assert!(pool.is_method_kept(method));

        // repeated re-marking leaves the entity kept
        KeepMarker::mark_method(&mut pool, method);
        KeepMarker::mark_method(&mut pool, method);
        assert!(pool.is_method_kept(method));
    }

    #[test]
    fn test_marking_overrides_removable_info() {
        let (mut pool, class) = pool_with_one_class();
        let method = MethodId { class, index: 0 };

        pool.method_mut(method)
            .set_optimization_info(MethodOptimizationInfo::Program(
                ProgramMethodOptimizationInfo::conservative(1),
            ));
        assert!(!pool.is_method_kept(method));

        KeepMarker::mark_method(&mut pool, method);
        assert!(pool.is_method_kept(method));
    }

    #[test]
    fn test_marking_applies_to_all_entity_kinds() {
        let (mut pool, class) = pool_with_one_class();
        let field = FieldId { class, index: 0 };
        let method = MethodId { class, index: 0 };

        let mut marker = KeepMarker::new();
        marker.visit_class(&mut pool, class).unwrap();
        pool.members_accept(class, &mut marker).unwrap();

        assert!(pool.is_class_kept(class));
        assert!(pool.is_field_kept(field));
        assert!(pool.is_method_kept(method));
    }

    #[test]
    fn test_marking_library_entities_is_a_no_op_in_effect() {
        let mut pool = ClassPool::new();
        let class = pool
            .add_class(Class::library("Lib", ClassAccessFlags::PUBLIC, None))
            .unwrap();
        assert!(pool.is_class_kept(class));
        KeepMarker::mark_class(&mut pool, class);
        assert!(pool.is_class_kept(class));
    }
}
