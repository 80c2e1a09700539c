//! The class pool: the registry owning every class in an optimization run.
//!
//! The pool assigns ids, resolves superclass links, answers kept-status queries, and
//! provides the accept methods the driving loop traverses entities with. Library classes
//! are seeded with the kept sentinel for themselves, their members, and their code
//! attributes as they enter the pool, so call sites never need a presence check before
//! asking about kept status.

use std::collections::HashMap;

use crate::{
    metadata::{
        class::{Class, ClassId, Field, FieldId, Method, MethodId},
        visitor::{AttributeVisitor, ClassVisitor, InstructionVisitor, MemberVisitor},
    },
    optimize::{
        ClassOptimizationInfo, CodeOptimizationInfo, FieldOptimizationInfo, MethodOptimizationInfo,
    },
    Error, Result,
};

/// Registry of all classes participating in an optimization run.
#[derive(Debug, Default, Clone)]
pub struct ClassPool {
    classes: Vec<Class>,
    by_name: HashMap<String, ClassId>,
}

impl ClassPool {
    /// Creates an empty class pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of classes in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the pool contains no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registers a class and returns its id.
    ///
    /// Library classes and their members are seeded with the kept sentinel
    /// here, making them indistinguishable from explicitly kept program
    /// entities at every query site.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateClass`] if a class of the same name is
    /// already registered.
    pub fn add_class(&mut self, mut class: Class) -> Result<ClassId> {
        if self.by_name.contains_key(&class.name) {
            return Err(Error::DuplicateClass(class.name));
        }

        if class.is_library() {
            class.info.install(ClassOptimizationInfo::Kept);
            for field in &mut class.fields {
                field.info.install(FieldOptimizationInfo::Kept);
            }
            for method in &mut class.methods {
                method.info.install(MethodOptimizationInfo::Kept);
                if let Some(code) = &mut method.code {
                    code.info.install(CodeOptimizationInfo::Kept);
                }
            }
        }

        let id = ClassId(self.classes.len() as u32);
        self.by_name.insert(class.name.clone(), id);
        self.classes.push(class);
        Ok(id)
    }

    /// Resolves every `super_name` to a [`ClassId`] link.
    ///
    /// Must run after all classes are registered and before hierarchy
    /// searches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClassNotFound`] if a named superclass is not in the
    /// pool.
    pub fn resolve_superclasses(&mut self) -> Result<()> {
        let mut links = Vec::with_capacity(self.classes.len());
        for class in &self.classes {
            match &class.super_name {
                None => links.push(None),
                Some(name) => {
                    let id = self
                        .by_name
                        .get(name)
                        .copied()
                        .ok_or_else(|| Error::ClassNotFound(name.clone()))?;
                    links.push(Some(id));
                }
            }
        }
        for (class, link) in self.classes.iter_mut().zip(links) {
            class.super_class = link;
        }
        Ok(())
    }

    /// The class with the given id.
    #[must_use]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    /// The class with the given id, mutably.
    pub fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.index()]
    }

    /// Looks up a class id by internal name.
    #[must_use]
    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// The resolved superclass of a class.
    #[must_use]
    pub fn superclass_of(&self, id: ClassId) -> Option<ClassId> {
        self.class(id).super_class
    }

    /// The field with the given id.
    #[must_use]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.class(id.class).fields[id.index as usize]
    }

    /// The field with the given id, mutably.
    pub fn field_mut(&mut self, id: FieldId) -> &mut Field {
        &mut self.class_mut(id.class).fields[id.index as usize]
    }

    /// The method with the given id.
    #[must_use]
    pub fn method(&self, id: MethodId) -> &Method {
        &self.class(id.class).methods[id.index as usize]
    }

    /// The method with the given id, mutably.
    pub fn method_mut(&mut self, id: MethodId) -> &mut Method {
        &mut self.class_mut(id.class).methods[id.index as usize]
    }

    /// Finds a declared field by name and descriptor.
    #[must_use]
    pub fn find_field(&self, class: ClassId, name: &str, descriptor: &str) -> Option<FieldId> {
        self.class(class)
            .find_field(name, descriptor)
            .map(|index| FieldId { class, index })
    }

    /// Finds a declared method by name and descriptor.
    #[must_use]
    pub fn find_method(&self, class: ClassId, name: &str, descriptor: &str) -> Option<MethodId> {
        self.class(class)
            .find_method(name, descriptor)
            .map(|index| MethodId { class, index })
    }

    /// The ids of all classes, in registration order.
    #[must_use]
    pub fn class_ids(&self) -> Vec<ClassId> {
        (0..self.classes.len() as u32).map(ClassId).collect()
    }

    /// Whether the class is marked kept. `false` when unmarked.
    #[must_use]
    pub fn is_class_kept(&self, id: ClassId) -> bool {
        self.class(id)
            .optimization_info()
            .is_some_and(ClassOptimizationInfo::is_kept)
    }

    /// Whether the field is marked kept. `false` when unmarked.
    #[must_use]
    pub fn is_field_kept(&self, id: FieldId) -> bool {
        self.field(id)
            .optimization_info()
            .is_some_and(FieldOptimizationInfo::is_kept)
    }

    /// Whether the method is marked kept. `false` when unmarked.
    #[must_use]
    pub fn is_method_kept(&self, id: MethodId) -> bool {
        self.method(id)
            .optimization_info()
            .is_some_and(MethodOptimizationInfo::is_kept)
    }

    /// Whether the method's code attribute is marked kept. `false` when
    /// unmarked or when the method has no code.
    #[must_use]
    pub fn is_code_kept(&self, id: MethodId) -> bool {
        self.method(id)
            .code
            .as_ref()
            .and_then(|code| code.optimization_info())
            .is_some_and(CodeOptimizationInfo::is_kept)
    }

    /// Visits every class in the pool.
    ///
    /// # Errors
    ///
    /// Propagates the first visitor failure, aborting the traversal.
    pub fn classes_accept(&mut self, visitor: &mut impl ClassVisitor) -> Result<()> {
        for id in self.class_ids() {
            visitor.visit_class(self, id)?;
        }
        Ok(())
    }

    /// Visits the declared fields and methods of one class.
    ///
    /// # Errors
    ///
    /// Propagates the first visitor failure, aborting the traversal.
    pub fn members_accept(&mut self, class: ClassId, visitor: &mut impl MemberVisitor) -> Result<()> {
        for index in 0..self.class(class).fields.len() as u16 {
            visitor.visit_field(self, FieldId { class, index })?;
        }
        for index in 0..self.class(class).methods.len() as u16 {
            visitor.visit_method(self, MethodId { class, index })?;
        }
        Ok(())
    }

    /// Visits the members of every class in the pool.
    ///
    /// # Errors
    ///
    /// Propagates the first visitor failure, aborting the traversal.
    pub fn all_members_accept(&mut self, visitor: &mut impl MemberVisitor) -> Result<()> {
        for class in self.class_ids() {
            self.members_accept(class, visitor)?;
        }
        Ok(())
    }

    /// Visits the code attribute of a method, if it has one.
    ///
    /// # Errors
    ///
    /// Propagates the visitor failure.
    pub fn attributes_accept(
        &mut self,
        method: MethodId,
        visitor: &mut impl AttributeVisitor,
    ) -> Result<()> {
        if self.method(method).code.is_some() {
            visitor.visit_code(self, method)?;
        }
        Ok(())
    }

    /// Visits every instruction of a method body in offset order.
    ///
    /// # Errors
    ///
    /// Propagates the first visitor failure, aborting the traversal.
    pub fn instructions_accept(
        &mut self,
        method: MethodId,
        visitor: &mut impl InstructionVisitor,
    ) -> Result<()> {
        let Some(code) = &self.method(method).code else {
            return Ok(());
        };
        let instructions = code.instructions.clone();
        for instruction in &instructions {
            visitor.visit_instruction(self, method, instruction.offset, &instruction.op)?;
        }
        Ok(())
    }

    /// Visits every instruction of every method body in the pool.
    ///
    /// # Errors
    ///
    /// Propagates the first visitor failure, aborting the traversal.
    pub fn all_instructions_accept(&mut self, visitor: &mut impl InstructionVisitor) -> Result<()> {
        for class in self.class_ids() {
            for index in 0..self.class(class).methods.len() as u16 {
                self.instructions_accept(MethodId { class, index }, visitor)?;
            }
        }
        Ok(())
    }
}
