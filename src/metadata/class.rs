//! Classes, fields, and methods of the program being optimized.
//!
//! Entities come in two provenances, carried as an [`Origin`] tag on the class: *program*
//! entities originate from the input and are mutable, *library* entities come from a
//! dependency, are signature-only, and are always treated as already kept. The tag replaces
//! the program/library visitor double-dispatch of classic class file frameworks - operations
//! match on it where behavior differs.
//!
//! Entities are addressed by copyable ids ([`ClassId`], [`FieldId`], [`MethodId`]) into the
//! owning [`ClassPool`](crate::metadata::ClassPool).

use std::fmt;

use crate::{
    metadata::{
        code::CodeAttribute,
        descriptor,
        flags::{ClassAccessFlags, MemberAccessFlags, ProcessingFlags},
    },
    optimize::{ClassOptimizationInfo, FieldOptimizationInfo, InfoSlot, MethodOptimizationInfo},
    Result,
};

/// Identifies a class within its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    /// The index of the class within its pool.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

/// Identifies a field by its declaring class and declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    /// The declaring class
    pub class: ClassId,
    /// Declaration index within the class
    pub index: u16,
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.field#{}", self.class, self.index)
    }
}

/// Identifies a method by its declaring class and declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId {
    /// The declaring class
    pub class: ClassId,
    /// Declaration index within the class
    pub index: u16,
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.method#{}", self.class, self.index)
    }
}

/// Where an entity originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// From the input being optimized; full body present, mutable.
    Program,
    /// From a dependency; signature-only, immutable, always kept.
    Library,
}

/// A field declaration.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type descriptor
    pub descriptor: String,
    /// Access flags
    pub access: MemberAccessFlags,
    pub(crate) info: InfoSlot<FieldOptimizationInfo>,
}

impl Field {
    /// Creates a field declaration.
    #[must_use]
    pub fn new(name: &str, descriptor: &str, access: MemberAccessFlags) -> Self {
        Self {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            access,
            info: InfoSlot::empty(),
        }
    }

    /// The currently installed optimization info, if any.
    #[must_use]
    pub const fn optimization_info(&self) -> Option<&FieldOptimizationInfo> {
        self.info.get()
    }

    /// Installs optimization info, replacing any prior record.
    pub fn set_optimization_info(&mut self, info: FieldOptimizationInfo) {
        self.info.install(info);
    }

    /// How many times optimization info has been installed on this field.
    #[must_use]
    pub const fn info_revision(&self) -> u32 {
        self.info.revision()
    }
}

/// A method declaration, optionally with its code attribute.
#[derive(Debug, Clone)]
pub struct Method {
    /// Method name
    pub name: String,
    /// Method descriptor
    pub descriptor: String,
    /// Access flags
    pub access: MemberAccessFlags,
    /// The method body; absent for abstract, native, and library methods
    pub code: Option<CodeAttribute>,
    declared_parameters: usize,
    pub(crate) info: InfoSlot<MethodOptimizationInfo>,
}

impl Method {
    /// Creates a method declaration, validating its descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Descriptor`](crate::Error::Descriptor) if the
    /// descriptor is malformed.
    pub fn new(name: &str, descriptor: &str, access: MemberAccessFlags) -> Result<Self> {
        let declared_parameters = descriptor::parameter_count(descriptor)?;
        Ok(Self {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            access,
            code: None,
            declared_parameters,
            info: InfoSlot::empty(),
        })
    }

    /// Attaches a code attribute to the method.
    #[must_use]
    pub fn with_code(mut self, code: CodeAttribute) -> Self {
        self.code = Some(code);
        self
    }

    /// The number of logical parameter slots the descriptor declares.
    ///
    /// Wide types count one slot; the implicit receiver is not included.
    #[must_use]
    pub const fn declared_parameter_count(&self) -> usize {
        self.declared_parameters
    }

    /// The total number of parameter value slots, receiver included.
    ///
    /// Index 0 of the parameter value facts is the implicit receiver for
    /// instance methods; static methods have no receiver slot.
    #[must_use]
    pub const fn parameter_value_count(&self) -> usize {
        if self.access.is_static() {
            self.declared_parameters
        } else {
            self.declared_parameters + 1
        }
    }

    /// The currently installed optimization info, if any.
    #[must_use]
    pub const fn optimization_info(&self) -> Option<&MethodOptimizationInfo> {
        self.info.get()
    }

    /// Installs optimization info, replacing any prior record.
    pub fn set_optimization_info(&mut self, info: MethodOptimizationInfo) {
        self.info.install(info);
    }

    /// How many times optimization info has been installed on this method.
    #[must_use]
    pub const fn info_revision(&self) -> u32 {
        self.info.revision()
    }
}

/// A class with its declared members.
#[derive(Debug, Clone)]
pub struct Class {
    /// Internal class name, e.g. `com/example/Widget`
    pub name: String,
    /// Access flags
    pub access: ClassAccessFlags,
    /// Internal name of the superclass; `None` for the root of the hierarchy
    pub super_name: Option<String>,
    /// Provenance of the class
    pub origin: Origin,
    /// Framework bookkeeping flags
    pub processing_flags: ProcessingFlags,
    pub(crate) super_class: Option<ClassId>,
    pub(crate) fields: Vec<Field>,
    pub(crate) methods: Vec<Method>,
    pub(crate) info: InfoSlot<ClassOptimizationInfo>,
}

impl Class {
    /// Creates a program class.
    ///
    /// Program classes are part of the optimized output by definition, so
    /// they start with [`ProcessingFlags::AVAILABLE`] set.
    #[must_use]
    pub fn program(name: &str, access: ClassAccessFlags, super_name: Option<&str>) -> Self {
        Self::with_origin(name, access, super_name, Origin::Program, ProcessingFlags::AVAILABLE)
    }

    /// Creates a library class.
    ///
    /// Whether a dependency ships alongside the optimized output is not known
    /// here, so library classes start without [`ProcessingFlags::AVAILABLE`];
    /// the framework sets it for dependencies it can vouch for.
    #[must_use]
    pub fn library(name: &str, access: ClassAccessFlags, super_name: Option<&str>) -> Self {
        Self::with_origin(name, access, super_name, Origin::Library, ProcessingFlags::empty())
    }

    fn with_origin(
        name: &str,
        access: ClassAccessFlags,
        super_name: Option<&str>,
        origin: Origin,
        processing_flags: ProcessingFlags,
    ) -> Self {
        Self {
            name: name.to_string(),
            access,
            super_name: super_name.map(str::to_string),
            origin,
            processing_flags,
            super_class: None,
            fields: Vec::new(),
            methods: Vec::new(),
            info: InfoSlot::empty(),
        }
    }

    /// Adds a field declaration.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a method declaration.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Overrides the framework processing flags.
    #[must_use]
    pub fn with_processing_flags(mut self, flags: ProcessingFlags) -> Self {
        self.processing_flags = flags;
        self
    }

    /// Whether the class comes from a dependency.
    #[must_use]
    pub const fn is_library(&self) -> bool {
        matches!(self.origin, Origin::Library)
    }

    /// Whether the full class definition is guaranteed present wherever the
    /// optimized output is used.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.processing_flags.contains(ProcessingFlags::AVAILABLE)
    }

    /// The resolved superclass, once
    /// [`ClassPool::resolve_superclasses`](crate::metadata::ClassPool::resolve_superclasses)
    /// has run.
    #[must_use]
    pub const fn super_class(&self) -> Option<ClassId> {
        self.super_class
    }

    /// The declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// The declared methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    /// The declaration index of the field with the given name and descriptor.
    #[must_use]
    pub fn find_field(&self, name: &str, descriptor: &str) -> Option<u16> {
        self.fields
            .iter()
            .position(|f| f.name == name && f.descriptor == descriptor)
            .map(|i| i as u16)
    }

    /// The declaration index of the method with the given name and descriptor.
    #[must_use]
    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<u16> {
        self.methods
            .iter()
            .position(|m| m.name == name && m.descriptor == descriptor)
            .map(|i| i as u16)
    }

    /// The currently installed optimization info, if any.
    #[must_use]
    pub const fn optimization_info(&self) -> Option<&ClassOptimizationInfo> {
        self.info.get()
    }

    /// Installs optimization info, replacing any prior record.
    pub fn set_optimization_info(&mut self, info: ClassOptimizationInfo) {
        self.info.install(info);
    }

    /// How many times optimization info has been installed on this class.
    #[must_use]
    pub const fn info_revision(&self) -> u32 {
        self.info.revision()
    }
}
