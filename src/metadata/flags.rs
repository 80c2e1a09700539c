//! Access flags and framework processing flags for classes and members.
//!
//! This module defines the bitflags used to represent class file access modifiers and the
//! framework-owned processing flags that travel with each class during optimization.
//!
//! # Key Types
//! - [`ClassAccessFlags`], [`MemberAccessFlags`]: access modifiers from the class file
//! - [`ProcessingFlags`]: framework bookkeeping bits, notably [`ProcessingFlags::AVAILABLE`]

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Class-level access and property flags
    pub struct ClassAccessFlags: u16 {
        /// Declared public; may be accessed from outside its package
        const PUBLIC = 0x0001;
        /// Declared final; no subclasses allowed
        const FINAL = 0x0010;
        /// Treat superclass methods specially when invoked
        const SUPER = 0x0020;
        /// Is an interface, not a class
        const INTERFACE = 0x0200;
        /// Declared abstract; must not be instantiated
        const ABSTRACT = 0x0400;
        /// Declared synthetic; not present in the source code
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation interface
        const ANNOTATION = 0x2000;
        /// Declared as an enum class
        const ENUM = 0x4000;
    }
}

impl ClassAccessFlags {
    /// Whether the class is accessible from outside its package
    #[must_use]
    pub const fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Field and method access and property flags
    pub struct MemberAccessFlags: u16 {
        /// Declared public; may be accessed from outside its package
        const PUBLIC = 0x0001;
        /// Declared private; accessible only within the defining class
        const PRIVATE = 0x0002;
        /// Declared protected; may be accessed within subclasses
        const PROTECTED = 0x0004;
        /// Declared static; no receiver slot
        const STATIC = 0x0008;
        /// Declared final; never directly assigned after construction
        const FINAL = 0x0010;
        /// Declared synchronized; invocation wraps a monitor (methods)
        const SYNCHRONIZED = 0x0020;
        /// Declared volatile; cannot be cached (fields)
        const VOLATILE = 0x0040;
        /// Declared transient; not written by default serialization (fields)
        const TRANSIENT = 0x0080;
        /// Declared native; implemented outside the class file (methods)
        const NATIVE = 0x0100;
        /// Declared abstract; no implementation is provided (methods)
        const ABSTRACT = 0x0400;
        /// Declared synthetic; not present in the source code
        const SYNTHETIC = 0x1000;
    }
}

impl MemberAccessFlags {
    /// Whether the member is accessible from outside its package
    #[must_use]
    pub const fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    /// Whether the member is static and therefore has no receiver slot
    #[must_use]
    pub const fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Framework bookkeeping bits attached to every class.
    ///
    /// These flags do not originate from the class file; the surrounding
    /// framework sets them while loading and shrinking the program.
    pub struct ProcessingFlags: u32 {
        /// The full definition of this class - not merely its name - is
        /// guaranteed to be present wherever the optimized output is used.
        /// Reference generalization only targets available classes.
        const AVAILABLE = 0x0001;
    }
}

impl Default for ProcessingFlags {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_helpers() {
        let access = ClassAccessFlags::PUBLIC | ClassAccessFlags::FINAL;
        assert!(access.is_public());
        assert!(!ClassAccessFlags::FINAL.is_public());

        let member = MemberAccessFlags::PUBLIC | MemberAccessFlags::STATIC;
        assert!(member.is_public());
        assert!(member.is_static());
        assert!(!MemberAccessFlags::PRIVATE.is_public());
    }

    #[test]
    fn test_processing_flags_default_empty() {
        assert!(!ProcessingFlags::default().contains(ProcessingFlags::AVAILABLE));
    }
}
