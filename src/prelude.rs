//! # classopt Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the classopt library. Import this module to get quick access to the essential
//! types for driving an optimization run.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all classopt operations
pub use crate::Error;

/// The result type used throughout classopt
pub use crate::Result;

// ================================================================================================
// Class File Model
// ================================================================================================

/// The registry owning every class in an optimization run
pub use crate::metadata::ClassPool;

/// Entities and their ids
pub use crate::metadata::{Class, ClassId, Field, FieldId, Method, MethodId, Origin};

/// Code attributes and instructions
pub use crate::metadata::{CodeAttribute, Instruction, Opcode, RefConstant};

/// Access and processing flags
pub use crate::metadata::{ClassAccessFlags, MemberAccessFlags, ProcessingFlags};

/// Traversal traits
pub use crate::metadata::{AttributeVisitor, ClassVisitor, InstructionVisitor, MemberVisitor};

// ================================================================================================
// Optimization Core
// ================================================================================================

/// Optimization info records
pub use crate::optimize::{
    ClassOptimizationInfo, CodeOptimizationInfo, FieldOptimizationInfo, MethodOptimizationInfo,
    ProgramClassOptimizationInfo, ProgramFieldOptimizationInfo, ProgramMethodOptimizationInfo,
};

/// Value facts from the partial evaluator
pub use crate::optimize::{ConstValue, Value};

/// Marking and filtering
pub use crate::optimize::{
    ConstantMemberFilter, ConstantParameterFilter, KeepMarker, KeptClassFilter, KeptMemberFilter,
};

/// Reverse-dependency store and invalidation
pub use crate::optimize::{CallRegistry, InfluencedMethodTraveller};

/// Reference generalization and the editor boundary
pub use crate::optimize::{CodeAttributeEditor, MemberReferenceGeneralizer, ReferenceEditor};

/// Configuration and event reporting
pub use crate::optimize::{Event, EventKind, EventLog, OptimizeConfig};
