//! The incremental fact-propagation core.
//!
//! This module tracks per-entity analysis results across repeated optimization passes,
//! decides which entities may be altered or removed, and generalizes member references to
//! their most broadly-accessible declaring class.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      Optimization pass cycle                     │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  marking        KeepMarker installs the kept sentinel            │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  analysis       (external) installs program fact records and     │
//! │       │         records caller edges into the CallRegistry       │
//! │       ▼                                                          │
//! │  filtering      Kept*/Constant* filters select the entities      │
//! │       │         downstream passes may touch                      │
//! │       ▼                                                          │
//! │  transformation MemberReferenceGeneralizer rewrites references;  │
//! │       │         fact changes feed the InfluencedMethodTraveller, │
//! │       │         which resets and re-queues affected callers      │
//! │       ▼                                                          │
//! │  repeat until the enclosing driver reaches a fixed point         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Components
//!
//! - [`ClassOptimizationInfo`], [`FieldOptimizationInfo`], [`MethodOptimizationInfo`],
//!   [`CodeOptimizationInfo`] - fact records with a kept sentinel and a program variant
//! - [`KeepMarker`] - forces entities into the permanently-preserved state
//! - [`KeptClassFilter`], [`KeptMemberFilter`], [`ConstantMemberFilter`],
//!   [`ConstantParameterFilter`] - fact-driven visitor filters
//! - [`CallRegistry`] / [`InfluencedMethodTraveller`] - reverse-dependency store and
//!   invalidation of affected callers
//! - [`MemberReferenceGeneralizer`] / [`ReferenceEditor`] - reference generalization and
//!   the bytecode editor boundary
//! - [`EventLog`] - record of the changes a pass performed
//! - [`Value`] - the partial-evaluator boundary; this core only reads value facts

mod config;
mod editor;
mod events;
mod filter;
mod generalize;
mod influence;
mod info;
mod keep;
mod value;

pub use config::OptimizeConfig;
pub use editor::{CodeAttributeEditor, ReferenceEditor};
pub use events::{Event, EventKind, EventLog};
pub use filter::{ConstantMemberFilter, ConstantParameterFilter, KeptClassFilter, KeptMemberFilter};
pub use generalize::MemberReferenceGeneralizer;
pub use influence::{CallRegistry, InfluencedMethodTraveller};
pub use info::{
    ClassOptimizationInfo, CodeOptimizationInfo, FieldOptimizationInfo, InfoSlot,
    MethodOptimizationInfo, ProgramClassOptimizationInfo, ProgramCodeOptimizationInfo,
    ProgramFieldOptimizationInfo, ProgramMethodOptimizationInfo,
};
pub use keep::KeepMarker;
pub use value::{ConstValue, Value};
