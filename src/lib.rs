#![doc(html_no_source)]
#![deny(missing_docs)]

//! # classopt
//!
//! An incremental fact-propagation core for whole-program JVM class file optimization.
//!
//! `classopt` is the part of a bytecode optimizer that survives between passes: it tracks
//! per-entity analysis results ("optimization info") across repeated visits of a large,
//! mutually-referencing graph of classes, methods, and fields; decides which entities may
//! be altered or removed; and generalizes member references to their most
//! broadly-accessible declaring class. Facts computed in one pass can be invalidated by a
//! later pass, several method handles can be linked into a single analysis unit, and the
//! reverse-dependency store re-queues exactly the callers a fact change affects.
//!
//! ## Features
//!
//! - **Typed fact records** - class, field, method, and code facts live in strongly typed
//!   slots; a kind mismatch is a compile error, not a runtime cast failure
//! - **Explicit invalidation** - facts are replaced whole, never mutated in place, and a
//!   per-entity revision counter makes every replacement observable
//! - **Alias-aware propagation** - linked method handles share one analysis unit;
//!   invalidating through any alias surfaces the identical caller set
//! - **Reference generalization** - call-site references are rewritten to the most general
//!   public, available declaring ancestor
//!
//! ## Quick Start
//!
//! ```rust
//! use classopt::metadata::{Class, ClassAccessFlags, ClassPool, MemberAccessFlags, Method, MethodId};
//! use classopt::optimize::KeepMarker;
//!
//! let mut pool = ClassPool::new();
//! let class = pool.add_class(
//!     Class::program("com/example/Main", ClassAccessFlags::PUBLIC, None)
//!         .with_method(Method::new("main", "([Ljava/lang/String;)V", MemberAccessFlags::STATIC)?),
//! )?;
//! let main = MethodId { class, index: 0 };
//!
//! // an entry point must survive optimization unchanged
//! KeepMarker::mark_method(&mut pool, main);
//! assert!(pool.is_method_kept(main));
//! # Ok::<(), classopt::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `classopt` is organized into two modules:
//!
//! - [`metadata`] - the class file model: classes, members, code attributes, descriptors,
//!   the [`ClassPool`](metadata::ClassPool) registry, and the visitor traits the driving
//!   loop traverses it with
//! - [`optimize`] - the fact-propagation core: info records, the keep marker, fact
//!   filters, the reverse-dependency store with its invalidation traveller, and the
//!   member-reference generalizer
//!
//! Binary class file parsing and writing, instruction encoding, and the partial-value
//! analyzer that produces value facts are deliberately outside this crate; they meet it at
//! the [`ClassPool`](metadata::ClassPool), [`Value`](optimize::Value), and
//! [`ReferenceEditor`](optimize::ReferenceEditor) boundaries.
//!
//! ## Error Handling
//!
//! Recoverable failures return [`Result<T, Error>`](Result). Precondition violations -
//! filtering a method that was never analyzed - panic at the query site, so pass-ordering
//! bugs surface during development instead of silently producing wrong output.

/// The class file model the optimization core operates on.
pub mod metadata;

/// The incremental fact-propagation core.
pub mod optimize;

mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use classopt::prelude::*;
///
/// let pool = ClassPool::new();
/// assert!(pool.is_empty());
/// ```
pub mod prelude;

pub use error::Error;

/// The result type used throughout `classopt`.
pub type Result<T> = std::result::Result<T, Error>;
