use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers the recoverable failure modes of the optimization core: class pool
/// construction, method descriptor parsing, and reference rewriting. Precondition violations
/// (querying facts of an entity that was never analyzed) are programming errors in the enclosing
/// optimizer and deliberately panic at the query site instead of surfacing here; correct pass
/// ordering is the caller's obligation.
///
/// # Error Categories
///
/// ## Class Pool Errors
/// - [`Error::DuplicateClass`] - A class name was registered twice
/// - [`Error::ClassNotFound`] - A named class is not present in the pool
/// - [`Error::MemberNotFound`] - A referenced member is not declared by its class
///
/// ## Descriptor Errors
/// - [`Error::Descriptor`] - A method or field descriptor string is malformed
///
/// ## Editor Errors
/// - [`Error::InstructionNotFound`] - A rewrite targeted an offset with no instruction
/// - [`Error::RefKindMismatch`] - A rewrite targeted an instruction of the wrong reference kind
#[derive(Error, Debug)]
pub enum Error {
    /// A class with the same name is already registered in the pool.
    ///
    /// Class names are the lookup key for reference resolution, so each name
    /// may appear at most once per pool.
    #[error("Class is already present in the pool - {0}")]
    DuplicateClass(String),

    /// The named class is not present in the pool.
    ///
    /// Raised when superclass resolution or a rewrite site names a class that
    /// was never registered.
    #[error("Failed to find class in the pool - {0}")]
    ClassNotFound(String),

    /// The referenced member is not declared by the named class.
    ///
    /// Raised when a rewrite names a member the target class does not declare.
    #[error("Failed to find member {name}{descriptor} in class {class}")]
    MemberNotFound {
        /// Name of the class that was searched
        class: String,
        /// Name of the missing member
        name: String,
        /// Descriptor of the missing member
        descriptor: String,
    },

    /// A descriptor string does not follow the class file descriptor grammar.
    ///
    /// The offending descriptor and the reason are carried for diagnostics.
    #[error("Malformed descriptor '{descriptor}': {message}")]
    Descriptor {
        /// The descriptor that failed to parse
        descriptor: String,
        /// What was wrong with it
        message: String,
    },

    /// A rewrite targeted a bytecode offset that holds no instruction.
    #[error("No instruction at offset {offset}")]
    InstructionNotFound {
        /// The offset that was targeted
        offset: u32,
    },

    /// A rewrite targeted an instruction whose reference kind does not match.
    ///
    /// Field rewrites must target field-access instructions and method
    /// rewrites must target invocation instructions.
    #[error("Instruction at offset {offset} does not carry a {expected} reference")]
    RefKindMismatch {
        /// The offset that was targeted
        offset: u32,
        /// The reference kind the rewrite expected
        expected: &'static str,
    },
}
