use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every error is produced synchronously by the call that detected it. Nothing is retried
/// internally, and a failed construction never publishes a partially built descriptor into
/// the [`crate::metadata::typesystem::TypeRegistry`].
///
/// # Error Categories
///
/// ## Resolution Errors
/// - [`Error::ArgumentCount`] - Wrong number of generic type arguments
/// - [`Error::MemberNotFound`] - No field or method matches the request
/// - [`Error::AmbiguousMatch`] - More than one method matches after substitution
/// - [`Error::UnsupportedOperation`] - A reflective operation that cannot be synthesized
///
/// ## Type System Errors
/// - [`Error::TypeNotFound`] - The metadata provider does not know the class
/// - [`Error::TypeVariableNotFound`] - A signature references an undeclared type variable
/// - [`Error::NotGenericDefinition`] - Generic operation on a non-generic type
/// - [`Error::NotArrayType`] - Element access on a non-array type
/// - [`Error::TypeError`] - General type system operation error
/// - [`Error::RegistryReleased`] - The owning registry has been dropped
///
/// ## Input Errors
/// - [`Error::Malformed`] - Corrupted descriptor or generic signature string
/// - [`Error::RecursionLimit`] - Maximum recursion depth exceeded
/// - [`Error::Provider`] - The metadata provider failed
///
/// # Examples
///
/// ```rust
/// use typescope::{Error, metadata::typesystem::TypeRegistry, metadata::source::InMemoryProvider};
/// use std::sync::Arc;
///
/// let registry = TypeRegistry::new(Arc::new(InMemoryProvider::new()))?;
/// match registry.of("com.example.Missing") {
///     Err(Error::TypeNotFound(name)) => assert_eq!(name, "com.example.Missing"),
///     other => panic!("unexpected: {:?}", other.map(|t| t.to_string())),
/// }
/// # Ok::<(), typescope::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The descriptor or signature string is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A generic definition was instantiated with the wrong number of type arguments.
    #[error("Type {type_name} expects {expected} type argument(s), got {actual}")]
    ArgumentCount {
        /// The generic definition being instantiated
        type_name: String,
        /// Number of declared type parameters
        expected: usize,
        /// Number of supplied type arguments
        actual: usize,
    },

    /// No field or method matched the requested name and signature.
    #[error("No member {member} found on {type_name}")]
    MemberNotFound {
        /// The type that was searched (including its hierarchy)
        type_name: String,
        /// The requested member, rendered as `name` or `name(params)`
        member: String,
    },

    /// More than one method matched the requested signature after substitution.
    #[error("Ambiguous match for {member} on {type_name} - {candidates} candidates")]
    AmbiguousMatch {
        /// The type that was searched
        type_name: String,
        /// The requested member, rendered as `name(params)`
        member: String,
        /// Number of equally good candidates
        candidates: usize,
    },

    /// The requested reflective operation cannot be performed on metadata alone.
    #[error("Unsupported operation - {0}")]
    UnsupportedOperation(String),

    /// The metadata provider does not know the requested class.
    #[error("Failed to find type - {0}")]
    TypeNotFound(String),

    /// A signature references a type variable that is not in scope.
    #[error("Type variable {0} is not declared in the current scope")]
    TypeVariableNotFound(String),

    /// A generic operation was requested on a type that is not a generic definition.
    #[error("{0} is not a generic type definition")]
    NotGenericDefinition(String),

    /// An element type was requested from a type that is not an array.
    #[error("{0} is not an array type")]
    NotArrayType(String),

    /// General error during type system usage.
    #[error("{0}")]
    TypeError(String),

    /// The registry owning a descriptor has been dropped.
    #[error("The owning type registry has been released")]
    RegistryReleased,

    /// Recursion limit reached.
    ///
    /// To prevent stack overflow on pathological or cyclic signatures, a maximum
    /// recursion depth is enforced. The associated value is the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// The metadata provider reported a failure.
    #[error("Metadata provider failure - {0}")]
    Provider(String),
}
