use std::{
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

use crate::{
    metadata::{
        token::Token,
        typesystem::{PrimitiveKind, TypeDescriptor, TypeRc},
    },
    Error::RegistryReleased,
    Result,
};

/// A smart reference to a `TypeDescriptor` that holds the target weakly.
///
/// Descriptors reference each other (a field type refers back to the declaring class, a
/// bound `E extends Enum<E>` refers to itself) while the registry owns every descriptor
/// strongly. Keeping relationships weak prevents reference cycles from leaking a session
/// after its registry is dropped. The token is cached, so identity comparisons never need
/// to upgrade.
#[derive(Clone, Debug)]
pub struct TypeRef {
    token: Token,
    weak_ref: Weak<TypeDescriptor>,
}

impl TypeRef {
    /// Create a new `TypeRef` from a strong reference
    pub fn new(strong_ref: &TypeRc) -> Self {
        Self {
            token: strong_ref.token,
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Create a `TypeRef` for a descriptor that is still under construction
    pub(crate) fn from_weak(token: Token, weak_ref: Weak<TypeDescriptor>) -> Self {
        Self { token, weak_ref }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<TypeRc> {
        self.weak_ref.upgrade()
    }

    /// Get a strong reference to the type
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if the owning registry is gone.
    pub fn resolve(&self) -> Result<TypeRc> {
        self.weak_ref.upgrade().ok_or(RegistryReleased)
    }

    /// Check if the referenced type is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// The token of the referenced type
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }
}

impl From<TypeRc> for TypeRef {
    fn from(strong_ref: TypeRc) -> Self {
        Self::new(&strong_ref)
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

/// The fundamental category of a type descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFlavor {
    /// A built-in primitive or `void`
    Primitive(PrimitiveKind),
    /// A class or interface definition loaded from metadata; generic definitions carry their
    /// type parameters
    Class,
    /// An array over an element type; `int[][]` is an array of `int[]`
    Array {
        /// Number of dimensions, counting the nested element arrays
        rank: u32,
    },
    /// A generic definition bound to a list of type arguments
    GenericInstance,
    /// A type variable declared by a class or method
    GenericParameter {
        /// Zero based position in the owner's parameter list
        position: usize,
    },
    /// A wildcard type argument
    Wildcard {
        /// Which bound the wildcard carries
        kind: WildcardKind,
    },
}

/// The bound carried by a wildcard type argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildcardKind {
    /// `?`
    Unbounded,
    /// `? extends T`
    Extends,
    /// `? super T`
    Super,
}

/// Whether a type variable occurs in a structure
///
/// An array over a type variable is keyed by the variable's token, so it never shares a
/// cache entry with an erased array. Binding the variable later is tracked separately by
/// [`TypeKey::Array`]'s `bound_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeOrigin {
    /// No generic parameter occurs anywhere in the structure
    #[default]
    Erased,
    /// At least one generic parameter occurs in the structure
    GenericParameter,
}

impl TypeOrigin {
    /// Combine the origins of two parts of one structure
    #[must_use]
    pub fn merge(self, other: TypeOrigin) -> TypeOrigin {
        if self == TypeOrigin::GenericParameter || other == TypeOrigin::GenericParameter {
            TypeOrigin::GenericParameter
        } else {
            TypeOrigin::Erased
        }
    }
}

/// The declaration a generic parameter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericOwner {
    /// Declared by a class or interface
    Type(Token),
    /// Declared by a method
    Method(Token),
}

/// Structural cache key of a canonical type descriptor
///
/// Generic parameters have no key: each one is owned by the declaration that introduces it
/// and is only reachable through that declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// A primitive
    Primitive(PrimitiveKind),
    /// A class definition, keyed by dotted binary name
    Definition(String),
    /// A single dimension array; deeper arrays key on their element array
    Array {
        /// Token of the element type
        element: Token,
        /// The type variable the element was bound from, absent for arrays built directly
        /// over their element
        bound_from: Option<Token>,
    },
    /// A generic instance
    GenericInstance {
        /// Token of the generic definition
        definition: Token,
        /// Tokens of the type arguments in order
        args: Vec<Token>,
    },
    /// A wildcard type argument
    Wildcard {
        /// Bound kind
        kind: WildcardKind,
        /// Token of the bound, absent for `?`
        bound: Option<Token>,
    },
}
