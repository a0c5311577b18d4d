//! Canonical type descriptors for JVM-style class metadata.
//!
//! This module provides the reflection view of types: class definitions loaded from a
//! [`crate::metadata::source::MetadataProvider`], primitives, arrays, generic instances,
//! generic parameters and wildcards. Every descriptor is canonical within its
//! [`TypeRegistry`]: two structurally equal types are the same `Arc`, so equality and
//! hashing are token comparisons.
//!
//! # Key Components
//!
//! - [`TypeDescriptor`]: the type representation
//! - [`TypeRegistry`]: the session-wide cache publishing descriptors
//! - [`TypeResolver`]: turns parsed signatures into descriptors
//! - [`GenericBinder`]: instantiation, substitution, inference and erasure
//! - [`TypeBuilder`]: fluent construction of composite types
//! - [`TypeSignatureHash`]: identity hashing for members
//!
//! # Lazily computed facets
//!
//! A descriptor is immutable once published. Its base type, interfaces, member table and
//! (for class level type variables) bounds are computed on first use and then set once.
//! A failed computation leaves the facet unset, so the next call retries it.
//!
//! # Examples
//!
//! ```rust
//! use typescope::prelude::*;
//! use std::sync::Arc;
//!
//! let provider = InMemoryProvider::new();
//! provider.register(ClassBuilder::new("com.example.Item").build());
//!
//! let registry = TypeRegistry::new(Arc::new(provider))?;
//! let item = registry.of("com.example.Item")?;
//! let items = item.make_array_type()?;
//!
//! assert_eq!(items.fullname(), "com.example.Item[]");
//! assert_eq!(items.element_type()?, item);
//! assert_eq!(item.base_type()?, Some(registry.object()));
//! # Ok::<(), typescope::Error>(())
//! ```

mod base;
mod binder;
mod builder;
mod hash;
mod primitives;
mod registry;
mod resolver;

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, OnceLock, Weak},
};

pub use base::{GenericOwner, TypeFlavor, TypeKey, TypeOrigin, TypeRef, WildcardKind};
pub use binder::{GenericBinder, TypeBindings};
pub use builder::TypeBuilder;
pub use hash::TypeSignatureHash;
pub use primitives::PrimitiveKind;
pub use registry::TypeRegistry;
pub use resolver::TypeResolver;

use crate::{
    metadata::{
        members::{FieldRc, MemberResolver, MemberTable, MethodRc},
        signatures::{SignatureClassDecl, TypeSignature},
        source::{ClassMetadata, ClassModifiers},
        token::Token,
    },
    Error::{NotArrayType, NotGenericDefinition, RegistryReleased},
    Result,
};

/// Reference to a `TypeDescriptor`
pub type TypeRc = Arc<TypeDescriptor>;
/// A vector that holds `TypeRef` instances, appended to concurrently
pub type TypeRefList = Arc<boxcar::Vec<TypeRef>>;

/// Represents a 'Type': a class definition, a primitive or a type constructed from other
/// descriptors. The `Token` identifies the descriptor within its registry; because
/// descriptors are canonical, the token also stands for the full structure.
pub struct TypeDescriptor {
    /// Token
    pub token: Token,
    /// The fundamental category
    pub flavor: TypeFlavor,
    /// Package of the type, empty for primitives, parameters and wildcards
    pub namespace: String,
    /// Simple name; for constructed types the rendered structure, e.g. `List<java.lang.Double>`
    pub name: String,
    /// Class flags; constructed types inherit them from their definition
    pub modifiers: ClassModifiers,
    /// Whether a generic parameter occurs anywhere in this structure
    pub origin: TypeOrigin,
    /// Generic definition of an instance
    definition: Option<TypeRef>,
    /// Element of an array
    element: Option<TypeRef>,
    /// Type variable an array's element was substituted for
    bound_from: Option<TypeRef>,
    /// Type arguments of an instance
    type_args: Vec<TypeRef>,
    /// Type parameters of a generic definition
    generic_params: Vec<TypeRc>,
    /// Declaration owning a generic parameter
    owner: Option<GenericOwner>,
    /// Class declaring a generic parameter (for method parameters, the method's class)
    declaring: Option<TypeRef>,
    /// Bound of a wildcard
    bound: Option<TypeRef>,
    /// Unresolved bounds of a class level generic parameter
    bound_signatures: Vec<TypeSignature>,
    /// Parsed generic class signature of a definition
    class_signature: Option<SignatureClassDecl>,
    /// This types base aka 'extends'
    base: OnceLock<Option<TypeRef>>,
    /// Direct super-interfaces
    interfaces: OnceLock<Vec<TypeRef>>,
    /// Bounds of a generic parameter
    bounds: OnceLock<Vec<TypeRef>>,
    /// Declared fields and methods
    members: OnceLock<MemberTable>,
    /// Arrays and instances constructed from this descriptor
    constructed: TypeRefList,
    /// Raw metadata of a definition (shared with its instances)
    raw: Option<Arc<dyn ClassMetadata>>,
    /// The registry this descriptor is published in
    registry: Weak<TypeRegistry>,
}

impl TypeDescriptor {
    /// Create a new descriptor with every relationship empty
    pub(crate) fn new(
        token: Token,
        flavor: TypeFlavor,
        namespace: &str,
        name: &str,
        registry: Weak<TypeRegistry>,
    ) -> Self {
        TypeDescriptor {
            token,
            flavor,
            namespace: namespace.to_string(),
            name: name.to_string(),
            modifiers: ClassModifiers::empty(),
            origin: TypeOrigin::Erased,
            definition: None,
            element: None,
            bound_from: None,
            type_args: Vec::new(),
            generic_params: Vec::new(),
            owner: None,
            declaring: None,
            bound: None,
            bound_signatures: Vec::new(),
            class_signature: None,
            base: OnceLock::new(),
            interfaces: OnceLock::new(),
            bounds: OnceLock::new(),
            members: OnceLock::new(),
            constructed: Arc::new(boxcar::Vec::new()),
            raw: None,
            registry,
        }
    }

    /// Returns the full name (`namespace.name`) of the type
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// The registry this descriptor belongs to
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if the registry has been dropped.
    pub fn registry(&self) -> Result<Arc<TypeRegistry>> {
        self.registry.upgrade().ok_or(RegistryReleased)
    }

    /// Raw metadata this type was loaded from (definitions and their instances)
    #[must_use]
    pub fn raw(&self) -> Option<&Arc<dyn ClassMetadata>> {
        self.raw.as_ref()
    }

    /// The parsed generic class signature of a definition, if it declared one
    #[must_use]
    pub fn class_signature(&self) -> Option<&SignatureClassDecl> {
        self.class_signature.as_ref()
    }

    /// The primitive kind, for primitive descriptors
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.flavor {
            TypeFlavor::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns true for primitives and `void`
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Primitive(_))
    }

    /// Returns true for every type a reference can point to
    #[must_use]
    pub fn is_reference_type(&self) -> bool {
        !self.is_primitive() && !self.is_wildcard()
    }

    /// Returns true for array types
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Array { .. })
    }

    /// Returns true for interface definitions and their instances
    #[must_use]
    pub fn is_interface(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Class | TypeFlavor::GenericInstance)
            && self.modifiers.is_interface()
    }

    /// Returns true for type variables
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.flavor, TypeFlavor::GenericParameter { .. })
    }

    /// Returns true for wildcard type arguments
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Wildcard { .. })
    }

    /// Returns true for definitions declaring at least one type parameter
    #[must_use]
    pub fn is_generic_type_definition(&self) -> bool {
        self.flavor == TypeFlavor::Class && !self.generic_params.is_empty()
    }

    /// Returns true for generic definitions and generic instances
    #[must_use]
    pub fn is_generic_type(&self) -> bool {
        self.flavor == TypeFlavor::GenericInstance || self.is_generic_type_definition()
    }

    /// Returns true if a generic parameter occurs anywhere in this structure
    #[must_use]
    pub fn contains_generic_parameters(&self) -> bool {
        self.origin == TypeOrigin::GenericParameter
    }

    /// The type parameters declared by a generic definition
    #[must_use]
    pub fn generic_parameters(&self) -> &[TypeRc] {
        &self.generic_params
    }

    /// The type arguments of an instance, or the type parameters of a definition
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if an argument is gone.
    pub fn generic_arguments(&self) -> Result<Vec<TypeRc>> {
        if self.flavor == TypeFlavor::GenericInstance {
            self.type_args.iter().map(TypeRef::resolve).collect()
        } else {
            Ok(self.generic_params.clone())
        }
    }

    /// Tokens of the type arguments of an instance
    #[must_use]
    pub fn generic_argument_tokens(&self) -> Vec<Token> {
        self.type_args.iter().map(TypeRef::token).collect()
    }

    /// The canonical unbound definition of a generic type
    ///
    /// Returns the definition for an instance, and the type itself for a definition.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotGenericDefinition`] for non-generic types.
    pub fn generic_type_definition(self: &Arc<Self>) -> Result<TypeRc> {
        match (&self.definition, self.is_generic_type_definition()) {
            (Some(definition), _) => definition.resolve(),
            (None, true) => Ok(self.clone()),
            (None, false) => Err(NotGenericDefinition(self.fullname())),
        }
    }

    /// The element type of an array
    ///
    /// # Errors
    /// Returns [`crate::Error::NotArrayType`] if this is not an array.
    pub fn element_type(&self) -> Result<TypeRc> {
        match &self.element {
            Some(element) => element.resolve(),
            None => Err(NotArrayType(self.fullname())),
        }
    }

    /// The type variable whose binding produced the element of this array
    ///
    /// Absent for arrays built directly over their element type. `T[]` with `T` bound to
    /// `java.lang.Object` keeps `T` here and is a different descriptor than the
    /// `java.lang.Object[]` that `make_array_type` returns.
    #[must_use]
    pub fn bound_parameter(&self) -> Option<TypeRc> {
        self.bound_from.as_ref().and_then(TypeRef::upgrade)
    }

    /// The number of dimensions of an array, `2` for `int[][]`
    #[must_use]
    pub fn array_rank(&self) -> Option<u32> {
        match self.flavor {
            TypeFlavor::Array { rank } => Some(rank),
            _ => None,
        }
    }

    /// The declaration owning a generic parameter
    #[must_use]
    pub fn generic_owner(&self) -> Option<GenericOwner> {
        self.owner
    }

    /// Position of a generic parameter within its owner's list
    #[must_use]
    pub fn generic_parameter_position(&self) -> Option<usize> {
        match self.flavor {
            TypeFlavor::GenericParameter { position } => Some(position),
            _ => None,
        }
    }

    /// The class declaring a generic parameter
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        self.declaring.as_ref().and_then(TypeRef::upgrade)
    }

    /// The bound of a wildcard, absent for `?`
    #[must_use]
    pub fn wildcard_bound(&self) -> Option<TypeRc> {
        self.bound.as_ref().and_then(TypeRef::upgrade)
    }

    /// Arrays and generic instances constructed from this descriptor so far
    #[must_use]
    pub fn constructed_types(&self) -> Vec<TypeRc> {
        self.constructed
            .iter()
            .filter_map(|(_, entry)| entry.upgrade())
            .collect()
    }

    /// The direct base type
    ///
    /// - classes: the (generic) superclass; `None` for the root class and interfaces
    /// - instances: the definition's superclass with this instance's arguments substituted
    /// - arrays: `java.lang.Object`
    /// - type variables: the first class bound, otherwise `java.lang.Object`
    /// - wildcards: the upper bound, otherwise `java.lang.Object`
    ///
    /// # Errors
    /// Returns an error if the superclass cannot be loaded or its signature is malformed.
    pub fn base_type(self: &Arc<Self>) -> Result<Option<TypeRc>> {
        if let Some(base) = self.base.get() {
            return Ok(base.as_ref().and_then(TypeRef::upgrade));
        }

        let registry = self.registry()?;
        let computed = registry.compute_base_type(self)?;
        let _ = self.base.set(computed.as_ref().map(TypeRef::new));

        Ok(self
            .base
            .get()
            .and_then(|base| base.as_ref().and_then(TypeRef::upgrade)))
    }

    /// The direct super-interfaces, substituted for instances
    ///
    /// # Errors
    /// Returns an error if an interface cannot be loaded or its signature is malformed.
    pub fn interfaces(self: &Arc<Self>) -> Result<Vec<TypeRc>> {
        if let Some(interfaces) = self.interfaces.get() {
            return interfaces.iter().map(TypeRef::resolve).collect();
        }

        let registry = self.registry()?;
        let computed = registry.compute_interfaces(self)?;
        let _ = self
            .interfaces
            .set(computed.iter().map(TypeRef::new).collect());

        match self.interfaces.get() {
            Some(interfaces) => interfaces.iter().map(TypeRef::resolve).collect(),
            None => Ok(computed),
        }
    }

    /// The declared bounds of a type variable, or the bound of a bounded wildcard
    ///
    /// Class level bounds are resolved on first use, which is what allows self-referential
    /// declarations such as `E extends Enum<E>`.
    ///
    /// # Errors
    /// Returns an error if a bound cannot be resolved.
    pub fn bounds(self: &Arc<Self>) -> Result<Vec<TypeRc>> {
        match self.flavor {
            TypeFlavor::GenericParameter { .. } => {}
            TypeFlavor::Wildcard {
                kind: WildcardKind::Extends,
            } => return Ok(self.wildcard_bound().into_iter().collect()),
            _ => return Ok(Vec::new()),
        }

        if let Some(bounds) = self.bounds.get() {
            return bounds.iter().map(TypeRef::resolve).collect();
        }

        let registry = self.registry()?;
        let computed = registry.compute_parameter_bounds(self)?;
        let _ = self.bounds.set(computed.iter().map(TypeRef::new).collect());

        match self.bounds.get() {
            Some(bounds) => bounds.iter().map(TypeRef::resolve).collect(),
            None => Ok(computed),
        }
    }

    /// Set the bounds of a method level type variable before it is published
    pub(crate) fn set_bounds(&self, bounds: &[TypeRc]) {
        let _ = self.bounds.set(bounds.iter().map(TypeRef::new).collect());
    }

    pub(crate) fn bound_signatures(&self) -> &[TypeSignature] {
        &self.bound_signatures
    }

    pub(crate) fn member_cell(&self) -> &OnceLock<MemberTable> {
        &self.members
    }

    pub(crate) fn push_constructed(&self, constructed: &TypeRc) {
        self.constructed.push(TypeRef::new(constructed));
    }

    /// Create the array type with this element type and rank 1
    ///
    /// # Errors
    /// Returns an error for `void` and wildcard elements.
    pub fn make_array_type(self: &Arc<Self>) -> Result<TypeRc> {
        self.registry()?.make_array_type(self, 1)
    }

    /// Create the array type with this element type and the given number of dimensions
    ///
    /// A rank of 2 yields the array of arrays, the same descriptor as calling
    /// `make_array_type` twice.
    ///
    /// # Errors
    /// Returns an error for a zero rank, `void` and wildcard elements.
    pub fn make_array_type_rank(self: &Arc<Self>, rank: u32) -> Result<TypeRc> {
        self.registry()?.make_array_type(self, rank)
    }

    /// Bind this generic definition to type arguments
    ///
    /// # Errors
    /// Returns [`crate::Error::NotGenericDefinition`] or [`crate::Error::ArgumentCount`].
    pub fn make_generic_type(self: &Arc<Self>, args: &[TypeRc]) -> Result<TypeRc> {
        self.registry()?.make_generic_type(self, args)
    }

    /// Returns true if a value of this type can be assigned to `target`
    ///
    /// # Errors
    /// Returns an error if a supertype cannot be loaded.
    pub fn is_assignable_to(self: &Arc<Self>, target: &TypeRc) -> Result<bool> {
        let registry = self.registry()?;
        GenericBinder::new(&registry).is_assignable(self, target)
    }

    /// Find a field by name on this type or its base chain
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if no such field exists.
    pub fn get_field(self: &Arc<Self>, name: &str) -> Result<FieldRc> {
        let registry = self.registry()?;
        MemberResolver::new(&registry).get_field(self, name)
    }

    /// All fields visible on this type, declared ones first
    ///
    /// # Errors
    /// Returns an error if the member table of a type in the chain cannot be built.
    pub fn get_fields(self: &Arc<Self>) -> Result<Vec<FieldRc>> {
        let registry = self.registry()?;
        MemberResolver::new(&registry).get_fields(self)
    }

    /// Fields declared by this type only
    ///
    /// # Errors
    /// Returns an error if the member table cannot be built.
    pub fn get_declared_fields(self: &Arc<Self>) -> Result<Vec<FieldRc>> {
        let registry = self.registry()?;
        MemberResolver::new(&registry).get_declared_fields(self)
    }

    /// Resolve a method by name and exact parameter types
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] or [`crate::Error::AmbiguousMatch`].
    pub fn get_method(self: &Arc<Self>, name: &str, params: &[TypeRc]) -> Result<MethodRc> {
        let registry = self.registry()?;
        MemberResolver::new(&registry).get_method(self, name, params)
    }

    /// All methods visible on this type, excluding constructors and overridden methods
    ///
    /// # Errors
    /// Returns an error if the member table of a type in the hierarchy cannot be built.
    pub fn get_methods(self: &Arc<Self>) -> Result<Vec<MethodRc>> {
        let registry = self.registry()?;
        MemberResolver::new(&registry).get_methods(self)
    }

    /// All visible methods with the given name
    ///
    /// # Errors
    /// Returns an error if the member table of a type in the hierarchy cannot be built.
    pub fn get_methods_named(self: &Arc<Self>, name: &str) -> Result<Vec<MethodRc>> {
        let registry = self.registry()?;
        MemberResolver::new(&registry).get_methods_named(self, name)
    }

    /// Methods and constructors declared by this type only
    ///
    /// # Errors
    /// Returns an error if the member table cannot be built.
    pub fn get_declared_methods(self: &Arc<Self>) -> Result<Vec<MethodRc>> {
        let registry = self.registry()?;
        MemberResolver::new(&registry).get_declared_methods(self)
    }

    /// Resolve a constructor by exact parameter types
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if no constructor matches.
    pub fn get_constructor(self: &Arc<Self>, params: &[TypeRc]) -> Result<MethodRc> {
        let registry = self.registry()?;
        MemberResolver::new(&registry).get_constructor(self, params)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fullname())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("token", &self.token)
            .field("flavor", &self.flavor)
            .field("fullname", &self.fullname())
            .field("origin", &self.origin)
            .field("bound_from", &self.bound_from.as_ref().map(TypeRef::token))
            .finish()
    }
}

/// Splits a dotted binary name into package and simple name
pub(crate) fn split_name(fullname: &str) -> (&str, &str) {
    match fullname.rfind('.') {
        Some(index) => (&fullname[..index], &fullname[index + 1..]),
        None => ("", fullname),
    }
}
