//! Generic instantiation, substitution, inference and erasure.
//!
//! This module provides [`GenericBinder`], the piece of the type system that moves between
//! generic definitions and their instances, together with [`TypeBindings`], the ordered
//! parameter to argument map it works with.
//!
//! # Operations
//!
//! - **instantiate**: bind a generic definition to type arguments through the registry
//! - **substitute**: replace bound type variables inside a structure, recursing through
//!   arrays, instance arguments and wildcard bounds; unchanged structures come back as-is.
//!   An array over a substituted variable remembers the variable, so `T[]` bound to
//!   `java.lang.Object` is not the `java.lang.Object[]` built directly
//! - **same_shape**: structural comparison that reads such arrays as plain arrays
//! - **infer**: unify declared parameter types containing method level type variables with
//!   concrete types, producing bindings only when every argument is a reference type that
//!   satisfies its variable's bounds
//! - **erasure**: the raw runtime representation of a type
//! - **is_assignable**: erased reference assignability; no boxing and no primitive widening
//!
//! # Examples
//!
//! ```rust
//! use typescope::prelude::*;
//! use std::sync::Arc;
//!
//! let provider = InMemoryProvider::new();
//! provider.register(
//!     ClassBuilder::new("java.util.List")
//!         .interface()
//!         .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
//!         .build(),
//! );
//! provider.register(ClassBuilder::new("java.lang.Double").build());
//! let registry = TypeRegistry::new(Arc::new(provider))?;
//!
//! let list = registry.of("java.util.List")?;
//! let double = registry.of("java.lang.Double")?;
//! let binder = GenericBinder::new(&registry);
//!
//! let instance = binder.instantiate(&list, &[double.clone()])?;
//! let bindings = TypeBindings::from_instance(&instance)?;
//! let element = list.generic_parameters()[0].make_array_type()?;
//!
//! let substituted = binder.substitute(&element, &bindings)?;
//! assert_ne!(substituted, double.make_array_type()?);
//! assert!(binder.same_shape(&substituted, &double.make_array_type()?)?);
//! assert_eq!(binder.erasure(&instance)?, list);
//! # Ok::<(), typescope::Error>(())
//! ```

use std::collections::{HashSet, VecDeque};

use crate::{
    metadata::{
        source::OBJECT_CLASS,
        typesystem::{TypeDescriptor, TypeFlavor, TypeRc, TypeRegistry, WildcardKind},
    },
    Error::RecursionLimit,
    Result,
};

/// Super-interfaces every array type implements
const ARRAY_INTERFACES: [&str; 2] = ["java.lang.Cloneable", "java.io.Serializable"];

/// An ordered map from generic parameters to the types bound to them
///
/// Parameters are compared by token, so a binding for `T` of one class never applies to
/// a `T` declared elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeBindings {
    entries: Vec<(TypeRc, TypeRc)>,
}

impl TypeBindings {
    /// Create an empty binding set
    #[must_use]
    pub fn new() -> Self {
        TypeBindings {
            entries: Vec::new(),
        }
    }

    /// The bindings established by a generic instance: each parameter of its definition to
    /// the matching argument
    ///
    /// Any other type yields an empty binding set.
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if the definition or an argument is gone.
    pub fn from_instance(instance: &TypeRc) -> Result<Self> {
        if instance.flavor != TypeFlavor::GenericInstance {
            return Ok(TypeBindings::new());
        }

        let definition = instance.generic_type_definition()?;
        let entries = definition
            .generic_parameters()
            .iter()
            .cloned()
            .zip(instance.generic_arguments()?)
            .collect();
        Ok(TypeBindings { entries })
    }

    /// Bind `param` to `arg`, returning the previous binding
    pub fn bind(&mut self, param: &TypeRc, arg: &TypeRc) -> Option<TypeRc> {
        match self
            .entries
            .iter_mut()
            .find(|(bound, _)| bound.token == param.token)
        {
            Some((_, existing)) => Some(std::mem::replace(existing, arg.clone())),
            None => {
                self.entries.push((param.clone(), arg.clone()));
                None
            }
        }
    }

    /// The type bound to `param`
    #[must_use]
    pub fn get(&self, param: &TypeDescriptor) -> Option<&TypeRc> {
        self.entries
            .iter()
            .find(|(bound, _)| bound.token == param.token)
            .map(|(_, arg)| arg)
    }

    /// Add every binding of `other`, replacing bindings of the same parameter
    pub fn merge(&mut self, other: &TypeBindings) {
        for (param, arg) in &other.entries {
            self.bind(param, arg);
        }
    }

    /// Number of bound parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(parameter, argument)` pairs in binding order
    pub fn iter(&self) -> impl Iterator<Item = (&TypeRc, &TypeRc)> {
        self.entries.iter().map(|(param, arg)| (param, arg))
    }
}

/// Generic instantiation and substitution over one registry
pub struct GenericBinder<'a> {
    registry: &'a TypeRegistry,
    max_depth: usize,
}

impl<'a> GenericBinder<'a> {
    /// Create a binder working on `registry`
    pub fn new(registry: &'a TypeRegistry) -> Self {
        GenericBinder {
            registry,
            max_depth: registry.config().max_recursion_depth,
        }
    }

    /// Bind a generic definition to type arguments
    ///
    /// # Errors
    /// Returns [`crate::Error::ArgumentCount`] if the number of arguments does not match,
    /// [`crate::Error::NotGenericDefinition`] if `definition` is not generic.
    pub fn instantiate(&self, definition: &TypeRc, args: &[TypeRc]) -> Result<TypeRc> {
        self.registry.make_generic_type(definition, args)
    }

    /// Replace every bound type variable inside `ty`
    ///
    /// Structures without generic parameters, and structures none of whose parameters are
    /// bound, are returned unchanged.
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] on excessive nesting, or an error from
    /// constructing the substituted structure.
    pub fn substitute(&self, ty: &TypeRc, bindings: &TypeBindings) -> Result<TypeRc> {
        self.substitute_with_depth(ty, bindings, 0)
    }

    fn substitute_with_depth(
        &self,
        ty: &TypeRc,
        bindings: &TypeBindings,
        depth: usize,
    ) -> Result<TypeRc> {
        if depth >= self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }
        if !ty.contains_generic_parameters() || bindings.is_empty() {
            return Ok(ty.clone());
        }

        match ty.flavor {
            TypeFlavor::GenericParameter { .. } => {
                Ok(bindings.get(ty).cloned().unwrap_or_else(|| ty.clone()))
            }
            TypeFlavor::Array { .. } => {
                let element = ty.element_type()?;
                let substituted = self.substitute_with_depth(&element, bindings, depth + 1)?;
                if substituted == element {
                    return Ok(ty.clone());
                }
                if element.is_generic_parameter() {
                    return self.registry.make_bound_array_type(&substituted, &element);
                }
                self.registry.make_array_type(&substituted, 1)
            }
            TypeFlavor::GenericInstance => {
                let args = ty.generic_arguments()?;
                let substituted = args
                    .iter()
                    .map(|arg| self.substitute_with_depth(arg, bindings, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                if substituted == args {
                    return Ok(ty.clone());
                }
                self.registry
                    .make_generic_type(&ty.generic_type_definition()?, &substituted)
            }
            TypeFlavor::Wildcard { kind } => match ty.wildcard_bound() {
                Some(bound) => {
                    let substituted = self.substitute_with_depth(&bound, bindings, depth + 1)?;
                    if substituted == bound {
                        return Ok(ty.clone());
                    }
                    self.registry.make_wildcard(kind, Some(&substituted))
                }
                None => Ok(ty.clone()),
            },
            TypeFlavor::Primitive(_) | TypeFlavor::Class => Ok(ty.clone()),
        }
    }

    /// Infer method level type arguments from concrete parameter types
    ///
    /// Returns the inferred bindings if `declared` can be made identical to `actual` by
    /// binding the variables of `method_params`, every inferred argument is a reference
    /// type, and every argument satisfies its variable's bounds. `context` carries bindings
    /// of the declaring type that bounds may refer to.
    ///
    /// ## Arguments
    /// * 'declared'      - The declared parameter types
    /// * 'actual'        - The requested parameter types
    /// * 'method_params' - The method's own type parameters
    /// * 'context'       - Bindings of the declaring type
    ///
    /// # Errors
    /// Returns an error if a bound cannot be resolved or a substituted type cannot be built.
    pub fn infer(
        &self,
        declared: &[TypeRc],
        actual: &[TypeRc],
        method_params: &[TypeRc],
        context: &TypeBindings,
    ) -> Result<Option<TypeBindings>> {
        if declared.len() != actual.len() {
            return Ok(None);
        }

        let mut inferred = TypeBindings::new();
        for (declared, actual) in declared.iter().zip(actual) {
            if !self.unify(declared, actual, method_params, &mut inferred, 0)? {
                return Ok(None);
            }
        }

        let mut scope = context.clone();
        scope.merge(&inferred);

        for (param, arg) in inferred.iter() {
            for bound in param.bounds()? {
                let bound = self.substitute(&bound, &scope)?;
                if !self.is_assignable(arg, &bound)? {
                    return Ok(None);
                }
            }
        }

        for (declared, actual) in declared.iter().zip(actual) {
            if !self.same_shape(&self.substitute(declared, &scope)?, actual)? {
                return Ok(None);
            }
        }

        Ok(Some(inferred))
    }

    fn unify(
        &self,
        declared: &TypeRc,
        actual: &TypeRc,
        method_params: &[TypeRc],
        inferred: &mut TypeBindings,
        depth: usize,
    ) -> Result<bool> {
        if depth >= self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }

        if declared.is_generic_parameter() && method_params.contains(declared) {
            if !actual.is_reference_type() {
                return Ok(false);
            }
            if let Some(existing) = inferred.get(declared) {
                return Ok(existing == actual);
            }
            inferred.bind(declared, actual);
            return Ok(true);
        }

        if !declared.contains_generic_parameters() {
            return Ok(declared.token == actual.token);
        }

        match (declared.flavor, actual.flavor) {
            (TypeFlavor::Array { .. }, TypeFlavor::Array { .. }) => {
                self.unify(
                    &declared.element_type()?,
                    &actual.element_type()?,
                    method_params,
                    inferred,
                    depth + 1,
                )
            }
            (TypeFlavor::GenericInstance, TypeFlavor::GenericInstance) => {
                if declared.generic_type_definition()? != actual.generic_type_definition()? {
                    return Ok(false);
                }
                for (declared, actual) in declared
                    .generic_arguments()?
                    .iter()
                    .zip(actual.generic_arguments()?.iter())
                {
                    if !self.unify(declared, actual, method_params, inferred, depth + 1)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (TypeFlavor::Wildcard { kind: left }, TypeFlavor::Wildcard { kind: right })
                if left == right =>
            {
                match (declared.wildcard_bound(), actual.wildcard_bound()) {
                    (Some(declared), Some(actual)) => {
                        self.unify(&declared, &actual, method_params, inferred, depth + 1)
                    }
                    (None, None) => Ok(true),
                    _ => Ok(false),
                }
            }
            _ => Ok(declared.token == actual.token),
        }
    }

    /// Returns true if `left` and `right` have the same structure
    ///
    /// Identical descriptors match. Arrays match when their elements do, whichever type
    /// variable they were bound from; instances of one definition match when their
    /// arguments do, and wildcards of one kind when their bounds do.
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] on excessive nesting.
    pub fn same_shape(&self, left: &TypeRc, right: &TypeRc) -> Result<bool> {
        self.same_shape_with_depth(left, right, 0)
    }

    fn same_shape_with_depth(&self, left: &TypeRc, right: &TypeRc, depth: usize) -> Result<bool> {
        if depth >= self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }
        if left.token == right.token {
            return Ok(true);
        }

        match (left.flavor, right.flavor) {
            (TypeFlavor::Array { .. }, TypeFlavor::Array { .. }) => self.same_shape_with_depth(
                &left.element_type()?,
                &right.element_type()?,
                depth + 1,
            ),
            (TypeFlavor::GenericInstance, TypeFlavor::GenericInstance) => {
                if left.generic_type_definition()? != right.generic_type_definition()? {
                    return Ok(false);
                }
                for (left, right) in left
                    .generic_arguments()?
                    .iter()
                    .zip(right.generic_arguments()?.iter())
                {
                    if !self.same_shape_with_depth(left, right, depth + 1)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (TypeFlavor::Wildcard { kind: left_kind }, TypeFlavor::Wildcard { kind: right_kind })
                if left_kind == right_kind =>
            {
                match (left.wildcard_bound(), right.wildcard_bound()) {
                    (Some(left), Some(right)) => self.same_shape_with_depth(&left, &right, depth + 1),
                    (None, None) => Ok(true),
                    _ => Ok(false),
                }
            }
            _ => Ok(false),
        }
    }

    /// The erased runtime type
    ///
    /// - instances: their generic definition
    /// - type variables: the erasure of the first bound, otherwise `java.lang.Object`
    /// - arrays: the array of the erased element, built directly over it
    /// - wildcards: the erasure of an upper bound, otherwise `java.lang.Object`
    ///
    /// # Errors
    /// Returns an error if a bound cannot be resolved.
    pub fn erasure(&self, ty: &TypeRc) -> Result<TypeRc> {
        self.erasure_with_depth(ty, 0)
    }

    fn erasure_with_depth(&self, ty: &TypeRc, depth: usize) -> Result<TypeRc> {
        if depth >= self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }

        match ty.flavor {
            TypeFlavor::GenericInstance => ty.generic_type_definition(),
            TypeFlavor::GenericParameter { .. } => match ty.bounds()?.first() {
                Some(bound) => self.erasure_with_depth(bound, depth + 1),
                None => Ok(self.registry.object()),
            },
            TypeFlavor::Array { .. } => {
                let element = ty.element_type()?;
                let erased = self.erasure_with_depth(&element, depth + 1)?;
                if erased == element && ty.bound_parameter().is_none() {
                    return Ok(ty.clone());
                }
                self.registry.make_array_type(&erased, 1)
            }
            TypeFlavor::Wildcard {
                kind: WildcardKind::Extends,
            } => match ty.wildcard_bound() {
                Some(bound) => self.erasure_with_depth(&bound, depth + 1),
                None => Ok(self.registry.object()),
            },
            TypeFlavor::Wildcard { .. } => Ok(self.registry.object()),
            TypeFlavor::Primitive(_) | TypeFlavor::Class => Ok(ty.clone()),
        }
    }

    /// Returns true if a value of type `from` can be assigned to `to`
    ///
    /// Both sides are erased first. Primitives are only assignable to themselves; reference
    /// types are assignable to their superclasses, super-interfaces and `java.lang.Object`;
    /// arrays are covariant in reference elements.
    ///
    /// # Errors
    /// Returns an error if a supertype cannot be loaded.
    pub fn is_assignable(&self, from: &TypeRc, to: &TypeRc) -> Result<bool> {
        let from = self.erasure(from)?;
        let to = self.erasure(to)?;

        if from == to {
            return Ok(true);
        }
        if from.is_primitive() || to.is_primitive() {
            return Ok(false);
        }
        if to.fullname() == OBJECT_CLASS {
            return Ok(true);
        }

        match (from.array_rank(), to.array_rank()) {
            (Some(_), Some(_)) => {
                let from_element = from.element_type()?;
                let to_element = to.element_type()?;
                if from_element == to_element {
                    return Ok(true);
                }
                if from_element.is_primitive() || to_element.is_primitive() {
                    return Ok(false);
                }
                self.is_assignable(&from_element, &to_element)
            }
            (Some(_), None) => Ok(ARRAY_INTERFACES.contains(&to.fullname().as_str())),
            (None, Some(_)) => Ok(false),
            (None, None) => self.is_subtype(&from, &to),
        }
    }

    /// Breadth first walk over erased superclasses and super-interfaces
    fn is_subtype(&self, from: &TypeRc, to: &TypeRc) -> Result<bool> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([from.clone()]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.token) {
                continue;
            }
            if current == *to {
                return Ok(true);
            }

            if let Some(base) = current.base_type()? {
                queue.push_back(self.erasure(&base)?);
            }
            for interface in current.interfaces()? {
                queue.push_back(self.erasure(&interface)?);
            }
        }

        Ok(false)
    }
}
