//! Builder for composite type descriptors.
//!
//! This module provides the [`TypeBuilder`] struct, a fluent API for composing descriptors
//! out of a starting type: primitives, classes, generic instances, arrays and wildcards.
//! Every step goes through the [`TypeRegistry`], so the result is the same canonical
//! descriptor that a signature naming the same structure resolves to.
//!
//! # Example
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
//! let matrix = TypeBuilder::new(registry.clone())
//!     .class("java.util.List")?
//!     .generic_instance(|registry| Ok(vec![registry.of("java.lang.Double")?]))?
//!     .array()?
//!     .build()?;
//!
//! assert_eq!(matrix.fullname(), "java.util.List<java.lang.Double>[]");
//! # Ok::<(), typescope::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    metadata::typesystem::{PrimitiveKind, TypeRc, TypeRegistry, WildcardKind},
    Error::TypeError,
    Result,
};

/// Provides a fluent API for building type descriptors
pub struct TypeBuilder {
    /// Type registry the descriptors are published in
    registry: Arc<TypeRegistry>,
    /// Current type being built
    current_type: Option<TypeRc>,
}

impl TypeBuilder {
    /// Create a new builder with the given registry
    ///
    /// ## Arguments
    /// * 'registry' - The type registry to use
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        TypeBuilder {
            registry,
            current_type: None,
        }
    }

    /// Start building from a primitive type
    ///
    /// # Arguments
    /// * `primitive` - The primitive kind
    #[must_use]
    pub fn primitive(mut self, primitive: PrimitiveKind) -> Self {
        self.current_type = Some(self.registry.primitive(primitive));
        self
    }

    /// Start building from a class, loading it if necessary
    ///
    /// ## Arguments
    /// * 'name' - Dotted binary name of the class
    ///
    /// # Errors
    /// Returns an error if the class cannot be loaded.
    pub fn class(mut self, name: &str) -> Result<Self> {
        self.current_type = Some(self.registry.of(name)?);
        Ok(self)
    }

    /// Start building from an existing descriptor
    #[must_use]
    pub fn from_type(mut self, ty: &TypeRc) -> Self {
        self.current_type = Some(ty.clone());
        self
    }

    /// Bind the current generic definition to type arguments
    ///
    /// ## Arguments
    /// * 'arg_builder' - Produces the type arguments from the registry
    ///
    /// # Errors
    /// Returns an error if no current type is set, if the argument builder fails, or if the
    /// generic instance cannot be created.
    pub fn generic_instance<F>(mut self, arg_builder: F) -> Result<Self>
    where
        F: FnOnce(&Arc<TypeRegistry>) -> Result<Vec<TypeRc>>,
    {
        let definition = self.take_current("generic instance")?;
        let args = arg_builder(&self.registry)?;

        self.current_type = Some(self.registry.make_generic_type(&definition, &args)?);
        Ok(self)
    }

    /// Make the current type the element of a single dimension array
    ///
    /// # Errors
    /// Returns an error if no current type is set or it cannot be an array element.
    pub fn array(self) -> Result<Self> {
        self.multi_dimensional_array(1)
    }

    /// Wrap the current type in `rank` nested arrays
    ///
    /// ## Arguments
    /// * 'rank' - Number of dimensions
    ///
    /// # Errors
    /// Returns an error if no current type is set, the rank is zero or the current type
    /// cannot be an array element.
    pub fn multi_dimensional_array(mut self, rank: u32) -> Result<Self> {
        let element = self.take_current("array")?;

        self.current_type = Some(self.registry.make_array_type(&element, rank)?);
        Ok(self)
    }

    /// Make the current type the bound of a wildcard
    ///
    /// ## Arguments
    /// * 'kind' - [`WildcardKind::Extends`] or [`WildcardKind::Super`]
    ///
    /// # Errors
    /// Returns an error if no current type is set, `kind` is unbounded or the current type
    /// cannot bound a wildcard.
    pub fn wildcard(mut self, kind: WildcardKind) -> Result<Self> {
        if kind == WildcardKind::Unbounded {
            return Err(TypeError(
                "An unbounded wildcard has no bound to build from".to_string(),
            ));
        }
        let bound = self.take_current("wildcard")?;

        self.current_type = Some(self.registry.make_wildcard(kind, Some(&bound))?);
        Ok(self)
    }

    fn take_current(&mut self, step: &str) -> Result<TypeRc> {
        self.current_type
            .take()
            .ok_or_else(|| TypeError(format!("No current type to build a {} from", step)))
    }

    /// Finalize and return the built type
    ///
    /// # Errors
    /// Returns an error if no type has been built.
    pub fn build(self) -> Result<TypeRc> {
        match self.current_type {
            Some(t) => Ok(t),
            None => Err(TypeError("Failed to build requested Type".to_string())),
        }
    }
}
