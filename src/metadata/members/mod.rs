//! Reflection over fields and methods.
//!
//! This module provides [`FieldInfo`] and [`MethodInfo`], the member counterparts of
//! [`crate::metadata::typesystem::TypeDescriptor`], and the [`MemberResolver`] that looks
//! them up across a type hierarchy.
//!
//! # Member tables
//!
//! Every descriptor has a [`MemberTable`] of the members it declares, built on first use:
//!
//! - **definitions** resolve the raw field and method records of their class, with the
//!   class' type parameters (and each method's own type parameters) in scope
//! - **generic instances** take the table of their definition and substitute the instance's
//!   type arguments into every field, parameter and return type
//! - every other descriptor has an empty table
//!
//! # Identity
//!
//! Members compare by what they are, not by where they came from: a method is its declaring
//! type, name, parameter types and return type; a field its declaring type, name and type.
//! Because descriptors are canonical, all of these compare by token.
//!
//! # Examples
//!
//! ```rust
//! use typescope::prelude::*;
//! use std::sync::Arc;
//!
//! let provider = InMemoryProvider::new();
//! provider.register(
//!     ClassBuilder::new("java.lang.Math")
//!         .public()
//!         .method(|m| m.name("abs").public().static_().descriptor("(I)I"))
//!         .method(|m| m.name("abs").public().static_().descriptor("(J)J"))
//!         .build(),
//! );
//! let registry = TypeRegistry::new(Arc::new(provider))?;
//!
//! let math = registry.of("java.lang.Math")?;
//! let int = registry.primitive(PrimitiveKind::Int);
//! let long = registry.primitive(PrimitiveKind::Long);
//!
//! let abs_int = math.get_method("abs", &[int.clone()])?;
//! let abs_long = math.get_method("abs", &[long])?;
//! assert_ne!(abs_int, abs_long);
//! assert_eq!(abs_int.return_type()?, int);
//! # Ok::<(), typescope::Error>(())
//! ```

mod field;
mod method;
mod resolver;

use std::sync::Arc;

use log::debug;

pub use field::FieldInfo;
pub use method::{MethodInfo, ParameterInfo};
pub use resolver::{MemberResolver, MethodKey};

use crate::{
    metadata::typesystem::{
        GenericBinder, TypeBindings, TypeFlavor, TypeRc, TypeRegistry, TypeResolver,
    },
    Result,
};

/// Reference to a `FieldInfo`
pub type FieldRc = Arc<FieldInfo>;
/// Reference to a `MethodInfo`
pub type MethodRc = Arc<MethodInfo>;

/// The members declared by one descriptor, in declaration order
#[derive(Debug, Default)]
pub struct MemberTable {
    /// Declared fields
    pub fields: Vec<FieldRc>,
    /// Declared methods and constructors
    pub methods: Vec<MethodRc>,
}

impl MemberTable {
    /// Find a declared field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldRc> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Declared methods (and constructors, for `<init>`) with the given name
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodRc> {
        self.methods.iter().filter(move |method| method.name == name)
    }

    /// Build the table of `ty`
    pub(crate) fn load(registry: &TypeRegistry, ty: &TypeRc) -> Result<MemberTable> {
        let table = match ty.flavor {
            TypeFlavor::Class => Self::load_definition(registry, ty)?,
            TypeFlavor::GenericInstance => Self::load_instance(registry, ty)?,
            _ => MemberTable::default(),
        };

        debug!(
            "Loaded {} fields and {} methods for {}",
            table.fields.len(),
            table.methods.len(),
            ty.fullname()
        );
        Ok(table)
    }

    fn load_definition(registry: &TypeRegistry, ty: &TypeRc) -> Result<MemberTable> {
        let Some(raw) = ty.raw() else {
            return Ok(MemberTable::default());
        };

        let resolver = TypeResolver::new(registry).with_class_params(ty.generic_parameters());
        let fields = raw
            .fields()
            .iter()
            .map(|field| FieldInfo::from_raw(registry, ty, field, &resolver).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        let methods = raw
            .methods()
            .iter()
            .map(|method| MethodInfo::from_raw(registry, ty, method).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        Ok(MemberTable { fields, methods })
    }

    fn load_instance(registry: &TypeRegistry, ty: &TypeRc) -> Result<MemberTable> {
        let definition = ty.generic_type_definition()?;
        let declared = MemberResolver::new(registry).declared(&definition)?;

        let bindings = TypeBindings::from_instance(ty)?;
        let binder = GenericBinder::new(registry);

        let fields = declared
            .fields
            .iter()
            .map(|field| field.substitute(registry, ty, &binder, &bindings).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        let methods = declared
            .methods
            .iter()
            .map(|method| method.substitute(registry, ty, &binder, &bindings).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        Ok(MemberTable { fields, methods })
    }
}
