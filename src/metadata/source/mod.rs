//! Metadata ingestion: how raw class descriptions enter a reflection session.
//!
//! The type system never reads class files itself. A collaborator (a class file parser, a
//! build tool, a test fixture) hands over raw records through a [`MetadataProvider`]; the
//! [`crate::metadata::typesystem::TypeRegistry`] asks it for classes by dotted binary name the
//! first time they are needed.
//!
//! # Key Components
//!
//! - [`ClassMetadata`] - capability set of one raw class
//! - [`MetadataProvider`] - lookup of raw classes by name
//! - [`RawClass`], [`RawField`], [`RawMethod`] - plain owned records
//! - [`InMemoryProvider`] - a concurrent map of [`RawClass`] records
//! - [`ClassBuilder`] - fluent construction of [`RawClass`] records
//!
//! # Examples
//!
//! ```rust
//! use typescope::metadata::source::{ClassBuilder, InMemoryProvider, MetadataProvider};
//!
//! let provider = InMemoryProvider::new();
//! provider.register(
//!     ClassBuilder::new("java.lang.Math")
//!         .public()
//!         .final_()
//!         .method(|m| m.name("abs").public().static_().descriptor("(I)I"))
//!         .method(|m| m.name("abs").public().static_().descriptor("(J)J"))
//!         .build(),
//! );
//!
//! let math = provider.find_class("java.lang.Math")?.expect("registered");
//! assert_eq!(math.methods().len(), 2);
//! # Ok::<(), typescope::Error>(())
//! ```

mod builder;
mod flags;

use std::sync::Arc;

use dashmap::DashMap;

pub use builder::{ClassBuilder, FieldBuilder, MethodBuilder};
pub use flags::{ClassModifiers, MemberModifiers, MEMBER_ACCESS_MASK};

use crate::Result;

/// Name of the root class every reference type ultimately extends
pub const OBJECT_CLASS: &str = "java.lang.Object";

/// Name shared by all constructors
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Name of the static initializer
pub const STATIC_INITIALIZER_NAME: &str = "<clinit>";

/// The capability set of one raw class.
///
/// Sources that cannot enumerate members (for example a stub for a class that is only ever
/// used as a type argument) may rely on the empty defaults.
pub trait ClassMetadata: Send + Sync {
    /// Dotted binary name, e.g. `java.util.Map$Entry`
    fn name(&self) -> &str;

    /// Class access and property flags
    fn modifiers(&self) -> ClassModifiers;

    /// Dotted name of the erased superclass; `None` for the root class and for interfaces
    fn superclass(&self) -> Option<&str>;

    /// Dotted names of the erased direct super-interfaces
    fn interfaces(&self) -> &[String] {
        &[]
    }

    /// Generic class signature, present only for classes whose declaration uses generics
    fn signature(&self) -> Option<&str> {
        None
    }

    /// Declared fields
    fn fields(&self) -> &[RawField] {
        &[]
    }

    /// Declared methods and constructors
    fn methods(&self) -> &[RawMethod] {
        &[]
    }
}

/// Lookup of raw classes by dotted binary name.
pub trait MetadataProvider: Send + Sync {
    /// Find a class by name
    ///
    /// ## Arguments
    /// * 'name' - Dotted binary name of the class
    ///
    /// # Errors
    /// Implementations report their own failures as [`crate::Error::Provider`]. An unknown
    /// class is not an error and yields `Ok(None)`.
    fn find_class(&self, name: &str) -> Result<Option<Arc<dyn ClassMetadata>>>;
}

/// A raw field record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// Field name
    pub name: String,
    /// Access and property flags
    pub modifiers: MemberModifiers,
    /// Erased field descriptor, e.g. `Ljava/util/List;`
    pub descriptor: String,
    /// Generic signature, e.g. `Ljava/util/List<TT;>;`
    pub signature: Option<String>,
}

impl RawField {
    /// The signature that carries the most type information
    #[must_use]
    pub fn effective_signature(&self) -> &str {
        self.signature.as_deref().unwrap_or(&self.descriptor)
    }
}

/// A raw method or constructor record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMethod {
    /// Method name, `<init>` for constructors
    pub name: String,
    /// Access and property flags
    pub modifiers: MemberModifiers,
    /// Erased method descriptor, e.g. `([Ljava/lang/Object;)Ljava/lang/Iterable;`
    pub descriptor: String,
    /// Generic signature, e.g. `<T:Ljava/lang/Object;>([TT;)Ljava/lang/Iterable<TT;>;`
    pub signature: Option<String>,
}

impl RawMethod {
    /// The signature that carries the most type information
    #[must_use]
    pub fn effective_signature(&self) -> &str {
        self.signature.as_deref().unwrap_or(&self.descriptor)
    }

    /// Returns true for instance constructors
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }
}

/// A raw class record, the owned counterpart of [`ClassMetadata`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawClass {
    /// Dotted binary name
    pub name: String,
    /// Access and property flags
    pub modifiers: ClassModifiers,
    /// Dotted name of the erased superclass
    pub superclass: Option<String>,
    /// Dotted names of the erased super-interfaces
    pub interfaces: Vec<String>,
    /// Generic class signature
    pub signature: Option<String>,
    /// Declared fields
    pub fields: Vec<RawField>,
    /// Declared methods and constructors
    pub methods: Vec<RawMethod>,
}

impl ClassMetadata for RawClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn modifiers(&self) -> ClassModifiers {
        self.modifiers
    }

    fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    fn fields(&self) -> &[RawField] {
        &self.fields
    }

    fn methods(&self) -> &[RawMethod] {
        &self.methods
    }
}

/// A provider backed by a concurrent map of [`RawClass`] records.
///
/// Classes can be registered at any time, including while a registry is already serving
/// lookups; a class becomes visible to the registry on its first request.
#[derive(Default)]
pub struct InMemoryProvider {
    classes: DashMap<String, Arc<RawClass>>,
}

impl InMemoryProvider {
    /// Create an empty provider
    #[must_use]
    pub fn new() -> Self {
        InMemoryProvider {
            classes: DashMap::new(),
        }
    }

    /// Create a provider holding all `classes`
    ///
    /// ## Arguments
    /// * 'classes' - The records to register
    pub fn with_classes(classes: impl IntoIterator<Item = RawClass>) -> Self {
        let provider = Self::new();
        for class in classes {
            provider.register(class);
        }
        provider
    }

    /// Register a class, replacing any earlier record with the same name
    ///
    /// ## Arguments
    /// * 'class' - The record to register
    pub fn register(&self, class: RawClass) -> Option<Arc<RawClass>> {
        self.classes.insert(class.name.clone(), Arc::new(class))
    }

    /// Returns true if a class with this name is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Number of registered classes
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no classes are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl MetadataProvider for InMemoryProvider {
    fn find_class(&self, name: &str) -> Result<Option<Arc<dyn ClassMetadata>>> {
        Ok(self
            .classes
            .get(name)
            .map(|entry| entry.value().clone() as Arc<dyn ClassMetadata>))
    }
}
