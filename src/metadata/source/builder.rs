//! Fluent builders for raw class records.
//!
//! Used by providers that assemble metadata programmatically and by tests. A built
//! [`RawClass`] is inert data; it only becomes a type once a registry requests it from a
//! provider.

use crate::metadata::source::{
    ClassModifiers, MemberModifiers, RawClass, RawField, RawMethod, CONSTRUCTOR_NAME,
    OBJECT_CLASS,
};

/// Provides a fluent API for building a [`RawClass`]
///
/// The superclass defaults to `java.lang.Object` for classes and to none for interfaces and
/// for `java.lang.Object` itself.
///
/// # Example
///
/// ```rust
/// use typescope::metadata::source::{ClassBuilder, ClassMetadata};
///
/// let class = ClassBuilder::new("com.example.GenericTestObject")
///     .public()
///     .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
///     .field(|f| {
///         f.name("items")
///             .public()
///             .descriptor("Ljava/util/List;")
///             .signature("Ljava/util/List<TT;>;")
///     })
///     .method(|m| {
///         m.name("sum")
///             .public()
///             .descriptor("(Ljava/util/List;)Ljava/lang/Object;")
///             .signature("(Ljava/util/List<TT;>;)TT;")
///     })
///     .build();
///
/// assert_eq!(class.fields().len(), 1);
/// assert_eq!(class.superclass(), Some("java.lang.Object"));
/// ```
pub struct ClassBuilder {
    class: RawClass,
    explicit_superclass: bool,
}

impl ClassBuilder {
    /// Start building a class with the given dotted binary name
    ///
    /// ## Arguments
    /// * 'name' - e.g. `com.example.Outer$Inner`
    #[must_use]
    pub fn new(name: &str) -> Self {
        ClassBuilder {
            class: RawClass {
                name: name.to_string(),
                ..RawClass::default()
            },
            explicit_superclass: false,
        }
    }

    fn flag(mut self, flag: ClassModifiers) -> Self {
        self.class.modifiers |= flag;
        self
    }

    /// Mark the class public
    #[must_use]
    pub fn public(self) -> Self {
        self.flag(ClassModifiers::PUBLIC)
    }

    /// Mark the class final
    #[must_use]
    pub fn final_(self) -> Self {
        self.flag(ClassModifiers::FINAL)
    }

    /// Mark the class abstract
    #[must_use]
    pub fn abstract_(self) -> Self {
        self.flag(ClassModifiers::ABSTRACT)
    }

    /// Mark the class as an interface
    #[must_use]
    pub fn interface(self) -> Self {
        self.flag(ClassModifiers::INTERFACE | ClassModifiers::ABSTRACT)
    }

    /// Mark the class as an enum class
    #[must_use]
    pub fn enum_(self) -> Self {
        self.flag(ClassModifiers::ENUM | ClassModifiers::FINAL)
    }

    /// Replace all modifiers
    ///
    /// ## Arguments
    /// * 'modifiers' - The new modifier set
    #[must_use]
    pub fn modifiers(mut self, modifiers: ClassModifiers) -> Self {
        self.class.modifiers = modifiers;
        self
    }

    /// Set the erased superclass
    ///
    /// ## Arguments
    /// * 'name' - Dotted name of the superclass
    #[must_use]
    pub fn extends(mut self, name: &str) -> Self {
        self.class.superclass = Some(name.to_string());
        self.explicit_superclass = true;
        self
    }

    /// Add an erased super-interface
    ///
    /// ## Arguments
    /// * 'name' - Dotted name of the interface
    #[must_use]
    pub fn implements(mut self, name: &str) -> Self {
        self.class.interfaces.push(name.to_string());
        self
    }

    /// Set the generic class signature
    ///
    /// ## Arguments
    /// * 'signature' - e.g. `<T:Ljava/lang/Object;>Ljava/lang/Object;`
    #[must_use]
    pub fn signature(mut self, signature: &str) -> Self {
        self.class.signature = Some(signature.to_string());
        self
    }

    /// Add a field
    ///
    /// ## Arguments
    /// * 'build' - Configures a fresh [`FieldBuilder`]
    #[must_use]
    pub fn field<F>(mut self, build: F) -> Self
    where
        F: FnOnce(FieldBuilder) -> FieldBuilder,
    {
        self.class.fields.push(build(FieldBuilder::new()).build());
        self
    }

    /// Add a method
    ///
    /// ## Arguments
    /// * 'build' - Configures a fresh [`MethodBuilder`]
    #[must_use]
    pub fn method<F>(mut self, build: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        self.class.methods.push(build(MethodBuilder::new()).build());
        self
    }

    /// Add a constructor; the descriptor defaults to `()V`
    ///
    /// ## Arguments
    /// * 'build' - Configures a [`MethodBuilder`] already named `<init>`
    #[must_use]
    pub fn constructor<F>(mut self, build: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        let builder = MethodBuilder::new().name(CONSTRUCTOR_NAME).descriptor("()V");
        self.class.methods.push(build(builder).build());
        self
    }

    /// Add a public no-argument constructor
    #[must_use]
    pub fn default_constructor(self) -> Self {
        self.constructor(MethodBuilder::public)
    }

    /// Finish the record
    #[must_use]
    pub fn build(mut self) -> RawClass {
        if !self.explicit_superclass {
            self.class.superclass =
                if self.class.modifiers.is_interface() || self.class.name == OBJECT_CLASS {
                    None
                } else {
                    Some(OBJECT_CLASS.to_string())
                };
        }
        self.class
    }
}

/// Provides a fluent API for building a [`RawField`]
#[derive(Default)]
pub struct FieldBuilder {
    field: RawField,
}

impl Default for RawField {
    fn default() -> Self {
        RawField {
            name: String::new(),
            modifiers: MemberModifiers::empty(),
            descriptor: "Ljava/lang/Object;".to_string(),
            signature: None,
        }
    }
}

impl FieldBuilder {
    /// Start a field of type `java.lang.Object`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(mut self, flag: MemberModifiers) -> Self {
        self.field.modifiers |= flag;
        self
    }

    /// Set the field name
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.field.name = name.to_string();
        self
    }

    /// Mark the field public
    #[must_use]
    pub fn public(self) -> Self {
        self.flag(MemberModifiers::PUBLIC)
    }

    /// Mark the field private
    #[must_use]
    pub fn private(self) -> Self {
        self.flag(MemberModifiers::PRIVATE)
    }

    /// Mark the field protected
    #[must_use]
    pub fn protected(self) -> Self {
        self.flag(MemberModifiers::PROTECTED)
    }

    /// Mark the field static
    #[must_use]
    pub fn static_(self) -> Self {
        self.flag(MemberModifiers::STATIC)
    }

    /// Mark the field final
    #[must_use]
    pub fn final_(self) -> Self {
        self.flag(MemberModifiers::FINAL)
    }

    /// Replace all modifiers
    #[must_use]
    pub fn modifiers(mut self, modifiers: MemberModifiers) -> Self {
        self.field.modifiers = modifiers;
        self
    }

    /// Set the erased descriptor
    #[must_use]
    pub fn descriptor(mut self, descriptor: &str) -> Self {
        self.field.descriptor = descriptor.to_string();
        self
    }

    /// Set the generic signature
    #[must_use]
    pub fn signature(mut self, signature: &str) -> Self {
        self.field.signature = Some(signature.to_string());
        self
    }

    /// Finish the record
    #[must_use]
    pub fn build(self) -> RawField {
        self.field
    }
}

/// Provides a fluent API for building a [`RawMethod`]
#[derive(Default)]
pub struct MethodBuilder {
    method: RawMethod,
}

impl Default for RawMethod {
    fn default() -> Self {
        RawMethod {
            name: String::new(),
            modifiers: MemberModifiers::empty(),
            descriptor: "()V".to_string(),
            signature: None,
        }
    }
}

impl MethodBuilder {
    /// Start a method with descriptor `()V`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(mut self, flag: MemberModifiers) -> Self {
        self.method.modifiers |= flag;
        self
    }

    /// Set the method name
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.method.name = name.to_string();
        self
    }

    /// Mark the method public
    #[must_use]
    pub fn public(self) -> Self {
        self.flag(MemberModifiers::PUBLIC)
    }

    /// Mark the method private
    #[must_use]
    pub fn private(self) -> Self {
        self.flag(MemberModifiers::PRIVATE)
    }

    /// Mark the method protected
    #[must_use]
    pub fn protected(self) -> Self {
        self.flag(MemberModifiers::PROTECTED)
    }

    /// Mark the method static
    #[must_use]
    pub fn static_(self) -> Self {
        self.flag(MemberModifiers::STATIC)
    }

    /// Mark the method final
    #[must_use]
    pub fn final_(self) -> Self {
        self.flag(MemberModifiers::FINAL)
    }

    /// Mark the method abstract
    #[must_use]
    pub fn abstract_(self) -> Self {
        self.flag(MemberModifiers::ABSTRACT)
    }

    /// Mark the method as taking a variable number of arguments
    #[must_use]
    pub fn varargs(self) -> Self {
        self.flag(MemberModifiers::VARARGS)
    }

    /// Replace all modifiers
    #[must_use]
    pub fn modifiers(mut self, modifiers: MemberModifiers) -> Self {
        self.method.modifiers = modifiers;
        self
    }

    /// Set the erased descriptor
    #[must_use]
    pub fn descriptor(mut self, descriptor: &str) -> Self {
        self.method.descriptor = descriptor.to_string();
        self
    }

    /// Set the generic signature
    #[must_use]
    pub fn signature(mut self, signature: &str) -> Self {
        self.method.signature = Some(signature.to_string());
        self
    }

    /// Finish the record
    #[must_use]
    pub fn build(self) -> RawMethod {
        self.method
    }
}
