use std::fmt;

use crate::metadata::typesystem::PrimitiveKind;

/// Represents a parsed type in descriptors and generic signatures
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// A primitive type, including `void` in return position
    Primitive(PrimitiveKind),
    /// A class or interface type, optionally with type arguments
    Class(SignatureClass),
    /// An array of the boxed element type (`[elem`)
    Array(Box<TypeSignature>),
    /// A reference to a type variable in scope (`Tname;`)
    TypeVariable(String),
}

impl TypeSignature {
    /// Shorthand for a class signature without type arguments
    ///
    /// ## Arguments
    /// * 'name' - Dotted binary name, e.g. `java.lang.Object`
    #[must_use]
    pub fn class(name: &str) -> Self {
        TypeSignature::Class(SignatureClass {
            name: name.to_string(),
            args: Vec::new(),
        })
    }

    /// Returns true if any part of this signature names a type variable
    #[must_use]
    pub fn has_type_variables(&self) -> bool {
        match self {
            TypeSignature::Primitive(_) => false,
            TypeSignature::TypeVariable(_) => true,
            TypeSignature::Array(element) => element.has_type_variables(),
            TypeSignature::Class(class) => class.args.iter().any(|arg| match arg {
                TypeArgument::Exact(sig) | TypeArgument::Extends(sig) | TypeArgument::Super(sig) => {
                    sig.has_type_variables()
                }
                TypeArgument::Unbounded => false,
            }),
        }
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Primitive(kind) => write!(f, "{}", kind.name()),
            TypeSignature::Class(class) => write!(f, "{}", class),
            TypeSignature::Array(element) => write!(f, "{}[]", element),
            TypeSignature::TypeVariable(name) => write!(f, "{}", name),
        }
    }
}

/// A class type reference in a signature
///
/// Inner class suffixes (`Outer<A>.Inner<B>`) are flattened into the binary name
/// `Outer$Inner`, with the type arguments of every segment concatenated in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureClass {
    /// Dotted binary name of the class
    pub name: String,
    /// Type arguments, empty for raw or non-generic references
    pub args: Vec<TypeArgument>,
}

impl fmt::Display for SignatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (index, arg) in self.args.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// A single type argument of a parameterized class reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArgument {
    /// An exact argument, `List<String>`
    Exact(TypeSignature),
    /// An upper bounded wildcard, `? extends T` (`+T`)
    Extends(TypeSignature),
    /// A lower bounded wildcard, `? super T` (`-T`)
    Super(TypeSignature),
    /// The unbounded wildcard `?` (`*`)
    Unbounded,
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Exact(sig) => write!(f, "{}", sig),
            TypeArgument::Extends(sig) => write!(f, "? extends {}", sig),
            TypeArgument::Super(sig) => write!(f, "? super {}", sig),
            TypeArgument::Unbounded => write!(f, "?"),
        }
    }
}

/// Declaration of a type parameter, `T:Lbound;:Liface;`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureTypeParameter {
    /// The parameter name
    pub name: String,
    /// The class bound; absent when only interface bounds are given (`T::Liface;`)
    pub class_bound: Option<TypeSignature>,
    /// Interface bounds in declaration order
    pub interface_bounds: Vec<TypeSignature>,
}

impl SignatureTypeParameter {
    /// All bounds in declaration order, class bound first
    #[must_use]
    pub fn bounds(&self) -> Vec<&TypeSignature> {
        self.class_bound
            .iter()
            .chain(self.interface_bounds.iter())
            .collect()
    }
}

/// A parsed method descriptor or method generic signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureMethod {
    /// Method level type parameters, empty for non-generic methods
    pub type_params: Vec<SignatureTypeParameter>,
    /// Parameter types in order
    pub params: Vec<TypeSignature>,
    /// Return type, `Primitive(Void)` for `V`
    pub return_type: TypeSignature,
    /// Declared exceptions (`^Lpkg/Ex;`)
    pub throws: Vec<TypeSignature>,
}

/// A parsed class generic signature, `<T:..>Lsuper;Liface;..`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureClassDecl {
    /// Class level type parameters
    pub type_params: Vec<SignatureTypeParameter>,
    /// The generic superclass
    pub superclass: TypeSignature,
    /// Generic super-interfaces in declaration order
    pub interfaces: Vec<TypeSignature>,
}
