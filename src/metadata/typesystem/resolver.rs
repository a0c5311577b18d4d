use crate::{
    metadata::{
        signatures::{TypeArgument, TypeSignature},
        typesystem::{TypeRc, TypeRegistry, WildcardKind},
    },
    Error::{RecursionLimit, TypeVariableNotFound},
    Result,
};

/// Resolves parsed signatures to canonical descriptors of a registry
///
/// Type variables are looked up by name, method level parameters first, then the type
/// parameters of the declaring class. Class references are loaded through
/// [`TypeRegistry::of`]; parameterized references, arrays and wildcards go through the
/// registry's construction operations, so the result is always canonical.
///
/// # Examples
///
/// ```rust
/// use typescope::prelude::*;
/// use std::sync::Arc;
///
/// let provider = InMemoryProvider::new();
/// provider.register(ClassBuilder::new("java.lang.Double").build());
/// let registry = TypeRegistry::new(Arc::new(provider))?;
///
/// let signature = parse_field_signature("[Ljava/lang/Double;")?;
/// let resolved = TypeResolver::new(&registry).resolve(&signature)?;
/// assert_eq!(resolved.fullname(), "java.lang.Double[]");
/// # Ok::<(), typescope::Error>(())
/// ```
pub struct TypeResolver<'a> {
    /// The registry descriptors are resolved in
    registry: &'a TypeRegistry,
    /// Type parameters of the declaring class
    class_params: &'a [TypeRc],
    /// Type parameters of the method being resolved
    method_params: &'a [TypeRc],
    /// Nesting limit for signatures
    max_depth: usize,
}

impl<'a> TypeResolver<'a> {
    /// Create a new resolver without any type variables in scope
    ///
    /// ## Arguments
    /// * 'registry' - The type registry to use
    pub fn new(registry: &'a TypeRegistry) -> Self {
        TypeResolver {
            registry,
            class_params: &[],
            method_params: &[],
            max_depth: registry.config().max_recursion_depth,
        }
    }

    /// Bring the type parameters of a class into scope
    ///
    /// ## Arguments
    /// * 'params' - The class' generic parameters
    #[must_use]
    pub fn with_class_params(mut self, params: &'a [TypeRc]) -> Self {
        self.class_params = params;
        self
    }

    /// Bring the type parameters of a method into scope; they shadow class parameters
    ///
    /// ## Arguments
    /// * 'params' - The method's generic parameters
    #[must_use]
    pub fn with_method_params(mut self, params: &'a [TypeRc]) -> Self {
        self.method_params = params;
        self
    }

    /// Resolve a type signature to a canonical descriptor
    ///
    /// ## Arguments
    /// * 'signature' - The signature to resolve
    ///
    /// # Errors
    /// Returns an error if:
    /// - A referenced class is unknown to the provider
    /// - A type variable is not in scope
    /// - Nesting exceeds the configured recursion limit
    /// - Constructing an array or generic instance fails
    pub fn resolve(&self, signature: &TypeSignature) -> Result<TypeRc> {
        self.resolve_with_depth(signature, 0)
    }

    /// Resolve a list of signatures in order
    ///
    /// # Errors
    /// Returns the first resolution error.
    pub fn resolve_all(&self, signatures: &[TypeSignature]) -> Result<Vec<TypeRc>> {
        signatures
            .iter()
            .map(|signature| self.resolve(signature))
            .collect()
    }

    fn resolve_with_depth(&self, signature: &TypeSignature, depth: usize) -> Result<TypeRc> {
        if depth >= self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }

        match signature {
            TypeSignature::Primitive(kind) => Ok(self.registry.primitive(*kind)),
            TypeSignature::Class(class) => {
                let definition = self.registry.of(&class.name)?;
                if class.args.is_empty() {
                    return Ok(definition);
                }

                let args = class
                    .args
                    .iter()
                    .map(|arg| self.resolve_argument(arg, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                self.registry.make_generic_type(&definition, &args)
            }
            TypeSignature::Array(element) => {
                let element = self.resolve_with_depth(element, depth + 1)?;
                self.registry.make_array_type(&element, 1)
            }
            TypeSignature::TypeVariable(name) => self
                .method_params
                .iter()
                .chain(self.class_params.iter())
                .find(|param| &param.name == name)
                .cloned()
                .ok_or_else(|| TypeVariableNotFound(name.clone())),
        }
    }

    fn resolve_argument(&self, argument: &TypeArgument, depth: usize) -> Result<TypeRc> {
        match argument {
            TypeArgument::Exact(signature) => self.resolve_with_depth(signature, depth),
            TypeArgument::Extends(signature) => {
                let bound = self.resolve_with_depth(signature, depth)?;
                self.registry
                    .make_wildcard(WildcardKind::Extends, Some(&bound))
            }
            TypeArgument::Super(signature) => {
                let bound = self.resolve_with_depth(signature, depth)?;
                self.registry.make_wildcard(WildcardKind::Super, Some(&bound))
            }
            TypeArgument::Unbounded => self.registry.make_wildcard(WildcardKind::Unbounded, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            config::ResolutionConfig,
            signatures::parse_field_signature,
            typesystem::PrimitiveKind,
        },
        test::{fixture_provider, fixture_registry},
        Error,
    };
    use std::sync::Arc;

    #[test]
    fn test_resolve_primitives_and_classes() {
        let registry = fixture_registry();
        let resolver = TypeResolver::new(&registry);

        let int = resolver.resolve(&parse_field_signature("I").unwrap()).unwrap();
        assert_eq!(int, registry.primitive(PrimitiveKind::Int));

        let double = resolver
            .resolve(&parse_field_signature("Ljava/lang/Double;").unwrap())
            .unwrap();
        assert_eq!(double.fullname(), "java.lang.Double");
    }

    #[test]
    fn test_resolve_parameterized() {
        let registry = fixture_registry();
        let resolver = TypeResolver::new(&registry);

        let resolved = resolver
            .resolve(&parse_field_signature("Ljava/util/List<+Ljava/lang/Number;>;").unwrap())
            .unwrap();
        assert_eq!(
            resolved.fullname(),
            "java.util.List<? extends java.lang.Number>"
        );

        let unbounded = resolver
            .resolve(&parse_field_signature("Ljava/util/List<*>;").unwrap())
            .unwrap();
        assert_eq!(unbounded.fullname(), "java.util.List<?>");
        assert!(unbounded.generic_arguments().unwrap()[0].is_wildcard());
    }

    #[test]
    fn test_type_variable_scopes() {
        let registry = fixture_registry();
        let list = registry.of("java.util.List").unwrap();
        let class_params = list.generic_parameters().to_vec();

        let signature = parse_field_signature("[TE;").unwrap();
        assert!(matches!(
            TypeResolver::new(&registry).resolve(&signature),
            Err(Error::TypeVariableNotFound(name)) if name == "E"
        ));

        let resolved = TypeResolver::new(&registry)
            .with_class_params(&class_params)
            .resolve(&signature)
            .unwrap();
        assert_eq!(resolved.element_type().unwrap(), class_params[0]);
        assert!(resolved.contains_generic_parameters());
        assert_ne!(resolved, registry.object().make_array_type().unwrap());
    }

    #[test]
    fn test_method_params_shadow_class_params() {
        let registry = fixture_registry();
        let list = registry.of("java.util.List").unwrap();
        let enumeration = registry.of("java.lang.Enum").unwrap();

        let class_params = list.generic_parameters().to_vec();
        let method_params = enumeration.generic_parameters().to_vec();
        assert_eq!(class_params[0].name, method_params[0].name);

        let resolved = TypeResolver::new(&registry)
            .with_class_params(&class_params)
            .with_method_params(&method_params)
            .resolve(&TypeSignature::TypeVariable("E".to_string()))
            .unwrap();
        assert_eq!(resolved, method_params[0]);
    }

    #[test]
    fn test_recursion_limit() {
        let config = ResolutionConfig {
            max_recursion_depth: 3,
            ..ResolutionConfig::default()
        };
        let registry = TypeRegistry::with_config(Arc::new(fixture_provider()), config).unwrap();

        let shallow = parse_field_signature("[[I").unwrap();
        assert!(TypeResolver::new(&registry).resolve(&shallow).is_ok());

        let deep = parse_field_signature("[[[[I").unwrap();
        assert!(matches!(
            TypeResolver::new(&registry).resolve(&deep),
            Err(Error::RecursionLimit(3))
        ));
    }
}
