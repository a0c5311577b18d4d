use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::{
    metadata::{
        config::{OverloadPolicy, ResolutionConfig},
        members::{FieldRc, MemberTable, MethodRc},
        source::{CONSTRUCTOR_NAME, STATIC_INITIALIZER_NAME},
        token::Token,
        typesystem::{GenericBinder, TypeBindings, TypeRc, TypeRegistry},
    },
    Error::{AmbiguousMatch, MemberNotFound, TypeError},
    Result,
};

/// Cache key of a resolved method
///
/// Keyed by the type the lookup started on and the requested parameter types, so two
/// classes declaring `<T> enumerate(T[])` never share an entry, and neither do requests
/// for `Object[]` and for a generic `T[]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    /// The type the lookup started on
    pub declaring: Token,
    /// Requested method name
    pub name: String,
    /// Requested parameter types
    pub params: Vec<Token>,
}

/// Member lookup across a type hierarchy
///
/// The search order is the type itself, its superclass chain, and then (if enabled in the
/// [`ResolutionConfig`]) its super-interfaces breadth first without repetitions. The first
/// level with a match wins, so members of a derived type hide those of its bases.
pub struct MemberResolver<'a> {
    registry: &'a TypeRegistry,
    config: &'a ResolutionConfig,
}

impl<'a> MemberResolver<'a> {
    /// Create a resolver over `registry`, using its configuration
    pub fn new(registry: &'a TypeRegistry) -> Self {
        MemberResolver {
            registry,
            config: registry.config(),
        }
    }

    /// The members `ty` declares itself, building the table on first use
    ///
    /// # Errors
    /// Returns an error if a member signature is malformed or names an unknown type; the
    /// table stays unbuilt and the next call retries.
    pub fn declared<'t>(&self, ty: &'t TypeRc) -> Result<&'t MemberTable> {
        if let Some(table) = ty.member_cell().get() {
            return Ok(table);
        }

        let candidate = MemberTable::load(self.registry, ty)?;
        let won = ty.member_cell().set(candidate).is_ok();
        let table = ty.member_cell().get().ok_or_else(|| {
            TypeError(format!("Member table of {} is unavailable", ty.fullname()))
        })?;

        // only the published table's type variables become reachable by token
        if won {
            for method in &table.methods {
                self.registry
                    .register_generic_parameters(method.generic_parameters());
            }
        }
        Ok(table)
    }

    /// The lookup order for members of `ty`
    ///
    /// # Errors
    /// Returns an error if a supertype cannot be loaded.
    pub fn hierarchy(&self, ty: &TypeRc) -> Result<Vec<TypeRc>> {
        let mut levels = vec![ty.clone()];
        let mut current = ty.clone();
        while let Some(base) = current.base_type()? {
            levels.push(base.clone());
            current = base;
        }

        if self.config.search_interfaces {
            let mut seen: HashSet<Token> = levels.iter().map(|level| level.token).collect();
            let mut queue = VecDeque::new();
            for level in &levels {
                queue.extend(level.interfaces()?);
            }

            let mut interfaces = Vec::new();
            while let Some(interface) = queue.pop_front() {
                if !seen.insert(interface.token) {
                    continue;
                }
                queue.extend(interface.interfaces()?);
                interfaces.push(interface);
            }
            levels.extend(interfaces);
        }

        Ok(levels)
    }

    /// Find a field by name on `ty` or its hierarchy
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if no level declares the field.
    pub fn get_field(&self, ty: &TypeRc, name: &str) -> Result<FieldRc> {
        for level in self.hierarchy(ty)? {
            if let Some(field) = self.declared(&level)?.field(name) {
                return Ok(field.clone());
            }
        }

        debug!("No field {} on {}", name, ty.fullname());
        Err(MemberNotFound {
            type_name: ty.fullname(),
            member: name.to_string(),
        })
    }

    /// All fields visible on `ty`: declared first, then inherited ones not hidden by name
    ///
    /// # Errors
    /// Returns an error if a member table in the hierarchy cannot be built.
    pub fn get_fields(&self, ty: &TypeRc) -> Result<Vec<FieldRc>> {
        let mut seen = HashSet::new();
        let mut fields = Vec::new();

        for level in self.hierarchy(ty)? {
            for field in &self.declared(&level)?.fields {
                if seen.insert(field.name.clone()) {
                    fields.push(field.clone());
                }
            }
        }

        Ok(fields)
    }

    /// Fields declared by `ty` itself
    ///
    /// # Errors
    /// Returns an error if the member table cannot be built.
    pub fn get_declared_fields(&self, ty: &TypeRc) -> Result<Vec<FieldRc>> {
        Ok(self.declared(ty)?.fields.clone())
    }

    /// Methods and constructors declared by `ty` itself
    ///
    /// # Errors
    /// Returns an error if the member table cannot be built.
    pub fn get_declared_methods(&self, ty: &TypeRc) -> Result<Vec<MethodRc>> {
        Ok(self.declared(ty)?.methods.clone())
    }

    /// All methods visible on `ty`, excluding constructors, static initializers and methods
    /// overridden by a more derived level
    ///
    /// # Errors
    /// Returns an error if a member table in the hierarchy cannot be built.
    pub fn get_methods(&self, ty: &TypeRc) -> Result<Vec<MethodRc>> {
        let mut seen = HashSet::new();
        let mut methods = Vec::new();

        for level in self.hierarchy(ty)? {
            for method in &self.declared(&level)?.methods {
                if method.name == CONSTRUCTOR_NAME || method.name == STATIC_INITIALIZER_NAME {
                    continue;
                }
                if seen.insert((method.name.clone(), method.parameter_tokens())) {
                    methods.push(method.clone());
                }
            }
        }

        Ok(methods)
    }

    /// All visible methods named `name`
    ///
    /// # Errors
    /// Returns an error if a member table in the hierarchy cannot be built.
    pub fn get_methods_named(&self, ty: &TypeRc, name: &str) -> Result<Vec<MethodRc>> {
        Ok(self
            .get_methods(ty)?
            .into_iter()
            .filter(|method| method.name == name)
            .collect())
    }

    /// Constructors declared by `ty`
    ///
    /// # Errors
    /// Returns an error if the member table cannot be built.
    pub fn get_constructors(&self, ty: &TypeRc) -> Result<Vec<MethodRc>> {
        Ok(self
            .declared(ty)?
            .methods_named(CONSTRUCTOR_NAME)
            .cloned()
            .collect())
    }

    /// Resolve a constructor of `ty` by parameter types
    ///
    /// Constructors are never inherited.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if no constructor matches.
    pub fn get_constructor(&self, ty: &TypeRc, params: &[TypeRc]) -> Result<MethodRc> {
        let key = Self::key(ty, CONSTRUCTOR_NAME, params);
        if let Some(cached) = self.registry.cached_method(&key) {
            return Ok(cached);
        }

        let binder = GenericBinder::new(self.registry);
        let mut found = None;
        for constructor in self.declared(ty)?.methods_named(CONSTRUCTOR_NAME) {
            if Self::matches(&binder, &constructor.parameter_types()?, params)? {
                found = Some(constructor.clone());
                break;
            }
        }

        match found {
            Some(constructor) => Ok(self.registry.cache_method(key, constructor)),
            None => Err(Self::not_found(ty, CONSTRUCTOR_NAME, params)),
        }
    }

    /// Resolve a method by name and parameter types
    ///
    /// A candidate matches if its parameter types have the shape of the requested ones, or (with
    /// inference enabled, for generic methods) if binding its type parameters makes them so.
    /// On the first hierarchy level with any match the [`OverloadPolicy`] picks the winner.
    /// The returned method is the declared one, with its type variables unbound.
    ///
    /// ## Arguments
    /// * 'ty'     - The type to search
    /// * 'name'   - Method name
    /// * 'params' - Requested parameter types
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if nothing matches, or
    /// [`crate::Error::AmbiguousMatch`] if the policy cannot pick a single candidate.
    pub fn get_method(&self, ty: &TypeRc, name: &str, params: &[TypeRc]) -> Result<MethodRc> {
        let key = Self::key(ty, name, params);
        if let Some(cached) = self.registry.cached_method(&key) {
            return Ok(cached);
        }

        let binder = GenericBinder::new(self.registry);
        for level in self.hierarchy(ty)? {
            let context = TypeBindings::from_instance(&level)?;
            let mut exact = Vec::new();
            let mut inferred = Vec::new();

            for method in self.declared(&level)?.methods_named(name) {
                if method.is_constructor() {
                    continue;
                }

                let declared = method.parameter_types()?;
                if Self::matches(&binder, &declared, params)? {
                    exact.push(method.clone());
                } else if self.config.infer_method_type_arguments
                    && method.is_generic_method_definition()
                    && binder
                        .infer(&declared, params, method.generic_parameters(), &context)?
                        .is_some()
                {
                    inferred.push(method.clone());
                }
            }

            let candidates = match self.config.overload_policy {
                OverloadPolicy::PreferExact if !exact.is_empty() => exact,
                OverloadPolicy::PreferExact => inferred,
                OverloadPolicy::Strict => {
                    exact.extend(inferred);
                    exact
                }
            };

            match candidates.len() {
                0 => continue,
                1 => return Ok(self.registry.cache_method(key, candidates[0].clone())),
                count => {
                    debug!(
                        "{} candidates for {} on {}",
                        count,
                        Self::render(name, params),
                        level.fullname()
                    );
                    return Err(AmbiguousMatch {
                        type_name: ty.fullname(),
                        member: Self::render(name, params),
                        candidates: count,
                    });
                }
            }
        }

        Err(Self::not_found(ty, name, params))
    }

    fn matches(binder: &GenericBinder, declared: &[TypeRc], params: &[TypeRc]) -> Result<bool> {
        if declared.len() != params.len() {
            return Ok(false);
        }
        for (declared, param) in declared.iter().zip(params) {
            if !binder.same_shape(declared, param)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn key(ty: &TypeRc, name: &str, params: &[TypeRc]) -> MethodKey {
        MethodKey {
            declaring: ty.token,
            name: name.to_string(),
            params: params.iter().map(|param| param.token).collect(),
        }
    }

    fn render(name: &str, params: &[TypeRc]) -> String {
        let params = params
            .iter()
            .map(|param| param.fullname())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", name, params)
    }

    fn not_found(ty: &TypeRc, name: &str, params: &[TypeRc]) -> crate::Error {
        debug!("No method {} on {}", Self::render(name, params), ty.fullname());
        MemberNotFound {
            type_name: ty.fullname(),
            member: Self::render(name, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            config::ResolutionConfig,
            typesystem::PrimitiveKind,
        },
        test::{fixture_provider, fixture_registry},
        Error,
    };
    use std::sync::Arc;

    #[test]
    fn test_hierarchy_order() {
        let registry = fixture_registry();
        let double = registry.of("java.lang.Double").unwrap();

        let names: Vec<String> = MemberResolver::new(&registry)
            .hierarchy(&double)
            .unwrap()
            .iter()
            .map(|level| level.fullname())
            .collect();
        assert_eq!(
            names,
            vec![
                "java.lang.Double",
                "java.lang.Number",
                "java.lang.Object",
                "java.lang.Comparable<java.lang.Double>",
                "java.io.Serializable",
            ]
        );
    }

    #[test]
    fn test_hierarchy_without_interfaces() {
        let registry =
            TypeRegistry::with_config(Arc::new(fixture_provider()), ResolutionConfig::minimal())
                .unwrap();
        let double = registry.of("java.lang.Double").unwrap();

        let levels = MemberResolver::new(&registry).hierarchy(&double).unwrap();
        assert_eq!(levels.len(), 3);
    }

    #[test]
    fn test_field_through_base_instance() {
        let registry = fixture_registry();
        let test_object = registry.of("com.example.TestObject").unwrap();
        let resolver = MemberResolver::new(&registry);

        let items = resolver.get_field(&test_object, "items").unwrap();
        assert_eq!(
            items.field_type().unwrap().fullname(),
            "java.util.List<java.lang.Double>"
        );
        assert!(resolver.get_declared_fields(&test_object).unwrap().is_empty());
        assert_eq!(resolver.get_fields(&test_object).unwrap().len(), 1);

        assert!(matches!(
            resolver.get_field(&test_object, "missing"),
            Err(Error::MemberNotFound { member, .. }) if member == "missing"
        ));
    }

    #[test]
    fn test_overridden_methods_are_hidden() {
        let registry = fixture_registry();
        let circle = registry.of("com.example.Circle").unwrap();
        let resolver = MemberResolver::new(&registry);

        let areas = resolver.get_methods_named(&circle, "area").unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].declaring_type().unwrap(), circle);

        let area = resolver.get_method(&circle, "area", &[]).unwrap();
        assert_eq!(area, areas[0]);

        let methods = resolver.get_methods(&circle).unwrap();
        assert!(methods.iter().all(|method| !method.is_constructor()));
        assert!(methods.iter().any(|method| method.name == "hashCode"));
    }

    #[test]
    fn test_prefer_exact_policy() {
        let registry = fixture_registry();
        let overloads = registry.of("com.example.Overloads").unwrap();
        let resolver = MemberResolver::new(&registry);
        let double = registry.of("java.lang.Double").unwrap();
        let integer = registry.of("java.lang.Integer").unwrap();

        let exact = resolver.get_method(&overloads, "pick", &[double.clone()]).unwrap();
        assert!(!exact.is_generic_method());

        let inferred = resolver.get_method(&overloads, "pick", &[integer]).unwrap();
        assert!(inferred.is_generic_method_definition());

        let arrays = resolver
            .get_method(&overloads, "pick", &[double.make_array_type().unwrap()])
            .unwrap();
        assert!(arrays.parameter_types().unwrap()[0].is_array());

        assert!(matches!(
            resolver.get_method(&overloads, "pick", &[registry.object()]),
            Err(Error::MemberNotFound { .. })
        ));
        assert!(matches!(
            resolver.get_method(&overloads, "both", &[double]),
            Err(Error::AmbiguousMatch { candidates: 2, .. })
        ));
    }

    #[test]
    fn test_strict_policy() {
        let registry =
            TypeRegistry::with_config(Arc::new(fixture_provider()), ResolutionConfig::strict())
                .unwrap();
        let overloads = registry.of("com.example.Overloads").unwrap();
        let double = registry.of("java.lang.Double").unwrap();

        assert!(matches!(
            overloads.get_method("pick", &[double]),
            Err(Error::AmbiguousMatch { candidates: 2, member, .. }) if member == "pick(java.lang.Double)"
        ));
    }

    #[test]
    fn test_inference_can_be_disabled() {
        let registry =
            TypeRegistry::with_config(Arc::new(fixture_provider()), ResolutionConfig::minimal())
                .unwrap();
        let my_class = registry.of("com.example.MyClass").unwrap();
        let objects = registry.object().make_array_type().unwrap();

        assert!(matches!(
            my_class.get_method("enumerate", &[objects]),
            Err(Error::MemberNotFound { .. })
        ));

        let declared = my_class.get_methods_named("enumerate").unwrap()[0].clone();
        let own = declared.parameter_types().unwrap();
        assert_eq!(my_class.get_method("enumerate", &own).unwrap(), declared);
    }

    #[test]
    fn test_interface_methods_are_substituted() {
        let registry = fixture_registry();
        let list = registry.of("java.util.List").unwrap();
        let double = registry.of("java.lang.Double").unwrap();
        let doubles = list.make_generic_type(&[double]).unwrap();

        let iterator = doubles.get_method("iterator", &[]).unwrap();
        assert_eq!(
            iterator.return_type().unwrap().fullname(),
            "java.util.Iterator<java.lang.Double>"
        );
        assert_eq!(
            iterator.declaring_type().unwrap().fullname(),
            "java.lang.Iterable<java.lang.Double>"
        );
    }

    #[test]
    fn test_constructors() {
        let registry = fixture_registry();
        let item = registry.of("com.example.Item").unwrap();
        let resolver = MemberResolver::new(&registry);
        let double = registry.of("java.lang.Double").unwrap();

        assert_eq!(resolver.get_constructors(&item).unwrap().len(), 2);

        let default = resolver.get_constructor(&item, &[]).unwrap();
        assert!(default.is_constructor());
        assert_eq!(
            default.return_type().unwrap(),
            registry.primitive(PrimitiveKind::Void)
        );

        let weighted = item.get_constructor(&[double]).unwrap();
        assert_ne!(default, weighted);

        assert!(matches!(
            resolver.get_constructor(&item, &[registry.object()]),
            Err(Error::MemberNotFound { member, .. }) if member == "<init>(java.lang.Object)"
        ));
        // constructors are not inherited
        assert!(resolver
            .get_constructor(&registry.of("com.example.TestObject").unwrap(), &[])
            .is_ok());
        assert!(resolver
            .get_constructor(&registry.of("com.example.Circle").unwrap(), &[])
            .is_err());
    }

    #[test]
    fn test_method_cache() {
        let registry = fixture_registry();
        let math = registry.of("java.lang.Math").unwrap();
        let int = registry.primitive(PrimitiveKind::Int);

        let first = math.get_method("abs", &[int.clone()]).unwrap();
        let second = math.get_method("abs", &[int.clone()]).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.method_cache_len(), 1);

        registry.clear_member_cache();
        assert_eq!(registry.method_cache_len(), 0);
        assert_eq!(math.get_method("abs", &[int]).unwrap(), first);
    }

    #[test]
    fn test_failed_table_is_retried() {
        let registry = fixture_registry();
        let broken = registry.of("com.example.Broken").unwrap();
        let resolver = MemberResolver::new(&registry);

        assert!(matches!(
            resolver.declared(&broken),
            Err(Error::TypeNotFound(name)) if name == "com.example.Missing"
        ));
        assert!(resolver.declared(&broken).is_err());
    }
}
