use std::{
    any::Any,
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

use crate::{
    metadata::{
        members::MethodRc,
        signatures::parse_method_signature,
        source::{MemberModifiers, RawMethod, CONSTRUCTOR_NAME},
        token::{Token, TokenTable},
        typesystem::{
            GenericBinder, TypeBindings, TypeRc, TypeRef, TypeRegistry, TypeResolver,
            TypeSignatureHash,
        },
    },
    Error::{ArgumentCount, NotGenericDefinition, TypeError, UnsupportedOperation},
    Result,
};

/// A single formal parameter of a method
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    /// Zero based position in the parameter list
    pub position: usize,
    /// Synthesized name (`arg0`, `arg1`, ...); class metadata carries no parameter names
    pub name: String,
    param_type: TypeRef,
}

impl ParameterInfo {
    fn new(position: usize, param_type: &TypeRc) -> Self {
        ParameterInfo {
            position,
            name: format!("arg{}", position),
            param_type: TypeRef::new(param_type),
        }
    }

    /// The type of this parameter
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if the registry is gone.
    pub fn param_type(&self) -> Result<TypeRc> {
        self.param_type.resolve()
    }

    /// Token of the parameter type
    #[must_use]
    pub fn type_token(&self) -> Token {
        self.param_type.token()
    }
}

/// A method or constructor
///
/// Methods declared by a generic definition keep their type variables; the same method
/// reached through a generic instance has the instance's arguments substituted into its
/// parameter and return types. A generic method bound to its own type arguments with
/// [`MethodInfo::make_generic_method`] links back to its definition.
pub struct MethodInfo {
    /// Token
    pub token: Token,
    /// Method name, `<init>` for constructors
    pub name: String,
    /// Access and property flags
    pub modifiers: MemberModifiers,
    /// Erased descriptor as declared
    pub descriptor: String,
    /// Generic signature as declared, present for methods using generics
    pub signature: Option<String>,
    declaring: TypeRef,
    parameters: Vec<ParameterInfo>,
    return_type: TypeRef,
    generic_params: Vec<TypeRc>,
    generic_args: Vec<TypeRef>,
    generic_definition: Option<Weak<MethodInfo>>,
}

impl MethodInfo {
    pub(crate) fn from_raw(
        registry: &TypeRegistry,
        declaring: &TypeRc,
        raw: &RawMethod,
    ) -> Result<Self> {
        let signature = parse_method_signature(raw.effective_signature())?;
        let token = registry.next_token(TokenTable::Method);

        let generic_params =
            registry.create_method_parameters(token, declaring, &signature.type_params);
        let resolver = TypeResolver::new(registry)
            .with_class_params(declaring.generic_parameters())
            .with_method_params(&generic_params);

        // all parameters exist before any bound is resolved
        for param in &generic_params {
            let bounds = resolver.resolve_all(param.bound_signatures())?;
            if bounds.is_empty() {
                param.set_bounds(&[registry.object()]);
            } else {
                param.set_bounds(&bounds);
            }
        }

        let parameters = signature
            .params
            .iter()
            .enumerate()
            .map(|(position, param)| {
                resolver
                    .resolve(param)
                    .map(|param_type| ParameterInfo::new(position, &param_type))
            })
            .collect::<Result<Vec<_>>>()?;
        let return_type = resolver.resolve(&signature.return_type)?;

        Ok(MethodInfo {
            token,
            name: raw.name.clone(),
            modifiers: raw.modifiers,
            descriptor: raw.descriptor.clone(),
            signature: raw.signature.clone(),
            declaring: TypeRef::new(declaring),
            parameters,
            return_type: TypeRef::new(&return_type),
            generic_params,
            generic_args: Vec::new(),
            generic_definition: None,
        })
    }

    /// The same method seen through a generic instance
    pub(crate) fn substitute(
        &self,
        registry: &TypeRegistry,
        declaring: &TypeRc,
        binder: &GenericBinder,
        bindings: &TypeBindings,
    ) -> Result<Self> {
        let parameters = self
            .parameters
            .iter()
            .map(|param| {
                param
                    .param_type()
                    .and_then(|param_type| binder.substitute(&param_type, bindings))
                    .map(|substituted| ParameterInfo::new(param.position, &substituted))
            })
            .collect::<Result<Vec<_>>>()?;
        let return_type = binder.substitute(&self.return_type()?, bindings)?;

        Ok(MethodInfo {
            token: registry.next_token(TokenTable::Method),
            name: self.name.clone(),
            modifiers: self.modifiers,
            descriptor: self.descriptor.clone(),
            signature: self.signature.clone(),
            declaring: TypeRef::new(declaring),
            parameters,
            return_type: TypeRef::new(&return_type),
            generic_params: self.generic_params.clone(),
            generic_args: self.generic_args.clone(),
            generic_definition: self.generic_definition.clone(),
        })
    }

    /// The type declaring this method
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if the registry is gone.
    pub fn declaring_type(&self) -> Result<TypeRc> {
        self.declaring.resolve()
    }

    /// The formal parameters in order
    #[must_use]
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// The parameter types in order
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if the registry is gone.
    pub fn parameter_types(&self) -> Result<Vec<TypeRc>> {
        self.parameters.iter().map(ParameterInfo::param_type).collect()
    }

    /// Tokens of the parameter types in order
    #[must_use]
    pub fn parameter_tokens(&self) -> Vec<Token> {
        self.parameters.iter().map(ParameterInfo::type_token).collect()
    }

    /// The return type, `void` for constructors and procedures
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if the registry is gone.
    pub fn return_type(&self) -> Result<TypeRc> {
        self.return_type.resolve()
    }

    /// The method's own type parameters
    #[must_use]
    pub fn generic_parameters(&self) -> &[TypeRc] {
        &self.generic_params
    }

    /// The method's type arguments, empty unless created by `make_generic_method`
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if the registry is gone.
    pub fn generic_arguments(&self) -> Result<Vec<TypeRc>> {
        self.generic_args.iter().map(TypeRef::resolve).collect()
    }

    /// Returns true if the method declares type parameters
    #[must_use]
    pub fn is_generic_method(&self) -> bool {
        !self.generic_params.is_empty()
    }

    /// Returns true if the method declares type parameters that are not yet bound
    #[must_use]
    pub fn is_generic_method_definition(&self) -> bool {
        self.is_generic_method() && self.generic_args.is_empty()
    }

    /// The generic method this one was created from by `make_generic_method`
    #[must_use]
    pub fn generic_method_definition(&self) -> Option<MethodRc> {
        self.generic_definition.as_ref().and_then(Weak::upgrade)
    }

    /// Returns true for instance constructors
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    /// Returns true for static methods
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    /// Returns true for abstract methods
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(MemberModifiers::ABSTRACT)
    }

    /// Returns true for methods taking a variable number of arguments
    #[must_use]
    pub fn is_varargs(&self) -> bool {
        self.modifiers.contains(MemberModifiers::VARARGS)
    }

    /// Bind the method's type parameters
    ///
    /// The result is not cached; binding the same arguments twice yields equal methods.
    ///
    /// ## Arguments
    /// * 'args' - One reference type per type parameter
    ///
    /// # Errors
    /// Returns [`crate::Error::NotGenericDefinition`] if the method has no unbound type
    /// parameters, [`crate::Error::ArgumentCount`] on an arity mismatch and
    /// [`crate::Error::TypeError`] for primitive arguments or arguments violating a bound.
    pub fn make_generic_method(self: &Arc<Self>, args: &[TypeRc]) -> Result<MethodRc> {
        if !self.is_generic_method_definition() {
            return Err(NotGenericDefinition(self.to_string()));
        }
        if args.len() != self.generic_params.len() {
            return Err(ArgumentCount {
                type_name: self.to_string(),
                expected: self.generic_params.len(),
                actual: args.len(),
            });
        }
        if let Some(invalid) = args.iter().find(|arg| !arg.is_reference_type()) {
            return Err(TypeError(format!(
                "{} cannot be a type argument of {}",
                invalid.fullname(),
                self
            )));
        }

        let declaring = self.declaring_type()?;
        let registry = declaring.registry()?;
        let binder = GenericBinder::new(&registry);

        let mut bindings = TypeBindings::from_instance(&declaring)?;
        for (param, arg) in self.generic_params.iter().zip(args) {
            bindings.bind(param, arg);
        }

        for (param, arg) in self.generic_params.iter().zip(args) {
            for bound in param.bounds()? {
                let bound = binder.substitute(&bound, &bindings)?;
                if !binder.is_assignable(arg, &bound)? {
                    return Err(TypeError(format!(
                        "{} does not satisfy the bound {} of {}",
                        arg.fullname(),
                        bound.fullname(),
                        param.name
                    )));
                }
            }
        }

        let mut bound = self.substitute(&registry, &declaring, &binder, &bindings)?;
        bound.generic_args = args.iter().map(TypeRef::new).collect();
        bound.generic_definition = Some(Arc::downgrade(self));
        Ok(Arc::new(bound))
    }

    /// Reflective invocation
    ///
    /// Class metadata carries no method bodies, so there is nothing to run.
    ///
    /// # Errors
    /// Always returns [`crate::Error::UnsupportedOperation`].
    pub fn invoke(
        &self,
        _target: Option<&dyn Any>,
        _args: &[&dyn Any],
    ) -> Result<Box<dyn Any + Send>> {
        Err(UnsupportedOperation(format!(
            "Cannot invoke {} - method bodies are not part of class metadata",
            self
        )))
    }

    fn signature_hash(&self) -> u64 {
        TypeSignatureHash::new()
            .add_token(&self.declaring.token())
            .add_name(&self.name)
            .add_tokens(&self.parameter_tokens())
            .add_token(&self.return_type.token())
            .finalize()
    }
}

impl PartialEq for MethodInfo {
    fn eq(&self, other: &Self) -> bool {
        self.declaring == other.declaring
            && self.name == other.name
            && self.return_type == other.return_type
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(left, right)| left.param_type == right.param_type)
    }
}

impl Eq for MethodInfo {}

impl Hash for MethodInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.signature_hash());
    }
}

fn render(type_ref: &TypeRef) -> String {
    match type_ref.upgrade() {
        Some(ty) => ty.fullname(),
        None => type_ref.token().to_string(),
    }
}

impl fmt::Display for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .parameters
            .iter()
            .map(|param| render(&param.param_type))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} {}({})", render(&self.return_type), self.name, params)
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("token", &self.token)
            .field("declaring", &self.declaring.token())
            .field("name", &self.name)
            .field("parameters", &self.parameter_tokens())
            .field("return_type", &self.return_type.token())
            .finish()
    }
}
