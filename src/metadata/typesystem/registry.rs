//! Central type registry of a reflection session.
//!
//! This module provides the `TypeRegistry`, the thread-safe cache that owns every
//! descriptor of a session. It loads class definitions from a
//! [`crate::metadata::source::MetadataProvider`] on first request, constructs arrays,
//! generic instances and wildcards on demand, and guarantees that each structural
//! [`TypeKey`] maps to exactly one published descriptor.
//!
//! # Registry Architecture
//!
//! - **Token-based storage**: every descriptor lives in a `SkipMap` keyed by its token
//! - **Structural index**: a `DashMap` from [`TypeKey`] to token; an array over a type
//!   variable's binding is keyed with the variable, apart from the array built directly
//! - **Method cache**: resolved methods keyed by declaring type, name and requested parameters
//! - **Per-table token counters**: atomic row allocation for classes, constructed types,
//!   generic parameters, fields and methods
//!
//! # Publication
//!
//! A candidate descriptor is built completely before any index is touched. It is then
//! offered to the structural index with an insert-if-absent on the key's entry: the first
//! candidate wins and is inserted into storage before its key becomes visible; every other
//! candidate for the same key is discarded and the caller receives the winner. Nothing is
//! published when building a candidate fails.
//!
//! # Examples
//!
//! ```rust
//! use typescope::prelude::*;
//! use std::sync::Arc;
//!
//! let provider = InMemoryProvider::new();
//! provider.register(ClassBuilder::new("java.lang.Double").public().final_().build());
//!
//! let registry = TypeRegistry::new(Arc::new(provider))?;
//! let double = registry.of("java.lang.Double")?;
//!
//! // Repeated requests return the same descriptor
//! assert!(Arc::ptr_eq(&double, &registry.of("java.lang.Double")?));
//! assert!(Arc::ptr_eq(
//!     &registry.make_array_type(&double, 1)?,
//!     &double.make_array_type()?
//! ));
//!
//! // Look up by token
//! assert_eq!(registry.get(&double.token), Some(double.clone()));
//! # Ok::<(), typescope::Error>(())
//! ```

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, Weak,
};

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};
use log::{debug, trace};
use rayon::prelude::*;
use strum::IntoEnumIterator;

use crate::{
    metadata::{
        config::ResolutionConfig,
        members::{MemberResolver, MethodKey, MethodRc},
        signatures::{parse_class_signature, parse_field_signature, SignatureTypeParameter},
        source::{ClassMetadata, ClassModifiers, MetadataProvider, OBJECT_CLASS},
        token::{Token, TokenTable},
        typesystem::{
            split_name, GenericBinder, GenericOwner, PrimitiveKind, TypeBindings, TypeDescriptor,
            TypeFlavor, TypeKey, TypeOrigin, TypeRc, TypeRef, TypeResolver, WildcardKind,
        },
    },
    Error::{ArgumentCount, NotGenericDefinition, RegistryReleased, TypeError, TypeNotFound},
    Result,
};

/// Row counters, one per token table
struct TokenCounters {
    class_def: AtomicU32,
    type_spec: AtomicU32,
    generic_param: AtomicU32,
    field: AtomicU32,
    method: AtomicU32,
}

impl TokenCounters {
    fn new() -> Self {
        TokenCounters {
            // row 1 is the root class
            class_def: AtomicU32::new(2),
            type_spec: AtomicU32::new(1),
            generic_param: AtomicU32::new(1),
            field: AtomicU32::new(1),
            method: AtomicU32::new(1),
        }
    }

    fn next(&self, table: TokenTable) -> Token {
        let counter = match table {
            TokenTable::ClassDef => &self.class_def,
            TokenTable::TypeSpec => &self.type_spec,
            TokenTable::GenericParam => &self.generic_param,
            TokenTable::Field => &self.field,
            TokenTable::Method => &self.method,
            TokenTable::Primitive => {
                debug_assert!(false, "primitive tokens are fixed");
                &self.type_spec
            }
        };

        let row = counter.fetch_add(1, Ordering::Relaxed);
        debug_assert!(row < 0x00FF_FFFF, "token table {:?} is exhausted", table);
        Token::from_parts(table, row)
    }
}

/// Central registry managing all descriptors of one reflection session
///
/// The registry is always handled through an `Arc`: descriptors keep a weak link back to
/// it so that operations like [`TypeDescriptor::make_array_type`] and
/// [`TypeDescriptor::get_method`] can be called on a descriptor directly. Dropping the
/// last `Arc` tears the session down; descriptors still held by callers then report
/// [`crate::Error::RegistryReleased`] from operations that need the registry.
pub struct TypeRegistry {
    /// Primary storage: every published descriptor by token
    types: SkipMap<Token, TypeRc>,
    /// Structural index
    keys: DashMap<TypeKey, Token>,
    /// Resolved method cache
    methods: DashMap<MethodKey, MethodRc>,
    /// Primitive descriptors in `PrimitiveKind` order
    primitives: Vec<TypeRc>,
    /// The root class
    object: TypeRc,
    /// Where class definitions come from
    provider: Arc<dyn MetadataProvider>,
    /// Resolution behaviour of this session
    config: ResolutionConfig,
    /// Row allocation
    counters: TokenCounters,
    /// Handed to every descriptor created by this registry
    me: Weak<TypeRegistry>,
}

impl TypeRegistry {
    /// Create a new session over `provider` with the default configuration
    ///
    /// Primitives and the root class `java.lang.Object` are registered immediately. If the
    /// provider knows `java.lang.Object`, its members become the root's members; otherwise
    /// the root has none.
    ///
    /// # Errors
    /// Returns [`crate::Error::Provider`] if the provider fails while looking up the root.
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Result<Arc<Self>> {
        Self::with_config(provider, ResolutionConfig::default())
    }

    /// Create a new session over `provider` with an explicit configuration
    ///
    /// # Errors
    /// Returns [`crate::Error::Provider`] if the provider fails while looking up the root.
    pub fn with_config(
        provider: Arc<dyn MetadataProvider>,
        config: ResolutionConfig,
    ) -> Result<Arc<Self>> {
        let object_raw = provider.find_class(OBJECT_CLASS)?;

        Ok(Arc::new_cyclic(|me: &Weak<TypeRegistry>| {
            let types = SkipMap::new();
            let keys = DashMap::new();

            let primitives: Vec<TypeRc> = PrimitiveKind::iter()
                .map(|kind| {
                    let token = Token::from_parts(TokenTable::Primitive, kind.row());
                    let primitive = Arc::new(TypeDescriptor {
                        modifiers: ClassModifiers::PUBLIC | ClassModifiers::FINAL,
                        ..TypeDescriptor::new(
                            token,
                            TypeFlavor::Primitive(kind),
                            "",
                            kind.name(),
                            me.clone(),
                        )
                    });
                    types.insert(token, primitive.clone());
                    keys.insert(TypeKey::Primitive(kind), token);
                    primitive
                })
                .collect();

            let (namespace, name) = split_name(OBJECT_CLASS);
            let object_token = Token::from_parts(TokenTable::ClassDef, 1);
            let object = Arc::new(TypeDescriptor {
                modifiers: object_raw
                    .as_ref()
                    .map_or(ClassModifiers::PUBLIC, |raw| raw.modifiers()),
                raw: object_raw,
                ..TypeDescriptor::new(object_token, TypeFlavor::Class, namespace, name, me.clone())
            });
            types.insert(object_token, object.clone());
            keys.insert(TypeKey::Definition(OBJECT_CLASS.to_string()), object_token);

            TypeRegistry {
                types,
                keys,
                methods: DashMap::new(),
                primitives,
                object,
                provider,
                config,
                counters: TokenCounters::new(),
                me: me.clone(),
            }
        }))
    }

    /// The resolution configuration of this session
    #[must_use]
    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// The metadata provider of this session
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn MetadataProvider> {
        &self.provider
    }

    pub(crate) fn next_token(&self, table: TokenTable) -> Token {
        self.counters.next(table)
    }

    /// The descriptor of a primitive
    #[must_use]
    pub fn primitive(&self, kind: PrimitiveKind) -> TypeRc {
        self.primitives[kind as usize].clone()
    }

    /// The root class `java.lang.Object`
    #[must_use]
    pub fn object(&self) -> TypeRc {
        self.object.clone()
    }

    /// Get a descriptor by token
    ///
    /// ## Arguments
    /// * 'token' - The token of a published descriptor
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<TypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    fn lookup(&self, key: &TypeKey) -> Option<TypeRc> {
        let token = *self.keys.get(key)?;
        self.get(&token)
    }

    /// Get an already published definition or primitive by name, without loading anything
    ///
    /// ## Arguments
    /// * 'fullname' - Dotted name, or a primitive keyword like `int`
    #[must_use]
    pub fn get_by_fullname(&self, fullname: &str) -> Option<TypeRc> {
        match PrimitiveKind::from_name(fullname) {
            Some(kind) => Some(self.primitive(kind)),
            None => self.lookup(&TypeKey::Definition(fullname.to_string())),
        }
    }

    /// `Type.of`: the descriptor for a name, loading the class on first request
    ///
    /// Accepts dotted binary names, primitive keywords and `[]` suffixes
    /// (`java.lang.Object[]`, `int[][]`).
    ///
    /// ## Arguments
    /// * 'name' - The type name
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the provider does not know the class, or
    /// [`crate::Error::Malformed`] if its generic class signature cannot be parsed.
    pub fn of(&self, name: &str) -> Result<TypeRc> {
        if let Some(element) = name.strip_suffix("[]") {
            let element = self.of(element)?;
            return self.make_array_type(&element, 1);
        }

        if let Some(kind) = PrimitiveKind::from_name(name) {
            return Ok(self.primitive(kind));
        }

        let key = TypeKey::Definition(name.to_string());
        if let Some(existing) = self.lookup(&key) {
            return Ok(existing);
        }

        let raw = self
            .provider
            .find_class(name)?
            .ok_or_else(|| TypeNotFound(name.to_string()))?;
        let candidate = self.build_definition(name, raw)?;

        Ok(self.publish(key, candidate))
    }

    /// `resolve(rawClass, typeArguments)`: the definition itself, or its instance
    ///
    /// ## Arguments
    /// * 'class'     - Dotted name of the class
    /// * 'type_args' - Type arguments, empty for the raw definition
    ///
    /// # Errors
    /// See [`TypeRegistry::of`] and [`TypeRegistry::make_generic_type`].
    pub fn resolve(&self, class: &str, type_args: &[TypeRc]) -> Result<TypeRc> {
        let definition = self.of(class)?;
        if type_args.is_empty() {
            return Ok(definition);
        }
        self.make_generic_type(&definition, type_args)
    }

    /// Resolve a type signature without any type variables in scope
    ///
    /// ## Arguments
    /// * 'signature' - e.g. `Ljava/util/List<Ljava/lang/Double;>;`
    ///
    /// # Errors
    /// Returns an error if the signature is malformed, names an unknown class or uses a
    /// type variable.
    pub fn resolve_signature(&self, signature: &str) -> Result<TypeRc> {
        let parsed = parse_field_signature(signature)?;
        TypeResolver::new(self).resolve(&parsed)
    }

    fn build_definition(&self, name: &str, raw: Arc<dyn ClassMetadata>) -> Result<TypeRc> {
        let class_signature = match raw.signature() {
            Some(signature) => Some(parse_class_signature(signature)?),
            None => None,
        };

        let token = self.next_token(TokenTable::ClassDef);
        let (namespace, simple_name) = split_name(name);

        Ok(Arc::new_cyclic(|definition: &Weak<TypeDescriptor>| {
            let generic_params = class_signature
                .iter()
                .flat_map(|signature| signature.type_params.iter())
                .enumerate()
                .map(|(position, param)| {
                    Arc::new(TypeDescriptor {
                        origin: TypeOrigin::GenericParameter,
                        owner: Some(GenericOwner::Type(token)),
                        declaring: Some(TypeRef::from_weak(token, definition.clone())),
                        bound_signatures: param.bounds().into_iter().cloned().collect(),
                        ..TypeDescriptor::new(
                            self.next_token(TokenTable::GenericParam),
                            TypeFlavor::GenericParameter { position },
                            "",
                            &param.name,
                            self.me.clone(),
                        )
                    })
                })
                .collect();

            TypeDescriptor {
                modifiers: raw.modifiers(),
                generic_params,
                class_signature,
                raw: Some(raw),
                ..TypeDescriptor::new(
                    token,
                    TypeFlavor::Class,
                    namespace,
                    simple_name,
                    self.me.clone(),
                )
            }
        }))
    }

    /// Insert-if-absent publication of a fully built candidate
    ///
    /// Storage is written before the key becomes visible, so any thread that finds the key
    /// also finds the descriptor. The entry lock is held only for these two inserts.
    fn publish(&self, key: TypeKey, candidate: TypeRc) -> TypeRc {
        match self.keys.entry(key) {
            Entry::Occupied(entry) => {
                let token = *entry.get();
                trace!(
                    "Discarding candidate {} for {}, already published as {}",
                    candidate.token,
                    candidate.fullname(),
                    token
                );
                match self.types.get(&token) {
                    Some(existing) => existing.value().clone(),
                    None => candidate,
                }
            }
            Entry::Vacant(entry) => {
                self.types.insert(candidate.token, candidate.clone());
                for param in candidate.generic_parameters() {
                    self.types.insert(param.token, param.clone());
                }
                entry.insert(candidate.token);

                debug!("Published {} as {}", candidate.fullname(), candidate.token);
                candidate
            }
        }
    }

    /// Create the type variables of a generic method
    ///
    /// The returned parameters are not published; their bounds are set by the caller once
    /// all of them exist, since a bound may name a sibling (`<K, V extends K>`).
    pub(crate) fn create_method_parameters(
        &self,
        method: Token,
        declaring: &TypeRc,
        params: &[SignatureTypeParameter],
    ) -> Vec<TypeRc> {
        params
            .iter()
            .enumerate()
            .map(|(position, param)| {
                Arc::new(TypeDescriptor {
                    origin: TypeOrigin::GenericParameter,
                    owner: Some(GenericOwner::Method(method)),
                    declaring: Some(TypeRef::new(declaring)),
                    bound_signatures: param.bounds().into_iter().cloned().collect(),
                    ..TypeDescriptor::new(
                        self.next_token(TokenTable::GenericParam),
                        TypeFlavor::GenericParameter { position },
                        "",
                        &param.name,
                        self.me.clone(),
                    )
                })
            })
            .collect()
    }

    /// Make method level type variables reachable by token
    pub(crate) fn register_generic_parameters(&self, params: &[TypeRc]) {
        for param in params {
            self.types.insert(param.token, param.clone());
        }
    }

    /// Create (or find) the array type over `element` with the given number of dimensions
    ///
    /// Arrays nest: a rank of 2 is the array of the rank 1 array, `int[][]`.
    ///
    /// ## Arguments
    /// * 'element' - The element type
    /// * 'rank'    - Number of dimensions, at least 1
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] for a zero rank, `void` or wildcard elements.
    pub fn make_array_type(&self, element: &TypeRc, rank: u32) -> Result<TypeRc> {
        if rank == 0 {
            return Err(TypeError(format!(
                "Array of {} must have at least one dimension",
                element.fullname()
            )));
        }

        let mut array = self.array_of(element, None)?;
        for _ in 1..rank {
            array = self.array_of(&array, None)?;
        }
        Ok(array)
    }

    /// The array over `element` that substituting `element` for `param` in `param[]` yields
    ///
    /// Keyed apart from the array built directly over `element`, and apart from arrays bound
    /// from any other type variable.
    pub(crate) fn make_bound_array_type(&self, element: &TypeRc, param: &TypeRc) -> Result<TypeRc> {
        self.array_of(element, Some(param))
    }

    fn array_of(&self, element: &TypeRc, bound_from: Option<&TypeRc>) -> Result<TypeRc> {
        if element.primitive_kind() == Some(PrimitiveKind::Void) || element.is_wildcard() {
            return Err(TypeError(format!(
                "{} cannot be an array element type",
                element.fullname()
            )));
        }

        let key = TypeKey::Array {
            element: element.token,
            bound_from: bound_from.map(|param| param.token),
        };
        if let Some(existing) = self.lookup(&key) {
            return Ok(existing);
        }

        let rank = element.array_rank().unwrap_or(0) + 1;
        let candidate = Arc::new(TypeDescriptor {
            modifiers: ClassModifiers::PUBLIC | ClassModifiers::FINAL | ClassModifiers::ABSTRACT,
            origin: element.origin,
            element: Some(TypeRef::new(element)),
            bound_from: bound_from.map(TypeRef::new),
            ..TypeDescriptor::new(
                self.next_token(TokenTable::TypeSpec),
                TypeFlavor::Array { rank },
                &element.namespace,
                &format!("{}[]", element.name),
                self.me.clone(),
            )
        });

        let published = self.publish(key, candidate.clone());
        if Arc::ptr_eq(&published, &candidate) {
            element.push_constructed(&published);
        }
        Ok(published)
    }

    /// Bind a generic definition to type arguments
    ///
    /// Binding a definition to its own type parameters, in order, yields the definition.
    ///
    /// ## Arguments
    /// * 'definition' - A generic type definition
    /// * 'type_args'  - One reference type (or wildcard) per type parameter
    ///
    /// # Errors
    /// Returns [`crate::Error::NotGenericDefinition`] if `definition` declares no type
    /// parameters, [`crate::Error::ArgumentCount`] on an arity mismatch and
    /// [`crate::Error::TypeError`] for primitive arguments.
    pub fn make_generic_type(&self, definition: &TypeRc, type_args: &[TypeRc]) -> Result<TypeRc> {
        if !definition.is_generic_type_definition() {
            return Err(NotGenericDefinition(definition.fullname()));
        }

        let params = definition.generic_parameters();
        if params.len() != type_args.len() {
            return Err(ArgumentCount {
                type_name: definition.fullname(),
                expected: params.len(),
                actual: type_args.len(),
            });
        }

        if let Some(primitive) = type_args.iter().find(|arg| arg.is_primitive()) {
            return Err(TypeError(format!(
                "Primitive type {} cannot be a type argument of {}",
                primitive.fullname(),
                definition.fullname()
            )));
        }

        if params
            .iter()
            .zip(type_args)
            .all(|(param, arg)| param.token == arg.token)
        {
            return Ok(definition.clone());
        }

        let origin = type_args
            .iter()
            .fold(TypeOrigin::Erased, |origin, arg| origin.merge(arg.origin));
        let key = TypeKey::GenericInstance {
            definition: definition.token,
            args: type_args.iter().map(|arg| arg.token).collect(),
        };
        if let Some(existing) = self.lookup(&key) {
            return Ok(existing);
        }

        let rendered_args = type_args
            .iter()
            .map(|arg| arg.fullname())
            .collect::<Vec<_>>()
            .join(", ");
        let candidate = Arc::new(TypeDescriptor {
            modifiers: definition.modifiers,
            origin,
            definition: Some(TypeRef::new(definition)),
            type_args: type_args.iter().map(TypeRef::new).collect(),
            raw: definition.raw().cloned(),
            ..TypeDescriptor::new(
                self.next_token(TokenTable::TypeSpec),
                TypeFlavor::GenericInstance,
                &definition.namespace,
                &format!("{}<{}>", definition.name, rendered_args),
                self.me.clone(),
            )
        });

        let published = self.publish(key, candidate.clone());
        if Arc::ptr_eq(&published, &candidate) {
            definition.push_constructed(&published);
        }
        Ok(published)
    }

    /// Create (or find) a wildcard type argument
    ///
    /// ## Arguments
    /// * 'kind'  - The wildcard flavour
    /// * 'bound' - The bound; ignored for [`WildcardKind::Unbounded`]
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if a bounded wildcard has no bound or a
    /// primitive bound.
    pub fn make_wildcard(&self, kind: WildcardKind, bound: Option<&TypeRc>) -> Result<TypeRc> {
        let bound = match (kind, bound) {
            (WildcardKind::Unbounded, _) => None,
            (_, Some(bound)) if bound.is_reference_type() => Some(bound),
            (_, Some(bound)) => {
                return Err(TypeError(format!(
                    "{} cannot bound a wildcard",
                    bound.fullname()
                )))
            }
            (_, None) => {
                return Err(TypeError(format!(
                    "A {:?} wildcard requires a bound",
                    kind
                )))
            }
        };

        let key = TypeKey::Wildcard {
            kind,
            bound: bound.map(|bound| bound.token),
        };
        if let Some(existing) = self.lookup(&key) {
            return Ok(existing);
        }

        let name = match (kind, bound) {
            (WildcardKind::Extends, Some(bound)) => format!("? extends {}", bound.fullname()),
            (WildcardKind::Super, Some(bound)) => format!("? super {}", bound.fullname()),
            _ => "?".to_string(),
        };
        let candidate = Arc::new(TypeDescriptor {
            origin: bound.map_or(TypeOrigin::Erased, |bound| bound.origin),
            bound: bound.map(TypeRef::new),
            ..TypeDescriptor::new(
                self.next_token(TokenTable::TypeSpec),
                TypeFlavor::Wildcard { kind },
                "",
                &name,
                self.me.clone(),
            )
        });

        Ok(self.publish(key, candidate))
    }

    pub(crate) fn compute_base_type(&self, ty: &TypeRc) -> Result<Option<TypeRc>> {
        match ty.flavor {
            TypeFlavor::Primitive(_) => Ok(None),
            TypeFlavor::Class => {
                if ty.modifiers.is_interface() || ty.token == self.object.token {
                    return Ok(None);
                }

                if let Some(signature) = ty.class_signature() {
                    let resolver =
                        TypeResolver::new(self).with_class_params(ty.generic_parameters());
                    return resolver.resolve(&signature.superclass).map(Some);
                }

                match ty.raw().and_then(|raw| raw.superclass()) {
                    Some(superclass) => self.of(superclass).map(Some),
                    None => Ok(None),
                }
            }
            TypeFlavor::GenericInstance => {
                let definition = ty.generic_type_definition()?;
                match definition.base_type()? {
                    Some(base) => {
                        let bindings = TypeBindings::from_instance(ty)?;
                        GenericBinder::new(self).substitute(&base, &bindings).map(Some)
                    }
                    None => Ok(None),
                }
            }
            TypeFlavor::Array { .. } => Ok(Some(self.object())),
            TypeFlavor::GenericParameter { .. } => {
                let bounds = ty.bounds()?;
                match bounds.first() {
                    Some(first) if !first.is_interface() => Ok(Some(first.clone())),
                    _ => Ok(Some(self.object())),
                }
            }
            TypeFlavor::Wildcard { kind } => match (kind, ty.wildcard_bound()) {
                (WildcardKind::Extends, Some(bound)) => Ok(Some(bound)),
                _ => Ok(Some(self.object())),
            },
        }
    }

    pub(crate) fn compute_interfaces(&self, ty: &TypeRc) -> Result<Vec<TypeRc>> {
        match ty.flavor {
            TypeFlavor::Class => {
                if let Some(signature) = ty.class_signature() {
                    let resolver =
                        TypeResolver::new(self).with_class_params(ty.generic_parameters());
                    return resolver.resolve_all(&signature.interfaces);
                }

                match ty.raw() {
                    Some(raw) => raw
                        .interfaces()
                        .iter()
                        .map(|interface| self.of(interface))
                        .collect(),
                    None => Ok(Vec::new()),
                }
            }
            TypeFlavor::GenericInstance => {
                let definition = ty.generic_type_definition()?;
                let bindings = TypeBindings::from_instance(ty)?;
                let binder = GenericBinder::new(self);
                definition
                    .interfaces()?
                    .iter()
                    .map(|interface| binder.substitute(interface, &bindings))
                    .collect()
            }
            TypeFlavor::GenericParameter { .. } => Ok(ty
                .bounds()?
                .into_iter()
                .filter(|bound| bound.is_interface())
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    pub(crate) fn compute_parameter_bounds(&self, ty: &TypeRc) -> Result<Vec<TypeRc>> {
        let declaring = ty.declaring_type().ok_or(RegistryReleased)?;
        let resolver = TypeResolver::new(self).with_class_params(declaring.generic_parameters());

        let bounds = resolver.resolve_all(ty.bound_signatures())?;
        if bounds.is_empty() {
            return Ok(vec![self.object()]);
        }
        Ok(bounds)
    }

    pub(crate) fn cached_method(&self, key: &MethodKey) -> Option<MethodRc> {
        self.methods.get(key).map(|entry| entry.value().clone())
    }

    pub(crate) fn cache_method(&self, key: MethodKey, method: MethodRc) -> MethodRc {
        self.methods.entry(key).or_insert(method).value().clone()
    }

    /// Number of entries in the resolved method cache
    #[must_use]
    pub fn method_cache_len(&self) -> usize {
        self.methods.len()
    }

    /// Drop all resolved method lookups
    ///
    /// Member tables of descriptors are part of the descriptors and stay; later lookups
    /// resolve against them again and return equal `MethodInfo`s.
    pub fn clear_member_cache(&self) {
        self.methods.clear();
    }

    /// Load many classes, and their declared members, in parallel
    ///
    /// ## Arguments
    /// * 'names' - Names accepted by [`TypeRegistry::of`]
    ///
    /// # Errors
    /// Returns the first error encountered; descriptors loaded before it stay published.
    pub fn preload(&self, names: &[&str]) -> Result<Vec<TypeRc>> {
        names
            .par_iter()
            .map(|name| {
                let loaded = self.of(name)?;
                MemberResolver::new(self).declared(&loaded)?;
                Ok(loaded)
            })
            .collect()
    }

    /// Count of descriptors in the registry
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty (never true; primitives are always present)
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns an iterator over all descriptors in token order
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, Token, TypeRc> {
        self.types.iter()
    }

    /// Get all descriptors in the registry
    pub fn all_types(&self) -> Vec<TypeRc> {
        self.types
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
