//! # typescope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the typescope library. Import this module to get quick access to the essential
//! types for building a reflection session and querying it.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all typescope operations
pub use crate::Error;

/// The result type used throughout typescope
pub use crate::Result;

/// Configuration for overload resolution and signature handling
pub use crate::metadata::config::{OverloadPolicy, ResolutionConfig};

// ================================================================================================
// Metadata Ingestion
// ================================================================================================

/// Provider interface and the in-memory implementation
pub use crate::metadata::source::{
    ClassBuilder, ClassMetadata, ClassModifiers, FieldBuilder, InMemoryProvider, MemberModifiers,
    MetadataProvider, MethodBuilder, RawClass, RawField, RawMethod,
};

/// Opaque handles for published descriptors
pub use crate::metadata::token::{Token, TokenTable};

// ================================================================================================
// Type System
// ================================================================================================

/// Core type system components
pub use crate::metadata::typesystem::{
    GenericBinder, GenericOwner, PrimitiveKind, TypeBindings, TypeBuilder, TypeDescriptor,
    TypeFlavor, TypeKey, TypeOrigin, TypeRc, TypeRef, TypeRegistry, TypeResolver, WildcardKind,
};

// ================================================================================================
// Members
// ================================================================================================

/// Fields, methods and their lookup
pub use crate::metadata::members::{
    FieldInfo, FieldRc, MemberResolver, MethodInfo, MethodRc, ParameterInfo,
};

// ================================================================================================
// Signatures
// ================================================================================================

/// Parsed descriptor and generic signature structures
pub use crate::metadata::signatures::{
    parse_class_signature, parse_field_signature, parse_method_signature, SignatureClass,
    SignatureClassDecl, SignatureMethod, SignatureTypeParameter, TypeArgument, TypeSignature,
};
