//! Class metadata and reflection over it.
//!
//! The modules build on each other leaf-first:
//!
//! - [`token`] - opaque handles for everything the registry publishes
//! - [`signatures`] - JVM descriptor and generic signature grammar
//! - [`source`] - how raw class records enter the system
//! - [`typesystem`] - canonical type descriptors, the registry and the generic binder
//! - [`members`] - fields, methods, method identity and member lookup
//! - [`config`] - knobs for resolution behaviour

/// Knobs for overload resolution, inference and recursion limits
pub mod config;
/// Fields, methods and member lookup across a type hierarchy
pub mod members;
/// Parser for JVM descriptors and generic signatures
pub mod signatures;
/// Metadata providers, raw class records and their builders
pub mod source;
/// Commonly used metadata token type
pub mod token;
/// Type descriptors, the type registry and the generic binder
pub mod typesystem;
