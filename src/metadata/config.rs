//! Resolution configuration for a reflection session
//!
//! This module provides the knobs that change how a
//! [`crate::metadata::typesystem::TypeRegistry`] resolves members and signatures. A
//! configuration is fixed when the registry is created and shared by every lookup in that
//! session.

/// How overload resolution settles multiple candidates that match a request.
///
/// Candidates are only ever compared within one level of the type hierarchy; a match on a
/// derived type always hides matches on its base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverloadPolicy {
    /// A candidate whose declared parameters match exactly wins over candidates that only
    /// match after method type argument inference. Two exact (or, with no exact candidate,
    /// two inferred) matches are ambiguous.
    #[default]
    PreferExact,
    /// Any request matched by more than one candidate is ambiguous.
    Strict,
}

/// Configuration for signature resolution and member lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// Tie-break rule for overloads
    pub overload_policy: OverloadPolicy,

    /// Match generic methods by inferring their type arguments from the requested parameter
    /// types. When disabled, `<T> m(T[])` only matches a request for `T[]` itself.
    pub infer_method_type_arguments: bool,

    /// Continue a method search into super-interfaces once the class chain is exhausted
    pub search_interfaces: bool,

    /// Maximum nesting depth when resolving and substituting signatures (default: 100)
    pub max_recursion_depth: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            overload_policy: OverloadPolicy::PreferExact,
            infer_method_type_arguments: true,
            search_interfaces: true,
            max_recursion_depth: 100,
        }
    }
}

impl ResolutionConfig {
    /// Creates a configuration where every multiple match is reported as ambiguous
    #[must_use]
    pub fn strict() -> Self {
        Self {
            overload_policy: OverloadPolicy::Strict,
            ..Self::default()
        }
    }

    /// Creates a configuration for deeply nested generic code
    ///
    /// Same matching rules as the default, with a larger recursion budget.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            max_recursion_depth: 512,
            ..Self::default()
        }
    }

    /// Creates a configuration that only performs exact lookups along the class chain
    ///
    /// No type argument inference and no interface search.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            overload_policy: OverloadPolicy::PreferExact,
            infer_method_type_arguments: false,
            search_interfaces: false,
            max_recursion_depth: 100,
        }
    }
}
