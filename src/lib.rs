// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # typescope
//!
//! A concurrent reflection layer over JVM-style class metadata. `typescope` turns raw class
//! descriptions (names, modifiers, descriptors and generic signature strings) into canonical,
//! cached type descriptors with a CLR-flavoured reflection API: `Type.of`, generic type
//! instantiation, array types, field lookup and overload-resolving method lookup.
//!
//! ## Features
//!
//! - **Canonical descriptors** - structurally equal types are the same `Arc`, so identity is a
//!   token comparison
//! - **Generic instantiation** - `List<T>` bound to `Double` yields `List<Double>` through fields,
//!   methods and base types
//! - **Precise method identity** - `abs(int)` and `abs(long)`, or `Object[]` and a generic `T[]`,
//!   never compare or hash equal
//! - **Thread safe** - one [`metadata::typesystem::TypeRegistry`] is shared across threads and
//!   publishes at most one descriptor per structural key
//!
//! ## Quick Start
//!
//! ```rust
//! use typescope::prelude::*;
//! use std::sync::Arc;
//!
//! let provider = InMemoryProvider::new();
//! provider.register(
//!     ClassBuilder::new("java.util.List")
//!         .public()
//!         .interface()
//!         .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
//!         .build(),
//! );
//! provider.register(ClassBuilder::new("java.lang.Double").public().build());
//! provider.register(
//!     ClassBuilder::new("com.example.Basket")
//!         .public()
//!         .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
//!         .field(|field| {
//!             field
//!                 .name("items")
//!                 .public()
//!                 .descriptor("Ljava/util/List;")
//!                 .signature("Ljava/util/List<TT;>;")
//!         })
//!         .build(),
//! );
//!
//! let registry = TypeRegistry::new(Arc::new(provider))?;
//! let double = registry.of("java.lang.Double")?;
//! let basket = registry.of("com.example.Basket")?.make_generic_type(&[double.clone()])?;
//!
//! let items = basket.get_field("items")?;
//! let expected = registry.of("java.util.List")?.make_generic_type(&[double])?;
//! assert_eq!(items.field_type()?, expected);
//! # Ok::<(), typescope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata::source`] - the ingestion interface: [`metadata::source::MetadataProvider`],
//!   raw class records and fluent builders
//! - [`metadata::signatures`] - parser for JVM descriptors and generic signatures
//! - [`metadata::typesystem`] - descriptors, the registry, signature resolution and the
//!   generic binder
//! - [`metadata::members`] - fields, methods and the member resolver
//! - [`Error`] and [`Result`] - crate wide error handling
//!
//! ## Logging
//!
//! The crate emits diagnostics through the [`log`](https://docs.rs/log) facade and never
//! installs a logger itself.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use typescope::prelude::*;
/// use std::sync::Arc;
///
/// let registry = TypeRegistry::new(Arc::new(InMemoryProvider::new()))?;
/// let object = registry.object();
/// assert_eq!(object.fullname(), "java.lang.Object");
/// # Ok::<(), typescope::Error>(())
/// ```
pub mod prelude;

/// Class metadata, signatures, the type system and member reflection.
///
/// The entry point is [`metadata::typesystem::TypeRegistry`], created from a
/// [`metadata::source::MetadataProvider`].
pub mod metadata;

/// `typescope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `typescope` Error type
///
/// # Examples
///
/// ```rust
/// use typescope::{Error, prelude::*};
/// use std::sync::Arc;
///
/// let registry = TypeRegistry::new(Arc::new(InMemoryProvider::new()))?;
/// match registry.object().get_field("missing") {
///     Err(Error::MemberNotFound { member, .. }) => assert_eq!(member, "missing"),
///     other => panic!("unexpected result: {:?}", other.is_ok()),
/// }
/// # Ok::<(), typescope::Error>(())
/// ```
pub use error::Error;

/// Main entry point for reflection sessions.
///
/// See [`metadata::typesystem::TypeRegistry`].
pub use metadata::typesystem::TypeRegistry;

/// Tunable resolution behaviour, see [`metadata::config::ResolutionConfig`].
pub use metadata::config::{OverloadPolicy, ResolutionConfig};
