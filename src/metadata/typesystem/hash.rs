//! Signature hashing for type and member identity.
//!
//! This module provides [`TypeSignatureHash`], a builder that folds the identity of a type
//! or member into a 64-bit value. It is what [`crate::metadata::members::MethodInfo`] and
//! [`crate::metadata::members::FieldInfo`] feed their `Hash` implementations from, so two
//! overloads that differ only in one parameter type hash differently without ever
//! formatting a string.
//!
//! # Hash Design
//!
//! Components are mixed sequentially with FNV-1a style multiplication followed by an
//! avalanche step. Mixing is order sensitive, so `m(int, long)` and `m(long, int)` diverge,
//! and components never cancel each other out the way XOR combination does.
//!
//! # Example Usage
//!
//! ```rust
//! use typescope::metadata::typesystem::TypeSignatureHash;
//! use typescope::metadata::token::Token;
//!
//! let declaring = Token::new(0x02000005);
//! let abs_int = TypeSignatureHash::new()
//!     .add_token(&declaring)
//!     .add_name("abs")
//!     .add_tokens(&[Token::new(0xF0000005)])
//!     .finalize();
//! let abs_long = TypeSignatureHash::new()
//!     .add_token(&declaring)
//!     .add_name("abs")
//!     .add_tokens(&[Token::new(0xF0000006)])
//!     .finalize();
//! assert_ne!(abs_int, abs_long);
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::metadata::{token::Token, typesystem::TypeFlavor};

/// Hash builder for type and member signatures using FNV-1a inspired mixing
pub struct TypeSignatureHash {
    /// Current hash state
    state: u64,
}

impl TypeSignatureHash {
    /// Create a new signature hash builder seeded with the FNV-1a offset basis
    #[must_use]
    pub fn new() -> Self {
        TypeSignatureHash {
            state: 0xcbf2_9ce4_8422_2325_u64,
        }
    }

    fn mix(&mut self, value: u64) {
        self.state ^= value;
        self.state = self.state.wrapping_mul(0x0100_0000_01b3_u64);

        self.state ^= self.state >> 33;
        self.state = self.state.wrapping_mul(0xff51_afd7_ed55_8ccd_u64);
        self.state ^= self.state >> 33;
    }

    /// Add any hashable component to the signature
    ///
    /// ## Arguments
    /// * `component` - Any hashable component to include in the signature
    #[must_use]
    pub fn add_component<T: Hash + ?Sized>(mut self, component: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        component.hash(&mut hasher);
        self.mix(hasher.finish());
        self
    }

    /// Add the type flavor, keeping e.g. a wildcard apart from an exact argument
    #[must_use]
    pub fn add_flavor(self, flavor: &TypeFlavor) -> Self {
        self.add_component(flavor)
    }

    /// Add a member or type name
    #[must_use]
    pub fn add_name(self, name: &str) -> Self {
        self.add_component(name)
    }

    /// Add a token
    ///
    /// Tokens of canonical descriptors stand for their full structure, so this is how
    /// parameter and return types enter a member hash.
    #[must_use]
    pub fn add_token(mut self, token: &Token) -> Self {
        self.mix(u64::from(token.value()));
        self
    }

    /// Add an ordered token sequence, prefixed by its length
    ///
    /// The length prefix keeps `(a, b) + (c)` apart from `(a) + (b, c)` when two sequences
    /// are added back to back.
    #[must_use]
    pub fn add_tokens(mut self, tokens: &[Token]) -> Self {
        self.mix(tokens.len() as u64);
        for token in tokens {
            self = self.add_token(token);
        }
        self
    }

    /// Finalize the hash and return the computed signature
    #[must_use]
    pub fn finalize(self) -> u64 {
        self.state
    }
}

impl Default for TypeSignatureHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{PrimitiveKind, WildcardKind};

    #[test]
    fn test_hash_deterministic() {
        let hash1 = TypeSignatureHash::new()
            .add_flavor(&TypeFlavor::Class)
            .add_name("java.lang.String")
            .finalize();

        let hash2 = TypeSignatureHash::new()
            .add_flavor(&TypeFlavor::Class)
            .add_name("java.lang.String")
            .finalize();

        assert_eq!(hash1, hash2, "Hash should be deterministic");
    }

    #[test]
    fn test_hash_order_sensitive() {
        let int = Token::new(0xF0000005);
        let long = Token::new(0xF0000006);

        let hash1 = TypeSignatureHash::new().add_tokens(&[int, long]).finalize();
        let hash2 = TypeSignatureHash::new().add_tokens(&[long, int]).finalize();

        assert_ne!(hash1, hash2, "Hash should be order-sensitive");
    }

    #[test]
    fn test_sequence_boundaries() {
        let a = Token::new(1);
        let b = Token::new(2);
        let c = Token::new(3);

        let hash1 = TypeSignatureHash::new()
            .add_tokens(&[a, b])
            .add_tokens(&[c])
            .finalize();
        let hash2 = TypeSignatureHash::new()
            .add_tokens(&[a])
            .add_tokens(&[b, c])
            .finalize();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_flavor_differentiation() {
        let flavors = [
            TypeFlavor::Class,
            TypeFlavor::GenericInstance,
            TypeFlavor::Array { rank: 1 },
            TypeFlavor::Primitive(PrimitiveKind::Int),
            TypeFlavor::GenericParameter { position: 0 },
            TypeFlavor::Wildcard {
                kind: WildcardKind::Extends,
            },
        ];

        let hashes: Vec<u64> = flavors
            .iter()
            .map(|flavor| TypeSignatureHash::new().add_flavor(flavor).finalize())
            .collect();

        for i in 0..hashes.len() {
            for j in (i + 1)..hashes.len() {
                assert_ne!(
                    hashes[i], hashes[j],
                    "Different flavors should produce different hashes"
                );
            }
        }
    }
}
