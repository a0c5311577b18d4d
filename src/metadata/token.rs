//! Opaque handles for descriptors and members.
//!
//! A [`Token`] packs a [`TokenTable`] tag and a row number into a `u32`. The registry hands
//! out tokens from per-table counters, so a token is unique within its session.
//!
//! # Examples
//!
//! ```rust
//! use typescope::metadata::token::{Token, TokenTable};
//!
//! let token = Token::new(0x1B00_0001);
//! assert_eq!(token.table(), TokenTable::TypeSpec as u8);
//! assert_eq!(token.row(), 1);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

/// An opaque handle referencing an entry published by the
/// [`crate::metadata::typesystem::TypeRegistry`].
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the entity table (see [`TokenTable`])
/// - The low 24 bits (bits 0-23) indicate the row within that table
///
/// Because every descriptor is canonical, comparing two tokens is equivalent to comparing
/// the structures they stand for.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

/// Entity tables used in the high byte of a [`Token`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenTable {
    /// Class definitions loaded from the metadata provider
    ClassDef = 0x02,
    /// Fields
    Field = 0x04,
    /// Methods and constructors
    Method = 0x06,
    /// Constructed types: arrays, generic instances, wildcards
    TypeSpec = 0x1B,
    /// Generic parameters of classes and methods
    GenericParam = 0x2A,
    /// Built-in primitive types
    Primitive = 0xF0,
}

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table and a row index
    #[must_use]
    pub fn from_parts(table: TokenTable, row: u32) -> Self {
        Token(((table as u32) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this token belongs to `table`
    #[must_use]
    pub fn is_table(&self, table: TokenTable) -> bool {
        self.table() == table as u8
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
