//! Descriptor and generic signature parsing for JVM-style class metadata.
//!
//! Class files describe every field and method twice: once with an erased descriptor and,
//! for anything generic, once more with a generic signature. Both use the same textual
//! grammar, which this module parses into [`TypeSignature`] trees.
//!
//! # Grammar
//!
//! - **Base types** - `Z B C S I J F D`, and `V` in return position
//! - **Class types** - `Lpkg/Name;`, optionally `Lpkg/Name<args>;` with `.Inner<args>` suffixes
//! - **Arrays** - `[elem`
//! - **Type variables** - `Tname;`
//! - **Type arguments** - exact, `*`, `+T` (extends) and `-T` (super)
//! - **Method signatures** - `<T:Lbound;:Liface;>(params)ret^throws`
//! - **Class signatures** - `<T:..>Lsuper;Liface;..`
//!
//! # Examples
//!
//! ```rust
//! use typescope::metadata::signatures::parse_method_signature;
//!
//! let sig = parse_method_signature("<T:Ljava/lang/Object;>([TT;)Ljava/lang/Iterable<TT;>;")?;
//! assert_eq!(sig.type_params[0].name, "T");
//! assert_eq!(sig.return_type.to_string(), "java.lang.Iterable<T>");
//! # Ok::<(), typescope::Error>(())
//! ```
//!
//! ```rust
//! use typescope::metadata::signatures::parse_field_signature;
//!
//! let sig = parse_field_signature("Ljava/util/List<TT;>;")?;
//! assert!(sig.has_type_variables());
//! # Ok::<(), typescope::Error>(())
//! ```

mod parser;
mod types;

pub use parser::*;
pub use types::*;

use crate::Result;

/// Parse a method descriptor or generic method signature
///
/// ## Arguments
/// * 'input' - The signature string to parse
///
/// # Errors
/// Returns an error if the signature is malformed or nested too deeply
pub fn parse_method_signature(input: &str) -> Result<SignatureMethod> {
    let mut parser = SignatureParser::new(input);
    parser.parse_method_signature()
}

/// Parse a field descriptor or generic field signature
///
/// ## Arguments
/// * 'input' - The signature string to parse
///
/// # Errors
/// Returns an error if the signature is malformed or nested too deeply
pub fn parse_field_signature(input: &str) -> Result<TypeSignature> {
    let mut parser = SignatureParser::new(input);
    parser.parse_field_signature()
}

/// Parse a generic class signature
///
/// ## Arguments
/// * 'input' - The signature string to parse
///
/// # Errors
/// Returns an error if the signature is malformed or nested too deeply
pub fn parse_class_signature(input: &str) -> Result<SignatureClassDecl> {
    let mut parser = SignatureParser::new(input);
    parser.parse_class_signature()
}
