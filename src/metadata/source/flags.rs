//! Access and property flags of classes and members.
//!
//! The values are the JVM class file access flags, so raw `u16` flag words taken from a
//! class file can be converted without remapping.
//!
//! # Key Types
//! - [`ClassModifiers`]: flags on a class, interface, enum or annotation
//! - [`MemberModifiers`]: flags on a field, method or constructor

use bitflags::bitflags;

/// Bitmask for the visibility part of member flags
pub const MEMBER_ACCESS_MASK: u16 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Class access and property flags
    pub struct ClassModifiers: u16 {
        /// Declared public
        const PUBLIC = 0x0001;
        /// Declared final; no subclasses allowed
        const FINAL = 0x0010;
        /// Treat superclass methods specially when invoked by `invokespecial`
        const SUPER = 0x0020;
        /// Is an interface, not a class
        const INTERFACE = 0x0200;
        /// Declared abstract; must not be instantiated
        const ABSTRACT = 0x0400;
        /// Not present in source code
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation interface
        const ANNOTATION = 0x2000;
        /// Declared as an enum class
        const ENUM = 0x4000;
    }
}

impl ClassModifiers {
    /// Extract class modifiers from a raw access flag word
    #[must_use]
    pub fn from_access_flags(flags: u16) -> Self {
        Self::from_bits_truncate(flags)
    }

    /// Returns true for interfaces and annotation interfaces
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.contains(ClassModifiers::INTERFACE)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Field and method access and property flags
    pub struct MemberModifiers: u16 {
        /// Declared public
        const PUBLIC = 0x0001;
        /// Declared private
        const PRIVATE = 0x0002;
        /// Declared protected
        const PROTECTED = 0x0004;
        /// Declared static
        const STATIC = 0x0008;
        /// Declared final
        const FINAL = 0x0010;
        /// Method is synchronized
        const SYNCHRONIZED = 0x0020;
        /// Field is volatile
        const VOLATILE = 0x0040;
        /// Method is a compiler generated bridge
        const BRIDGE = 0x0040;
        /// Field is transient
        const TRANSIENT = 0x0080;
        /// Method takes a variable number of arguments
        const VARARGS = 0x0080;
        /// Method is native
        const NATIVE = 0x0100;
        /// Method is abstract
        const ABSTRACT = 0x0400;
        /// Method uses strict floating point
        const STRICT = 0x0800;
        /// Not present in source code
        const SYNTHETIC = 0x1000;
        /// Field is an enum constant
        const ENUM = 0x4000;
    }
}

impl MemberModifiers {
    /// Extract member modifiers from a raw access flag word
    #[must_use]
    pub fn from_access_flags(flags: u16) -> Self {
        Self::from_bits_truncate(flags)
    }

    /// Extract only the visibility flags
    #[must_use]
    pub fn access(&self) -> Self {
        Self::from_bits_truncate(self.bits() & MEMBER_ACCESS_MASK)
    }

    /// Returns true if the member is declared static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.contains(MemberModifiers::STATIC)
    }
}
