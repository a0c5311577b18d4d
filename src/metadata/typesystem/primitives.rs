use std::fmt;

use strum::{EnumCount, EnumIter};

/// The built-in primitive types, plus `void`
///
/// Primitive descriptors are registered eagerly by every
/// [`crate::metadata::typesystem::TypeRegistry`] and never come from a metadata provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum PrimitiveKind {
    /// `boolean` - `Z`
    Boolean,
    /// `byte` - signed 8-bit integer, `B`
    Byte,
    /// `char` - unsigned 16-bit UTF-16 code unit, `C`
    Char,
    /// `short` - signed 16-bit integer, `S`
    Short,
    /// `int` - signed 32-bit integer, `I`
    Int,
    /// `long` - signed 64-bit integer, `J`
    Long,
    /// `float` - 32-bit IEEE 754, `F`
    Float,
    /// `double` - 64-bit IEEE 754, `D`
    Double,
    /// `void` - only valid as a return type, `V`
    Void,
}

impl PrimitiveKind {
    /// The single character descriptor of this primitive
    #[must_use]
    pub fn descriptor(&self) -> char {
        match self {
            PrimitiveKind::Boolean => 'Z',
            PrimitiveKind::Byte => 'B',
            PrimitiveKind::Char => 'C',
            PrimitiveKind::Short => 'S',
            PrimitiveKind::Int => 'I',
            PrimitiveKind::Long => 'J',
            PrimitiveKind::Float => 'F',
            PrimitiveKind::Double => 'D',
            PrimitiveKind::Void => 'V',
        }
    }

    /// Look up a primitive by its descriptor character
    ///
    /// ## Arguments
    /// * 'descriptor' - One of `Z B C S I J F D V`
    #[must_use]
    pub fn from_descriptor(descriptor: char) -> Option<Self> {
        match descriptor {
            'Z' => Some(PrimitiveKind::Boolean),
            'B' => Some(PrimitiveKind::Byte),
            'C' => Some(PrimitiveKind::Char),
            'S' => Some(PrimitiveKind::Short),
            'I' => Some(PrimitiveKind::Int),
            'J' => Some(PrimitiveKind::Long),
            'F' => Some(PrimitiveKind::Float),
            'D' => Some(PrimitiveKind::Double),
            'V' => Some(PrimitiveKind::Void),
            _ => None,
        }
    }

    /// The source-level keyword, e.g. `int`
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Void => "void",
        }
    }

    /// Look up a primitive by its source-level keyword
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(PrimitiveKind::Boolean),
            "byte" => Some(PrimitiveKind::Byte),
            "char" => Some(PrimitiveKind::Char),
            "short" => Some(PrimitiveKind::Short),
            "int" => Some(PrimitiveKind::Int),
            "long" => Some(PrimitiveKind::Long),
            "float" => Some(PrimitiveKind::Float),
            "double" => Some(PrimitiveKind::Double),
            "void" => Some(PrimitiveKind::Void),
            _ => None,
        }
    }

    /// Dotted name of the boxing class, e.g. `java.lang.Integer`
    #[must_use]
    pub fn wrapper_class(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
            PrimitiveKind::Void => "java.lang.Void",
        }
    }

    /// Returns true for the integral and floating point kinds
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, PrimitiveKind::Boolean | PrimitiveKind::Void)
    }

    /// Row of this primitive in the primitive token table (1-based)
    #[must_use]
    pub fn row(&self) -> u32 {
        *self as u32 + 1
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
