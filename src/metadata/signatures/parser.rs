use crate::{
    metadata::{
        signatures::{
            SignatureClass, SignatureClassDecl, SignatureMethod, SignatureTypeParameter,
            TypeArgument, TypeSignature,
        },
        typesystem::PrimitiveKind,
    },
    Error::RecursionLimit,
    Result,
};

/// Maximum recursion depth for signature parsing
const MAX_RECURSION_DEPTH: usize = 50;

/// Signature parser for JVM descriptors and generic signatures
///
/// Plain descriptors are a subset of the generic signature grammar, so the same parser
/// handles `(I)J` as well as `<T:Ljava/lang/Object;>([TT;)Ljava/lang/Iterable<TT;>;`.
/// Class names are returned in dotted form.
///
/// # Example
///
/// ```rust
/// use typescope::metadata::signatures::{SignatureParser, TypeSignature};
///
/// let mut parser = SignatureParser::new("([Ljava/lang/Object;)Ljava/lang/Object;");
/// let sig = parser.parse_method_signature()?;
/// assert_eq!(sig.params.len(), 1);
/// assert_eq!(sig.return_type, TypeSignature::class("java.lang.Object"));
/// # Ok::<(), typescope::Error>(())
/// ```
///
/// ## Notes:
/// - Make sure to not re-use your parser instance for multiple signatures, the free functions
///   in the signature module create one per call.
pub struct SignatureParser<'a> {
    input: &'a str,
    position: usize,
    depth: usize,
}

impl<'a> SignatureParser<'a> {
    /// Create a new `SignatureParser` over a signature string
    ///
    /// ## Arguments
    /// * 'input' - The descriptor or signature to read from
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        SignatureParser {
            input,
            position: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn advance(&mut self) -> Result<u8> {
        match self.peek() {
            Some(byte) => {
                self.position += 1;
                Ok(byte)
            }
            None => Err(malformed_error!(
                "Unexpected end of signature '{}'",
                self.input
            )),
        }
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        let found = self.advance()?;
        if found != expected {
            return Err(malformed_error!(
                "Expected '{}' at offset {} in signature '{}', found '{}'",
                expected as char,
                self.position - 1,
                self.input,
                found as char
            ));
        }
        Ok(())
    }

    fn ensure_consumed(&self) -> Result<()> {
        if self.position != self.input.len() {
            return Err(malformed_error!(
                "Trailing data at offset {} in signature '{}'",
                self.position,
                self.input
            ));
        }
        Ok(())
    }

    /// Reads an identifier up to (not including) the first delimiter
    fn read_identifier(&mut self) -> Result<&'a str> {
        let start = self.position;
        while let Some(byte) = self.peek() {
            if matches!(byte, b';' | b'<' | b'>' | b'.' | b':' | b'[' | b'/') {
                break;
            }
            self.position += 1;
        }

        if start == self.position {
            return Err(malformed_error!(
                "Empty identifier at offset {} in signature '{}'",
                start,
                self.input
            ));
        }
        Ok(&self.input[start..self.position])
    }

    /// Reads a slash separated binary name and returns it in dotted form
    fn read_binary_name(&mut self) -> Result<String> {
        let mut name = self.read_identifier()?.to_string();
        while self.peek() == Some(b'/') {
            self.position += 1;
            name.push('.');
            name.push_str(self.read_identifier()?);
        }
        Ok(name)
    }

    fn parse_type_inner(&mut self, allow_void: bool) -> Result<TypeSignature> {
        self.depth += 1;
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }

        let current = self.advance()?;
        let result = match current {
            b'L' => self.parse_class_type().map(TypeSignature::Class),
            b'[' => self
                .parse_type_inner(false)
                .map(|element| TypeSignature::Array(Box::new(element))),
            b'T' => {
                let name = self.read_identifier()?.to_string();
                self.expect(b';')?;
                Ok(TypeSignature::TypeVariable(name))
            }
            b'V' if !allow_void => Err(malformed_error!(
                "'void' is only valid as a return type in signature '{}'",
                self.input
            )),
            other => match PrimitiveKind::from_descriptor(other as char) {
                Some(kind) => Ok(TypeSignature::Primitive(kind)),
                None => Err(malformed_error!(
                    "Invalid type tag '{}' at offset {} in signature '{}'",
                    other as char,
                    self.position - 1,
                    self.input
                )),
            },
        };

        self.depth -= 1;
        result
    }

    /// Parse a single field type (`V` is rejected)
    pub fn parse_type(&mut self) -> Result<TypeSignature> {
        self.parse_type_inner(false)
    }

    /// Parses the remainder of `Lpkg/Name<args>.Inner<args>;` after the `L`
    fn parse_class_type(&mut self) -> Result<SignatureClass> {
        let mut name = self.read_binary_name()?;
        let mut args = self.parse_type_arguments()?;

        while self.peek() == Some(b'.') {
            self.position += 1;
            name.push('$');
            name.push_str(self.read_identifier()?);
            args.extend(self.parse_type_arguments()?);
        }

        self.expect(b';')?;
        Ok(SignatureClass { name, args })
    }

    fn parse_type_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        let mut args = Vec::new();
        if self.peek() != Some(b'<') {
            return Ok(args);
        }

        self.position += 1;
        while self.peek() != Some(b'>') {
            let arg = match self.peek() {
                Some(b'*') => {
                    self.position += 1;
                    TypeArgument::Unbounded
                }
                Some(b'+') => {
                    self.position += 1;
                    TypeArgument::Extends(self.parse_type()?)
                }
                Some(b'-') => {
                    self.position += 1;
                    TypeArgument::Super(self.parse_type()?)
                }
                _ => TypeArgument::Exact(self.parse_type()?),
            };
            args.push(arg);
        }
        self.expect(b'>')?;

        if args.is_empty() {
            return Err(malformed_error!(
                "Empty type argument list in signature '{}'",
                self.input
            ));
        }
        Ok(args)
    }

    fn parse_type_parameters(&mut self) -> Result<Vec<SignatureTypeParameter>> {
        let mut params = Vec::new();
        if self.peek() != Some(b'<') {
            return Ok(params);
        }

        self.position += 1;
        while self.peek() != Some(b'>') {
            let name = self.read_identifier()?.to_string();
            self.expect(b':')?;

            let class_bound = match self.peek() {
                Some(b'L' | b'[' | b'T') => Some(self.parse_type()?),
                _ => None,
            };

            let mut interface_bounds = Vec::new();
            while self.peek() == Some(b':') {
                self.position += 1;
                interface_bounds.push(self.parse_type()?);
            }

            params.push(SignatureTypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
        }
        self.expect(b'>')?;
        Ok(params)
    }

    /// Parse a field descriptor or field generic signature
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the input is not a single valid field type.
    pub fn parse_field_signature(&mut self) -> Result<TypeSignature> {
        let sig = self.parse_type()?;
        self.ensure_consumed()?;
        Ok(sig)
    }

    /// Parse a method descriptor or method generic signature
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on grammar violations.
    pub fn parse_method_signature(&mut self) -> Result<SignatureMethod> {
        let type_params = self.parse_type_parameters()?;

        self.expect(b'(')?;
        let mut params = Vec::new();
        while self.peek() != Some(b')') {
            params.push(self.parse_type()?);
        }
        self.expect(b')')?;

        let return_type = self.parse_type_inner(true)?;

        let mut throws = Vec::new();
        while self.peek() == Some(b'^') {
            self.position += 1;
            throws.push(self.parse_type()?);
        }

        self.ensure_consumed()?;
        Ok(SignatureMethod {
            type_params,
            params,
            return_type,
            throws,
        })
    }

    /// Parse a class generic signature
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on grammar violations.
    pub fn parse_class_signature(&mut self) -> Result<SignatureClassDecl> {
        let type_params = self.parse_type_parameters()?;
        let superclass = self.parse_type()?;

        let mut interfaces = Vec::new();
        while self.peek().is_some() {
            interfaces.push(self.parse_type()?);
        }

        Ok(SignatureClassDecl {
            type_params,
            superclass,
            interfaces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_parse_primitive_types() {
        let cases = [
            ("Z", PrimitiveKind::Boolean),
            ("B", PrimitiveKind::Byte),
            ("C", PrimitiveKind::Char),
            ("S", PrimitiveKind::Short),
            ("I", PrimitiveKind::Int),
            ("J", PrimitiveKind::Long),
            ("F", PrimitiveKind::Float),
            ("D", PrimitiveKind::Double),
        ];

        for (input, kind) in cases {
            let mut parser = SignatureParser::new(input);
            assert_eq!(
                parser.parse_field_signature().unwrap(),
                TypeSignature::Primitive(kind)
            );
        }
    }

    #[test]
    fn test_parse_class_and_arrays() {
        let mut parser = SignatureParser::new("[[Ljava/lang/String;");
        let sig = parser.parse_field_signature().unwrap();
        assert_eq!(
            sig,
            TypeSignature::Array(Box::new(TypeSignature::Array(Box::new(
                TypeSignature::class("java.lang.String")
            ))))
        );
        assert_eq!(sig.to_string(), "java.lang.String[][]");
    }

    #[test]
    fn test_parse_generic_instance() {
        let mut parser =
            SignatureParser::new("Ljava/util/Map<Ljava/lang/String;+Ljava/lang/Number;>;");
        let sig = parser.parse_field_signature().unwrap();

        match &sig {
            TypeSignature::Class(class) => {
                assert_eq!(class.name, "java.util.Map");
                assert_eq!(class.args.len(), 2);
                assert_eq!(
                    class.args[0],
                    TypeArgument::Exact(TypeSignature::class("java.lang.String"))
                );
                assert_eq!(
                    class.args[1],
                    TypeArgument::Extends(TypeSignature::class("java.lang.Number"))
                );
            }
            _ => panic!("Expected class signature"),
        }
        assert_eq!(
            sig.to_string(),
            "java.util.Map<java.lang.String, ? extends java.lang.Number>"
        );
    }

    #[test]
    fn test_parse_wildcards_and_variables() {
        let mut parser = SignatureParser::new("Ljava/util/List<*>;");
        let sig = parser.parse_field_signature().unwrap();
        assert_eq!(sig.to_string(), "java.util.List<?>");
        assert!(!sig.has_type_variables());

        let mut parser = SignatureParser::new("Ljava/util/List<-TT;>;");
        let sig = parser.parse_field_signature().unwrap();
        assert_eq!(sig.to_string(), "java.util.List<? super T>");
        assert!(sig.has_type_variables());
    }

    #[test]
    fn test_parse_inner_class() {
        let mut parser = SignatureParser::new("Lcom/example/Outer<TK;>.Inner<TV;>;");
        let sig = parser.parse_field_signature().unwrap();

        match sig {
            TypeSignature::Class(class) => {
                assert_eq!(class.name, "com.example.Outer$Inner");
                assert_eq!(
                    class.args,
                    vec![
                        TypeArgument::Exact(TypeSignature::TypeVariable("K".to_string())),
                        TypeArgument::Exact(TypeSignature::TypeVariable("V".to_string())),
                    ]
                );
            }
            _ => panic!("Expected class signature"),
        }
    }

    #[test]
    fn test_parse_method_signature() {
        let mut parser = SignatureParser::new(
            "<T:Ljava/lang/Object;>([TT;)Ljava/lang/Iterable<TT;>;^Ljava/io/IOException;",
        );
        let sig = parser.parse_method_signature().unwrap();

        assert_eq!(sig.type_params.len(), 1);
        assert_eq!(sig.type_params[0].name, "T");
        assert_eq!(
            sig.type_params[0].class_bound,
            Some(TypeSignature::class("java.lang.Object"))
        );
        assert_eq!(
            sig.params,
            vec![TypeSignature::Array(Box::new(TypeSignature::TypeVariable(
                "T".to_string()
            )))]
        );
        assert_eq!(sig.return_type.to_string(), "java.lang.Iterable<T>");
        assert_eq!(sig.throws, vec![TypeSignature::class("java.io.IOException")]);
    }

    #[test]
    fn test_parse_plain_descriptor() {
        let mut parser = SignatureParser::new("(IJ[D)V");
        let sig = parser.parse_method_signature().unwrap();
        assert!(sig.type_params.is_empty());
        assert_eq!(sig.params.len(), 3);
        assert_eq!(sig.return_type, TypeSignature::Primitive(PrimitiveKind::Void));
    }

    #[test]
    fn test_parse_interface_only_bound() {
        let mut parser = SignatureParser::new(
            "<E:Ljava/lang/Enum<TE;>;K::Ljava/lang/Comparable<TK;>;>Ljava/lang/Object;Ljava/io/Serializable;",
        );
        let sig = parser.parse_class_signature().unwrap();

        assert_eq!(sig.type_params.len(), 2);
        assert_eq!(sig.type_params[0].bounds().len(), 1);
        assert!(sig.type_params[1].class_bound.is_none());
        assert_eq!(sig.type_params[1].interface_bounds.len(), 1);
        assert_eq!(sig.superclass, TypeSignature::class("java.lang.Object"));
        assert_eq!(
            sig.interfaces,
            vec![TypeSignature::class("java.io.Serializable")]
        );
    }

    #[test]
    fn test_error_handling() {
        let invalid = ["", "Q", "Ljava/lang/Object", "V", "II", "Ljava/util/List<>;", "[", "T;"];
        for input in invalid {
            let mut parser = SignatureParser::new(input);
            assert!(
                matches!(parser.parse_field_signature(), Err(Error::Malformed { .. })),
                "expected failure for '{}'",
                input
            );
        }

        let mut parser = SignatureParser::new("(I");
        assert!(matches!(
            parser.parse_method_signature(),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_recursion_limit() {
        let deep = format!("{}I", "[".repeat(MAX_RECURSION_DEPTH + 1));
        let mut parser = SignatureParser::new(&deep);
        assert!(matches!(
            parser.parse_field_signature(),
            Err(Error::RecursionLimit(MAX_RECURSION_DEPTH))
        ));
    }
}
