use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    metadata::{
        signatures::parse_field_signature,
        source::{MemberModifiers, RawField},
        token::{Token, TokenTable},
        typesystem::{
            GenericBinder, TypeBindings, TypeRc, TypeRef, TypeRegistry, TypeResolver,
            TypeSignatureHash,
        },
    },
    Result,
};

/// A field of a class, or of a generic instance with its type substituted
pub struct FieldInfo {
    /// Token
    pub token: Token,
    /// Field name
    pub name: String,
    /// Access and property flags
    pub modifiers: MemberModifiers,
    /// Erased descriptor as declared, e.g. `Ljava/util/List;`
    pub descriptor: String,
    /// Generic signature as declared, e.g. `Ljava/util/List<TT;>;`
    pub signature: Option<String>,
    declaring: TypeRef,
    field_type: TypeRef,
}

impl FieldInfo {
    pub(crate) fn from_raw(
        registry: &TypeRegistry,
        declaring: &TypeRc,
        raw: &RawField,
        resolver: &TypeResolver,
    ) -> Result<Self> {
        let signature = parse_field_signature(raw.effective_signature())?;
        let field_type = resolver.resolve(&signature)?;

        Ok(FieldInfo {
            token: registry.next_token(TokenTable::Field),
            name: raw.name.clone(),
            modifiers: raw.modifiers,
            descriptor: raw.descriptor.clone(),
            signature: raw.signature.clone(),
            declaring: TypeRef::new(declaring),
            field_type: TypeRef::new(&field_type),
        })
    }

    /// The same field seen through a generic instance
    pub(crate) fn substitute(
        &self,
        registry: &TypeRegistry,
        declaring: &TypeRc,
        binder: &GenericBinder,
        bindings: &TypeBindings,
    ) -> Result<Self> {
        let field_type = binder.substitute(&self.field_type()?, bindings)?;

        Ok(FieldInfo {
            token: registry.next_token(TokenTable::Field),
            name: self.name.clone(),
            modifiers: self.modifiers,
            descriptor: self.descriptor.clone(),
            signature: self.signature.clone(),
            declaring: TypeRef::new(declaring),
            field_type: TypeRef::new(&field_type),
        })
    }

    /// The type declaring this field
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if the registry is gone.
    pub fn declaring_type(&self) -> Result<TypeRc> {
        self.declaring.resolve()
    }

    /// The type of this field, substituted when reached through a generic instance
    ///
    /// # Errors
    /// Returns [`crate::Error::RegistryReleased`] if the registry is gone.
    pub fn field_type(&self) -> Result<TypeRc> {
        self.field_type.resolve()
    }

    /// Returns true for static fields
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    fn signature_hash(&self) -> u64 {
        TypeSignatureHash::new()
            .add_token(&self.declaring.token())
            .add_name(&self.name)
            .add_token(&self.field_type.token())
            .finalize()
    }
}

impl PartialEq for FieldInfo {
    fn eq(&self, other: &Self) -> bool {
        self.declaring == other.declaring
            && self.name == other.name
            && self.field_type == other.field_type
    }
}

impl Eq for FieldInfo {}

impl Hash for FieldInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.signature_hash());
    }
}

impl fmt::Display for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field_type.upgrade() {
            Some(field_type) => write!(f, "{} {}", field_type, self.name),
            None => write!(f, "{} {}", self.field_type.token(), self.name),
        }
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("token", &self.token)
            .field("declaring", &self.declaring.token())
            .field("name", &self.name)
            .field("field_type", &self.field_type.token())
            .finish()
    }
}
