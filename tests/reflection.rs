//! Integration tests for type identity, generic instantiation and member lookup.
//!
//! Every test builds its own session over the shared sample classes, so cached
//! descriptors never leak between tests.

mod common;

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::Arc,
};

use common::{sample_registry, sample_registry_with};
use typescope::prelude::*;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// A field declared as `List<T>` reads as `List<Double>` through a subclass binding `T`.
#[test]
fn test_field_with_concrete_generic_type() -> Result<()> {
    let registry = sample_registry()?;
    let test_object = registry.of("com.example.TestObject")?;
    let generic = registry.of("com.example.GenericTestObject")?;
    let double = registry.of("java.lang.Double")?;
    let list = registry.of("java.util.List")?;

    let field = test_object.get_field("items")?;
    let expected = list.make_generic_type(&[double.clone()])?;
    assert_eq!(field.field_type()?, expected);
    assert!(Arc::ptr_eq(&field.field_type()?, &expected));

    // the field is declared by the instantiated base, not by TestObject itself
    let base = test_object.base_type()?.expect("TestObject has a superclass");
    assert_eq!(field.declaring_type()?, base);
    assert_eq!(base.generic_type_definition()?, generic);
    assert_eq!(base.generic_arguments()?, vec![double.clone()]);

    let lookup = test_object.get_field("lookup")?;
    assert_eq!(
        lookup.field_type()?.fullname(),
        "java.util.Map<java.lang.String, java.lang.Double>"
    );

    Ok(())
}

/// Instantiation round-trips through its definition.
#[test]
fn test_generic_definition_round_trip() -> Result<()> {
    let registry = sample_registry()?;
    let generic = registry.of("com.example.GenericTestObject")?;
    let integer = registry.of("java.lang.Integer")?;

    let instance = generic.make_generic_type(&[integer.clone()])?;
    assert!(instance.is_generic_type());
    assert!(!instance.is_generic_type_definition());
    assert_eq!(instance.generic_type_definition()?, generic);
    assert_eq!(generic.make_generic_type(&[integer])?, instance);

    let field = instance.get_field("items")?;
    assert_eq!(
        field.field_type()?.fullname(),
        "java.util.List<java.lang.Integer>"
    );

    Ok(())
}

/// `<T> enumerate(T[])` and `<ITEM> enumerate(ITEM[])` resolve to distinct parameter types.
#[test]
fn test_generic_parameter_arrays_are_distinct() -> Result<()> {
    let registry = sample_registry()?;
    let my_class = registry.of("com.example.MyClass")?;
    let my_class2 = registry.of("com.example.MyClass2")?;
    let objects = registry.object().make_array_type()?;

    let first = my_class.get_method("enumerate", &[objects.clone()])?;
    let second = my_class2.get_method("enumerate", &[objects.clone()])?;

    let p1 = first.parameter_types()?[0].clone();
    let p2 = second.parameter_types()?[0].clone();

    assert_ne!(p1, p2);
    assert_ne!(p1, objects);
    assert_ne!(p2, objects);
    assert_eq!(p2, p2.element_type()?.make_array_type()?);
    assert_eq!(p1.fullname(), "T[]");
    assert_eq!(p2.fullname(), "ITEM[]");

    let t = p1.element_type()?;
    assert!(t.is_generic_parameter());
    assert_eq!(first.generic_parameters(), &[t]);

    // each lookup got its own cache entry
    assert_eq!(registry.method_cache_len(), 2);
    assert_ne!(first, second);
    assert_ne!(hash_of(&first), hash_of(&second));

    Ok(())
}

/// Non-generic array parameters are the canonical array descriptors.
#[test]
fn test_concrete_array_parameters() -> Result<()> {
    let registry = sample_registry()?;
    let objects = registry.object().make_array_type()?;
    let items = registry.of("com.example.Item")?.make_array_type()?;

    let first = registry
        .of("com.example.MyOtherClass")?
        .get_method("getFirstOrNull", &[objects.clone()])?;
    let second = registry
        .of("com.example.MyOtherClass2")?
        .get_method("getFirstOrNull", &[items.clone()])?;

    let p1 = first.parameter_types()?[0].clone();
    let p2 = second.parameter_types()?[0].clone();

    assert!(Arc::ptr_eq(&p1, &objects));
    assert!(Arc::ptr_eq(&p2, &items));
    assert_ne!(p1, p2);
    assert_eq!(p2.element_type()?.make_array_type()?, p2);
    assert!(first.is_varargs());

    // Item[] is not an Object[] request
    assert!(matches!(
        registry
            .of("com.example.MyOtherClass2")?
            .get_method("getFirstOrNull", &[objects]),
        Err(Error::MemberNotFound { .. })
    ));

    Ok(())
}

/// `Object[]` is canonical and never equal to a `T[]` whose `T` binds to `Object`.
#[test]
fn test_object_array_identity() -> Result<()> {
    let registry = sample_registry()?;
    let object = registry.object();

    let a = object.make_array_type()?;
    let b = object.make_array_type()?;
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(hash_of(&a), hash_of(&b));

    let enumerate = registry
        .of("com.example.MyClass")?
        .get_method("enumerate", &[a.clone()])?;
    let generic_array = enumerate.parameter_types()?[0].clone();
    assert_ne!(generic_array, a);

    let bound = enumerate.make_generic_method(&[object.clone()])?;
    let bound_array = bound.parameter_types()?[0].clone();
    assert_ne!(bound_array, a);
    assert_ne!(hash_of(&bound_array), hash_of(&a));
    assert_eq!(bound_array.element_type()?, object);
    assert_eq!(bound_array.bound_parameter(), Some(generic_array.element_type()?));
    assert_eq!(bound.generic_method_definition(), Some(enumerate.clone()));

    // binding again finds the same canonical T[] over Object
    let again = enumerate.make_generic_method(&[object.clone()])?;
    assert!(Arc::ptr_eq(&again.parameter_types()?[0], &bound_array));

    // ITEM[] over Object is yet another array
    let enumerate2 = registry
        .of("com.example.MyClass2")?
        .get_method("enumerate", &[a.clone()])?;
    let bound2 = enumerate2.make_generic_method(&[object])?;
    let bound_array2 = bound2.parameter_types()?[0].clone();
    assert_ne!(bound_array2, a);
    assert_ne!(bound_array2, bound_array);

    // lookups read the bound array by its shape, and the result keeps its own Object[]
    let get_first = registry
        .of("com.example.MyOtherClass")?
        .get_method("getFirstOrNull", &[bound_array.clone()])?;
    assert!(Arc::ptr_eq(&get_first.parameter_types()?[0], &a));
    assert_eq!(
        registry
            .of("com.example.MyClass")?
            .get_method("enumerate", &[bound_array])?,
        enumerate
    );

    Ok(())
}

/// Overloads differing only in primitive width never collide.
#[test]
fn test_primitive_overloads() -> Result<()> {
    let registry = sample_registry()?;
    let math = registry.of("java.lang.Math")?;

    let overloads: Vec<MethodRc> = [
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ]
    .into_iter()
    .map(|kind| math.get_method("abs", &[registry.primitive(kind)]))
    .collect::<Result<_>>()?;

    for (i, m1) in overloads.iter().enumerate() {
        for m2 in &overloads[i + 1..] {
            assert_ne!(m1, m2);
            assert_ne!(hash_of(m1), hash_of(m2));
        }
    }

    let abs_int = &overloads[0];
    assert_eq!(abs_int.return_type()?, registry.primitive(PrimitiveKind::Int));
    assert_eq!(abs_int.to_string(), "int abs(int)");
    assert_eq!(
        math.get_method("abs", &[registry.primitive(PrimitiveKind::Int)])?,
        *abs_int
    );

    Ok(())
}

#[test]
fn test_argument_count_errors() -> Result<()> {
    let registry = sample_registry()?;
    let map = registry.of("java.util.Map")?;
    let double = registry.of("java.lang.Double")?;

    match map.make_generic_type(&[double.clone()]) {
        Err(Error::ArgumentCount {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("expected an argument count error, got {:?}", other),
    }

    assert!(matches!(
        double.make_generic_type(&[double.clone()]),
        Err(Error::NotGenericDefinition(_))
    ));
    assert!(matches!(double.element_type(), Err(Error::NotArrayType(_))));

    // nothing was published by the failed calls
    let before = registry.len();
    let _ = map.make_generic_type(&[]);
    assert_eq!(registry.len(), before);

    Ok(())
}

#[test]
fn test_member_not_found() -> Result<()> {
    let registry = sample_registry()?;
    let math = registry.of("java.lang.Math")?;

    match math.get_method("abs", &[registry.primitive(PrimitiveKind::Short)]) {
        Err(Error::MemberNotFound { type_name, member }) => {
            assert_eq!(type_name, "java.lang.Math");
            assert_eq!(member, "abs(short)");
        }
        other => panic!("expected a missing member, got {:?}", other),
    }

    assert!(matches!(
        math.get_field("PI"),
        Err(Error::MemberNotFound { .. })
    ));
    assert!(matches!(
        registry.of("com.example.Nowhere"),
        Err(Error::TypeNotFound(_))
    ));

    Ok(())
}

#[test]
fn test_invoke_is_unsupported() -> Result<()> {
    let registry = sample_registry()?;
    let math = registry.of("java.lang.Math")?;
    let abs = math.get_method("abs", &[registry.primitive(PrimitiveKind::Int)])?;

    let argument = -4i32;
    assert!(matches!(
        abs.invoke(None, &[&argument]),
        Err(Error::UnsupportedOperation(_))
    ));

    Ok(())
}

#[test]
fn test_exact_lookup_without_inference() -> Result<()> {
    let registry = sample_registry_with(ResolutionConfig::minimal())?;
    let my_class = registry.of("com.example.MyClass")?;
    let objects = registry.object().make_array_type()?;

    assert!(matches!(
        my_class.get_method("enumerate", &[objects]),
        Err(Error::MemberNotFound { .. })
    ));

    Ok(())
}

#[test]
fn test_signature_resolution() -> Result<()> {
    let registry = sample_registry()?;

    let resolved = registry.resolve_signature("Ljava/util/List<[Ljava/lang/Double;>;")?;
    assert_eq!(resolved.fullname(), "java.util.List<java.lang.Double[]>");

    let built = TypeBuilder::new(registry.clone())
        .class("java.lang.Double")?
        .array()?
        .build()?;
    assert_eq!(resolved.generic_arguments()?, vec![built]);

    Ok(())
}
