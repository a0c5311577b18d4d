//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use typescope::prelude::*;

/// The class set every integration test starts from
pub fn sample_provider() -> InMemoryProvider {
    InMemoryProvider::with_classes([
        ClassBuilder::new("java.lang.Object")
            .public()
            .default_constructor()
            .method(|m| m.name("hashCode").public().descriptor("()I"))
            .build(),
        ClassBuilder::new("java.io.Serializable")
            .public()
            .interface()
            .build(),
        ClassBuilder::new("java.lang.Number")
            .public()
            .abstract_()
            .implements("java.io.Serializable")
            .build(),
        ClassBuilder::new("java.lang.Double")
            .public()
            .final_()
            .extends("java.lang.Number")
            .build(),
        ClassBuilder::new("java.lang.Integer")
            .public()
            .final_()
            .extends("java.lang.Number")
            .build(),
        ClassBuilder::new("java.lang.String")
            .public()
            .final_()
            .implements("java.io.Serializable")
            .build(),
        ClassBuilder::new("java.lang.Iterable")
            .public()
            .interface()
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .build(),
        ClassBuilder::new("java.util.List")
            .public()
            .interface()
            .implements("java.lang.Iterable")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Iterable<TE;>;")
            .method(|m| {
                m.name("get")
                    .public()
                    .abstract_()
                    .descriptor("(I)Ljava/lang/Object;")
                    .signature("(I)TE;")
            })
            .build(),
        ClassBuilder::new("java.util.Map")
            .public()
            .interface()
            .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
            .build(),
        ClassBuilder::new("java.lang.Math")
            .public()
            .final_()
            .method(|m| m.name("abs").public().static_().descriptor("(I)I"))
            .method(|m| m.name("abs").public().static_().descriptor("(J)J"))
            .method(|m| m.name("abs").public().static_().descriptor("(F)F"))
            .method(|m| m.name("abs").public().static_().descriptor("(D)D"))
            .build(),
        ClassBuilder::new("com.example.GenericTestObject")
            .public()
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .field(|f| {
                f.name("items")
                    .public()
                    .descriptor("Ljava/util/List;")
                    .signature("Ljava/util/List<TT;>;")
            })
            .field(|f| {
                f.name("lookup")
                    .public()
                    .descriptor("Ljava/util/Map;")
                    .signature("Ljava/util/Map<Ljava/lang/String;TT;>;")
            })
            .default_constructor()
            .build(),
        ClassBuilder::new("com.example.TestObject")
            .public()
            .extends("com.example.GenericTestObject")
            .signature("Lcom/example/GenericTestObject<Ljava/lang/Double;>;")
            .default_constructor()
            .build(),
        ClassBuilder::new("com.example.MyClass")
            .public()
            .method(|m| {
                m.name("enumerate")
                    .public()
                    .static_()
                    .descriptor("([Ljava/lang/Object;)Ljava/lang/Iterable;")
                    .signature("<T:Ljava/lang/Object;>([TT;)Ljava/lang/Iterable<TT;>;")
            })
            .build(),
        ClassBuilder::new("com.example.MyClass2")
            .public()
            .method(|m| {
                m.name("enumerate")
                    .public()
                    .static_()
                    .descriptor("([Ljava/lang/Object;)Ljava/lang/Iterable;")
                    .signature("<ITEM:Ljava/lang/Object;>([TITEM;)Ljava/lang/Iterable<TITEM;>;")
            })
            .build(),
        ClassBuilder::new("com.example.Item").public().build(),
        ClassBuilder::new("com.example.MyOtherClass")
            .public()
            .method(|m| {
                m.name("getFirstOrNull")
                    .public()
                    .static_()
                    .varargs()
                    .descriptor("([Ljava/lang/Object;)Ljava/lang/Object;")
            })
            .build(),
        ClassBuilder::new("com.example.MyOtherClass2")
            .public()
            .method(|m| {
                m.name("getFirstOrNull")
                    .public()
                    .static_()
                    .varargs()
                    .descriptor("([Lcom/example/Item;)Lcom/example/Item;")
            })
            .build(),
    ])
}

/// A fresh session over [`sample_provider`]
pub fn sample_registry() -> Result<Arc<TypeRegistry>> {
    TypeRegistry::new(Arc::new(sample_provider()))
}

/// A fresh session over [`sample_provider`] with an explicit configuration
pub fn sample_registry_with(config: ResolutionConfig) -> Result<Arc<TypeRegistry>> {
    TypeRegistry::with_config(Arc::new(sample_provider()), config)
}
