use std::sync::Arc;

use crate::metadata::{
    source::{ClassBuilder, InMemoryProvider, RawClass},
    typesystem::TypeRegistry,
};

// java.lang, java.io and java.util as far as the unit tests reach into them
fn platform_classes() -> Vec<RawClass> {
    vec![
        ClassBuilder::new("java.lang.Object")
            .public()
            .default_constructor()
            .method(|m| m.name("hashCode").public().descriptor("()I"))
            .method(|m| m.name("equals").public().descriptor("(Ljava/lang/Object;)Z"))
            .build(),
        ClassBuilder::new("java.io.Serializable")
            .public()
            .interface()
            .build(),
        ClassBuilder::new("java.lang.Cloneable")
            .public()
            .interface()
            .build(),
        ClassBuilder::new("java.lang.Comparable")
            .public()
            .interface()
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(|m| {
                m.name("compareTo")
                    .public()
                    .abstract_()
                    .descriptor("(Ljava/lang/Object;)I")
                    .signature("(TT;)I")
            })
            .build(),
        ClassBuilder::new("java.lang.Number")
            .public()
            .abstract_()
            .implements("java.io.Serializable")
            .default_constructor()
            .method(|m| m.name("doubleValue").public().abstract_().descriptor("()D"))
            .build(),
        ClassBuilder::new("java.lang.Double")
            .public()
            .final_()
            .extends("java.lang.Number")
            .implements("java.lang.Comparable")
            .signature("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Double;>;")
            .method(|m| m.name("doubleValue").public().descriptor("()D"))
            .method(|m| {
                m.name("compareTo")
                    .public()
                    .descriptor("(Ljava/lang/Double;)I")
            })
            .build(),
        ClassBuilder::new("java.lang.Integer")
            .public()
            .final_()
            .extends("java.lang.Number")
            .implements("java.lang.Comparable")
            .signature("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Integer;>;")
            .method(|m| m.name("doubleValue").public().descriptor("()D"))
            .build(),
        ClassBuilder::new("java.lang.Long")
            .public()
            .final_()
            .extends("java.lang.Number")
            .build(),
        ClassBuilder::new("java.lang.String")
            .public()
            .final_()
            .implements("java.io.Serializable")
            .implements("java.lang.Comparable")
            .signature("Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/String;>;")
            .method(|m| m.name("length").public().descriptor("()I"))
            .build(),
        ClassBuilder::new("java.lang.Iterable")
            .public()
            .interface()
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(|m| {
                m.name("iterator")
                    .public()
                    .abstract_()
                    .descriptor("()Ljava/util/Iterator;")
                    .signature("()Ljava/util/Iterator<TT;>;")
            })
            .build(),
        ClassBuilder::new("java.util.Iterator")
            .public()
            .interface()
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(|m| m.name("hasNext").public().abstract_().descriptor("()Z"))
            .method(|m| {
                m.name("next")
                    .public()
                    .abstract_()
                    .descriptor("()Ljava/lang/Object;")
                    .signature("()TE;")
            })
            .build(),
        ClassBuilder::new("java.util.List")
            .public()
            .interface()
            .implements("java.lang.Iterable")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Iterable<TE;>;")
            .method(|m| m.name("size").public().abstract_().descriptor("()I"))
            .method(|m| {
                m.name("get")
                    .public()
                    .abstract_()
                    .descriptor("(I)Ljava/lang/Object;")
                    .signature("(I)TE;")
            })
            .method(|m| {
                m.name("add")
                    .public()
                    .abstract_()
                    .descriptor("(Ljava/lang/Object;)Z")
                    .signature("(TE;)Z")
            })
            .build(),
        ClassBuilder::new("java.lang.Enum")
            .public()
            .abstract_()
            .implements("java.lang.Comparable")
            .implements("java.io.Serializable")
            .signature(
                "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;Ljava/io/Serializable;",
            )
            .method(|m| m.name("ordinal").public().final_().descriptor("()I"))
            .build(),
        ClassBuilder::new("java.lang.Math")
            .public()
            .final_()
            .method(|m| m.name("abs").public().static_().descriptor("(I)I"))
            .method(|m| m.name("abs").public().static_().descriptor("(J)J"))
            .build(),
    ]
}

// com.example, the classes the reflection scenarios are written against
fn sample_classes() -> Vec<RawClass> {
    vec![
        ClassBuilder::new("com.example.GenericTestObject")
            .public()
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .field(|f| {
                f.name("items")
                    .public()
                    .descriptor("Ljava/util/List;")
                    .signature("Ljava/util/List<TT;>;")
            })
            .method(|m| {
                m.name("sum")
                    .public()
                    .descriptor("(Ljava/util/List;)Ljava/lang/Object;")
                    .signature("(Ljava/util/List<TT;>;)TT;")
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
        ClassBuilder::new("com.example.Item")
            .public()
            .field(|f| f.name("weight").public().descriptor("D"))
            .default_constructor()
            .constructor(|c| c.public().descriptor("(Ljava/lang/Double;)V"))
            .build(),
        ClassBuilder::new("com.example.Numbers")
            .public()
            .final_()
            .method(|m| {
                m.name("max")
                    .public()
                    .static_()
                    .descriptor("(Ljava/lang/Number;Ljava/lang/Number;)Ljava/lang/Number;")
                    .signature("<T:Ljava/lang/Number;>(TT;TT;)TT;")
            })
            .build(),
        ClassBuilder::new("com.example.Overloads")
            .public()
            .method(|m| {
                m.name("pick")
                    .public()
                    .static_()
                    .descriptor("(Ljava/lang/Number;)V")
                    .signature("<T:Ljava/lang/Number;>(TT;)V")
            })
            .method(|m| {
                m.name("pick")
                    .public()
                    .static_()
                    .descriptor("([Ljava/lang/Object;)V")
                    .signature("<T:Ljava/lang/Object;>([TT;)V")
            })
            .method(|m| {
                m.name("pick")
                    .public()
                    .static_()
                    .descriptor("(Ljava/lang/Double;)V")
            })
            .method(|m| {
                m.name("both")
                    .public()
                    .static_()
                    .descriptor("(Ljava/lang/Object;)I")
                    .signature("<A:Ljava/lang/Object;>(TA;)I")
            })
            .method(|m| {
                m.name("both")
                    .public()
                    .static_()
                    .descriptor("(Ljava/lang/Object;)J")
                    .signature("<B:Ljava/lang/Object;>(TB;)J")
            })
            .build(),
        ClassBuilder::new("com.example.Shape")
            .public()
            .abstract_()
            .field(|f| f.name("name").protected().descriptor("Ljava/lang/String;"))
            .method(|m| m.name("area").public().abstract_().descriptor("()D"))
            .default_constructor()
            .build(),
        ClassBuilder::new("com.example.Circle")
            .public()
            .extends("com.example.Shape")
            .field(|f| f.name("radius").private().descriptor("D"))
            .method(|m| m.name("area").public().descriptor("()D"))
            .method(|m| m.name("radius").public().descriptor("()D"))
            .build(),
        ClassBuilder::new("com.example.Broken")
            .public()
            .field(|f| f.name("missing").public().descriptor("Lcom/example/Missing;"))
            .build(),
    ]
}

// Helper function to create the provider behind `fixture_registry`
pub(crate) fn fixture_provider() -> InMemoryProvider {
    InMemoryProvider::with_classes(platform_classes().into_iter().chain(sample_classes()))
}

// Helper function to create a fresh session over the fixture classes
pub(crate) fn fixture_registry() -> Arc<TypeRegistry> {
    TypeRegistry::new(Arc::new(fixture_provider())).unwrap()
}
