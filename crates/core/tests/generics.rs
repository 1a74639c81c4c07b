mod common;

use archscope_api::{ClassKind, RawClass, RawMember, RawTypeParameter, RawTypeSignature};
use archscope_core::model::{JavaType, TypeVarOwner};
use archscope_core::{ClassImporter, ImportConfig, ImportError};
use common::{class, import, import_with, member, type_params};

fn sig_class(name: &str) -> RawTypeSignature {
    RawTypeSignature::class(name)
}

fn var(name: &str) -> RawTypeSignature {
    RawTypeSignature::variable(name)
}

#[test]
fn test_unbounded_variable_erases_to_object() {
    let graph = import(vec![
        RawClass::new("p.C").with_type_parameter(RawTypeParameter::new("T")),
    ]);

    let params = type_params(&graph, "p.C");
    assert_eq!(params.len(), 1);
    assert!(params[0].upper_bounds().is_empty());
    assert_eq!(params[0].erasure(), graph.object_class());
    assert_eq!(graph.class_name(params[0].erasure()), "java.lang.Object");
}

#[test]
fn test_single_class_bound() {
    // class C<T extends Number>
    let graph = import(vec![RawClass::new("p.C").with_type_parameter(
        RawTypeParameter::new("T").with_bound(sig_class("java.lang.Number")),
    )]);

    let c = class(&graph, "p.C");
    let number = class(&graph, "java.lang.Number").id;
    let params = type_params(&graph, "p.C");
    assert_eq!(params.len(), 1);
    let t = params[0];
    assert_eq!(t.name(), "T");
    assert_eq!(t.upper_bounds(), &[JavaType::Class(number)]);
    assert_eq!(t.erasure(), number);
    assert_eq!(t.owner(), TypeVarOwner::Class(c.id));
}

#[test]
fn test_self_referential_bound() {
    // class C<T extends Comparable<T>>
    let graph = import(vec![RawClass::new("p.C").with_type_parameter(
        RawTypeParameter::new("T").with_bound(RawTypeSignature::parameterized(
            "java.lang.Comparable",
            vec![var("T")],
        )),
    )]);

    let comparable = class(&graph, "java.lang.Comparable").id;
    let t = type_params(&graph, "p.C")[0];
    assert_eq!(t.upper_bounds().len(), 1);

    let bound = t.upper_bounds()[0]
        .as_parameterized()
        .expect("bound should be parameterized");
    assert_eq!(bound.raw_type(), comparable);
    assert_eq!(bound.actual_type_arguments(), &[JavaType::Variable(t.id())]);
    assert_eq!(graph.erasure(&t.upper_bounds()[0]), comparable);
    assert_eq!(t.erasure(), comparable);
    assert_eq!(graph.type_name(&t.upper_bounds()[0]), "java.lang.Comparable<T>");
}

#[test]
fn test_sibling_references_in_both_directions() {
    // class C<A extends B, B extends Number, D extends B>
    let graph = import(vec![
        RawClass::new("p.C")
            .with_type_parameter(RawTypeParameter::new("A").with_bound(var("B")))
            .with_type_parameter(RawTypeParameter::new("B").with_bound(sig_class("java.lang.Number")))
            .with_type_parameter(RawTypeParameter::new("D").with_bound(var("B"))),
    ]);

    let number = class(&graph, "java.lang.Number").id;
    let params = type_params(&graph, "p.C");
    let (a, b, d) = (params[0], params[1], params[2]);

    assert_eq!(a.upper_bounds(), &[JavaType::Variable(b.id())]);
    assert_eq!(d.upper_bounds(), &[JavaType::Variable(b.id())]);
    // A was completed while B still had its provisional erasure.
    assert_eq!(a.erasure(), graph.object_class());
    assert_eq!(b.erasure(), number);
    assert_eq!(d.erasure(), number);
}

#[test]
fn test_method_variable_shadows_class_variable() {
    // class C<T extends Number> { <T> T id(T t); <U extends T> void take(U u); }
    let graph = import(vec![
        RawClass::new("p.C")
            .with_type_parameter(RawTypeParameter::new("T").with_bound(sig_class("java.lang.Number")))
            .with_member({
                let mut m = RawMember::method("id", "(Ljava/lang/Object;)Ljava/lang/Object;")
                    .with_type_parameter(RawTypeParameter::new("T"));
                m.generic_parameter_types = vec![var("T")];
                m.generic_type = Some(var("T"));
                m
            })
            .with_member({
                let mut m = RawMember::method("take", "(Ljava/lang/Number;)V")
                    .with_type_parameter(RawTypeParameter::new("U").with_bound(var("T")));
                m.generic_parameter_types = vec![var("U")];
                m
            }),
    ]);

    let number = class(&graph, "java.lang.Number").id;
    let class_t = type_params(&graph, "p.C")[0];

    let id = member(&graph, "p.C", "id");
    let method_t = graph.method_type_parameters(id.id)[0];
    assert_ne!(method_t.id(), class_t.id());
    assert_eq!(method_t.owner(), TypeVarOwner::Method(id.id));
    assert_eq!(id.generic_type, Some(JavaType::Variable(method_t.id())));
    assert_eq!(id.generic_parameter_types, vec![JavaType::Variable(method_t.id())]);
    assert_eq!(method_t.erasure(), graph.object_class());

    let take = member(&graph, "p.C", "take");
    let u = graph.method_type_parameters(take.id)[0];
    assert_eq!(u.upper_bounds(), &[JavaType::Variable(class_t.id())]);
    assert_eq!(u.erasure(), number);
}

#[test]
fn test_nested_class_sees_enclosing_variables() {
    // Inner is listed first; Outer's T must still be complete when U is.
    let graph = import(vec![
        RawClass::new("p.Outer$Inner")
            .with_enclosing_class("p.Outer")
            .with_type_parameter(RawTypeParameter::new("U").with_bound(var("T"))),
        RawClass::new("p.Outer").with_type_parameter(
            RawTypeParameter::new("T").with_bound(sig_class("java.lang.CharSequence")),
        ),
    ]);

    let t = type_params(&graph, "p.Outer")[0];
    let u = type_params(&graph, "p.Outer$Inner")[0];
    assert_eq!(u.upper_bounds(), &[JavaType::Variable(t.id())]);
    assert_eq!(u.erasure(), class(&graph, "java.lang.CharSequence").id);

    let outer = class(&graph, "p.Outer");
    assert_eq!(outer.member_classes, vec![class(&graph, "p.Outer$Inner").id]);
}

#[test]
fn test_class_bound_after_first_position_is_rejected() {
    let mut importer = ClassImporter::new(ImportConfig::default());
    importer
        .add_classes(vec![
            RawClass::new("p.Face").with_kind(ClassKind::Interface),
            RawClass::new("p.Base"),
            // class C<T extends Face & Base>
            RawClass::new("p.C").with_type_parameter(
                RawTypeParameter::new("T")
                    .with_bound(sig_class("p.Face"))
                    .with_bound(sig_class("p.Base")),
            ),
        ])
        .unwrap();

    match importer.import() {
        Err(ImportError::InvalidTypeBound {
            variable,
            declared_by,
            bound,
            position,
        }) => {
            assert_eq!(variable, "T");
            assert_eq!(declared_by, "p.C");
            assert_eq!(bound, "p.Base");
            assert_eq!(position, 1);
        }
        other => panic!("expected InvalidTypeBound, got {other:?}"),
    }
}

#[test]
fn test_valid_multi_bounds_are_accepted() {
    let graph = import(vec![
        RawClass::new("p.Face").with_kind(ClassKind::Interface),
        RawClass::new("p.Base"),
        // class C<T extends Base & Face & Unknown>; Unknown is only a placeholder.
        RawClass::new("p.C").with_type_parameter(
            RawTypeParameter::new("T")
                .with_bound(sig_class("p.Base"))
                .with_bound(sig_class("p.Face"))
                .with_bound(sig_class("p.Unknown")),
        ),
    ]);

    let t = type_params(&graph, "p.C")[0];
    assert_eq!(t.upper_bounds().len(), 3);
    assert_eq!(t.erasure(), class(&graph, "p.Base").id);
    assert!(!class(&graph, "p.Unknown").is_complete());
}

#[test]
fn test_wildcard_bound_policy() {
    let field = |name: &str, generic: RawTypeSignature| {
        let mut f = RawMember::field(name, "Ljava/util/List;");
        f.generic_type = Some(generic);
        f
    };
    let list = |arg: RawTypeSignature| RawTypeSignature::parameterized("java.util.List", vec![arg]);

    let graph = import(vec![
        RawClass::new("p.Holder")
            .with_member(field("any", list(RawTypeSignature::unbounded_wildcard())))
            .with_member(field(
                "objects",
                list(RawTypeSignature::wildcard_extends(sig_class("java.lang.Object"))),
            ))
            .with_member(field(
                "sinks",
                list(RawTypeSignature::wildcard_super(sig_class("java.lang.Integer"))),
            ))
            .with_member(field(
                "numbers",
                list(RawTypeSignature::wildcard_extends(sig_class("java.lang.Number"))),
            )),
    ]);

    let object = graph.object_class();
    let arg = |name: &str| {
        let ty = member(&graph, "p.Holder", name).generic_type.clone().unwrap();
        ty.as_parameterized().unwrap().actual_type_arguments()[0].clone()
    };

    // `?` has no upper bounds at all.
    let any = arg("any");
    let wildcard = any.as_wildcard().unwrap();
    assert!(wildcard.upper_bounds().is_empty());
    assert!(wildcard.lower_bounds().is_empty());
    assert!(wildcard.is_unbounded());
    assert_eq!(graph.erasure(&any), object);
    assert_eq!(graph.type_name(&any), "?");

    // `? extends Object` keeps its explicit bound.
    let objects = arg("objects");
    assert_eq!(objects.as_wildcard().unwrap().upper_bounds(), &[JavaType::Class(object)]);
    assert_eq!(graph.erasure(&objects), object);

    let sinks = arg("sinks");
    let sinks_wildcard = sinks.as_wildcard().unwrap();
    assert!(sinks_wildcard.upper_bounds().is_empty());
    assert_eq!(sinks_wildcard.lower_bounds().len(), 1);
    assert_eq!(graph.erasure(&sinks), object);
    assert_eq!(graph.type_name(&sinks), "? super java.lang.Integer");

    let numbers = arg("numbers");
    assert_eq!(graph.erasure(&numbers), class(&graph, "java.lang.Number").id);

    let full = member(&graph, "p.Holder", "numbers").generic_type.clone().unwrap();
    assert_eq!(
        graph.type_name(&full),
        "java.util.List<? extends java.lang.Number>"
    );
}

#[test]
fn test_generic_array_erases_through_variable() {
    // <E extends Number> E[] toArray()
    let mut method = RawMember::method("toArray", "()[Ljava/lang/Number;")
        .with_type_parameter(RawTypeParameter::new("E").with_bound(sig_class("java.lang.Number")));
    method.generic_type = Some(RawTypeSignature::array(var("E")));
    let graph = import(vec![RawClass::new("p.C").with_member(method)]);

    let m = member(&graph, "p.C", "toArray");
    let e = graph.method_type_parameters(m.id)[0].id();
    let generic = m.generic_type.clone().unwrap();
    let array = generic.as_generic_array().unwrap();
    assert_eq!(array.component_type(), &JavaType::Variable(e));
    assert_eq!(graph.type_name(&generic), "E[]");

    let number_array = class(&graph, "java.lang.Number[]");
    assert!(number_array.is_array());
    assert_eq!(graph.erasure(&generic), number_array.id);
    assert_eq!(m.raw_type, number_array.id);
}

#[test]
fn test_array_of_plain_class_stays_a_class() {
    let mut field = RawMember::field("names", "[Ljava/lang/String;");
    field.generic_type = Some(RawTypeSignature::array(sig_class("java.lang.String")));
    let graph = import(vec![RawClass::new("p.C").with_member(field)]);

    let names = member(&graph, "p.C", "names");
    let strings = class(&graph, "java.lang.String[]").id;
    assert_eq!(names.generic_type, Some(JavaType::Class(strings)));
}

#[test]
fn test_generic_array_in_own_bound_erases_after_completion() {
    // class C<T extends Number & Comparable<T[]>>, with no member mentioning T[]
    let comparable = RawClass::new("java.lang.Comparable")
        .with_kind(ClassKind::Interface)
        .with_type_parameter(RawTypeParameter::new("X"));
    let c = RawClass::new("p.C").with_type_parameter(
        RawTypeParameter::new("T")
            .with_bound(sig_class("java.lang.Number"))
            .with_bound(RawTypeSignature::parameterized(
                "java.lang.Comparable",
                vec![RawTypeSignature::array(var("T"))],
            )),
    );

    for parallel in [false, true] {
        let graph = import_with(
            ImportConfig {
                parallel,
                ..ImportConfig::default()
            },
            vec![comparable.clone(), c.clone()],
        );

        let t = type_params(&graph, "p.C")[0];
        let number = class(&graph, "java.lang.Number").id;
        let number_array = class(&graph, "java.lang.Number[]").id;
        assert_eq!(t.erasure(), number);

        let arg = t.upper_bounds()[1].as_parameterized().unwrap().actual_type_arguments()[0].clone();
        assert_eq!(arg.as_generic_array().unwrap().component_type(), &JavaType::Variable(t.id()));
        assert_eq!(graph.erasure(&arg), number_array);
        assert!(graph.class_by_name("java.lang.Object[]").is_none());
        assert_eq!(graph.type_name(&t.upper_bounds()[1]), "java.lang.Comparable<T[]>");
    }
}

#[test]
fn test_wildcard_with_both_bounds_renders_both() {
    let mut field = RawMember::field("mixed", "Ljava/util/List;");
    field.generic_type = Some(RawTypeSignature::parameterized(
        "java.util.List",
        vec![RawTypeSignature::Wildcard {
            upper_bounds: vec![sig_class("java.lang.Number"), sig_class("java.io.Serializable")],
            lower_bounds: vec![sig_class("java.lang.Integer")],
        }],
    ));
    let graph = import(vec![RawClass::new("p.Holder").with_member(field)]);

    let ty = member(&graph, "p.Holder", "mixed").generic_type.clone().unwrap();
    assert_eq!(
        graph.type_name(&ty),
        "java.util.List<? extends java.lang.Number & java.io.Serializable super java.lang.Integer>"
    );
}

#[test]
fn test_undeclared_variable_becomes_unresolved() {
    // A local class referring to a type variable of its enclosing method.
    let graph = import(vec![RawClass::new("p.Outer$1Local")
        .with_type_parameter(RawTypeParameter::new("T").with_bound(var("M")))]);

    let t = type_params(&graph, "p.Outer$1Local")[0];
    let m_id = t.upper_bounds()[0].as_variable().unwrap();
    let m = graph.type_variable(m_id).unwrap();
    assert_eq!(m.name(), "M");
    assert_eq!(m.owner(), TypeVarOwner::Unresolved);
    assert_eq!(m.erasure(), graph.object_class());
    assert_eq!(t.erasure(), graph.object_class());
}

#[test]
fn test_signature_attribute_drives_generics() {
    let graph = import(vec![
        RawClass::new("p.Sorted")
            .with_superclass("java.lang.Object")
            .with_interface("java.lang.Iterable")
            .with_signature(
                "<T::Ljava/lang/Comparable<-TT;>;>Ljava/lang/Object;Ljava/lang/Iterable<TT;>;",
            ),
    ]);

    let t = type_params(&graph, "p.Sorted")[0];
    assert_eq!(t.erasure(), class(&graph, "java.lang.Comparable").id);
    assert_eq!(
        graph.type_name(&t.upper_bounds()[0]),
        "java.lang.Comparable<? super T>"
    );

    let sorted = class(&graph, "p.Sorted");
    assert_eq!(sorted.interfaces.len(), 1);
    assert_eq!(graph.type_name(&sorted.interfaces[0]), "java.lang.Iterable<T>");
    assert_eq!(
        graph.interfaces(sorted.id),
        vec![class(&graph, "java.lang.Iterable").id]
    );
}

#[test]
fn test_parallel_and_sequential_finishing_agree() {
    let batch = || {
        (0..32)
            .map(|i| {
                RawClass::new(format!("p.C{i}"))
                    .with_superclass(if i == 0 { "java.lang.Object".to_string() } else { format!("p.C{}", i - 1) })
                    .with_type_parameter(RawTypeParameter::new("T").with_bound(
                        RawTypeSignature::parameterized(format!("p.C{}", (i + 1) % 32), vec![var("T")]),
                    ))
                    .with_type_parameter(RawTypeParameter::new("U").with_bound(var("T")))
            })
            .collect::<Vec<_>>()
    };

    let parallel = import_with(ImportConfig::default(), batch());
    let sequential = import_with(ImportConfig::sequential(), batch());

    for i in 0..32 {
        let name = format!("p.C{i}");
        let render = |graph: &archscope_core::ClassGraph| {
            type_params(graph, &name)
                .iter()
                .map(|v| {
                    let bounds: Vec<String> =
                        v.upper_bounds().iter().map(|b| graph.type_name(b)).collect();
                    format!("{} -> {} / {}", v.name(), bounds.join(" & "), graph.class_name(v.erasure()))
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(render(&parallel), render(&sequential));
    }
}
