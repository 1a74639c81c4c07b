use archscope_api::RawClass;
use archscope_core::model::{JavaClass, JavaMember, TypeVariable};
use archscope_core::{ClassGraph, ClassImporter, ImportConfig};
use std::sync::Once;

static INIT: Once = Once::new();

/// Routes `tracing` output through the test harness. `RUST_LOG` applies.
#[allow(dead_code)]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[allow(dead_code)]
pub fn import(classes: Vec<RawClass>) -> ClassGraph {
    import_with(ImportConfig::default(), classes)
}

#[allow(dead_code)]
pub fn import_with(config: ImportConfig, classes: Vec<RawClass>) -> ClassGraph {
    init_test_logging();
    let mut importer = ClassImporter::new(config);
    importer.add_classes(classes).expect("intake failed");
    importer.import().expect("import failed")
}

#[allow(dead_code)]
pub fn class<'a>(graph: &'a ClassGraph, name: &str) -> &'a JavaClass {
    match graph.class_by_name(name) {
        Some(class) => class,
        None => {
            println!("Available classes:");
            for c in graph.classes() {
                println!(" - {} (complete: {})", c.name, c.complete);
            }
            panic!("Class not found: {}", name);
        }
    }
}

/// The only member of `class_name` called `member_name`.
#[allow(dead_code)]
pub fn member<'a>(graph: &'a ClassGraph, class_name: &str, member_name: &str) -> &'a JavaMember {
    let owner = class(graph, class_name);
    let found = graph.members_named(owner.id, member_name);
    assert_eq!(
        found.len(),
        1,
        "expected exactly one {}.{}, found {}",
        class_name,
        member_name,
        found.len()
    );
    found[0]
}

#[allow(dead_code)]
pub fn type_params<'a>(graph: &'a ClassGraph, class_name: &str) -> Vec<&'a TypeVariable> {
    graph.type_parameters_of(class(graph, class_name).id)
}

#[allow(dead_code)]
pub fn class_name_of(graph: &ClassGraph, id: archscope_core::model::ClassId) -> String {
    graph.class_name(id).to_string()
}
