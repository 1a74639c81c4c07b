//! Java naming rules used when turning descriptor text into registry keys.

pub const OBJECT_CLASS_NAME: &str = "java.lang.Object";
pub const CONSTRUCTOR_NAME: &str = "<init>";
pub const STATIC_INITIALIZER_NAME: &str = "<clinit>";
pub const VOID_NAME: &str = "void";

const PRIMITIVES: [&str; 9] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// `java/util/Map$Entry` -> `java.util.Map$Entry`
pub fn fqn_from_internal(internal: &str) -> String {
    internal.replace('/', ".")
}

/// Simple name after the last package or nesting separator.
pub fn simple_name(fqn: &str) -> &str {
    let start = fqn.rfind(['.', '$']).map(|i| i + 1).unwrap_or(0);
    &fqn[start..]
}

/// Package part of a fully qualified name, empty for the default package.
pub fn package_name(fqn: &str) -> &str {
    let base = fqn.trim_end_matches("[]");
    match base.rfind('.') {
        Some(idx) => &base[..idx],
        None => "",
    }
}

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

pub fn is_array(name: &str) -> bool {
    name.ends_with("[]")
}

/// Name of the one-dimensional array class whose component is `component`.
pub fn array_name(component: &str) -> String {
    format!("{component}[]")
}
