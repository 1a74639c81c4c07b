use crate::descriptor::normalize_class_name;
use crate::model::{AnnotationValue, JavaAnnotation};
use crate::registry::ClassRegistry;
use archscope_api::{RawAnnotation, RawAnnotationValue};
use indexmap::IndexMap;
use smol_str::SmolStr;

#[derive(Debug, PartialEq)]
pub struct AnnotationBuilder {
    type_name: String,
    values: IndexMap<String, RawAnnotationValue>,
}

impl From<RawAnnotation> for AnnotationBuilder {
    fn from(raw: RawAnnotation) -> Self {
        Self {
            type_name: normalize_class_name(&raw.type_name),
            values: raw
                .values
                .into_iter()
                .map(|(key, value)| (key, normalize_value(value)))
                .collect(),
        }
    }
}

impl AnnotationBuilder {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn register_names(&self, registry: &ClassRegistry) {
        registry.get(&self.type_name);
        for value in self.values.values() {
            register_value_names(value, registry);
        }
    }

    pub(crate) fn finish(self, registry: &ClassRegistry) -> JavaAnnotation {
        let type_id = registry.get(&self.type_name);
        let explicit = self
            .values
            .into_iter()
            .map(|(key, value)| (SmolStr::new(key), finish_value(value, registry)))
            .collect();
        JavaAnnotation::new(type_id, SmolStr::new(self.type_name), explicit)
    }
}

/// Annotations keyed by type name. A repeated type keeps its first instance.
pub(crate) fn finish_annotations(
    builders: Vec<AnnotationBuilder>,
    registry: &ClassRegistry,
) -> IndexMap<SmolStr, JavaAnnotation> {
    let mut annotations = IndexMap::with_capacity(builders.len());
    for builder in builders {
        let annotation = builder.finish(registry);
        annotations
            .entry(annotation.type_name.clone())
            .or_insert(annotation);
    }
    annotations
}

/// Rewrites every class name inside `value` into registry form.
pub(crate) fn normalize_value(value: RawAnnotationValue) -> RawAnnotationValue {
    match value {
        RawAnnotationValue::Class(name) => RawAnnotationValue::Class(normalize_class_name(&name)),
        RawAnnotationValue::Enum { owner, constant } => RawAnnotationValue::Enum {
            owner: normalize_class_name(&owner),
            constant,
        },
        RawAnnotationValue::Annotation(nested) => {
            let nested = AnnotationBuilder::from(nested);
            RawAnnotationValue::Annotation(RawAnnotation {
                type_name: nested.type_name,
                values: nested.values,
            })
        }
        RawAnnotationValue::Array(items) => {
            RawAnnotationValue::Array(items.into_iter().map(normalize_value).collect())
        }
        other => other,
    }
}

pub(crate) fn register_value_names(value: &RawAnnotationValue, registry: &ClassRegistry) {
    match value {
        RawAnnotationValue::Class(name) => {
            registry.get(name);
        }
        RawAnnotationValue::Enum { owner, .. } => {
            registry.get(owner);
        }
        RawAnnotationValue::Annotation(nested) => {
            registry.get(&nested.type_name);
            for v in nested.values.values() {
                register_value_names(v, registry);
            }
        }
        RawAnnotationValue::Array(items) => {
            for v in items {
                register_value_names(v, registry);
            }
        }
        _ => {}
    }
}

pub(crate) fn finish_value(value: RawAnnotationValue, registry: &ClassRegistry) -> AnnotationValue {
    match value {
        RawAnnotationValue::Boolean(b) => AnnotationValue::Boolean(b),
        RawAnnotationValue::Integer(i) => AnnotationValue::Integer(i),
        RawAnnotationValue::Float(f) => AnnotationValue::Float(f),
        RawAnnotationValue::Char(c) => AnnotationValue::Char(c),
        RawAnnotationValue::String(s) => AnnotationValue::String(s),
        RawAnnotationValue::Class(name) => AnnotationValue::Class(registry.get(&name)),
        RawAnnotationValue::Enum { owner, constant } => AnnotationValue::Enum {
            owner: registry.get(&owner),
            constant: SmolStr::new(constant),
        },
        RawAnnotationValue::Annotation(nested) => AnnotationValue::Annotation(Box::new(
            AnnotationBuilder::from(nested).finish(registry),
        )),
        RawAnnotationValue::Array(items) => AnnotationValue::Array(
            items
                .into_iter()
                .map(|v| finish_value(v, registry))
                .collect(),
        ),
    }
}
