use super::ids::ClassId;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use smol_str::SmolStr;

/// A resolved annotation element value. Names have been replaced by class ids.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Char(char),
    String(String),
    Class(ClassId),
    Enum { owner: ClassId, constant: SmolStr },
    Annotation(Box<JavaAnnotation>),
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AnnotationValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

/// An annotation instance on a class or member.
///
/// `explicit` holds only the elements written at the use site. The full value
/// map, with defaults from the annotation type filled in, is computed on first
/// request through [`ClassGraph::annotation_values`](crate::graph::ClassGraph::annotation_values)
/// and cached here.
#[derive(Debug, Clone)]
pub struct JavaAnnotation {
    pub type_id: ClassId,
    pub type_name: SmolStr,
    pub explicit: IndexMap<SmolStr, AnnotationValue>,
    pub(crate) values: OnceCell<IndexMap<SmolStr, AnnotationValue>>,
}

impl JavaAnnotation {
    pub(crate) fn new(
        type_id: ClassId,
        type_name: SmolStr,
        explicit: IndexMap<SmolStr, AnnotationValue>,
    ) -> Self {
        Self {
            type_id,
            type_name,
            explicit,
            values: OnceCell::new(),
        }
    }

    /// Explicit element value, without consulting defaults.
    pub fn get(&self, element: &str) -> Option<&AnnotationValue> {
        self.explicit.get(element)
    }

    pub fn is_resolved(&self) -> bool {
        self.values.get().is_some()
    }
}

impl PartialEq for JavaAnnotation {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.explicit == other.explicit
    }
}
