use super::annotation::JavaAnnotation;
use super::ids::{ClassId, MemberId, TypeVarId};
use super::types::JavaType;
use archscope_api::{ClassKind, Modifier, is_array, is_primitive, package_name, simple_name};
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct JavaClass {
    pub id: ClassId,
    pub name: SmolStr,
    pub kind: ClassKind,
    pub modifiers: BTreeSet<Modifier>,
    /// False for placeholders: referenced, but never declared in the batch.
    pub complete: bool,
    pub type_parameters: Vec<TypeVarId>,
    pub superclass: Option<JavaType>,
    pub interfaces: Vec<JavaType>,
    pub enclosing_class: Option<ClassId>,
    pub member_classes: Vec<ClassId>,
    pub members: Vec<MemberId>,
    pub annotations: IndexMap<SmolStr, JavaAnnotation>,
    pub source_file: Option<String>,
}

impl JavaClass {
    pub(crate) fn placeholder(id: ClassId, name: SmolStr) -> Self {
        Self {
            id,
            name,
            kind: ClassKind::Class,
            modifiers: BTreeSet::new(),
            complete: false,
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            enclosing_class: None,
            member_classes: Vec::new(),
            members: Vec::new(),
            annotations: IndexMap::new(),
            source_file: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_interface(&self) -> bool {
        self.kind.is_interface()
    }

    pub fn is_primitive(&self) -> bool {
        is_primitive(&self.name)
    }

    pub fn is_array(&self) -> bool {
        is_array(&self.name)
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn package_name(&self) -> &str {
        package_name(&self.name)
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_annotated_with(&self, annotation_type: &str) -> bool {
        self.annotations.contains_key(annotation_type)
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }
}
