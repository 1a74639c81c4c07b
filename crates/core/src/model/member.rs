use super::annotation::{AnnotationValue, JavaAnnotation};
use super::ids::{AccessId, ClassId, MemberId, TypeVarId};
use super::types::JavaType;
use archscope_api::{MemberKind, Modifier};
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::collections::BTreeSet;

/// A field, method, constructor or static initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct JavaMember {
    pub id: MemberId,
    pub kind: MemberKind,
    pub name: SmolStr,
    pub descriptor: String,
    pub owner: ClassId,
    pub modifiers: BTreeSet<Modifier>,
    pub annotations: IndexMap<SmolStr, JavaAnnotation>,
    /// Smallest non-zero line seen across the member's instructions.
    pub first_line_number: Option<u32>,
    /// Field type, or return type of a code unit.
    pub raw_type: ClassId,
    pub parameters: Vec<ClassId>,
    pub throws: Vec<ClassId>,
    pub type_parameters: Vec<TypeVarId>,
    pub generic_parameter_types: Vec<JavaType>,
    pub generic_type: Option<JavaType>,
    pub annotation_default: Option<AnnotationValue>,
    pub accesses: Vec<AccessId>,
    pub instanceof_checks: Vec<InstanceofCheck>,
}

/// `instanceof` test performed by a code unit. Arrays target their array class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceofCheck {
    pub owner: MemberId,
    pub target: ClassId,
    pub line_number: u32,
}

impl JavaMember {
    pub fn is_field(&self) -> bool {
        self.kind == MemberKind::Field
    }

    pub fn is_code_unit(&self) -> bool {
        self.kind.is_code_unit()
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MemberKind::Constructor
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_annotated_with(&self, annotation_type: &str) -> bool {
        self.annotations.contains_key(annotation_type)
    }

    /// Same name and parameter types.
    pub(crate) fn matches_signature(&self, name: &str, parameters: &[ClassId]) -> bool {
        self.name == name && self.parameters == parameters
    }
}
