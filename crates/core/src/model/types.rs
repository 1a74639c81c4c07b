//! The generic type model.
//!
//! `JavaType` is the tagged union over the five kinds of type a signature can
//! mention. Each variant exposes a name and an erasure through
//! [`ClassGraph::type_name`](crate::graph::ClassGraph::type_name) and
//! [`ClassGraph::erasure`](crate::graph::ClassGraph::erasure); the variant
//! payloads carry what is specific to them.

use super::ids::{ClassId, MemberId, TypeVarId};
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    Class(ClassId),
    Variable(TypeVarId),
    Wildcard(WildcardType),
    Parameterized(ParameterizedType),
    /// An array whose component is not a plain class, e.g. `T[]` or
    /// `List<String>[]`. Arrays of plain classes are `Class` slots.
    GenericArray(GenericArrayType),
}

impl JavaType {
    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            JavaType::Class(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<TypeVarId> {
        match self {
            JavaType::Variable(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_wildcard(&self) -> Option<&WildcardType> {
        match self {
            JavaType::Wildcard(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_parameterized(&self) -> Option<&ParameterizedType> {
        match self {
            JavaType::Parameterized(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_generic_array(&self) -> Option<&GenericArrayType> {
        match self {
            JavaType::GenericArray(a) => Some(a),
            _ => None,
        }
    }
}

/// `?`, `? extends X`, `? super X`.
///
/// An unbounded `?` has no upper bounds at all; `? extends Object` keeps its
/// explicit bound. Both erase to Object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardType {
    pub(crate) upper_bounds: Vec<JavaType>,
    pub(crate) lower_bounds: Vec<JavaType>,
}

impl WildcardType {
    pub fn upper_bounds(&self) -> &[JavaType] {
        &self.upper_bounds
    }

    pub fn lower_bounds(&self) -> &[JavaType] {
        &self.lower_bounds
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_bounds.is_empty() && self.lower_bounds.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterizedType {
    pub(crate) raw_type: ClassId,
    pub(crate) arguments: Vec<JavaType>,
}

impl ParameterizedType {
    pub fn raw_type(&self) -> ClassId {
        self.raw_type
    }

    pub fn actual_type_arguments(&self) -> &[JavaType] {
        &self.arguments
    }
}

/// Erases to the array class of the component's erasure, looked up once the
/// graph is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericArrayType {
    pub(crate) component: Box<JavaType>,
}

impl GenericArrayType {
    pub fn component_type(&self) -> &JavaType {
        &self.component
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeVarOwner {
    Class(ClassId),
    Method(MemberId),
    /// Referenced by name but declared outside anything the batch models,
    /// e.g. by the enclosing method of a local class.
    Unresolved,
}

/// A named generic parameter with its upper bounds.
///
/// At most one bound is a class and, if so, it is the first one; erasure is the
/// first bound's erasure or Object when unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVariable {
    pub(crate) id: TypeVarId,
    pub(crate) name: SmolStr,
    pub(crate) owner: TypeVarOwner,
    pub(crate) bounds: Vec<JavaType>,
    pub(crate) erasure: ClassId,
}

impl TypeVariable {
    pub fn id(&self) -> TypeVarId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> TypeVarOwner {
        self.owner
    }

    pub fn upper_bounds(&self) -> &[JavaType] {
        &self.bounds
    }

    pub fn bounds(&self) -> &[JavaType] {
        self.upper_bounds()
    }

    pub fn erasure(&self) -> ClassId {
        self.erasure
    }
}
