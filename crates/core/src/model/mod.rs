pub mod access;
pub mod annotation;
pub mod class;
pub mod ids;
pub mod member;
pub mod types;

pub use access::{AccessTarget, JavaAccess};
pub use annotation::{AnnotationValue, JavaAnnotation};
pub use class::JavaClass;
pub use ids::{AccessId, ClassId, MemberId, TypeVarId};
pub use member::{InstanceofCheck, JavaMember};
pub use types::{
    GenericArrayType, JavaType, ParameterizedType, TypeVarOwner, TypeVariable, WildcardType,
};
