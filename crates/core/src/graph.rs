//! Arc-wrapped immutable class graph.
//!
//! A `ClassGraph` is only ever produced by a successful import, so every
//! entity reachable from it is finished. Cloning is a reference-count bump.
//! The only interior state is compute-once caches: access target bindings,
//! annotation values with defaults, and the dependency graph.

use crate::dependency::ClassDependencyGraph;
use crate::model::{
    AccessId, AnnotationValue, ClassId, InstanceofCheck, JavaAccess, JavaAnnotation, JavaClass,
    JavaMember, JavaType, MemberId, TypeVarId, TypeVariable,
};
use crate::resolver::TargetResolver;
use archscope_api::{MemberKind, array_name};
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::OnceCell;
use smol_str::SmolStr;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct ClassGraph {
    inner: Arc<ClassGraphInner>,
}

pub(crate) struct ClassGraphInner {
    pub classes: Vec<JavaClass>,
    pub members: Vec<JavaMember>,
    pub type_variables: Vec<TypeVariable>,
    pub accesses: Vec<JavaAccess>,
    pub name_index: HashMap<SmolStr, ClassId>,
    pub object: ClassId,
    pub resolver: Arc<dyn TargetResolver>,
    pub dependencies: OnceCell<ClassDependencyGraph>,
}

impl fmt::Debug for ClassGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassGraph")
            .field("classes", &self.inner.classes.len())
            .field("members", &self.inner.members.len())
            .field("type_variables", &self.inner.type_variables.len())
            .field("accesses", &self.inner.accesses.len())
            .finish()
    }
}

impl ClassGraph {
    pub(crate) fn from_inner(inner: ClassGraphInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    // ---- Classes ----

    pub fn class(&self, id: ClassId) -> Option<&JavaClass> {
        self.inner.classes.get(id.index())
    }

    pub fn class_by_name(&self, name: &str) -> Option<&JavaClass> {
        let id = self.inner.name_index.get(name)?;
        self.class(*id)
    }

    /// Every class slot, placeholders included, in id order.
    pub fn classes(&self) -> impl Iterator<Item = &JavaClass> {
        self.inner.classes.iter()
    }

    /// Classes whose descriptor was part of the batch.
    pub fn declared_classes(&self) -> impl Iterator<Item = &JavaClass> {
        self.classes().filter(|c| c.complete)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &JavaClass> {
        self.classes().filter(|c| !c.complete)
    }

    pub fn class_count(&self) -> usize {
        self.inner.classes.len()
    }

    pub fn class_name(&self, id: ClassId) -> &str {
        self.class(id).map(|c| c.name.as_str()).unwrap_or("?")
    }

    pub fn object_class(&self) -> ClassId {
        self.inner.object
    }

    /// Erased direct superclass.
    pub fn superclass(&self, id: ClassId) -> Option<ClassId> {
        let class = self.class(id)?;
        class.superclass.as_ref().map(|t| self.erasure(t))
    }

    /// Erased direct interfaces, in declaration order.
    pub fn interfaces(&self, id: ClassId) -> Vec<ClassId> {
        self.class(id)
            .map(|c| c.interfaces.iter().map(|t| self.erasure(t)).collect())
            .unwrap_or_default()
    }

    // ---- Members ----

    pub fn member(&self, id: MemberId) -> Option<&JavaMember> {
        self.inner.members.get(id.index())
    }

    pub fn members(&self) -> impl Iterator<Item = &JavaMember> {
        self.inner.members.iter()
    }

    pub fn members_of(&self, class: ClassId) -> impl Iterator<Item = &JavaMember> {
        self.class(class)
            .map(|c| c.members.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |id| self.member(*id))
    }

    /// Members of `class` with the given simple name, overloads included.
    pub fn members_named(&self, class: ClassId, name: &str) -> Vec<&JavaMember> {
        self.members_of(class).filter(|m| m.name == name).collect()
    }

    /// `p.A.call(p.B)` for code units, `p.A.field` for fields.
    pub fn member_full_name(&self, id: MemberId) -> String {
        let Some(member) = self.member(id) else {
            return String::from("?");
        };
        let owner = self.class_name(member.owner);
        if member.kind == MemberKind::Field {
            return format!("{owner}.{}", member.name);
        }
        let params: Vec<&str> = member.parameters.iter().map(|p| self.class_name(*p)).collect();
        format!("{owner}.{}({})", member.name, params.join(", "))
    }

    // ---- Generic types ----

    pub fn type_variable(&self, id: TypeVarId) -> Option<&TypeVariable> {
        self.inner.type_variables.get(id.index())
    }

    pub fn type_parameters_of(&self, class: ClassId) -> Vec<&TypeVariable> {
        self.class(class)
            .map(|c| {
                c.type_parameters
                    .iter()
                    .filter_map(|id| self.type_variable(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn method_type_parameters(&self, member: MemberId) -> Vec<&TypeVariable> {
        self.member(member)
            .map(|m| {
                m.type_parameters
                    .iter()
                    .filter_map(|id| self.type_variable(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The class that remains after dropping generic information. Never fails:
    /// anything unknown erases to Object.
    pub fn erasure(&self, ty: &JavaType) -> ClassId {
        match ty {
            JavaType::Class(id) => *id,
            JavaType::Variable(id) => self
                .type_variable(*id)
                .map(|v| v.erasure)
                .unwrap_or(self.inner.object),
            JavaType::Wildcard(w) => w
                .upper_bounds()
                .first()
                .map(|b| self.erasure(b))
                .unwrap_or(self.inner.object),
            JavaType::Parameterized(p) => p.raw_type(),
            JavaType::GenericArray(a) => {
                let component = self.class_name(self.erasure(a.component_type()));
                self.inner
                    .name_index
                    .get(array_name(component).as_str())
                    .copied()
                    .unwrap_or(self.inner.object)
            }
        }
    }

    /// Java-style rendering: `java.util.Map<K, ? extends java.lang.Number>`.
    pub fn type_name(&self, ty: &JavaType) -> String {
        match ty {
            JavaType::Class(id) => self.class_name(*id).to_string(),
            JavaType::Variable(id) => self
                .type_variable(*id)
                .map(|v| v.name().to_string())
                .unwrap_or_else(|| "?".to_string()),
            JavaType::Wildcard(w) => {
                let mut rendered = "?".to_string();
                if !w.upper_bounds().is_empty() {
                    let upper: Vec<String> =
                        w.upper_bounds().iter().map(|b| self.type_name(b)).collect();
                    rendered.push_str(" extends ");
                    rendered.push_str(&upper.join(" & "));
                }
                if !w.lower_bounds().is_empty() {
                    let lower: Vec<String> =
                        w.lower_bounds().iter().map(|b| self.type_name(b)).collect();
                    rendered.push_str(" super ");
                    rendered.push_str(&lower.join(" & "));
                }
                rendered
            }
            JavaType::Parameterized(p) => {
                let args: Vec<String> = p
                    .actual_type_arguments()
                    .iter()
                    .map(|a| self.type_name(a))
                    .collect();
                format!("{}<{}>", self.class_name(p.raw_type()), args.join(", "))
            }
            JavaType::GenericArray(a) => format!("{}[]", self.type_name(a.component_type())),
        }
    }

    // ---- Accesses ----

    pub fn access(&self, id: AccessId) -> Option<&JavaAccess> {
        self.inner.accesses.get(id.index())
    }

    pub fn accesses(&self) -> impl Iterator<Item = &JavaAccess> {
        self.inner.accesses.iter()
    }

    pub fn accesses_from(&self, member: MemberId) -> impl Iterator<Item = &JavaAccess> {
        self.member(member)
            .map(|m| m.accesses.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |id| self.access(*id))
    }

    /// Accesses whose resolved target includes `member`. Forces resolution of
    /// every access in the graph.
    pub fn accesses_to(&self, member: MemberId) -> Vec<&JavaAccess> {
        self.accesses()
            .filter(|a| self.resolve_access(a).contains(&member))
            .collect()
    }

    /// Members the access binds to, computed on first call and cached.
    pub fn resolve_target(&self, id: AccessId) -> Option<&IndexSet<MemberId>> {
        self.access(id).map(|a| self.resolve_access(a))
    }

    pub fn resolve_access<'a>(&'a self, access: &'a JavaAccess) -> &'a IndexSet<MemberId> {
        access
            .target
            .resolved
            .get_or_init(|| self.inner.resolver.resolve(self, &access.target))
    }

    // ---- Instanceof checks ----

    pub fn instanceof_checks(&self) -> impl Iterator<Item = &InstanceofCheck> {
        self.inner.members.iter().flat_map(|m| m.instanceof_checks.iter())
    }

    /// Checks anywhere in the graph that test against `class`.
    pub fn instanceof_checks_with_type(&self, class: ClassId) -> Vec<&InstanceofCheck> {
        self.instanceof_checks()
            .filter(|check| check.target == class)
            .collect()
    }

    // ---- Annotations ----

    /// Element values of `annotation`, with defaults declared by the annotation
    /// type filled in for elements not given explicitly.
    pub fn annotation_values<'a>(
        &self,
        annotation: &'a JavaAnnotation,
    ) -> &'a IndexMap<SmolStr, AnnotationValue> {
        annotation.values.get_or_init(|| {
            let mut values = annotation.explicit.clone();
            for element in self.members_of(annotation.type_id) {
                if let Some(default) = &element.annotation_default {
                    values
                        .entry(element.name.clone())
                        .or_insert_with(|| default.clone());
                }
            }
            values
        })
    }

    // ---- Dependencies ----

    pub fn dependency_graph(&self) -> &ClassDependencyGraph {
        self.inner
            .dependencies
            .get_or_init(|| ClassDependencyGraph::build(self))
    }
}
