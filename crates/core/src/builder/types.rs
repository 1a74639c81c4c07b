//! Builders for the generic type model and the resolution context they finish
//! against.
//!
//! Type parameters go through two steps. A shell with a name and a provisional
//! erasure of Object exists for every declaration before any bound is looked
//! at; `TypeParameterBuilder::finish` later resolves the bounds against a
//! [`TypeScope`] and fills the shell in. A bound that names its own variable or
//! a sibling resolves to that shell's id, so no recursion is involved.

use crate::descriptor::normalize_class_name;
use crate::error::{ImportError, Result};
use crate::model::{
    ClassId, GenericArrayType, JavaType, ParameterizedType, TypeVarId, TypeVarOwner, TypeVariable, WildcardType,
};
use crate::registry::ClassRegistry;
use archscope_api::{RawTypeParameter, RawTypeSignature, array_name};
use once_cell::sync::OnceCell;
use smol_str::SmolStr;
use std::sync::atomic::{AtomicU32, Ordering};

/// Type variables visible from one declaration site, innermost first.
#[derive(Debug, Clone, Default)]
pub(crate) struct TypeScope {
    entries: Vec<(SmolStr, TypeVarId)>,
}

impl TypeScope {
    /// `inner` shadows everything already in `self`.
    pub fn nested(&self, inner: &[(SmolStr, TypeVarId)]) -> TypeScope {
        let mut entries = Vec::with_capacity(inner.len() + self.entries.len());
        entries.extend_from_slice(inner);
        entries.extend_from_slice(&self.entries);
        TypeScope { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<TypeVarId> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }
}

/// A declared type variable before its bounds are known.
#[derive(Debug)]
pub(crate) struct TypeVarShell {
    pub name: SmolStr,
    pub owner: TypeVarOwner,
    completed: OnceCell<(Vec<JavaType>, ClassId)>,
}

impl TypeVarShell {
    pub fn new(name: SmolStr, owner: TypeVarOwner) -> Self {
        Self {
            name,
            owner,
            completed: OnceCell::new(),
        }
    }

    /// Bounds once completed; empty before.
    pub fn bounds(&self) -> &[JavaType] {
        self.completed
            .get()
            .map(|(bounds, _)| bounds.as_slice())
            .unwrap_or_default()
    }

    pub fn into_variable(self, id: TypeVarId, object: ClassId) -> TypeVariable {
        let (bounds, erasure) = self.completed.into_inner().unwrap_or((Vec::new(), object));
        TypeVariable {
            id,
            name: self.name,
            owner: self.owner,
            bounds,
            erasure,
        }
    }
}

/// Shared, read-mostly state every finishing task resolves types against.
pub(crate) struct TypeEnv<'a> {
    pub registry: &'a ClassRegistry,
    pub shells: &'a [TypeVarShell],
    pub object: ClassId,
    pub next_orphan: &'a AtomicU32,
    /// Set once every shell is completed. Until then the erasure of a generic
    /// array is not final, so its array class is not registered yet.
    pub complete: bool,
}

/// Per-task type resolver. Collects the orphan variables it had to invent.
pub(crate) struct TypeResolver<'a> {
    env: &'a TypeEnv<'a>,
    orphans: Vec<TypeVariable>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(env: &'a TypeEnv<'a>) -> Self {
        Self {
            env,
            orphans: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'a ClassRegistry {
        self.env.registry
    }

    pub fn class(&self, name: &str) -> ClassId {
        self.env.registry.get(name)
    }

    pub fn into_orphans(self) -> Vec<TypeVariable> {
        self.orphans
    }

    /// Variable `name` as seen from `scope`. Names nothing in the batch
    /// declares become a fresh unbounded variable.
    fn variable(&mut self, name: &str, scope: &TypeScope) -> TypeVarId {
        if let Some(id) = scope.lookup(name) {
            return id;
        }
        let id = TypeVarId(self.env.next_orphan.fetch_add(1, Ordering::SeqCst));
        tracing::debug!("Type variable {} is not declared in scope, using {:?}", name, id);
        self.orphans.push(TypeVariable {
            id,
            name: SmolStr::new(name),
            owner: TypeVarOwner::Unresolved,
            bounds: Vec::new(),
            erasure: self.env.object,
        });
        id
    }

    /// Erasure as of now. Shells not yet completed report Object.
    pub fn erasure(&self, ty: &JavaType) -> ClassId {
        match ty {
            JavaType::Class(id) => *id,
            JavaType::Variable(id) => self
                .env
                .shells
                .get(id.index())
                .and_then(|shell| shell.completed.get())
                .map(|(_, erasure)| *erasure)
                .unwrap_or(self.env.object),
            JavaType::Wildcard(w) => w
                .upper_bounds
                .first()
                .map(|b| self.erasure(b))
                .unwrap_or(self.env.object),
            JavaType::Parameterized(p) => p.raw_type,
            JavaType::GenericArray(a) => {
                let component = self.erasure(&a.component);
                self.env
                    .registry
                    .name(component)
                    .and_then(|name| self.env.registry.lookup(&array_name(&name)))
                    .unwrap_or(self.env.object)
            }
        }
    }

    /// Slot for the array class of `component`'s erasure.
    fn array_class(&self, component: &JavaType) -> ClassId {
        let erasure = self.erasure(component);
        match self.env.registry.name(erasure) {
            Some(name) => self.env.registry.get(&array_name(&name)),
            None => self.env.object,
        }
    }

    /// Registers the erased array class of every generic array inside `ty`,
    /// innermost first.
    pub fn register_array_erasures(&self, ty: &JavaType) {
        match ty {
            JavaType::Class(_) | JavaType::Variable(_) => {}
            JavaType::Wildcard(w) => {
                for b in w.upper_bounds.iter().chain(&w.lower_bounds) {
                    self.register_array_erasures(b);
                }
            }
            JavaType::Parameterized(p) => {
                for arg in &p.arguments {
                    self.register_array_erasures(arg);
                }
            }
            JavaType::GenericArray(a) => {
                self.register_array_erasures(&a.component);
                self.array_class(&a.component);
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParameterizedTypeBuilder {
    raw_type: String,
    arguments: Vec<TypeBuilder>,
}

impl ParameterizedTypeBuilder {
    fn finish(self, resolver: &mut TypeResolver<'_>, scope: &TypeScope) -> ParameterizedType {
        ParameterizedType {
            raw_type: resolver.class(&self.raw_type),
            arguments: self
                .arguments
                .into_iter()
                .map(|arg| arg.finish(resolver, scope))
                .collect(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct WildcardTypeBuilder {
    upper_bounds: Vec<TypeBuilder>,
    lower_bounds: Vec<TypeBuilder>,
}

impl WildcardTypeBuilder {
    fn finish(self, resolver: &mut TypeResolver<'_>, scope: &TypeScope) -> WildcardType {
        WildcardType {
            upper_bounds: self
                .upper_bounds
                .into_iter()
                .map(|b| b.finish(resolver, scope))
                .collect(),
            lower_bounds: self
                .lower_bounds
                .into_iter()
                .map(|b| b.finish(resolver, scope))
                .collect(),
        }
    }
}

/// Unresolved shape of any generic type expression.
#[derive(Debug, PartialEq, Eq)]
pub enum TypeBuilder {
    Class(String),
    Variable(SmolStr),
    Array(Box<TypeBuilder>),
    Wildcard(WildcardTypeBuilder),
    Parameterized(ParameterizedTypeBuilder),
}

impl From<RawTypeSignature> for TypeBuilder {
    fn from(raw: RawTypeSignature) -> Self {
        match raw {
            RawTypeSignature::Class { name } => TypeBuilder::Class(normalize_class_name(&name)),
            RawTypeSignature::Variable { name } => TypeBuilder::Variable(SmolStr::new(name)),
            RawTypeSignature::Parameterized { name, arguments } => {
                TypeBuilder::Parameterized(ParameterizedTypeBuilder {
                    raw_type: normalize_class_name(&name),
                    arguments: arguments.into_iter().map(Into::into).collect(),
                })
            }
            RawTypeSignature::Wildcard {
                upper_bounds,
                lower_bounds,
            } => TypeBuilder::Wildcard(WildcardTypeBuilder {
                upper_bounds: upper_bounds.into_iter().map(Into::into).collect(),
                lower_bounds: lower_bounds.into_iter().map(Into::into).collect(),
            }),
            RawTypeSignature::Array { component } => {
                TypeBuilder::Array(Box::new(TypeBuilder::from(*component)))
            }
        }
    }
}

impl TypeBuilder {
    /// Class name this expression erases to without consulting any variable.
    fn static_erasure(&self) -> Option<String> {
        match self {
            TypeBuilder::Class(name) => Some(name.clone()),
            TypeBuilder::Parameterized(p) => Some(p.raw_type.clone()),
            TypeBuilder::Array(component) => component.static_erasure().map(|n| array_name(&n)),
            TypeBuilder::Variable(_) | TypeBuilder::Wildcard(_) => None,
        }
    }

    pub(crate) fn register_names(&self, registry: &ClassRegistry) {
        match self {
            TypeBuilder::Class(name) => {
                registry.get(name);
            }
            TypeBuilder::Variable(_) => {}
            TypeBuilder::Array(component) => {
                component.register_names(registry);
                if let Some(name) = self.static_erasure() {
                    registry.get(&name);
                }
            }
            TypeBuilder::Wildcard(w) => {
                for b in w.upper_bounds.iter().chain(&w.lower_bounds) {
                    b.register_names(registry);
                }
            }
            TypeBuilder::Parameterized(p) => {
                registry.get(&p.raw_type);
                for arg in &p.arguments {
                    arg.register_names(registry);
                }
            }
        }
    }

    pub(crate) fn finish(self, resolver: &mut TypeResolver<'_>, scope: &TypeScope) -> JavaType {
        match self {
            TypeBuilder::Class(name) => JavaType::Class(resolver.class(&name)),
            TypeBuilder::Variable(name) => JavaType::Variable(resolver.variable(&name, scope)),
            TypeBuilder::Wildcard(w) => JavaType::Wildcard(w.finish(resolver, scope)),
            TypeBuilder::Parameterized(p) => JavaType::Parameterized(p.finish(resolver, scope)),
            TypeBuilder::Array(component) => match component.finish(resolver, scope) {
                JavaType::Class(id) => JavaType::Class(resolver.array_class(&JavaType::Class(id))),
                component => {
                    if resolver.env.complete {
                        resolver.array_class(&component);
                    }
                    JavaType::GenericArray(GenericArrayType {
                        component: Box::new(component),
                    })
                }
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct TypeParameterBuilder {
    name: SmolStr,
    bounds: Vec<TypeBuilder>,
}

impl From<RawTypeParameter> for TypeParameterBuilder {
    fn from(raw: RawTypeParameter) -> Self {
        Self {
            name: SmolStr::new(raw.name),
            bounds: raw.bounds.into_iter().map(Into::into).collect(),
        }
    }
}

impl TypeParameterBuilder {
    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    pub(crate) fn register_names(&self, registry: &ClassRegistry) {
        for bound in &self.bounds {
            bound.register_names(registry);
        }
    }

    /// Resolves the bounds and completes the shell `id`.
    ///
    /// Every bound after the first must erase to an interface. Bounds erasing
    /// to a placeholder are accepted since their kind is unknown.
    pub(crate) fn finish(
        self,
        id: TypeVarId,
        resolver: &mut TypeResolver<'_>,
        scope: &TypeScope,
        declared_by: &str,
    ) -> Result<()> {
        let bounds: Vec<JavaType> = self
            .bounds
            .into_iter()
            .map(|b| b.finish(resolver, scope))
            .collect();

        let registry = resolver.registry();
        for (position, bound) in bounds.iter().enumerate().skip(1) {
            let erasure = resolver.erasure(bound);
            if registry.is_complete(erasure) && !registry.kind(erasure).is_interface() {
                return Err(ImportError::InvalidTypeBound {
                    variable: self.name.to_string(),
                    declared_by: declared_by.to_string(),
                    bound: registry.name(erasure).unwrap_or_default().to_string(),
                    position,
                });
            }
        }

        let erasure = bounds
            .first()
            .map(|b| resolver.erasure(b))
            .unwrap_or(resolver.env.object);

        let shell = resolver
            .env
            .shells
            .get(id.index())
            .ok_or_else(|| ImportError::Internal(format!("no shell for {id:?}")))?;
        shell
            .completed
            .set((bounds, erasure))
            .map_err(|_| ImportError::Internal(format!("{id:?} completed twice")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archscope_api::ClassKind;

    fn env<'a>(
        registry: &'a ClassRegistry,
        shells: &'a [TypeVarShell],
        next: &'a AtomicU32,
    ) -> TypeEnv<'a> {
        TypeEnv {
            registry,
            shells,
            object: registry.get("java.lang.Object"),
            next_orphan: next,
            complete: true,
        }
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let outer = TypeScope::default().nested(&[(SmolStr::new("T"), TypeVarId(0))]);
        let inner = outer.nested(&[(SmolStr::new("T"), TypeVarId(1))]);
        assert_eq!(inner.lookup("T"), Some(TypeVarId(1)));
        assert_eq!(outer.lookup("T"), Some(TypeVarId(0)));
        assert_eq!(inner.lookup("U"), None);
    }

    #[test]
    fn test_sibling_erasure_follows_completion_order() {
        let registry = ClassRegistry::default();
        registry.get("java.lang.Number");
        let shells = vec![
            TypeVarShell::new("A".into(), TypeVarOwner::Unresolved),
            TypeVarShell::new("B".into(), TypeVarOwner::Unresolved),
        ];
        let next = AtomicU32::new(2);
        let env = env(&registry, &shells, &next);
        let scope = TypeScope::default().nested(&[
            (SmolStr::new("A"), TypeVarId(0)),
            (SmolStr::new("B"), TypeVarId(1)),
        ]);
        let mut resolver = TypeResolver::new(&env);

        // A extends B, B extends Number: A reads B before B is complete.
        TypeParameterBuilder::from(
            RawTypeParameter::new("A").with_bound(RawTypeSignature::variable("B")),
        )
        .finish(TypeVarId(0), &mut resolver, &scope, "p.C")
        .unwrap();
        TypeParameterBuilder::from(
            RawTypeParameter::new("B").with_bound(RawTypeSignature::class("java.lang.Number")),
        )
        .finish(TypeVarId(1), &mut resolver, &scope, "p.C")
        .unwrap();

        let object = env.object;
        assert_eq!(resolver.erasure(&JavaType::Variable(TypeVarId(0))), object);
        assert_eq!(
            resolver.erasure(&JavaType::Variable(TypeVarId(1))),
            registry.get("java.lang.Number")
        );
    }

    #[test]
    fn test_unknown_variable_becomes_orphan() {
        let registry = ClassRegistry::default();
        let next = AtomicU32::new(0);
        let env = env(&registry, &[], &next);
        let mut resolver = TypeResolver::new(&env);
        let ty = TypeBuilder::from(RawTypeSignature::variable("X"))
            .finish(&mut resolver, &TypeScope::default());
        assert_eq!(ty, JavaType::Variable(TypeVarId(0)));
        let orphans = resolver.into_orphans();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].owner(), TypeVarOwner::Unresolved);
        assert_eq!(orphans[0].erasure(), env.object);
    }

    #[test]
    fn test_class_in_later_bound_position_is_rejected() {
        let registry = ClassRegistry::default();
        registry.declare("p.Base", ClassKind::Class).unwrap();
        registry.declare("p.Face", ClassKind::Interface).unwrap();
        let shells = vec![TypeVarShell::new("T".into(), TypeVarOwner::Unresolved)];
        let next = AtomicU32::new(1);
        let env = env(&registry, &shells, &next);
        let scope = TypeScope::default().nested(&[(SmolStr::new("T"), TypeVarId(0))]);
        let mut resolver = TypeResolver::new(&env);

        let err = TypeParameterBuilder::from(
            RawTypeParameter::new("T")
                .with_bound(RawTypeSignature::class("p.Face"))
                .with_bound(RawTypeSignature::class("p.Base")),
        )
        .finish(TypeVarId(0), &mut resolver, &scope, "p.C")
        .unwrap_err();

        match err {
            ImportError::InvalidTypeBound {
                variable,
                bound,
                position,
                ..
            } => {
                assert_eq!(variable, "T");
                assert_eq!(bound, "p.Base");
                assert_eq!(position, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_generic_array_waits_for_its_variable() {
        let registry = ClassRegistry::default();
        registry.get("java.lang.Number");
        let shells = vec![TypeVarShell::new("T".into(), TypeVarOwner::Unresolved)];
        let next = AtomicU32::new(1);
        let mut env = env(&registry, &shells, &next);
        env.complete = false;
        let scope = TypeScope::default().nested(&[(SmolStr::new("T"), TypeVarId(0))]);
        let mut resolver = TypeResolver::new(&env);

        let array = TypeBuilder::from(RawTypeSignature::array(RawTypeSignature::variable("T")))
            .finish(&mut resolver, &scope);
        assert_eq!(
            array.as_generic_array().map(|a| a.component_type()),
            Some(&JavaType::Variable(TypeVarId(0)))
        );
        assert_eq!(registry.lookup("java.lang.Number[]"), None);

        TypeParameterBuilder::from(
            RawTypeParameter::new("T").with_bound(RawTypeSignature::class("java.lang.Number")),
        )
        .finish(TypeVarId(0), &mut resolver, &scope, "p.C")
        .unwrap();
        resolver.register_array_erasures(&array);
        let number_array = registry.lookup("java.lang.Number[]").unwrap();
        assert_eq!(resolver.erasure(&array), number_array);
    }

    #[test]
    fn test_internal_names_are_normalized() {
        let ty = TypeBuilder::from(RawTypeSignature::parameterized(
            "java/util/List",
            vec![RawTypeSignature::class("[Ljava/lang/String;")],
        ));
        let TypeBuilder::Parameterized(p) = ty else {
            panic!("expected parameterized builder");
        };
        assert_eq!(p.raw_type, "java.util.List");
        assert_eq!(
            p.arguments,
            vec![TypeBuilder::Class("java.lang.String[]".to_string())]
        );
    }

    #[test]
    fn test_generic_array_uses_component_erasure() {
        let registry = ClassRegistry::default();
        let next = AtomicU32::new(0);
        let env = env(&registry, &[], &next);
        let mut resolver = TypeResolver::new(&env);
        let ty = TypeBuilder::from(RawTypeSignature::array(RawTypeSignature::class("p.Foo")))
            .finish(&mut resolver, &TypeScope::default());
        assert_eq!(ty, JavaType::Class(registry.get("p.Foo[]")));
    }
}
