use super::annotation::{AnnotationBuilder, finish_annotations};
use super::member::MemberBuilder;
use super::types::{TypeBuilder, TypeParameterBuilder, TypeResolver, TypeScope};
use crate::error::Result;
use crate::model::{ClassId, JavaAccess, JavaClass, JavaMember, JavaType, MemberId, TypeVarId};
use crate::registry::ClassRegistry;
use crate::signature::parse_class_signature;
use archscope_api::{ClassKind, Modifier, RawClass, fqn_from_internal};
use smol_str::SmolStr;
use std::collections::BTreeSet;

/// Accumulates one declared class. Consumed by `finish`.
#[derive(Debug)]
pub struct ClassBuilder {
    id: ClassId,
    name: SmolStr,
    kind: ClassKind,
    modifiers: BTreeSet<Modifier>,
    superclass: Option<String>,
    interfaces: Vec<String>,
    enclosing_class: Option<String>,
    type_parameters: Vec<TypeParameterBuilder>,
    generic_superclass: Option<TypeBuilder>,
    generic_interfaces: Vec<TypeBuilder>,
    annotations: Vec<AnnotationBuilder>,
    members: Vec<MemberBuilder>,
    source_file: Option<String>,
    type_parameter_ids: Vec<(SmolStr, TypeVarId)>,
}

/// Everything one class contributes to the graph.
pub(crate) struct FinishedClass {
    pub class: JavaClass,
    pub members: Vec<JavaMember>,
    pub accesses: Vec<JavaAccess>,
}

impl ClassBuilder {
    /// Declares the class and registers every name it mentions, so the
    /// registry's name set is closed once intake ends.
    pub fn from_raw(mut raw: RawClass, registry: &ClassRegistry) -> Result<Self> {
        if let Some(signature) = raw.signature.take() {
            parse_class_signature(&signature)?.apply_to(&mut raw);
        }

        let name = fqn_from_internal(&raw.name);
        let members = raw
            .members
            .into_iter()
            .map(MemberBuilder::from_raw)
            .collect::<Result<Vec<_>>>()?;
        let id = registry.declare(&name, raw.kind)?;

        let builder = Self {
            id,
            name: SmolStr::new(name),
            kind: raw.kind,
            modifiers: raw.modifiers,
            superclass: raw.superclass.map(|s| fqn_from_internal(&s)),
            interfaces: raw.interfaces.iter().map(|i| fqn_from_internal(i)).collect(),
            enclosing_class: raw.enclosing_class.map(|e| fqn_from_internal(&e)),
            type_parameters: raw.type_parameters.into_iter().map(Into::into).collect(),
            generic_superclass: raw.generic_superclass.map(Into::into),
            generic_interfaces: raw.generic_interfaces.into_iter().map(Into::into).collect(),
            annotations: raw.annotations.into_iter().map(Into::into).collect(),
            members,
            source_file: raw.source_file,
            type_parameter_ids: Vec::new(),
        };
        builder.register_names(registry);
        Ok(builder)
    }

    fn register_names(&self, registry: &ClassRegistry) {
        let named = self
            .superclass
            .iter()
            .chain(&self.interfaces)
            .chain(&self.enclosing_class);
        for name in named {
            registry.get(name);
        }
        for tp in &self.type_parameters {
            tp.register_names(registry);
        }
        for ty in self.generic_superclass.iter().chain(&self.generic_interfaces) {
            ty.register_names(registry);
        }
        for annotation in &self.annotations {
            annotation.register_names(registry);
        }
        for member in &self.members {
            member.register_names(registry);
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enclosing_class(&self) -> Option<&str> {
        self.enclosing_class.as_deref()
    }

    pub fn members(&self) -> &[MemberBuilder] {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut [MemberBuilder] {
        &mut self.members
    }

    pub(crate) fn take_type_parameters(&mut self) -> Vec<TypeParameterBuilder> {
        std::mem::take(&mut self.type_parameters)
    }

    pub(crate) fn set_type_parameter_ids(&mut self, ids: Vec<(SmolStr, TypeVarId)>) {
        self.type_parameter_ids = ids;
    }

    /// Builds the class and its members. Member and access ids are taken
    /// consecutively from `first_member` and `first_access`.
    pub(crate) fn finish(
        self,
        first_member: u32,
        first_access: u32,
        resolver: &mut TypeResolver<'_>,
        scope: &TypeScope,
    ) -> FinishedClass {
        let registry = resolver.registry();

        let superclass = match self.generic_superclass {
            Some(generic) => Some(generic.finish(resolver, scope)),
            None => self
                .superclass
                .as_deref()
                .map(|s| JavaType::Class(registry.get(s))),
        };
        let interfaces = if self.generic_interfaces.is_empty() {
            self.interfaces
                .iter()
                .map(|i| JavaType::Class(registry.get(i)))
                .collect()
        } else {
            self.generic_interfaces
                .into_iter()
                .map(|i| i.finish(resolver, scope))
                .collect()
        };

        let mut members = Vec::with_capacity(self.members.len());
        let mut accesses = Vec::new();
        let mut next_access = first_access;
        for (i, member) in self.members.into_iter().enumerate() {
            let member_id = MemberId(first_member + i as u32);
            let count = member.access_count() as u32;
            let (member, member_accesses) =
                member.finish(member_id, self.id, next_access, resolver, scope);
            next_access += count;
            members.push(member);
            accesses.extend(member_accesses);
        }

        let class = JavaClass {
            id: self.id,
            name: self.name,
            kind: self.kind,
            modifiers: self.modifiers,
            complete: true,
            type_parameters: self.type_parameter_ids.iter().map(|(_, id)| *id).collect(),
            superclass,
            interfaces,
            enclosing_class: self.enclosing_class.as_deref().map(|e| registry.get(e)),
            member_classes: Vec::new(),
            members: members.iter().map(|m| m.id).collect(),
            annotations: finish_annotations(self.annotations, registry),
            source_file: self.source_file,
        };

        FinishedClass {
            class,
            members,
            accesses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use archscope_api::{RawMember, RawTypeSignature};

    #[test]
    fn test_intake_registers_referenced_names() {
        let registry = ClassRegistry::default();
        let raw = RawClass::new("p/A")
            .with_superclass("p/Base")
            .with_interface("p.Face")
            .with_member(RawMember::field("b", "Lp/B;"))
            .with_member(RawMember::method("list", "()Ljava/util/List;"));
        let builder = ClassBuilder::from_raw(raw, &registry).unwrap();

        assert_eq!(builder.name(), "p.A");
        assert!(registry.is_complete(builder.id()));
        for name in ["p.Base", "p.Face", "p.B", "java.util.List"] {
            let id = registry.lookup(name).unwrap();
            assert!(!registry.is_complete(id), "{name} should be a placeholder");
        }
    }

    #[test]
    fn test_class_signature_overrides_generic_fields() {
        let registry = ClassRegistry::default();
        let raw = RawClass::new("p.Box")
            .with_superclass("java.lang.Object")
            .with_signature("<T:Ljava/lang/Number;>Ljava/lang/Object;Ljava/util/function/Supplier<TT;>;");
        let builder = ClassBuilder::from_raw(raw, &registry).unwrap();
        assert_eq!(builder.type_parameters.len(), 1);
        assert_eq!(builder.generic_interfaces.len(), 1);
        assert_eq!(
            builder.generic_superclass,
            Some(TypeBuilder::from(RawTypeSignature::class("java.lang.Object")))
        );
        assert!(registry.lookup("java.util.function.Supplier").is_some());
        assert!(registry.lookup("java.lang.Number").is_some());
    }

    #[test]
    fn test_duplicate_declaration_fails_intake() {
        let registry = ClassRegistry::default();
        ClassBuilder::from_raw(RawClass::new("p.A"), &registry).unwrap();
        let err = ClassBuilder::from_raw(RawClass::new("p.A"), &registry).unwrap_err();
        assert!(matches!(err, ImportError::DuplicateClass(_)));
    }
}
