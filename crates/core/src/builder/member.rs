use super::access::AccessBuilder;
use super::annotation::{
    AnnotationBuilder, finish_annotations, finish_value, normalize_value, register_value_names,
};
use super::types::{TypeBuilder, TypeParameterBuilder, TypeResolver, TypeScope};
use crate::descriptor::{parse_class_reference, parse_field_descriptor, parse_method_descriptor};
use crate::error::Result;
use crate::model::{
    AccessId, ClassId, InstanceofCheck, JavaAccess, JavaMember, MemberId, TypeVarId,
};
use crate::signature::{parse_field_signature, parse_method_signature};
use archscope_api::{MemberKind, Modifier, RawAnnotationValue, RawMember, fqn_from_internal};
use smol_str::SmolStr;
use indexmap::IndexSet;
use std::collections::BTreeSet;

/// Accumulates one field, method, constructor or static initializer.
#[derive(Debug)]
pub struct MemberBuilder {
    kind: MemberKind,
    name: SmolStr,
    descriptor: String,
    modifiers: BTreeSet<Modifier>,
    annotations: Vec<AnnotationBuilder>,
    raw_type: String,
    parameters: Vec<String>,
    throws: Vec<String>,
    type_parameters: Vec<TypeParameterBuilder>,
    generic_parameter_types: Vec<TypeBuilder>,
    generic_type: Option<TypeBuilder>,
    annotation_default: Option<RawAnnotationValue>,
    accesses: Vec<AccessBuilder>,
    /// Target class names with their lines; repeats collapse.
    instanceof_checks: IndexSet<(String, u32)>,
    first_line_number: Option<u32>,
    /// Shell ids of `type_parameters`, assigned once the batch is closed.
    type_parameter_ids: Vec<(SmolStr, TypeVarId)>,
}

impl MemberBuilder {
    /// Decodes descriptors and signatures; a malformed one fails the member.
    pub fn from_raw(mut raw: RawMember) -> Result<Self> {
        if let Some(signature) = raw.signature.take() {
            if raw.kind.is_code_unit() {
                parse_method_signature(&signature)?.apply_to(&mut raw);
            } else {
                raw.generic_type = Some(parse_field_signature(&signature)?);
            }
        }

        let (raw_type, parameters) = if raw.kind.is_code_unit() {
            let decoded = parse_method_descriptor(&raw.descriptor)?;
            (decoded.return_type, decoded.parameters)
        } else {
            (parse_field_descriptor(&raw.descriptor)?, Vec::new())
        };

        let accesses = raw
            .accesses
            .into_iter()
            .map(AccessBuilder::from_raw)
            .collect::<Result<Vec<_>>>()?;
        let instanceof_checks = raw
            .instanceof_checks
            .into_iter()
            .map(|check| Ok((parse_class_reference(&check.target)?, check.line_number)))
            .collect::<Result<Vec<_>>>()?;

        let mut builder = Self {
            kind: raw.kind,
            name: SmolStr::new(raw.name),
            descriptor: raw.descriptor,
            modifiers: raw.modifiers,
            annotations: raw.annotations.into_iter().map(Into::into).collect(),
            raw_type,
            parameters,
            throws: raw.throws.iter().map(|t| fqn_from_internal(t)).collect(),
            type_parameters: raw.type_parameters.into_iter().map(Into::into).collect(),
            generic_parameter_types: raw
                .generic_parameter_types
                .into_iter()
                .map(Into::into)
                .collect(),
            generic_type: raw.generic_type.map(Into::into),
            annotation_default: raw.annotation_default.map(normalize_value),
            accesses: Vec::new(),
            instanceof_checks: IndexSet::new(),
            first_line_number: None,
            type_parameter_ids: Vec::new(),
        };

        for line in raw.line_numbers {
            builder.record_line_number(line);
        }
        for access in accesses {
            builder.add_access(access);
        }
        for (target, line) in instanceof_checks {
            builder.add_instanceof_check(target, line);
        }
        Ok(builder)
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_line_number(&self) -> Option<u32> {
        self.first_line_number
    }

    pub fn access_count(&self) -> usize {
        self.accesses.len()
    }

    /// Keeps the smallest non-zero line seen.
    pub fn record_line_number(&mut self, line: u32) {
        if line == 0 {
            return;
        }
        self.first_line_number = Some(match self.first_line_number {
            Some(current) => current.min(line),
            None => line,
        });
    }

    pub fn add_access(&mut self, access: AccessBuilder) {
        self.record_line_number(access.line_number());
        self.accesses.push(access);
    }

    pub fn add_instanceof_check(&mut self, target: String, line_number: u32) {
        self.record_line_number(line_number);
        self.instanceof_checks.insert((target, line_number));
    }

    pub(crate) fn register_names(&self, registry: &crate::registry::ClassRegistry) {
        registry.get(&self.raw_type);
        for name in self.parameters.iter().chain(&self.throws) {
            registry.get(name);
        }
        for annotation in &self.annotations {
            annotation.register_names(registry);
        }
        for tp in &self.type_parameters {
            tp.register_names(registry);
        }
        for ty in self.generic_parameter_types.iter().chain(&self.generic_type) {
            ty.register_names(registry);
        }
        if let Some(default) = &self.annotation_default {
            register_value_names(default, registry);
        }
        for access in &self.accesses {
            access.register_names(registry);
        }
        for (target, _) in &self.instanceof_checks {
            registry.get(target);
        }
    }

    pub(crate) fn take_type_parameters(&mut self) -> Vec<TypeParameterBuilder> {
        std::mem::take(&mut self.type_parameters)
    }

    pub(crate) fn set_type_parameter_ids(&mut self, ids: Vec<(SmolStr, TypeVarId)>) {
        self.type_parameter_ids = ids;
    }

    pub(crate) fn finish(
        self,
        id: MemberId,
        owner: ClassId,
        first_access: u32,
        resolver: &mut TypeResolver<'_>,
        class_scope: &TypeScope,
    ) -> (JavaMember, Vec<JavaAccess>) {
        let registry = resolver.registry();
        let scope = class_scope.nested(&self.type_parameter_ids);

        let accesses: Vec<JavaAccess> = self
            .accesses
            .into_iter()
            .enumerate()
            .map(|(i, access)| access.finish(AccessId(first_access + i as u32), id, registry))
            .collect();

        let member = JavaMember {
            id,
            kind: self.kind,
            name: self.name,
            descriptor: self.descriptor,
            owner,
            modifiers: self.modifiers,
            annotations: finish_annotations(self.annotations, registry),
            first_line_number: self.first_line_number,
            raw_type: registry.get(&self.raw_type),
            parameters: self.parameters.iter().map(|p| registry.get(p)).collect(),
            throws: self.throws.iter().map(|t| registry.get(t)).collect(),
            type_parameters: self.type_parameter_ids.iter().map(|(_, id)| *id).collect(),
            generic_parameter_types: self
                .generic_parameter_types
                .into_iter()
                .map(|t| t.finish(resolver, &scope))
                .collect(),
            generic_type: self.generic_type.map(|t| t.finish(resolver, &scope)),
            annotation_default: self.annotation_default.map(|v| finish_value(v, registry)),
            accesses: accesses.iter().map(|a| a.id).collect(),
            instanceof_checks: self
                .instanceof_checks
                .iter()
                .map(|(target, line)| InstanceofCheck {
                    owner: id,
                    target: registry.get(target),
                    line_number: *line,
                })
                .collect(),
        };
        (member, accesses)
    }
}
