use crate::descriptor::{parse_class_reference, parse_field_descriptor, parse_method_descriptor};
use crate::error::Result;
use crate::model::{AccessId, AccessTarget, JavaAccess, MemberId};
use crate::registry::ClassRegistry;
use archscope_api::{AccessKind, RawAccess};
use smol_str::SmolStr;

/// One access instruction, with its descriptor already decoded to type names.
#[derive(Debug, PartialEq, Eq)]
pub struct AccessBuilder {
    kind: AccessKind,
    owner: String,
    name: SmolStr,
    descriptor: String,
    parameters: Vec<String>,
    return_type: String,
    line_number: u32,
}

impl AccessBuilder {
    pub fn from_raw(raw: RawAccess) -> Result<Self> {
        let (parameters, return_type) = if raw.kind.is_field_access() {
            (Vec::new(), parse_field_descriptor(&raw.descriptor)?)
        } else {
            let decoded = parse_method_descriptor(&raw.descriptor)?;
            (decoded.parameters, decoded.return_type)
        };
        Ok(Self {
            kind: raw.kind,
            owner: parse_class_reference(&raw.owner)?,
            name: SmolStr::new(raw.name),
            descriptor: raw.descriptor,
            parameters,
            return_type,
            line_number: raw.line_number,
        })
    }

    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    pub(crate) fn register_names(&self, registry: &ClassRegistry) {
        registry.get(&self.owner);
        registry.get(&self.return_type);
        for p in &self.parameters {
            registry.get(p);
        }
    }

    pub(crate) fn finish(self, id: AccessId, origin: MemberId, registry: &ClassRegistry) -> JavaAccess {
        let target = AccessTarget::new(
            registry.get(&self.owner),
            self.kind.target_kind(),
            self.name,
            self.descriptor,
            self.parameters.iter().map(|p| registry.get(p)).collect(),
            registry.get(&self.return_type),
        );
        JavaAccess {
            id,
            kind: self.kind,
            origin,
            target,
            line_number: self.line_number,
        }
    }
}
