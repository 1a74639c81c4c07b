use super::ids::{AccessId, ClassId, MemberId};
use archscope_api::{AccessKind, MemberKind};
use indexmap::IndexSet;
use once_cell::sync::OnceCell;
use smol_str::SmolStr;

/// One field access, method call or constructor call made by a code unit.
#[derive(Debug)]
pub struct JavaAccess {
    pub id: AccessId,
    pub kind: AccessKind,
    pub origin: MemberId,
    pub target: AccessTarget,
    /// Zero when unknown.
    pub line_number: u32,
}

/// The statically declared target of an access, before binding.
///
/// The members it binds to are computed against the finished hierarchy the
/// first time anyone asks and never again.
#[derive(Debug)]
pub struct AccessTarget {
    pub owner: ClassId,
    pub kind: MemberKind,
    pub name: SmolStr,
    pub descriptor: String,
    /// Empty for field targets.
    pub parameters: Vec<ClassId>,
    /// Return type of a callable, type of a field; `void` for constructors.
    pub return_type: ClassId,
    pub(crate) resolved: OnceCell<IndexSet<MemberId>>,
}

impl AccessTarget {
    pub(crate) fn new(
        owner: ClassId,
        kind: MemberKind,
        name: SmolStr,
        descriptor: String,
        parameters: Vec<ClassId>,
        return_type: ClassId,
    ) -> Self {
        Self {
            owner,
            kind,
            name,
            descriptor,
            parameters,
            return_type,
            resolved: OnceCell::new(),
        }
    }

    /// Cached resolution, if it already ran.
    pub fn resolved(&self) -> Option<&IndexSet<MemberId>> {
        self.resolved.get()
    }
}
