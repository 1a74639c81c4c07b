//! Raw, name-keyed records handed over by the descriptor producer.
//!
//! These mirror what a class-file reader sees: names are strings, descriptors
//! are JVM descriptor text, generic signatures are token trees. Nothing here
//! points at another record; the graph builder does all linking.

use super::kind::{AccessKind, ClassKind, MemberKind, Modifier};
use super::naming::{CONSTRUCTOR_NAME, STATIC_INITIALIZER_NAME};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawClass {
    /// Fully qualified, dot separated (`p.Outer$Inner`).
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub enclosing_class: Option<String>,
    #[serde(default)]
    pub type_parameters: Vec<RawTypeParameter>,
    /// Generic form of `superclass`, when the class has a signature attribute.
    #[serde(default)]
    pub generic_superclass: Option<RawTypeSignature>,
    /// Generic forms of `interfaces`, same order.
    #[serde(default)]
    pub generic_interfaces: Vec<RawTypeSignature>,
    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
    #[serde(default)]
    pub members: Vec<RawMember>,
    #[serde(default)]
    pub source_file: Option<String>,
    /// Verbatim `Signature` attribute. Takes precedence over the generic
    /// fields above when present.
    #[serde(default)]
    pub signature: Option<String>,
}

impl RawClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            modifiers: BTreeSet::new(),
            superclass: None,
            interfaces: Vec::new(),
            enclosing_class: None,
            type_parameters: Vec::new(),
            generic_superclass: None,
            generic_interfaces: Vec::new(),
            annotations: Vec::new(),
            members: Vec::new(),
            source_file: None,
            signature: None,
        }
    }

    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_superclass(mut self, name: impl Into<String>) -> Self {
        self.superclass = Some(name.into());
        self
    }

    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.interfaces.push(name.into());
        self
    }

    pub fn with_enclosing_class(mut self, name: impl Into<String>) -> Self {
        self.enclosing_class = Some(name.into());
        self
    }

    pub fn with_type_parameter(mut self, parameter: RawTypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn with_member(mut self, member: RawMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_annotation(mut self, annotation: RawAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawMember {
    pub kind: MemberKind,
    pub name: String,
    /// JVM descriptor: `Ljava/lang/String;` for fields, `(I)V` for code units.
    pub descriptor: String,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
    #[serde(default)]
    pub throws: Vec<String>,
    #[serde(default)]
    pub type_parameters: Vec<RawTypeParameter>,
    #[serde(default)]
    pub generic_parameter_types: Vec<RawTypeSignature>,
    /// Generic return type of a code unit, or the generic type of a field.
    #[serde(default)]
    pub generic_type: Option<RawTypeSignature>,
    /// Default value of an annotation-type element.
    #[serde(default)]
    pub annotation_default: Option<RawAnnotationValue>,
    #[serde(default)]
    pub accesses: Vec<RawAccess>,
    #[serde(default)]
    pub instanceof_checks: Vec<RawInstanceofCheck>,
    /// Line numbers of instructions that are not accesses.
    #[serde(default)]
    pub line_numbers: Vec<u32>,
    /// Verbatim `Signature` attribute, field or method form.
    #[serde(default)]
    pub signature: Option<String>,
}

impl RawMember {
    pub fn new(kind: MemberKind, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            descriptor: descriptor.into(),
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
            throws: Vec::new(),
            type_parameters: Vec::new(),
            generic_parameter_types: Vec::new(),
            generic_type: None,
            annotation_default: None,
            accesses: Vec::new(),
            instanceof_checks: Vec::new(),
            line_numbers: Vec::new(),
            signature: None,
        }
    }

    pub fn field(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self::new(MemberKind::Field, name, descriptor)
    }

    pub fn method(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self::new(MemberKind::Method, name, descriptor)
    }

    pub fn constructor(descriptor: impl Into<String>) -> Self {
        Self::new(MemberKind::Constructor, CONSTRUCTOR_NAME, descriptor)
    }

    pub fn static_initializer() -> Self {
        Self::new(MemberKind::StaticInitializer, STATIC_INITIALIZER_NAME, "()V")
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn with_access(mut self, access: RawAccess) -> Self {
        self.accesses.push(access);
        self
    }

    pub fn with_annotation(mut self, annotation: RawAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_type_parameter(mut self, parameter: RawTypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn with_instanceof_check(mut self, target: impl Into<String>, line_number: u32) -> Self {
        self.instanceof_checks.push(RawInstanceofCheck {
            target: target.into(),
            line_number,
        });
        self
    }

    pub fn with_line_number(mut self, line: u32) -> Self {
        self.line_numbers.push(line);
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }
}

/// An `instanceof` instruction. `target` is an internal name, or an array
/// descriptor such as `[Ljava/lang/String;`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawInstanceofCheck {
    pub target: String,
    #[serde(default)]
    pub line_number: u32,
}

/// One field access or call instruction inside a code unit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawAccess {
    pub kind: AccessKind,
    pub owner: String,
    pub name: String,
    pub descriptor: String,
    /// Zero when the class file carries no line number table.
    #[serde(default)]
    pub line_number: u32,
}

impl RawAccess {
    pub fn new(
        kind: AccessKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        line_number: u32,
    ) -> Self {
        Self {
            kind,
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
            line_number,
        }
    }

    pub fn method_call(
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        line_number: u32,
    ) -> Self {
        Self::new(AccessKind::MethodCall, owner, name, descriptor, line_number)
    }

    pub fn constructor_call(
        owner: impl Into<String>,
        descriptor: impl Into<String>,
        line_number: u32,
    ) -> Self {
        Self::new(
            AccessKind::ConstructorCall,
            owner,
            CONSTRUCTOR_NAME,
            descriptor,
            line_number,
        )
    }

    pub fn get_field(
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        line_number: u32,
    ) -> Self {
        Self::new(AccessKind::GetField, owner, name, descriptor, line_number)
    }

    pub fn set_field(
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        line_number: u32,
    ) -> Self {
        Self::new(AccessKind::SetField, owner, name, descriptor, line_number)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawTypeParameter {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<RawTypeSignature>,
}

impl RawTypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn with_bound(mut self, bound: RawTypeSignature) -> Self {
        self.bounds.push(bound);
        self
    }
}

/// Generic type expression as written in a signature attribute.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawTypeSignature {
    Class {
        name: String,
    },
    Variable {
        name: String,
    },
    Parameterized {
        name: String,
        arguments: Vec<RawTypeSignature>,
    },
    Wildcard {
        #[serde(default)]
        upper_bounds: Vec<RawTypeSignature>,
        #[serde(default)]
        lower_bounds: Vec<RawTypeSignature>,
    },
    Array {
        component: Box<RawTypeSignature>,
    },
}

impl RawTypeSignature {
    pub fn class(name: impl Into<String>) -> Self {
        RawTypeSignature::Class { name: name.into() }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        RawTypeSignature::Variable { name: name.into() }
    }

    pub fn parameterized(name: impl Into<String>, arguments: Vec<RawTypeSignature>) -> Self {
        RawTypeSignature::Parameterized {
            name: name.into(),
            arguments,
        }
    }

    /// `?`
    pub fn unbounded_wildcard() -> Self {
        RawTypeSignature::Wildcard {
            upper_bounds: Vec::new(),
            lower_bounds: Vec::new(),
        }
    }

    /// `? extends bound`
    pub fn wildcard_extends(bound: RawTypeSignature) -> Self {
        RawTypeSignature::Wildcard {
            upper_bounds: vec![bound],
            lower_bounds: Vec::new(),
        }
    }

    /// `? super bound`
    pub fn wildcard_super(bound: RawTypeSignature) -> Self {
        RawTypeSignature::Wildcard {
            upper_bounds: Vec::new(),
            lower_bounds: vec![bound],
        }
    }

    pub fn array(component: RawTypeSignature) -> Self {
        RawTypeSignature::Array {
            component: Box::new(component),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawAnnotation {
    pub type_name: String,
    #[serde(default)]
    pub values: IndexMap<String, RawAnnotationValue>,
}

impl RawAnnotation {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            values: IndexMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: RawAnnotationValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawAnnotationValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Char(char),
    String(String),
    /// Class literal, by name.
    Class(String),
    Enum { owner: String, constant: String },
    Annotation(RawAnnotation),
    Array(Vec<RawAnnotationValue>),
}
