use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// JVM access flag bits, shared by classes, fields and methods.
pub mod access_flags {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    pub const SYNCHRONIZED: u16 = 0x0020;
    pub const VOLATILE: u16 = 0x0040;
    pub const BRIDGE: u16 = 0x0040;
    pub const TRANSIENT: u16 = 0x0080;
    pub const VARARGS: u16 = 0x0080;
    pub const NATIVE: u16 = 0x0100;
    pub const INTERFACE: u16 = 0x0200;
    pub const ABSTRACT: u16 = 0x0400;
    pub const STRICT: u16 = 0x0800;
    pub const SYNTHETIC: u16 = 0x1000;
    pub const ANNOTATION: u16 = 0x2000;
    pub const ENUM: u16 = 0x4000;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

impl ClassKind {
    pub fn from_access_flags(flags: u16) -> Self {
        if flags & access_flags::ANNOTATION != 0 {
            ClassKind::Annotation
        } else if flags & access_flags::INTERFACE != 0 {
            ClassKind::Interface
        } else if flags & access_flags::ENUM != 0 {
            ClassKind::Enum
        } else {
            ClassKind::Class
        }
    }

    /// Annotation types are interfaces as far as the type system is concerned.
    pub fn is_interface(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "annotation",
        };
        f.write_str(s)
    }
}

impl FromStr for ClassKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "class" => Ok(ClassKind::Class),
            "interface" => Ok(ClassKind::Interface),
            "enum" => Ok(ClassKind::Enum),
            "annotation" => Ok(ClassKind::Annotation),
            _ => Err(ApiError::UnknownKeyword {
                kind: "class kind",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
    StaticInitializer,
}

impl MemberKind {
    pub fn is_code_unit(self) -> bool {
        !matches!(self, MemberKind::Field)
    }
}

/// What an instruction does with its target.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    GetField,
    SetField,
    MethodCall,
    ConstructorCall,
}

impl AccessKind {
    pub fn is_field_access(self) -> bool {
        matches!(self, AccessKind::GetField | AccessKind::SetField)
    }

    /// The kind of member this access can bind to.
    pub fn target_kind(self) -> MemberKind {
        match self {
            AccessKind::GetField | AccessKind::SetField => MemberKind::Field,
            AccessKind::MethodCall => MemberKind::Method,
            AccessKind::ConstructorCall => MemberKind::Constructor,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Synchronized,
    Native,
    Volatile,
    Transient,
    Strictfp,
    Bridge,
    Synthetic,
}

impl Modifier {
    pub fn from_class_flags(flags: u16) -> BTreeSet<Modifier> {
        let mut mods = BTreeSet::new();
        insert_if(&mut mods, flags, access_flags::PUBLIC, Modifier::Public);
        insert_if(&mut mods, flags, access_flags::PRIVATE, Modifier::Private);
        insert_if(&mut mods, flags, access_flags::PROTECTED, Modifier::Protected);
        insert_if(&mut mods, flags, access_flags::STATIC, Modifier::Static);
        insert_if(&mut mods, flags, access_flags::FINAL, Modifier::Final);
        if flags & access_flags::INTERFACE == 0 {
            insert_if(&mut mods, flags, access_flags::ABSTRACT, Modifier::Abstract);
        }
        insert_if(&mut mods, flags, access_flags::SYNTHETIC, Modifier::Synthetic);
        mods
    }

    pub fn from_field_flags(flags: u16) -> BTreeSet<Modifier> {
        let mut mods = BTreeSet::new();
        insert_if(&mut mods, flags, access_flags::PUBLIC, Modifier::Public);
        insert_if(&mut mods, flags, access_flags::PRIVATE, Modifier::Private);
        insert_if(&mut mods, flags, access_flags::PROTECTED, Modifier::Protected);
        insert_if(&mut mods, flags, access_flags::STATIC, Modifier::Static);
        insert_if(&mut mods, flags, access_flags::FINAL, Modifier::Final);
        insert_if(&mut mods, flags, access_flags::VOLATILE, Modifier::Volatile);
        insert_if(&mut mods, flags, access_flags::TRANSIENT, Modifier::Transient);
        insert_if(&mut mods, flags, access_flags::SYNTHETIC, Modifier::Synthetic);
        mods
    }

    pub fn from_method_flags(flags: u16) -> BTreeSet<Modifier> {
        let mut mods = BTreeSet::new();
        insert_if(&mut mods, flags, access_flags::PUBLIC, Modifier::Public);
        insert_if(&mut mods, flags, access_flags::PRIVATE, Modifier::Private);
        insert_if(&mut mods, flags, access_flags::PROTECTED, Modifier::Protected);
        insert_if(&mut mods, flags, access_flags::STATIC, Modifier::Static);
        insert_if(&mut mods, flags, access_flags::FINAL, Modifier::Final);
        insert_if(&mut mods, flags, access_flags::SYNCHRONIZED, Modifier::Synchronized);
        insert_if(&mut mods, flags, access_flags::BRIDGE, Modifier::Bridge);
        insert_if(&mut mods, flags, access_flags::NATIVE, Modifier::Native);
        insert_if(&mut mods, flags, access_flags::ABSTRACT, Modifier::Abstract);
        insert_if(&mut mods, flags, access_flags::STRICT, Modifier::Strictfp);
        insert_if(&mut mods, flags, access_flags::SYNTHETIC, Modifier::Synthetic);
        mods
    }
}

fn insert_if(mods: &mut BTreeSet<Modifier>, flags: u16, bit: u16, modifier: Modifier) {
    if flags & bit != 0 {
        mods.insert(modifier);
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Volatile => "volatile",
            Modifier::Transient => "transient",
            Modifier::Strictfp => "strictfp",
            Modifier::Bridge => "bridge",
            Modifier::Synthetic => "synthetic",
        };
        f.write_str(s)
    }
}

impl FromStr for Modifier {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Modifier::Public),
            "protected" => Ok(Modifier::Protected),
            "private" => Ok(Modifier::Private),
            "static" => Ok(Modifier::Static),
            "final" => Ok(Modifier::Final),
            "abstract" => Ok(Modifier::Abstract),
            "synchronized" => Ok(Modifier::Synchronized),
            "native" => Ok(Modifier::Native),
            "volatile" => Ok(Modifier::Volatile),
            "transient" => Ok(Modifier::Transient),
            "strictfp" => Ok(Modifier::Strictfp),
            "bridge" => Ok(Modifier::Bridge),
            "synthetic" => Ok(Modifier::Synthetic),
            _ => Err(ApiError::UnknownKeyword {
                kind: "modifier",
                value: s.to_string(),
            }),
        }
    }
}
