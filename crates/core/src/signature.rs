//! Parser for JVM generic `Signature` attributes (JVMS 4.7.9.1).
//!
//! Produces the same token tree producers can hand over directly
//! ([`RawTypeSignature`]), so a class with a verbatim signature and one with
//! pre-split generic fields go through identical resolution.

use crate::error::{ImportError, Result};
use archscope_api::{RawClass, RawMember, RawTypeParameter, RawTypeSignature, fqn_from_internal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_parameters: Vec<RawTypeParameter>,
    pub superclass: RawTypeSignature,
    pub interfaces: Vec<RawTypeSignature>,
}

impl ClassSignature {
    /// Overwrites the generic fields of `class` with this signature.
    pub fn apply_to(self, class: &mut RawClass) {
        class.type_parameters = self.type_parameters;
        class.generic_superclass = Some(self.superclass);
        class.generic_interfaces = self.interfaces;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<RawTypeParameter>,
    pub parameters: Vec<RawTypeSignature>,
    pub return_type: RawTypeSignature,
    pub throws: Vec<RawTypeSignature>,
}

impl MethodSignature {
    /// Overwrites the generic fields of `member`. Descriptor-level throws are
    /// kept unless the member has none, in which case the class-typed entries
    /// of the signature's throws clause are used.
    pub fn apply_to(self, member: &mut RawMember) {
        member.type_parameters = self.type_parameters;
        member.generic_parameter_types = self.parameters;
        member.generic_type = Some(self.return_type);
        if member.throws.is_empty() {
            member.throws = self
                .throws
                .into_iter()
                .filter_map(|t| match t {
                    RawTypeSignature::Class { name }
                    | RawTypeSignature::Parameterized { name, .. } => Some(name),
                    _ => None,
                })
                .collect();
        }
    }
}

pub fn parse_class_signature(signature: &str) -> Result<ClassSignature> {
    let mut parser = Parser::new(signature);
    let type_parameters = parser.type_parameters()?;
    let superclass = parser.class_type()?;
    let mut interfaces = Vec::new();
    while !parser.at_end() {
        interfaces.push(parser.class_type()?);
    }
    Ok(ClassSignature {
        type_parameters,
        superclass,
        interfaces,
    })
}

pub fn parse_method_signature(signature: &str) -> Result<MethodSignature> {
    let mut parser = Parser::new(signature);
    let type_parameters = parser.type_parameters()?;
    parser.expect('(')?;
    let mut parameters = Vec::new();
    while !parser.eat(')') {
        parameters.push(parser.type_signature()?);
    }
    let return_type = if parser.eat('V') {
        RawTypeSignature::class("void")
    } else {
        parser.type_signature()?
    };
    let mut throws = Vec::new();
    while parser.eat('^') {
        throws.push(parser.field_type()?);
    }
    parser.finish()?;
    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        throws,
    })
}

pub fn parse_field_signature(signature: &str) -> Result<RawTypeSignature> {
    let mut parser = Parser::new(signature);
    let ty = parser.field_type()?;
    parser.finish()?;
    Ok(ty)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error("unexpected character"))
        }
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error("trailing characters"))
        }
    }

    fn error(&self, reason: &'static str) -> ImportError {
        ImportError::InvalidSignature {
            signature: self.input.to_string(),
            offset: self.pos,
            reason,
        }
    }

    fn identifier(&mut self) -> Result<&'a str> {
        let rest = &self.input[self.pos..];
        let len = rest
            .find(['.', ';', '[', '/', '<', '>', ':'])
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected identifier"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn type_parameters(&mut self) -> Result<Vec<RawTypeParameter>> {
        let mut params = Vec::new();
        if !self.eat('<') {
            return Ok(params);
        }
        while !self.eat('>') {
            if self.at_end() {
                return Err(self.error("unterminated type parameter list"));
            }
            let mut param = RawTypeParameter::new(self.identifier()?);
            self.expect(':')?;
            // The class bound may be empty when only interface bounds follow.
            if !matches!(self.peek(), Some(':') | Some('>')) {
                param.bounds.push(self.field_type()?);
            }
            while self.eat(':') {
                param.bounds.push(self.field_type()?);
            }
            params.push(param);
        }
        if params.is_empty() {
            return Err(self.error("empty type parameter list"));
        }
        Ok(params)
    }

    fn type_signature(&mut self) -> Result<RawTypeSignature> {
        let primitive = match self.peek() {
            Some('B') => "byte",
            Some('C') => "char",
            Some('D') => "double",
            Some('F') => "float",
            Some('I') => "int",
            Some('J') => "long",
            Some('S') => "short",
            Some('Z') => "boolean",
            _ => return self.field_type(),
        };
        self.pos += 1;
        Ok(RawTypeSignature::class(primitive))
    }

    fn field_type(&mut self) -> Result<RawTypeSignature> {
        match self.peek() {
            Some('L') => self.class_type(),
            Some('T') => {
                self.pos += 1;
                let name = self.identifier()?;
                self.expect(';')?;
                Ok(RawTypeSignature::variable(name))
            }
            Some('[') => {
                self.pos += 1;
                Ok(RawTypeSignature::array(self.type_signature()?))
            }
            _ => Err(self.error("expected field type signature")),
        }
    }

    /// `Lp/Outer<..>.Inner<..>;`. Only the innermost arguments are kept.
    fn class_type(&mut self) -> Result<RawTypeSignature> {
        self.expect('L')?;
        let mut internal = String::new();
        loop {
            internal.push_str(self.identifier()?);
            if self.eat('/') {
                internal.push('/');
            } else {
                break;
            }
        }

        let mut arguments = self.type_arguments()?;
        while self.eat('.') {
            internal.push('$');
            internal.push_str(self.identifier()?);
            arguments = self.type_arguments()?;
        }
        self.expect(';')?;

        let name = fqn_from_internal(&internal);
        if arguments.is_empty() {
            Ok(RawTypeSignature::class(name))
        } else {
            Ok(RawTypeSignature::parameterized(name, arguments))
        }
    }

    fn type_arguments(&mut self) -> Result<Vec<RawTypeSignature>> {
        let mut args = Vec::new();
        if !self.eat('<') {
            return Ok(args);
        }
        while !self.eat('>') {
            let arg = match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    RawTypeSignature::unbounded_wildcard()
                }
                Some('+') => {
                    self.pos += 1;
                    RawTypeSignature::wildcard_extends(self.field_type()?)
                }
                Some('-') => {
                    self.pos += 1;
                    RawTypeSignature::wildcard_super(self.field_type()?)
                }
                None => return Err(self.error("unterminated type argument list")),
                _ => self.field_type()?,
            };
            args.push(arg);
        }
        if args.is_empty() {
            return Err(self.error("empty type argument list"));
        }
        Ok(args)
    }
}
