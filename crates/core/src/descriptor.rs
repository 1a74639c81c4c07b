//! JVM field and method descriptor decoding.
//!
//! Output names are the registry's keys: dotted class names, Java keyword
//! names for primitives and a `[]` suffix per array dimension.

use crate::error::{ImportError, Result};
use archscope_api::{VOID_NAME, array_name, fqn_from_internal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub parameters: Vec<String>,
    pub return_type: String,
}

pub fn parse_field_descriptor(desc: &str) -> Result<String> {
    let (ty, rest) = parse_field_type(desc, desc)?;
    if !rest.is_empty() {
        return Err(invalid(desc, "trailing characters after field type"));
    }
    Ok(ty)
}

/// Registry key for a class operand of an instruction: an internal name, or a
/// field descriptor when the operand is an array type.
pub fn parse_class_reference(name: &str) -> Result<String> {
    if name.starts_with('[') {
        parse_field_descriptor(name)
    } else {
        Ok(fqn_from_internal(name))
    }
}

/// Like [`parse_class_reference`] for names that cannot fail intake, such as
/// signature and annotation type names. A malformed array descriptor is kept
/// as written, dotted.
pub fn normalize_class_name(name: &str) -> String {
    parse_class_reference(name).unwrap_or_else(|_| fqn_from_internal(name))
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let mut rest = desc
        .strip_prefix('(')
        .ok_or_else(|| invalid(desc, "method descriptor must start with '('"))?;

    let mut parameters = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(invalid(desc, "unterminated parameter list"));
        }
        let (param, after) = parse_field_type(rest, desc)?;
        parameters.push(param);
        rest = after;
    }

    let (return_type, rest) = match rest.strip_prefix('V') {
        Some(after) => (VOID_NAME.to_string(), after),
        None => parse_field_type(rest, desc)?,
    };
    if !rest.is_empty() {
        return Err(invalid(desc, "trailing characters after return type"));
    }

    Ok(MethodDescriptor {
        parameters,
        return_type,
    })
}

fn parse_field_type<'a>(input: &'a str, whole: &str) -> Result<(String, &'a str)> {
    let Some(first) = input.chars().next() else {
        return Err(invalid(whole, "expected a field type"));
    };
    let primitive = match first {
        'B' => "byte",
        'C' => "char",
        'D' => "double",
        'F' => "float",
        'I' => "int",
        'J' => "long",
        'S' => "short",
        'Z' => "boolean",
        'L' => {
            let end = input
                .find(';')
                .ok_or_else(|| invalid(whole, "object type is missing ';'"))?;
            if end == 1 {
                return Err(invalid(whole, "empty class name"));
            }
            return Ok((fqn_from_internal(&input[1..end]), &input[end + 1..]));
        }
        '[' => {
            let (component, rest) = parse_field_type(&input[1..], whole)?;
            return Ok((array_name(&component), rest));
        }
        _ => return Err(invalid(whole, "unknown type tag")),
    };
    Ok((primitive.to_string(), &input[1..]))
}

fn invalid(descriptor: &str, reason: &'static str) -> ImportError {
    ImportError::InvalidDescriptor {
        descriptor: descriptor.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_descriptors() {
        assert_eq!(parse_field_descriptor("I").unwrap(), "int");
        assert_eq!(
            parse_field_descriptor("[[Ljava/lang/String;").unwrap(),
            "java.lang.String[][]"
        );
        assert_eq!(
            parse_field_descriptor("Ljava/util/Map$Entry;").unwrap(),
            "java.util.Map$Entry"
        );
    }

    #[test]
    fn test_class_references() {
        assert_eq!(parse_class_reference("java/lang/String").unwrap(), "java.lang.String");
        assert_eq!(parse_class_reference("p.Already$Dotted").unwrap(), "p.Already$Dotted");
        assert_eq!(
            parse_class_reference("[Ljava/lang/String;").unwrap(),
            "java.lang.String[]"
        );
        assert_eq!(parse_class_reference("[[I").unwrap(), "int[][]");
        assert!(parse_class_reference("[Ljava/lang/String").is_err());
        assert_eq!(normalize_class_name("[Q"), "[Q");
        assert_eq!(normalize_class_name("p/Marker"), "p.Marker");
    }

    #[test]
    fn test_method_descriptor() {
        let desc = parse_method_descriptor("(ILp/B;[J)V").unwrap();
        assert_eq!(desc.parameters, vec!["int", "p.B", "long[]"]);
        assert_eq!(desc.return_type, "void");

        let desc = parse_method_descriptor("()[Z").unwrap();
        assert!(desc.parameters.is_empty());
        assert_eq!(desc.return_type, "boolean[]");
    }

    #[test]
    fn test_malformed_descriptors() {
        for bad in ["", "Q", "Ljava/lang/String", "IZ", "(I", "(I)", "I)V", "()VV", "(L;)V"] {
            let err = if bad.starts_with('(') {
                parse_method_descriptor(bad).unwrap_err()
            } else {
                parse_field_descriptor(bad).unwrap_err()
            };
            assert!(
                matches!(err, ImportError::InvalidDescriptor { .. }),
                "{bad} should be rejected"
            );
        }
        assert!(parse_method_descriptor("I)V").is_err());
    }
}
