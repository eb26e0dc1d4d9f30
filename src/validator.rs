//! Component F — the validator (spec §4.5). Grounded in how
//! `regorus::Engine::eval_rule` walks a term tree and accumulates failures
//! rather than stopping at the first one: every branch here returns its own
//! `ValidationResult` and the composite variants (`Object`, `ListOf`,
//! `Tuple`) concatenate their children's errors instead of short-circuiting.

use std::collections::HashSet;

use regex::Regex;
use rust_decimal::Decimal;

use crate::schema::{
    BinaryConstraints, BinaryEncoding, ListConstraints, NumericConstraints, Schema, TextConstraints,
    TimeConstraint, Uniqueness,
};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Errors(Vec<ValidationError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Errors(errs) => errs,
        }
    }

    fn single(path: &str, message: impl Into<String>) -> Self {
        ValidationResult::Errors(vec![ValidationError {
            path: path.to_string(),
            message: message.into(),
        }])
    }

    fn from_errors(errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Errors(errors)
        }
    }
}

/// Concatenate a set of sub-results; `Valid` iff every one of them is
/// (spec §4.5 "Aggregation").
pub fn summarize(results: impl IntoIterator<Item = ValidationResult>) -> ValidationResult {
    let mut errors = Vec::new();
    for result in results {
        if let ValidationResult::Errors(mut e) = result {
            errors.append(&mut e);
        }
    }
    ValidationResult::from_errors(errors)
}

pub fn validate(schema: &Schema, value: &Value) -> ValidationResult {
    validate_at("$", schema, value)
}

fn type_mismatch(path: &str, expected: &str, value: &Value) -> ValidationResult {
    ValidationResult::single(
        path,
        format!("expected {expected}, got {}", value.type_name()),
    )
}

fn push_field(path: &str, field: impl std::fmt::Display) -> String {
    format!("{path}/{field}")
}

fn push_index(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

fn validate_at(path: &str, schema: &Schema, value: &Value) -> ValidationResult {
    match schema {
        Schema::Any => ValidationResult::Valid,
        Schema::Fail => ValidationResult::single(path, "fail value"),
        Schema::Boolean { .. } => match value {
            Value::Bool(_) => ValidationResult::Valid,
            _ => type_mismatch(path, "boolean", value),
        },
        Schema::Text { constraints, .. } => validate_text(path, constraints, value),
        Schema::GivenText(expected) => match value {
            Value::Text(s) if s == expected => ValidationResult::Valid,
            Value::Text(s) => {
                ValidationResult::single(path, format!("expected {expected:?}, got {s:?}"))
            }
            _ => type_mismatch(path, "text", value),
        },
        Schema::Numeric { constraints, .. } => validate_numeric(path, constraints, value),
        Schema::Binary { constraints } => validate_binary(path, constraints, value),
        Schema::Time { constraints } => validate_time(path, constraints, value),
        Schema::Enum(values) => match value {
            Value::Text(s) if values.iter().any(|v| v == s) => ValidationResult::Valid,
            Value::Text(s) => {
                ValidationResult::single(path, format!("{s:?} is not one of the allowed values"))
            }
            _ => type_mismatch(path, "text", value),
        },
        Schema::ListOf { element, constraints } => validate_list(path, element, constraints, value),
        Schema::Tuple(items) => validate_tuple(path, items, value),
        Schema::Alternatives(options) => validate_alternatives(path, options, value),
        Schema::Object(fields) => validate_object(path, fields, value),
        Schema::Map(inner) => validate_map(path, inner, value),
        Schema::Ref(name) => {
            ValidationResult::single(path, format!("unresolved reference {name:?}"))
        }
        Schema::ScopedRef { namespace, name } => ValidationResult::single(
            path,
            format!("unresolved reference {namespace}.{name}"),
        ),
        Schema::Import { namespace, .. } => {
            ValidationResult::single(path, format!("unresolved import {namespace:?}"))
        }
        Schema::Documented { inner, .. } => validate_at(path, inner, value),
        Schema::Deprecated(inner) => validate_at(path, inner, value),
    }
}

fn validate_text(path: &str, constraints: &TextConstraints, value: &Value) -> ValidationResult {
    let s = match value {
        Value::Text(s) => s,
        _ => return type_mismatch(path, "text", value),
    };
    let mut errors = Vec::new();
    if let Some(size) = &constraints.size {
        let len = s.chars().count() as i64;
        if !size.contains(&len) {
            errors.push(ValidationError {
                path: path.to_string(),
                message: format!("length {len} is out of range"),
            });
        }
    }
    if let Some(pattern) = &constraints.regex {
        match Regex::new(pattern) {
            Ok(re) => {
                if !full_match(&re, s) {
                    errors.push(ValidationError {
                        path: path.to_string(),
                        message: format!("{s:?} does not match regex {pattern:?}"),
                    });
                }
            }
            Err(e) => errors.push(ValidationError {
                path: path.to_string(),
                message: format!("invalid regex {pattern:?}: {e}"),
            }),
        }
    }
    if let Some(format) = &constraints.format {
        let pattern = format_to_regex(format);
        match Regex::new(&pattern) {
            Ok(re) => {
                if !re.is_match(s) {
                    errors.push(ValidationError {
                        path: path.to_string(),
                        message: format!("{s:?} does not match format {format:?}"),
                    });
                }
            }
            Err(e) => errors.push(ValidationError {
                path: path.to_string(),
                message: format!("invalid format {format:?}: {e}"),
            }),
        }
    }
    ValidationResult::from_errors(errors)
}

fn full_match(re: &Regex, s: &str) -> bool {
    re.find(s).map(|m| m.start() == 0 && m.end() == s.len()).unwrap_or(false)
}

/// Translate the glyph alphabet (spec §3.2: `#`=digit, `X`=letter,
/// `@`=alphanumeric, `*`=any, else literal) into an anchored regex.
fn format_to_regex(format: &str) -> String {
    let mut pattern = String::from("^");
    for c in format.chars() {
        match c {
            '#' => pattern.push_str(r"[0-9]"),
            'X' => pattern.push_str(r"[A-Za-z]"),
            '@' => pattern.push_str(r"[A-Za-z0-9]"),
            '*' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    pattern
}

fn validate_numeric(path: &str, constraints: &NumericConstraints, value: &Value) -> ValidationResult {
    let number: Decimal = match value {
        Value::Number(n) => *n,
        Value::Text(s) => match crate::number::parse_decimal(s) {
            Ok(n) => n,
            Err(_) => {
                return ValidationResult::single(path, format!("{s:?} is not a valid number"))
            }
        },
        _ => return type_mismatch(path, "number", value),
    };
    let mut errors = Vec::new();
    if let Some(range) = &constraints.value {
        if !range.contains(&number) {
            errors.push(ValidationError {
                path: path.to_string(),
                message: format!("{number} is out of range"),
            });
        }
    }
    if constraints.integer && !crate::number::is_whole(&number) {
        errors.push(ValidationError {
            path: path.to_string(),
            message: format!("{number} is not an integer"),
        });
    }
    ValidationResult::from_errors(errors)
}

fn validate_binary(path: &str, constraints: &BinaryConstraints, value: &Value) -> ValidationResult {
    let bytes: Vec<u8> = match (value, constraints.encoding) {
        (Value::Binary(b), _) => b.clone(),
        (Value::Text(s), Some(encoding)) => match decode(encoding, s) {
            Ok(b) => b,
            Err(message) => return ValidationResult::single(path, message),
        },
        (Value::Text(_), None) => {
            return ValidationResult::single(
                path,
                "text value requires an encoding constraint to decode as binary",
            )
        }
        _ => return type_mismatch(path, "binary", value),
    };
    if let Some(size) = &constraints.size {
        let len = bytes.len() as u64;
        if !size.contains(&len) {
            return ValidationResult::single(path, format!("size {len} is out of range"));
        }
    }
    ValidationResult::Valid
}

fn decode(encoding: BinaryEncoding, s: &str) -> Result<Vec<u8>, String> {
    match encoding {
        BinaryEncoding::Hex => {
            if s.len() % 2 != 0 {
                return Err("hex string must have even length".to_string());
            }
            data_encoding::HEXLOWER_PERMISSIVE
                .decode(s.to_ascii_lowercase().as_bytes())
                .map_err(|e| format!("invalid hex: {e}"))
        }
        BinaryEncoding::Base64 => data_encoding::BASE64
            .decode(s.as_bytes())
            .or_else(|_| data_encoding::BASE64_NOPAD.decode(s.as_bytes()))
            .map_err(|e| format!("invalid base64: {e}")),
        BinaryEncoding::Base32 => {
            let stripped = s.trim_end_matches('=').to_ascii_uppercase();
            data_encoding::BASE32_NOPAD
                .decode(stripped.as_bytes())
                .map_err(|e| format!("invalid base32: {e}"))
        }
        BinaryEncoding::Base58 => {
            bs58::decode(s).into_vec().map_err(|e| format!("invalid base58: {e}"))
        }
        BinaryEncoding::Ascii85 => decode_ascii85(s),
    }
}

/// Adobe ascii85, accepting the optional `<~ ~>` delimiters and the `z`
/// shorthand for four zero bytes (spec §4.5). No crate in the dependency
/// stack implements this encoding, so it is hand-rolled.
fn decode_ascii85(s: &str) -> Result<Vec<u8>, String> {
    let inner = s
        .strip_prefix("<~")
        .and_then(|rest| rest.strip_suffix("~>"))
        .unwrap_or(s);
    let mut out = Vec::new();
    let mut group = [0u8; 5];
    let mut group_len = 0usize;
    for c in inner.chars() {
        if c.is_whitespace() {
            continue;
        }
        if c == 'z' {
            if group_len != 0 {
                return Err("'z' shorthand cannot appear inside an ascii85 group".to_string());
            }
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        if !('!'..='u').contains(&c) {
            return Err(format!("{c:?} is not a valid ascii85 character"));
        }
        group[group_len] = c as u8 - b'!';
        group_len += 1;
        if group_len == 5 {
            out.extend_from_slice(&decode_ascii85_group(&group, 5));
            group_len = 0;
        }
    }
    if group_len == 1 {
        return Err("trailing ascii85 group of length 1 is invalid".to_string());
    }
    if group_len > 0 {
        for slot in group.iter_mut().skip(group_len) {
            *slot = 84;
        }
        let decoded = decode_ascii85_group(&group, group_len);
        out.extend_from_slice(&decoded[..group_len - 1]);
    }
    Ok(out)
}

fn decode_ascii85_group(group: &[u8; 5], len: usize) -> [u8; 4] {
    let mut acc: u32 = 0;
    for &digit in group.iter() {
        acc = acc.wrapping_mul(85).wrapping_add(digit as u32);
    }
    let _ = len;
    acc.to_be_bytes()
}

fn validate_list(path: &str, element: &Schema, constraints: &ListConstraints, value: &Value) -> ValidationResult {
    let items = match value {
        Value::List(items) => items,
        _ => return type_mismatch(path, "list", value),
    };
    let mut errors = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if let ValidationResult::Errors(mut e) = validate_at(&push_index(path, i), element, item) {
            errors.append(&mut e);
        }
    }
    if let Some(size) = &constraints.size {
        let len = items.len() as i64;
        if !size.contains(&len) {
            errors.push(ValidationError {
                path: path.to_string(),
                message: format!("size {len} is out of range"),
            });
        }
    }
    for uniqueness in &constraints.unique {
        if let Err(message) = check_unique(uniqueness, items) {
            errors.push(ValidationError {
                path: path.to_string(),
                message,
            });
        }
    }
    ValidationResult::from_errors(errors)
}

fn check_unique(uniqueness: &Uniqueness, items: &[Value]) -> Result<(), String> {
    match uniqueness {
        Uniqueness::Simple => {
            let mut seen: Vec<SimpleKey> = Vec::with_capacity(items.len());
            for item in items {
                let key = SimpleKey::from_value(item)
                    .ok_or_else(|| "uniqueness only applies to simple values".to_string())?;
                if seen.contains(&key) {
                    return Err("list elements must be unique".to_string());
                }
                seen.push(key);
            }
            Ok(())
        }
        Uniqueness::ByFields(fields) => {
            let mut seen: Vec<Vec<SimpleKey>> = Vec::with_capacity(items.len());
            for item in items {
                let object = item
                    .as_object()
                    .ok_or_else(|| "uniqueness by fields requires object elements".to_string())?;
                let mut tuple = Vec::with_capacity(fields.len());
                for field in fields {
                    let field_value = object
                        .get(field)
                        .ok_or_else(|| format!("object is missing unique field {field:?}"))?;
                    let key = SimpleKey::from_value(field_value)
                        .ok_or_else(|| format!("field {field:?} is not a simple value"))?;
                    tuple.push(key);
                }
                if seen.contains(&tuple) {
                    return Err(format!("duplicate value for unique fields {fields:?}"));
                }
                seen.push(tuple);
            }
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SimpleKey {
    Bool(bool),
    Number(Decimal),
    Text(String),
}

impl SimpleKey {
    fn from_value(value: &Value) -> Option<SimpleKey> {
        match value {
            Value::Bool(b) => Some(SimpleKey::Bool(*b)),
            Value::Number(n) => Some(SimpleKey::Number(*n)),
            Value::Text(s) => Some(SimpleKey::Text(s.clone())),
            _ => None,
        }
    }
}

fn validate_tuple(path: &str, items: &[Schema], value: &Value) -> ValidationResult {
    let values: &[Value] = match value {
        Value::Tuple(v) | Value::List(v) => v,
        _ => return type_mismatch(path, "tuple", value),
    };
    let mut errors = Vec::new();
    let len = items.len().max(values.len());
    for i in 0..len {
        let sub_path = push_index(path, i);
        let result = match (items.get(i), values.get(i)) {
            (Some(schema), Some(v)) => validate_at(&sub_path, schema, v),
            (Some(schema), None) => validate_at(&sub_path, schema, &Value::Null),
            (None, Some(_)) => ValidationResult::single(&sub_path, "fail value"),
            (None, None) => ValidationResult::Valid,
        };
        if let ValidationResult::Errors(mut e) = result {
            errors.append(&mut e);
        }
    }
    ValidationResult::from_errors(errors)
}

fn validate_alternatives(path: &str, options: &[Schema], value: &Value) -> ValidationResult {
    for option in options {
        if validate_at(path, option, value).is_valid() {
            return ValidationResult::Valid;
        }
    }
    ValidationResult::single(path, "value does not match any alternative")
}

fn validate_object(path: &str, fields: &[(crate::schema::ObjectLabel, Schema)], value: &Value) -> ValidationResult {
    let object = match value.as_object() {
        Some(o) => o,
        None => return type_mismatch(path, "object", value),
    };
    let mut errors = Vec::new();
    for (label, schema) in fields {
        let field_path = push_field(path, label.name());
        match object.get(label.name()) {
            Some(v) => {
                if let ValidationResult::Errors(mut e) = validate_at(&field_path, schema, v) {
                    errors.append(&mut e);
                }
            }
            None => {
                if !label.is_optional() {
                    errors.push(ValidationError {
                        path: field_path,
                        message: "missing mandatory key".to_string(),
                    });
                }
            }
        }
    }
    ValidationResult::from_errors(errors)
}

fn validate_map(path: &str, inner: &Schema, value: &Value) -> ValidationResult {
    let object = match value.as_object() {
        Some(o) => o,
        None => return type_mismatch(path, "object", value),
    };
    let mut errors = Vec::new();
    for (key, v) in object {
        if let ValidationResult::Errors(mut e) = validate_at(&push_field(path, key), inner, v) {
            errors.append(&mut e);
        }
    }
    ValidationResult::from_errors(errors)
}

fn validate_time(path: &str, constraints: &[TimeConstraint], value: &Value) -> ValidationResult {
    let s = match value {
        Value::Text(s) => s,
        _ => return type_mismatch(path, "text", value),
    };
    let mut errors = Vec::new();
    for constraint in constraints {
        let ok = match constraint {
            TimeConstraint::Named(format) => matches_named_time_format(*format, s),
            TimeConstraint::Pattern(pattern) => match Regex::new(pattern) {
                Ok(re) => full_match(&re, s),
                Err(e) => {
                    errors.push(ValidationError {
                        path: path.to_string(),
                        message: format!("invalid time pattern {pattern:?}: {e}"),
                    });
                    true
                }
            },
        };
        if !ok {
            errors.push(ValidationError {
                path: path.to_string(),
                message: format!("{s:?} does not satisfy the time constraint"),
            });
        }
    }
    ValidationResult::from_errors(errors)
}

fn matches_named_time_format(format: crate::schema::TimeFormat, s: &str) -> bool {
    use crate::schema::TimeFormat;
    lazy_static::lazy_static! {
        static ref DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
        static ref TIME: Regex = Regex::new(r"^\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$").unwrap();
        static ref DATE_TIME: Regex =
            Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$").unwrap();
    }
    match format {
        TimeFormat::Iso8601Date => full_match(&DATE, s),
        TimeFormat::Iso8601Time => full_match(&TIME, s),
        TimeFormat::Iso8601DateTime | TimeFormat::Rfc3339 => full_match(&DATE_TIME, s),
        TimeFormat::Iso8601 => full_match(&DATE, s) || full_match(&DATE_TIME, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Bound, BoundOp, BoundedRange, ObjectLabel, TextConstraints};
    use std::collections::BTreeMap;

    #[test]
    fn any_accepts_everything() {
        assert!(validate(&Schema::Any, &Value::Null).is_valid());
    }

    #[test]
    fn fail_rejects_everything() {
        assert!(!validate(&Schema::Fail, &Value::Bool(true)).is_valid());
    }

    #[test]
    fn text_length_bound_is_enforced() {
        let schema = Schema::Text {
            constraints: TextConstraints {
                size: Some(BoundedRange {
                    min: Some(Bound::new(BoundOp::MinInclusive, 2)),
                    max: Some(Bound::new(BoundOp::MaxInclusive, 4)),
                }),
                regex: None,
                format: None,
            },
            default: None,
        };
        assert!(validate(&schema, &Value::Text("ab".into())).is_valid());
        assert!(!validate(&schema, &Value::Text("a".into())).is_valid());
    }

    #[test]
    fn numeric_accepts_parseable_text() {
        let schema = Schema::Numeric {
            constraints: NumericConstraints::default(),
            default: None,
        };
        assert!(validate(&schema, &Value::Text("3.5".into())).is_valid());
        assert!(!validate(&schema, &Value::Text("not a number".into())).is_valid());
    }

    #[test]
    fn object_reports_missing_mandatory_key() {
        let schema = Schema::Object(vec![
            (ObjectLabel::Mandatory("name".into()), Schema::Any),
            (ObjectLabel::Optional("age".into()), Schema::Any),
        ]);
        let result = validate(&schema, &Value::Object(BTreeMap::new()));
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].path, "$/name");
    }

    #[test]
    fn tuple_pads_length_mismatch_with_fail() {
        let schema = Schema::Tuple(vec![Schema::Any, Schema::Any]);
        let result = validate(&schema, &Value::Tuple(vec![Value::Null]));
        assert!(!result.is_valid());
    }

    #[test]
    fn alternatives_accepts_first_matching_option() {
        let schema = Schema::Alternatives(vec![
            Schema::Boolean { default: None },
            Schema::GivenText("x".into()),
        ]);
        assert!(validate(&schema, &Value::Text("x".into())).is_valid());
        assert!(!validate(&schema, &Value::Text("y".into())).is_valid());
    }

    #[test]
    fn unresolved_reference_is_an_error() {
        let result = validate(&Schema::Ref("Widget".into()), &Value::Null);
        assert!(!result.is_valid());
        assert!(result.errors()[0].message.contains("unresolved"));
    }

    #[test]
    fn binary_decodes_hex_text_before_checking_size() {
        let schema = Schema::Binary {
            constraints: BinaryConstraints {
                size: Some(BoundedRange {
                    min: None,
                    max: Some(Bound::new(BoundOp::MaxInclusive, 2)),
                }),
                encoding: Some(BinaryEncoding::Hex),
            },
        };
        assert!(validate(&schema, &Value::Text("abcd".into())).is_valid());
        assert!(!validate(&schema, &Value::Text("abcdef".into())).is_valid());
    }

    #[test]
    fn ascii85_round_trips_known_vector() {
        // "Man " encodes to "9jqo^" per the canonical Adobe example.
        let decoded = decode_ascii85("9jqo^").unwrap();
        assert_eq!(decoded, b"Man ");
    }

    #[test]
    fn ascii85_z_shorthand_decodes_to_four_zero_bytes() {
        assert_eq!(decode_ascii85("z").unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn list_simple_uniqueness_rejects_duplicates() {
        let schema = Schema::ListOf {
            element: Box::new(Schema::Numeric {
                constraints: NumericConstraints::default(),
                default: None,
            }),
            constraints: ListConstraints {
                size: None,
                unique: vec![Uniqueness::Simple],
            },
        };
        let dup = Value::List(vec![Value::Number(1.into()), Value::Number(1.into())]);
        assert!(!validate(&schema, &dup).is_valid());
    }
}
