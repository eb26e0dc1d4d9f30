//! Component A — the decoded, untyped value tree the validator interprets.
//!
//! Grounded in `regorus::value::Value`: a flat `enum` over the JSON-ish data
//! types plus a couple of domain-specific extras (`regorus` adds `Set`; we
//! add `Binary` and a genuinely separate `Tuple` from `List`, per spec §3.1 —
//! "tuples are positional; lists are homogeneous sequences" is a distinction
//! `regorus::Value` doesn't need but this IR does, since `Schema::Tuple` and
//! `Schema::ListOf` validate differently against the same JSON array shape).

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;

/// An untyped value tree produced by decoding JSON/YAML/XML/CSV/etc. Decoders
/// themselves are out of scope (spec §1); this is the interface they and the
/// validator meet at.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Arbitrary-precision decimal number.
    Number(Decimal),
    Text(String),
    Binary(Vec<u8>),
    /// A homogeneous, variable-length sequence.
    List(Vec<Value>),
    /// A fixed-arity, positional sequence — distinct from `List` even when
    /// the decoded wire shape (a JSON array) is identical.
    Tuple(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// A self-describing type tag used in validator error messages (spec §3.1).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Binary(_) => "binary",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Object(_) => "object",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Decimal> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Binary(b) => write!(f, "<{} bytes>", b.len()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_are_self_describing() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::List(vec![]).type_name(), "list");
        assert_eq!(Value::Tuple(vec![]).type_name(), "tuple");
    }

    #[test]
    fn list_and_tuple_are_distinct_values() {
        let l = Value::List(vec![Value::Bool(true)]);
        let t = Value::Tuple(vec![Value::Bool(true)]);
        assert_ne!(l, t);
    }
}
