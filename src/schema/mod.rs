//! Component B — the schema IR (spec §3.2). Grounded in
//! `regorus::schema::Type`: a plain `enum`, one variant per shape, immutable
//! once built, validated by matching on `as_type()`-equivalent structure
//! rather than dynamic dispatch. Unlike `regorus::schema::Type`, which is
//! deserialized straight from JSON Schema via `serde`, this IR is dialect-
//! neutral: it is produced by the parser (component D) or by a translator
//! importer (component I/J), never by `serde` directly, because it also has
//! to represent constructs — references, imports, doc/deprecated wrappers —
//! that have no single canonical JSON shape.

pub mod constraints;
pub mod document;
pub mod ops;

pub use constraints::*;
pub use document::{DefinitionMap, ParsedSchema, ResolvedSchema};

use rust_decimal::Decimal;

/// A field label inside an `Object` schema: mandatory or optional (spec §3.2).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ObjectLabel {
    Mandatory(String),
    Optional(String),
}

impl ObjectLabel {
    pub fn name(&self) -> &str {
        match self {
            ObjectLabel::Mandatory(n) | ObjectLabel::Optional(n) => n.as_str(),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, ObjectLabel::Optional(_))
    }
}

/// The schema IR sum type (spec §3.2). Each variant is immutable; wrapping
/// (`Documented`, `Deprecated`) is how metadata attaches without touching
/// every other variant's representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Always accepts.
    Any,
    /// Always rejects; used as a sentinel (e.g. normalized-away empty unions).
    Fail,
    Boolean {
        default: Option<bool>,
    },
    Text {
        constraints: TextConstraints,
        default: Option<String>,
    },
    /// An exact literal, e.g. `"red"`.
    GivenText(String),
    Numeric {
        constraints: NumericConstraints,
        default: Option<Decimal>,
    },
    Binary {
        constraints: BinaryConstraints,
    },
    Time {
        constraints: Vec<TimeConstraint>,
    },
    /// Non-empty in canonical schemas (spec §3.4); the parser enforces this,
    /// the printer assumes it.
    Enum(Vec<String>),
    ListOf {
        element: Box<Schema>,
        constraints: ListConstraints,
    },
    /// Fixed arity, length >= 2 in canonical form.
    Tuple(Vec<Schema>),
    /// A union, length >= 2 in canonical form.
    Alternatives(Vec<Schema>),
    /// Field order is preserved (a plain `Vec`, not a sorted map) so parse
    /// and compact-print round-trip byte-for-byte; field order itself is
    /// not semantic for equality purposes (spec §3.4) — see
    /// [`Schema::fields_equal`].
    Object(Vec<(ObjectLabel, Schema)>),
    /// A text-keyed open mapping.
    Map(Box<Schema>),
    /// An unresolved named reference.
    Ref(String),
    /// A `namespace.name` reference; `name` empty means "root of that
    /// namespace".
    ScopedRef {
        namespace: String,
        name: String,
    },
    /// Only ever lives inside a [`ParsedSchema`]; replaced during import
    /// resolution (component C).
    Import {
        namespace: String,
        path: String,
    },
    Documented {
        doc: String,
        inner: Box<Schema>,
    },
    Deprecated(Box<Schema>),
}

impl Schema {
    pub fn documented(doc: impl Into<String>, inner: Schema) -> Schema {
        Schema::Documented {
            doc: doc.into(),
            inner: Box::new(inner),
        }
    }

    pub fn deprecated(inner: Schema) -> Schema {
        Schema::Deprecated(Box::new(inner))
    }

    /// Peel `Documented`/`Deprecated` wrappers, which are transparent to
    /// validation (spec §3.4).
    pub fn unwrap_metadata(&self) -> &Schema {
        match self {
            Schema::Documented { inner, .. } | Schema::Deprecated(inner) => inner.unwrap_metadata(),
            other => other,
        }
    }

    /// Structural equality for `Object` field sets, ignoring order (spec
    /// §3.4: "equality is set-based").
    fn fields_equal(a: &[(ObjectLabel, Schema)], b: &[(ObjectLabel, Schema)]) -> bool {
        if a.len() != b.len() {
            return false;
        }
        a.iter().all(|(label, schema)| {
            b.iter()
                .any(|(other_label, other_schema)| other_label == label && other_schema == schema)
        })
    }

    /// Equality that treats `Object` field order as non-semantic, matching
    /// spec §3.4 rather than `Vec`'s positional `PartialEq`. Used by the
    /// parse-print round-trip tests (spec §8.1).
    pub fn structurally_eq(&self, other: &Schema) -> bool {
        match (self, other) {
            (Schema::Object(a), Schema::Object(b)) => Self::fields_equal(a, b),
            (Schema::ListOf { element: e1, constraints: c1 }, Schema::ListOf { element: e2, constraints: c2 }) => {
                c1 == c2 && e1.structurally_eq(e2)
            }
            (Schema::Tuple(a), Schema::Tuple(b)) | (Schema::Alternatives(a), Schema::Alternatives(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structurally_eq(y))
            }
            (Schema::Map(a), Schema::Map(b)) => a.structurally_eq(b),
            (
                Schema::Documented { doc: d1, inner: i1 },
                Schema::Documented { doc: d2, inner: i2 },
            ) => d1 == d2 && i1.structurally_eq(i2),
            (Schema::Deprecated(a), Schema::Deprecated(b)) => a.structurally_eq(b),
            _ => self == other,
        }
    }
}

/// Collapse the invalid-but-reachable empty collections a translator can
/// produce (spec §9 "Empty collections"): `Enum()` -> `Fail`,
/// `Alternatives(len<2)` -> the sole member or `Fail`, `Tuple(len<2)` ->
/// the sole member or `Fail`. The printer assumes it never sees these, so
/// every translator must normalize before handing a schema off.
pub fn normalize(schema: Schema) -> Schema {
    match schema {
        Schema::Enum(values) if values.is_empty() => Schema::Fail,
        Schema::Alternatives(mut options) => {
            options = options.into_iter().map(normalize).collect();
            match options.len() {
                0 => Schema::Fail,
                1 => options.into_iter().next().unwrap(),
                _ => {
                    if options.iter().all(|o| matches!(o, Schema::GivenText(_))) {
                        Schema::Enum(
                            options
                                .into_iter()
                                .map(|o| match o {
                                    Schema::GivenText(v) => v,
                                    _ => unreachable!(),
                                })
                                .collect(),
                        )
                    } else {
                        Schema::Alternatives(options)
                    }
                }
            }
        }
        Schema::Tuple(mut elements) => {
            elements = elements.into_iter().map(normalize).collect();
            match elements.len() {
                0 => Schema::Fail,
                1 => elements.into_iter().next().unwrap(),
                _ => Schema::Tuple(elements),
            }
        }
        Schema::ListOf {
            element,
            constraints,
        } => Schema::ListOf {
            element: Box::new(normalize(*element)),
            constraints,
        },
        Schema::Object(fields) => Schema::Object(
            fields
                .into_iter()
                .map(|(label, schema)| (label, normalize(schema)))
                .collect(),
        ),
        Schema::Map(inner) => Schema::Map(Box::new(normalize(*inner))),
        Schema::Documented { doc, inner } => Schema::Documented {
            doc,
            inner: Box::new(normalize(*inner)),
        },
        Schema::Deprecated(inner) => Schema::Deprecated(Box::new(normalize(*inner))),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_field_order_is_not_semantic() {
        let a = Schema::Object(vec![
            (ObjectLabel::Mandatory("a".into()), Schema::Any),
            (ObjectLabel::Mandatory("b".into()), Schema::Any),
        ]);
        let b = Schema::Object(vec![
            (ObjectLabel::Mandatory("b".into()), Schema::Any),
            (ObjectLabel::Mandatory("a".into()), Schema::Any),
        ]);
        assert!(a.structurally_eq(&b));
        assert_ne!(a, b); // positional Vec equality still differs
    }

    #[test]
    fn normalize_collapses_singleton_alternatives() {
        assert_eq!(normalize(Schema::Alternatives(vec![Schema::Any])), Schema::Any);
    }

    #[test]
    fn normalize_canonicalizes_all_given_text_alternatives_to_enum() {
        let s = Schema::Alternatives(vec![
            Schema::GivenText("red".into()),
            Schema::GivenText("blue".into()),
        ]);
        assert_eq!(
            normalize(s),
            Schema::Enum(vec!["red".to_string(), "blue".to_string()])
        );
    }

    #[test]
    fn normalize_collapses_empty_enum_to_fail() {
        assert_eq!(normalize(Schema::Enum(vec![])), Schema::Fail);
    }
}
