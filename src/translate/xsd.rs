//! Component J — XSD import (spec §4.9, design sketch). The scanning loop
//! is grounded in `legalis-interop`'s own `quick_xml::Reader` usage
//! (`reader.config_mut().trim_text(true)` + `read_event_into(&mut buf)`);
//! the events are driven into a small generic element tree here, which this
//! module then walks the way `json_schema_import.rs` walks `serde_json::Value`.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::SchemaError;
use crate::friction::FrictionReport;
use crate::schema::{
    Bound, BoundOp, BoundedRange, NumericConstraints, ObjectLabel, Schema, TextConstraints,
};
use crate::translate::TranslationContext;

#[derive(Debug, Clone, Default)]
struct XmlElement {
    name: String,
    attrs: HashMap<String, String>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == local_name)
    }

    fn child_named(&self, local_name: &str) -> Option<&XmlElement> {
        self.children_named(local_name).next()
    }
}

fn local_name(qname: &[u8]) -> String {
    let s = String::from_utf8_lossy(qname);
    s.rsplit_once(':').map(|(_, local)| local).unwrap_or(&s).to_string()
}

fn parse_xml(text: &str) -> Result<XmlElement, SchemaError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut stack: Vec<XmlElement> = vec![XmlElement::default()];
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let mut el = XmlElement {
                    name: local_name(e.name().as_ref()),
                    ..Default::default()
                };
                for attr in e.attributes().flatten() {
                    let key = local_name(attr.key.as_ref());
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    el.attrs.insert(key, value);
                }
                stack.push(el);
            }
            Ok(Event::Empty(e)) => {
                let mut el = XmlElement {
                    name: local_name(e.name().as_ref()),
                    ..Default::default()
                };
                for attr in e.attributes().flatten() {
                    let key = local_name(attr.key.as_ref());
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    el.attrs.insert(key, value);
                }
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(el);
                }
            }
            Ok(Event::End(_)) => {
                if let Some(finished) = stack.pop() {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(finished);
                    } else {
                        stack.push(finished);
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&t.unescape().unwrap_or_default());
                }
            }
            Ok(_) => {}
            Err(e) => {
                return Err(SchemaError::TranslatorFatal {
                    translator: "xsd-import".to_string(),
                    message: e.to_string(),
                })
            }
        }
        buf.clear();
    }
    stack.pop().ok_or_else(|| SchemaError::TranslatorFatal {
        translator: "xsd-import".to_string(),
        message: "empty document".to_string(),
    })
}

pub struct ImportResult {
    pub root: Schema,
    pub definitions: HashMap<String, Schema>,
    pub report: FrictionReport,
}

pub fn import(text: &str) -> Result<ImportResult, SchemaError> {
    let document = parse_xml(text)?;
    let root_element = document.child_named("schema").ok_or_else(|| SchemaError::TranslatorFatal {
        translator: "xsd-import".to_string(),
        message: "no xs:schema root element found".to_string(),
    })?;

    let mut ctx = TranslationContext::new();
    let mut definitions = HashMap::new();

    for complex_type in root_element.children_named("complexType") {
        if let Some(name) = complex_type.attr("name") {
            let (schema, new_ctx) = translate_complex_type(complex_type, ctx);
            ctx = new_ctx;
            definitions.insert(name.to_string(), schema);
        }
    }
    for simple_type in root_element.children_named("simpleType") {
        if let Some(name) = simple_type.attr("name") {
            let (schema, new_ctx) = translate_simple_type(simple_type, ctx);
            ctx = new_ctx;
            definitions.insert(name.to_string(), schema);
        }
    }

    let root = match root_element.child_named("element") {
        Some(top_element) => {
            let (schema, new_ctx) = translate_element(top_element, ctx);
            ctx = new_ctx;
            schema
        }
        None => {
            ctx = ctx.add_loss("no top-level xs:element found; root exported as Any");
            Schema::Any
        }
    };

    Ok(ImportResult {
        root,
        definitions,
        report: ctx.report,
    })
}

fn translate_element(el: &XmlElement, ctx: TranslationContext) -> (Schema, TranslationContext) {
    if let Some(type_name) = el.attr("type") {
        if let Some(builtin) = builtin_type(type_name) {
            return (builtin, ctx);
        }
        return (Schema::Ref(local_name(type_name.as_bytes())), ctx);
    }
    if let Some(complex_type) = el.child_named("complexType") {
        return translate_complex_type(complex_type, ctx);
    }
    if let Some(simple_type) = el.child_named("simpleType") {
        return translate_simple_type(simple_type, ctx);
    }
    (Schema::Any, ctx.add_loss(format!("xs:element {:?} has no type information", el.attr("name"))))
}

fn builtin_type(xsd_type: &str) -> Option<Schema> {
    let local = local_name(xsd_type.as_bytes());
    Some(match local.as_str() {
        "string" | "token" | "normalizedString" | "anyURI" => Schema::Text {
            constraints: TextConstraints::default(),
            default: None,
        },
        "boolean" => Schema::Boolean { default: None },
        "int" | "integer" | "long" | "short" | "byte" | "nonNegativeInteger" | "positiveInteger" => {
            Schema::Numeric {
                constraints: NumericConstraints { value: None, integer: true },
                default: None,
            }
        }
        "decimal" | "double" | "float" => Schema::Numeric {
            constraints: NumericConstraints::default(),
            default: None,
        },
        "date" => Schema::Time {
            constraints: vec![crate::schema::TimeConstraint::Named(crate::schema::TimeFormat::Iso8601Date)],
        },
        "dateTime" => Schema::Time {
            constraints: vec![crate::schema::TimeConstraint::Named(crate::schema::TimeFormat::Iso8601DateTime)],
        },
        "time" => Schema::Time {
            constraints: vec![crate::schema::TimeConstraint::Named(crate::schema::TimeFormat::Iso8601Time)],
        },
        "base64Binary" => Schema::Binary {
            constraints: crate::schema::BinaryConstraints {
                size: None,
                encoding: Some(crate::schema::BinaryEncoding::Base64),
            },
        },
        "hexBinary" => Schema::Binary {
            constraints: crate::schema::BinaryConstraints {
                size: None,
                encoding: Some(crate::schema::BinaryEncoding::Hex),
            },
        },
        _ => return None,
    })
}

fn translate_complex_type(el: &XmlElement, ctx: TranslationContext) -> (Schema, TranslationContext) {
    if let Some(simple_content) = el.child_named("simpleContent") {
        return translate_simple_content(simple_content, ctx);
    }

    let mut ctx = ctx;
    let mut fields = Vec::new();

    if let Some(sequence) = el.child_named("sequence") {
        let (seq_fields, new_ctx) = translate_particle_children(sequence, ctx);
        ctx = new_ctx;
        fields.extend(seq_fields);
    } else if let Some(choice) = el.child_named("choice") {
        let (options, new_ctx) = translate_choice(choice, ctx);
        ctx = new_ctx;
        return (Schema::Alternatives(options), ctx);
    } else if let Some(all) = el.child_named("all") {
        let (all_fields, new_ctx) = translate_particle_children(all, ctx);
        ctx = new_ctx.add_approximation("xs:all ordering is not preserved");
        fields.extend(all_fields);
    }

    for attribute in el.children_named("attribute") {
        let (attr_schema, new_ctx) = translate_attribute(attribute, ctx);
        ctx = new_ctx;
        if let Some(name) = attribute.attr("name") {
            let required = attribute.attr("use") == Some("required");
            let label = format!("@{name}");
            fields.push((
                if required {
                    ObjectLabel::Mandatory(label)
                } else {
                    ObjectLabel::Optional(label)
                },
                attr_schema,
            ));
        }
    }

    (Schema::Object(fields), ctx)
}

fn translate_simple_content(el: &XmlElement, ctx: TranslationContext) -> (Schema, TranslationContext) {
    let mut ctx = ctx;
    let mut fields = Vec::new();
    if let Some(extension) = el.child_named("extension") {
        let base_schema = extension
            .attr("base")
            .and_then(builtin_type)
            .unwrap_or(Schema::Any);
        fields.push((ObjectLabel::Mandatory("_value".to_string()), base_schema));
        for attribute in extension.children_named("attribute") {
            let (attr_schema, new_ctx) = translate_attribute(attribute, ctx);
            ctx = new_ctx;
            if let Some(name) = attribute.attr("name") {
                fields.push((ObjectLabel::Optional(format!("@{name}")), attr_schema));
            }
        }
    }
    (Schema::Object(fields), ctx)
}

fn translate_attribute(el: &XmlElement, ctx: TranslationContext) -> (Schema, TranslationContext) {
    if let Some(type_name) = el.attr("type") {
        return (builtin_type(type_name).unwrap_or(Schema::Any), ctx);
    }
    if let Some(simple_type) = el.child_named("simpleType") {
        return translate_simple_type(simple_type, ctx);
    }
    (
        Schema::Text {
            constraints: TextConstraints::default(),
            default: None,
        },
        ctx,
    )
}

/// `xs:sequence`/`xs:all` children: named `xs:element`s become object
/// fields; an anonymous child with no name is a Loss (spec's `Tuple` case
/// for positional anonymous sequences is not reconstructed here).
fn translate_particle_children(el: &XmlElement, ctx: TranslationContext) -> (Vec<(ObjectLabel, Schema)>, TranslationContext) {
    let mut ctx = ctx;
    let mut fields = Vec::new();
    for child in el.children_named("element") {
        let (schema, new_ctx) = translate_element(child, ctx);
        ctx = new_ctx;
        match child.attr("name") {
            Some(name) => {
                let optional = child.attr("minOccurs") == Some("0");
                let is_list = child
                    .attr("maxOccurs")
                    .map(|m| m == "unbounded" || m.parse::<u64>().map(|n| n > 1).unwrap_or(false))
                    .unwrap_or(false);
                let schema = if is_list {
                    Schema::ListOf {
                        element: Box::new(schema),
                        constraints: crate::schema::ListConstraints::default(),
                    }
                } else {
                    schema
                };
                let label = if optional {
                    ObjectLabel::Optional(name.to_string())
                } else {
                    ObjectLabel::Mandatory(name.to_string())
                };
                fields.push((label, schema));
            }
            None => ctx = ctx.add_loss("anonymous sequence member has no name; dropped"),
        }
    }
    (fields, ctx)
}

fn translate_choice(el: &XmlElement, ctx: TranslationContext) -> (Vec<Schema>, TranslationContext) {
    let mut ctx = ctx;
    let mut options = Vec::new();
    for child in el.children_named("element") {
        let (schema, new_ctx) = translate_element(child, ctx);
        ctx = new_ctx;
        options.push(schema);
    }
    (options, ctx)
}

fn translate_simple_type(el: &XmlElement, ctx: TranslationContext) -> (Schema, TranslationContext) {
    let Some(restriction) = el.child_named("restriction") else {
        return (Schema::Any, ctx.add_loss("xs:simpleType without xs:restriction is not supported"));
    };
    let base = restriction.attr("base").unwrap_or("string");
    let base_schema = builtin_type(base).unwrap_or(Schema::Text {
        constraints: TextConstraints::default(),
        default: None,
    });

    match base_schema {
        Schema::Text { mut constraints, default } => {
            let min_length = facet_i64(restriction, "minLength");
            let max_length = facet_i64(restriction, "maxLength");
            if min_length.is_some() || max_length.is_some() {
                constraints.size = Some(BoundedRange {
                    min: min_length.map(|v| Bound::new(BoundOp::MinInclusive, v)),
                    max: max_length.map(|v| Bound::new(BoundOp::MaxInclusive, v)),
                });
            }
            if let Some(pattern) = restriction.child_named("pattern").and_then(|p| p.attr("value")) {
                constraints.regex = Some(pattern.to_string());
            }
            let enumerations: Vec<String> = restriction
                .children_named("enumeration")
                .filter_map(|e| e.attr("value").map(str::to_string))
                .collect();
            if !enumerations.is_empty() {
                return (crate::schema::normalize(Schema::Enum(enumerations)), ctx);
            }
            (Schema::Text { constraints, default }, ctx)
        }
        Schema::Numeric { mut constraints, default } => {
            let min = facet_decimal(restriction, "minInclusive").map(|v| Bound::new(BoundOp::MinInclusive, v));
            let min_ex = facet_decimal(restriction, "minExclusive").map(|v| Bound::new(BoundOp::MinExclusive, v));
            let max = facet_decimal(restriction, "maxInclusive").map(|v| Bound::new(BoundOp::MaxInclusive, v));
            let max_ex = facet_decimal(restriction, "maxExclusive").map(|v| Bound::new(BoundOp::MaxExclusive, v));
            if min.is_some() || min_ex.is_some() || max.is_some() || max_ex.is_some() {
                constraints.value = Some(BoundedRange {
                    min: min.or(min_ex),
                    max: max.or(max_ex),
                });
            }
            (Schema::Numeric { constraints, default }, ctx)
        }
        other => (other, ctx),
    }
}

fn facet_i64(restriction: &XmlElement, facet: &str) -> Option<i64> {
    restriction.child_named(facet).and_then(|f| f.attr("value")).and_then(|v| v.parse().ok())
}

fn facet_decimal(restriction: &XmlElement, facet: &str) -> Option<rust_decimal::Decimal> {
    restriction
        .child_named(facet)
        .and_then(|f| f.attr("value"))
        .and_then(|v| crate::number::parse_decimal(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_simple_element_with_attributes() {
        let xml = r#"<?xml version="1.0"?>
        <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
          <xs:element name="person">
            <xs:complexType>
              <xs:sequence>
                <xs:element name="name" type="xs:string"/>
                <xs:element name="age" type="xs:integer" minOccurs="0"/>
              </xs:sequence>
              <xs:attribute name="id" type="xs:string" use="required"/>
            </xs:complexType>
          </xs:element>
        </xs:schema>"#;
        let result = import(xml).unwrap();
        match result.root {
            Schema::Object(fields) => {
                assert!(fields.iter().any(|(l, _)| l == &ObjectLabel::Mandatory("name".into())));
                assert!(fields.iter().any(|(l, _)| l == &ObjectLabel::Optional("age".into())));
                assert!(fields.iter().any(|(l, _)| l == &ObjectLabel::Mandatory("@id".into())));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn choice_translates_to_alternatives() {
        let xml = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
          <xs:element name="shape">
            <xs:complexType>
              <xs:choice>
                <xs:element name="circle" type="xs:string"/>
                <xs:element name="square" type="xs:string"/>
              </xs:choice>
            </xs:complexType>
          </xs:element>
        </xs:schema>"#;
        let result = import(xml).unwrap();
        assert!(matches!(result.root, Schema::Alternatives(_)));
    }

    #[test]
    fn simple_type_restriction_carries_length_bound() {
        let xml = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
          <xs:element name="code" type="Code"/>
          <xs:simpleType name="Code">
            <xs:restriction base="xs:string">
              <xs:minLength value="2"/>
              <xs:maxLength value="4"/>
            </xs:restriction>
          </xs:simpleType>
        </xs:schema>"#;
        let result = import(xml).unwrap();
        let code = result.definitions.get("Code").unwrap();
        match code {
            Schema::Text { constraints, .. } => assert!(constraints.size.is_some()),
            other => panic!("expected text, got {other:?}"),
        }
    }
}
