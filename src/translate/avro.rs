//! Component J — Avro import/export (spec §4.9). Avro schemas are JSON, so
//! this reuses `serde_json::Value` exactly like `json_schema_import.rs`
//! rather than reaching for a dedicated Avro crate.

use std::collections::HashMap;

use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::error::SchemaError;
use crate::friction::FrictionReport;
use crate::schema::{BinaryConstraints, ListConstraints, NumericConstraints, ObjectLabel, Schema};
use crate::translate::TranslationContext;

pub struct ImportResult {
    pub root: Schema,
    pub definitions: HashMap<String, Schema>,
    pub report: FrictionReport,
}

pub fn import(text: &str) -> Result<ImportResult, SchemaError> {
    let json: JsonValue = serde_json::from_str(text).map_err(|e| SchemaError::TranslatorFatal {
        translator: "avro-import".to_string(),
        message: e.to_string(),
    })?;
    let mut definitions = HashMap::new();
    let ctx = TranslationContext::new();
    let (root, ctx) = translate(&json, ctx, &mut definitions);
    Ok(ImportResult {
        root,
        definitions,
        report: ctx.report,
    })
}

fn translate(
    json: &JsonValue,
    ctx: TranslationContext,
    definitions: &mut HashMap<String, Schema>,
) -> (Schema, TranslationContext) {
    match json {
        JsonValue::String(name) => translate_primitive(name, ctx),
        JsonValue::Array(members) => translate_union(members, ctx, definitions),
        JsonValue::Object(obj) => translate_named(obj, ctx, definitions),
        _ => (Schema::Any, ctx.add_loss("unsupported Avro schema shape")),
    }
}

fn translate_primitive(name: &str, ctx: TranslationContext) -> (Schema, TranslationContext) {
    match name {
        "null" => (Schema::Any, ctx.add_approximation("Avro null approximated as Any")),
        "boolean" => (Schema::Boolean { default: None }, ctx),
        "int" | "long" => (
            Schema::Numeric {
                constraints: NumericConstraints { value: None, integer: true },
                default: None,
            },
            ctx,
        ),
        "float" | "double" => (
            Schema::Numeric {
                constraints: NumericConstraints::default(),
                default: None,
            },
            ctx,
        ),
        "bytes" => (
            Schema::Binary {
                constraints: BinaryConstraints::default(),
            },
            ctx,
        ),
        "string" => (
            Schema::Text {
                constraints: Default::default(),
                default: None,
            },
            ctx,
        ),
        other => (Schema::Any, ctx.add_loss(format!("unknown Avro primitive {other:?}"))),
    }
}

/// `["null", T]` (in either order) is Avro's optionality idiom; anything
/// else is a genuine union of incompatible wire shapes (spec §4.9).
fn translate_union(
    members: &[JsonValue],
    ctx: TranslationContext,
    definitions: &mut HashMap<String, Schema>,
) -> (Schema, TranslationContext) {
    let has_null = members.iter().any(|m| m.as_str() == Some("null"));
    let non_null: Vec<&JsonValue> = members.iter().filter(|m| m.as_str() != Some("null")).collect();
    let mut ctx = ctx;
    if has_null && non_null.len() == 1 {
        let (schema, new_ctx) = translate(non_null[0], ctx, definitions);
        ctx = new_ctx.add_approximation("nullable Avro union carried as a plain schema; optionality belongs to the enclosing field");
        return (schema, ctx);
    }
    let mut options = Vec::with_capacity(members.len());
    for member in members {
        let (schema, new_ctx) = translate(member, ctx, definitions);
        ctx = new_ctx;
        options.push(schema);
    }
    (crate::schema::normalize(Schema::Alternatives(options)), ctx)
}

fn translate_named(
    obj: &JsonMap<String, JsonValue>,
    ctx: TranslationContext,
    definitions: &mut HashMap<String, Schema>,
) -> (Schema, TranslationContext) {
    let type_name = obj.get("type").and_then(JsonValue::as_str).unwrap_or("");
    match type_name {
        "record" => translate_record(obj, ctx, definitions),
        "enum" => translate_enum(obj, ctx),
        "array" => translate_array(obj, ctx, definitions),
        "map" => translate_map(obj, ctx, definitions),
        "fixed" => translate_fixed(obj, ctx),
        "" => (Schema::Any, ctx.add_loss("Avro schema object is missing a type")),
        primitive => translate_primitive(primitive, ctx),
    }
}

fn translate_record(
    obj: &JsonMap<String, JsonValue>,
    ctx: TranslationContext,
    definitions: &mut HashMap<String, Schema>,
) -> (Schema, TranslationContext) {
    let mut ctx = ctx;
    let mut fields = Vec::new();
    if let Some(field_list) = obj.get("fields").and_then(JsonValue::as_array) {
        for field in field_list {
            let Some(field_obj) = field.as_object() else { continue };
            let Some(name) = field_obj.get("name").and_then(JsonValue::as_str) else { continue };
            let field_ctx = ctx.at_path(name);
            let (schema, new_ctx) = match field_obj.get("type") {
                Some(t) => translate(t, field_ctx, definitions),
                None => (Schema::Any, field_ctx),
            };
            ctx.report = new_ctx.report;
            let optional = matches!(field.get("type"), Some(JsonValue::Array(members)) if members.iter().any(|m| m.as_str() == Some("null")));
            let label = if optional {
                ObjectLabel::Optional(name.to_string())
            } else {
                ObjectLabel::Mandatory(name.to_string())
            };
            fields.push((label, schema));
        }
    }
    let schema = Schema::Object(fields);
    if let Some(name) = obj.get("name").and_then(JsonValue::as_str) {
        definitions.insert(name.to_string(), schema.clone());
    }
    (schema, ctx)
}

fn translate_enum(obj: &JsonMap<String, JsonValue>, ctx: TranslationContext) -> (Schema, TranslationContext) {
    let symbols: Vec<String> = obj
        .get("symbols")
        .and_then(JsonValue::as_array)
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default();
    (crate::schema::normalize(Schema::Enum(symbols)), ctx)
}

fn translate_array(
    obj: &JsonMap<String, JsonValue>,
    ctx: TranslationContext,
    definitions: &mut HashMap<String, Schema>,
) -> (Schema, TranslationContext) {
    let items = obj.get("items").cloned().unwrap_or(json!("null"));
    let (element, ctx) = translate(&items, ctx.at_path("items"), definitions);
    (
        Schema::ListOf {
            element: Box::new(element),
            constraints: ListConstraints::default(),
        },
        ctx,
    )
}

fn translate_map(
    obj: &JsonMap<String, JsonValue>,
    ctx: TranslationContext,
    definitions: &mut HashMap<String, Schema>,
) -> (Schema, TranslationContext) {
    let values = obj.get("values").cloned().unwrap_or(json!("null"));
    let (inner, ctx) = translate(&values, ctx.at_path("values"), definitions);
    (Schema::Map(Box::new(inner)), ctx)
}

fn translate_fixed(obj: &JsonMap<String, JsonValue>, ctx: TranslationContext) -> (Schema, TranslationContext) {
    let size = obj.get("size").and_then(JsonValue::as_u64);
    let ctx = ctx.add_loss("Avro fixed size is carried as an exact byte-size bound, losing the named-type identity");
    (
        Schema::Binary {
            constraints: BinaryConstraints {
                size: size.map(|s| crate::schema::BoundedRange {
                    min: Some(crate::schema::Bound::new(crate::schema::BoundOp::MinInclusive, s)),
                    max: Some(crate::schema::Bound::new(crate::schema::BoundOp::MaxInclusive, s)),
                }),
                encoding: None,
            },
        },
        ctx,
    )
}

/// Export is grounded in the same per-variant shape as `json_schema_export.rs`;
/// logical-type friction is the main source of loss going the other way.
pub fn export(schema: &Schema, name: &str) -> (JsonValue, FrictionReport) {
    let ctx = TranslationContext::new();
    let (json, ctx) = export_schema(schema, name, ctx);
    (json, ctx.report)
}

fn export_schema(schema: &Schema, name: &str, ctx: TranslationContext) -> (JsonValue, TranslationContext) {
    match schema {
        Schema::Any => (json!("null"), ctx.add_approximation("Any exported as Avro null")),
        Schema::Fail => (json!("null"), ctx.add_loss("Fail has no Avro equivalent; exported as null")),
        Schema::Boolean { .. } => (json!("boolean"), ctx),
        Schema::Text { .. } | Schema::GivenText(_) | Schema::Enum(_) => match schema {
            Schema::Enum(values) => (
                json!({ "type": "enum", "name": name, "symbols": values }),
                ctx,
            ),
            _ => (json!("string"), ctx),
        },
        Schema::Numeric { constraints, .. } => {
            (json!(if constraints.integer { "long" } else { "double" }), ctx)
        }
        Schema::Binary { .. } => (json!("bytes"), ctx),
        Schema::Time { constraints } => {
            let ctx = ctx.add_approximation("time constraint exported as a plain string; Avro logical-type metadata is not attached");
            let _ = constraints;
            (json!("string"), ctx)
        }
        Schema::ListOf { element, .. } => {
            let (items, ctx) = export_schema(element, name, ctx);
            (json!({ "type": "array", "items": items }), ctx)
        }
        Schema::Tuple(_) | Schema::Alternatives(_) => {
            (json!("string"), ctx.add_loss("tuples and general alternatives have no direct Avro shape"))
        }
        Schema::Object(fields) => {
            let mut ctx = ctx;
            let mut out_fields = Vec::with_capacity(fields.len());
            for (label, field_schema) in fields {
                let (field_type, new_ctx) = export_schema(field_schema, label.name(), ctx.at_path(label.name()));
                ctx.report = new_ctx.report;
                let field_type = if label.is_optional() {
                    json!(["null", field_type])
                } else {
                    field_type
                };
                out_fields.push(json!({ "name": label.name(), "type": field_type }));
            }
            (
                json!({ "type": "record", "name": name, "fields": out_fields }),
                ctx,
            )
        }
        Schema::Map(inner) => {
            let (values, ctx) = export_schema(inner, name, ctx);
            (json!({ "type": "map", "values": values }), ctx)
        }
        Schema::Ref(r) => (json!(r), ctx),
        Schema::ScopedRef { name: n, .. } => (json!(n), ctx),
        Schema::Import { namespace, .. } => (
            json!("null"),
            ctx.add_loss(format!("unresolved import {namespace:?} exported as null")),
        ),
        Schema::Documented { inner, .. } | Schema::Deprecated(inner) => export_schema(inner, name, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_union_is_approximated_as_the_non_null_branch() {
        let text = r#"["null", "string"]"#;
        let result = import(text).unwrap();
        assert_eq!(
            result.root,
            Schema::Text {
                constraints: Default::default(),
                default: None
            }
        );
    }

    #[test]
    fn record_fields_become_object_labels() {
        let text = r#"{
            "type": "record", "name": "User",
            "fields": [
                {"name": "id", "type": "long"},
                {"name": "nickname", "type": ["null", "string"]}
            ]
        }"#;
        let result = import(text).unwrap();
        match result.root {
            Schema::Object(fields) => {
                assert!(fields.iter().any(|(l, _)| l == &ObjectLabel::Mandatory("id".into())));
                assert!(fields.iter().any(|(l, _)| l == &ObjectLabel::Optional("nickname".into())));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn fixed_exports_to_exact_byte_size_with_loss() {
        let text = r#"{"type": "fixed", "name": "Hash", "size": 16}"#;
        let result = import(text).unwrap();
        assert!(matches!(result.root, Schema::Binary { .. }));
        assert_eq!(result.report.entries().len(), 1);
    }
}
