//! Component J — JSON Schema export, the inverse of §4.8's importer. Follows
//! the same per-variant dispatch shape as `json_schema_import.rs` but walks
//! the schema IR instead of JSON, emitting friction wherever the IR carries
//! more precision than JSON Schema can express (spec §4.9).

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::friction::FrictionReport;
use crate::schema::{BinaryEncoding, BoundOp, Schema, TimeConstraint, TimeFormat, Uniqueness};
use crate::translate::TranslationContext;

/// `rust_decimal::Decimal` carries no `serde` feature in this crate's
/// dependency table, so it has no `Serialize` impl; convert by hand instead
/// of widening the dependency just for export.
fn decimal_to_json(value: &Decimal) -> JsonValue {
    if let Ok(i) = value.to_string().parse::<i64>() {
        json!(i)
    } else {
        json!(value.to_string().parse::<f64>().unwrap_or(0.0))
    }
}

pub struct ExportResult {
    pub json: JsonValue,
    pub report: FrictionReport,
}

/// Export `root` plus every named definition as top-level `$defs` entries.
pub fn export(root: &Schema, definitions: &HashMap<String, Schema>) -> ExportResult {
    let mut ctx = TranslationContext::new();
    let (mut root_json, new_ctx) = export_schema(root, ctx);
    ctx = new_ctx;

    if !definitions.is_empty() {
        let mut defs = JsonMap::new();
        let mut names: Vec<&String> = definitions.keys().collect();
        names.sort();
        for name in names {
            let def_ctx = TranslationContext {
                path: format!("$/{name}"),
                ..ctx.clone()
            };
            let (def_json, new_ctx) = export_schema(&definitions[name], def_ctx);
            ctx.report = new_ctx.report;
            defs.insert(name.clone(), def_json);
        }
        if let JsonValue::Object(obj) = &mut root_json {
            obj.insert("$defs".to_string(), JsonValue::Object(defs));
        } else {
            root_json = json!({ "$defs": defs });
        }
    }

    ExportResult {
        json: root_json,
        report: ctx.report,
    }
}

fn export_schema(schema: &Schema, ctx: TranslationContext) -> (JsonValue, TranslationContext) {
    match schema {
        Schema::Any => (JsonValue::Bool(true), ctx),
        Schema::Fail => (JsonValue::Bool(false), ctx),
        Schema::Boolean { default } => {
            let mut obj = json_obj(&[("type", json!("boolean"))]);
            if let Some(d) = default {
                obj.insert("default".to_string(), json!(d));
            }
            (JsonValue::Object(obj), ctx)
        }
        Schema::Text { constraints, default } => {
            let mut obj = json_obj(&[("type", json!("string"))]);
            if let Some(size) = &constraints.size {
                if let Some(min) = &size.min {
                    obj.insert("minLength".to_string(), json!(min.value));
                }
                if let Some(max) = &size.max {
                    obj.insert("maxLength".to_string(), json!(max.value));
                }
            }
            if let Some(pattern) = &constraints.regex {
                obj.insert("pattern".to_string(), json!(pattern));
            }
            if let Some(format) = &constraints.format {
                obj.insert("format".to_string(), json!(format));
            }
            if let Some(d) = default {
                obj.insert("default".to_string(), json!(d));
            }
            (JsonValue::Object(obj), ctx)
        }
        Schema::GivenText(value) => (json!({ "const": value }), ctx),
        Schema::Numeric { constraints, default } => {
            let mut obj = json_obj(&[("type", json!(if constraints.integer { "integer" } else { "number" }))]);
            if let Some(range) = &constraints.value {
                if let Some(min) = &range.min {
                    let key = if min.op == BoundOp::MinExclusive { "exclusiveMinimum" } else { "minimum" };
                    obj.insert(key.to_string(), decimal_to_json(&min.value));
                }
                if let Some(max) = &range.max {
                    let key = if max.op == BoundOp::MaxExclusive { "exclusiveMaximum" } else { "maximum" };
                    obj.insert(key.to_string(), decimal_to_json(&max.value));
                }
            }
            if let Some(d) = default {
                obj.insert("default".to_string(), decimal_to_json(d));
            }
            (JsonValue::Object(obj), ctx)
        }
        Schema::Binary { constraints } => {
            let mut ctx = ctx;
            let mut obj = json_obj(&[("type", json!("string"))]);
            let encoding_name = match constraints.encoding {
                Some(BinaryEncoding::Base64) => "base64",
                Some(BinaryEncoding::Hex) => "hex",
                Some(BinaryEncoding::Base32) => "base32",
                Some(BinaryEncoding::Base58) => "base58",
                Some(BinaryEncoding::Ascii85) => "ascii85",
                None => "base64",
            };
            obj.insert("contentEncoding".to_string(), json!(encoding_name));
            if constraints.size.is_some() {
                ctx = ctx.add_loss("binary size constraints have no JSON Schema equivalent for content-encoded strings");
            }
            (JsonValue::Object(obj), ctx)
        }
        Schema::Time { constraints } => {
            let mut ctx = ctx;
            let mut obj = json_obj(&[("type", json!("string"))]);
            match constraints.first() {
                Some(TimeConstraint::Named(format)) => {
                    let name = match format {
                        TimeFormat::Iso8601DateTime | TimeFormat::Iso8601 | TimeFormat::Rfc3339 => "date-time",
                        TimeFormat::Iso8601Date => "date",
                        TimeFormat::Iso8601Time => "time",
                    };
                    obj.insert("format".to_string(), json!(name));
                }
                Some(TimeConstraint::Pattern(pattern)) => {
                    obj.insert("pattern".to_string(), json!(pattern));
                    ctx = ctx.add_approximation("time pattern exported as a plain string pattern, losing its time semantics");
                }
                None => {}
            }
            if constraints.len() > 1 {
                ctx = ctx.add_loss("only the first time constraint is exported; the rest are dropped");
            }
            (JsonValue::Object(obj), ctx)
        }
        Schema::Enum(values) => (json!({ "enum": values }), ctx),
        Schema::ListOf { element, constraints } => {
            let mut ctx = ctx;
            let (element_json, new_ctx) = export_schema(element, ctx.at_path("items"));
            ctx.report = new_ctx.report;
            let mut obj = json_obj(&[("type", json!("array")), ("items", element_json)]);
            if let Some(size) = &constraints.size {
                if let Some(min) = &size.min {
                    obj.insert("minItems".to_string(), json!(min.value));
                }
                if let Some(max) = &size.max {
                    obj.insert("maxItems".to_string(), json!(max.value));
                }
            }
            for u in &constraints.unique {
                match u {
                    Uniqueness::Simple => {
                        obj.insert("uniqueItems".to_string(), json!(true));
                    }
                    Uniqueness::ByFields(fields) => {
                        ctx = ctx.add_loss(format!("uniqueness by fields {fields:?} cannot be represented"));
                    }
                }
            }
            (JsonValue::Object(obj), ctx)
        }
        Schema::Tuple(items) => {
            let mut ctx = ctx;
            let mut prefix = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let (item_json, new_ctx) = export_schema(item, ctx.at_path(format!("[{i}]")));
                ctx.report = new_ctx.report;
                prefix.push(item_json);
            }
            (json!({ "type": "array", "prefixItems": prefix, "items": false }), ctx)
        }
        Schema::Alternatives(options) => {
            let mut ctx = ctx;
            let mut out = Vec::with_capacity(options.len());
            for (i, option) in options.iter().enumerate() {
                let (option_json, new_ctx) = export_schema(option, ctx.at_path(format!("[{i}]")));
                ctx.report = new_ctx.report;
                out.push(option_json);
            }
            (json!({ "anyOf": out }), ctx)
        }
        Schema::Object(fields) => {
            let mut ctx = ctx;
            let mut properties = JsonMap::new();
            let mut required = Vec::new();
            for (label, field_schema) in fields {
                let (field_json, new_ctx) = export_schema(field_schema, ctx.at_path(label.name()));
                ctx.report = new_ctx.report;
                properties.insert(label.name().to_string(), field_json);
                if !label.is_optional() {
                    required.push(label.name().to_string());
                }
            }
            let mut obj = json_obj(&[("type", json!("object")), ("properties", JsonValue::Object(properties))]);
            if !required.is_empty() {
                obj.insert("required".to_string(), json!(required));
            }
            (JsonValue::Object(obj), ctx)
        }
        Schema::Map(inner) => {
            let (inner_json, ctx) = export_schema(inner, ctx.at_path("additionalProperties"));
            (json!({ "type": "object", "additionalProperties": inner_json }), ctx)
        }
        Schema::Ref(name) => (json!({ "$ref": format!("#/$defs/{name}") }), ctx),
        Schema::ScopedRef { namespace, name } => {
            let ctx = ctx.add_approximation("scoped reference exported as a relative file path, not portable to every JSON Schema consumer");
            (json!({ "$ref": format!("{namespace}.json#/$defs/{name}") }), ctx)
        }
        Schema::Import { namespace, .. } => (
            JsonValue::Bool(true),
            ctx.add_loss(format!("unresolved import {namespace:?} exported as Any")),
        ),
        Schema::Documented { doc, inner } => {
            let (inner_json, ctx) = export_schema(inner, ctx);
            (attach(inner_json, "description", json!(doc)), ctx)
        }
        Schema::Deprecated(inner) => {
            let (inner_json, ctx) = export_schema(inner, ctx);
            (attach(inner_json, "deprecated", json!(true)), ctx)
        }
    }
}

fn json_obj(fields: &[(&str, JsonValue)]) -> JsonMap<String, JsonValue> {
    fields.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// JSON Schema's `true`/`false` boolean forms can't carry extra keys; widen
/// them to the equivalent object shape before attaching metadata.
fn attach(value: JsonValue, key: &str, attached: JsonValue) -> JsonValue {
    let mut obj = match value {
        JsonValue::Object(obj) => obj,
        JsonValue::Bool(true) => JsonMap::new(),
        JsonValue::Bool(false) => json_obj(&[("not", json!({}))]),
        other => {
            let mut obj = JsonMap::new();
            obj.insert("const".to_string(), other);
            obj
        }
    };
    obj.insert(key.to_string(), attached);
    JsonValue::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Bound, BoundedRange, NumericConstraints, ObjectLabel};

    #[test]
    fn any_and_fail_export_to_json_booleans() {
        assert_eq!(export(&Schema::Any, &HashMap::new()).json, JsonValue::Bool(true));
        assert_eq!(export(&Schema::Fail, &HashMap::new()).json, JsonValue::Bool(false));
    }

    #[test]
    fn exclusive_bound_exports_to_exclusive_minimum() {
        let schema = Schema::Numeric {
            constraints: NumericConstraints {
                value: Some(BoundedRange {
                    min: Some(Bound::new(BoundOp::MinExclusive, rust_decimal::Decimal::from(0))),
                    max: None,
                }),
                integer: false,
            },
            default: None,
        };
        let result = export(&schema, &HashMap::new());
        assert_eq!(result.json["exclusiveMinimum"], json!(0));
    }

    #[test]
    fn unique_by_fields_exports_as_loss() {
        let schema = Schema::ListOf {
            element: Box::new(Schema::Any),
            constraints: crate::schema::ListConstraints {
                size: None,
                unique: vec![Uniqueness::ByFields(vec!["id".into()])],
            },
        };
        let result = export(&schema, &HashMap::new());
        assert_eq!(result.report.entries().len(), 1);
    }

    #[test]
    fn object_required_fields_round_trip_through_required_array() {
        let schema = Schema::Object(vec![
            (ObjectLabel::Mandatory("a".into()), Schema::Any),
            (ObjectLabel::Optional("b".into()), Schema::Any),
        ]);
        let result = export(&schema, &HashMap::new());
        assert_eq!(result.json["required"], json!(["a"]));
    }
}
