//! Component I — the JSON Schema importer (spec §4.8). The largest and most
//! dialect-specific translator; grounded in how `regorus::scheduler` resolves
//! a dependency graph via a worklist (queue names, dequeue, discover more,
//! stop when empty) — the same shape drives §4.8.4's definitions pass here,
//! just over JSON Schema `$defs` names instead of Rego rule dependencies.

use std::collections::{HashMap, HashSet, VecDeque};

use rust_decimal::Decimal;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::SchemaError;
use crate::friction::FrictionReport;
use crate::schema::{
    BinaryConstraints, BinaryEncoding, Bound, BoundOp, BoundedRange, ListConstraints, NumericConstraints,
    ObjectLabel, Schema, TextConstraints, TimeConstraint, TimeFormat, Uniqueness,
};
use crate::translate::{NoOpFetcher, SchemaFetcher, TranslationContext};

pub struct ImportResult {
    pub root: Schema,
    pub definitions: HashMap<String, Schema>,
    pub report: FrictionReport,
}

pub fn import(text: &str) -> Result<ImportResult, SchemaError> {
    import_with_fetcher(text, &NoOpFetcher)
}

pub fn import_with_fetcher(text: &str, fetcher: &dyn SchemaFetcher) -> Result<ImportResult, SchemaError> {
    let root_json: JsonValue = serde_json::from_str(text).map_err(|e| SchemaError::TranslatorFatal {
        translator: "json-schema-import".to_string(),
        message: e.to_string(),
    })?;

    let importer = Importer {
        root_json: root_json.clone(),
        fetcher,
        fetched_cache: Default::default(),
    };

    let ctx = TranslationContext::new();
    let (root, ctx) = importer.translate(&root_json, ctx)?;

    let mut definitions = HashMap::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = ctx.referenced_defs.iter().cloned().collect();
    let mut report = ctx.report;
    let mut referenced_defs = ctx.referenced_defs;

    while let Some(name) = queue.pop_front() {
        if !seen.insert(name.clone()) {
            continue;
        }
        let def_path = format!("$/{name}");
        match lookup_def(&root_json, &name) {
            Some(def_json) => {
                let def_ctx = TranslationContext {
                    path: def_path,
                    report,
                    resolved_refs: HashSet::new(),
                    referenced_defs: referenced_defs.clone(),
                };
                let (schema, new_ctx) = importer.translate(def_json, def_ctx)?;
                report = new_ctx.report;
                for discovered in &new_ctx.referenced_defs {
                    if !seen.contains(discovered) {
                        queue.push_back(discovered.clone());
                    }
                }
                referenced_defs = new_ctx.referenced_defs;
                definitions.insert(name, schema);
            }
            None => {
                report.push(crate::friction::FrictionEntry {
                    kind: crate::friction::FrictionKind::Loss,
                    path: def_path,
                    message: format!("definition {name:?} was referenced but not found"),
                    suggestion: None,
                });
            }
        }
    }

    Ok(ImportResult { root, definitions, report })
}

fn lookup_def<'a>(root: &'a JsonValue, name: &str) -> Option<&'a JsonValue> {
    root.get("$defs")
        .and_then(|d| d.get(name))
        .or_else(|| root.get("definitions").and_then(|d| d.get(name)))
}

struct Importer<'a> {
    root_json: JsonValue,
    fetcher: &'a dyn SchemaFetcher,
    fetched_cache: std::cell::RefCell<HashMap<String, JsonValue>>,
}

/// Restore `original`'s path and cycle-guard state while keeping the report
/// and discovered-definitions set produced by a nested translation. Mirrors
/// how a recursive call's local variables unwind on return while its
/// side-effects (accumulated friction, discovered refs) persist.
fn unwind(original: &TranslationContext, schema: Schema, nested: TranslationContext) -> (Schema, TranslationContext) {
    (
        schema,
        TranslationContext {
            path: original.path.clone(),
            report: nested.report,
            resolved_refs: original.resolved_refs.clone(),
            referenced_defs: nested.referenced_defs,
        },
    )
}

impl<'a> Importer<'a> {
    fn translate(
        &self,
        json: &JsonValue,
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        let (schema, ctx) = self.translate_inner(json, ctx)?;
        Ok(self.wrap_metadata(json, schema, ctx))
    }

    fn translate_inner(
        &self,
        json: &JsonValue,
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        match json {
            JsonValue::Bool(true) => Ok((Schema::Any, ctx)),
            JsonValue::Bool(false) => Ok((Schema::Fail, ctx)),
            JsonValue::Object(obj) => {
                if let Some(reference) = obj.get("$ref").and_then(JsonValue::as_str) {
                    return self.resolve_ref(reference, ctx);
                }
                match obj.get("type") {
                    Some(JsonValue::String(t)) => self.translate_by_type(t, obj, ctx),
                    Some(JsonValue::Array(types)) => self.translate_type_array(types, obj, ctx),
                    _ => self.translate_untyped(obj, ctx),
                }
            }
            JsonValue::Array(_) => Ok((
                Schema::Any,
                ctx.add_loss("a bare JSON array is not a valid schema shape"),
            )),
            _ => Ok((Schema::Any, ctx.add_loss("unsupported schema shape"))),
        }
    }

    fn wrap_metadata(
        &self,
        json: &JsonValue,
        schema: Schema,
        ctx: TranslationContext,
    ) -> (Schema, TranslationContext) {
        if matches!(schema, Schema::Ref(_) | Schema::ScopedRef { .. }) {
            return (schema, ctx);
        }
        let obj = match json.as_object() {
            Some(o) => o,
            None => return (schema, ctx),
        };
        let mut schema = schema;
        if let Some(description) = obj.get("description").and_then(JsonValue::as_str) {
            schema = Schema::documented(description, schema);
        }
        if obj.get("deprecated") == Some(&JsonValue::Bool(true)) {
            schema = Schema::deprecated(schema);
        }
        (schema, ctx)
    }

    fn resolve_ref(
        &self,
        reference: &str,
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        if let Some(name) = exact_def_ref(reference) {
            return Ok((Schema::Ref(name.to_string()), ctx.add_referenced_def(name)));
        }
        if reference == "#" {
            if ctx.is_resolving_ref("#") {
                return Ok((Schema::Ref("root".to_string()), ctx));
            }
            let nested_ctx = ctx.with_resolved_ref("#");
            let (schema, nested_ctx) = self.translate(&self.root_json, nested_ctx)?;
            return Ok(unwind(&ctx, schema, nested_ctx));
        }
        if let Some(pointer) = reference.strip_prefix('#') {
            if !pointer.is_empty() {
                if ctx.is_resolving_ref(reference) {
                    let sanitized = sanitize_pointer(pointer);
                    return Ok((Schema::Ref(sanitized), ctx));
                }
                return match resolve_json_pointer(&self.root_json, pointer) {
                    Some(target) => {
                        let target = target.clone();
                        let nested_ctx = ctx.with_resolved_ref(reference);
                        let (schema, nested_ctx) = self.translate(&target, nested_ctx)?;
                        Ok(unwind(&ctx, schema, nested_ctx))
                    }
                    None => Ok((
                        Schema::Any,
                        ctx.add_loss(format!("JSON pointer {reference:?} did not resolve")),
                    )),
                };
            }
            // Anchor form `#name` (not a `/`-rooted pointer).
            return Ok((
                Schema::Any,
                ctx.add_approximation(format!("anchor reference {reference:?} approximated as Any")),
            ));
        }
        if reference.contains("://") {
            return self.resolve_url_ref(reference, ctx);
        }
        // Filesystem path, optionally with a `#fragment`.
        let (file_part, fragment) = match reference.split_once('#') {
            Some((f, frag)) => (f, Some(frag)),
            None => (reference, None),
        };
        let namespace = file_stem(file_part);
        let name = fragment
            .map(|f| f.rsplit('/').next().unwrap_or("").to_string())
            .unwrap_or_default();
        Ok((Schema::ScopedRef { namespace, name }, ctx))
    }

    fn resolve_url_ref(
        &self,
        reference: &str,
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        let (base, fragment) = match reference.split_once('#') {
            Some((b, f)) => (b, f),
            None => (reference, ""),
        };
        if ctx.is_resolving_ref(reference) {
            return Ok((Schema::Ref(sanitize_pointer(reference)), ctx));
        }
        let cached = self.fetched_cache.borrow().get(base).cloned();
        let document = match cached {
            Some(doc) => doc,
            None => match self.fetcher.fetch(base) {
                Ok(text) => match serde_json::from_str::<JsonValue>(&text) {
                    Ok(doc) => {
                        self.fetched_cache.borrow_mut().insert(base.to_string(), doc.clone());
                        doc
                    }
                    Err(e) => {
                        return Ok((
                            Schema::Any,
                            ctx.add_loss(format!("fetched {base} was not valid JSON: {e}")),
                        ))
                    }
                },
                Err(e) => {
                    return Ok((
                        Schema::Any,
                        ctx.add_loss(format!("could not fetch {base}: {e}")),
                    ))
                }
            },
        };
        let mut ctx = ctx;
        ctx.report.record_fetched_url(base);
        let target = if fragment.is_empty() {
            Some(document.clone())
        } else {
            resolve_json_pointer(&document, fragment).cloned()
        };
        match target {
            Some(target) => {
                let nested_ctx = ctx.with_resolved_ref(reference);
                let (schema, nested_ctx) = self.translate(&target, nested_ctx)?;
                Ok(unwind(&ctx, schema, nested_ctx))
            }
            None => Ok((
                Schema::Any,
                ctx.add_loss(format!("fragment {fragment:?} did not resolve within {base}")),
            )),
        }
    }

    fn translate_by_type(
        &self,
        type_name: &str,
        obj: &JsonMap<String, JsonValue>,
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        match type_name {
            "string" => Ok(self.translate_string(obj, ctx)),
            "number" => Ok(self.translate_numeric(false, obj, ctx)),
            "integer" => Ok(self.translate_numeric(true, obj, ctx)),
            "boolean" => Ok(self.translate_boolean(obj, ctx)),
            "null" => Ok((
                Schema::Any,
                ctx.add_approximation("null type approximated as Any; nullability is expressed via optional object labels"),
            )),
            "array" => self.translate_array(obj, ctx),
            "object" => self.translate_object(obj, ctx),
            other => Ok((Schema::Any, ctx.add_loss(format!("unknown JSON Schema type {other:?}")))),
        }
    }

    fn translate_type_array(
        &self,
        types: &[JsonValue],
        obj: &JsonMap<String, JsonValue>,
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        let mut ctx = ctx;
        let mut options = Vec::new();
        for t in types {
            let Some(name) = t.as_str() else { continue };
            if name == "null" {
                continue;
            }
            let (schema, new_ctx) = self.translate_by_type(name, obj, ctx)?;
            ctx = new_ctx;
            options.push(schema);
        }
        Ok((crate::schema::normalize(Schema::Alternatives(options)), ctx))
    }

    fn translate_untyped(
        &self,
        obj: &JsonMap<String, JsonValue>,
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        if let Some(members) = obj.get("anyOf").and_then(JsonValue::as_array) {
            return self.translate_union(members, ctx);
        }
        if let Some(members) = obj.get("oneOf").and_then(JsonValue::as_array) {
            return self.translate_union(members, ctx);
        }
        if obj.contains_key("allOf") {
            return self.translate_object(obj, ctx);
        }
        if obj.contains_key("not") {
            return Ok((Schema::Any, ctx.add_loss("\"not\" has no schema-IR equivalent")));
        }
        if let Some(c) = obj.get("const") {
            return Ok((self.translate_const(c), ctx));
        }
        if let Some(values) = obj.get("enum").and_then(JsonValue::as_array) {
            return Ok(self.translate_enum(values, ctx));
        }
        if obj.contains_key("properties") || obj.contains_key("additionalProperties") {
            return self.translate_object(obj, ctx);
        }
        Ok((Schema::Any, ctx))
    }

    fn translate_union(
        &self,
        members: &[JsonValue],
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        let mut ctx = ctx;
        let mut options = Vec::with_capacity(members.len());
        for member in members {
            let (schema, new_ctx) = self.translate(member, ctx)?;
            ctx = new_ctx;
            options.push(schema);
        }
        Ok((crate::schema::normalize(Schema::Alternatives(options)), ctx))
    }

    fn translate_const(&self, value: &JsonValue) -> Schema {
        match value {
            JsonValue::String(s) => Schema::GivenText(s.clone()),
            JsonValue::Number(n) => Schema::Numeric {
                constraints: NumericConstraints {
                    value: Some(BoundedRange {
                        min: Some(Bound::new(BoundOp::Exact, json_number_to_decimal(n))),
                        max: None,
                    }),
                    integer: n.is_i64() || n.is_u64(),
                },
                default: None,
            },
            _ => Schema::Any,
        }
    }

    fn translate_enum(&self, values: &[JsonValue], ctx: TranslationContext) -> (Schema, TranslationContext) {
        let mut ctx = ctx;
        let mut out = Vec::with_capacity(values.len());
        for v in values {
            match v {
                JsonValue::String(s) => out.push(s.clone()),
                other => {
                    ctx = ctx.add_approximation(format!("non-string enum member {other} stringified"));
                    out.push(other.to_string());
                }
            }
        }
        (crate::schema::normalize(Schema::Enum(out)), ctx)
    }

    fn translate_boolean(&self, obj: &JsonMap<String, JsonValue>, ctx: TranslationContext) -> (Schema, TranslationContext) {
        let default = obj.get("default").and_then(JsonValue::as_bool);
        (Schema::Boolean { default }, ctx)
    }

    fn translate_string(&self, obj: &JsonMap<String, JsonValue>, ctx: TranslationContext) -> (Schema, TranslationContext) {
        let mut ctx = ctx;
        let size = int_range(obj, "minLength", "maxLength");
        let regex = obj.get("pattern").and_then(JsonValue::as_str).map(str::to_string);
        let default = obj.get("default").and_then(JsonValue::as_str).map(str::to_string);
        let mut text_constraints = TextConstraints {
            size,
            regex,
            format: None,
        };

        if let Some(format) = obj.get("format").and_then(JsonValue::as_str) {
            match format {
                "date-time" => {
                    return (
                        Schema::Time {
                            constraints: vec![TimeConstraint::Named(TimeFormat::Iso8601DateTime)],
                        },
                        ctx,
                    )
                }
                "date" => {
                    return (
                        Schema::Time {
                            constraints: vec![TimeConstraint::Named(TimeFormat::Iso8601Date)],
                        },
                        ctx,
                    )
                }
                "time" => {
                    return (
                        Schema::Time {
                            constraints: vec![TimeConstraint::Named(TimeFormat::Iso8601Time)],
                        },
                        ctx,
                    )
                }
                "byte" => {
                    return (
                        Schema::Binary {
                            constraints: BinaryConstraints {
                                size: None,
                                encoding: Some(BinaryEncoding::Base64),
                            },
                        },
                        ctx,
                    )
                }
                "email" | "uri" | "uuid" | "ipv4" | "ipv6" | "hostname" => {
                    text_constraints.format = Some(format.to_string());
                }
                other => {
                    text_constraints.format = Some(other.to_string());
                    ctx = ctx.add_extension(format!("string format {other:?} is a dialect extension"));
                }
            }
        }
        (
            Schema::Text {
                constraints: text_constraints,
                default,
            },
            ctx,
        )
    }

    fn translate_numeric(
        &self,
        integer: bool,
        obj: &JsonMap<String, JsonValue>,
        ctx: TranslationContext,
    ) -> (Schema, TranslationContext) {
        let mut ctx = ctx;
        let inclusive = decimal_range(obj, "minimum", "maximum");
        let exclusive = decimal_exclusive_range(obj, "exclusiveMinimum", "exclusiveMaximum");
        let value = match (inclusive, exclusive) {
            (Some(a), Some(b)) => Some(a.merge(&b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        };
        if obj.contains_key("multipleOf") {
            ctx = ctx.add_loss("multipleOf cannot be represented");
        }
        let default = obj.get("default").and_then(json_value_to_decimal_opt);
        (
            Schema::Numeric {
                constraints: NumericConstraints { value, integer },
                default,
            },
            ctx,
        )
    }

    fn translate_array(
        &self,
        obj: &JsonMap<String, JsonValue>,
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        let items = obj.get("items");
        let prefix_items = obj.get("prefixItems").and_then(JsonValue::as_array);

        if let Some(prefix) = prefix_items {
            if items.is_none() || items == Some(&JsonValue::Bool(false)) {
                return self.translate_tuple(prefix, ctx);
            }
        }
        if let Some(JsonValue::Array(tuple_items)) = items {
            return self.translate_tuple(tuple_items, ctx);
        }

        let element_json = items.cloned().unwrap_or(JsonValue::Bool(true));
        let (element, mut ctx) = self.translate(&element_json, ctx)?;

        let size = int_range(obj, "minItems", "maxItems");
        let mut unique = Vec::new();
        if obj.get("uniqueItems") == Some(&JsonValue::Bool(true)) {
            unique.push(Uniqueness::Simple);
        }
        if obj.contains_key("contains") || obj.contains_key("minContains") || obj.contains_key("maxContains") {
            ctx = ctx.add_loss("contains/minContains/maxContains cannot be represented");
        }

        Ok((
            Schema::ListOf {
                element: Box::new(element),
                constraints: ListConstraints { size, unique },
            },
            ctx,
        ))
    }

    fn translate_tuple(
        &self,
        items: &[JsonValue],
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        let mut ctx = ctx;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let (schema, new_ctx) = self.translate(item, ctx)?;
            ctx = new_ctx;
            out.push(schema);
        }
        Ok((crate::schema::normalize(Schema::Tuple(out)), ctx))
    }

    fn translate_object(
        &self,
        obj: &JsonMap<String, JsonValue>,
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        let mut ctx = ctx;

        let mut merged_fields: Vec<(ObjectLabel, Schema)> = Vec::new();
        let mut saw_object_member = false;
        let mut saw_non_object_member = false;

        if let Some(members) = obj.get("allOf").and_then(JsonValue::as_array) {
            for member in members {
                let (schema, new_ctx) = self.translate_inlined(member, ctx)?;
                ctx = new_ctx;
                match schema.unwrap_metadata() {
                    Schema::Object(fields) => {
                        saw_object_member = true;
                        merge_fields(&mut merged_fields, fields);
                    }
                    Schema::Alternatives(options) => {
                        for option in options {
                            if let Schema::Object(fields) = option.unwrap_metadata() {
                                saw_object_member = true;
                                merge_fields(&mut merged_fields, fields);
                            }
                        }
                    }
                    _ => saw_non_object_member = true,
                }
            }
            if saw_non_object_member {
                ctx = if saw_object_member {
                    ctx.add_approximation("non-object allOf member ignored")
                } else {
                    ctx.add_loss("allOf intersection with non-object members is not preserved")
                };
            }
        }

        if let Some(properties) = obj.get("properties").and_then(JsonValue::as_object) {
            let required: HashSet<&str> = obj
                .get("required")
                .and_then(JsonValue::as_array)
                .map(|r| r.iter().filter_map(JsonValue::as_str).collect())
                .unwrap_or_default();
            for (name, prop_json) in properties {
                let (schema, new_ctx) = self.translate(prop_json, ctx)?;
                ctx = new_ctx;
                let label = if required.contains(name.as_str()) {
                    ObjectLabel::Mandatory(name.clone())
                } else {
                    ObjectLabel::Optional(name.clone())
                };
                set_field(&mut merged_fields, label, schema);
            }
            for unsupported in [
                "patternProperties",
                "propertyNames",
                "minProperties",
                "maxProperties",
                "dependentRequired",
                "dependentSchemas",
            ] {
                if obj.contains_key(unsupported) {
                    ctx = ctx.add_loss(format!("{unsupported} cannot be represented"));
                }
            }
            return Ok((Schema::Object(merged_fields), ctx));
        }

        if merged_fields.is_empty() && !obj.contains_key("allOf") {
            if let Some(additional) = obj.get("additionalProperties") {
                if additional != &JsonValue::Bool(false) {
                    let (inner, new_ctx) = self.translate(additional, ctx)?;
                    return Ok((Schema::Map(Box::new(inner)), new_ctx));
                }
                return Ok((
                    Schema::Map(Box::new(Schema::Any)),
                    ctx.add_approximation("additionalProperties:false with no properties approximated as Map(Any)"),
                ));
            }
        }

        Ok((Schema::Object(merged_fields), ctx))
    }

    /// Like [`Self::translate`], but a direct `$ref` to a `$defs`/`definitions`
    /// entry is inlined (its JSON subtree translated in place) rather than
    /// turned into `Ref(NAME)`, so `allOf` merging has field maps to work
    /// with (spec §4.8.6 step 1).
    fn translate_inlined(
        &self,
        json: &JsonValue,
        ctx: TranslationContext,
    ) -> Result<(Schema, TranslationContext), SchemaError> {
        if let Some(reference) = json.get("$ref").and_then(JsonValue::as_str) {
            if let Some(name) = exact_def_ref(reference) {
                if ctx.is_resolving_ref(reference) {
                    return Ok((Schema::Ref(name.to_string()), ctx.add_referenced_def(name)));
                }
                return match lookup_def(&self.root_json, name) {
                    Some(def_json) => {
                        let def_json = def_json.clone();
                        let nested_ctx = ctx.with_resolved_ref(reference);
                        let (schema, nested_ctx) = self.translate(&def_json, nested_ctx)?;
                        Ok(unwind(&ctx, schema, nested_ctx))
                    }
                    None => Ok((
                        Schema::Any,
                        ctx.add_loss(format!("definition {name:?} was referenced but not found")),
                    )),
                };
            }
        }
        self.translate(json, ctx)
    }
}

fn merge_fields(into: &mut Vec<(ObjectLabel, Schema)>, incoming: &[(ObjectLabel, Schema)]) {
    for (label, schema) in incoming {
        set_field(into, label.clone(), schema.clone());
    }
}

fn set_field(fields: &mut Vec<(ObjectLabel, Schema)>, label: ObjectLabel, schema: Schema) {
    if let Some(slot) = fields.iter_mut().find(|(l, _)| l.name() == label.name()) {
        *slot = (label, schema);
    } else {
        fields.push((label, schema));
    }
}

fn exact_def_ref(reference: &str) -> Option<&str> {
    reference
        .strip_prefix("#/$defs/")
        .or_else(|| reference.strip_prefix("#/definitions/"))
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
}

fn sanitize_pointer(pointer: &str) -> String {
    pointer.trim_start_matches('#').replace(['/', '~'], "_")
}

fn file_stem(path: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    base.split('.').next().unwrap_or(base).to_string()
}

/// Resolve an RFC 6901 JSON Pointer (without the leading `#`) against `root`.
fn resolve_json_pointer<'a>(root: &'a JsonValue, pointer: &str) -> Option<&'a JsonValue> {
    let pointer = pointer.strip_prefix('/').unwrap_or(pointer);
    if pointer.is_empty() {
        return Some(root);
    }
    let mut current = root;
    for raw_token in pointer.split('/') {
        let token = raw_token.replace("~1", "/").replace("~0", "~");
        current = match current {
            JsonValue::Object(obj) => obj.get(&token)?,
            JsonValue::Array(items) => items.get(token.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn int_range(obj: &JsonMap<String, JsonValue>, min_key: &str, max_key: &str) -> Option<BoundedRange<i64>> {
    let min = obj.get(min_key).and_then(JsonValue::as_i64);
    let max = obj.get(max_key).and_then(JsonValue::as_i64);
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(BoundedRange {
        min: min.map(|v| Bound::new(BoundOp::MinInclusive, v)),
        max: max.map(|v| Bound::new(BoundOp::MaxInclusive, v)),
    })
}

fn decimal_range(obj: &JsonMap<String, JsonValue>, min_key: &str, max_key: &str) -> Option<BoundedRange<Decimal>> {
    let min = obj.get(min_key).and_then(JsonValue::as_number).map(json_number_to_decimal);
    let max = obj.get(max_key).and_then(JsonValue::as_number).map(json_number_to_decimal);
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(BoundedRange {
        min: min.map(|v| Bound::new(BoundOp::MinInclusive, v)),
        max: max.map(|v| Bound::new(BoundOp::MaxInclusive, v)),
    })
}

fn decimal_exclusive_range(obj: &JsonMap<String, JsonValue>, min_key: &str, max_key: &str) -> Option<BoundedRange<Decimal>> {
    let min = obj.get(min_key).and_then(JsonValue::as_number).map(json_number_to_decimal);
    let max = obj.get(max_key).and_then(JsonValue::as_number).map(json_number_to_decimal);
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(BoundedRange {
        min: min.map(|v| Bound::new(BoundOp::MinExclusive, v)),
        max: max.map(|v| Bound::new(BoundOp::MaxExclusive, v)),
    })
}

fn json_number_to_decimal(n: &serde_json::Number) -> Decimal {
    if let Some(i) = n.as_i64() {
        Decimal::from(i)
    } else if let Some(u) = n.as_u64() {
        Decimal::from(u)
    } else {
        Decimal::from_str_exact(&n.to_string()).unwrap_or_default()
    }
}

fn json_value_to_decimal_opt(v: &JsonValue) -> Option<Decimal> {
    v.as_number().map(json_number_to_decimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_true_false_to_any_and_fail() {
        let result = import("true").unwrap();
        assert_eq!(result.root, Schema::Any);
        let result = import("false").unwrap();
        assert_eq!(result.root, Schema::Fail);
    }

    #[test]
    fn translates_simple_object_with_required_fields() {
        let text = r#"{
            "type": "object",
            "properties": { "name": {"type": "string"}, "age": {"type": "integer"} },
            "required": ["name"]
        }"#;
        let result = import(text).unwrap();
        match result.root {
            Schema::Object(fields) => {
                assert!(fields.iter().any(|(l, _)| l == &ObjectLabel::Mandatory("name".into())));
                assert!(fields.iter().any(|(l, _)| l == &ObjectLabel::Optional("age".into())));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn resolves_def_refs_and_collects_definitions() {
        let text = r#"{
            "$defs": { "Name": {"type": "string", "minLength": 1} },
            "type": "object",
            "properties": { "name": {"$ref": "#/$defs/Name"} }
        }"#;
        let result = import(text).unwrap();
        assert!(result.definitions.contains_key("Name"));
        match result.root {
            Schema::Object(fields) => {
                let (_, schema) = fields.into_iter().find(|(l, _)| l.name() == "name").unwrap();
                assert_eq!(schema, Schema::Ref("Name".into()));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn self_reference_cycle_emits_root_ref() {
        let text = r#"{
            "type": "object",
            "properties": { "child": {"$ref": "#"} }
        }"#;
        let result = import(text).unwrap();
        match result.root {
            Schema::Object(fields) => {
                let (_, schema) = fields.into_iter().find(|(l, _)| l.name() == "child").unwrap();
                match schema {
                    Schema::Object(inner_fields) => {
                        let (_, inner_schema) = inner_fields.into_iter().find(|(l, _)| l.name() == "child").unwrap();
                        assert_eq!(inner_schema, Schema::Ref("root".into()));
                    }
                    other => panic!("expected nested object, got {other:?}"),
                }
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn all_of_merges_object_field_maps() {
        let text = r#"{
            "allOf": [
                {"type": "object", "properties": {"a": {"type": "string"}}},
                {"type": "object", "properties": {"b": {"type": "integer"}}}
            ]
        }"#;
        let result = import(text).unwrap();
        match result.root {
            Schema::Object(fields) => assert_eq!(fields.len(), 2),
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn array_with_tuple_items_becomes_tuple() {
        let text = r#"{"type": "array", "items": [{"type": "string"}, {"type": "integer"}]}"#;
        let result = import(text).unwrap();
        assert!(matches!(result.root, Schema::Tuple(_)));
    }

    #[test]
    fn multiple_of_is_a_loss() {
        let text = r#"{"type": "number", "multipleOf": 2}"#;
        let result = import(text).unwrap();
        assert_eq!(result.report.entries().len(), 1);
        assert_eq!(result.report.entries()[0].kind, crate::friction::FrictionKind::Loss);
    }

    #[test]
    fn description_wraps_schema_in_documented() {
        let text = r#"{"type": "boolean", "description": "a flag"}"#;
        let result = import(text).unwrap();
        assert!(matches!(result.root, Schema::Documented { .. }));
    }
}
