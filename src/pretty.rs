//! Component E — the configurable pretty-printer (spec §4.4), layered on
//! top of the same per-variant rendering `printer.rs` uses for the minimal
//! grammar-inverse printer. Grounded in the same "plain data, no hidden
//! state" posture as `regorus::Location`/`regorus::Expression`: `PrinterConfig`
//! is just a struct with a `Default` impl and preset constructors, never a
//! global or thread-local.

use std::fmt::Write as _;

use crate::schema::{ObjectLabel, ParsedSchema, Schema};

/// Rendering knobs enumerated in spec §4.4. `compact`/`pretty`/`expanded`
/// are presets; any field can be overridden individually.
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterConfig {
    pub indent: usize,
    pub max_line_width: usize,
    pub expand_objects: bool,
    pub expand_alternatives: bool,
    pub expand_tuples: bool,
    pub show_empty_constraints: bool,
}

impl PrinterConfig {
    /// Single line, no optional whitespace, no expanded blocks.
    pub fn compact() -> Self {
        Self {
            indent: 0,
            max_line_width: usize::MAX,
            expand_objects: false,
            expand_alternatives: false,
            expand_tuples: false,
            show_empty_constraints: false,
        }
    }

    /// Multi-line objects, inline unions, 4-space indent, 100-char soft limit.
    pub fn pretty() -> Self {
        Self {
            indent: 4,
            max_line_width: 100,
            expand_objects: true,
            expand_alternatives: false,
            expand_tuples: false,
            show_empty_constraints: false,
        }
    }

    /// Multi-line objects, unions and tuples; 80-char soft limit.
    pub fn expanded() -> Self {
        Self {
            indent: 4,
            max_line_width: 80,
            expand_objects: true,
            expand_alternatives: true,
            expand_tuples: true,
            show_empty_constraints: false,
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        PrinterConfig::pretty()
    }
}

pub fn print_document(parsed: &ParsedSchema, config: &PrinterConfig) -> String {
    let printer = Printer { config };
    let mut out = String::new();
    for (namespace, path) in &parsed.imports {
        let _ = writeln!(out, "{namespace} => import {:?}", path);
    }
    if !parsed.imports.is_empty() {
        out.push('\n');
    }
    for (name, schema) in parsed.definitions.iter() {
        printer.write_doc(schema, 0, &mut out);
        if matches!(schema, Schema::Deprecated(_)) {
            out.push_str("@deprecated ");
        }
        let _ = write!(out, "{name} = ");
        out.push_str(&printer.render(unwrap(schema), 0));
        out.push('\n');
    }
    if let Some(root) = &parsed.root {
        printer.write_doc(root, 0, &mut out);
        out.push_str("= ");
        out.push_str(&printer.render(unwrap(root), 0));
        out.push('\n');
    }
    out
}

pub fn print(schema: &Schema, config: &PrinterConfig) -> String {
    Printer { config }.render(schema, 0)
}

fn unwrap(schema: &Schema) -> &Schema {
    match schema {
        Schema::Deprecated(inner) => unwrap(inner),
        Schema::Documented { inner, .. } => unwrap(inner),
        other => other,
    }
}

fn doc_of(schema: &Schema) -> Option<&str> {
    match schema {
        Schema::Deprecated(inner) => doc_of(inner),
        Schema::Documented { doc, .. } => Some(doc),
        _ => None,
    }
}

struct Printer<'a> {
    config: &'a PrinterConfig,
}

impl<'a> Printer<'a> {
    fn pad(&self, depth: usize) -> String {
        " ".repeat(self.config.indent * depth)
    }

    /// Doc comments on simple-typed values print trailing; on
    /// complex-typed or expanded values they print as preceding lines
    /// (spec §4.4). Whether a value is "simple" here means it renders on
    /// one line at this depth — an approximation we make by rendering
    /// first and checking for embedded newlines.
    fn write_doc(&self, schema: &Schema, depth: usize, out: &mut String) {
        if let Some(doc) = doc_of(schema) {
            let pad = self.pad(depth);
            for line in doc.split('\n') {
                let _ = writeln!(out, "{pad}## {line}");
            }
        }
    }

    fn write_field_trailing_doc(&self, schema: &Schema, rendered: &str, out: &mut String) {
        if let Some(doc) = doc_of(schema) {
            if !rendered.contains('\n') {
                let _ = write!(out, "  ## {}", doc.replace('\n', " "));
            }
        }
    }

    fn render(&self, schema: &Schema, depth: usize) -> String {
        match schema {
            Schema::Any => "any".to_string(),
            Schema::Fail => "number[0 <= value <= -1]".to_string(),
            Schema::Boolean { default } => match default {
                Some(d) => format!("boolean ?= {d}"),
                None => "boolean".to_string(),
            },
            Schema::Text { constraints, default } => {
                let mut s = "text".to_string();
                let mut clauses = Vec::new();
                if let Some(size) = &constraints.size {
                    clauses.push(crate::printer_support::print_int_range(size, "length"));
                }
                if let Some(r) = &constraints.regex {
                    clauses.push(format!("regex = {:?}", r));
                }
                if let Some(f) = &constraints.format {
                    clauses.push(format!("format = {:?}", f));
                }
                self.push_clauses(&mut s, &clauses);
                if let Some(d) = default {
                    let _ = write!(s, " ?= {:?}", d);
                }
                s
            }
            Schema::GivenText(v) => format!("{:?}", v),
            Schema::Numeric { constraints, default } => {
                let mut s = "number".to_string();
                let mut clauses = Vec::new();
                if let Some(v) = &constraints.value {
                    clauses.push(crate::printer_support::print_decimal_range(v));
                }
                if constraints.integer {
                    clauses.push("integer".to_string());
                }
                self.push_clauses(&mut s, &clauses);
                if let Some(d) = default {
                    let _ = write!(s, " ?= {d}");
                }
                s
            }
            Schema::Binary { constraints } => {
                let mut s = "binary".to_string();
                let mut clauses = Vec::new();
                if let Some(size) = &constraints.size {
                    clauses.push(crate::printer_support::print_byte_range(size));
                }
                if let Some(enc) = &constraints.encoding {
                    clauses.push(format!("encoding = {}", crate::printer_support::encoding_name(*enc)));
                }
                self.push_clauses(&mut s, &clauses);
                s
            }
            Schema::Time { constraints } => {
                let mut s = "time".to_string();
                let clauses: Vec<String> = constraints
                    .iter()
                    .map(crate::printer_support::print_time_constraint)
                    .collect();
                self.push_clauses(&mut s, &clauses);
                s
            }
            Schema::Enum(values) => values
                .iter()
                .map(|v| format!("{v:?}"))
                .collect::<Vec<_>>()
                .join(" | "),
            Schema::ListOf { element, constraints } => {
                self.render_list(element, constraints, depth)
            }
            Schema::Tuple(items) => self.render_tuple(items, depth),
            Schema::Alternatives(options) => self.render_alternatives(options, depth),
            Schema::Object(fields) => self.render_object(fields, depth),
            Schema::Map(inner) => format!("{{ ...: {} }}", self.render(inner, depth)),
            Schema::Ref(name) => name.clone(),
            Schema::ScopedRef { namespace, name } => format!("{namespace}.{name}"),
            Schema::Import { namespace, path } => format!("{namespace} => import {:?}", path),
            Schema::Documented { inner, .. } => self.render(inner, depth),
            Schema::Deprecated(inner) => self.render(inner, depth),
        }
    }

    fn push_clauses(&self, s: &mut String, clauses: &[String]) {
        if clauses.is_empty() {
            if self.config.show_empty_constraints {
                s.push_str("[]");
            }
            return;
        }
        let _ = write!(s, "[{}]", clauses.join(", "));
    }

    fn render_operand(&self, schema: &Schema, depth: usize) -> String {
        let bare = unwrap(schema);
        let rendered = self.render(schema, depth);
        if matches!(bare, Schema::Tuple(_) | Schema::Alternatives(_)) {
            format!("({rendered})")
        } else {
            rendered
        }
    }

    fn render_list(
        &self,
        element: &Schema,
        constraints: &crate::schema::ListConstraints,
        depth: usize,
    ) -> String {
        let head = self.render_operand(element, depth);
        if constraints.size.is_none() && constraints.unique.is_empty() {
            return format!("{head}*");
        }
        let implicit_only = constraints
            .size
            .as_ref()
            .map(|r| {
                r.max.is_none()
                    && matches!(&r.min, Some(b) if b.op == crate::schema::BoundOp::MinInclusive && b.value == 1)
            })
            .unwrap_or(false)
            && constraints.unique.is_empty();
        if implicit_only {
            return format!("{head}+");
        }
        let mut clauses = Vec::new();
        if let Some(size) = &constraints.size {
            clauses.push(crate::printer_support::print_int_range(size, "size"));
        }
        for u in &constraints.unique {
            clauses.push(crate::printer_support::print_uniqueness(u));
        }
        format!("{head}+[{}]", clauses.join(", "))
    }

    fn render_tuple(&self, items: &[Schema], depth: usize) -> String {
        let inline = format!(
            "({})",
            items
                .iter()
                .map(|i| self.render_operand(i, depth))
                .collect::<Vec<_>>()
                .join(", ")
        );
        if !self.config.expand_tuples && inline.len() + self.config.indent * depth <= self.config.max_line_width {
            return inline;
        }
        let pad = self.pad(depth + 1);
        let mut s = "(\n".to_string();
        for (i, item) in items.iter().enumerate() {
            let _ = write!(s, "{pad}{}", self.render_operand(item, depth + 1));
            if i + 1 < items.len() {
                s.push(',');
            }
            s.push('\n');
        }
        let _ = write!(s, "{})", self.pad(depth));
        s
    }

    fn render_alternatives(&self, options: &[Schema], depth: usize) -> String {
        let inline = options
            .iter()
            .map(|o| self.render_operand(o, depth))
            .collect::<Vec<_>>()
            .join(" | ");
        if !self.config.expand_alternatives && inline.len() + self.config.indent * depth <= self.config.max_line_width
        {
            return inline;
        }
        let pad = self.pad(depth);
        let mut s = String::new();
        for (i, opt) in options.iter().enumerate() {
            if i == 0 {
                let _ = write!(s, "{}", self.render_operand(opt, depth));
            } else {
                let _ = write!(s, "\n{pad}| {}", self.render_operand(opt, depth));
            }
        }
        s
    }

    fn render_object(&self, fields: &[(ObjectLabel, Schema)], depth: usize) -> String {
        if fields.is_empty() {
            return "{}".to_string();
        }
        let inline = format!(
            "{{ {} }}",
            fields
                .iter()
                .map(|(label, schema)| self.render_field_inline(label, schema, depth))
                .collect::<Vec<_>>()
                .join(", ")
        );
        if !self.config.expand_objects && inline.len() + self.config.indent * depth <= self.config.max_line_width {
            return inline;
        }
        let pad = self.pad(depth + 1);
        let mut s = "{\n".to_string();
        for (label, schema) in fields {
            self.write_doc_if_complex(schema, depth + 1, &mut s);
            let _ = write!(s, "{pad}{}", label.name());
            if label.is_optional() {
                s.push('?');
            }
            s.push_str(": ");
            let rendered = self.render(unwrap(schema), depth + 1);
            s.push_str(&rendered);
            self.write_field_trailing_doc(schema, &rendered, &mut s);
            s.push('\n');
        }
        let _ = write!(s, "{}}}", self.pad(depth));
        s
    }

    fn render_field_inline(&self, label: &ObjectLabel, schema: &Schema, depth: usize) -> String {
        let rendered = self.render(unwrap(schema), depth);
        let mark = if label.is_optional() { "?" } else { "" };
        format!("{}{mark}: {rendered}", label.name())
    }

    /// When a field's value itself expands to multiple lines, its doc (if
    /// any) prints preceding rather than trailing (spec §4.4).
    fn write_doc_if_complex(&self, schema: &Schema, depth: usize, out: &mut String) {
        if doc_of(schema).is_none() {
            return;
        }
        let rendered = self.render(unwrap(schema), depth);
        if rendered.contains('\n') {
            self.write_doc(schema, depth, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    #[test]
    fn compact_preset_is_single_line() {
        let parsed = parse_schema("X = { a: text, b: number }\n").unwrap();
        let printed = print_document(&parsed, &PrinterConfig::compact());
        assert!(!printed.trim_end_matches('\n').contains('\n') || printed.lines().count() <= 2);
    }

    #[test]
    fn pretty_preset_expands_objects() {
        let parsed = parse_schema("X = { a: text, b: number }\n").unwrap();
        let printed = print_document(&parsed, &PrinterConfig::pretty());
        assert!(printed.contains("{\n"));
    }

    #[test]
    fn expanded_preset_expands_alternatives() {
        let parsed = parse_schema("X = number | boolean\n").unwrap();
        let printed = print_document(&parsed, &PrinterConfig::expanded());
        assert!(printed.contains("\n| boolean") || printed.contains("| boolean"));
    }
}
