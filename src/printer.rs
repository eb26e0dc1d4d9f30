//! Component D, printer half of the bidirectional grammar (spec §4.3.8): the
//! minimal, always-valid inverse of `parser.rs`. `pretty.rs` (component E)
//! builds the configurable `compact`/`pretty`/`expanded` presets on top of
//! the same per-variant cases; this module exists so that the parse-print
//! round-trip law (spec §8.1) has one canonical, always-available printer
//! that doesn't depend on any formatting choice.

use std::fmt::Write as _;

use crate::printer_support::{
    encoding_name, print_byte_range, print_decimal_range, print_int_range, print_time_constraint,
    print_uniqueness,
};
use crate::schema::{BoundOp, ObjectLabel, ParsedSchema, Schema};

pub fn print_schema(parsed: &ParsedSchema) -> String {
    let mut out = String::new();
    for (namespace, path) in &parsed.imports {
        let _ = writeln!(out, "{namespace} => import {:?}", path);
    }
    if !parsed.imports.is_empty() {
        out.push('\n');
    }
    for (name, schema) in parsed.definitions.iter() {
        print_doc_lines(schema, 0, &mut out);
        let deprecated = if is_deprecated(schema) { "@deprecated " } else { "" };
        let _ = write!(out, "{deprecated}{name} = ");
        print_item(unwrap_metadata_for_print(schema), 0, &mut out);
        out.push('\n');
    }
    if let Some(root) = &parsed.root {
        print_doc_lines(root, 0, &mut out);
        let _ = write!(out, "= ");
        print_item(unwrap_metadata_for_print(root), 0, &mut out);
        out.push('\n');
    }
    out
}

/// Print a single schema as a standalone item (used by tests and by
/// translators that only need one schema's text, not a whole document).
pub fn print_item_standalone(schema: &Schema) -> String {
    let mut out = String::new();
    print_item(schema, 0, &mut out);
    out
}

fn is_deprecated(schema: &Schema) -> bool {
    matches!(schema, Schema::Deprecated(_))
}

fn unwrap_metadata_for_print(schema: &Schema) -> &Schema {
    match schema {
        Schema::Deprecated(inner) => unwrap_metadata_for_print(inner),
        Schema::Documented { inner, .. } => unwrap_metadata_for_print(inner),
        other => other,
    }
}

fn doc_text(schema: &Schema) -> Option<&str> {
    match schema {
        Schema::Deprecated(inner) => doc_text(inner),
        Schema::Documented { doc, .. } => Some(doc.as_str()),
        _ => None,
    }
}

fn print_doc_lines(schema: &Schema, indent: usize, out: &mut String) {
    if let Some(doc) = doc_text(schema) {
        let pad = "  ".repeat(indent);
        for line in doc.split('\n') {
            let _ = writeln!(out, "{pad}## {line}");
        }
    }
}

fn indent_str(n: usize) -> String {
    "  ".repeat(n)
}

fn print_item(schema: &Schema, indent: usize, out: &mut String) {
    match schema {
        Schema::Any => out.push_str("any"),
        // `Fail` has no dedicated surface syntax (spec §4.3 never produces
        // it from source); an inverted numeric range is the closest
        // grammar-expressible "never valid" constraint. Only translators
        // emit `Fail` directly, so this never affects the parser's own
        // round-trip law.
        Schema::Fail => out.push_str("number[0 <= value <= -1]"),
        Schema::Boolean { default } => {
            out.push_str("boolean");
            if let Some(d) = default {
                let _ = write!(out, " ?= {d}");
            }
        }
        Schema::Text { constraints, default } => {
            out.push_str("text");
            let mut clauses = Vec::new();
            if let Some(size) = &constraints.size {
                clauses.push(print_int_range(size, "length"));
            }
            if let Some(regex) = &constraints.regex {
                clauses.push(format!("regex = {:?}", regex));
            }
            if let Some(format) = &constraints.format {
                clauses.push(format!("format = {:?}", format));
            }
            print_bracketed(&clauses, out);
            if let Some(d) = default {
                let _ = write!(out, " ?= {:?}", d);
            }
        }
        Schema::GivenText(v) => {
            let _ = write!(out, "{:?}", v);
        }
        Schema::Numeric { constraints, default } => {
            out.push_str("number");
            let mut clauses = Vec::new();
            if let Some(value) = &constraints.value {
                clauses.push(print_decimal_range(value));
            }
            if constraints.integer {
                clauses.push("integer".to_string());
            }
            print_bracketed(&clauses, out);
            if let Some(d) = default {
                let _ = write!(out, " ?= {d}");
            }
        }
        Schema::Binary { constraints } => {
            out.push_str("binary");
            let mut clauses = Vec::new();
            if let Some(size) = &constraints.size {
                clauses.push(print_byte_range(size));
            }
            if let Some(encoding) = &constraints.encoding {
                clauses.push(format!("encoding = {}", encoding_name(*encoding)));
            }
            print_bracketed(&clauses, out);
        }
        Schema::Time { constraints } => {
            out.push_str("time");
            let clauses: Vec<String> = constraints.iter().map(print_time_constraint).collect();
            print_bracketed(&clauses, out);
        }
        Schema::Enum(values) => {
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    out.push_str(" | ");
                }
                let _ = write!(out, "{:?}", v);
            }
        }
        Schema::ListOf { element, constraints } => {
            print_suffixable_operand(element, indent, out);
            if constraints.size.is_none() && constraints.unique.is_empty() {
                out.push('*');
                return;
            }
            let implicit_min_one = constraints
                .size
                .as_ref()
                .map(|r| matches!(&r.min, Some(b) if b.op == BoundOp::MinInclusive && b.value == 1) && r.max.is_none())
                .unwrap_or(false);
            if implicit_min_one && constraints.unique.is_empty() {
                out.push('+');
                return;
            }
            out.push('+');
            let mut clauses = Vec::new();
            if let Some(size) = &constraints.size {
                clauses.push(print_int_range(size, "size"));
            }
            for u in &constraints.unique {
                clauses.push(print_uniqueness(u));
            }
            print_bracketed(&clauses, out);
        }
        Schema::Tuple(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                print_operand(item, indent, out);
            }
            out.push(')');
        }
        Schema::Alternatives(options) => {
            for (i, opt) in options.iter().enumerate() {
                if i > 0 {
                    out.push_str(" | ");
                }
                print_operand(opt, indent, out);
            }
        }
        Schema::Object(fields) => print_object(fields, indent, out),
        Schema::Map(inner) => {
            out.push_str("{ ...: ");
            print_item(inner, indent, out);
            out.push_str(" }");
        }
        Schema::Ref(name) => out.push_str(name),
        Schema::ScopedRef { namespace, name } => {
            let _ = write!(out, "{namespace}.{name}");
        }
        Schema::Import { namespace, path } => {
            let _ = write!(out, "{namespace} => import {:?}", path);
        }
        Schema::Documented { inner, .. } => print_item(inner, indent, out),
        Schema::Deprecated(inner) => print_item(inner, indent, out),
    }
}

/// A tuple element or alternatives operand must be parenthesized if it is
/// itself a tuple or an alternatives chain (spec §4.3.7: grouped form
/// required as a sub-item).
fn print_operand(schema: &Schema, indent: usize, out: &mut String) {
    let bare = unwrap_metadata_for_print(schema);
    let needs_parens = matches!(bare, Schema::Tuple(_) | Schema::Alternatives(_));
    if needs_parens {
        out.push('(');
        print_item(schema, indent, out);
        out.push(')');
    } else {
        print_item(schema, indent, out);
    }
}

/// The element type preceding a list suffix (`*`/`+`) needs parens under
/// the same rule as tuple/alternatives operands, since `a | b*` would
/// otherwise be ambiguous between `a | (b*)` and `(a | b)*`.
fn print_suffixable_operand(schema: &Schema, indent: usize, out: &mut String) {
    print_operand(schema, indent, out);
}

fn print_bracketed(clauses: &[String], out: &mut String) {
    if clauses.is_empty() {
        return;
    }
    out.push('[');
    for (i, c) in clauses.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(c);
    }
    out.push(']');
}

fn print_object(fields: &[(ObjectLabel, Schema)], indent: usize, out: &mut String) {
    if fields.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    let child_indent = indent + 1;
    for (label, schema) in fields {
        print_doc_lines(schema, child_indent, out);
        out.push_str(&indent_str(child_indent));
        out.push_str(label.name());
        if label.is_optional() {
            out.push('?');
        }
        out.push_str(": ");
        print_item(unwrap_metadata_for_print(schema), child_indent, out);
        out.push('\n');
    }
    out.push_str(&indent_str(indent));
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    #[test]
    fn prints_and_reparses_simple_object() {
        let parsed = parse_schema("Person = { name: text, age?: number }\n").unwrap();
        let printed = print_schema(&parsed);
        let reparsed = parse_schema(&printed).unwrap();
        assert_eq!(
            parsed.definitions.get("Person").unwrap(),
            reparsed.definitions.get("Person").unwrap()
        );
    }

    #[test]
    fn prints_and_reparses_bounded_text() {
        let parsed = parse_schema("X = text[0 <= length <= 10]\n").unwrap();
        let printed = print_schema(&parsed);
        let reparsed = parse_schema(&printed).unwrap();
        assert_eq!(
            parsed.definitions.get("X").unwrap(),
            reparsed.definitions.get("X").unwrap()
        );
    }

    #[test]
    fn prints_and_reparses_enum() {
        let parsed = parse_schema("Color = \"red\" | \"blue\"\n").unwrap();
        let printed = print_schema(&parsed);
        let reparsed = parse_schema(&printed).unwrap();
        assert_eq!(
            parsed.definitions.get("Color").unwrap(),
            reparsed.definitions.get("Color").unwrap()
        );
    }

    #[test]
    fn prints_and_reparses_tuple() {
        let parsed = parse_schema("X = (number, text, boolean)\n").unwrap();
        let printed = print_schema(&parsed);
        let reparsed = parse_schema(&printed).unwrap();
        assert_eq!(
            parsed.definitions.get("X").unwrap(),
            reparsed.definitions.get("X").unwrap()
        );
    }

    #[test]
    fn prints_doc_comments_as_preceding_lines() {
        let parsed = parse_schema("## a field\nX = text\n").unwrap();
        let printed = print_schema(&parsed);
        assert!(printed.contains("## a field"));
    }
}
