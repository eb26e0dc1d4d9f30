//! Component B transformations: `dependencies` and `substitute` (spec §4.1).

use std::collections::HashMap;

use super::Schema;
use crate::error::SchemaError;

/// The set of names referenced anywhere beneath `s` (spec §4.1). Identity on
/// terminals, union over composite children, a singleton for `Ref`, and
/// `{namespace}` or `{namespace.name}` for `ScopedRef`.
pub fn dependencies(s: &Schema) -> Vec<String> {
    let mut out = Vec::new();
    collect_dependencies(s, &mut out);
    out
}

fn collect_dependencies(s: &Schema, out: &mut Vec<String>) {
    match s {
        Schema::Ref(name) => push_unique(out, name.clone()),
        Schema::ScopedRef { namespace, name } => {
            let key = scoped_key(namespace, name);
            push_unique(out, key);
        }
        Schema::ListOf { element, .. } => collect_dependencies(element, out),
        Schema::Tuple(items) | Schema::Alternatives(items) => {
            for item in items {
                collect_dependencies(item, out);
            }
        }
        Schema::Object(fields) => {
            for (_, field) in fields {
                collect_dependencies(field, out);
            }
        }
        Schema::Map(inner) => collect_dependencies(inner, out),
        Schema::Documented { inner, .. } | Schema::Deprecated(inner) => {
            collect_dependencies(inner, out)
        }
        _ => {}
    }
}

fn push_unique(out: &mut Vec<String>, name: String) {
    if !out.contains(&name) {
        out.push(name);
    }
}

/// Build the lookup key for a `ScopedRef`: `ns` alone when `name` is empty
/// ("root of that namespace"), else `"ns.name"` (spec §4.1).
pub fn scoped_key(namespace: &str, name: &str) -> String {
    if name.is_empty() {
        namespace.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Replace every `Ref(n)`/`ScopedRef(ns, n)` whose lookup key is present in
/// `context` with `context[key]`. Unresolved references are left unchanged
/// (non-fatal, spec §4.1). Wrappers pass through transparently; composite
/// variants substitute element-wise and short-circuit on the first error
/// (no variant currently produces one, but the signature is kept `Result`
/// per spec so composite recursion has somewhere to propagate a future
/// failure without a breaking change).
pub fn substitute(s: &Schema, context: &HashMap<String, Schema>) -> Result<Schema, SchemaError> {
    let substituted = match s {
        Schema::Ref(name) => context.get(name).cloned().unwrap_or_else(|| s.clone()),
        Schema::ScopedRef { namespace, name } => {
            let key = scoped_key(namespace, name);
            context.get(&key).cloned().unwrap_or_else(|| s.clone())
        }
        Schema::ListOf {
            element,
            constraints,
        } => Schema::ListOf {
            element: Box::new(substitute(element, context)?),
            constraints: constraints.clone(),
        },
        Schema::Tuple(items) => Schema::Tuple(substitute_all(items, context)?),
        Schema::Alternatives(items) => Schema::Alternatives(substitute_all(items, context)?),
        Schema::Object(fields) => {
            let mut out = Vec::with_capacity(fields.len());
            for (label, field) in fields {
                out.push((label.clone(), substitute(field, context)?));
            }
            Schema::Object(out)
        }
        Schema::Map(inner) => Schema::Map(Box::new(substitute(inner, context)?)),
        Schema::Documented { doc, inner } => Schema::Documented {
            doc: doc.clone(),
            inner: Box::new(substitute(inner, context)?),
        },
        Schema::Deprecated(inner) => Schema::Deprecated(Box::new(substitute(inner, context)?)),
        other => other.clone(),
    };
    Ok(substituted)
}

fn substitute_all(
    items: &[Schema],
    context: &HashMap<String, Schema>,
) -> Result<Vec<Schema>, SchemaError> {
    items.iter().map(|item| substitute(item, context)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ObjectLabel;

    #[test]
    fn dependencies_collects_refs_and_scoped_refs() {
        let s = Schema::Object(vec![
            (ObjectLabel::Mandatory("a".into()), Schema::Ref("Foo".into())),
            (
                ObjectLabel::Optional("b".into()),
                Schema::ScopedRef {
                    namespace: "ns".into(),
                    name: "Bar".into(),
                },
            ),
        ]);
        let mut deps = dependencies(&s);
        deps.sort();
        assert_eq!(deps, vec!["Foo".to_string(), "ns.Bar".to_string()]);
    }

    #[test]
    fn scoped_ref_with_empty_name_keys_on_namespace() {
        assert_eq!(scoped_key("ns", ""), "ns");
        assert_eq!(scoped_key("ns", "Foo"), "ns.Foo");
    }

    #[test]
    fn substitute_replaces_resolved_refs_and_leaves_others() {
        let mut ctx = HashMap::new();
        ctx.insert("Foo".to_string(), Schema::Boolean { default: None });

        let s = Schema::Tuple(vec![Schema::Ref("Foo".into()), Schema::Ref("Bar".into())]);
        let substituted = substitute(&s, &ctx).unwrap();
        assert_eq!(
            substituted,
            Schema::Tuple(vec![
                Schema::Boolean { default: None },
                Schema::Ref("Bar".into())
            ])
        );
    }

    #[test]
    fn substitute_is_idempotent_when_context_has_no_self_references() {
        let mut ctx = HashMap::new();
        ctx.insert("Foo".to_string(), Schema::Boolean { default: None });
        let s = Schema::Ref("Foo".into());
        let once = substitute(&s, &ctx).unwrap();
        let twice = substitute(&once, &ctx).unwrap();
        assert_eq!(once, twice);
    }
}
