//! Component C — reference and import resolution (spec §4.2). Grounded in
//! `regorus::scheduler`, which also walks a dependency-ish graph (rule
//! dependencies there, `namespace -> file` imports here) with an explicit
//! `visited` set to catch cycles rather than relying on a fixpoint loop.

use std::collections::{HashMap, HashSet};

use crate::error::SchemaError;
use crate::schema::ops::substitute;
use crate::schema::{DefinitionMap, ParsedSchema, ResolvedSchema};
use crate::utils::join_relative;

/// Reads the source text an import statement points at. Real file I/O is an
/// external collaborator's job (spec §1); this trait is the seam — a caller
/// wires up [`FsSourceLoader`] or an in-memory stand-in (tests use the
/// latter so import resolution can be exercised without touching disk).
pub trait SourceLoader {
    fn load(&self, path: &str) -> Result<String, SchemaError>;
}

/// The trivial real-filesystem loader.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSourceLoader;

impl SourceLoader for FsSourceLoader {
    fn load(&self, path: &str) -> Result<String, SchemaError> {
        std::fs::read_to_string(path).map_err(|e| SchemaError::ImportNotFound {
            namespace: String::new(),
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// An in-memory loader useful for tests and for embedding schema fragments
/// that never touch a real filesystem.
#[derive(Debug, Default, Clone)]
pub struct MapSourceLoader(pub HashMap<String, String>);

impl SourceLoader for MapSourceLoader {
    fn load(&self, path: &str) -> Result<String, SchemaError> {
        self.0.get(path).cloned().ok_or_else(|| SchemaError::ImportNotFound {
            namespace: String::new(),
            path: path.to_string(),
            message: "not found in MapSourceLoader".to_string(),
        })
    }
}

/// Applies [`substitute`] to every definition (using the rest of the
/// definitions as context) and to the root (spec §4.2). No fixpoint loop is
/// needed: the parser guarantees distinct names at each nesting level, so
/// references are non-recursive by construction; cycles are only possible
/// through imports, and those are caught by [`resolve_imports`].
pub fn resolve_references(resolved: &ResolvedSchema) -> Result<ResolvedSchema, SchemaError> {
    let context: HashMap<String, _> = resolved
        .definitions
        .iter()
        .map(|(name, schema)| (name.to_string(), schema.clone()))
        .collect();

    let mut definitions = DefinitionMap::new();
    for (name, schema) in resolved.definitions.iter() {
        definitions.insert(name.to_string(), substitute(schema, &context)?);
    }

    let root = resolved
        .root
        .as_ref()
        .map(|r| substitute(r, &context))
        .transpose()?;

    Ok(ResolvedSchema { root, definitions })
}

/// Inlines `parsed.imports` (spec §4.2):
/// 1. `originPath` already in `visited` -> `CircularImport`.
/// 2. Each `(namespace, relativePath)` is parsed and recursively resolved
///    relative to `parent(originPath)`.
/// 3. Its definitions are re-exported as `namespace.defName`; its root (if
///    any) is exposed as `namespace` itself.
pub fn resolve_imports(
    parsed: &ParsedSchema,
    origin_path: &str,
    visited: &HashSet<String>,
    loader: &dyn SourceLoader,
) -> Result<ResolvedSchema, SchemaError> {
    if visited.contains(origin_path) {
        return Err(SchemaError::CircularImport(origin_path.to_string()));
    }
    let mut next_visited = visited.clone();
    next_visited.insert(origin_path.to_string());

    let mut definitions = parsed.definitions.clone();

    for (namespace, relative_path) in &parsed.imports {
        let full_path = join_relative(origin_path, relative_path);

        let text = loader.load(&full_path).map_err(|e| prefix_with_path(e, &full_path))?;
        let imported_parsed = crate::parser::parse_schema(&text)
            .map_err(|e| prefix_with_path(e, &full_path))?;
        let imported_resolved =
            resolve_imports(&imported_parsed, &full_path, &next_visited, loader)?;

        for (def_name, def_schema) in imported_resolved.definitions.iter() {
            definitions.insert(format!("{namespace}.{def_name}"), def_schema.clone());
        }
        if let Some(root) = &imported_resolved.root {
            definitions.insert(namespace.clone(), root.clone());
        }
    }

    Ok(ResolvedSchema {
        root: parsed.root.clone(),
        definitions,
    })
}

fn prefix_with_path(err: SchemaError, path: &str) -> SchemaError {
    match err {
        SchemaError::ImportNotFound {
            namespace,
            message,
            ..
        } => SchemaError::ImportNotFound {
            namespace,
            path: path.to_string(),
            message,
        },
        other => other,
    }
}

/// Convenience: resolve imports then references in one call, starting from
/// an empty `visited` set.
pub fn resolve(
    parsed: &ParsedSchema,
    origin_path: &str,
    loader: &dyn SourceLoader,
) -> Result<ResolvedSchema, SchemaError> {
    let with_imports = resolve_imports(parsed, origin_path, &HashSet::new(), loader)?;
    resolve_references(&with_imports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObjectLabel, Schema};

    #[test]
    fn detects_circular_imports() {
        let mut files = HashMap::new();
        files.insert(
            "a.schema".to_string(),
            "b => import \"b.schema\"\n= b\n".to_string(),
        );
        files.insert(
            "b.schema".to_string(),
            "a => import \"a.schema\"\n= a\n".to_string(),
        );
        let loader = MapSourceLoader(files);
        let parsed = crate::parser::parse_schema(&loader.0["a.schema"]).unwrap();
        let err = resolve_imports(&parsed, "a.schema", &HashSet::new(), &loader).unwrap_err();
        assert!(matches!(err, SchemaError::CircularImport(_)));
    }

    #[test]
    fn resolves_definitions_referencing_each_other() {
        let mut definitions = DefinitionMap::new();
        definitions.insert(
            "Name".to_string(),
            Schema::Text {
                constraints: Default::default(),
                default: None,
            },
        );
        definitions.insert(
            "Person".to_string(),
            Schema::Object(vec![(ObjectLabel::Mandatory("name".into()), Schema::Ref("Name".into()))]),
        );
        let resolved = ResolvedSchema {
            root: Some(Schema::Ref("Person".into())),
            definitions,
        };
        let out = resolve_references(&resolved).unwrap();
        assert_eq!(out.root, Some(out.definitions.get("Person").unwrap().clone()));
        match out.definitions.get("Person").unwrap() {
            Schema::Object(fields) => {
                assert_eq!(fields[0].1, out.definitions.get("Name").unwrap().clone());
            }
            _ => panic!("expected object"),
        }
    }
}
