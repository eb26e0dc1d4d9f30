//! Schema documents (spec §3.3): the parser's raw output (`ParsedSchema`,
//! imports not yet inlined) and the fully-resolved form the validator and
//! translators consume (`ResolvedSchema`).

use std::collections::HashMap;

use super::Schema;

/// An insertion-ordered, name-keyed collection of definitions. A plain
/// `Vec<(String, Schema)>` would make lookups linear; a `HashMap` alone
/// would lose the order the printer needs for round-tripping. This keeps
/// both without pulling in an `indexmap` dependency the rest of the crate
/// doesn't otherwise need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionMap {
    order: Vec<String>,
    entries: HashMap<String, Schema>,
}

impl DefinitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        let name = name.into();
        if !self.entries.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.entries.insert(name, schema);
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.order.iter().map(move |name| (name.as_str(), &self.entries[name]))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl FromIterator<(String, Schema)> for DefinitionMap {
    fn from_iter<T: IntoIterator<Item = (String, Schema)>>(iter: T) -> Self {
        let mut map = DefinitionMap::new();
        for (name, schema) in iter {
            map.insert(name, schema);
        }
        map
    }
}

/// The parser's raw output: a root schema (if the source had a trailing
/// `= item` root production), named definitions, and import statements not
/// yet resolved (spec §3.3).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSchema {
    pub root: Option<Schema>,
    pub definitions: DefinitionMap,
    /// `namespace -> relative file path`, in source order.
    pub imports: Vec<(String, String)>,
}

/// A schema with all imports inlined (component C). Remaining `Ref`/
/// `ScopedRef` are namespace-internal; the validator treats an unresolved
/// one as a programmer error (spec §3.3).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSchema {
    pub root: Option<Schema>,
    pub definitions: DefinitionMap,
}

impl ResolvedSchema {
    pub fn from_parsed_without_imports(parsed: ParsedSchema) -> Self {
        debug_assert!(parsed.imports.is_empty());
        ResolvedSchema {
            root: parsed.root,
            definitions: parsed.definitions,
        }
    }
}
