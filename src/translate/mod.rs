//! Component H — the translator framework (spec §4.7). Grounded in how
//! `regorus::interpreter::Interpreter` threads an accumulating, immutable-
//! looking context (`loop_var_values`, `scopes`) through recursive
//! evaluation and returns it alongside the result rather than mutating a
//! shared `&mut self`: every translator operation here returns the produced
//! `Schema` *and* the `TranslationContext` it updated, so the caller decides
//! what happens next instead of the callee reaching into shared state.

#[cfg(feature = "json-schema")]
pub mod json_schema_export;
#[cfg(feature = "json-schema")]
pub mod json_schema_import;

#[cfg(feature = "avro")]
pub mod avro;
#[cfg(feature = "protobuf")]
pub mod protobuf;
#[cfg(feature = "xsd")]
pub mod xsd;

use std::collections::HashSet;

use crate::friction::{FrictionEntry, FrictionKind, FrictionReport};

/// Threaded through every translator operation (spec §4.7). Never mutated in
/// place; each method returns a new value with the relevant field updated,
/// matching the rest of the IR's "plain immutable data" posture.
#[derive(Debug, Clone)]
pub struct TranslationContext {
    pub path: String,
    pub report: FrictionReport,
    pub resolved_refs: HashSet<String>,
    pub referenced_defs: HashSet<String>,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self {
            path: "$".to_string(),
            report: FrictionReport::new(),
            resolved_refs: HashSet::new(),
            referenced_defs: HashSet::new(),
        }
    }

    /// Push a location for friction paths (e.g. `$/properties/name`).
    pub fn at_path(&self, segment: impl std::fmt::Display) -> Self {
        Self {
            path: format!("{}/{segment}", self.path),
            report: self.report.clone(),
            resolved_refs: self.resolved_refs.clone(),
            referenced_defs: self.referenced_defs.clone(),
        }
    }

    fn push_entry(mut self, kind: FrictionKind, message: impl Into<String>, suggestion: Option<String>) -> Self {
        self.report.push(FrictionEntry {
            kind,
            path: self.path.clone(),
            message: message.into(),
            suggestion,
        });
        self
    }

    pub fn add_loss(self, message: impl Into<String>) -> Self {
        self.push_entry(FrictionKind::Loss, message, None)
    }

    pub fn add_loss_with_suggestion(self, message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        self.push_entry(FrictionKind::Loss, message, Some(suggestion.into()))
    }

    pub fn add_approximation(self, message: impl Into<String>) -> Self {
        self.push_entry(FrictionKind::Approximation, message, None)
    }

    pub fn add_approximation_with_suggestion(
        self,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        self.push_entry(FrictionKind::Approximation, message, Some(suggestion.into()))
    }

    pub fn add_extension(self, message: impl Into<String>) -> Self {
        self.push_entry(FrictionKind::Extension, message, None)
    }

    /// Mark `reference` as currently being resolved, for cycle detection.
    pub fn with_resolved_ref(&self, reference: impl Into<String>) -> Self {
        let mut resolved_refs = self.resolved_refs.clone();
        resolved_refs.insert(reference.into());
        Self {
            path: self.path.clone(),
            report: self.report.clone(),
            resolved_refs,
            referenced_defs: self.referenced_defs.clone(),
        }
    }

    pub fn is_resolving_ref(&self, reference: &str) -> bool {
        self.resolved_refs.contains(reference)
    }

    /// Mark `name` as a definition that must appear in the output map.
    pub fn add_referenced_def(mut self, name: impl Into<String>) -> Self {
        self.referenced_defs.insert(name.into());
        self
    }
}

impl Default for TranslationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A pluggable resolver for `$ref`-style URLs (spec §4.8.7). `NoOpFetcher` is
/// the default: every external URL produces a Loss instead of blocking on
/// I/O the library has no business performing on its own.
pub trait SchemaFetcher {
    fn fetch(&self, url: &str) -> Result<String, String>;
}

pub struct NoOpFetcher;

impl SchemaFetcher for NoOpFetcher {
    fn fetch(&self, url: &str) -> Result<String, String> {
        Err(format!("no schema fetcher configured to resolve {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_path_appends_a_segment_without_mutating_the_original() {
        let ctx = TranslationContext::new();
        let child = ctx.at_path("properties").at_path("name");
        assert_eq!(ctx.path, "$");
        assert_eq!(child.path, "$/properties/name");
    }

    #[test]
    fn resolved_ref_cycle_guard_is_scoped_to_the_branch() {
        let ctx = TranslationContext::new();
        let inner = ctx.with_resolved_ref("#/$defs/Node");
        assert!(!ctx.is_resolving_ref("#/$defs/Node"));
        assert!(inner.is_resolving_ref("#/$defs/Node"));
    }

    #[test]
    fn friction_additions_accumulate_in_the_report() {
        let ctx = TranslationContext::new()
            .at_path("properties/name")
            .add_loss("multipleOf cannot be represented");
        assert_eq!(ctx.report.entries().len(), 1);
        assert_eq!(ctx.report.entries()[0].path, "$/properties/name");
    }

    #[test]
    fn no_op_fetcher_always_fails() {
        assert!(NoOpFetcher.fetch("https://example.com/schema.json").is_err());
    }
}
