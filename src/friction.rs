//! Component G — the friction model (spec §4.6). Every translator threads
//! a `FrictionReport` instead of raising errors for schema-level mismatches;
//! grounded in how `regorus::schema::validate` accumulates a `Vec` of
//! `ValidationError` rather than short-circuiting on the first one — the
//! same "collect, don't throw" posture applied to translation instead of
//! validation.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrictionKind {
    /// The source construct cannot be represented; some semantics will not
    /// round-trip.
    Loss,
    /// Translation preserves intent but not exactly.
    Approximation,
    /// The source construct relies on a dialect extension or non-standard
    /// feature.
    Extension,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrictionEntry {
    pub kind: FrictionKind,
    pub path: String,
    pub message: String,
    pub suggestion: Option<String>,
}

/// An ordered, append-only record of translation friction plus the set of
/// external URLs a JSON Schema importer fetched along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrictionReport {
    entries: Vec<FrictionEntry>,
    fetched_urls: HashSet<String>,
}

impl FrictionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FrictionEntry) {
        self.entries.push(entry);
    }

    pub fn record_fetched_url(&mut self, url: impl Into<String>) {
        self.fetched_urls.insert(url.into());
    }

    pub fn entries(&self) -> &[FrictionEntry] {
        &self.entries
    }

    pub fn fetched_urls(&self) -> &HashSet<String> {
        &self.fetched_urls
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Concatenates two reports; `fetchedUrls` is the set union (spec §4.6).
    pub fn merge(mut self, other: FrictionReport) -> Self {
        self.entries.extend(other.entries);
        self.fetched_urls.extend(other.fetched_urls);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_concatenates_entries_and_unions_urls() {
        let mut a = FrictionReport::new();
        a.push(FrictionEntry {
            kind: FrictionKind::Loss,
            path: "$/a".into(),
            message: "dropped".into(),
            suggestion: None,
        });
        a.record_fetched_url("https://example.com/a.json");

        let mut b = FrictionReport::new();
        b.push(FrictionEntry {
            kind: FrictionKind::Approximation,
            path: "$/b".into(),
            message: "approximated".into(),
            suggestion: Some("use X instead".into()),
        });
        b.record_fetched_url("https://example.com/b.json");

        let merged = a.merge(b);
        assert_eq!(merged.entries().len(), 2);
        assert_eq!(merged.fetched_urls().len(), 2);
    }
}
