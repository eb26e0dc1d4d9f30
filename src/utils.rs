//! Small cross-cutting helpers grounded in `regorus::utils::limits`: where
//! the teacher guards lexer column width, file size and line count against
//! pathological input, this crate guards recursion depth the same way
//! (spec §5: "Implementations should enforce a configurable recursion
//! limit defensively (e.g., 200 levels)").

use crate::error::SchemaError;

/// Default recursion depth ceiling for parsing, substitution and JSON
/// Schema import recursion (spec §5).
pub const DEFAULT_MAX_DEPTH: u32 = 200;

/// A depth counter threaded through recursive traversals. Exceeding `limit`
/// is a hard error, never a silent truncation.
#[derive(Debug, Clone, Copy)]
pub struct DepthGuard {
    limit: u32,
    depth: u32,
}

impl DepthGuard {
    pub fn new(limit: u32) -> Self {
        Self { limit, depth: 0 }
    }

    /// Enter one more level of recursion, returning a guard for the callee
    /// to hold for the duration of its own recursive call.
    pub fn enter(&self, context: &str) -> Result<DepthGuard, SchemaError> {
        let depth = self.depth + 1;
        if depth > self.limit {
            return Err(SchemaError::RecursionLimitExceeded {
                limit: self.limit,
                context: context.to_string(),
            });
        }
        Ok(DepthGuard {
            limit: self.limit,
            depth,
        })
    }
}

impl Default for DepthGuard {
    fn default() -> Self {
        DepthGuard::new(DEFAULT_MAX_DEPTH)
    }
}

/// Join an import's relative path against the directory containing the
/// importing file (spec §4.2: "relative to the importing file's directory").
pub fn join_relative(origin_path: &str, relative: &str) -> String {
    match origin_path.rfind('/') {
        Some(idx) => format!("{}/{}", &origin_path[..idx], relative),
        None => relative.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_guard_trips_past_limit() {
        let guard = DepthGuard::new(2);
        let g1 = guard.enter("a").unwrap();
        let g2 = g1.enter("b").unwrap();
        assert!(g2.enter("c").is_err());
    }

    #[test]
    fn join_relative_uses_importing_files_directory() {
        assert_eq!(join_relative("schemas/root.schema", "common.schema"), "schemas/common.schema");
        assert_eq!(join_relative("root.schema", "common.schema"), "common.schema");
    }
}
