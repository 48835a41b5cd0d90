//! Glob helpers shared by the file-system implementations

use crate::error::FsError;
use glob::{MatchOptions, Pattern};

/// Folders excluded from every search
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["**/node_modules/**", "**/.git/**", "**/target/**"];

/// `*` and `?` never cross a `/`; `**` does.
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Whether `path` contains a wildcard that needs expanding
pub fn has_wildcard(path: &str) -> bool {
    path.contains(['*', '?'])
}

/// Compile a glob pattern
pub fn compile(pattern: &str) -> Result<Pattern, FsError> {
    Pattern::new(pattern).map_err(|e| FsError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })
}

/// Compiled set of ignore globs, matched against workspace-relative paths
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, FsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Add one more pattern
    pub fn push(&mut self, pattern: &str) -> Result<(), FsError> {
        self.patterns.push(compile(pattern)?);
        Ok(())
    }

    /// Whether a `/`-separated relative path is ignored
    pub fn is_ignored(&self, relative: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_wildcard() {
        assert!(has_wildcard("**/*.js"));
        assert!(has_wildcard("file?.txt"));
        assert!(!has_wildcard("src/index.ts"));
    }

    #[test]
    fn test_ignore_set_defaults() {
        let ignore = IgnoreSet::new(DEFAULT_IGNORE_PATTERNS).unwrap();
        assert!(ignore.is_ignored("node_modules/left-pad/index.js"));
        assert!(ignore.is_ignored("packages/app/node_modules/x.js"));
        assert!(ignore.is_ignored(".git/HEAD"));
        assert!(!ignore.is_ignored("src/index.js"));
    }

    #[test]
    fn test_star_does_not_cross_separator() {
        let pattern = compile("*.log").unwrap();
        assert!(pattern.matches_with("a.log", MATCH_OPTIONS));
        assert!(!pattern.matches_with("logs/a.log", MATCH_OPTIONS));
        let pattern = compile("**/*.log").unwrap();
        assert!(pattern.matches_with("a.log", MATCH_OPTIONS));
        assert!(pattern.matches_with("logs/a.log", MATCH_OPTIONS));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            compile("src/[abc"),
            Err(FsError::InvalidPattern { .. })
        ));
    }
}
