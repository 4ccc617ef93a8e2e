// SPDX-License-Identifier: MIT
//
// Fuzzy file finding.
//
// A pattern matches a path when its characters appear in the path in order,
// ignoring case ("mrs" matches "src/main.rs"). Each matched character adds
// ten times its index in the path to the score, so lower scores mean the
// pattern was found earlier and tighter. Results are listed lowest score
// first.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::FinderError;
use crate::scanner::DirectoryScanner;

/// Score weight per matched character index.
const INDEX_WEIGHT: usize = 10;

/// Case-insensitive in-order subsequence matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher;

impl FuzzyMatcher {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The score of `pattern` against `text`, or `None` if it does not
    /// match. An empty pattern matches everything with score 0.
    #[must_use]
    pub fn matches(&self, pattern: &str, text: &str) -> Option<usize> {
        let mut wanted = pattern.chars().flat_map(char::to_lowercase).peekable();
        let mut score = 0;
        for (i, ch) in text.chars().flat_map(char::to_lowercase).enumerate() {
            let Some(&next) = wanted.peek() else {
                break;
            };
            if ch == next {
                wanted.next();
                score += i * INDEX_WEIGHT;
            }
        }
        wanted.peek().is_none().then_some(score)
    }
}

/// One file that matched a finder query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatch {
    /// Full path, as walked from the root.
    pub path: PathBuf,
    /// Lower is better.
    pub score: usize,
}

/// Scans a root and ranks its files against a query.
#[derive(Debug, Clone, Default)]
pub struct Finder {
    scanner: DirectoryScanner,
    matcher: FuzzyMatcher,
}

impl Finder {
    #[must_use]
    pub const fn new(scanner: DirectoryScanner) -> Self {
        Self {
            scanner,
            matcher: FuzzyMatcher,
        }
    }

    /// Up to `limit` files under `root` whose root-relative path matches
    /// `query`, best first; ties are broken by path.
    ///
    /// # Errors
    ///
    /// Whatever [`DirectoryScanner::scan`] returns for an unusable root.
    pub fn find_files(&self, root: &Path, query: &str, limit: usize) -> Result<Vec<FileMatch>, FinderError> {
        let files = self.scanner.scan(root)?;
        let mut hits: Vec<FileMatch> = files
            .into_iter()
            .filter_map(|path| {
                let rel = path.strip_prefix(root).unwrap_or(&path).to_string_lossy().into_owned();
                let score = self.matcher.matches(query, &rel)?;
                Some(FileMatch { path, score })
            })
            .collect();
        hits.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.path.cmp(&b.path)));
        hits.truncate(limit);
        debug!(query, hits = hits.len(), "find files");
        Ok(hits)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    // -- FuzzyMatcher -------------------------------------------------------

    #[test]
    fn empty_pattern_scores_zero() {
        assert_eq!(FuzzyMatcher.matches("", "anything"), Some(0));
    }

    #[test]
    fn subsequence_in_order() {
        // m at 4, r at 9, s at 10
        assert_eq!(FuzzyMatcher.matches("mrs", "src/main.rs"), Some(230));
        assert_eq!(FuzzyMatcher.matches("srm", "src/main.rs"), Some(50));
        assert_eq!(FuzzyMatcher.matches("zz", "src/main.rs"), None);
    }

    #[test]
    fn out_of_order_does_not_match() {
        assert_eq!(FuzzyMatcher.matches("ba", "ab"), None);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(FuzzyMatcher.matches("README", "readme.md"), Some(150));
        assert!(FuzzyMatcher.matches("cfg", "Config.toml").is_some());
    }

    #[test]
    fn pattern_longer_than_text() {
        assert_eq!(FuzzyMatcher.matches("abc", "ab"), None);
    }

    // -- Finder -------------------------------------------------------------

    #[test]
    fn ranks_earlier_matches_first() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("docs/main.md"), "# main").unwrap();
        fs::write(root.join("notes.txt"), "n").unwrap();

        let finder = Finder::default();
        let hits = finder.find_files(root, "main", 10).unwrap();
        let names: Vec<_> = hits
            .iter()
            .map(|h| h.path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["main.rs", "docs/main.md"]);
    }

    #[test]
    fn limit_truncates() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("f{i}.txt")), "x").unwrap();
        }
        let hits = Finder::default().find_files(dir.path(), "", 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.score == 0));
    }
}
