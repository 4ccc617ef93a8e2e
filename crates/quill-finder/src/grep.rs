// SPDX-License-Identifier: MIT
//
// Live grep: every line under a root that contains a literal pattern.
//
// The file list comes from the scanner. Files are split across a fixed
// number of scoped worker threads; each worker reads its files, tests each
// line with the editor's bad-character searcher and collects hits locally.
// Nothing is shared between workers, and the hits are merged and sorted by
// (path, line) once all of them have joined.
//
// Files that cannot be read are skipped. Invalid UTF-8 is replaced rather
// than rejected, so a latin-1 file still greps.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, warn};

use quill_editor::search::Searcher;

use crate::FinderError;
use crate::scanner::DirectoryScanner;

/// Number of worker threads reading files.
pub const GREP_WORKERS: usize = 10;

/// One line containing the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepHit {
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// The line with surrounding whitespace trimmed.
    pub content: String,
}

/// Literal-pattern search across a directory tree.
#[derive(Debug, Clone, Default)]
pub struct LiveGrep {
    scanner: DirectoryScanner,
}

impl LiveGrep {
    #[must_use]
    pub const fn new(scanner: DirectoryScanner) -> Self {
        Self { scanner }
    }

    /// All hits for `pattern` under `root`, sorted by path then line. An
    /// empty pattern finds nothing.
    ///
    /// # Errors
    ///
    /// Whatever [`DirectoryScanner::scan`] returns for an unusable root.
    pub fn search(&self, root: &Path, pattern: &str) -> Result<Vec<GrepHit>, FinderError> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }
        let files = self.scanner.scan(root)?;
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let searcher = Searcher::new(pattern);
        let chunk = files.len().div_ceil(GREP_WORKERS);

        let mut hits: Vec<GrepHit> = thread::scope(|scope| {
            let workers: Vec<_> = files
                .chunks(chunk)
                .map(|batch| {
                    let searcher = &searcher;
                    scope.spawn(move || {
                        batch
                            .iter()
                            .flat_map(|path| grep_file(searcher, path))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            workers
                .into_iter()
                .flat_map(|worker| {
                    worker.join().unwrap_or_else(|_| {
                        warn!("grep worker panicked, its files are missing from the results");
                        Vec::new()
                    })
                })
                .collect()
        });

        hits.sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));
        debug!(pattern, files = files.len(), hits = hits.len(), "grep done");
        Ok(hits)
    }
}

/// Hits in one file. An unreadable file has none.
fn grep_file(searcher: &Searcher, path: &Path) -> Vec<GrepHit> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "grep: skipping unreadable file");
            return Vec::new();
        }
    };
    let text = String::from_utf8_lossy(&bytes);

    text.split('\n')
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            searcher.is_match(line).then(|| GrepHit {
                path: path.to_path_buf(),
                line: i + 1,
                content: line.trim().to_owned(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
