// SPDX-License-Identifier: MIT
//
// Directory scanner: the file list both the finder and grep work from.
//
// The walk is `ignore::WalkBuilder` with its standard filters switched off:
// hidden files and files named in .gitignore are still listed, only the
// directory names in the ignore-set are pruned. A file is left out when its
// first 512 bytes contain a NUL, the usual sign of binary content.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;
use rustc_hash::FxHashSet;
use tracing::debug;

use quill_editor::config::DEFAULT_IGNORE_DIRS;

use crate::FinderError;

/// How many leading bytes the binary check reads.
const BINARY_SNIFF_LEN: u64 = 512;

/// True if the first 512 bytes of the file contain a NUL byte.
///
/// A file that cannot be opened or read is not reported as binary; the
/// caller finds out it is unreadable when it tries to use it.
#[must_use]
pub fn is_binary(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut head = Vec::with_capacity(BINARY_SNIFF_LEN as usize);
    if file.take(BINARY_SNIFF_LEN).read_to_end(&mut head).is_err() {
        return false;
    }
    head.contains(&0)
}

/// Lists the text files under a root.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    ignore_dirs: Arc<FxHashSet<String>>,
}

impl DirectoryScanner {
    /// A scanner that prunes directories with any of these names.
    #[must_use]
    pub fn new<I, S>(ignore_dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_dirs: Arc::new(ignore_dirs.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether a directory with this name is pruned.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_dirs.contains(name)
    }

    /// Every non-binary regular file under `root`, sorted by path.
    ///
    /// Entries that cannot be read partway through the walk are skipped.
    ///
    /// # Errors
    ///
    /// [`FinderError::NotADirectory`] if `root` is not a directory, and
    /// [`FinderError::Io`] if it cannot be listed.
    pub fn scan(&self, root: &Path) -> Result<Vec<PathBuf>, FinderError> {
        if !root.is_dir() {
            return Err(FinderError::NotADirectory(root.to_path_buf()));
        }
        // Surface an unreadable root as an error rather than an empty list.
        fs::read_dir(root).map_err(|source| FinderError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let ignore = Arc::clone(&self.ignore_dirs);
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir && entry.depth() > 0 && ignore.contains(entry.file_name().to_string_lossy().as_ref()))
            })
            .build();

        let mut files = Vec::new();
        for result in walker {
            match result {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|t| t.is_file()) && !is_binary(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => debug!(error = %err, "skipping unreadable entry"),
            }
        }
        files.sort();
        debug!(root = %root.display(), files = files.len(), "scan done");
        Ok(files)
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_DIRS.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
