// SPDX-License-Identifier: MIT
//
// quill-finder: the file finder and live grep behind quill's Finder prompt.
//
// Both features start from the same directory walk: every regular,
// non-binary file under a root, skipping a configurable set of directory
// names (`.git`, `node_modules`, ...). The finder filters that list with an
// in-order fuzzy match on the path; grep reads each file and reports every
// line containing a literal pattern, using the editor's own searcher.
//
// Nothing here touches editor state. The host turns a chosen hit into
// `Editor::open_document(text, path, line - 1)`.

pub mod fuzzy;
pub mod grep;
pub mod scanner;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use fuzzy::{FileMatch, Finder, FuzzyMatcher};
pub use grep::{GrepHit, LiveGrep};
pub use scanner::{DirectoryScanner, is_binary};

/// Why a walk could not start.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read directory {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
