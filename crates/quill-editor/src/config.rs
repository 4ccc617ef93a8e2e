//! Editor configuration: a small JSON file of display and editing settings.
//!
//! ```json
//! {
//!   "theme": "dracula",
//!   "tab_width": 4,
//!   "line_numbers": true,
//!   "indent_width": 4,
//!   "ignore_dirs": [".git", "node_modules"]
//! }
//! ```
//!
//! Every key is optional; a missing key keeps its default. The file lives at
//! `<config_dir>/quill/config.json` unless the host passes a path. The theme
//! name is not interpreted here: it is handed to whatever renders the editor.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::document::DEFAULT_INDENT_WIDTH;
use crate::viewport::DEFAULT_TAB_WIDTH;

/// Directory names the file finder never descends into.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    ".vscode",
    ".idea",
    "dist",
    "build",
];

/// Name of the per-user config directory and file.
const APP_DIR: &str = "quill";
const CONFIG_FILE: &str = "config.json";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a config file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// EditorConfig
// ---------------------------------------------------------------------------

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Color theme name, passed through to the renderer.
    pub theme: String,
    /// Columns per tab in the viewport.
    pub tab_width: usize,
    /// Whether to show the line-number gutter.
    pub line_numbers: bool,
    /// Spaces inserted by Tab, removed by Shift+Tab.
    pub indent_width: usize,
    /// Directory names skipped by the file finder and grep.
    pub ignore_dirs: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            theme: "dracula".to_owned(),
            tab_width: DEFAULT_TAB_WIDTH,
            line_numbers: true,
            indent_width: DEFAULT_INDENT_WIDTH,
            ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|&d| d.to_owned()).collect(),
        }
    }
}

impl EditorConfig {
    /// The per-user config path, `<config_dir>/quill/config.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load settings.
    ///
    /// With `path`, that file must exist and parse. Without it, the per-user
    /// file is read if present; otherwise defaults are returned.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Json`]
    /// if it is not a valid config.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(p) => p,
                None => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Like [`load`](Self::load), but a bad file is logged and replaced by
    /// defaults. The error is returned alongside for the status line.
    #[must_use]
    pub fn load_or_default(path: Option<&Path>) -> (Self, Option<ConfigError>) {
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(err) => {
                warn!(error = %err, "config unusable, using defaults");
                (Self::default(), Some(err))
            }
        }
    }

    /// Parse settings from JSON text. Missing keys keep their defaults;
    /// widths below 1 become 1.
    ///
    /// # Errors
    ///
    /// Returns the parse error for malformed JSON or mistyped values.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(text)?;
        config.tab_width = config.tab_width.max(1);
        config.indent_width = config.indent_width.max(1);
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, text.as_bytes()).unwrap();
        file
    }

    // -- Defaults -----------------------------------------------------------

    #[test]
    fn defaults() {
        let c = EditorConfig::default();
        assert_eq!(c.theme, "dracula");
        assert_eq!(c.tab_width, 4);
        assert!(c.line_numbers);
        assert_eq!(c.indent_width, 4);
        assert!(c.ignore_dirs.iter().any(|d| d == "node_modules"));
        assert_eq!(c.ignore_dirs.len(), DEFAULT_IGNORE_DIRS.len());
    }

    // -- Parsing ------------------------------------------------------------

    #[test]
    fn missing_keys_keep_defaults() {
        let c = EditorConfig::from_json(r#"{ "theme": "nord" }"#).unwrap();
        assert_eq!(c.theme, "nord");
        assert_eq!(c.tab_width, 4);
        assert!(c.line_numbers);
    }

    #[test]
    fn full_config() {
        let c = EditorConfig::from_json(
            r#"{"theme":"gruvbox","tab_width":8,"line_numbers":false,"indent_width":2,"ignore_dirs":["target"]}"#,
        )
        .unwrap();
        assert_eq!(
            c,
            EditorConfig {
                theme: "gruvbox".to_owned(),
                tab_width: 8,
                line_numbers: false,
                indent_width: 2,
                ignore_dirs: vec!["target".to_owned()],
            }
        );
    }

    #[test]
    fn zero_widths_are_raised() {
        let c = EditorConfig::from_json(r#"{"tab_width":0,"indent_width":0}"#).unwrap();
        assert_eq!(c.tab_width, 1);
        assert_eq!(c.indent_width, 1);
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(EditorConfig::from_json(r#"{"tab_width":"wide"}"#).is_err());
    }

    // -- Files --------------------------------------------------------------

    #[test]
    fn load_explicit_file() {
        let file = write_config(r#"{"tab_width": 2}"#);
        let c = EditorConfig::load(Some(file.path())).unwrap();
        assert_eq!(c.tab_width, 2);
    }

    #[test]
    fn load_missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditorConfig::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_or_default_falls_back_on_bad_json() {
        let file = write_config("{ not json");
        let (c, err) = EditorConfig::load_or_default(Some(file.path()));
        assert_eq!(c, EditorConfig::default());
        assert!(matches!(err, Some(ConfigError::Json { .. })));
        assert!(err.unwrap().to_string().starts_with("invalid config file"));
    }

    #[test]
    fn round_trips_through_json() {
        let c = EditorConfig::default();
        let text = serde_json::to_string(&c).unwrap();
        assert_eq!(EditorConfig::from_json(&text).unwrap(), c);
    }
}
