//! Interaction modes.
//!
//! The editor is always in exactly one [`InteractionMode`]. Modal prompts
//! (save, open, search, replace, finder, go-to-line) and the help overlay are
//! variants of one enum, so two of them can never be active at once.
//!
//! | Mode                  | Prompt label          | Keys go to      |
//! |-----------------------|-----------------------|-----------------|
//! | Idle                  | -                     | the document    |
//! | Saving                | `Filename: `          | the prompt      |
//! | Loading               | `Open file: `         | the prompt      |
//! | Searching             | `Search: `            | the prompt      |
//! | Replacing(Find)       | `Find: `              | the prompt      |
//! | Replacing(Replacement)| `Replace with: `      | the prompt      |
//! | Replacing(Confirm)    | -                     | confirm / skip  |
//! | Finding               | `Find file: `         | the prompt      |
//! | GoToLine              | `Go to line (1-N): `  | the prompt      |
//! | Help                  | -                     | dismiss only    |

use std::fmt;

// ---------------------------------------------------------------------------
// ReplaceStep
// ---------------------------------------------------------------------------

/// Where the interactive replace flow is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplaceStep {
    /// Typing the text to find.
    Find,
    /// Typing the replacement.
    Replacement,
    /// Stepping through matches: confirm replaces the current one, skip
    /// moves on.
    Confirm,
}

impl fmt::Display for ReplaceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Find => f.write_str("FIND"),
            Self::Replacement => f.write_str("REPLACE WITH"),
            Self::Confirm => f.write_str("CONFIRM"),
        }
    }
}

// ---------------------------------------------------------------------------
// InteractionMode
// ---------------------------------------------------------------------------

/// What the editor is doing right now.
///
/// This is a pure data type. Key dispatch lives in the host; transitions
/// live in [`Editor`](crate::editor::Editor).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    /// Plain editing. Keys edit the document.
    #[default]
    Idle,
    /// Asking for a file name to save under.
    Saving,
    /// Asking for a file to open.
    Loading,
    /// Typing an incremental search query.
    Searching,
    /// Somewhere in the find/replace flow.
    Replacing { step: ReplaceStep },
    /// Typing a fuzzy file-finder query.
    Finding,
    /// Typing a line number.
    GoToLine,
    /// The help overlay is shown.
    Help,
}

impl InteractionMode {
    /// Human-readable name for the status line.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Idle => "EDIT",
            Self::Saving => "SAVE",
            Self::Loading => "OPEN",
            Self::Searching => "SEARCH",
            Self::Replacing { step } => match step {
                ReplaceStep::Find => "REPLACE: FIND",
                ReplaceStep::Replacement => "REPLACE: WITH",
                ReplaceStep::Confirm => "REPLACE: CONFIRM",
            },
            Self::Finding => "FIND FILE",
            Self::GoToLine => "GO TO LINE",
            Self::Help => "HELP",
        }
    }

    /// The label shown before the prompt input, or `None` when the mode has
    /// no prompt. `line_count` fills in the go-to-line range.
    #[must_use]
    pub fn prompt_label(self, line_count: usize) -> Option<String> {
        match self {
            Self::Saving => Some("Filename: ".to_owned()),
            Self::Loading => Some("Open file: ".to_owned()),
            Self::Searching => Some("Search: ".to_owned()),
            Self::Replacing {
                step: ReplaceStep::Find,
            } => Some("Find: ".to_owned()),
            Self::Replacing {
                step: ReplaceStep::Replacement,
            } => Some("Replace with: ".to_owned()),
            Self::Finding => Some("Find file: ".to_owned()),
            Self::GoToLine => Some(format!("Go to line (1-{}): ", line_count.max(1))),
            Self::Idle
            | Self::Help
            | Self::Replacing {
                step: ReplaceStep::Confirm,
            } => None,
        }
    }

    /// True if typed characters go to the prompt rather than the document.
    #[inline]
    #[must_use]
    pub const fn accepts_text_input(self) -> bool {
        match self {
            Self::Saving
            | Self::Loading
            | Self::Searching
            | Self::Finding
            | Self::GoToLine
            | Self::Replacing {
                step: ReplaceStep::Find | ReplaceStep::Replacement,
            } => true,
            Self::Idle
            | Self::Help
            | Self::Replacing {
                step: ReplaceStep::Confirm,
            } => false,
        }
    }

    /// True in plain editing mode.
    #[inline]
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// True anywhere in the replace flow.
    #[inline]
    #[must_use]
    pub const fn is_replacing(self) -> bool {
        matches!(self, Self::Replacing { .. })
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
