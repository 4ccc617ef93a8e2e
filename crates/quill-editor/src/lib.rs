//! # quill-editor: Editing core for quill
//!
//! Everything between "a key was pressed" and "these lines are on screen",
//! with no terminal or file system attached:
//!
//! - **[`position`]**: `Position` (line, col) and `Range` types, 0-indexed
//! - **[`buffer`]**: `Buffer` wrapping a rope, never fewer than one line
//! - **[`cursor`]**: Cursor with motions, sticky column, and selection anchor
//! - **[`history`]**: Invertible edit ops and the undo/redo stacks
//! - **[`document`]**: Buffer + cursor + history; every edit recorded
//! - **[`viewport`]**: Soft-wrap geometry and vertical scroll
//! - **[`search`]**: Literal substring search, inline or on a worker thread
//! - **[`replace`]**: The find / replace-with / confirm state machine
//! - **[`mode`]**: Which prompt or overlay owns the keyboard
//! - **[`prompt`]**: Single-line input behind every prompt
//! - **[`config`]**: JSON settings file
//! - **[`editor`]**: The session a host drives with named operations
//!
//! The host (a terminal UI, or the command-line tool in this workspace) owns
//! files, the clipboard and the screen. It calls [`editor::Editor`]
//! operations and performs the I/O the editor returns as
//! [`editor::HostRequest`]s.

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod history;
pub mod mode;
pub mod position;
pub mod prompt;
pub mod replace;
pub mod search;
pub mod viewport;

pub use editor::{Editor, HostRequest};
