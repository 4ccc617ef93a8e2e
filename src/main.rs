// SPDX-License-Identifier: MIT
//
// quill: a headless host for the quill editing core.
//
// The binary wires the crates together without a terminal UI:
//
//   quill-editor → buffer, search, replace flow, viewport geometry
//   quill-finder → directory walk, fuzzy file finder, live grep
//   quill-log    → file (and optional stdout) logging
//
// Every command drives an `Editor` through the same named operations an
// interactive front end would use: it opens a document the way the host
// does after reading a file, types into prompts, confirms replacements, and
// performs the save the editor requests. Output goes to stdout; errors and
// status messages to stderr.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use quill_editor::config::EditorConfig;
use quill_editor::editor::{Editor, HostRequest};
use quill_editor::mode::{InteractionMode, ReplaceStep};
use quill_editor::viewport;
use quill_finder::{DirectoryScanner, Finder, LiveGrep};
use quill_log::LogConfig;

/// How often `find` checks on its background search.
const POLL_INTERVAL: Duration = Duration::from_millis(2);

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "quill", version, about = "Search, replace and preview text files with the quill editing core")]
struct Cli {
    /// Config file (default: <config_dir>/quill/config.json).
    #[arg(long, global = true, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    /// Log file, or a directory to put quill-<pid>.log in.
    #[arg(long, global = true, env = "QUILL_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every match of a literal pattern as LINE:COL: TEXT.
    Find { file: PathBuf, pattern: String },

    /// Replace every occurrence of a literal string.
    Replace {
        file: PathBuf,
        /// Text to find.
        #[arg(long)]
        find: String,
        /// Replacement text.
        #[arg(long)]
        with: String,
        /// Save the result back to FILE instead of printing it.
        #[arg(long)]
        write: bool,
    },

    /// Print the soft-wrapped pane the editor would show.
    View {
        file: PathBuf,
        #[arg(long, default_value_t = 80)]
        width: usize,
        #[arg(long, default_value_t = 24)]
        height: usize,
        /// 1-based line to put the cursor on.
        #[arg(long)]
        line: Option<usize>,
    },

    /// Fuzzy-find files under ROOT.
    Files {
        #[arg(default_value = ".")]
        root: PathBuf,
        query: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Print every line under ROOT containing PATTERN as PATH:LINE: TEXT.
    Grep {
        pattern: String,
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match quill_log::init(LogConfig {
        log_file_path: cli.log_file.clone(),
    }) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("quill: logging disabled: {e}");
            None
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("quill: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Find { file, pattern } => find(&config, &file, &pattern, out),
        Command::Replace {
            file,
            find,
            with,
            write,
        } => replace(&config, &file, &find, &with, write, out),
        Command::View {
            file,
            width,
            height,
            line,
        } => view(&config, &file, width, height, line, out),
        Command::Files { root, query, limit } => files(&config, &root, query.as_deref().unwrap_or(""), limit, out),
        Command::Grep { pattern, root } => grep(&config, &root, &pattern, out),
    }
}

/// An explicit config file must load; the per-user one falls back to
/// defaults with a warning.
fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    if let Some(path) = path {
        return EditorConfig::load(Some(path)).with_context(|| format!("loading config {}", path.display()));
    }
    let (config, err) = EditorConfig::load_or_default(None);
    if let Some(err) = err {
        warn!(error = %err, "config unusable, using defaults");
        eprintln!("quill: {err}, using defaults");
    }
    Ok(config)
}

/// Read `file` and hand it to a fresh editor, cursor on `cursor_row`.
fn open_editor(config: &EditorConfig, file: &Path, width: usize, height: usize, cursor_row: usize) -> Result<Editor> {
    let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let mut editor = Editor::new(config, width, height);
    editor.open_document(&text, Some(file.to_path_buf()), cursor_row);
    Ok(editor)
}

// ─── Commands ───────────────────────────────────────────────────────────────

fn find(config: &EditorConfig, file: &Path, pattern: &str, out: &mut impl Write) -> Result<()> {
    let mut editor = open_editor(config, file, 80, 24, 0)?;

    editor.search_async(pattern);
    while editor.search_in_flight() {
        thread::sleep(POLL_INTERVAL);
        editor.poll_search_results();
    }
    editor.poll_search_results();

    let buffer = editor.buffer();
    for m in editor.search_matches() {
        writeln!(out, "{}: {}", m.start(), buffer.line_text(m.line))?;
    }
    info!(file = %file.display(), pattern, matches = editor.search_matches().len(), "find");
    Ok(())
}

fn replace(
    config: &EditorConfig,
    file: &Path,
    query: &str,
    replacement: &str,
    write: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut editor = open_editor(config, file, 80, 24, 0)?;

    editor.begin_replace();
    editor.prompt_paste(query);
    editor.prompt_submit();
    if editor.mode()
        == (InteractionMode::Replacing {
            step: ReplaceStep::Replacement,
        })
    {
        editor.prompt_paste(replacement);
        editor.prompt_submit();
    }

    // One confirm per original match. A replacement that contains the query
    // keeps producing matches, so the flow is not run to exhaustion.
    let total = editor.replace_controller().matches().len();
    let mut replaced = 0;
    while replaced < total
        && editor.mode()
            == (InteractionMode::Replacing {
                step: ReplaceStep::Confirm,
            })
    {
        editor.replace_confirm();
        replaced += 1;
    }
    if editor.mode().is_replacing() {
        editor.cancel();
    }
    eprintln!("quill: {replaced} replaced");

    if write {
        if replaced > 0 {
            save(&mut editor)?;
        }
    } else {
        out.write_all(editor.buffer().text_with_line_endings().as_bytes())?;
    }
    Ok(())
}

/// Ask the editor to save under its current path and perform the write it
/// requests.
fn save(editor: &mut Editor) -> Result<()> {
    editor.begin_save();
    let Some(HostRequest::Save(path)) = editor.prompt_submit() else {
        bail!("document has no file name");
    };
    let result = fs::write(&path, editor.buffer().text_with_line_endings());
    editor.finish_save(path.clone(), result.as_ref().map(|_| ()).map_err(ToString::to_string));
    result.with_context(|| format!("writing {}", path.display()))
}

fn view(
    config: &EditorConfig,
    file: &Path,
    width: usize,
    height: usize,
    line: Option<usize>,
    out: &mut impl Write,
) -> Result<()> {
    let row = line.map_or(0, |n| n.saturating_sub(1));
    let editor = open_editor(config, file, width, height, row)?;
    render(&editor, out)
}

fn files(config: &EditorConfig, root: &Path, query: &str, limit: usize, out: &mut impl Write) -> Result<()> {
    let finder = Finder::new(DirectoryScanner::new(config.ignore_dirs.iter().cloned()));
    let hits = finder
        .find_files(root, query, limit)
        .with_context(|| format!("scanning {}", root.display()))?;
    for hit in hits {
        let shown = hit.path.strip_prefix(root).unwrap_or(&hit.path);
        writeln!(out, "{}", shown.display())?;
    }
    Ok(())
}

fn grep(config: &EditorConfig, root: &Path, pattern: &str, out: &mut impl Write) -> Result<()> {
    let grep = LiveGrep::new(DirectoryScanner::new(config.ignore_dirs.iter().cloned()));
    let hits = grep
        .search(root, pattern)
        .with_context(|| format!("searching {}", root.display()))?;
    if hits.is_empty() {
        warn!(pattern, root = %root.display(), "grep: no hits");
    }
    for hit in hits {
        let shown = hit.path.strip_prefix(root).unwrap_or(&hit.path);
        writeln!(out, "{}:{}: {}", shown.display(), hit.line, hit.content)?;
    }
    Ok(())
}

// ─── Rendering ──────────────────────────────────────────────────────────────

/// Draw the pane as plain text: gutter, soft-wrapped rows, `~` filler
/// below the last line, then a status line.
fn render(editor: &Editor, out: &mut impl Write) -> Result<()> {
    let vp = editor.viewport();
    let buf = editor.buffer();
    let window = editor.visible_window();
    let gutter = viewport::gutter_width(buf.line_count(), vp.line_numbers());
    let text_width = vp.text_width(buf.line_count());

    let mut printed = 0;
    'lines: for row in window.first_line..window.first_line + window.line_count {
        let chars: Vec<char> = buf.line_text(row).chars().collect();
        let starts = viewport::row_starts(chars.iter().copied(), text_width, vp.tab_width());
        let skip = if row == window.first_line { window.skip_rows } else { 0 };

        for (i, &start) in starts.iter().enumerate().skip(skip) {
            if printed == vp.height() {
                break 'lines;
            }
            let end = starts.get(i + 1).copied().unwrap_or(chars.len());
            let mut text = String::new();
            if gutter > 0 {
                if i == 0 {
                    text.push_str(&format!("{:>w$} ", row + 1, w = gutter - 1));
                } else {
                    text.push_str(&" ".repeat(gutter));
                }
            }
            for &ch in &chars[start..end] {
                if ch == '\t' {
                    text.push_str(&" ".repeat(vp.tab_width()));
                } else {
                    text.push(ch);
                }
            }
            writeln!(out, "{}", text.trim_end())?;
            printed += 1;
        }
    }
    for _ in printed..vp.height() {
        writeln!(out, "~")?;
    }

    let name = buf
        .path()
        .and_then(Path::file_name)
        .map_or_else(|| "[new]".to_owned(), |n| n.to_string_lossy().into_owned());
    let modified = if buf.is_modified() { " [+]" } else { "" };
    writeln!(
        out,
        "{} {name}{modified}  {}  {}",
        editor.mode(),
        editor.cursor_position(),
        buf.line_ending()
    )?;
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────
