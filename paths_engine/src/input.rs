//! Terminal input handling for the player REPL.
//!
//! Wraps rustyline with completion for the command words and save slot
//! names, and falls back to plain stdin when no terminal is attached.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::repl::COMMAND_WORDS;

/// Outcome of reading a line from the REPL input.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

type ReplEditor = rustyline::Editor<PathsHelper, DefaultHistory>;

struct PathsHelper {
    saves_dir: PathBuf,
}

impl Helper for PathsHelper {}

impl Completer for PathsHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, prefix) = current_prefix(line, pos);
        if prefix.is_empty() {
            return Ok((start, Vec::new()));
        }
        let lower = prefix.to_lowercase();
        if let Some(partial) = lower.strip_prefix("load ") {
            let offset = start + prefix.len() - partial.len();
            let pairs = save_slot_names(&self.saves_dir)
                .into_iter()
                .filter(|slot| slot.starts_with(partial.trim_start()))
                .map(|slot| Pair {
                    display: slot.clone(),
                    replacement: slot,
                })
                .collect();
            return Ok((offset, pairs));
        }
        let pairs = COMMAND_WORDS
            .iter()
            .filter(|word| word.starts_with(&lower))
            .map(|word| Pair {
                display: (*word).to_string(),
                replacement: (*word).to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for PathsHelper {
    type Hint = String;
}

impl Highlighter for PathsHelper {}

impl Validator for PathsHelper {}

fn current_prefix(line: &str, pos: usize) -> (usize, String) {
    let slice = &line[..pos];
    let trimmed = slice.trim_start_matches(char::is_whitespace);
    let start = pos - trimmed.len();
    (start, trimmed.to_string())
}

fn save_slot_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
        .filter_map(|path| path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string))
        .collect();
    names.sort_unstable();
    names
}

/// Manages the interactive input backend.
///
/// Prefers `rustyline` when an interactive terminal is available, falling back to
/// a basic stdin reader otherwise.
pub struct InputManager {
    backend: Backend,
}

impl InputManager {
    pub fn new(saves_dir: &Path) -> Self {
        let backend = if io::stdin().is_terminal() {
            match RustylineInput::new(saves_dir) {
                Ok(editor) => {
                    info!("using rustyline-backed REPL input");
                    Backend::Rustyline(editor)
                },
                Err(err) => {
                    warn!("failed to initialize rustyline ({err}), falling back to basic stdin");
                    Backend::plain()
                },
            }
        } else {
            info!("stdin is not a TTY; using basic input mode");
            Backend::plain()
        };

        Self { backend }
    }

    /// Read a line from the current backend. If the interactive backend reports an
    /// unrecoverable error, switch to the plain stdin backend and retry once.
    ///
    /// # Errors
    /// - if reading from stdin fails
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.backend.read_line(prompt) {
            Ok(event) => Ok(event),
            Err(err) if self.backend.is_rustyline() => {
                warn!("rustyline input failed: {err} -- switching to basic stdin");
                self.backend = Backend::plain();
                self.backend.read_line(prompt)
            },
            Err(err) => Err(err),
        }
    }
}

enum Backend {
    Rustyline(Box<RustylineInput>),
    Plain(StdinInput),
}

impl Backend {
    fn plain() -> Self {
        Backend::Plain(StdinInput::default())
    }

    fn is_rustyline(&self) -> bool {
        matches!(self, Backend::Rustyline(_))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self {
            Backend::Rustyline(editor) => editor.read_line(prompt),
            Backend::Plain(stdin) => stdin.read_line(prompt),
        }
    }
}

struct RustylineInput {
    editor: ReplEditor,
    history_path: Option<PathBuf>,
}

impl RustylineInput {
    fn new(saves_dir: &Path) -> io::Result<Box<Self>> {
        let mut editor = ReplEditor::new().map_err(map_io_err)?;
        editor.set_helper(Some(PathsHelper {
            saves_dir: saves_dir.to_path_buf(),
        }));
        let history_path = history_file_path();

        if let Some(path) = history_path.as_ref() {
            if let Some(dir) = path.parent()
                && let Err(err) = fs::create_dir_all(dir)
            {
                warn!("failed to create history directory {}: {err}", dir.display());
            }
            match editor.load_history(path) {
                Ok(()) => {},
                Err(ReadlineError::Io(ref io_err)) if io_err.kind() == io::ErrorKind::NotFound => {
                    info!("no prior history found at {}, starting fresh", path.display());
                },
                Err(other) => warn!("failed to load history from {}: {other}", path.display()),
            }
        }

        Ok(Box::new(Self { editor, history_path }))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        warn!("failed to append to history: {err}");
                    }
                    if let Some(path) = self.history_path.as_ref()
                        && let Err(err) = self.editor.save_history(path)
                    {
                        warn!("failed to persist history to {}: {err}", path.display());
                    }
                }
                Ok(InputEvent::Line(line))
            },
            Err(err) => convert_readline_error(err),
        }
    }
}

#[derive(Default)]
struct StdinInput {
    buffer: String,
}

impl StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        print!("{prompt}");
        io::stdout().flush()?;

        self.buffer.clear();
        if io::stdin().read_line(&mut self.buffer)? == 0 {
            return Ok(InputEvent::Eof);
        }
        let line = self.buffer.trim_end_matches(['\n', '\r']);
        Ok(InputEvent::Line(line.to_string()))
    }
}

fn convert_readline_error(err: ReadlineError) -> io::Result<InputEvent> {
    match err {
        ReadlineError::Interrupted => Ok(InputEvent::Interrupted),
        ReadlineError::Eof => Ok(InputEvent::Eof),
        other => Err(map_io_err(other)),
    }
}

fn map_io_err(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(io_err) => io_err,
        other => io::Error::other(other),
    }
}

fn history_file_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| build_history_path(&base))
}

fn build_history_path(base: &Path) -> PathBuf {
    base.join("paths_engine").join("history.txt")
}
