//! Readline wrapper for the interactive shell.
//!
//! Emacs-mode editing, history cycling, and persistent history in
//! `~/.gantry_history`. Missing or corrupt history files are ignored.

use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, EditMode};
use std::path::PathBuf;

/// Maximum number of history entries to retain.
const MAX_HISTORY: usize = 500;

/// History file name, stored in the user's home directory.
const HISTORY_FILE: &str = ".gantry_history";

/// Result of one line read.
pub enum ReadResult {
    Line(String),
    /// Ctrl-C — re-prompt.
    Interrupted,
    /// Ctrl-D or closed stdin.
    Eof,
}

/// Line editor with session history.
pub struct LineEditor {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl LineEditor {
    pub fn new() -> Self {
        let config = Config::builder()
            .edit_mode(EditMode::Emacs)
            .max_history_size(MAX_HISTORY)
            .expect("valid history size")
            .auto_add_history(false)
            .build();
        let mut editor =
            DefaultEditor::with_config(config).expect("failed to create line editor");

        let history_path = std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|home| home.join(HISTORY_FILE));
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        Self {
            editor,
            history_path,
        }
    }

    /// Read one line with the given prompt.
    pub fn read_line(&mut self, prompt: &str) -> ReadResult {
        match self.editor.readline(prompt) {
            Ok(line) => ReadResult::Line(line),
            Err(ReadlineError::Interrupted) => ReadResult::Interrupted,
            Err(_) => ReadResult::Eof,
        }
    }

    /// Remember a line and persist history. Write errors are ignored.
    pub fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
        if let Some(path) = &self.history_path {
            let _ = self.editor.save_history(path);
        }
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
