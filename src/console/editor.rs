//! Line input for the console.
//!
//! The console reads through [`LineEditor`] so the same loop drives an
//! interactive rustyline session, piped stdin, and scripted tests.

use std::io::BufRead;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::ConsoleError;

/// Result of reading a line from the editor.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadResult {
    /// A line was successfully read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// End of input (Ctrl+D or a closed pipe).
    Eof,
}

pub trait LineEditor {
    /// Read a line with the given prompt.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult, ConsoleError>;

    /// Add a line to history.
    fn add_history(&mut self, line: &str);
}

/// Terminal editor with history and line editing.
pub struct RustylineEditor {
    editor: DefaultEditor,
}

impl RustylineEditor {
    pub fn new() -> Result<Self, ConsoleError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult, ConsoleError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            tracing::debug!(error = %e, "could not record history entry");
        }
    }
}

/// Reads lines from any buffered reader without echoing a prompt.
/// Used for piped input and in tests.
pub struct ScriptEditor<R> {
    reader: R,
}

impl<R: BufRead> ScriptEditor<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineEditor for ScriptEditor<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult, ConsoleError> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(ReadResult::Eof);
        }
        // Undecodable bytes become U+FFFD; the line still reaches the console.
        let line = String::from_utf8_lossy(&buf)
            .trim_end_matches(&['\n', '\r'][..])
            .to_string();
        Ok(ReadResult::Line(line))
    }

    fn add_history(&mut self, _line: &str) {}
}
