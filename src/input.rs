//! Sources of raw input lines.
//!
//! The interpreter core is written against [`LineSource`]; the binary wires
//! it either to a [`rustyline`]-backed console editor or to a buffered
//! reader over a script (or piped stdin).

use std::io::{self, BufRead, Write};

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::ShellError;

/// Prompt shown before every input line.
pub const PROMPT: &str = "$ ";

/// Hands the interpreter one raw line at a time.
///
/// `Ok(None)` is orderly end-of-input; an `Err` is an unreadable input
/// stream, which is fatal to the session.
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Interactive console source with line editing and history.
pub struct ConsoleSource {
    editor: DefaultEditor,
}

impl ConsoleSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for ConsoleSource {
    fn next_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(PROMPT) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) => Ok(None),
            // ctrl-C abandons the current line, the session goes on
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(err) => Err(ShellError::ReadLine(err.to_string()).into()),
        }
    }
}

/// Line source over a script file or piped stdin.
///
/// The prompt is still echoed before every line, matching the interactive
/// transcript format.
pub struct ScriptSource<R> {
    input: R,
}

impl<R: BufRead> ScriptSource<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        print!("{PROMPT}");
        io::stdout().flush().ok();
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|err| ShellError::ReadLine(err.to_string()))?;
        Ok((read > 0).then_some(line))
    }
}
