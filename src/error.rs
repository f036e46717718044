//! Fatal interpreter errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The conditions that abort the whole interpreter.
///
/// Everything else (a bad `cd` target, an unresolvable command name) is
/// reported where it happens and the session continues. Each variant maps to
/// a distinct process exit code via [`ShellError::exit_code`].
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("cannot open input file {}: {source}", path.display())]
    OpenInput { path: PathBuf, source: io::Error },

    #[error("cannot redirect standard input: {0}")]
    RedirectStdin(io::Error),

    #[error("unable to read command line: {0}")]
    ReadLine(String),

    #[error("cannot create child process for {name}: {source}")]
    Spawn { name: String, source: io::Error },
}

impl ShellError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ShellError::OpenInput { .. } => 1,
            ShellError::RedirectStdin(_) => 2,
            ShellError::ReadLine(_) => 3,
            ShellError::Spawn { .. } => 4,
        }
    }
}
