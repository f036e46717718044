//! Per-session interpreter state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// State owned by one interpreter session.
///
/// The working directory is held here instead of in the ambient process state:
/// `cd` mutates this struct, and the launcher spawns children in
/// `current_dir`. The interpreter process's own working directory is never
/// changed.
#[derive(Debug, Clone)]
pub struct Session {
    pub current_dir: PathBuf,
}

impl Session {
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { current_dir }
    }

    /// Changes the session's working directory.
    ///
    /// Relative targets are resolved against the current session directory,
    /// then canonicalized. The target must exist and be a directory; on any
    /// failure the session directory is left untouched.
    pub fn change_dir(&mut self, target: &str) -> io::Result<()> {
        let target = Path::new(target);
        let candidate = if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.current_dir.join(target)
        };
        let canonical = fs::canonicalize(&candidate)?;
        if !canonical.is_dir() {
            return Err(io::ErrorKind::NotADirectory.into());
        }
        self.current_dir = canonical;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
