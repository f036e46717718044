//! Reaping of background children.

use std::io::Write;
use std::process::Child;

use anyhow::Result;

use crate::external::{Outcome, UNEXPECTED_OUTCOME, classify};

/// Live background children, in launch order.
///
/// The table is swept once per input line; this polling design means a
/// background exit is only observed between lines, never immediately and
/// never while a foreground command is blocking. There is no bound on the
/// number of live children.
pub(crate) struct JobTable {
    children: Vec<Child>,
}

impl JobTable {
    pub(crate) fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, child: Child) {
        self.children.push(child);
    }

    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Non-blockingly collects every child that has terminated by now.
    ///
    /// Sweeps the table with `try_wait`, reporting each terminated child, and
    /// repeats the sweep until one pass collects nothing. Unlike the
    /// foreground report, normal exits and signal terminations both use the
    /// "exited with status" wording. A child whose handle errors on
    /// `try_wait` is dropped silently.
    pub(crate) fn reap(&mut self, out: &mut dyn Write) -> Result<()> {
        loop {
            let mut collected = false;
            let mut idx = 0;
            while idx < self.children.len() {
                match self.children[idx].try_wait() {
                    Ok(Some(status)) => {
                        let child = self.children.swap_remove(idx);
                        collected = true;
                        let pid = child.id();
                        match classify(status) {
                            Outcome::Exited(code) | Outcome::Signaled(code) => {
                                writeln!(out, "[background process {pid} exited with status {code}]")?;
                            }
                            Outcome::Unknown => writeln!(out, "{UNEXPECTED_OUTCOME}")?,
                        }
                    }
                    Ok(None) => idx += 1,
                    Err(_) => {
                        self.children.swap_remove(idx);
                    }
                }
            }
            if !collected {
                break;
            }
        }
        out.flush()?;
        Ok(())
    }
}
