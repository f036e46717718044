use std::io::Write;

use anyhow::Result;

use crate::builtin;
use crate::external;
use crate::input::LineSource;
use crate::jobs::JobTable;
use crate::lexer;
use crate::parser::NormalizedLine;
use crate::session::Session;

/// What the session loop should do after a line (or builtin) was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The interpreter for one session.
///
/// Owns the session state, the background job table and the sink that status
/// lines are written to. Each input line is normalized, split into segments,
/// and every segment is either handled by a builtin or launched as a child
/// process; afterwards any terminated background children are reaped.
///
/// Example
/// ```
/// use seqsh::{Flow, Interpreter};
/// let mut sh = Interpreter::new(Vec::new());
/// assert_eq!(sh.run_line("true").unwrap(), Flow::Continue);
/// assert_eq!(sh.run_line("exit").unwrap(), Flow::Exit);
/// ```
pub struct Interpreter<W: Write> {
    session: Session,
    jobs: JobTable,
    out: W,
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter writing status lines to `out`.
    pub fn new(out: W) -> Self {
        Self::with_session(Session::new(), out)
    }

    /// Creates an interpreter over an explicit session state.
    pub fn with_session(session: Session, out: W) -> Self {
        Self {
            session,
            jobs: JobTable::new(),
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Processes one raw input line.
    ///
    /// Segments separated by `;` run strictly sequentially; a segment
    /// terminated by `&` is launched and control moves on immediately.
    /// Segments that tokenize to nothing are silently skipped. `exit` ends
    /// the session on the spot: remaining segments never run and no reap
    /// happens. Otherwise the job table is reaped once the whole line has
    /// been dispatched.
    pub fn run_line(&mut self, raw: &str) -> Result<Flow> {
        let line = NormalizedLine::normalize(raw);
        for segment in line.segments() {
            let argv = lexer::split_args(segment.text);
            if argv.is_empty() {
                continue;
            }
            if let Some(handled) = builtin::dispatch(&argv, &mut self.session, &mut self.out) {
                match handled? {
                    Flow::Exit => return Ok(Flow::Exit),
                    Flow::Continue => continue,
                }
            }
            external::launch(
                &argv,
                segment.mode,
                &self.session,
                &mut self.jobs,
                &mut self.out,
            )?;
        }
        self.jobs.reap(&mut self.out)?;
        Ok(Flow::Continue)
    }

    /// Runs the session loop until `exit`, end-of-input or a fatal error.
    ///
    /// End-of-input is not an error: a farewell is printed and the loop
    /// returns normally. On `exit` the loop returns immediately, leaving any
    /// live background children running.
    pub fn run(&mut self, source: &mut dyn LineSource) -> Result<()> {
        loop {
            let Some(line) = source.next_line()? else {
                writeln!(self.out, "\nShutting down...")?;
                self.out.flush()?;
                return Ok(());
            };
            if self.run_line(&line)? == Flow::Exit {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptSource;
    use std::io::Cursor;
    use std::thread;
    use std::time::Duration;

    fn run_lines(lines: &[&str]) -> (Flow, String) {
        let mut sh = Interpreter::new(Vec::new());
        let mut flow = Flow::Continue;
        for line in lines {
            flow = sh.run_line(line).expect("run_line failed");
            if flow == Flow::Exit {
                break;
            }
        }
        let out = String::from_utf8(std::mem::take(&mut sh.out)).unwrap();
        (flow, out)
    }

    #[test]
    fn blank_lines_produce_no_output() {
        let (flow, out) = run_lines(&["", "   ", "\t \n"]);
        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_segments_are_skipped() {
        let (flow, out) = run_lines(&[" ; ;;"]);
        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn foreground_segments_run_in_order() {
        let (_, out) = run_lines(&["false;true"]);
        assert_eq!(
            out,
            "[false exited with status 1]\n[true exited with status 0]\n"
        );
    }

    #[test]
    fn exit_ends_the_session() {
        let (flow, _) = run_lines(&["exit"]);
        assert_eq!(flow, Flow::Exit);
    }

    #[test]
    #[cfg(unix)]
    fn exit_skips_later_segments_but_not_earlier_ones() {
        let (flow, out) = run_lines(&["true;exit;false"]);
        assert_eq!(flow, Flow::Exit);
        assert_eq!(out, "[true exited with status 0]\n");
    }

    #[test]
    fn unresolvable_command_does_not_stop_the_line() {
        let (flow, out) = run_lines(&["no_such_cmd_seqsh;true"]);
        assert_eq!(flow, Flow::Continue);
        assert!(out.starts_with("[no_such_cmd_seqsh exited with status 1]\n"));
        assert!(out.contains("[true exited with status 0]"));
    }

    #[test]
    fn cd_diagnostic_does_not_stop_the_session() {
        let mut sh = Interpreter::new(Vec::new());
        let before = sh.session().current_dir.clone();

        let flow = sh.run_line("cd /nonexistent/path").unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(sh.session().current_dir, before);
        let out = String::from_utf8(sh.out).unwrap();
        assert!(out.contains("/nonexistent/path"));
    }

    #[test]
    #[cfg(unix)]
    fn background_child_is_reaped_on_a_later_line() {
        let mut sh = Interpreter::new(Vec::new());

        sh.run_line("sleep 0 &").unwrap();
        thread::sleep(Duration::from_millis(300));
        sh.run_line("").unwrap();

        let out = String::from_utf8(sh.out).unwrap();
        assert!(out.contains("[background process "));
        assert!(out.contains("exited with status 0]"));
    }

    #[test]
    #[cfg(unix)]
    fn background_segment_does_not_block_the_line() {
        let mut sh = Interpreter::new(Vec::new());

        sh.run_line("sleep 3 &;true").unwrap();

        let out = String::from_utf8(std::mem::take(&mut sh.out)).unwrap();
        assert_eq!(out, "[true exited with status 0]\n");
        assert!(!sh.jobs.is_empty());

        sh.run_line("exit").unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn session_loop_reports_farewell_on_eof() {
        let mut sh = Interpreter::new(Vec::new());
        let mut source = ScriptSource::new(Cursor::new("true\n"));

        sh.run(&mut source).unwrap();

        let out = String::from_utf8(sh.out).unwrap();
        assert!(out.contains("[true exited with status 0]"));
        assert!(out.ends_with("\nShutting down...\n"));
    }

    #[test]
    #[cfg(unix)]
    fn session_loop_stops_at_exit_without_farewell() {
        let mut sh = Interpreter::new(Vec::new());
        let mut source = ScriptSource::new(Cursor::new("true\nexit\nfalse\n"));

        sh.run(&mut source).unwrap();

        let out = String::from_utf8(sh.out).unwrap();
        assert_eq!(out, "[true exited with status 0]\n");
    }
}
