//! Launching and classifying external commands.

use std::io::{self, Write};
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};

use crate::error::ShellError;
use crate::jobs::JobTable;
use crate::parser::Mode;
use crate::session::Session;

/// Status line printed when a termination state is neither a normal exit nor
/// a signal.
pub(crate) const UNEXPECTED_OUTCOME: &str = "Something unexpected happened.";

/// How a terminated child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Exited(i32),
    Signaled(i32),
    Unknown,
}

pub(crate) fn classify(status: ExitStatus) -> Outcome {
    if let Some(code) = status.code() {
        return Outcome::Exited(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Outcome::Signaled(signal);
        }
    }
    Outcome::Unknown
}

/// Launches one non-builtin command.
///
/// The child inherits the interpreter's standard streams (including a
/// redirected stdin set up at startup) and runs in the session's working
/// directory; a bare program name is resolved through the environment's
/// search path. Foreground commands are waited for and their status line is
/// written to `out`; background commands go to the job table and are reaped
/// between lines.
///
/// An unresolvable or unexecutable program is recoverable: the failure is
/// reported and a status line with status 1 is emitted, as if the command had
/// started and exited 1. Any other spawn failure (resource exhaustion) is
/// fatal and surfaces as [`ShellError::Spawn`].
pub(crate) fn launch(
    argv: &[&str],
    mode: Mode,
    session: &Session,
    jobs: &mut JobTable,
    out: &mut dyn Write,
) -> Result<()> {
    let name = argv[0];
    let spawned = Command::new(name)
        .args(&argv[1..])
        .current_dir(&session.current_dir)
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
            ) =>
        {
            eprintln!("seqsh: {name}: {err}");
            writeln!(out, "[{name} exited with status 1]")?;
            out.flush()?;
            return Ok(());
        }
        Err(err) => {
            return Err(ShellError::Spawn {
                name: name.to_string(),
                source: err,
            }
            .into());
        }
    };

    match mode {
        Mode::Background => jobs.push(child),
        Mode::Foreground => {
            let status = child
                .wait()
                .with_context(|| format!("waiting for {name}"))?;
            match classify(status) {
                Outcome::Exited(code) => writeln!(out, "[{name} exited with status {code}]")?,
                Outcome::Signaled(signal) => writeln!(out, "[{name} died with status {signal}]")?,
                Outcome::Unknown => writeln!(out, "{UNEXPECTED_OUTCOME}")?,
            }
            out.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch_collect(argv: &[&str], mode: Mode, jobs: &mut JobTable) -> String {
        let session = Session::new();
        let mut out = Vec::new();
        launch(argv, mode, &session, jobs, &mut out).expect("launch failed");
        String::from_utf8(out).unwrap()
    }

    #[test]
    #[cfg(unix)]
    fn foreground_success_reports_status_zero() {
        let mut jobs = JobTable::new();
        let out = launch_collect(&["true"], Mode::Foreground, &mut jobs);
        assert_eq!(out, "[true exited with status 0]\n");
        assert!(jobs.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn foreground_failure_reports_exit_code() {
        let mut jobs = JobTable::new();
        let out = launch_collect(&["false"], Mode::Foreground, &mut jobs);
        assert_eq!(out, "[false exited with status 1]\n");
    }

    #[test]
    #[cfg(unix)]
    fn foreground_signal_reports_died() {
        let mut jobs = JobTable::new();
        let out = launch_collect(&["sh", "-c", "kill -TERM $$"], Mode::Foreground, &mut jobs);
        assert_eq!(out, format!("[sh died with status {}]\n", libc::SIGTERM));
    }

    #[test]
    fn unresolvable_name_is_recoverable() {
        let mut jobs = JobTable::new();
        let out = launch_collect(
            &["definitely_not_a_command_seqsh"],
            Mode::Foreground,
            &mut jobs,
        );
        assert_eq!(out, "[definitely_not_a_command_seqsh exited with status 1]\n");
    }

    #[test]
    #[cfg(unix)]
    fn background_launch_returns_without_status_line() {
        let mut jobs = JobTable::new();
        let out = launch_collect(&["true"], Mode::Background, &mut jobs);
        assert!(out.is_empty());
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn child_runs_in_session_dir() {
        use std::fs;

        let temp = std::env::temp_dir().join(format!("seqsh_test_external_{}", std::process::id()));
        fs::create_dir_all(&temp).unwrap();
        let canonical = fs::canonicalize(&temp).unwrap();

        let mut session = Session::new();
        session.current_dir = canonical.clone();

        let marker = "spawned_here";
        let mut jobs = JobTable::new();
        let mut out = Vec::new();
        launch(
            &["touch", marker],
            Mode::Foreground,
            &session,
            &mut jobs,
            &mut out,
        )
        .expect("launch failed");

        assert!(canonical.join(marker).exists());

        let _ = fs::remove_dir_all(&temp);
    }
}
