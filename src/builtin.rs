use std::io::Write;

use anyhow::Result;
use argh::{EarlyExit, FromArgs};

use crate::interpreter::Flow;
use crate::session::Session;

/// Commands executed in the interpreter's own process, no child is spawned.
///
/// Builtins are parsed with the [`argh`] crate (`FromArgs`) and run against
/// the session state. They are checked before any process launch, regardless
/// of the segment's foreground/background tag.
pub(crate) trait Builtin: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Runs the command against the session, writing diagnostics to `out`.
    fn run(self, session: &mut Session, out: &mut dyn Write) -> Result<Flow>;
}

/// Tries the first token of `argv` against every builtin.
///
/// `None` means "not a builtin": the caller should launch an external
/// process. `Some` means the segment was handled in-process, including the
/// case where `argh` rejected the arguments and usage text was printed.
pub(crate) fn dispatch(
    argv: &[&str],
    session: &mut Session,
    out: &mut dyn Write,
) -> Option<Result<Flow>> {
    try_one::<Exit>(argv, session, out).or_else(|| try_one::<Cd>(argv, session, out))
}

fn try_one<T: Builtin>(
    argv: &[&str],
    session: &mut Session,
    out: &mut dyn Write,
) -> Option<Result<Flow>> {
    if argv[0] != T::name() {
        return None;
    }
    Some(match T::from_args(&argv[..1], &argv[1..]) {
        Ok(cmd) => cmd.run(session, out),
        Err(EarlyExit { output, .. }) => write_usage(out, &output),
    })
}

fn write_usage(out: &mut dyn Write, output: &str) -> Result<Flow> {
    writeln!(out, "{}", output.trim_end())?;
    out.flush()?;
    Ok(Flow::Continue)
}

#[derive(FromArgs)]
/// Terminate the session immediately with status 0.
pub struct Exit {
    #[argh(positional, greedy)]
    /// operands are accepted and ignored
    pub _args: Vec<String>,
}

impl Builtin for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn run(self, _session: &mut Session, _out: &mut dyn Write) -> Result<Flow> {
        Ok(Flow::Exit)
    }
}

#[derive(FromArgs)]
/// Change the session's working directory.
/// With no operand this is a no-op; extra operands are ignored.
pub struct Cd {
    #[argh(positional, greedy)]
    /// directory to switch to, absolute or relative to the session directory
    pub target: Vec<String>,
}

impl Builtin for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn run(self, session: &mut Session, out: &mut dyn Write) -> Result<Flow> {
        let Some(target) = self.target.first().filter(|t| !t.is_empty()) else {
            return Ok(Flow::Continue);
        };
        if let Err(err) = session.change_dir(target) {
            writeln!(out, "seqsh: cd: {target}: {err}")?;
            out.flush()?;
        }
        Ok(Flow::Continue)
    }
}
