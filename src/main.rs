use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::os::fd::AsRawFd;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use argh::FromArgs;

use seqsh::Interpreter;
use seqsh::error::ShellError;
use seqsh::input::{ConsoleSource, ScriptSource};

#[derive(FromArgs)]
/// A line-oriented command interpreter: `;` runs commands in sequence,
/// `&` launches them in the background.
struct Args {
    #[argh(positional)]
    /// script whose contents replace standard input for the whole session
    script: Option<PathBuf>,
}

fn main() {
    let args: Args = argh::from_env();
    if let Err(err) = run(args) {
        eprintln!("seqsh: {err:#}");
        let code = err.downcast_ref::<ShellError>().map_or(1, ShellError::exit_code);
        process::exit(code);
    }
}

fn run(args: Args) -> Result<()> {
    let mut interpreter = Interpreter::new(io::stdout());

    if let Some(path) = args.script {
        let file = File::open(&path).map_err(|source| ShellError::OpenInput {
            path: path.clone(),
            source,
        })?;
        // Swap the script in as fd 0 so child processes inherit it too.
        redirect_stdin(&file)?;
        drop(file);
        let mut source = ScriptSource::new(BufReader::new(io::stdin()));
        return interpreter.run(&mut source);
    }

    if io::stdin().is_terminal() {
        let mut source = ConsoleSource::new()?;
        interpreter.run(&mut source)
    } else {
        let mut source = ScriptSource::new(BufReader::new(io::stdin()));
        interpreter.run(&mut source)
    }
}

fn redirect_stdin(file: &File) -> Result<(), ShellError> {
    let rc = unsafe { libc::dup2(file.as_raw_fd(), libc::STDIN_FILENO) };
    if rc == -1 {
        return Err(ShellError::RedirectStdin(io::Error::last_os_error()));
    }
    Ok(())
}
