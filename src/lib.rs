//! A small line-oriented command interpreter.
//!
//! Each input line is split into commands separated by `;` (foreground) and
//! `&` (background). Foreground commands are waited for and their exit status
//! is reported immediately; background commands keep running and are reaped
//! at the end of every input line. `exit` and `cd` are handled in-process,
//! everything else is launched as a child process.
//!
//! The main entry point is [`Interpreter`], which drives one session over a
//! [`input::LineSource`]. The [`parser`] and [`lexer`] modules expose the
//! line-splitting building blocks on their own.

mod builtin;
pub mod error;
mod external;
pub mod input;
mod jobs;
pub mod lexer;
pub mod parser;
pub mod session;

mod interpreter;

pub use interpreter::{Flow, Interpreter};
