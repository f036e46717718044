//! Tokenization of a single command segment.

/// Upper bound on the number of argument tokens kept for one command.
///
/// This caps worst-case memory for a single command line; tokens past the
/// bound are dropped silently rather than reported as an error.
pub const MAX_ARGS: usize = 128;

/// Splits a segment's text on runs of whitespace into argument tokens.
///
/// Empty fields are dropped, so an all-whitespace (or empty) segment yields an
/// empty vector. At most [`MAX_ARGS`] tokens are returned. The first token, if
/// any, is the program name.
pub fn split_args(text: &str) -> Vec<&str> {
    text.split_whitespace().take(MAX_ARGS).collect()
}
