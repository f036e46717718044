//! Line normalization and command splitting.
//!
//! A raw input line is first normalized: trailing whitespace is stripped and
//! the line is guaranteed to end in exactly one sequencing terminator (`;` or
//! `&`). The normalized line is then cut into [`Segment`]s, one per command,
//! each tagged with the [`Mode`] derived from the terminator that follows it.

/// Whether the interpreter waits for a command before moving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Wait for the child and report its status before the next segment runs.
    Foreground,
    /// Launch the child and continue immediately; reaped between lines.
    Background,
}

/// One command's text plus its sequencing tag, borrowed from a [`NormalizedLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub mode: Mode,
}

/// A line with trailing whitespace removed and a guaranteed trailing `;` or `&`.
///
/// The one exception is a blank line (empty or all-whitespace): it normalizes
/// to itself unchanged, so [`NormalizedLine::segments`] yields nothing and the
/// line is a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine(String);

impl NormalizedLine {
    /// Normalizes one raw input line.
    ///
    /// Scans past trailing whitespace; if the last meaningful character is
    /// already `;` or `&` the line is truncated right after it, otherwise a
    /// `;` is appended (implicit foreground sequencing).
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim_end();
        if trimmed.is_empty() {
            return Self(raw.to_string());
        }
        let mut line = trimmed.to_string();
        if !line.ends_with(';') && !line.ends_with('&') {
            line.push(';');
        }
        Self(line)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the command segments of this line, in order.
    ///
    /// Empty segments (a leading terminator, or two terminators with nothing
    /// between them) are still yielded; tokenization decides whether they
    /// amount to a command.
    pub fn segments(&self) -> Segments<'_> {
        Segments { rest: &self.0 }
    }
}

/// Lazy iterator over the segments of a [`NormalizedLine`].
pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let at = self.rest.find([';', '&'])?;
        let mode = if self.rest.as_bytes()[at] == b';' {
            Mode::Foreground
        } else {
            Mode::Background
        };
        let text = &self.rest[..at];
        self.rest = &self.rest[at + 1..];
        Some(Segment { text, mode })
    }
}
