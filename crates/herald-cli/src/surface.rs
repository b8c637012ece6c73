//! Terminal rendering of a voice-command cycle.

use std::io::{self, Write};

/// Shown when the node accepted the command.
pub(crate) const RECOGNIZED_STATUS: &str = "Text recognized by node!";
/// Shown for every other outcome.
pub(crate) const NOT_RECOGNIZED_STATUS: &str = "Text NOT recognized by node!";

/// Writes phrases and node verdicts to stdout, problems to stderr.
pub(crate) struct TerminalSurface<'a, W: Write, E: Write> {
    stdout: &'a mut W,
    stderr: &'a mut E,
    deferred: Option<io::Error>,
}

impl<'a, W: Write, E: Write> TerminalSurface<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdout,
            stderr,
            deferred: None,
        }
    }

    pub(crate) fn show_phrase(&mut self, phrase: &str) -> io::Result<()> {
        writeln!(self.stdout, "Recognized: {phrase}")
    }

    pub(crate) fn show_sending(&mut self, url: &str) -> io::Result<()> {
        writeln!(self.stdout, "Sending: GET {url}")?;
        self.stdout.flush()
    }

    pub(crate) fn show_problem(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.stderr, "{message}")
    }

    /// Records the node verdict.
    ///
    /// Used from a completion callback, which cannot fail; a write error is
    /// held until [`Self::finish_status`] is called.
    pub(crate) fn record_status(&mut self, recognized: bool) {
        let status = if recognized {
            RECOGNIZED_STATUS
        } else {
            NOT_RECOGNIZED_STATUS
        };
        if let Err(error) = writeln!(self.stdout, "{status}").and_then(|()| self.stdout.flush()) {
            self.deferred = Some(error);
        }
    }

    pub(crate) fn finish_status(&mut self) -> io::Result<()> {
        self.deferred.take().map_or(Ok(()), Err)
    }
}
