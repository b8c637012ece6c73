//! Terminal stand-ins for a speech recognizer.
//!
//! `listen` reads one already-recognised phrase per line of input; `send`
//! offers a single phrase given on the command line.

use std::io::BufRead;

use herald_core::{ErrorKind, RecognitionOutcome, RecognizerSettings, SpeechRecognizer};

/// Consecutive read failures after which input is treated as closed.
const READ_ERROR_LIMIT: usize = 10;

/// Yields one recognition attempt per input line.
///
/// A blank line reports [`ErrorKind::NoMatch`]; an unreadable line reports
/// [`ErrorKind::ClientError`]; end of input closes the session.
pub(crate) struct LineRecognizer<R> {
    input: R,
    read_errors: usize,
}

impl<R: BufRead> LineRecognizer<R> {
    pub(crate) fn new(input: R) -> Self {
        Self {
            input,
            read_errors: 0,
        }
    }
}

impl<R: BufRead> SpeechRecognizer for LineRecognizer<R> {
    fn is_available(&self) -> bool {
        true
    }

    fn recognize(&mut self, _settings: &RecognizerSettings) -> Option<RecognitionOutcome> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                self.read_errors = 0;
                let phrase = line.trim();
                if phrase.is_empty() {
                    return Some(RecognitionOutcome::Error(ErrorKind::NoMatch));
                }
                Some(RecognitionOutcome::Matches(vec![phrase.to_owned()]))
            }
            Err(error) => {
                self.read_errors += 1;
                tracing::warn!(
                    target: "herald::session",
                    event = "input_unreadable",
                    error = %error,
                    "failed to read phrase from input"
                );
                if self.read_errors >= READ_ERROR_LIMIT {
                    return None;
                }
                Some(RecognitionOutcome::Error(ErrorKind::ClientError))
            }
        }
    }
}

/// Offers exactly one phrase, then closes.
pub(crate) struct PhraseRecognizer {
    phrase: Option<String>,
}

impl PhraseRecognizer {
    pub(crate) fn new(words: &[String]) -> Self {
        Self {
            phrase: Some(words.join(" ")),
        }
    }
}

impl SpeechRecognizer for PhraseRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    fn recognize(&mut self, _settings: &RecognizerSettings) -> Option<RecognitionOutcome> {
        self.phrase
            .take()
            .map(|phrase| RecognitionOutcome::Matches(vec![phrase]))
    }
}
