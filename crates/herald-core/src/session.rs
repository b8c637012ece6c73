//! Voice session context tying recognition to dispatch.
//!
//! A [`VoiceSession`] holds what an interactive surface would otherwise keep in
//! widgets: the recognizer, the currently displayed phrase, the raw target
//! address, and whether a dispatch is still outstanding. Each recognition and
//! send is one independent voice-command cycle.

use thiserror::Error;

use crate::address::{AddressParseError, TargetAddress};
use crate::command::CommandRequest;
use crate::dispatch::{Dispatcher, PendingDispatch};
use crate::gate::InFlightGate;
use crate::recognition::{
    Classification, ErrorKind, RecognizerSettings, SpeechRecognizer, classify,
};

/// Result of asking the session to listen once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakEvent {
    /// A phrase was recognised and is now displayed.
    Recognized(String),
    /// Recognition failed with a displayable error.
    Failed(ErrorKind),
    /// No recognizer is available on this system.
    Unavailable,
    /// The recognizer has no further input.
    Closed,
}

impl SpeakEvent {
    /// Message shown when no recognizer is installed.
    pub const UNAVAILABLE_MESSAGE: &'static str = "Voice recognizer not available";
}

/// Reasons a send was refused before anything was dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The target address did not parse.
    #[error("Not a valid ip:port combination: {0}")]
    InvalidAddress(#[from] AddressParseError),
    /// No phrase has been recognised yet.
    #[error("no recognised phrase to send")]
    NothingRecognized,
    /// A previous dispatch has not completed yet.
    #[error("a command is still being delivered")]
    Busy,
}

/// Explicit state for one user's voice-command interaction.
pub struct VoiceSession<R> {
    recognizer: R,
    settings: RecognizerSettings,
    displayed: Option<String>,
    target: String,
    gate: InFlightGate,
}

impl<R> VoiceSession<R>
where
    R: SpeechRecognizer,
{
    /// Creates a session for `recognizer`.
    #[must_use]
    pub fn new(recognizer: R, settings: RecognizerSettings) -> Self {
        Self {
            recognizer,
            settings,
            displayed: None,
            target: String::new(),
            gate: InFlightGate::default(),
        }
    }

    /// Settings handed to the recognizer.
    #[must_use]
    pub fn settings(&self) -> &RecognizerSettings {
        &self.settings
    }

    /// Replaces the raw `host:port` target.
    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = target.into();
    }

    /// Raw target as entered.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Phrase currently displayed, if any.
    #[must_use]
    pub fn displayed_phrase(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    /// Whether a dispatch is still outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.gate.is_claimed()
    }

    /// Runs one recognition attempt and classifies it.
    ///
    /// A failed attempt leaves the previously displayed phrase untouched.
    pub fn speak(&mut self) -> SpeakEvent {
        if !self.recognizer.is_available() {
            tracing::warn!(
                target: "herald::session",
                event = "recognizer_unavailable",
                "speech recognizer not available"
            );
            return SpeakEvent::Unavailable;
        }

        let Some(outcome) = self.recognizer.recognize(&self.settings) else {
            return SpeakEvent::Closed;
        };

        match classify(outcome) {
            Classification::Proceed { phrase } => {
                tracing::debug!(
                    target: "herald::session",
                    event = "phrase_recognized",
                    phrase = %phrase,
                    "recognised phrase"
                );
                self.displayed = Some(phrase.clone());
                SpeakEvent::Recognized(phrase)
            }
            Classification::Report(kind) => {
                tracing::info!(
                    target: "herald::session",
                    event = "recognition_failed",
                    error = %kind,
                    "recognition failed"
                );
                SpeakEvent::Failed(kind)
            }
        }
    }

    /// Builds the request for the displayed phrase without sending it.
    pub fn prepare(&self) -> Result<CommandRequest, SendError> {
        let address = self.target.parse::<TargetAddress>().map_err(|error| {
            tracing::info!(
                target: "herald::session",
                event = "address_rejected",
                error = %error,
                "target address rejected"
            );
            SendError::from(error)
        })?;
        let phrase = self
            .displayed
            .as_deref()
            .ok_or(SendError::NothingRecognized)?;
        Ok(CommandRequest::new(address, phrase))
    }

    /// Sends the displayed phrase through `dispatcher`.
    ///
    /// Refused with [`SendError::Busy`] until the previous
    /// [`PendingDispatch`] completes or is dropped.
    pub fn send(&self, dispatcher: &Dispatcher) -> Result<PendingDispatch, SendError> {
        let request = self.prepare()?;
        let guard = self.gate.try_claim().ok_or(SendError::Busy)?;
        Ok(dispatcher.dispatch(&request).with_guard(guard))
    }
}
