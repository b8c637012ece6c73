//! Voice-command dispatch pipeline.
//!
//! A recognised phrase travels through four stages:
//!
//! 1. [`recognition::classify`] turns a recognizer outcome into either a phrase
//!    to send or a fixed error message.
//! 2. [`address::TargetAddress`] parses the user's `host:port` string; a
//!    malformed address stops the cycle before anything is sent.
//! 3. [`command::command_path`] normalises the phrase into a request path.
//! 4. [`dispatch::Dispatcher`] issues the GET request in the background and
//!    reports back through a [`dispatch::CompletionNotifier`] exactly once.
//!
//! [`session::VoiceSession`] bundles the stages for an interactive surface and
//! keeps at most one dispatch in flight.

pub mod address;
pub mod command;
pub mod dispatch;
mod gate;
pub mod recognition;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use address::{AddressParseError, TargetAddress};
pub use command::{CommandRequest, command_path, normalise_matches};
pub use dispatch::{
    CompletionNotifier, DispatchFailure, DispatchOutcome, DispatchSetupError, Dispatcher,
    PendingDispatch,
};
pub use recognition::{
    Classification, ErrorKind, LanguageModel, RecognitionOutcome, RecognizerSettings,
    SpeechRecognizer, classify,
};
pub use session::{SendError, SpeakEvent, VoiceSession};
