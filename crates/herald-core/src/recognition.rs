//! Speech recognizer boundary and classification of its outcomes.
//!
//! Speech-to-text itself is an external service. The pipeline only consumes
//! what it reports: a ranked list of candidate phrases or one of a closed set
//! of error codes.

use std::fmt;

use herald_config::Config;
use serde::Serialize;
use strum::{Display, EnumIter};

/// Prompt shown by recognizers that support one.
pub const DEFAULT_PROMPT: &str = "e.G: cleanup object corny";

/// Error codes reported by the speech recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ErrorKind {
    /// Audio capture failed.
    AudioError,
    /// The recognizer client failed locally.
    ClientError,
    /// The recognizer could not reach its service.
    NetworkError,
    /// Nothing recognisable was heard.
    NoMatch,
    /// The recognizer service reported an error.
    ServerError,
}

impl ErrorKind {
    /// Fixed message displayed for this error.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AudioError => "Audio Error",
            Self::ClientError => "Client Error",
            Self::NetworkError => "Network Error",
            Self::NoMatch => "No Match",
            Self::ServerError => "Server Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.message())
    }
}

/// Result of a single recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    /// Candidate phrases, most confident first.
    Matches(Vec<String>),
    /// The recognizer failed.
    Error(ErrorKind),
}

/// What the pipeline does with a recognition outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A phrase was recognised and may be dispatched.
    Proceed {
        /// Highest-confidence phrase.
        phrase: String,
    },
    /// The attempt failed; only the message is shown.
    Report(ErrorKind),
}

impl Classification {
    /// Message to display for a failed attempt.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Proceed { .. } => None,
            Self::Report(kind) => Some(kind.message()),
        }
    }
}

/// Classifies a recognition outcome.
///
/// Any non-empty match list proceeds with its first phrase, with one
/// exception: a blank top phrase would dispatch the bare root path `/`, so it
/// is reported as [`ErrorKind::NoMatch`] instead. An empty list, which the
/// recognizer never reports on success, is treated the same way.
#[must_use]
pub fn classify(outcome: RecognitionOutcome) -> Classification {
    match outcome {
        RecognitionOutcome::Matches(matches) => match matches.into_iter().next() {
            Some(phrase) if !phrase.trim().is_empty() => Classification::Proceed { phrase },
            _ => Classification::Report(ErrorKind::NoMatch),
        },
        RecognitionOutcome::Error(kind) => Classification::Report(kind),
    }
}

/// Language model requested from the recognizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LanguageModel {
    /// Free-form dictation.
    #[default]
    FreeForm,
    /// Short web-search style queries.
    WebSearch,
}

/// Parameters handed to the recognizer for every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognizerSettings {
    /// Language preference such as `en-US`.
    pub language: String,
    /// Language model.
    pub model: LanguageModel,
    /// Maximum number of candidates to return.
    pub max_results: u8,
    /// Prompt shown while listening.
    pub prompt: String,
}

impl RecognizerSettings {
    /// Derives settings from the resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            language: config.language().to_owned(),
            max_results: config.max_results(),
            ..Self::default()
        }
    }
}

impl Default for RecognizerSettings {
    fn default() -> Self {
        Self {
            language: herald_config::DEFAULT_LANGUAGE.to_owned(),
            model: LanguageModel::FreeForm,
            max_results: herald_config::DEFAULT_MAX_RESULTS,
            prompt: DEFAULT_PROMPT.to_owned(),
        }
    }
}

/// External speech-to-text collaborator.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechRecognizer {
    /// Whether a recognizer is installed and usable.
    fn is_available(&self) -> bool;

    /// Performs one recognition attempt.
    ///
    /// Returns `None` once the recognizer has no further input to offer.
    fn recognize(&mut self, settings: &RecognizerSettings) -> Option<RecognitionOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(ErrorKind::AudioError, "Audio Error")]
    #[case(ErrorKind::ClientError, "Client Error")]
    #[case(ErrorKind::NetworkError, "Network Error")]
    #[case(ErrorKind::NoMatch, "No Match")]
    #[case(ErrorKind::ServerError, "Server Error")]
    fn errors_report_fixed_messages(#[case] kind: ErrorKind, #[case] message: &str) {
        let classification = classify(RecognitionOutcome::Error(kind));
        assert_eq!(classification, Classification::Report(kind));
        assert_eq!(classification.message(), Some(message));
    }

    #[test]
    fn every_error_kind_is_terminal() {
        for kind in ErrorKind::iter() {
            assert!(matches!(
                classify(RecognitionOutcome::Error(kind)),
                Classification::Report(_)
            ));
        }
    }

    #[test]
    fn first_match_proceeds() {
        let outcome = RecognitionOutcome::Matches(vec![
            String::from("cleanup object corny"),
            String::from("clean up object corny"),
        ]);
        assert_eq!(
            classify(outcome),
            Classification::Proceed {
                phrase: String::from("cleanup object corny")
            }
        );
    }

    #[rstest]
    #[case(Vec::new())]
    #[case(vec![String::new()])]
    #[case(vec![String::from("   ")])]
    fn empty_matches_are_treated_as_no_match(#[case] matches: Vec<String>) {
        assert_eq!(
            classify(RecognitionOutcome::Matches(matches)),
            Classification::Report(ErrorKind::NoMatch)
        );
    }

    #[test]
    fn settings_follow_configuration() {
        let config = Config {
            language: String::from("de-DE"),
            max_results: 3,
            ..Config::default()
        };
        let settings = RecognizerSettings::from_config(&config);
        assert_eq!(settings.language, "de-DE");
        assert_eq!(settings.max_results, 3);
        assert_eq!(settings.model, LanguageModel::FreeForm);
        assert_eq!(settings.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn settings_serialise_model_in_snake_case() {
        let json = serde_json::to_value(RecognizerSettings::default()).expect("serialise");
        assert_eq!(json["model"], "free_form");
        assert_eq!(json["language"], "en-US");
        assert_eq!(json["max_results"], 1);
    }
}
