//! Command modelling for requests sent to the command node.
//!
//! A recognised phrase becomes a request path by lowercasing it and replacing
//! every space with `_`, so `"Cleanup Object Corny"` is sent as
//! `/cleanup_object_corny`.

use crate::address::TargetAddress;

/// Maps a recognised phrase to the request path understood by the node.
#[must_use]
pub fn command_path(phrase: &str) -> String {
    let mut path = String::with_capacity(phrase.len() + 1);
    path.push('/');
    path.push_str(&phrase.to_lowercase().replace(' ', "_"));
    path
}

/// Normalises the highest-confidence candidate of a match list.
///
/// Only the first candidate is used; the recognizer is asked for a single
/// result and any extras are ignored. Returns `None` for an empty list.
#[must_use]
pub fn normalise_matches(matches: &[String]) -> Option<String> {
    matches.first().map(|phrase| command_path(phrase))
}

/// A command ready to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    address: TargetAddress,
    path: String,
}

impl CommandRequest {
    /// Builds a request for `phrase` addressed to `address`.
    #[must_use]
    pub fn new(address: TargetAddress, phrase: &str) -> Self {
        Self {
            address,
            path: command_path(phrase),
        }
    }

    /// Node the request is addressed to.
    #[must_use]
    pub fn address(&self) -> &TargetAddress {
        &self.address
    }

    /// Normalised request path, always starting with `/`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Human-readable form of the request, e.g. `http://host:80/stop`.
    #[must_use]
    pub fn display_url(&self) -> String {
        format!(
            "http://{}:{}{}",
            self.address.host(),
            self.address.port(),
            self.path
        )
    }
}
