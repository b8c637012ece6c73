//! Asynchronous delivery of commands to the command node.
//!
//! [`Dispatcher::dispatch`] never blocks the caller. The GET request runs as a
//! task on the supplied tokio runtime and reports back over a one-shot
//! channel. The caller then drives [`PendingDispatch::complete`] on its own
//! context, which invokes the [`CompletionNotifier`] exactly once with a
//! coarse `recognized` flag. The precise failure cause is logged, not
//! surfaced.

use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use url::Url;

use crate::command::CommandRequest;
use crate::gate::InFlightGuard;

/// Receives the outcome of a dispatch.
pub trait CompletionNotifier {
    /// Called once the exchange with the node has concluded.
    fn on_completed(&mut self, recognized: bool);
}

impl<F> CompletionNotifier for F
where
    F: FnMut(bool),
{
    fn on_completed(&mut self, recognized: bool) {
        self(recognized);
    }
}

/// Errors raised while constructing a [`Dispatcher`].
#[derive(Debug, Error)]
pub enum DispatchSetupError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Why a dispatch did not count as recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchFailure {
    /// The address could not form a valid URL.
    #[error("invalid command URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },
    /// Connecting, sending or receiving failed.
    #[error("request failed: {0}")]
    Transport(String),
    /// The node answered with a non-success status.
    #[error("node answered with status {status}")]
    Rejected { status: u16 },
    /// The background task ended without reporting.
    #[error("dispatch task ended without reporting an outcome")]
    Abandoned,
}

/// Detailed result of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The node accepted the command.
    Accepted { status: u16 },
    /// The command was not accepted.
    Failed(DispatchFailure),
}

impl DispatchOutcome {
    /// Coarse result handed to the notifier.
    #[must_use]
    pub const fn recognized(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Issues command requests on a background runtime.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    runtime: Handle,
}

impl Dispatcher {
    /// Builds a dispatcher spawning its requests on `runtime`.
    ///
    /// Without a `timeout` the transport default applies. Proxies are never
    /// consulted; command nodes are addressed directly.
    pub fn new(runtime: Handle, timeout: Option<Duration>) -> Result<Self, DispatchSetupError> {
        let mut builder = reqwest::Client::builder().no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(DispatchSetupError::Client)?;
        Ok(Self { client, runtime })
    }

    /// Starts delivering `request` and returns immediately.
    ///
    /// A request whose address cannot form a URL fails through the same
    /// completion path as any transport failure.
    pub fn dispatch(&self, request: &CommandRequest) -> PendingDispatch {
        let (sender, receiver) = oneshot::channel();
        let display_url = request.display_url();

        match command_url(request) {
            Ok(url) => {
                tracing::info!(
                    target: "herald::dispatch",
                    event = "dispatch_started",
                    url = %url,
                    "dispatching command"
                );
                let client = self.client.clone();
                self.runtime.spawn(async move {
                    report(sender, execute(&client, url).await);
                });
            }
            Err(failure) => {
                report(sender, DispatchOutcome::Failed(failure));
            }
        }

        PendingDispatch {
            url: display_url,
            receiver,
            guard: None,
        }
    }
}

/// Base whose host and port are replaced component by component.
const URL_BASE: &str = "http://localhost/";

/// Builds the command URL without formatting the host into URL text, so a host
/// containing `/`, `?` or `#` is rejected instead of rewriting the URL.
fn command_url(request: &CommandRequest) -> Result<Url, DispatchFailure> {
    let address = request.address();
    let invalid = |reason: String| DispatchFailure::InvalidTarget {
        url: request.display_url(),
        reason,
    };
    let mut url = Url::parse(URL_BASE).map_err(|error| invalid(error.to_string()))?;
    url.set_host(Some(address.host()))
        .map_err(|error| invalid(error.to_string()))?;
    url.set_port(Some(address.port()))
        .map_err(|()| invalid(String::from("port cannot be set")))?;
    // `set_path` percent-encodes `?` and `#` so they stay part of the path.
    url.set_path(request.path());
    Ok(url)
}

fn report(sender: oneshot::Sender<DispatchOutcome>, outcome: DispatchOutcome) {
    if sender.send(outcome).is_err() {
        tracing::debug!(
            target: "herald::dispatch",
            event = "dispatch_unobserved",
            "pending dispatch dropped before completion"
        );
    }
}

async fn execute(client: &reqwest::Client, url: Url) -> DispatchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                DispatchOutcome::Accepted {
                    status: status.as_u16(),
                }
            } else {
                DispatchOutcome::Failed(DispatchFailure::Rejected {
                    status: status.as_u16(),
                })
            }
        }
        Err(error) => DispatchOutcome::Failed(DispatchFailure::Transport(error.to_string())),
    }
}

/// A dispatch that has been started but not yet reported.
#[derive(Debug)]
#[must_use = "a pending dispatch reports nothing until it is completed"]
pub struct PendingDispatch {
    url: String,
    receiver: oneshot::Receiver<DispatchOutcome>,
    guard: Option<InFlightGuard>,
}

impl PendingDispatch {
    /// URL the command was sent to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn with_guard(mut self, guard: InFlightGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Waits for the exchange to conclude and notifies `notifier` once.
    ///
    /// Consuming `self` rules out a second notification. The single-flight
    /// guard, when present, is released before the notifier runs so it may
    /// start the next command.
    pub async fn complete<N>(self, notifier: &mut N) -> DispatchOutcome
    where
        N: CompletionNotifier + ?Sized,
    {
        let Self {
            url,
            receiver,
            guard,
        } = self;
        let outcome = receiver
            .await
            .unwrap_or(DispatchOutcome::Failed(DispatchFailure::Abandoned));

        match &outcome {
            DispatchOutcome::Accepted { status } => tracing::info!(
                target: "herald::dispatch",
                event = "dispatch_completed",
                url = %url,
                status = *status,
                recognized = true,
                "command accepted by node"
            ),
            DispatchOutcome::Failed(failure) => tracing::warn!(
                target: "herald::dispatch",
                event = "dispatch_failed",
                url = %url,
                recognized = false,
                error = %failure,
                "command not accepted by node"
            ),
        }

        drop(guard);
        notifier.on_completed(outcome.recognized());
        outcome
    }
}
