//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use herald_core::{AddressParseError, DispatchSetupError};
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("a command must be provided: send or listen")]
    MissingCommand,
    #[error("no target address configured; pass --target host:port or set HERALD_TARGET")]
    MissingTarget,
    #[error("Not a valid ip:port combination: {0}")]
    InvalidTarget(AddressParseError),
    #[error("failed to start async runtime: {0}")]
    Runtime(io::Error),
    #[error(transparent)]
    DispatchSetup(#[from] DispatchSetupError),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to serialise recognizer settings: {0}")]
    SerialiseSettings(serde_json::Error),
    #[error("failed to emit recognizer settings: {0}")]
    EmitSettings(io::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
