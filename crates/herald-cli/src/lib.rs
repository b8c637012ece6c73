//! Command-line runtime for the Herald voice-command relay.
//!
//! The runtime splits configuration flags from the command, loads layered
//! configuration, and drives [`herald_core::VoiceSession`] cycles against a
//! command node. It runs both from the binary entrypoint and from tests, where
//! configuration loading and the IO streams are substituted.

use std::ffi::OsString;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use herald_config::Config;
use herald_core::{
    Dispatcher, RecognizerSettings, SendError, SpeakEvent, SpeechRecognizer, VoiceSession,
};
use tokio::runtime::{self, Runtime};

mod cli;
mod config;
mod errors;
mod recognizer;
mod surface;
mod telemetry;

use cli::{Cli, CliCommand};
use config::{command_arguments, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;
use recognizer::{LineRecognizer, PhraseRecognizer};
use surface::TerminalSurface;

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: keep in sync with the fields of `herald_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--target",
    "--language",
    "--max-results",
    "--request-timeout-secs",
    "--log-filter",
    "--log-format",
];

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, R, W, E> {
    pub(crate) stdin: &'a mut R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdin_is_terminal: bool,
}

impl<'a, R: BufRead, W: Write, E: Write> IoStreams<'a, R, W, E> {
    pub(crate) fn new(stdin: &'a mut R, stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
            stdin_is_terminal: io::stdin().is_terminal(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_terminal_status(
        stdin: &'a mut R,
        stdout: &'a mut W,
        stderr: &'a mut E,
        stdin_is_terminal: bool,
    ) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
            stdin_is_terminal,
        }
    }
}

/// How one voice-command cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cycle {
    Delivered { recognized: bool },
    Skipped,
    Unavailable,
    Closed,
}

impl Cycle {
    fn exit_code(self) -> ExitCode {
        match self {
            Self::Delivered { recognized: true } => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        }
    }
}

/// Runtime and dispatcher shared by every cycle of one invocation.
struct Relay<'r> {
    runtime: &'r Runtime,
    dispatcher: &'r Dispatcher,
}

struct CliRunner<'a, R, W, E, L> {
    io: IoStreams<'a, R, W, E>,
    loader: &'a L,
}

impl<'a, R, W, E, L> CliRunner<'a, R, W, E, L>
where
    R: BufRead,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);

        let result = Cli::try_parse_from(command_arguments(&args, &split))
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                self.loader
                    .load(&split.config_arguments)
                    .map(|config| (cli, config))
            })
            .and_then(|(cli, config)| self.execute(cli, &config));

        match result {
            Ok(exit_code) => exit_code,
            // `--help` and `--version` surface as parse errors meant for stdout.
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                let _ = write!(self.io.stdout, "{error}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    fn execute(&mut self, cli: Cli, config: &Config) -> Result<ExitCode, AppError> {
        telemetry::initialise(config)?;
        let settings = RecognizerSettings::from_config(config);

        if cli.recognizer_settings {
            emit_settings(&settings, self.io.stdout)?;
            return Ok(ExitCode::SUCCESS);
        }

        let command = cli.command.ok_or(AppError::MissingCommand)?;
        let target = config.target().ok_or(AppError::MissingTarget)?;
        let runtime = build_runtime()?;
        let dispatcher = Dispatcher::new(runtime.handle().clone(), config.request_timeout())?;
        let relay = Relay {
            runtime: &runtime,
            dispatcher: &dispatcher,
        };

        let IoStreams {
            stdin,
            stdout,
            stderr,
            stdin_is_terminal,
        } = &mut self.io;
        let mut surface = TerminalSurface::new(&mut **stdout, &mut **stderr);

        match command {
            CliCommand::Send { phrase } => {
                let mut session = VoiceSession::new(PhraseRecognizer::new(&phrase), settings);
                session.set_target(target);
                run_cycle(&mut session, &relay, &mut surface).map(Cycle::exit_code)
            }
            CliCommand::Listen => {
                let mut session = VoiceSession::new(LineRecognizer::new(&mut **stdin), settings);
                session.set_target(target);
                if *stdin_is_terminal {
                    let prompt = format!(
                        "Listening; type one command per line ({}). End with Ctrl-D.",
                        session.settings().prompt
                    );
                    surface
                        .show_problem(&prompt)
                        .map_err(AppError::WriteOutput)?;
                }
                listen(&mut session, &relay, &mut surface)
            }
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    run_with_loader(
        args,
        IoStreams::new(stdin, stdout, stderr),
        &OrthoConfigLoader,
    )
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<I, R, W, E, L>(
    args: I,
    io: IoStreams<'_, R, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner { io, loader }.run(args)
}

fn build_runtime() -> Result<Runtime, AppError> {
    runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("herald-dispatch")
        .enable_all()
        .build()
        .map_err(AppError::Runtime)
}

/// Repeats cycles until the input closes.
///
/// Failed recognitions and rejected commands do not end the session.
fn listen<R, W, E>(
    session: &mut VoiceSession<R>,
    relay: &Relay<'_>,
    surface: &mut TerminalSurface<'_, W, E>,
) -> Result<ExitCode, AppError>
where
    R: SpeechRecognizer,
    W: Write,
    E: Write,
{
    loop {
        match run_cycle(session, relay, surface)? {
            Cycle::Closed => return Ok(ExitCode::SUCCESS),
            Cycle::Unavailable => return Ok(ExitCode::FAILURE),
            Cycle::Delivered { .. } | Cycle::Skipped => {}
        }
    }
}

/// Runs one recognise, send and report cycle.
///
/// Blocks until the node has answered so the next cycle never finds the
/// session busy.
fn run_cycle<R, W, E>(
    session: &mut VoiceSession<R>,
    relay: &Relay<'_>,
    surface: &mut TerminalSurface<'_, W, E>,
) -> Result<Cycle, AppError>
where
    R: SpeechRecognizer,
    W: Write,
    E: Write,
{
    match session.speak() {
        SpeakEvent::Recognized(phrase) => {
            surface
                .show_phrase(&phrase)
                .map_err(AppError::WriteOutput)?;
        }
        SpeakEvent::Failed(kind) => {
            surface
                .show_problem(kind.message())
                .map_err(AppError::WriteOutput)?;
            return Ok(Cycle::Skipped);
        }
        SpeakEvent::Unavailable => {
            surface
                .show_problem(SpeakEvent::UNAVAILABLE_MESSAGE)
                .map_err(AppError::WriteOutput)?;
            return Ok(Cycle::Unavailable);
        }
        SpeakEvent::Closed => return Ok(Cycle::Closed),
    }

    let pending = match session.send(relay.dispatcher) {
        Ok(pending) => pending,
        // The target is fixed for the whole invocation, so retrying cannot help.
        Err(SendError::InvalidAddress(error)) => return Err(AppError::InvalidTarget(error)),
        Err(error @ (SendError::NothingRecognized | SendError::Busy)) => {
            surface
                .show_problem(&error.to_string())
                .map_err(AppError::WriteOutput)?;
            return Ok(Cycle::Skipped);
        }
    };

    surface
        .show_sending(pending.url())
        .map_err(AppError::WriteOutput)?;
    let outcome = relay
        .runtime
        .block_on(pending.complete(&mut |recognized| surface.record_status(recognized)));
    surface.finish_status().map_err(AppError::WriteOutput)?;

    Ok(Cycle::Delivered {
        recognized: outcome.recognized(),
    })
}

fn emit_settings<W>(settings: &RecognizerSettings, stdout: &mut W) -> Result<(), AppError>
where
    W: Write,
{
    serde_json::to_writer_pretty(&mut *stdout, settings).map_err(AppError::SerialiseSettings)?;
    stdout.write_all(b"\n").map_err(AppError::EmitSettings)?;
    stdout.flush().map_err(AppError::EmitSettings)
}

#[cfg(test)]
mod tests;
