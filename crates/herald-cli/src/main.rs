//! CLI entrypoint for the Herald voice-command relay.
//!
//! The binary delegates to [`herald_cli::run`], which loads configuration,
//! parses the command line, and relays recognised phrases to the configured
//! command node.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    herald_cli::run(std::env::args_os(), &mut stdin, &mut stdout, &mut stderr)
}
