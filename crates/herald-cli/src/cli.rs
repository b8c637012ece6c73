//! Command-line surface of the `herald` binary.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "herald",
    about = "Relays spoken commands to a robot command node",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    /// Prints the speech recognizer settings as JSON and exits.
    #[arg(long)]
    pub(crate) recognizer_settings: bool,
    #[command(subcommand)]
    pub(crate) command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Sends one phrase as if it had just been recognised.
    Send {
        /// Words of the phrase, for example `cleanup object corny`.
        #[arg(
            value_name = "PHRASE",
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        phrase: Vec<String>,
    },
    /// Treats each line on stdin as a recognised phrase and sends it.
    Listen,
}
