//! CLI command implementations

mod info;
mod train;
mod validate;

use crate::cli::{init_tracing, LogLevel};
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let level = LogLevel::from_flags(cli.verbose, cli.quiet);
    init_tracing(level);

    match cli.command {
        Command::Train(args) => train::run_train(args, level),
        Command::Validate(args) => validate::run_validate(args, level),
        Command::Info(args) => info::run_info(args),
    }
}
