//! impulso CLI
//!
//! # Usage
//!
//! ```bash
//! # Train from a run config
//! impulso train run.yaml
//!
//! # Train with overrides
//! impulso train run.yaml --epochs 10 --lr 0.0001 --seed 7
//!
//! # Validate config
//! impulso validate run.yaml
//!
//! # Show the resolved config
//! impulso info run.yaml
//! ```

use clap::Parser;
use impulso::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
