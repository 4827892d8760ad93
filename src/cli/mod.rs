//! CLI module for impulso
//!
//! Command handlers and logging setup for the `impulso` binary.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{init_tracing, LogLevel};

pub use crate::config::Cli;
