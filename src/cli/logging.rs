//! Logging setup for the binary

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors only
    Quiet,
    /// Progress at info level
    Normal,
    /// Debug output including per-step losses
    Verbose,
}

impl LogLevel {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Filter directive used when `RUST_LOG` is unset
    pub fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info",
            Self::Verbose => "debug",
        }
    }
}

/// Install a global `fmt` subscriber filtered by `RUST_LOG` or `level`
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));
    let _ = Registry::default()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(LogLevel::from_flags(false, false), LogLevel::Normal);
        assert_eq!(LogLevel::from_flags(true, false), LogLevel::Verbose);
        assert_eq!(LogLevel::from_flags(true, true), LogLevel::Quiet);
    }

    #[test]
    fn test_directives() {
        assert_eq!(LogLevel::Quiet.directive(), "error");
        assert_eq!(LogLevel::Normal.directive(), "info");
        assert_eq!(LogLevel::Verbose.directive(), "debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_tracing(LogLevel::Quiet);
        init_tracing(LogLevel::Verbose);
    }
}
