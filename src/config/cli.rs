//! Command-line argument types

use super::schema::RunSpec;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Minibatch momentum SGD for image classifiers
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "impulso")]
#[command(version)]
#[command(about = "Train softmax and MLP image classifiers with momentum SGD")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Train a model from a YAML run config
    Train(TrainArgs),

    /// Validate a run config without training
    Validate(ValidateArgs),

    /// Show the resolved run config
    Info(InfoArgs),
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override number of epochs
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Override batch size
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Override learning rate
    #[arg(short, long)]
    pub lr: Option<f32>,

    /// Override momentum coefficient
    #[arg(short, long)]
    pub momentum: Option<f32>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the history CSV path
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,

    /// Dry run (validate config but don't train)
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Parse CLI arguments from an iterator
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a run config
pub fn apply_overrides(spec: &mut RunSpec, args: &TrainArgs) {
    if let Some(epochs) = args.epochs {
        spec.training.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        spec.training.batch_size = batch_size;
    }
    if let Some(lr) = args.lr {
        spec.training.learning_rate = lr;
    }
    if let Some(momentum) = args.momentum {
        spec.training.momentum = momentum;
    }
    if let Some(seed) = args.seed {
        spec.training.seed = Some(seed);
    }
    if let Some(history) = &args.history {
        spec.output.history_csv = Some(history.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_train() {
        let cli = parse_args([
            "impulso", "train", "run.yaml", "--epochs", "10", "--lr", "0.01", "--seed", "7",
        ])
        .unwrap();
        match cli.command {
            Command::Train(args) => {
                assert_eq!(args.config, PathBuf::from("run.yaml"));
                assert_eq!(args.epochs, Some(10));
                assert_eq!(args.lr, Some(0.01));
                assert_eq!(args.seed, Some(7));
                assert!(!args.dry_run);
            }
            other => panic!("expected train, got {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = parse_args(["impulso", "validate", "run.yaml", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Validate(_)));

        let cli = parse_args(["impulso", "-q", "info", "run.yaml"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Command::Info(_)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(["impulso"]).is_err());
        assert!(parse_args(["impulso", "train"]).is_err());
        assert!(parse_args(["impulso", "train", "run.yaml", "--epochs", "many"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut spec: RunSpec = serde_yaml::from_str("data:\n  path: train.csv\n").unwrap();
        let cli = parse_args([
            "impulso",
            "train",
            "run.yaml",
            "-b",
            "64",
            "-m",
            "0.5",
            "--history",
            "h.csv",
        ])
        .unwrap();
        let Command::Train(args) = cli.command else {
            panic!("expected train");
        };
        apply_overrides(&mut spec, &args);
        assert_eq!(spec.training.batch_size, 64);
        assert_eq!(spec.training.momentum, 0.5);
        assert_eq!(spec.training.epochs, 5);
        assert_eq!(spec.output.history_csv, Some(PathBuf::from("h.csv")));
    }

    proptest! {
        #[test]
        fn prop_epochs_override(epochs in 1usize..10_000) {
            let mut spec: RunSpec = serde_yaml::from_str("data:\n  path: a.csv\n").unwrap();
            let epochs_arg = epochs.to_string();
            let cli = parse_args(["impulso", "train", "a.yaml", "--epochs", &epochs_arg]).unwrap();
            if let Command::Train(args) = cli.command {
                apply_overrides(&mut spec, &args);
            }
            prop_assert_eq!(spec.training.epochs, epochs);
        }
    }
}
