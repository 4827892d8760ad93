//! Train command implementation

use crate::cli::LogLevel;
use crate::config::{apply_overrides, parse_spec, run_spec, validate_spec, TrainArgs};
use tracing::info;

pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<(), String> {
    info!(config = %args.config.display(), "loading run config");

    let mut spec = parse_spec(&args.config).map_err(|e| format!("Config error: {e}"))?;
    apply_overrides(&mut spec, &args);
    validate_spec(&spec).map_err(|e| format!("Config error: {e}"))?;

    if args.dry_run {
        info!(
            model = %spec.model.kind,
            epochs = spec.training.epochs,
            batch_size = spec.training.batch_size,
            learning_rate = spec.training.learning_rate,
            momentum = spec.training.momentum,
            "dry run: configuration is valid"
        );
        return Ok(());
    }

    let report = run_spec(&spec).map_err(|e| {
        if e.is_user_error() {
            format!("Data error: {e}")
        } else {
            format!("Training error: {e}")
        }
    })?;

    if level != LogLevel::Quiet {
        println!(
            "Trained {} epochs ({} steps): holdout loss {:.4}, error rate {:.4}",
            report.result.epochs_completed,
            report.result.steps,
            report.result.final_loss,
            report.result.final_error
        );
        if report.result.stopped_early {
            println!("Stopped early");
        }
        if let Some(path) = &spec.output.history_csv {
            println!("History: {}", path.display());
        }
    }
    Ok(())
}
