//! Validate command implementation

use crate::cli::LogLevel;
use crate::config::{load_spec, RunSpec, ValidateArgs};

/// Summary lines for a validated spec
pub fn format_summary(spec: &RunSpec) -> String {
    let features: usize = spec.data.image_shape.iter().product();
    let mut lines = vec![
        format!("  Data: {}", spec.data.path.display()),
        format!(
            "  Image shape: {:?} ({features} features), {} classes",
            spec.data.image_shape, spec.data.num_classes
        ),
        format!("  Holdout: {}", spec.data.holdout),
        format!("  Model: {}", spec.model.kind),
        format!(
            "  Epochs: {}, batch size: {}",
            spec.training.epochs, spec.training.batch_size
        ),
        format!(
            "  Learning rate: {}, momentum: {}, L2: {}",
            spec.training.learning_rate, spec.training.momentum, spec.training.l2
        ),
    ];
    if let Some(path) = &spec.output.history_csv {
        lines.push(format!("  History: {}", path.display()));
    }
    lines.join("\n")
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_spec(&args.config).map_err(|e| format!("Config error: {e}"))?;

    if level != LogLevel::Quiet {
        println!("✓ Configuration is valid");
        if level == LogLevel::Verbose {
            println!("{}", format_summary(&spec));
        }
    }
    Ok(())
}
