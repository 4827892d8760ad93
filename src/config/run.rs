//! Running a training job described by a [`RunSpec`]

use super::loader::load_spec;
use super::schema::{ModelKind, ModelSpec, RunSpec};
use super::validate::validate_spec;
use crate::data::{holdout_split, load_csv};
use crate::error::{Error, Result};
use crate::model::{ForwardModel, Mlp, SoftmaxRegression};
use crate::params::ParameterSet;
use crate::train::{MetricsHistory, ProgressCallback, TrainResult, Trainer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;
use tracing::info;

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub result: TrainResult,
    pub history: MetricsHistory,
    pub params: ParameterSet,
    pub train_samples: usize,
    pub holdout_samples: usize,
}

/// Instantiate the evaluator named by `spec`
pub fn build_model(
    spec: &ModelSpec,
    num_features: usize,
    num_classes: usize,
) -> Result<Box<dyn ForwardModel>> {
    Ok(match spec.kind {
        ModelKind::Softmax => Box::new(SoftmaxRegression::new(num_features, num_classes)?),
        ModelKind::Mlp => Box::new(Mlp::new(num_features, spec.hidden, num_classes)?),
    })
}

/// Load, normalize, split, train and export as `spec` describes
///
/// Normalization is fitted on the full table before the holdout split.
pub fn run_spec(spec: &RunSpec) -> Result<RunReport> {
    validate_spec(spec)?;

    let mut data = load_csv(
        &spec.data.path,
        spec.data.image_shape.clone(),
        spec.data.num_classes,
    )?;
    if spec.data.normalize {
        data.normalize();
    }

    let mut rng = match spec.training.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let (train, holdout) = holdout_split(&data, spec.data.holdout, &mut rng)?;
    info!(
        samples = data.len(),
        train = train.len(),
        holdout = holdout.len(),
        "dataset split"
    );

    let model = build_model(&spec.model, train.num_features(), spec.data.num_classes)?;
    let mut trainer = Trainer::new(model, spec.training.clone())?;
    trainer.add_callback(ProgressCallback::new(spec.training.print_period));

    let result = trainer.train(&train, &holdout)?;
    let (params, history) = trainer.into_parts();

    if let Some(path) = &spec.output.history_csv {
        write_history(&history, path)?;
    }

    Ok(RunReport {
        result,
        history,
        params,
        train_samples: train.len(),
        holdout_samples: holdout.len(),
    })
}

/// [`load_spec`] followed by [`run_spec`]
pub fn train_from_yaml<P: AsRef<Path>>(config_path: P) -> Result<RunReport> {
    let spec = load_spec(config_path)?;
    run_spec(&spec)
}

fn write_history(history: &MetricsHistory, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| Error::io(format!("creating {}", dir.display()), e))?;
    }
    history.write_csv(path)?;
    info!(path = %path.display(), records = history.len(), "history written");
    Ok(())
}
