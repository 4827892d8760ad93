//! Run config validation
//!
//! Checks everything that can be known before the data file is read.

use super::schema::{ModelKind, RunSpec};
use crate::error::ValidationError;

/// Validate a run config
///
/// Checks:
/// - The data file exists
/// - Image shape and class count are usable
/// - Model and training values are in range
pub fn validate_spec(spec: &RunSpec) -> Result<(), ValidationError> {
    if !spec.data.path.exists() {
        return Err(ValidationError::DataNotFound(
            spec.data.path.display().to_string(),
        ));
    }
    validate_layout(spec)
}

/// Same as [`validate_spec`] without touching the filesystem
pub fn validate_layout(spec: &RunSpec) -> Result<(), ValidationError> {
    if spec.data.image_shape.is_empty() || spec.data.image_shape.contains(&0) {
        return Err(ValidationError::InvalidImageShape(
            spec.data.image_shape.clone(),
        ));
    }
    if spec.data.num_classes < 2 {
        return Err(ValidationError::InvalidNumClasses(spec.data.num_classes));
    }
    if spec.data.holdout == 0 {
        return Err(ValidationError::InvalidHoldout {
            holdout: 0,
            samples: 0,
        });
    }
    if spec.model.kind == ModelKind::Mlp && spec.model.hidden == 0 {
        return Err(ValidationError::InvalidHiddenUnits(spec.model.hidden));
    }
    spec.training.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DataSpec, ModelSpec, OutputSpec};
    use crate::train::TrainConfig;
    use std::path::PathBuf;

    fn spec() -> RunSpec {
        RunSpec {
            data: DataSpec {
                path: PathBuf::from("train.csv"),
                holdout: 100,
                image_shape: vec![1, 4, 4],
                num_classes: 3,
                normalize: true,
            },
            model: ModelSpec::default(),
            training: TrainConfig::default(),
            output: OutputSpec::default(),
        }
    }

    #[test]
    fn test_valid_layout() {
        assert!(validate_layout(&spec()).is_ok());
    }

    #[test]
    fn test_missing_data_file() {
        let mut s = spec();
        s.data.path = PathBuf::from("/nonexistent/impulso/train.csv");
        assert!(matches!(
            validate_spec(&s),
            Err(ValidationError::DataNotFound(_))
        ));
    }

    #[test]
    fn test_bad_image_shape() {
        let mut s = spec();
        s.data.image_shape = vec![1, 0, 28];
        assert!(matches!(
            validate_layout(&s),
            Err(ValidationError::InvalidImageShape(_))
        ));
        s.data.image_shape = vec![];
        assert!(validate_layout(&s).is_err());
    }

    #[test]
    fn test_bad_model_and_training() {
        let mut s = spec();
        s.model.kind = ModelKind::Mlp;
        s.model.hidden = 0;
        assert_eq!(
            validate_layout(&s),
            Err(ValidationError::InvalidHiddenUnits(0))
        );

        let mut s = spec();
        s.training.momentum = 1.5;
        assert_eq!(validate_layout(&s), Err(ValidationError::InvalidMomentum(1.5)));

        let mut s = spec();
        s.data.num_classes = 1;
        assert_eq!(validate_layout(&s), Err(ValidationError::InvalidNumClasses(1)));

        let mut s = spec();
        s.data.holdout = 0;
        assert!(validate_layout(&s).is_err());
    }

    #[test]
    fn test_softmax_ignores_hidden() {
        let mut s = spec();
        s.model.hidden = 0;
        assert!(validate_layout(&s).is_ok());
    }
}
