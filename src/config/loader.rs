//! Reading run configs from disk

use super::schema::RunSpec;
use super::validate::validate_spec;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Parse a YAML run config without validating it
///
/// Relative `data.path` and `output.history_csv` values are resolved
/// against the directory holding the config file.
pub fn parse_spec<P: AsRef<Path>>(path: P) -> Result<RunSpec> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("reading config {}", path.display()), e))?;
    let mut spec: RunSpec = serde_yaml::from_str(&yaml).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(dir) = path.parent() {
        if spec.data.path.is_relative() {
            spec.data.path = dir.join(&spec.data.path);
        }
        if let Some(history) = spec.output.history_csv.as_mut() {
            if history.is_relative() {
                *history = dir.join(&*history);
            }
        }
    }
    Ok(spec)
}

/// Parse and validate a YAML run config
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<RunSpec> {
    let spec = parse_spec(path)?;
    validate_spec(&spec)?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_resolves_relative_data_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "train.csv", "label,p0\n0,1\n");
        let config = write(&dir, "run.yaml", "data:\n  path: train.csv\n");

        let spec = load_spec(&config).unwrap();
        assert_eq!(spec.data.path, dir.path().join("train.csv"));
    }

    #[test]
    fn test_load_missing_data_file() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "run.yaml", "data:\n  path: nope.csv\n");
        let err = load_spec(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::DataNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "run.yaml", "data: [unclosed\n");
        let err = parse_spec(&config).unwrap_err();
        assert!(matches!(err, Error::Yaml { .. }));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_missing_config_file() {
        let err = parse_spec("/nonexistent/impulso.yaml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_invalid_training_values() {
        let dir = TempDir::new().unwrap();
        write(&dir, "train.csv", "label,p0\n0,1\n");
        let config = write(
            &dir,
            "run.yaml",
            "data:\n  path: train.csv\ntraining:\n  batch_size: 0\n",
        );
        let err = load_spec(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidBatchSize(0))
        ));
    }
}
