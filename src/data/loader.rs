//! CSV dataset loader
//!
//! Reads the Kaggle digit-recognizer layout: one header row, then one sample
//! per row with the label in column 0 and flattened pixels after it.

use super::dataset::label_from_f32;
use super::Dataset;
use crate::error::{Error, Result};
use ndarray::Array2;
use std::path::Path;
use tracing::{debug, info};

/// Load a labeled CSV table into a [`Dataset`]
pub fn load_csv<P: AsRef<Path>>(
    path: P,
    sample_shape: Vec<usize>,
    num_classes: usize,
) -> Result<Dataset> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let expected_cols = sample_shape.iter().product::<usize>() + 1;
    let mut labels = Vec::new();
    let mut pixels = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if record.len() != expected_cols {
            return Err(Error::Data {
                path: path.to_path_buf(),
                row,
                message: format!("expected {expected_cols} columns, found {}", record.len()),
            });
        }

        let mut fields = record.iter();
        let label_field = fields.next().unwrap_or_default();
        let label = parse_field(path, row, label_field)?;
        labels.push(label_from_f32(label)?);

        for field in fields {
            pixels.push(parse_field(path, row, field)?);
        }
    }

    let rows = labels.len();
    debug!(path = %path.display(), rows, cols = expected_cols, "parsed CSV table");
    let features = Array2::from_shape_vec((rows, expected_cols - 1), pixels).map_err(|e| {
        Error::Data {
            path: path.to_path_buf(),
            row: rows,
            message: e.to_string(),
        }
    })?;

    let dataset = Dataset::new(features, labels, sample_shape, num_classes)?;
    info!(path = %path.display(), samples = dataset.len(), "loaded dataset");
    Ok(dataset)
}

fn parse_field(path: &Path, row: usize, field: &str) -> Result<f32> {
    field.parse::<f32>().map_err(|e| Error::Data {
        path: path.to_path_buf(),
        row,
        message: format!("invalid number '{field}': {e}"),
    })
}
