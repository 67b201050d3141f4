//! Training dataset loading and splitting

use super::error::{MlError, Result};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::path::Path;

/// Feature columns, in the order the scaler and the forest expect them.
pub const FEATURE_COLUMNS: [&str; N_FEATURES] = [
    "luas_panen",
    "bibit",
    "pupuk_npk",
    "pupuk_urea",
    "obat_insectisida",
];

pub const N_FEATURES: usize = 5;

/// Column holding the harvest yield the model learns to predict.
pub const TARGET_COLUMN: &str = "hasil_panen";

/// One raw input row in [`FEATURE_COLUMNS`] order.
pub type FeatureVector = [f64; N_FEATURES];

/// Feature matrix and target vector with matching row counts
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub target: Array1<f64>,
}

impl Dataset {
    pub fn new(features: Array2<f64>, target: Array1<f64>) -> Result<Self> {
        if features.nrows() != target.len() {
            return Err(MlError::ShapeError {
                expected: format!("target length = {}", features.nrows()),
                actual: format!("target length = {}", target.len()),
            });
        }
        Ok(Self { features, target })
    }

    /// Load the dataset from a CSV file with a header row.
    ///
    /// Only [`FEATURE_COLUMNS`] and [`TARGET_COLUMN`] are read; any other
    /// column in the file is ignored.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .into_reader_with_file_handle(file)
            .finish()?;

        Self::from_frame(&df)
    }

    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let n_rows = df.height();
        if n_rows == 0 {
            return Err(MlError::EmptyDataset);
        }

        let mut features = Array2::zeros((n_rows, N_FEATURES));
        for (idx, name) in FEATURE_COLUMNS.iter().enumerate() {
            let values = numeric_column(df, name)?;
            features.column_mut(idx).assign(&values);
        }
        let target = numeric_column(df, TARGET_COLUMN)?;

        Self::new(features, target)
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Shuffle the rows with a seeded generator and split off
    /// `ceil(test_size * n)` rows as the test set.
    ///
    /// Returns `(train, test)`.
    pub fn train_test_split(&self, test_size: f64, seed: u64) -> Result<(Dataset, Dataset)> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(MlError::ValidationError(format!(
                "test_size must be in (0, 1), got {test_size}"
            )));
        }

        let n_samples = self.len();
        let n_test = (test_size * n_samples as f64).ceil() as usize;
        let n_train = n_samples.saturating_sub(n_test);
        if n_train == 0 || n_test == 0 {
            return Err(MlError::ValidationError(format!(
                "{n_samples} rows cannot be split with test_size {test_size}"
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (test_idx, train_idx) = indices.split_at(n_test);
        Ok((self.select(train_idx), self.select(test_idx)))
    }

    fn select(&self, rows: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), rows),
            target: self.target.select(Axis(0), rows),
        }
    }
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Array1<f64>> {
    let column = df
        .column(name)
        .map_err(|_| MlError::ColumnNotFound(name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    let values = series.f64()?;

    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                MlError::DataError(format!(
                    "column `{name}` has a missing or non-numeric value at row {row}"
                ))
            })
        })
        .collect::<Result<Vec<f64>>>()
        .map(Array1::from_vec)
}
