//! The resident yield model: a fitted scaler plus a fitted forest

use super::dataset::{Dataset, FeatureVector, FEATURE_COLUMNS, N_FEATURES};
use super::error::{MlError, Result};
use super::forest::RandomForestRegressor;
use super::scaler::StandardScaler;
use ndarray::{Array1, Array2};
use std::time::Instant;
use tracing::{debug, info};

/// Fixed training hyperparameters
#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub random_state: u64,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 88,
            max_depth: 5,
            min_samples_split: 8,
            min_samples_leaf: 1,
            random_state: 42,
            test_size: 0.2,
        }
    }
}

/// Held-out scores computed right after training
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationMetrics {
    pub r2: f64,
    pub mae: f64,
    pub rmse: f64,
    pub n_train: usize,
    pub n_test: usize,
}

impl EvaluationMetrics {
    fn compute(actual: &Array1<f64>, predicted: &Array1<f64>, n_train: usize) -> Self {
        let n = actual.len() as f64;
        let residuals = actual - predicted;

        let ss_res = residuals.mapv(|r| r * r).sum();
        let mean = actual.mean().unwrap_or(0.0);
        let ss_tot = actual.mapv(|a| (a - mean).powi(2)).sum();

        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        Self {
            r2,
            mae: residuals.mapv(f64::abs).sum() / n,
            rmse: (ss_res / n).sqrt(),
            n_train,
            n_test: actual.len(),
        }
    }
}

/// Scaler and forest fitted once from the training dataset.
///
/// Immutable after [`YieldModel::train`]; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct YieldModel {
    scaler: StandardScaler,
    forest: RandomForestRegressor,
    metrics: EvaluationMetrics,
}

impl YieldModel {
    /// Standardize the features, split, fit the forest on the training rows
    /// and score it on the held-out rows.
    ///
    /// The scaler is fitted on the full feature matrix before the split.
    pub fn train(dataset: &Dataset, params: &ForestParams) -> Result<Self> {
        if dataset.features.ncols() != N_FEATURES {
            return Err(MlError::ShapeError {
                expected: format!("{N_FEATURES} feature columns"),
                actual: format!("{} feature columns", dataset.features.ncols()),
            });
        }

        let started = Instant::now();

        let mut scaler = StandardScaler::new();
        let scaled = Dataset::new(scaler.fit_transform(&dataset.features)?, dataset.target.clone())?;
        let (train, test) = scaled.train_test_split(params.test_size, params.random_state)?;

        let mut forest = RandomForestRegressor::new(params.n_estimators)
            .with_max_depth(params.max_depth)
            .with_min_samples_split(params.min_samples_split)
            .with_min_samples_leaf(params.min_samples_leaf)
            .with_random_state(params.random_state);
        forest.fit(&train.features, &train.target)?;

        let predicted = forest.predict(&test.features)?;
        let metrics = EvaluationMetrics::compute(&test.target, &predicted, train.len());

        info!(
            n_trees = forest.n_trees(),
            n_train = metrics.n_train,
            n_test = metrics.n_test,
            r2 = metrics.r2,
            mae = metrics.mae,
            rmse = metrics.rmse,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Yield model trained"
        );
        if let Some(importances) = forest.feature_importances() {
            for (name, importance) in FEATURE_COLUMNS.iter().zip(importances.iter()) {
                debug!(feature = *name, importance = *importance, "Feature importance");
            }
        }

        Ok(Self { scaler, forest, metrics })
    }

    /// Predict the harvest for one raw (unscaled) input row
    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let raw = Array2::from_shape_vec((1, N_FEATURES), features.to_vec())
            .map_err(|e| MlError::DataError(e.to_string()))?;
        let scaled = self.scaler.transform(&raw)?;
        self.forest.predict_row(scaled.row(0))
    }

    pub fn metrics(&self) -> &EvaluationMetrics {
        &self.metrics
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn forest(&self) -> &RandomForestRegressor {
        &self.forest
    }
}
