//! Yield model: dataset loading, feature standardization and a random forest regressor.
//!
//! Everything here is synchronous and CPU bound. The web layer only touches
//! [`YieldModel`], which is trained once at startup and then shared read-only.

pub mod dataset;
mod error;
pub mod forest;
pub mod predictor;
pub mod scaler;
pub mod tree;

pub use dataset::{Dataset, FeatureVector, FEATURE_COLUMNS, N_FEATURES, TARGET_COLUMN};
pub use error::{MlError, Result};
pub use forest::RandomForestRegressor;
pub use predictor::{EvaluationMetrics, ForestParams, YieldModel};
pub use scaler::StandardScaler;
pub use tree::RegressionTree;
