use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlError {
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model has not been fitted")]
    ModelNotFitted,

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, MlError>;
