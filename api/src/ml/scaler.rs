//! Standard (z-score) feature scaling

use super::error::{MlError, Result};
use ndarray::{Array1, Array2, Axis};

/// Standardizes each column to zero mean and unit variance: `(x - mean) / std`.
///
/// The standard deviation is the population one (`ddof = 0`). A constant
/// column gets a scale of 1 so it is only centered.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute per-column mean and scale
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let mean = x.mean_axis(Axis(0)).ok_or(MlError::EmptyDataset)?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|std| if std == 0.0 { 1.0 } else { std });

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(self)
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, scale) = self.params()?;

        if x.ncols() != mean.len() {
            return Err(MlError::ShapeError {
                expected: format!("{} columns", mean.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let centered = x - mean;
        Ok(centered / scale)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }

    fn params(&self) -> Result<(&Array1<f64>, &Array1<f64>)> {
        match (&self.mean, &self.scale) {
            (Some(mean), Some(scale)) => Ok((mean, scale)),
            _ => Err(MlError::ModelNotFitted),
        }
    }
}
