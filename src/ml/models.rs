//! ML Model Definitions
//!
//! The capability interface shared by every window regressor, plus the
//! baseline models shipped with the crate.

use serde::{Deserialize, Serialize};

use super::{Dataset, ModelType};
use crate::error::{ForecastError, Result};

/// A trained regressor mapping one input window to the next value
#[cfg_attr(test, mockall::automock)]
pub trait WindowModel: Send + Sync {
    /// Predict the value following `window`
    fn predict(&self, window: &[f64]) -> Result<f64>;

    fn model_type(&self) -> ModelType;

    /// Predict every example of `dataset`, in order
    fn predict_dataset(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        dataset.windows().map(|w| self.predict(w)).collect()
    }
}

impl<M: WindowModel + ?Sized> WindowModel for Box<M> {
    fn predict(&self, window: &[f64]) -> Result<f64> {
        (**self).predict(window)
    }

    fn model_type(&self) -> ModelType {
        (**self).model_type()
    }

    fn predict_dataset(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        (**self).predict_dataset(dataset)
    }
}

fn check_window(expected: usize, window: &[f64]) -> Result<()> {
    if window.len() != expected {
        return Err(ForecastError::DimensionMismatch {
            expected,
            got: window.len(),
        });
    }
    Ok(())
}

/// Baseline: the mean of the input window
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WindowMeanModel;

impl WindowModel for WindowMeanModel {
    fn predict(&self, window: &[f64]) -> Result<f64> {
        if window.is_empty() {
            return Err(ForecastError::DimensionMismatch {
                expected: 1,
                got: 0,
            });
        }
        Ok(window.iter().sum::<f64>() / window.len() as f64)
    }

    fn model_type(&self) -> ModelType {
        ModelType::WindowMean
    }
}

/// Linear regression over the window values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearWindowModel {
    /// One weight per window position, oldest first
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearWindowModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn timestep(&self) -> usize {
        self.coefficients.len()
    }

    pub(crate) fn predict_unchecked(&self, window: &[f64]) -> f64 {
        window
            .iter()
            .zip(self.coefficients.iter())
            .map(|(x, c)| x * c)
            .sum::<f64>()
            + self.intercept
    }
}

impl WindowModel for LinearWindowModel {
    fn predict(&self, window: &[f64]) -> Result<f64> {
        check_window(self.coefficients.len(), window)?;
        Ok(self.predict_unchecked(window))
    }

    fn model_type(&self) -> ModelType {
        ModelType::LinearRegression
    }
}
