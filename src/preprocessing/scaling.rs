//! Min-max scaling with an explicit, immutable fitted state

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Min-max scaler configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    /// Lower bound of the target range
    pub range_min: f64,
    /// Upper bound of the target range
    pub range_max: f64,
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self {
            range_min: 0.0,
            range_max: 1.0,
        }
    }
}

impl MinMaxScaler {
    /// Create a scaler targeting `[range_min, range_max]`
    pub fn with_range(range_min: f64, range_max: f64) -> Result<Self> {
        if !range_min.is_finite() || !range_max.is_finite() || range_min >= range_max {
            return Err(ForecastError::InvalidParameter(format!(
                "feature range [{}, {}] must be finite and increasing",
                range_min, range_max
            )));
        }
        Ok(Self {
            range_min,
            range_max,
        })
    }

    /// Fit the transform parameters on `series`
    pub fn fit(&self, series: &[f64]) -> Result<ScalerState> {
        if series.is_empty() {
            return Err(ForecastError::DegenerateInput(
                "cannot fit a scaler on an empty series".to_string(),
            ));
        }

        let data_min = series.iter().copied().fold(f64::INFINITY, f64::min);
        let data_max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if data_max == data_min {
            return Err(ForecastError::DegenerateScale(data_min));
        }

        Ok(ScalerState {
            data_min,
            data_max,
            range_min: self.range_min,
            range_max: self.range_max,
        })
    }
}

/// Fitted min-max parameters
///
/// Fit once, then shared read-only by every later transform and inverse
/// transform so the scaled and unscaled domains stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    pub data_min: f64,
    pub data_max: f64,
    pub range_min: f64,
    pub range_max: f64,
}

impl ScalerState {
    pub fn transform_value(&self, x: f64) -> f64 {
        (x - self.data_min) / (self.data_max - self.data_min) * (self.range_max - self.range_min)
            + self.range_min
    }

    pub fn inverse_value(&self, y: f64) -> f64 {
        (y - self.range_min) / (self.range_max - self.range_min) * (self.data_max - self.data_min)
            + self.data_min
    }

    /// Apply the fitted map; values outside the fit range extrapolate
    pub fn transform(&self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|&x| self.transform_value(x)).collect()
    }

    pub fn inverse_transform(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|&y| self.inverse_value(y)).collect()
    }
}

/// Fit a `[0, 1]` scaler on `series`
pub fn fit(series: &[f64]) -> Result<ScalerState> {
    MinMaxScaler::default().fit(series)
}

pub fn transform(series: &[f64], state: &ScalerState) -> Vec<f64> {
    state.transform(series)
}

pub fn inverse_transform(scaled: &[f64], state: &ScalerState) -> Vec<f64> {
    state.inverse_transform(scaled)
}
