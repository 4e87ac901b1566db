//! Forecast Metrics and Evaluation
//!
//! MAPE skips indices whose true value is zero. Pearson r and R² are
//! computed on the full paired sequences, zeros included.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;
use tracing::warn;

use crate::error::{ForecastError, Result};

fn check_pair(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(ForecastError::DegenerateInput(
            "cannot evaluate an empty sequence".to_string(),
        ));
    }
    Ok(())
}

/// Mean Absolute Percentage Error (%) over the non-zero true values
pub fn mape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    let (sum, count) = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, _)| **a != 0.0)
        .fold((0.0, 0usize), |(sum, count), (a, p)| {
            (sum + ((a - p) / a).abs(), count + 1)
        });

    if count == 0 {
        return Err(ForecastError::UndefinedMetric(
            "MAPE is undefined when every true value is zero".to_string(),
        ));
    }
    if count < actual.len() {
        warn!(
            skipped = actual.len() - count,
            "Zero true values excluded from MAPE"
        );
    }

    Ok(sum / count as f64 * 100.0)
}

/// Pearson correlation coefficient
pub fn pearson_r(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    let mean_a = Statistics::mean(actual);
    let mean_p = Statistics::mean(predicted);

    let (mut cov, mut var_a, mut var_p) = (0.0, 0.0, 0.0);
    for (a, p) in actual.iter().zip(predicted.iter()) {
        let da = a - mean_a;
        let dp = p - mean_p;
        cov += da * dp;
        var_a += da * da;
        var_p += dp * dp;
    }

    if var_a == 0.0 || var_p == 0.0 {
        return Err(ForecastError::UndefinedMetric(
            "Pearson r is undefined for a constant sequence".to_string(),
        ));
    }

    Ok(cov / (var_a.sqrt() * var_p.sqrt()))
}

/// Coefficient of determination, `1 - SS_res / SS_tot`
///
/// A constant truth scores 1.0 when matched exactly and 0.0 otherwise.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    let mean_actual = Statistics::mean(actual);
    let total_variance: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let residual_variance: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if total_variance == 0.0 {
        return Ok(if residual_variance == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - residual_variance / total_variance)
}

/// Forecast accuracy metrics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Square Error
    pub mse: f64,
    /// Root Mean Square Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error (%)
    pub mape: f64,
    /// Pearson correlation
    pub r: f64,
    /// R² (coefficient of determination)
    pub r2: f64,
    /// Number of samples evaluated
    pub sample_count: usize,
}

impl ForecastMetrics {
    /// Calculate metrics from actual and predicted values
    pub fn calculate(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        check_pair(actual, predicted)?;

        let n = actual.len() as f64;
        let (abs_sum, sq_sum) = actual
            .iter()
            .zip(predicted.iter())
            .fold((0.0, 0.0), |(abs_sum, sq_sum), (a, p)| {
                let error = a - p;
                (abs_sum + error.abs(), sq_sum + error * error)
            });
        let mse = sq_sum / n;

        Ok(Self {
            mae: abs_sum / n,
            mse,
            rmse: mse.sqrt(),
            mape: mape(actual, predicted)?,
            r: pearson_r(actual, predicted)?,
            r2: r_squared(actual, predicted)?,
            sample_count: actual.len(),
        })
    }

    /// Assess forecast quality based on MAPE
    pub fn quality(&self) -> ForecastQuality {
        if self.mape < 5.0 {
            ForecastQuality::Excellent
        } else if self.mape < 10.0 {
            ForecastQuality::Good
        } else if self.mape < 20.0 {
            ForecastQuality::Fair
        } else if self.mape < 50.0 {
            ForecastQuality::Poor
        } else {
            ForecastQuality::VeryPoor
        }
    }
}

impl fmt::Display for ForecastMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Metrics: MAE={:.3}, RMSE={:.3}, MAPE={:.2}%, r={:.3}, R²={:.3}, Quality={:?}",
            self.mae,
            self.rmse,
            self.mape,
            self.r,
            self.r2,
            self.quality()
        )
    }
}

/// Forecast quality classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastQuality {
    Excellent, // MAPE < 5%
    Good,      // MAPE 5-10%
    Fair,      // MAPE 10-20%
    Poor,      // MAPE 20-50%
    VeryPoor,  // MAPE > 50%
}
