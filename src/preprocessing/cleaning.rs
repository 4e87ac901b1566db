//! Outlier removal
//!
//! Two interchangeable policies filter the raw series before scaling:
//! - z-score: drop values whose population z-score reaches the threshold
//! - IQR: drop values outside the Tukey fences `[Q1 - k*IQR, Q3 + k*IQR]`

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::error::{ForecastError, Result};

/// Outlier detection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutlierPolicy {
    ZScore,
    Iqr,
}

/// Outlier policy together with its threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierFilter {
    pub policy: OutlierPolicy,
    /// z-score cutoff or IQR multiplier, depending on the policy
    pub threshold: f64,
}

impl OutlierFilter {
    pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;
    pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

    pub fn z_score(threshold: f64) -> Self {
        Self {
            policy: OutlierPolicy::ZScore,
            threshold,
        }
    }

    pub fn iqr(multiplier: f64) -> Self {
        Self {
            policy: OutlierPolicy::Iqr,
            threshold: multiplier,
        }
    }

    /// Filter with the conventional threshold for `policy`
    pub fn with_default_threshold(policy: OutlierPolicy) -> Self {
        match policy {
            OutlierPolicy::ZScore => Self::z_score(Self::DEFAULT_Z_THRESHOLD),
            OutlierPolicy::Iqr => Self::iqr(Self::DEFAULT_IQR_MULTIPLIER),
        }
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::with_default_threshold(OutlierPolicy::ZScore)
    }
}

/// Result of outlier removal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Retained values, original order
    pub values: Vec<f64>,
    /// Indices (into the input) of the removed values
    pub removed: Vec<usize>,
}

impl CleaningReport {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Remove outliers from `series` according to `filter`
pub fn remove_outliers(series: &[f64], filter: &OutlierFilter) -> Result<CleaningReport> {
    if series.is_empty() {
        return Err(ForecastError::DegenerateInput(
            "cannot clean an empty series".to_string(),
        ));
    }

    let keep: Vec<bool> = match filter.policy {
        OutlierPolicy::ZScore => z_score_mask(series, filter.threshold)?,
        OutlierPolicy::Iqr => iqr_mask(series, filter.threshold)?,
    };

    let mut values = Vec::with_capacity(series.len());
    let mut removed = Vec::new();
    for (i, (&value, &kept)) in series.iter().zip(keep.iter()).enumerate() {
        if kept {
            values.push(value);
        } else {
            removed.push(i);
        }
    }

    if removed.is_empty() {
        debug!(policy = %filter.policy, "No outliers detected");
    } else {
        warn!(
            policy = %filter.policy,
            removed = removed.len(),
            retained = values.len(),
            "Removed outliers"
        );
    }

    Ok(CleaningReport { values, removed })
}

fn z_score_mask(series: &[f64], threshold: f64) -> Result<Vec<bool>> {
    let mean = Statistics::mean(series.iter());
    let std = Statistics::population_std_dev(series.iter());

    if std.is_nan() || std <= 0.0 {
        return Err(ForecastError::DegenerateInput(
            "zero variance series has no z-scores".to_string(),
        ));
    }

    Ok(series
        .iter()
        .map(|&x| ((x - mean) / std).abs() < threshold)
        .collect())
}

fn iqr_mask(series: &[f64], multiplier: f64) -> Result<Vec<bool>> {
    let q1 = quantile(series, 0.25)?;
    let q3 = quantile(series, 0.75)?;
    let iqr = q3 - q1;
    let lower = q1 - multiplier * iqr;
    let upper = q3 + multiplier * iqr;

    debug!(q1, q3, lower, upper, "IQR fences");

    Ok(series.iter().map(|&x| x >= lower && x <= upper).collect())
}

/// Quantile with linear interpolation between order statistics
pub fn quantile(series: &[f64], q: f64) -> Result<f64> {
    if series.is_empty() {
        return Err(ForecastError::DegenerateInput(
            "quantile of an empty series".to_string(),
        ));
    }

    let mut sorted = series.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn with_spike() -> Vec<f64> {
        let mut series: Vec<f64> = (0..20).map(|i| 10.0 + (i % 3) as f64).collect();
        series[7] = 500.0;
        series
    }

    #[rstest]
    #[case(OutlierPolicy::ZScore)]
    #[case(OutlierPolicy::Iqr)]
    fn test_spike_removed(#[case] policy: OutlierPolicy) {
        let series = with_spike();
        let report = remove_outliers(&series, &OutlierFilter::with_default_threshold(policy)).unwrap();

        assert_eq!(report.removed, vec![7]);
        assert_eq!(report.values.len(), series.len() - 1);
        assert!(!report.values.contains(&500.0));
    }

    #[test]
    fn test_order_preserved() {
        let series = with_spike();
        let report = remove_outliers(&series, &OutlierFilter::iqr(1.5)).unwrap();

        let expected: Vec<f64> = series
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 7)
            .map(|(_, v)| *v)
            .collect();
        assert_eq!(report.values, expected);
    }

    #[test]
    fn test_z_score_boundary_is_excluded() {
        // Population z-scores of [0, 0, 0, 0, 10] are 0.5 x4 and 2.0.
        let series = vec![0.0, 0.0, 0.0, 0.0, 10.0];
        let report = remove_outliers(&series, &OutlierFilter::z_score(2.0)).unwrap();
        assert_eq!(report.removed, vec![4]);
    }

    #[test]
    fn test_iqr_fence_is_inclusive() {
        // Q1 = 2, Q3 = 4, IQR = 2, upper fence = 7
        let series = vec![1.0, 2.0, 3.0, 4.0, 7.0];
        let report = remove_outliers(&series, &OutlierFilter::iqr(1.5)).unwrap();
        assert!(report.removed.is_empty());
    }

    #[test]
    fn test_empty_series_fails() {
        for filter in [OutlierFilter::z_score(3.0), OutlierFilter::iqr(1.5)] {
            let err = remove_outliers(&[], &filter).unwrap_err();
            assert!(matches!(err, ForecastError::DegenerateInput(_)));
        }
    }

    #[test]
    fn test_zero_variance_z_score_fails() {
        let err = remove_outliers(&[5.0; 10], &OutlierFilter::z_score(3.0)).unwrap_err();
        assert!(matches!(err, ForecastError::DegenerateInput(_)));
    }

    #[test]
    fn test_zero_variance_iqr_keeps_everything() {
        let report = remove_outliers(&[5.0; 10], &OutlierFilter::iqr(1.5)).unwrap();
        assert_eq!(report.values.len(), 10);
    }

    #[test]
    fn test_quantile_interpolates() {
        let series = vec![4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(quantile(&series, 0.25).unwrap(), 1.75);
        assert_relative_eq!(quantile(&series, 0.5).unwrap(), 2.5);
        assert_relative_eq!(quantile(&series, 0.75).unwrap(), 3.25);
    }

    #[test]
    fn test_quantile_of_empty_series() {
        assert!(matches!(
            quantile(&[], 0.5),
            Err(ForecastError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("z_score".parse::<OutlierPolicy>().unwrap(), OutlierPolicy::ZScore);
        assert_eq!("iqr".parse::<OutlierPolicy>().unwrap(), OutlierPolicy::Iqr);
        assert_eq!(OutlierPolicy::ZScore.to_string(), "z_score");
    }
}
