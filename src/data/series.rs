use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashSet;
use std::fmt;

/// Chronologically ordered scalar observations, one per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSeries {
    /// Column the values were read from
    pub name: String,
    values: Vec<f64>,
}

impl ObservationSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Descriptive statistics, `None` for an empty series
    pub fn summary(&self) -> Option<SeriesSummary> {
        if self.values.is_empty() {
            return None;
        }

        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let distinct = self
            .values
            .iter()
            .map(|v| v.to_bits())
            .collect::<HashSet<_>>()
            .len();

        Some(SeriesSummary {
            count: self.values.len(),
            mean: Statistics::mean(self.values.iter()),
            std_dev: Statistics::population_std_dev(self.values.iter()),
            min,
            max,
            distinct,
        })
    }
}

/// Summary of an observation series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Number of distinct values
    pub distinct: usize,
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={}, mean={:.3}, std={:.3}, min={:.3}, max={:.3}, distinct={}",
            self.count, self.mean, self.std_dev, self.min, self.max, self.distinct
        )
    }
}
