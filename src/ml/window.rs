//! Sliding-window dataset construction
//!
//! Example `i` pairs `series[i..i + timestep]` with `series[i + timestep]`,
//! for every `i` in `0..len - timestep`. A series no longer than the window
//! yields an empty dataset.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// One supervised example: an input window and the value that follows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub window: Vec<f64>,
    pub target: f64,
}

impl Example {
    /// Split the window into `parts` equal consecutive sub-windows
    ///
    /// This is the layout consumed by convolutional-recurrent models that
    /// read a window as a short sequence of sub-sequences.
    pub fn subsequences(&self, parts: usize) -> Result<Vec<&[f64]>> {
        if parts == 0 || self.window.len() % parts != 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "window of length {} cannot be split into {} sub-sequences",
                self.window.len(),
                parts
            )));
        }
        Ok(self.window.chunks_exact(self.window.len() / parts).collect())
    }
}

/// Ordered supervised examples built from one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub timestep: usize,
    pub examples: Vec<Example>,
}

impl Dataset {
    pub fn new(timestep: usize, examples: Vec<Example>) -> Self {
        Self { timestep, examples }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn targets(&self) -> Vec<f64> {
        self.examples.iter().map(|e| e.target).collect()
    }

    pub fn windows(&self) -> impl Iterator<Item = &[f64]> {
        self.examples.iter().map(|e| e.window.as_slice())
    }
}

/// Turn a scaled series into `(window, target)` examples
pub fn make_windows(series: &[f64], timestep: usize) -> Result<Dataset> {
    if timestep == 0 {
        return Err(ForecastError::InvalidParameter(
            "timestep must be at least 1".to_string(),
        ));
    }

    let examples = if series.len() <= timestep {
        Vec::new()
    } else {
        (0..series.len() - timestep)
            .map(|i| Example {
                window: series[i..i + timestep].to_vec(),
                target: series[i + timestep],
            })
            .collect()
    };

    Ok(Dataset::new(timestep, examples))
}
