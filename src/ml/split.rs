use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Dataset, Example};
use crate::error::{ForecastError, Result};

/// Train/validation split settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SplitConfig {
    /// Share of examples held out for validation
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    pub validation_fraction: f64,
    pub seed: u64,
    /// Shuffle before partitioning; otherwise the tail validates
    pub shuffle: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            validation_fraction: 0.4,
            seed: 0,
            shuffle: true,
        }
    }
}

impl SplitConfig {
    pub fn apply(&self, dataset: &Dataset) -> Result<(Dataset, Dataset)> {
        if self.shuffle {
            split(dataset, self.validation_fraction, self.seed)
        } else {
            split_chronological(dataset, self.validation_fraction)
        }
    }
}

/// Number of validation examples for `n` examples: `ceil(fraction * n)`,
/// kept within `1..n` so neither side is empty
fn validation_size(n: usize, fraction: f64) -> Result<usize> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "validation fraction must be in (0, 1), got {}",
            fraction
        )));
    }
    if n < 2 {
        return Err(ForecastError::InsufficientHistory { needed: 2, got: n });
    }
    let size = (fraction * n as f64).ceil() as usize;
    Ok(size.clamp(1, n - 1))
}

/// Seeded shuffle-then-partition into `(train, validation)`
pub fn split(dataset: &Dataset, validation_fraction: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    let n_valid = validation_size(dataset.len(), validation_fraction)?;

    let mut indices: Vec<usize> = (0..dataset.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let pick = |idx: &[usize]| -> Vec<Example> {
        idx.iter().map(|&i| dataset.examples[i].clone()).collect()
    };

    let valid = pick(&indices[..n_valid]);
    let train = pick(&indices[n_valid..]);

    Ok((
        Dataset::new(dataset.timestep, train),
        Dataset::new(dataset.timestep, valid),
    ))
}

/// Order-preserving split: the first examples train, the rest validate
pub fn split_chronological(dataset: &Dataset, validation_fraction: f64) -> Result<(Dataset, Dataset)> {
    let n_valid = validation_size(dataset.len(), validation_fraction)?;
    let split_idx = dataset.len() - n_valid;

    Ok((
        Dataset::new(dataset.timestep, dataset.examples[..split_idx].to_vec()),
        Dataset::new(dataset.timestep, dataset.examples[split_idx..].to_vec()),
    ))
}
