//! Machine Learning Module
//!
//! Supervised learning on sliding windows of the scaled production series:
//! - Window/target dataset construction
//! - Seeded train/validation splitting
//! - The model capability interface (`fit` / `predict`)
//! - Baseline models and their trainers
//!
//! Deep architectures are out of scope here. Anything implementing
//! [`WindowModel`] can be plugged into evaluation and forecasting.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub mod models;
pub mod split;
pub mod training;
pub mod window;

#[cfg(feature = "ml")]
pub mod smartcore;

pub use models::{LinearWindowModel, WindowMeanModel, WindowModel};
pub use split::{split, split_chronological, SplitConfig};
pub use training::{
    EpochMetrics, LinearTrainer, MeanTrainer, TrainedModel, Trainer, TrainingConfig,
    TrainingHistory,
};
pub use window::{make_windows, Dataset, Example};

/// ML Model Type
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelType {
    /// Predicts the mean of the input window
    WindowMean,
    /// Linear regression on the window values
    LinearRegression,
    /// SmartCore random forest (requires the `ml` feature)
    RandomForest,
}

/// ML Model Metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: String,
    pub model_type: ModelType,
    pub version: String,
    pub trained_at: chrono::DateTime<chrono::Utc>,
    pub training_samples: usize,
    pub validation_samples: usize,
    /// Window length the model expects
    pub timestep: usize,
}

impl ModelMetadata {
    pub fn new(
        model_type: ModelType,
        timestep: usize,
        training_samples: usize,
        validation_samples: usize,
    ) -> Self {
        Self {
            model_id: format!("{}_{}", model_type, uuid::Uuid::new_v4()),
            model_type,
            version: env!("CARGO_PKG_VERSION").to_string(),
            trained_at: chrono::Utc::now(),
            training_samples,
            validation_samples,
            timestep,
        }
    }
}
