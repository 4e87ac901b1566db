//! SmartCore RandomForest window model
//!
//! Each window position is one feature column. Trees are grown once, so the
//! recorded history holds a single row.

use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::info;

use super::training::{check_trainable, EpochMetrics, TrainedModel, Trainer, TrainingConfig, TrainingHistory};
use super::{Dataset, ModelMetadata, ModelType, WindowModel};
use crate::error::{ForecastError, Result};

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor over window values
#[derive(Debug)]
pub struct RandomForestModel {
    model: Forest,
    timestep: usize,
    pub n_trees: usize,
    pub max_depth: Option<u16>,
}

impl RandomForestModel {
    /// Forest parameters for the given tree count and depth
    ///
    /// Training samples are not kept, and `m` falls back to
    /// `sqrt(n_features)`.
    pub fn parameters(n_trees: usize, max_depth: Option<u16>, seed: u64) -> RandomForestRegressorParameters {
        RandomForestRegressorParameters {
            max_depth,
            min_samples_leaf: 1,
            min_samples_split: 2,
            n_trees,
            m: None,
            keep_samples: false,
            seed,
        }
    }

    pub fn timestep(&self) -> usize {
        self.timestep
    }
}

fn to_matrix(dataset: &Dataset) -> DenseMatrix<f64> {
    let mut flat = Vec::with_capacity(dataset.len() * dataset.timestep);
    for window in dataset.windows() {
        flat.extend_from_slice(window);
    }
    DenseMatrix::new(dataset.len(), dataset.timestep, flat, false)
}

impl WindowModel for RandomForestModel {
    fn predict(&self, window: &[f64]) -> Result<f64> {
        if window.len() != self.timestep {
            return Err(ForecastError::DimensionMismatch {
                expected: self.timestep,
                got: window.len(),
            });
        }

        let x = DenseMatrix::new(1, self.timestep, window.to_vec(), false);
        let predictions = self
            .model
            .predict(&x)
            .map_err(|e| ForecastError::Model(format!("RandomForest prediction failed: {:?}", e)))?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| ForecastError::Model("Model returned empty predictions".to_string()))
    }

    fn model_type(&self) -> ModelType {
        ModelType::RandomForest
    }

    fn predict_dataset(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        if dataset.is_empty() {
            return Ok(Vec::new());
        }
        if dataset.timestep != self.timestep {
            return Err(ForecastError::DimensionMismatch {
                expected: self.timestep,
                got: dataset.timestep,
            });
        }
        self.model
            .predict(&to_matrix(dataset))
            .map_err(|e| ForecastError::Model(format!("RandomForest prediction failed: {:?}", e)))
    }
}

/// Grows a [`RandomForestModel`] from `n_trees` / `max_depth` in the config
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomForestTrainer {
    pub seed: u64,
}

impl Trainer for RandomForestTrainer {
    type Model = RandomForestModel;

    fn fit(
        &self,
        train: &Dataset,
        validation: &Dataset,
        config: &TrainingConfig,
    ) -> Result<TrainedModel<Self::Model>> {
        check_trainable(train, validation)?;

        let params = RandomForestModel::parameters(config.n_trees, config.max_depth, self.seed);
        let x = to_matrix(train);
        let y = train.targets();

        let forest = Forest::fit(&x, &y, params)
            .map_err(|e| ForecastError::Model(format!("RandomForest training failed: {:?}", e)))?;

        let model = RandomForestModel {
            model: forest,
            timestep: train.timestep,
            n_trees: config.n_trees,
            max_depth: config.max_depth,
        };

        let mut history = TrainingHistory::default();
        let metrics = EpochMetrics::score(0, &model, train, validation)?;
        info!(
            n_trees = config.n_trees,
            loss = metrics.loss,
            val_loss = metrics.val_loss,
            "Trained random forest"
        );
        history.push(metrics);

        Ok(TrainedModel {
            model,
            history,
            metadata: ModelMetadata::new(
                ModelType::RandomForest,
                train.timestep,
                train.len(),
                validation.len(),
            ),
        })
    }
}
