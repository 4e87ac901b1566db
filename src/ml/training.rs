//! ML Model Training Pipeline
//!
//! Trainers fit a [`WindowModel`] on a training dataset, score every epoch
//! on the validation dataset and hand back the model with its history.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use super::{Dataset, LinearWindowModel, ModelMetadata, ModelType, WindowMeanModel, WindowModel};
use crate::error::{ForecastError, Result};

/// Training Configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrainingConfig {
    pub model_type: ModelType,
    #[validate(range(min = 1))]
    pub epochs: usize,
    #[validate(range(exclusive_min = 0.0))]
    pub learning_rate: f64,
    /// Trees grown by the random forest
    #[validate(range(min = 1))]
    pub n_trees: usize,
    pub max_depth: Option<u16>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            model_type: ModelType::LinearRegression,
            epochs: 100,
            learning_rate: 0.1,
            n_trees: 50,
            max_depth: Some(10),
        }
    }
}

/// Losses recorded at the end of one epoch; `loss` is the training MSE
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub loss: f64,
    pub mae: f64,
    pub mse: f64,
    pub val_loss: f64,
    pub val_mae: f64,
    pub val_mse: f64,
}

impl EpochMetrics {
    pub(crate) fn score(
        epoch: usize,
        model: &dyn WindowModel,
        train: &Dataset,
        validation: &Dataset,
    ) -> Result<Self> {
        let (mae, mse) = errors(model, train)?;
        let (val_mae, val_mse) = if validation.is_empty() {
            (f64::NAN, f64::NAN)
        } else {
            errors(model, validation)?
        };
        Ok(Self {
            epoch,
            loss: mse,
            mae,
            mse,
            val_loss: val_mse,
            val_mae,
            val_mse,
        })
    }
}

/// Mean absolute and mean squared error of `model` on `dataset`
fn errors(model: &dyn WindowModel, dataset: &Dataset) -> Result<(f64, f64)> {
    let n = dataset.len() as f64;
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    for example in &dataset.examples {
        let err = model.predict(&example.window)? - example.target;
        abs_sum += err.abs();
        sq_sum += err * err;
    }
    Ok((abs_sum / n, sq_sum / n))
}

/// Ordered per-epoch training log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn push(&mut self, metrics: EpochMetrics) {
        self.epochs.push(metrics);
    }

    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    /// Epoch with the lowest validation loss
    pub fn best_epoch(&self) -> Option<&EpochMetrics> {
        self.epochs
            .iter()
            .filter(|m| !m.val_loss.is_nan())
            .min_by(|a, b| a.val_loss.total_cmp(&b.val_loss))
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
}

/// A fitted model with its training history and metadata
#[derive(Debug, Clone)]
pub struct TrainedModel<M> {
    pub model: M,
    pub history: TrainingHistory,
    pub metadata: ModelMetadata,
}

impl<M: WindowModel + 'static> TrainedModel<M> {
    pub fn boxed(self) -> TrainedModel<Box<dyn WindowModel>> {
        TrainedModel {
            model: Box::new(self.model),
            history: self.history,
            metadata: self.metadata,
        }
    }
}

/// Capability to fit a window model
pub trait Trainer {
    type Model: WindowModel;

    fn fit(
        &self,
        train: &Dataset,
        validation: &Dataset,
        config: &TrainingConfig,
    ) -> Result<TrainedModel<Self::Model>>;
}

pub(crate) fn check_trainable(train: &Dataset, validation: &Dataset) -> Result<()> {
    if train.is_empty() {
        return Err(ForecastError::InsufficientHistory {
            needed: train.timestep + 1,
            got: 0,
        });
    }
    if !validation.is_empty() && validation.timestep != train.timestep {
        return Err(ForecastError::DimensionMismatch {
            expected: train.timestep,
            got: validation.timestep,
        });
    }
    Ok(())
}

/// "Trains" the parameter-free window mean baseline
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanTrainer;

impl Trainer for MeanTrainer {
    type Model = WindowMeanModel;

    fn fit(
        &self,
        train: &Dataset,
        validation: &Dataset,
        _config: &TrainingConfig,
    ) -> Result<TrainedModel<Self::Model>> {
        check_trainable(train, validation)?;

        let model = WindowMeanModel;
        let mut history = TrainingHistory::default();
        history.push(EpochMetrics::score(0, &model, train, validation)?);

        Ok(TrainedModel {
            model,
            history,
            metadata: ModelMetadata::new(
                ModelType::WindowMean,
                train.timestep,
                train.len(),
                validation.len(),
            ),
        })
    }
}

/// Full-batch gradient descent on the mean squared error
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrainer;

impl Trainer for LinearTrainer {
    type Model = LinearWindowModel;

    fn fit(
        &self,
        train: &Dataset,
        validation: &Dataset,
        config: &TrainingConfig,
    ) -> Result<TrainedModel<Self::Model>> {
        check_trainable(train, validation)?;

        let n = train.len() as f64;
        let n_features = train.timestep;
        let mean_target = train.targets().iter().sum::<f64>() / n;

        let mut model = LinearWindowModel::new(vec![0.0; n_features], mean_target);
        let mut history = TrainingHistory::default();

        for epoch in 0..config.epochs {
            let mut coef_gradients = vec![0.0; n_features];
            let mut intercept_gradient = 0.0;

            for example in &train.examples {
                let error = model.predict_unchecked(&example.window) - example.target;
                for (g, x) in coef_gradients.iter_mut().zip(example.window.iter()) {
                    *g += 2.0 * error * x / n;
                }
                intercept_gradient += 2.0 * error / n;
            }

            for (c, g) in model.coefficients.iter_mut().zip(coef_gradients.iter()) {
                *c -= config.learning_rate * g;
            }
            model.intercept -= config.learning_rate * intercept_gradient;

            let metrics = EpochMetrics::score(epoch, &model, train, validation)?;
            debug!(
                epoch,
                loss = metrics.loss,
                val_loss = metrics.val_loss,
                "Linear epoch complete"
            );
            history.push(metrics);
        }

        if let Some(last) = history.last() {
            info!(
                epochs = config.epochs,
                loss = last.loss,
                val_loss = last.val_loss,
                "Trained linear window model"
            );
        }

        Ok(TrainedModel {
            model,
            history,
            metadata: ModelMetadata::new(
                ModelType::LinearRegression,
                train.timestep,
                train.len(),
                validation.len(),
            ),
        })
    }
}
