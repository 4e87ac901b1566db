//! Rolling multi-step forecasting
//!
//! The fitted scaler is reused as-is for every step and never re-fit on
//! the forecast history.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info};

use crate::error::{ForecastError, Result};
use crate::ml::WindowModel;
use crate::preprocessing::ScalerState;

/// Builds the raw history the forecaster slides its window over
pub trait HistoryExtension {
    fn extend(&self, prior: &[f64]) -> Vec<f64>;
}

/// Named history extension strategies
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HistoryStrategy {
    /// Prior predictions followed by a second copy of themselves
    #[default]
    Duplicate,
    /// Prior predictions unchanged
    AsIs,
}

impl HistoryExtension for HistoryStrategy {
    fn extend(&self, prior: &[f64]) -> Vec<f64> {
        match self {
            HistoryStrategy::Duplicate => prior.iter().chain(prior.iter()).copied().collect(),
            HistoryStrategy::AsIs => prior.to_vec(),
        }
    }
}

/// Forecast `horizon` values by sliding a `timestep` window over the
/// extended history
///
/// Step `t` feeds scaled history `[t, t + timestep)` to the model. Every
/// window comes from the extended history, never from earlier predictions.
pub fn forecast(
    model: &dyn WindowModel,
    prior: &[f64],
    scaler: &ScalerState,
    timestep: usize,
    horizon: usize,
    extension: &dyn HistoryExtension,
) -> Result<Vec<f64>> {
    if timestep == 0 {
        return Err(ForecastError::InvalidParameter(
            "timestep must be at least 1".to_string(),
        ));
    }

    let history = extension.extend(prior);
    let needed = timestep + horizon;
    if history.len() < needed {
        return Err(ForecastError::InsufficientHistory {
            needed,
            got: history.len(),
        });
    }

    let scaled = scaler.transform(&history);
    let mut predictions = Vec::with_capacity(horizon);
    for t in 0..horizon {
        let value = model.predict(&scaled[t..t + timestep])?;
        debug!(step = t, value, "Forecast step");
        predictions.push(value);
    }

    info!(
        horizon,
        history_len = history.len(),
        model = %model.model_type(),
        "Rolling forecast complete"
    );

    Ok(scaler.inverse_transform(&predictions))
}

/// Autoregressive forecast: each scaled prediction joins the window used
/// for the next step
///
/// The buffer starts from the last `timestep` observations.
pub fn forecast_recursive(
    model: &dyn WindowModel,
    observations: &[f64],
    scaler: &ScalerState,
    timestep: usize,
    horizon: usize,
) -> Result<Vec<f64>> {
    if timestep == 0 {
        return Err(ForecastError::InvalidParameter(
            "timestep must be at least 1".to_string(),
        ));
    }
    if observations.len() < timestep {
        return Err(ForecastError::InsufficientHistory {
            needed: timestep,
            got: observations.len(),
        });
    }

    let mut buffer = scaler.transform(&observations[observations.len() - timestep..]);
    buffer.reserve(horizon);
    let mut predictions = Vec::with_capacity(horizon);

    for t in 0..horizon {
        let value = model.predict(&buffer[t..t + timestep])?;
        buffer.push(value);
        predictions.push(value);
    }

    info!(horizon, model = %model.model_type(), "Recursive forecast complete");

    Ok(scaler.inverse_transform(&predictions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::models::MockWindowModel;
    use crate::ml::{ModelType, WindowMeanModel};
    use crate::preprocessing::MinMaxScaler;
    use approx::assert_relative_eq;

    fn scaler_1_to_4() -> ScalerState {
        MinMaxScaler::default().fit(&[1.0, 2.0, 3.0, 4.0]).unwrap()
    }

    #[test]
    fn test_duplicate_extension() {
        let extended = HistoryStrategy::Duplicate.extend(&[1.0, 2.0]);
        assert_eq!(extended, vec![1.0, 2.0, 1.0, 2.0]);
        assert_eq!(HistoryStrategy::AsIs.extend(&[1.0, 2.0]), vec![1.0, 2.0]);
    }

    #[test]
    fn test_mean_model_forecast() {
        let predictions = forecast(
            &WindowMeanModel,
            &[1.0, 2.0, 3.0, 4.0],
            &scaler_1_to_4(),
            2,
            3,
            &HistoryStrategy::Duplicate,
        )
        .unwrap();

        assert_eq!(predictions.len(), 3);
        for (got, want) in predictions.iter().zip([1.5, 2.5, 3.5]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_insufficient_history() {
        let err = forecast(
            &WindowMeanModel,
            &[1.0, 2.0, 3.0, 4.0],
            &scaler_1_to_4(),
            2,
            3,
            &HistoryStrategy::AsIs,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ForecastError::InsufficientHistory { needed: 5, got: 4 }
        ));
    }

    #[test]
    fn test_model_called_once_per_step() {
        let mut model = MockWindowModel::new();
        model
            .expect_predict()
            .times(5)
            .returning(|w: &[f64]| Ok(w[w.len() - 1]));
        model
            .expect_model_type()
            .return_const(ModelType::LinearRegression);

        let prior: Vec<f64> = (1..=4).map(f64::from).collect();
        let predictions = forecast(
            &model,
            &prior,
            &scaler_1_to_4(),
            3,
            5,
            &HistoryStrategy::Duplicate,
        )
        .unwrap();

        // Last value of windows over [1,2,3,4,1,2,3,4]
        for (got, want) in predictions.iter().zip([3.0, 4.0, 1.0, 2.0, 3.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_model_error_propagates() {
        let mut model = MockWindowModel::new();
        model
            .expect_predict()
            .returning(|_| Err(ForecastError::Model("boom".to_string())));

        let result = forecast(
            &model,
            &[1.0, 2.0, 3.0, 4.0],
            &scaler_1_to_4(),
            2,
            2,
            &HistoryStrategy::Duplicate,
        );
        assert!(matches!(result, Err(ForecastError::Model(_))));
    }

    #[test]
    fn test_recursive_feeds_predictions_back() {
        // Scaled buffer [1/3, 2/3] -> 0.5 -> 7/12 -> ...
        let predictions =
            forecast_recursive(&WindowMeanModel, &[1.0, 2.0, 3.0], &scaler_1_to_4(), 2, 3)
                .unwrap();

        let scaled = [0.5, (2.0 / 3.0 + 0.5) / 2.0];
        let third = (scaled[0] + scaled[1]) / 2.0;
        let expected: Vec<f64> = [scaled[0], scaled[1], third]
            .iter()
            .map(|s| s * 3.0 + 1.0)
            .collect();

        for (got, want) in predictions.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_recursive_needs_one_window() {
        assert!(matches!(
            forecast_recursive(&WindowMeanModel, &[1.0], &scaler_1_to_4(), 2, 3),
            Err(ForecastError::InsufficientHistory { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn test_zero_horizon() {
        let predictions = forecast(
            &WindowMeanModel,
            &[1.0, 2.0],
            &scaler_1_to_4(),
            2,
            0,
            &HistoryStrategy::AsIs,
        )
        .unwrap();
        assert!(predictions.is_empty());
    }
}
