use approx::assert_relative_eq;
use production_forecaster::prelude::*;
use production_forecaster::ml::{split_chronological, LinearTrainer, TrainingConfig, WindowMeanModel};
use rstest::rstest;

#[test]
fn one_to_ten_windows() {
    let series: Vec<f64> = (1..=10).map(f64::from).collect();
    let dataset = make_windows(&series, 4).unwrap();

    assert_eq!(dataset.len(), 6);
    assert_eq!(dataset.examples[0].window, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(dataset.examples[0].target, 5.0);
    assert_eq!(dataset.examples[5].window, vec![6.0, 7.0, 8.0, 9.0]);
    assert_eq!(dataset.examples[5].target, 10.0);
}

#[test]
fn mean_model_rolling_forecast() {
    let prior = [1.0, 2.0, 3.0, 4.0];
    let scaler = MinMaxScaler::default().fit(&prior).unwrap();

    let predictions = forecast(
        &WindowMeanModel,
        &prior,
        &scaler,
        2,
        3,
        &HistoryStrategy::Duplicate,
    )
    .unwrap();

    for (got, want) in predictions.iter().zip([1.5, 2.5, 3.5]) {
        assert_relative_eq!(*got, want, epsilon = 1e-9);
    }
}

#[rstest]
#[case(HistoryStrategy::Duplicate, 4, 4, true)]
#[case(HistoryStrategy::Duplicate, 4, 5, false)]
#[case(HistoryStrategy::AsIs, 2, 2, true)]
#[case(HistoryStrategy::AsIs, 2, 3, false)]
fn history_length_bound(
    #[case] strategy: HistoryStrategy,
    #[case] timestep: usize,
    #[case] horizon: usize,
    #[case] ok: bool,
) {
    let prior = [1.0, 2.0, 3.0, 4.0];
    let scaler = MinMaxScaler::default().fit(&prior).unwrap();
    let result = forecast(&WindowMeanModel, &prior, &scaler, timestep, horizon, &strategy);

    match result {
        Ok(values) => {
            assert!(ok);
            assert_eq!(values.len(), horizon);
        }
        Err(ForecastError::InsufficientHistory { needed, got }) => {
            assert!(!ok);
            assert_eq!(needed, timestep + horizon);
            assert!(got < needed);
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn zero_truth_only_affects_mape() {
    let metrics = ForecastMetrics::calculate(&[0.0, 2.0, 4.0], &[1.0, 2.0, 5.0]).unwrap();
    assert_relative_eq!(metrics.mape, 12.5, epsilon = 1e-12);
    assert_relative_eq!(metrics.r2, 0.75, epsilon = 1e-12);
    assert!(metrics.r < 1.0);
}

#[test]
fn trained_linear_model_tracks_a_ramp() {
    let series: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let scaler = MinMaxScaler::default().fit(&series).unwrap();
    let dataset = make_windows(&scaler.transform(&series), 4).unwrap();
    let (train, valid) = split_chronological(&dataset, 0.2).unwrap();

    let config = TrainingConfig {
        epochs: 2000,
        learning_rate: 0.2,
        ..TrainingConfig::default()
    };
    let trained = LinearTrainer.fit(&train, &valid, &config).unwrap();

    let next = forecast_recursive(&trained.model, &series, &scaler, 4, 1).unwrap();
    // Extrapolating one day past the fit range
    assert!((next[0] - 160.0).abs() < 5.0);
}
