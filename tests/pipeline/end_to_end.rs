use production_forecaster::config::PipelineConfig;
use production_forecaster::ml::ModelType;
use production_forecaster::pipeline::Pipeline;
use production_forecaster::preprocessing::OutlierPolicy;
use production_forecaster::ForecastError;
use tempfile::tempdir;

use super::write_production_csv;

fn config_for(dir: &std::path::Path, days: usize) -> PipelineConfig {
    let input = dir.join("production.csv");
    write_production_csv(&input, days);

    let mut config = PipelineConfig::default();
    config.data.input = input;
    config.output.directory = dir.join("out");
    config
}

#[test]
fn full_year_forecast_with_artifacts() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), 1000);

    let report = Pipeline::new(config).unwrap().run().unwrap();

    assert_eq!(report.input.unwrap().count, 1000);
    assert_eq!(report.removed_outliers, 0);
    assert_eq!(report.train_examples + report.validation_examples, 996);
    assert_eq!(report.validation_examples, 399);
    assert_eq!(report.forecast.len(), 365);
    assert!(report.forecast.iter().all(|v| v.is_finite()));

    let log = std::fs::read_to_string(dir.path().join("out/linear_regression_training_log.csv")).unwrap();
    assert!(log.starts_with("epoch,loss,mae,mse,val_loss,val_mae,val_mse\n"));
    assert_eq!(log.lines().count(), 101);

    let predictions = std::fs::read_to_string(dir.path().join("out/linear_regression_predictions.csv")).unwrap();
    assert!(predictions.starts_with("step,prediction\n0,"));
    assert_eq!(predictions.lines().count(), 366);

    let validation = std::fs::read_to_string(dir.path().join("out/linear_regression_validation_predictions.csv")).unwrap();
    assert_eq!(validation.lines().count(), 400);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["model"]["model_type"], "linear_regression");
    assert!(json["metrics"]["mape"].is_number());
    assert!(json["evaluation_error"].is_null());
}

#[test]
fn window_mean_with_iqr_and_chronological_split() {
    let dir = tempdir().unwrap();
    let mut config = config_for(dir.path(), 400);
    config.data.outlier_policy = OutlierPolicy::Iqr;
    config.split.shuffle = false;
    config.training.model_type = ModelType::WindowMean;
    config.forecast.horizon = 30;
    config.output.write_artifacts = false;

    let report = Pipeline::new(config).unwrap().run().unwrap();

    assert_eq!(report.model.model_type, ModelType::WindowMean);
    assert_eq!(report.final_epoch.unwrap().epoch, 0);
    assert_eq!(report.forecast.len(), 30);
    // A smooth series has no values beyond the Tukey fences
    assert_eq!(report.removed_outliers, 0);
    assert!(!dir.path().join("out").exists());
}

#[test]
fn missing_column_is_a_data_error() {
    let dir = tempdir().unwrap();
    let mut config = config_for(dir.path(), 50);
    config.data.column = "Output".to_string();

    let err = Pipeline::new(config).unwrap().run().unwrap_err();
    assert!(matches!(err, ForecastError::Data(_)));
    assert!(err.to_string().contains("Daily Power Production"));
}

#[test]
fn missing_input_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let mut config = PipelineConfig::default();
    config.data.input = dir.path().join("absent.csv");

    let err = Pipeline::new(config).unwrap().run().unwrap_err();
    assert!(matches!(err, ForecastError::Io(_)));
}
